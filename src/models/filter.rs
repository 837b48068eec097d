use serde::{Deserialize, Serialize};

pub const STATUS_FILTER_MODEL: &str = "conversation_statuses";

/// One predicate applied server-side to a conversation list.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ListFilter {
    pub model: String,
    pub field: String,
    pub operator: String,
    pub value: String,
}

impl ListFilter {
    pub fn new(model: &str, field: &str, operator: &str, value: &str) -> Self {
        Self {
            model: model.to_string(),
            field: field.to_string(),
            operator: operator.to_string(),
            value: value.to_string(),
        }
    }

    pub fn status_equals(status: &str) -> Self {
        Self::new(STATUS_FILTER_MODEL, "name", "equals", status)
    }

    pub fn is_status(&self) -> bool {
        self.model == STATUS_FILTER_MODEL
    }
}

/// Replace any status predicate in `filters` with one for `status`.
/// With no active status the caller's own status predicates are kept.
pub fn with_status(filters: &[ListFilter], status: &str) -> Vec<ListFilter> {
    if status.is_empty() {
        return filters.to_vec();
    }
    let mut merged: Vec<ListFilter> = filters
        .iter()
        .filter(|f| !f.is_status())
        .cloned()
        .collect();
    merged.push(ListFilter::status_equals(status));
    merged
}

/// Encode filters the way the list endpoints expect them: a JSON array in a query param.
pub fn encode_filters(filters: &[ListFilter]) -> String {
    serde_json::to_string(filters).unwrap_or_else(|_| "[]".to_string())
}
