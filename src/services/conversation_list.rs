use std::cmp::Ordering;
use std::collections::HashSet;

use serde_json::Value;

use super::selection::Selection;
use crate::api::{ListQuery, PageResults};
use crate::config::{CONV_LIST_PAGE_SIZE, DEFAULT_LIST_STATUS};
use crate::models::filter::{encode_filters, with_status};
use crate::models::patch::set_property;
use crate::models::{
    ConversationSummary, ListContext, ListFilter, MessageNotice, SortField, SortOrder,
};

/// A list request issued under a specific list generation.
#[derive(Debug, Clone, PartialEq)]
pub struct FetchPlan {
    pub context: ListContext,
    pub query: ListQuery,
    pub page: u32,
    pub generation: u64,
}

/// Client-side view of one paginated conversation list.
///
/// Holds no I/O: the store asks for a [`FetchPlan`], performs the request and
/// hands the outcome back. Every reset bumps `generation`, so responses to
/// plans issued before the reset are discarded on arrival.
#[derive(Debug)]
pub struct ConversationList {
    context: Option<ListContext>,
    status: String,
    sort_field: SortField,
    filters: Vec<ListFilter>,
    rows: Vec<ConversationSummary>,
    seen: HashSet<String>,
    page: u32,
    has_more: bool,
    total: u64,
    in_flight: usize,
    error_message: Option<String>,
    generation: u64,
    selection: Selection,
}

impl Default for ConversationList {
    fn default() -> Self {
        Self {
            context: None,
            status: DEFAULT_LIST_STATUS.to_string(),
            sort_field: SortField::default(),
            filters: Vec::new(),
            rows: Vec::new(),
            seen: HashSet::new(),
            page: 1,
            has_more: false,
            total: 0,
            in_flight: 0,
            error_message: None,
            generation: 0,
            selection: Selection::default(),
        }
    }
}

impl ConversationList {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn context(&self) -> Option<ListContext> {
        self.context
    }

    pub fn status(&self) -> &str {
        &self.status
    }

    pub fn sort_field(&self) -> SortField {
        self.sort_field
    }

    pub fn filters(&self) -> &[ListFilter] {
        &self.filters
    }

    pub fn page(&self) -> u32 {
        self.page
    }

    pub fn has_more(&self) -> bool {
        self.has_more
    }

    pub fn total(&self) -> u64 {
        self.total
    }

    pub fn loading(&self) -> bool {
        self.in_flight > 0
    }

    pub fn error_message(&self) -> Option<&str> {
        self.error_message.as_deref()
    }

    pub fn rows(&self) -> &[ConversationSummary] {
        &self.rows
    }

    pub fn contains(&self, uuid: &str) -> bool {
        self.rows.iter().any(|c| c.uuid == uuid)
    }

    pub fn get(&self, uuid: &str) -> Option<&ConversationSummary> {
        self.rows.iter().find(|c| c.uuid == uuid)
    }

    /// Drop rows, seen uuids and selection; the query settings survive.
    fn reset_rows(&mut self) {
        self.rows.clear();
        self.seen.clear();
        self.page = 1;
        self.has_more = false;
        self.in_flight = 0;
        self.selection.clear();
        self.generation += 1;
    }

    /// Forget the list entirely, e.g. when leaving the inbox.
    pub fn reset(&mut self) {
        self.reset_rows();
        self.context = None;
        self.filters.clear();
        self.total = 0;
        self.error_message = None;
    }

    /// Prepare a request for `page` (or the current page) of `context`.
    ///
    /// Switching to another context, or passing filters different from the
    /// active ones, empties the list first. While a status is active, status
    /// predicates inside `filters` are ignored and the active one is merged in.
    pub fn plan_fetch(
        &mut self,
        context: ListContext,
        filters: Option<Vec<ListFilter>>,
        page: Option<u32>,
    ) -> FetchPlan {
        if self.context != Some(context) {
            tracing::debug!("List context changed to {:?}, resetting", context);
            self.reset_rows();
            self.context = Some(context);
        }

        if let Some(filters) = filters {
            let keep_status = self.status.is_empty();
            let filters: Vec<ListFilter> = filters
                .into_iter()
                .filter(|f| keep_status || !f.is_status())
                .collect();
            if filters != self.filters {
                self.reset_rows();
                self.filters = filters;
            }
        }

        let page = page.unwrap_or(self.page);
        let filters = context
            .list_type
            .accepts_filters()
            .then(|| encode_filters(&with_status(&self.filters, &self.status)));

        self.in_flight += 1;
        self.error_message = None;

        FetchPlan {
            context,
            query: ListQuery {
                page,
                page_size: CONV_LIST_PAGE_SIZE,
                order_by: self.sort_field.order_by(),
                order: self.sort_field.order().as_str().to_string(),
                filters,
            },
            page,
            generation: self.generation,
        }
    }

    /// Plan for the page after the highest one loaded, if the server reported more.
    pub fn plan_next_page(&mut self) -> Option<FetchPlan> {
        let context = self.context?;
        if !self.has_more {
            return None;
        }
        let next = self.page + 1;
        Some(self.plan_fetch(context, None, Some(next)))
    }

    fn is_current(&self, plan: &FetchPlan) -> bool {
        plan.generation == self.generation && self.context == Some(plan.context)
    }

    /// Merge a fetched page. Returns `false` when the plan was superseded.
    pub fn apply_page(
        &mut self,
        plan: &FetchPlan,
        results: PageResults<ConversationSummary>,
    ) -> bool {
        if !self.is_current(plan) {
            tracing::debug!(
                "Dropping stale list page {} (generation {} != {})",
                plan.page,
                plan.generation,
                self.generation
            );
            return false;
        }
        self.in_flight = self.in_flight.saturating_sub(1);

        let seen = &mut self.seen;
        let fresh = results
            .results
            .into_iter()
            .filter(|c| seen.insert(c.uuid.clone()));
        self.rows.extend(fresh);

        self.page = self.page.max(plan.page);
        self.has_more = results.total_pages > self.page;
        self.total = results.total;
        true
    }

    /// Record a failed fetch. Loaded rows and the selection are kept.
    pub fn apply_error(&mut self, plan: &FetchPlan, message: String) -> bool {
        if !self.is_current(plan) {
            return false;
        }
        self.in_flight = self.in_flight.saturating_sub(1);
        self.error_message = Some(message);
        if plan.page == 1 {
            self.total = 0;
        }
        true
    }

    /// Returns `true` when the list was reset and needs a refetch.
    pub fn set_status(&mut self, status: &str) -> bool {
        if self.status == status {
            return false;
        }
        self.status = status.to_string();
        self.reset_rows();
        true
    }

    /// Returns `true` when the list was reset and needs a refetch.
    pub fn set_sort_field(&mut self, field: SortField) -> bool {
        if self.sort_field == field {
            return false;
        }
        self.sort_field = field;
        self.reset_rows();
        true
    }

    /// Rows as displayed: filtered by the active status and sorted by the
    /// active sort field. Rows without a value for the field sort last.
    pub fn visible(&self) -> Vec<&ConversationSummary> {
        let mut rows: Vec<&ConversationSummary> = self
            .rows
            .iter()
            .filter(|c| self.status.is_empty() || c.status.as_deref() == Some(self.status.as_str()))
            .collect();

        let field = self.sort_field;
        let order = field.order();
        rows.sort_by(|a, b| match (a.sort_key(field), b.sort_key(field)) {
            (None, None) => Ordering::Equal,
            (None, Some(_)) => Ordering::Greater,
            (Some(_), None) => Ordering::Less,
            (Some(x), Some(y)) => match order {
                SortOrder::Asc => x.cmp(&y),
                SortOrder::Desc => y.cmp(&x),
            },
        });
        rows
    }

    pub fn visible_uuids(&self) -> Vec<String> {
        self.visible().into_iter().map(|c| c.uuid.clone()).collect()
    }

    /// Refresh a row's summary from a new message. `false` if the row is not listed.
    pub fn apply_new_message(&mut self, notice: &MessageNotice, open_uuid: Option<&str>) -> bool {
        let Some(row) = self
            .rows
            .iter_mut()
            .find(|c| c.uuid == notice.conversation_uuid)
        else {
            return false;
        };

        let sender = notice.sender_type.as_str().to_string();
        row.last_message = Some(notice.content.clone());
        row.last_message_at = notice.created_at;
        row.last_message_sender = Some(sender.clone());
        if notice.is_interaction() {
            row.last_interaction = Some(notice.content.clone());
            row.last_interaction_at = notice.created_at;
            row.last_interaction_sender = Some(sender);
        }
        if open_uuid != Some(row.uuid.as_str()) {
            row.unread_message_count += 1;
        }
        true
    }

    pub fn update_prop(&mut self, uuid: &str, prop: &str, value: Value) -> bool {
        match self.rows.iter_mut().find(|c| c.uuid == uuid) {
            Some(row) => set_property(row, prop, value),
            None => false,
        }
    }

    pub fn set_unread_count(&mut self, uuid: &str, count: u32) -> bool {
        match self.rows.iter_mut().find(|c| c.uuid == uuid) {
            Some(row) => {
                row.unread_message_count = count;
                true
            }
            None => false,
        }
    }

    pub fn toggle_select(&mut self, uuid: &str, range: bool) {
        let visible = self.visible_uuids();
        let visible: Vec<&str> = visible.iter().map(String::as_str).collect();
        self.selection.toggle(uuid, range, &visible);
    }

    pub fn select_all(&mut self) {
        let visible = self.visible_uuids();
        let visible: Vec<&str> = visible.iter().map(String::as_str).collect();
        self.selection.select_all(&visible);
    }

    pub fn all_selected(&self) -> bool {
        self.selection.all_selected(self.visible().len())
    }

    pub fn selection(&self) -> &Selection {
        &self.selection
    }

    pub fn clear_selection(&mut self) {
        self.selection.clear();
    }
}
