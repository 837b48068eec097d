use serde::{Deserialize, Serialize};
use serde_json::Value;

// --- Response envelope ---

#[derive(Debug, Deserialize)]
pub struct Envelope<T> {
    #[serde(default)]
    pub status: String,
    #[serde(default)]
    pub message: Option<String>,
    pub data: Option<T>,
}

#[derive(Debug, Deserialize)]
pub struct ErrorEnvelope {
    #[serde(default)]
    pub message: String,
}

// --- Request bodies ---

#[derive(Debug, Serialize)]
pub struct PriorityBody<'a> {
    pub priority: &'a str,
}

#[derive(Debug, Serialize)]
pub struct AssigneeBody {
    pub assignee_id: i64,
}

#[derive(Debug, Serialize)]
pub struct TagsBody<'a> {
    pub tags: &'a [String],
}

#[derive(Debug, Serialize)]
pub struct DraftBody<'a> {
    pub content: &'a str,
    pub meta: &'a Value,
}
