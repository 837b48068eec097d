use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use serde_json::Value;

use super::nullable::null_as_default;

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Status {
    pub id: i64,
    pub name: String,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Priority {
    pub id: i64,
    pub name: String,
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct Participant {
    pub id: i64,
    pub first_name: String,
    pub last_name: String,
    pub avatar_url: Option<String>,
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct Draft {
    pub conversation_uuid: String,
    pub content: String,
    pub meta: Value,
    pub updated_at: Option<DateTime<Utc>>,
}

/// One step of a macro, e.g. `set_status` with the status to apply.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct MacroAction {
    #[serde(rename = "type")]
    pub kind: String,
    pub value: Value,
}

/// A macro staged against a reply box, with the actions it will run.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct Macro {
    pub id: i64,
    pub name: String,
    pub message_content: String,
    #[serde(deserialize_with = "null_as_default")]
    pub actions: Vec<MacroAction>,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum AssigneeType {
    User,
    Team,
}

impl AssigneeType {
    pub fn as_str(&self) -> &'static str {
        match self {
            AssigneeType::User => "user",
            AssigneeType::Team => "team",
        }
    }
}

/// Name of the status a snoozed conversation is moved to.
pub const STATUS_SNOOZED: &str = "Snoozed";
