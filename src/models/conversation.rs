use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use serde_json::{Map, Value};

use super::list::SortField;

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct ListContact {
    pub first_name: String,
    pub last_name: String,
    pub avatar_url: Option<String>,
}

/// A row in the conversation list.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct ConversationSummary {
    pub id: i64,
    pub uuid: String,
    pub created_at: Option<DateTime<Utc>>,
    pub updated_at: Option<DateTime<Utc>>,
    pub waiting_since: Option<DateTime<Utc>>,
    pub contact: ListContact,
    pub inbox_channel: String,
    pub inbox_name: String,
    pub subject: Option<String>,
    pub reference_number: String,
    pub status: Option<String>,
    pub priority: Option<String>,
    pub priority_id: Option<i64>,
    pub last_message: Option<String>,
    pub last_message_at: Option<DateTime<Utc>>,
    pub last_message_sender: Option<String>,
    pub last_interaction: Option<String>,
    pub last_interaction_at: Option<DateTime<Utc>>,
    pub last_interaction_sender: Option<String>,
    pub next_sla_deadline_at: Option<DateTime<Utc>>,
    pub unread_message_count: u32,
    pub assigned_user_name: Option<String>,
    pub assigned_team_name: Option<String>,
    pub mentioned_message_uuid: Option<String>,
    #[serde(flatten)]
    pub extra: Map<String, Value>,
}

impl ConversationSummary {
    /// Comparable value of the column a sort field orders by, `None` when unset.
    pub fn sort_key(&self, field: SortField) -> Option<i64> {
        let ts = |t: &Option<DateTime<Utc>>| t.map(|t| t.timestamp_millis());
        match field {
            SortField::Oldest | SortField::Newest => ts(&self.last_message_at),
            SortField::StartedFirst | SortField::StartedLast => ts(&self.created_at),
            SortField::WaitingLongest => ts(&self.waiting_since),
            SortField::NextSlaTarget => ts(&self.next_sla_deadline_at),
            SortField::PriorityFirst => self.priority_id,
        }
    }

    pub fn contact_name(&self) -> String {
        full_name(&self.contact.first_name, &self.contact.last_name)
    }
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct ConversationContact {
    pub id: i64,
    pub first_name: String,
    pub last_name: String,
    pub email: Option<String>,
    #[serde(rename = "type")]
    pub kind: String,
    pub avatar_url: Option<String>,
    pub phone_number: Option<String>,
    pub custom_attributes: Value,
}

/// The conversation currently open in the detail view.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct Conversation {
    pub id: i64,
    pub uuid: String,
    pub created_at: Option<DateTime<Utc>>,
    pub updated_at: Option<DateTime<Utc>>,
    pub reference_number: String,
    pub subject: Option<String>,
    pub inbox_id: i64,
    pub inbox_mail: String,
    pub inbox_name: String,
    pub inbox_channel: String,
    pub status: Option<String>,
    pub status_id: Option<i64>,
    pub priority: Option<String>,
    pub priority_id: Option<i64>,
    pub assigned_user_id: Option<i64>,
    pub assigned_team_id: Option<i64>,
    pub waiting_since: Option<DateTime<Utc>>,
    pub tags: Option<Vec<String>>,
    pub custom_attributes: Value,
    pub last_message: Option<String>,
    pub last_message_at: Option<DateTime<Utc>>,
    pub last_message_sender: Option<String>,
    pub last_interaction: Option<String>,
    pub last_interaction_at: Option<DateTime<Utc>>,
    pub last_interaction_sender: Option<String>,
    pub contact: ConversationContact,
    #[serde(flatten)]
    pub extra: Map<String, Value>,
}

impl Conversation {
    pub fn contact_name(&self) -> String {
        full_name(&self.contact.first_name, &self.contact.last_name)
    }
}

fn full_name(first: &str, last: &str) -> String {
    if last.is_empty() {
        first.to_string()
    } else {
        format!("{} {}", first, last)
    }
}
