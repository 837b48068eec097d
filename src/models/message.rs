use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use serde_json::{Map, Value};

use super::nullable::null_as_default;

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum MessageType {
    #[default]
    Incoming,
    Outgoing,
    Activity,
    #[serde(other)]
    Unknown,
}

impl MessageType {
    pub fn as_str(&self) -> &'static str {
        match self {
            MessageType::Incoming => "incoming",
            MessageType::Outgoing => "outgoing",
            MessageType::Activity => "activity",
            MessageType::Unknown => "unknown",
        }
    }
}

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum MessageStatus {
    Pending,
    Sent,
    Failed,
    #[default]
    Received,
    #[serde(other)]
    Unknown,
}

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum SenderType {
    Agent,
    #[default]
    Contact,
    #[serde(other)]
    Unknown,
}

impl SenderType {
    pub fn as_str(&self) -> &'static str {
        match self {
            SenderType::Agent => "agent",
            SenderType::Contact => "contact",
            SenderType::Unknown => "unknown",
        }
    }
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct MessageAuthor {
    pub id: i64,
    pub first_name: String,
    pub last_name: String,
    pub avatar_url: Option<String>,
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct Message {
    pub id: i64,
    pub uuid: String,
    #[serde(rename = "type")]
    pub kind: MessageType,
    pub status: MessageStatus,
    pub conversation_uuid: String,
    pub content: String,
    pub text_content: String,
    pub content_type: String,
    pub private: bool,
    pub sender_id: i64,
    pub sender_type: SenderType,
    pub author: MessageAuthor,
    pub meta: Value,
    #[serde(deserialize_with = "null_as_default")]
    pub attachments: Vec<Value>,
    pub created_at: Option<DateTime<Utc>>,
    pub updated_at: Option<DateTime<Utc>>,
    #[serde(flatten)]
    pub extra: Map<String, Value>,
}


#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_null_attachments() {
        let message: Message =
            serde_json::from_str(r#"{"uuid":"m1","type":"outgoing","attachments":null}"#).unwrap();
        assert_eq!(message.uuid, "m1");
        assert_eq!(message.kind, MessageType::Outgoing);
        assert!(message.attachments.is_empty());
        assert!(message.extra.is_empty());
    }

    #[test]
    fn test_unknown_enum_values() {
        let message: Message =
            serde_json::from_str(r#"{"type":"template","status":"queued","sender_type":"bot"}"#)
                .unwrap();
        assert_eq!(message.kind, MessageType::Unknown);
        assert_eq!(message.status, MessageStatus::Unknown);
        assert_eq!(message.sender_type, SenderType::Unknown);
    }
}
