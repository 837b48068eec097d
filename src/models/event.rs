use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use serde_json::Value;

use super::message::{MessageType, SenderType};

/// Summary of a message carried by a `new_message` push.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct MessageNotice {
    pub conversation_uuid: String,
    pub uuid: String,
    pub content: String,
    pub created_at: Option<DateTime<Utc>>,
    #[serde(rename = "type")]
    pub kind: MessageType,
    pub private: bool,
    pub sender_type: SenderType,
}

impl MessageNotice {
    pub fn is_interaction(&self) -> bool {
        self.kind != MessageType::Activity && !self.private
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ConversationNotice {
    pub uuid: String,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct MessagePropUpdate {
    pub conversation_uuid: String,
    pub uuid: String,
    pub prop: String,
    pub value: Value,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ConversationPropUpdate {
    pub uuid: String,
    pub prop: String,
    pub value: Value,
}

/// A server-side change delivered over the push channel.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(tag = "type", content = "data", rename_all = "snake_case")]
pub enum PushEvent {
    NewMessage(MessageNotice),
    NewConversation(ConversationNotice),
    MessagePropUpdate(MessagePropUpdate),
    ConversationPropUpdate(ConversationPropUpdate),
}

impl PushEvent {
    pub fn kind(&self) -> &'static str {
        match self {
            PushEvent::NewMessage(_) => "new_message",
            PushEvent::NewConversation(_) => "new_conversation",
            PushEvent::MessagePropUpdate(_) => "message_prop_update",
            PushEvent::ConversationPropUpdate(_) => "conversation_prop_update",
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_parse_new_message() {
        let raw = r#"{"type":"new_message","data":{"conversation_uuid":"c1","uuid":"m1",
            "content":"hi","created_at":"2025-01-02T03:04:05Z","type":"activity","private":false,
            "sender_type":"agent"}}"#;
        let event: PushEvent = serde_json::from_str(raw).unwrap();
        match event {
            PushEvent::NewMessage(notice) => {
                assert_eq!(notice.conversation_uuid, "c1");
                assert_eq!(notice.kind, MessageType::Activity);
                assert_eq!(notice.sender_type, SenderType::Agent);
                assert!(!notice.is_interaction());
            }
            other => panic!("Expected NewMessage, got {}", other.kind()),
        }
    }

    #[test]
    fn test_parse_prop_update() {
        let raw = r#"{"type":"message_prop_update","data":{"conversation_uuid":"c1","uuid":"m1",
            "prop":"status","value":"sent"}}"#;
        let event: PushEvent = serde_json::from_str(raw).unwrap();
        assert_eq!(event.kind(), "message_prop_update");
    }

    #[test]
    fn test_unknown_event_rejected() {
        let raw = r#"{"type":"typing","data":{}}"#;
        assert!(serde_json::from_str::<PushEvent>(raw).is_err());
    }
}
