use std::collections::HashMap;

use serde_json::Value;

use crate::models::patch::set_property;
use crate::models::{Message, MessageType};

#[derive(Debug, Default)]
struct ConversationMessages {
    /// Render order: page 1 first, each page in server order.
    messages: Vec<Message>,
    last_fetched_page: u32,
    total_pages: u32,
}

impl ConversationMessages {
    fn position(&self, message_uuid: &str) -> Option<usize> {
        self.messages.iter().position(|m| m.uuid == message_uuid)
    }
}

/// Per-conversation store of the message pages fetched so far.
#[derive(Debug, Default)]
pub struct MessageCache {
    conversations: HashMap<String, ConversationMessages>,
}

impl MessageCache {
    pub fn new() -> Self {
        Self::default()
    }

    /// Append one fetched page. Pages must arrive in ascending order; messages
    /// already present (e.g. inserted from a push) are not repeated.
    pub fn add_messages(
        &mut self,
        conversation_uuid: &str,
        messages: Vec<Message>,
        page: u32,
        total_pages: u32,
    ) {
        let entry = self
            .conversations
            .entry(conversation_uuid.to_string())
            .or_default();
        for message in messages {
            if entry.position(&message.uuid).is_none() {
                entry.messages.push(message);
            }
        }
        entry.last_fetched_page = page;
        entry.total_pages = total_pages;
    }

    /// Insert a single message at the newest end. Returns `false` when a message
    /// with the same uuid was already cached, in which case it is replaced in place.
    pub fn add_message(&mut self, conversation_uuid: &str, message: Message) -> bool {
        let entry = self
            .conversations
            .entry(conversation_uuid.to_string())
            .or_default();
        match entry.position(&message.uuid) {
            Some(idx) => {
                entry.messages[idx] = message;
                false
            }
            None => {
                entry.messages.insert(0, message);
                true
            }
        }
    }

    pub fn has_message(&self, conversation_uuid: &str, message_uuid: &str) -> bool {
        self.conversations
            .get(conversation_uuid)
            .is_some_and(|c| c.position(message_uuid).is_some())
    }

    /// Patch one property of a cached message. `false` when nothing was updated.
    pub fn update_message_field(
        &mut self,
        conversation_uuid: &str,
        message_uuid: &str,
        field: &str,
        value: Value,
    ) -> bool {
        let Some(entry) = self.conversations.get_mut(conversation_uuid) else {
            return false;
        };
        let Some(idx) = entry.position(message_uuid) else {
            return false;
        };
        set_property(&mut entry.messages[idx], field, value)
    }

    pub fn get_all_pages_messages(&self, conversation_uuid: &str) -> &[Message] {
        self.conversations
            .get(conversation_uuid)
            .map(|c| c.messages.as_slice())
            .unwrap_or(&[])
    }

    /// 0 until the first page has been fetched.
    pub fn get_last_fetched_page(&self, conversation_uuid: &str) -> u32 {
        self.conversations
            .get(conversation_uuid)
            .map(|c| c.last_fetched_page)
            .unwrap_or(0)
    }

    pub fn has_more(&self, conversation_uuid: &str) -> bool {
        self.conversations
            .get(conversation_uuid)
            .is_some_and(|c| c.last_fetched_page < c.total_pages)
    }

    /// Most recent message in render order whose type is in `types`.
    pub fn get_latest_message(
        &self,
        conversation_uuid: &str,
        types: &[MessageType],
        exclude_private: bool,
    ) -> Option<&Message> {
        self.get_all_pages_messages(conversation_uuid)
            .iter()
            .find(|m| types.contains(&m.kind) && !(exclude_private && m.private))
    }

    pub fn forget_all(&mut self) {
        self.conversations.clear();
    }
}
