//! In-memory [`InboxApi`] for store tests.

use std::collections::{HashMap, VecDeque};
use std::sync::atomic::{AtomicBool, AtomicUsize, Ordering};
use std::sync::Mutex;

use async_trait::async_trait;
use serde_json::Value;

use crate::api::{ApiError, InboxApi, ListQuery, PageQuery, PageResults, StatusUpdate};
use crate::models::{
    AssigneeType, Conversation, ConversationSummary, Draft, ListContext, Message, Participant,
    Priority, Status,
};

pub fn conversation(uuid: &str) -> ConversationSummary {
    ConversationSummary {
        uuid: uuid.to_string(),
        status: Some("Open".to_string()),
        ..Default::default()
    }
}

pub fn message(conversation_uuid: &str, uuid: &str) -> Message {
    Message {
        uuid: uuid.to_string(),
        conversation_uuid: conversation_uuid.to_string(),
        content: format!("content of {}", uuid),
        ..Default::default()
    }
}

pub fn page_of<T>(results: Vec<T>, total_pages: u32, total: u64) -> PageResults<T> {
    PageResults {
        results,
        total,
        per_page: 50,
        total_pages,
        page: 1,
    }
}

/// Scripted responses plus a log of every call that reached the "server".
#[derive(Default)]
pub struct FakeApi {
    list_pages: Mutex<VecDeque<Result<PageResults<ConversationSummary>, ApiError>>>,
    list_calls: Mutex<Vec<(ListContext, ListQuery)>>,
    conversations: Mutex<HashMap<String, Conversation>>,
    message_pages: Mutex<HashMap<(String, u32), PageResults<Message>>>,
    message_calls: Mutex<Vec<(String, u32)>>,
    single_messages: Mutex<HashMap<String, Message>>,
    single_message_calls: Mutex<Vec<String>>,
    mutations: Mutex<Vec<String>>,
    fail_mutations: AtomicBool,
    status_calls: AtomicUsize,
}

impl FakeApi {
    /// Queue a list response; an empty queue answers with an empty page.
    pub fn push_list(&self, response: Result<PageResults<ConversationSummary>, ApiError>) {
        self.list_pages.lock().unwrap().push_back(response);
    }

    pub fn list_calls(&self) -> Vec<(ListContext, ListQuery)> {
        self.list_calls.lock().unwrap().clone()
    }

    pub fn set_conversation(&self, conversation: Conversation) {
        self.conversations
            .lock()
            .unwrap()
            .insert(conversation.uuid.clone(), conversation);
    }

    pub fn set_messages(
        &self,
        conversation_uuid: &str,
        page: u32,
        messages: Vec<Message>,
        total_pages: u32,
    ) {
        let mut results = page_of(messages, total_pages, 0);
        results.page = page;
        self.message_pages
            .lock()
            .unwrap()
            .insert((conversation_uuid.to_string(), page), results);
    }

    pub fn message_calls(&self) -> Vec<(String, u32)> {
        self.message_calls.lock().unwrap().clone()
    }

    pub fn set_message(&self, message: Message) {
        self.single_messages
            .lock()
            .unwrap()
            .insert(message.uuid.clone(), message);
    }

    pub fn single_message_calls(&self) -> Vec<String> {
        self.single_message_calls.lock().unwrap().clone()
    }

    pub fn fail_mutations(&self, fail: bool) {
        self.fail_mutations.store(fail, Ordering::SeqCst);
    }

    pub fn mutations(&self) -> Vec<String> {
        self.mutations.lock().unwrap().clone()
    }

    pub fn status_calls(&self) -> usize {
        self.status_calls.load(Ordering::SeqCst)
    }

    fn mutate(&self, call: String) -> Result<(), ApiError> {
        if self.fail_mutations.load(Ordering::SeqCst) {
            return Err(ApiError::RequestFailed(format!("{} rejected", call)));
        }
        self.mutations.lock().unwrap().push(call);
        Ok(())
    }
}

#[async_trait]
impl InboxApi for FakeApi {
    async fn list_conversations(
        &self,
        context: &ListContext,
        query: &ListQuery,
    ) -> Result<PageResults<ConversationSummary>, ApiError> {
        self.list_calls.lock().unwrap().push((*context, query.clone()));
        self.list_pages
            .lock()
            .unwrap()
            .pop_front()
            .unwrap_or_else(|| Ok(page_of(Vec::new(), 0, 0)))
    }

    async fn get_conversation(&self, uuid: &str) -> Result<Conversation, ApiError> {
        self.conversations
            .lock()
            .unwrap()
            .get(uuid)
            .cloned()
            .ok_or_else(|| ApiError::NotFound(format!("Conversation {} not found", uuid)))
    }

    async fn get_participants(&self, _uuid: &str) -> Result<Vec<Participant>, ApiError> {
        Ok(vec![Participant {
            id: 1,
            first_name: "Grace".to_string(),
            ..Default::default()
        }])
    }

    async fn get_messages(
        &self,
        conversation_uuid: &str,
        query: PageQuery,
    ) -> Result<PageResults<Message>, ApiError> {
        self.message_calls
            .lock()
            .unwrap()
            .push((conversation_uuid.to_string(), query.page));
        self.message_pages
            .lock()
            .unwrap()
            .get(&(conversation_uuid.to_string(), query.page))
            .cloned()
            .ok_or_else(|| ApiError::NotFound("No such page".to_string()))
    }

    async fn get_message(
        &self,
        _conversation_uuid: &str,
        message_uuid: &str,
    ) -> Result<Message, ApiError> {
        self.single_message_calls
            .lock()
            .unwrap()
            .push(message_uuid.to_string());
        self.single_messages
            .lock()
            .unwrap()
            .get(message_uuid)
            .cloned()
            .ok_or_else(|| ApiError::NotFound(format!("Message {} not found", message_uuid)))
    }

    async fn update_status(&self, uuid: &str, update: &StatusUpdate) -> Result<(), ApiError> {
        let mut call = format!("update_status:{}:{}", uuid, update.status);
        if let Some(until) = &update.snoozed_until {
            call.push(':');
            call.push_str(until);
        }
        self.mutate(call)
    }

    async fn update_priority(&self, uuid: &str, priority: &str) -> Result<(), ApiError> {
        self.mutate(format!("update_priority:{}:{}", uuid, priority))
    }

    async fn update_assignee(
        &self,
        uuid: &str,
        assignee: AssigneeType,
        assignee_id: i64,
    ) -> Result<(), ApiError> {
        self.mutate(format!(
            "update_assignee:{}:{}:{}",
            uuid,
            assignee.as_str(),
            assignee_id
        ))
    }

    async fn remove_assignee(&self, uuid: &str, assignee: AssigneeType) -> Result<(), ApiError> {
        self.mutate(format!("remove_assignee:{}:{}", uuid, assignee.as_str()))
    }

    async fn upsert_tags(&self, uuid: &str, tags: &[String]) -> Result<(), ApiError> {
        self.mutate(format!("upsert_tags:{}:{}", uuid, tags.join(",")))
    }

    async fn update_custom_attributes(
        &self,
        uuid: &str,
        attributes: &Value,
    ) -> Result<(), ApiError> {
        self.mutate(format!("update_custom_attributes:{}:{}", uuid, attributes))
    }

    async fn update_last_seen(&self, uuid: &str) -> Result<(), ApiError> {
        self.mutate(format!("update_last_seen:{}", uuid))
    }

    async fn mark_unread(&self, uuid: &str) -> Result<(), ApiError> {
        self.mutate(format!("mark_unread:{}", uuid))
    }

    async fn get_statuses(&self) -> Result<Vec<Status>, ApiError> {
        self.status_calls.fetch_add(1, Ordering::SeqCst);
        Ok(["Open", "Snoozed", "Resolved"]
            .into_iter()
            .enumerate()
            .map(|(i, name)| Status {
                id: i as i64 + 1,
                name: name.to_string(),
            })
            .collect())
    }

    async fn get_priorities(&self) -> Result<Vec<Priority>, ApiError> {
        Ok(vec![Priority {
            id: 1,
            name: "Low".to_string(),
        }])
    }

    async fn get_drafts(&self) -> Result<Vec<Draft>, ApiError> {
        Ok(Vec::new())
    }

    async fn save_draft(&self, uuid: &str, _draft: &Draft) -> Result<(), ApiError> {
        self.mutate(format!("save_draft:{}", uuid))
    }

    async fn delete_draft(&self, uuid: &str) -> Result<(), ApiError> {
        self.mutate(format!("delete_draft:{}", uuid))
    }
}
