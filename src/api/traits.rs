use async_trait::async_trait;
use serde_json::Value;

use super::types::{ApiError, ListQuery, PageQuery, PageResults, StatusUpdate};
use crate::models::{
    AssigneeType, Conversation, ConversationSummary, Draft, ListContext, Message, Participant,
    Priority, Status,
};

/// The remote helpdesk API as seen by the inbox.
#[async_trait]
pub trait InboxApi: Send + Sync {
    async fn list_conversations(
        &self,
        context: &ListContext,
        query: &ListQuery,
    ) -> Result<PageResults<ConversationSummary>, ApiError>;

    async fn get_conversation(&self, uuid: &str) -> Result<Conversation, ApiError>;

    async fn get_participants(&self, uuid: &str) -> Result<Vec<Participant>, ApiError>;

    async fn get_messages(
        &self,
        conversation_uuid: &str,
        query: PageQuery,
    ) -> Result<PageResults<Message>, ApiError>;

    async fn get_message(
        &self,
        conversation_uuid: &str,
        message_uuid: &str,
    ) -> Result<Message, ApiError>;

    async fn update_status(&self, uuid: &str, update: &StatusUpdate) -> Result<(), ApiError>;

    async fn update_priority(&self, uuid: &str, priority: &str) -> Result<(), ApiError>;

    async fn update_assignee(
        &self,
        uuid: &str,
        assignee: AssigneeType,
        assignee_id: i64,
    ) -> Result<(), ApiError>;

    async fn remove_assignee(&self, uuid: &str, assignee: AssigneeType) -> Result<(), ApiError>;

    async fn upsert_tags(&self, uuid: &str, tags: &[String]) -> Result<(), ApiError>;

    async fn update_custom_attributes(&self, uuid: &str, attributes: &Value)
        -> Result<(), ApiError>;

    async fn update_last_seen(&self, uuid: &str) -> Result<(), ApiError>;

    async fn mark_unread(&self, uuid: &str) -> Result<(), ApiError>;

    async fn get_statuses(&self) -> Result<Vec<Status>, ApiError>;

    async fn get_priorities(&self) -> Result<Vec<Priority>, ApiError>;

    async fn get_drafts(&self) -> Result<Vec<Draft>, ApiError>;

    async fn save_draft(&self, uuid: &str, draft: &Draft) -> Result<(), ApiError>;

    async fn delete_draft(&self, uuid: &str) -> Result<(), ApiError>;
}
