use std::time::Duration;

use async_trait::async_trait;
use reqwest::{Client, Method, RequestBuilder, Response, StatusCode};
use serde::de::DeserializeOwned;
use serde_json::Value;
use url::Url;

use super::traits::InboxApi;
use super::types::{ApiError, ListQuery, PageQuery, PageResults, StatusUpdate};
use super::wire::*;
use crate::models::{
    AssigneeType, Conversation, ConversationSummary, Draft, ListContext, ListType, Message,
    Participant, Priority, Status,
};

const API_PREFIX: &str = "/api/v1";

#[derive(Clone)]
pub struct ApiCredentials {
    pub api_key: String,
    pub api_secret: String,
}

impl ApiCredentials {
    fn header_value(&self) -> String {
        format!("token {}:{}", self.api_key, self.api_secret)
    }
}

impl std::fmt::Debug for ApiCredentials {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("ApiCredentials")
            .field("api_key", &self.api_key)
            .field("api_secret", &"***")
            .finish()
    }
}

/// `InboxApi` over the helpdesk's REST endpoints.
pub struct HttpInboxApi {
    client: Client,
    base_url: Url,
    credentials: Option<ApiCredentials>,
}

impl HttpInboxApi {
    pub fn new(
        base_url: &str,
        credentials: Option<ApiCredentials>,
        timeout: Duration,
    ) -> Result<Self, ApiError> {
        let base_url = Url::parse(base_url)
            .map_err(|e| ApiError::InvalidRequest(format!("Bad base URL '{}': {}", base_url, e)))?;
        let client = Client::builder()
            .timeout(timeout)
            .build()
            .map_err(|e| ApiError::NetworkError(e.to_string()))?;
        Ok(Self {
            client,
            base_url,
            credentials,
        })
    }

    fn url(&self, path: &str) -> Result<Url, ApiError> {
        let base = self.base_url.as_str().trim_end_matches('/');
        Url::parse(&format!("{}{}{}", base, API_PREFIX, path))
            .map_err(|e| ApiError::InvalidRequest(e.to_string()))
    }

    fn list_path(context: &ListContext) -> Result<String, ApiError> {
        let path = match context.list_type {
            ListType::Assigned => "/conversations/assigned".to_string(),
            ListType::Unassigned => "/conversations/unassigned".to_string(),
            ListType::All => "/conversations/all".to_string(),
            ListType::Mentioned => "/conversations/mentioned".to_string(),
            ListType::TeamUnassigned => {
                let team_id = context.team_id.ok_or_else(|| {
                    ApiError::InvalidRequest("Team list requires a team id".to_string())
                })?;
                format!("/teams/{}/conversations/unassigned", team_id)
            }
            ListType::View => {
                let view_id = context.view_id.ok_or_else(|| {
                    ApiError::InvalidRequest("View list requires a view id".to_string())
                })?;
                format!("/views/{}/conversations", view_id)
            }
        };
        Ok(path)
    }

    fn request(&self, method: Method, path: &str) -> Result<RequestBuilder, ApiError> {
        let url = self.url(path)?;
        let mut builder = self.client.request(method, url);
        if let Some(creds) = &self.credentials {
            builder = builder.header("Authorization", creds.header_value());
        }
        Ok(builder)
    }

    fn parse_error_message(status: StatusCode, body: &str) -> String {
        if let Ok(parsed) = serde_json::from_str::<ErrorEnvelope>(body) {
            if !parsed.message.is_empty() {
                return parsed.message;
            }
        }
        format!("HTTP {}: Request failed", status.as_u16())
    }

    async fn check(response: Response) -> Result<Response, ApiError> {
        let status = response.status();
        if status.is_success() {
            return Ok(response);
        }

        let body = response.text().await.unwrap_or_default();
        Err(Self::status_error(status, Self::parse_error_message(status, &body)))
    }

    fn status_error(status: StatusCode, message: String) -> ApiError {
        match status {
            StatusCode::UNAUTHORIZED => ApiError::Unauthorized(message),
            StatusCode::FORBIDDEN => ApiError::Forbidden(message),
            StatusCode::NOT_FOUND => ApiError::NotFound(message),
            _ => ApiError::RequestFailed(message),
        }
    }

    async fn envelope<T: DeserializeOwned>(
        builder: RequestBuilder,
    ) -> Result<Envelope<T>, ApiError> {
        let response = Self::check(builder.send().await?).await?;
        response
            .json()
            .await
            .map_err(|e| ApiError::InvalidResponse(e.to_string()))
    }

    fn data<T>(envelope: Envelope<T>) -> Result<T, ApiError> {
        envelope.data.ok_or_else(|| {
            ApiError::InvalidResponse(
                envelope
                    .message
                    .unwrap_or_else(|| format!("Missing data (status '{}')", envelope.status)),
            )
        })
    }

    async fn fetch<T: DeserializeOwned>(builder: RequestBuilder) -> Result<T, ApiError> {
        Self::data(Self::envelope(builder).await?)
    }

    /// Collections come back as `data: null` when empty.
    fn list_data<T>(envelope: Envelope<Vec<T>>) -> Vec<T> {
        envelope.data.unwrap_or_default()
    }

    async fn fetch_list<T: DeserializeOwned>(
        builder: RequestBuilder,
    ) -> Result<Vec<T>, ApiError> {
        Ok(Self::list_data(Self::envelope(builder).await?))
    }

    async fn execute(builder: RequestBuilder) -> Result<(), ApiError> {
        Self::check(builder.send().await?).await?;
        Ok(())
    }
}

#[async_trait]
impl InboxApi for HttpInboxApi {
    async fn list_conversations(
        &self,
        context: &ListContext,
        query: &ListQuery,
    ) -> Result<PageResults<ConversationSummary>, ApiError> {
        let path = Self::list_path(context)?;
        tracing::debug!("GET {} page={} order_by={}", path, query.page, query.order_by);
        Self::fetch(self.request(Method::GET, &path)?.query(query)).await
    }

    async fn get_conversation(&self, uuid: &str) -> Result<Conversation, ApiError> {
        Self::fetch(self.request(Method::GET, &format!("/conversations/{}", uuid))?).await
    }

    async fn get_participants(&self, uuid: &str) -> Result<Vec<Participant>, ApiError> {
        let path = format!("/conversations/{}/participants", uuid);
        Self::fetch_list(self.request(Method::GET, &path)?).await
    }

    async fn get_messages(
        &self,
        conversation_uuid: &str,
        query: PageQuery,
    ) -> Result<PageResults<Message>, ApiError> {
        let path = format!("/conversations/{}/messages", conversation_uuid);
        Self::fetch(self.request(Method::GET, &path)?.query(&query)).await
    }

    async fn get_message(
        &self,
        conversation_uuid: &str,
        message_uuid: &str,
    ) -> Result<Message, ApiError> {
        let path = format!("/conversations/{}/messages/{}", conversation_uuid, message_uuid);
        Self::fetch(self.request(Method::GET, &path)?).await
    }

    async fn update_status(&self, uuid: &str, update: &StatusUpdate) -> Result<(), ApiError> {
        let path = format!("/conversations/{}/status", uuid);
        Self::execute(self.request(Method::PUT, &path)?.json(update)).await
    }

    async fn update_priority(&self, uuid: &str, priority: &str) -> Result<(), ApiError> {
        let path = format!("/conversations/{}/priority", uuid);
        Self::execute(self.request(Method::PUT, &path)?.json(&PriorityBody { priority })).await
    }

    async fn update_assignee(
        &self,
        uuid: &str,
        assignee: AssigneeType,
        assignee_id: i64,
    ) -> Result<(), ApiError> {
        let path = format!("/conversations/{}/assignee/{}", uuid, assignee.as_str());
        Self::execute(self.request(Method::PUT, &path)?.json(&AssigneeBody { assignee_id })).await
    }

    async fn remove_assignee(&self, uuid: &str, assignee: AssigneeType) -> Result<(), ApiError> {
        let path = format!("/conversations/{}/assignee/{}/remove", uuid, assignee.as_str());
        Self::execute(self.request(Method::PUT, &path)?).await
    }

    async fn upsert_tags(&self, uuid: &str, tags: &[String]) -> Result<(), ApiError> {
        let path = format!("/conversations/{}/tags", uuid);
        Self::execute(self.request(Method::POST, &path)?.json(&TagsBody { tags })).await
    }

    async fn update_custom_attributes(
        &self,
        uuid: &str,
        attributes: &Value,
    ) -> Result<(), ApiError> {
        let path = format!("/conversations/{}/custom-attributes", uuid);
        Self::execute(self.request(Method::PUT, &path)?.json(attributes)).await
    }

    async fn update_last_seen(&self, uuid: &str) -> Result<(), ApiError> {
        let path = format!("/conversations/{}/last-seen", uuid);
        Self::execute(self.request(Method::PUT, &path)?).await
    }

    async fn mark_unread(&self, uuid: &str) -> Result<(), ApiError> {
        let path = format!("/conversations/{}/mark-unread", uuid);
        Self::execute(self.request(Method::PUT, &path)?).await
    }

    async fn get_statuses(&self) -> Result<Vec<Status>, ApiError> {
        Self::fetch_list(self.request(Method::GET, "/statuses")?).await
    }

    async fn get_priorities(&self) -> Result<Vec<Priority>, ApiError> {
        Self::fetch_list(self.request(Method::GET, "/priorities")?).await
    }

    async fn get_drafts(&self) -> Result<Vec<Draft>, ApiError> {
        Self::fetch_list(self.request(Method::GET, "/drafts")?).await
    }

    async fn save_draft(&self, uuid: &str, draft: &Draft) -> Result<(), ApiError> {
        let path = format!("/conversations/{}/draft", uuid);
        let body = DraftBody {
            content: &draft.content,
            meta: &draft.meta,
        };
        Self::execute(self.request(Method::POST, &path)?.json(&body)).await
    }

    async fn delete_draft(&self, uuid: &str) -> Result<(), ApiError> {
        let path = format!("/conversations/{}/draft", uuid);
        Self::execute(self.request(Method::DELETE, &path)?).await
    }
}
