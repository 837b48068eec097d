use serde::{Deserialize, Serialize};
use thiserror::Error;

use crate::models::nullable::null_as_default;

#[derive(Debug, Error)]
pub enum ApiError {
    #[error("Authentication failed: {0}")]
    Unauthorized(String),

    #[error("Permission denied: {0}")]
    Forbidden(String),

    #[error("Not found: {0}")]
    NotFound(String),

    #[error("Request failed: {0}")]
    RequestFailed(String),

    #[error("Network error: {0}")]
    NetworkError(String),

    #[error("Request timed out")]
    Timeout,

    #[error("Invalid response: {0}")]
    InvalidResponse(String),

    #[error("Invalid request: {0}")]
    InvalidRequest(String),
}

impl ApiError {
    /// Text suitable for a toast or an inline error banner.
    pub fn user_message(&self) -> String {
        match self {
            ApiError::Unauthorized(_) => {
                "Your session has expired, please sign in again".to_string()
            }
            ApiError::Forbidden(msg) | ApiError::NotFound(msg) | ApiError::RequestFailed(msg) => {
                msg.clone()
            }
            ApiError::NetworkError(_) => "Could not reach the server".to_string(),
            ApiError::Timeout => "The server took too long to respond".to_string(),
            ApiError::InvalidResponse(_) => "Unexpected response from the server".to_string(),
            ApiError::InvalidRequest(msg) => msg.clone(),
        }
    }
}

impl From<reqwest::Error> for ApiError {
    fn from(e: reqwest::Error) -> Self {
        if e.is_timeout() {
            ApiError::Timeout
        } else if e.is_decode() {
            ApiError::InvalidResponse(e.to_string())
        } else {
            ApiError::NetworkError(e.to_string())
        }
    }
}

/// One page of a paginated collection.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(bound(deserialize = "T: Deserialize<'de>"))]
pub struct PageResults<T> {
    #[serde(default = "Vec::new", deserialize_with = "null_as_default")]
    pub results: Vec<T>,
    #[serde(default)]
    pub total: u64,
    #[serde(default)]
    pub per_page: u32,
    #[serde(default)]
    pub total_pages: u32,
    #[serde(default)]
    pub page: u32,
}

/// Query parameters for the conversation list endpoints.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct ListQuery {
    pub page: u32,
    pub page_size: u32,
    pub order_by: String,
    pub order: String,
    /// JSON-encoded filter array; absent for views.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub filters: Option<String>,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub struct PageQuery {
    pub page: u32,
    pub page_size: u32,
}

#[derive(Debug, Clone, Serialize)]
pub struct StatusUpdate {
    pub status: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub snoozed_until: Option<String>,
}
