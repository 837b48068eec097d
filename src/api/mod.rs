pub mod client;
pub mod traits;
pub mod types;
pub mod wire;

pub use client::{ApiCredentials, HttpInboxApi};
pub use traits::InboxApi;
pub use types::{ApiError, ListQuery, PageQuery, PageResults, StatusUpdate};
