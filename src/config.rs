pub const APP_ID: &str = "helpdesk-inbox";
pub const VERSION: &str = env!("CARGO_PKG_VERSION");

pub const CONV_LIST_PAGE_SIZE: u32 = 50;
pub const MESSAGE_LIST_PAGE_SIZE: u32 = 30;

/// Status the inbox list is filtered to until the user picks another.
pub const DEFAULT_LIST_STATUS: &str = "Open";

/// Macro slots: the reply box of the open conversation and the new-conversation form.
pub const MACRO_CONTEXT_CONVERSATION: &str = "conversation";
pub const MACRO_CONTEXT_NEW_CONVERSATION: &str = "new_conversation";

pub const DEFAULT_BASE_URL: &str = "http://localhost:9000";
pub const DEFAULT_TIMEOUT_SECS: u64 = 10;
