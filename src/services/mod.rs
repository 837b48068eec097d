pub mod conversation_list;
mod events;
pub mod message_cache;
pub mod notifier;
pub mod selection;
pub mod settings;
pub mod store;

pub use conversation_list::ConversationList;
pub use message_cache::MessageCache;
pub use notifier::{Notification, Notifier};
pub use settings::{InboxSettings, SettingsService};
pub use store::{InboxStore, ListSnapshot};
