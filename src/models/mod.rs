pub mod conversation;
pub mod event;
pub mod filter;
pub mod list;
pub mod message;
pub mod nullable;
pub mod patch;
pub mod reference;

pub use conversation::{Conversation, ConversationContact, ConversationSummary, ListContact};
pub use event::{
    ConversationNotice, ConversationPropUpdate, MessageNotice, MessagePropUpdate, PushEvent,
};
pub use filter::ListFilter;
pub use list::{ListContext, ListType, SortField, SortOrder};
pub use message::{Message, MessageAuthor, MessageStatus, MessageType, SenderType};
pub use reference::{AssigneeType, Draft, Macro, MacroAction, Participant, Priority, Status};
