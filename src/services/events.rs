use futures::{FutureExt, Stream, StreamExt};

use super::notifier::Notification;
use super::store::InboxStore;
use crate::models::{ConversationPropUpdate, MessageNotice, MessagePropUpdate, PushEvent};
use crate::models::patch::set_property;

impl InboxStore {
    /// Apply one push event. Network follow-ups (list refetch, message
    /// backfill) run as background tasks; [`InboxStore::settle`] awaits them.
    pub fn handle_event(&self, event: PushEvent) {
        tracing::debug!("Push event: {}", event.kind());
        match event {
            PushEvent::NewMessage(notice) => {
                self.update_conversation_list(&notice);
                self.update_conversation_message(notice);
            }
            PushEvent::NewConversation(notice) => {
                if !self.conversation_uuid_exists(&notice.uuid) {
                    self.spawn_first_page_refetch();
                }
            }
            PushEvent::MessagePropUpdate(update) => self.update_message_prop(&update),
            PushEvent::ConversationPropUpdate(update) => self.update_conversation_prop(&update),
        }
    }

    /// Drain `events` until the stream ends. The message version is published
    /// once per burst: after every event already queued has been applied.
    pub async fn run_events<S>(&self, mut events: S)
    where
        S: Stream<Item = PushEvent> + Unpin,
    {
        while let Some(event) = events.next().await {
            self.handle_event(event);

            let mut ended = false;
            while let Some(next) = events.next().now_or_never() {
                match next {
                    Some(event) => self.handle_event(event),
                    None => {
                        ended = true;
                        break;
                    }
                }
            }
            self.flush_updates();
            if ended {
                break;
            }
        }
        tracing::debug!("Push event stream closed");
    }

    /// Publish pending message cache changes, if any.
    pub fn flush_updates(&self) -> Option<u64> {
        self.notifier.version().flush()
    }

    /// Wait for every refetch and backfill spawned so far.
    pub async fn settle(&self) {
        self.tasks.close();
        self.tasks.wait().await;
        self.tasks.reopen();
    }

    fn update_conversation_list(&self, notice: &MessageNotice) {
        let listed = {
            let mut state = self.state();
            let open = state.current_uuid();
            state.list.apply_new_message(notice, open.as_deref())
        };
        if !listed {
            self.spawn_first_page_refetch();
        }
    }

    fn update_conversation_message(&self, notice: MessageNotice) {
        let cached = self
            .state()
            .messages
            .has_message(&notice.conversation_uuid, &notice.uuid);
        if cached {
            return;
        }

        let store = self.clone();
        self.tasks.spawn(async move {
            let conversation_uuid = notice.conversation_uuid;
            store.fetch_participants(&conversation_uuid).await;
            let Some(message) = store.fetch_message(&conversation_uuid, &notice.uuid).await else {
                return;
            };
            store.notifier.send(Notification::MessageArrived {
                conversation_uuid: conversation_uuid.clone(),
                message,
            });
            if store.current_uuid().as_deref() == Some(conversation_uuid.as_str()) {
                store.update_assignee_last_seen(&conversation_uuid).await;
            }
        });
    }

    fn spawn_first_page_refetch(&self) {
        let store = self.clone();
        self.tasks.spawn(async move {
            store.fetch_first_page_conversations().await;
        });
    }

    /// Only messages already in the cache are patched.
    pub fn update_message_prop(&self, update: &MessagePropUpdate) {
        let updated = self.state().messages.update_message_field(
            &update.conversation_uuid,
            &update.uuid,
            &update.prop,
            update.value.clone(),
        );
        if updated {
            self.notifier.version().touch();
        }
    }

    pub fn update_conversation_prop(&self, update: &ConversationPropUpdate) {
        let mut state = self.state();
        if let Some(current) = state.current.as_mut().filter(|c| c.uuid == update.uuid) {
            set_property(current, &update.prop, update.value.clone());
        }
        state
            .list
            .update_prop(&update.uuid, &update.prop, update.value.clone());
    }
}
