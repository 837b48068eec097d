use std::collections::HashMap;
use std::sync::{Arc, Mutex, MutexGuard};

use serde_json::Value;
use tokio_util::task::TaskTracker;

use super::conversation_list::{ConversationList, FetchPlan};
use super::message_cache::MessageCache;
use super::notifier::Notifier;
use crate::api::{ApiError, InboxApi, PageQuery, StatusUpdate};
use crate::config::{MACRO_CONTEXT_CONVERSATION, MESSAGE_LIST_PAGE_SIZE};
use crate::models::reference::STATUS_SNOOZED;
use crate::models::{
    AssigneeType, Conversation, ConversationSummary, Draft, ListContext, ListFilter, Macro,
    MacroAction, Message, MessageType, Participant, Priority, SortField, Status,
};

#[derive(Default)]
pub(super) struct InboxState {
    pub(super) list: ConversationList,
    pub(super) messages: MessageCache,
    pub(super) current: Option<Conversation>,
    current_loading: bool,
    current_error: Option<String>,
    participants: HashMap<i64, Participant>,
    messages_loading: bool,
    statuses: Vec<Status>,
    priorities: Vec<Priority>,
    drafts: HashMap<String, Draft>,
    macros: HashMap<String, Macro>,
}

impl InboxState {
    pub(super) fn current_uuid(&self) -> Option<String> {
        self.current.as_ref().map(|c| c.uuid.clone())
    }
}

/// Point-in-time copy of the list for rendering.
#[derive(Debug, Clone)]
pub struct ListSnapshot {
    pub rows: Vec<ConversationSummary>,
    pub context: Option<ListContext>,
    pub status: String,
    pub sort_field: SortField,
    pub page: u32,
    pub has_more: bool,
    pub total: u64,
    pub loading: bool,
    pub error_message: Option<String>,
    pub selected: Vec<String>,
}

/// Client-side inbox state over a remote [`InboxApi`].
///
/// Cheap to clone; clones share state. The state lock is never held across
/// an `.await`, so overlapping calls interleave freely and rely on the list
/// generation to discard superseded responses.
#[derive(Clone)]
pub struct InboxStore {
    pub(super) api: Arc<dyn InboxApi>,
    pub(super) state: Arc<Mutex<InboxState>>,
    pub(super) notifier: Notifier,
    pub(super) tasks: TaskTracker,
}

impl InboxStore {
    pub fn new(api: Arc<dyn InboxApi>) -> Self {
        Self {
            api,
            state: Arc::new(Mutex::new(InboxState::default())),
            notifier: Notifier::new(),
            tasks: TaskTracker::new(),
        }
    }

    pub fn notifier(&self) -> &Notifier {
        &self.notifier
    }

    pub(super) fn state(&self) -> MutexGuard<'_, InboxState> {
        self.state.lock().unwrap_or_else(|poisoned| poisoned.into_inner())
    }

    /// Toast on failure, hand back the value on success.
    fn report<T>(&self, result: Result<T, ApiError>) -> Option<T> {
        match result {
            Ok(value) => Some(value),
            Err(e) => {
                self.notifier.error(&e);
                None
            }
        }
    }

    // --- Conversation list ---

    /// Load `page` of `context` with `filters`, switching context if needed.
    pub async fn fetch_conversations_list(
        &self,
        context: ListContext,
        filters: Vec<ListFilter>,
        page: Option<u32>,
    ) {
        let plan = self.state().list.plan_fetch(context, Some(filters), page);
        self.run_list_fetch(plan).await;
    }

    /// Returns `false` when there is no further page to load.
    pub async fn fetch_next_conversations(&self) -> bool {
        let plan = {
            let mut state = self.state();
            state.list.plan_next_page()
        };
        match plan {
            Some(plan) => {
                self.run_list_fetch(plan).await;
                true
            }
            None => false,
        }
    }

    pub async fn refetch_conversations(&self) {
        self.fetch_active_list(None).await;
    }

    /// Reload page 1 of the active list, appending conversations not yet listed.
    pub async fn fetch_first_page_conversations(&self) {
        self.fetch_active_list(Some(1)).await;
    }

    async fn fetch_active_list(&self, page: Option<u32>) {
        let plan = {
            let mut state = self.state();
            state
                .list
                .context()
                .map(|context| state.list.plan_fetch(context, None, page))
        };
        match plan {
            Some(plan) => self.run_list_fetch(plan).await,
            None => tracing::debug!("No active conversation list to fetch"),
        }
    }

    async fn run_list_fetch(&self, plan: FetchPlan) {
        let result = self.api.list_conversations(&plan.context, &plan.query).await;
        let mut state = self.state();
        match result {
            Ok(page) => {
                let received = page.results.len();
                if state.list.apply_page(&plan, page) {
                    tracing::debug!(
                        "Loaded {} conversations on page {} of {:?}",
                        received,
                        plan.page,
                        plan.context.list_type
                    );
                }
            }
            Err(e) => {
                tracing::warn!("Failed to fetch conversations: {}", e);
                state.list.apply_error(&plan, e.user_message());
            }
        }
    }

    pub async fn set_list_status(&self, status: &str) {
        let changed = self.state().list.set_status(status);
        if changed {
            self.refetch_conversations().await;
        }
    }

    pub async fn set_list_sort_field(&self, field: SortField) {
        let changed = self.state().list.set_sort_field(field);
        if changed {
            self.refetch_conversations().await;
        }
    }

    pub fn list_sort_label(&self) -> &'static str {
        self.state().list.sort_field().label()
    }

    /// The list as rendered: status-filtered and sorted.
    pub fn conversations_list(&self) -> Vec<ConversationSummary> {
        self.state().list.visible().into_iter().cloned().collect()
    }

    pub fn list_snapshot(&self) -> ListSnapshot {
        let state = self.state();
        let list = &state.list;
        ListSnapshot {
            rows: list.visible().into_iter().cloned().collect(),
            context: list.context(),
            status: list.status().to_string(),
            sort_field: list.sort_field(),
            page: list.page(),
            has_more: list.has_more(),
            total: list.total(),
            loading: list.loading(),
            error_message: list.error_message().map(str::to_string),
            selected: list.selection().selected(),
        }
    }

    pub fn conversation_uuid_exists(&self, uuid: &str) -> bool {
        self.state().list.contains(uuid)
    }

    /// Leave the inbox: forget the list and every cached message.
    pub fn reset_conversations(&self) {
        let mut state = self.state();
        state.list.reset();
        state.messages.forget_all();
    }

    pub fn toggle_select(&self, uuid: &str, range: bool) {
        self.state().list.toggle_select(uuid, range);
    }

    pub fn select_all(&self) {
        self.state().list.select_all();
    }

    pub fn clear_selection(&self) {
        self.state().list.clear_selection();
    }

    pub fn is_selected(&self, uuid: &str) -> bool {
        self.state().list.selection().is_selected(uuid)
    }

    pub fn selected_count(&self) -> usize {
        self.state().list.selection().count()
    }

    pub fn all_selected(&self) -> bool {
        self.state().list.all_selected()
    }

    // --- Open conversation ---

    pub async fn fetch_conversation(&self, uuid: &str) -> Option<Conversation> {
        self.state().current_loading = true;
        let result = self.api.get_conversation(uuid).await;

        let mut state = self.state();
        state.current_loading = false;
        match result {
            Ok(conversation) => {
                state.current_error = None;
                state.current = Some(conversation.clone());
                Some(conversation)
            }
            Err(e) => {
                state.current_error = Some(e.user_message());
                drop(state);
                self.notifier.error(&e);
                None
            }
        }
    }

    pub async fn fetch_participants(&self, uuid: &str) {
        let Some(participants) = self.report(self.api.get_participants(uuid).await) else {
            return;
        };
        let mut state = self.state();
        for participant in participants {
            state.participants.insert(participant.id, participant);
        }
    }

    pub fn participants(&self) -> Vec<Participant> {
        let mut participants: Vec<Participant> =
            self.state().participants.values().cloned().collect();
        participants.sort_by_key(|p| p.id);
        participants
    }

    pub fn current(&self) -> Option<Conversation> {
        self.state().current.clone()
    }

    pub fn current_uuid(&self) -> Option<String> {
        self.state().current_uuid()
    }

    pub fn current_loading(&self) -> bool {
        self.state().current_loading
    }

    pub fn current_error(&self) -> Option<String> {
        self.state().current_error.clone()
    }

    pub fn reset_current(&self) {
        let mut state = self.state();
        state.current = None;
        state.current_loading = false;
        state.current_error = None;
        state.participants.clear();
        state
            .macros
            .insert(MACRO_CONTEXT_CONVERSATION.to_string(), Macro::default());
    }

    // --- Messages ---

    /// Load the next page of `uuid`'s messages. Without `next_page`, a
    /// conversation whose first page is already cached is only marked read.
    pub async fn fetch_messages(&self, uuid: &str, next_page: bool) {
        let page = {
            let mut state = self.state();
            let last = state.messages.get_last_fetched_page(uuid);
            if last > 0 && !next_page {
                state.list.set_unread_count(uuid, 0);
                return;
            }
            if last > 0 && !state.messages.has_more(uuid) {
                return;
            }
            state.messages_loading = true;
            last + 1
        };

        let query = PageQuery {
            page,
            page_size: MESSAGE_LIST_PAGE_SIZE,
        };
        let result = self.api.get_messages(uuid, query).await;

        {
            let mut state = self.state();
            state.messages_loading = false;
            match result {
                Ok(fetched) => {
                    let fetched_page = if fetched.page > 0 { fetched.page } else { page };
                    state.list.set_unread_count(uuid, 0);
                    state
                        .messages
                        .add_messages(uuid, fetched.results, fetched_page, fetched.total_pages);
                    self.notifier.version().touch();
                }
                Err(e) => {
                    drop(state);
                    self.notifier.error(&e);
                }
            }
        }
        self.notifier.version().flush();
    }

    pub async fn fetch_next_messages(&self) {
        if let Some(uuid) = self.current_uuid() {
            self.fetch_messages(&uuid, true).await;
        }
    }

    /// Fetch one message and put it in the cache.
    pub async fn fetch_message(
        &self,
        conversation_uuid: &str,
        message_uuid: &str,
    ) -> Option<Message> {
        let message = self.report(self.api.get_message(conversation_uuid, message_uuid).await)?;
        self.state()
            .messages
            .add_message(conversation_uuid, message.clone());
        self.notifier.version().touch();
        self.notifier.version().flush();
        Some(message)
    }

    pub fn messages_for(&self, conversation_uuid: &str) -> Vec<Message> {
        self.state()
            .messages
            .get_all_pages_messages(conversation_uuid)
            .to_vec()
    }

    pub fn conversation_messages(&self) -> Vec<Message> {
        let state = self.state();
        match state.current.as_ref() {
            Some(current) => state.messages.get_all_pages_messages(&current.uuid).to_vec(),
            None => Vec::new(),
        }
    }

    pub fn current_has_more_messages(&self) -> bool {
        let state = self.state();
        state
            .current
            .as_ref()
            .is_some_and(|c| state.messages.has_more(&c.uuid))
    }

    pub fn messages_loading(&self) -> bool {
        self.state().messages_loading
    }

    /// Latest public incoming or outgoing message of the open conversation,
    /// which a reply's recipients are derived from.
    pub fn latest_reply_message(&self) -> Option<Message> {
        let state = self.state();
        let current = state.current.as_ref()?;
        state
            .messages
            .get_latest_message(
                &current.uuid,
                &[MessageType::Incoming, MessageType::Outgoing],
                true,
            )
            .cloned()
    }

    // --- Mutations on the open conversation ---

    fn require_current(&self) -> Option<String> {
        let uuid = self.current_uuid();
        if uuid.is_none() {
            tracing::warn!("No conversation is open");
        }
        uuid
    }

    pub async fn update_status(&self, status: &str) -> bool {
        self.send_status(StatusUpdate {
            status: status.to_string(),
            snoozed_until: None,
        })
        .await
    }

    /// `duration` is passed through as the server expects it, e.g. `"2h"`.
    pub async fn snooze_conversation(&self, duration: &str) -> bool {
        self.send_status(StatusUpdate {
            status: STATUS_SNOOZED.to_string(),
            snoozed_until: Some(duration.to_string()),
        })
        .await
    }

    async fn send_status(&self, update: StatusUpdate) -> bool {
        let Some(uuid) = self.require_current() else {
            return false;
        };
        self.report(self.api.update_status(&uuid, &update).await)
            .is_some()
    }

    pub async fn update_priority(&self, priority: &str) -> bool {
        let Some(uuid) = self.require_current() else {
            return false;
        };
        self.report(self.api.update_priority(&uuid, priority).await)
            .is_some()
    }

    pub async fn update_assignee(&self, assignee: AssigneeType, assignee_id: i64) -> bool {
        let Some(uuid) = self.require_current() else {
            return false;
        };
        self.report(self.api.update_assignee(&uuid, assignee, assignee_id).await)
            .is_some()
    }

    /// Clears the local assignee only once the server confirmed the removal.
    pub async fn remove_assignee(&self, assignee: AssigneeType) -> bool {
        let Some(uuid) = self.require_current() else {
            return false;
        };
        if self.report(self.api.remove_assignee(&uuid, assignee).await).is_none() {
            return false;
        }
        let mut state = self.state();
        if let Some(current) = state.current.as_mut().filter(|c| c.uuid == uuid) {
            match assignee {
                AssigneeType::User => current.assigned_user_id = None,
                AssigneeType::Team => current.assigned_team_id = None,
            }
        }
        true
    }

    pub async fn upsert_tags(&self, tags: &[String]) -> bool {
        let Some(uuid) = self.require_current() else {
            return false;
        };
        self.report(self.api.upsert_tags(&uuid, tags).await).is_some()
    }

    pub async fn update_custom_attributes(&self, attributes: &Value) -> bool {
        let Some(uuid) = self.require_current() else {
            return false;
        };
        self.report(self.api.update_custom_attributes(&uuid, attributes).await)
            .is_some()
    }

    pub async fn mark_as_unread(&self, uuid: &str) -> bool {
        if self.report(self.api.mark_unread(uuid).await).is_none() {
            return false;
        }
        self.state().list.set_unread_count(uuid, 1);
        true
    }

    /// Best effort; failures are only logged.
    pub async fn update_assignee_last_seen(&self, uuid: &str) {
        if let Err(e) = self.api.update_last_seen(uuid).await {
            tracing::debug!("Failed to update last seen for {}: {}", uuid, e);
        }
    }

    // --- Reference data ---

    pub async fn fetch_statuses(&self) {
        if !self.state().statuses.is_empty() {
            return;
        }
        if let Some(statuses) = self.report(self.api.get_statuses().await) {
            self.state().statuses = statuses;
        }
    }

    pub async fn fetch_priorities(&self) {
        if !self.state().priorities.is_empty() {
            return;
        }
        if let Some(priorities) = self.report(self.api.get_priorities().await) {
            self.state().priorities = priorities;
        }
    }

    pub fn statuses(&self) -> Vec<Status> {
        self.state().statuses.clone()
    }

    /// Statuses a conversation can be moved to directly, i.e. without snoozing.
    pub fn status_options_no_snooze(&self) -> Vec<Status> {
        self.state()
            .statuses
            .iter()
            .filter(|s| s.name != STATUS_SNOOZED)
            .cloned()
            .collect()
    }

    pub fn priorities(&self) -> Vec<Priority> {
        self.state().priorities.clone()
    }

    // --- Drafts ---

    pub async fn fetch_all_drafts(&self) {
        if let Some(drafts) = self.report(self.api.get_drafts().await) {
            self.state().drafts = drafts
                .into_iter()
                .map(|d| (d.conversation_uuid.clone(), d))
                .collect();
        }
    }

    pub fn get_draft(&self, uuid: &str) -> Option<Draft> {
        self.state().drafts.get(uuid).cloned()
    }

    pub fn set_draft(&self, uuid: &str, draft: Draft) {
        self.state().drafts.insert(uuid.to_string(), draft);
    }

    pub fn remove_draft(&self, uuid: &str) {
        self.state().drafts.remove(uuid);
    }

    pub fn has_draft(&self, uuid: &str) -> bool {
        self.state().drafts.contains_key(uuid)
    }

    // --- Macros ---

    pub fn set_macro(&self, context: &str, staged: Macro) {
        self.state().macros.insert(context.to_string(), staged);
    }

    pub fn set_macro_actions(&self, context: &str, actions: Vec<MacroAction>) {
        self.state()
            .macros
            .entry(context.to_string())
            .or_default()
            .actions = actions;
    }

    /// The macro staged for `context`, or an empty one.
    pub fn get_macro(&self, context: &str) -> Macro {
        self.state().macros.get(context).cloned().unwrap_or_default()
    }

    /// Drop every action of the given kind from the staged macro.
    pub fn remove_macro_action(&self, context: &str, kind: &str) {
        if let Some(staged) = self.state().macros.get_mut(context) {
            staged.actions.retain(|a| a.kind != kind);
        }
    }

    pub fn reset_macro(&self, context: &str) {
        self.state()
            .macros
            .insert(context.to_string(), Macro::default());
    }

    /// Persist a draft, keeping it locally once the server accepted it.
    pub async fn save_draft(&self, uuid: &str, draft: Draft) -> bool {
        if self.report(self.api.save_draft(uuid, &draft).await).is_none() {
            return false;
        }
        self.set_draft(uuid, draft);
        true
    }

    pub async fn discard_draft(&self, uuid: &str) -> bool {
        if self.report(self.api.delete_draft(uuid).await).is_none() {
            return false;
        }
        self.remove_draft(uuid);
        true
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::models::ListType;
    use crate::services::notifier::Notification;
    use crate::testing::{conversation, message, page_of, FakeApi};

    fn store_with(api: &Arc<FakeApi>) -> InboxStore {
        InboxStore::new(api.clone())
    }

    #[tokio::test]
    async fn test_fetch_list_and_next_page() {
        let api = Arc::new(FakeApi::default());
        api.push_list(Ok(page_of(vec![conversation("a"), conversation("b")], 2, 3)));
        api.push_list(Ok(page_of(vec![conversation("b"), conversation("c")], 2, 3)));
        let store = store_with(&api);

        store
            .fetch_conversations_list(ListContext::new(ListType::Assigned), vec![], Some(1))
            .await;
        assert!(store.list_snapshot().has_more);
        assert!(store.fetch_next_conversations().await);

        let snapshot = store.list_snapshot();
        let uuids: Vec<&str> = snapshot.rows.iter().map(|c| c.uuid.as_str()).collect();
        assert_eq!(uuids.len(), 3);
        assert!(uuids.contains(&"c"));
        assert_eq!(snapshot.page, 2);
        assert!(!snapshot.has_more);
        assert!(!store.fetch_next_conversations().await);

        let calls = api.list_calls();
        assert_eq!(calls.len(), 2);
        assert_eq!(calls[1].1.page, 2);
        assert_eq!(calls[0].0.list_type, ListType::Assigned);
    }

    #[tokio::test]
    async fn test_list_failure_sets_error() {
        let api = Arc::new(FakeApi::default());
        api.push_list(Err(ApiError::NetworkError("connection refused".to_string())));
        let store = store_with(&api);

        store
            .fetch_conversations_list(ListContext::new(ListType::All), vec![], None)
            .await;
        let snapshot = store.list_snapshot();
        assert_eq!(snapshot.error_message.as_deref(), Some("Could not reach the server"));
        assert_eq!(snapshot.total, 0);
        assert!(!snapshot.loading);
    }

    #[tokio::test]
    async fn test_sort_change_refetches_with_new_order() {
        let api = Arc::new(FakeApi::default());
        let store = store_with(&api);
        store
            .fetch_conversations_list(ListContext::team(2), vec![], None)
            .await;
        store.set_list_sort_field(SortField::WaitingLongest).await;
        store.set_list_sort_field(SortField::WaitingLongest).await;

        let calls = api.list_calls();
        assert_eq!(calls.len(), 2);
        assert_eq!(calls[1].0, ListContext::team(2));
        assert_eq!(calls[1].1.order_by, "conversations.waiting_since");
        assert_eq!(calls[1].1.order, "asc");
        assert_eq!(store.list_sort_label(), "Waiting longest");
    }

    #[tokio::test]
    async fn test_fetch_messages_once_then_next_page() {
        let api = Arc::new(FakeApi::default());
        api.set_messages("c1", 1, vec![message("c1", "m1"), message("c1", "m2")], 2);
        api.set_messages("c1", 2, vec![message("c1", "m3")], 2);
        api.push_list(Ok(page_of(
            vec![ConversationSummary {
                unread_message_count: 4,
                ..conversation("c1")
            }],
            1,
            1,
        )));
        let store = store_with(&api);
        store
            .fetch_conversations_list(ListContext::new(ListType::All), vec![], None)
            .await;

        store.fetch_messages("c1", false).await;
        store.fetch_messages("c1", false).await;
        assert_eq!(api.message_calls(), vec![("c1".to_string(), 1)]);
        assert_eq!(store.list_snapshot().rows[0].unread_message_count, 0);
        assert_eq!(store.notifier().version().current(), 1);

        store.fetch_messages("c1", true).await;
        store.fetch_messages("c1", true).await;
        let uuids: Vec<String> = store.messages_for("c1").into_iter().map(|m| m.uuid).collect();
        assert_eq!(uuids, vec!["m1", "m2", "m3"]);
        assert_eq!(api.message_calls().len(), 2);
    }

    #[tokio::test]
    async fn test_open_conversation_messages() {
        let api = Arc::new(FakeApi::default());
        api.set_conversation(Conversation {
            uuid: "c1".to_string(),
            ..Default::default()
        });
        let mut note = message("c1", "note");
        note.private = true;
        api.set_messages("c1", 1, vec![note, message("c1", "m1")], 3);
        let store = store_with(&api);

        assert!(store.fetch_conversation("c1").await.is_some());
        store.fetch_participants("c1").await;
        store.fetch_messages("c1", false).await;
        assert!(!store.messages_loading());

        assert_eq!(store.participants()[0].first_name, "Grace");
        assert_eq!(store.conversation_messages().len(), 2);
        assert!(store.current_has_more_messages());
        assert_eq!(store.latest_reply_message().unwrap().uuid, "m1");

        store.reset_current();
        assert!(store.participants().is_empty());
        assert!(store.conversation_messages().is_empty());
        assert!(store.latest_reply_message().is_none());
    }

    #[tokio::test]
    async fn test_fetch_conversation_failure_is_reported() {
        let api = Arc::new(FakeApi::default());
        let store = store_with(&api);
        let mut toasts = store.notifier().subscribe();

        assert!(store.fetch_conversation("missing").await.is_none());
        assert!(store.current_error().is_some());
        assert!(!store.current_loading());
        assert!(matches!(toasts.recv().await.unwrap(), Notification::Toast { .. }));
    }

    #[tokio::test]
    async fn test_mark_as_unread_only_after_success() {
        let api = Arc::new(FakeApi::default());
        api.push_list(Ok(page_of(vec![conversation("a")], 1, 1)));
        let store = store_with(&api);
        store
            .fetch_conversations_list(ListContext::new(ListType::All), vec![], None)
            .await;

        api.fail_mutations(true);
        assert!(!store.mark_as_unread("a").await);
        assert_eq!(store.list_snapshot().rows[0].unread_message_count, 0);

        api.fail_mutations(false);
        assert!(store.mark_as_unread("a").await);
        assert_eq!(store.list_snapshot().rows[0].unread_message_count, 1);
    }

    #[tokio::test]
    async fn test_remove_assignee_only_after_success() {
        let api = Arc::new(FakeApi::default());
        api.set_conversation(Conversation {
            uuid: "c1".to_string(),
            assigned_user_id: Some(7),
            assigned_team_id: Some(2),
            ..Default::default()
        });
        let store = store_with(&api);
        store.fetch_conversation("c1").await;

        api.fail_mutations(true);
        assert!(!store.remove_assignee(AssigneeType::User).await);
        assert_eq!(store.current().unwrap().assigned_user_id, Some(7));

        api.fail_mutations(false);
        assert!(store.remove_assignee(AssigneeType::User).await);
        let current = store.current().unwrap();
        assert_eq!(current.assigned_user_id, None);
        assert_eq!(current.assigned_team_id, Some(2));
        assert_eq!(api.mutations(), vec!["remove_assignee:c1:user"]);
    }

    #[tokio::test]
    async fn test_mutations_need_open_conversation() {
        let api = Arc::new(FakeApi::default());
        let store = store_with(&api);
        assert!(!store.update_status("Resolved").await);
        assert!(!store.update_priority("High").await);
        assert!(api.mutations().is_empty());
    }

    #[tokio::test]
    async fn test_snooze_sends_snoozed_status() {
        let api = Arc::new(FakeApi::default());
        api.set_conversation(Conversation {
            uuid: "c1".to_string(),
            ..Default::default()
        });
        let store = store_with(&api);
        store.fetch_conversation("c1").await;

        assert!(store.snooze_conversation("2h").await);
        assert!(store.upsert_tags(&["billing".to_string()]).await);
        assert_eq!(
            api.mutations(),
            vec!["update_status:c1:Snoozed:2h", "upsert_tags:c1:billing"]
        );
    }

    #[tokio::test]
    async fn test_reference_data_fetched_once() {
        let api = Arc::new(FakeApi::default());
        let store = store_with(&api);
        store.fetch_statuses().await;
        store.fetch_statuses().await;
        assert_eq!(api.status_calls(), 1);
        assert_eq!(store.statuses().len(), 3);
        let names: Vec<String> = store
            .status_options_no_snooze()
            .into_iter()
            .map(|s| s.name)
            .collect();
        assert_eq!(names, vec!["Open", "Resolved"]);
    }

    #[tokio::test]
    async fn test_drafts() {
        let api = Arc::new(FakeApi::default());
        let store = store_with(&api);
        let draft = Draft {
            conversation_uuid: "c1".to_string(),
            content: "Thanks for waiting".to_string(),
            ..Default::default()
        };
        assert!(store.save_draft("c1", draft).await);
        assert!(store.has_draft("c1"));
        assert_eq!(store.get_draft("c1").unwrap().content, "Thanks for waiting");

        assert!(store.discard_draft("c1").await);
        assert!(!store.has_draft("c1"));

        store.set_draft("c2", Draft::default());
        store.remove_draft("c2");
        assert!(!store.has_draft("c2"));
    }

    fn action(kind: &str, value: &str) -> MacroAction {
        MacroAction {
            kind: kind.to_string(),
            value: serde_json::json!([value]),
        }
    }

    #[test]
    fn test_macros_per_context() {
        let store = InboxStore::new(Arc::new(FakeApi::default()));
        store.set_macro(
            MACRO_CONTEXT_CONVERSATION,
            Macro {
                id: 3,
                name: "Escalate".to_string(),
                actions: vec![action("set_priority", "High"), action("add_tags", "vip")],
                ..Default::default()
            },
        );
        store.set_macro_actions(
            crate::config::MACRO_CONTEXT_NEW_CONVERSATION,
            vec![action("assign_team", "2")],
        );

        store.remove_macro_action(MACRO_CONTEXT_CONVERSATION, "add_tags");
        let staged = store.get_macro(MACRO_CONTEXT_CONVERSATION);
        assert_eq!(staged.name, "Escalate");
        assert_eq!(staged.actions, vec![action("set_priority", "High")]);

        let new_conversation = store.get_macro(crate::config::MACRO_CONTEXT_NEW_CONVERSATION);
        assert_eq!(new_conversation.id, 0);
        assert_eq!(new_conversation.actions.len(), 1);

        store.remove_macro_action("unknown", "add_tags");
        assert_eq!(store.get_macro("unknown"), Macro::default());

        store.reset_macro(crate::config::MACRO_CONTEXT_NEW_CONVERSATION);
        assert!(store
            .get_macro(crate::config::MACRO_CONTEXT_NEW_CONVERSATION)
            .actions
            .is_empty());
    }

    #[tokio::test]
    async fn test_reset_current_clears_conversation_macro() {
        let api = Arc::new(FakeApi::default());
        api.set_conversation(Conversation {
            uuid: "c1".to_string(),
            ..Default::default()
        });
        let store = store_with(&api);
        store.fetch_conversation("c1").await;
        store.set_macro_actions(MACRO_CONTEXT_CONVERSATION, vec![action("set_status", "Resolved")]);
        store.set_macro_actions("new_conversation", vec![action("assign_team", "2")]);

        store.reset_current();
        assert!(store.current().is_none());
        assert_eq!(store.get_macro(MACRO_CONTEXT_CONVERSATION), Macro::default());
        assert_eq!(store.get_macro("new_conversation").actions.len(), 1);
    }

    #[tokio::test]
    async fn test_selection_passthrough_and_reset() {
        let api = Arc::new(FakeApi::default());
        api.push_list(Ok(page_of(vec![conversation("a"), conversation("b")], 1, 2)));
        let store = store_with(&api);
        store
            .fetch_conversations_list(ListContext::new(ListType::All), vec![], None)
            .await;

        store.select_all();
        assert!(store.all_selected());
        store.toggle_select("a", false);
        assert!(!store.is_selected("a"));
        assert_eq!(store.selected_count(), 1);

        store.reset_conversations();
        assert_eq!(store.selected_count(), 0);
        assert!(store.conversations_list().is_empty());
        assert!(!store.conversation_uuid_exists("b"));
    }
}
