/// Conversation controller — the client-side state machine behind the chat
/// screen.
///
/// Owns the conversation list, the active conversation and its transcript,
/// the input buffer, and every loading flag. All mutation happens here, in
/// response to `Action` messages processed one at a time by a spawned task;
/// the UI only renders the `Update` events this module emits. That
/// serialization is deliberate: overlapping sends or creates cannot
/// interleave their state changes.
///
/// History fetches are the one concurrent operation — each selection bumps a
/// generation counter and a completion carrying a stale generation is
/// discarded, so a slow fetch for an abandoned selection can never overwrite
/// a newer transcript.
use tokio::sync::mpsc::{UnboundedSender, WeakUnboundedSender};

use crate::api::ChatBackend;
use crate::decode::{Conversation, Message};
use crate::diag;
use crate::error::ApiError;
use crate::profile::SessionProfile;

// ── User-visible strings ──────────────────────────────────────────────────────

const NO_USER_MSG: &str =
    "No se pudo identificar al usuario. Por favor, vuelve a iniciar sesión.";
const CREATE_FAILED_PREFIX: &str = "Error al crear conversación";
const DELETE_FAILED_MSG: &str = "Error al eliminar la conversación";
const VOICE_UNSUPPORTED_MSG: &str =
    "No hay comando de voz configurado (voice_command en config.toml)";

// ── Transcript entries ────────────────────────────────────────────────────────

/// Delivery phase of a transcript entry. User messages are appended as
/// `Pending` before the request completes and reconciled afterwards; loaded
/// history is always `Confirmed`.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Delivery {
    Pending,
    Confirmed,
    Failed,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct TranscriptEntry {
    pub message: Message,
    pub delivery: Delivery,
}

impl TranscriptEntry {
    pub fn confirmed(message: Message) -> Self {
        Self { message, delivery: Delivery::Confirmed }
    }
}

// ── Actions and updates ───────────────────────────────────────────────────────

/// Everything the UI (or a voice event, or a spawned fetch) can ask of the
/// controller.
#[derive(Debug)]
pub enum Action {
    RefreshList,
    NewConversation,
    /// Send the current input buffer. Carries the text explicitly so the
    /// send is exact regardless of in-flight edits.
    Send(String),
    Select(Conversation),
    /// Arm or disarm the inline delete confirmation for a conversation id.
    ConfirmDelete(Option<String>),
    Delete(String),
    Feedback { message_index: usize, positive: bool },
    /// Keystroke-level mirror of the UI's input buffer.
    InputChanged(String),
    /// A recognized speech utterance to append to the input buffer.
    Utterance(String),
    ToggleVoice,
    /// Completion of a spawned history fetch. Stale generations are dropped.
    HistoryLoaded { generation: u64, result: Result<Vec<Message>, ApiError> },
}

/// State changes the UI renders. The transcript is always sent whole — it is
/// replaced, never merged, exactly like the state it mirrors.
#[derive(Debug, Clone)]
pub enum Update {
    ListLoading(bool),
    Conversations(Vec<Conversation>),
    Selected(Option<Conversation>),
    Transcript(Vec<TranscriptEntry>),
    Sending(bool),
    DeleteConfirm(Option<String>),
    /// The controller changed the input buffer (clear on send, utterance
    /// append); the UI must adopt this text.
    InputSync(String),
    Recording(bool),
    /// A confirmed assistant reply, for optional text-to-speech.
    AssistantReply(String),
    Alert(String),
}

// ── Controller ────────────────────────────────────────────────────────────────

pub struct ChatController<B> {
    backend: B,
    user: SessionProfile,
    voice_supported: bool,

    conversations: Vec<Conversation>,
    selected: Option<Conversation>,
    transcript: Vec<TranscriptEntry>,
    input: String,
    list_loading: bool,
    sending: bool,
    recording: bool,
    delete_confirm: Option<String>,
    fetch_generation: u64,
}

impl<B> ChatController<B> {
    pub fn new(backend: B, user: SessionProfile, voice_supported: bool) -> Self {
        Self {
            backend,
            user,
            voice_supported,
            conversations: Vec::new(),
            selected: None,
            transcript: Vec::new(),
            input: String::new(),
            list_loading: false,
            sending: false,
            recording: false,
            delete_confirm: None,
            fetch_generation: 0,
        }
    }

    pub fn transcript(&self) -> &[TranscriptEntry] {
        &self.transcript
    }
}

fn emit(updates: &UnboundedSender<Update>, update: Update) {
    let _ = updates.send(update);
}

impl<B: ChatBackend + Clone + Send + Sync + 'static> ChatController<B> {
    /// Process one action to completion. Called sequentially by `run`.
    pub async fn handle(
        &mut self,
        action: Action,
        feedback: &WeakUnboundedSender<Action>,
        updates: &UnboundedSender<Update>,
    ) {
        match action {
            Action::RefreshList => self.refresh_list(updates).await,

            Action::NewConversation => {
                if let Err(e) = self.create_conversation(updates).await {
                    emit(updates, Update::Alert(format!("{CREATE_FAILED_PREFIX}: {e}")));
                }
            }

            Action::Send(text) => self.send(text, updates).await,

            Action::Select(conv) => self.select(conv, feedback, updates),

            Action::HistoryLoaded { generation, result } => {
                self.apply_history(generation, result, updates)
            }

            Action::ConfirmDelete(target) => {
                self.delete_confirm = target.clone();
                emit(updates, Update::DeleteConfirm(target));
            }

            Action::Delete(id) => self.delete(id, updates).await,

            Action::Feedback { message_index, positive } => {
                if let Err(e) = self.backend.submit_feedback(message_index, positive).await {
                    diag::log(&format!("feedback failed: {e}"));
                }
            }

            Action::InputChanged(text) => self.input = text,

            Action::Utterance(text) => {
                if !self.input.is_empty() {
                    self.input.push(' ');
                }
                self.input.push_str(&text);
                emit(updates, Update::InputSync(self.input.clone()));
            }

            Action::ToggleVoice => {
                if !self.voice_supported {
                    emit(updates, Update::Alert(VOICE_UNSUPPORTED_MSG.to_string()));
                    return;
                }
                self.recording = !self.recording;
                emit(updates, Update::Recording(self.recording));
            }
        }
    }

    // ── List ──────────────────────────────────────────────────────────────────

    /// Replace the conversation list from the backend. A failure leaves the
    /// previous list in place and is logged only.
    async fn refresh_list(&mut self, updates: &UnboundedSender<Update>) {
        self.list_loading = true;
        emit(updates, Update::ListLoading(self.list_loading));

        match self.backend.list_conversations(&self.user.user_id).await {
            Ok(list) => {
                self.conversations = list;
                emit(updates, Update::Conversations(self.conversations.clone()));
            }
            Err(e) => diag::log(&format!("list conversations failed: {e}")),
        }

        self.list_loading = false;
        emit(updates, Update::ListLoading(self.list_loading));
    }

    // ── Create ────────────────────────────────────────────────────────────────

    /// Create a conversation and make it active with an empty transcript.
    /// Validation failures never reach the network.
    async fn create_conversation(
        &mut self,
        updates: &UnboundedSender<Update>,
    ) -> Result<Conversation, ApiError> {
        if self.user.user_id.trim().is_empty() {
            return Err(ApiError::Validation(NO_USER_MSG.to_string()));
        }

        let conv = self.backend.create_conversation(&self.user.user_id).await?;
        self.refresh_list(updates).await;

        self.selected = Some(conv.clone());
        emit(updates, Update::Selected(self.selected.clone()));
        self.transcript.clear();
        emit(updates, Update::Transcript(Vec::new()));
        Ok(conv)
    }

    // ── Send ──────────────────────────────────────────────────────────────────

    async fn send(&mut self, text: String, updates: &UnboundedSender<Update>) {
        if text.trim().is_empty() {
            return;
        }
        self.input = text.clone();

        // No active conversation → create one first; abort the send (keeping
        // the typed input) when that fails.
        let conv = match self.selected.clone() {
            Some(c) => c,
            None => match self.create_conversation(updates).await {
                Ok(c) => c,
                Err(e) => {
                    emit(updates, Update::Alert(format!("{CREATE_FAILED_PREFIX}: {e}")));
                    return;
                }
            },
        };

        // Speculative append before the request goes out.
        self.transcript.push(TranscriptEntry {
            message: Message::user(text.clone()),
            delivery: Delivery::Pending,
        });
        self.input.clear();
        emit(updates, Update::InputSync(String::new()));
        self.sending = true;
        emit(updates, Update::Sending(self.sending));
        emit(updates, Update::Transcript(self.transcript.clone()));

        match self
            .backend
            .send_message(&self.user.user_id, &conv.id, &text)
            .await
        {
            Ok(reply) => {
                self.settle_pending(Delivery::Confirmed);
                self.transcript
                    .push(TranscriptEntry::confirmed(Message::assistant(reply.clone())));
                emit(updates, Update::AssistantReply(reply));
            }
            Err(e) => {
                // Failures stay visible in the transcript as a bot message.
                self.settle_pending(Delivery::Failed);
                self.transcript.push(TranscriptEntry {
                    message: Message::assistant(format!("Error: {}", e.user_message())),
                    delivery: Delivery::Failed,
                });
            }
        }

        emit(updates, Update::Transcript(self.transcript.clone()));
        self.sending = false;
        emit(updates, Update::Sending(self.sending));

        // Titles and timestamps may have changed server-side.
        self.refresh_list(updates).await;
    }

    fn settle_pending(&mut self, delivery: Delivery) {
        if let Some(entry) = self
            .transcript
            .iter_mut()
            .rev()
            .find(|e| e.delivery == Delivery::Pending)
        {
            entry.delivery = delivery;
        }
    }

    // ── Select ────────────────────────────────────────────────────────────────

    /// Activate a conversation. The transcript is cleared before the fetch is
    /// even spawned so the UI can never show a stale transcript under the new
    /// selection.
    fn select(
        &mut self,
        conv: Conversation,
        feedback: &WeakUnboundedSender<Action>,
        updates: &UnboundedSender<Update>,
    ) {
        // Switching conversations disarms any pending delete confirmation.
        if self.delete_confirm.take().is_some() {
            emit(updates, Update::DeleteConfirm(None));
        }
        self.transcript.clear();
        emit(updates, Update::Transcript(Vec::new()));
        self.selected = Some(conv.clone());
        emit(updates, Update::Selected(self.selected.clone()));

        self.fetch_generation += 1;
        let generation = self.fetch_generation;
        let backend = self.backend.clone();
        let feedback = feedback.clone();
        tokio::spawn(async move {
            let result = backend.conversation_messages(&conv.id).await;
            // The controller may be gone (logout) by the time this lands.
            if let Some(tx) = feedback.upgrade() {
                let _ = tx.send(Action::HistoryLoaded { generation, result });
            }
        });
    }

    fn apply_history(
        &mut self,
        generation: u64,
        result: Result<Vec<Message>, ApiError>,
        updates: &UnboundedSender<Update>,
    ) {
        if generation != self.fetch_generation {
            return; // a newer selection superseded this fetch
        }
        match result {
            Ok(messages) => {
                self.transcript = messages.into_iter().map(TranscriptEntry::confirmed).collect();
                emit(updates, Update::Transcript(self.transcript.clone()));
            }
            // Fetch failure leaves the transcript empty, never half-loaded.
            Err(e) => diag::log(&format!("history fetch failed: {e}")),
        }
    }

    // ── Delete ────────────────────────────────────────────────────────────────

    /// Delete is not optimistic: the local list is only touched after the
    /// server confirms.
    async fn delete(&mut self, id: String, updates: &UnboundedSender<Update>) {
        self.delete_confirm = None;
        emit(updates, Update::DeleteConfirm(None));

        match self.backend.delete_conversation(&id).await {
            Ok(()) => {
                if self.selected.as_ref().is_some_and(|c| c.id == id) {
                    self.selected = None;
                    emit(updates, Update::Selected(None));
                    self.transcript.clear();
                    emit(updates, Update::Transcript(Vec::new()));
                }
                self.refresh_list(updates).await;
            }
            Err(e) => {
                diag::log(&format!("delete conversation failed: {e}"));
                emit(updates, Update::Alert(DELETE_FAILED_MSG.to_string()));
            }
        }
    }
}

// ── Controller task ───────────────────────────────────────────────────────────

/// Drain actions until every UI-held sender is dropped. `feedback` must be a
/// clone of the sender feeding `actions` so spawned fetches can re-enter the
/// queue; it is held weakly so this task still ends when the UI lets go.
pub async fn run<B: ChatBackend + Clone + Send + Sync + 'static>(
    mut ctrl: ChatController<B>,
    mut actions: tokio::sync::mpsc::UnboundedReceiver<Action>,
    feedback: UnboundedSender<Action>,
    updates: UnboundedSender<Update>,
) {
    let weak_feedback = feedback.downgrade();
    drop(feedback);
    while let Some(action) = actions.recv().await {
        ctrl.handle(action, &weak_feedback, &updates).await;
    }
}

// ── Tests ─────────────────────────────────────────────────────────────────────

#[cfg(test)]
mod tests {
    use super::*;
    use crate::decode::Role;
    use async_trait::async_trait;
    use std::sync::{Arc, Mutex};
    use tokio::sync::mpsc::{UnboundedReceiver, unbounded_channel};

    #[derive(Clone)]
    struct FakeBackend {
        calls: Arc<Mutex<Vec<String>>>,
        list_response: Arc<Mutex<Result<Vec<Conversation>, ApiError>>>,
        create_response: Arc<Mutex<Result<Conversation, ApiError>>>,
        messages_response: Arc<Mutex<Result<Vec<Message>, ApiError>>>,
        delete_response: Arc<Mutex<Result<(), ApiError>>>,
        send_response: Arc<Mutex<Result<String, ApiError>>>,
    }

    fn conv(id: &str) -> Conversation {
        Conversation { id: id.into(), title: format!("Chat {id}"), started_at: None }
    }

    impl Default for FakeBackend {
        fn default() -> Self {
            Self {
                calls: Arc::new(Mutex::new(Vec::new())),
                list_response: Arc::new(Mutex::new(Ok(Vec::new()))),
                create_response: Arc::new(Mutex::new(Ok(conv("c1")))),
                messages_response: Arc::new(Mutex::new(Ok(Vec::new()))),
                delete_response: Arc::new(Mutex::new(Ok(()))),
                send_response: Arc::new(Mutex::new(Ok("respuesta".into()))),
            }
        }
    }

    impl FakeBackend {
        fn record(&self, name: &str) {
            self.calls.lock().unwrap().push(name.to_string());
        }

        fn calls(&self) -> Vec<String> {
            self.calls.lock().unwrap().clone()
        }
    }

    #[async_trait]
    impl ChatBackend for FakeBackend {
        async fn list_conversations(&self, _user_id: &str) -> Result<Vec<Conversation>, ApiError> {
            self.record("list");
            self.list_response.lock().unwrap().clone()
        }

        async fn create_conversation(&self, _user_id: &str) -> Result<Conversation, ApiError> {
            self.record("create");
            self.create_response.lock().unwrap().clone()
        }

        async fn conversation_messages(&self, _id: &str) -> Result<Vec<Message>, ApiError> {
            self.record("messages");
            self.messages_response.lock().unwrap().clone()
        }

        async fn delete_conversation(&self, _id: &str) -> Result<(), ApiError> {
            self.record("delete");
            self.delete_response.lock().unwrap().clone()
        }

        async fn send_message(
            &self,
            _user_id: &str,
            _conversation_id: &str,
            _content: &str,
        ) -> Result<String, ApiError> {
            self.record("send");
            self.send_response.lock().unwrap().clone()
        }

        async fn submit_feedback(&self, _i: usize, _p: bool) -> Result<(), ApiError> {
            self.record("feedback");
            Ok(())
        }
    }

    struct Harness {
        ctrl: ChatController<FakeBackend>,
        backend: FakeBackend,
        feedback_tx: UnboundedSender<Action>,
        _feedback_rx: UnboundedReceiver<Action>,
        updates_tx: UnboundedSender<Update>,
        updates_rx: UnboundedReceiver<Update>,
    }

    fn harness_with(backend: FakeBackend, user_id: &str) -> Harness {
        let user = SessionProfile {
            user_id: user_id.into(),
            nombre: "Ana".into(),
            correo: "ana@example.com".into(),
        };
        let (feedback_tx, _feedback_rx) = unbounded_channel();
        let (updates_tx, updates_rx) = unbounded_channel();
        Harness {
            ctrl: ChatController::new(backend.clone(), user, false),
            backend,
            feedback_tx,
            _feedback_rx,
            updates_tx,
            updates_rx,
        }
    }

    fn harness() -> Harness {
        harness_with(FakeBackend::default(), "u-1")
    }

    impl Harness {
        async fn run(&mut self, action: Action) {
            let feedback = self.feedback_tx.downgrade();
            self.ctrl.handle(action, &feedback, &self.updates_tx).await;
        }

        fn alerts(&mut self) -> Vec<String> {
            let mut out = Vec::new();
            while let Ok(u) = self.updates_rx.try_recv() {
                if let Update::Alert(msg) = u {
                    out.push(msg);
                }
            }
            out
        }
    }

    #[tokio::test]
    async fn blank_send_is_a_noop() {
        let mut h = harness();
        h.run(Action::Send("   \n".into())).await;

        assert!(h.backend.calls().is_empty());
        assert!(h.ctrl.transcript.is_empty());
        assert!(h.ctrl.input.is_empty());
        assert!(!h.ctrl.sending);
    }

    #[tokio::test]
    async fn create_without_user_id_never_touches_network() {
        let mut h = harness_with(FakeBackend::default(), "  ");
        h.run(Action::NewConversation).await;

        assert!(h.backend.calls().is_empty());
        let alerts = h.alerts();
        assert_eq!(alerts.len(), 1);
        assert!(alerts[0].contains("identificar al usuario"));
    }

    #[tokio::test]
    async fn send_without_selection_creates_exactly_one_conversation_first() {
        let mut h = harness();
        h.run(Action::Send("me duele la cabeza".into())).await;

        let calls = h.backend.calls();
        assert_eq!(calls.iter().filter(|c| *c == "create").count(), 1);
        let create_at = calls.iter().position(|c| c == "create").unwrap();
        let send_at = calls.iter().position(|c| c == "send").unwrap();
        assert!(create_at < send_at, "create must precede send: {calls:?}");

        assert_eq!(h.ctrl.selected.as_ref().unwrap().id, "c1");
        assert_eq!(h.ctrl.transcript.len(), 2);
        assert_eq!(h.ctrl.transcript[0].message, Message::user("me duele la cabeza"));
        assert_eq!(h.ctrl.transcript[0].delivery, Delivery::Confirmed);
        assert_eq!(h.ctrl.transcript[1].message, Message::assistant("respuesta"));
        assert!(h.ctrl.input.is_empty());
    }

    #[tokio::test]
    async fn failed_implicit_create_aborts_send_and_preserves_input() {
        let backend = FakeBackend::default();
        *backend.create_response.lock().unwrap() =
            Err(ApiError::Server { status: 500, message: "sin hueco".into() });
        let mut h = harness_with(backend, "u-1");

        h.run(Action::Send("hola".into())).await;

        let calls = h.backend.calls();
        assert!(!calls.contains(&"send".to_string()), "send must not be issued: {calls:?}");
        assert!(h.ctrl.transcript.is_empty());
        assert_eq!(h.ctrl.input, "hola");
        assert!(h.alerts().iter().any(|a| a.contains("sin hueco")));
    }

    #[tokio::test]
    async fn send_failure_is_rendered_as_bot_message() {
        let backend = FakeBackend::default();
        *backend.send_response.lock().unwrap() =
            Err(ApiError::Transport("conexión rechazada".into()));
        let mut h = harness_with(backend, "u-1");
        h.ctrl.selected = Some(conv("c9"));

        h.run(Action::Send("hola".into())).await;

        assert_eq!(h.ctrl.transcript.len(), 2);
        assert_eq!(h.ctrl.transcript[0].delivery, Delivery::Failed);
        assert_eq!(h.ctrl.transcript[1].message.role, Role::Assistant);
        assert_eq!(h.ctrl.transcript[1].message.content, "Error: conexión rechazada");
        assert!(!h.ctrl.sending);
    }

    #[tokio::test]
    async fn select_clears_transcript_before_fetch_resolves() {
        let backend = FakeBackend::default();
        *backend.messages_response.lock().unwrap() =
            Ok(vec![Message::user("antes"), Message::assistant("hola")]);
        let mut h = harness_with(backend, "u-1");
        h.ctrl.transcript.push(TranscriptEntry::confirmed(Message::user("viejo")));

        h.run(Action::Select(conv("c2"))).await;

        // Cleared synchronously — the fetch completion has not been applied.
        assert!(h.ctrl.transcript.is_empty());
        assert_eq!(h.ctrl.selected.as_ref().unwrap().id, "c2");

        let generation = h.ctrl.fetch_generation;
        h.run(Action::HistoryLoaded {
            generation,
            result: Ok(vec![Message::user("antes"), Message::assistant("hola")]),
        })
        .await;
        assert_eq!(h.ctrl.transcript.len(), 2);
        assert!(h.ctrl.transcript.iter().all(|e| e.delivery == Delivery::Confirmed));
    }

    #[tokio::test]
    async fn stale_history_response_is_discarded() {
        let mut h = harness();

        h.run(Action::Select(conv("a"))).await;
        let stale = h.ctrl.fetch_generation;
        h.run(Action::Select(conv("b"))).await;

        h.run(Action::HistoryLoaded {
            generation: stale,
            result: Ok(vec![Message::user("de la conversación a")]),
        })
        .await;
        assert!(h.ctrl.transcript.is_empty(), "stale fetch must not land");

        let fresh = h.ctrl.fetch_generation;
        h.run(Action::HistoryLoaded {
            generation: fresh,
            result: Ok(vec![Message::user("de la conversación b")]),
        })
        .await;
        assert_eq!(h.ctrl.transcript[0].message.content, "de la conversación b");
    }

    #[tokio::test]
    async fn history_fetch_failure_leaves_transcript_empty() {
        let mut h = harness();
        h.run(Action::Select(conv("a"))).await;
        let generation = h.ctrl.fetch_generation;
        h.run(Action::HistoryLoaded {
            generation,
            result: Err(ApiError::Transport("timeout".into())),
        })
        .await;
        assert!(h.ctrl.transcript.is_empty());
    }

    #[tokio::test]
    async fn delete_of_active_conversation_clears_selection_and_transcript() {
        let mut h = harness();
        h.ctrl.selected = Some(conv("c1"));
        h.ctrl.transcript.push(TranscriptEntry::confirmed(Message::user("x")));

        h.run(Action::Delete("c1".into())).await;

        assert!(h.ctrl.selected.is_none());
        assert!(h.ctrl.transcript.is_empty());
        assert!(h.backend.calls().contains(&"list".to_string()));
    }

    #[tokio::test]
    async fn delete_of_other_conversation_touches_nothing() {
        let mut h = harness();
        h.ctrl.selected = Some(conv("c1"));
        h.ctrl.transcript.push(TranscriptEntry::confirmed(Message::user("x")));

        h.run(Action::Delete("c2".into())).await;

        assert_eq!(h.ctrl.selected.as_ref().unwrap().id, "c1");
        assert_eq!(h.ctrl.transcript.len(), 1);
    }

    #[tokio::test]
    async fn delete_failure_alerts_and_keeps_state() {
        let backend = FakeBackend::default();
        *backend.delete_response.lock().unwrap() =
            Err(ApiError::Server { status: 500, message: "no".into() });
        let mut h = harness_with(backend, "u-1");
        h.ctrl.selected = Some(conv("c1"));

        h.run(Action::Delete("c1".into())).await;

        assert!(h.ctrl.selected.is_some());
        assert_eq!(h.alerts(), vec![DELETE_FAILED_MSG.to_string()]);
    }

    #[tokio::test]
    async fn list_failure_keeps_previous_list() {
        let backend = FakeBackend::default();
        *backend.list_response.lock().unwrap() = Ok(vec![conv("c1")]);
        let mut h = harness_with(backend, "u-1");

        h.run(Action::RefreshList).await;
        assert_eq!(h.ctrl.conversations.len(), 1);

        *h.backend.list_response.lock().unwrap() = Err(ApiError::Transport("down".into()));
        h.run(Action::RefreshList).await;
        assert_eq!(h.ctrl.conversations.len(), 1, "failed refresh must not wipe the list");
        assert!(!h.ctrl.list_loading);
    }

    #[tokio::test]
    async fn utterances_append_space_joined() {
        let mut h = harness();
        h.run(Action::Utterance("me duele".into())).await;
        assert_eq!(h.ctrl.input, "me duele");

        h.run(Action::Utterance("la garganta".into())).await;
        assert_eq!(h.ctrl.input, "me duele la garganta");
    }

    #[tokio::test]
    async fn voice_toggle_without_capability_alerts() {
        let mut h = harness();
        h.run(Action::ToggleVoice).await;
        assert!(!h.ctrl.recording);
        assert_eq!(h.alerts().len(), 1);
    }
}
