/// Ratatui TUI for the MediAssist client.
///
/// Architecture:
///   main thread:      event loop — crossterm keyboard events + mpsc drains
///   controller task:  tokio::spawn — owns the ChatController, emits Updates
///   auth tasks:       one-shot login/register requests
///   voice task:       external capture command streaming utterances
///
/// Layout:
///   ┌──────────┬─────────────────────────────────────┐
///   │ sidebar  │  header bar (1 line)                │
///   │ (conver- ├─────────────────────────────────────┤
///   │ sations) │  transcript (scrollable, Min(0))    │
///   │          ├─────────────────────────────────────┤
///   │          │  status bar (1 line)                │
///   │          ├─────────────────────────────────────┤
///   │          │  input box (3 lines, fixed)         │
///   └──────────┴─────────────────────────────────────┘
pub mod auth;
pub mod chat;
pub mod render;
pub mod sidebar;

use std::io;

use anyhow::Result;
use crossterm::{
    event::{Event, EventStream, KeyCode, KeyEvent, KeyEventKind, KeyModifiers},
    execute,
    terminal::{EnterAlternateScreen, LeaveAlternateScreen, disable_raw_mode, enable_raw_mode},
};
use futures_util::StreamExt;
use ratatui::{Terminal, backend::CrosstermBackend};
use tokio::sync::mpsc::{self, UnboundedSender};

use crate::api::ApiClient;
use crate::config::ResolvedConfig;
use crate::controller::{self, Action, ChatController, TranscriptEntry, Update};
use crate::decode::{Conversation, Role};
use crate::profile::{SessionProfile, SessionStore};
use crate::voice::{CommandVoice, VoiceCapture, VoiceEvent};

// ── Suggested openers shown on the empty screen ───────────────────────────────

pub const FREQUENT_QUESTIONS: &[&str] = &[
    "¿Qué debo hacer si tengo fiebre?",
    "¿Cuáles son los síntomas de la gripe?",
    "¿Cómo puedo agendar una cita médica?",
    "¿Necesito hacer ayuno para un análisis de sangre?",
];

// ── Modes ─────────────────────────────────────────────────────────────────────

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Mode {
    /// Login/register form — no valid cached profile.
    Auth,
    Chat,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum AuthView {
    Login,
    Register,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum AuthField {
    Nombre,
    Correo,
    Password,
}

pub struct AuthForm {
    pub view: AuthView,
    pub nombre: String,
    pub correo: String,
    pub password: String,
    pub focus: AuthField,
    pub error: Option<String>,
    pub loading: bool,
}

impl AuthForm {
    fn new() -> Self {
        Self {
            view: AuthView::Login,
            nombre: String::new(),
            correo: String::new(),
            password: String::new(),
            focus: AuthField::Correo,
            error: None,
            loading: false,
        }
    }

    fn active_field(&mut self) -> &mut String {
        match self.focus {
            AuthField::Nombre => &mut self.nombre,
            AuthField::Correo => &mut self.correo,
            AuthField::Password => &mut self.password,
        }
    }

    fn next_field(&mut self) {
        self.focus = match (self.view, self.focus) {
            (AuthView::Register, AuthField::Nombre) => AuthField::Correo,
            (_, AuthField::Correo) => AuthField::Password,
            (AuthView::Register, AuthField::Password) => AuthField::Nombre,
            (AuthView::Login, _) => AuthField::Correo,
        };
    }

    fn toggle_view(&mut self) {
        self.view = match self.view {
            AuthView::Login => AuthView::Register,
            AuthView::Register => AuthView::Login,
        };
        self.focus = match self.view {
            AuthView::Login => AuthField::Correo,
            AuthView::Register => AuthField::Nombre,
        };
        self.error = None;
    }
}

// ── App state (display mirror of the controller + UI-only fields) ─────────────

pub struct AppState {
    pub profile_name: String,
    pub base_url: String,
    pub mode: Mode,
    pub auth: AuthForm,
    pub user: Option<SessionProfile>,

    // Mirrors of controller state, replaced wholesale by Update events.
    pub conversations: Vec<Conversation>,
    pub selected: Option<Conversation>,
    pub transcript: Vec<TranscriptEntry>,
    pub list_loading: bool,
    pub sending: bool,
    pub recording: bool,
    pub delete_confirm: Option<String>,

    // Input editing (byte cursor into `input`).
    pub input: String,
    pub cursor: usize,

    // UI-only state.
    pub sidebar_visible: bool,
    pub sidebar_focused: bool,
    pub sidebar_selected: usize,
    pub sidebar_filter: String,
    pub scroll: usize,
    pub spinner_tick: u32,
    pub alert: Option<String>,
    /// message_index → is_positive, for already-rated replies.
    pub feedback_given: std::collections::HashMap<usize, bool>,
    /// Ticks left to show the feedback thanks note.
    pub thanks_ticks: u8,
}

impl AppState {
    fn new(cfg: &ResolvedConfig, user: Option<SessionProfile>) -> Self {
        Self {
            profile_name: cfg.profile_name.clone(),
            base_url: cfg.base_url.clone(),
            mode: if user.is_some() { Mode::Chat } else { Mode::Auth },
            auth: AuthForm::new(),
            user,
            conversations: Vec::new(),
            selected: None,
            transcript: Vec::new(),
            list_loading: false,
            sending: false,
            recording: false,
            delete_confirm: None,
            input: String::new(),
            cursor: 0,
            sidebar_visible: true,
            sidebar_focused: false,
            sidebar_selected: 0,
            sidebar_filter: String::new(),
            scroll: 0,
            spinner_tick: 0,
            alert: None,
            feedback_given: std::collections::HashMap::new(),
            thanks_ticks: 0,
        }
    }

    /// Sidebar entries after the incremental filter.
    pub fn filtered_conversations(&self) -> Vec<&Conversation> {
        if self.sidebar_filter.is_empty() {
            self.conversations.iter().collect()
        } else {
            let q = self.sidebar_filter.to_lowercase();
            self.conversations
                .iter()
                .filter(|c| c.title.to_lowercase().contains(&q))
                .collect()
        }
    }

    pub fn is_active(&self, conv: &Conversation) -> bool {
        self.selected.as_ref().is_some_and(|s| s.id == conv.id)
    }

    /// Transcript index of the newest assistant entry, the feedback target.
    pub fn last_assistant_index(&self) -> Option<usize> {
        self.transcript
            .iter()
            .rposition(|e| e.message.role == Role::Assistant)
    }
}

// ── Events from auth tasks ────────────────────────────────────────────────────

enum TuiEvent {
    Auth(Result<SessionProfile, crate::error::ApiError>),
}

// ── Entry point ───────────────────────────────────────────────────────────────

pub async fn run(
    cfg: ResolvedConfig,
    store: SessionStore,
    initial_user: Option<SessionProfile>,
) -> Result<()> {
    enable_raw_mode()?;
    let mut stdout = io::stdout();
    execute!(stdout, EnterAlternateScreen)?;
    let backend = CrosstermBackend::new(stdout);
    let mut terminal = Terminal::new(backend)?;

    let result = event_loop(&mut terminal, cfg, store, initial_user).await;

    disable_raw_mode()?;
    execute!(terminal.backend_mut(), LeaveAlternateScreen)?;
    terminal.show_cursor()?;
    result
}

async fn event_loop(
    terminal: &mut Terminal<CrosstermBackend<io::Stdout>>,
    cfg: ResolvedConfig,
    store: SessionStore,
    initial_user: Option<SessionProfile>,
) -> Result<()> {
    let api = ApiClient::new(cfg.base_url.clone());
    let mut state = AppState::new(&cfg, initial_user);
    let mut voice = CommandVoice::new(cfg.voice_command.clone(), cfg.language.clone());

    let (updates_tx, mut updates_rx) = mpsc::unbounded_channel::<Update>();
    let (tui_tx, mut tui_rx) = mpsc::unbounded_channel::<TuiEvent>();
    let (voice_tx, mut voice_rx) = mpsc::unbounded_channel::<VoiceEvent>();

    let mut actions: Option<UnboundedSender<Action>> = None;
    if let Some(user) = state.user.clone() {
        actions = Some(spawn_controller(&api, user, voice.is_supported(), &updates_tx));
    }

    let mut events = EventStream::new();
    let mut tick = tokio::time::interval(std::time::Duration::from_millis(120));

    loop {
        terminal.draw(|f| render::draw(f, &state))?;

        tokio::select! {
            maybe_event = events.next() => {
                let Some(Ok(event)) = maybe_event else { break };
                if let Event::Key(key) = event {
                    if key.kind != KeyEventKind::Press {
                        continue;
                    }
                    match handle_key(key, &mut state, &api, &store, &mut voice, &mut actions, &tui_tx) {
                        Flow::Continue => {}
                        Flow::Quit => break,
                    }
                }
            }
            Some(update) = updates_rx.recv() => {
                apply_update(&mut state, update, &cfg, &mut voice, &voice_tx);
                while let Ok(update) = updates_rx.try_recv() {
                    apply_update(&mut state, update, &cfg, &mut voice, &voice_tx);
                }
            }
            Some(event) = tui_rx.recv() => {
                handle_tui_event(event, &mut state, &api, &store, &voice, &mut actions, &updates_tx);
            }
            Some(event) = voice_rx.recv() => {
                handle_voice_event(event, &mut state, &mut voice, &actions);
            }
            _ = tick.tick() => {
                state.spinner_tick = state.spinner_tick.wrapping_add(1);
                state.thanks_ticks = state.thanks_ticks.saturating_sub(1);
            }
        }
    }

    Ok(())
}

fn spawn_controller(
    api: &ApiClient,
    user: SessionProfile,
    voice_supported: bool,
    updates_tx: &UnboundedSender<Update>,
) -> UnboundedSender<Action> {
    let (actions_tx, actions_rx) = mpsc::unbounded_channel::<Action>();
    let ctrl = ChatController::new(api.clone(), user, voice_supported);
    tokio::spawn(controller::run(
        ctrl,
        actions_rx,
        actions_tx.clone(),
        updates_tx.clone(),
    ));
    let _ = actions_tx.send(Action::RefreshList);
    actions_tx
}

// ── Update application ────────────────────────────────────────────────────────

fn apply_update(
    state: &mut AppState,
    update: Update,
    cfg: &ResolvedConfig,
    voice: &mut CommandVoice,
    voice_tx: &UnboundedSender<VoiceEvent>,
) {
    match update {
        Update::ListLoading(on) => state.list_loading = on,
        Update::Conversations(list) => {
            state.conversations = list;
            let len = state.filtered_conversations().len();
            if state.sidebar_selected >= len {
                state.sidebar_selected = len.saturating_sub(1);
            }
        }
        Update::Selected(conv) => state.selected = conv,
        Update::Transcript(entries) => {
            state.transcript = entries;
            state.feedback_given.retain(|i, _| *i < state.transcript.len());
            state.scroll = 0; // snap to the newest message
        }
        Update::Sending(on) => state.sending = on,
        Update::DeleteConfirm(target) => state.delete_confirm = target,
        Update::InputSync(text) => {
            state.cursor = text.len();
            state.input = text;
        }
        Update::Recording(on) => {
            state.recording = on;
            if on {
                voice.start(voice_tx.clone());
            } else {
                voice.stop();
            }
        }
        Update::AssistantReply(reply) => {
            crate::voice::speak(&cfg.speak_command, &cfg.language, &reply);
        }
        Update::Alert(msg) => state.alert = Some(msg),
    }
}

fn handle_tui_event(
    event: TuiEvent,
    state: &mut AppState,
    api: &ApiClient,
    store: &SessionStore,
    voice: &CommandVoice,
    actions: &mut Option<UnboundedSender<Action>>,
    updates_tx: &UnboundedSender<Update>,
) {
    match event {
        TuiEvent::Auth(Ok(user)) => {
            if let Err(e) = store.save(&user) {
                crate::diag::log(&format!("profile save failed: {e}"));
            }
            state.auth.loading = false;
            state.auth.password.clear();
            state.user = Some(user.clone());
            state.mode = Mode::Chat;
            *actions = Some(spawn_controller(api, user, voice.is_supported(), updates_tx));
        }
        TuiEvent::Auth(Err(e)) => {
            state.auth.loading = false;
            state.auth.error = Some(e.user_message());
        }
    }
}

fn handle_voice_event(
    event: VoiceEvent,
    state: &mut AppState,
    voice: &mut CommandVoice,
    actions: &Option<UnboundedSender<Action>>,
) {
    match event {
        VoiceEvent::Utterance(text) => {
            if let Some(tx) = actions {
                let _ = tx.send(Action::Utterance(text));
            }
        }
        VoiceEvent::Error(e) => crate::diag::log(&format!("voice error: {e}")),
        VoiceEvent::Ended => {
            voice.mark_ended();
            if state.recording {
                // capture command finished on its own — flip the flag off
                if let Some(tx) = actions {
                    let _ = tx.send(Action::ToggleVoice);
                }
            }
        }
    }
}

// ── Key handling ──────────────────────────────────────────────────────────────

enum Flow {
    Continue,
    Quit,
}

fn handle_key(
    key: KeyEvent,
    state: &mut AppState,
    api: &ApiClient,
    store: &SessionStore,
    voice: &mut CommandVoice,
    actions: &mut Option<UnboundedSender<Action>>,
    tui_tx: &UnboundedSender<TuiEvent>,
) -> Flow {
    // Quit works everywhere.
    if key.modifiers.contains(KeyModifiers::CONTROL)
        && matches!(key.code, KeyCode::Char('c') | KeyCode::Char('q'))
    {
        return Flow::Quit;
    }

    // A pending alert swallows the next key.
    if state.alert.is_some() {
        state.alert = None;
        return Flow::Continue;
    }

    match state.mode {
        Mode::Auth => handle_auth_key(key, state, api, tui_tx),
        Mode::Chat => handle_chat_key(key, state, store, voice, actions),
    }
}

fn handle_auth_key(
    key: KeyEvent,
    state: &mut AppState,
    api: &ApiClient,
    tui_tx: &UnboundedSender<TuiEvent>,
) -> Flow {
    if state.auth.loading {
        return Flow::Continue;
    }
    match key.code {
        KeyCode::Tab | KeyCode::Down => state.auth.next_field(),
        KeyCode::Up | KeyCode::BackTab => {
            // two steps forward in a 2/3-field cycle is one step back
            state.auth.next_field();
            if state.auth.view == AuthView::Register {
                state.auth.next_field();
            }
        }
        KeyCode::Char('t') if key.modifiers.contains(KeyModifiers::CONTROL) => {
            state.auth.toggle_view();
        }
        KeyCode::Char(c) if !key.modifiers.contains(KeyModifiers::CONTROL) => {
            state.auth.active_field().push(c);
        }
        KeyCode::Backspace => {
            state.auth.active_field().pop();
        }
        KeyCode::Enter => submit_auth(state, api, tui_tx),
        _ => {}
    }
    Flow::Continue
}

fn submit_auth(state: &mut AppState, api: &ApiClient, tui_tx: &UnboundedSender<TuiEvent>) {
    let form = &mut state.auth;
    if form.correo.trim().is_empty() || form.password.is_empty() {
        form.error = Some("Completa correo y contraseña".to_string());
        return;
    }
    if form.view == AuthView::Register && form.nombre.trim().is_empty() {
        form.error = Some("Completa tu nombre".to_string());
        return;
    }
    form.error = None;
    form.loading = true;

    let api = api.clone();
    let tx = tui_tx.clone();
    let view = form.view;
    let nombre = form.nombre.clone();
    let correo = form.correo.clone();
    let password = form.password.clone();
    tokio::spawn(async move {
        let result = match view {
            AuthView::Login => api.login(&correo, &password).await,
            AuthView::Register => api.register(&nombre, &correo, &password).await,
        };
        let _ = tx.send(TuiEvent::Auth(result));
    });
}

fn handle_chat_key(
    key: KeyEvent,
    state: &mut AppState,
    store: &SessionStore,
    voice: &mut CommandVoice,
    actions: &mut Option<UnboundedSender<Action>>,
) -> Flow {
    let ctrl_mod = key.modifiers.contains(KeyModifiers::CONTROL);
    let alt = key.modifiers.contains(KeyModifiers::ALT);

    // Global chat-screen bindings.
    match key.code {
        KeyCode::Char('b') if ctrl_mod => {
            state.sidebar_visible = !state.sidebar_visible;
            if !state.sidebar_visible {
                state.sidebar_focused = false;
            }
            return Flow::Continue;
        }
        KeyCode::Char('n') if ctrl_mod => {
            send_action(actions, Action::NewConversation);
            return Flow::Continue;
        }
        KeyCode::Char('r') if ctrl_mod => {
            send_action(actions, Action::ToggleVoice);
            return Flow::Continue;
        }
        KeyCode::Char('l') if ctrl_mod => {
            // Logout: drop the controller, clear the cached profile.
            if state.recording {
                voice.stop();
                state.recording = false;
            }
            *actions = None;
            if let Err(e) = store.clear() {
                crate::diag::log(&format!("profile clear failed: {e}"));
            }
            logout_reset(state);
            return Flow::Continue;
        }
        KeyCode::Up if alt => {
            rate_last_reply(state, actions, true);
            return Flow::Continue;
        }
        KeyCode::Down if alt => {
            rate_last_reply(state, actions, false);
            return Flow::Continue;
        }
        KeyCode::PageUp => {
            state.scroll = state.scroll.saturating_add(5);
            return Flow::Continue;
        }
        KeyCode::PageDown => {
            state.scroll = state.scroll.saturating_sub(5);
            return Flow::Continue;
        }
        _ => {}
    }

    if state.sidebar_focused {
        handle_sidebar_key(key, state, actions);
        return Flow::Continue;
    }

    match key.code {
        KeyCode::Tab if state.sidebar_visible => {
            state.sidebar_focused = true;
            state.sidebar_filter.clear();
        }
        KeyCode::Enter => {
            send_action(actions, Action::Send(state.input.clone()));
        }
        KeyCode::Char(c) if alt && c.is_ascii_digit() => {
            // Alt+1..4 inserts a suggested opener on the empty screen.
            if state.transcript.is_empty() {
                let idx = (c as usize).wrapping_sub('1' as usize);
                if let Some(q) = FREQUENT_QUESTIONS.get(idx) {
                    state.input = q.to_string();
                    state.cursor = state.input.len();
                    send_action(actions, Action::InputChanged(state.input.clone()));
                }
            }
        }
        KeyCode::Char(c) if !ctrl_mod => {
            state.input.insert(state.cursor, c);
            state.cursor += c.len_utf8();
            send_action(actions, Action::InputChanged(state.input.clone()));
        }
        KeyCode::Backspace => {
            if state.cursor > 0 {
                let prev = prev_boundary(&state.input, state.cursor);
                state.input.replace_range(prev..state.cursor, "");
                state.cursor = prev;
                send_action(actions, Action::InputChanged(state.input.clone()));
            }
        }
        KeyCode::Delete => {
            if state.cursor < state.input.len() {
                let next = next_boundary(&state.input, state.cursor);
                state.input.replace_range(state.cursor..next, "");
                send_action(actions, Action::InputChanged(state.input.clone()));
            }
        }
        KeyCode::Left => state.cursor = prev_boundary(&state.input, state.cursor),
        KeyCode::Right => {
            if state.cursor < state.input.len() {
                state.cursor = next_boundary(&state.input, state.cursor);
            }
        }
        KeyCode::Home => state.cursor = 0,
        KeyCode::End => state.cursor = state.input.len(),
        _ => {}
    }
    Flow::Continue
}

fn handle_sidebar_key(
    key: KeyEvent,
    state: &mut AppState,
    actions: &Option<UnboundedSender<Action>>,
) {
    // An armed delete confirmation claims y/n first.
    if let Some(id) = state.delete_confirm.clone() {
        match key.code {
            KeyCode::Char('y') => {
                send_action_ref(actions, Action::Delete(id));
            }
            KeyCode::Char('n') | KeyCode::Esc => {
                send_action_ref(actions, Action::ConfirmDelete(None));
            }
            _ => {}
        }
        return;
    }

    let filtered_len = state.filtered_conversations().len();
    match key.code {
        KeyCode::Esc | KeyCode::Tab => {
            state.sidebar_focused = false;
            state.sidebar_filter.clear();
        }
        KeyCode::Up => {
            state.sidebar_selected = state.sidebar_selected.saturating_sub(1);
        }
        KeyCode::Down => {
            if state.sidebar_selected + 1 < filtered_len {
                state.sidebar_selected += 1;
            }
        }
        KeyCode::Enter => {
            let conv = state
                .filtered_conversations()
                .get(state.sidebar_selected)
                .map(|c| (*c).clone());
            if let Some(conv) = conv {
                send_action_ref(actions, Action::Select(conv));
                state.sidebar_focused = false;
                state.sidebar_filter.clear();
            }
        }
        KeyCode::Char('d') => {
            let id = state
                .filtered_conversations()
                .get(state.sidebar_selected)
                .map(|c| c.id.clone());
            if let Some(id) = id {
                send_action_ref(actions, Action::ConfirmDelete(Some(id)));
            }
        }
        KeyCode::Char(c) => {
            state.sidebar_filter.push(c);
            state.sidebar_selected = 0;
        }
        KeyCode::Backspace => {
            state.sidebar_filter.pop();
            state.sidebar_selected = 0;
        }
        _ => {}
    }
}

fn rate_last_reply(
    state: &mut AppState,
    actions: &Option<UnboundedSender<Action>>,
    positive: bool,
) {
    let Some(index) = state.last_assistant_index() else { return };
    if state.feedback_given.contains_key(&index) {
        return; // one rating per reply
    }
    state.feedback_given.insert(index, positive);
    state.thanks_ticks = 16; // ~2s at the 120ms tick
    send_action_ref(actions, Action::Feedback { message_index: index, positive });
}

/// Back to the auth screen with all per-session state discarded.
fn logout_reset(state: &mut AppState) {
    state.user = None;
    state.mode = Mode::Auth;
    state.auth = AuthForm::new();
    state.conversations.clear();
    state.selected = None;
    state.transcript.clear();
    state.input.clear();
    state.cursor = 0;
    state.delete_confirm = None;
    state.sending = false;
    state.list_loading = false;
    state.sidebar_focused = false;
    state.sidebar_filter.clear();
    state.scroll = 0;
    state.feedback_given.clear();
    state.thanks_ticks = 0;
}

fn send_action(actions: &mut Option<UnboundedSender<Action>>, action: Action) {
    if let Some(tx) = actions {
        let _ = tx.send(action);
    }
}

fn send_action_ref(actions: &Option<UnboundedSender<Action>>, action: Action) {
    if let Some(tx) = actions {
        let _ = tx.send(action);
    }
}

// ── Text cursor helpers ───────────────────────────────────────────────────────

fn prev_boundary(s: &str, at: usize) -> usize {
    if at == 0 {
        return 0;
    }
    let mut i = at - 1;
    while i > 0 && !s.is_char_boundary(i) {
        i -= 1;
    }
    i
}

fn next_boundary(s: &str, at: usize) -> usize {
    let mut i = at + 1;
    while i < s.len() && !s.is_char_boundary(i) {
        i += 1;
    }
    i.min(s.len())
}

// ── Tests ─────────────────────────────────────────────────────────────────────

#[cfg(test)]
mod tests {
    use super::*;

    fn conv(id: &str, title: &str) -> Conversation {
        Conversation { id: id.into(), title: title.into(), started_at: None }
    }

    fn state() -> AppState {
        AppState::new(
            &ResolvedConfig {
                base_url: "http://x".into(),
                voice_command: String::new(),
                speak_command: String::new(),
                language: "es-ES".into(),
                profile_name: "local".into(),
            },
            None,
        )
    }

    #[test]
    fn sidebar_filter_is_case_insensitive() {
        let mut s = state();
        s.conversations = vec![conv("1", "Dolor de cabeza"), conv("2", "Fiebre")];
        s.sidebar_filter = "fieb".into();
        let filtered = s.filtered_conversations();
        assert_eq!(filtered.len(), 1);
        assert_eq!(filtered[0].id, "2");
    }

    #[test]
    fn active_conversation_matches_by_id() {
        let mut s = state();
        s.selected = Some(conv("1", "A"));
        assert!(s.is_active(&conv("1", "otro título")));
        assert!(!s.is_active(&conv("2", "A")));
    }

    #[test]
    fn last_assistant_index_skips_user_entries() {
        let mut s = state();
        s.transcript = vec![
            TranscriptEntry::confirmed(crate::decode::Message::user("a")),
            TranscriptEntry::confirmed(crate::decode::Message::assistant("b")),
            TranscriptEntry::confirmed(crate::decode::Message::user("c")),
        ];
        assert_eq!(s.last_assistant_index(), Some(1));
    }

    #[test]
    fn cursor_boundaries_handle_multibyte() {
        let s = "¿qué?";
        let end = s.len();
        let before = prev_boundary(s, end);
        assert!(s.is_char_boundary(before));
        assert_eq!(&s[before..end], "?");
        assert_eq!(next_boundary(s, 0), "¿".len());
    }

    #[test]
    fn register_field_cycle_covers_all_fields() {
        let mut form = AuthForm::new();
        form.toggle_view(); // register
        assert_eq!(form.focus, AuthField::Nombre);
        form.next_field();
        assert_eq!(form.focus, AuthField::Correo);
        form.next_field();
        assert_eq!(form.focus, AuthField::Password);
        form.next_field();
        assert_eq!(form.focus, AuthField::Nombre);
    }
}
