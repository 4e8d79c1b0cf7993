//! # TUI Adapter
//!
//! The ratatui-specific layer. Handles terminal I/O, renders the UI,
//! and translates keyboard events into core::Action values.
//!
//! This is the only module that knows about ratatui and crossterm.
//!
//! ## Event Loop
//!
//! The loop is synchronous and owns `App`. Network work never blocks it:
//! every `Effect` returned by `update()` is executed on a tokio task, and the
//! task's result comes back as an `Action` over an mpsc channel that the loop
//! drains once per iteration.
//!
//! ```text
//! terminal ──TuiEvent──▶ route_event() ──Action──▶ update() ──Effect──▶ spawn
//!                                                     ▲                   │
//!                                                     └──────Action───────┘
//! ```
//!
//! The loop only redraws when an event or an action arrived.

mod component;
mod components;
mod event;
mod ui;

use log::{debug, info, warn};
use std::io::stdout;
use std::sync::{Arc, mpsc};
use std::time::Duration;

use crossterm::cursor::{Hide, SetCursorStyle, Show};
use crossterm::event::{
    DisableBracketedPaste, DisableMouseCapture, EnableBracketedPaste, EnableMouseCapture,
    KeyboardEnhancementFlags, PopKeyboardEnhancementFlags, PushKeyboardEnhancementFlags,
};
use crossterm::execute;

use crate::backend::{Backend, HttpBackend};
use crate::core::action::{Action, Effect, update};
use crate::core::config::ResolvedConfig;
use crate::core::effect::execute;
use crate::core::session::SessionHolder;
use crate::core::state::{App, Tab};
use crate::core::storage::{FileStore, KeyValueStore, MemoryStore};
use crate::tui::component::EventHandler;
use crate::tui::components::{
    AuthFormEvent, AuthFormState, ChatListEvent, ChatListState, ChatWindowEvent, ChatWindowState,
    NewChatEvent, NewChatPromptState,
};
use crate::tui::event::{TuiEvent, poll_event_immediate, poll_event_timeout};

/// How long the loop sleeps waiting for input before checking the channel.
const IDLE_POLL: Duration = Duration::from_millis(100);

/// Which part of the Chats destination receives keystrokes.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Focus {
    Search,
    ChatList,
    Composer,
}

/// TUI-specific presentation state (not part of core business logic)
pub struct TuiState {
    // Persistent component states
    pub auth_form: AuthFormState,
    pub chat_list: ChatListState,
    pub chat_window: ChatWindowState,
    pub focus: Focus,
    // New chat overlay (None = hidden)
    pub new_chat: Option<NewChatPromptState>,
    /// Conversation that was open at the last sync, to notice switches.
    last_open_chat: Option<i64>,
}

impl Default for TuiState {
    fn default() -> Self {
        Self::new()
    }
}

impl TuiState {
    pub fn new() -> Self {
        Self {
            auth_form: AuthFormState::new(),
            chat_list: ChatListState::new(),
            chat_window: ChatWindowState::new(),
            focus: Focus::ChatList,
            new_chat: None,
            last_open_chat: None,
        }
    }

    /// Copy props from `App` into component state after every state change.
    pub fn sync(&mut self, app: &App) {
        self.auth_form.set_mode(app.auth.mode);
        self.auth_form.is_loading = app.auth.is_loading;
        if app.session.is_authenticated() {
            self.auth_form.clear_password();
        } else {
            self.new_chat = None;
        }

        let visible = app.visible_chats();
        self.chat_list.set_visible_len(visible.len());

        if app.selected_chat_id != self.last_open_chat {
            self.last_open_chat = app.selected_chat_id;
            self.chat_window.reset_scroll();
            if let Some(index) = visible.iter().position(|c| Some(c.id) == app.selected_chat_id) {
                self.chat_list.highlight(index);
            }
        }

        if self.focus == Focus::Composer && app.selected_chat_id.is_none() {
            self.focus = Focus::ChatList;
        }
    }

    fn cycle_focus(&mut self, app: &App, forward: bool) {
        let order: &[Focus] = if app.selected_chat_id.is_some() {
            &[Focus::Search, Focus::ChatList, Focus::Composer]
        } else {
            &[Focus::Search, Focus::ChatList]
        };
        let current = order.iter().position(|f| *f == self.focus).unwrap_or(0);
        let next = if forward {
            (current + 1) % order.len()
        } else {
            (current + order.len() - 1) % order.len()
        };
        self.focus = order[next];
    }
}

struct TerminalModeGuard;

impl TerminalModeGuard {
    fn new() -> std::io::Result<Self> {
        // Disambiguation lets Alt+digit and Esc arrive as distinct keys; terminals
        // without the protocol ignore the request
        execute!(
            stdout(),
            EnableMouseCapture,
            EnableBracketedPaste,
            Show,
            SetCursorStyle::SteadyBlock,
            PushKeyboardEnhancementFlags(
                KeyboardEnhancementFlags::DISAMBIGUATE_ESCAPE_CODES
                    | KeyboardEnhancementFlags::REPORT_EVENT_TYPES
            )
        )?;
        info!("Terminal modes enabled (mouse, bracketed paste, keyboard enhancement)");
        Ok(Self)
    }
}

impl Drop for TerminalModeGuard {
    fn drop(&mut self) {
        let _ = execute!(
            stdout(),
            PopKeyboardEnhancementFlags,
            DisableMouseCapture,
            DisableBracketedPaste,
            Hide
        );
    }
}

/// Build the session store: on disk under the state dir, or in memory.
fn build_store(config: &ResolvedConfig) -> std::io::Result<Arc<dyn KeyValueStore>> {
    if config.persist_session {
        Ok(Arc::new(FileStore::open(config.store_dir())?))
    } else {
        info!("Session persistence disabled");
        Ok(Arc::new(MemoryStore::new()))
    }
}

pub fn run(config: ResolvedConfig) -> std::io::Result<()> {
    let store = build_store(&config)?;
    let backend: Arc<dyn Backend> = Arc::new(HttpBackend::new(
        config.auth_url.clone(),
        config.chats_url.clone(),
    ));
    let mut app = App::new(SessionHolder::restore(store));
    let mut tui = TuiState::new();
    tui.sync(&app);

    let mut terminal = ratatui::init();
    let _terminal_mode_guard = TerminalModeGuard::new();

    // Channel for actions from background tasks
    let (tx, rx) = mpsc::channel();

    // A restored session loads its chats right away
    spawn_effect(&backend, app.startup_effect(), &tx);

    let mut needs_redraw = true; // Force first frame

    loop {
        if needs_redraw {
            terminal.draw(|f| ui::draw_ui(f, &app, &mut tui))?;
            needs_redraw = false;
        }

        let first_event = poll_event_timeout(IDLE_POLL);

        // Process first event + drain ALL pending events before next draw
        let mut should_quit = false;
        if first_event.is_some() {
            needs_redraw = true;
        }
        for event in first_event
            .into_iter()
            .chain(std::iter::from_fn(poll_event_immediate))
        {
            for effect in route_event(&mut app, &mut tui, event) {
                if effect == Effect::Quit {
                    should_quit = true;
                } else {
                    spawn_effect(&backend, effect, &tx);
                }
            }
        }

        if should_quit {
            break;
        }

        // Handle results of background requests
        while let Ok(action) = rx.try_recv() {
            needs_redraw = true;
            debug!("Event loop received: {}", action_name(&action));
            let effect = dispatch(&mut app, &mut tui, action);
            spawn_effect(&backend, effect, &tx);
        }
    }

    info!("Courier shutting down");
    ratatui::restore();
    Ok(())
}

/// Apply an action and resync presentation state.
fn dispatch(app: &mut App, tui: &mut TuiState, action: Action) -> Effect {
    let effect = update(app, action);
    tui.sync(app);
    effect
}

/// Route one terminal event to the component that owns it. Returns the
/// effects of every action it produced.
fn route_event(app: &mut App, tui: &mut TuiState, event: TuiEvent) -> Vec<Effect> {
    let mut effects = Vec::new();

    // Resize just needs a redraw
    if event == TuiEvent::Resize {
        return effects;
    }

    // ForceQuit (Ctrl+C) always quits regardless of screen
    if event == TuiEvent::ForceQuit {
        effects.push(dispatch(app, tui, Action::Quit));
        return effects;
    }

    // Signed out: everything goes to the auth form
    if !app.session.is_authenticated() {
        match tui.auth_form.handle_event(&event) {
            Some(AuthFormEvent::SubmitLogin(credentials)) => {
                effects.push(dispatch(app, tui, Action::SubmitLogin(credentials)))
            }
            Some(AuthFormEvent::SubmitRegister(registration)) => {
                effects.push(dispatch(app, tui, Action::SubmitRegister(registration)))
            }
            Some(AuthFormEvent::ToggleMode) => {
                effects.push(dispatch(app, tui, Action::ToggleAuthMode))
            }
            None => {}
        }
        return effects;
    }

    // When the new chat prompt is open, route all events to it
    if let Some(prompt) = tui.new_chat.as_mut() {
        match prompt.handle_event(&event) {
            Some(NewChatEvent::Create(other_user_id)) => {
                tui.new_chat = None;
                effects.push(dispatch(app, tui, Action::CreateChat { other_user_id }));
            }
            Some(NewChatEvent::Dismiss) => tui.new_chat = None,
            None => {}
        }
        return effects;
    }

    // Global shortcuts
    match event {
        TuiEvent::Refresh => {
            effects.push(dispatch(app, tui, Action::RefreshChats));
            return effects;
        }
        TuiEvent::NewChat => {
            tui.new_chat = Some(NewChatPromptState::new());
            return effects;
        }
        TuiEvent::Logout => {
            effects.push(dispatch(app, tui, Action::Logout));
            return effects;
        }
        TuiEvent::SelectTab(index) => {
            if let Some(tab) = Tab::from_index(index) {
                effects.push(dispatch(app, tui, Action::SelectTab(tab)));
            }
            return effects;
        }
        _ => {}
    }

    if app.active_tab != Tab::Chats {
        return effects;
    }

    match event {
        TuiEvent::FocusNext => {
            tui.cycle_focus(app, true);
            return effects;
        }
        TuiEvent::FocusPrev => {
            tui.cycle_focus(app, false);
            return effects;
        }
        // Scrolling always moves the history, whichever pane has focus
        TuiEvent::ScrollUp
        | TuiEvent::ScrollDown
        | TuiEvent::ScrollPageUp
        | TuiEvent::ScrollPageDown => {
            tui.chat_window.handle_event(&event);
            return effects;
        }
        _ => {}
    }

    match tui.focus {
        Focus::Search => match event {
            TuiEvent::Escape | TuiEvent::CursorDown | TuiEvent::Submit => {
                tui.focus = Focus::ChatList;
            }
            other => {
                tui.chat_list.edit_search(&mut app.search, &other);
                tui.sync(app);
            }
        },
        Focus::ChatList => match event {
            // Typing jumps into the search field
            TuiEvent::InputChar(_) | TuiEvent::Paste(_) | TuiEvent::Backspace => {
                tui.focus = Focus::Search;
                tui.chat_list.search_cursor.move_to_end(&app.search);
                tui.chat_list.edit_search(&mut app.search, &event);
                tui.sync(app);
            }
            other => {
                if let Some(ChatListEvent::Open(index)) = tui.chat_list.handle_event(&other) {
                    let chat_id = app.visible_chats().get(index).map(|c| c.id);
                    if let Some(chat_id) = chat_id {
                        effects.push(dispatch(app, tui, Action::SelectChat(chat_id)));
                        tui.focus = Focus::Composer;
                    }
                }
            }
        },
        Focus::Composer => match event {
            TuiEvent::Escape => tui.focus = Focus::ChatList,
            TuiEvent::End => {
                tui.chat_window.stick_to_bottom = true;
                tui.chat_window.edit_draft(&mut app.draft, &event);
            }
            other => {
                if let Some(ChatWindowEvent::Send) = tui.chat_window.handle_event(&other) {
                    effects.push(dispatch(app, tui, Action::SendDraft));
                    tui.chat_window.stick_to_bottom = true;
                } else if !app.is_sending {
                    tui.chat_window.edit_draft(&mut app.draft, &other);
                }
            }
        },
    }

    effects
}

/// Spawn a background task per effect; results come back over `tx`.
fn spawn_effect(backend: &Arc<dyn Backend>, effect: Effect, tx: &mpsc::Sender<Action>) {
    for effect in effect.into_parts() {
        if effect == Effect::Quit {
            continue;
        }
        info!("Spawning effect: {}", effect_name(&effect));
        let backend = Arc::clone(backend);
        let tx = tx.clone();
        tokio::spawn(async move {
            if let Some(action) = execute(backend.as_ref(), effect).await {
                if tx.send(action).is_err() {
                    warn!("Failed to deliver effect result: receiver dropped");
                }
            }
        });
    }
}

// Names for logging. Credentials and tokens stay out of the log file.

fn effect_name(effect: &Effect) -> &'static str {
    match effect {
        Effect::None => "none",
        Effect::Quit => "quit",
        Effect::Login(_) => "login",
        Effect::Register(_) => "register",
        Effect::FetchChats(_) => "fetch_chats",
        Effect::FetchMessages { .. } => "fetch_messages",
        Effect::SendMessage { .. } => "send_message",
        Effect::CreateChat { .. } => "create_chat",
        Effect::Batch(_) => "batch",
    }
}

fn action_name(action: &Action) -> &'static str {
    match action {
        Action::SubmitLogin(_) => "SubmitLogin",
        Action::SubmitRegister(_) => "SubmitRegister",
        Action::ToggleAuthMode => "ToggleAuthMode",
        Action::AuthSucceeded(_) => "AuthSucceeded",
        Action::AuthFailed(_) => "AuthFailed",
        Action::Logout => "Logout",
        Action::RefreshChats => "RefreshChats",
        Action::ChatsLoaded { .. } => "ChatsLoaded",
        Action::ChatsFailed { .. } => "ChatsFailed",
        Action::SelectChat(_) => "SelectChat",
        Action::MessagesLoaded { .. } => "MessagesLoaded",
        Action::MessagesFailed { .. } => "MessagesFailed",
        Action::SendDraft => "SendDraft",
        Action::MessageSent { .. } => "MessageSent",
        Action::SendFailed { .. } => "SendFailed",
        Action::CreateChat { .. } => "CreateChat",
        Action::ChatCreated { .. } => "ChatCreated",
        Action::CreateChatFailed(_) => "CreateChatFailed",
        Action::SelectTab(_) => "SelectTab",
        Action::Quit => "Quit",
    }
}
