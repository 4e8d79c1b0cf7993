//! # AuthForm Component
//!
//! Login and registration screen shown while nobody is signed in.
//!
//! `AuthFormState` owns the field contents (they never enter `App` until
//! submitted) and reports a submit as `Credentials` or `Registration`. The
//! mode, loading flag and error are props copied from `App::auth` each loop.

use ratatui::Frame;
use ratatui::layout::{Constraint, Layout, Rect};
use ratatui::style::{Color, Modifier, Style};
use ratatui::text::Line;
use ratatui::widgets::{Block, BorderType, Clear, Padding, Paragraph, Wrap};

use crate::backend::{Credentials, Registration};
use crate::core::state::AuthMode;
use crate::tui::component::{Component, EventHandler};
use crate::tui::components::centered_rect;
use crate::tui::components::text_field::{FieldCursor, TextField};
use crate::tui::event::TuiEvent;

const FORM_WIDTH: u16 = 52;
const FIELD_HEIGHT: u16 = 3;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum AuthField {
    Name,
    Email,
    Password,
}

impl AuthField {
    fn label(self) -> &'static str {
        match self {
            AuthField::Name => "Name",
            AuthField::Email => "Email",
            AuthField::Password => "Password",
        }
    }
}

fn fields_for(mode: AuthMode) -> &'static [AuthField] {
    match mode {
        AuthMode::Login => &[AuthField::Email, AuthField::Password],
        AuthMode::Register => &[AuthField::Name, AuthField::Email, AuthField::Password],
    }
}

/// High-level events emitted by the auth form.
#[derive(Debug, Clone, PartialEq)]
pub enum AuthFormEvent {
    SubmitLogin(Credentials),
    SubmitRegister(Registration),
    ToggleMode,
}

pub struct AuthFormState {
    pub name: String,
    pub email: String,
    pub password: String,
    name_cursor: FieldCursor,
    email_cursor: FieldCursor,
    password_cursor: FieldCursor,
    pub focused: AuthField,
    /// Prop: current flow.
    mode: AuthMode,
    /// Prop: a request is outstanding, so edits and submit are disabled.
    pub is_loading: bool,
}

impl Default for AuthFormState {
    fn default() -> Self {
        Self::new()
    }
}

impl AuthFormState {
    pub fn new() -> Self {
        Self {
            name: String::new(),
            email: String::new(),
            password: String::new(),
            name_cursor: FieldCursor::default(),
            email_cursor: FieldCursor::default(),
            password_cursor: FieldCursor::default(),
            focused: AuthField::Email,
            mode: AuthMode::Login,
            is_loading: false,
        }
    }

    /// Sync the mode prop. Switching flows moves focus to the first field.
    pub fn set_mode(&mut self, mode: AuthMode) {
        if self.mode != mode {
            self.mode = mode;
            self.focused = fields_for(mode)[0];
        }
    }

    /// Forget the password once it has been used.
    pub fn clear_password(&mut self) {
        self.password.clear();
    }

    fn move_focus(&mut self, step: isize) {
        let fields = fields_for(self.mode);
        let current = fields.iter().position(|f| *f == self.focused).unwrap_or(0);
        let next = (current as isize + step).rem_euclid(fields.len() as isize) as usize;
        self.focused = fields[next];
    }

    fn focused_buffer(&mut self) -> (&mut String, &mut FieldCursor) {
        match self.focused {
            AuthField::Name => (&mut self.name, &mut self.name_cursor),
            AuthField::Email => (&mut self.email, &mut self.email_cursor),
            AuthField::Password => (&mut self.password, &mut self.password_cursor),
        }
    }

    fn submission(&self) -> AuthFormEvent {
        match self.mode {
            AuthMode::Login => AuthFormEvent::SubmitLogin(Credentials {
                email: self.email.trim().to_string(),
                password: self.password.clone(),
            }),
            AuthMode::Register => AuthFormEvent::SubmitRegister(Registration {
                name: self.name.trim().to_string(),
                email: self.email.trim().to_string(),
                password: self.password.clone(),
            }),
        }
    }
}

impl EventHandler for AuthFormState {
    type Event = AuthFormEvent;

    fn handle_event(&mut self, event: &TuiEvent) -> Option<Self::Event> {
        if self.is_loading {
            return None;
        }
        match event {
            TuiEvent::FocusNext | TuiEvent::CursorDown => {
                self.move_focus(1);
                None
            }
            TuiEvent::FocusPrev | TuiEvent::CursorUp => {
                self.move_focus(-1);
                None
            }
            TuiEvent::Submit => Some(self.submission()),
            TuiEvent::ToggleAuthMode => Some(AuthFormEvent::ToggleMode),
            other => {
                let (buffer, cursor) = self.focused_buffer();
                cursor.edit(buffer, other);
                None
            }
        }
    }
}

/// Transient render wrapper for the auth screen.
pub struct AuthForm<'a> {
    state: &'a AuthFormState,
    error: Option<&'a str>,
}

impl<'a> AuthForm<'a> {
    pub fn new(state: &'a AuthFormState, error: Option<&'a str>) -> Self {
        Self { state, error }
    }

    fn cursor_for(&self, field: AuthField) -> &FieldCursor {
        match field {
            AuthField::Name => &self.state.name_cursor,
            AuthField::Email => &self.state.email_cursor,
            AuthField::Password => &self.state.password_cursor,
        }
    }

    fn value_for(&self, field: AuthField) -> &'a str {
        match field {
            AuthField::Name => &self.state.name,
            AuthField::Email => &self.state.email,
            AuthField::Password => &self.state.password,
        }
    }
}

impl Component for AuthForm<'_> {
    fn render(&mut self, frame: &mut Frame, area: Rect) {
        let fields = fields_for(self.state.mode);
        let (title, submit_hint, switch_hint, busy) = match self.state.mode {
            AuthMode::Login => (
                " Sign in to Courier ",
                "Enter sign in",
                "Ctrl+T create an account",
                "Signing in...",
            ),
            AuthMode::Register => (
                " Create a Courier account ",
                "Enter register",
                "Ctrl+T sign in instead",
                "Creating account...",
            ),
        };

        // borders (2) + padding (2) + fields + status line + two hint lines
        let height = 4 + fields.len() as u16 * FIELD_HEIGHT + 3;
        let form_area = centered_rect(FORM_WIDTH, height, area);
        frame.render_widget(Clear, form_area);

        let block = Block::bordered()
            .border_type(BorderType::Rounded)
            .border_style(Style::default().fg(Color::Cyan))
            .title(title)
            .padding(Padding::uniform(1));
        let inner = block.inner(form_area);
        frame.render_widget(block, form_area);

        let mut constraints: Vec<Constraint> = fields
            .iter()
            .map(|_| Constraint::Length(FIELD_HEIGHT))
            .collect();
        constraints.push(Constraint::Length(1));
        constraints.push(Constraint::Min(1));
        let rows = Layout::vertical(constraints).split(inner);

        for (i, field) in fields.iter().enumerate() {
            let focused = !self.state.is_loading && self.state.focused == *field;
            TextField::new(field.label(), self.value_for(*field), self.cursor_for(*field))
                .focused(focused)
                .masked(*field == AuthField::Password)
                .render(frame, rows[i]);
        }

        let status = if self.state.is_loading {
            Line::styled(busy, Style::default().fg(Color::Yellow))
        } else if let Some(error) = self.error {
            Line::styled(error, Style::default().fg(Color::Red))
        } else {
            Line::default()
        };
        frame.render_widget(
            Paragraph::new(status).wrap(Wrap { trim: true }),
            rows[fields.len()],
        );

        let hint = format!("{submit_hint} · Tab next field · {switch_hint} · Ctrl+C quit");
        frame.render_widget(
            Paragraph::new(hint)
                .style(Style::default().fg(Color::DarkGray).add_modifier(Modifier::DIM))
                .wrap(Wrap { trim: true }),
            rows[fields.len() + 1],
        );
    }
}
