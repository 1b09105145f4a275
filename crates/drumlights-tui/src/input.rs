//! Keyboard handling.
//!
//! [`InputState`] owns what only the terminal cares about: the control
//! cursor, the command line and its last notice. Keys that mean something to
//! the App come out as [`AppEvent`]s.

use crossterm::event::{KeyCode, KeyEvent, KeyEventKind, KeyModifiers};
use drumlights_app::{App, AppEvent};
use drumlights_proto::ModeId;

use crate::commands::{self, Command};

/// Outcome of a key press.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum KeyInput {
    /// Forward to the App.
    Event(AppEvent),
    /// Only terminal-local state changed; redraw.
    Redraw,
    /// Nothing to do.
    Ignored,
}

/// Cursor and command line state.
#[derive(Debug, Clone, Default)]
pub struct InputState {
    cursor: usize,
    command_line: Option<String>,
    notice: Option<String>,
}

impl InputState {
    /// Index into [`App::visible_controls`], clamped to what is visible.
    pub fn cursor(&self, app: &App) -> usize {
        self.cursor.min(app.visible_controls().len().saturating_sub(1))
    }

    /// Command line being edited, including the leading `/`.
    pub fn command_line(&self) -> Option<&str> {
        self.command_line.as_deref()
    }

    /// Feedback from the last command.
    pub fn notice(&self) -> Option<&str> {
        self.notice.as_deref()
    }

    /// Handle a key press.
    pub fn handle_key(&mut self, key: KeyEvent, app: &App) -> KeyInput {
        if key.kind != KeyEventKind::Press {
            return KeyInput::Ignored;
        }
        if key.modifiers.contains(KeyModifiers::CONTROL) && key.code == KeyCode::Char('c') {
            return KeyInput::Event(AppEvent::Quit);
        }
        if self.command_line.is_some() {
            return self.edit_command_line(key, app);
        }
        if app.pending_confirmation().is_some() {
            return match key.code {
                KeyCode::Char('y' | 'Y') => KeyInput::Event(AppEvent::ConfirmationResolved(true)),
                KeyCode::Char('n' | 'N') | KeyCode::Esc => {
                    KeyInput::Event(AppEvent::ConfirmationResolved(false))
                },
                _ => KeyInput::Ignored,
            };
        }

        match key.code {
            KeyCode::Char('q') => KeyInput::Event(AppEvent::Quit),
            KeyCode::Char('/') => {
                self.command_line = Some("/".to_string());
                self.notice = None;
                KeyInput::Redraw
            },
            KeyCode::Tab => {
                self.cursor = 0;
                KeyInput::Event(AppEvent::NextTab)
            },
            KeyCode::BackTab => {
                self.cursor = 0;
                KeyInput::Event(AppEvent::PrevTab)
            },
            KeyCode::Left | KeyCode::Up | KeyCode::Char('h' | 'k') => {
                self.cursor = self.cursor(app).saturating_sub(1);
                KeyInput::Redraw
            },
            KeyCode::Right | KeyCode::Down | KeyCode::Char('l' | 'j') => {
                let last = app.visible_controls().len().saturating_sub(1);
                self.cursor = (self.cursor(app) + 1).min(last);
                KeyInput::Redraw
            },
            KeyCode::Enter | KeyCode::Char(' ') => match app.visible_controls().get(self.cursor(app)) {
                Some(&id) => KeyInput::Event(AppEvent::ControlActivated(id)),
                None => KeyInput::Ignored,
            },
            _ => KeyInput::Ignored,
        }
    }

    fn edit_command_line(&mut self, key: KeyEvent, app: &App) -> KeyInput {
        let Some(line) = self.command_line.as_mut() else {
            return KeyInput::Ignored;
        };
        match key.code {
            KeyCode::Esc => {
                self.command_line = None;
                KeyInput::Redraw
            },
            KeyCode::Backspace => {
                line.pop();
                if line.is_empty() {
                    self.command_line = None;
                }
                KeyInput::Redraw
            },
            KeyCode::Char(c) => {
                line.push(c);
                KeyInput::Redraw
            },
            KeyCode::Enter => {
                let line = self.command_line.take().unwrap_or_default();
                self.run_command(&line, app)
            },
            _ => KeyInput::Ignored,
        }
    }

    fn run_command(&mut self, line: &str, app: &App) -> KeyInput {
        match commands::parse(line) {
            Command::Mode { mode } => KeyInput::Event(AppEvent::ModeRequested(ModeId::new(mode))),
            Command::Off => KeyInput::Event(AppEvent::ModeRequested(ModeId::OFF)),
            Command::Auto => KeyInput::Event(AppEvent::ModeRequested(ModeId::AUTO)),
            Command::Quit => KeyInput::Event(AppEvent::Quit),
            Command::Tab { name } => match app.layout().find_tab(&name) {
                Some(tab) => {
                    self.cursor = 0;
                    KeyInput::Event(AppEvent::TabSelected(tab))
                },
                None => {
                    self.notice = Some(format!("No tab named {name:?}"));
                    KeyInput::Redraw
                },
            },
            Command::Empty => KeyInput::Redraw,
            Command::Unknown { input } => {
                self.notice = Some(format!("Unknown command: {input}"));
                KeyInput::Redraw
            },
            Command::InvalidArgs { error, .. } => {
                self.notice = Some(error);
                KeyInput::Redraw
            },
        }
    }
}

#[cfg(test)]
mod tests {
    use drumlights_app::{Layout, SyncConfig};

    use super::*;

    fn key(code: KeyCode) -> KeyEvent {
        KeyEvent::new(code, KeyModifiers::NONE)
    }

    fn online_app() -> App {
        let mut app = App::new(Layout::drum_lights().unwrap(), SyncConfig::default());
        app.handle(AppEvent::ConnectionOpened);
        app
    }

    fn type_line(input: &mut InputState, app: &App, text: &str) -> KeyInput {
        input.handle_key(key(KeyCode::Char('/')), app);
        for c in text.chars() {
            input.handle_key(key(KeyCode::Char(c)), app);
        }
        input.handle_key(key(KeyCode::Enter), app)
    }

    #[test]
    fn enter_activates_control_under_cursor() {
        let app = online_app();
        let mut input = InputState::default();

        input.handle_key(key(KeyCode::Right), &app);
        let expected = app.visible_controls()[1];
        assert_eq!(
            input.handle_key(key(KeyCode::Enter), &app),
            KeyInput::Event(AppEvent::ControlActivated(expected))
        );
    }

    #[test]
    fn cursor_stays_in_bounds() {
        let app = online_app();
        let mut input = InputState::default();

        input.handle_key(key(KeyCode::Left), &app);
        assert_eq!(input.cursor(&app), 0);
        for _ in 0..10 {
            input.handle_key(key(KeyCode::Char('l')), &app);
        }
        assert_eq!(input.cursor(&app), app.visible_controls().len() - 1);
    }

    #[test]
    fn tab_keys_switch_tabs() {
        let app = online_app();
        let mut input = InputState::default();
        assert_eq!(input.handle_key(key(KeyCode::Tab), &app), KeyInput::Event(AppEvent::NextTab));
        assert_eq!(
            input.handle_key(key(KeyCode::BackTab), &app),
            KeyInput::Event(AppEvent::PrevTab)
        );
    }

    #[test]
    fn confirmation_keys() {
        let mut app = online_app();
        app.handle(AppEvent::ModeRequested(ModeId::SENTINEL));
        let mut input = InputState::default();

        assert_eq!(input.handle_key(key(KeyCode::Enter), &app), KeyInput::Ignored);
        assert_eq!(
            input.handle_key(key(KeyCode::Char('y')), &app),
            KeyInput::Event(AppEvent::ConfirmationResolved(true))
        );
        assert_eq!(
            input.handle_key(key(KeyCode::Esc), &app),
            KeyInput::Event(AppEvent::ConfirmationResolved(false))
        );
    }

    #[test]
    fn command_line_requests_mode() {
        let app = online_app();
        let mut input = InputState::default();

        let result = type_line(&mut input, &app, "mode 93");
        assert_eq!(result, KeyInput::Event(AppEvent::ModeRequested(ModeId::new(93))));
        assert_eq!(input.command_line(), None);
    }

    #[test]
    fn command_line_selects_tab() {
        let app = online_app();
        let mut input = InputState::default();

        let twinkle = app.layout().find_tab("Twinkle").unwrap();
        assert_eq!(
            type_line(&mut input, &app, "tab twinkle"),
            KeyInput::Event(AppEvent::TabSelected(twinkle))
        );
        assert_eq!(type_line(&mut input, &app, "tab disco"), KeyInput::Redraw);
        assert!(input.notice().unwrap().contains("disco"));
    }

    #[test]
    fn backspace_past_slash_closes_command_line() {
        let app = online_app();
        let mut input = InputState::default();

        input.handle_key(key(KeyCode::Char('/')), &app);
        assert_eq!(input.command_line(), Some("/"));
        input.handle_key(key(KeyCode::Backspace), &app);
        assert_eq!(input.command_line(), None);
    }

    #[test]
    fn ctrl_c_quits_even_in_command_line() {
        let app = online_app();
        let mut input = InputState::default();
        input.handle_key(key(KeyCode::Char('/')), &app);

        let ctrl_c = KeyEvent::new(KeyCode::Char('c'), KeyModifiers::CONTROL);
        assert_eq!(input.handle_key(ctrl_c, &app), KeyInput::Event(AppEvent::Quit));
    }
}
