//! Keyboard-driven flows through the App, without a terminal.
//!
//! Keys go through [`InputState`] exactly as the terminal driver feeds them;
//! resulting App events are applied and device replies are simulated by
//! echoing each sent command back as a notification.

use crossterm::event::{KeyCode, KeyEvent, KeyModifiers};
use drumlights_app::{App, AppAction, AppEvent, Layout, SyncConfig};
use drumlights_proto::{ModeId, StateNotification};
use drumlights_tui::{InputState, KeyInput};

struct Session {
    app: App,
    input: InputState,
    sent: Vec<i32>,
}

impl Session {
    fn online() -> Self {
        let mut app = App::new(Layout::drum_lights().unwrap(), SyncConfig::default());
        app.handle(AppEvent::ConnectionOpened);
        Self { app, input: InputState::default(), sent: Vec::new() }
    }

    fn press(&mut self, code: KeyCode) {
        let key = KeyEvent::new(code, KeyModifiers::NONE);
        if let KeyInput::Event(event) = self.input.handle_key(key, &self.app) {
            self.apply(event);
        }
    }

    fn type_command(&mut self, text: &str) {
        self.press(KeyCode::Char('/'));
        for c in text.chars() {
            self.press(KeyCode::Char(c));
        }
        self.press(KeyCode::Enter);
    }

    fn apply(&mut self, event: AppEvent) {
        for action in self.app.handle(event) {
            if let AppAction::Send(command) = action {
                self.sent.push(command.mode.get());
                // the device echoes every accepted command
                let echo = StateNotification::new(command.mode);
                self.app.handle(AppEvent::StateNotified(echo));
            }
        }
    }

    fn active_label(&self) -> Option<&str> {
        let id = self.app.highlights().active_controls().next()?;
        self.app.layout().control(id).map(|c| c.label.as_str())
    }
}

#[test]
fn navigate_to_chase_and_pick_third_colour() {
    let mut s = Session::online();

    s.press(KeyCode::Tab);
    s.press(KeyCode::Tab);
    // cursor starts on the toolbar; Off, Auto, then the pane
    for _ in 0..4 {
        s.press(KeyCode::Right);
    }
    s.press(KeyCode::Enter);

    assert_eq!(s.sent, vec![13]);
    assert_eq!(s.active_label(), Some("Blue"));
    assert_eq!(s.app.highlights().active_tab(), s.app.layout().find_tab("Chase"));
}

#[test]
fn strobes_need_a_yes() {
    let mut s = Session::online();

    s.type_command("mode 199");
    s.press(KeyCode::Char('n'));
    assert!(s.sent.is_empty());

    s.type_command("mode 199");
    s.press(KeyCode::Char('y'));
    assert_eq!(s.sent, vec![199]);
    assert_eq!(s.active_label(), Some("999 Blue Strobes"));
}

#[test]
fn off_command_clears_everything() {
    let mut s = Session::online();

    s.type_command("mode 84");
    assert_eq!(s.active_label(), Some("Red"));

    s.type_command("off");
    assert_eq!(s.sent, vec![84, 0]);
    assert_eq!(s.active_label(), None);
    assert_eq!(s.app.highlights().active_tab(), None);
}

#[test]
fn keys_do_nothing_behind_overlay() {
    let mut s = Session::online();
    s.apply(AppEvent::ConnectionClosed);

    s.press(KeyCode::Enter);
    s.type_command("mode 3");
    assert!(s.sent.is_empty());
    assert_eq!(s.app.device_mode(), None::<ModeId>);
}
