//! Rendering.
//!
//! ```text
//! ┌ Drum Lights ─────────────────────────────┐
//! │ Solid │ Chase │ Twinkle │ Special        │  tabs
//! ├──────────────────────────────────────────┤
//! │ [Off] [Auto]                             │  toolbar
//! ├──────────────────────────────────────────┤
//! │ [Green] [Gold] [Blue] ...                │  active pane
//! ├──────────────────────────────────────────┤
//! │ status / command line                    │
//! └──────────────────────────────────────────┘
//! ```
//!
//! The disconnected overlay and the confirmation prompt are drawn on top.

use drumlights_app::{App, Control};
use ratatui::{
    Frame,
    layout::{Constraint, Flex, Layout, Rect},
    style::{Color, Modifier, Style},
    text::{Line, Span},
    widgets::{Block, Borders, Clear, Paragraph, Tabs, Wrap},
};

use crate::input::InputState;

/// Question asked before sending the sentinel mode.
pub const CONFIRM_PROMPT: &str = "Activate blue strobes?";

/// Text of the disconnected overlay.
pub const OVERLAY_TEXT: &str = "Connecting to device...";

/// Draw the whole UI.
pub fn render(frame: &mut Frame<'_>, app: &App, input: &InputState) {
    let [tabs_area, toolbar_area, pane_area, status_area] = Layout::vertical([
        Constraint::Length(3),
        Constraint::Length(3),
        Constraint::Min(3),
        Constraint::Length(3),
    ])
    .areas(frame.area());

    render_tabs(frame, app, tabs_area);
    render_controls(frame, app, input, toolbar_area, pane_area);
    render_status(frame, app, input, status_area);

    if app.overlay_visible() {
        render_popup(frame, OVERLAY_TEXT, Color::Red);
    } else if app.pending_confirmation().is_some() {
        render_popup(frame, &format!("{CONFIRM_PROMPT} (y/n)"), Color::Yellow);
    }
}

fn render_tabs(frame: &mut Frame<'_>, app: &App, area: Rect) {
    let titles = app.layout().tabs().iter().map(|t| t.label.clone());
    let selected = app.highlights().active_tab().map(|t| t.index());
    let tabs = Tabs::new(titles)
        .block(Block::default().borders(Borders::ALL).title(" Drum Lights "))
        .highlight_style(Style::default().fg(Color::Black).bg(Color::Cyan))
        .select(selected);
    frame.render_widget(tabs, area);
}

fn render_controls(
    frame: &mut Frame<'_>,
    app: &App,
    input: &InputState,
    toolbar_area: Rect,
    pane_area: Rect,
) {
    let visible = app.visible_controls();
    let cursor = visible.get(input.cursor(app)).copied();
    let layout = app.layout();

    let button = |control: &Control| {
        let mut style = Style::default();
        if app.highlights().is_active(control.id) {
            style = style.fg(Color::Black).bg(Color::Green).add_modifier(Modifier::BOLD);
        }
        if Some(control.id) == cursor && input.command_line().is_none() {
            style = style.add_modifier(Modifier::UNDERLINED | Modifier::REVERSED);
        }
        [Span::styled(format!("[{}]", control.label), style), Span::raw(" ")]
    };

    let toolbar: Vec<Span<'_>> = layout.toolbar().flat_map(button).collect();
    frame.render_widget(
        Paragraph::new(Line::from(toolbar)).block(Block::default().borders(Borders::ALL)),
        toolbar_area,
    );

    let pane = match app.visible_pane() {
        Some(pane) => {
            let spans: Vec<Span<'_>> = layout.controls_in_pane(pane).flat_map(button).collect();
            Paragraph::new(Line::from(spans)).wrap(Wrap { trim: false })
        },
        None => Paragraph::new("Press Tab to choose a group of modes")
            .style(Style::default().fg(Color::DarkGray)),
    };
    frame.render_widget(pane.block(Block::default().borders(Borders::ALL)), pane_area);
}

fn render_status(frame: &mut Frame<'_>, app: &App, input: &InputState, area: Rect) {
    let line = if let Some(command) = input.command_line() {
        Line::from(vec![Span::raw(command), Span::styled("_", Style::default().fg(Color::Gray))])
    } else if let Some(notice) = input.notice() {
        Line::styled(notice, Style::default().fg(Color::Yellow))
    } else {
        let status = app.status().unwrap_or("Starting");
        let mode = app.device_mode().map_or_else(|| "-".to_string(), |m| m.to_string());
        Line::from(format!("{status} | device mode {mode} | q quit, / command"))
    };
    frame.render_widget(Paragraph::new(line).block(Block::default().borders(Borders::ALL)), area);
}

fn render_popup(frame: &mut Frame<'_>, text: &str, colour: Color) {
    let width = (text.len() as u16).saturating_add(6);
    let area = centered(frame.area(), width, 5);
    frame.render_widget(Clear, area);
    frame.render_widget(
        Paragraph::new(text)
            .centered()
            .block(Block::default().borders(Borders::ALL).border_style(Style::default().fg(colour))),
        area,
    );
}

fn centered(area: Rect, width: u16, height: u16) -> Rect {
    let [row] = Layout::vertical([Constraint::Length(height)]).flex(Flex::Center).areas(area);
    let [cell] = Layout::horizontal([Constraint::Length(width)]).flex(Flex::Center).areas(row);
    cell
}

#[cfg(test)]
mod tests {
    use drumlights_app::{AppEvent, SyncConfig};
    use drumlights_proto::{ModeId, StateNotification};
    use ratatui::{Terminal, backend::TestBackend};

    use super::*;

    fn draw(app: &App) -> String {
        let mut terminal = Terminal::new(TestBackend::new(100, 20)).unwrap();
        terminal.draw(|frame| render(frame, app, &InputState::default())).unwrap();
        terminal.backend().buffer().content().iter().map(|cell| cell.symbol()).collect()
    }

    fn online_app() -> App {
        let mut app = App::new(drumlights_app::Layout::drum_lights().unwrap(), SyncConfig::default());
        app.handle(AppEvent::ConnectionOpened);
        app
    }

    #[test]
    fn overlay_shown_until_connected() {
        let app = App::new(drumlights_app::Layout::drum_lights().unwrap(), SyncConfig::default());
        assert!(draw(&app).contains(OVERLAY_TEXT));
        assert!(!draw(&online_app()).contains(OVERLAY_TEXT));
    }

    #[test]
    fn active_tab_shows_its_pane() {
        let mut app = online_app();
        app.handle(AppEvent::StateNotified(StateNotification::new(ModeId::new(93))));

        let screen = draw(&app);
        assert!(screen.contains("[Rio Flag]"));
        assert!(!screen.contains("[Purple]"));
        assert!(screen.contains("[Off]"));
    }

    #[test]
    fn confirmation_prompt_is_drawn() {
        let mut app = online_app();
        app.handle(AppEvent::ModeRequested(ModeId::SENTINEL));
        assert!(draw(&app).contains(CONFIRM_PROMPT));
    }
}
