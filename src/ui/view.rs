//! Frame rendering.

use ratatui::layout::{Constraint, Layout, Margin, Rect};
use ratatui::style::{Color, Modifier, Style};
use ratatui::text::{Line, Span, Text};
use ratatui::widgets::{List, ListItem, ListState, Paragraph, Wrap};
use ratatui::Frame;

use super::list::{Filter, SelectList, FULL_HELP_HEIGHT};
use super::{MARGIN_HORIZONTAL, MARGIN_VERTICAL};
use crate::catalog::{Item, MenuItem};
use crate::session::Session;

const TITLE_STYLE: Style = Style::new()
    .fg(Color::Rgb(0xFF, 0xFD, 0xF5))
    .bg(Color::Rgb(0x25, 0xA0, 0x65));
const SELECTED_STYLE: Style = Style::new().fg(Color::Rgb(0xEE, 0x6F, 0xF8));
const DIM_STYLE: Style = Style::new().fg(Color::DarkGray);

const SHORT_HELP: &str = "↑/k up • ↓/j down • / filter • enter choose • q quit • ? more";

const FULL_HELP: [&str; FULL_HELP_HEIGHT as usize] = [
    "↑/k up • ↓/j down • ←/h/pgup prev page • →/l/pgdn next page",
    "g/home start • G/end end • / filter • esc clear filter",
    "enter choose • q quit • ctrl+c force quit • ? close help",
];

/// Text shown once the effect has been chosen.
pub fn playing_text(session: &Session) -> String {
    match session.last_error() {
        Some(err) => format!("Error: {err}\n\nPress q to quit."),
        None => format!("{}\n\nPress q to stop and quit.", session.status_text()),
    }
}

/// Draws the whole screen for the session's current state.
pub fn render(frame: &mut Frame, session: &Session) {
    let area = frame
        .area()
        .inner(Margin::new(MARGIN_HORIZONTAL, MARGIN_VERTICAL));

    if session.state().is_selecting() {
        render_list(frame, area, session.list());
    } else {
        let text = Paragraph::new(playing_text(session)).wrap(Wrap { trim: false });
        frame.render_widget(text, area);
    }
}

fn render_list(frame: &mut Frame, area: Rect, list: &SelectList<MenuItem>) {
    let [title_area, items_area, status_area, help_area] = Layout::vertical([
        Constraint::Length(2),
        Constraint::Min(0),
        Constraint::Length(1),
        Constraint::Length(list.help_height()),
    ])
    .areas(area);

    let title = Line::from(Span::styled(format!(" {} ", list.title()), TITLE_STYLE));
    frame.render_widget(Paragraph::new(title), title_area);

    if list.visible_len() == 0 {
        frame.render_widget(Paragraph::new("No items.").style(DIM_STYLE), items_area);
    } else {
        let items: Vec<ListItem> = list
            .visible_items()
            .map(|item| {
                ListItem::new(Text::from(vec![
                    Line::from(item.title().to_string()),
                    Line::styled(item.description().to_string(), DIM_STYLE),
                    Line::default(),
                ]))
            })
            .collect();
        let widget = List::new(items)
            .highlight_style(SELECTED_STYLE.add_modifier(Modifier::BOLD))
            .highlight_symbol("│ ");
        let mut state = ListState::default().with_selected(Some(list.cursor()));
        frame.render_stateful_widget(widget, items_area, &mut state);
    }

    frame.render_widget(Paragraph::new(status_line(list)), status_area);
    let help = if list.full_help() {
        Text::from_iter(FULL_HELP)
    } else {
        Text::from(SHORT_HELP)
    };
    frame.render_widget(Paragraph::new(help).style(DIM_STYLE), help_area);
}

fn status_line(list: &SelectList<MenuItem>) -> Line<'static> {
    let count = match list.visible_len() {
        1 => "1 item".to_string(),
        n => format!("{n} items"),
    };
    match list.filter() {
        Filter::Off => Line::styled(count, DIM_STYLE),
        Filter::Editing(text) => Line::from(vec![
            Span::raw("Filter: "),
            Span::styled(format!("{text}_"), SELECTED_STYLE),
        ]),
        Filter::Applied(text) => Line::styled(format!("\"{text}\" {count}"), DIM_STYLE),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::catalog::Catalog;
    use crate::controller::AudioController;
    use crate::engine::MockEngine;
    use crate::EngineError;
    use crossterm::event::{KeyCode, KeyEvent, KeyModifiers};
    use ratatui::backend::TestBackend;
    use ratatui::Terminal;

    fn rendered(session: &Session) -> String {
        let mut terminal = Terminal::new(TestBackend::new(70, 24)).unwrap();
        terminal.draw(|frame| render(frame, session)).unwrap();
        terminal
            .backend()
            .buffer()
            .content()
            .iter()
            .map(|cell| cell.symbol())
            .collect()
    }

    fn play(engine: MockEngine) -> Session {
        let controller = AudioController::new(engine);
        let mut session = Session::new(Catalog::from_devices(["Mic1"], ["Speaker1"]));
        for _ in 0..3 {
            session.confirm(&controller);
        }
        session
    }

    #[test]
    fn test_selection_screen_shows_title_and_items() {
        let session = Session::new(Catalog::from_devices(["Mic1"], ["Speaker1"]));
        let screen = rendered(&session);
        assert!(screen.contains("Select Input Device"));
        assert!(screen.contains("System Default"));
        assert!(screen.contains("Mic1"));
        assert!(screen.contains("2 items"));
    }

    #[test]
    fn test_empty_filter_result_shows_placeholder() {
        let mut session = Session::new(Catalog::from_devices(["Mic1"], ["Speaker1"]));
        for c in ['/', 'z'] {
            session.pass_through(KeyEvent::new(KeyCode::Char(c), KeyModifiers::NONE));
        }
        let screen = rendered(&session);
        assert!(screen.contains("No items."));
        assert!(screen.contains("Filter: z_"));
    }

    #[test]
    fn test_help_expands_on_question_mark() {
        let mut session = Session::new(Catalog::from_devices(["Mic1"], ["Speaker1"]));
        assert!(rendered(&session).contains("q quit • ? more"));

        session.pass_through(KeyEvent::new(KeyCode::Char('?'), KeyModifiers::NONE));
        let screen = rendered(&session);
        assert!(screen.contains("ctrl+c force quit"));
        assert!(screen.contains("esc clear filter"));
        assert!(!screen.contains("? more"));
    }

    #[test]
    fn test_playing_text() {
        let session = play(MockEngine::new(["Mic1"], ["Speaker1"]));
        assert_eq!(
            playing_text(&session),
            "Playing... Using Default -> Default with Gain\n\nPress q to stop and quit."
        );
        assert!(rendered(&session).contains("Press q to stop and quit."));
    }

    #[test]
    fn test_playing_text_after_failure() {
        let engine = MockEngine::new(["Mic1"], ["Speaker1"]).fail_stream(EngineError::device(
            "input device not found: Mic1",
        ));
        let session = play(engine);
        assert_eq!(
            playing_text(&session),
            "Error: input device not found: Mic1\n\nPress q to quit."
        );
    }
}
