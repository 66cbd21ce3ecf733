use crossterm::event::{Event, KeyCode};
use racecore::{CodeSnippet, TypingResult};
use ratatui::{
    Frame,
    layout::{Constraint, Rect},
    style::Stylize,
    text::{Line, Span},
    widgets::{Padding, Paragraph},
};

use crate::{
    app::Message,
    config::Config,
    utils::{KeyEventHelper, ROUNDED_BLOCK, center, seconds},
};

/// Page: Results
///
/// Shows the score of a finished session.
#[derive(Debug, Clone)]
pub struct Results {
    result: TypingResult,
    snippet: CodeSnippet,
}

impl Results {
    pub const fn new(result: TypingResult, snippet: CodeSnippet) -> Self {
        Self { result, snippet }
    }

    fn summary(&self) -> Vec<Line<'static>> {
        let row = |label: &'static str, value: String| {
            Line::from(vec![Span::raw(format!("{label:<10}")), Span::raw(value).bold()])
        };

        vec![
            row("WPM", format!("{:.0}", self.result.wpm)),
            row("Accuracy", format!("{:.0}%", self.result.accuracy)),
            row("Time", seconds(self.result.elapsed)),
        ]
    }
}

// Rendering logic
impl Results {
    pub fn render(&self, frame: &mut Frame, area: Rect, _config: &Config) {
        let area = center(area, Constraint::Length(32), Constraint::Length(7));

        let block = ROUNDED_BLOCK
            .padding(Padding::new(2, 2, 1, 0))
            .title_top(Line::from(format!(" {} ", self.snippet.language)).centered());

        frame.render_widget(Paragraph::new(self.summary()).block(block), area);
    }

    pub fn render_top(&self, _config: &Config) -> Option<Line<'_>> {
        Some(Line::from("<ENTER> retry  <CTRL-R> next snippet"))
    }

    pub fn handle_events(&mut self, event: &Event, _config: &Config) -> Option<Message> {
        if let Event::Key(key) = event
            && key.is_press()
        {
            return match key.code {
                KeyCode::Enter | KeyCode::Esc => Some(Message::Retry),
                _ if key.is_ctrl_press_char('r') => Some(Message::NextSnippet),
                _ => None,
            };
        }

        None
    }
}
