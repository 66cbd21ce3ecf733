use std::cell::Cell;
use std::rc::Rc;

use crossterm::event::{Event, KeyCode, KeyEvent, KeyModifiers};
use racecore::{
    CodeSnippet, Key, KeyInput, Phase, SessionError, TypingResult, TypingSession,
    render::LineRenderConfig,
};
use ratatui::{
    Frame,
    layout::{Constraint, Layout, Rect},
    style::{Style, Stylize},
    text::{Line, Span},
    widgets::Paragraph,
};

use crate::{
    app::Message,
    config::Config,
    highlighter::KeywordHighlighter,
    page,
    utils::{KeyEventHelper, center, clock_face},
};

/// Countdown seconds from which the header turns to the warning color
const WARNING_SECONDS: u32 = 10;

/// Page: Session
///
/// Hosts a single typing session and hands over to the results page once it completes.
pub struct Session {
    typing: TypingSession,
    completed: Rc<Cell<Option<TypingResult>>>,
}

impl Session {
    /// Creates a new `Session` for `snippet`
    pub fn new(config: &Config, snippet: CodeSnippet) -> Result<Self, SessionError> {
        let completed = Rc::new(Cell::new(None));
        let sink = Rc::clone(&completed);

        let mut typing = TypingSession::new(snippet)?
            .with_configuration(config.settings.session_configuration())
            .with_highlighter(&KeywordHighlighter)
            .on_complete(move |result| sink.set(Some(*result)));
        typing.set_focused(true);

        Ok(Self { typing, completed })
    }

    pub const fn snippet(&self) -> &CodeSnippet {
        self.typing.snippet()
    }

    /// Switch to another snippet, keeping the session itself
    pub fn select_snippet(&mut self, snippet: CodeSnippet) -> Result<(), SessionError> {
        self.typing.select_snippet(snippet, Some(&KeywordHighlighter))?;
        self.completed.set(None);
        Ok(())
    }

    fn restart(&mut self) {
        self.typing.restart();
        self.completed.set(None);
    }
}

/// Translate a terminal key event into engine input
///
/// Control chords are shortcuts, except the ones terminals send for deleting a word.
pub fn key_input(key: &KeyEvent) -> Option<KeyInput> {
    let ctrl = key.has_mods(KeyModifiers::CONTROL);
    let meta = key.has_mods(KeyModifiers::ALT)
        || key.has_mods(KeyModifiers::META)
        || key.has_mods(KeyModifiers::SUPER);

    let input = match key.code {
        KeyCode::Char('w' | 'h') if ctrl => {
            return Some(KeyInput::new(Key::Backspace).with_ctrl());
        }
        KeyCode::Char(_) if ctrl || meta => return None,
        KeyCode::Char(character) => KeyInput::char(character),
        KeyCode::Backspace => KeyInput::new(Key::Backspace),
        KeyCode::Enter => KeyInput::new(Key::Enter),
        KeyCode::Tab => KeyInput::new(Key::Tab),
        _ => return None,
    };

    Some(match (ctrl, meta) {
        (true, _) => input.with_ctrl(),
        (false, true) => input.with_meta(),
        (false, false) => input,
    })
}

// Rendering logic
impl Session {
    pub fn render(&self, frame: &mut Frame, area: Rect, config: &Config) {
        let theme = &config.settings.theme;
        let area = center(area, Constraint::Percentage(90), Constraint::Percentage(90));
        let [text_area, footer] =
            Layout::vertical([Constraint::Fill(1), Constraint::Length(1)]).areas(area);

        let mut cursor_position: Option<(u16, u16)> = None;
        let mut current_line = 0u16;

        let lines = self.typing.render_lines(
            |line| {
                let mut current_col = 0u16;
                let rendered = line
                    .contents
                    .iter()
                    .map(|rendered| {
                        if rendered.has_cursor() {
                            cursor_position = Some((current_col, current_line));
                        }

                        let glyph = rendered.glyph.trim_end_matches('\n').to_string();
                        let span = Span::styled(glyph, theme.style_for(rendered));
                        // Wide glyphs take more than one terminal column
                        current_col = current_col
                            .saturating_add(u16::try_from(span.width()).unwrap_or(u16::MAX));
                        span
                    })
                    .collect::<Line>();

                current_line += 1;
                Some(rendered)
            },
            LineRenderConfig::new()
                .with_line_length(usize::from(text_area.width.max(1)))
                .with_newline_breaking(true),
        );

        // Keep the cursor line in the upper half of the text area
        let cursor_line = cursor_position.map_or(0, |(_, line)| line);
        let scroll = cursor_line.saturating_sub(text_area.height / 2);

        frame.render_widget(Paragraph::new(lines).scroll((scroll, 0)), text_area);

        if let Some((cursor_x, cursor_y)) = cursor_position
            && self.typing.is_focused()
        {
            let cursor_y = text_area.y + cursor_y.saturating_sub(scroll);
            frame.set_cursor_position((text_area.x + cursor_x, cursor_y));
        }

        let hint = if self.typing.is_focused() {
            Line::from("<ESC> restart  <CTRL-R> next snippet").dim()
        } else {
            Line::from("Paused, focus the terminal to keep typing").fg(theme.warning)
        };
        frame.render_widget(hint.centered(), footer);
    }

    pub fn render_top(&self, config: &Config) -> Option<Line<'_>> {
        let remaining = self.typing.remaining_seconds();
        let mut style = Style::new().bold();
        if self.typing.phase() == Phase::Running && remaining <= WARNING_SECONDS {
            style = style.fg(config.settings.theme.warning);
        }

        Some(Line::from(vec![
            Span::raw(format!("{} ", self.snippet().language)),
            Span::styled(clock_face(u64::from(remaining)), style),
            Span::raw(format!(" {:.0}%", self.typing.completion_percentage())),
        ]))
    }

    pub fn poll(&mut self, _config: &Config) -> Option<Message> {
        self.typing.poll();

        self.completed.take().map(|result| {
            Message::Show(page::Results::new(result, self.snippet().clone()).into())
        })
    }

    pub fn handle_events(&mut self, event: &Event, _config: &Config) -> Option<Message> {
        match event {
            Event::FocusGained => self.typing.set_focused(true),
            Event::FocusLost => self.typing.set_focused(false),
            Event::Key(key) if key.is_press() => {
                if key.code == KeyCode::Esc {
                    self.restart();
                } else if key.is_ctrl_press_char('r') {
                    return Some(Message::NextSnippet);
                } else if let Some(input) = key_input(key) {
                    // Terminals have no default action for Tab, so there is nothing to prevent
                    let outcome = self.typing.handle_key(input);
                    if !outcome.is_accepted() {
                        tracing::trace!(?input, "Key ignored by the session");
                    }
                }
            }
            _ => (),
        }

        None
    }
}
