use std::io::stdout;
use std::time::Duration;

use crossterm::cursor::SetCursorStyle;
use crossterm::event::{
    self, DisableFocusChange, EnableFocusChange, Event, KeyCode, KeyEvent, KeyModifiers,
};
use crossterm::execute;
use racecore::{CodeSnippet, Language, SnippetProvider};
use ratatui::{Frame, style::Stylize, text::ToLine, widgets::Padding};

use crate::config::Config;
use crate::page;
use crate::utils::ROUNDED_BLOCK;

/// An app message
pub enum Message {
    /// Show a specific page
    Show(page::Page),
    /// Type the current snippet again
    Retry,
    /// Switch to the next snippet of the current language
    NextSnippet,
    /// Switch to the next language that has snippets
    NextLanguage,
    /// Quit the application
    Quit,
}

/// The app itself
pub struct App {
    page: page::Page,
    config: Config,
    language: Language,
    current: Option<CodeSnippet>,
}

impl App {
    /// Creates a new `App`, opening the first snippet of `language`
    pub fn new(config: Config, language: Language) -> Self {
        let mut app = Self {
            page: page::Error::from("Loading").into(),
            config,
            language,
            current: None,
        };
        let snippet = app.config.snippets.snippet(language);
        app.open(language, snippet);
        app
    }

    /// Runs the app
    pub fn run(&mut self) -> std::io::Result<()> {
        self.config.settings.theme.detect_background();

        let mut terminal = ratatui::init();

        execute!(stdout(), SetCursorStyle::SteadyBar, EnableFocusChange)?;

        loop {
            let event = event::poll(Duration::from_millis(16))?
                .then(event::read)
                .transpose()?;
            if let Some(message) = self.handle_events(event) {
                match message {
                    Message::Show(page) => self.page = page,
                    Message::Retry => {
                        let snippet = self.current.clone();
                        self.open(self.language, snippet);
                    }
                    Message::NextSnippet => self.next_snippet(),
                    Message::NextLanguage => self.next_language(),
                    Message::Quit => break,
                }
            }
            terminal.draw(|frame| self.draw(frame))?;
        }

        execute!(stdout(), DisableFocusChange, SetCursorStyle::DefaultUserShape)?;
        ratatui::restore();

        Ok(())
    }

    /// Show `snippet` on the session page
    ///
    /// A running session page is reused, anything else is replaced by a new one.
    fn open(&mut self, language: Language, snippet: Option<CodeSnippet>) {
        self.language = language;

        let Some(snippet) = snippet else {
            tracing::warn!(%language, "No snippet available");
            self.current = None;
            self.page = page::Error::from(format!("No {language} snippet available")).into();
            return;
        };

        tracing::debug!(%language, snippet = snippet.id, "Opening snippet");
        self.current = Some(snippet.clone());

        let opened = if let page::Page::Session(session) = &mut self.page {
            session.select_snippet(snippet)
        } else {
            page::Session::new(&self.config, snippet).map(|session| self.page = session.into())
        };

        if let Err(error) = opened {
            self.page = page::Error::from(error).into();
        }
    }

    fn next_snippet(&mut self) {
        let snippet = match &self.current {
            Some(current) => self.config.snippets.next_after(self.language, current.id),
            None => self.config.snippets.snippet(self.language),
        };
        self.open(self.language, snippet);
    }

    fn next_language(&mut self) {
        let Some(language) = self.config.snippets.next_language(self.language) else {
            return;
        };
        let snippet = self.config.snippets.snippet(language);
        self.open(language, snippet);
    }

    /// Draws the next frame
    fn draw(&mut self, frame: &mut Frame) {
        let mut block = ROUNDED_BLOCK
            .padding(Padding::new(1, 1, 0, 0))
            .title_top("CODERACERS".to_line().bold().centered())
            .title_top("<CTRL-N> next language <CTRL-Q> to exit".to_line().right_aligned());

        if let Some(top_msg) = self.page.render_top(&self.config) {
            block = block.title_top(top_msg);
        }

        let area = frame.area();
        let content = block.inner(area);

        frame.render_widget(block, area);

        self.page.render(frame, content, &self.config);
    }

    /// Global event handler
    fn handle_events(&mut self, event_opt: Option<Event>) -> Option<Message> {
        event_opt
            .and_then(|event| {
                self.page.handle_events(&event, &self.config).or_else(|| {
                    match event {
                        Event::Key(key) => self.handle_key_event(key),
                        _ => None,
                    }
                })
            })
            .or_else(|| self.page.poll(&self.config))
    }

    /// Global key events
    const fn handle_key_event(&self, key: KeyEvent) -> Option<Message> {
        match (key.code, key.modifiers) {
            (KeyCode::Char('q'), KeyModifiers::CONTROL) => Some(Message::Quit),
            (KeyCode::Char('n'), KeyModifiers::CONTROL) => Some(Message::NextLanguage),
            (KeyCode::Char('r'), KeyModifiers::CONTROL) => Some(Message::NextSnippet),
            _ => None,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn app(language: Language) -> App {
        App::new(Config::for_tests(), language)
    }

    fn current_id(app: &App) -> Option<u32> {
        app.current.as_ref().map(|snippet| snippet.id)
    }

    #[test]
    fn test_opens_first_snippet() {
        let app = app(Language::Python);
        assert!(matches!(app.page, page::Page::Session(_)));
        assert_eq!(
            app.current.as_ref().map(|snippet| snippet.language),
            Some(Language::Python)
        );
    }

    #[test]
    fn test_missing_language_shows_error() {
        let mut config = Config::for_tests();
        config.snippets = crate::snippets::SnippetLibrary::default();

        let app = App::new(config, Language::Rust);
        match &app.page {
            page::Page::Error(error) => assert_eq!(error.message(), "No rust snippet available"),
            _ => panic!("expected the error page"),
        }
    }

    #[test]
    fn test_next_snippet_cycles_within_language() {
        let mut app = app(Language::Rust);
        let first = current_id(&app);

        app.next_snippet();
        assert_ne!(current_id(&app), first);
        assert_eq!(app.language, Language::Rust);

        app.next_snippet();
        assert_eq!(current_id(&app), first);
    }

    #[test]
    fn test_next_language() {
        let mut app = app(Language::Go);
        app.next_language();

        assert_ne!(app.language, Language::Go);
        assert!(matches!(app.page, page::Page::Session(_)));
        assert_eq!(
            app.current.as_ref().map(|snippet| snippet.language),
            Some(app.language)
        );
    }

    #[test]
    fn test_global_keys() {
        let app = app(Language::Go);
        let key = |character| KeyEvent::new(KeyCode::Char(character), KeyModifiers::CONTROL);

        assert!(matches!(app.handle_key_event(key('q')), Some(Message::Quit)));
        assert!(matches!(
            app.handle_key_event(key('n')),
            Some(Message::NextLanguage)
        ));
        assert!(app.handle_key_event(key('x')).is_none());
    }
}
