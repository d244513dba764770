use engine::Language;

use crate::ui::Theme;

/// Whether the backend accepts writes from this session.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Session {
    ReadOnly,
    Authenticated,
}

/// Process-wide presentation settings and session, built once at start-up
/// and only changed through its setters.
#[derive(Debug, Clone)]
pub struct AppContext {
    language: Language,
    dark_mode: bool,
    session: Session,
}

impl AppContext {
    pub fn new(language: Language, dark_mode: bool, session: Session) -> Self {
        Self {
            language,
            dark_mode,
            session,
        }
    }

    pub fn language(&self) -> Language {
        self.language
    }

    /// Moves to the next supported language and returns it.
    pub fn cycle_language(&mut self) -> Language {
        let idx = Language::ALL
            .iter()
            .position(|lang| *lang == self.language)
            .map_or(0, |idx| (idx + 1) % Language::ALL.len());
        self.language = Language::ALL[idx];
        self.language
    }

    pub fn dark_mode(&self) -> bool {
        self.dark_mode
    }

    pub fn set_dark_mode(&mut self, dark_mode: bool) {
        self.dark_mode = dark_mode;
    }

    pub fn theme(&self) -> Theme {
        if self.dark_mode {
            Theme::dark()
        } else {
            Theme::light()
        }
    }

    pub fn session(&self) -> Session {
        self.session
    }

    pub fn can_write(&self) -> bool {
        self.session == Session::Authenticated
    }
}
