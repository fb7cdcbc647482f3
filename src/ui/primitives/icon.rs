use crossterm::style::Stylize;

use sftp_deploy::Level;

use crate::ui::theme;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Icon {
    Success,
    Error,
    Warning,
    Info,
    Waiting,
    Skipped,
    Arrow,
    Deploy,
    Remote,
}

impl Icon {
    /// Icon for a log line of the given severity
    pub fn for_level(level: Level) -> Self {
        match level {
            Level::Info => Icon::Info,
            Level::Ok => Icon::Success,
            Level::Warn => Icon::Warning,
            Level::Error => Icon::Error,
        }
    }

    pub fn render(&self, supports_unicode: bool) -> &'static str {
        use theme::{icons, icons_ascii};

        let (unicode, ascii) = match self {
            Icon::Success => (icons::SUCCESS, icons_ascii::SUCCESS),
            Icon::Error => (icons::ERROR, icons_ascii::ERROR),
            Icon::Warning => (icons::WARNING, icons_ascii::WARNING),
            Icon::Info => (icons::INFO, icons_ascii::INFO),
            Icon::Waiting => (icons::WAITING, icons_ascii::WAITING),
            Icon::Skipped => (icons::SKIPPED, icons_ascii::SKIPPED),
            Icon::Arrow => (icons::ARROW, icons_ascii::ARROW),
            Icon::Deploy => (icons::DEPLOY, icons_ascii::DEPLOY),
            Icon::Remote => (icons::REMOTE, icons_ascii::REMOTE),
        };
        if supports_unicode {
            unicode
        } else {
            ascii
        }
    }

    pub fn colored(&self, supports_color: bool, supports_unicode: bool) -> String {
        let s = self.render(supports_unicode);
        if !supports_color {
            return s.to_string();
        }
        let color = match self {
            Icon::Success => theme::colors::SUCCESS,
            Icon::Error => theme::colors::ERROR,
            Icon::Warning | Icon::Waiting => theme::colors::WARNING,
            Icon::Skipped | Icon::Arrow => theme::colors::DIM,
            Icon::Info | Icon::Deploy | Icon::Remote => theme::colors::INFO,
        };
        format!("{}", s.with(color))
    }
}
