//! Terminal styling shared by every command.

use console::Style;
use is_terminal::IsTerminal;
use owo_colors::{AnsiColors, OwoColorize};
use std::fmt::Display;
use std::sync::LazyLock;

/// Styling used by the CLI and output manager.
pub static THEME: LazyLock<Theme> = LazyLock::new(Theme::default);

/// Styles for the kinds of text docsearch prints.
#[derive(Debug, Clone)]
pub struct Theme {
    pub success: Style,
    pub error: Style,
    pub warning: Style,
    /// Section headings in `docsearch config`
    pub header: Style,
    /// File and database paths
    pub path: Style,
    /// Counts and similarity scores
    pub number: Style,
}

impl Default for Theme {
    fn default() -> Self {
        Self {
            success: Style::new().green().bright(),
            error: Style::new().red().bright(),
            warning: Style::new().yellow().bright(),
            header: Style::new().cyan().bold(),
            path: Style::new().magenta(),
            number: Style::new().cyan(),
        }
    }
}

impl Theme {
    fn with_icon(&self, icon: &str, color: AnsiColors, style: &Style, text: &str) -> String {
        if Self::should_disable_colors() {
            format!("{icon} {text}")
        } else {
            format!("{} {}", icon.color(color), style.apply_to(text))
        }
    }

    /// `✓ text`
    pub fn success_with_icon(&self, text: &str) -> String {
        self.with_icon("✓", AnsiColors::Green, &self.success, text)
    }

    /// `✗ text`
    pub fn error_with_icon(&self, text: &str) -> String {
        self.with_icon("✗", AnsiColors::Red, &self.error, text)
    }

    /// `⚠ text`
    pub fn warning_with_icon(&self, text: &str) -> String {
        self.with_icon("⚠", AnsiColors::Yellow, &self.warning, text)
    }

    pub fn heading(&self, text: &str) -> String {
        self.apply(&self.header, text)
    }

    /// True when `NO_COLOR` is set or stdout is not a terminal.
    pub fn should_disable_colors() -> bool {
        std::env::var_os("NO_COLOR").is_some() || !std::io::stdout().is_terminal()
    }

    /// Styles `text` unless colors are disabled.
    pub fn apply<T: Display>(&self, style: &Style, text: T) -> String {
        if Self::should_disable_colors() {
            text.to_string()
        } else {
            style.apply_to(text).to_string()
        }
    }
}
