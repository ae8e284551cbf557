//! Output roles and their colors
//!
//! The reporter paints progress, batch and summary lines by role; `--help`
//! reuses the same four roles. Painting is explicit per call (`enabled`), so
//! function lines and piped output stay plain without global color state.
//!
//! ```
//! use repofuncs::core::styles::StyleRole;
//! assert_eq!(StyleRole::Header.paint("[batch 1/2]", false), "[batch 1/2]");
//! assert!(StyleRole::Header.paint("[batch 1/2]", true).starts_with("\x1b[33m"));
//! ```

use clap::builder::styling::{AnsiColor, Color as ClapColor, Style, Styles};
use colored::Color;

#[derive(Copy, Clone, Debug, PartialEq, Eq)]
pub enum StyleRole {
    /// Batch start and finish lines
    Header,
    /// Failed repositories and batch processes
    Error,
    /// The closing `Done.` line
    Summary,
    /// Per-repository `[k/total] done`
    Progress,
}

impl StyleRole {
    pub fn color(self) -> Color {
        match self {
            StyleRole::Header => Color::Yellow,
            StyleRole::Error => Color::BrightRed,
            StyleRole::Summary => Color::BrightGreen,
            StyleRole::Progress => Color::BrightBlack,
        }
    }

    pub fn ansi_code(self) -> &'static str {
        match self.color() {
            Color::Yellow => "33",
            Color::BrightRed => "91",
            Color::BrightGreen => "92",
            _ => "90",
        }
    }

    pub fn paint(self, text: &str, enabled: bool) -> String {
        if enabled {
            format!("\x1b[{}m{}\x1b[0m", self.ansi_code(), text)
        } else {
            text.to_string()
        }
    }

    fn help_style(self, bold: bool) -> Style {
        let ansi = match self {
            StyleRole::Header => AnsiColor::Yellow,
            StyleRole::Error => AnsiColor::BrightRed,
            StyleRole::Summary => AnsiColor::BrightGreen,
            StyleRole::Progress => AnsiColor::BrightBlack,
        };
        let style = Style::new().fg_color(Some(ClapColor::Ansi(ansi)));
        if bold {
            style.bold()
        } else {
            style
        }
    }
}

/// Help styles built from the output roles, or plain when color is off
pub fn palette_to_clap(enabled: bool) -> Styles {
    if !enabled {
        return Styles::plain();
    }
    Styles::styled()
        .header(StyleRole::Header.help_style(true))
        .usage(StyleRole::Header.help_style(true))
        .literal(StyleRole::Summary.help_style(false))
        .placeholder(StyleRole::Progress.help_style(false))
        .valid(StyleRole::Summary.help_style(false))
        .invalid(StyleRole::Error.help_style(false))
        .error(StyleRole::Error.help_style(true))
}
