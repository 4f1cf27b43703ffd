//! Ocean Professional color tokens.
//!
//! The theme is a plain value handed to the renderer; components take the
//! tokens they need as props.

use ratatui::style::{Color, Modifier, Style};

#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Theme {
    pub name: &'static str,
    pub primary: Color,
    pub secondary: Color,
    pub error: Color,
    /// Dark ink for text drawn on filled light or accent backgrounds.
    pub text: Color,
    pub muted: Color,
    pub border: Color,
}

impl Theme {
    pub const OCEAN_PROFESSIONAL: Theme = Theme {
        name: "Ocean Professional",
        primary: Color::Rgb(0x25, 0x63, 0xEB),
        secondary: Color::Rgb(0xF5, 0x9E, 0x0B),
        error: Color::Rgb(0xEF, 0x44, 0x44),
        text: Color::Rgb(0x11, 0x18, 0x27),
        muted: Color::Rgb(0x6B, 0x72, 0x80),
        border: Color::Rgb(0xE5, 0xE7, 0xEB),
    };

    pub fn heading(&self) -> Style {
        Style::default().fg(self.primary).add_modifier(Modifier::BOLD)
    }

    pub fn muted(&self) -> Style {
        Style::default().fg(self.muted)
    }

    /// Border style for a pane, highlighted when it has focus.
    pub fn border(&self, focused: bool) -> Style {
        if focused {
            Style::default().fg(self.primary)
        } else {
            Style::default().fg(self.border)
        }
    }

    /// Status badge on the secondary accent.
    pub fn badge(&self) -> Style {
        Style::default().fg(self.text).bg(self.secondary)
    }

    pub fn selected(&self) -> Style {
        Style::default()
            .fg(Color::White)
            .bg(self.primary)
            .add_modifier(Modifier::BOLD)
    }
}

impl Default for Theme {
    fn default() -> Self {
        Theme::OCEAN_PROFESSIONAL
    }
}
