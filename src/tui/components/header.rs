//! # Header Component
//!
//! Top bar with the brand, transient status, backend health and the
//! current account. Purely presentational: every field is a prop.
//!
//! ```text
//!  QA  Company Q&A · Ocean Professional | Asking...        • Healthy   Alex
//! ```

use ratatui::Frame;
use ratatui::layout::{Alignment, Rect};
use ratatui::style::{Color, Modifier, Style};
use ratatui::text::{Line, Span};
use ratatui::widgets::Paragraph;

use crate::tui::component::Component;
use crate::tui::theme::Theme;

pub struct Header<'a> {
    /// Health message; `None` until the first health check returns.
    pub health: Option<&'a str>,
    /// Current user's label; `None` shows "Account".
    pub user: Option<&'a str>,
    pub status_message: &'a str,
    pub theme: &'a Theme,
}

impl Header<'_> {
    fn left_line(&self) -> Line<'static> {
        let mut spans = vec![
            Span::styled(
                " QA ",
                Style::default()
                    .fg(Color::White)
                    .bg(self.theme.primary)
                    .add_modifier(Modifier::BOLD),
            ),
            Span::styled(" Company Q&A", Style::default().add_modifier(Modifier::BOLD)),
            Span::styled(format!(" · {}", self.theme.name), self.theme.muted()),
        ];
        if !self.status_message.is_empty() {
            spans.push(Span::raw(format!(" | {}", self.status_message)));
        }
        Line::from(spans)
    }

    fn right_line(&self) -> Line<'static> {
        let mut spans = Vec::new();
        if let Some(health) = self.health {
            spans.push(Span::styled(format!(" • {health} "), self.theme.badge()));
            spans.push(Span::raw(" "));
        }
        spans.push(Span::styled(
            format!(" {} ", self.user.unwrap_or("Account")),
            Style::default().fg(Color::White).bg(self.theme.primary),
        ));
        Line::from(spans)
    }
}

impl Component for Header<'_> {
    fn render(&mut self, frame: &mut Frame, area: Rect) {
        frame.render_widget(Paragraph::new(self.left_line()), area);
        frame.render_widget(
            Paragraph::new(self.right_line()).alignment(Alignment::Right),
            area,
        );
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use ratatui::Terminal;
    use ratatui::backend::TestBackend;

    fn rendered(mut header: Header) -> String {
        let backend = TestBackend::new(100, 1);
        let mut terminal = Terminal::new(backend).unwrap();
        terminal.draw(|f| header.render(f, f.area())).unwrap();
        terminal
            .backend()
            .buffer()
            .content()
            .iter()
            .map(|c| c.symbol())
            .collect()
    }

    #[test]
    fn test_header_shows_health_and_user() {
        let theme = Theme::default();
        let text = rendered(Header {
            health: Some("Healthy"),
            user: Some("Alex"),
            status_message: "",
            theme: &theme,
        });
        assert!(text.contains("Company Q&A"));
        assert!(text.contains("• Healthy"));
        assert!(text.contains("Alex"));
        assert!(!text.contains('|'));
    }

    #[test]
    fn test_health_badge_style() {
        let theme = Theme::default();
        let backend = TestBackend::new(60, 1);
        let mut terminal = Terminal::new(backend).unwrap();
        terminal
            .draw(|f| {
                Header {
                    health: Some("Healthy"),
                    user: None,
                    status_message: "",
                    theme: &theme,
                }
                .render(f, f.area())
            })
            .unwrap();
        let buffer = terminal.backend().buffer();
        let cell = buffer
            .content()
            .iter()
            .find(|c| c.symbol() == "H" && c.bg == theme.secondary)
            .unwrap();
        assert_eq!(cell.fg, theme.text);
    }

    #[test]
    fn test_header_defaults() {
        let theme = Theme::default();
        let text = rendered(Header {
            health: None,
            user: None,
            status_message: "Asking...",
            theme: &theme,
        });
        assert!(text.contains("Account"));
        assert!(text.contains("| Asking..."));
        assert!(!text.contains('•'));
    }
}
