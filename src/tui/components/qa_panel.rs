//! # Q&A Panel
//!
//! Shows the active turn: the question, the answer (or a spinner while it
//! is pending) and the references the backend cited. Content taller than
//! the pane scrolls inside a `ScrollView`.
//!
//! With no active turn the panel shows a short prompt instead.

use ratatui::Frame;
use ratatui::layout::{Rect, Size};
use ratatui::style::{Modifier, Style};
use ratatui::text::{Line, Span, Text};
use ratatui::widgets::{Block, BorderType, Paragraph, Wrap};
use tui_scrollview::{ScrollView, ScrollViewState, ScrollbarVisibility};

use crate::core::state::Turn;
use crate::tui::component::Component;
use crate::tui::theme::Theme;

const SPINNER: [&str; 10] = ["⠋", "⠙", "⠹", "⠸", "⠼", "⠴", "⠦", "⠧", "⠇", "⠏"];

pub struct QaPanel<'a> {
    pub turn: Option<&'a Turn>,
    pub is_loading: bool,
    pub spinner_frame: usize,
    pub focused: bool,
    pub theme: &'a Theme,
    pub scroll: &'a mut ScrollViewState,
}

/// Builds the panel's text for a turn; `None` gives the empty-state prompt.
pub fn panel_text(
    turn: Option<&Turn>,
    is_loading: bool,
    spinner_frame: usize,
    theme: &Theme,
) -> Text<'static> {
    let Some(turn) = turn else {
        return Text::from(vec![
            Line::from(""),
            Line::from(Span::styled("Ask about your company data", theme.heading())),
            Line::from(""),
            Line::from(Span::styled(
                "Type a question below to get started.",
                theme.muted(),
            )),
        ])
        .centered();
    };

    let mut lines = vec![
        Line::from(Span::styled("Question", theme.heading())),
        Line::from(turn.question.clone()),
        Line::from(""),
        Line::from(Span::styled("Answer", theme.heading())),
    ];

    if turn.is_pending() {
        let label = if is_loading { "Thinking..." } else { "Waiting for answer" };
        lines.push(Line::from(Span::styled(
            format!("{} {label}", SPINNER[spinner_frame % SPINNER.len()]),
            Style::default().fg(theme.secondary),
        )));
    } else {
        let style = if turn.answer.starts_with("Error: ") {
            Style::default().fg(theme.error)
        } else {
            Style::default()
        };
        lines.extend(
            turn.answer
                .lines()
                .map(|l| Line::from(Span::styled(l.to_string(), style))),
        );
    }

    if !turn.references.is_empty() {
        lines.push(Line::from(""));
        lines.push(Line::from(Span::styled("References", theme.heading())));
        for reference in &turn.references {
            lines.push(Line::from(vec![
                Span::styled("• ", theme.muted()),
                Span::styled(
                    reference.title.clone(),
                    Style::default().add_modifier(Modifier::BOLD),
                ),
            ]));
            if let Some(text) = reference.text.as_deref().filter(|t| !t.is_empty()) {
                lines.extend(
                    text.lines()
                        .map(|l| Line::from(Span::styled(format!("  {l}"), theme.muted()))),
                );
            }
        }
    }

    Text::from(lines)
}

impl Component for QaPanel<'_> {
    fn render(&mut self, frame: &mut Frame, area: Rect) {
        let block = Block::bordered()
            .border_type(BorderType::Rounded)
            .border_style(self.theme.border(self.focused));
        let inner = block.inner(area);
        frame.render_widget(block, area);
        if inner.width < 2 || inner.height == 0 {
            return;
        }

        let text = panel_text(self.turn, self.is_loading, self.spinner_frame, self.theme);
        let paragraph = Paragraph::new(text).wrap(Wrap { trim: false });

        // One column is reserved for the scrollbar
        let content_width = inner.width - 1;
        let height = (paragraph.line_count(content_width) as u16).max(inner.height);

        let mut scroll_view = ScrollView::new(Size::new(content_width, height))
            .vertical_scrollbar_visibility(ScrollbarVisibility::Automatic)
            .horizontal_scrollbar_visibility(ScrollbarVisibility::Never);
        scroll_view.render_widget(paragraph, Rect::new(0, 0, content_width, height));
        frame.render_stateful_widget(scroll_view, inner, &mut *self.scroll);
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::core::normalize::Reference;
    use ratatui::Terminal;
    use ratatui::backend::TestBackend;

    fn plain(text: &Text) -> String {
        text.lines
            .iter()
            .map(|l| l.spans.iter().map(|s| s.content.as_ref()).collect::<String>())
            .collect::<Vec<_>>()
            .join("\n")
    }

    fn answered() -> Turn {
        Turn {
            answer: "Employees get 15 days.".to_string(),
            references: vec![
                Reference {
                    title: "HR Policy".to_string(),
                    text: Some("PTO: 15 days".to_string()),
                },
                Reference {
                    title: "Handbook".to_string(),
                    text: None,
                },
            ],
            ..Turn::pending("What is the PTO policy?".to_string())
        }
    }

    #[test]
    fn test_empty_state() {
        let text = plain(&panel_text(None, false, 0, &Theme::default()));
        assert!(text.contains("Ask about your company data"));
        assert!(text.contains("Type a question below to get started."));
    }

    #[test]
    fn test_pending_turn_shows_spinner() {
        let turn = Turn::pending("Q?".to_string());
        let text = plain(&panel_text(Some(&turn), true, 1, &Theme::default()));
        assert!(text.contains("Q?"));
        assert!(text.contains("⠙ Thinking..."));
        assert!(!text.contains("References"));
    }

    #[test]
    fn test_answered_turn_lists_references() {
        let turn = answered();
        let text = plain(&panel_text(Some(&turn), false, 0, &Theme::default()));
        assert!(text.contains("Employees get 15 days."));
        assert!(text.contains("References"));
        assert!(text.contains("• HR Policy"));
        assert!(text.contains("  PTO: 15 days"));
        assert!(text.contains("• Handbook"));
    }

    #[test]
    fn test_render_in_scroll_view() {
        let turn = answered();
        let theme = Theme::default();
        let mut scroll = ScrollViewState::default();
        let backend = TestBackend::new(60, 14);
        let mut terminal = Terminal::new(backend).unwrap();
        terminal
            .draw(|f| {
                QaPanel {
                    turn: Some(&turn),
                    is_loading: false,
                    spinner_frame: 0,
                    focused: false,
                    theme: &theme,
                    scroll: &mut scroll,
                }
                .render(f, f.area());
            })
            .unwrap();
        let text: String = terminal
            .backend()
            .buffer()
            .content()
            .iter()
            .map(|c| c.symbol())
            .collect();
        assert!(text.contains("What is the PTO policy?"));
        assert!(text.contains("Employees get 15 days."));
    }
}
