//! Small blocking overlays: the error alert and the yes/no confirmation.
//! Both are drawn last so they sit above everything else.

use ratatui::Frame;
use ratatui::layout::{Alignment, Rect};
use ratatui::style::Style;
use ratatui::text::{Line, Span};
use ratatui::widgets::{Block, BorderType, Clear, Padding, Paragraph, Wrap};

use crate::core::state::Confirm;
use crate::tui::theme::Theme;

const DIALOG_WIDTH: u16 = 60;

/// A `width` x `height` rect centered in `outer`, clamped to fit.
pub fn centered(width: u16, height: u16, outer: Rect) -> Rect {
    let width = width.min(outer.width);
    let height = height.min(outer.height);
    Rect::new(
        outer.x + (outer.width - width) / 2,
        outer.y + (outer.height - height) / 2,
        width,
        height,
    )
}

fn render_dialog(
    frame: &mut Frame,
    area: Rect,
    title: Span<'static>,
    body: String,
    footer: &'static str,
    border: Style,
    theme: &Theme,
) {
    let inner_width = DIALOG_WIDTH.saturating_sub(4).max(1) as usize;
    let body_rows = textwrap::wrap(&body, inner_width).len().max(1) as u16;
    let overlay = centered(DIALOG_WIDTH, body_rows + 4, area);
    frame.render_widget(Clear, overlay);

    let block = Block::bordered()
        .border_type(BorderType::Rounded)
        .border_style(border)
        .title(title)
        .title_bottom(Line::from(Span::styled(footer, theme.muted())))
        .padding(Padding::new(1, 1, 1, 0));
    let paragraph = Paragraph::new(body)
        .block(block)
        .alignment(Alignment::Center)
        .wrap(Wrap { trim: true });
    frame.render_widget(paragraph, overlay);
}

pub fn render_alert(frame: &mut Frame, area: Rect, message: &str, theme: &Theme) {
    render_dialog(
        frame,
        area,
        Span::styled(" Error ", Style::default().fg(theme.error)),
        message.to_string(),
        " Press any key ",
        Style::default().fg(theme.error),
        theme,
    );
}

pub fn render_confirm(frame: &mut Frame, area: Rect, confirm: &Confirm, theme: &Theme) {
    let question = match confirm {
        Confirm::DeleteDocument { title, .. } if title.is_empty() => {
            "Delete this document?".to_string()
        }
        Confirm::DeleteDocument { title, .. } => format!("Delete \"{title}\"?"),
    };
    render_dialog(
        frame,
        area,
        Span::styled(" Confirm ", theme.heading()),
        question,
        " y Yes  n No ",
        theme.border(true),
        theme,
    );
}
