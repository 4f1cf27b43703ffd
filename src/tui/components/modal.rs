//! # Form Modal
//!
//! Centered overlay used for the upload, account and add-chunk dialogs.
//! Opened by Ctrl+U, Ctrl+K and `a` in the documents tab; Esc cancels.
//!
//! `FormState` lives in `TuiState` while the app has a modal open and is
//! rebuilt whenever the modal kind changes. Field edits stay local until
//! the form is submitted, at which point the caller turns the values into
//! a draft action.

use ratatui::Frame;
use ratatui::layout::{Constraint, Layout, Rect};
use ratatui::text::{Line, Span};
use ratatui::widgets::{Block, BorderType, Clear, Padding, Paragraph};

use crate::api::User;
use crate::core::action::{DocumentDraft, UserDraft};
use crate::core::state::ModalKind;
use crate::tui::component::EventHandler;
use crate::tui::components::dialog::centered;
use crate::tui::event::TuiEvent;
use crate::tui::theme::Theme;

/// Visible rows for a multiline field.
const MULTILINE_ROWS: u16 = 6;
const FORM_WIDTH: u16 = 72;

#[derive(Debug, Clone, PartialEq)]
pub enum FormEvent {
    Submit,
    Cancel,
}

#[derive(Debug, Clone, PartialEq)]
pub struct FormField {
    pub label: &'static str,
    pub placeholder: &'static str,
    pub value: String,
    pub multiline: bool,
}

impl FormField {
    fn single(label: &'static str, placeholder: &'static str, value: String) -> Self {
        Self {
            label,
            placeholder,
            value,
            multiline: false,
        }
    }

    fn multiline(label: &'static str, placeholder: &'static str) -> Self {
        Self {
            label,
            placeholder,
            value: String::new(),
            multiline: true,
        }
    }

    fn rows(&self) -> u16 {
        if self.multiline { MULTILINE_ROWS } else { 1 }
    }
}

#[derive(Debug, Clone, PartialEq)]
pub struct FormState {
    pub kind: ModalKind,
    pub fields: Vec<FormField>,
    pub focused: usize,
}

impl FormState {
    /// Build the empty form for a modal. The account form starts with the
    /// current user's values so submitting unchanged is an update.
    pub fn for_modal(kind: ModalKind, current_user: Option<&User>) -> Self {
        let fields = match &kind {
            ModalKind::Upload => vec![
                FormField::single("Title", "Document title", String::new()),
                FormField::single("Description", "Optional description", String::new()),
                FormField::multiline("Content", "Paste the document text"),
            ],
            ModalKind::Account => vec![
                FormField::single(
                    "Email",
                    "you@company.com",
                    current_user.map(|u| u.email.clone()).unwrap_or_default(),
                ),
                FormField::single(
                    "Display name",
                    "Optional",
                    current_user
                        .and_then(|u| u.display_name.clone())
                        .unwrap_or_default(),
                ),
            ],
            ModalKind::AddChunk { .. } => {
                vec![FormField::multiline("Text", "Chunk text to append")]
            }
        };
        Self {
            kind,
            fields,
            focused: 0,
        }
    }

    fn title(&self) -> String {
        match &self.kind {
            ModalKind::Upload => " Upload Document ".to_string(),
            ModalKind::Account => " Account ".to_string(),
            ModalKind::AddChunk { title, .. } => format!(" Add Chunk · {title} "),
        }
    }

    fn submit_label(&self) -> &'static str {
        match self.kind {
            ModalKind::Upload => "Create",
            ModalKind::Account => "Save",
            ModalKind::AddChunk { .. } => "Add",
        }
    }

    fn value(&self, idx: usize) -> String {
        self.fields
            .get(idx)
            .map(|f| f.value.clone())
            .unwrap_or_default()
    }

    pub fn document_draft(&self) -> DocumentDraft {
        DocumentDraft {
            title: self.value(0),
            description: self.value(1),
            content: self.value(2),
        }
    }

    pub fn user_draft(&self) -> UserDraft {
        UserDraft {
            email: self.value(0),
            display_name: self.value(1),
        }
    }

    pub fn chunk_text(&self) -> String {
        self.value(0)
    }

    fn focused_field(&mut self) -> Option<&mut FormField> {
        self.fields.get_mut(self.focused)
    }

    fn next_field(&mut self) {
        self.focused = (self.focused + 1) % self.fields.len().max(1);
    }

    fn prev_field(&mut self) {
        let len = self.fields.len().max(1);
        self.focused = (self.focused + len - 1) % len;
    }

    fn height(&self) -> u16 {
        // Label row + field rows + spacer, plus borders and padding
        self.fields.iter().map(|f| f.rows() + 2).sum::<u16>() + 4
    }

    pub fn render(&self, frame: &mut Frame, area: Rect, theme: &Theme) {
        let overlay = centered(FORM_WIDTH, self.height(), area);
        frame.render_widget(Clear, overlay);

        let footer = format!(
            " Tab Next  Ctrl+S {}  Esc Cancel ",
            self.submit_label()
        );
        let block = Block::bordered()
            .border_type(BorderType::Rounded)
            .border_style(theme.border(true))
            .title(Span::styled(self.title(), theme.heading()))
            .title_bottom(Line::from(Span::styled(footer, theme.muted())))
            .padding(Padding::horizontal(1));
        let inner = block.inner(overlay);
        frame.render_widget(block, overlay);

        let constraints: Vec<Constraint> = self
            .fields
            .iter()
            .flat_map(|f| {
                [
                    Constraint::Length(1),
                    Constraint::Length(f.rows()),
                    Constraint::Length(1),
                ]
            })
            .collect();
        let rows = Layout::vertical(constraints).split(inner);

        for (idx, field) in self.fields.iter().enumerate() {
            let focused = idx == self.focused;
            let label_style = if focused { theme.heading() } else { theme.muted() };
            frame.render_widget(
                Paragraph::new(Span::styled(field.label, label_style)),
                rows[idx * 3],
            );
            self.render_field(frame, rows[idx * 3 + 1], field, focused, theme);
        }
    }

    fn render_field(
        &self,
        frame: &mut Frame,
        area: Rect,
        field: &FormField,
        focused: bool,
        theme: &Theme,
    ) {
        if area.height == 0 {
            return;
        }
        let marker = if focused { "▸ " } else { "  " };
        let width = area.width.saturating_sub(2) as usize;

        if field.value.is_empty() {
            let line = Line::from(vec![
                Span::styled(marker, theme.heading()),
                Span::styled(field.placeholder, theme.muted()),
            ]);
            frame.render_widget(Paragraph::new(line), area);
            if focused {
                frame.set_cursor_position((area.x + 2, area.y));
            }
            return;
        }

        let mut lines: Vec<String> = if field.multiline && width > 0 {
            field
                .value
                .split('\n')
                .flat_map(|line| {
                    if line.is_empty() {
                        vec![String::new()]
                    } else {
                        textwrap::wrap(line, width)
                            .into_iter()
                            .map(|l| l.into_owned())
                            .collect()
                    }
                })
                .collect()
        } else {
            vec![field.value.clone()]
        };

        // Keep the tail in view; the cursor sits at the end of the value
        let rows = area.height as usize;
        if lines.len() > rows {
            lines.drain(..lines.len() - rows);
        }
        let last = lines.len().saturating_sub(1);
        if !field.multiline {
            lines[last] = tail_fit(&lines[last], width.saturating_sub(1));
        }

        let text: Vec<Line> = lines
            .iter()
            .enumerate()
            .map(|(i, l)| {
                let prefix = if i == 0 { marker } else { "  " };
                Line::from(vec![Span::styled(prefix, theme.heading()), Span::raw(l.clone())])
            })
            .collect();
        frame.render_widget(Paragraph::new(text), area);

        if focused {
            let col = unicode_width::UnicodeWidthStr::width(lines[last].as_str()) as u16;
            let x = (area.x + 2 + col).min(area.right().saturating_sub(1));
            frame.set_cursor_position((x, area.y + last as u16));
        }
    }
}

/// The longest suffix of `text` that fits in `width` columns.
fn tail_fit(text: &str, width: usize) -> String {
    use unicode_width::UnicodeWidthChar;
    let mut used = 0;
    let mut start = text.len();
    for (i, c) in text.char_indices().rev() {
        let w = c.width().unwrap_or(0);
        if used + w > width {
            break;
        }
        used += w;
        start = i;
    }
    text[start..].to_string()
}

impl EventHandler for FormState {
    type Event = FormEvent;

    fn handle_event(&mut self, event: &TuiEvent) -> Option<FormEvent> {
        match event {
            TuiEvent::Escape => Some(FormEvent::Cancel),
            TuiEvent::Save => Some(FormEvent::Submit),
            TuiEvent::Tab | TuiEvent::CursorDown => {
                self.next_field();
                None
            }
            TuiEvent::BackTab | TuiEvent::CursorUp => {
                self.prev_field();
                None
            }
            TuiEvent::Submit => {
                let field = self.focused_field()?;
                if field.multiline {
                    field.value.push('\n');
                    None
                } else if self.focused + 1 == self.fields.len() {
                    Some(FormEvent::Submit)
                } else {
                    self.next_field();
                    None
                }
            }
            TuiEvent::InputChar(c) => {
                let field = self.focused_field()?;
                if *c != '\n' || field.multiline {
                    field.value.push(*c);
                }
                None
            }
            TuiEvent::Paste(text) => {
                let field = self.focused_field()?;
                if field.multiline {
                    field.value.push_str(text);
                } else {
                    field.value.push_str(&text.replace(['\r', '\n'], " "));
                }
                None
            }
            TuiEvent::Backspace => {
                self.focused_field()?.value.pop();
                None
            }
            _ => None,
        }
    }
}
