//! # InputBox Component
//!
//! Single-line question input at the bottom of the Q&A panel.
//!
//! The buffer and cursor are internal state; `loading` and `focused` are
//! props refreshed by the parent each frame. Text longer than the box
//! scrolls horizontally so the cursor stays visible.

use ratatui::Frame;
use ratatui::layout::Rect;
use ratatui::text::{Line, Span};
use ratatui::widgets::{Block, BorderType, Paragraph};
use unicode_width::UnicodeWidthChar;

use crate::tui::component::{Component, EventHandler};
use crate::tui::event::TuiEvent;
use crate::tui::theme::Theme;

const PLACEHOLDER: &str = "Ask a question about company data...";

/// High-level events emitted by the InputBox
#[derive(Debug, Clone, PartialEq)]
pub enum InputEvent {
    /// Enter pressed with non-blank text; carries the trimmed question.
    Submit(String),
    ContentChanged,
}

pub struct InputBox {
    pub buffer: String,
    /// Cursor as a byte offset into `buffer`.
    cursor: usize,
    /// Leftmost visible column.
    scroll: usize,
    /// A question is in flight (Prop)
    pub loading: bool,
    /// Input has keyboard focus (Prop)
    pub focused: bool,
    pub theme: Theme,
}

impl InputBox {
    pub fn new() -> Self {
        Self {
            buffer: String::new(),
            cursor: 0,
            scroll: 0,
            loading: false,
            focused: true,
            theme: Theme::default(),
        }
    }

    fn insert(&mut self, text: &str) {
        // Single line: pasted newlines become spaces
        let text: String = text
            .chars()
            .map(|c| if c == '\n' || c == '\r' { ' ' } else { c })
            .collect();
        self.buffer.insert_str(self.cursor, &text);
        self.cursor += text.len();
    }

    fn cursor_column(&self) -> usize {
        display_width(&self.buffer[..self.cursor])
    }

    /// Scroll so the cursor column lies inside `[scroll, scroll + width)`.
    fn follow_cursor(&mut self, width: usize) {
        let col = self.cursor_column();
        if col < self.scroll {
            self.scroll = col;
        } else if width > 0 && col >= self.scroll + width {
            self.scroll = col + 1 - width;
        }
    }

    /// The slice of the buffer starting at the scroll column.
    fn visible_text(&self, width: usize) -> String {
        let mut col = 0;
        let mut out = String::new();
        for c in self.buffer.chars() {
            let w = c.width().unwrap_or(0);
            if col >= self.scroll {
                if col + w > self.scroll + width {
                    break;
                }
                out.push(c);
            }
            col += w;
        }
        out
    }
}

impl Default for InputBox {
    fn default() -> Self {
        Self::new()
    }
}

impl Component for InputBox {
    fn render(&mut self, frame: &mut Frame, area: Rect) {
        let title = if self.loading { " Sending... " } else { " Ask " };
        let block = Block::bordered()
            .border_type(BorderType::Rounded)
            .border_style(self.theme.border(self.focused))
            .title(title)
            .title_bottom(Line::from(Span::styled(
                " Enter Send  Tab Sidebar  Ctrl+U Upload  Ctrl+K Account ",
                self.theme.muted(),
            )));
        let inner = block.inner(area);
        let width = inner.width.saturating_sub(1) as usize;
        self.follow_cursor(width);

        let line = if self.buffer.is_empty() {
            Line::from(Span::styled(PLACEHOLDER, self.theme.muted()))
        } else {
            Line::from(self.visible_text(width))
        };
        frame.render_widget(Paragraph::new(line).block(block), area);

        if self.focused && inner.width > 0 && inner.height > 0 {
            let x = inner.x + (self.cursor_column() - self.scroll) as u16;
            frame.set_cursor_position((x.min(inner.right().saturating_sub(1)), inner.y));
        }
    }
}

impl EventHandler for InputBox {
    type Event = InputEvent;

    fn handle_event(&mut self, event: &TuiEvent) -> Option<Self::Event> {
        match event {
            TuiEvent::InputChar(c) => {
                self.insert(c.encode_utf8(&mut [0; 4]));
                Some(InputEvent::ContentChanged)
            }
            TuiEvent::Paste(text) => {
                self.insert(text);
                Some(InputEvent::ContentChanged)
            }
            TuiEvent::Backspace => {
                let prev = self.buffer[..self.cursor].char_indices().next_back()?.0;
                self.buffer.drain(prev..self.cursor);
                self.cursor = prev;
                Some(InputEvent::ContentChanged)
            }
            TuiEvent::Delete => {
                let c = self.buffer[self.cursor..].chars().next()?;
                self.buffer.drain(self.cursor..self.cursor + c.len_utf8());
                Some(InputEvent::ContentChanged)
            }
            TuiEvent::CursorLeft => {
                self.cursor = self.buffer[..self.cursor].char_indices().next_back()?.0;
                Some(InputEvent::ContentChanged)
            }
            TuiEvent::CursorRight => {
                let c = self.buffer[self.cursor..].chars().next()?;
                self.cursor += c.len_utf8();
                Some(InputEvent::ContentChanged)
            }
            TuiEvent::CursorHome => (self.cursor != 0).then(|| {
                self.cursor = 0;
                InputEvent::ContentChanged
            }),
            TuiEvent::CursorEnd => (self.cursor != self.buffer.len()).then(|| {
                self.cursor = self.buffer.len();
                InputEvent::ContentChanged
            }),
            TuiEvent::Submit => {
                let question = self.buffer.trim();
                if question.is_empty() {
                    return None;
                }
                let question = question.to_string();
                self.buffer.clear();
                self.cursor = 0;
                self.scroll = 0;
                Some(InputEvent::Submit(question))
            }
            _ => None,
        }
    }
}

fn display_width(text: &str) -> usize {
    text.chars().map(|c| c.width().unwrap_or(0)).sum()
}
