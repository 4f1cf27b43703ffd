//! # Sidebar Component
//!
//! Left pane with two tabs: the session's question history and the
//! document library.
//!
//! Follows the persistent state + transient wrapper pattern:
//! - `SidebarState` (list selections) lives in `TuiState`
//! - `Sidebar` is created each frame with borrowed state and props
//!
//! Keys while focused: ↑/↓ move, Enter opens, Tab switches tab,
//! `d` deletes, `a` adds a chunk, `r` refreshes the document list.

use ratatui::Frame;
use ratatui::layout::{Constraint, Layout, Rect};
use ratatui::text::{Line, Span};
use ratatui::widgets::{Block, List, ListItem, ListState, Paragraph, Tabs, Wrap};
use unicode_width::UnicodeWidthChar;

use crate::api::Document;
use crate::core::state::{SidebarTab, Turn};
use crate::tui::component::Component;
use crate::tui::event::TuiEvent;
use crate::tui::theme::Theme;

const HELP_HISTORY: &str = " ↑↓ Move  Enter Open  Tab Docs ";
const HELP_DOCUMENTS: &str = " Enter View  d Del  a Chunk  r Reload ";

/// Events emitted by the sidebar.
#[derive(Debug, Clone, PartialEq)]
pub enum SidebarEvent {
    SelectTurn(usize),
    ViewDocument(String),
    DeleteDocument(String),
    AddChunk(String),
    Refresh,
    SwitchTab,
    /// A key the sidebar doesn't use; the caller may forward it to the input.
    Unhandled,
}

/// Persistent selection state for both tabs.
#[derive(Default)]
pub struct SidebarState {
    pub history: ListState,
    pub documents: ListState,
}

impl SidebarState {
    pub fn new() -> Self {
        Self::default()
    }

    /// Select the given turn in the history list.
    pub fn select_turn(&mut self, idx: Option<usize>) {
        self.history.select(idx);
    }

    /// Keep selections inside the current list lengths.
    pub fn clamp(&mut self, turn_count: usize, document_count: usize) {
        clamp_selection(&mut self.history, turn_count);
        clamp_selection(&mut self.documents, document_count);
    }

    pub fn handle_event(
        &mut self,
        event: &TuiEvent,
        tab: SidebarTab,
        turn_count: usize,
        documents: &[Document],
    ) -> Option<SidebarEvent> {
        let (list, len) = match tab {
            SidebarTab::History => (&mut self.history, turn_count),
            SidebarTab::Documents => (&mut self.documents, documents.len()),
        };

        match event {
            TuiEvent::Tab | TuiEvent::CursorLeft | TuiEvent::CursorRight => {
                Some(SidebarEvent::SwitchTab)
            }
            TuiEvent::CursorUp => {
                if len > 0 {
                    let idx = list.selected().map(|i| i.saturating_sub(1)).unwrap_or(len - 1);
                    list.select(Some(idx));
                }
                None
            }
            TuiEvent::CursorDown => {
                if len > 0 {
                    let idx = list.selected().map(|i| (i + 1).min(len - 1)).unwrap_or(0);
                    list.select(Some(idx));
                }
                None
            }
            TuiEvent::Submit => {
                let idx = list.selected().filter(|i| *i < len)?;
                Some(match tab {
                    SidebarTab::History => SidebarEvent::SelectTurn(idx),
                    SidebarTab::Documents => SidebarEvent::ViewDocument(documents[idx].id.clone()),
                })
            }
            TuiEvent::InputChar('d') if tab == SidebarTab::Documents => {
                let idx = list.selected().filter(|i| *i < len)?;
                Some(SidebarEvent::DeleteDocument(documents[idx].id.clone()))
            }
            TuiEvent::InputChar('a') if tab == SidebarTab::Documents => {
                let idx = list.selected().filter(|i| *i < len)?;
                Some(SidebarEvent::AddChunk(documents[idx].id.clone()))
            }
            TuiEvent::InputChar('r') if tab == SidebarTab::Documents => Some(SidebarEvent::Refresh),
            TuiEvent::InputChar(_) | TuiEvent::Paste(_) => Some(SidebarEvent::Unhandled),
            _ => None,
        }
    }
}

fn clamp_selection(list: &mut ListState, len: usize) {
    match list.selected() {
        Some(_) if len == 0 => list.select(None),
        Some(idx) if idx >= len => list.select(Some(len - 1)),
        None if len > 0 => list.select(Some(0)),
        _ => {}
    }
}

/// Transient render wrapper for the sidebar.
pub struct Sidebar<'a> {
    pub state: &'a mut SidebarState,
    pub turns: &'a [Turn],
    pub documents: &'a [Document],
    pub active_tab: SidebarTab,
    pub focused: bool,
    pub theme: &'a Theme,
}

impl Sidebar<'_> {
    fn history_items(&self, width: usize) -> Vec<ListItem<'static>> {
        self.turns
            .iter()
            .map(|turn| {
                let question = if turn.question.trim().is_empty() {
                    "Question"
                } else {
                    turn.question.as_str()
                };
                ListItem::new(vec![
                    Line::from(fit_width(question, width)),
                    Line::from(Span::styled(
                        turn.created_at.format("%b %d %H:%M").to_string(),
                        self.theme.muted(),
                    )),
                ])
            })
            .collect()
    }

    fn document_items(&self, width: usize) -> Vec<ListItem<'static>> {
        self.documents
            .iter()
            .map(|doc| {
                let title = if doc.title.trim().is_empty() {
                    "Untitled"
                } else {
                    doc.title.as_str()
                };
                let mut lines = vec![Line::from(fit_width(title, width))];
                if let Some(description) = doc.description.as_deref().filter(|d| !d.is_empty()) {
                    lines.push(Line::from(Span::styled(
                        fit_width(description, width),
                        self.theme.muted(),
                    )));
                }
                ListItem::new(lines)
            })
            .collect()
    }
}

impl Component for Sidebar<'_> {
    fn render(&mut self, frame: &mut Frame, area: Rect) {
        let help = match self.active_tab {
            SidebarTab::History => HELP_HISTORY,
            SidebarTab::Documents => HELP_DOCUMENTS,
        };
        let block = Block::bordered()
            .border_style(self.theme.border(self.focused))
            .title_bottom(Line::from(Span::styled(help, self.theme.muted())));
        let inner = block.inner(area);
        frame.render_widget(block, area);

        let [tabs_area, list_area] =
            Layout::vertical([Constraint::Length(2), Constraint::Min(0)]).areas(inner);

        let selected_tab = match self.active_tab {
            SidebarTab::History => 0,
            SidebarTab::Documents => 1,
        };
        let tabs = Tabs::new(vec!["History", "Documents"])
            .select(selected_tab)
            .style(self.theme.muted())
            .highlight_style(self.theme.heading());
        frame.render_widget(tabs, tabs_area);

        // Highlight symbol takes two columns
        let width = list_area.width.saturating_sub(2) as usize;
        let (items, empty_text, state) = match self.active_tab {
            SidebarTab::History => (
                self.history_items(width),
                "No questions yet. Start by asking something!",
                &mut self.state.history,
            ),
            SidebarTab::Documents => (
                self.document_items(width),
                "No documents yet. Press Ctrl+U to upload or create one.",
                &mut self.state.documents,
            ),
        };

        if items.is_empty() {
            let empty = Paragraph::new(empty_text)
                .style(self.theme.muted())
                .wrap(Wrap { trim: true });
            frame.render_widget(empty, list_area);
            return;
        }

        let list = List::new(items)
            .highlight_style(self.theme.selected())
            .highlight_symbol("▍ ");
        frame.render_stateful_widget(list, list_area, state);
    }
}

/// Truncate `text` to fit `max_width` terminal columns, ending with `…` when cut.
pub fn fit_width(text: &str, max_width: usize) -> String {
    let text = text.lines().next().unwrap_or("");
    let total: usize = text.chars().map(|c| c.width().unwrap_or(0)).sum();
    if total <= max_width {
        return text.to_string();
    }
    if max_width == 0 {
        return String::new();
    }

    let mut out = String::new();
    let mut used = 0;
    for c in text.chars() {
        let w = c.width().unwrap_or(0);
        if used + w > max_width - 1 {
            break;
        }
        out.push(c);
        used += w;
    }
    out.push('…');
    out
}
