//! # Application State
//!
//! Everything the root controller owns. Presentation-only state (scroll
//! offsets, list selection, form buffers) lives in the `tui` module.
//!
//! ```text
//! App
//! ├── backend: Arc<dyn QaBackend>   // REST client
//! ├── turns: Vec<Turn>              // session history, append-only
//! ├── active_turn: Option<usize>    // turn shown in the Q&A panel
//! ├── active_tab: SidebarTab        // history | documents
//! ├── is_loading: bool              // a question is in flight
//! ├── documents: Vec<Document>      // cached list, backend is truth
//! ├── current_user: Option<User>
//! ├── health: Option<String>        // header badge
//! ├── modal: Option<ModalKind>      // open form dialog
//! ├── confirm: Option<Confirm>      // pending y/n question
//! ├── alert: Option<String>         // blocking error message
//! └── status_message: String
//! ```
//!
//! State changes only happen through `update(state, action)` in action.rs.

use std::sync::Arc;

use chrono::{DateTime, Local};

use crate::api::{Document, QaBackend, User};
use crate::core::normalize::Reference;

/// One question/answer exchange. The answer is empty while the request is in flight.
#[derive(Debug, Clone, PartialEq)]
pub struct Turn {
    pub question: String,
    pub answer: String,
    pub references: Vec<Reference>,
    pub created_at: DateTime<Local>,
}

impl Turn {
    pub fn pending(question: String) -> Self {
        Self {
            question,
            answer: String::new(),
            references: Vec::new(),
            created_at: Local::now(),
        }
    }

    pub fn is_pending(&self) -> bool {
        self.answer.is_empty()
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum SidebarTab {
    #[default]
    History,
    Documents,
}

impl SidebarTab {
    pub fn toggle(self) -> Self {
        match self {
            SidebarTab::History => SidebarTab::Documents,
            SidebarTab::Documents => SidebarTab::History,
        }
    }
}

/// Which form dialog is open.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ModalKind {
    Upload,
    Account,
    AddChunk { document_id: String, title: String },
}

/// A destructive action waiting for the user's yes/no.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Confirm {
    DeleteDocument { id: String, title: String },
}

pub struct App {
    pub backend: Arc<dyn QaBackend>,
    pub turns: Vec<Turn>,
    pub active_turn: Option<usize>,
    pub active_tab: SidebarTab,
    pub is_loading: bool,
    pub documents: Vec<Document>,
    pub current_user: Option<User>,
    pub health: Option<String>,
    pub modal: Option<ModalKind>,
    pub confirm: Option<Confirm>,
    pub alert: Option<String>,
    pub status_message: String,
    /// User to fetch at startup instead of taking the first listed one.
    pub configured_user_id: Option<String>,
}

impl App {
    pub fn new(backend: Arc<dyn QaBackend>, configured_user_id: Option<String>) -> Self {
        Self {
            backend,
            turns: Vec::new(),
            active_turn: None,
            active_tab: SidebarTab::default(),
            is_loading: false,
            documents: Vec::new(),
            current_user: None,
            health: None,
            modal: None,
            confirm: None,
            alert: None,
            status_message: String::new(),
            configured_user_id,
        }
    }

    /// The turn shown in the Q&A panel.
    pub fn active(&self) -> Option<&Turn> {
        self.active_turn.and_then(|idx| self.turns.get(idx))
    }

    pub fn document(&self, id: &str) -> Option<&Document> {
        self.documents.iter().find(|d| d.id == id)
    }

    pub fn user_id(&self) -> Option<String> {
        self.current_user.as_ref().map(|u| u.id.clone())
    }
}

#[cfg(test)]
mod tests {
    use crate::test_support::test_app;

    use super::*;

    #[test]
    fn test_app_new_defaults() {
        let app = test_app();
        assert!(app.turns.is_empty());
        assert_eq!(app.active_turn, None);
        assert_eq!(app.active_tab, SidebarTab::History);
        assert!(!app.is_loading);
        assert!(app.active().is_none());
    }

    #[test]
    fn test_pending_turn() {
        let turn = Turn::pending("Q".to_string());
        assert!(turn.is_pending());
        assert!(turn.references.is_empty());
    }

    #[test]
    fn test_tab_toggle() {
        assert_eq!(SidebarTab::History.toggle(), SidebarTab::Documents);
        assert_eq!(SidebarTab::Documents.toggle(), SidebarTab::History);
    }
}
