//! # Actions
//!
//! Everything that can happen in the client becomes an `Action`.
//! User presses Enter in the input box? That's `Action::SubmitQuestion`.
//! The backend answers? That's `Action::AnswerReceived`.
//!
//! The `update()` function takes the current state and an action, mutates
//! the state and returns an `Effect` describing the I/O to run next. No
//! side effects here. Effects are executed by `core::effect`, whose results
//! come back in as more actions.
//!
//! ```text
//! State + Action  →  update()  →  New State + Effect
//!                                               │
//!                     Action  ←  perform()  ←───┘
//! ```

use log::{debug, info, warn};
use serde_json::Value;

use crate::api::types::MANUAL_SOURCE;
use crate::api::{Document, NewChunk, NewDocument, NewUser, User};
use crate::core::normalize::{Reference, normalize_answer, question_text};
use crate::core::state::{App, Confirm, ModalKind, SidebarTab, Turn};

/// Number of chunks shown as references when viewing a document.
const DOCUMENT_PREVIEW_CHUNKS: usize = 3;

/// Shown in the header when the health check fails.
pub const BACKEND_UNAVAILABLE: &str = "Backend unavailable";

/// Upload form contents, untrimmed as typed.
#[derive(Debug, Clone, PartialEq, Default)]
pub struct DocumentDraft {
    pub title: String,
    pub description: String,
    pub content: String,
}

/// Account form contents, untrimmed as typed.
#[derive(Debug, Clone, PartialEq, Default)]
pub struct UserDraft {
    pub email: String,
    pub display_name: String,
}

#[derive(Debug, Clone, PartialEq)]
pub enum Action {
    /// Kick off the best-effort initial load.
    Startup,
    HealthLoaded(String),
    DocumentsLoaded(Vec<Document>),
    UsersLoaded(Vec<User>),
    UserLoaded(User),

    SubmitQuestion(String),
    /// The answer for the turn at `turn_index` (bound when the question was sent).
    AnswerReceived { turn_index: usize, response: Value },
    AnswerFailed { turn_index: usize, error: String },

    SelectTurn(usize),
    SwitchTab(SidebarTab),
    OpenModal(ModalKind),
    CloseModal,
    DismissAlert,

    CreateDocument(DocumentDraft),
    DocumentCreated(Document),
    DocumentCreateFailed(String),

    ViewDocument(String),
    DocumentFetched(Document),
    DocumentFetchFailed { id: String, error: String },

    /// Ask for confirmation before deleting the document with this id.
    RequestDelete(String),
    ConfirmAccepted,
    ConfirmDismissed,
    DocumentDeleted(String),
    DocumentDeleteFailed(String),

    AddChunk { document_id: String, text: String },
    ChunkAdded(Document),
    ChunkAddFailed(String),

    RefreshDocuments,

    EnsureUser(UserDraft),
    UserSaved(User),
    UserSaveFailed(String),

    Quit,
}

/// I/O requested by `update()`.
#[derive(Debug, Clone, PartialEq)]
pub enum Effect {
    None,
    Quit,
    /// Health, documents and user, each loaded independently.
    InitialLoad { user_id: Option<String> },
    LoadHealth,
    LoadDocuments,
    LoadUsers,
    LoadUser(String),
    AskQuestion {
        turn_index: usize,
        question: String,
        user_id: Option<String>,
    },
    CreateDocument(NewDocument),
    FetchDocument(String),
    DeleteDocument(String),
    AddChunk { document_id: String, chunk: NewChunk },
    CreateUser(NewUser),
    UpdateUser { id: String, user: NewUser },
}

impl Effect {
    /// Break composite effects into ones that can run as separate tasks.
    pub fn split(self) -> Vec<Effect> {
        match self {
            Effect::InitialLoad { user_id } => vec![
                Effect::LoadHealth,
                Effect::LoadDocuments,
                match user_id {
                    Some(id) => Effect::LoadUser(id),
                    None => Effect::LoadUsers,
                },
            ],
            Effect::None => Vec::new(),
            other => vec![other],
        }
    }
}

pub fn update(app: &mut App, action: Action) -> Effect {
    match action {
        Action::Startup => Effect::InitialLoad {
            user_id: app.configured_user_id.clone(),
        },
        Action::HealthLoaded(message) => {
            app.health = Some(message);
            Effect::None
        }
        Action::DocumentsLoaded(documents) => {
            debug!("Loaded {} documents", documents.len());
            app.documents = documents;
            Effect::None
        }
        Action::UsersLoaded(users) => {
            if app.current_user.is_none() {
                app.current_user = users.into_iter().next();
            }
            Effect::None
        }
        Action::UserLoaded(user) => {
            app.current_user = Some(user);
            Effect::None
        }

        Action::SubmitQuestion(question) => {
            let question = question.trim().to_string();
            if question.is_empty() {
                return Effect::None;
            }
            app.turns.push(Turn::pending(question.clone()));
            let turn_index = app.turns.len() - 1;
            app.active_turn = Some(turn_index);
            app.active_tab = SidebarTab::History;
            app.is_loading = true;
            app.status_message = "Asking...".to_string();
            info!("Submitting question for turn {}", turn_index);
            Effect::AskQuestion {
                turn_index,
                question,
                user_id: app.user_id(),
            }
        }
        Action::AnswerReceived {
            turn_index,
            response,
        } => {
            let normalized = normalize_answer(&response);
            let echoed = response
                .get("question")
                .map(|q| question_text(q).trim().to_string())
                .filter(|q| !q.is_empty());
            match app.turns.get_mut(turn_index) {
                Some(turn) => {
                    if let Some(question) = echoed {
                        turn.question = question;
                    }
                    turn.answer = normalized.answer;
                    turn.references = normalized.references;
                }
                None => warn!("Answer for unknown turn {}", turn_index),
            }
            app.is_loading = false;
            app.status_message.clear();
            Effect::None
        }
        Action::AnswerFailed { turn_index, error } => {
            if let Some(turn) = app.turns.get_mut(turn_index) {
                turn.answer = format!("Error: {error}");
                turn.references.clear();
            }
            app.is_loading = false;
            app.status_message.clear();
            Effect::None
        }

        Action::SelectTurn(idx) => {
            if idx < app.turns.len() {
                app.active_turn = Some(idx);
            }
            Effect::None
        }
        Action::SwitchTab(tab) => {
            app.active_tab = tab;
            Effect::None
        }
        Action::OpenModal(kind) => {
            app.modal = Some(kind);
            Effect::None
        }
        Action::CloseModal => {
            app.modal = None;
            Effect::None
        }
        Action::DismissAlert => {
            app.alert = None;
            Effect::None
        }

        Action::CreateDocument(draft) => {
            let title = draft.title.trim();
            if title.is_empty() {
                return Effect::None;
            }
            let content = draft.content.trim();
            let chunks = if content.is_empty() {
                Vec::new()
            } else {
                vec![NewChunk {
                    text: content.to_string(),
                    chunk_index: Some(0),
                }]
            };
            Effect::CreateDocument(NewDocument {
                title: title.to_string(),
                description: non_blank(&draft.description),
                source: MANUAL_SOURCE.to_string(),
                chunks,
            })
        }
        Action::DocumentCreated(document) => {
            app.status_message = format!("Created \"{}\"", document.title);
            app.documents.insert(0, document);
            app.modal = None;
            app.active_tab = SidebarTab::Documents;
            Effect::None
        }
        Action::DocumentCreateFailed(error) => {
            app.alert = Some(format!("Failed to create document: {error}"));
            Effect::None
        }

        Action::ViewDocument(id) => Effect::FetchDocument(id),
        Action::DocumentFetched(document) => {
            if let Some(cached) = app.documents.iter_mut().find(|d| d.id == document.id) {
                *cached = document.clone();
            }
            push_document_turn(app, &document);
            Effect::None
        }
        Action::DocumentFetchFailed { id, error } => {
            warn!("Failed to fetch document {}: {}", id, error);
            match app.document(&id).cloned() {
                Some(cached) => push_document_turn(app, &cached),
                None => app.alert = Some(format!("Failed to load document: {error}")),
            }
            Effect::None
        }

        Action::RequestDelete(id) => {
            let title = app
                .document(&id)
                .map(|d| d.title.clone())
                .unwrap_or_default();
            app.confirm = Some(Confirm::DeleteDocument { id, title });
            Effect::None
        }
        Action::ConfirmAccepted => match app.confirm.take() {
            Some(Confirm::DeleteDocument { id, .. }) => Effect::DeleteDocument(id),
            None => Effect::None,
        },
        Action::ConfirmDismissed => {
            app.confirm = None;
            Effect::None
        }
        Action::DocumentDeleted(id) => {
            app.documents.retain(|d| d.id != id);
            app.status_message = "Document deleted".to_string();
            Effect::None
        }
        Action::DocumentDeleteFailed(error) => {
            app.alert = Some(format!("Failed to delete: {error}"));
            Effect::None
        }

        Action::AddChunk { document_id, text } => {
            let text = text.trim();
            if text.is_empty() {
                app.alert = Some("Chunk text is required".to_string());
                return Effect::None;
            }
            let chunk_index = app.document(&document_id).map(|d| d.chunks.len() as u32);
            Effect::AddChunk {
                document_id,
                chunk: NewChunk {
                    text: text.to_string(),
                    chunk_index,
                },
            }
        }
        Action::ChunkAdded(document) => {
            app.status_message = format!("Added chunk to \"{}\"", document.title);
            match app.documents.iter_mut().find(|d| d.id == document.id) {
                Some(cached) => *cached = document,
                None => app.documents.insert(0, document),
            }
            app.modal = None;
            Effect::None
        }
        Action::ChunkAddFailed(error) => {
            app.alert = Some(format!("Failed to add chunk: {error}"));
            Effect::None
        }

        Action::RefreshDocuments => Effect::LoadDocuments,

        Action::EnsureUser(draft) => {
            let email = draft.email.trim();
            if email.is_empty() {
                app.alert = Some("Email is required".to_string());
                return Effect::None;
            }
            let user = NewUser {
                email: email.to_string(),
                display_name: non_blank(&draft.display_name),
                is_active: true,
            };
            match app.user_id() {
                Some(id) => Effect::UpdateUser { id, user },
                None => Effect::CreateUser(user),
            }
        }
        Action::UserSaved(user) => {
            app.status_message = format!("Signed in as {}", user.label());
            app.current_user = Some(user);
            app.modal = None;
            Effect::None
        }
        Action::UserSaveFailed(error) => {
            app.alert = Some(format!("Failed to save user: {error}"));
            Effect::None
        }

        Action::Quit => Effect::Quit,
    }
}

/// Append a turn summarizing a document and select it.
fn push_document_turn(app: &mut App, document: &Document) {
    app.turns.push(document_turn(document));
    app.active_turn = Some(app.turns.len() - 1);
    app.active_tab = SidebarTab::History;
}

fn document_turn(document: &Document) -> Turn {
    let answer = document
        .description
        .as_deref()
        .filter(|d| !d.trim().is_empty())
        .unwrap_or("Open the document for more details.")
        .to_string();
    let references = document
        .chunks
        .iter()
        .take(DOCUMENT_PREVIEW_CHUNKS)
        .map(|c| Reference {
            title: format!("Chunk {}", c.chunk_index),
            text: Some(c.text.clone()),
        })
        .collect();
    Turn {
        question: format!("What does \"{}\" say?", document.title),
        answer,
        references,
        ..Turn::pending(String::new())
    }
}

fn non_blank(s: &str) -> Option<String> {
    let s = s.trim();
    (!s.is_empty()).then(|| s.to_string())
}
