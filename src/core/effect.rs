//! # Effect Execution
//!
//! Runs one [`Effect`] against a [`QaBackend`] and turns the outcome into
//! the [`Action`] that feeds back into `update()`.
//!
//! Each call owns copies of everything it needs, so the caller can spawn it
//! and forget about it. Failures are never fatal: mutations come back as
//! `*Failed` actions carrying the error text, and the initial-load calls
//! either substitute a default or are dropped with a log line.

use log::{debug, info, warn};

use crate::api::QaBackend;
use crate::core::action::{Action, BACKEND_UNAVAILABLE, Effect};
use crate::core::normalize::health_message;

/// Perform a single effect. Composite effects must be `split()` first;
/// `None`, `Quit` and `InitialLoad` produce nothing here.
pub async fn perform(backend: &dyn QaBackend, effect: Effect) -> Option<Action> {
    match effect {
        Effect::None | Effect::Quit | Effect::InitialLoad { .. } => None,

        Effect::LoadHealth => {
            let message = match backend.health_check().await {
                Ok(payload) => health_message(&payload.into_value()),
                Err(e) => {
                    warn!("Health check failed: {}", e);
                    BACKEND_UNAVAILABLE.to_string()
                }
            };
            Some(Action::HealthLoaded(message))
        }
        Effect::LoadDocuments => match backend.list_documents().await {
            Ok(documents) => Some(Action::DocumentsLoaded(documents)),
            Err(e) => {
                warn!("Listing documents failed: {}", e);
                None
            }
        },
        Effect::LoadUsers => load_users(backend).await,
        Effect::LoadUser(id) => match backend.get_user(&id).await {
            Ok(user) => Some(Action::UserLoaded(user)),
            Err(e) => {
                warn!("Fetching configured user {} failed ({}), listing users", id, e);
                load_users(backend).await
            }
        },

        Effect::AskQuestion {
            turn_index,
            question,
            user_id,
        } => {
            let result = backend.ask_question(&question, user_id.as_deref()).await;
            Some(match result {
                Ok(response) => {
                    info!("Answer received for turn {}", turn_index);
                    Action::AnswerReceived {
                        turn_index,
                        response,
                    }
                }
                Err(e) => {
                    warn!("Question for turn {} failed: {}", turn_index, e);
                    Action::AnswerFailed {
                        turn_index,
                        error: e.to_string(),
                    }
                }
            })
        }

        Effect::CreateDocument(document) => Some(match backend.create_document(&document).await {
            Ok(created) => Action::DocumentCreated(created),
            Err(e) => Action::DocumentCreateFailed(e.to_string()),
        }),
        Effect::FetchDocument(id) => Some(match backend.get_document(&id).await {
            Ok(document) => Action::DocumentFetched(document),
            Err(e) => Action::DocumentFetchFailed {
                id,
                error: e.to_string(),
            },
        }),
        Effect::DeleteDocument(id) => Some(match backend.delete_document(&id).await {
            Ok(()) => Action::DocumentDeleted(id),
            Err(e) => Action::DocumentDeleteFailed(e.to_string()),
        }),
        Effect::AddChunk { document_id, chunk } => {
            Some(match backend.add_document_chunk(&document_id, &chunk).await {
                Ok(document) => Action::ChunkAdded(document),
                Err(e) => Action::ChunkAddFailed(e.to_string()),
            })
        }

        Effect::CreateUser(user) => Some(match backend.create_user(&user).await {
            Ok(saved) => Action::UserSaved(saved),
            Err(e) => Action::UserSaveFailed(e.to_string()),
        }),
        Effect::UpdateUser { id, user } => Some(match backend.update_user(&id, &user).await {
            Ok(saved) => Action::UserSaved(saved),
            Err(e) => Action::UserSaveFailed(e.to_string()),
        }),
    }
}

async fn load_users(backend: &dyn QaBackend) -> Option<Action> {
    match backend.list_users().await {
        Ok(users) => {
            debug!("Loaded {} users", users.len());
            Some(Action::UsersLoaded(users))
        }
        Err(e) => {
            debug!("Listing users failed, continuing without a user: {}", e);
            None
        }
    }
}
