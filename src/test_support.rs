//! Test utilities shared across the crate.
//!
//! This module is only compiled during tests (`#[cfg(test)]`).

use std::sync::{Arc, Mutex};

use async_trait::async_trait;
use serde_json::Value;

use crate::api::{ApiError, Document, NewChunk, NewDocument, NewUser, Payload, QaBackend, User};
use crate::core::state::App;

const BASE_URL: &str = "http://test/api/";

/// An in-memory backend with scripted responses.
///
/// Every collection starts as `None`, meaning the matching list call fails
/// with a transport error. Set `Some(..)` to make it answer.
#[derive(Default)]
pub struct ScriptedBackend {
    pub health: Mutex<Option<Payload>>,
    pub answer: Mutex<Option<Result<Value, ApiError>>>,
    pub asked: Mutex<Vec<String>>,
    pub documents: Mutex<Option<Vec<Document>>>,
    pub users: Mutex<Option<Vec<User>>>,
}

fn unreachable_backend(path: &str) -> ApiError {
    ApiError::Transport {
        url: format!("{BASE_URL}{path}"),
        base_url: BASE_URL.to_string(),
        message: "error sending request".to_string(),
    }
}

fn not_found() -> ApiError {
    ApiError::request(404, "{\"detail\":\"Not found.\"}")
}

#[async_trait]
impl QaBackend for ScriptedBackend {
    fn base_url(&self) -> &str {
        BASE_URL
    }

    async fn health_check(&self) -> Result<Payload, ApiError> {
        self.health
            .lock()
            .unwrap()
            .clone()
            .ok_or_else(|| unreachable_backend("health/"))
    }

    async fn ask_question(&self, question: &str, _user_id: Option<&str>) -> Result<Value, ApiError> {
        self.asked.lock().unwrap().push(question.to_string());
        self.answer
            .lock()
            .unwrap()
            .clone()
            .unwrap_or_else(|| Err(unreachable_backend("qa/")))
    }

    async fn list_documents(&self) -> Result<Vec<Document>, ApiError> {
        self.documents
            .lock()
            .unwrap()
            .clone()
            .ok_or_else(|| unreachable_backend("documents/"))
    }

    async fn create_document(&self, new: &NewDocument) -> Result<Document, ApiError> {
        Ok(Document {
            id: "new".to_string(),
            title: new.title.clone(),
            description: new.description.clone(),
            source: new.source.clone(),
            chunks: Vec::new(),
        })
    }

    async fn get_document(&self, id: &str) -> Result<Document, ApiError> {
        let docs = self.documents.lock().unwrap();
        docs.iter()
            .flatten()
            .find(|d| d.id == id)
            .cloned()
            .ok_or_else(not_found)
    }

    async fn delete_document(&self, id: &str) -> Result<(), ApiError> {
        let mut docs = self.documents.lock().unwrap();
        let docs = docs.get_or_insert_with(Vec::new);
        let before = docs.len();
        docs.retain(|d| d.id != id);
        if docs.len() == before {
            Err(not_found())
        } else {
            Ok(())
        }
    }

    async fn add_document_chunk(&self, id: &str, chunk: &NewChunk) -> Result<Document, ApiError> {
        let mut docs = self.documents.lock().unwrap();
        let doc = docs
            .iter_mut()
            .flatten()
            .find(|d| d.id == id)
            .ok_or_else(not_found)?;
        doc.chunks.push(crate::api::Chunk {
            text: chunk.text.clone(),
            chunk_index: chunk.chunk_index.unwrap_or(doc.chunks.len() as u32),
        });
        Ok(doc.clone())
    }

    async fn list_users(&self) -> Result<Vec<User>, ApiError> {
        self.users
            .lock()
            .unwrap()
            .clone()
            .ok_or_else(|| unreachable_backend("users/"))
    }

    async fn create_user(&self, new: &NewUser) -> Result<User, ApiError> {
        self.update_user("new", new).await
    }

    async fn get_user(&self, id: &str) -> Result<User, ApiError> {
        let users = self.users.lock().unwrap();
        users
            .iter()
            .flatten()
            .find(|u| u.id == id)
            .cloned()
            .ok_or_else(not_found)
    }

    async fn update_user(&self, id: &str, new: &NewUser) -> Result<User, ApiError> {
        Ok(User {
            id: id.to_string(),
            email: new.email.clone(),
            display_name: new.display_name.clone(),
            is_active: new.is_active,
        })
    }
}

/// Creates a test App over a backend where every call fails.
pub fn test_app() -> App {
    test_app_with(Arc::new(ScriptedBackend::default()))
}

pub fn test_app_with(backend: Arc<dyn QaBackend>) -> App {
    App::new(backend, None)
}

pub fn document(id: &str, title: &str) -> Document {
    Document {
        id: id.to_string(),
        title: title.to_string(),
        source: "manual".to_string(),
        ..Default::default()
    }
}

pub fn user(id: &str, email: &str) -> User {
    User {
        id: id.to_string(),
        email: email.to_string(),
        display_name: None,
        is_active: true,
    }
}
