use async_trait::async_trait;
use serde_json::Value;

use super::error::ApiError;
use super::types::{Document, NewChunk, NewDocument, NewUser, Payload, User};

/// The backend resources the client consumes, one method per endpoint.
///
/// `ApiClient` is the HTTP implementation; the controller only sees this
/// trait so tests can script responses without a server.
#[async_trait]
pub trait QaBackend: Send + Sync {
    /// Base URL every path is joined under (used in diagnostics).
    fn base_url(&self) -> &str;

    async fn health_check(&self) -> Result<Payload, ApiError>;

    /// Ask a question. The answer shape is backend-defined, so it stays loose.
    async fn ask_question(&self, question: &str, user_id: Option<&str>)
        -> Result<Value, ApiError>;

    async fn list_documents(&self) -> Result<Vec<Document>, ApiError>;
    async fn create_document(&self, document: &NewDocument) -> Result<Document, ApiError>;
    async fn get_document(&self, id: &str) -> Result<Document, ApiError>;
    async fn delete_document(&self, id: &str) -> Result<(), ApiError>;
    async fn add_document_chunk(&self, id: &str, chunk: &NewChunk) -> Result<Document, ApiError>;

    async fn list_users(&self) -> Result<Vec<User>, ApiError>;
    async fn create_user(&self, user: &NewUser) -> Result<User, ApiError>;
    async fn get_user(&self, id: &str) -> Result<User, ApiError>;
    async fn update_user(&self, id: &str, user: &NewUser) -> Result<User, ApiError>;
}
