use std::time::Duration;

use async_trait::async_trait;
use log::{debug, warn};
use reqwest::Method;
use reqwest::header::CONTENT_TYPE;
use serde::Serialize;
use serde::de::DeserializeOwned;
use serde_json::Value;

use super::backend::QaBackend;
use super::base_url;
use super::error::ApiError;
use super::types::{
    AddChunkRequest, AskRequest, Document, NewChunk, NewDocument, NewUser, Payload, User,
};

pub const DEFAULT_TIMEOUT: Duration = Duration::from_secs(60);

/// HTTP client for the Q&A backend's REST API.
///
/// All paths are joined under `base_url`, which is expected to be already
/// normalized (see [`base_url::resolve_base_url`]). Trailing slashes on the
/// resource paths are significant to the backend and are kept as written.
pub struct ApiClient {
    base_url: String,
    client: reqwest::Client,
}

impl ApiClient {
    pub fn new(base_url: String, timeout: Duration) -> Self {
        let client = reqwest::Client::builder()
            .timeout(timeout)
            .build()
            .unwrap_or_else(|e| {
                warn!("Failed to build HTTP client with timeout ({}), using defaults", e);
                reqwest::Client::new()
            });
        Self { base_url, client }
    }

    /// Issue one request and return its body.
    ///
    /// Bodies are serialized as JSON when present. The response is parsed as
    /// JSON when its content type says so and returned as text otherwise.
    async fn send<B: Serialize + ?Sized>(
        &self,
        method: Method,
        path: &str,
        body: Option<&B>,
    ) -> Result<Payload, ApiError> {
        let url = base_url::join(&self.base_url, path);
        debug!("{} {}", method, url);

        let mut request = self
            .client
            .request(method.clone(), &url)
            .header(CONTENT_TYPE, "application/json");
        if let Some(body) = body {
            request = request.json(body);
        }

        let transport = |e: reqwest::Error| ApiError::Transport {
            url: url.clone(),
            base_url: self.base_url.clone(),
            message: e.to_string(),
        };

        let response = request.send().await.map_err(transport)?;
        let status = response.status();
        let is_json = response
            .headers()
            .get(CONTENT_TYPE)
            .and_then(|v| v.to_str().ok())
            .is_some_and(|ct| ct.contains("application/json"));
        let text = response.text().await.map_err(transport)?;

        if !status.is_success() {
            warn!("{} {} failed with status {}", method, url, status);
            let body = if is_json {
                serde_json::from_str::<Value>(&text)
                    .map(|v| v.to_string())
                    .unwrap_or(text)
            } else {
                text
            };
            return Err(ApiError::request(status.as_u16(), &body));
        }

        if is_json && !text.trim().is_empty() {
            serde_json::from_str(&text)
                .map(Payload::Json)
                .map_err(|e| ApiError::Decode(format!("invalid JSON from {url}: {e}")))
        } else {
            Ok(Payload::Text(text))
        }
    }

    async fn get(&self, path: &str) -> Result<Payload, ApiError> {
        self.send::<()>(Method::GET, path, None).await
    }
}

/// Decode a JSON payload into a typed record.
fn decode<T: DeserializeOwned>(payload: Payload) -> Result<T, ApiError> {
    match payload {
        Payload::Json(value) => {
            serde_json::from_value(value).map_err(|e| ApiError::Decode(e.to_string()))
        }
        Payload::Text(text) => {
            let excerpt: String = text.chars().take(120).collect();
            Err(ApiError::Decode(format!("expected JSON, got text: {excerpt}")))
        }
    }
}

/// Decode a JSON array entry by entry, skipping entries that don't fit `T`.
fn decode_list<T: DeserializeOwned>(payload: Payload) -> Result<Vec<T>, ApiError> {
    let entries: Vec<Value> = decode(payload)?;
    let total = entries.len();
    let items: Vec<T> = entries
        .into_iter()
        .filter_map(|entry| match serde_json::from_value(entry) {
            Ok(item) => Some(item),
            Err(e) => {
                warn!("Skipping malformed list entry: {}", e);
                None
            }
        })
        .collect();
    if items.len() < total {
        debug!("Kept {} of {} list entries", items.len(), total);
    }
    Ok(items)
}

#[async_trait]
impl QaBackend for ApiClient {
    fn base_url(&self) -> &str {
        &self.base_url
    }

    async fn health_check(&self) -> Result<Payload, ApiError> {
        self.get("/health/").await
    }

    async fn ask_question(
        &self,
        question: &str,
        user_id: Option<&str>,
    ) -> Result<Value, ApiError> {
        let body = AskRequest { question, user_id };
        self.send(Method::POST, "/qa/", Some(&body))
            .await
            .map(Payload::into_value)
    }

    async fn list_documents(&self) -> Result<Vec<Document>, ApiError> {
        decode_list(self.get("/documents/").await?)
    }

    async fn create_document(&self, document: &NewDocument) -> Result<Document, ApiError> {
        decode(self.send(Method::POST, "/documents/", Some(document)).await?)
    }

    async fn get_document(&self, id: &str) -> Result<Document, ApiError> {
        decode(self.get(&format!("/documents/{id}/")).await?)
    }

    async fn delete_document(&self, id: &str) -> Result<(), ApiError> {
        self.send::<()>(Method::DELETE, &format!("/documents/{id}/"), None)
            .await
            .map(|_| ())
    }

    async fn add_document_chunk(&self, id: &str, chunk: &NewChunk) -> Result<Document, ApiError> {
        let body = AddChunkRequest { add_chunk: chunk };
        decode(
            self.send(Method::PATCH, &format!("/documents/{id}/"), Some(&body))
                .await?,
        )
    }

    async fn list_users(&self) -> Result<Vec<User>, ApiError> {
        decode_list(self.get("/users/").await?)
    }

    async fn create_user(&self, user: &NewUser) -> Result<User, ApiError> {
        decode(self.send(Method::POST, "/users/", Some(user)).await?)
    }

    async fn get_user(&self, id: &str) -> Result<User, ApiError> {
        decode(self.get(&format!("/users/{id}/")).await?)
    }

    async fn update_user(&self, id: &str, user: &NewUser) -> Result<User, ApiError> {
        decode(self.send(Method::PUT, &format!("/users/{id}/"), Some(user)).await?)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn test_decode_rejects_text_payload() {
        let err = decode::<Document>(Payload::Text("<html>".to_string())).unwrap_err();
        assert!(matches!(err, ApiError::Decode(msg) if msg.contains("<html>")));
    }

    #[test]
    fn test_decode_reports_shape_mismatch() {
        let err = decode::<Vec<User>>(Payload::Json(json!({"detail": "nope"}))).unwrap_err();
        assert!(matches!(err, ApiError::Decode(_)));
    }

    #[test]
    fn test_decode_list_skips_unusable_entries() {
        let docs: Vec<Document> = decode_list(Payload::Json(json!([
            {"id": 1, "title": "Handbook"},
            {"id": null, "title": "No id"},
            "stray",
            {"id": "2", "title": "Benefits", "source": null}
        ])))
        .unwrap();
        let ids: Vec<&str> = docs.iter().map(|d| d.id.as_str()).collect();
        assert_eq!(ids, vec!["1", "2"]);
    }

    #[test]
    fn test_decode_list_still_requires_an_array() {
        let err = decode_list::<Document>(Payload::Json(json!({"detail": "nope"}))).unwrap_err();
        assert!(matches!(err, ApiError::Decode(_)));
    }

    #[test]
    fn test_client_keeps_base_url() {
        let client = ApiClient::new("http://localhost:8000/api/".to_string(), DEFAULT_TIMEOUT);
        assert_eq!(client.base_url(), "http://localhost:8000/api/");
    }
}
