use serde::{Deserialize, Deserializer, Serialize};
use serde_json::Value;

use crate::core::normalize::label_text;

/// Source tag the client sends for documents created from the upload form.
pub const MANUAL_SOURCE: &str = "manual";

/// A response body: parsed JSON when the server says so, raw text otherwise.
#[derive(Debug, Clone, PartialEq)]
pub enum Payload {
    Json(Value),
    Text(String),
}

impl Payload {
    /// Collapses the payload into a JSON value; text becomes a JSON string.
    pub fn into_value(self) -> Value {
        match self {
            Payload::Json(value) => value,
            Payload::Text(text) => Value::String(text),
        }
    }
}

/// Body of `POST /qa/`.
#[derive(Serialize, Debug, Clone, PartialEq)]
pub struct AskRequest<'a> {
    pub question: &'a str,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub user_id: Option<&'a str>,
}

/// A chunk as returned by the backend.
#[derive(Serialize, Deserialize, Debug, Clone, PartialEq, Default)]
pub struct Chunk {
    #[serde(default, deserialize_with = "loose_text")]
    pub text: String,
    #[serde(default, deserialize_with = "loose_index")]
    pub chunk_index: u32,
}

/// A chunk to be created. `chunk_index` is left to the backend when absent.
#[derive(Serialize, Debug, Clone, PartialEq)]
pub struct NewChunk {
    pub text: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub chunk_index: Option<u32>,
}

/// Body of `PATCH /documents/{id}/`.
#[derive(Serialize, Debug, Clone, PartialEq)]
pub struct AddChunkRequest<'a> {
    pub add_chunk: &'a NewChunk,
}

#[derive(Serialize, Deserialize, Debug, Clone, PartialEq, Default)]
pub struct Document {
    #[serde(deserialize_with = "id_from_string_or_number")]
    pub id: String,
    #[serde(default, deserialize_with = "loose_text")]
    pub title: String,
    #[serde(default, deserialize_with = "loose_optional_text")]
    pub description: Option<String>,
    #[serde(default, deserialize_with = "loose_text")]
    pub source: String,
    #[serde(default, deserialize_with = "loose_chunks")]
    pub chunks: Vec<Chunk>,
}

/// Body of `POST /documents/`.
#[derive(Serialize, Debug, Clone, PartialEq)]
pub struct NewDocument {
    pub title: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub description: Option<String>,
    pub source: String,
    pub chunks: Vec<NewChunk>,
}

#[derive(Serialize, Deserialize, Debug, Clone, PartialEq, Default)]
pub struct User {
    #[serde(deserialize_with = "id_from_string_or_number")]
    pub id: String,
    #[serde(default, deserialize_with = "loose_text")]
    pub email: String,
    #[serde(default, deserialize_with = "loose_optional_text")]
    pub display_name: Option<String>,
    #[serde(default = "default_true", deserialize_with = "loose_flag")]
    pub is_active: bool,
}

impl User {
    /// Name shown in the header: display name when set, email otherwise.
    pub fn label(&self) -> &str {
        match self.display_name.as_deref() {
            Some(name) if !name.trim().is_empty() => name,
            _ => &self.email,
        }
    }
}

/// Body of `POST /users/` and `PUT /users/{id}/`.
#[derive(Serialize, Debug, Clone, PartialEq)]
pub struct NewUser {
    pub email: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub display_name: Option<String>,
    pub is_active: bool,
}

fn default_true() -> bool {
    true
}

/// Backends disagree on whether ids are integers or strings; keep them as strings.
fn id_from_string_or_number<'de, D>(deserializer: D) -> Result<String, D::Error>
where
    D: Deserializer<'de>,
{
    #[derive(Deserialize)]
    #[serde(untagged)]
    enum RawId {
        Str(String),
        Num(serde_json::Number),
    }

    Ok(match RawId::deserialize(deserializer)? {
        RawId::Str(s) => s,
        RawId::Num(n) => n.to_string(),
    })
}

// Record fields below accept whatever JSON the backend sends. A wrong type
// in one field must not lose the whole record, or the list around it.

/// `null` is empty; other non-strings become a short label.
fn loose_text<'de, D>(deserializer: D) -> Result<String, D::Error>
where
    D: Deserializer<'de>,
{
    Ok(label_text(&Value::deserialize(deserializer)?))
}

fn loose_optional_text<'de, D>(deserializer: D) -> Result<Option<String>, D::Error>
where
    D: Deserializer<'de>,
{
    Ok(match Value::deserialize(deserializer)? {
        Value::Null => None,
        other => Some(label_text(&other)),
    })
}

/// Non-negative integers and numeric strings; anything else is 0.
fn loose_index<'de, D>(deserializer: D) -> Result<u32, D::Error>
where
    D: Deserializer<'de>,
{
    let index = match Value::deserialize(deserializer)? {
        Value::Number(n) => n.as_u64().and_then(|n| u32::try_from(n).ok()),
        Value::String(s) => s.trim().parse().ok(),
        _ => None,
    };
    Ok(index.unwrap_or_default())
}

/// Missing or non-boolean means active.
fn loose_flag<'de, D>(deserializer: D) -> Result<bool, D::Error>
where
    D: Deserializer<'de>,
{
    Ok(Value::deserialize(deserializer)?.as_bool().unwrap_or(true))
}

/// Object entries decode as chunks and bare strings become chunk text.
/// Other entries are skipped.
fn loose_chunks<'de, D>(deserializer: D) -> Result<Vec<Chunk>, D::Error>
where
    D: Deserializer<'de>,
{
    let Value::Array(entries) = Value::deserialize(deserializer)? else {
        return Ok(Vec::new());
    };
    Ok(entries
        .into_iter()
        .enumerate()
        .filter_map(|(position, entry)| match entry {
            Value::Object(_) => serde_json::from_value(entry).ok(),
            Value::String(text) => Some(Chunk {
                text,
                chunk_index: u32::try_from(position).unwrap_or_default(),
            }),
            _ => None,
        })
        .collect())
}
