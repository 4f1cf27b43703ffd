//! # Backend API
//!
//! Thin client over the Q&A service's REST endpoints.
//!
//! | Operation       | Method | Path                 |
//! |-----------------|--------|----------------------|
//! | Health check    | GET    | `/health/`           |
//! | Ask question    | POST   | `/qa/`               |
//! | List documents  | GET    | `/documents/`        |
//! | Create document | POST   | `/documents/`        |
//! | Get document    | GET    | `/documents/{id}/`   |
//! | Delete document | DELETE | `/documents/{id}/`   |
//! | Add chunk       | PATCH  | `/documents/{id}/`   |
//! | List users      | GET    | `/users/`            |
//! | Create user     | POST   | `/users/`            |
//! | Get user        | GET    | `/users/{id}/`       |
//! | Update user     | PUT    | `/users/{id}/`       |
//!
//! Failures come back as [`ApiError`]: `Transport` when the request never
//! completed, `Request` when the server answered with a non-success status.

pub mod backend;
pub mod base_url;
pub mod client;
pub mod error;
pub mod types;

pub use backend::QaBackend;
pub use client::ApiClient;
pub use error::ApiError;
pub use types::{Chunk, Document, NewChunk, NewDocument, NewUser, Payload, User};
