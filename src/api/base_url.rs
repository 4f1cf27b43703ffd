//! # Base URL Resolution
//!
//! Every endpoint path is joined under one base URL that always ends with
//! `/api/`. The base comes from the configured backend URL when there is one,
//! normalized so that common mistakes still land on the right prefix:
//!
//! ```text
//! https://host          →  https://host/api/
//! https://host/api      →  https://host/api/
//! https://host/apiqa/   →  https://host/api/
//! ```
//!
//! Without a configured URL the client falls back to the relative `/api/`
//! path on the proxy origin, which only works when something on that origin
//! reverse-proxies to the backend.

use log::warn;

pub const API_SUFFIX: &str = "/api/";
const TYPO_SUFFIX: &str = "/apiqa/";

/// Default origin the relative `/api/` fallback is served from.
pub const DEFAULT_PROXY_ORIGIN: &str = "http://127.0.0.1:3000";

/// Normalize a configured backend URL so it ends with exactly one `/api/`.
pub fn normalize_api_url(raw: &str) -> String {
    let mut norm = raw.trim().to_string();
    if !has_protocol(&norm) {
        warn!(
            "Backend API URL should include a protocol (http/https). Current: {}",
            norm
        );
    }
    if !norm.ends_with('/') {
        norm.push('/');
    }

    // ASCII lowercasing keeps byte offsets stable for the truncation below
    if norm.to_ascii_lowercase().ends_with(TYPO_SUFFIX) {
        norm.truncate(norm.len() - TYPO_SUFFIX.len());
        norm.push_str(API_SUFFIX);
    }

    if !norm.to_ascii_lowercase().ends_with(API_SUFFIX) {
        norm.push_str(&API_SUFFIX[1..]);
    }
    norm
}

/// Resolve the base URL from an optional configured URL.
///
/// Blank configured values count as absent.
pub fn resolve_base_url(configured: Option<&str>, proxy_origin: &str) -> String {
    match configured.map(str::trim).filter(|s| !s.is_empty()) {
        Some(url) => normalize_api_url(url),
        None => {
            let base = format!("{}{}", proxy_origin.trim().trim_end_matches('/'), API_SUFFIX);
            warn!(
                "Backend API URL is not set; using relative '{}' on {}. This requires that origin \
                 to reverse-proxy to the backend. Set QANDA_API_URL to the backend's full URL \
                 (ending with /api/) otherwise.",
                API_SUFFIX, base
            );
            base
        }
    }
}

/// Join a resource path under the base URL without doubling slashes.
pub fn join(base_url: &str, path: &str) -> String {
    format!("{}{}", base_url, path.trim_start_matches('/'))
}

fn has_protocol(url: &str) -> bool {
    match url.find("://") {
        Some(idx) => idx > 0 && url[..idx].chars().all(|c| c.is_ascii_alphabetic()),
        None => false,
    }
}
