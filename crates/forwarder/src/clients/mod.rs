//! [`Client`](pixel_core::Client) implementations: an in-memory recorder for
//! tests and dry runs, and a live HTTP client.

pub mod http;
pub mod recording;

use dashmap::DashMap;
use serde::Serialize;

use pixel_core::{CookieOptions, CookieScope};

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct StoredCookie {
    pub value: String,
    pub scope: CookieScope,
}

/// In-memory cookie store shared by the bundled clients.
#[derive(Debug, Default)]
pub struct CookieJar {
    cookies: DashMap<String, StoredCookie>,
}

impl CookieJar {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn get(&self, key: &str) -> Option<String> {
        self.cookies.get(key).map(|c| c.value.clone())
    }

    pub fn set(&self, key: &str, value: &str, options: CookieOptions) {
        self.cookies.insert(
            key.to_string(),
            StoredCookie {
                value: value.to_string(),
                scope: options.scope,
            },
        );
    }

    pub fn entry(&self, key: &str) -> Option<StoredCookie> {
        self.cookies.get(key).map(|c| c.value().clone())
    }

    /// `Cookie` request header for all stored cookies, sorted by name.
    pub fn cookie_header(&self) -> Option<String> {
        let mut pairs: Vec<(String, String)> = self
            .cookies
            .iter()
            .map(|e| (e.key().clone(), e.value().value.clone()))
            .collect();
        if pairs.is_empty() {
            return None;
        }
        pairs.sort();
        Some(
            pairs
                .into_iter()
                .map(|(k, v)| format!("{k}={v}"))
                .collect::<Vec<_>>()
                .join("; "),
        )
    }

    /// Snapshot of all cookies, sorted by name.
    pub fn snapshot(&self) -> Vec<(String, StoredCookie)> {
        let mut all: Vec<_> = self
            .cookies
            .iter()
            .map(|e| (e.key().clone(), e.value().clone()))
            .collect();
        all.sort_by(|a, b| a.0.cmp(&b.0));
        all
    }
}
