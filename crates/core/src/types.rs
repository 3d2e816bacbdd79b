use std::collections::BTreeMap;
use std::fmt;
use std::sync::Arc;

use serde::{Deserialize, Serialize};
use url::Url;

use crate::client::Client;

/// A single payload value as delivered by the host: strings, numbers and
/// the occasional boolean flag.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(untagged)]
pub enum PayloadValue {
    Text(String),
    Number(serde_json::Number),
    Bool(bool),
}

impl PayloadValue {
    /// Textual form used on the query string.
    pub fn as_query_value(&self) -> String {
        match self {
            PayloadValue::Text(s) => s.clone(),
            PayloadValue::Number(n) => n.to_string(),
            PayloadValue::Bool(b) => b.to_string(),
        }
    }
}

impl fmt::Display for PayloadValue {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.as_query_value())
    }
}

impl From<&str> for PayloadValue {
    fn from(value: &str) -> Self {
        PayloadValue::Text(value.to_string())
    }
}

impl From<String> for PayloadValue {
    fn from(value: String) -> Self {
        PayloadValue::Text(value)
    }
}

impl From<i64> for PayloadValue {
    fn from(value: i64) -> Self {
        PayloadValue::Number(value.into())
    }
}

impl From<bool> for PayloadValue {
    fn from(value: bool) -> Self {
        PayloadValue::Bool(value)
    }
}

/// Event payload keyed by field name.
pub type Payload = BTreeMap<String, PayloadValue>;

/// An event delivered by the host runtime. Created per trigger and dropped
/// once forwarded.
#[derive(Clone)]
pub struct Event {
    /// Name the host dispatched the event under (e.g. "pageview").
    pub name: String,
    pub payload: Payload,
    pub client: Arc<dyn Client>,
}

impl Event {
    pub fn new(name: impl Into<String>, payload: Payload, client: Arc<dyn Client>) -> Self {
        Self {
            name: name.into(),
            payload,
            client,
        }
    }
}

impl fmt::Debug for Event {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Event")
            .field("name", &self.name)
            .field("payload", &self.payload)
            .field("client_url", &self.client.url().as_str())
            .finish()
    }
}

#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq)]
#[serde(rename_all = "kebab-case")]
pub enum RequestMode {
    Cors,
    NoCors,
    SameOrigin,
}

#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq)]
#[serde(rename_all = "kebab-case")]
pub enum Credentials {
    Omit,
    SameOrigin,
    Include,
}

/// Options attached to an outbound fetch.
#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq)]
pub struct FetchOptions {
    pub mode: RequestMode,
    pub keepalive: bool,
    pub credentials: Credentials,
}

impl FetchOptions {
    /// Opaque, keep-alive, credentialed request used for tracking pixels.
    pub fn pixel() -> Self {
        Self {
            mode: RequestMode::NoCors,
            keepalive: true,
            credentials: Credentials::Include,
        }
    }
}

/// A fully built pixel request ready to hand to [`Client::fetch`].
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct PixelRequest {
    pub url: Url,
    pub options: FetchOptions,
}

impl PixelRequest {
    /// Look up a single query parameter on the request URL.
    pub fn query_param(&self, key: &str) -> Option<String> {
        self.url
            .query_pairs()
            .find(|(k, _)| k == key)
            .map(|(_, v)| v.into_owned())
    }
}

/// Lifetime of a cookie written through the host.
#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq)]
#[serde(rename_all = "lowercase")]
pub enum CookieScope {
    Page,
    Session,
    Infinite,
}

#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq)]
pub struct CookieOptions {
    pub scope: CookieScope,
}

impl CookieOptions {
    pub fn infinite() -> Self {
        Self {
            scope: CookieScope::Infinite,
        }
    }
}
