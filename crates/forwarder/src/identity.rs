//! First-party identity cookie: `"<ms-epoch>.<uuid>"`.
//!
//! Only a second segment that parses as a UUID is reused. Anything else,
//! including a well-formed `"<ts>.<opaque-id>"` pair, is replaced with a
//! fresh v4 UUID so the forwarded `uuid` is always canonical.

use uuid::Uuid;

/// Extract the UUID segment from an identity cookie value. Returns `None`
/// when the value has no second segment or it is not a UUID.
pub fn parse_cookie_uuid(value: &str) -> Option<Uuid> {
    let mut segments = value.split('.');
    segments.next()?;
    let candidate = segments.next()?;
    Uuid::parse_str(candidate).ok()
}

/// Reuse the UUID from an existing cookie, or mint a fresh v4 one.
pub fn resolve_uuid(cookie: Option<&str>) -> Uuid {
    match cookie {
        Some(value) => parse_cookie_uuid(value).unwrap_or_else(|| {
            tracing::warn!(cookie = %value, "malformed identity cookie, generating new uuid");
            Uuid::new_v4()
        }),
        None => Uuid::new_v4(),
    }
}

/// Cookie value written back after every event.
pub fn cookie_value(ts_ms: i64, uuid: &Uuid) -> String {
    format!("{ts_ms}.{}", uuid.hyphenated())
}
