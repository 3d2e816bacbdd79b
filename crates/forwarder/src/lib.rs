#![warn(clippy::unwrap_used)]

//! Conversion pixel forwarding — turns host commerce events into vendor
//! tracking-pixel requests and maintains the first-party identity cookie.
//!
//! # Modules
//!
//! - [`events`] — The standard event set and vendor event names
//! - [`identity`] — Identity cookie parsing and UUID resolution
//! - [`signer`] — Optional HMAC-SHA256 request signing
//! - [`adaptors`] — Vendor request shaping (Reddit)
//! - [`forwarder`] — Per-event forwarding with cookie refresh
//! - [`subscription`] — Host event registration and routing
//! - [`clients`] — Recording and live HTTP clients

pub mod adaptors;
pub mod clients;
pub mod events;
pub mod forwarder;
pub mod identity;
pub mod signer;
pub mod subscription;

pub use adaptors::reddit::RedditAdaptor;
pub use adaptors::PixelAdaptor;
pub use clients::http::HttpClient;
pub use clients::recording::RecordingClient;
pub use events::StandardEvent;
pub use forwarder::PixelForwarder;
pub use signer::RequestSigner;
pub use subscription::{subscribe, EventListener, EventRouter, Manager};
