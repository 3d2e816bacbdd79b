#![warn(clippy::unwrap_used)]

//! Shared building blocks for the pixel relay: the host event model, the
//! client capability trait, configuration, and the error type.

pub mod client;
pub mod config;
pub mod error;
pub mod types;

pub use client::Client;
pub use config::{AppConfig, ForwarderConfig};
pub use error::{PixelError, PixelResult};
pub use types::{
    CookieOptions, CookieScope, Credentials, Event, FetchOptions, Payload, PayloadValue,
    PixelRequest, RequestMode,
};
