//! Client capabilities supplied by the host runtime for each event.
//!
//! Implementations own cookie storage and network transport; the forwarder
//! only borrows them for the duration of a single event.

use async_trait::async_trait;
use url::Url;

use crate::error::PixelResult;
use crate::types::{CookieOptions, PixelRequest};

#[async_trait]
pub trait Client: Send + Sync {
    /// URL of the page the event was raised on.
    fn url(&self) -> &Url;

    /// Read a cookie value by name.
    fn get(&self, key: &str) -> Option<String>;

    /// Write a cookie, replacing any existing value.
    fn set(&self, key: &str, value: &str, options: CookieOptions);

    /// Screen width in pixels, when the host reports it.
    fn screen_width(&self) -> Option<u32> {
        None
    }

    /// Screen height in pixels, when the host reports it.
    fn screen_height(&self) -> Option<u32> {
        None
    }

    /// Initiate an outbound request. Resolves once the request has been
    /// handed to the transport, not when a response arrives.
    async fn fetch(&self, request: PixelRequest) -> PixelResult<()>;
}
