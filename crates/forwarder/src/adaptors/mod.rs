//! Adaptors for translating host events into vendor pixel requests.
//!
//! Each adaptor implements [`PixelAdaptor`] to turn an [`EventContext`] into
//! the exact [`PixelRequest`] its vendor expects. Adaptors are pure: cookie
//! access and network I/O stay in the forwarder.

pub mod reddit;

use pixel_core::{Payload, PixelRequest, PixelResult};
use url::Url;
use uuid::Uuid;

/// Everything an adaptor needs to shape one pixel request.
#[derive(Debug, Clone)]
pub struct EventContext<'a> {
    /// Vendor event type (e.g. "PageVisit").
    pub event_type: &'a str,
    pub payload: &'a Payload,
    /// Event time in epoch milliseconds.
    pub ts_ms: i64,
    pub uuid: Uuid,
    pub page_url: &'a Url,
    pub screen_width: Option<u32>,
    pub screen_height: Option<u32>,
}

/// Adaptor trait — shapes an event into a vendor pixel request.
pub trait PixelAdaptor: Send + Sync {
    /// Platform identifier (e.g. "reddit").
    fn platform(&self) -> &str;

    /// Build the outbound request for one event.
    fn build_request(&self, ctx: &EventContext<'_>) -> PixelResult<PixelRequest>;

    /// Validate that the adaptor configuration is correct.
    fn validate_config(&self) -> PixelResult<()>;
}
