//! Replay input: one page context and the events raised on it.

use std::collections::BTreeMap;
use std::sync::Arc;

use serde::{Deserialize, Serialize};
use tracing::warn;
use url::Url;

use pixel_core::{Client, Event, Payload, PixelError, PixelResult};
use pixel_forwarder::clients::StoredCookie;
use pixel_forwarder::EventRouter;

#[derive(Debug, Clone, Deserialize)]
pub struct Session {
    pub page_url: Url,
    #[serde(default)]
    pub screen_width: Option<u32>,
    #[serde(default)]
    pub screen_height: Option<u32>,
    /// Cookies already present on the client.
    #[serde(default)]
    pub cookies: BTreeMap<String, String>,
    pub events: Vec<SessionEvent>,
}

#[derive(Debug, Clone, Deserialize)]
pub struct SessionEvent {
    pub name: String,
    #[serde(default)]
    pub payload: Payload,
}

impl Session {
    pub fn screen(&self) -> Option<(u32, u32)> {
        self.screen_width.zip(self.screen_height)
    }
}

#[derive(Debug, Serialize)]
pub struct Report {
    pub forwarded: usize,
    pub skipped: usize,
    /// Pixel URLs, only populated on dry runs.
    pub requests: Vec<String>,
    pub cookies: BTreeMap<String, StoredCookie>,
}

/// Dispatch every session event through `router` on `client`. Events nobody
/// listens for are skipped, any other failure aborts the replay.
pub async fn replay(
    router: &EventRouter,
    session: &Session,
    client: Arc<dyn Client>,
) -> PixelResult<(usize, usize)> {
    let mut forwarded = 0;
    let mut skipped = 0;
    for item in &session.events {
        let event = Event::new(item.name.clone(), item.payload.clone(), client.clone());
        match router.dispatch(&event).await {
            Ok(_) => forwarded += 1,
            Err(PixelError::UnknownEvent(name)) => {
                warn!(event = %name, "no listener for event, skipping");
                skipped += 1;
            }
            Err(e) => return Err(e),
        }
    }
    Ok((forwarded, skipped))
}
