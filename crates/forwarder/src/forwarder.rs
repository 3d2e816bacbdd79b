//! Pixel forwarder — resolves the visitor identity, has the adaptor shape
//! the request, fires it through the client, and refreshes the identity
//! cookie.

use std::sync::Arc;

use chrono::{DateTime, Utc};
use tracing::debug;

use pixel_core::{CookieOptions, Event, ForwarderConfig, PixelRequest, PixelResult};

use crate::adaptors::reddit::RedditAdaptor;
use crate::adaptors::{EventContext, PixelAdaptor};
use crate::identity;

pub struct PixelForwarder {
    adaptor: Arc<dyn PixelAdaptor>,
    cookie_name: String,
}

impl PixelForwarder {
    pub fn new(adaptor: Arc<dyn PixelAdaptor>, cookie_name: impl Into<String>) -> Self {
        Self {
            adaptor,
            cookie_name: cookie_name.into(),
        }
    }

    /// Validate `config` and build a forwarder backed by the Reddit adaptor.
    pub fn from_config(config: &ForwarderConfig) -> PixelResult<Self> {
        let adaptor = RedditAdaptor::new(config.clone())?;
        adaptor.validate_config()?;
        Ok(Self::new(Arc::new(adaptor), config.cookie_name.clone()))
    }

    pub fn platform(&self) -> &str {
        self.adaptor.platform()
    }

    pub fn cookie_name(&self) -> &str {
        &self.cookie_name
    }

    /// Forward one event, stamped with the current time.
    pub async fn handle(&self, event_type: &str, event: &Event) -> PixelResult<PixelRequest> {
        self.handle_at(event_type, event, Utc::now()).await
    }

    /// Forward one event as if it happened at `now`.
    ///
    /// Returns once the request has been handed to the client; delivery
    /// outcome is the client's concern.
    pub async fn handle_at(
        &self,
        event_type: &str,
        event: &Event,
        now: DateTime<Utc>,
    ) -> PixelResult<PixelRequest> {
        let client = &event.client;
        let ts_ms = now.timestamp_millis();
        let existing = client.get(&self.cookie_name);
        let uuid = identity::resolve_uuid(existing.as_deref());

        let ctx = EventContext {
            event_type,
            payload: &event.payload,
            ts_ms,
            uuid,
            page_url: client.url(),
            screen_width: client.screen_width(),
            screen_height: client.screen_height(),
        };
        let request = self.adaptor.build_request(&ctx)?;

        client.fetch(request.clone()).await?;
        client.set(
            &self.cookie_name,
            &identity::cookie_value(ts_ms, &uuid),
            CookieOptions::infinite(),
        );

        debug!(
            platform = self.adaptor.platform(),
            event = event_type,
            %uuid,
            reused_identity = existing.is_some(),
            "pixel forwarded"
        );

        Ok(request)
    }
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use super::*;
    use crate::clients::recording::RecordingClient;
    use chrono::Duration;
    use pixel_core::{CookieScope, Payload, PayloadValue};
    use url::Url;
    use uuid::Uuid;

    fn forwarder() -> PixelForwarder {
        PixelForwarder::from_config(&ForwarderConfig {
            advertiser_id: Some("t2_test".into()),
            ..Default::default()
        })
        .unwrap()
    }

    fn event_for(client: Arc<RecordingClient>) -> Event {
        let mut payload = Payload::new();
        payload.insert("custom_payload".into(), PayloadValue::from("custom content"));
        Event::new("pageview", payload, client)
    }

    #[tokio::test]
    async fn test_fresh_visitor_gets_new_identity() {
        let client = Arc::new(RecordingClient::new(
            Url::parse("http://127.0.0.1:1337").unwrap(),
        ));
        let request = forwarder()
            .handle("PageVisit", &event_for(client.clone()))
            .await
            .unwrap();

        let fetched = client.fetched();
        assert_eq!(fetched.len(), 1);
        assert_eq!(fetched[0], request);
        assert_eq!(
            request.query_param("custom_payload").as_deref(),
            Some("custom content")
        );

        let uuid = request.query_param("uuid").unwrap();
        assert_eq!(Uuid::parse_str(&uuid).unwrap().get_version_num(), 4);

        let writes = client.cookie_writes();
        assert_eq!(writes.len(), 1);
        assert_eq!(writes[0].key, "reddit_uuid");
        assert_eq!(writes[0].options.scope, CookieScope::Infinite);
        let (ts, cookie_uuid) = writes[0].value.split_once('.').unwrap();
        assert_eq!(cookie_uuid, uuid);
        assert_eq!(Some(ts.to_string()), request.query_param("ts"));
    }

    #[tokio::test]
    async fn test_returning_visitor_keeps_identity() {
        let existing = Uuid::new_v4();
        let day_old = (Utc::now() - Duration::hours(24)).timestamp_millis();
        let client = Arc::new(
            RecordingClient::new(Url::parse("https://shop.example/").unwrap())
                .with_cookie("reddit_uuid", &format!("{day_old}.{existing}")),
        );

        let now = Utc::now();
        let request = forwarder()
            .handle_at("AddToCart", &event_for(client.clone()), now)
            .await
            .unwrap();

        assert_eq!(
            request.query_param("uuid").unwrap(),
            existing.hyphenated().to_string()
        );
        assert_eq!(
            client.cookie("reddit_uuid").unwrap().value,
            format!("{}.{}", now.timestamp_millis(), existing)
        );
    }

    #[tokio::test]
    async fn test_ts_within_bounds() {
        let client = Arc::new(RecordingClient::new(
            Url::parse("https://shop.example/").unwrap(),
        ));
        let before = Utc::now().timestamp_millis();
        let request = forwarder()
            .handle("Lead", &event_for(client))
            .await
            .unwrap();
        let after = Utc::now().timestamp_millis();

        let ts: i64 = request.query_param("ts").unwrap().parse().unwrap();
        assert!(ts >= before && ts <= after);
        assert!(ts > after - 86_400_000);
    }

    #[tokio::test]
    async fn test_custom_cookie_name() {
        let forwarder = PixelForwarder::from_config(&ForwarderConfig {
            cookie_name: "_px_id".into(),
            ..Default::default()
        })
        .unwrap();
        assert_eq!(forwarder.cookie_name(), "_px_id");
        assert_eq!(forwarder.platform(), "reddit");

        let client = Arc::new(RecordingClient::new(
            Url::parse("https://shop.example/").unwrap(),
        ));
        forwarder
            .handle("Search", &event_for(client.clone()))
            .await
            .unwrap();
        assert!(client.cookie("_px_id").is_some());
        assert!(client.cookie("reddit_uuid").is_none());
    }

    #[test]
    fn test_from_config_rejects_invalid() {
        let result = PixelForwarder::from_config(&ForwarderConfig {
            endpoint: "http://insecure.example/rp.gif".into(),
            ..Default::default()
        });
        assert!(result.is_err());
    }
}
