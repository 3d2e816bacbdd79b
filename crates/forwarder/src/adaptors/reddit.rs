//! Reddit conversion pixel adaptor — spreads the host payload into the
//! `rp.gif` query string, stamps identity and vendor constants, and
//! optionally signs the request.

use std::collections::BTreeMap;

use tracing::debug;
use url::Url;

use pixel_core::{FetchOptions, ForwarderConfig, PixelRequest, PixelResult};

use super::{EventContext, PixelAdaptor};
use crate::signer::{signing_message, RequestSigner};

/// Landing-page query parameter carrying the ad click id.
pub const CLICK_ID_PARAM: &str = "rdt_cid";

/// Keys stripped from the final query string even if the host payload sets them.
const SUPPRESSED_KEYS: &[&str] = &["timestamp"];

/// Keys owned by the client's screen report; never taken from the payload.
const SCREEN_KEYS: &[&str] = &["sh", "sw"];

pub struct RedditAdaptor {
    config: ForwarderConfig,
    endpoint: Url,
    signer: Option<RequestSigner>,
}

impl RedditAdaptor {
    pub fn new(config: ForwarderConfig) -> PixelResult<Self> {
        let endpoint = config.endpoint_url()?;
        let signer = config.signing_secret.as_deref().map(RequestSigner::new);
        Ok(Self {
            config,
            endpoint,
            signer,
        })
    }

    pub fn config(&self) -> &ForwarderConfig {
        &self.config
    }

    pub fn is_signing(&self) -> bool {
        self.signer.is_some()
    }

    fn click_id(page_url: &Url) -> Option<String> {
        page_url
            .query_pairs()
            .find(|(k, _)| k == CLICK_ID_PARAM)
            .map(|(_, v)| v.into_owned())
            .filter(|v| !v.is_empty())
    }

    fn sign(&self, params: &BTreeMap<String, String>) -> PixelResult<Option<String>> {
        let Some(ref signer) = self.signer else {
            return Ok(None);
        };
        let field = |key: &str| params.get(key).map(String::as_str);
        let message = signing_message(
            field("id").unwrap_or_default(),
            field("event").unwrap_or_default(),
            field("ts").unwrap_or_default(),
            field("click_id"),
            field("uuid"),
        );
        signer.sign(&message).map(Some)
    }
}

impl PixelAdaptor for RedditAdaptor {
    fn platform(&self) -> &str {
        "reddit"
    }

    fn build_request(&self, ctx: &EventContext<'_>) -> PixelResult<PixelRequest> {
        // Host payload first so the fields below win on collision.
        let mut params: BTreeMap<String, String> = ctx
            .payload
            .iter()
            .map(|(k, v)| (k.clone(), v.as_query_value()))
            .collect();

        params.insert("event".into(), ctx.event_type.to_string());
        if let Some(ref id) = self.config.advertiser_id {
            params.insert("id".into(), id.clone());
        }
        params.insert("ts".into(), ctx.ts_ms.to_string());
        params.insert("uuid".into(), ctx.uuid.hyphenated().to_string());
        if let Some(click_id) = Self::click_id(ctx.page_url) {
            params.insert("click_id".into(), click_id);
        }

        params.insert("integration".into(), self.config.integration.clone());
        params.insert(
            "opt_out".into(),
            if self.config.opt_out { "1" } else { "0" }.into(),
        );
        params.insert("v".into(), self.config.version_tag.clone());
        for key in SCREEN_KEYS {
            params.remove(*key);
        }
        if self.config.include_screen {
            if let Some(h) = ctx.screen_height {
                params.insert("sh".into(), h.to_string());
            }
            if let Some(w) = ctx.screen_width {
                params.insert("sw".into(), w.to_string());
            }
        }

        if let Some(signature) = self.sign(&params)? {
            params.insert("s".into(), signature);
        }

        for key in SUPPRESSED_KEYS {
            params.remove(*key);
        }

        let mut url = self.endpoint.clone();
        url.query_pairs_mut().clear().extend_pairs(params.iter());

        debug!(
            event = ctx.event_type,
            uuid = %ctx.uuid,
            click_id = params.get("click_id").map(String::as_str),
            signed = self.signer.is_some(),
            "reddit pixel request built"
        );

        Ok(PixelRequest {
            url,
            options: FetchOptions::pixel(),
        })
    }

    fn validate_config(&self) -> PixelResult<()> {
        self.config.validate()
    }
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use super::*;
    use base64::Engine;
    use hmac::{Hmac, Mac};
    use pixel_core::{Payload, PayloadValue};
    use sha2::Sha256;
    use uuid::Uuid;

    const SECRET: &str = "test-shared-secret";

    fn test_config() -> ForwarderConfig {
        ForwarderConfig {
            advertiser_id: Some("t2_advertiser".into()),
            ..Default::default()
        }
    }

    fn build(adaptor: &RedditAdaptor, payload: &Payload, page: &str) -> PixelRequest {
        let page_url = Url::parse(page).unwrap();
        let ctx = EventContext {
            event_type: "Purchase",
            payload,
            ts_ms: 1_700_000_000_000,
            uuid: Uuid::parse_str("6f1c2a34-9b1e-4c5d-8e7f-0a1b2c3d4e5f").unwrap(),
            page_url: &page_url,
            screen_width: Some(1920),
            screen_height: Some(1080),
        };
        adaptor.build_request(&ctx).unwrap()
    }

    #[test]
    fn test_fixed_fields() {
        let adaptor = RedditAdaptor::new(test_config()).unwrap();
        let request = build(&adaptor, &Payload::new(), "https://shop.example/cart");

        assert_eq!(request.url.host_str(), Some("alb.reddit.com"));
        assert_eq!(request.url.path(), "/rp.gif");
        assert_eq!(request.query_param("event").as_deref(), Some("Purchase"));
        assert_eq!(request.query_param("id").as_deref(), Some("t2_advertiser"));
        assert_eq!(request.query_param("ts").as_deref(), Some("1700000000000"));
        assert_eq!(
            request.query_param("uuid").as_deref(),
            Some("6f1c2a34-9b1e-4c5d-8e7f-0a1b2c3d4e5f")
        );
        assert_eq!(request.query_param("integration").as_deref(), Some("reddit"));
        assert_eq!(request.query_param("opt_out").as_deref(), Some("0"));
        assert_eq!(request.query_param("v").as_deref(), Some("rdt_65e23bc4"));
        assert_eq!(request.query_param("sw").as_deref(), Some("1920"));
        assert_eq!(request.query_param("sh").as_deref(), Some("1080"));
        assert!(request.query_param("click_id").is_none());
        assert!(request.query_param("s").is_none());
        assert_eq!(request.options, FetchOptions::pixel());
    }

    #[test]
    fn test_payload_spread_and_overrides() {
        let adaptor = RedditAdaptor::new(test_config()).unwrap();
        let mut payload = Payload::new();
        payload.insert("m.value".into(), PayloadValue::from("19.99"));
        payload.insert("m.itemCount".into(), PayloadValue::from(2i64));
        payload.insert("event".into(), PayloadValue::from("spoofed"));
        payload.insert("id".into(), PayloadValue::from("spoofed"));
        payload.insert("timestamp".into(), PayloadValue::from(1234i64));

        let request = build(&adaptor, &payload, "https://shop.example/");
        assert_eq!(request.query_param("m.value").as_deref(), Some("19.99"));
        assert_eq!(request.query_param("m.itemCount").as_deref(), Some("2"));
        assert_eq!(request.query_param("event").as_deref(), Some("Purchase"));
        assert_eq!(request.query_param("id").as_deref(), Some("t2_advertiser"));
        assert!(request.query_param("timestamp").is_none());
    }

    #[test]
    fn test_click_id_from_page_url() {
        let adaptor = RedditAdaptor::new(test_config()).unwrap();
        let request = build(
            &adaptor,
            &Payload::new(),
            "https://shop.example/landing?utm_source=reddit&rdt_cid=abc%20123",
        );
        assert_eq!(request.query_param("click_id").as_deref(), Some("abc 123"));

        let empty = build(&adaptor, &Payload::new(), "https://shop.example/?rdt_cid=");
        assert!(empty.query_param("click_id").is_none());
    }

    #[test]
    fn test_without_advertiser_id() {
        let adaptor = RedditAdaptor::new(ForwarderConfig::default()).unwrap();
        let request = build(&adaptor, &Payload::new(), "https://shop.example/");
        assert!(request.query_param("id").is_none());
    }

    #[test]
    fn test_screen_excluded() {
        let adaptor = RedditAdaptor::new(ForwarderConfig {
            include_screen: false,
            ..test_config()
        })
        .unwrap();
        let request = build(&adaptor, &Payload::new(), "https://shop.example/");
        assert!(request.query_param("sw").is_none());
        assert!(request.query_param("sh").is_none());
    }

    #[test]
    fn test_payload_screen_fields_not_forwarded() {
        let mut payload = Payload::new();
        payload.insert("sw".into(), PayloadValue::from("9999"));
        payload.insert("sh".into(), PayloadValue::from("9999"));

        let hidden = RedditAdaptor::new(ForwarderConfig {
            include_screen: false,
            ..test_config()
        })
        .unwrap();
        let request = build(&hidden, &payload, "https://shop.example/");
        assert!(request.query_param("sw").is_none());
        assert!(request.query_param("sh").is_none());

        let shown = RedditAdaptor::new(test_config()).unwrap();
        let request = build(&shown, &payload, "https://shop.example/");
        assert_eq!(request.query_param("sw").as_deref(), Some("1920"));
        assert_eq!(request.query_param("sh").as_deref(), Some("1080"));

        let page_url = Url::parse("https://shop.example/").unwrap();
        let ctx = EventContext {
            event_type: "Lead",
            payload: &payload,
            ts_ms: 1_700_000_000_000,
            uuid: Uuid::new_v4(),
            page_url: &page_url,
            screen_width: None,
            screen_height: None,
        };
        let request = shown.build_request(&ctx).unwrap();
        assert!(request.query_param("sw").is_none());
        assert!(request.query_param("sh").is_none());
    }

    #[test]
    fn test_opt_out_flag() {
        let adaptor = RedditAdaptor::new(ForwarderConfig {
            opt_out: true,
            ..test_config()
        })
        .unwrap();
        let request = build(&adaptor, &Payload::new(), "https://shop.example/");
        assert_eq!(request.query_param("opt_out").as_deref(), Some("1"));
    }

    #[test]
    fn test_signature_matches_recomputed_hmac() {
        let adaptor = RedditAdaptor::new(ForwarderConfig {
            signing_secret: Some(SECRET.into()),
            ..test_config()
        })
        .unwrap();
        assert!(adaptor.is_signing());
        let request = build(&adaptor, &Payload::new(), "https://shop.example/");

        let message = format!(
            "{}{}{}{}",
            request.query_param("id").unwrap(),
            request.query_param("event").unwrap(),
            request.query_param("ts").unwrap(),
            request.query_param("uuid").unwrap(),
        );
        let mut mac = Hmac::<Sha256>::new_from_slice(SECRET.as_bytes()).unwrap();
        mac.update(message.as_bytes());
        let expected =
            base64::engine::general_purpose::STANDARD.encode(mac.finalize().into_bytes());

        assert_eq!(request.query_param("s").unwrap(), expected);
    }

    #[test]
    fn test_signature_covers_click_id() {
        let adaptor = RedditAdaptor::new(ForwarderConfig {
            signing_secret: Some(SECRET.into()),
            ..test_config()
        })
        .unwrap();
        let plain = build(&adaptor, &Payload::new(), "https://shop.example/");
        let clicked = build(&adaptor, &Payload::new(), "https://shop.example/?rdt_cid=xyz");
        assert_ne!(plain.query_param("s"), clicked.query_param("s"));

        let message = signing_message(
            "t2_advertiser",
            "Purchase",
            "1700000000000",
            Some("xyz"),
            Some("6f1c2a34-9b1e-4c5d-8e7f-0a1b2c3d4e5f"),
        );
        let expected = RequestSigner::new(SECRET).sign(&message).unwrap();
        assert_eq!(clicked.query_param("s").unwrap(), expected);
    }

    #[test]
    fn test_validate_config() {
        let adaptor = RedditAdaptor::new(test_config()).unwrap();
        assert!(adaptor.validate_config().is_ok());
        assert_eq!(adaptor.platform(), "reddit");

        let bad = RedditAdaptor::new(ForwarderConfig {
            endpoint: "http://alb.reddit.com/rp.gif".into(),
            ..Default::default()
        })
        .unwrap();
        assert!(bad.validate_config().is_err());
    }
}
