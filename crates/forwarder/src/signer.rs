//! HMAC-SHA256 request signing. The vendor recomputes the MAC over the same
//! fields to check the pixel came from a holder of the shared secret.

use base64::Engine;
use hmac::{Hmac, Mac};
use sha2::Sha256;

use pixel_core::{PixelError, PixelResult};

type HmacSha256 = Hmac<Sha256>;

#[derive(Clone)]
pub struct RequestSigner {
    secret: Vec<u8>,
}

impl RequestSigner {
    pub fn new(secret: impl Into<Vec<u8>>) -> Self {
        Self {
            secret: secret.into(),
        }
    }

    /// Base64 (standard alphabet, padded) HMAC-SHA256 of `message`.
    pub fn sign(&self, message: &str) -> PixelResult<String> {
        let mut mac = HmacSha256::new_from_slice(&self.secret)
            .map_err(|e| PixelError::Signing(e.to_string()))?;
        mac.update(message.as_bytes());
        let signature = mac.finalize().into_bytes();
        Ok(base64::engine::general_purpose::STANDARD.encode(signature))
    }
}

impl std::fmt::Debug for RequestSigner {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("RequestSigner").finish_non_exhaustive()
    }
}

/// Concatenate the signed fields in their fixed order.
pub fn signing_message(
    id: &str,
    event: &str,
    ts: &str,
    click_id: Option<&str>,
    uuid: Option<&str>,
) -> String {
    let mut message = String::with_capacity(
        id.len() + event.len() + ts.len() + click_id.map_or(0, str::len) + uuid.map_or(0, str::len),
    );
    message.push_str(id);
    message.push_str(event);
    message.push_str(ts);
    if let Some(click_id) = click_id {
        message.push_str(click_id);
    }
    if let Some(uuid) = uuid {
        message.push_str(uuid);
    }
    message
}
