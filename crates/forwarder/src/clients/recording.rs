//! Client that records fetches and cookie writes instead of touching the
//! network. Used by tests and by `pixel-relay --dry-run`.

use async_trait::async_trait;
use parking_lot::Mutex;
use url::Url;

use pixel_core::{Client, CookieOptions, PixelRequest, PixelResult};

use super::{CookieJar, StoredCookie};

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CookieWrite {
    pub key: String,
    pub value: String,
    pub options: CookieOptions,
}

#[derive(Debug)]
pub struct RecordingClient {
    url: Url,
    screen: Option<(u32, u32)>,
    jar: CookieJar,
    fetched: Mutex<Vec<PixelRequest>>,
    writes: Mutex<Vec<CookieWrite>>,
}

impl RecordingClient {
    pub fn new(url: Url) -> Self {
        Self {
            url,
            screen: None,
            jar: CookieJar::new(),
            fetched: Mutex::new(Vec::new()),
            writes: Mutex::new(Vec::new()),
        }
    }

    /// Seed a cookie without recording it as a write.
    pub fn with_cookie(self, key: &str, value: &str) -> Self {
        self.jar.set(key, value, CookieOptions::infinite());
        self
    }

    pub fn with_screen(mut self, width: u32, height: u32) -> Self {
        self.screen = Some((width, height));
        self
    }

    pub fn fetched(&self) -> Vec<PixelRequest> {
        self.fetched.lock().clone()
    }

    pub fn cookie_writes(&self) -> Vec<CookieWrite> {
        self.writes.lock().clone()
    }

    pub fn cookie(&self, key: &str) -> Option<StoredCookie> {
        self.jar.entry(key)
    }

    pub fn jar(&self) -> &CookieJar {
        &self.jar
    }
}

#[async_trait]
impl Client for RecordingClient {
    fn url(&self) -> &Url {
        &self.url
    }

    fn get(&self, key: &str) -> Option<String> {
        self.jar.get(key)
    }

    fn set(&self, key: &str, value: &str, options: CookieOptions) {
        self.jar.set(key, value, options);
        self.writes.lock().push(CookieWrite {
            key: key.to_string(),
            value: value.to_string(),
            options,
        });
    }

    fn screen_width(&self) -> Option<u32> {
        self.screen.map(|(w, _)| w)
    }

    fn screen_height(&self) -> Option<u32> {
        self.screen.map(|(_, h)| h)
    }

    async fn fetch(&self, request: PixelRequest) -> PixelResult<()> {
        self.fetched.lock().push(request);
        Ok(())
    }
}
