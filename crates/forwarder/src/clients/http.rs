//! Live client: sends pixel requests with reqwest and keeps cookies in
//! memory for the lifetime of the client.
//!
//! Requests are spawned onto the tokio runtime so `fetch` returns as soon as
//! the request is in flight. Call [`HttpClient::drain`] before shutdown to
//! let outstanding requests finish.

use async_trait::async_trait;
use parking_lot::Mutex;
use reqwest::header::COOKIE;
use tokio::task::JoinHandle;
use tracing::{debug, warn};
use url::Url;

use pixel_core::config::HttpConfig;
use pixel_core::{
    Client, CookieOptions, Credentials, PixelError, PixelRequest, PixelResult, RequestMode,
};

use super::CookieJar;

pub struct HttpClient {
    url: Url,
    screen: Option<(u32, u32)>,
    jar: CookieJar,
    http: reqwest::Client,
    pending: Mutex<Vec<JoinHandle<()>>>,
}

impl HttpClient {
    pub fn new(config: &HttpConfig, url: Url) -> PixelResult<Self> {
        let http = reqwest::Client::builder()
            .user_agent(config.user_agent.as_str())
            .build()
            .map_err(|e| PixelError::Transport(e.to_string()))?;
        Ok(Self::with_http(http, url))
    }

    /// Build around an existing reqwest client.
    pub fn with_http(http: reqwest::Client, url: Url) -> Self {
        Self {
            url,
            screen: None,
            jar: CookieJar::new(),
            http,
            pending: Mutex::new(Vec::new()),
        }
    }

    pub fn with_screen(mut self, width: u32, height: u32) -> Self {
        self.screen = Some((width, height));
        self
    }

    pub fn jar(&self) -> &CookieJar {
        &self.jar
    }

    /// Number of tracked requests. Finished ones are pruned on the next
    /// fetch or drain.
    pub fn pending(&self) -> usize {
        self.pending.lock().len()
    }

    fn track(&self, handle: JoinHandle<()>) {
        let mut pending = self.pending.lock();
        pending.retain(|h| !h.is_finished());
        pending.push(handle);
    }

    /// Wait for every in-flight request to settle.
    pub async fn drain(&self) {
        let handles = std::mem::take(&mut *self.pending.lock());
        for handle in handles {
            if let Err(e) = handle.await {
                warn!(error = %e, "pixel request task failed");
            }
        }
    }
}

#[async_trait]
impl Client for HttpClient {
    fn url(&self) -> &Url {
        &self.url
    }

    fn get(&self, key: &str) -> Option<String> {
        self.jar.get(key)
    }

    fn set(&self, key: &str, value: &str, options: CookieOptions) {
        self.jar.set(key, value, options);
    }

    fn screen_width(&self) -> Option<u32> {
        self.screen.map(|(w, _)| w)
    }

    fn screen_height(&self) -> Option<u32> {
        self.screen.map(|(_, h)| h)
    }

    async fn fetch(&self, request: PixelRequest) -> PixelResult<()> {
        let mut builder = self.http.get(request.url.clone());
        if request.options.credentials == Credentials::Include {
            if let Some(header) = self.jar.cookie_header() {
                builder = builder.header(COOKIE, header);
            }
        }
        let opaque = request.options.mode == RequestMode::NoCors;
        let url = request.url;

        let handle = tokio::spawn(async move {
            match builder.send().await {
                Ok(response) => {
                    let status = response.status();
                    if opaque {
                        debug!(%url, %status, "pixel delivered");
                    } else if !status.is_success() {
                        warn!(%url, %status, "pixel rejected");
                    }
                }
                Err(e) => warn!(%url, error = %e, "pixel delivery failed"),
            }
        });
        self.track(handle);
        Ok(())
    }
}
