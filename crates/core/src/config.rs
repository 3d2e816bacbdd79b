use std::path::Path;

use serde::Deserialize;
use url::Url;

use crate::error::{PixelError, PixelResult};

/// Root application configuration. Loaded from an optional TOML file and
/// environment variables with the prefix `PIXEL_RELAY__`.
#[derive(Debug, Clone, Default, Deserialize)]
pub struct AppConfig {
    #[serde(default)]
    pub forwarder: ForwarderConfig,
    #[serde(default)]
    pub http: HttpConfig,
}

/// Settings for the pixel forwarder. Everything the vendor hardcodes in its
/// snippet lives here so it can be swapped per deployment.
#[derive(Debug, Clone, Deserialize)]
pub struct ForwarderConfig {
    #[serde(default = "default_endpoint")]
    pub endpoint: String,
    #[serde(default = "default_integration")]
    pub integration: String,
    #[serde(default = "default_version_tag")]
    pub version_tag: String,
    #[serde(default)]
    pub opt_out: bool,
    /// Advertiser account id, sent as `id` when set.
    #[serde(default)]
    pub advertiser_id: Option<String>,
    /// Shared secret for request signing. Signing is off when unset.
    #[serde(default)]
    pub signing_secret: Option<String>,
    #[serde(default = "default_include_screen")]
    pub include_screen: bool,
    #[serde(default = "default_cookie_name")]
    pub cookie_name: String,
}

#[derive(Debug, Clone, Deserialize)]
pub struct HttpConfig {
    #[serde(default = "default_user_agent")]
    pub user_agent: String,
}

fn default_endpoint() -> String {
    "https://alb.reddit.com/rp.gif".to_string()
}
fn default_integration() -> String {
    "reddit".to_string()
}
fn default_version_tag() -> String {
    "rdt_65e23bc4".to_string()
}
fn default_include_screen() -> bool {
    true
}
fn default_cookie_name() -> String {
    "reddit_uuid".to_string()
}
fn default_user_agent() -> String {
    concat!("pixel-relay/", env!("CARGO_PKG_VERSION")).to_string()
}

impl Default for ForwarderConfig {
    fn default() -> Self {
        Self {
            endpoint: default_endpoint(),
            integration: default_integration(),
            version_tag: default_version_tag(),
            opt_out: false,
            advertiser_id: None,
            signing_secret: None,
            include_screen: default_include_screen(),
            cookie_name: default_cookie_name(),
        }
    }
}

impl Default for HttpConfig {
    fn default() -> Self {
        Self {
            user_agent: default_user_agent(),
        }
    }
}

impl ForwarderConfig {
    /// Parsed pixel endpoint.
    pub fn endpoint_url(&self) -> PixelResult<Url> {
        Ok(Url::parse(&self.endpoint)?)
    }

    pub fn validate(&self) -> PixelResult<()> {
        if self.endpoint.is_empty() {
            return Err(PixelError::Config("endpoint must not be empty".into()));
        }
        let url = self.endpoint_url()?;
        if url.scheme() != "https" {
            return Err(PixelError::Config(format!(
                "endpoint must use https, got '{}'",
                url.scheme()
            )));
        }
        if self.advertiser_id.as_deref().is_some_and(str::is_empty) {
            return Err(PixelError::Config(
                "advertiser_id must not be empty when set".into(),
            ));
        }
        if self.signing_secret.as_deref().is_some_and(str::is_empty) {
            return Err(PixelError::Config(
                "signing_secret must not be empty when set".into(),
            ));
        }
        if self.cookie_name.is_empty() {
            return Err(PixelError::Config("cookie_name must not be empty".into()));
        }
        Ok(())
    }
}

impl AppConfig {
    /// Load configuration from environment variables and an optional config file.
    pub fn load(path: Option<&Path>) -> PixelResult<Self> {
        let mut builder = config::Config::builder();
        if let Some(path) = path {
            builder = builder.add_source(config::File::from(path).required(true));
        }
        let config = builder
            .add_source(
                config::Environment::with_prefix("PIXEL_RELAY")
                    .separator("__")
                    .try_parsing(true),
            )
            .build()?;
        Ok(config.try_deserialize()?)
    }
}
