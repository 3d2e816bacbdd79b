//! Pixel Relay — replays host commerce events into vendor conversion pixels.
//!
//! Reads a session (page context plus events) as JSON, routes each event
//! through the pixel forwarder, and prints the resulting cookie jar.

mod session;

use std::path::PathBuf;
use std::sync::Arc;

use anyhow::Context;
use clap::Parser;
use tokio::io::AsyncReadExt;
use tracing::info;

use pixel_core::{AppConfig, Client, CookieOptions};
use pixel_forwarder::{subscribe, EventRouter, HttpClient, PixelForwarder, RecordingClient};

use crate::session::{replay, Report, Session};

#[derive(Parser, Debug)]
#[command(name = "pixel-relay")]
#[command(about = "Forward commerce events to a conversion pixel endpoint")]
#[command(version)]
struct Cli {
    /// Session JSON file (reads stdin when omitted)
    #[arg(long, short)]
    input: Option<PathBuf>,

    /// TOML config file
    #[arg(long, env = "PIXEL_RELAY_CONFIG")]
    config: Option<PathBuf>,

    /// Advertiser id (overrides config)
    #[arg(long, env = "PIXEL_RELAY__FORWARDER__ADVERTISER_ID")]
    advertiser_id: Option<String>,

    /// Build and print pixel requests without sending them
    #[arg(long, default_value_t = false)]
    dry_run: bool,
}

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    tracing_subscriber::fmt()
        .with_env_filter(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| "pixel_relay=info,pixel_forwarder=info".into()),
        )
        .with_writer(std::io::stderr)
        .json()
        .init();

    let cli = Cli::parse();

    let mut config = AppConfig::load(cli.config.as_deref()).context("loading configuration")?;
    if let Some(id) = cli.advertiser_id {
        config.forwarder.advertiser_id = Some(id);
    }

    info!(
        endpoint = %config.forwarder.endpoint,
        advertiser_id = config.forwarder.advertiser_id.as_deref(),
        signing = config.forwarder.signing_secret.is_some(),
        dry_run = cli.dry_run,
        "Configuration loaded"
    );

    let forwarder = Arc::new(PixelForwarder::from_config(&config.forwarder)?);
    let mut router = EventRouter::new();
    subscribe(&mut router, forwarder);

    let raw = match cli.input {
        Some(ref path) => tokio::fs::read_to_string(path)
            .await
            .with_context(|| format!("reading {}", path.display()))?,
        None => {
            let mut buf = String::new();
            tokio::io::stdin().read_to_string(&mut buf).await?;
            buf
        }
    };
    let session: Session = serde_json::from_str(&raw).context("parsing session")?;

    let report = if cli.dry_run {
        let mut client = RecordingClient::new(session.page_url.clone());
        if let Some((w, h)) = session.screen() {
            client = client.with_screen(w, h);
        }
        for (key, value) in &session.cookies {
            client = client.with_cookie(key, value);
        }
        let client = Arc::new(client);
        let (forwarded, skipped) = replay(&router, &session, client.clone()).await?;
        Report {
            forwarded,
            skipped,
            requests: client
                .fetched()
                .into_iter()
                .map(|r| r.url.to_string())
                .collect(),
            cookies: client.jar().snapshot().into_iter().collect(),
        }
    } else {
        let mut client = HttpClient::new(&config.http, session.page_url.clone())?;
        if let Some((w, h)) = session.screen() {
            client = client.with_screen(w, h);
        }
        for (key, value) in &session.cookies {
            client.set(key, value, CookieOptions::infinite());
        }
        let client = Arc::new(client);
        let (forwarded, skipped) = replay(&router, &session, client.clone()).await?;
        client.drain().await;
        Report {
            forwarded,
            skipped,
            requests: Vec::new(),
            cookies: client.jar().snapshot().into_iter().collect(),
        }
    };

    info!(
        forwarded = report.forwarded,
        skipped = report.skipped,
        "Session replayed"
    );
    println!("{}", serde_json::to_string_pretty(&report)?);
    Ok(())
}
