//! Binds the forwarder to the host's event dispatch.
//!
//! [`subscribe`] registers one listener per [`StandardEvent`]; each listener
//! forwards under the vendor event type for its name. [`EventRouter`] is a
//! minimal in-process [`Manager`] for hosts that hand over raw event names.

use std::collections::HashMap;
use std::sync::Arc;

use async_trait::async_trait;
use tracing::info;

use pixel_core::{Event, PixelError, PixelResult};

use crate::events::StandardEvent;
use crate::forwarder::PixelForwarder;

#[async_trait]
pub trait EventListener: Send + Sync {
    async fn on_event(&self, event: &Event) -> PixelResult<()>;
}

/// Host-side registration surface.
pub trait Manager {
    fn add_event_listener(&mut self, name: &str, listener: Arc<dyn EventListener>);
}

/// Listener that forwards a single standard event.
pub struct ForwardingListener {
    event: StandardEvent,
    forwarder: Arc<PixelForwarder>,
}

impl ForwardingListener {
    pub fn new(event: StandardEvent, forwarder: Arc<PixelForwarder>) -> Self {
        Self { event, forwarder }
    }
}

#[async_trait]
impl EventListener for ForwardingListener {
    async fn on_event(&self, event: &Event) -> PixelResult<()> {
        self.forwarder
            .handle(self.event.vendor_event_type(), event)
            .await
            .map(|_| ())
    }
}

/// Register the forwarder for every standard event.
pub fn subscribe<M: Manager + ?Sized>(manager: &mut M, forwarder: Arc<PixelForwarder>) {
    for event in StandardEvent::ALL {
        manager.add_event_listener(
            event.listener_name(),
            Arc::new(ForwardingListener::new(event, forwarder.clone())),
        );
    }
    info!(
        platform = forwarder.platform(),
        events = StandardEvent::ALL.len(),
        "pixel forwarder subscribed"
    );
}

#[derive(Default)]
pub struct EventRouter {
    listeners: HashMap<String, Vec<Arc<dyn EventListener>>>,
}

impl EventRouter {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn is_subscribed(&self, name: &str) -> bool {
        self.listeners.contains_key(name)
    }

    pub fn subscribed_names(&self) -> Vec<&str> {
        let mut names: Vec<&str> = self.listeners.keys().map(String::as_str).collect();
        names.sort_unstable();
        names
    }

    /// Deliver `event` to every listener registered under `event.name`.
    /// Returns the number of listeners invoked.
    pub async fn dispatch(&self, event: &Event) -> PixelResult<usize> {
        let listeners = self
            .listeners
            .get(&event.name)
            .ok_or_else(|| PixelError::UnknownEvent(event.name.clone()))?;
        for listener in listeners {
            listener.on_event(event).await?;
        }
        Ok(listeners.len())
    }
}

impl Manager for EventRouter {
    fn add_event_listener(&mut self, name: &str, listener: Arc<dyn EventListener>) {
        self.listeners
            .entry(name.to_string())
            .or_default()
            .push(listener);
    }
}
