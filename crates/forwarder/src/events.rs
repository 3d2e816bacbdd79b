//! The fixed set of semantic events the forwarder subscribes to, and the
//! vendor event type each one is reported as.

use std::fmt;
use std::str::FromStr;

use serde::{Deserialize, Serialize};

use pixel_core::PixelError;

#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq, Hash)]
pub enum StandardEvent {
    PageView,
    ViewContent,
    AddToCart,
    AddToWishlist,
    Search,
    Purchase,
    Lead,
    SignUp,
    Custom,
}

impl StandardEvent {
    pub const ALL: [StandardEvent; 9] = [
        StandardEvent::PageView,
        StandardEvent::ViewContent,
        StandardEvent::AddToCart,
        StandardEvent::AddToWishlist,
        StandardEvent::Search,
        StandardEvent::Purchase,
        StandardEvent::Lead,
        StandardEvent::SignUp,
        StandardEvent::Custom,
    ];

    /// Name the host dispatches the event under.
    pub fn listener_name(self) -> &'static str {
        match self {
            StandardEvent::PageView => "pageview",
            StandardEvent::ViewContent => "ViewContent",
            StandardEvent::AddToCart => "AddToCart",
            StandardEvent::AddToWishlist => "AddToWishlist",
            StandardEvent::Search => "Search",
            StandardEvent::Purchase => "Purchase",
            StandardEvent::Lead => "Lead",
            StandardEvent::SignUp => "SignUp",
            StandardEvent::Custom => "Custom",
        }
    }

    /// Event type sent to the vendor in the `event` parameter.
    pub fn vendor_event_type(self) -> &'static str {
        match self {
            StandardEvent::PageView => "PageVisit",
            other => other.listener_name(),
        }
    }
}

impl fmt::Display for StandardEvent {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.listener_name())
    }
}

impl FromStr for StandardEvent {
    type Err = PixelError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        StandardEvent::ALL
            .into_iter()
            .find(|e| e.listener_name() == s)
            .ok_or_else(|| PixelError::UnknownEvent(s.to_string()))
    }
}
