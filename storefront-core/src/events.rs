//! Catalog notifications for decorator components
//!
//! After the product grid is repainted, components that decorate cards
//! (image sliders, tilt effects) need to re-attach to the fresh markup.
//! They subscribe here instead of listening for a page-wide broadcast.

use tokio::sync::broadcast;
use tracing::trace;

const CHANNEL_CAPACITY: usize = 64;

/// Events published by the page controller
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum CatalogEvent {
    /// A container was repainted with a full product grid
    ProductsUpdated { container: String, count: usize },
}

/// Fan-out of [`CatalogEvent`]s to every live subscriber
#[derive(Debug, Clone)]
pub struct EventBus {
    sender: broadcast::Sender<CatalogEvent>,
}

impl Default for EventBus {
    fn default() -> Self {
        Self::new()
    }
}

impl EventBus {
    pub fn new() -> Self {
        let (sender, _) = broadcast::channel(CHANNEL_CAPACITY);
        Self { sender }
    }

    pub fn subscribe(&self) -> broadcast::Receiver<CatalogEvent> {
        self.sender.subscribe()
    }

    /// Deliver `event`; returns how many subscribers received it
    pub fn publish(&self, event: CatalogEvent) -> usize {
        trace!(?event, "Publishing catalog event");
        // No subscribers is normal on pages without decorators
        self.sender.send(event).unwrap_or(0)
    }

    pub fn subscriber_count(&self) -> usize {
        self.sender.receiver_count()
    }
}
