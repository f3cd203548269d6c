//! Outbound notifications toward the display layer.
//!
//! The core fires these and forgets them: listeners are passive, delivery
//! has no acknowledgment, and no core state depends on a listener running.
//! This is the whole UI contract -- rendering, animation playback, and
//! widget updates live entirely on the other side.

use crate::factory::FactoryId;

/// A fire-and-forget notification to the display layer.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Notification {
    /// The gem total changed.
    GemsChanged { total: u64 },

    /// A user-facing message (upgrade succeeded, not enough gems, ...).
    Message { text: String, success: bool },

    /// A factory produced gems this tick; the display layer may play its
    /// production animation.
    ProductionPulse { factory: FactoryId },
}

/// Passive listener registry for [`Notification`]s.
///
/// `emit` never fails and never blocks on a listener; a session with no
/// listeners registered is perfectly valid (headless mode).
#[derive(Default)]
pub struct NotificationBus {
    listeners: Vec<Box<dyn FnMut(&Notification)>>,
}

impl NotificationBus {
    pub fn new() -> Self {
        Self::default()
    }

    /// Register a passive listener. Listeners are invoked in registration
    /// order on every emit.
    pub fn subscribe(&mut self, listener: impl FnMut(&Notification) + 'static) {
        self.listeners.push(Box::new(listener));
    }

    /// Deliver a notification to every listener.
    pub fn emit(&mut self, notification: Notification) {
        for listener in &mut self.listeners {
            listener(&notification);
        }
    }
}

impl std::fmt::Debug for NotificationBus {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("NotificationBus")
            .field("listeners", &self.listeners.len())
            .finish()
    }
}
