use dashmap::DashMap;

use super::TaskEvent;

pub type SubscriberError = Box<dyn std::error::Error + Send + Sync>;

type Handler = Box<dyn Fn(&TaskEvent) -> Result<(), SubscriberError> + Send + Sync>;

/// In-process publish/subscribe registry for domain events.
///
/// An explicitly constructed instance is shared through `AppState` rather
/// than living in a module-level global, so tests can run isolated buses.
/// Registration happens once at startup; there is no unsubscribe.
pub struct EventBus {
    handlers: DashMap<String, Vec<Handler>>,
}

impl EventBus {
    pub fn new() -> Self {
        Self {
            handlers: DashMap::new(),
        }
    }

    /// Register `handler` for `event_name`. Handlers for the same name are
    /// invoked in registration order.
    pub fn subscribe<F>(&self, event_name: &str, handler: F)
    where
        F: Fn(&TaskEvent) -> Result<(), SubscriberError> + Send + Sync + 'static,
    {
        self.handlers
            .entry(event_name.to_string())
            .or_default()
            .push(Box::new(handler));
    }

    /// Invoke every handler registered for this event's name, in
    /// registration order.
    ///
    /// Fire-and-forget from the caller's perspective: a failing handler is
    /// logged and the remaining handlers still run. The activity log and
    /// notification dispatch are independent concerns and neither may block
    /// the other, nor the mutation that triggered them.
    pub fn publish(&self, event: &TaskEvent) {
        let Some(handlers) = self.handlers.get(event.name()) else {
            return;
        };
        for handler in handlers.iter() {
            if let Err(e) = handler(event) {
                tracing::warn!(event = event.name(), task = event.task_id(), "subscriber failed: {e}");
            }
        }
    }
}

impl Default for EventBus {
    fn default() -> Self {
        Self::new()
    }
}
