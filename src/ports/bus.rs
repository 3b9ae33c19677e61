use crate::game::events::GameEvent;

pub trait EventHandler: Send + Sync {
    fn handle_events(&self, events: &[GameEvent]);
}

/// Fan-out of engine events to any number of observers.
#[derive(Default)]
pub struct EventBus {
    handlers: Vec<Box<dyn EventHandler>>,
}

impl EventBus {
    pub fn new() -> Self {
        EventBus {
            handlers: Vec::new(),
        }
    }

    pub fn register_handler(&mut self, h: Box<dyn EventHandler>) {
        self.handlers.push(h);
    }

    pub fn publish_events(&self, events: &[GameEvent]) {
        if events.is_empty() {
            return;
        }
        for handler in &self.handlers {
            handler.handle_events(events);
        }
    }

    pub fn publish<I>(&self, events: I)
    where
        I: IntoIterator<Item = GameEvent>,
    {
        let events: Vec<GameEvent> = events.into_iter().collect();
        self.publish_events(&events);
    }
}

/// Writes every event to the `uno::events` tracing target as a JSON object.
pub struct TracingLogger;

impl EventHandler for TracingLogger {
    fn handle_events(&self, events: &[GameEvent]) {
        for event in events {
            match serde_json::to_string(event) {
                Ok(json) => tracing::info!(target: "uno::events", event = %json),
                Err(err) => tracing::warn!(target: "uno::events", %event, error = %err, "unserializable event"),
            }
        }
    }
}
