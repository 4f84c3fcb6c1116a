use std::sync::{Arc, RwLock};
use async_trait::async_trait;
use crate::core::events::DomainEvent;
use crate::core::circulation::CirculationError;
use crate::gateway::events::EventPublisher;

// MemoryPublisher records events in process memory for local development
// and tests; recorded events can be asserted on through any clone, since
// clones share the same log.
#[derive(Debug, Default, Clone)]
pub struct MemoryPublisher {
    events: Arc<RwLock<Vec<DomainEvent>>>,
}

impl MemoryPublisher {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn published(&self, name: &str) -> Vec<String> {
        match self.events.read() {
            Ok(events) => {
                events.iter()
                    .filter(|event| event.name == name)
                    .map(|event| event.key.to_string())
                    .collect()
            }
            Err(_) => { vec![] }
        }
    }
}

#[async_trait]
impl EventPublisher for MemoryPublisher {
    async fn create_topic(&mut self, topic: &str) -> Result<String, CirculationError> {
        Ok(topic.to_string())
    }

    async fn publish(&self, event: &DomainEvent) -> Result<(), CirculationError> {
        let mut events = self.events.write()
            .map_err(|_| CirculationError::runtime("event log lock poisoned", None))?;
        events.push(event.clone());
        Ok(())
    }
}
