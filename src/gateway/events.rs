use async_trait::async_trait;
use crate::core::events::DomainEvent;
use crate::core::circulation::CirculationError;

#[async_trait]
pub trait EventPublisher: Sync + Send {
    async fn create_topic(&mut self, topic: &str) -> Result<String, CirculationError>;
    async fn publish(&self, event: &DomainEvent) -> Result<(), CirculationError>;
}
