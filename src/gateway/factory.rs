use lazy_static::lazy_static;
use crate::gateway::events::EventPublisher;
use crate::gateway::GatewayPublisherVia;
use crate::gateway::memory::publisher::MemoryPublisher;
use crate::gateway::sns::publisher::SnsPublisher;
use crate::utils::ddb::build_sns_client;

lazy_static! {
    // clones share one event log, so handles from repeated factory calls
    // observe the same published events
    static ref MEMORY_EVENTS: MemoryPublisher = MemoryPublisher::new();
}

pub async fn create_publisher(via: GatewayPublisherVia) -> Box<dyn EventPublisher> {
    match via {
        GatewayPublisherVia::Sns => {
            let client = build_sns_client().await;
            Box::new(SnsPublisher::new(client))
        }
        GatewayPublisherVia::Memory => {
            Box::new(MEMORY_EVENTS.clone())
        }
    }
}

#[cfg(test)]
mod tests {
    use std::collections::HashMap;
    use crate::core::domain::SystemClock;
    use crate::core::events::DomainEvent;
    use crate::gateway::events::EventPublisher;
    use crate::gateway::factory::{create_publisher, MEMORY_EVENTS};
    use crate::gateway::GatewayPublisherVia;

    #[tokio::test]
    async fn test_should_share_memory_event_log() {
        let publisher = create_publisher(GatewayPublisherVia::Memory).await;
        let event = DomainEvent::added("hold_placed", "lifecycle", "factory-asset",
                                       &SystemClock::default(), &HashMap::new(),
                                       &HashMap::from([("a", 1)])).expect("build event");
        publisher.publish(&event).await.expect("should publish");
        assert!(MEMORY_EVENTS.published("hold_placed").contains(&"factory-asset".to_string()));
    }
}
