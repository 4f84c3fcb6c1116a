use std::collections::HashMap;
use aws_sdk_sns::Client;
use async_trait::async_trait;
use aws_sdk_sns::error::SdkError;
use aws_sdk_sns::operation::create_topic::CreateTopicError;
use aws_sdk_sns::operation::publish::PublishError;
use tracing::log::info;
use crate::core::events::DomainEvent;
use crate::core::circulation::CirculationError;
use crate::gateway::events::EventPublisher;

// SnsPublisher fans committed lifecycle transitions out to SNS topics, one
// topic per event name. Topics must be registered before publishing.
#[derive(Debug)]
pub struct SnsPublisher {
    client: Client,
    topics: HashMap<String, String>,
}

impl SnsPublisher {
    pub(crate) fn new(client: Client) -> Self {
        Self {
            client,
            topics: HashMap::new(),
        }
    }
}

#[async_trait]
impl EventPublisher for SnsPublisher {
    async fn create_topic(&mut self, topic: &str) -> Result<String, CirculationError> {
        let resp = self.client.create_topic().name(topic).send().await?;
        let arn = resp.topic_arn().unwrap_or_default();
        self.topics.insert(topic.to_string(), arn.to_string());
        info!("Created topic with ARN: {}", arn);
        Ok(arn.to_string())
    }

    async fn publish(&self, event: &DomainEvent) -> Result<(), CirculationError> {
        let topic = self.topics.get(event.name.as_str());
        if let Some(arn) = topic {
            let json = serde_json::to_string(event)?;
            self.client.publish().topic_arn(arn).message(json).send().await?;
            Ok(())
        } else {
            Err(CirculationError::runtime(format!("topic is not found {}", event.name).as_str(), None))
        }
    }
}

impl From<SdkError<CreateTopicError>> for CirculationError {
    fn from(err: SdkError<CreateTopicError>) -> Self {
        CirculationError::runtime(format!("{:?}", err).as_str(), None)
    }
}

impl From<SdkError<PublishError>> for CirculationError {
    fn from(err: SdkError<PublishError>) -> Self {
        CirculationError::runtime(format!("{:?}", err).as_str(), None)
    }
}
