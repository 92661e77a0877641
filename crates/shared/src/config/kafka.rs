use async_trait::async_trait;
use rdkafka::config::ClientConfig;
use rdkafka::producer::{FutureProducer, FutureRecord};
use std::time::Duration;
use tracing::{error, info};

use crate::abstract_trait::KafkaTrait;
use crate::errors::ServiceError;

pub struct Kafka {
    producer: FutureProducer,
    queue_timeout: Duration,
}

impl Kafka {
    pub fn new(brokers: &str) -> Result<Self, ServiceError> {
        let producer: FutureProducer = ClientConfig::new()
            .set("bootstrap.servers", brokers)
            .set("message.timeout.ms", "6000")
            .set("allow.auto.create.topics", "true")
            .create()
            .map_err(|e| {
                error!("❌ Failed to create Kafka producer: {e}");
                ServiceError::from(e)
            })?;

        info!("Kafka producer connected successfully");

        Ok(Kafka {
            producer,
            queue_timeout: Duration::from_secs(1),
        })
    }
}

#[async_trait]
impl KafkaTrait for Kafka {
    async fn publish(&self, topic: &str, key: &str, value: &[u8]) -> Result<(), ServiceError> {
        let record = FutureRecord::to(topic).key(key).payload(value);

        match self.producer.send(record, self.queue_timeout).await {
            Ok(_) => {
                info!(topic, "Message sent successfully");
                Ok(())
            }
            Err((kafka_error, _message)) => {
                error!(topic, "❌ Failed to deliver message: {kafka_error}");
                Err(ServiceError::from(kafka_error))
            }
        }
    }
}
