use crate::{
    config::myconfig::Config,
    di::{Collaborators, DependenciesInject, Repositories},
    service::{
        credential::JwtCredentialEncoder,
        notify::{HttpWebhookClient, KafkaTicketNotifier},
    },
};
use anyhow::{Context, Result};
use prometheus_client::registry::Registry;
use shared::{
    abstract_trait::{DynJwtService, DynKafka},
    config::{JwtConfig, Kafka},
};
use std::{fmt, sync::Arc, time::Duration};
use tokio::sync::Mutex;

#[derive(Clone)]
pub struct AppState {
    pub di_container: DependenciesInject,
    pub jwt_config: DynJwtService,
    pub registry: Arc<Mutex<Registry>>,
}

impl fmt::Debug for AppState {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("AppState")
            .field("deps", &self.di_container)
            .field("jwt_config", &self.jwt_config)
            .finish()
    }
}

impl AppState {
    pub fn new(repos: Repositories, config: &Config) -> Result<Self> {
        let kafka = Arc::new(
            Kafka::new(&config.kafka_broker).context("Failed to create Kafka producer")?,
        ) as DynKafka;

        let collaborators = Collaborators {
            notifier: Arc::new(KafkaTicketNotifier::new(kafka)),
            webhook: Arc::new(HttpWebhookClient::new()),
            encoder: Arc::new(JwtCredentialEncoder::new(&config.credential_secret)),
            notify_timeout: Duration::from_millis(config.notify_timeout_ms),
        };

        Ok(Self::with_collaborators(
            repos,
            collaborators,
            Arc::new(JwtConfig::new(&config.jwt_secret)),
        ))
    }

    /// Wires the container around caller-supplied collaborators.
    pub fn with_collaborators(
        repos: Repositories,
        collaborators: Collaborators,
        jwt_config: DynJwtService,
    ) -> Self {
        let mut registry = Registry::default();
        let di_container = DependenciesInject::new(repos, collaborators, &mut registry);

        Self {
            di_container,
            jwt_config,
            registry: Arc::new(Mutex::new(registry)),
        }
    }
}
