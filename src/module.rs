use std::sync::Arc;

use tokio::sync::OnceCell;

use crate::client::create_sqs_client;
use crate::config::SqsConfig;
use crate::errors::SqsResult;
use crate::service::SqsService;

/// Application-level owner of the SQS configuration and client.
///
/// The client is built on first use and then shared by every
/// [`SqsService`] the module hands out, for the lifetime of the module.
/// Create one module at startup and pass it by reference.
///
/// # Example
///
/// ```rust,no_run
/// use sqs_queue_service::{config::SqsConfig, module::SqsModule};
///
/// #[tokio::main]
/// async fn main() -> Result<(), Box<dyn std::error::Error>> {
///     let module = SqsModule::new(SqsConfig::from_env()?)?;
///     let service = module.service().await;
///
///     service.verify_queue().await?;
///     service.publish(&serde_json::json!({"event": "started"})).await;
///     service.process_message_batches(5).await?;
///     Ok(())
/// }
/// ```
pub struct SqsModule {
    config: Arc<SqsConfig>,
    client: OnceCell<aws_sdk_sqs::Client>,
}

impl SqsModule {
    /// Validates `config` and creates a module with an uninitialized client.
    pub fn new(config: SqsConfig) -> SqsResult<Self> {
        config.validate()?;
        Ok(SqsModule {
            config: Arc::new(config),
            client: OnceCell::new(),
        })
    }

    pub fn config(&self) -> &SqsConfig {
        &self.config
    }

    /// Returns the shared client, creating it on the first call.
    pub async fn client(&self) -> &aws_sdk_sqs::Client {
        self.client
            .get_or_init(|| async {
                tracing::info!(queue_url = %self.config.queue_url, "initializing SQS client");
                create_sqs_client(&self.config).await
            })
            .await
    }

    pub fn is_client_initialized(&self) -> bool {
        self.client.initialized()
    }

    /// Returns a queue service backed by the shared client.
    pub async fn service(&self) -> SqsService<aws_sdk_sqs::Client> {
        SqsService::new(self.client().await.clone(), Arc::clone(&self.config))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::config::{ConfigError, Environment, StaticCredentials};
    use crate::errors::SqsError;
    use crate::test_utils::TEST_QUEUE_URL;

    fn local_config() -> SqsConfig {
        SqsConfig::new(TEST_QUEUE_URL, "us-east-1")
            .with_environment(Environment::Test)
            .with_credentials(StaticCredentials::new("test", "test"))
            .with_endpoint_url("http://localhost:4566")
    }

    #[test]
    fn test_new_rejects_invalid_config() {
        let result = SqsModule::new(SqsConfig::new("not-a-url", "us-east-1"));

        assert!(matches!(
            result,
            Err(SqsError::Config(ConfigError::InvalidQueueUrl(_)))
        ));
    }

    #[tokio::test]
    async fn test_client_is_created_lazily_and_once() {
        let module = SqsModule::new(local_config()).unwrap();
        assert!(!module.is_client_initialized());

        let first = module.client().await as *const aws_sdk_sqs::Client;
        let second = module.client().await as *const aws_sdk_sqs::Client;

        assert!(module.is_client_initialized());
        assert_eq!(first, second);
    }

    #[tokio::test]
    async fn test_service_targets_configured_queue() {
        let module = SqsModule::new(local_config()).unwrap();

        let service = module.service().await;

        assert_eq!(service.queue_url(), TEST_QUEUE_URL);
        assert!(module.is_client_initialized());
    }
}
