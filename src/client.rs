use aws_config::{BehaviorVersion, Region};
use aws_sdk_sqs::config::{Credentials, SharedCredentialsProvider};

use crate::config::SqsConfig;

/// Creates an AWS SQS client for the given queue configuration.
///
/// In production the client resolves credentials through the default AWS
/// provider chain (environment, profile, instance or task role). In every
/// other environment the static key pair from the configuration is used when
/// one is present.
///
/// # Example
///
/// ```rust,no_run
/// use sqs_queue_service::{client::create_sqs_client, config::SqsConfig};
///
/// #[tokio::main]
/// async fn main() {
///     let config = SqsConfig::new(
///         "https://sqs.us-east-1.amazonaws.com/123456789012/events",
///         "us-east-1",
///     );
///     let client = create_sqs_client(&config).await;
///     // Use the client...
/// }
/// ```
pub async fn create_sqs_client(config: &SqsConfig) -> aws_sdk_sqs::Client {
    let mut loader = aws_config::defaults(BehaviorVersion::latest())
        .region(Region::new(config.region.clone()));

    if let Some(credentials) = config.effective_credentials() {
        let credentials = Credentials::new(
            &credentials.access_key_id,
            &credentials.secret_access_key,
            None,
            None,
            "static",
        );
        loader = loader.credentials_provider(SharedCredentialsProvider::new(credentials));
    }

    if let Some(endpoint_url) = &config.endpoint_url {
        loader = loader.endpoint_url(endpoint_url);
    }

    tracing::debug!(
        region = %config.region,
        environment = ?config.environment,
        static_credentials = config.effective_credentials().is_some(),
        "creating SQS client"
    );

    aws_sdk_sqs::Client::new(&loader.load().await)
}
