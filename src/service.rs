use std::sync::Arc;

use aws_sdk_sqs::types::QueueAttributeName;
use serde::Serialize;

use crate::config::SqsConfig;
use crate::errors::{ErrorKind, SqsResult};
use crate::transport::SqsTransport;

pub mod batches;
pub mod config;

pub use batches::{BatchHandler, DrainStats, LoggingHandler, QueueMessage};
pub use config::ReceiveConfig;

/// A service bound to one SQS queue.
///
/// Wraps a transport (normally [`aws_sdk_sqs::Client`]) together with the
/// shared queue configuration and exposes publishing, queue verification,
/// depth inspection and batch draining.
pub struct SqsService<T>
where
    T: SqsTransport,
{
    /// The transport used to talk to SQS.
    transport: T,

    /// Queue configuration shared with the owning module.
    config: Arc<SqsConfig>,

    /// Receive parameters for the drain loop.
    receive_config: ReceiveConfig,
}

impl<T> SqsService<T>
where
    T: SqsTransport,
{
    pub fn new(transport: T, config: Arc<SqsConfig>) -> Self {
        SqsService {
            transport,
            config,
            receive_config: ReceiveConfig::default(),
        }
    }

    /// Replaces the receive parameters used by the drain loop.
    pub fn with_receive_config(mut self, receive_config: ReceiveConfig) -> Self {
        self.receive_config = receive_config;
        self
    }

    pub fn queue_url(&self) -> &str {
        &self.config.queue_url
    }

    pub fn transport(&self) -> &T {
        &self.transport
    }

    /// Serializes `event` as JSON and sends it to the queue.
    ///
    /// Failures are logged together with the event and never reach the caller.
    pub async fn publish<E>(&self, event: &E)
    where
        E: Serialize + ?Sized,
    {
        if let Err(err) = self.try_publish(event).await {
            match serde_json::to_string(event) {
                Ok(body) => tracing::error!(
                    error = %err,
                    queue_url = %self.config.queue_url,
                    event = %body,
                    "error sending data to SQS"
                ),
                Err(_) => tracing::error!(
                    error = %err,
                    queue_url = %self.config.queue_url,
                    event_type = std::any::type_name::<E>(),
                    "error sending data to SQS"
                ),
            }
        }
    }

    /// Serializes `event` as JSON and sends it to the queue, returning the message id.
    ///
    /// # Errors
    ///
    /// Returns [`crate::errors::SqsError::Serialization`] if the event cannot be
    /// encoded and [`crate::errors::SqsError::Transport`] if the send fails.
    pub async fn try_publish<E>(&self, event: &E) -> SqsResult<Option<String>>
    where
        E: Serialize + ?Sized,
    {
        let body = serde_json::to_string(event)?;
        let message_id = self
            .transport
            .send_message(&self.config.queue_url, body)
            .await?;

        tracing::debug!(message_id = ?message_id, "message published");
        Ok(message_id)
    }

    /// Checks the queue by requesting its ARN.
    ///
    /// Returns `true` when the queue exists and is readable with the current
    /// credentials. Failures are logged by category and returned.
    pub async fn verify_queue(&self) -> SqsResult<bool> {
        let queue_url = &self.config.queue_url;

        match self
            .transport
            .get_queue_attributes(queue_url, &[QueueAttributeName::QueueArn])
            .await
        {
            Ok(_) => {
                tracing::info!(queue_url = %queue_url, "queue verification successful");
                Ok(true)
            }
            Err(err) => {
                match err.kind {
                    ErrorKind::QueueNotFound => {
                        tracing::error!(queue_url = %queue_url, "queue does not exist")
                    }
                    ErrorKind::AccessDenied => tracing::error!(
                        queue_url = %queue_url,
                        "access denied, check IAM roles and policies"
                    ),
                    ErrorKind::Other => tracing::error!(
                        queue_url = %queue_url,
                        error = %err.message,
                        "queue verification failed"
                    ),
                }
                Err(err.into())
            }
        }
    }

    /// Returns the queue's `ApproximateNumberOfMessages`.
    ///
    /// A missing, empty or unparsable attribute counts as zero.
    pub async fn approximate_message_count(&self) -> SqsResult<u64> {
        let attributes = self
            .transport
            .get_queue_attributes(
                &self.config.queue_url,
                &[QueueAttributeName::ApproximateNumberOfMessages],
            )
            .await
            .inspect_err(|err| {
                tracing::error!(
                    error = %err,
                    queue_url = %self.config.queue_url,
                    "failed to determine ApproximateNumberOfMessages"
                )
            })?;

        Ok(parse_message_count(
            attributes.get(&QueueAttributeName::ApproximateNumberOfMessages),
        ))
    }
}

fn parse_message_count(value: Option<&String>) -> u64 {
    let Some(value) = value.map(|v| v.trim()).filter(|v| !v.is_empty()) else {
        return 0;
    };

    value.parse().unwrap_or_else(|err| {
        tracing::warn!(?err, value, "unparsable ApproximateNumberOfMessages, assuming 0");
        0
    })
}
