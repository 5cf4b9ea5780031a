//! The seam between the queue service and the SQS API.
//!
//! [`SqsTransport`] is implemented for [`aws_sdk_sqs::Client`]; every SDK error is
//! turned into a classified [`TransportError`] before it leaves this module.

use std::collections::HashMap;

use async_trait::async_trait;
use aws_sdk_sqs::types::{DeleteMessageBatchRequestEntry, QueueAttributeName};

use crate::errors::{ErrorKind, TransportError};
use crate::service::config::ReceiveConfig;

pub type TransportResult<T> = Result<T, TransportError>;

/// A message as returned by a receive call, before its body is parsed.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct ReceivedMessage {
    pub message_id: Option<String>,
    pub receipt_handle: Option<String>,
    pub body: Option<String>,
}

/// One entry of a batch delete request.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct DeleteEntry {
    /// Batch-local identifier; the message id is used.
    pub id: String,
    pub receipt_handle: String,
}

/// A single entry the service refused to delete.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct FailedDelete {
    pub id: String,
    pub code: String,
    pub message: Option<String>,
    pub sender_fault: bool,
}

/// Result of a batch delete call that reached the service.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct BatchDeleteOutcome {
    pub successful: Vec<String>,
    pub failed: Vec<FailedDelete>,
}

/// Operations the queue service needs from SQS.
#[async_trait]
pub trait SqsTransport: Send + Sync {
    /// Sends one message and returns the id the queue assigned to it.
    async fn send_message(&self, queue_url: &str, body: String) -> TransportResult<Option<String>>;

    /// Fetches the requested queue attributes.
    async fn get_queue_attributes(
        &self,
        queue_url: &str,
        names: &[QueueAttributeName],
    ) -> TransportResult<HashMap<QueueAttributeName, String>>;

    /// Receives up to `config.max_number_of_messages` messages. May return nothing.
    async fn receive_messages(
        &self,
        queue_url: &str,
        config: &ReceiveConfig,
    ) -> TransportResult<Vec<ReceivedMessage>>;

    /// Deletes a batch of received messages in one call.
    async fn delete_message_batch(
        &self,
        queue_url: &str,
        entries: Vec<DeleteEntry>,
    ) -> TransportResult<BatchDeleteOutcome>;
}

#[async_trait]
impl SqsTransport for aws_sdk_sqs::Client {
    async fn send_message(&self, queue_url: &str, body: String) -> TransportResult<Option<String>> {
        let output = self
            .send_message()
            .queue_url(queue_url)
            .message_body(body)
            .send()
            .await
            .map_err(|err| TransportError::from_sdk("SendMessage", err))?;

        Ok(output.message_id().map(str::to_string))
    }

    async fn get_queue_attributes(
        &self,
        queue_url: &str,
        names: &[QueueAttributeName],
    ) -> TransportResult<HashMap<QueueAttributeName, String>> {
        let output = self
            .get_queue_attributes()
            .queue_url(queue_url)
            .set_attribute_names(Some(names.to_vec()))
            .send()
            .await
            .map_err(|err| TransportError::from_sdk("GetQueueAttributes", err))?;

        Ok(output.attributes.unwrap_or_default())
    }

    async fn receive_messages(
        &self,
        queue_url: &str,
        config: &ReceiveConfig,
    ) -> TransportResult<Vec<ReceivedMessage>> {
        let output = self
            .receive_message()
            .queue_url(queue_url)
            .max_number_of_messages(config.max_number_of_messages)
            .wait_time_seconds(config.wait_time_seconds)
            .visibility_timeout(config.visibility_timeout)
            .send()
            .await
            .map_err(|err| TransportError::from_sdk("ReceiveMessage", err))?;

        Ok(output
            .messages
            .unwrap_or_default()
            .into_iter()
            .map(|message| ReceivedMessage {
                message_id: message.message_id,
                receipt_handle: message.receipt_handle,
                body: message.body,
            })
            .collect())
    }

    async fn delete_message_batch(
        &self,
        queue_url: &str,
        entries: Vec<DeleteEntry>,
    ) -> TransportResult<BatchDeleteOutcome> {
        let entries = entries
            .into_iter()
            .map(|entry| {
                DeleteMessageBatchRequestEntry::builder()
                    .id(entry.id)
                    .receipt_handle(entry.receipt_handle)
                    .build()
                    .map_err(|err| {
                        TransportError::new(ErrorKind::Other, "DeleteMessageBatch", err.to_string())
                    })
            })
            .collect::<TransportResult<Vec<_>>>()?;

        let output = self
            .delete_message_batch()
            .queue_url(queue_url)
            .set_entries(Some(entries))
            .send()
            .await
            .map_err(|err| TransportError::from_sdk("DeleteMessageBatch", err))?;

        Ok(BatchDeleteOutcome {
            successful: output.successful.into_iter().map(|entry| entry.id).collect(),
            failed: output
                .failed
                .into_iter()
                .map(|entry| FailedDelete {
                    id: entry.id,
                    code: entry.code,
                    message: entry.message,
                    sender_fault: entry.sender_fault,
                })
                .collect(),
        })
    }
}
