use std::future::Future;

use async_trait::async_trait;
use serde_json::Value;

use super::SqsService;
use crate::errors::SqsResult;
use crate::transport::{DeleteEntry, ReceivedMessage, SqsTransport};

/// A received message with its parsed body.
#[derive(Debug, Clone, PartialEq)]
pub struct QueueMessage<T = Value> {
    /// The parsed message body.
    pub body: T,
    /// Receipt handle for deleting the message.
    pub receipt_handle: String,
    /// Message ID assigned by the queue.
    pub message_id: String,
}

/// Trait for processing a received batch before it is deleted.
///
/// The batch is deleted only when `handle` returns `Ok`. On error the
/// messages stay in the queue and become visible again once their
/// visibility timeout expires.
#[async_trait]
pub trait BatchHandler: Send + Sync {
    /// Processes one received batch.
    ///
    /// # Arguments
    ///
    /// * `iteration` - Zero-based pass of the drain loop that received the batch
    /// * `messages` - The parsed messages, in receive order
    async fn handle(&self, iteration: usize, messages: Vec<QueueMessage>) -> SqsResult<()>;
}

#[async_trait]
impl<F, Fut> BatchHandler for F
where
    F: Fn(usize, Vec<QueueMessage>) -> Fut + Send + Sync,
    Fut: Future<Output = SqsResult<()>> + Send + 'static,
{
    async fn handle(&self, iteration: usize, messages: Vec<QueueMessage>) -> SqsResult<()> {
        (self)(iteration, messages).await
    }
}

/// Handler that only logs the parsed message bodies.
#[derive(Debug, Clone, Copy, Default)]
pub struct LoggingHandler;

#[async_trait]
impl BatchHandler for LoggingHandler {
    async fn handle(&self, iteration: usize, messages: Vec<QueueMessage>) -> SqsResult<()> {
        tracing::info!(iteration, count = messages.len(), "processing messages");
        for message in &messages {
            tracing::debug!(message_id = %message.message_id, body = %message.body, "message");
        }
        Ok(())
    }
}

/// Summary of a finished drain.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct DrainStats {
    /// Passes through the loop body.
    pub iterations: usize,
    /// Messages returned by receive calls, skipped ones included.
    pub received: usize,
    /// Received messages dropped for a missing id or receipt handle.
    pub skipped: usize,
    /// Messages the service confirmed as deleted.
    pub deleted: usize,
    /// Passes that ended in a logged error.
    pub errors: usize,
}

/// Transient loop state, never persisted.
#[derive(Debug)]
struct PollState {
    iteration: usize,
    remaining_estimate: u64,
}

impl PollState {
    fn should_continue(&self, max_iterations: usize) -> bool {
        self.iteration < max_iterations && self.remaining_estimate > 0
    }
}

/// Parses a message body as JSON; missing or malformed bodies become `{}`.
fn parse_body(message_id: &str, body: Option<&str>) -> Value {
    let Some(body) = body else {
        return Value::Object(Default::default());
    };

    serde_json::from_str(body).unwrap_or_else(|err| {
        tracing::warn!(
            message_id,
            error = %err,
            "message body is not valid JSON, treating it as an empty object"
        );
        Value::Object(Default::default())
    })
}

fn to_queue_message(message: ReceivedMessage) -> Option<QueueMessage> {
    let (Some(message_id), Some(receipt_handle)) = (message.message_id, message.receipt_handle)
    else {
        tracing::warn!("received a message without id or receipt handle, skipping it");
        return None;
    };

    Some(QueueMessage {
        body: parse_body(&message_id, message.body.as_deref()),
        receipt_handle,
        message_id,
    })
}

impl<T> SqsService<T>
where
    T: SqsTransport,
{
    /// Drains up to `max_iterations` batches, logging each batch before deleting it.
    ///
    /// See [`SqsService::process_message_batches_with`].
    pub async fn process_message_batches(&self, max_iterations: usize) -> SqsResult<DrainStats> {
        self.process_message_batches_with(max_iterations, &LoggingHandler).await
    }

    /// Receives and deletes message batches until `max_iterations` passes have
    /// run or the queue reports no approximate messages.
    ///
    /// The depth is read once before the loop and again at the top of every
    /// pass, so the loop guard may lag one pass behind the queue. Each pass
    /// receives one batch, hands it to `handler` and, if the handler succeeds,
    /// deletes every received message in a single batch call. Errors inside a
    /// pass are logged and the loop moves on; the pass still counts.
    ///
    /// # Errors
    ///
    /// Only a failure of the initial depth query is returned.
    #[tracing::instrument(skip(self, handler), fields(queue_url = %self.config.queue_url))]
    pub async fn process_message_batches_with<H>(
        &self,
        max_iterations: usize,
        handler: &H,
    ) -> SqsResult<DrainStats>
    where
        H: BatchHandler + ?Sized,
    {
        let mut stats = DrainStats::default();
        let mut state = PollState {
            iteration: 0,
            remaining_estimate: self.approximate_message_count().await?,
        };

        while state.should_continue(max_iterations) {
            if let Err(err) = self.process_batch(&mut state, handler, &mut stats).await {
                tracing::error!(
                    iteration = state.iteration,
                    error = %err,
                    "error polling messages"
                );
                stats.errors += 1;
            }

            state.iteration += 1;
            stats.iterations = state.iteration;
        }

        Ok(stats)
    }

    async fn process_batch<H>(
        &self,
        state: &mut PollState,
        handler: &H,
        stats: &mut DrainStats,
    ) -> SqsResult<()>
    where
        H: BatchHandler + ?Sized,
    {
        state.remaining_estimate = self.approximate_message_count().await?;

        let received = self
            .transport
            .receive_messages(&self.config.queue_url, &self.receive_config)
            .await?;

        let count = received.len();
        let messages: Vec<QueueMessage> =
            received.into_iter().filter_map(to_queue_message).collect();
        let skipped = count - messages.len();

        tracing::info!(count, skipped, "received messages");
        stats.received += count;
        stats.skipped += skipped;

        if messages.is_empty() {
            return Ok(());
        }

        let entries: Vec<DeleteEntry> = messages
            .iter()
            .map(|message| DeleteEntry {
                id: message.message_id.clone(),
                receipt_handle: message.receipt_handle.clone(),
            })
            .collect();

        handler.handle(state.iteration, messages).await?;

        let outcome = self
            .transport
            .delete_message_batch(&self.config.queue_url, entries)
            .await?;

        stats.deleted += outcome.successful.len();
        for failed in &outcome.failed {
            tracing::warn!(
                message_id = %failed.id,
                code = %failed.code,
                sender_fault = failed.sender_fault,
                reason = ?failed.message,
                "failed to delete message"
            );
        }
        tracing::info!(
            deleted = outcome.successful.len(),
            failed = outcome.failed.len(),
            "deleted messages"
        );

        Ok(())
    }
}
