//! Scripted in-memory transport and log capture for unit tests.

use std::collections::{HashMap, VecDeque};
use std::io;
use std::sync::{Arc, Mutex};

use async_trait::async_trait;
use aws_sdk_sqs::types::QueueAttributeName;

use crate::config::{Environment, SqsConfig};
use crate::service::{ReceiveConfig, SqsService};
use crate::transport::{
    BatchDeleteOutcome, DeleteEntry, ReceivedMessage, SqsTransport, TransportResult,
};

pub const TEST_QUEUE_URL: &str = "http://localhost:4566/000000000000/test-queue";

type Attributes = HashMap<QueueAttributeName, String>;

/// Replays queued responses in order; once a queue runs dry the transport
/// answers as an empty, healthy queue would.
#[derive(Default)]
pub struct MockTransport {
    send_responses: Mutex<VecDeque<TransportResult<Option<String>>>>,
    attribute_responses: Mutex<VecDeque<TransportResult<Attributes>>>,
    receive_responses: Mutex<VecDeque<TransportResult<Vec<ReceivedMessage>>>>,
    delete_responses: Mutex<VecDeque<TransportResult<BatchDeleteOutcome>>>,

    sent: Mutex<Vec<(String, String)>>,
    attribute_requests: Mutex<Vec<Vec<QueueAttributeName>>>,
    receive_configs: Mutex<Vec<ReceiveConfig>>,
    deleted: Mutex<Vec<Vec<DeleteEntry>>>,
}

impl MockTransport {
    pub fn push_send(&self, response: TransportResult<Option<String>>) {
        self.send_responses.lock().unwrap().push_back(response);
    }

    pub fn push_attributes(&self, response: TransportResult<Attributes>) {
        self.attribute_responses.lock().unwrap().push_back(response);
    }

    pub fn push_receive(&self, response: TransportResult<Vec<ReceivedMessage>>) {
        self.receive_responses.lock().unwrap().push_back(response);
    }

    pub fn push_delete(&self, response: TransportResult<BatchDeleteOutcome>) {
        self.delete_responses.lock().unwrap().push_back(response);
    }

    /// `(queue_url, body)` of every send call.
    pub fn sent(&self) -> Vec<(String, String)> {
        self.sent.lock().unwrap().clone()
    }

    pub fn attribute_requests(&self) -> Vec<Vec<QueueAttributeName>> {
        self.attribute_requests.lock().unwrap().clone()
    }

    pub fn receive_calls(&self) -> usize {
        self.receive_configs.lock().unwrap().len()
    }

    pub fn receive_configs(&self) -> Vec<ReceiveConfig> {
        self.receive_configs.lock().unwrap().clone()
    }

    /// Entries of every batch delete call, attempted or not.
    pub fn deleted(&self) -> Vec<Vec<DeleteEntry>> {
        self.deleted.lock().unwrap().clone()
    }
}

#[async_trait]
impl SqsTransport for MockTransport {
    async fn send_message(&self, queue_url: &str, body: String) -> TransportResult<Option<String>> {
        self.sent.lock().unwrap().push((queue_url.to_string(), body));
        self.send_responses
            .lock()
            .unwrap()
            .pop_front()
            .unwrap_or_else(|| Ok(Some("mock-message-id".to_string())))
    }

    async fn get_queue_attributes(
        &self,
        _queue_url: &str,
        names: &[QueueAttributeName],
    ) -> TransportResult<Attributes> {
        self.attribute_requests.lock().unwrap().push(names.to_vec());
        self.attribute_responses
            .lock()
            .unwrap()
            .pop_front()
            .unwrap_or_else(|| Ok(HashMap::new()))
    }

    async fn receive_messages(
        &self,
        _queue_url: &str,
        config: &ReceiveConfig,
    ) -> TransportResult<Vec<ReceivedMessage>> {
        self.receive_configs.lock().unwrap().push(config.clone());
        self.receive_responses
            .lock()
            .unwrap()
            .pop_front()
            .unwrap_or_else(|| Ok(Vec::new()))
    }

    async fn delete_message_batch(
        &self,
        _queue_url: &str,
        entries: Vec<DeleteEntry>,
    ) -> TransportResult<BatchDeleteOutcome> {
        let successful = entries.iter().map(|entry| entry.id.clone()).collect();
        self.deleted.lock().unwrap().push(entries);
        self.delete_responses
            .lock()
            .unwrap()
            .pop_front()
            .unwrap_or_else(|| {
                Ok(BatchDeleteOutcome {
                    successful,
                    failed: Vec::new(),
                })
            })
    }
}

pub fn test_config() -> SqsConfig {
    SqsConfig::new(TEST_QUEUE_URL, "us-east-1").with_environment(Environment::Test)
}

pub fn service_with(transport: MockTransport) -> SqsService<MockTransport> {
    SqsService::new(transport, Arc::new(test_config()))
}

/// A received message with id `msg-{n}` and receipt handle `receipt-{n}`.
pub fn received(n: usize, body: &str) -> ReceivedMessage {
    ReceivedMessage {
        message_id: Some(format!("msg-{n}")),
        receipt_handle: Some(format!("receipt-{n}")),
        body: Some(body.to_string()),
    }
}

/// Collects formatted log lines written while its guard is installed.
#[derive(Clone, Default)]
pub struct LogCapture(Arc<Mutex<Vec<u8>>>);

impl LogCapture {
    /// Routes events on the current thread into the buffer until the guard drops.
    pub fn install(&self) -> tracing::subscriber::DefaultGuard {
        let writer = self.clone();
        let subscriber = tracing_subscriber::fmt()
            .with_max_level(tracing::Level::TRACE)
            .with_ansi(false)
            .with_writer(move || writer.clone())
            .finish();
        tracing::subscriber::set_default(subscriber)
    }

    pub fn contents(&self) -> String {
        String::from_utf8_lossy(&self.0.lock().unwrap()).into_owned()
    }
}

impl io::Write for LogCapture {
    fn write(&mut self, buf: &[u8]) -> io::Result<usize> {
        self.0.lock().unwrap().extend_from_slice(buf);
        Ok(buf.len())
    }

    fn flush(&mut self) -> io::Result<()> {
        Ok(())
    }
}
