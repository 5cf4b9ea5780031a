//! # SQS Queue Service
//!
//! An asynchronous service around a single AWS SQS queue: publish JSON
//! messages, verify that the queue is reachable, read its approximate depth
//! and drain it in bounded batches.
//!
//! ## Features
//!
//! - Asynchronous SQS access with tokio
//! - Lazily created, shared SQS client owned by an explicit [`module::SqsModule`]
//! - Ambient credentials in production, static credentials elsewhere
//! - Fire-and-forget publishing that logs instead of failing
//! - Queue errors classified as not-found, access-denied or other
//! - Bounded drain loop with long polling, batch deletes and continue-on-error semantics
//!
//! ## Quick Start
//!
//! ```rust,no_run
//! use sqs_queue_service::{QueueMessage, SqsError, config::SqsConfig, module::SqsModule};
//!
//! #[tokio::main]
//! async fn main() -> Result<(), Box<dyn std::error::Error>> {
//!     let config = SqsConfig::new(
//!         "https://sqs.us-east-1.amazonaws.com/123456789012/events",
//!         "us-east-1",
//!     );
//!     let module = SqsModule::new(config)?;
//!     let service = module.service().await;
//!
//!     service.publish(&serde_json::json!({"order_id": 42})).await;
//!
//!     let stats = service
//!         .process_message_batches_with(3, &|iteration: usize, messages: Vec<QueueMessage>| async move {
//!             println!("iteration {iteration}: {} messages", messages.len());
//!             Ok::<(), SqsError>(())
//!         })
//!         .await?;
//!     println!("deleted {} messages", stats.deleted);
//!
//!     Ok(())
//! }
//! ```

pub mod client;
pub mod config;
pub mod errors;
pub mod module;
pub mod service;
pub mod transport;

#[cfg(test)]
mod test_utils;

pub use config::SqsConfig;
pub use errors::{ErrorKind, SqsError, SqsResult, TransportError};
pub use module::SqsModule;
pub use service::{BatchHandler, DrainStats, QueueMessage, ReceiveConfig, SqsService};
pub use transport::SqsTransport;
