/// Receive parameters used by each pass of the batch drain loop.
///
/// This struct defines the parameters for receiving messages from an SQS queue,
/// including the maximum number of messages to receive, the wait time for long
/// polling and how long received messages stay hidden from other consumers.
///
/// # Fields
/// - `max_number_of_messages`: The maximum number of messages to receive in a single request.
/// - `wait_time_seconds`: The wait time for long polling, in seconds.
/// - `visibility_timeout`: The visibility timeout for received messages, in seconds.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ReceiveConfig {
    /// The maximum number of messages to receive in a single request.
    pub max_number_of_messages: i32,

    /// The wait time for long polling, in seconds.
    pub wait_time_seconds: i32,

    /// How long received messages stay invisible to other consumers, in seconds.
    pub visibility_timeout: i32,
}

impl Default for ReceiveConfig {
    fn default() -> Self {
        ReceiveConfig {
            max_number_of_messages: 10,
            wait_time_seconds: 20,
            visibility_timeout: 30,
        }
    }
}
