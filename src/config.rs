use std::fmt;
use std::str::FromStr;

use thiserror::Error;

/// Errors raised while loading or validating an [`SqsConfig`].
#[derive(Debug, Error, PartialEq, Eq)]
pub enum ConfigError {
    #[error("missing required setting {0}")]
    Missing(&'static str),

    #[error("invalid queue url {0:?}: expected an http(s) url")]
    InvalidQueueUrl(String),

    #[error("region must not be empty")]
    EmptyRegion,

    #[error("AWS_ACCESS_KEY_ID and AWS_SECRET_ACCESS_KEY must be set together")]
    IncompleteCredentials,
}

/// Deployment environment the service runs in.
///
/// Production relies on the ambient AWS credential chain (instance profile,
/// task role, ...); every other environment uses [`StaticCredentials`] when present.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum Environment {
    Production,
    #[default]
    Development,
    Test,
}

impl Environment {
    pub fn is_production(self) -> bool {
        self == Environment::Production
    }
}

impl FromStr for Environment {
    type Err = std::convert::Infallible;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Ok(match s.trim().to_ascii_lowercase().as_str() {
            "production" => Environment::Production,
            "test" => Environment::Test,
            _ => Environment::Development,
        })
    }
}

/// An explicit access key pair, used outside production.
#[derive(Clone, PartialEq, Eq)]
pub struct StaticCredentials {
    pub access_key_id: String,
    pub secret_access_key: String,
}

impl StaticCredentials {
    pub fn new(access_key_id: impl Into<String>, secret_access_key: impl Into<String>) -> Self {
        StaticCredentials {
            access_key_id: access_key_id.into(),
            secret_access_key: secret_access_key.into(),
        }
    }
}

impl fmt::Debug for StaticCredentials {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("StaticCredentials")
            .field("access_key_id", &self.access_key_id)
            .field("secret_access_key", &"** redacted **")
            .finish()
    }
}

/// Configuration for the SQS queue service.
///
/// Constructed once at startup, validated, and shared read-only afterwards.
///
/// # Fields
/// - `queue_url`: URL of the queue every operation targets.
/// - `region`: AWS region of the queue.
/// - `environment`: selects the credential source.
/// - `credentials`: static key pair, ignored in production.
/// - `endpoint_url`: optional endpoint override, e.g. LocalStack.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SqsConfig {
    pub queue_url: String,
    pub region: String,
    pub environment: Environment,
    pub credentials: Option<StaticCredentials>,
    pub endpoint_url: Option<String>,
}

impl SqsConfig {
    pub fn new(queue_url: impl Into<String>, region: impl Into<String>) -> Self {
        SqsConfig {
            queue_url: queue_url.into(),
            region: region.into(),
            environment: Environment::default(),
            credentials: None,
            endpoint_url: None,
        }
    }

    pub fn with_environment(mut self, environment: Environment) -> Self {
        self.environment = environment;
        self
    }

    pub fn with_credentials(mut self, credentials: StaticCredentials) -> Self {
        self.credentials = Some(credentials);
        self
    }

    pub fn with_endpoint_url(mut self, endpoint_url: impl Into<String>) -> Self {
        self.endpoint_url = Some(endpoint_url.into());
        self
    }

    /// Loads the configuration from process environment variables.
    ///
    /// Reads `AWS_SQS_URL`, `AWS_REGION`, `APP_ENV`, `AWS_ACCESS_KEY_ID`,
    /// `AWS_SECRET_ACCESS_KEY` and `AWS_SQS_ENDPOINT_URL`.
    pub fn from_env() -> Result<Self, ConfigError> {
        Self::from_lookup(|key| std::env::var(key).ok())
    }

    /// Loads the configuration through an arbitrary key lookup.
    pub fn from_lookup<F>(lookup: F) -> Result<Self, ConfigError>
    where
        F: Fn(&str) -> Option<String>,
    {
        let get = |key: &str| lookup(key).filter(|value| !value.trim().is_empty());

        let queue_url = get("AWS_SQS_URL").ok_or(ConfigError::Missing("AWS_SQS_URL"))?;
        let region = get("AWS_REGION").ok_or(ConfigError::Missing("AWS_REGION"))?;
        let environment = get("APP_ENV")
            .map(|value| value.parse::<Environment>().unwrap_or_default())
            .unwrap_or_default();

        let credentials = match (get("AWS_ACCESS_KEY_ID"), get("AWS_SECRET_ACCESS_KEY")) {
            (Some(key), Some(secret)) => Some(StaticCredentials::new(key, secret)),
            (None, None) => None,
            _ => return Err(ConfigError::IncompleteCredentials),
        };

        let config = SqsConfig {
            queue_url,
            region,
            environment,
            credentials,
            endpoint_url: get("AWS_SQS_ENDPOINT_URL"),
        };
        config.validate()?;
        Ok(config)
    }

    pub fn validate(&self) -> Result<(), ConfigError> {
        let url = self.queue_url.trim();
        if !(url.starts_with("https://") || url.starts_with("http://")) {
            return Err(ConfigError::InvalidQueueUrl(self.queue_url.clone()));
        }
        if self.region.trim().is_empty() {
            return Err(ConfigError::EmptyRegion);
        }
        if let Some(credentials) = &self.credentials {
            if credentials.access_key_id.is_empty() || credentials.secret_access_key.is_empty() {
                return Err(ConfigError::IncompleteCredentials);
            }
        }
        Ok(())
    }

    /// Credentials to install on the client, `None` meaning the ambient chain.
    pub fn effective_credentials(&self) -> Option<&StaticCredentials> {
        if self.environment.is_production() {
            None
        } else {
            self.credentials.as_ref()
        }
    }
}
