//! Error types for CloudStack API calls.

use serde::de::DeserializeOwned;
use serde::Deserialize;
use thiserror::Error;

/// Errors that can occur while talking to a CloudStack management server.
#[derive(Debug, Error)]
pub enum CloudStackError {
    /// Client configuration is incomplete or invalid.
    #[error("Configuration error: {0}")]
    ConfigError(String),

    /// The configured API URL could not be parsed.
    #[error("Invalid API URL: {0}")]
    InvalidUrl(String),

    /// The request never produced an HTTP response.
    #[error("Transport error: {0}")]
    TransportError(String),

    /// The server answered with a non-200 status and no CloudStack error body.
    #[error("HTTP error ({status}): {body}")]
    HttpError { status: u16, body: String },

    /// The server answered with a CloudStack error document.
    #[error("CloudStack API error {code} (CSExceptionErrorCode: {cs_code}): {text}")]
    ApiError { code: i64, cs_code: i64, text: String },

    /// A response body could not be decoded.
    #[error("Failed to decode {command} response: {source}")]
    DecodeError {
        command: String,
        #[source]
        source: serde_json::Error,
    },

    /// The async job did not reach a terminal state before the deadline.
    ///
    /// `partial` holds the best-known payload: the initial response of the
    /// command that started the job.
    #[error("Timeout waiting for async job {job_id} result")]
    AsyncTimeout {
        job_id: String,
        partial: serde_json::Value,
    },

    /// The async job finished with a failure status.
    #[error("Async job {job_id} failed: {message}")]
    JobFailed {
        job_id: String,
        code: Option<i64>,
        message: String,
    },

    /// A lookup matched no resources.
    #[error("No match found for {0}")]
    NoMatch(String),

    /// A lookup matched more than one resource.
    #[error("Found {count} matches for {name}, expected exactly one")]
    AmbiguousMatch { name: String, count: usize },
}

/// Result type for CloudStack operations.
pub type CloudStackResult<T> = Result<T, CloudStackError>;

impl CloudStackError {
    /// Returns true if this is an async job timeout.
    pub fn is_timeout(&self) -> bool {
        matches!(self, CloudStackError::AsyncTimeout { .. })
    }

    /// Decodes the partial payload carried by an async timeout.
    ///
    /// Returns `None` for every other error kind or if the payload does not
    /// fit `T`.
    pub fn partial_result<T: DeserializeOwned>(&self) -> Option<T> {
        match self {
            CloudStackError::AsyncTimeout { partial, .. } => {
                let mut partial = partial.clone();
                crate::decode::drop_nulls(&mut partial);
                serde_json::from_value(partial).ok()
            }
            _ => None,
        }
    }

    /// The job id for async timeouts and job failures.
    pub fn job_id(&self) -> Option<&str> {
        match self {
            CloudStackError::AsyncTimeout { job_id, .. }
            | CloudStackError::JobFailed { job_id, .. } => Some(job_id),
            _ => None,
        }
    }

    pub(crate) fn decode(command: &str, source: serde_json::Error) -> Self {
        CloudStackError::DecodeError {
            command: command.to_string(),
            source,
        }
    }
}

impl From<ApiErrorBody> for CloudStackError {
    fn from(body: ApiErrorBody) -> Self {
        CloudStackError::ApiError {
            code: body.errorcode,
            cs_code: body.cserrorcode,
            text: body.errortext,
        }
    }
}

/// The error document CloudStack returns for failed commands and failed jobs.
#[derive(Debug, Clone, Default, Deserialize)]
pub struct ApiErrorBody {
    pub errorcode: i64,
    #[serde(default)]
    pub cserrorcode: i64,
    #[serde(default)]
    pub errortext: String,
}
