//! HTTP transport used by the client.
//!
//! The client only needs two verbs: a signed GET with the query string already
//! built, and a form POST for commands whose parameters may be large. Both are
//! behind [`Transport`] so tests can script server replies.

use std::io::Read;
use std::sync::Arc;
use std::time::Duration;

use crate::config::ClientConfig;
use crate::error::{CloudStackError, CloudStackResult};

/// A raw HTTP reply: status code and body text.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct HttpReply {
    pub status: u16,
    pub body: String,
}

impl HttpReply {
    pub fn new(status: u16, body: impl Into<String>) -> Self {
        Self {
            status,
            body: body.into(),
        }
    }

    /// A 200 reply with the given body.
    pub fn ok(body: impl Into<String>) -> Self {
        Self::new(200, body)
    }
}

/// Describes a transport capable of delivering signed requests to the
/// management server.
///
/// Non-2xx statuses are replies, not errors: implementations return them as
/// [`HttpReply`] so the client can decode CloudStack error documents.
pub trait Transport: Send + Sync {
    /// Issues a GET for the fully built URL.
    fn get(&self, url: &str) -> CloudStackResult<HttpReply>;

    /// Issues a form-encoded POST.
    fn post_form(&self, url: &str, form: &[(String, String)]) -> CloudStackResult<HttpReply>;
}

impl<T: Transport + ?Sized> Transport for Arc<T> {
    fn get(&self, url: &str) -> CloudStackResult<HttpReply> {
        (**self).get(url)
    }

    fn post_form(&self, url: &str, form: &[(String, String)]) -> CloudStackResult<HttpReply> {
        (**self).post_form(url, form)
    }
}

/// Blocking HTTP transport backed by `ureq`.
pub struct HttpTransport {
    agent: ureq::Agent,
}

impl HttpTransport {
    /// Constructs a transport from the client configuration.
    pub fn new(config: &ClientConfig) -> CloudStackResult<Self> {
        let mut builder = ureq::AgentBuilder::new()
            .timeout(Duration::from_millis(config.request_timeout_ms));

        if config.ssl_no_verify {
            let connector = native_tls::TlsConnector::builder()
                .danger_accept_invalid_certs(true)
                .danger_accept_invalid_hostnames(true)
                .build()
                .map_err(|err| {
                    CloudStackError::ConfigError(format!("Failed to build TLS connector: {}", err))
                })?;
            builder = builder.tls_connector(Arc::new(connector));
        }

        Ok(Self {
            agent: builder.build(),
        })
    }

    fn into_reply(result: Result<ureq::Response, ureq::Error>) -> CloudStackResult<HttpReply> {
        match result {
            Ok(response) => Self::read(response),
            Err(ureq::Error::Status(_, response)) => Self::read(response),
            Err(ureq::Error::Transport(transport)) => {
                Err(CloudStackError::TransportError(transport.to_string()))
            }
        }
    }

    fn read(response: ureq::Response) -> CloudStackResult<HttpReply> {
        let status = response.status();
        // `into_string` caps bodies at 10 MB; large list replies exceed that.
        let mut body = String::new();
        response
            .into_reader()
            .read_to_string(&mut body)
            .map_err(|err| {
                CloudStackError::TransportError(format!("Failed to read response body: {}", err))
            })?;
        Ok(HttpReply { status, body })
    }
}

impl Transport for HttpTransport {
    fn get(&self, url: &str) -> CloudStackResult<HttpReply> {
        Self::into_reply(self.agent.get(url).call())
    }

    fn post_form(&self, url: &str, form: &[(String, String)]) -> CloudStackResult<HttpReply> {
        let pairs: Vec<(&str, &str)> = form
            .iter()
            .map(|(key, value)| (key.as_str(), value.as_str()))
            .collect();
        Self::into_reply(self.agent.post(url).send_form(&pairs))
    }
}
