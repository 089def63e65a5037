//! Mock transport for testing.
//!
//! Replies are scripted up front and handed out in order; every request the
//! client sends is recorded so tests can assert on methods and parameters.

use std::collections::VecDeque;
use std::sync::Mutex;

use crate::error::{CloudStackError, CloudStackResult};
use crate::http::{HttpReply, Transport};

/// HTTP method of a recorded request.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Method {
    Get,
    Post,
}

/// A request as seen by the mock transport.
#[derive(Debug, Clone, PartialEq)]
pub struct RecordedRequest {
    pub method: Method,
    pub url: String,
    /// Form fields for POSTs; empty for GETs.
    pub form: Vec<(String, String)>,
}

impl RecordedRequest {
    /// All parameters, decoded from the query string or the form body.
    pub fn params(&self) -> Vec<(String, String)> {
        match self.method {
            Method::Post => self.form.clone(),
            Method::Get => match self.url.split_once('?') {
                Some((_, query)) => url::form_urlencoded::parse(query.as_bytes())
                    .into_owned()
                    .collect(),
                None => Vec::new(),
            },
        }
    }

    /// A single decoded parameter.
    pub fn param(&self, key: &str) -> Option<String> {
        self.params()
            .into_iter()
            .find(|(k, _)| k == key)
            .map(|(_, value)| value)
    }

    /// The `command` parameter.
    pub fn command(&self) -> Option<String> {
        self.param("command")
    }
}

enum Scripted {
    Reply(HttpReply),
    Fail(String),
}

/// A transport that answers from a script.
///
/// # Example
///
/// ```rust,ignore
/// use std::sync::Arc;
/// use cloudstack::testing::{fixtures, MockTransport};
///
/// let transport = Arc::new(
///     MockTransport::new().with_reply(fixtures::ok_reply("listRoles", json!({"count": 0}))),
/// );
/// let client = CloudStackClient::with_transport(fixtures::test_config(), transport.clone())?;
/// client.role().list_roles(&ListRolesParams::new())?;
/// assert_eq!(transport.request_count(), 1);
/// ```
#[derive(Default)]
pub struct MockTransport {
    script: Mutex<VecDeque<Scripted>>,
    requests: Mutex<Vec<RecordedRequest>>,
}

impl MockTransport {
    pub fn new() -> Self {
        Self::default()
    }

    /// Queue a reply.
    pub fn with_reply(self, reply: HttpReply) -> Self {
        self.push_reply(reply);
        self
    }

    /// Queue several replies in order.
    pub fn with_replies(self, replies: impl IntoIterator<Item = HttpReply>) -> Self {
        for reply in replies {
            self.push_reply(reply);
        }
        self
    }

    /// Queue a transport failure.
    pub fn with_failure(self, message: impl Into<String>) -> Self {
        self.lock_script().push_back(Scripted::Fail(message.into()));
        self
    }

    /// Queue a reply on a shared transport.
    pub fn push_reply(&self, reply: HttpReply) {
        self.lock_script().push_back(Scripted::Reply(reply));
    }

    /// Every request received so far.
    pub fn requests(&self) -> Vec<RecordedRequest> {
        self.lock_requests().clone()
    }

    pub fn request_count(&self) -> usize {
        self.lock_requests().len()
    }

    /// Number of scripted replies not yet consumed.
    pub fn remaining(&self) -> usize {
        self.lock_script().len()
    }

    fn answer(&self, request: RecordedRequest) -> CloudStackResult<HttpReply> {
        self.lock_requests().push(request);
        match self.lock_script().pop_front() {
            Some(Scripted::Reply(reply)) => Ok(reply),
            Some(Scripted::Fail(message)) => Err(CloudStackError::TransportError(message)),
            None => Err(CloudStackError::TransportError(
                "MockTransport has no scripted reply left".to_string(),
            )),
        }
    }

    fn lock_script(&self) -> std::sync::MutexGuard<'_, VecDeque<Scripted>> {
        self.script.lock().unwrap_or_else(|poisoned| poisoned.into_inner())
    }

    fn lock_requests(&self) -> std::sync::MutexGuard<'_, Vec<RecordedRequest>> {
        self.requests.lock().unwrap_or_else(|poisoned| poisoned.into_inner())
    }
}

impl Transport for MockTransport {
    fn get(&self, url: &str) -> CloudStackResult<HttpReply> {
        self.answer(RecordedRequest {
            method: Method::Get,
            url: url.to_string(),
            form: Vec::new(),
        })
    }

    fn post_form(&self, url: &str, form: &[(String, String)]) -> CloudStackResult<HttpReply> {
        self.answer(RecordedRequest {
            method: Method::Post,
            url: url.to_string(),
            form: form.to_vec(),
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_replies_in_order() {
        let transport = MockTransport::new()
            .with_reply(HttpReply::ok("first"))
            .with_reply(HttpReply::new(500, "second"));

        assert_eq!(transport.get("http://h/api?a=1").unwrap().body, "first");
        assert_eq!(transport.get("http://h/api?a=2").unwrap().status, 500);
        assert!(transport.get("http://h/api").is_err());
        assert_eq!(transport.request_count(), 3);
        assert_eq!(transport.remaining(), 0);
    }

    #[test]
    fn test_scripted_failure() {
        let transport = MockTransport::new().with_failure("connection reset");
        let err = transport.get("http://h/api").unwrap_err();
        assert_eq!(err.to_string(), "Transport error: connection reset");
    }

    #[test]
    fn test_recorded_params() {
        let transport = MockTransport::new()
            .with_reply(HttpReply::ok("{}"))
            .with_reply(HttpReply::ok("{}"));

        transport
            .get("http://h/api?command=listRoles&name=web+01")
            .unwrap();
        transport
            .post_form(
                "http://h/api",
                &[("command".to_string(), "deployVirtualMachine".to_string())],
            )
            .unwrap();

        let requests = transport.requests();
        assert_eq!(requests[0].method, Method::Get);
        assert_eq!(requests[0].command().as_deref(), Some("listRoles"));
        assert_eq!(requests[0].param("name").as_deref(), Some("web 01"));
        assert_eq!(requests[1].method, Method::Post);
        assert_eq!(requests[1].command().as_deref(), Some("deployVirtualMachine"));
    }
}
