//! Canned server replies and configs.

use serde_json::{json, Value};

use crate::config::ClientConfig;
use crate::http::{HttpReply, PollPolicy};

/// Endpoint used by [`test_config`].
pub const TEST_API_URL: &str = "https://cloud.example.com/client/api";

/// A client config for mocked transports: fixed credentials, no poll delay.
pub fn test_config() -> ClientConfig {
    ClientConfig::new(TEST_API_URL, "test-api-key", "test-secret-key")
        .with_poll_policy(PollPolicy::no_delay())
}

/// Wraps a payload the way the server does: `{"<command>response": payload}`.
pub fn envelope(command: &str, payload: Value) -> String {
    let mut body = serde_json::Map::new();
    body.insert(format!("{}response", command.to_lowercase()), payload);
    Value::Object(body).to_string()
}

/// A 200 reply carrying `payload` for `command`.
pub fn ok_reply(command: &str, payload: Value) -> HttpReply {
    HttpReply::ok(envelope(command, payload))
}

/// The immediate reply of an async command.
pub fn job_started(command: &str, job_id: &str, resource_id: &str) -> HttpReply {
    ok_reply(command, json!({"id": resource_id, "jobid": job_id}))
}

/// A `queryAsyncJobResult` reply for a job that is still running.
pub fn job_pending(job_id: &str) -> HttpReply {
    ok_reply(
        "queryAsyncJobResult",
        json!({
            "jobid": job_id,
            "jobstatus": 0,
            "jobprocstatus": 0,
            "jobresultcode": 0
        }),
    )
}

/// A `queryAsyncJobResult` reply for a job that finished with `result`.
pub fn job_succeeded(job_id: &str, result: Value) -> HttpReply {
    ok_reply(
        "queryAsyncJobResult",
        json!({
            "jobid": job_id,
            "jobstatus": 1,
            "jobprocstatus": 0,
            "jobresultcode": 0,
            "jobresulttype": "object",
            "jobresult": result
        }),
    )
}

/// A `queryAsyncJobResult` reply for a failed job.
pub fn job_failed(job_id: &str, code: i64, text: &str) -> HttpReply {
    ok_reply(
        "queryAsyncJobResult",
        json!({
            "jobid": job_id,
            "jobstatus": 2,
            "jobprocstatus": 0,
            "jobresultcode": code,
            "jobresulttype": "object",
            "jobresult": {"errorcode": code, "errortext": text}
        }),
    )
}

/// A CloudStack error document with the given HTTP status.
pub fn api_error(command: &str, status: u16, code: i64, text: &str) -> HttpReply {
    HttpReply::new(
        status,
        envelope(
            command,
            json!({"uuidList": [], "errorcode": code, "cserrorcode": 4350, "errortext": text}),
        ),
    )
}
