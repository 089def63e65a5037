//! Async job records and the `queryAsyncJobResult` / `listAsyncJobs` calls.
//!
//! Long-running commands return a job id instead of their result. The job is
//! then queried until its `jobstatus` becomes terminal:
//!
//! | `jobstatus` | Meaning |
//! |-------------|---------|
//! | 0 | pending |
//! | 1 | succeeded, `jobresult` holds the command's payload |
//! | 2 | failed, `jobresult` holds an error document or text |
//!
//! The polling loop itself lives on the client
//! ([`crate::CloudStackClient::get_async_job_result`]).

use serde::{Deserialize, Serialize};
use serde_json::Value;

use crate::client::CloudStackClient;
use crate::error::{ApiErrorBody, CloudStackError, CloudStackResult};
use crate::http::Transport;

/// Lifecycle state of an async job.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum JobStatus {
    Pending,
    Succeeded,
    Failed,
}

impl JobStatus {
    /// Maps the wire code; unknown codes are treated as still pending.
    pub fn from_code(code: i32) -> Self {
        match code {
            1 => JobStatus::Succeeded,
            2 => JobStatus::Failed,
            _ => JobStatus::Pending,
        }
    }

    pub fn is_terminal(self) -> bool {
        !matches!(self, JobStatus::Pending)
    }
}

/// How the result of a finished job is shaped.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum JobPayload {
    /// The record sits under a single resource key, e.g. `{"volume": {...}}`.
    Wrapped,
    /// The job result is the record itself, e.g. `{"success": true}`.
    Bare,
}

/// An async job as reported by `queryAsyncJobResult` and `listAsyncJobs`.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct AsyncJob {
    pub accountid: String,
    pub cmd: String,
    pub completed: String,
    pub created: String,
    pub jobid: String,
    pub jobinstanceid: String,
    pub jobinstancetype: String,
    pub jobprocstatus: i32,
    pub jobresult: Value,
    pub jobresultcode: i32,
    pub jobresulttype: String,
    pub jobstatus: i32,
    pub userid: String,
}

impl AsyncJob {
    pub fn status(&self) -> JobStatus {
        JobStatus::from_code(self.jobstatus)
    }

    /// Builds the error for a failed job from its result document.
    pub fn failure(&self, job_id: &str) -> CloudStackError {
        let job_id = job_id.to_string();

        if self.jobresulttype == "text" {
            let message = match &self.jobresult {
                Value::String(text) => text.clone(),
                other => other.to_string(),
            };
            return CloudStackError::JobFailed {
                job_id,
                code: None,
                message,
            };
        }

        match serde_json::from_value::<ApiErrorBody>(self.jobresult.clone()) {
            Ok(body) => CloudStackError::JobFailed {
                job_id,
                code: Some(body.errorcode),
                message: body.errortext,
            },
            Err(_) => CloudStackError::JobFailed {
                job_id,
                code: None,
                message: format!("Undefined error: {}", self.jobresult),
            },
        }
    }
}

cloudstack_params! {
    /// Parameters for `queryAsyncJobResult`.
    QueryAsyncJobResultParams {
        required {
            jobid: String => "jobid",
        }
        optional {}
    }
}

cloudstack_params! {
    /// Parameters for `listAsyncJobs`.
    ListAsyncJobsParams {
        required {}
        optional {
            account: String => "account",
            domainid: String => "domainid",
            isrecursive: bool => "isrecursive",
            keyword: String => "keyword",
            listall: bool => "listall",
            page: i32 => "page",
            pagesize: i32 => "pagesize",
            startdate: String => "startdate",
        }
    }
}

#[derive(Debug, Clone, Default, Deserialize)]
#[serde(default)]
pub struct ListAsyncJobsResponse {
    pub count: i64,
    #[serde(rename = "asyncjobs")]
    pub async_jobs: Vec<AsyncJob>,
}

/// Typed access to the async job commands.
pub struct AsyncJobService<'a, T: Transport> {
    client: &'a CloudStackClient<T>,
}

impl<'a, T: Transport> AsyncJobService<'a, T> {
    pub(crate) fn new(client: &'a CloudStackClient<T>) -> Self {
        Self { client }
    }

    /// Retrieves the current status of an async job.
    pub fn query_async_job_result(
        &self,
        params: &QueryAsyncJobResultParams,
    ) -> CloudStackResult<AsyncJob> {
        self.client.call("queryAsyncJobResult", params)
    }

    /// Lists pending and recently finished async jobs for the caller.
    pub fn list_async_jobs(
        &self,
        params: &ListAsyncJobsParams,
    ) -> CloudStackResult<ListAsyncJobsResponse> {
        self.client.call("listAsyncJobs", params)
    }
}
