//! The CloudStack client: request dispatch and async job completion.

use std::time::{Duration, Instant};

use log::{debug, info, warn};
use serde::de::DeserializeOwned;
use serde_json::Value;
use url::Url;

use crate::config::ClientConfig;
use crate::decode::{decode_payload, unwrap_envelope, unwrap_record};
use crate::error::{ApiErrorBody, CloudStackError, CloudStackResult};
use crate::http::{HttpReply, HttpTransport, Transport};
use crate::jobs::{AsyncJob, AsyncJobService, JobPayload, JobStatus, QueryAsyncJobResultParams};
use crate::params::ToParams;
use crate::services::disk_offering::DiskOfferingService;
use crate::services::iso::IsoService;
use crate::services::role::RoleService;
use crate::services::router::RouterService;
use crate::services::virtual_machine::VirtualMachineService;
use crate::services::volume::VolumeService;
use crate::services::LookupOption;
use crate::signing;

/// Commands sent as form POSTs unless the client is GET-only.
const POST_COMMANDS: &[&str] = &["deployVirtualMachine", "login", "updateVirtualMachine"];

/// Client for a single CloudStack management server.
///
/// # Example
///
/// ```rust,ignore
/// use cloudstack::{ClientConfig, CloudStackClient};
/// use cloudstack::services::volume::ListVolumesParams;
///
/// let client = CloudStackClient::new(ClientConfig::from_env()?)?;
/// let volumes = client.volume().list_volumes(&ListVolumesParams::new().with_listall(true))?;
/// for volume in volumes.volumes {
///     println!("{} {}", volume.id, volume.name);
/// }
/// ```
pub struct CloudStackClient<T: Transport = HttpTransport> {
    config: ClientConfig,
    api_url: Url,
    api_key: String,
    secret_key: String,
    transport: T,
}

impl CloudStackClient<HttpTransport> {
    /// Creates a client that talks HTTP(S) through `ureq`.
    pub fn new(config: ClientConfig) -> CloudStackResult<Self> {
        let transport = HttpTransport::new(&config)?;
        Self::with_transport(config, transport)
    }

    /// Creates a client from the `CLOUDSTACK_*` environment variables.
    pub fn from_env() -> CloudStackResult<Self> {
        Self::new(ClientConfig::from_env()?)
    }
}

impl<T: Transport> CloudStackClient<T> {
    /// Creates a client over a custom transport.
    pub fn with_transport(config: ClientConfig, transport: T) -> CloudStackResult<Self> {
        let api_url = Url::parse(&config.api_url)
            .map_err(|err| CloudStackError::InvalidUrl(format!("{}: {}", config.api_url, err)))?;
        // The signed query replaces the whole query string.
        if api_url.query().is_some() {
            return Err(CloudStackError::InvalidUrl(format!(
                "{}: must not carry a query string",
                config.api_url
            )));
        }
        let api_key = config.resolve_api_key()?;
        let secret_key = config.resolve_secret_key()?;

        debug!(
            "CloudStack client for {} (async: {}, timeout: {}s)",
            api_url, config.async_mode, config.async_timeout_secs
        );

        Ok(Self {
            config,
            api_url,
            api_key,
            secret_key,
            transport,
        })
    }

    pub fn config(&self) -> &ClientConfig {
        &self.config
    }

    pub fn transport(&self) -> &T {
        &self.transport
    }

    /// Whether async commands wait for their job to finish.
    pub fn is_async(&self) -> bool {
        self.config.async_mode
    }

    /// Lookup options derived from the configured default project and zone.
    pub fn default_lookup_options(&self) -> Vec<LookupOption> {
        let mut options = Vec::new();
        if let Some(project_id) = &self.config.project_id {
            options.push(LookupOption::Project(project_id.clone()));
        }
        if let Some(zone_id) = &self.config.zone_id {
            options.push(LookupOption::Zone(zone_id.clone()));
        }
        options
    }

    /// Issues one command and returns its unwrapped payload.
    pub fn request(&self, command: &str, params: &impl ToParams) -> CloudStackResult<Value> {
        let mut params = params.to_params();
        params.set("apiKey", self.api_key.as_str());
        params.set("command", command);
        params.set("response", "json");

        let query = signing::encode_values(&params);
        let signature = signing::sign(&query, &self.secret_key)?;

        let reply = if self.uses_post(command) {
            debug!("POST {} ({} parameters)", command, params.len());
            params.set("signature", signature);
            self.transport
                .post_form(self.api_url.as_str(), &params.to_pairs())?
        } else {
            debug!("GET {} ({} parameters)", command, params.len());
            let mut url = self.api_url.clone();
            url.set_query(Some(&format!(
                "{}&signature={}",
                query,
                signing::encode_component(&signature)
            )));
            self.transport.get(url.as_str())?
        };

        Self::read_reply(command, reply)
    }

    /// Issues one command and decodes its payload.
    pub fn call<R: DeserializeOwned>(
        &self,
        command: &str,
        params: &impl ToParams,
    ) -> CloudStackResult<R> {
        let payload = self.request(command, params)?;
        decode_payload(command, payload)
    }

    /// Issues one command whose payload nests the record under `key`.
    pub fn call_record<R: DeserializeOwned>(
        &self,
        command: &str,
        params: &impl ToParams,
        key: &str,
    ) -> CloudStackResult<R> {
        let payload = self.request(command, params)?;
        decode_payload(command, unwrap_record(payload, key))
    }

    /// Issues an async command and, in async mode, waits for its job.
    ///
    /// On timeout the error carries the initial response, which decodes into
    /// `R` with at least the job id set.
    pub fn call_async<R: DeserializeOwned>(
        &self,
        command: &str,
        params: &impl ToParams,
        shape: JobPayload,
    ) -> CloudStackResult<R> {
        let initial = self.request(command, params)?;
        let payload = self.complete(command, initial, shape)?;
        decode_payload(command, payload)
    }

    /// Follows the job started by `initial`, returning the payload to decode.
    pub fn complete(
        &self,
        command: &str,
        initial: Value,
        shape: JobPayload,
    ) -> CloudStackResult<Value> {
        if !self.config.async_mode {
            return Ok(initial);
        }

        let job_id = match initial.get("jobid").and_then(Value::as_str) {
            Some(job_id) if !job_id.is_empty() => job_id.to_string(),
            _ => return Ok(initial),
        };
        debug!("{} started job {}", command, job_id);

        let result = match self.get_async_job_result(&job_id, self.config.async_timeout()) {
            Ok(result) => result,
            Err(CloudStackError::AsyncTimeout { job_id, .. }) => {
                return Err(CloudStackError::AsyncTimeout {
                    job_id,
                    partial: initial,
                })
            }
            Err(err) => return Err(err),
        };

        let mut payload = match shape {
            JobPayload::Wrapped => unwrap_envelope(result),
            JobPayload::Bare => result,
        };
        if payload.is_null() {
            payload = Value::Object(Default::default());
        }
        merge_missing(&mut payload, &initial);
        Ok(payload)
    }

    /// Polls a job until it finishes or `timeout` elapses, returning the
    /// job's `jobresult` on success.
    ///
    /// On timeout the error carries the last job record seen.
    pub fn get_async_job_result(&self, job_id: &str, timeout: Duration) -> CloudStackResult<Value> {
        let params = QueryAsyncJobResultParams::new(job_id);
        let started = Instant::now();
        let mut queries = 0u32;

        loop {
            let raw = self.request("queryAsyncJobResult", &params)?;
            let job: AsyncJob = decode_payload("queryAsyncJobResult", raw.clone())?;
            queries += 1;

            match job.status() {
                JobStatus::Succeeded => {
                    info!(
                        "Job {} finished after {} queries in {:?}",
                        job_id,
                        queries,
                        started.elapsed()
                    );
                    return Ok(job.jobresult);
                }
                JobStatus::Failed => {
                    let err = job.failure(job_id);
                    warn!("{}", err);
                    return Err(err);
                }
                JobStatus::Pending => {}
            }

            let elapsed = started.elapsed();
            if elapsed >= timeout {
                warn!(
                    "Timed out waiting for job {} after {:?} ({} queries)",
                    job_id, elapsed, queries
                );
                return Err(CloudStackError::AsyncTimeout {
                    job_id: job_id.to_string(),
                    partial: raw,
                });
            }

            let delay = self
                .config
                .poll
                .delay_for_attempt(queries)
                .min(timeout - elapsed);
            debug!(
                "Job {} still pending (progress {}), next query in {:?}",
                job_id, job.jobprocstatus, delay
            );
            if !delay.is_zero() {
                std::thread::sleep(delay);
            }
        }
    }

    pub fn async_job(&self) -> AsyncJobService<'_, T> {
        AsyncJobService::new(self)
    }

    pub fn role(&self) -> RoleService<'_, T> {
        RoleService::new(self)
    }

    pub fn volume(&self) -> VolumeService<'_, T> {
        VolumeService::new(self)
    }

    pub fn virtual_machine(&self) -> VirtualMachineService<'_, T> {
        VirtualMachineService::new(self)
    }

    pub fn router(&self) -> RouterService<'_, T> {
        RouterService::new(self)
    }

    pub fn disk_offering(&self) -> DiskOfferingService<'_, T> {
        DiskOfferingService::new(self)
    }

    pub fn iso(&self) -> IsoService<'_, T> {
        IsoService::new(self)
    }

    fn uses_post(&self, command: &str) -> bool {
        !self.config.http_get_only && POST_COMMANDS.contains(&command)
    }

    fn read_reply(command: &str, reply: HttpReply) -> CloudStackResult<Value> {
        let parsed = serde_json::from_str::<Value>(&reply.body);

        if reply.status == 200 {
            let body = parsed.map_err(|err| CloudStackError::decode(command, err))?;
            return Ok(unwrap_envelope(body));
        }

        let api_error = parsed
            .ok()
            .map(unwrap_envelope)
            .and_then(|body| serde_json::from_value::<ApiErrorBody>(body).ok());

        match api_error {
            Some(body) => {
                debug!("{} failed with API error {}", command, body.errorcode);
                Err(body.into())
            }
            None => Err(CloudStackError::HttpError {
                status: reply.status,
                body: reply.body,
            }),
        }
    }
}

/// Copies fields of the initial response (e.g. `jobid`) that the final job
/// result does not set.
fn merge_missing(payload: &mut Value, initial: &Value) {
    if let (Value::Object(target), Value::Object(source)) = (payload, initial) {
        for (key, value) in source {
            target.entry(key.clone()).or_insert_with(|| value.clone());
        }
    }
}
