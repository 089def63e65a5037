//! `call` - issue any API command with free-form parameters.
//!
//! The started job is followed only when the client is in async mode, which
//! `csctl call` enables with `--wait`.

use anyhow::{Context, Result};
use cloudstack::{
    CloudStackClient, CloudStackError, CloudStackResult, JobPayload, ParamSet, Transport,
};
use serde_json::Value;
use tracing::debug;

use super::utils::{parse_params, print_json, print_timeout};

pub fn run<T: Transport>(
    client: &CloudStackClient<T>,
    command: &str,
    raw_params: &[String],
) -> Result<()> {
    let params = parse_params(raw_params)?;

    match execute(client, command, &params) {
        Ok(result) => print_json(&result),
        Err(CloudStackError::AsyncTimeout { job_id, partial }) => {
            print_timeout(&job_id, &partial)?;
            std::process::exit(2);
        }
        Err(err) => Err(err).with_context(|| format!("{} failed", command)),
    }
}

/// Issue `command`; in async mode, follow the job it starts.
fn execute<T: Transport>(
    client: &CloudStackClient<T>,
    command: &str,
    params: &ParamSet,
) -> CloudStackResult<Value> {
    debug!(command, parameters = params.len(), "issuing command");
    let payload = client.request(command, params)?;
    client.complete(command, payload, JobPayload::Bare)
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::sync::Arc;

    use cloudstack::testing::{fixtures, MockTransport};
    use serde_json::json;

    fn scripted() -> Arc<MockTransport> {
        Arc::new(MockTransport::new().with_replies([
            fixtures::job_started("startRouter", "job-1", "r-1"),
            fixtures::job_succeeded("job-1", json!({"router": {"id": "r-1", "state": "Running"}})),
        ]))
    }

    #[test]
    fn test_without_wait_prints_initial_reply() {
        let transport = scripted();
        let config = fixtures::test_config().with_async_mode(false);
        let client = CloudStackClient::with_transport(config, transport.clone()).unwrap();

        let result = execute(&client, "startRouter", &ParamSet::new()).unwrap();

        assert_eq!(result["jobid"], "job-1");
        assert_eq!(transport.request_count(), 1);
    }

    #[test]
    fn test_wait_follows_job() {
        let transport = scripted();
        let config = fixtures::test_config().with_async_mode(true);
        let client = CloudStackClient::with_transport(config, transport.clone()).unwrap();

        let result = execute(&client, "startRouter", &ParamSet::new()).unwrap();

        assert_eq!(result["router"]["state"], "Running");
        assert_eq!(result["jobid"], "job-1");
        assert_eq!(transport.request_count(), 2);
    }
}
