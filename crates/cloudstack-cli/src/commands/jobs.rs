//! `job` and `wait` - inspect and await async jobs.

use std::time::Duration;

use anyhow::{Context, Result};
use cloudstack::jobs::QueryAsyncJobResultParams;
use cloudstack::{CloudStackClient, CloudStackError};
use colored::*;

use super::utils::{job_status_label, print_json, print_timeout};

/// Show the current state of one job.
pub fn status(client: &CloudStackClient, job_id: &str) -> Result<()> {
    let job = client
        .async_job()
        .query_async_job_result(&QueryAsyncJobResultParams::new(job_id))
        .with_context(|| format!("Failed to query job {}", job_id))?;

    eprintln!(
        "{} {} ({})",
        "Job".bold(),
        job_id.cyan(),
        job_status_label(job.jobstatus)
    );
    if !job.cmd.is_empty() {
        eprintln!("   command: {}", job.cmd);
    }
    print_json(&job.jobresult)
}

/// Poll a job until it finishes or `timeout` elapses.
pub fn wait(
    client: &CloudStackClient,
    job_id: &str,
    timeout: Duration,
) -> Result<()> {
    match client.get_async_job_result(job_id, timeout) {
        Ok(result) => {
            eprintln!("{} job {} finished", "✓".green(), job_id.cyan());
            print_json(&result)
        }
        Err(CloudStackError::AsyncTimeout { job_id, partial }) => {
            print_timeout(&job_id, &partial)?;
            std::process::exit(2);
        }
        Err(err) => Err(err).with_context(|| format!("Job {} did not complete", job_id)),
    }
}
