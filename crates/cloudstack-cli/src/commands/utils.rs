//! Shared utility functions for CLI commands.

use anyhow::{bail, Result};
use cloudstack::ParamSet;
use colored::*;
use serde_json::Value;

/// Parse `KEY=VALUE` arguments into a parameter set.
///
/// The value may itself contain `=`; only the first one splits.
pub fn parse_params(args: &[String]) -> Result<ParamSet> {
    let mut params = ParamSet::new();
    for arg in args {
        let Some((key, value)) = arg.split_once('=') else {
            bail!("Invalid parameter '{}': expected KEY=VALUE", arg);
        };
        if key.is_empty() {
            bail!("Invalid parameter '{}': empty key", arg);
        }
        params.set(key, value);
    }
    Ok(params)
}

/// Print a JSON payload.
pub fn print_json(payload: &Value) -> Result<()> {
    println!("{}", serde_json::to_string_pretty(payload)?);
    Ok(())
}

/// Report a job that outlived its timeout along with what was known so far.
pub fn print_timeout(job_id: &str, partial: &Value) -> Result<()> {
    eprintln!(
        "{} job {} is still running; partial result follows",
        "⏳".yellow(),
        job_id.cyan()
    );
    print_json(partial)
}

/// Human label for a numeric job status.
pub fn job_status_label(code: i32) -> ColoredString {
    match code {
        0 => "pending".yellow(),
        1 => "succeeded".green(),
        2 => "failed".red(),
        _ => format!("unknown ({})", code).normal(),
    }
}
