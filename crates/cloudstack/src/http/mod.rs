//! HTTP plumbing for the client.
//!
//! - [`Transport`] / [`HttpTransport`]: delivery of signed requests
//! - [`PollPolicy`]: backoff between async job status queries

mod poll;
mod transport;

pub use poll::PollPolicy;
pub use transport::{HttpReply, HttpTransport, Transport};
