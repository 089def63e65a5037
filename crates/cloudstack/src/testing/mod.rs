//! Testing utilities.
//!
//! A scripted [`MockTransport`] plus canned server replies, so client code
//! can be exercised without a management server.
//!
//! ## Usage
//!
//! ```rust,ignore
//! use std::sync::Arc;
//! use cloudstack::testing::{fixtures, MockTransport};
//!
//! let transport = Arc::new(MockTransport::new().with_replies([
//!     fixtures::job_started("createVolume", "job-1", "vol-1"),
//!     fixtures::job_pending("job-1"),
//!     fixtures::job_succeeded("job-1", json!({"volume": {"id": "vol-1"}})),
//! ]));
//! ```

pub mod fixtures;
pub mod mocks;

pub use mocks::*;
