//! CloudStack - typed client for the Apache CloudStack management API.
//!
//! This crate provides:
//! - Parameter structs with builder setters for every supported command
//! - Signed GET/POST dispatch and decoding into typed response records
//! - Async job completion with a timeout that keeps the partial result
//!
//! # Architecture
//!
//! Every call follows the same path:
//!
//! ```text
//! XxxParams::new(..).with_..()  →  ToParams  →  sign  →  Transport
//!                                                        ↓
//!          typed record  ←  decode  ←  unwrap envelope  ←  reply
//!                                   ↖ poll queryAsyncJobResult (async commands)
//! ```
//!
//! # Quick Start
//!
//! ```rust,no_run
//! use cloudstack::services::volume::{CreateVolumeParams, ListVolumesParams};
//! use cloudstack::{ClientConfig, CloudStackClient};
//!
//! # fn main() -> cloudstack::CloudStackResult<()> {
//! let config = ClientConfig::new(
//!     "https://cloud.example.com/client/api",
//!     "$CLOUDSTACK_API_KEY",
//!     "$CLOUDSTACK_SECRET_KEY",
//! )
//! .with_async_timeout(600);
//! let client = CloudStackClient::new(config)?;
//!
//! let volume = client.volume().create_volume(
//!     &CreateVolumeParams::new()
//!         .with_name("data-01")
//!         .with_diskofferingid("b7f1e4a2")
//!         .with_zoneid("zone-1"),
//! );
//!
//! match volume {
//!     Ok(volume) => println!("created {}", volume.id),
//!     Err(err) if err.is_timeout() => {
//!         let started: Option<cloudstack::services::volume::Volume> = err.partial_result();
//!         println!("still running: {:?}", started.map(|v| v.jobid));
//!     }
//!     Err(err) => return Err(err),
//! }
//!
//! let volumes = client.volume().list_volumes(&ListVolumesParams::new().with_listall(true))?;
//! println!("{} volumes", volumes.count);
//! # Ok(())
//! # }
//! ```

pub mod config;
pub mod error;
pub mod http;
#[macro_use]
pub mod params;
pub mod client;
pub mod decode;
pub mod jobs;
pub mod services;
pub mod signing;
pub mod testing;

pub use client::CloudStackClient;
pub use config::ClientConfig;
pub use error::{CloudStackError, CloudStackResult};
pub use http::{HttpReply, HttpTransport, PollPolicy, Transport};
pub use jobs::{AsyncJob, JobPayload, JobStatus};
pub use params::{DetailsMap, KeyValueMap, ParamSet, ToParams};
pub use services::LookupOption;
