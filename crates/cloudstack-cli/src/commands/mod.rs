//! CLI command handlers organized by subcommand.
//!
//! | Module | Commands |
//! |--------|----------|
//! | [`call`] | `call` - Issue any API command |
//! | [`jobs`] | `job`, `wait` - Inspect and await async jobs |

pub mod call;
pub mod jobs;
pub mod utils;

pub use utils::*;
