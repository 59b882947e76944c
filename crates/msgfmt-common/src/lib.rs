//! # msgfmt Common
//!
//! Shared types, logging setup and test utilities for the msgfmt workspace.
//!
//! This crate provides the foundational pieces used across the other crates:
//! locale tags, structured logging initialization and the helpers the test
//! suites share.

#![warn(missing_docs)]
#![warn(clippy::all)]
#![warn(clippy::pedantic)]
#![warn(clippy::nursery)]
#![allow(clippy::module_name_repetitions)]

pub mod error;
pub mod logging;
pub mod types;
pub mod utils;

#[cfg(any(test, feature = "testing"))]
pub mod test_utils;

pub use error::{CommonError, CommonResult};
pub use logging::{init_default_logging, init_dev_logging, init_logging, LoggingConfig};
pub use types::*;
pub use utils::*;
