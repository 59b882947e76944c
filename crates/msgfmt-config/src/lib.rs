//! # msgfmt Config
//!
//! Type-safe configuration management for msgfmt.
//!
//! This crate provides the configuration schema (engine settings, plural
//! rule tables, logging), loading from TOML, YAML or JSON with environment
//! overrides, and validation.

#![warn(missing_docs)]
#![warn(clippy::all)]
#![warn(clippy::pedantic)]
#![warn(clippy::nursery)]
#![allow(clippy::module_name_repetitions)]

pub mod defaults;
pub mod error;
pub mod loader;
pub mod schema;
pub mod validator;

pub use error::{ConfigError, ConfigResult};
pub use loader::*;
pub use schema::*;
pub use validator::*;
