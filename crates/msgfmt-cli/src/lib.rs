//! # msgfmt CLI
//!
//! Formats a single ICU-style message pattern from the command line.
//!
//! Bindings are given as `NAME=VALUE`. Integers bind as integers, other
//! decimal numbers keep their exact digits and a bare `NAME` binds null.

#![warn(missing_docs)]
#![warn(clippy::all)]
#![warn(clippy::pedantic)]
#![warn(clippy::nursery)]
#![allow(clippy::module_name_repetitions)]

pub mod app;
pub mod error;

pub use app::*;
pub use error::*;
