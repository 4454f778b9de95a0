//! Shared library for `qpi-tracker`
//! Contains the grade store, QPI arithmetic, and persistence used by the CLI.

pub mod core;
pub mod logger;

pub use core::{config, get_version, GradeStore};
