//! Core module: grading scale, records, QPI aggregation, storage, and the store itself

pub mod config;
pub mod error;
pub mod grading;
pub mod models;
pub mod qpi;
pub mod report;
pub mod storage;
pub mod store;

pub use error::{StorageError, StoreError};
pub use store::GradeStore;

/// Returns the current version of the `qpi-tracker` crate
#[must_use]
pub const fn get_version() -> &'static str {
    env!("CARGO_PKG_VERSION")
}
