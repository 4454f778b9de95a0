//! Integration tests for logger behavior.

use qpi_tracker::logger::{init_file_logging, set_level, set_level_from_str, Level};
use qpi_tracker::{debug, error, info, verbose, warn};
use tempfile::TempDir;

#[test]
fn level_parse_accepts_valid() {
    assert!(set_level_from_str("error"));
    assert!(set_level_from_str("warn"));
    assert!(set_level_from_str("info"));
    assert!(set_level_from_str("debug"));
}

#[test]
fn level_parse_rejects_invalid() {
    assert!(!set_level_from_str("invalid"));
    assert!(!set_level_from_str(""));
}

#[test]
fn logs_do_not_panic() {
    set_level(Level::Debug);
    info!("info integration");
    warn!("warn integration");
    error!("error integration");
    debug!("debug integration");
    verbose!("verbose integration");
}

#[test]
fn file_logging_creates_parent_dir() {
    let temp_dir = TempDir::new().unwrap();
    let log_path = temp_dir.path().join("logs").join("qpitrack.log");

    assert!(init_file_logging(&log_path));
    error!("written to file");

    assert!(log_path.exists());
}
