//! CLI command handlers for `qpitrack`.
//!
//! Each command group is implemented in its own submodule. Handlers that
//! touch grade data share the store opened here.

pub mod config;
pub mod grade;
pub mod record;
pub mod report;
pub mod semester;

use qpi_tracker::config::Config;
use qpi_tracker::core::storage::{FileKv, KvStorage};
use qpi_tracker::debug;
use qpi_tracker::GradeStore;
use uuid::Uuid;

/// Store backed by JSON files in the configured data directory
pub type Store = GradeStore<KvStorage<FileKv>>;

/// Open the store in `config.storage.data_dir` and load what it holds
pub fn open_store(config: &Config) -> Result<Store, String> {
    let dir = &config.storage.data_dir;
    debug!("Opening grade store in {dir}");
    GradeStore::open(KvStorage::new(FileKv::new(dir)))
        .map_err(|e| format!("✗ Failed to load grade data from {dir}: {e}"))
}

/// Resolve a full id or a unique id prefix against a list of known ids
///
/// `kind` names the entity in error messages ("grade", "semester").
pub fn resolve_id<I>(input: &str, known: I, kind: &str) -> Result<Uuid, String>
where
    I: IntoIterator<Item = Uuid>,
{
    if let Ok(id) = Uuid::parse_str(input) {
        return Ok(id);
    }

    let needle = input.to_ascii_lowercase();
    if needle.is_empty() {
        return Err(format!("✗ Empty {kind} id"));
    }
    let matches: Vec<Uuid> = known
        .into_iter()
        .filter(|id| id.to_string().starts_with(&needle))
        .collect();

    match matches.as_slice() {
        [id] => Ok(*id),
        [] => Err(format!("✗ No {kind} matches id '{input}'")),
        _ => Err(format!(
            "✗ Id '{input}' matches {} {kind}s; use more characters",
            matches.len()
        )),
    }
}

/// Resolve a semester id or prefix
pub fn resolve_semester(store: &Store, input: &str) -> Result<Uuid, String> {
    resolve_id(input, store.semesters().iter().map(|s| s.id), "semester")
}

/// Resolve a grade id or prefix
pub fn resolve_grade(store: &Store, input: &str) -> Result<Uuid, String> {
    resolve_id(input, store.grades().iter().map(|g| g.id), "grade")
}

/// First eight characters of an id, enough to pass back as a prefix
pub fn short_id(id: &Uuid) -> String {
    id.to_string().chars().take(8).collect()
}
