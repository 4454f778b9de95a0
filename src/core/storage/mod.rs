//! Persistence ports and backends
//!
//! The store talks to a [`GradeStorage`]. The stock implementation,
//! [`KvStorage`], keeps one JSON document per collection in any
//! [`KeyValueStore`]: [`MemoryKv`] for tests, [`FileKv`] for the CLI.

pub mod file;
pub mod memory;

pub use file::FileKv;
pub use memory::MemoryKv;

use crate::core::error::StorageError;
use crate::core::models::{AcademicRecord, GradeRecord, SemesterRecord};
use serde::de::DeserializeOwned;
use serde::Serialize;

/// Key holding the flat grade list
pub const GRADES_KEY: &str = "grades";

/// Key holding the semester list
pub const SEMESTERS_KEY: &str = "semesters";

/// Key holding the academic record
pub const ACADEMIC_RECORD_KEY: &str = "academic_record";

/// What the grade store needs from durable storage.
///
/// Loads return the last-saved value, or an empty default when nothing has
/// been saved. Saves overwrite the previous value as a whole.
pub trait GradeStorage {
    /// Load all grades
    ///
    /// # Errors
    /// Returns an error if the backend fails or the stored value is unreadable
    fn load_grades(&self) -> Result<Vec<GradeRecord>, StorageError>;

    /// Replace all grades
    ///
    /// # Errors
    /// Returns an error if the backend fails
    fn save_grades(&mut self, grades: &[GradeRecord]) -> Result<(), StorageError>;

    /// Load all semesters
    ///
    /// # Errors
    /// Returns an error if the backend fails or the stored value is unreadable
    fn load_semesters(&self) -> Result<Vec<SemesterRecord>, StorageError>;

    /// Replace all semesters
    ///
    /// # Errors
    /// Returns an error if the backend fails
    fn save_semesters(&mut self, semesters: &[SemesterRecord]) -> Result<(), StorageError>;

    /// Load the academic record, if one was saved
    ///
    /// # Errors
    /// Returns an error if the backend fails or the stored value is unreadable
    fn load_academic_record(&self) -> Result<Option<AcademicRecord>, StorageError>;

    /// Replace the academic record; `None` deletes it
    ///
    /// # Errors
    /// Returns an error if the backend fails
    fn save_academic_record(&mut self, record: Option<&AcademicRecord>)
        -> Result<(), StorageError>;

    /// Remove everything
    ///
    /// # Errors
    /// Returns an error if the backend fails
    fn clear(&mut self) -> Result<(), StorageError>;
}

/// A string-keyed, string-valued durable store
pub trait KeyValueStore {
    /// Read a value
    ///
    /// # Errors
    /// Returns an error if the backend fails
    fn get(&self, key: &str) -> Result<Option<String>, StorageError>;

    /// Write a value, replacing any previous one
    ///
    /// # Errors
    /// Returns an error if the backend fails
    fn set(&mut self, key: &str, value: &str) -> Result<(), StorageError>;

    /// Delete a value; deleting a missing key is not an error
    ///
    /// # Errors
    /// Returns an error if the backend fails
    fn remove(&mut self, key: &str) -> Result<(), StorageError>;
}

/// [`GradeStorage`] over a [`KeyValueStore`], encoding each collection as JSON
#[derive(Debug, Default)]
pub struct KvStorage<K> {
    kv: K,
}

impl<K: KeyValueStore> KvStorage<K> {
    /// Wrap a key-value store
    #[must_use]
    pub const fn new(kv: K) -> Self {
        Self { kv }
    }

    /// Access the underlying key-value store
    #[must_use]
    pub const fn kv(&self) -> &K {
        &self.kv
    }

    /// Mutable access to the underlying key-value store
    pub fn kv_mut(&mut self) -> &mut K {
        &mut self.kv
    }

    fn read<T: DeserializeOwned>(&self, key: &str) -> Result<Option<T>, StorageError> {
        self.kv
            .get(key)?
            .map(|raw| serde_json::from_str(&raw))
            .transpose()
            .map_err(StorageError::from)
    }

    fn write<T: Serialize + ?Sized>(&mut self, key: &str, value: &T) -> Result<(), StorageError> {
        let raw = serde_json::to_string(value)?;
        self.kv.set(key, &raw)
    }
}

impl<K: KeyValueStore> GradeStorage for KvStorage<K> {
    fn load_grades(&self) -> Result<Vec<GradeRecord>, StorageError> {
        Ok(self.read(GRADES_KEY)?.unwrap_or_default())
    }

    fn save_grades(&mut self, grades: &[GradeRecord]) -> Result<(), StorageError> {
        self.write(GRADES_KEY, grades)
    }

    fn load_semesters(&self) -> Result<Vec<SemesterRecord>, StorageError> {
        Ok(self.read(SEMESTERS_KEY)?.unwrap_or_default())
    }

    fn save_semesters(&mut self, semesters: &[SemesterRecord]) -> Result<(), StorageError> {
        self.write(SEMESTERS_KEY, semesters)
    }

    fn load_academic_record(&self) -> Result<Option<AcademicRecord>, StorageError> {
        self.read(ACADEMIC_RECORD_KEY)
    }

    fn save_academic_record(
        &mut self,
        record: Option<&AcademicRecord>,
    ) -> Result<(), StorageError> {
        match record {
            Some(record) => self.write(ACADEMIC_RECORD_KEY, record),
            None => self.kv.remove(ACADEMIC_RECORD_KEY),
        }
    }

    fn clear(&mut self) -> Result<(), StorageError> {
        self.kv.remove(GRADES_KEY)?;
        self.kv.remove(SEMESTERS_KEY)?;
        self.kv.remove(ACADEMIC_RECORD_KEY)
    }
}
