//! Persistence for the question list.
//!
//! The question list lives in a single JSON file holding an array of
//! `{id, text, order}` entries. Callers depend on the [`QuestionRepository`]
//! capability rather than a concrete store, so tests can substitute an
//! in-memory implementation.

use std::path::{Path, PathBuf};

use crate::error::Result;
use crate::questions::{Question, QuestionSet};

/// Capability for loading and saving the question list.
pub trait QuestionRepository {
    /// Load the persisted set, or `None` when nothing has been saved yet.
    fn load(&self) -> Result<Option<QuestionSet>>;

    /// Persist the full set, replacing any previous contents.
    fn save(&self, set: &QuestionSet) -> Result<()>;
}

impl<R: QuestionRepository + ?Sized> QuestionRepository for &R {
    fn load(&self) -> Result<Option<QuestionSet>> {
        (**self).load()
    }

    fn save(&self, set: &QuestionSet) -> Result<()> {
        (**self).save(set)
    }
}

/// Load the persisted set, seeding the default list on first use.
pub fn load_or_seed<R: QuestionRepository>(repo: &R) -> Result<QuestionSet> {
    match repo.load()? {
        Some(set) => Ok(set),
        None => {
            let set = QuestionSet::default_set();
            log::info!("no persisted question list found, seeding {} defaults", set.len());
            repo.save(&set)?;
            Ok(set)
        },
    }
}

/// JSON-file backed question store.
#[derive(Debug, Clone)]
pub struct JsonQuestionStore {
    path: PathBuf,
}

impl JsonQuestionStore {
    /// Default file name for the persisted list.
    pub const DEFAULT_FILE_NAME: &'static str = "medical_questions.json";

    /// Create a store at an explicit file path.
    pub fn new(path: impl Into<PathBuf>) -> Self {
        Self { path: path.into() }
    }

    /// Create a store using the default file name inside `dir`.
    pub fn in_dir(dir: impl AsRef<Path>) -> Self {
        Self::new(dir.as_ref().join(Self::DEFAULT_FILE_NAME))
    }

    /// The backing file path.
    pub fn path(&self) -> &Path {
        &self.path
    }
}

impl QuestionRepository for JsonQuestionStore {
    fn load(&self) -> Result<Option<QuestionSet>> {
        let data = match std::fs::read(&self.path) {
            Ok(data) => data,
            Err(e) if e.kind() == std::io::ErrorKind::NotFound => return Ok(None),
            Err(e) => return Err(e.into()),
        };
        let questions: Vec<Question> = serde_json::from_slice(&data)?;
        log::debug!("loaded {} questions from {}", questions.len(), self.path.display());
        Ok(Some(QuestionSet::from_questions(questions)))
    }

    fn save(&self, set: &QuestionSet) -> Result<()> {
        let data = serde_json::to_vec_pretty(set.questions())?;
        std::fs::write(&self.path, data)?;
        log::debug!("saved {} questions to {}", set.len(), self.path.display());
        Ok(())
    }
}

/// In-memory question store, for tests and ephemeral sessions.
#[derive(Debug, Default)]
pub struct MemoryQuestionStore {
    inner: std::cell::RefCell<Option<QuestionSet>>,
}

impl MemoryQuestionStore {
    /// Create an empty in-memory store.
    pub fn new() -> Self {
        Self::default()
    }
}

impl QuestionRepository for MemoryQuestionStore {
    fn load(&self) -> Result<Option<QuestionSet>> {
        Ok(self.inner.borrow().clone())
    }

    fn save(&self, set: &QuestionSet) -> Result<()> {
        *self.inner.borrow_mut() = Some(set.clone());
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_memory_store_round_trip() {
        let store = MemoryQuestionStore::new();
        assert!(store.load().unwrap().is_none());

        let set = QuestionSet::default_set();
        store.save(&set).unwrap();
        assert_eq!(store.load().unwrap().unwrap(), set);
    }

    #[test]
    fn test_load_or_seed_seeds_defaults_once() {
        let store = MemoryQuestionStore::new();
        let set = load_or_seed(&store).unwrap();
        assert_eq!(set.len(), 20);

        // Seeded data is now persisted and survives a mutation.
        let mut set = load_or_seed(&store).unwrap();
        set.remove(1);
        store.save(&set).unwrap();
        assert_eq!(load_or_seed(&store).unwrap().len(), 19);
    }
}
