//! The quiz library.
//!
//! The in-memory list is authoritative for the session. Storage failures are
//! logged and never interrupt the caller.

use std::sync::Arc;

use serde::Deserialize;
use serde_json::Value;

use crate::model::Quiz;
use crate::parser::ensure_well_formed;
use crate::store::LIBRARY_KEY;
use crate::traits::KeyValueStore;

pub struct QuizLibrary {
    quizzes: Vec<Quiz>,
    /// Stored entries that did not load. Saved back untouched.
    unreadable: Vec<Value>,
    /// The stored library could not be read as a list and must be backed up
    /// before it is replaced.
    needs_backup: bool,
    store: Arc<dyn KeyValueStore>,
}

impl QuizLibrary {
    /// Load the library from the store.
    ///
    /// Malformed entries are left out of the session but kept on disk. An
    /// unreadable library starts empty and is backed up on the first save.
    pub fn load(store: Arc<dyn KeyValueStore>) -> Self {
        let mut quizzes = Vec::new();
        let mut unreadable = Vec::new();
        let mut needs_backup = false;

        match store.load(LIBRARY_KEY) {
            Ok(Some(Value::Array(entries))) => {
                for entry in entries {
                    match Quiz::deserialize(&entry) {
                        Ok(quiz) => match ensure_well_formed(&quiz.questions) {
                            Ok(()) => quizzes.push(quiz),
                            Err(e) => {
                                tracing::warn!("skipping quiz {}: {}", quiz.id, e);
                                unreadable.push(entry);
                            }
                        },
                        Err(e) => {
                            tracing::warn!("skipping unreadable library entry: {e}");
                            unreadable.push(entry);
                        }
                    }
                }
            }
            Ok(Some(_)) => {
                tracing::warn!("stored library is not a list, starting empty");
                needs_backup = true;
            }
            Ok(None) => {}
            Err(e) => {
                tracing::error!("failed to load quiz library: {e}");
                needs_backup = true;
            }
        }

        Self {
            quizzes,
            unreadable,
            needs_backup,
            store,
        }
    }

    pub fn quizzes(&self) -> &[Quiz] {
        &self.quizzes
    }

    pub fn len(&self) -> usize {
        self.quizzes.len()
    }

    pub fn is_empty(&self) -> bool {
        self.quizzes.is_empty()
    }

    pub fn get(&self, id: &str) -> Option<&Quiz> {
        self.quizzes.iter().find(|q| q.id == id)
    }

    /// Find a quiz by full id or by an unambiguous id prefix.
    pub fn find(&self, id_or_prefix: &str) -> Option<&Quiz> {
        if let Some(quiz) = self.get(id_or_prefix) {
            return Some(quiz);
        }
        let mut matches = self
            .quizzes
            .iter()
            .filter(|q| q.id.starts_with(id_or_prefix));
        match (matches.next(), matches.next()) {
            (Some(quiz), None) if !id_or_prefix.is_empty() => Some(quiz),
            _ => None,
        }
    }

    /// Append a quiz and persist the library.
    pub fn add(&mut self, quiz: Quiz) -> &Quiz {
        self.quizzes.push(quiz);
        self.persist();
        &self.quizzes[self.quizzes.len() - 1]
    }

    /// Remove a quiz by id. Returns `false` if no quiz had that id.
    pub fn delete(&mut self, id: &str) -> bool {
        let before = self.quizzes.len();
        self.quizzes.retain(|q| q.id != id);
        let removed = self.quizzes.len() != before;
        if removed {
            self.persist();
        }
        removed
    }

    /// Write the library out. Returns `false` if saving failed.
    ///
    /// Nothing is written while an unreadable stored library could not be
    /// backed up.
    pub fn persist(&mut self) -> bool {
        if self.needs_backup {
            match self.store.backup(LIBRARY_KEY) {
                Ok(Some(location)) => {
                    tracing::warn!("unreadable quiz library moved to {location}")
                }
                Ok(None) => {}
                Err(e) => {
                    tracing::error!("not saving the quiz library, backup failed: {e}");
                    return false;
                }
            }
            self.needs_backup = false;
        }

        let mut value = match serde_json::to_value(&self.quizzes) {
            Ok(value) => value,
            Err(e) => {
                tracing::error!("failed to serialize quiz library: {e}");
                return false;
            }
        };
        if let Value::Array(entries) = &mut value {
            entries.extend(self.unreadable.iter().cloned());
        }
        match self.store.save(LIBRARY_KEY, &value) {
            Ok(()) => true,
            Err(e) => {
                tracing::error!("failed to save quiz library: {e}");
                false
            }
        }
    }
}
