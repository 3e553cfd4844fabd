//! Admin question editor.
//!
//! A thin boundary collaborator: a static shared-secret login gating CRUD
//! and reordering on the persisted question list. The password compare is
//! plaintext by design of the source system; this is an access gate, not a
//! security mechanism.

use crate::error::{Error, Result};
use crate::questions::QuestionSet;
use crate::storage::{load_or_seed, QuestionRepository};

/// Static admin password.
pub const ADMIN_PASSWORD: &str = "admin123";

/// Check an admin password against the shared secret.
pub fn authenticate(password: &str) -> bool {
    password == ADMIN_PASSWORD
}

/// Stateful admin panel over an injected question repository.
///
/// Every successful mutation is written back through the repository
/// immediately, mirroring the save-on-change behavior of the source system.
pub struct AdminPanel<R: QuestionRepository> {
    repo: R,
    set: QuestionSet,
    authenticated: bool,
}

impl<R: QuestionRepository> AdminPanel<R> {
    /// Open the panel, loading (or seeding) the persisted question list.
    pub fn open(repo: R) -> Result<Self> {
        let set = load_or_seed(&repo)?;
        Ok(Self {
            repo,
            set,
            authenticated: false,
        })
    }

    /// Attempt to log in. Returns whether the password matched.
    pub fn login(&mut self, password: &str) -> bool {
        self.authenticated = authenticate(password);
        if self.authenticated {
            log::debug!("admin login accepted");
        } else {
            log::warn!("admin login rejected");
        }
        self.authenticated
    }

    /// Log out, re-gating all mutations.
    pub fn logout(&mut self) {
        self.authenticated = false;
    }

    /// Whether the panel is currently authenticated.
    pub fn is_authenticated(&self) -> bool {
        self.authenticated
    }

    /// Read-only view of the current question set.
    pub fn questions(&self) -> &QuestionSet {
        &self.set
    }

    /// Add a question at the end of the list.
    pub fn add_question(&mut self, text: &str) -> Result<u32> {
        self.require_auth()?;
        let id = self
            .set
            .add(text)
            .ok_or_else(|| Error::Validation("Question text must not be empty".to_string()))?;
        self.repo.save(&self.set)?;
        Ok(id)
    }

    /// Replace the text of a question.
    pub fn edit_question(&mut self, id: u32, text: &str) -> Result<()> {
        self.require_auth()?;
        if !self.set.update_text(id, text) {
            return Err(Error::Validation(format!("No question with id {}", id)));
        }
        self.repo.save(&self.set)
    }

    /// Delete a question; remaining orders are re-normalized.
    pub fn delete_question(&mut self, id: u32) -> Result<()> {
        self.require_auth()?;
        if !self.set.remove(id) {
            return Err(Error::Validation(format!("No question with id {}", id)));
        }
        self.repo.save(&self.set)
    }

    /// Move a question one position up. No-op at the top.
    pub fn move_question_up(&mut self, id: u32) -> Result<bool> {
        self.require_auth()?;
        let moved = self.set.move_up(id);
        if moved {
            self.repo.save(&self.set)?;
        }
        Ok(moved)
    }

    /// Move a question one position down. No-op at the bottom.
    pub fn move_question_down(&mut self, id: u32) -> Result<bool> {
        self.require_auth()?;
        let moved = self.set.move_down(id);
        if moved {
            self.repo.save(&self.set)?;
        }
        Ok(moved)
    }

    fn require_auth(&self) -> Result<()> {
        if self.authenticated {
            Ok(())
        } else {
            Err(Error::AccessDenied)
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::storage::MemoryQuestionStore;

    #[test]
    fn test_mutations_require_login() {
        let mut panel = AdminPanel::open(MemoryQuestionStore::new()).unwrap();
        assert!(matches!(panel.add_question("X?"), Err(Error::AccessDenied)));
        assert!(matches!(panel.delete_question(1), Err(Error::AccessDenied)));

        assert!(!panel.login("wrong"));
        assert!(panel.login(ADMIN_PASSWORD));
        panel.add_question("X?").unwrap();
        assert_eq!(panel.questions().len(), 21);
    }

    #[test]
    fn test_logout_regates() {
        let mut panel = AdminPanel::open(MemoryQuestionStore::new()).unwrap();
        panel.login(ADMIN_PASSWORD);
        panel.logout();
        assert!(matches!(panel.add_question("X?"), Err(Error::AccessDenied)));
    }

    #[test]
    fn test_mutations_persist_through_repo() {
        let store = MemoryQuestionStore::new();
        {
            let mut panel = AdminPanel::open(&store).unwrap();
            panel.login(ADMIN_PASSWORD);
            panel.delete_question(2).unwrap();
        }
        let reloaded = load_or_seed(&store).unwrap();
        assert_eq!(reloaded.len(), 19);
        assert_eq!(reloaded.questions()[1].order, 2);
    }

    #[test]
    fn test_edit_unknown_id_fails() {
        let mut panel = AdminPanel::open(MemoryQuestionStore::new()).unwrap();
        panel.login(ADMIN_PASSWORD);
        assert!(matches!(panel.edit_question(99, "Y?"), Err(Error::Validation(_))));
    }
}
