//! Persistence collaborator interface.
//!
//! The core never persists anything itself. Hosts implement [`ModuleStore`]
//! over whatever storage they own; [`InMemoryModuleStore`] backs tests and
//! the HTTP host.

use std::collections::BTreeMap;

use crate::error::Result;
use crate::types::{Question, QuestionModule};

/// Read/write access to question modules.
///
/// Implementations report backend failures as `QuestionError::Storage`.
pub trait ModuleStore: Send + Sync {
    /// All modules, ordered by id.
    fn list_modules(&self) -> Result<Vec<QuestionModule>>;

    fn load_module(&self, module_id: &str) -> Result<Option<QuestionModule>>;

    fn load_question(&self, module_id: &str, question_id: &str) -> Result<Option<Question>> {
        Ok(self
            .load_module(module_id)?
            .and_then(|module| module.question(question_id).cloned()))
    }

    /// Insert or replace a module by id.
    fn save_module(&mut self, module: QuestionModule) -> Result<()>;

    /// Returns false if there was no such module.
    fn delete_module(&mut self, module_id: &str) -> Result<bool>;
}

/// Modules kept in a map, lost when dropped.
#[derive(Debug, Clone, Default)]
pub struct InMemoryModuleStore {
    modules: BTreeMap<String, QuestionModule>,
}

impl InMemoryModuleStore {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_modules(modules: impl IntoIterator<Item = QuestionModule>) -> Self {
        Self {
            modules: modules.into_iter().map(|m| (m.id.clone(), m)).collect(),
        }
    }
}

impl ModuleStore for InMemoryModuleStore {
    fn list_modules(&self) -> Result<Vec<QuestionModule>> {
        Ok(self.modules.values().cloned().collect())
    }

    fn load_module(&self, module_id: &str) -> Result<Option<QuestionModule>> {
        Ok(self.modules.get(module_id).cloned())
    }

    fn save_module(&mut self, module: QuestionModule) -> Result<()> {
        self.modules.insert(module.id.clone(), module);
        Ok(())
    }

    fn delete_module(&mut self, module_id: &str) -> Result<bool> {
        Ok(self.modules.remove(module_id).is_some())
    }
}
