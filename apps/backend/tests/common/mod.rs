//! Common test utilities and fixtures for integration tests.
//!
//! This module provides shared test infrastructure including:
//! - TestContext wrapping a router over an in-memory module store
//! - Helper functions for creating test data

pub mod fixtures;

use axum::Router;
use axum_test::TestServer;

use question_bank_backend::{router, AppState};
use question_core::{Capabilities, InMemoryModuleStore, ModuleStore, QuestionModule};

/// Test context holding the application router.
pub struct TestContext {
    app: Router,
}

impl TestContext {
    /// Create a context with no modules and all features enabled.
    pub fn new() -> Self {
        Self::with_modules(Vec::new(), Capabilities::default())
    }

    /// Create a context seeded with modules.
    pub fn with_modules(modules: Vec<QuestionModule>, capabilities: Capabilities) -> Self {
        Self::with_store(InMemoryModuleStore::with_modules(modules), capabilities)
    }

    /// Create a context over any store.
    pub fn with_store(store: impl ModuleStore + 'static, capabilities: Capabilities) -> Self {
        Self {
            app: router(AppState::new(store, capabilities)),
        }
    }

    /// Create a context seeded with the sample module.
    pub fn with_sample_module() -> Self {
        Self::with_modules(vec![fixtures::sample_module()], Capabilities::default())
    }

    /// Get a test server for the router.
    pub fn server(&self) -> TestServer {
        TestServer::new(self.app.clone()).unwrap()
    }
}
