use std::sync::Arc;

use axum::Router;
use robswebhub::{
    build_router, scores::InMemoryMatchRepository, AppState, IdentityProvider, Settings,
};

// ============================================================================
// Test Setup Infrastructure
// ============================================================================

pub struct TestSetup {
    pub app: Router,
    pub state: AppState,
    pub repository: Arc<InMemoryMatchRepository>,
}

pub struct TestSetupBuilder {
    settings: Settings,
    identity_provider: Option<Arc<dyn IdentityProvider>>,
}

#[allow(dead_code)]
impl TestSetupBuilder {
    pub fn new() -> Self {
        Self {
            settings: Settings::default(),
            identity_provider: None,
        }
    }

    pub fn with_settings(mut self, settings: Settings) -> Self {
        self.settings = settings;
        self
    }

    pub fn with_identity_provider(mut self, provider: Arc<dyn IdentityProvider>) -> Self {
        self.identity_provider = Some(provider);
        self
    }

    pub fn build(self) -> TestSetup {
        let repository = Arc::new(InMemoryMatchRepository::new());
        let state = AppState::new(repository.clone(), self.identity_provider, self.settings);
        let app = build_router(state.clone());

        TestSetup {
            app,
            state,
            repository,
        }
    }
}
