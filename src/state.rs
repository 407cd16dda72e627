use std::sync::Arc;

use crate::auth::TokenKeys;
use crate::database::Store;
use crate::services::CredentialService;

/// Shared handles injected into every handler and middleware
#[derive(Clone)]
pub struct AppState {
    pub store: Arc<dyn Store>,
    pub tokens: Arc<TokenKeys>,
    pub credentials: CredentialService,
}

impl AppState {
    pub fn new(store: Arc<dyn Store>, tokens: TokenKeys) -> Self {
        let tokens = Arc::new(tokens);
        Self {
            credentials: CredentialService::new(store.clone(), tokens.clone()),
            store,
            tokens,
        }
    }
}
