use std::sync::Arc;

use tracing::{debug, info, warn};

use crate::auth::password::{hash_password, verify_dummy, verify_password, PasswordError};
use crate::auth::{TokenError, TokenKeys, TokenPair};
use crate::database::models::{NewUser, User};
use crate::database::{Store, StoreError};

#[derive(Debug, thiserror::Error)]
pub enum AuthError {
    /// Unknown username or wrong password; deliberately indistinguishable
    #[error("Invalid credentials")]
    InvalidCredentials,
    #[error(transparent)]
    Store(#[from] StoreError),
    #[error(transparent)]
    Token(#[from] TokenError),
    #[error(transparent)]
    Password(#[from] PasswordError),
    #[error("Background hashing task failed: {0}")]
    Blocking(#[from] tokio::task::JoinError),
}

/// Registers accounts and exchanges credentials for signed tokens.
///
/// Holds no session state: after `login` the only record of the session is the
/// token pair the caller walks away with.
#[derive(Clone)]
pub struct CredentialService {
    store: Arc<dyn Store>,
    tokens: Arc<TokenKeys>,
}

impl CredentialService {
    pub fn new(store: Arc<dyn Store>, tokens: Arc<TokenKeys>) -> Self {
        Self { store, tokens }
    }

    /// Hash the password and insert a new account.
    ///
    /// Username uniqueness is left to the store so concurrent registrations of the
    /// same name cannot both succeed.
    pub async fn register(&self, username: &str, password: &str) -> Result<User, AuthError> {
        let password = password.to_string();
        let password_hash = tokio::task::spawn_blocking(move || hash_password(&password)).await??;

        let new_user = NewUser {
            username: username.to_string(),
            password_hash,
        };
        let user = match self.store.create_user(new_user).await {
            Ok(user) => user,
            Err(StoreError::DuplicateUsername(name)) => {
                debug!("Registration rejected, username '{}' taken", name);
                return Err(StoreError::DuplicateUsername(name).into());
            }
            Err(e) => return Err(e.into()),
        };

        info!("Registered user '{}' ({})", user.username, user.id);
        Ok(user)
    }

    /// Verify a username/password pair and issue an access + refresh token pair
    pub async fn login(&self, username: &str, password: &str) -> Result<TokenPair, AuthError> {
        let password = password.to_string();

        // Absent credentials fail exactly like an unknown user
        let user = if username.is_empty() || password.is_empty() {
            None
        } else {
            self.store.find_user_by_username(username).await?
        };

        let Some(user) = user else {
            tokio::task::spawn_blocking(move || verify_dummy(&password)).await?;
            warn!("Login failed for unknown user '{}'", username);
            return Err(AuthError::InvalidCredentials);
        };

        let hash = user.password_hash.clone();
        let matches = tokio::task::spawn_blocking(move || verify_password(&password, &hash)).await??;
        if !matches {
            warn!("Login failed for user '{}': wrong password", username);
            return Err(AuthError::InvalidCredentials);
        }

        let pair = self.tokens.issue_pair(user.id, &user.username)?;
        info!("User '{}' logged in", user.username);
        Ok(pair)
    }
}
