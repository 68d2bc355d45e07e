//! Signed-in session persistence and the mocked sign-in flow

pub mod auth;
pub mod store;

use crate::Result;
use crate::config::SessionConfig;
use crate::types::User;

pub use auth::{AuthFlow, AuthStep, existing_user, mock_user};
pub use store::{FileStore, KeyValueStore, MemoryStore};

/// Key under which the signed-in user is kept
pub const SESSION_KEY: &str = "firewatch_user";

/// Reads the session on startup, writes it on sign-in, clears it on sign-out
pub struct SessionManager<S: KeyValueStore> {
    store: S,
}

impl SessionManager<FileStore> {
    pub fn from_config(config: &SessionConfig) -> Self {
        Self::new(FileStore::new(&config.store_dir))
    }
}

impl<S: KeyValueStore> SessionManager<S> {
    pub fn new(store: S) -> Self {
        Self { store }
    }

    pub fn store(&self) -> &S {
        &self.store
    }

    /// Load a previously signed-in user
    ///
    /// A value that no longer parses is discarded and treated as signed out.
    pub fn restore(&self) -> Result<Option<User>> {
        let Some(raw) = self.store.get(SESSION_KEY)? else {
            return Ok(None);
        };

        match serde_json::from_str::<User>(&raw) {
            Ok(user) => {
                tracing::info!("🔓 Session restored: user={}, role={:?}", user.id, user.role);
                Ok(Some(user))
            }
            Err(e) => {
                tracing::warn!("⚠️  Discarding unreadable session: {}", e);
                self.store.remove(SESSION_KEY)?;
                Ok(None)
            }
        }
    }

    pub fn sign_in(&self, user: &User) -> Result<()> {
        let raw = serde_json::to_string(user)?;
        self.store.set(SESSION_KEY, &raw)?;

        tracing::info!("💾 Session saved: user={}", user.id);
        Ok(())
    }

    pub fn sign_out(&self) -> Result<()> {
        self.store.remove(SESSION_KEY)?;

        tracing::info!("👋 Signed out");
        Ok(())
    }
}
