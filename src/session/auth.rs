//! Mocked sign-in flow
//!
//! Owners go straight to the (simulated) Google step. Providers must first
//! enter the shared fire-station password. The Google step only waits a
//! fixed delay and hands back a canned user for the role.

use crate::config::AuthConfig;
use crate::types::{Role, User};
use crate::{Result, auth_error};
use serde::{Deserialize, Serialize};
use subtle::ConstantTimeEq;
use tokio::time::Duration;
use uuid::Uuid;
use zeroize::Zeroize;

const INVALID_PASSWORD: &str = "Invalid provider password";

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum AuthStep {
    Password,
    Google,
    Complete,
}

pub struct AuthFlow {
    role: Role,
    step: AuthStep,
    password_hash: [u8; 32],
    oauth_delay: Duration,
    last_error: Option<String>,
}

impl AuthFlow {
    pub fn new(role: Role, config: &AuthConfig) -> Result<Self> {
        Ok(Self {
            role,
            step: AuthStep::Password,
            password_hash: config.password_hash_bytes()?,
            oauth_delay: config.oauth_delay(),
            last_error: None,
        })
    }

    pub fn role(&self) -> Role {
        self.role
    }

    pub fn step(&self) -> AuthStep {
        self.step
    }

    /// Inline error shown under the password field
    pub fn last_error(&self) -> Option<&str> {
        self.last_error.as_deref()
    }

    /// Submit the password step; owners pass regardless of input
    pub fn submit_password(&mut self, mut password: String) -> Result<()> {
        if self.step != AuthStep::Password {
            password.zeroize();
            return Err(auth_error!("Password step already completed"));
        }

        if self.role == Role::Owner {
            password.zeroize();
            self.step = AuthStep::Google;
            return Ok(());
        }

        let digest = blake3::hash(password.as_bytes());
        password.zeroize();

        let matches: bool = digest
            .as_bytes()
            .as_slice()
            .ct_eq(self.password_hash.as_slice())
            .into();

        if !matches {
            tracing::warn!("🔒 Provider sign-in rejected: wrong password");
            self.last_error = Some(INVALID_PASSWORD.to_string());
            return Err(auth_error!(INVALID_PASSWORD));
        }

        self.last_error = None;
        self.step = AuthStep::Google;
        Ok(())
    }

    /// Simulated OAuth round trip
    pub async fn complete_google(&mut self) -> Result<User> {
        if self.step != AuthStep::Google {
            return Err(auth_error!("Sign-in is not at the Google step ({:?})", self.step));
        }

        tokio::time::sleep(self.oauth_delay).await;

        let user = mock_user(self.role);
        self.step = AuthStep::Complete;

        tracing::info!("🔑 Signed in: user={}, role={:?}", user.id, user.role);
        Ok(user)
    }
}

impl Drop for AuthFlow {
    fn drop(&mut self) {
        self.password_hash.zeroize();
    }
}

/// Canned account returned by the simulated Google step
pub fn mock_user(role: Role) -> User {
    match role {
        Role::Owner => User {
            id: Uuid::new_v4(),
            name: "John Smith".to_string(),
            email: "john.smith@email.com".to_string(),
            role,
            address: Some("123 Main St, City, State".to_string()),
            contact: Some("+1-555-0123".to_string()),
        },
        Role::Provider => User {
            id: Uuid::new_v4(),
            name: "Fire Station Central".to_string(),
            email: "central@firestation.gov".to_string(),
            role,
            address: Some("Fire Station #1, Downtown".to_string()),
            contact: Some("+1-555-FIRE".to_string()),
        },
    }
}

/// Account used by the "sign in" shortcut on the landing page
pub fn existing_user() -> User {
    User {
        id: Uuid::nil(),
        name: "John Doe".to_string(),
        email: "john@example.com".to_string(),
        role: Role::Owner,
        address: None,
        contact: None,
    }
}
