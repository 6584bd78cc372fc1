//! # Sessions & User Management
//!
//! Sign-in against the user store with Argon2-hashed credentials, plus
//! the user CRUD that keeps those hashes.
//!
//! ## Sign-In Flow
//! ```text
//! sign_in(login, password)
//!      │
//!      ├── find user by username OR email ── none? → InvalidCredentials
//!      │
//!      ├── verify Argon2 hash ───────────── wrong? → InvalidCredentials
//!      │
//!      ├── maintenance_mode on AND role is Seller? → Maintenance
//!      │
//!      ▼
//! Session { user, started_at }
//! ```
//! Sessions are plain in-process values; there is no token surface.

use chrono::{DateTime, Utc};
use serde::Serialize;
use tracing::info;
use uuid::Uuid;

use feira_core::access::{self, Tab};
use feira_core::validation::{validate_customer_name, validate_username};
use feira_core::{User, UserRole};
use feira_store::EntityStore;

use crate::error::{PosError, PosResult};
use crate::service::Pos;

/// A signed-in user.
#[derive(Debug, Clone, Serialize)]
pub struct Session {
    pub user: User,
    pub started_at: DateTime<Utc>,
}

impl Session {
    /// Whether this session's user may open `tab`.
    pub fn can_access(&self, tab: Tab) -> bool {
        access::can_access(self.user.role, tab)
    }

    /// The tab this session lands on.
    pub fn default_tab(&self) -> Tab {
        access::default_tab(self.user.role)
    }
}

// =============================================================================
// Password hashing helpers
// =============================================================================

/// Hash a password for storage.
fn hash_password(password: &str) -> PosResult<String> {
    use argon2::{
        password_hash::{rand_core::OsRng, SaltString},
        Argon2, PasswordHasher,
    };

    let salt = SaltString::generate(&mut OsRng);
    let argon2 = Argon2::default();

    let hash = argon2
        .hash_password(password.as_bytes(), &salt)
        .map_err(|e| PosError::PasswordHash(e.to_string()))?;

    Ok(hash.to_string())
}

/// Verify a password against its stored hash.
fn verify_password(password: &str, hash: &str) -> bool {
    use argon2::{Argon2, PasswordHash, PasswordVerifier};

    let parsed_hash = match PasswordHash::new(hash) {
        Ok(h) => h,
        Err(_) => return false,
    };

    Argon2::default()
        .verify_password(password.as_bytes(), &parsed_hash)
        .is_ok()
}

// =============================================================================
// Service operations
// =============================================================================

impl Pos {
    /// Signs a user in by username or email.
    ///
    /// Sellers are refused while maintenance mode is on; admins and
    /// financial users can always get in to turn it off.
    pub async fn sign_in(&self, login: &str, password: &str) -> PosResult<Session> {
        let user = self
            .store()
            .users()
            .await?
            .into_iter()
            .find(|u| u.username == login || u.email == login)
            .ok_or(PosError::InvalidCredentials)?;

        let hash = user
            .password_hash
            .as_deref()
            .ok_or(PosError::InvalidCredentials)?;
        if !verify_password(password, hash) {
            return Err(PosError::InvalidCredentials);
        }

        let settings = self.store().settings().await?;
        if settings.maintenance_mode && user.role == UserRole::Seller {
            return Err(PosError::Maintenance);
        }

        info!(user = %user.username, role = user.role.as_str(), "User signed in");

        Ok(Session {
            user,
            started_at: Utc::now(),
        })
    }

    /// All user accounts.
    pub async fn users(&self) -> PosResult<Vec<User>> {
        Ok(self.store().users().await?)
    }

    /// Creates a user account with a hashed password.
    pub async fn create_user(
        &self,
        name: &str,
        username: &str,
        email: &str,
        role: UserRole,
        password: &str,
    ) -> PosResult<User> {
        validate_customer_name(name)?;
        validate_username(username)?;

        let user = User {
            id: Uuid::new_v4().to_string(),
            name: name.trim().to_string(),
            username: username.trim().to_string(),
            email: email.trim().to_string(),
            role,
            password_hash: Some(hash_password(password)?),
        };

        info!(username = %user.username, role = role.as_str(), "User created");
        self.store().save_user(&user).await?;
        Ok(user)
    }

    /// Saves edits to an account (name, email, role). The password hash
    /// travels untouched; use [`Pos::set_password`] to change it.
    pub async fn update_user(&self, user: User) -> PosResult<User> {
        validate_customer_name(&user.name)?;
        validate_username(&user.username)?;

        self.store().save_user(&user).await?;
        Ok(user)
    }

    /// Replaces a user's password hash.
    pub async fn set_password(&self, user_id: &str, new_password: &str) -> PosResult<()> {
        let mut user = self
            .store()
            .users()
            .await?
            .into_iter()
            .find(|u| u.id == user_id)
            .ok_or_else(|| feira_store::StoreError::not_found("User", user_id))?;

        user.password_hash = Some(hash_password(new_password)?);
        self.store().save_user(&user).await?;
        Ok(())
    }

    pub async fn delete_user(&self, id: &str) -> PosResult<()> {
        Ok(self.store().delete_user(id).await?)
    }

    /// Seeds the first admin account on an empty user store.
    ///
    /// Returns None when users already exist, so calling it on every
    /// startup is safe.
    pub async fn bootstrap_admin(
        &self,
        name: &str,
        username: &str,
        email: &str,
        password: &str,
    ) -> PosResult<Option<User>> {
        if !self.store().users().await?.is_empty() {
            return Ok(None);
        }

        let admin = self
            .create_user(name, username, email, UserRole::Admin, password)
            .await?;
        Ok(Some(admin))
    }
}

// =============================================================================
// Unit Tests
// =============================================================================

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_hash_and_verify_round_trip() {
        let hash = hash_password("abacaxi123").unwrap();
        assert!(verify_password("abacaxi123", &hash));
        assert!(!verify_password("manga123", &hash));
    }

    #[test]
    fn test_verify_rejects_garbage_hash() {
        assert!(!verify_password("whatever", "not-a-phc-string"));
    }
}
