// SPDX-License-Identifier: MPL-2.0

//! Local password hashes. They never leave this device.

use crate::state::validation::ValidationErrors;
use crate::store::{KeyValueStore, StoreError, keys};
use argon2::{
    Argon2,
    password_hash::{PasswordHash, PasswordHasher, PasswordVerifier, SaltString, rand_core::OsRng},
};
use thiserror::Error;

pub const MIN_PASSWORD_LEN: usize = 6;
const RECOMMENDED_PASSWORD_LEN: usize = 8;

#[derive(Error, Debug)]
pub enum PasswordError {
    #[error("password is required for hashing")]
    Empty,
    #[error("failed to hash password: {0}")]
    Hash(String),
}

pub fn hash_password(password: &str) -> Result<String, PasswordError> {
    if password.is_empty() {
        return Err(PasswordError::Empty);
    }

    let salt = SaltString::generate(&mut OsRng);
    Argon2::default()
        .hash_password(password.as_bytes(), &salt)
        .map(|hash| hash.to_string())
        .map_err(|e| PasswordError::Hash(e.to_string()))
}

/// `false` for empty input or a hash that does not parse.
pub fn verify_password(password: &str, hash: &str) -> bool {
    if password.is_empty() || hash.is_empty() {
        return false;
    }

    match PasswordHash::new(hash) {
        Ok(parsed) => Argon2::default()
            .verify_password(password.as_bytes(), &parsed)
            .is_ok(),
        Err(e) => {
            tracing::warn!(error = %e, "stored password hash is malformed");
            false
        }
    }
}

/// Outcome of the strength check. `message` may carry advice even when valid.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PasswordStrength {
    pub is_valid: bool,
    pub message: Option<String>,
}

pub fn validate_password_strength(password: &str) -> PasswordStrength {
    if password.is_empty() {
        return PasswordStrength {
            is_valid: false,
            message: Some("Password is required".into()),
        };
    }

    if password.chars().count() < MIN_PASSWORD_LEN {
        return PasswordStrength {
            is_valid: false,
            message: Some(format!(
                "Password must be at least {MIN_PASSWORD_LEN} characters long"
            )),
        };
    }

    // Later checks overwrite earlier advice
    let mut message = None;
    if password.chars().count() < RECOMMENDED_PASSWORD_LEN {
        message = Some(format!(
            "Consider using at least {RECOMMENDED_PASSWORD_LEN} characters for better security"
        ));
    }
    if !password.chars().any(|c| c.is_ascii_digit()) {
        message = Some("Consider including at least one number for better security".into());
    }
    if !password.chars().any(|c| c.is_ascii_uppercase()) {
        message =
            Some("Consider including at least one uppercase letter for better security".into());
    }

    PasswordStrength {
        is_valid: true,
        message,
    }
}

pub fn check_password(errors: &mut ValidationErrors, password: &str) {
    let strength = validate_password_strength(password);
    if !strength.is_valid {
        errors.add("password", strength.message.unwrap_or_default());
    }
}

/// Per-email hash entries in the shared store.
pub struct PasswordVault<'a> {
    store: &'a dyn KeyValueStore,
}

impl<'a> PasswordVault<'a> {
    pub fn new(store: &'a dyn KeyValueStore) -> Self {
        Self { store }
    }

    pub fn get(&self, email: &str) -> Result<Option<String>, StoreError> {
        self.store.get(&keys::password_hash(email))
    }

    pub fn store(&self, email: &str, hash: &str) -> Result<(), StoreError> {
        self.store.set(&keys::password_hash(email), hash)
    }

    pub fn remove(&self, email: &str) -> Result<(), StoreError> {
        self.store.remove(&keys::password_hash(email))
    }
}
