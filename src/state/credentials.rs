// SPDX-License-Identifier: MPL-2.0

use crate::api::{Backend, NewWriter, RemoteError, SocialLinks, WriterRecord, WriterUpdate};
use crate::cache::{QuerySignature, ResourceCache, Tag};
use crate::config::SIGN_UP_PATH;
use crate::state::password::{self, PasswordError, PasswordVault};
use crate::state::session::{Session, SessionAction};
use crate::state::validation::{ValidationErrors, check_email};
use crate::store::{SharedStore, keys, set_json};
use std::sync::{RwLock, RwLockReadGuard, RwLockWriteGuard};
use thiserror::Error;

#[derive(Error, Debug)]
pub enum AuthError {
    #[error("No account found with this email address. Please sign up first.")]
    NotFound,
    #[error("Incorrect password. Please try again.")]
    InvalidPassword,
    #[error("Error loading user data: {0}")]
    Unreachable(#[source] RemoteError),
    #[error("{0}")]
    Validation(ValidationErrors),
}

impl AuthError {
    /// Whether the message should come with a link to sign-up.
    pub fn suggests_sign_up(&self) -> bool {
        matches!(self, AuthError::NotFound)
    }

    pub fn sign_up_link(&self) -> Option<&'static str> {
        self.suggests_sign_up().then_some(SIGN_UP_PATH)
    }
}

#[derive(Error, Debug)]
pub enum SignUpError {
    #[error("{0}")]
    Validation(ValidationErrors),
    #[error("Registration failed: {0}")]
    Remote(#[from] RemoteError),
    #[error(transparent)]
    Hash(#[from] PasswordError),
}

/// Fields of the registration form.
#[derive(Debug, Clone, Default)]
pub struct SignUpForm {
    pub name: String,
    pub email: String,
    pub password: String,
    pub confirm_password: String,
}

impl SignUpForm {
    pub fn validate(&self) -> Result<(), ValidationErrors> {
        let mut errors = ValidationErrors::new();

        if self.name.trim().is_empty() {
            errors.add("name", "Name is required");
        }
        check_email(&mut errors, &self.email);
        password::check_password(&mut errors, &self.password);

        if self.confirm_password.is_empty() {
            errors.add("confirmPassword", "Please confirm your password");
        } else if self.password != self.confirm_password {
            errors.add("confirmPassword", "Passwords do not match");
        }

        errors.into_result()
    }

    fn normalized_email(&self) -> String {
        self.email.trim().to_lowercase()
    }

    fn new_writer(&self) -> NewWriter {
        NewWriter {
            name: self.name.trim().to_string(),
            email: self.normalized_email(),
            bio: String::new(),
            profile_image: String::new(),
            social_links: SocialLinks::blank(),
            is_active: true,
        }
    }
}

fn validate_sign_in(email: &str, password: &str) -> Result<(), ValidationErrors> {
    let mut errors = ValidationErrors::new();
    check_email(&mut errors, email);
    if password.is_empty() {
        errors.add("password", "Password is required");
    }
    errors.into_result()
}

/// Owns the signed-in session and keeps `writerAuth` in step with it.
///
/// Storage failures never fail a session change: the in-memory session
/// still moves, it just won't survive a restart.
pub struct CredentialStore<B> {
    cache: ResourceCache<B>,
    store: SharedStore,
    session: RwLock<Session>,
}

impl<B: Backend> CredentialStore<B> {
    pub fn new(cache: ResourceCache<B>, store: SharedStore) -> Self {
        let session = Session::load(store.as_ref());
        if session.is_signed_in() {
            tracing::info!(writer_id = ?session.writer_id, "restored session");
        }

        Self {
            cache,
            store,
            session: RwLock::new(session),
        }
    }

    pub fn cache(&self) -> &ResourceCache<B> {
        &self.cache
    }

    pub fn current_session(&self) -> Session {
        self.read().clone()
    }

    /// Apply `action` and mirror the result to the store.
    pub fn dispatch(&self, action: SessionAction) -> Session {
        let next = {
            let mut guard = self.write();
            let next = std::mem::take(&mut *guard).reduce(&action);
            *guard = next.clone();
            next
        };

        let persisted = match &action {
            SessionAction::SetCredentials { .. } => {
                set_json(self.store.as_ref(), keys::SESSION, &next)
            }
            SessionAction::Logout => self.store.remove(keys::SESSION),
            SessionAction::UpdateWriter(_) => match self.store.get(keys::SESSION) {
                Ok(Some(_)) => set_json(self.store.as_ref(), keys::SESSION, &next),
                Ok(None) => Ok(()),
                Err(e) => Err(e),
            },
        };
        if let Err(e) = persisted {
            tracing::warn!(error = %e, "session change not persisted");
        }

        next
    }

    /// Sign in against the writer list.
    ///
    /// A cached list that lacks the email is refetched once before giving
    /// up, so writers registered elsewhere can sign in. The password is
    /// checked against this device's stored hash. With no stored hash the
    /// supplied password is hashed and adopted.
    pub async fn sign_in(&self, email: &str, password: &str) -> Result<Session, AuthError> {
        validate_sign_in(email, password).map_err(AuthError::Validation)?;

        let email = email.trim().to_lowercase();
        let was_cached = self.cache.is_cached(&QuerySignature::ListWriters);
        let writer = match self.find_writer(&email).await? {
            Some(writer) => writer,
            None if was_cached => {
                tracing::debug!("email not in cached writer list, refetching");
                self.cache.invalidate(&[Tag::Writers]);
                self.find_writer(&email).await?.ok_or(AuthError::NotFound)?
            }
            None => return Err(AuthError::NotFound),
        };

        self.check_password(&email, password)?;

        let session = self.dispatch(SessionAction::SetCredentials {
            writer_id: writer.id.clone(),
            email: writer.email.clone(),
            writer,
        });
        tracing::info!(writer_id = ?session.writer_id, "signed in");
        Ok(session)
    }

    async fn find_writer(&self, email: &str) -> Result<Option<WriterRecord>, AuthError> {
        let writers = self
            .cache
            .list_writers()
            .await
            .map_err(AuthError::Unreachable)?;
        if writers.writers.is_empty() {
            tracing::debug!("writer list is empty");
        }
        Ok(writers.find_by_email(email).cloned())
    }

    fn check_password(&self, email: &str, password: &str) -> Result<(), AuthError> {
        let vault = PasswordVault::new(self.store.as_ref());
        let stored = vault.get(email).unwrap_or_else(|e| {
            tracing::warn!(error = %e, "could not read password hash");
            None
        });

        match stored {
            Some(hash) if password::verify_password(password, &hash) => Ok(()),
            Some(_) => Err(AuthError::InvalidPassword),
            None => {
                // TODO: drop this once the backend verifies passwords itself;
                // it lets the first attempt on a fresh device set the password.
                tracing::warn!("no local password hash, adopting the supplied password");
                match password::hash_password(password) {
                    Ok(hash) => {
                        if let Err(e) = vault.store(email, &hash) {
                            tracing::warn!(error = %e, "could not store password hash");
                        }
                    }
                    Err(e) => tracing::warn!(error = %e, "could not hash password"),
                }
                Ok(())
            }
        }
    }

    /// Register a writer and store their password hash locally. Does not
    /// sign in.
    pub async fn sign_up(&self, form: &SignUpForm) -> Result<WriterRecord, SignUpError> {
        form.validate().map_err(SignUpError::Validation)?;

        let email = form.normalized_email();
        let created = self.cache.create_writer(&form.new_writer()).await?;
        let writer = match created {
            Some(writer) => writer,
            None => self
                .cache
                .list_writers()
                .await?
                .find_by_email(&email)
                .cloned()
                .ok_or_else(|| RemoteError::invalid_response("new writer missing from response"))?,
        };

        let hash = password::hash_password(&form.password)?;
        if let Err(e) = PasswordVault::new(self.store.as_ref()).store(&email, &hash) {
            tracing::warn!(error = %e, "could not store password hash");
        }

        tracing::info!(writer_id = %writer.id, "registered writer");
        Ok(writer)
    }

    /// Clear the session and this device's hash for the signed-out email.
    pub fn logout(&self) {
        let email = self.read().email.clone();
        self.dispatch(SessionAction::Logout);

        if let Some(email) = email {
            if let Err(e) = PasswordVault::new(self.store.as_ref()).remove(&email) {
                tracing::warn!(error = %e, "could not remove password hash");
            }
        }
        tracing::info!("signed out");
    }

    /// Push a profile change to the backend, then into the session.
    pub async fn save_profile(&self, update: WriterUpdate) -> Result<Session, RemoteError> {
        let Some(writer_id) = self.read().writer_id().map(str::to_string) else {
            return Err(RemoteError::new(401, "not signed in"));
        };

        self.cache.update_writer(&writer_id, &update).await?;
        Ok(self.dispatch(SessionAction::UpdateWriter(update)))
    }

    fn read(&self) -> RwLockReadGuard<'_, Session> {
        self.session.read().unwrap_or_else(|e| e.into_inner())
    }

    fn write(&self) -> RwLockWriteGuard<'_, Session> {
        self.session.write().unwrap_or_else(|e| e.into_inner())
    }
}
