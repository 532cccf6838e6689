// SPDX-License-Identifier: MPL-2.0

use std::sync::Arc;
use thiserror::Error;

use crate::api::{Backend, HttpBackend, RemoteError};
use crate::authoring::{Authoring, Opened};
use crate::cache::{ResourceCache, ViewEpoch};
use crate::gate::{Admission, can_enter_authoring_view};
use crate::state::{ClientSettings, CredentialStore, DraftStore, Session};
use crate::store::{SharedStore, SqliteStore, StoreError};

#[derive(Error, Debug)]
pub enum StartupError {
    #[error("invalid API base URL: {0}")]
    BaseUrl(#[from] url::ParseError),
    #[error("could not open local store: {0}")]
    Store(#[from] StoreError),
}

/// Everything one client process shares: the session, the cache in front of
/// the backend, local drafts and the editor's view counter.
pub struct BlogClient<B = HttpBackend> {
    credentials: CredentialStore<B>,
    drafts: DraftStore,
    editor_views: ViewEpoch,
}

impl BlogClient<HttpBackend> {
    /// Build from the saved settings, backed by SQLite on disk.
    pub fn open_default() -> Result<Self, StartupError> {
        Self::from_settings(&ClientSettings::load())
    }

    pub fn from_settings(settings: &ClientSettings) -> Result<Self, StartupError> {
        let backend = HttpBackend::new(&settings.api_base_url)?;
        let store = match &settings.store_path {
            Some(path) => SqliteStore::open(path)?,
            None => SqliteStore::open_default()?,
        };
        tracing::info!(api = %backend.base_url(), "client ready");

        Ok(Self::with_backend(backend, Arc::new(store)))
    }
}

impl<B: Backend> BlogClient<B> {
    pub fn with_backend(backend: B, store: SharedStore) -> Self {
        Self {
            credentials: CredentialStore::new(ResourceCache::new(backend), store.clone()),
            drafts: DraftStore::new(store),
            editor_views: ViewEpoch::new(),
        }
    }

    pub fn credentials(&self) -> &CredentialStore<B> {
        &self.credentials
    }

    pub fn cache(&self) -> &ResourceCache<B> {
        self.credentials.cache()
    }

    pub fn drafts(&self) -> &DraftStore {
        &self.drafts
    }

    pub fn session(&self) -> Session {
        self.credentials.current_session()
    }

    pub fn admission(&self, requested_writer_id: Option<&str>) -> Admission {
        can_enter_authoring_view(&self.session(), requested_writer_id)
    }

    /// Navigate into the editor. Opening it again retires the previous view.
    pub async fn open_editor(
        &self,
        requested_writer_id: Option<&str>,
        edit_post_id: Option<&str>,
    ) -> Result<Opened<'_, B>, RemoteError> {
        Authoring::open(
            &self.credentials,
            self.drafts.clone(),
            &self.editor_views,
            requested_writer_id,
            edit_post_id,
        )
        .await
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn bad_base_url_rejected() {
        let dir = tempfile::tempdir().unwrap();
        let settings = ClientSettings {
            api_base_url: "not a url".into(),
            store_path: Some(dir.path().join("store.db")),
        };
        assert!(matches!(
            BlogClient::from_settings(&settings),
            Err(StartupError::BaseUrl(_))
        ));
    }

    #[test]
    fn opens_store_at_configured_path() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("nested").join("store.db");
        let settings = ClientSettings {
            api_base_url: "http://localhost:5000/api".into(),
            store_path: Some(path.clone()),
        };

        let client = BlogClient::from_settings(&settings).unwrap();
        assert!(!client.session().is_authenticated);
        assert!(path.exists());
    }
}
