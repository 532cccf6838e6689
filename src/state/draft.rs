// SPDX-License-Identifier: MPL-2.0

use crate::store::{SharedStore, get_json, keys, set_json};
use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

/// An unpublished edit, kept only on this device.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct DraftRecord {
    #[serde(default)]
    pub title: String,
    #[serde(default)]
    pub content: String,
    /// Raw comma-joined tag field
    #[serde(default)]
    pub tags: String,
    #[serde(default)]
    pub saved_at: Option<DateTime<Utc>>,
}

/// The editor's form fields.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct EditorForm {
    pub title: String,
    pub content: String,
    pub tags: String,
    pub is_published: bool,
}

impl EditorForm {
    /// Nothing typed into the title or body yet.
    pub fn is_empty(&self) -> bool {
        self.title.is_empty() && self.content.is_empty()
    }

    /// Fill from `draft` unless the writer already typed something.
    pub fn prefill_from(&mut self, draft: &DraftRecord) -> bool {
        if !self.is_empty() {
            return false;
        }
        self.title = draft.title.clone();
        self.content = draft.content.clone();
        self.tags = draft.tags.clone();
        true
    }
}

/// One draft per writer key under `blog-draft-<key>`. Never sent anywhere.
#[derive(Clone)]
pub struct DraftStore {
    store: SharedStore,
}

impl DraftStore {
    pub fn new(store: SharedStore) -> Self {
        Self { store }
    }

    /// Overwrite the writer's draft with the current form. Failures are
    /// logged and otherwise ignored.
    pub fn autosave(&self, writer_key: &str, form: &EditorForm) -> Option<DraftRecord> {
        let draft = DraftRecord {
            title: form.title.clone(),
            content: form.content.clone(),
            tags: form.tags.clone(),
            saved_at: Some(Utc::now()),
        };

        match set_json(self.store.as_ref(), &keys::draft(writer_key), &draft) {
            Ok(()) => {
                tracing::debug!(writer_key, "draft saved");
                Some(draft)
            }
            Err(e) => {
                tracing::warn!(writer_key, error = %e, "error saving draft");
                None
            }
        }
    }

    pub fn load(&self, writer_key: &str) -> Option<DraftRecord> {
        get_json(self.store.as_ref(), &keys::draft(writer_key)).unwrap_or_else(|e| {
            tracing::warn!(writer_key, error = %e, "error loading draft");
            None
        })
    }

    pub fn clear(&self, writer_key: &str) {
        if let Err(e) = self.store.remove(&keys::draft(writer_key)) {
            tracing::warn!(writer_key, error = %e, "error clearing draft");
        }
    }

    /// Clear only if `confirm` agrees. Returns whether the draft was cleared.
    pub fn clear_confirmed(&self, writer_key: &str, confirm: impl FnOnce() -> bool) -> bool {
        if !confirm() {
            return false;
        }
        self.clear(writer_key);
        true
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::store::{MemoryStore, testing::BrokenStore};
    use std::sync::Arc;

    fn form(title: &str, content: &str, tags: &str) -> EditorForm {
        EditorForm {
            title: title.into(),
            content: content.into(),
            tags: tags.into(),
            is_published: false,
        }
    }

    #[test]
    fn autosave_then_load() {
        let drafts = DraftStore::new(Arc::new(MemoryStore::new()));
        drafts.autosave("w1", &form("Title", "Body **bold**", "rust, travel"));

        let draft = drafts.load("w1").unwrap();
        assert_eq!(draft.title, "Title");
        assert_eq!(draft.content, "Body **bold**");
        assert_eq!(draft.tags, "rust, travel");
        assert!(draft.saved_at.is_some());

        // Keys are per writer
        assert!(drafts.load("w2").is_none());
    }

    #[test]
    fn latest_edit_wins() {
        let drafts = DraftStore::new(Arc::new(MemoryStore::new()));
        drafts.autosave("w1", &form("One", "", ""));
        drafts.autosave("w1", &form("Two", "", ""));
        assert_eq!(drafts.load("w1").unwrap().title, "Two");
    }

    #[test]
    fn clear_removes_draft() {
        let drafts = DraftStore::new(Arc::new(MemoryStore::new()));
        drafts.autosave("w1", &form("Title", "Body", ""));
        drafts.clear("w1");
        assert!(drafts.load("w1").is_none());
    }

    #[test]
    fn declined_confirmation_keeps_draft() {
        let drafts = DraftStore::new(Arc::new(MemoryStore::new()));
        drafts.autosave("w1", &form("Title", "Body", ""));

        assert!(!drafts.clear_confirmed("w1", || false));
        assert!(drafts.load("w1").is_some());

        assert!(drafts.clear_confirmed("w1", || true));
        assert!(drafts.load("w1").is_none());
    }

    #[test]
    fn prefill_never_overwrites_typed_content() {
        let draft = DraftRecord {
            title: "Saved".into(),
            content: "Saved body".into(),
            tags: "a".into(),
            saved_at: None,
        };

        let mut typed = form("Typed", "", "");
        assert!(!typed.prefill_from(&draft));
        assert_eq!(typed.title, "Typed");

        let mut empty = EditorForm::default();
        assert!(empty.prefill_from(&draft));
        assert_eq!(empty.content, "Saved body");
    }

    #[test]
    fn broken_storage_is_silent() {
        let drafts = DraftStore::new(Arc::new(BrokenStore));
        assert!(drafts.autosave("w1", &form("Title", "Body", "")).is_none());
        assert!(drafts.load("w1").is_none());
        drafts.clear("w1");
    }
}
