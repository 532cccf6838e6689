// SPDX-License-Identifier: MPL-2.0

use crate::api::{WriterRecord, WriterUpdate};
use crate::store::{KeyValueStore, get_json, keys};
use serde::{Deserialize, Serialize};

/// The signed-in writer, as mirrored under `writerAuth`.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Session {
    #[serde(default)]
    pub is_authenticated: bool,
    #[serde(default)]
    pub writer_id: Option<String>,
    #[serde(default)]
    pub email: Option<String>,
    #[serde(default)]
    pub writer: Option<WriterRecord>,
}

/// The only ways a session changes.
#[derive(Debug, Clone, PartialEq)]
pub enum SessionAction {
    SetCredentials {
        writer_id: String,
        email: String,
        writer: WriterRecord,
    },
    Logout,
    UpdateWriter(WriterUpdate),
}

impl Session {
    /// Seed from the store. Missing, unreadable or malformed data yields the
    /// signed-out default.
    pub fn load(store: &dyn KeyValueStore) -> Self {
        match get_json::<Session>(store, keys::SESSION) {
            Ok(Some(session)) => session,
            Ok(None) => Session::default(),
            Err(e) => {
                tracing::warn!(error = %e, "could not read stored session");
                Session::default()
            }
        }
    }

    pub fn reduce(self, action: &SessionAction) -> Self {
        match action {
            SessionAction::SetCredentials {
                writer_id,
                email,
                writer,
            } => Session {
                is_authenticated: true,
                writer_id: Some(writer_id.clone()),
                email: Some(email.clone()),
                writer: Some(writer.clone()),
            },
            SessionAction::Logout => Session::default(),
            SessionAction::UpdateWriter(update) => {
                let mut next = self;
                if let Some(writer) = next.writer.as_mut() {
                    update.apply_to(writer);
                }
                next
            }
        }
    }

    pub fn writer_id(&self) -> Option<&str> {
        self.writer_id.as_deref().filter(|id| !id.is_empty())
    }

    /// Authenticated with a usable writer id.
    pub fn is_signed_in(&self) -> bool {
        self.is_authenticated && self.writer_id().is_some()
    }
}
