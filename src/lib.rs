// SPDX-License-Identifier: MPL-2.0

//! Client core for a markdown blog.
//!
//! [`CredentialStore`] owns the writer session, [`ResourceCache`] fronts the
//! REST backend, [`DraftStore`] keeps unpublished edits on this device and
//! [`Authoring`] ties them together behind the editor gate. [`BlogClient`]
//! wires one of each for a process.

pub mod api;
pub mod app;
pub mod authoring;
pub mod cache;
pub mod config;
pub mod gate;
pub mod illustration;
pub mod logging;
pub mod state;
pub mod store;

pub use api::{Backend, BlogPost, HttpBackend, RemoteError, WriterRecord};
pub use app::{BlogClient, StartupError};
pub use authoring::{Authoring, Edit, Opened, PublishError, Published};
pub use cache::ResourceCache;
pub use gate::{Admission, can_enter_authoring_view};
pub use illustration::choose_image;
pub use state::{AuthError, CredentialStore, DraftStore, Session, SignUpError, SignUpForm};
pub use store::{KeyValueStore, MemoryStore, SharedStore, SqliteStore, StoreError};
