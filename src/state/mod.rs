// SPDX-License-Identifier: MPL-2.0

mod credentials;
mod draft;
pub mod password;
mod session;
pub mod settings;
pub mod validation;

pub use credentials::{AuthError, CredentialStore, SignUpError, SignUpForm};
pub use draft::{DraftRecord, DraftStore, EditorForm};
pub use session::{Session, SessionAction};
pub use settings::ClientSettings;
pub use validation::ValidationErrors;
