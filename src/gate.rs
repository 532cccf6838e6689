// SPDX-License-Identifier: MPL-2.0

use crate::config::{SIGN_IN_PATH, authoring_path};
use crate::state::Session;

/// Decision for a navigation into the editor. The caller navigates.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Admission {
    Admit,
    RedirectTo(String),
}

/// Guard for `/blog/:writerId/write`.
///
/// Signed-out visitors go to sign-in. A request for someone else's editor
/// goes to the session writer's own editor instead.
pub fn can_enter_authoring_view(
    session: &Session,
    requested_writer_id: Option<&str>,
) -> Admission {
    let Some(writer_id) = session.writer_id().filter(|_| session.is_authenticated) else {
        return Admission::RedirectTo(SIGN_IN_PATH.to_string());
    };

    match requested_writer_id.filter(|id| !id.is_empty()) {
        Some(requested) if requested != writer_id => {
            Admission::RedirectTo(authoring_path(writer_id))
        }
        _ => Admission::Admit,
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn session(authenticated: bool, writer_id: Option<&str>) -> Session {
        Session {
            is_authenticated: authenticated,
            writer_id: writer_id.map(str::to_string),
            email: None,
            writer: None,
        }
    }

    #[test]
    fn signed_out_goes_to_sign_in() {
        assert_eq!(
            can_enter_authoring_view(&session(false, None), Some("w1")),
            Admission::RedirectTo("/auth/sign-in".into())
        );
        // A stale id without the flag is not enough
        assert_eq!(
            can_enter_authoring_view(&session(false, Some("w1")), Some("w1")),
            Admission::RedirectTo("/auth/sign-in".into())
        );
        // Nor is the flag without an id
        assert_eq!(
            can_enter_authoring_view(&session(true, None), None),
            Admission::RedirectTo("/auth/sign-in".into())
        );
    }

    #[test]
    fn other_writer_redirects_to_own_editor() {
        assert_eq!(
            can_enter_authoring_view(&session(true, Some("w1")), Some("w2")),
            Admission::RedirectTo("/blog/w1/write".into())
        );
    }

    #[test]
    fn own_or_unspecified_writer_admitted() {
        let s = session(true, Some("w1"));
        assert_eq!(can_enter_authoring_view(&s, Some("w1")), Admission::Admit);
        assert_eq!(can_enter_authoring_view(&s, None), Admission::Admit);
        assert_eq!(can_enter_authoring_view(&s, Some("")), Admission::Admit);
    }
}
