// SPDX-License-Identifier: MPL-2.0

//! Fixed key prefixes. Every writer to the shared store goes through these.

/// Serialized session record
pub const SESSION: &str = "writerAuth";

const PASSWORD_HASH_PREFIX: &str = "password-hash-";
const DRAFT_PREFIX: &str = "blog-draft-";

/// Emails are matched case-insensitively, so the key is lowercased.
pub fn password_hash(email: &str) -> String {
    format!("{PASSWORD_HASH_PREFIX}{}", email.trim().to_lowercase())
}

pub fn draft(writer_key: &str) -> String {
    format!("{DRAFT_PREFIX}{writer_key}")
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn password_key_ignores_case_and_padding() {
        assert_eq!(password_hash(" Ada@Example.com "), "password-hash-ada@example.com");
    }

    #[test]
    fn namespaces_do_not_collide() {
        assert_ne!(draft("writerAuth"), SESSION);
        assert_ne!(draft("x"), password_hash("x"));
    }
}
