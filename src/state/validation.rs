// SPDX-License-Identifier: MPL-2.0

use regex::Regex;
use std::fmt;
use std::sync::LazyLock;

static EMAIL_RE: LazyLock<Regex> = LazyLock::new(|| Regex::new(r"\S+@\S+\.\S+").unwrap());

/// Minimum trimmed length of a post body
pub const MIN_CONTENT_LEN: usize = 50;

/// Per-field messages, in the order the fields were checked.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct ValidationErrors {
    fields: Vec<(&'static str, String)>,
}

impl ValidationErrors {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn add(&mut self, field: &'static str, message: impl Into<String>) {
        self.fields.push((field, message.into()));
    }

    pub fn get(&self, field: &str) -> Option<&str> {
        self.fields
            .iter()
            .find(|(f, _)| *f == field)
            .map(|(_, m)| m.as_str())
    }

    pub fn is_empty(&self) -> bool {
        self.fields.is_empty()
    }

    pub fn iter(&self) -> impl Iterator<Item = (&'static str, &str)> {
        self.fields.iter().map(|(f, m)| (*f, m.as_str()))
    }

    pub fn into_result(self) -> Result<(), ValidationErrors> {
        if self.is_empty() { Ok(()) } else { Err(self) }
    }
}

impl fmt::Display for ValidationErrors {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        for (i, (field, message)) in self.fields.iter().enumerate() {
            if i > 0 {
                write!(f, "; ")?;
            }
            write!(f, "{field}: {message}")?;
        }
        Ok(())
    }
}

impl std::error::Error for ValidationErrors {}

pub fn check_email(errors: &mut ValidationErrors, email: &str) {
    if email.trim().is_empty() {
        errors.add("email", "Email is required");
    } else if !EMAIL_RE.is_match(email) {
        errors.add("email", "Email is invalid");
    }
}

/// Split the editor's comma-joined tag field. Order and duplicates are kept.
pub fn parse_tags(raw: &str) -> Vec<String> {
    raw.split(',')
        .map(str::trim)
        .filter(|t| !t.is_empty())
        .map(str::to_string)
        .collect()
}

pub fn join_tags(tags: &[String]) -> String {
    tags.join(", ")
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn email_rules() {
        let mut errors = ValidationErrors::new();
        check_email(&mut errors, "  ");
        assert_eq!(errors.get("email"), Some("Email is required"));

        let mut errors = ValidationErrors::new();
        check_email(&mut errors, "ada@example");
        assert_eq!(errors.get("email"), Some("Email is invalid"));

        let mut errors = ValidationErrors::new();
        check_email(&mut errors, "ada@example.com");
        assert!(errors.into_result().is_ok());
    }

    #[test]
    fn tags_keep_order_and_duplicates() {
        assert_eq!(
            parse_tags(" rust, ,travel,rust ,"),
            vec!["rust", "travel", "rust"]
        );
        assert!(parse_tags("").is_empty());
        assert_eq!(join_tags(&parse_tags("a,b")), "a, b");
    }

    #[test]
    fn display_lists_fields_in_order() {
        let mut errors = ValidationErrors::new();
        errors.add("title", "Title is required");
        errors.add("content", "Content is required");
        assert_eq!(
            errors.to_string(),
            "title: Title is required; content: Content is required"
        );
    }
}
