//! Submitted note fields and the rules they must satisfy.
//!
//! Validation is a pure function: it either yields a [`ValidNote`] ready to be
//! persisted or a [`FormErrors`] value listing every problem per field. Values
//! are trimmed first, so whitespace-only input counts as blank, and lengths
//! are counted in characters.

use serde::Deserialize;

use crate::db::entities::{note, owner};

pub const REQUIRED_MESSAGE: &str = "This field is required.";

#[derive(Debug, Clone, Default, Deserialize)]
#[serde(default)]
pub struct NoteForm {
    pub title: String,
    pub content: String,
    pub owner_name: String,
    /// Rendered as a selector and submitted by browsers, but never applied:
    /// new notes get the first seeded topic and edits keep the stored one.
    pub topic: String,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ValidNote {
    pub title: String,
    pub content: String,
    pub owner_name: String,
}

#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct FormErrors {
    pub title: Vec<String>,
    pub content: Vec<String>,
    pub owner_name: Vec<String>,
}

impl FormErrors {
    pub fn is_empty(&self) -> bool {
        self.title.is_empty() && self.content.is_empty() && self.owner_name.is_empty()
    }
}

impl NoteForm {
    pub fn validate(&self) -> Result<ValidNote, FormErrors> {
        let mut errors = FormErrors::default();

        let title = clean_text(&self.title, Some(note::TITLE_MAX_CHARS), &mut errors.title);
        let content = clean_text(&self.content, None, &mut errors.content);
        let owner_name = clean_text(
            &self.owner_name,
            Some(owner::NAME_MAX_CHARS),
            &mut errors.owner_name,
        );

        if !errors.is_empty() {
            return Err(errors);
        }

        Ok(ValidNote {
            title,
            content,
            owner_name,
        })
    }
}

fn clean_text(raw: &str, max_chars: Option<usize>, errors: &mut Vec<String>) -> String {
    let value = raw.trim();
    if value.is_empty() {
        errors.push(REQUIRED_MESSAGE.to_string());
        return String::new();
    }

    if let Some(max) = max_chars {
        let count = value.chars().count();
        if count > max {
            errors.push(format!(
                "Ensure this value has at most {max} characters (it has {count})."
            ));
        }
    }

    value.to_string()
}

#[cfg(test)]
mod tests {
    use super::{FormErrors, NoteForm, REQUIRED_MESSAGE, ValidNote};

    fn form(title: &str, content: &str, owner_name: &str) -> NoteForm {
        NoteForm {
            title: title.to_string(),
            content: content.to_string(),
            owner_name: owner_name.to_string(),
            topic: String::new(),
        }
    }

    #[test]
    fn accepts_complete_submission_and_trims_values() {
        let valid = form("  My first note!  ", "This is text content\n", " Jane ")
            .validate()
            .expect("form should be valid");
        assert_eq!(
            valid,
            ValidNote {
                title: "My first note!".to_string(),
                content: "This is text content".to_string(),
                owner_name: "Jane".to_string(),
            }
        );
    }

    #[test]
    fn blank_fields_are_required() {
        let errors = form("", "   ", "\t").validate().expect_err("form should be invalid");
        assert_eq!(
            errors,
            FormErrors {
                title: vec![REQUIRED_MESSAGE.to_string()],
                content: vec![REQUIRED_MESSAGE.to_string()],
                owner_name: vec![REQUIRED_MESSAGE.to_string()],
            }
        );
    }

    #[test]
    fn title_limit_is_35_characters() {
        assert!(form(&"t".repeat(35), "body", "Jane").validate().is_ok());

        let errors = form(&"t".repeat(36), "body", "Jane")
            .validate()
            .expect_err("title should be too long");
        assert_eq!(
            errors.title,
            ["Ensure this value has at most 35 characters (it has 36)."]
        );
        assert!(errors.content.is_empty());
        assert!(errors.owner_name.is_empty());
    }

    #[test]
    fn owner_name_limit_is_50_characters() {
        assert!(form("title", "body", &"o".repeat(50)).validate().is_ok());

        let errors = form("title", "body", &"o".repeat(51))
            .validate()
            .expect_err("owner name should be too long");
        assert_eq!(
            errors.owner_name,
            ["Ensure this value has at most 50 characters (it has 51)."]
        );
    }

    #[test]
    fn limits_count_characters_not_bytes() {
        let title = "é".repeat(35);
        assert!(title.len() > 35);
        assert!(form(&title, "body", "Jane").validate().is_ok());
    }

    #[test]
    fn content_has_no_length_limit() {
        assert!(form("title", &"x".repeat(10_000), "Jane").validate().is_ok());
    }
}
