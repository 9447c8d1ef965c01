//! Validation of the task creation form

use std::collections::BTreeMap;
use std::fmt::{Display, Formatter};

use crate::task::TaskDraft;

/// The minimal length (in characters, surrounding whitespace excluded) of validated fields
pub const MIN_FIELD_LENGTH: usize = 5;

/// A validated field of the creation form
#[derive(Clone, Copy, Debug, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub enum Field {
    Title,
    Description,
}

impl Display for Field {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        match self {
            Field::Title => write!(f, "Title"),
            Field::Description => write!(f, "Description"),
        }
    }
}

/// Returns a human-readable error naming `field` if `value` is too short, or an empty string otherwise
pub fn validate_field(field: Field, value: &str) -> String {
    if value.trim().chars().count() < MIN_FIELD_LENGTH {
        return format!("{} must be min {} characters", field, MIN_FIELD_LENGTH);
    }
    String::new()
}

/// Per-field error messages. Fields that passed validation have no entry.
#[derive(Clone, Debug, Default, PartialEq, Eq)]
pub struct FormErrors {
    messages: BTreeMap<Field, String>,
}

impl FormErrors {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn is_empty(&self) -> bool {
        self.messages.is_empty()
    }

    pub fn get(&self, field: Field) -> Option<&str> {
        self.messages.get(&field).map(|m| m.as_str())
    }

    pub fn has_error(&self, field: Field) -> bool {
        self.messages.contains_key(&field)
    }

    pub fn iter(&self) -> impl Iterator<Item = (Field, &str)> {
        self.messages.iter().map(|(field, message)| (*field, message.as_str()))
    }

    /// Store the result of [`validate_field`] for this field (an empty message clears the error)
    pub fn set(&mut self, field: Field, message: String) {
        if message.is_empty() {
            self.messages.remove(&field);
        } else {
            self.messages.insert(field, message);
        }
    }
}

impl Display for FormErrors {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        let messages: Vec<&str> = self.messages.values().map(|m| m.as_str()).collect();
        write!(f, "{}", messages.join("; "))
    }
}

impl std::error::Error for FormErrors {}

/// Validate the title and the description of a draft.
///
/// Every field is checked, so that the user sees all errors at once.
pub fn validate_form(draft: &TaskDraft) -> Result<(), FormErrors> {
    let mut errors = FormErrors::new();
    errors.set(Field::Title, validate_field(Field::Title, &draft.title));
    errors.set(Field::Description, validate_field(Field::Description, &draft.description));

    if errors.is_empty() {
        Ok(())
    } else {
        Err(errors)
    }
}


#[cfg(test)]
mod test {
    use super::*;
    use crate::task::Priority;
    use proptest::prelude::*;

    #[test]
    fn short_values_are_rejected() {
        assert_eq!(validate_field(Field::Title, "abc"), "Title must be min 5 characters");
        assert_eq!(validate_field(Field::Description, ""), "Description must be min 5 characters");
        assert_eq!(validate_field(Field::Title, "   abcd   "), "Title must be min 5 characters");
        assert_eq!(validate_field(Field::Title, "       "), "Title must be min 5 characters");
    }

    #[test]
    fn long_enough_values_pass() {
        assert_eq!(validate_field(Field::Title, "abcde"), "");
        assert_eq!(validate_field(Field::Title, "  Buy milk  "), "");
        // characters are counted, not bytes
        assert_eq!(validate_field(Field::Title, "ééééé"), "");
        assert_ne!(validate_field(Field::Title, "éééé"), "");
    }

    #[test]
    fn form_reports_every_field() {
        let draft = TaskDraft::new("abc", "xy", Priority::Low);
        let errors = validate_form(&draft).unwrap_err();
        assert_eq!(errors.get(Field::Title), Some("Title must be min 5 characters"));
        assert_eq!(errors.get(Field::Description), Some("Description must be min 5 characters"));

        let draft = TaskDraft::new("abc", "A long enough description", Priority::Low);
        let errors = validate_form(&draft).unwrap_err();
        assert!(errors.has_error(Field::Title));
        assert!(errors.has_error(Field::Description) == false);
        assert_eq!(errors.to_string(), "Title must be min 5 characters");

        let draft = TaskDraft::new("Write report", "Finish the quarterly report", Priority::High);
        assert!(validate_form(&draft).is_ok());
    }

    #[test]
    fn clearing_an_error() {
        let mut errors = FormErrors::new();
        errors.set(Field::Title, validate_field(Field::Title, "abc"));
        assert!(errors.has_error(Field::Title));
        errors.set(Field::Title, validate_field(Field::Title, "abcdef"));
        assert!(errors.is_empty());
    }

    proptest! {
        #[test]
        fn error_iff_trimmed_length_is_short(value in any::<String>()) {
            let too_short = value.trim().chars().count() < MIN_FIELD_LENGTH;
            prop_assert_eq!(validate_field(Field::Title, &value).is_empty(), !too_short);
        }

        #[test]
        fn whitespace_only_is_always_rejected(value in "[ \t\n]{0,20}") {
            prop_assert!(!validate_field(Field::Description, &value).is_empty());
        }
    }
}
