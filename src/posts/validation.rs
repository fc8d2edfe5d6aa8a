use std::collections::BTreeMap;

use serde_json::{Map, Value};
use validator::Validate;

use crate::posts::model::PostInput;

/// Field name to the first message reported for that field.
pub type FieldErrors = BTreeMap<String, String>;

const TEXT_REQUIRED: &str = "Text field is required";
const BODY_NOT_JSON: &str = "Request body must be valid JSON";
const BODY_NOT_OBJECT: &str = "Request body must be a JSON object";

/// Check a post or comment payload. Returns every failing field with one
/// message each.
pub fn validate_post_input(input: &PostInput) -> Result<(), FieldErrors> {
    let mut errors: FieldErrors = match input.validate() {
        Ok(()) => FieldErrors::new(),
        Err(e) => e
            .field_errors()
            .into_iter()
            .filter_map(|(field, errs)| {
                let message = errs.iter().find_map(|err| {
                    err.message
                        .as_ref()
                        .map(|m| m.to_string())
                        .or_else(|| Some(err.code.to_string()))
                })?;
                Some((field.to_string(), message))
            })
            .collect(),
    };

    if input.text.trim().is_empty() {
        errors.insert("text".to_string(), TEXT_REQUIRED.to_string());
    }

    if errors.is_empty() {
        Ok(())
    } else {
        Err(errors)
    }
}

/// Read a post or comment payload from a JSON request body.
///
/// An empty body reads as `{}`. Null or missing fields read as absent, so a
/// null `text` is later reported as required. Fields of the wrong type and
/// bodies that are not a JSON object are reported as field errors. Unknown
/// keys, `user` included, are dropped.
pub fn parse_post_input(body: &[u8]) -> Result<PostInput, FieldErrors> {
    let mut errors = FieldErrors::new();

    let object = if body.iter().all(u8::is_ascii_whitespace) {
        Map::new()
    } else {
        match serde_json::from_slice::<Value>(body) {
            Ok(Value::Object(object)) => object,
            Ok(_) => {
                errors.insert("body".to_string(), BODY_NOT_OBJECT.to_string());
                return Err(errors);
            }
            Err(_) => {
                errors.insert("body".to_string(), BODY_NOT_JSON.to_string());
                return Err(errors);
            }
        }
    };

    let mut string_field = |field: &str, message: &str| match object.get(field) {
        None | Some(Value::Null) => None,
        Some(Value::String(s)) => Some(s.clone()),
        Some(_) => {
            errors.insert(field.to_string(), message.to_string());
            None
        }
    };

    let input = PostInput {
        text: string_field("text", "Text must be a string").unwrap_or_default(),
        name: string_field("name", "Name must be a string"),
        avatar: string_field("avatar", "Avatar must be a string"),
    };

    if errors.is_empty() {
        Ok(input)
    } else {
        Err(errors)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn input(text: &str) -> PostInput {
        PostInput {
            text: text.to_string(),
            ..Default::default()
        }
    }

    #[test]
    fn accepts_short_text() {
        assert!(validate_post_input(&input("hello")).is_ok());
    }

    #[test]
    fn missing_text_is_required() {
        let errors = validate_post_input(&input("")).unwrap_err();
        assert_eq!(errors.get("text").map(String::as_str), Some(TEXT_REQUIRED));
        assert_eq!(errors.len(), 1);
    }

    #[test]
    fn whitespace_text_is_required() {
        let errors = validate_post_input(&input("   \n")).unwrap_err();
        assert_eq!(errors.get("text").map(String::as_str), Some(TEXT_REQUIRED));
    }

    #[test]
    fn long_text_reports_length() {
        let errors = validate_post_input(&input(&"x".repeat(301))).unwrap_err();
        assert_eq!(
            errors.get("text").map(String::as_str),
            Some("Text must be between 1 and 300 characters")
        );
    }

    #[test]
    fn text_limit_counts_characters_not_bytes() {
        assert!(validate_post_input(&input(&"é".repeat(300))).is_ok());
    }

    #[test]
    fn reports_every_failing_field() {
        let payload = PostInput {
            text: String::new(),
            name: Some("n".repeat(101)),
            avatar: Some("a".repeat(2049)),
        };
        let errors = validate_post_input(&payload).unwrap_err();
        assert_eq!(errors.len(), 3);
        assert!(errors.contains_key("name"));
        assert!(errors.contains_key("avatar"));
    }

    #[test]
    fn parse_reads_fields_and_drops_user() {
        let input =
            parse_post_input(br#"{"text":"hi","name":"Alice","avatar":null,"user":"z"}"#)
                .unwrap();
        assert_eq!(input.text, "hi");
        assert_eq!(input.name.as_deref(), Some("Alice"));
        assert!(input.avatar.is_none());
    }

    #[test]
    fn parse_null_text_then_validate_reports_required() {
        let input = parse_post_input(br#"{"text":null}"#).unwrap();
        let errors = validate_post_input(&input).unwrap_err();
        assert_eq!(errors.get("text").map(String::as_str), Some(TEXT_REQUIRED));
    }

    #[test]
    fn parse_empty_body_reads_as_empty_object() {
        let input = parse_post_input(b"  ").unwrap();
        assert_eq!(input.text, "");
        assert!(input.name.is_none());
    }

    #[test]
    fn parse_reports_wrong_types_per_field() {
        let errors = parse_post_input(br#"{"text":42,"name":7}"#).unwrap_err();
        assert_eq!(
            errors.get("text").map(String::as_str),
            Some("Text must be a string")
        );
        assert_eq!(
            errors.get("name").map(String::as_str),
            Some("Name must be a string")
        );
        assert!(!errors.contains_key("avatar"));
    }

    #[test]
    fn parse_rejects_non_object_bodies() {
        let errors = parse_post_input(b"[1, 2]").unwrap_err();
        assert_eq!(errors.get("body").map(String::as_str), Some(BODY_NOT_OBJECT));

        let errors = parse_post_input(b"{not json").unwrap_err();
        assert_eq!(errors.get("body").map(String::as_str), Some(BODY_NOT_JSON));
    }
}
