//! Inbound record validation.
//!
//! Presence and type only: every required field must exist and be a string.
//! Empty strings pass, unknown fields (a client-sent `id` included) are
//! ignored.

use serde_json::{Map, Value};

use crate::astronaut::AstronautFields;

#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum ValidationError {
    #[error("request body is not a JSON object")]
    NotAnObject,
    #[error("missing required field `{0}`")]
    Missing(&'static str),
    #[error("field `{0}` must be a string")]
    NotAString(&'static str),
}

/// Checks `body` and extracts the astronaut fields from it.
///
/// Fields are checked in wire order (`firstName`, `lastName`, `birthdate`,
/// `superpower`) and the first problem wins.
pub fn validate(body: &Value) -> Result<AstronautFields, ValidationError> {
    let object = body.as_object().ok_or(ValidationError::NotAnObject)?;
    Ok(AstronautFields {
        first_name: required(object, "firstName")?,
        last_name: required(object, "lastName")?,
        birthdate: required(object, "birthdate")?,
        superpower: required(object, "superpower")?,
    })
}

fn required(object: &Map<String, Value>, field: &'static str) -> Result<String, ValidationError> {
    match object.get(field) {
        None => Err(ValidationError::Missing(field)),
        Some(Value::String(s)) => Ok(s.clone()),
        Some(_) => Err(ValidationError::NotAString(field)),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn accepts_complete_record_and_ignores_extras() {
        let body = json!({
            "id": 99,
            "firstName": "Yuri",
            "lastName": "Gagarin",
            "birthdate": "1934-03-09",
            "superpower": "Immortality",
            "rank": "Colonel",
        });
        assert_eq!(
            validate(&body),
            Ok(AstronautFields::new("Yuri", "Gagarin", "1934-03-09", "Immortality")),
        );
    }

    #[test]
    fn empty_strings_count_as_present() {
        let body = json!({ "firstName": "", "lastName": "", "birthdate": "", "superpower": "" });
        assert!(validate(&body).is_ok());
    }

    #[test]
    fn reports_first_missing_field() {
        let body = json!({ "firstName": "Yuri", "birthdate": "1934-03-09" });
        assert_eq!(validate(&body), Err(ValidationError::Missing("lastName")));
    }

    #[test]
    fn rejects_non_string_values() {
        let body = json!({ "firstName": "Yuri", "lastName": "Gagarin", "birthdate": 1934, "superpower": "x" });
        assert_eq!(validate(&body), Err(ValidationError::NotAString("birthdate")));
    }

    #[test]
    fn rejects_non_objects() {
        assert_eq!(validate(&json!(["firstName"])), Err(ValidationError::NotAnObject));
        assert_eq!(validate(&Value::Null), Err(ValidationError::NotAnObject));
    }
}
