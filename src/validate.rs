use lazy_static::lazy_static;
use regex::Regex;

use crate::auth::dto::{LoginRequest, RegisterRequest};
use crate::error::{ApiError, FieldError};
use crate::records::dto::RecordPayload;

lazy_static! {
    static ref EMAIL_RE: Regex = Regex::new(r"^[^@\s]+@[^@\s]+\.[^@\s]+$").unwrap();
    static ref USERNAME_RE: Regex = Regex::new(r"^[A-Za-z0-9_]+$").unwrap();
}

pub(crate) fn is_valid_email(email: &str) -> bool {
    EMAIL_RE.is_match(email)
}

fn finish(errors: Vec<FieldError>) -> Result<(), ApiError> {
    if errors.is_empty() {
        Ok(())
    } else {
        Err(ApiError::Validation(errors))
    }
}

pub fn validate_register(req: &RegisterRequest) -> Result<(), ApiError> {
    let mut errors = Vec::new();
    if req.name.trim().is_empty() {
        errors.push(FieldError {
            field: "name",
            message: "Name is required",
        });
    }
    if !is_valid_email(req.email.trim()) {
        errors.push(FieldError {
            field: "email",
            message: "Invalid email",
        });
    }
    let username = req.username.trim();
    if username.len() < 3 {
        errors.push(FieldError {
            field: "username",
            message: "Username must be at least 3 characters",
        });
    } else if !USERNAME_RE.is_match(username) {
        errors.push(FieldError {
            field: "username",
            message: "Username must be alphanumeric (underscores allowed)",
        });
    }
    if req.password.len() < 6 {
        errors.push(FieldError {
            field: "password",
            message: "Password must be at least 6 characters",
        });
    } else if !req.password.chars().any(|c| c.is_ascii_digit()) {
        errors.push(FieldError {
            field: "password",
            message: "Password must contain a number",
        });
    }
    finish(errors)
}

pub fn validate_login(req: &LoginRequest) -> Result<(), ApiError> {
    let mut errors = Vec::new();
    if req.username.trim().is_empty() {
        errors.push(FieldError {
            field: "username",
            message: "Username is required",
        });
    }
    if req.password.is_empty() {
        errors.push(FieldError {
            field: "password",
            message: "Password is required",
        });
    }
    finish(errors)
}

pub fn validate_record(payload: &RecordPayload) -> Result<(), ApiError> {
    let mut errors = Vec::new();
    if payload.name.trim().is_empty() {
        errors.push(FieldError {
            field: "name",
            message: "Name is required",
        });
    }
    if !is_valid_email(payload.email.trim()) {
        errors.push(FieldError {
            field: "email",
            message: "Invalid email",
        });
    }
    if payload.phone.trim().is_empty() {
        errors.push(FieldError {
            field: "phone",
            message: "Phone number is required",
        });
    }
    if payload.age < 0 || payload.age > i32::MAX as i64 {
        errors.push(FieldError {
            field: "age",
            message: "Age must be a non-negative integer",
        });
    }
    if payload.father.trim().is_empty() {
        errors.push(FieldError {
            field: "father",
            message: "Father's name is required",
        });
    }
    finish(errors)
}

#[cfg(test)]
mod tests {
    use super::*;

    fn record(age: i64) -> RecordPayload {
        RecordPayload {
            name: "A".into(),
            email: "a@x.com".into(),
            phone: "1234567890".into(),
            age,
            father: "B".into(),
        }
    }

    fn fields(err: ApiError) -> Vec<&'static str> {
        match err {
            ApiError::Validation(errors) => errors.iter().map(|e| e.field).collect(),
            other => panic!("expected validation error, got {other}"),
        }
    }

    #[test]
    fn negative_age_is_rejected_with_age_message() {
        let err = validate_record(&record(-1)).unwrap_err();
        assert_eq!(fields(err), vec!["age"]);
    }

    #[test]
    fn age_zero_is_accepted() {
        assert!(validate_record(&record(0)).is_ok());
    }

    #[test]
    fn blank_fields_are_each_reported() {
        let payload = RecordPayload {
            name: "  ".into(),
            email: "not-an-email".into(),
            phone: "".into(),
            age: 30,
            father: " ".into(),
        };
        let err = validate_record(&payload).unwrap_err();
        assert_eq!(fields(err), vec!["name", "email", "phone", "father"]);
    }

    #[test]
    fn register_rules_match_the_signup_form() {
        let ok = RegisterRequest {
            name: "Jo".into(),
            email: "jo@x.com".into(),
            username: "jo_1".into(),
            password: "abc123".into(),
        };
        assert!(validate_register(&ok).is_ok());

        let short_username = RegisterRequest {
            username: "jo".into(),
            ..ok_clone(&ok)
        };
        assert_eq!(fields(validate_register(&short_username).unwrap_err()), vec!["username"]);

        let bad_username = RegisterRequest {
            username: "jo!x".into(),
            ..ok_clone(&ok)
        };
        assert_eq!(fields(validate_register(&bad_username).unwrap_err()), vec!["username"]);

        let digitless_password = RegisterRequest {
            password: "abcdef".into(),
            ..ok_clone(&ok)
        };
        assert_eq!(
            fields(validate_register(&digitless_password).unwrap_err()),
            vec!["password"]
        );

        let short_password = RegisterRequest {
            password: "a1".into(),
            ..ok_clone(&ok)
        };
        assert_eq!(fields(validate_register(&short_password).unwrap_err()), vec!["password"]);
    }

    #[test]
    fn login_requires_both_fields() {
        let err = validate_login(&LoginRequest {
            username: "".into(),
            password: "".into(),
        })
        .unwrap_err();
        assert_eq!(fields(err), vec!["username", "password"]);
    }

    #[test]
    fn email_shapes() {
        assert!(is_valid_email("jo@x.com"));
        assert!(!is_valid_email("jo@x"));
        assert!(!is_valid_email("jo x@y.com"));
        assert!(!is_valid_email("@x.com"));
    }

    fn ok_clone(req: &RegisterRequest) -> RegisterRequest {
        RegisterRequest {
            name: req.name.clone(),
            email: req.email.clone(),
            username: req.username.clone(),
            password: req.password.clone(),
        }
    }
}
