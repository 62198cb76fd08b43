// Copyright (c) 2026 Accord Digital
// SPDX-License-Identifier: AGPL-3.0
//! Server-side form validation helpers. Field errors are returned inline on a
//! 400 response, mirroring the inline validation the rendered forms surface.

use std::sync::LazyLock;

use axum::http::StatusCode;
use axum::response::{IntoResponse, Json, Response};
use regex::Regex;
use serde::Serialize;
use serde_json::json;

static EMAIL_PATTERN: LazyLock<Regex> = LazyLock::new(|| {
    // Deliberately permissive: one `@`, non-empty local part, dotted domain.
    Regex::new(r"^[^@\s]+@[^@\s]+\.[^@\s]+$").expect("email pattern is valid")
});

pub const MAX_EMAIL_LENGTH: usize = 254;
pub const MAX_TEXT_LENGTH: usize = 450;

#[derive(Debug, Clone, Serialize)]
pub struct FieldError {
    pub field: &'static str,
    pub message: String,
}

impl FieldError {
    pub fn new(field: &'static str, message: impl Into<String>) -> Self {
        Self {
            field,
            message: message.into(),
        }
    }
}

/// 400 response carrying the field errors for inline display.
pub fn validation_failed(errors: Vec<FieldError>) -> Response {
    (StatusCode::BAD_REQUEST, Json(json!({ "errors": errors }))).into_response()
}

/// Required free-text field with a length cap. Returns the trimmed value.
pub fn required_text(
    field: &'static str,
    value: &str,
    max_length: usize,
    errors: &mut Vec<FieldError>,
) -> String {
    let trimmed = value.trim().to_string();
    if trimmed.is_empty() {
        errors.push(FieldError::new(field, "Enter a value"));
    } else if trimmed.len() > max_length {
        errors.push(FieldError::new(
            field,
            format!("Must be {max_length} characters or fewer"),
        ));
    }
    trimmed
}

/// Required email field. Returns the trimmed value.
pub fn required_email(field: &'static str, value: &str, errors: &mut Vec<FieldError>) -> String {
    let trimmed = value.trim().to_string();
    if trimmed.is_empty() {
        errors.push(FieldError::new(field, "Enter an email address"));
    } else if trimmed.len() > MAX_EMAIL_LENGTH || !EMAIL_PATTERN.is_match(&trimmed) {
        errors.push(FieldError::new(
            field,
            "Enter an email address in the correct format",
        ));
    }
    trimmed
}

/// Companies-house number: exactly eight letters/digits.
pub fn required_company_number(
    field: &'static str,
    value: &str,
    errors: &mut Vec<FieldError>,
) -> String {
    let trimmed = value.trim().to_uppercase();
    if trimmed.len() != 8 || !trimmed.chars().all(|c| c.is_ascii_alphanumeric()) {
        errors.push(FieldError::new(
            field,
            "Enter the 8 character company registration number",
        ));
    }
    trimmed
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn valid_email_passes() {
        let mut errors = Vec::new();
        let value = required_email("email", " jo.bloggs@example.com ", &mut errors);
        assert!(errors.is_empty());
        assert_eq!(value, "jo.bloggs@example.com");
    }

    #[test]
    fn malformed_email_is_rejected() {
        for bad in ["", "not-an-email", "a@b", "two@@example.com"] {
            let mut errors = Vec::new();
            required_email("email", bad, &mut errors);
            assert_eq!(errors.len(), 1, "expected one error for {bad:?}");
        }
    }

    #[test]
    fn company_number_must_be_eight_alphanumerics() {
        let mut errors = Vec::new();
        assert_eq!(
            required_company_number("companyNumber", "sc123456", &mut errors),
            "SC123456"
        );
        assert!(errors.is_empty());

        let mut errors = Vec::new();
        required_company_number("companyNumber", "1234", &mut errors);
        assert_eq!(errors.len(), 1);
    }

    #[test]
    fn required_text_enforces_presence_and_length() {
        let mut errors = Vec::new();
        required_text("jobTitle", "  ", MAX_TEXT_LENGTH, &mut errors);
        assert_eq!(errors.len(), 1);

        let mut errors = Vec::new();
        required_text("jobTitle", &"x".repeat(451), MAX_TEXT_LENGTH, &mut errors);
        assert_eq!(errors.len(), 1);
    }
}
