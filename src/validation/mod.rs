//! Input validation and normalization.
//!
//! Pure functions that turn raw submissions into stored records, or a
//! full list of human-readable violations. Submission fields arrive as
//! raw JSON values, so a wrong-typed field is reported alongside every
//! other violation in one pass instead of rejecting the request body.
//! Successful validation also normalizes: text fields are trimmed, email
//! is lower-cased, phone and rating are coerced from JSON numbers.

use serde_json::Value;

use crate::models::{Contact, ContactSubmission, Feedback, FeedbackSubmission};

/// Validate and normalize a contact-form submission.
pub fn validate_contact(raw: ContactSubmission) -> Result<Contact, Vec<String>> {
    let mut errors = Vec::new();

    let name = required_text(raw.name.as_ref(), "Name", 2, 100, &mut errors);
    let email = required_email(raw.email.as_ref(), &mut errors);
    let subject = required_text(raw.subject.as_ref(), "Subject", 5, 200, &mut errors);
    let message = required_text(raw.message.as_ref(), "Message", 10, 1000, &mut errors);
    let phone = optional_phone(raw.phone.as_ref(), &mut errors);
    let company = optional_company(raw.company.as_ref(), &mut errors);

    if !errors.is_empty() {
        return Err(errors);
    }

    Ok(Contact {
        name: name.unwrap_or_default(),
        email: email.unwrap_or_default(),
        subject: subject.unwrap_or_default(),
        message: message.unwrap_or_default(),
        phone,
        company,
        id: 0,
        created_at: String::new(),
    })
}

/// Validate and normalize a feedback submission.
pub fn validate_feedback(raw: FeedbackSubmission) -> Result<Feedback, Vec<String>> {
    let mut errors = Vec::new();

    let rating = match raw.rating.as_ref().and_then(coerce_number) {
        None => {
            errors.push("Rating must be a number between 1 and 5".to_string());
            None
        }
        Some(n) if !(1.0..=5.0).contains(&n) => {
            errors.push("Rating must be between 1 and 5".to_string());
            None
        }
        Some(n) if n.fract() != 0.0 => {
            errors.push("Rating must be a whole number".to_string());
            None
        }
        Some(n) => Some(n as i64),
    };

    let comment = required_text(raw.comment.as_ref(), "Comment", 5, 500, &mut errors);
    let email = optional_email(raw.email.as_ref(), &mut errors);

    if !errors.is_empty() {
        return Err(errors);
    }

    Ok(Feedback {
        rating: rating.unwrap_or_default(),
        comment: comment.unwrap_or_default(),
        email,
        id: 0,
        created_at: String::new(),
    })
}

/// The trimmed text of a JSON value, when it is a non-blank string.
/// Missing, null, wrong-typed, and blank values all read as absent.
fn present_text(value: Option<&Value>) -> Option<&str> {
    value
        .and_then(Value::as_str)
        .map(str::trim)
        .filter(|s| !s.is_empty())
}

/// Check a required text field: a non-blank string within the given
/// trimmed length bounds. A wrong-typed value fails the same presence
/// check a missing one does. Returns the trimmed value on success.
fn required_text(
    value: Option<&Value>,
    field: &str,
    min: usize,
    max: usize,
    errors: &mut Vec<String>,
) -> Option<String> {
    let Some(trimmed) = present_text(value) else {
        errors.push(format!("{} is required and must be text", field));
        return None;
    };

    let mut ok = true;
    let length = trimmed.chars().count();
    if length < min {
        errors.push(format!("{} must be at least {} characters", field, min));
        ok = false;
    }
    if length > max {
        errors.push(format!("{} must not exceed {} characters", field, max));
        ok = false;
    }

    ok.then(|| trimmed.to_string())
}

fn required_email(value: Option<&Value>, errors: &mut Vec<String>) -> Option<String> {
    let Some(trimmed) = present_text(value) else {
        errors.push("Email is required".to_string());
        return None;
    };

    let normalized = trimmed.to_lowercase();
    if is_valid_email(&normalized) {
        Some(normalized)
    } else {
        errors.push("Email format is invalid".to_string());
        None
    }
}

/// Optional email: absent, null, or empty passes as `None`; a non-string
/// value or a malformed address is a violation.
fn optional_email(value: Option<&Value>, errors: &mut Vec<String>) -> Option<String> {
    match value {
        None | Some(Value::Null) => None,
        Some(Value::String(s)) => {
            let trimmed = s.trim();
            if trimmed.is_empty() {
                return None;
            }
            let normalized = trimmed.to_lowercase();
            if is_valid_email(&normalized) {
                Some(normalized)
            } else {
                errors.push("Email format is invalid".to_string());
                None
            }
        }
        Some(_) => {
            errors.push("Email must be text".to_string());
            None
        }
    }
}

/// Optional phone: absent, null, or empty passes as `None`; otherwise the
/// value (string or JSON number) must be 9-10 digits.
fn optional_phone(value: Option<&Value>, errors: &mut Vec<String>) -> Option<String> {
    let coerced = match value {
        None | Some(Value::Null) => return None,
        Some(Value::String(s)) => s.trim().to_string(),
        Some(Value::Number(n)) => n.to_string(),
        Some(_) => {
            errors.push("Phone must be a 9-10 digit number".to_string());
            return None;
        }
    };

    if coerced.is_empty() {
        return None;
    }
    if is_valid_phone(&coerced) {
        Some(coerced)
    } else {
        errors.push("Phone must be a 9-10 digit number".to_string());
        None
    }
}

fn optional_company(value: Option<&Value>, errors: &mut Vec<String>) -> Option<String> {
    match value {
        None | Some(Value::Null) => None,
        Some(Value::String(s)) => {
            let trimmed = s.trim();
            if trimmed.is_empty() {
                None
            } else if trimmed.chars().count() > 100 {
                errors.push("Company name must not exceed 100 characters".to_string());
                None
            } else {
                Some(trimmed.to_string())
            }
        }
        Some(_) => {
            errors.push("Company must be text".to_string());
            None
        }
    }
}

fn coerce_number(value: &Value) -> Option<f64> {
    match value {
        Value::Number(n) => n.as_f64(),
        Value::String(s) => s.trim().parse().ok(),
        _ => None,
    }
}

/// Permissive syntactic email check: one local part and one domain with
/// no whitespace, and a dot somewhere inside the domain. Not full
/// RFC 5322.
fn is_valid_email(value: &str) -> bool {
    if value.chars().any(char::is_whitespace) {
        return false;
    }
    let Some((local, domain)) = value.split_once('@') else {
        return false;
    };
    !local.is_empty()
        && !domain.is_empty()
        && !domain.contains('@')
        && domain.contains('.')
        && !domain.starts_with('.')
        && !domain.ends_with('.')
}

fn is_valid_phone(value: &str) -> bool {
    (9..=10).contains(&value.len()) && value.bytes().all(|b| b.is_ascii_digit())
}
