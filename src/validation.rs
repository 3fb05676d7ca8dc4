use once_cell::sync::Lazy;
use regex::Regex;

use crate::error::ApiError;
use crate::models::LeadForm;

const MAX_NAME_CHARS: usize = 100;
const MAX_MESSAGE_CHARS: usize = 1000;

static PHONE: Lazy<Regex> =
    Lazy::new(|| Regex::new(r"^\+?[0-9][0-9\- ]{6,18}[0-9]$").expect("regex compiles"));
static EMAIL: Lazy<Regex> = Lazy::new(|| {
    Regex::new(r"^[^@\s]+@[^@\s]+\.[^@\s]+$").expect("regex compiles")
});

/// Trims every field and turns blank optional fields into `None`.
pub fn validate_lead(form: LeadForm) -> Result<LeadForm, ApiError> {
    let name = form.name.trim().to_string();
    if name.is_empty() {
        return Err(ApiError::BadRequest("name is required".into()));
    }
    if name.chars().count() > MAX_NAME_CHARS {
        return Err(ApiError::BadRequest(format!(
            "name must be at most {MAX_NAME_CHARS} characters"
        )));
    }

    let phone = form.phone.trim().to_string();
    if phone.is_empty() {
        return Err(ApiError::BadRequest("phone is required".into()));
    }
    if !PHONE.is_match(&phone) {
        return Err(ApiError::BadRequest("phone number is not valid".into()));
    }

    let email = non_blank(form.email);
    if let Some(email) = &email
        && !EMAIL.is_match(email)
    {
        return Err(ApiError::BadRequest("email address is not valid".into()));
    }

    let message = non_blank(form.message);
    if let Some(message) = &message
        && message.chars().count() > MAX_MESSAGE_CHARS
    {
        return Err(ApiError::BadRequest(format!(
            "message must be at most {MAX_MESSAGE_CHARS} characters"
        )));
    }

    Ok(LeadForm {
        name,
        phone,
        email,
        branch: form.branch,
        training_type: form.training_type,
        message,
    })
}

fn non_blank(value: Option<String>) -> Option<String> {
    value
        .map(|v| v.trim().to_string())
        .filter(|v| !v.is_empty())
}
