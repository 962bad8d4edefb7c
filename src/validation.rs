//! Field validators for the quote form.
//!
//! Each validator takes the raw submitted string and returns the normalized
//! value or the `FieldError` for that field. `QuoteForm::validate` runs them
//! in form order and stops at the first failure.

use crate::i18n::MessageKey;
use crate::normalize::{char_len, normalize_phone, sanitize_multiline, sanitize_text};
use crate::quote::ServiceCode;
use regex::Regex;
use std::sync::OnceLock;
use thiserror::Error;

pub const AREA_MIN_CHARS: usize = 2;
pub const MESSAGE_MIN_CHARS: usize = 10;

static NAME_REGEX: OnceLock<Regex> = OnceLock::new();

/// The single field that rejected a submission.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Error)]
pub enum FieldError {
    #[error("name must be at least 2 letters, spaces, apostrophes, periods or hyphens")]
    Name,
    #[error("phone must be an optional '+' followed by 8-15 digits")]
    Phone,
    #[error("area must be at least 2 characters")]
    Area,
    #[error("service is not one of the offered services")]
    Service,
    #[error("message must be at least 10 characters")]
    Message,
}

impl FieldError {
    pub fn message_key(&self) -> MessageKey {
        match self {
            FieldError::Name => MessageKey::InvalidName,
            FieldError::Phone => MessageKey::InvalidPhone,
            FieldError::Area => MessageKey::InvalidArea,
            FieldError::Service => MessageKey::InvalidService,
            FieldError::Message => MessageKey::InvalidMessage,
        }
    }

    /// Form field name the error refers to.
    pub fn field(&self) -> &'static str {
        match self {
            FieldError::Name => "name",
            FieldError::Phone => "phone",
            FieldError::Area => "area",
            FieldError::Service => "service",
            FieldError::Message => "message",
        }
    }
}

pub fn validate_name(raw: &str) -> Result<String, FieldError> {
    let name = sanitize_text(raw);
    let regex = NAME_REGEX.get_or_init(|| Regex::new(r"^[\p{L}\s'.-]{2,}$").unwrap());
    if name.is_empty() || !regex.is_match(&name) {
        return Err(FieldError::Name);
    }
    Ok(name)
}

pub fn validate_phone(raw: &str) -> Result<String, FieldError> {
    normalize_phone(raw).ok_or(FieldError::Phone)
}

pub fn validate_area(raw: &str) -> Result<String, FieldError> {
    let area = sanitize_text(raw);
    if char_len(&area) < AREA_MIN_CHARS {
        return Err(FieldError::Area);
    }
    Ok(area)
}

/// Exact, case-sensitive match against the service allow-list.
pub fn validate_service(raw: &str) -> Result<ServiceCode, FieldError> {
    raw.trim().parse().map_err(|_| FieldError::Service)
}

pub fn validate_message(raw: &str) -> Result<String, FieldError> {
    let message = sanitize_multiline(raw);
    if char_len(&message) < MESSAGE_MIN_CHARS {
        return Err(FieldError::Message);
    }
    Ok(message)
}
