use crate::i18n::Language;
use crate::normalize::sanitize_source_page;
use crate::validation::{
    validate_area, validate_message, validate_name, validate_phone, validate_service, FieldError,
};
use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;

/// Renovation service offered on the website.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "kebab-case")]
pub enum ServiceCode {
    CeilingRenovation,
    WallRenovation,
    MosqueRenovation,
    CustomGypsum,
    GypsumDecoration,
    GypsumBoard,
    Renovation,
    Other,
}

impl ServiceCode {
    pub const ALL: [ServiceCode; 8] = [
        ServiceCode::CeilingRenovation,
        ServiceCode::WallRenovation,
        ServiceCode::MosqueRenovation,
        ServiceCode::CustomGypsum,
        ServiceCode::GypsumDecoration,
        ServiceCode::GypsumBoard,
        ServiceCode::Renovation,
        ServiceCode::Other,
    ];

    /// Code as submitted by the form and stored in the `service` column.
    pub fn code(&self) -> &'static str {
        match self {
            ServiceCode::CeilingRenovation => "ceiling-renovation",
            ServiceCode::WallRenovation => "wall-renovation",
            ServiceCode::MosqueRenovation => "mosque-renovation",
            ServiceCode::CustomGypsum => "custom-gypsum",
            ServiceCode::GypsumDecoration => "gypsum-decoration",
            ServiceCode::GypsumBoard => "gypsum-board",
            ServiceCode::Renovation => "renovation",
            ServiceCode::Other => "other",
        }
    }
}

impl FromStr for ServiceCode {
    type Err = anyhow::Error;

    fn from_str(value: &str) -> Result<Self, Self::Err> {
        ServiceCode::ALL
            .into_iter()
            .find(|service| service.code() == value)
            .ok_or_else(|| anyhow::anyhow!("Unknown service code: '{}'", value))
    }
}

impl fmt::Display for ServiceCode {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.code())
    }
}

/// Fields exactly as posted by the quote form.
///
/// Every field defaults to empty so a missing field is reported by the
/// validator rather than by the body parser.
#[derive(Debug, Clone, Default)]
pub struct QuoteForm {
    pub name: String,
    pub phone: String,
    pub area: String,
    pub service: String,
    pub message: String,
    pub language: Option<String>,
    pub source_page: Option<String>,
}

impl QuoteForm {
    /// Set a field by its form name. Unknown names are ignored.
    pub fn set_field(&mut self, name: &str, value: String) {
        match name {
            "name" => self.name = value,
            "phone" => self.phone = value,
            "area" => self.area = value,
            "service" => self.service = value,
            "message" => self.message = value,
            "language" => self.language = Some(value),
            "source_page" => self.source_page = Some(value),
            _ => {}
        }
    }

    /// Validate and normalize in form order: name, phone, area, service, message.
    ///
    /// Stops at the first invalid field.
    pub fn validate(&self) -> Result<QuoteRequest, FieldError> {
        let name = validate_name(&self.name)?;
        let phone = validate_phone(&self.phone)?;
        let area = validate_area(&self.area)?;
        let service = validate_service(&self.service)?;
        let message = validate_message(&self.message)?;

        Ok(QuoteRequest {
            name,
            phone,
            area,
            service,
            message,
            source_page: sanitize_source_page(self.source_page.as_deref().unwrap_or_default()),
        })
    }

    /// Language requested in the body, if any.
    pub fn language(&self) -> Option<Language> {
        self.language
            .as_deref()
            .map(|value| Language::from_request_value(Some(value)))
    }
}

/// Builds a form from decoded `(name, value)` pairs. A repeated name keeps
/// its last value.
impl FromIterator<(String, String)> for QuoteForm {
    fn from_iter<I: IntoIterator<Item = (String, String)>>(pairs: I) -> Self {
        let mut form = QuoteForm::default();
        for (name, value) in pairs {
            form.set_field(&name, value);
        }
        form
    }
}

/// A validated, normalized quote request ready to be stored.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct QuoteRequest {
    pub name: String,
    pub phone: String,
    pub area: String,
    pub service: ServiceCode,
    pub message: String,
    /// Analytics tag of the page the form was posted from; not a table column
    pub source_page: String,
}
