//! Request validation.

use kentix_core::Configuration;
use serde::{Deserialize, Serialize};

use crate::models::ErrorResponse;

/// Validation error details.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ValidationError {
    /// Field that failed validation.
    pub field: String,

    /// Error message.
    pub message: String,
}

/// Collection of validation errors.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct ValidationErrors {
    pub errors: Vec<ValidationError>,
}

impl ValidationErrors {
    pub fn new() -> Self {
        Self { errors: Vec::new() }
    }

    /// Add a validation error.
    pub fn add(mut self, field: impl Into<String>, message: impl Into<String>) -> Self {
        self.errors.push(ValidationError {
            field: field.into(),
            message: message.into(),
        });
        self
    }

    /// Append the errors of another collection.
    pub fn merge(mut self, other: ValidationErrors) -> Self {
        self.errors.extend(other.errors);
        self
    }

    pub fn has_errors(&self) -> bool {
        !self.errors.is_empty()
    }

    /// Convert to a 400 response listing every failed field.
    pub fn to_response_error(&self) -> ErrorResponse {
        let fields = self
            .errors
            .iter()
            .map(|e| format!("{} {}", e.field, e.message))
            .collect::<Vec<_>>()
            .join("; ");
        ErrorResponse::new(
            "VALIDATION_FAILED",
            format!("Validation failed: {}", fields),
            axum::http::StatusCode::BAD_REQUEST,
        )
    }
}

impl From<ValidationErrors> for ErrorResponse {
    fn from(errors: ValidationErrors) -> Self {
        errors.to_response_error()
    }
}

/// Trait for validatable request bodies.
pub trait Validate {
    fn validate(&self) -> Result<(), ValidationErrors>;
}

/// Validate that a string is not empty.
pub fn validate_not_empty(field: &str, value: &str) -> Result<(), ValidationErrors> {
    if value.trim().is_empty() {
        Err(ValidationErrors::new().add(field, "cannot be empty"))
    } else {
        Ok(())
    }
}

/// Validate that a string is an absolute http(s) URL.
pub fn validate_url(field: &str, url: &str) -> Result<(), ValidationErrors> {
    match url.parse::<reqwest::Url>() {
        Ok(parsed) if matches!(parsed.scheme(), "http" | "https") => Ok(()),
        Ok(_) => Err(ValidationErrors::new().add(field, "must use http or https")),
        Err(_) => Err(ValidationErrors::new().add(field, "must be a valid URL")),
    }
}

/// Validate that a value is at least `min`.
pub fn validate_min<T>(field: &str, value: T, min: T) -> Result<(), ValidationErrors>
where
    T: PartialOrd + std::fmt::Display + Copy,
{
    if value < min {
        Err(ValidationErrors::new().add(field, format!("must be at least {}", min)))
    } else {
        Ok(())
    }
}

impl Validate for Configuration {
    fn validate(&self) -> Result<(), ValidationErrors> {
        let mut errors = ValidationErrors::new();

        match validate_not_empty("address", &self.address) {
            Ok(()) => {
                if let Err(e) = validate_url("address", self.address.trim()) {
                    errors = errors.merge(e);
                }
            }
            Err(e) => errors = errors.merge(e),
        }

        if let Err(e) = validate_min("refreshInterval", self.refresh_interval, 1) {
            errors = errors.merge(e);
        }
        if let Some(timeout) = self.request_timeout {
            if let Err(e) = validate_min("requestTimeout", timeout, 1) {
                errors = errors.merge(e);
            }
        }

        if errors.has_errors() {
            Err(errors)
        } else {
            Ok(())
        }
    }
}
