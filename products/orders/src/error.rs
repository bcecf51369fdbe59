use platform_api::ApiError;
use thiserror::Error;

/// Rejections raised before an option (or its parents) reaches the database.
#[derive(Debug, Error, Clone, PartialEq)]
pub enum RuleError {
    #[error("{0} is required")]
    Required(&'static str),
    #[error("{field} must be at most {max} characters")]
    TooLong { field: &'static str, max: usize },
    #[error("nominalVolume is required for calculable options")]
    MissingNominalVolume,
    #[error("pricePerUnit is required for calculable options")]
    MissingPricePerUnit,
    #[error("nominalVolume must be greater than zero")]
    NonPositiveNominalVolume,
    #[error("{0} must not be negative")]
    Negative(&'static str),
    #[error("volumeMin must not exceed volumeMax")]
    InvertedVolumeRange,
    #[error("{0} is out of range")]
    OutOfRange(&'static str),
}

impl From<RuleError> for ApiError {
    fn from(value: RuleError) -> Self {
        ApiError::validation(value.to_string())
    }
}

pub(crate) fn required_text(field: &'static str, value: &str, max: usize) -> Result<String, RuleError> {
    let trimmed = value.trim();
    if trimmed.is_empty() {
        return Err(RuleError::Required(field));
    }
    check_length(field, trimmed, max)?;
    Ok(trimmed.to_string())
}

/// Blank strings collapse to `None`.
pub(crate) fn optional_text(
    field: &'static str,
    value: Option<String>,
    max: usize,
) -> Result<Option<String>, RuleError> {
    match value {
        Some(text) if !text.trim().is_empty() => {
            check_length(field, &text, max)?;
            Ok(Some(text))
        }
        _ => Ok(None),
    }
}

pub(crate) fn check_length(field: &'static str, value: &str, max: usize) -> Result<(), RuleError> {
    if value.chars().count() > max {
        return Err(RuleError::TooLong { field, max });
    }
    Ok(())
}
