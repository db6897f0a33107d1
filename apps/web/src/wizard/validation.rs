use thiserror::Error;

use crate::wizard::draft::JobDraft;

pub const MIN_DESCRIPTION_CHARS: usize = 50;

/// Which flow the draft belongs to. Some rules only apply when creating.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum FlowKind {
    Create,
    Edit,
}

/// One failed step-gate rule. Only the first failure is ever reported.
#[derive(Debug, Clone, Copy, Error, PartialEq, Eq)]
pub enum ValidationError {
    #[error("Job title is required")]
    MissingTitle,
    #[error("Job description is required")]
    MissingDescription,
    #[error("Please select a category")]
    MissingCategory,
    #[error("Please select a specialty")]
    MissingSpecialty,
    #[error("Please add at least one required skill")]
    MissingSkills,
    #[error("Please enter a valid budget greater than zero")]
    InvalidBudget,
    #[error("Please enter a valid duration in days greater than zero")]
    InvalidDuration,
    #[error("Description must be at least 50 characters")]
    DescriptionTooShort,
}

/// Runs the content-step rules in order and stops at the first failure.
pub fn validate_content(draft: &JobDraft, flow: FlowKind) -> Result<(), ValidationError> {
    if draft.title.trim().is_empty() {
        return Err(ValidationError::MissingTitle);
    }
    if draft.description.trim().is_empty() {
        return Err(ValidationError::MissingDescription);
    }
    if draft.category.is_empty() {
        return Err(ValidationError::MissingCategory);
    }
    if draft.specialty.is_empty() {
        return Err(ValidationError::MissingSpecialty);
    }
    if draft.required_skills.is_empty() {
        return Err(ValidationError::MissingSkills);
    }
    if parse_positive(&draft.budget).is_none() {
        return Err(ValidationError::InvalidBudget);
    }
    if parse_days(&draft.duration).is_none() {
        return Err(ValidationError::InvalidDuration);
    }
    if flow == FlowKind::Create && draft.description.trim().chars().count() < MIN_DESCRIPTION_CHARS
    {
        return Err(ValidationError::DescriptionTooShort);
    }
    Ok(())
}

/// Parses a strictly positive, finite number.
pub fn parse_positive(raw: &str) -> Option<f64> {
    raw.trim()
        .parse::<f64>()
        .ok()
        .filter(|n| n.is_finite() && *n > 0.0)
}

/// Parses a day count. Fractions are dropped, so anything below one whole day is rejected.
pub fn parse_days(raw: &str) -> Option<i64> {
    parse_positive(raw)
        .map(f64::trunc)
        .filter(|days| *days >= 1.0 && *days < i64::MAX as f64)
        .map(|days| days as i64)
}
