//! Outbound request bodies for the two job endpoints.
//!
//! Create and update do not share a shape: `POST /jobs` takes JSON with a
//! nested `budget` object, `PUT /jobs/:id` takes a multipart form with flat
//! `budgetType`/`budget` fields and repeated `skills[]`.

use serde::Serialize;
use serde_json::Number;

use crate::wizard::draft::{BudgetType, JobDraft, StagedFile};
use crate::wizard::validation::{parse_days, parse_positive, ValidationError};

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct BudgetPayload {
    #[serde(rename = "type")]
    pub kind: BudgetType,
    pub amount: Number,
}

/// JSON body of `POST /jobs`.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct CreateJobPayload {
    pub title: String,
    pub description: String,
    pub specialty: String,
    pub skills: Vec<String>,
    pub budget: BudgetPayload,
    pub duration: i64,
    /// Attachment names only; the JSON endpoint carries no file content.
    pub attachments: Vec<String>,
}

/// Multipart body of `PUT /jobs/:id`, kept transport-agnostic.
#[derive(Debug, Clone, PartialEq)]
pub struct UpdateJobForm {
    pub fields: Vec<(&'static str, String)>,
    /// Newly staged files only.
    pub files: Vec<StagedFile>,
}

pub fn build_create_payload(draft: &JobDraft) -> Result<CreateJobPayload, ValidationError> {
    let amount = parse_positive(&draft.budget).ok_or(ValidationError::InvalidBudget)?;
    let days = parse_days(&draft.duration).ok_or(ValidationError::InvalidDuration)?;

    Ok(CreateJobPayload {
        title: draft.title.trim().to_string(),
        description: draft.description.trim().to_string(),
        specialty: draft.specialty.clone(),
        skills: draft.required_skills.clone(),
        budget: BudgetPayload {
            kind: draft.budget_type,
            amount: json_number(amount),
        },
        duration: days,
        attachments: draft
            .attachments
            .iter()
            .map(|a| a.label().to_string())
            .collect(),
    })
}

pub fn build_update_form(draft: &JobDraft) -> Result<UpdateJobForm, ValidationError> {
    parse_positive(&draft.budget).ok_or(ValidationError::InvalidBudget)?;
    parse_days(&draft.duration).ok_or(ValidationError::InvalidDuration)?;

    let mut fields = vec![
        ("title", draft.title.trim().to_string()),
        ("description", draft.description.trim().to_string()),
        ("category", draft.category.clone()),
        ("specialty", draft.specialty.clone()),
        ("budgetType", draft.budget_type.as_str().to_string()),
        ("budget", draft.budget.trim().to_string()),
        ("duration", draft.duration.trim().to_string()),
    ];
    fields.extend(
        draft
            .required_skills
            .iter()
            .map(|id| ("skills[]", id.clone())),
    );

    Ok(UpdateJobForm {
        fields,
        files: draft.staged_files().cloned().collect(),
    })
}

/// Whole amounts serialize as JSON integers (`500`, not `500.0`).
fn json_number(value: f64) -> Number {
    if value.fract() == 0.0 && value.abs() < 9.0e15 {
        Number::from(value as i64)
    } else {
        Number::from_f64(value).unwrap_or_else(|| Number::from(0))
    }
}
