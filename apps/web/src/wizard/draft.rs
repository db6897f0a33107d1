use std::str::FromStr;

use bytes::Bytes;
use serde::{Deserialize, Serialize};
use thiserror::Error;

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum BudgetType {
    #[default]
    Fixed,
}

impl BudgetType {
    pub fn as_str(&self) -> &'static str {
        match self {
            BudgetType::Fixed => "fixed",
        }
    }
}

impl FromStr for BudgetType {
    type Err = UnknownField;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim() {
            "fixed" | "" => Ok(BudgetType::Fixed),
            other => Err(UnknownField(format!("budgetType={other}"))),
        }
    }
}

/// A file picked by the user but not yet uploaded.
#[derive(Debug, Clone, PartialEq)]
pub struct StagedFile {
    pub name: String,
    pub content_type: String,
    pub bytes: Bytes,
}

impl StagedFile {
    pub fn new(name: impl Into<String>, content_type: impl Into<String>, bytes: Bytes) -> Self {
        Self {
            name: name.into(),
            content_type: content_type.into(),
            bytes,
        }
    }
}

#[derive(Debug, Clone, PartialEq)]
pub enum Attachment {
    /// Already stored server-side; never re-uploaded.
    Existing(String),
    Staged(StagedFile),
}

impl Attachment {
    pub fn label(&self) -> &str {
        match self {
            Attachment::Existing(reference) => reference,
            Attachment::Staged(file) => &file.name,
        }
    }
}

/// The in-memory, unsaved job post.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct JobDraft {
    pub title: String,
    pub description: String,
    pub category: String,
    pub specialty: String,
    /// Unique ids, kept in the order the user picked them.
    pub required_skills: Vec<String>,
    pub budget_type: BudgetType,
    pub budget: String,
    pub duration: String,
    pub attachments: Vec<Attachment>,
}

/// A single-field edit coming from the form.
#[derive(Debug, Clone, PartialEq)]
pub enum DraftField {
    Title(String),
    Description(String),
    Category(String),
    Specialty(String),
    BudgetType(BudgetType),
    Budget(String),
    Duration(String),
}

#[derive(Debug, Error, PartialEq, Eq)]
#[error("Unknown draft field: {0}")]
pub struct UnknownField(pub String);

impl DraftField {
    /// Maps a form input name to a typed edit.
    pub fn from_name(name: &str, value: impl Into<String>) -> Result<Self, UnknownField> {
        let value = value.into();
        Ok(match name {
            "title" => DraftField::Title(value),
            "description" => DraftField::Description(value),
            "category" => DraftField::Category(value),
            "specialty" => DraftField::Specialty(value),
            "budgetType" => DraftField::BudgetType(value.parse()?),
            "budget" => DraftField::Budget(value),
            "duration" => DraftField::Duration(value),
            other => return Err(UnknownField(other.to_string())),
        })
    }
}

impl JobDraft {
    /// Applies one edit. Setting the category always clears the specialty.
    pub fn apply(&mut self, field: DraftField) {
        match field {
            DraftField::Title(v) => self.title = v,
            DraftField::Description(v) => self.description = v,
            DraftField::Category(v) => {
                self.category = v;
                self.specialty.clear();
            }
            DraftField::Specialty(v) => self.specialty = v,
            DraftField::BudgetType(v) => self.budget_type = v,
            DraftField::Budget(v) => self.budget = v,
            DraftField::Duration(v) => self.duration = v,
        }
    }

    pub fn has_skill(&self, id: &str) -> bool {
        self.required_skills.iter().any(|s| s == id)
    }

    /// Returns whether the skill was added.
    pub fn add_skill(&mut self, id: &str) -> bool {
        let id = id.trim();
        if id.is_empty() || self.has_skill(id) {
            return false;
        }
        self.required_skills.push(id.to_string());
        true
    }

    /// Returns whether the skill was present.
    pub fn remove_skill(&mut self, id: &str) -> bool {
        let before = self.required_skills.len();
        self.required_skills.retain(|s| s != id);
        self.required_skills.len() != before
    }

    pub fn staged_files(&self) -> impl Iterator<Item = &StagedFile> {
        self.attachments.iter().filter_map(|a| match a {
            Attachment::Staged(file) => Some(file),
            Attachment::Existing(_) => None,
        })
    }
}
