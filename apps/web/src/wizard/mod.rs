// Job-posting wizard: draft state, step gate, dependent specialty data,
// edit-mode reconciliation and the skill picker.
// All backend access goes through `api::MarketplaceApi`.

pub mod controller;
pub mod draft;
pub mod payload;
pub mod picker;
pub mod reconciler;
pub mod specialties;
pub mod validation;

pub use controller::{WizardController, WizardMode, WizardPhase, WizardState, TOTAL_STEPS};
pub use draft::{Attachment, BudgetType, DraftField, JobDraft, StagedFile};
pub use validation::{FlowKind, ValidationError};
