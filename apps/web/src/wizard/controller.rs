//! Wizard controller: owns the draft and the step state for one posting or
//! edit session.
//!
//! Flow: Step 1 (content) →(gate)→ Step 2 (attachments & review) →(submit)→
//! Submitting → Done. A failed submit drops back to Step 2 with the draft
//! intact. Moving back never validates; moving forward always does.

use tracing::{debug, error, info, warn};

use crate::app::AppContext;
use crate::errors::ClientError;
use crate::models::{Category, Skill, Specialty};
use crate::session::Session;
use crate::shell::Route;
use crate::wizard::draft::{Attachment, DraftField, JobDraft, UnknownField};
use crate::wizard::payload::{build_create_payload, build_update_form};
use crate::wizard::picker::{PickerEvent, SkillPicker};
use crate::wizard::reconciler::{load_for_edit, EditContext};
use crate::wizard::specialties::SpecialtyResolver;
use crate::wizard::validation::{validate_content, FlowKind, ValidationError};

pub const TOTAL_STEPS: usize = 2;
const CONTENT_STEP: usize = 1;

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum WizardMode {
    Create,
    Edit(EditContext),
}

impl WizardMode {
    pub fn flow(&self) -> FlowKind {
        match self {
            WizardMode::Create => FlowKind::Create,
            WizardMode::Edit(_) => FlowKind::Edit,
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum WizardPhase {
    Step(usize),
    Submitting,
    Done,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct WizardState {
    pub current_step: usize,
    pub loading: bool,
    pub error: Option<String>,
    pub done: bool,
}

impl Default for WizardState {
    fn default() -> Self {
        Self {
            current_step: 1,
            loading: false,
            error: None,
            done: false,
        }
    }
}

impl WizardState {
    pub fn phase(&self) -> WizardPhase {
        if self.done {
            WizardPhase::Done
        } else if self.loading {
            WizardPhase::Submitting
        } else {
            WizardPhase::Step(self.current_step)
        }
    }
}

pub struct WizardController {
    ctx: AppContext,
    mode: WizardMode,
    draft: JobDraft,
    state: WizardState,
    categories: Vec<Category>,
    skills: Vec<Skill>,
    specialties: SpecialtyResolver,
    picker: SkillPicker,
}

impl WizardController {
    fn new(ctx: AppContext, mode: WizardMode, draft: JobDraft) -> Self {
        Self {
            ctx,
            mode,
            draft,
            state: WizardState::default(),
            categories: Vec::new(),
            skills: Vec::new(),
            specialties: SpecialtyResolver::new(),
            picker: SkillPicker::new(),
        }
    }

    /// A blank posting session.
    pub fn create(ctx: AppContext) -> Self {
        Self::new(ctx, WizardMode::Create, JobDraft::default())
    }

    /// Opens an existing job for editing.
    ///
    /// Any failure, including a non-owner, notifies once and redirects to the
    /// job listing; no controller exists for a job the user cannot edit.
    /// Session expiry is left to the session handler.
    pub async fn edit(ctx: AppContext, job_id: &str) -> Result<Self, ClientError> {
        let session = Session::load(ctx.store.as_ref());
        let loaded = load_for_edit(ctx.api.as_ref(), session.as_ref(), job_id).await;
        match loaded {
            Ok(loaded) => {
                let mut controller =
                    Self::new(ctx, WizardMode::Edit(loaded.context), loaded.draft);
                let category = controller.draft.category.clone();
                controller
                    .specialties
                    .load(controller.ctx.api.as_ref(), &category)
                    .await;
                Ok(controller)
            }
            Err(e) if e.is_session_expired() => Err(e),
            Err(e) => {
                warn!("Cannot edit job {job_id}: {e}");
                ctx.notifier.error(&e.user_message());
                ctx.navigator.navigate(Route::Jobs);
                Err(e)
            }
        }
    }

    /// Fetches categories and skills. Failures only empty the dropdowns.
    pub async fn load_reference_data(&mut self) {
        let api = self.ctx.api.as_ref();
        let (categories, skills) = tokio::join!(api.categories(), api.skills());
        self.categories = categories.unwrap_or_else(|e| {
            warn!("Failed to load categories: {e}");
            Vec::new()
        });
        self.skills = skills.unwrap_or_else(|e| {
            warn!("Failed to load skills: {e}");
            Vec::new()
        });
        debug!(
            "Reference data loaded: {} categories, {} skills",
            self.categories.len(),
            self.skills.len()
        );
    }

    pub fn draft(&self) -> &JobDraft {
        &self.draft
    }

    pub fn state(&self) -> &WizardState {
        &self.state
    }

    pub fn mode(&self) -> &WizardMode {
        &self.mode
    }

    pub fn categories(&self) -> &[Category] {
        &self.categories
    }

    pub fn skills(&self) -> &[Skill] {
        &self.skills
    }

    pub fn specialties(&self) -> &[Specialty] {
        self.specialties.specialties()
    }

    pub fn picker(&self) -> &SkillPicker {
        &self.picker
    }

    /// Selected skills resolved against the skill list, in selection order.
    pub fn selected_skills(&self) -> Vec<&Skill> {
        self.draft
            .required_skills
            .iter()
            .filter_map(|id| self.skills.iter().find(|s| s.id == *id))
            .collect()
    }

    /// Skills the open picker currently offers.
    pub fn visible_skills(&self) -> Vec<&Skill> {
        self.picker
            .visible(&self.skills, &self.draft.required_skills)
    }

    /// Updates one field. A category change resets the specialty and refetches its list.
    pub async fn set_field(&mut self, field: DraftField) {
        let new_category = match &field {
            DraftField::Category(id) => Some(id.clone()),
            _ => None,
        };
        self.draft.apply(field);
        self.state.error = None;

        if let Some(category) = new_category {
            self.specialties
                .load(self.ctx.api.as_ref(), &category)
                .await;
        }
    }

    pub async fn set_field_by_name(&mut self, name: &str, value: &str) -> Result<(), UnknownField> {
        let field = DraftField::from_name(name, value)?;
        self.set_field(field).await;
        Ok(())
    }

    pub fn add_skill(&mut self, id: &str) {
        if self.draft.add_skill(id) {
            self.state.error = None;
        }
    }

    pub fn remove_skill(&mut self, id: &str) {
        self.draft.remove_skill(id);
    }

    /// Replaces the whole attachment list.
    pub fn set_attachments(&mut self, attachments: Vec<Attachment>) {
        self.draft.attachments = attachments;
    }

    pub fn skill_picker_event(&mut self, event: PickerEvent) {
        if let Some(id) = self.picker.handle(event) {
            self.add_skill(&id);
        }
    }

    fn validate_step(&self, step: usize) -> Result<(), ValidationError> {
        match step {
            CONTENT_STEP => validate_content(&self.draft, self.mode.flow()),
            _ => Ok(()),
        }
    }

    /// Advances one step if the current step validates.
    pub fn go_next(&mut self) -> Result<(), ValidationError> {
        if let Err(e) = self.validate_step(self.state.current_step) {
            debug!("Step {} gate failed: {e}", self.state.current_step);
            self.state.error = Some(e.to_string());
            return Err(e);
        }
        self.state.error = None;
        self.state.current_step = (self.state.current_step + 1).min(TOTAL_STEPS);
        Ok(())
    }

    pub fn go_back(&mut self) {
        self.state.error = None;
        self.state.current_step = self.state.current_step.saturating_sub(1).max(1);
    }

    /// Validates, sends the create or update request, and routes the outcome.
    pub async fn submit(&mut self) -> Result<(), ClientError> {
        if self.state.loading || self.state.done {
            debug!("Submit ignored, wizard is {:?}", self.state.phase());
            return Ok(());
        }

        if let Err(e) = validate_content(&self.draft, self.mode.flow()) {
            self.state.error = Some(e.to_string());
            return Err(e.into());
        }

        self.state.loading = true;
        self.state.error = None;

        let result = match &self.mode {
            WizardMode::Create => match build_create_payload(&self.draft) {
                Ok(payload) => self.ctx.api.create_job(&payload).await,
                Err(e) => Err(e.into()),
            },
            WizardMode::Edit(edit) => match build_update_form(&self.draft) {
                Ok(form) => self.ctx.api.update_job(&edit.job_id, form).await,
                Err(e) => Err(e.into()),
            },
        };

        self.state.loading = false;

        match result {
            Ok(()) => {
                let message = match &self.mode {
                    WizardMode::Create => "Job posted successfully",
                    WizardMode::Edit(_) => "Job updated successfully",
                };
                info!("{message}");
                self.ctx.notifier.success(message);
                self.draft = JobDraft::default();
                self.picker = SkillPicker::new();
                self.state.done = true;
                self.ctx.navigator.navigate(Route::Jobs);
                Ok(())
            }
            Err(e) if e.is_session_expired() => Err(e),
            Err(e) => {
                let message = e.user_message();
                error!("Job submission failed ({}): {message}", e.code());
                self.ctx.notifier.error(&message);
                self.state.error = Some(message);
                self.state.current_step = TOTAL_STEPS;
                Err(e)
            }
        }
    }
}
