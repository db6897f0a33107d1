use tracing::{info, warn};

use crate::api::MarketplaceApi;
use crate::errors::ClientError;
use crate::models::{FieldRef, JobRecord};
use crate::session::Session;
use crate::wizard::draft::{Attachment, JobDraft};

/// Proof that the current user owns the job being edited.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct EditContext {
    pub job_id: String,
    pub owner_id: String,
}

#[derive(Debug, Clone)]
pub struct EditSession {
    pub context: EditContext,
    pub draft: JobDraft,
}

/// Fetches a job, checks ownership, and maps it into a draft.
/// Nothing is returned for a job the session user does not own.
pub async fn load_for_edit(
    api: &dyn MarketplaceApi,
    session: Option<&Session>,
    job_id: &str,
) -> Result<EditSession, ClientError> {
    let job = api.job(job_id).await?;
    let owner_id = authorize_owner(&job, session)?;
    info!("Loaded job {job_id} for editing");

    Ok(EditSession {
        context: EditContext {
            job_id: job_id.to_string(),
            owner_id,
        },
        draft: draft_from_job(&job),
    })
}

/// Compares the job's client id with the acting user's id, as strings.
pub fn authorize_owner(job: &JobRecord, session: Option<&Session>) -> Result<String, ClientError> {
    let user_id = session.and_then(Session::user_id);
    let client_id = job.client.id();

    match (user_id, client_id) {
        (Some(user_id), Some(client_id)) if user_id == client_id => Ok(user_id),
        (user_id, client_id) => {
            warn!(
                "Edit rejected: job client {:?} does not match user {:?}",
                client_id, user_id
            );
            Err(ClientError::Authorization)
        }
    }
}

pub fn draft_from_job(job: &JobRecord) -> JobDraft {
    let mut draft = JobDraft {
        title: job.title.clone().unwrap_or_default(),
        description: job.description.clone().unwrap_or_default(),
        category: job.category.id().unwrap_or_default(),
        specialty: job.specialty.id().unwrap_or_default(),
        budget_type: job
            .budget_type
            .as_deref()
            .and_then(|t| t.parse().ok())
            .unwrap_or_default(),
        budget: job.budget.to_draft_string(),
        duration: job.duration.to_draft_string(),
        attachments: job.attachments.iter().filter_map(existing_attachment).collect(),
        ..Default::default()
    };
    for skill in job.skills.iter().filter_map(FieldRef::id) {
        draft.add_skill(&skill);
    }
    draft
}

fn existing_attachment(field: &FieldRef) -> Option<Attachment> {
    let reference = match field {
        FieldRef::Unset => None,
        FieldRef::Reference(path) => Some(path.clone()),
        FieldRef::Embedded(_) => ["url", "path", "name"]
            .iter()
            .find_map(|key| field.get_str(key).map(str::to_string))
            .or_else(|| field.id()),
    }?;
    Some(Attachment::Existing(reference))
}
