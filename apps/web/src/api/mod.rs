/// Backend client, the single point of entry for every marketplace REST call.
///
/// No other module builds HTTP requests. Wizard, reconciler and contact form
/// talk to the backend only through `MarketplaceApi`, carried as
/// `Arc<dyn MarketplaceApi>` so tests can swap in an in-memory backend.
use async_trait::async_trait;

use crate::errors::ClientError;
use crate::models::{Category, ContactRequest, ContactResponse, JobRecord, Skill, Specialty};
use crate::wizard::payload::{CreateJobPayload, UpdateJobForm};

pub mod http;

pub use http::HttpMarketplaceApi;

#[async_trait]
pub trait MarketplaceApi: Send + Sync {
    /// `GET /categories`
    async fn categories(&self) -> Result<Vec<Category>, ClientError>;

    /// `GET /specialties?category=<id>`
    async fn specialties(&self, category_id: &str) -> Result<Vec<Specialty>, ClientError>;

    /// `GET /skills`
    async fn skills(&self) -> Result<Vec<Skill>, ClientError>;

    /// `GET /jobs/:id`
    async fn job(&self, job_id: &str) -> Result<JobRecord, ClientError>;

    /// `POST /jobs`
    async fn create_job(&self, payload: &CreateJobPayload) -> Result<(), ClientError>;

    /// `PUT /jobs/:id`
    async fn update_job(&self, job_id: &str, form: UpdateJobForm) -> Result<(), ClientError>;

    /// `POST /contacts`
    async fn submit_contact(&self, request: &ContactRequest)
        -> Result<ContactResponse, ClientError>;
}
