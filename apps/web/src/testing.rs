//! In-memory backend for unit tests.

use std::collections::HashMap;
use std::sync::{Arc, Mutex};

use async_trait::async_trait;
use serde_json::Value;

use crate::api::MarketplaceApi;
use crate::app::AppContext;
use crate::errors::ClientError;
use crate::models::{
    Category, ContactRequest, ContactResponse, JobRecord, NamedRef, Skill, Specialty,
};
use crate::session::{MemorySessionStore, Session, SessionEvents};
use crate::shell::{NotificationQueue, RouteHistory};
use crate::wizard::payload::{CreateJobPayload, UpdateJobForm};

#[derive(Default)]
pub struct FakeState {
    pub categories: Vec<Category>,
    pub skills: Vec<Skill>,
    pub specialties: HashMap<String, Vec<Specialty>>,
    pub jobs: HashMap<String, Value>,
    pub fail_reference_data: bool,
    pub fail_specialties: bool,
    /// `(status, message)` returned by create/update/contact.
    pub fail_submit: Option<(u16, Option<String>)>,
    pub expire_session: bool,
    pub specialty_calls: Vec<String>,
    pub created: Vec<CreateJobPayload>,
    pub updated: Vec<(String, UpdateJobForm)>,
    pub contacts: Vec<ContactRequest>,
}

#[derive(Clone, Default)]
pub struct FakeApi {
    pub state: Arc<Mutex<FakeState>>,
}

impl FakeApi {
    /// Two categories with disjoint specialties and two skills.
    pub fn seeded() -> Self {
        let api = FakeApi::default();
        {
            let mut s = api.state.lock().unwrap();
            s.categories = vec![NamedRef::new("C1", "Web"), NamedRef::new("C2", "Data")];
            s.skills = vec![NamedRef::new("SK1", "Rust"), NamedRef::new("SK2", "React")];
            s.specialties.insert(
                "C1".into(),
                vec![NamedRef::new("S1", "Frontend"), NamedRef::new("S2", "Backend")],
            );
            s.specialties
                .insert("C2".into(), vec![NamedRef::new("S3", "Analytics")]);
        }
        api
    }

    pub fn with<R>(&self, f: impl FnOnce(&mut FakeState) -> R) -> R {
        f(&mut self.state.lock().unwrap())
    }

    fn submit_outcome(&self) -> Result<(), ClientError> {
        let s = self.state.lock().unwrap();
        if s.expire_session {
            return Err(ClientError::SessionExpired);
        }
        match &s.fail_submit {
            Some((status, message)) => Err(ClientError::Server {
                status: *status,
                message: message.clone(),
            }),
            None => Ok(()),
        }
    }
}

fn unavailable() -> ClientError {
    ClientError::Server {
        status: 503,
        message: Some("Service unavailable".into()),
    }
}

#[async_trait]
impl MarketplaceApi for FakeApi {
    async fn categories(&self) -> Result<Vec<Category>, ClientError> {
        let s = self.state.lock().unwrap();
        if s.fail_reference_data {
            return Err(unavailable());
        }
        Ok(s.categories.clone())
    }

    async fn specialties(&self, category_id: &str) -> Result<Vec<Specialty>, ClientError> {
        let mut s = self.state.lock().unwrap();
        s.specialty_calls.push(category_id.to_string());
        if s.fail_specialties {
            return Err(unavailable());
        }
        Ok(s.specialties.get(category_id).cloned().unwrap_or_default())
    }

    async fn skills(&self) -> Result<Vec<Skill>, ClientError> {
        let s = self.state.lock().unwrap();
        if s.fail_reference_data {
            return Err(unavailable());
        }
        Ok(s.skills.clone())
    }

    async fn job(&self, job_id: &str) -> Result<JobRecord, ClientError> {
        let raw = self.state.lock().unwrap().jobs.get(job_id).cloned();
        match raw {
            Some(value) => Ok(serde_json::from_value(value)?),
            None => Err(ClientError::Server {
                status: 404,
                message: Some("Job not found".into()),
            }),
        }
    }

    async fn create_job(&self, payload: &CreateJobPayload) -> Result<(), ClientError> {
        self.submit_outcome()?;
        self.state.lock().unwrap().created.push(payload.clone());
        Ok(())
    }

    async fn update_job(&self, job_id: &str, form: UpdateJobForm) -> Result<(), ClientError> {
        self.submit_outcome()?;
        self.state
            .lock()
            .unwrap()
            .updated
            .push((job_id.to_string(), form));
        Ok(())
    }

    async fn submit_contact(
        &self,
        request: &ContactRequest,
    ) -> Result<ContactResponse, ClientError> {
        self.submit_outcome()?;
        self.state.lock().unwrap().contacts.push(request.clone());
        Ok(ContactResponse {
            success: true,
            message: Some("Thanks, we will be in touch".into()),
        })
    }
}

/// Handles for asserting on side effects.
pub struct Harness {
    pub api: FakeApi,
    pub notifier: Arc<NotificationQueue>,
    pub navigator: Arc<RouteHistory>,
    pub store: Arc<MemorySessionStore>,
    pub ctx: AppContext,
}

pub fn harness(api: FakeApi) -> Harness {
    let notifier = Arc::new(NotificationQueue::new());
    let navigator = Arc::new(RouteHistory::new());
    let store = Arc::new(MemorySessionStore::new());
    let ctx = AppContext {
        api: Arc::new(api.clone()),
        store: store.clone(),
        notifier: notifier.clone(),
        navigator: navigator.clone(),
        events: SessionEvents::new(),
        config: crate::config::Config::with_base_url("http://backend.test"),
    };
    Harness {
        api,
        notifier,
        navigator,
        store,
        ctx,
    }
}

pub fn log_in(store: &MemorySessionStore, user: Value) {
    Session {
        token: "tok".into(),
        user,
    }
    .save(store);
}
