//! Category-scoped specialty list.
//!
//! Every category change starts a new request generation. A response is only
//! applied if it belongs to the latest generation, so a slow response for a
//! previously selected category can never overwrite the current list.

use tracing::{debug, warn};

use crate::api::MarketplaceApi;
use crate::errors::ClientError;
use crate::models::Specialty;

/// Ticket for one in-flight specialty fetch.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SpecialtyRequest {
    pub generation: u64,
    pub category_id: String,
}

#[derive(Debug, Default)]
pub struct SpecialtyResolver {
    generation: u64,
    category_id: String,
    specialties: Vec<Specialty>,
}

impl SpecialtyResolver {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn specialties(&self) -> &[Specialty] {
        &self.specialties
    }

    pub fn category_id(&self) -> &str {
        &self.category_id
    }

    /// Invalidates the current list. Returns `None` for an empty category.
    pub fn begin(&mut self, category_id: &str) -> Option<SpecialtyRequest> {
        self.generation += 1;
        self.category_id = category_id.to_string();
        self.specialties.clear();
        if category_id.is_empty() {
            return None;
        }
        Some(SpecialtyRequest {
            generation: self.generation,
            category_id: category_id.to_string(),
        })
    }

    /// Applies a fetch result. Returns `false` when the request was superseded.
    pub fn complete(
        &mut self,
        request: &SpecialtyRequest,
        result: Result<Vec<Specialty>, ClientError>,
    ) -> bool {
        if request.generation != self.generation {
            debug!(
                "Dropping stale specialties for category {} (generation {} < {})",
                request.category_id, request.generation, self.generation
            );
            return false;
        }
        match result {
            Ok(specialties) => self.specialties = specialties,
            Err(e) => {
                warn!(
                    "Failed to load specialties for category {}: {e}",
                    request.category_id
                );
                self.specialties.clear();
            }
        }
        true
    }

    /// Begins and completes a fetch in one go.
    pub async fn load(&mut self, api: &dyn MarketplaceApi, category_id: &str) {
        if let Some(request) = self.begin(category_id) {
            let result = api.specialties(&request.category_id).await;
            self.complete(&request, result);
        }
    }

    pub fn contains(&self, specialty_id: &str) -> bool {
        self.specialties.iter().any(|s| s.id == specialty_id)
    }
}
