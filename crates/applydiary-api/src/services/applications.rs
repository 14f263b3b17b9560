//! Application CRUD and filtered listing.

use std::sync::Arc;

use chrono::Utc;
use serde::Deserialize;
use tracing::debug;
use utoipa::IntoParams;
use uuid::Uuid;

use applydiary_core::validation::{normalize_search, parse_status_filter, ApplicationPayload};
use applydiary_core::{
    authorize, Application, ApplicationFilter, ApplicationRepository, ApplicationSort, Error,
    OwnerScope, ResourceKind, Result,
};

/// Query string of `GET /applications`.
#[derive(Debug, Default, Deserialize, IntoParams)]
pub struct ListApplicationsQuery {
    /// Exact status match, e.g. `Applied` or `Online Assessment`.
    pub status: Option<String>,
    /// Case-insensitive substring of company or role.
    pub search: Option<String>,
    /// `appliedDate` (default) or `deadline`.
    pub sort: Option<String>,
}

impl ListApplicationsQuery {
    pub fn into_filter(self) -> Result<ApplicationFilter> {
        Ok(ApplicationFilter {
            status: parse_status_filter(self.status.as_deref())?,
            search: normalize_search(self.search.as_deref()),
            sort: ApplicationSort::parse(self.sort.as_deref()),
        })
    }
}

#[derive(Clone)]
pub struct ApplicationService {
    applications: Arc<dyn ApplicationRepository>,
}

impl ApplicationService {
    pub fn new(applications: Arc<dyn ApplicationRepository>) -> Self {
        Self { applications }
    }

    pub async fn list(&self, owner: Uuid, query: ListApplicationsQuery) -> Result<Vec<Application>> {
        let filter = query.into_filter()?;
        let apps = self
            .applications
            .list(OwnerScope::live(owner), &filter)
            .await?;
        debug!(
            subsystem = "api",
            component = "applications",
            op = "list",
            user_id = %owner,
            result_count = apps.len(),
            "Listed applications"
        );
        Ok(apps)
    }

    pub async fn create(&self, owner: Uuid, payload: ApplicationPayload) -> Result<Application> {
        let new = payload.into_new(Utc::now())?;
        self.applications.insert(owner, new).await
    }

    /// Apply a partial update. Validation runs before the ownership lookup.
    pub async fn update(
        &self,
        owner: Uuid,
        id: Uuid,
        payload: ApplicationPayload,
    ) -> Result<Application> {
        let patch = payload.into_patch()?;
        let updated = self.applications.update(owner, id, &patch).await?;
        authorize(updated, owner, ResourceKind::Application)
    }

    pub async fn delete(&self, owner: Uuid, id: Uuid) -> Result<()> {
        self.applications
            .soft_delete(owner, id)
            .await?
            .map(|_| ())
            .ok_or(Error::NotFound(ResourceKind::Application))
    }
}
