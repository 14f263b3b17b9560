//! Application repository implementation.

use async_trait::async_trait;
use sqlx::postgres::PgRow;
use sqlx::{Pool, Postgres, Row};
use tracing::debug;
use uuid::Uuid;

use applydiary_core::{
    Application, ApplicationFilter, ApplicationPatch, ApplicationRepository, ApplicationSort,
    ApplicationStatus, Error, Location, NewApplication, OwnerScope, Result,
};

use crate::escape_like;

pub(crate) const APPLICATION_COLUMNS: &str = "id, user_id, company, role, status, applied_date, \
     location, deadline, notes, source, resume_url, cover_url, created_at, updated_at, deleted_at";

/// PostgreSQL implementation of ApplicationRepository.
#[derive(Clone)]
pub struct PgApplicationRepository {
    pool: Pool<Postgres>,
}

impl PgApplicationRepository {
    pub fn new(pool: Pool<Postgres>) -> Self {
        Self { pool }
    }

    pub(crate) fn row_to_application(row: &PgRow) -> Result<Application> {
        let status: String = row.try_get("status").map_err(Error::Database)?;
        let location: String = row.try_get("location").map_err(Error::Database)?;
        Ok(Application {
            id: row.try_get("id").map_err(Error::Database)?,
            user_id: row.try_get("user_id").map_err(Error::Database)?,
            company: row.try_get("company").map_err(Error::Database)?,
            role: row.try_get("role").map_err(Error::Database)?,
            status: status
                .parse::<ApplicationStatus>()
                .map_err(|_| Error::Internal(format!("Unknown status in row: {}", status)))?,
            applied_date: row.try_get("applied_date").map_err(Error::Database)?,
            location: location
                .parse::<Location>()
                .map_err(|_| Error::Internal(format!("Unknown location in row: {}", location)))?,
            deadline: row.try_get("deadline").map_err(Error::Database)?,
            notes: row.try_get("notes").map_err(Error::Database)?,
            source: row.try_get("source").map_err(Error::Database)?,
            resume_url: row.try_get("resume_url").map_err(Error::Database)?,
            cover_url: row.try_get("cover_url").map_err(Error::Database)?,
            created_at: row.try_get("created_at").map_err(Error::Database)?,
            updated_at: row.try_get("updated_at").map_err(Error::Database)?,
            deleted_at: row.try_get("deleted_at").map_err(Error::Database)?,
        })
    }

    fn order_clause(sort: ApplicationSort) -> &'static str {
        match sort {
            ApplicationSort::AppliedDate => "applied_date DESC, id DESC",
            ApplicationSort::Deadline => "deadline DESC NULLS LAST, applied_date DESC, id DESC",
        }
    }
}

/// Build the SET clause of a partial update. `$1` and `$2` are reserved
/// for the id and owner, so field parameters start at `$3`.
fn patch_assignments(patch: &ApplicationPatch) -> Vec<String> {
    let mut sets = vec!["updated_at = now()".to_string()];
    let mut param_idx = 3;
    let mut push = |column: &str, present: bool| {
        if present {
            sets.push(format!("{} = ${}", column, param_idx));
            param_idx += 1;
        }
    };

    push("company", patch.company.is_some());
    push("role", patch.role.is_some());
    push("status", patch.status.is_some());
    push("applied_date", patch.applied_date.is_some());
    push("location", patch.location.is_some());
    push("deadline", patch.deadline.is_some());
    push("notes", patch.notes.is_some());
    push("source", patch.source.is_some());
    push("resume_url", patch.resume_url.is_some());
    push("cover_url", patch.cover_url.is_some());
    sets
}

#[async_trait]
impl ApplicationRepository for PgApplicationRepository {
    async fn list(&self, scope: OwnerScope, filter: &ApplicationFilter) -> Result<Vec<Application>> {
        let query = format!(
            "SELECT {} FROM application
             WHERE user_id = $1
               AND ($2 OR deleted_at IS NULL)
               AND ($3::text IS NULL OR status = $3)
               AND ($4::text IS NULL OR company ILIKE $4 OR role ILIKE $4)
             ORDER BY {}",
            APPLICATION_COLUMNS,
            Self::order_clause(filter.sort)
        );
        let pattern = filter
            .search
            .as_deref()
            .map(|s| format!("%{}%", escape_like(s)));

        let rows = sqlx::query(&query)
            .bind(scope.owner)
            .bind(scope.visibility.include_deleted())
            .bind(filter.status.map(|s| s.as_str()))
            .bind(pattern)
            .fetch_all(&self.pool)
            .await
            .map_err(Error::Database)?;

        let apps = rows
            .iter()
            .map(Self::row_to_application)
            .collect::<Result<Vec<_>>>()?;
        debug!(
            subsystem = "db",
            component = "applications",
            op = "list",
            user_id = %scope.owner,
            result_count = apps.len(),
            "Listed applications"
        );
        Ok(apps)
    }

    async fn fetch(&self, scope: OwnerScope, id: Uuid) -> Result<Option<Application>> {
        let query = format!(
            "SELECT {} FROM application
             WHERE id = $1 AND user_id = $2 AND ($3 OR deleted_at IS NULL)",
            APPLICATION_COLUMNS
        );
        let row = sqlx::query(&query)
            .bind(id)
            .bind(scope.owner)
            .bind(scope.visibility.include_deleted())
            .fetch_optional(&self.pool)
            .await
            .map_err(Error::Database)?;
        row.as_ref().map(Self::row_to_application).transpose()
    }

    async fn insert(&self, owner: Uuid, app: NewApplication) -> Result<Application> {
        let query = format!(
            "INSERT INTO application
                (id, user_id, company, role, status, applied_date, location,
                 deadline, notes, source, resume_url, cover_url, created_at, updated_at)
             VALUES ($1, $2, $3, $4, $5, $6, $7, $8, $9, $10, $11, $12, now(), now())
             RETURNING {}",
            APPLICATION_COLUMNS
        );
        let row = sqlx::query(&query)
            .bind(Uuid::now_v7())
            .bind(owner)
            .bind(&app.company)
            .bind(&app.role)
            .bind(app.status.as_str())
            .bind(app.applied_date)
            .bind(app.location.as_str())
            .bind(app.deadline)
            .bind(&app.notes)
            .bind(&app.source)
            .bind(&app.resume_url)
            .bind(&app.cover_url)
            .fetch_one(&self.pool)
            .await
            .map_err(Error::Database)?;
        Self::row_to_application(&row)
    }

    async fn update(
        &self,
        owner: Uuid,
        id: Uuid,
        patch: &ApplicationPatch,
    ) -> Result<Option<Application>> {
        let query = format!(
            "UPDATE application SET {}
             WHERE id = $1 AND user_id = $2 AND deleted_at IS NULL
             RETURNING {}",
            patch_assignments(patch).join(", "),
            APPLICATION_COLUMNS
        );

        // Bind order must match patch_assignments
        let mut q = sqlx::query(&query).bind(id).bind(owner);
        if let Some(company) = &patch.company {
            q = q.bind(company);
        }
        if let Some(role) = &patch.role {
            q = q.bind(role);
        }
        if let Some(status) = patch.status {
            q = q.bind(status.as_str());
        }
        if let Some(applied_date) = patch.applied_date {
            q = q.bind(applied_date);
        }
        if let Some(location) = patch.location {
            q = q.bind(location.as_str());
        }
        if let Some(deadline) = patch.deadline {
            q = q.bind(deadline);
        }
        if let Some(notes) = &patch.notes {
            q = q.bind(notes);
        }
        if let Some(source) = &patch.source {
            q = q.bind(source);
        }
        if let Some(resume_url) = &patch.resume_url {
            q = q.bind(resume_url);
        }
        if let Some(cover_url) = &patch.cover_url {
            q = q.bind(cover_url);
        }

        let row = q
            .fetch_optional(&self.pool)
            .await
            .map_err(Error::Database)?;
        row.as_ref().map(Self::row_to_application).transpose()
    }

    async fn soft_delete(&self, owner: Uuid, id: Uuid) -> Result<Option<Application>> {
        let query = format!(
            "UPDATE application SET deleted_at = now()
             WHERE id = $1 AND user_id = $2 AND deleted_at IS NULL
             RETURNING {}",
            APPLICATION_COLUMNS
        );
        let row = sqlx::query(&query)
            .bind(id)
            .bind(owner)
            .fetch_optional(&self.pool)
            .await
            .map_err(Error::Database)?;
        row.as_ref().map(Self::row_to_application).transpose()
    }
}
