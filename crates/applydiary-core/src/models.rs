//! Domain models for ApplyDiary.
//!
//! Every owned record (`Application`, `Note`, `Document`) carries the id of
//! exactly one owning user and a nullable `deleted_at` tombstone.

use std::fmt;
use std::str::FromStr;

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use utoipa::ToSchema;
use uuid::Uuid;

use crate::error::{Error, Result};

// =============================================================================
// USER
// =============================================================================

/// A registered account. Never soft-deleted.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct User {
    pub id: Uuid,
    /// Lowercased email, unique across all users.
    pub email: String,
    /// PHC-formatted one-way password hash.
    pub password_hash: String,
    pub name: String,
    pub timezone: String,
    pub created_at: DateTime<Utc>,
}

/// Public view of a user, safe to return to clients.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize, ToSchema)]
pub struct UserProfile {
    pub id: Uuid,
    pub email: String,
    pub name: String,
    pub timezone: String,
}

impl From<&User> for UserProfile {
    fn from(user: &User) -> Self {
        Self {
            id: user.id,
            email: user.email.clone(),
            name: user.name.clone(),
            timezone: user.timezone.clone(),
        }
    }
}

impl From<User> for UserProfile {
    fn from(user: User) -> Self {
        Self {
            id: user.id,
            email: user.email,
            name: user.name,
            timezone: user.timezone,
        }
    }
}

/// Validated input for creating a user row.
#[derive(Debug, Clone)]
pub struct NewUser {
    pub email: String,
    pub password_hash: String,
    pub name: String,
    pub timezone: String,
}

/// Identity carried by a verified bearer token.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Identity {
    pub user_id: Uuid,
    pub email: String,
}

// =============================================================================
// APPLICATION
// =============================================================================

/// Pipeline stage of a job application.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize, ToSchema)]
pub enum ApplicationStatus {
    #[default]
    Draft,
    Applied,
    #[serde(rename = "Online Assessment")]
    OnlineAssessment,
    Interviewing,
    Offer,
    Rejected,
    Withdrawn,
}

impl ApplicationStatus {
    pub const ALL: [ApplicationStatus; 7] = [
        ApplicationStatus::Draft,
        ApplicationStatus::Applied,
        ApplicationStatus::OnlineAssessment,
        ApplicationStatus::Interviewing,
        ApplicationStatus::Offer,
        ApplicationStatus::Rejected,
        ApplicationStatus::Withdrawn,
    ];

    pub fn as_str(&self) -> &'static str {
        match self {
            ApplicationStatus::Draft => "Draft",
            ApplicationStatus::Applied => "Applied",
            ApplicationStatus::OnlineAssessment => "Online Assessment",
            ApplicationStatus::Interviewing => "Interviewing",
            ApplicationStatus::Offer => "Offer",
            ApplicationStatus::Rejected => "Rejected",
            ApplicationStatus::Withdrawn => "Withdrawn",
        }
    }
}

impl fmt::Display for ApplicationStatus {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for ApplicationStatus {
    type Err = Error;

    fn from_str(s: &str) -> Result<Self> {
        Self::ALL
            .into_iter()
            .find(|status| status.as_str() == s)
            .ok_or_else(|| Error::invalid("status", format!("Unknown status '{}'", s)))
    }
}

/// Work arrangement of the role.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize, ToSchema)]
#[serde(rename_all = "kebab-case")]
pub enum Location {
    #[default]
    Remote,
    OnSite,
    Hybrid,
}

impl Location {
    pub fn as_str(&self) -> &'static str {
        match self {
            Location::Remote => "remote",
            Location::OnSite => "on-site",
            Location::Hybrid => "hybrid",
        }
    }
}

impl fmt::Display for Location {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for Location {
    type Err = Error;

    fn from_str(s: &str) -> Result<Self> {
        match s {
            "remote" => Ok(Location::Remote),
            "on-site" => Ok(Location::OnSite),
            "hybrid" => Ok(Location::Hybrid),
            other => Err(Error::invalid(
                "location",
                format!("Unknown location '{}'", other),
            )),
        }
    }
}

/// A tracked job application.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct Application {
    pub id: Uuid,
    pub user_id: Uuid,
    pub company: String,
    pub role: String,
    pub status: ApplicationStatus,
    pub applied_date: DateTime<Utc>,
    pub location: Location,
    pub deadline: Option<DateTime<Utc>>,
    /// Legacy free-text field, distinct from [`Note`] records.
    pub notes: Option<String>,
    pub source: Option<String>,
    pub resume_url: Option<String>,
    pub cover_url: Option<String>,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
    pub deleted_at: Option<DateTime<Utc>>,
}

/// Validated input for creating an application.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct NewApplication {
    pub company: String,
    pub role: String,
    pub status: ApplicationStatus,
    pub applied_date: DateTime<Utc>,
    pub location: Location,
    pub deadline: Option<DateTime<Utc>>,
    pub notes: Option<String>,
    pub source: Option<String>,
    pub resume_url: Option<String>,
    pub cover_url: Option<String>,
}

/// Validated partial update.
///
/// `None` leaves a field unchanged. For nullable columns `Some(None)` clears
/// the value.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct ApplicationPatch {
    pub company: Option<String>,
    pub role: Option<String>,
    pub status: Option<ApplicationStatus>,
    pub applied_date: Option<DateTime<Utc>>,
    pub location: Option<Location>,
    pub deadline: Option<Option<DateTime<Utc>>>,
    pub notes: Option<Option<String>>,
    pub source: Option<Option<String>>,
    pub resume_url: Option<Option<String>>,
    pub cover_url: Option<Option<String>>,
}

impl ApplicationPatch {
    /// Apply the patch to an existing record in place.
    pub fn apply_to(&self, app: &mut Application) {
        if let Some(company) = &self.company {
            app.company = company.clone();
        }
        if let Some(role) = &self.role {
            app.role = role.clone();
        }
        if let Some(status) = self.status {
            app.status = status;
        }
        if let Some(applied_date) = self.applied_date {
            app.applied_date = applied_date;
        }
        if let Some(location) = self.location {
            app.location = location;
        }
        if let Some(deadline) = self.deadline {
            app.deadline = deadline;
        }
        if let Some(notes) = &self.notes {
            app.notes = notes.clone();
        }
        if let Some(source) = &self.source {
            app.source = source.clone();
        }
        if let Some(resume_url) = &self.resume_url {
            app.resume_url = resume_url.clone();
        }
        if let Some(cover_url) = &self.cover_url {
            app.cover_url = cover_url.clone();
        }
    }
}

/// Ordering key for application listings.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum ApplicationSort {
    /// `applied_date` descending.
    #[default]
    AppliedDate,
    /// `deadline` descending (nulls last), then `applied_date` descending.
    Deadline,
}

impl ApplicationSort {
    /// Parse a query value; anything unrecognized falls back to the default.
    pub fn parse(value: Option<&str>) -> Self {
        match value.map(str::trim) {
            Some("deadline") => ApplicationSort::Deadline,
            _ => ApplicationSort::AppliedDate,
        }
    }
}

/// Filter for application listings.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct ApplicationFilter {
    /// Exact status match.
    pub status: Option<ApplicationStatus>,
    /// Case-insensitive substring matched against company or role.
    pub search: Option<String>,
    pub sort: ApplicationSort,
}

impl ApplicationFilter {
    /// Whether an application passes the status and search predicates.
    pub fn matches(&self, app: &Application) -> bool {
        if let Some(status) = self.status {
            if app.status != status {
                return false;
            }
        }
        if let Some(search) = &self.search {
            let needle = search.to_lowercase();
            return app.company.to_lowercase().contains(&needle)
                || app.role.to_lowercase().contains(&needle);
        }
        true
    }
}

// =============================================================================
// NOTE
// =============================================================================

/// A free-text note attached to an application.
///
/// `user_id` always equals the parent application's owner.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct Note {
    pub id: Uuid,
    pub application_id: Uuid,
    pub user_id: Uuid,
    pub content: String,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
    pub deleted_at: Option<DateTime<Utc>>,
}

// =============================================================================
// DOCUMENT
// =============================================================================

/// Metadata of an uploaded attachment. The bytes live in blob storage.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct Document {
    pub id: Uuid,
    pub user_id: Uuid,
    pub file_name: String,
    pub file_type: String,
    pub file_size: i64,
    /// Storage locator, e.g. `/uploads/<uuid>.pdf`.
    pub url: String,
    pub created_at: DateTime<Utc>,
    pub deleted_at: Option<DateTime<Utc>>,
}

/// Input for creating a document metadata row.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct NewDocument {
    pub file_name: String,
    pub file_type: String,
    pub file_size: i64,
    pub url: String,
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::TimeZone;

    fn sample_application() -> Application {
        let at = Utc.with_ymd_and_hms(2026, 3, 1, 12, 0, 0).unwrap();
        Application {
            id: Uuid::new_v4(),
            user_id: Uuid::new_v4(),
            company: "Acme".to_string(),
            role: "Engineer".to_string(),
            status: ApplicationStatus::Applied,
            applied_date: at,
            location: Location::Hybrid,
            deadline: Some(at),
            notes: Some("referral".to_string()),
            source: None,
            resume_url: None,
            cover_url: None,
            created_at: at,
            updated_at: at,
            deleted_at: None,
        }
    }

    #[test]
    fn test_status_round_trips_through_str() {
        for status in ApplicationStatus::ALL {
            assert_eq!(status.as_str().parse::<ApplicationStatus>().unwrap(), status);
        }
        assert!("Ghosted".parse::<ApplicationStatus>().is_err());
    }

    #[test]
    fn test_status_serializes_with_spaces() {
        let json = serde_json::to_string(&ApplicationStatus::OnlineAssessment).unwrap();
        assert_eq!(json, "\"Online Assessment\"");
    }

    #[test]
    fn test_location_serializes_kebab_case() {
        assert_eq!(serde_json::to_string(&Location::OnSite).unwrap(), "\"on-site\"");
        assert_eq!("on-site".parse::<Location>().unwrap(), Location::OnSite);
        assert!("office".parse::<Location>().is_err());
    }

    #[test]
    fn test_application_serializes_camel_case() {
        let value = serde_json::to_value(sample_application()).unwrap();
        assert!(value.get("appliedDate").is_some());
        assert!(value.get("userId").is_some());
        assert!(value.get("deletedAt").unwrap().is_null());
    }

    #[test]
    fn test_patch_leaves_unspecified_fields() {
        let mut app = sample_application();
        let before = app.clone();
        let patch = ApplicationPatch {
            role: Some("Staff Engineer".to_string()),
            deadline: Some(None),
            ..Default::default()
        };
        patch.apply_to(&mut app);

        assert_eq!(app.role, "Staff Engineer");
        assert_eq!(app.deadline, None);
        assert_eq!(app.company, before.company);
        assert_eq!(app.notes, before.notes);
        assert_eq!(app.status, before.status);
    }

    #[test]
    fn test_filter_search_matches_company_or_role() {
        let app = sample_application();
        let by_company = ApplicationFilter {
            search: Some("acm".to_string()),
            ..Default::default()
        };
        let by_role = ApplicationFilter {
            search: Some("GINEER".to_string()),
            ..Default::default()
        };
        let miss = ApplicationFilter {
            search: Some("globex".to_string()),
            ..Default::default()
        };
        assert!(by_company.matches(&app));
        assert!(by_role.matches(&app));
        assert!(!miss.matches(&app));
    }

    #[test]
    fn test_filter_status_is_exact() {
        let app = sample_application();
        let applied = ApplicationFilter {
            status: Some(ApplicationStatus::Applied),
            ..Default::default()
        };
        let offer = ApplicationFilter {
            status: Some(ApplicationStatus::Offer),
            ..Default::default()
        };
        assert!(applied.matches(&app));
        assert!(!offer.matches(&app));
    }

    #[test]
    fn test_sort_parse_falls_back() {
        assert_eq!(ApplicationSort::parse(Some("deadline")), ApplicationSort::Deadline);
        assert_eq!(ApplicationSort::parse(Some("appliedDate")), ApplicationSort::AppliedDate);
        assert_eq!(ApplicationSort::parse(Some("bogus")), ApplicationSort::AppliedDate);
        assert_eq!(ApplicationSort::parse(None), ApplicationSort::AppliedDate);
    }
}
