//! Request payloads and their validation into domain inputs.
//!
//! Payload structs deserialize leniently (every field optional) so that a
//! missing field is reported as a field issue rather than a parse failure.
//! Each payload's `validate` collects every issue before failing.

use chrono::{DateTime, Utc};
use once_cell::sync::Lazy;
use regex::Regex;
use serde::{Deserialize, Deserializer};
use utoipa::ToSchema;
use uuid::Uuid;

use crate::defaults::{
    APPLICATION_NOTES_MAX_LEN, COMPANY_ROLE_MAX_LEN, DEFAULT_TIMEZONE, NAME_MAX_LEN, NOTE_MAX_LEN,
    PASSWORD_MIN_LEN, SOURCE_MAX_LEN, TIMEZONE_MAX_LEN, URL_MAX_LEN,
};
use crate::error::{Error, FieldIssue, Result};
use crate::models::{ApplicationPatch, ApplicationStatus, Location, NewApplication};

static EMAIL_RE: Lazy<Regex> =
    Lazy::new(|| Regex::new(r"^[^\s@]+@[^\s@]+\.[^\s@]+$").expect("email regex"));

static URL_RE: Lazy<Regex> =
    Lazy::new(|| Regex::new(r"(?i)^https?://[^\s/$.?#][^\s]*$").expect("url regex"));

/// Deserialize a field that distinguishes "absent" from "null".
///
/// Use with `#[serde(default, deserialize_with = "double_option")]`: absent
/// stays `None`, `null` becomes `Some(None)`.
pub fn double_option<'de, T, D>(deserializer: D) -> std::result::Result<Option<Option<T>>, D::Error>
where
    T: Deserialize<'de>,
    D: Deserializer<'de>,
{
    Option::<T>::deserialize(deserializer).map(Some)
}

/// Accumulates field issues.
#[derive(Debug, Default)]
struct Issues(Vec<FieldIssue>);

impl Issues {
    fn push(&mut self, field: &str, message: impl Into<String>) {
        self.0.push(FieldIssue::new(field, message));
    }

    fn finish<T>(self, value: impl FnOnce() -> T) -> Result<T> {
        if self.0.is_empty() {
            Ok(value())
        } else {
            Err(Error::Validation(self.0))
        }
    }

    /// Reject an explicit `null` on a field that is not nullable.
    ///
    /// `None` means the issue was recorded. Otherwise the inner value is
    /// `None` when the field was absent.
    fn non_null(&mut self, field: &str, value: Option<Option<String>>) -> Option<Option<String>> {
        match value {
            Some(None) => {
                self.push(field, "Expected string, received null");
                None
            }
            Some(Some(v)) => Some(Some(v)),
            None => Some(None),
        }
    }

    /// Trimmed, non-empty, bounded text.
    fn required_text(&mut self, field: &str, value: Option<String>, max: usize) -> Option<String> {
        let Some(raw) = value else {
            self.push(field, "Required");
            return None;
        };
        let trimmed = raw.trim();
        if trimmed.is_empty() {
            self.push(field, "Must not be empty");
            return None;
        }
        if trimmed.chars().count() > max {
            self.push(field, format!("Must be at most {} characters", max));
            return None;
        }
        Some(trimmed.to_string())
    }

    /// Nullable, bounded text. Stored as supplied.
    fn nullable_text(
        &mut self,
        field: &str,
        value: Option<Option<String>>,
        max: usize,
    ) -> Option<Option<String>> {
        match value {
            Some(Some(text)) if text.chars().count() > max => {
                self.push(field, format!("Must be at most {} characters", max));
                None
            }
            other => other,
        }
    }

    fn nullable_url(
        &mut self,
        field: &str,
        value: Option<Option<String>>,
    ) -> Option<Option<String>> {
        match value {
            Some(Some(url)) => {
                if url.chars().count() > URL_MAX_LEN {
                    self.push(field, format!("Must be at most {} characters", URL_MAX_LEN));
                    None
                } else if !URL_RE.is_match(&url) {
                    self.push(field, "Invalid url");
                    None
                } else {
                    Some(Some(url))
                }
            }
            other => other,
        }
    }

    fn datetime(&mut self, field: &str, value: &str) -> Option<DateTime<Utc>> {
        match DateTime::parse_from_rfc3339(value.trim()) {
            Ok(dt) => Some(dt.with_timezone(&Utc)),
            Err(_) => {
                self.push(field, "Invalid datetime");
                None
            }
        }
    }

    fn status(&mut self, value: &str) -> Option<ApplicationStatus> {
        match value.parse() {
            Ok(status) => Some(status),
            Err(_) => {
                self.push("status", "Invalid enum value");
                None
            }
        }
    }

    fn location(&mut self, value: &str) -> Option<Location> {
        match value.parse() {
            Ok(location) => Some(location),
            Err(_) => {
                self.push("location", "Invalid enum value");
                None
            }
        }
    }

    fn email(&mut self, value: Option<String>) -> Option<String> {
        let Some(raw) = value else {
            self.push("email", "Required");
            return None;
        };
        let email = raw.trim().to_lowercase();
        if !EMAIL_RE.is_match(&email) {
            self.push("email", "Invalid email");
            return None;
        }
        Some(email)
    }

    fn password(&mut self, value: Option<String>) -> Option<String> {
        let Some(password) = value else {
            self.push("password", "Required");
            return None;
        };
        if password.chars().count() < PASSWORD_MIN_LEN {
            self.push(
                "password",
                format!("Must be at least {} characters", PASSWORD_MIN_LEN),
            );
            return None;
        }
        Some(password)
    }
}

// =============================================================================
// AUTH
// =============================================================================

#[derive(Debug, Default, Deserialize, ToSchema)]
pub struct RegisterPayload {
    #[serde(default)]
    pub email: Option<String>,
    #[serde(default)]
    pub password: Option<String>,
    #[serde(default)]
    pub name: Option<String>,
    #[serde(default)]
    pub timezone: Option<String>,
}

/// A validated registration request. The password is still plaintext.
#[derive(Debug, Clone)]
pub struct Registration {
    pub email: String,
    pub password: String,
    pub name: String,
    pub timezone: String,
}

impl RegisterPayload {
    pub fn validate(self) -> Result<Registration> {
        let mut issues = Issues::default();
        let email = issues.email(self.email);
        let password = issues.password(self.password);
        let name = issues.required_text("name", self.name, NAME_MAX_LEN);
        let timezone = issues.required_text(
            "timezone",
            Some(self.timezone.unwrap_or_else(|| DEFAULT_TIMEZONE.to_string())),
            TIMEZONE_MAX_LEN,
        );
        issues.finish(|| Registration {
            email: email.unwrap_or_default(),
            password: password.unwrap_or_default(),
            name: name.unwrap_or_default(),
            timezone: timezone.unwrap_or_default(),
        })
    }
}

#[derive(Debug, Default, Deserialize, ToSchema)]
pub struct LoginPayload {
    #[serde(default)]
    pub email: Option<String>,
    #[serde(default)]
    pub password: Option<String>,
}

/// Validated login credentials with the email normalized.
#[derive(Debug, Clone)]
pub struct Credentials {
    pub email: String,
    pub password: String,
}

impl LoginPayload {
    pub fn validate(self) -> Result<Credentials> {
        let mut issues = Issues::default();
        let email = issues.email(self.email);
        let password = issues.password(self.password);
        issues.finish(|| Credentials {
            email: email.unwrap_or_default(),
            password: password.unwrap_or_default(),
        })
    }
}

#[derive(Debug, Default, Deserialize, ToSchema)]
pub struct ProfilePayload {
    #[serde(default)]
    pub name: Option<String>,
}

impl ProfilePayload {
    /// Returns the trimmed display name.
    pub fn validate(self) -> Result<String> {
        let mut issues = Issues::default();
        let name = issues.required_text("name", self.name, NAME_MAX_LEN);
        issues.finish(|| name.unwrap_or_default())
    }
}

// =============================================================================
// APPLICATIONS
// =============================================================================

/// Body of `POST /applications` and `PUT /applications/:id`.
#[derive(Debug, Default, Deserialize, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct ApplicationPayload {
    #[serde(default, deserialize_with = "double_option")]
    #[schema(value_type = Option<String>)]
    pub company: Option<Option<String>>,
    #[serde(default, deserialize_with = "double_option")]
    #[schema(value_type = Option<String>)]
    pub role: Option<Option<String>>,
    #[serde(default, deserialize_with = "double_option")]
    #[schema(value_type = Option<String>)]
    pub status: Option<Option<String>>,
    #[serde(default, deserialize_with = "double_option")]
    #[schema(value_type = Option<String>)]
    pub applied_date: Option<Option<String>>,
    #[serde(default, deserialize_with = "double_option")]
    #[schema(value_type = Option<String>)]
    pub location: Option<Option<String>>,
    #[serde(default, deserialize_with = "double_option")]
    #[schema(value_type = Option<String>)]
    pub deadline: Option<Option<String>>,
    #[serde(default, deserialize_with = "double_option")]
    #[schema(value_type = Option<String>)]
    pub notes: Option<Option<String>>,
    #[serde(default, deserialize_with = "double_option")]
    #[schema(value_type = Option<String>)]
    pub source: Option<Option<String>>,
    #[serde(default, deserialize_with = "double_option")]
    #[schema(value_type = Option<String>)]
    pub resume_url: Option<Option<String>>,
    #[serde(default, deserialize_with = "double_option")]
    #[schema(value_type = Option<String>)]
    pub cover_url: Option<Option<String>>,
}

impl ApplicationPayload {
    /// Validate a create request, applying defaults relative to `now`.
    pub fn into_new(self, now: DateTime<Utc>) -> Result<NewApplication> {
        let mut issues = Issues::default();

        let company = issues
            .non_null("company", self.company)
            .and_then(|c| issues.required_text("company", c, COMPANY_ROLE_MAX_LEN));
        let role = issues
            .non_null("role", self.role)
            .and_then(|r| issues.required_text("role", r, COMPANY_ROLE_MAX_LEN));
        let status = match issues.non_null("status", self.status) {
            Some(Some(s)) => issues.status(&s),
            Some(None) => Some(ApplicationStatus::default()),
            None => None,
        };
        let applied_date = match issues.non_null("appliedDate", self.applied_date) {
            Some(Some(s)) => issues.datetime("appliedDate", &s),
            Some(None) => Some(now),
            None => None,
        };
        let location = match issues.non_null("location", self.location) {
            Some(Some(s)) => issues.location(&s),
            Some(None) => Some(Location::default()),
            None => None,
        };
        let deadline = match self.deadline.flatten() {
            Some(s) => issues.datetime("deadline", &s).map(Some),
            None => Some(None),
        };
        let notes = issues.nullable_text("notes", self.notes, APPLICATION_NOTES_MAX_LEN);
        let source = issues.nullable_text("source", self.source, SOURCE_MAX_LEN);
        let resume_url = issues.nullable_url("resumeUrl", self.resume_url);
        let cover_url = issues.nullable_url("coverUrl", self.cover_url);

        issues.finish(|| NewApplication {
            company: company.unwrap_or_default(),
            role: role.unwrap_or_default(),
            status: status.unwrap_or_default(),
            applied_date: applied_date.unwrap_or(now),
            location: location.unwrap_or_default(),
            deadline: deadline.flatten(),
            notes: notes.flatten(),
            source: source.flatten(),
            resume_url: resume_url.flatten(),
            cover_url: cover_url.flatten(),
        })
    }

    /// Validate a partial update. Absent fields stay `None`.
    pub fn into_patch(self) -> Result<ApplicationPatch> {
        let mut issues = Issues::default();

        let company = issues
            .non_null("company", self.company)
            .flatten()
            .and_then(|c| issues.required_text("company", Some(c), COMPANY_ROLE_MAX_LEN));
        let role = issues
            .non_null("role", self.role)
            .flatten()
            .and_then(|r| issues.required_text("role", Some(r), COMPANY_ROLE_MAX_LEN));
        let status = issues
            .non_null("status", self.status)
            .flatten()
            .and_then(|s| issues.status(&s));
        let applied_date = issues
            .non_null("appliedDate", self.applied_date)
            .flatten()
            .and_then(|s| issues.datetime("appliedDate", &s));
        let location = issues
            .non_null("location", self.location)
            .flatten()
            .and_then(|s| issues.location(&s));
        let deadline = match self.deadline {
            Some(Some(s)) => issues.datetime("deadline", &s).map(Some),
            Some(None) => Some(None),
            None => None,
        };
        let notes = issues.nullable_text("notes", self.notes, APPLICATION_NOTES_MAX_LEN);
        let source = issues.nullable_text("source", self.source, SOURCE_MAX_LEN);
        let resume_url = issues.nullable_url("resumeUrl", self.resume_url);
        let cover_url = issues.nullable_url("coverUrl", self.cover_url);

        issues.finish(|| ApplicationPatch {
            company,
            role,
            status,
            applied_date,
            location,
            deadline,
            notes,
            source,
            resume_url,
            cover_url,
        })
    }
}

/// Parse the `status` query parameter. Empty means no filter.
pub fn parse_status_filter(value: Option<&str>) -> Result<Option<ApplicationStatus>> {
    match value.map(str::trim) {
        None | Some("") => Ok(None),
        Some(s) => s
            .parse()
            .map(Some)
            .map_err(|_| Error::invalid("status", "Invalid enum value")),
    }
}

/// Normalize the `search` query parameter. Blank means no filter.
pub fn normalize_search(value: Option<&str>) -> Option<String> {
    value
        .map(str::trim)
        .filter(|s| !s.is_empty())
        .map(str::to_string)
}

// =============================================================================
// NOTES
// =============================================================================

#[derive(Debug, Default, Deserialize, ToSchema)]
pub struct NotePayload {
    #[serde(default)]
    pub content: Option<String>,
}

impl NotePayload {
    /// Returns the trimmed note content.
    pub fn validate(self) -> Result<String> {
        let mut issues = Issues::default();
        let content = issues.required_text("content", self.content, NOTE_MAX_LEN);
        issues.finish(|| content.unwrap_or_default())
    }
}

// =============================================================================
// FOLLOWUP
// =============================================================================

#[derive(Debug, Default, Deserialize, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct FollowupPayload {
    #[serde(default)]
    pub application_id: Option<String>,
}

impl FollowupPayload {
    pub fn validate(self) -> Result<Uuid> {
        match self.application_id {
            None => Err(Error::invalid("applicationId", "Required")),
            Some(raw) => Uuid::parse_str(raw.trim())
                .map_err(|_| Error::invalid("applicationId", "Invalid uuid")),
        }
    }
}
