//! Centralized default constants for ApplyDiary.
//!
//! All crates reference these constants instead of defining their own magic
//! numbers. Organized by domain area.

// =============================================================================
// AUTH
// =============================================================================

/// Token validity window in seconds (7 days).
pub const TOKEN_TTL_SECS: i64 = 7 * 24 * 60 * 60;

/// Development-only signing secret, rejected in production.
pub const DEV_TOKEN_SECRET: &str = "replace-me-in-production";

/// Minimum password length in characters.
pub const PASSWORD_MIN_LEN: usize = 8;

/// Timezone assigned when registration omits one.
pub const DEFAULT_TIMEZONE: &str = "UTC";

// =============================================================================
// FIELD LIMITS
// =============================================================================

/// Maximum length of a user's display name.
pub const NAME_MAX_LEN: usize = 120;

/// Maximum length of a timezone identifier.
pub const TIMEZONE_MAX_LEN: usize = 100;

/// Maximum length of `company` and `role`.
pub const COMPANY_ROLE_MAX_LEN: usize = 120;

/// Maximum length of the legacy `notes` text on an application.
pub const APPLICATION_NOTES_MAX_LEN: usize = 5000;

/// Maximum length of `source`.
pub const SOURCE_MAX_LEN: usize = 120;

/// Maximum length of `resumeUrl` and `coverUrl`.
pub const URL_MAX_LEN: usize = 500;

/// Maximum length of a note's content.
pub const NOTE_MAX_LEN: usize = 5000;

// =============================================================================
// DOCUMENTS
// =============================================================================

/// Maximum accepted upload size (10 MiB).
pub const MAX_UPLOAD_BYTES: usize = 10 * 1024 * 1024;

/// Default directory for stored document blobs.
pub const UPLOAD_DIR: &str = "uploads";

/// Public path prefix of document locators.
pub const UPLOAD_URL_PREFIX: &str = "/uploads";

/// Content type used when neither magic bytes nor the client tell us.
pub const FALLBACK_CONTENT_TYPE: &str = "application/octet-stream";

// =============================================================================
// FOLLOWUP DRAFTS
// =============================================================================

/// Number of most recent notes included in a followup prompt.
pub const FOLLOWUP_NOTE_COUNT: usize = 5;

/// Name used in the prompt when the user's profile has none.
pub const FOLLOWUP_FALLBACK_NAME: &str = "Applicant";

/// Default OpenAI-compatible generation model.
pub const GEN_MODEL: &str = "gpt-4o-mini";

/// Default OpenAI-compatible API base URL.
pub const OPENAI_BASE_URL: &str = "https://api.openai.com/v1";

/// Generation request timeout in seconds.
pub const GEN_TIMEOUT_SECS: u64 = 60;

// =============================================================================
// SERVER
// =============================================================================

/// Default HTTP server port.
pub const SERVER_PORT: u16 = 4000;

/// Default bind address.
pub const SERVER_HOST: &str = "0.0.0.0";

/// Default CORS origin (the web client dev server).
pub const CLIENT_ORIGIN: &str = "http://localhost:5173";

/// Service name reported by the health endpoint.
pub const SERVICE_NAME: &str = "applydiary-api";
