//! Structured logging field name constants for ApplyDiary.
//!
//! All crates use these constants so log aggregation can query by the same
//! field names across every subsystem.
//!
//! ## Log Level Contract
//!
//! | Level | Usage |
//! |-------|-------|
//! | ERROR | Degraded service, requires operator attention |
//! | WARN  | Recoverable issue, automatic fallback applied |
//! | INFO  | Lifecycle events (startup, shutdown), operation completions |
//! | DEBUG | Decision points, rejected authentication, config choices |
//! | TRACE | Per-item iteration |

// ─── Identity fields ───────────────────────────────────────────────────────

/// Correlation ID propagated across a request. Format: UUIDv7.
pub const REQUEST_ID: &str = "request_id";

/// Subsystem originating the log event.
/// Values: "api", "db", "inference", "crypto"
pub const SUBSYSTEM: &str = "subsystem";

/// Component within a subsystem.
/// Examples: "auth", "applications", "notes", "documents", "followup", "openai"
pub const COMPONENT: &str = "component";

/// Logical operation name.
/// Examples: "register", "list", "soft_delete", "generate"
pub const OPERATION: &str = "op";

// ─── Entity fields ─────────────────────────────────────────────────────────

/// Requesting (owning) user UUID.
pub const USER_ID: &str = "user_id";

/// Application UUID being operated on.
pub const APPLICATION_ID: &str = "application_id";

/// Note UUID being operated on.
pub const NOTE_ID: &str = "note_id";

/// Document UUID being operated on.
pub const DOCUMENT_ID: &str = "document_id";

// ─── Measurement fields ────────────────────────────────────────────────────

/// Wall-clock duration in milliseconds.
pub const DURATION_MS: &str = "duration_ms";

/// Number of rows returned by a listing.
pub const RESULT_COUNT: &str = "result_count";

/// Byte length of an upload.
pub const FILE_SIZE: &str = "file_size";

/// Byte length of a prompt.
pub const PROMPT_LEN: &str = "prompt_len";

/// Byte length of a model response.
pub const RESPONSE_LEN: &str = "response_len";

// ─── Database fields ───────────────────────────────────────────────────────

/// Maximum connections in the pool.
pub const POOL_SIZE: &str = "pool_size";

/// Database table affected.
pub const DB_TABLE: &str = "db_table";

// ─── Inference fields ──────────────────────────────────────────────────────

/// Model name used for generation.
pub const MODEL: &str = "model";

// ─── Outcome fields ────────────────────────────────────────────────────────

/// Boolean success/failure indicator.
pub const SUCCESS: &str = "success";

/// Error message when an operation fails.
pub const ERROR_MSG: &str = "error";

/// Internal reason an authentication attempt was rejected.
pub const AUTH_FAILURE: &str = "auth_failure";

#[cfg(test)]
mod tests {
    use super::*;
    use std::collections::HashSet;

    const ALL: &[&str] = &[
        REQUEST_ID,
        SUBSYSTEM,
        COMPONENT,
        OPERATION,
        USER_ID,
        APPLICATION_ID,
        NOTE_ID,
        DOCUMENT_ID,
        DURATION_MS,
        RESULT_COUNT,
        FILE_SIZE,
        PROMPT_LEN,
        RESPONSE_LEN,
        POOL_SIZE,
        DB_TABLE,
        MODEL,
        SUCCESS,
        ERROR_MSG,
        AUTH_FAILURE,
    ];

    #[test]
    fn test_field_names_are_unique_snake_case() {
        let unique: HashSet<&str> = ALL.iter().copied().collect();
        assert_eq!(unique.len(), ALL.len());
        for name in ALL {
            assert!(
                name.chars().all(|c| c.is_ascii_lowercase() || c == '_'),
                "{}",
                name
            );
        }
    }
}
