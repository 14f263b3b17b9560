//! Service layer for business logic.
//!
//! Services take the authenticated user id as an explicit argument and
//! never trust an owner id from the request body.

pub mod applications;
pub mod auth;
pub mod documents;
pub mod followup;
pub mod notes;

pub use applications::{ApplicationService, ListApplicationsQuery};
pub use auth::{AuthService, AuthSession};
pub use documents::{DocumentService, UploadedFile};
pub use followup::FollowupService;
pub use notes::NoteService;
