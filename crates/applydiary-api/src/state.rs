//! Shared application state.

use std::sync::Arc;

use applydiary_core::{BlobStorage, GenerationBackend, Result};
use applydiary_crypto::TokenCodec;
use applydiary_db::Repositories;

use crate::config::ServerConfig;
use crate::services::{
    ApplicationService, AuthService, DocumentService, FollowupService, NoteService,
};

/// Storage and generation backends the services run on.
#[derive(Clone)]
pub struct Backends {
    pub repos: Repositories,
    pub blobs: Arc<dyn BlobStorage>,
    /// `None` disables follow-up drafts.
    pub generator: Option<Arc<dyn GenerationBackend>>,
}

/// Application state shared across handlers.
#[derive(Clone)]
pub struct AppState {
    pub codec: Arc<TokenCodec>,
    pub auth: AuthService,
    pub applications: ApplicationService,
    pub notes: NoteService,
    pub documents: DocumentService,
    pub followup: FollowupService,
    /// CORS allow-list.
    pub client_origins: Arc<[String]>,
}

impl AppState {
    pub fn new(config: &ServerConfig, backends: Backends) -> Result<Self> {
        let codec = Arc::new(TokenCodec::new(config.token.clone())?);
        let Backends {
            repos,
            blobs,
            generator,
        } = backends;

        Ok(Self {
            auth: AuthService::new(repos.users.clone(), codec.clone(), config.hash_params.clone()),
            applications: ApplicationService::new(repos.applications.clone()),
            notes: NoteService::new(repos.notes.clone()),
            documents: DocumentService::new(repos.documents, blobs, config.max_upload_bytes),
            followup: FollowupService::new(repos.users, repos.applications, repos.notes, generator),
            codec,
            client_origins: config.client_origins.clone().into(),
        })
    }
}
