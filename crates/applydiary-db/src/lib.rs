//! # applydiary-db
//!
//! Resource store for ApplyDiary.
//!
//! This crate provides:
//! - Connection pool management
//! - PostgreSQL repositories for users, applications, notes and documents
//! - An in-memory store with identical semantics
//! - Filesystem blob storage for uploaded documents
//!
//! Every repository query on an owned entity is scoped to the requesting
//! user and filters tombstoned rows unless asked otherwise.
//!
//! ## Example
//!
//! ```rust,ignore
//! use applydiary_db::{Database, OwnerScope};
//!
//! #[tokio::main]
//! async fn main() -> Result<(), Box<dyn std::error::Error>> {
//!     let db = Database::connect("postgres://localhost/applydiary").await?;
//!     let repos = db.repositories();
//!     let apps = repos
//!         .applications
//!         .list(OwnerScope::live(user_id), &Default::default())
//!         .await?;
//!     println!("{} applications", apps.len());
//!     Ok(())
//! }
//! ```

pub mod applications;
pub mod documents;
pub mod file_storage;
pub mod memory;
pub mod notes;
pub mod pool;
pub mod users;

use std::sync::Arc;

// Re-export core types
pub use applydiary_core::*;

pub use applications::PgApplicationRepository;
pub use documents::PgDocumentRepository;
pub use file_storage::FilesystemBackend;
pub use memory::MemoryStore;
pub use notes::PgNoteRepository;
pub use pool::{create_pool, create_pool_with_config, PoolConfig};
pub use users::PgUserRepository;

/// Escape LIKE/ILIKE wildcard characters (`%`, `_`, `\`) in user input.
pub fn escape_like(input: &str) -> String {
    input
        .replace('\\', "\\\\")
        .replace('%', "\\%")
        .replace('_', "\\_")
}

/// Trait-object handles to one backing store.
#[derive(Clone)]
pub struct Repositories {
    pub users: Arc<dyn UserRepository>,
    pub applications: Arc<dyn ApplicationRepository>,
    pub notes: Arc<dyn NoteRepository>,
    pub documents: Arc<dyn DocumentRepository>,
}

/// Combined database context with all repositories.
#[derive(Clone)]
pub struct Database {
    /// The underlying connection pool.
    pub pool: sqlx::Pool<sqlx::Postgres>,
    pub users: PgUserRepository,
    pub applications: PgApplicationRepository,
    pub notes: PgNoteRepository,
    pub documents: PgDocumentRepository,
}

impl Database {
    /// Create a new Database instance from a connection pool.
    pub fn new(pool: sqlx::Pool<sqlx::Postgres>) -> Self {
        Self {
            users: PgUserRepository::new(pool.clone()),
            applications: PgApplicationRepository::new(pool.clone()),
            notes: PgNoteRepository::new(pool.clone()),
            documents: PgDocumentRepository::new(pool.clone()),
            pool,
        }
    }

    /// Create a new Database instance by connecting to the given URL.
    pub async fn connect(url: &str) -> Result<Self> {
        let pool = create_pool(url).await?;
        Ok(Self::new(pool))
    }

    /// Create with custom pool configuration.
    pub async fn connect_with_config(url: &str, config: PoolConfig) -> Result<Self> {
        let pool = create_pool_with_config(url, config).await?;
        Ok(Self::new(pool))
    }

    /// Run pending migrations.
    #[cfg(feature = "migrations")]
    pub async fn migrate(&self) -> Result<()> {
        sqlx::migrate!("../../migrations")
            .run(&self.pool)
            .await
            .map_err(|e| Error::Database(sqlx::Error::Migrate(Box::new(e))))?;
        Ok(())
    }

    /// Get the underlying connection pool.
    pub fn pool(&self) -> &sqlx::Pool<sqlx::Postgres> {
        &self.pool
    }

    /// Trait-object handles backed by this database.
    pub fn repositories(&self) -> Repositories {
        Repositories {
            users: Arc::new(self.users.clone()),
            applications: Arc::new(self.applications.clone()),
            notes: Arc::new(self.notes.clone()),
            documents: Arc::new(self.documents.clone()),
        }
    }

    /// Close all pooled connections.
    pub async fn close(&self) {
        self.pool.close().await;
    }
}
