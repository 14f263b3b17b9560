//! User repository implementation.

use async_trait::async_trait;
use sqlx::postgres::PgRow;
use sqlx::{Pool, Postgres, Row};
use tracing::debug;
use uuid::Uuid;

use applydiary_core::{Error, NewUser, Result, User, UserRepository};

const USER_COLUMNS: &str = "id, email, password_hash, name, timezone, created_at";

/// PostgreSQL implementation of UserRepository.
#[derive(Clone)]
pub struct PgUserRepository {
    pool: Pool<Postgres>,
}

impl PgUserRepository {
    pub fn new(pool: Pool<Postgres>) -> Self {
        Self { pool }
    }

    fn row_to_user(row: &PgRow) -> Result<User> {
        Ok(User {
            id: row.try_get("id").map_err(Error::Database)?,
            email: row.try_get("email").map_err(Error::Database)?,
            password_hash: row.try_get("password_hash").map_err(Error::Database)?,
            name: row.try_get("name").map_err(Error::Database)?,
            timezone: row.try_get("timezone").map_err(Error::Database)?,
            created_at: row.try_get("created_at").map_err(Error::Database)?,
        })
    }
}

/// Translate a unique violation on the email index into `DuplicateEmail`.
fn map_insert_error(e: sqlx::Error) -> Error {
    match e.as_database_error() {
        Some(db) if db.is_unique_violation() => Error::DuplicateEmail,
        _ => Error::Database(e),
    }
}

#[async_trait]
impl UserRepository for PgUserRepository {
    async fn insert(&self, user: NewUser) -> Result<User> {
        let query = format!(
            "INSERT INTO app_user (id, email, password_hash, name, timezone, created_at)
             VALUES ($1, lower($2), $3, $4, $5, now())
             RETURNING {}",
            USER_COLUMNS
        );
        let row = sqlx::query(&query)
            .bind(Uuid::now_v7())
            .bind(&user.email)
            .bind(&user.password_hash)
            .bind(&user.name)
            .bind(&user.timezone)
            .fetch_one(&self.pool)
            .await
            .map_err(map_insert_error)?;

        let user = Self::row_to_user(&row)?;
        debug!(subsystem = "db", component = "users", op = "insert", user_id = %user.id, "User created");
        Ok(user)
    }

    async fn find_by_email(&self, email: &str) -> Result<Option<User>> {
        let query = format!(
            "SELECT {} FROM app_user WHERE lower(email) = lower($1)",
            USER_COLUMNS
        );
        let row = sqlx::query(&query)
            .bind(email)
            .fetch_optional(&self.pool)
            .await
            .map_err(Error::Database)?;
        row.as_ref().map(Self::row_to_user).transpose()
    }

    async fn fetch(&self, id: Uuid) -> Result<Option<User>> {
        let query = format!("SELECT {} FROM app_user WHERE id = $1", USER_COLUMNS);
        let row = sqlx::query(&query)
            .bind(id)
            .fetch_optional(&self.pool)
            .await
            .map_err(Error::Database)?;
        row.as_ref().map(Self::row_to_user).transpose()
    }

    async fn update_name(&self, id: Uuid, name: &str) -> Result<Option<User>> {
        let query = format!(
            "UPDATE app_user SET name = $2 WHERE id = $1 RETURNING {}",
            USER_COLUMNS
        );
        let row = sqlx::query(&query)
            .bind(id)
            .bind(name)
            .fetch_optional(&self.pool)
            .await
            .map_err(Error::Database)?;
        row.as_ref().map(Self::row_to_user).transpose()
    }
}
