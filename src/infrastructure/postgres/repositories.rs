use async_trait::async_trait;
use chrono::{DateTime, Utc};
use sqlx::{FromRow, PgPool};
use tracing::debug;

use crate::{
    domain::user::{User, UserRepository},
    shared::errors::DomainError,
};

const PK_PREFIX: &str = "USER#";
const PROFILE_SK: &str = "PROFILE";

/// User records in a single key-value style table.
///
/// Expected layout (created by deployment tooling):
///
/// ```sql
/// CREATE TABLE users (
///     pk         TEXT        NOT NULL,
///     sk         TEXT        NOT NULL,
///     id         TEXT        NOT NULL,
///     email      TEXT        NOT NULL,
///     name       TEXT        NOT NULL,
///     created_at TIMESTAMPTZ NOT NULL,
///     created_by TEXT        NOT NULL,
///     PRIMARY KEY (pk, sk)
/// );
/// ```
pub struct PgUserRepository {
    pool: PgPool,
    insert_sql: String,
    select_sql: String,
}

impl PgUserRepository {
    /// `table` must already be a validated identifier; it is spliced into the SQL.
    pub fn new(pool: PgPool, table: &str) -> Self {
        Self {
            pool,
            insert_sql: format!(
                r#"
                INSERT INTO {table} (pk, sk, id, email, name, created_at, created_by)
                VALUES ($1, $2, $3, $4, $5, $6, $7)
                ON CONFLICT (pk, sk) DO NOTHING
                "#
            ),
            select_sql: format!(
                r#"
                SELECT id, email, name, created_at, created_by
                FROM {table}
                WHERE pk = $1 AND sk = $2
                "#
            ),
        }
    }
}

pub fn partition_key(id: &str) -> String {
    format!("{PK_PREFIX}{id}")
}

#[async_trait]
impl UserRepository for PgUserRepository {
    async fn put(&self, user: &User) -> Result<(), DomainError> {
        let result = sqlx::query(&self.insert_sql)
            .bind(partition_key(&user.id))
            .bind(PROFILE_SK)
            .bind(&user.id)
            .bind(&user.email)
            .bind(&user.name)
            .bind(user.created_at)
            .bind(&user.created_by)
            .execute(&self.pool)
            .await
            .map_err(|e| DomainError::Persistence(e.to_string()))?;

        // The conflict clause turns an existing key into zero affected rows.
        if result.rows_affected() == 0 {
            debug!(user_id = %user.id, "conditional put rejected: key exists");
            return Err(DomainError::UserAlreadyExists);
        }

        Ok(())
    }

    async fn get_by_id(&self, id: &str) -> Result<Option<User>, DomainError> {
        let row = sqlx::query_as::<_, UserRow>(&self.select_sql)
            .bind(partition_key(id))
            .bind(PROFILE_SK)
            .fetch_optional(&self.pool)
            .await
            .map_err(|e| DomainError::Persistence(e.to_string()))?;

        Ok(row.map(User::from))
    }
}

#[derive(FromRow)]
struct UserRow {
    id: String,
    email: String,
    name: String,
    created_at: DateTime<Utc>,
    created_by: String,
}

impl From<UserRow> for User {
    fn from(row: UserRow) -> Self {
        Self {
            id: row.id,
            email: row.email,
            name: row.name,
            created_at: row.created_at,
            created_by: row.created_by,
        }
    }
}
