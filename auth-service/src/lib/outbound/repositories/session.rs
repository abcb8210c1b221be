use async_trait::async_trait;
use chrono::DateTime;
use chrono::Utc;
use sqlx::FromRow;
use sqlx::PgPool;

use crate::domain::errors::StoreError;
use crate::domain::session::models::NewSession;
use crate::domain::session::models::RefreshToken;
use crate::domain::session::models::Session;
use crate::domain::session::models::SessionId;
use crate::domain::session::ports::SessionRepository;
use crate::domain::user::models::UserId;

pub struct PostgresSessionRepository {
    pool: PgPool,
}

impl PostgresSessionRepository {
    pub fn new(pool: PgPool) -> Self {
        Self { pool }
    }
}

#[derive(FromRow)]
struct SessionRow {
    id: i64,
    user_id: i64,
    refresh_token: String,
    expires_at: DateTime<Utc>,
    created_at: DateTime<Utc>,
}

impl From<SessionRow> for Session {
    fn from(row: SessionRow) -> Self {
        Session {
            id: SessionId(row.id),
            user_id: UserId(row.user_id),
            refresh_token: RefreshToken::new(row.refresh_token),
            expires_at: row.expires_at,
            created_at: row.created_at,
        }
    }
}

#[async_trait]
impl SessionRepository for PostgresSessionRepository {
    async fn create(&self, session: NewSession) -> Result<Session, StoreError> {
        let id: i64 = sqlx::query_scalar(
            r#"
            INSERT INTO sessions (user_id, refresh_token, expires_at, created_at)
            VALUES ($1, $2, $3, $4)
            RETURNING id
            "#,
        )
        .bind(session.user_id.as_i64())
        .bind(session.refresh_token.as_str())
        .bind(session.expires_at)
        .bind(session.created_at)
        .fetch_one(&self.pool)
        .await?;

        Ok(session.with_id(SessionId(id)))
    }

    async fn find_by_refresh_token(
        &self,
        token: &RefreshToken,
    ) -> Result<Option<Session>, StoreError> {
        let row = sqlx::query_as::<_, SessionRow>(
            r#"
            SELECT id, user_id, refresh_token, expires_at, created_at
            FROM sessions
            WHERE refresh_token = $1
            "#,
        )
        .bind(token.as_str())
        .fetch_optional(&self.pool)
        .await?;

        Ok(row.map(Session::from))
    }

    async fn replace(
        &self,
        id: SessionId,
        current: &RefreshToken,
        replacement: &RefreshToken,
        expires_at: DateTime<Utc>,
    ) -> Result<bool, StoreError> {
        // The refresh_token predicate makes this a compare-and-swap: a
        // concurrent rotation of the same row leaves zero rows to update.
        let result = sqlx::query(
            r#"
            UPDATE sessions
            SET refresh_token = $1, expires_at = $2
            WHERE id = $3 AND refresh_token = $4
            "#,
        )
        .bind(replacement.as_str())
        .bind(expires_at)
        .bind(id.as_i64())
        .bind(current.as_str())
        .execute(&self.pool)
        .await?;

        Ok(result.rows_affected() == 1)
    }

    async fn delete(&self, id: SessionId) -> Result<bool, StoreError> {
        let result = sqlx::query("DELETE FROM sessions WHERE id = $1")
            .bind(id.as_i64())
            .execute(&self.pool)
            .await?;

        Ok(result.rows_affected() > 0)
    }

    async fn delete_expired(&self, now: DateTime<Utc>) -> Result<u64, StoreError> {
        let result = sqlx::query("DELETE FROM sessions WHERE expires_at < $1")
            .bind(now)
            .execute(&self.pool)
            .await?;

        Ok(result.rows_affected())
    }
}
