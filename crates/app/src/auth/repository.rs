//! Auth repository.

use jiff::SignedDuration;
use jiff_sqlx::Timestamp as SqlxTimestamp;
use sqlx::{FromRow, PgPool, Postgres, Row, postgres::PgRow, query, query_as, query_scalar};
use uuid::Uuid;

use crate::auth::{
    ProfileUpdate, Session, SessionId, User, UserId, models::StoredCredentials,
};

const GET_USER_SQL: &str = include_str!("sql/get_user.sql");
const FIND_CREDENTIALS_BY_MOBILE_NUMBER_SQL: &str =
    include_str!("sql/find_credentials_by_mobile_number.sql");
const CREATE_USER_SQL: &str = include_str!("sql/create_user.sql");
const UPDATE_USER_PROFILE_SQL: &str = include_str!("sql/update_user_profile.sql");
const CREATE_SESSION_SQL: &str = include_str!("sql/create_session.sql");
const FIND_LIVE_SESSION_SQL: &str = include_str!("sql/find_live_session.sql");
const DELETE_SESSION_SQL: &str = include_str!("sql/delete_session.sql");
const BLACKLIST_REFRESH_TOKEN_SQL: &str = include_str!("sql/blacklist_refresh_token.sql");
const IS_REFRESH_TOKEN_BLACKLISTED_SQL: &str = include_str!("sql/is_refresh_token_blacklisted.sql");
const PURGE_EXPIRED_SESSIONS_SQL: &str = include_str!("sql/purge_expired_sessions.sql");
const PURGE_EXPIRED_BLACKLIST_SQL: &str = include_str!("sql/purge_expired_blacklist.sql");

/// Insert payload for a user row.
#[derive(Debug, Clone)]
pub(crate) struct NewUserRecord {
    pub mobile_number: String,
    pub alternate_mobile_number: Option<String>,
    pub password_hash: String,
    pub first_name: String,
    pub last_name: String,
    pub email: Option<String>,
    pub is_staff: bool,
}

#[derive(Debug, Clone)]
pub(crate) struct PgAuthRepository {
    pool: PgPool,
}

impl PgAuthRepository {
    #[must_use]
    pub(crate) fn new(pool: PgPool) -> Self {
        Self { pool }
    }

    pub(crate) async fn get_user(&self, user: UserId) -> Result<Option<User>, sqlx::Error> {
        query_as::<Postgres, User>(GET_USER_SQL)
            .bind(user.into_i64())
            .fetch_optional(&self.pool)
            .await
    }

    pub(crate) async fn find_credentials_by_mobile_number(
        &self,
        mobile_number: &str,
    ) -> Result<Option<StoredCredentials>, sqlx::Error> {
        query_as::<Postgres, StoredCredentials>(FIND_CREDENTIALS_BY_MOBILE_NUMBER_SQL)
            .bind(mobile_number)
            .fetch_optional(&self.pool)
            .await
    }

    pub(crate) async fn create_user(&self, user: NewUserRecord) -> Result<User, sqlx::Error> {
        query_as::<Postgres, User>(CREATE_USER_SQL)
            .bind(user.mobile_number)
            .bind(user.alternate_mobile_number)
            .bind(user.password_hash)
            .bind(user.first_name)
            .bind(user.last_name)
            .bind(user.email)
            .bind(user.is_staff)
            .fetch_one(&self.pool)
            .await
    }

    pub(crate) async fn update_user_profile(
        &self,
        user: UserId,
        update: ProfileUpdate,
    ) -> Result<User, sqlx::Error> {
        query_as::<Postgres, User>(UPDATE_USER_PROFILE_SQL)
            .bind(user.into_i64())
            .bind(update.first_name)
            .bind(update.last_name)
            .bind(update.email)
            .bind(update.alternate_mobile_number)
            .fetch_one(&self.pool)
            .await
    }

    pub(crate) async fn create_session(&self, ttl: SignedDuration) -> Result<Session, sqlx::Error> {
        query_as::<Postgres, Session>(CREATE_SESSION_SQL)
            .bind(SessionId::generate().into_uuid())
            .bind(ttl.as_secs_f64())
            .fetch_one(&self.pool)
            .await
    }

    pub(crate) async fn find_live_session(
        &self,
        session: SessionId,
    ) -> Result<Option<Session>, sqlx::Error> {
        query_as::<Postgres, Session>(FIND_LIVE_SESSION_SQL)
            .bind(session.into_uuid())
            .fetch_optional(&self.pool)
            .await
    }

    pub(crate) async fn delete_session(&self, session: SessionId) -> Result<u64, sqlx::Error> {
        let rows_affected = query(DELETE_SESSION_SQL)
            .bind(session.into_uuid())
            .execute(&self.pool)
            .await?
            .rows_affected();

        Ok(rows_affected)
    }

    /// Returns `false` when the token id was already blacklisted.
    pub(crate) async fn blacklist_refresh_token(
        &self,
        jti: Uuid,
        user: UserId,
        expires_at_second: i64,
    ) -> Result<bool, sqlx::Error> {
        let rows_affected = query(BLACKLIST_REFRESH_TOKEN_SQL)
            .bind(jti)
            .bind(user.into_i64())
            .bind(expires_at_second)
            .execute(&self.pool)
            .await?
            .rows_affected();

        Ok(rows_affected == 1)
    }

    pub(crate) async fn is_refresh_token_blacklisted(&self, jti: Uuid) -> Result<bool, sqlx::Error> {
        query_scalar::<Postgres, bool>(IS_REFRESH_TOKEN_BLACKLISTED_SQL)
            .bind(jti)
            .fetch_one(&self.pool)
            .await
    }

    /// Delete expired sessions and blacklist entries, returning both counts.
    pub(crate) async fn purge_expired(&self) -> Result<(u64, u64), sqlx::Error> {
        let mut tx = self.pool.begin().await?;

        let sessions = query(PURGE_EXPIRED_SESSIONS_SQL)
            .execute(&mut *tx)
            .await?
            .rows_affected();

        let blacklist = query(PURGE_EXPIRED_BLACKLIST_SQL)
            .execute(&mut *tx)
            .await?
            .rows_affected();

        tx.commit().await?;

        Ok((sessions, blacklist))
    }
}

impl<'r> FromRow<'r, PgRow> for User {
    fn from_row(row: &'r PgRow) -> sqlx::Result<Self> {
        Ok(Self {
            id: UserId::from_i64(row.try_get("id")?),
            mobile_number: row.try_get("mobile_number")?,
            alternate_mobile_number: row.try_get("alternate_mobile_number")?,
            first_name: row.try_get("first_name")?,
            last_name: row.try_get("last_name")?,
            email: row.try_get("email")?,
            is_staff: row.try_get("is_staff")?,
            is_active: row.try_get("is_active")?,
            created_at: row.try_get::<SqlxTimestamp, _>("created_at")?.to_jiff(),
            updated_at: row.try_get::<SqlxTimestamp, _>("updated_at")?.to_jiff(),
        })
    }
}

impl<'r> FromRow<'r, PgRow> for StoredCredentials {
    fn from_row(row: &'r PgRow) -> sqlx::Result<Self> {
        Ok(Self {
            user: User::from_row(row)?,
            password_hash: row.try_get("password_hash")?,
        })
    }
}

impl<'r> FromRow<'r, PgRow> for Session {
    fn from_row(row: &'r PgRow) -> sqlx::Result<Self> {
        Ok(Self {
            id: SessionId::from_uuid(row.try_get("session_key")?),
            created_at: row.try_get::<SqlxTimestamp, _>("created_at")?.to_jiff(),
            expires_at: row.try_get::<SqlxTimestamp, _>("expires_at")?.to_jiff(),
        })
    }
}
