//! Carts Repository

use jiff_sqlx::Timestamp as SqlxTimestamp;
use sqlx::{FromRow, Postgres, Row, Transaction, postgres::PgRow, query, query_as};
use uuid::Uuid;

use crate::{
    auth::{SessionId, UserId},
    domain::carts::models::{Cart, CartId, CartOwner},
};

const FIND_CART_BY_USER_SQL: &str = include_str!("../sql/find_cart_by_user.sql");
const FIND_CART_BY_SESSION_SQL: &str = include_str!("../sql/find_cart_by_session.sql");
const LOCK_CART_BY_USER_SQL: &str = include_str!("../sql/lock_cart_by_user.sql");
const CREATE_CART_SQL: &str = include_str!("../sql/create_cart.sql");
const TOUCH_CART_SQL: &str = include_str!("../sql/touch_cart.sql");

#[derive(Debug, Clone, Default)]
pub(crate) struct PgCartsRepository;

impl PgCartsRepository {
    #[must_use]
    pub(crate) fn new() -> Self {
        Self
    }

    pub(crate) async fn find_cart(
        &self,
        tx: &mut Transaction<'_, Postgres>,
        owner: CartOwner,
    ) -> Result<Option<Cart>, sqlx::Error> {
        let statement = match owner {
            CartOwner::User(user) => {
                query_as::<Postgres, Cart>(FIND_CART_BY_USER_SQL).bind(user.into_i64())
            }
            CartOwner::Session(session) => {
                query_as::<Postgres, Cart>(FIND_CART_BY_SESSION_SQL).bind(session.into_uuid())
            }
        };

        statement.fetch_optional(&mut **tx).await
    }

    /// Find a user's cart and hold a row lock on it until the transaction ends.
    pub(crate) async fn lock_user_cart(
        &self,
        tx: &mut Transaction<'_, Postgres>,
        user: UserId,
    ) -> Result<Option<Cart>, sqlx::Error> {
        query_as::<Postgres, Cart>(LOCK_CART_BY_USER_SQL)
            .bind(user.into_i64())
            .fetch_optional(&mut **tx)
            .await
    }

    /// Get-or-create; concurrent creators converge on the same row.
    pub(crate) async fn resolve_or_create_cart(
        &self,
        tx: &mut Transaction<'_, Postgres>,
        owner: CartOwner,
    ) -> Result<Cart, sqlx::Error> {
        let (user, session): (Option<i64>, Option<Uuid>) = match owner {
            CartOwner::User(user) => (Some(user.into_i64()), None),
            CartOwner::Session(session) => (None, Some(session.into_uuid())),
        };

        query(CREATE_CART_SQL)
            .bind(user)
            .bind(session)
            .execute(&mut **tx)
            .await?;

        self.find_cart(tx, owner)
            .await?
            .ok_or(sqlx::Error::RowNotFound)
    }

    pub(crate) async fn touch_cart(
        &self,
        tx: &mut Transaction<'_, Postgres>,
        cart: CartId,
    ) -> Result<(), sqlx::Error> {
        query(TOUCH_CART_SQL)
            .bind(cart.into_i64())
            .execute(&mut **tx)
            .await?;

        Ok(())
    }
}

impl<'r> FromRow<'r, PgRow> for Cart {
    fn from_row(row: &'r PgRow) -> sqlx::Result<Self> {
        let user: Option<i64> = row.try_get("user_id")?;
        let session: Option<Uuid> = row.try_get("session_key")?;

        let owner = match (user, session) {
            (Some(user), None) => CartOwner::User(UserId::from_i64(user)),
            (None, Some(session)) => CartOwner::Session(SessionId::from_uuid(session)),
            _ => {
                return Err(sqlx::Error::ColumnDecode {
                    index: "user_id".to_string(),
                    source: "cart must have exactly one owner".into(),
                });
            }
        };

        Ok(Self {
            id: CartId::from_i64(row.try_get("id")?),
            owner,
            created_at: row.try_get::<SqlxTimestamp, _>("created_at")?.to_jiff(),
            updated_at: row.try_get::<SqlxTimestamp, _>("updated_at")?.to_jiff(),
        })
    }
}
