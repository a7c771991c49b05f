//! Addresses Repository

use jiff_sqlx::Timestamp as SqlxTimestamp;
use sqlx::{FromRow, Postgres, Row, Transaction, postgres::PgRow, query, query_as};

use crate::{
    auth::UserId,
    domain::addresses::models::{Address, AddressId, AddressUpdate, NewAddress},
};

const LIST_ADDRESSES_SQL: &str = include_str!("sql/list_addresses.sql");
const GET_ADDRESS_SQL: &str = include_str!("sql/get_address.sql");
const CREATE_ADDRESS_SQL: &str = include_str!("sql/create_address.sql");
const CLEAR_DEFAULT_ADDRESS_SQL: &str = include_str!("sql/clear_default_address.sql");
const UPDATE_ADDRESS_SQL: &str = include_str!("sql/update_address.sql");
const DELETE_ADDRESS_SQL: &str = include_str!("sql/delete_address.sql");

#[derive(Debug, Clone, Default)]
pub(crate) struct PgAddressesRepository;

impl PgAddressesRepository {
    #[must_use]
    pub(crate) fn new() -> Self {
        Self
    }

    pub(crate) async fn list_addresses(
        &self,
        tx: &mut Transaction<'_, Postgres>,
        owner: UserId,
    ) -> Result<Vec<Address>, sqlx::Error> {
        query_as::<Postgres, Address>(LIST_ADDRESSES_SQL)
            .bind(owner.into_i64())
            .fetch_all(&mut **tx)
            .await
    }

    /// Fetch an address only if `owner` owns it.
    pub(crate) async fn get_address(
        &self,
        tx: &mut Transaction<'_, Postgres>,
        address: AddressId,
        owner: UserId,
    ) -> Result<Option<Address>, sqlx::Error> {
        query_as::<Postgres, Address>(GET_ADDRESS_SQL)
            .bind(address.into_i64())
            .bind(owner.into_i64())
            .fetch_optional(&mut **tx)
            .await
    }

    pub(crate) async fn create_address(
        &self,
        tx: &mut Transaction<'_, Postgres>,
        owner: UserId,
        address: NewAddress,
    ) -> Result<Address, sqlx::Error> {
        query_as::<Postgres, Address>(CREATE_ADDRESS_SQL)
            .bind(owner.into_i64())
            .bind(address.name)
            .bind(address.address)
            .bind(address.city)
            .bind(address.state)
            .bind(address.pincode)
            .bind(address.country)
            .bind(address.is_default)
            .fetch_one(&mut **tx)
            .await
    }

    /// Apply a partial update to an address `owner` owns.
    pub(crate) async fn update_address(
        &self,
        tx: &mut Transaction<'_, Postgres>,
        address: AddressId,
        owner: UserId,
        update: AddressUpdate,
    ) -> Result<Option<Address>, sqlx::Error> {
        query_as::<Postgres, Address>(UPDATE_ADDRESS_SQL)
            .bind(address.into_i64())
            .bind(owner.into_i64())
            .bind(update.name)
            .bind(update.address)
            .bind(update.city)
            .bind(update.state)
            .bind(update.pincode)
            .bind(update.country)
            .bind(update.is_default)
            .fetch_optional(&mut **tx)
            .await
    }

    pub(crate) async fn clear_default_address(
        &self,
        tx: &mut Transaction<'_, Postgres>,
        owner: UserId,
    ) -> Result<u64, sqlx::Error> {
        let rows_affected = query(CLEAR_DEFAULT_ADDRESS_SQL)
            .bind(owner.into_i64())
            .execute(&mut **tx)
            .await?
            .rows_affected();

        Ok(rows_affected)
    }

    pub(crate) async fn delete_address(
        &self,
        tx: &mut Transaction<'_, Postgres>,
        address: AddressId,
        owner: UserId,
    ) -> Result<u64, sqlx::Error> {
        let rows_affected = query(DELETE_ADDRESS_SQL)
            .bind(address.into_i64())
            .bind(owner.into_i64())
            .execute(&mut **tx)
            .await?
            .rows_affected();

        Ok(rows_affected)
    }
}

impl<'r> FromRow<'r, PgRow> for Address {
    fn from_row(row: &'r PgRow) -> sqlx::Result<Self> {
        Ok(Self {
            id: AddressId::from_i64(row.try_get("id")?),
            user_id: UserId::from_i64(row.try_get("user_id")?),
            name: row.try_get("name")?,
            address: row.try_get("address")?,
            city: row.try_get("city")?,
            state: row.try_get("state")?,
            pincode: row.try_get("pincode")?,
            country: row.try_get("country")?,
            is_default: row.try_get("is_default")?,
            created_at: row.try_get::<SqlxTimestamp, _>("created_at")?.to_jiff(),
            updated_at: row.try_get::<SqlxTimestamp, _>("updated_at")?.to_jiff(),
        })
    }
}
