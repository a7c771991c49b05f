//! Order Repositories

mod orders;
mod payments;

pub(crate) use orders::PgOrdersRepository;
pub(crate) use payments::PgPaymentsRepository;

use std::str::FromStr;

use sqlx::{Row, postgres::PgRow};

/// Decode a `TEXT` status column into its enum.
fn try_get_status<T>(row: &PgRow, column: &str) -> sqlx::Result<T>
where
    T: FromStr,
    T::Err: std::error::Error + Send + Sync + 'static,
{
    let value: String = row.try_get(column)?;

    value.parse().map_err(|error: T::Err| sqlx::Error::ColumnDecode {
        index: column.to_string(),
        source: Box::new(error),
    })
}
