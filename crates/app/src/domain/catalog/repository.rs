//! Catalog Repository

use sqlx::{FromRow, Postgres, Row, Transaction, postgres::PgRow, query_as};

use crate::domain::catalog::models::{
    Category, CategoryId, Product, ProductId, Variant, VariantDetails, VariantId,
};

const GET_VARIANT_DETAILS_SQL: &str = include_str!("sql/get_variant_details.sql");
const GET_PRODUCT_SQL: &str = include_str!("sql/get_product.sql");
const LIST_AVAILABLE_VARIANTS_SQL: &str = include_str!("sql/list_available_variants.sql");
const LIST_AVAILABLE_CATEGORIES_SQL: &str = include_str!("sql/list_available_categories.sql");

#[derive(Debug, Clone, Default)]
pub(crate) struct PgCatalogRepository;

impl PgCatalogRepository {
    #[must_use]
    pub(crate) fn new() -> Self {
        Self
    }

    pub(crate) async fn get_variant_details(
        &self,
        tx: &mut Transaction<'_, Postgres>,
        variant: VariantId,
    ) -> Result<Option<VariantDetails>, sqlx::Error> {
        query_as::<Postgres, VariantDetails>(GET_VARIANT_DETAILS_SQL)
            .bind(variant.into_i64())
            .fetch_optional(&mut **tx)
            .await
    }

    pub(crate) async fn get_product(
        &self,
        tx: &mut Transaction<'_, Postgres>,
        product: ProductId,
    ) -> Result<Option<Product>, sqlx::Error> {
        query_as::<Postgres, Product>(GET_PRODUCT_SQL)
            .bind(product.into_i64())
            .fetch_optional(&mut **tx)
            .await
    }

    pub(crate) async fn list_available_variants(
        &self,
        tx: &mut Transaction<'_, Postgres>,
        product: ProductId,
    ) -> Result<Vec<Variant>, sqlx::Error> {
        query_as::<Postgres, Variant>(LIST_AVAILABLE_VARIANTS_SQL)
            .bind(product.into_i64())
            .fetch_all(&mut **tx)
            .await
    }

    pub(crate) async fn list_available_categories(
        &self,
        tx: &mut Transaction<'_, Postgres>,
    ) -> Result<Vec<Category>, sqlx::Error> {
        query_as::<Postgres, Category>(LIST_AVAILABLE_CATEGORIES_SQL)
            .fetch_all(&mut **tx)
            .await
    }
}

impl<'r> FromRow<'r, PgRow> for Category {
    fn from_row(row: &'r PgRow) -> sqlx::Result<Self> {
        Ok(Self {
            id: CategoryId::from_i64(row.try_get("id")?),
            name: row.try_get("name")?,
            description: row.try_get("description")?,
            category_type: row.try_get("category_type")?,
            is_available: row.try_get("is_available")?,
        })
    }
}

impl<'r> FromRow<'r, PgRow> for Product {
    fn from_row(row: &'r PgRow) -> sqlx::Result<Self> {
        Ok(Self {
            id: ProductId::from_i64(row.try_get("product_id")?),
            name: row.try_get("product_name")?,
            description: row.try_get("product_description")?,
            discount: row.try_get("product_discount")?,
            is_available: row.try_get("product_is_available")?,
        })
    }
}

impl<'r> FromRow<'r, PgRow> for Variant {
    fn from_row(row: &'r PgRow) -> sqlx::Result<Self> {
        Ok(Self {
            id: VariantId::from_i64(row.try_get("variant_id")?),
            product_id: ProductId::from_i64(row.try_get("product_id")?),
            size: row.try_get("size")?,
            variant_type: row.try_get("variant_type")?,
            price: row.try_get("price")?,
            is_available: row.try_get("variant_is_available")?,
        })
    }
}

impl<'r> FromRow<'r, PgRow> for VariantDetails {
    fn from_row(row: &'r PgRow) -> sqlx::Result<Self> {
        Ok(Self {
            variant: Variant::from_row(row)?,
            product: Product::from_row(row)?,
        })
    }
}
