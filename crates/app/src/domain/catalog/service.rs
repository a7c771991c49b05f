//! Catalog service.

use async_trait::async_trait;
use mockall::automock;

use crate::{
    database::Db,
    domain::catalog::{
        errors::CatalogServiceError,
        models::{Category, ProductId, ProductVariants, VariantDetails, VariantId},
        repository::PgCatalogRepository,
    },
};

#[derive(Debug, Clone)]
pub struct PgCatalogService {
    db: Db,
    repository: PgCatalogRepository,
}

impl PgCatalogService {
    #[must_use]
    pub fn new(db: Db) -> Self {
        Self {
            db,
            repository: PgCatalogRepository::new(),
        }
    }
}

#[async_trait]
impl CatalogService for PgCatalogService {
    async fn list_available_variants(
        &self,
        product: ProductId,
    ) -> Result<ProductVariants, CatalogServiceError> {
        let mut tx = self.db.begin().await?;

        let product = self
            .repository
            .get_product(&mut tx, product)
            .await?
            .filter(|product| product.is_available)
            .ok_or(CatalogServiceError::ProductNotFound)?;

        let variants = self
            .repository
            .list_available_variants(&mut tx, product.id)
            .await?;

        tx.commit().await?;

        Ok(ProductVariants { product, variants })
    }

    async fn get_orderable_variant(
        &self,
        product: ProductId,
        variant: VariantId,
    ) -> Result<VariantDetails, CatalogServiceError> {
        let mut tx = self.db.begin().await?;

        self.repository
            .get_product(&mut tx, product)
            .await?
            .filter(|product| product.is_available)
            .ok_or(CatalogServiceError::ProductNotFound)?;

        let details = self
            .repository
            .get_variant_details(&mut tx, variant)
            .await?
            .filter(|details| details.variant.product_id == product && details.is_orderable())
            .ok_or(CatalogServiceError::VariantNotFound)?;

        tx.commit().await?;

        Ok(details)
    }

    async fn list_categories(&self) -> Result<Vec<Category>, CatalogServiceError> {
        let mut tx = self.db.begin().await?;

        let categories = self.repository.list_available_categories(&mut tx).await?;

        tx.commit().await?;

        Ok(categories)
    }

    async fn get_variant(&self, variant: VariantId) -> Result<VariantDetails, CatalogServiceError> {
        let mut tx = self.db.begin().await?;

        let details = self
            .repository
            .get_variant_details(&mut tx, variant)
            .await?
            .ok_or(CatalogServiceError::VariantNotFound)?;

        tx.commit().await?;

        Ok(details)
    }
}

#[automock]
#[async_trait]
pub trait CatalogService: Send + Sync {
    /// List the orderable variants of an available product.
    async fn list_available_variants(
        &self,
        product: ProductId,
    ) -> Result<ProductVariants, CatalogServiceError>;

    /// Fetch an available variant of an available product.
    ///
    /// A variant that belongs to a different product is `VariantNotFound`.
    async fn get_orderable_variant(
        &self,
        product: ProductId,
        variant: VariantId,
    ) -> Result<VariantDetails, CatalogServiceError>;

    /// List the available categories by name.
    async fn list_categories(&self) -> Result<Vec<Category>, CatalogServiceError>;

    /// Fetch any variant with its product, regardless of availability.
    async fn get_variant(&self, variant: VariantId) -> Result<VariantDetails, CatalogServiceError>;
}
