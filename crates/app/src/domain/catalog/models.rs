//! Catalog Models

use rust_decimal::Decimal;

use crate::ids::TypedId;

/// Product Id
pub type ProductId = TypedId<Product>;

/// Variant Id
pub type VariantId = TypedId<Variant>;

/// Category Id
pub type CategoryId = TypedId<Category>;

/// A menu section such as "Starters" or "Beverages".
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Category {
    pub id: CategoryId,
    pub name: String,
    pub description: String,

    /// Free-form grouping, e.g. "veg" or "drinks".
    pub category_type: String,

    pub is_available: bool,
}

/// A menu item.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Product {
    pub id: ProductId,
    pub name: String,
    pub description: String,

    /// Discount percent in `0..=100`, two decimal places.
    pub discount: Decimal,

    pub is_available: bool,
}

/// A purchasable size/type of a product.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Variant {
    pub id: VariantId,
    pub product_id: ProductId,
    pub size: String,
    pub variant_type: String,
    pub price: Decimal,
    pub is_available: bool,
}

/// A variant joined with its product.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct VariantDetails {
    pub variant: Variant,
    pub product: Product,
}

impl VariantDetails {
    /// Both the variant and its product can currently be ordered.
    #[must_use]
    pub fn is_orderable(&self) -> bool {
        self.variant.is_available && self.product.is_available
    }
}

/// An available product with its available variants.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ProductVariants {
    pub product: Product,
    pub variants: Vec<Variant>,
}
