//! Catalog response bodies.

use salvo::oapi::ToSchema;
use serde::{Deserialize, Serialize};

use elysian_app::domain::{
    carts::pricing::{discounted_price, unit_pricing},
    catalog::models::{Category, Product, ProductVariants, Variant, VariantDetails},
};

use crate::carts::models::money;

/// Variant with its price after the product discount.
#[derive(Debug, Serialize, Deserialize, ToSchema)]
pub(crate) struct VariantResponse {
    pub id: i64,
    pub product_id: i64,
    pub size: String,
    pub variant_type: String,
    pub price: f64,
    pub discounted_price: f64,
    pub is_available: bool,
}

impl VariantResponse {
    fn priced(variant: Variant, product: &Product) -> Self {
        Self {
            id: variant.id.into_i64(),
            product_id: variant.product_id.into_i64(),
            discounted_price: money(discounted_price(variant.price, product.discount)),
            price: money(variant.price),
            size: variant.size,
            variant_type: variant.variant_type,
            is_available: variant.is_available,
        }
    }
}

/// Product
#[derive(Debug, Serialize, Deserialize, ToSchema)]
pub(crate) struct ProductResponse {
    pub id: i64,
    pub name: String,
    pub description: String,

    /// Discount percent.
    pub discount: f64,

    pub is_available: bool,
}

impl From<Product> for ProductResponse {
    fn from(product: Product) -> Self {
        Self {
            id: product.id.into_i64(),
            name: product.name,
            description: product.description,
            discount: money(product.discount),
            is_available: product.is_available,
        }
    }
}

/// Product Variants
#[derive(Debug, Serialize, Deserialize, ToSchema)]
pub(crate) struct ProductVariantsResponse {
    pub product: ProductResponse,
    pub variants: Vec<VariantResponse>,
}

impl From<ProductVariants> for ProductVariantsResponse {
    fn from(listing: ProductVariants) -> Self {
        let variants = listing
            .variants
            .into_iter()
            .map(|variant| VariantResponse::priced(variant, &listing.product))
            .collect();

        Self {
            product: listing.product.into(),
            variants,
        }
    }
}

/// Variant Details
#[derive(Debug, Serialize, Deserialize, ToSchema)]
pub(crate) struct VariantDetailsResponse {
    pub variant: VariantResponse,
    pub product: ProductResponse,
}

impl From<VariantDetails> for VariantDetailsResponse {
    fn from(details: VariantDetails) -> Self {
        Self {
            variant: VariantResponse::priced(details.variant, &details.product),
            product: details.product.into(),
        }
    }
}

/// Variant Pricing
#[derive(Debug, Serialize, Deserialize, ToSchema)]
pub(crate) struct VariantPricingResponse {
    pub product_id: i64,
    pub variant_id: i64,
    pub original_price: f64,
    pub discount_percentage: f64,
    pub discount_amount: f64,
    pub final_price: f64,

    /// Always `INR`.
    pub currency: String,
}

impl From<VariantDetails> for VariantPricingResponse {
    fn from(details: VariantDetails) -> Self {
        let pricing = unit_pricing(details.variant.price, details.product.discount);

        Self {
            product_id: details.product.id.into_i64(),
            variant_id: details.variant.id.into_i64(),
            original_price: money(pricing.original_price),
            discount_percentage: money(pricing.discount_percentage),
            discount_amount: money(pricing.discount_amount),
            final_price: money(pricing.final_price),
            currency: "INR".to_string(),
        }
    }
}

/// Category
#[derive(Debug, Serialize, Deserialize, ToSchema)]
pub(crate) struct CategoryResponse {
    pub id: i64,
    pub name: String,
    pub description: String,
    pub is_available: bool,

    #[serde(rename = "type")]
    pub category_type: String,
}

impl From<Category> for CategoryResponse {
    fn from(category: Category) -> Self {
        Self {
            id: category.id.into_i64(),
            name: category.name,
            description: category.description,
            is_available: category.is_available,
            category_type: category.category_type,
        }
    }
}
