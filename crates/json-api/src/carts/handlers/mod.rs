//! Cart Handlers

pub(crate) mod get;
pub(crate) mod upsert;

#[cfg(test)]
mod tests {
    use rust_decimal::Decimal;

    use elysian_app::domain::{
        carts::models::{CartId, CartItemId, CartLine, CartView, PricedCartLine},
        catalog::models::{ProductId, VariantId},
    };

    /// One line: variant 12 of product 7, price 150.00, 10% off.
    pub(super) fn make_cart(quantity: i32) -> CartView {
        let line = CartLine {
            id: CartItemId::from_i64(1),
            cart_id: CartId::from_i64(1),
            product_id: ProductId::from_i64(7),
            product_name: "Paneer Tikka".to_string(),
            variant_id: VariantId::from_i64(12),
            variant_size: "Full".to_string(),
            variant_type: "Veg".to_string(),
            quantity,
            price: Decimal::new(15_000, 2),
            discount: Decimal::new(1_000, 2),
        };

        let item_total = Decimal::new(13_500, 2) * Decimal::from(quantity);

        CartView {
            items: vec![PricedCartLine {
                line,
                discounted_price: Decimal::new(13_500, 2),
                item_total,
            }],
            total_items: 1,
            total_amount: item_total,
        }
    }
}
