//! Cart and order pricing.
//!
//! Display prices are decimal major units rounded half away from zero to two
//! places. Orders are priced in integer minor units (paisa).

use rust_decimal::{Decimal, RoundingStrategy, prelude::ToPrimitive};

use crate::domain::carts::models::{CartLine, CartView, PricedCartLine};

const HUNDRED: Decimal = Decimal::ONE_HUNDRED;

fn round_display(value: Decimal) -> Decimal {
    value.round_dp_with_strategy(2, RoundingStrategy::MidpointAwayFromZero)
}

/// `price - price * discount / 100`, unrounded.
#[must_use]
pub fn discounted_price(price: Decimal, discount: Decimal) -> Decimal {
    price - price * discount / HUNDRED
}

/// Price every line and total the cart.
///
/// `total_amount` sums the unrounded line totals and rounds once.
#[must_use]
pub fn price_cart(lines: Vec<CartLine>) -> CartView {
    let mut total = Decimal::ZERO;

    let items: Vec<PricedCartLine> = lines
        .into_iter()
        .map(|line| {
            let discounted = discounted_price(line.price, line.discount);
            let item_total = discounted * Decimal::from(line.quantity);

            total += item_total;

            PricedCartLine {
                line,
                discounted_price: round_display(discounted),
                item_total: round_display(item_total),
            }
        })
        .collect();

    CartView {
        total_items: items.len(),
        total_amount: round_display(total),
        items,
    }
}

/// Display price breakdown of a single unit.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct UnitPricing {
    pub original_price: Decimal,

    /// Discount percent.
    pub discount_percentage: Decimal,

    pub discount_amount: Decimal,
    pub final_price: Decimal,
}

/// Price one unit; the amount and final price are rounded for display.
#[must_use]
pub fn unit_pricing(price: Decimal, discount: Decimal) -> UnitPricing {
    let final_price = discounted_price(price, discount);

    UnitPricing {
        original_price: price,
        discount_percentage: discount,
        discount_amount: round_display(price - final_price),
        final_price: round_display(final_price),
    }
}

/// Minor-unit pricing of one order line.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct MinorUnitLine {
    /// Undiscounted unit price.
    pub unit_price: i64,

    /// Discounted unit price.
    pub discounted_unit_price: i64,

    /// `discounted_unit_price * quantity`.
    pub line_total: i64,

    /// Discount given across the whole line.
    pub line_discount: i64,
}

/// Convert a major-unit price and discount percent into minor units.
///
/// Returns `None` when the result does not fit in an `i64`.
#[must_use]
pub fn minor_unit_line(price: Decimal, discount: Decimal, quantity: i32) -> Option<MinorUnitLine> {
    let unit = (price * HUNDRED).round_dp_with_strategy(0, RoundingStrategy::MidpointAwayFromZero);
    let discounted = (unit * (HUNDRED - discount) / HUNDRED)
        .round_dp_with_strategy(0, RoundingStrategy::MidpointAwayFromZero);

    let unit_price = unit.to_i64()?;
    let discounted_unit_price = discounted.to_i64()?;
    let quantity = i64::from(quantity);

    Some(MinorUnitLine {
        unit_price,
        discounted_unit_price,
        line_total: discounted_unit_price.checked_mul(quantity)?,
        line_discount: unit_price
            .checked_sub(discounted_unit_price)?
            .checked_mul(quantity)?,
    })
}
