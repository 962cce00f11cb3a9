//! Order pricing.

use boba_lab_core::Rupiah;
use rust_decimal::Decimal;
use rust_decimal::prelude::ToPrimitive;
use serde::{Deserialize, Serialize};

use super::cart::Cart;
use super::promo::{PromoCode, PromoKind};

/// Flat delivery fee for any non-empty cart.
pub const SHIPPING_FEE: Rupiah = Rupiah::new(8000);

/// Derived pricing for a cart and an optional promo.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct OrderTotals {
    pub item_count: u32,
    pub subtotal: Rupiah,
    pub shipping_fee: Rupiah,
    pub discount: Rupiah,
    pub total: Rupiah,
}

impl OrderTotals {
    /// Compute totals. Pure: same cart and promo give the same result.
    ///
    /// - `shipping_fee` is [`SHIPPING_FEE`] for a non-empty cart, zero with a
    ///   free-shipping promo.
    /// - `discount` is `floor(subtotal * rate)` with a percentage promo.
    /// - `total` is `subtotal + shipping_fee - discount`, never below zero.
    #[must_use]
    pub fn compute(cart: &Cart, promo: Option<&PromoCode>) -> Self {
        let has_items = !cart.is_empty();
        let subtotal = cart.subtotal();
        let mut shipping_fee = if has_items { SHIPPING_FEE } else { Rupiah::ZERO };
        let mut discount = Rupiah::ZERO;

        if let Some(promo) = promo.filter(|_| has_items) {
            match promo.kind {
                PromoKind::Percentage(rate) => discount = percentage_of(subtotal, rate),
                PromoKind::FreeShipping => shipping_fee = Rupiah::ZERO,
            }
        }

        Self {
            item_count: cart.total_quantity(),
            subtotal,
            shipping_fee,
            discount,
            total: (subtotal + shipping_fee).saturating_sub(discount),
        }
    }

    /// Whether the discount row should be visible.
    #[must_use]
    pub const fn has_discount(&self) -> bool {
        !self.discount.is_zero()
    }
}

fn percentage_of(amount: Rupiah, rate: Decimal) -> Rupiah {
    let discount = (Decimal::from(amount.amount()) * rate).floor();
    Rupiah::new(discount.to_u64().unwrap_or(0))
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use boba_lab_core::ProductId;

    use super::*;
    use crate::catalog::{Product, SelectedOptions};
    use crate::order::cart::CartLine;

    fn cart_with_subtotal(amount: u64) -> Cart {
        let product = Product {
            id: ProductId::new("test"),
            name: "Test".to_string(),
            description: String::new(),
            unit_price: Rupiah::new(amount),
            tags: Vec::new(),
            options: crate::catalog::OptionLists::default(),
            defaults: SelectedOptions::default(),
        };
        let mut cart = Cart::default();
        cart.add(CartLine::new(&product, SelectedOptions::default(), 1));
        cart
    }

    #[test]
    fn test_empty_cart_is_all_zero() {
        let totals = OrderTotals::compute(&Cart::default(), PromoCode::lookup("BOBALAB10").as_ref());
        assert_eq!(totals.subtotal, Rupiah::ZERO);
        assert_eq!(totals.shipping_fee, Rupiah::ZERO);
        assert_eq!(totals.discount, Rupiah::ZERO);
        assert_eq!(totals.total, Rupiah::ZERO);
    }

    #[test]
    fn test_no_promo() {
        let totals = OrderTotals::compute(&cart_with_subtotal(50_000), None);
        assert_eq!(totals.shipping_fee, SHIPPING_FEE);
        assert_eq!(totals.total, Rupiah::new(58_000));
        assert!(!totals.has_discount());
    }

    #[test]
    fn test_percentage_promo() {
        let promo = PromoCode::lookup("BOBALAB10").unwrap();
        let totals = OrderTotals::compute(&cart_with_subtotal(50_000), Some(&promo));
        assert_eq!(totals.discount, Rupiah::new(5000));
        assert_eq!(totals.total, Rupiah::new(50_000 + 8000 - 5000));
    }

    #[test]
    fn test_percentage_rounds_down() {
        let promo = PromoCode::lookup("BOBALAB10").unwrap();
        let totals = OrderTotals::compute(&cart_with_subtotal(22_999), Some(&promo));
        assert_eq!(totals.discount, Rupiah::new(2299));
    }

    #[test]
    fn test_free_shipping_promo() {
        let promo = PromoCode::lookup("LABFREESHIP").unwrap();
        for amount in [1, 22_000, 1_000_000] {
            let totals = OrderTotals::compute(&cart_with_subtotal(amount), Some(&promo));
            assert_eq!(totals.shipping_fee, Rupiah::ZERO);
            assert_eq!(totals.total, Rupiah::new(amount));
        }
    }

    #[test]
    fn test_total_never_negative() {
        let promo = PromoCode {
            code: "ALL".to_string(),
            kind: PromoKind::Percentage(Decimal::new(5, 0)),
            message: String::new(),
        };
        let totals = OrderTotals::compute(&cart_with_subtotal(10_000), Some(&promo));
        assert_eq!(totals.total, Rupiah::ZERO);
    }
}
