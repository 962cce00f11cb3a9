//! Display data for the cart panel and order summary.

use serde::Serialize;

use super::OrderSession;
use super::promo::PromoMessage;

/// Cart line display data.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct CartLineView {
    pub key: String,
    pub name: String,
    pub options_label: String,
    pub quantity: u32,
    pub line_price: String,
}

/// Everything the cart panel shows, already formatted.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct CartSummary {
    pub items: Vec<CartLineView>,
    pub item_count_label: String,
    pub show_empty_message: bool,
    pub subtotal: String,
    pub shipping: String,
    /// Present only while a discount applies.
    pub discount: Option<String>,
    pub total: String,
    pub checkout_enabled: bool,
    pub checkout_label: &'static str,
    pub promo_message: Option<PromoMessage>,
}

impl From<&OrderSession> for CartSummary {
    fn from(session: &OrderSession) -> Self {
        let totals = session.totals();
        let has_items = !session.cart().is_empty();

        Self {
            items: session
                .cart()
                .lines()
                .iter()
                .map(|line| CartLineView {
                    key: line.key.to_string(),
                    name: line.name.clone(),
                    options_label: line.options.label(),
                    quantity: line.quantity,
                    line_price: line.line_total().to_string(),
                })
                .collect(),
            item_count_label: format!("{} item", totals.item_count),
            show_empty_message: !has_items,
            subtotal: totals.subtotal.to_string(),
            shipping: totals.shipping_fee.to_string(),
            discount: totals
                .has_discount()
                .then(|| totals.discount.display_negative()),
            total: totals.total.to_string(),
            checkout_enabled: has_items,
            checkout_label: if has_items {
                "Checkout Sekarang"
            } else {
                "Keranjang masih kosong"
            },
            promo_message: session.promo_message().cloned(),
        }
    }
}
