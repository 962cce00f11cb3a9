//! Order quotes against the built-in menu.
//!
//! # Usage
//!
//! ```bash
//! boba-cli quote --order order.json
//! boba-cli quote --order order.json --checkout
//! ```
//!
//! # Order file format
//!
//! ```json
//! {
//!   "items": [
//!     { "product": "taro", "quantity": 2, "ice": "Less Ice", "topping": "Boba" },
//!     { "product": "matcha" }
//!   ],
//!   "promo": "BOBALAB10",
//!   "payment": "qris"
//! }
//! ```

use std::path::Path;

use boba_lab_core::ProductId;
use boba_lab_storefront::{Catalog, OptionChoice, OrderSession};
use serde::Deserialize;
use tracing::{info, warn};

/// One requested cart line.
#[derive(Debug, Deserialize)]
pub struct QuoteItem {
    pub product: String,
    #[serde(default = "default_quantity")]
    pub quantity: u32,
    #[serde(flatten)]
    pub options: OptionChoice,
}

const fn default_quantity() -> u32 {
    1
}

/// A quote request.
#[derive(Debug, Deserialize)]
pub struct QuoteOrder {
    pub items: Vec<QuoteItem>,
    #[serde(default)]
    pub promo: Option<String>,
    #[serde(default)]
    pub payment: Option<String>,
}

/// Fill an order session from `order`.
///
/// Unknown products are skipped with a warning; a rejected promo code is
/// reported through the session's promo message.
#[must_use]
pub fn build_session(catalog: &Catalog, order: QuoteOrder) -> OrderSession {
    let mut session = OrderSession::new();

    for item in order.items {
        let product = catalog.get(&ProductId::new(item.product.as_str()));
        if product.is_none() {
            warn!(product = %item.product, "Unknown product, skipping");
        }
        session.add_item(product, item.options, item.quantity);
    }

    if let Some(code) = order.promo
        && let Err(e) = session.apply_promo(&code)
    {
        warn!(code = %code, error = %e, "Promo not applied");
    }

    session
}

/// Print the cart summary and optionally check out.
///
/// # Errors
///
/// Returns an error if the order file cannot be read or parsed, or if
/// checkout is requested for an empty cart.
#[allow(clippy::print_stdout)]
pub fn run(path: &Path, checkout: bool) -> Result<(), Box<dyn std::error::Error>> {
    let json = std::fs::read_to_string(path)
        .map_err(|e| format!("Failed to read order {}: {e}", path.display()))?;
    let order: QuoteOrder = serde_json::from_str(&json)?;
    let payment = order.payment.clone().unwrap_or_default();

    let catalog = Catalog::boba_lab_menu();
    let mut session = build_session(&catalog, order);
    let summary = session.summary();

    println!("{}", serde_json::to_string_pretty(&summary)?);

    if checkout {
        let confirmation = session.checkout(&payment)?;
        info!(order_id = %confirmation.order_id, "Checkout complete");
        println!("{}", confirmation.message);
    }

    Ok(())
}
