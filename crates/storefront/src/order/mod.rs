//! The order session: cart, promo code and checkout for one page load.
//!
//! [`OrderSession`] owns all order state. Every mutation goes through its
//! methods, and totals are recomputed from the cart on each read, so the
//! summary can never show a stale total.
//!
//! Whenever the cart becomes empty the active promo and the promo message
//! are cleared.
//!
//! # Example
//!
//! ```rust
//! use boba_lab_core::{ProductId, Rupiah};
//! use boba_lab_storefront::{Catalog, OptionChoice, OrderSession};
//!
//! let menu = Catalog::boba_lab_menu();
//! let mut session = OrderSession::new();
//!
//! let taro = menu.get(&ProductId::new("taro"));
//! session.add_item(taro, OptionChoice::default(), 2);
//! session.apply_promo("BOBALAB10").ok();
//!
//! let totals = session.totals();
//! assert_eq!(totals.subtotal, Rupiah::new(46_000));
//! assert_eq!(totals.discount, Rupiah::new(4_600));
//! ```

pub mod cart;
pub mod checkout;
pub mod promo;
pub mod summary;
pub mod totals;

use boba_lab_core::{LineKey, PaymentMethod};
use chrono::Utc;
use tracing::debug;
use uuid::Uuid;

use crate::catalog::{OptionChoice, Product};

pub use cart::{Cart, CartLine};
pub use checkout::{CheckoutError, OrderConfirmation, confirmation_message};
pub use promo::{PROMO_CANCELLED_MESSAGE, PromoCode, PromoError, PromoKind, PromoMessage, PromoOutcome};
pub use summary::{CartLineView, CartSummary};
pub use totals::{OrderTotals, SHIPPING_FEE};

/// Cart, active promo and promo message for one page load.
#[derive(Debug, Clone, Default)]
pub struct OrderSession {
    cart: Cart,
    active_promo: Option<PromoCode>,
    promo_message: Option<PromoMessage>,
}

impl OrderSession {
    /// Start an empty session.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Add `quantity` of `product` configured with `choice`.
    ///
    /// Missing option fields take the product defaults. Identical normalized
    /// configurations merge into one line. Does nothing and returns `None` if
    /// the product is absent or invalid, or if `quantity` is zero.
    pub fn add_item(
        &mut self,
        product: Option<&Product>,
        choice: OptionChoice,
        quantity: u32,
    ) -> Option<LineKey> {
        let product = product.filter(|p| p.is_valid())?;
        let options = product.normalize(&choice);
        let key = self.cart.add(CartLine::new(product, options, quantity))?;
        debug!(key = %key, quantity, "Added to cart");
        Some(key)
    }

    /// Adjust a line's quantity by `delta`; the line is removed at zero.
    ///
    /// Returns the new quantity (`0` if removed), or `None` for an unknown key.
    pub fn change_quantity(&mut self, key: &LineKey, delta: i32) -> Option<u32> {
        let quantity = self.cart.change_quantity(key, delta)?;
        self.settle();
        Some(quantity)
    }

    /// Remove a line if present.
    pub fn remove_item(&mut self, key: &LineKey) -> Option<CartLine> {
        let removed = self.cart.remove(key)?;
        self.settle();
        Some(removed)
    }

    /// Handle a promo form submission.
    ///
    /// # Errors
    ///
    /// - [`PromoError::MissingCode`] for empty input with no active promo
    /// - [`PromoError::EmptyCart`] when the cart has no items
    /// - [`PromoError::Unknown`] when the code is not in the registry; any
    ///   previously active promo is cleared
    pub fn apply_promo(&mut self, input: &str) -> Result<PromoOutcome, PromoError> {
        let outcome = self.evaluate_promo(input);
        self.promo_message = Some(match &outcome {
            Ok(PromoOutcome::Applied(promo)) => PromoMessage::info(promo.applied_message()),
            Ok(PromoOutcome::Cancelled) => PromoMessage::info(PROMO_CANCELLED_MESSAGE),
            Err(err) => PromoMessage::error(err),
        });
        outcome
    }

    fn evaluate_promo(&mut self, input: &str) -> Result<PromoOutcome, PromoError> {
        let code = input.trim();

        if code.is_empty() {
            return if self.active_promo.take().is_some() {
                Ok(PromoOutcome::Cancelled)
            } else {
                Err(PromoError::MissingCode)
            };
        }

        if self.cart.is_empty() {
            return Err(PromoError::EmptyCart);
        }

        let Some(promo) = PromoCode::lookup(code) else {
            self.active_promo = None;
            return Err(PromoError::Unknown(code.to_uppercase()));
        };

        debug!(code = %promo.code, "Promo applied");
        self.active_promo = Some(promo.clone());
        Ok(PromoOutcome::Applied(promo))
    }

    /// Current pricing.
    #[must_use]
    pub fn totals(&self) -> OrderTotals {
        OrderTotals::compute(&self.cart, self.active_promo.as_ref())
    }

    /// Place the order.
    ///
    /// `method` is the submitted payment method code; an unrecognised value
    /// gets the generic confirmation message. The cart and promo are cleared.
    ///
    /// # Errors
    ///
    /// Returns [`CheckoutError::EmptyCart`] if there is nothing to order.
    pub fn checkout(&mut self, method: &str) -> Result<OrderConfirmation, CheckoutError> {
        if self.cart.is_empty() {
            return Err(CheckoutError::EmptyCart);
        }

        let payment_method = method.parse::<PaymentMethod>().ok();
        let totals = self.totals();
        let promo_code = self.active_promo.take().map(|p| p.code);
        let lines = self.cart.take_all();
        self.promo_message = None;

        let confirmation = OrderConfirmation {
            order_id: Uuid::new_v4(),
            placed_at: Utc::now(),
            payment_method,
            promo_code,
            lines,
            totals,
            message: confirmation_message(payment_method).to_string(),
        };

        tracing::info!(
            order_id = %confirmation.order_id,
            total = confirmation.totals.total.amount(),
            "Order placed"
        );
        Ok(confirmation)
    }

    /// The cart.
    #[must_use]
    pub const fn cart(&self) -> &Cart {
        &self.cart
    }

    /// The active promo, if any.
    #[must_use]
    pub const fn active_promo(&self) -> Option<&PromoCode> {
        self.active_promo.as_ref()
    }

    /// Text under the promo form, if any.
    #[must_use]
    pub const fn promo_message(&self) -> Option<&PromoMessage> {
        self.promo_message.as_ref()
    }

    /// Formatted view of the cart panel.
    #[must_use]
    pub fn summary(&self) -> CartSummary {
        CartSummary::from(self)
    }

    fn settle(&mut self) {
        if self.cart.is_empty() {
            self.active_promo = None;
            self.promo_message = None;
        }
    }
}
