//! Boba Lab Storefront library.
//!
//! The in-page half of the Boba Lab site, expressed as plain state objects:
//!
//! - [`catalog`] - Typed menu products and the search/tag filter
//! - [`order`] - The order session: cart lines, promo codes, totals, checkout
//! - [`page`] - Page widgets: hero slider, navigation menu, loading shell
//!
//! Nothing here touches the network or persists anything. A page reload is a
//! fresh [`order::OrderSession`].

#![cfg_attr(not(test), forbid(unsafe_code))]

pub mod catalog;
pub mod order;
pub mod page;

pub use catalog::{Catalog, MenuFilter, OptionChoice, Product, SelectedOptions};
pub use order::{OrderSession, OrderTotals};
