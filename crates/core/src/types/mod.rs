//! Core types for Boba Lab.
//!
//! This module provides type-safe wrappers for common domain concepts.

pub mod id;
pub mod price;
pub mod status;

pub use id::*;
pub use price::{PriceError, Rupiah};
pub use status::*;
