//! Promo codes and the static promo registry.

use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};
use thiserror::Error;

/// What a promo code does to the order.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "type", content = "value", rename_all = "snake_case")]
pub enum PromoKind {
    /// Discount of `rate` (0..=1) of the subtotal, rounded down.
    Percentage(Decimal),
    /// Waives the shipping fee.
    FreeShipping,
}

/// A promo code from the registry.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct PromoCode {
    pub code: String,
    pub kind: PromoKind,
    pub message: String,
}

impl PromoCode {
    /// Look up a code in the static registry. Matching ignores case and
    /// surrounding whitespace.
    #[must_use]
    pub fn lookup(code: &str) -> Option<Self> {
        let code = code.trim().to_uppercase();
        match code.as_str() {
            "BOBALAB10" => Some(Self {
                code,
                kind: PromoKind::Percentage(Decimal::new(1, 1)),
                message: "Yeay! Diskon 10% telah diterapkan.".to_string(),
            }),
            "LABFREESHIP" => Some(Self {
                code,
                kind: PromoKind::FreeShipping,
                message: "Gratis ongkir aktif untuk transaksi ini.".to_string(),
            }),
            _ => None,
        }
    }

    /// Message shown once the promo is applied, e.g. `... (BOBALAB10)`.
    #[must_use]
    pub fn applied_message(&self) -> String {
        format!("{} ({})", self.message, self.code)
    }
}

/// A successful promo form submission.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum PromoOutcome {
    /// The promo is now active.
    Applied(PromoCode),
    /// Empty input while a promo was active: the promo was removed.
    Cancelled,
}

/// A rejected promo form submission. The display text is user-facing.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum PromoError {
    #[error("Masukkan kode promo terlebih dahulu.")]
    MissingCode,
    #[error("Tambahkan menu ke keranjang sebelum menggunakan kode promo.")]
    EmptyCart,
    #[error("Kode promo tidak ditemukan. Coba periksa lagi ya!")]
    Unknown(String),
}

/// The promo line under the promo form.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct PromoMessage {
    pub text: String,
    pub is_error: bool,
}

impl PromoMessage {
    pub(crate) fn info(text: impl Into<String>) -> Self {
        Self {
            text: text.into(),
            is_error: false,
        }
    }

    pub(crate) fn error(err: &PromoError) -> Self {
        Self {
            text: err.to_string(),
            is_error: true,
        }
    }
}

/// Shown when an active promo is cancelled with an empty submission.
pub const PROMO_CANCELLED_MESSAGE: &str = "Kode promo dibatalkan.";

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use super::*;

    #[test]
    fn test_lookup_is_case_insensitive() {
        let promo = PromoCode::lookup("  bobalab10 ").unwrap();
        assert_eq!(promo.code, "BOBALAB10");
        assert_eq!(promo.kind, PromoKind::Percentage(Decimal::new(10, 2)));
    }

    #[test]
    fn test_lookup_unknown() {
        assert!(PromoCode::lookup("FREEBOBA").is_none());
        assert!(PromoCode::lookup("").is_none());
    }

    #[test]
    fn test_applied_message_includes_code() {
        let promo = PromoCode::lookup("labfreeship").unwrap();
        assert_eq!(
            promo.applied_message(),
            "Gratis ongkir aktif untuk transaksi ini. (LABFREESHIP)"
        );
    }

    #[test]
    fn test_error_messages_are_user_facing() {
        assert_eq!(
            PromoError::Unknown("X".to_string()).to_string(),
            "Kode promo tidak ditemukan. Coba periksa lagi ya!"
        );
        assert!(PromoMessage::error(&PromoError::EmptyCart).is_error);
    }
}
