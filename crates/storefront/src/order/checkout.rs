//! Checkout confirmation.

use boba_lab_core::PaymentMethod;
use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use thiserror::Error;
use uuid::Uuid;

use super::cart::CartLine;
use super::totals::OrderTotals;

/// Errors returned by [`OrderSession::checkout`](super::OrderSession::checkout).
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum CheckoutError {
    /// Nothing to pay for.
    #[error("Keranjang masih kosong")]
    EmptyCart,
}

/// The receipt produced by a successful checkout.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct OrderConfirmation {
    pub order_id: Uuid,
    pub placed_at: DateTime<Utc>,
    /// `None` when the submitted method was not recognised.
    pub payment_method: Option<PaymentMethod>,
    pub promo_code: Option<String>,
    pub lines: Vec<CartLine>,
    pub totals: OrderTotals,
    pub message: String,
}

/// Confirmation text for a payment method.
#[must_use]
pub fn confirmation_message(method: Option<PaymentMethod>) -> &'static str {
    match method {
        Some(PaymentMethod::PayOnScan) => {
            "Pesanan diterima! Silakan scan kode QRIS yang muncul untuk menyelesaikan pembayaran."
        }
        Some(PaymentMethod::BankTransfer) => {
            "Pesanan diterima! Detail rekening sudah kami kirim, pesanan diproses setelah transfer terverifikasi."
        }
        Some(PaymentMethod::CashOnDelivery) => {
            "Pesanan diterima! Siapkan uang tunai saat kurir kami tiba, ya."
        }
        None => "Terima kasih! Pesanan kamu sedang kami proses.",
    }
}
