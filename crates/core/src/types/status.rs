//! Status enums for various entities.

use serde::{Deserialize, Serialize};

/// Payment method chosen at checkout.
///
/// The checkout form submits one of the short codes (`qris`, `transfer`,
/// `cod`); the long kebab-case names are accepted as well.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "kebab-case")]
pub enum PaymentMethod {
    /// Scan a QRIS code and pay from any e-wallet.
    #[serde(alias = "qris")]
    PayOnScan,
    /// Manual bank transfer.
    #[serde(alias = "transfer")]
    BankTransfer,
    /// Pay the courier in cash.
    #[serde(alias = "cod")]
    CashOnDelivery,
}

impl PaymentMethod {
    /// All supported methods, in display order.
    pub const ALL: [Self; 3] = [Self::PayOnScan, Self::BankTransfer, Self::CashOnDelivery];

    /// Short form code used by the checkout form.
    #[must_use]
    pub const fn code(self) -> &'static str {
        match self {
            Self::PayOnScan => "qris",
            Self::BankTransfer => "transfer",
            Self::CashOnDelivery => "cod",
        }
    }
}

impl std::fmt::Display for PaymentMethod {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::PayOnScan => write!(f, "pay-on-scan"),
            Self::BankTransfer => write!(f, "bank-transfer"),
            Self::CashOnDelivery => write!(f, "cash-on-delivery"),
        }
    }
}

impl std::str::FromStr for PaymentMethod {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_lowercase().as_str() {
            "qris" | "pay-on-scan" => Ok(Self::PayOnScan),
            "transfer" | "bank-transfer" => Ok(Self::BankTransfer),
            "cod" | "cash-on-delivery" => Ok(Self::CashOnDelivery),
            _ => Err(format!("invalid payment method: {s}")),
        }
    }
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use super::*;

    #[test]
    fn test_payment_method_from_code() {
        assert_eq!("qris".parse::<PaymentMethod>().unwrap(), PaymentMethod::PayOnScan);
        assert_eq!(
            " Transfer ".parse::<PaymentMethod>().unwrap(),
            PaymentMethod::BankTransfer
        );
        assert_eq!(
            "cash-on-delivery".parse::<PaymentMethod>().unwrap(),
            PaymentMethod::CashOnDelivery
        );
        assert!("paypal".parse::<PaymentMethod>().is_err());
    }

    #[test]
    fn test_payment_method_roundtrip_through_code() {
        for method in PaymentMethod::ALL {
            assert_eq!(method.code().parse::<PaymentMethod>().unwrap(), method);
            assert_eq!(method.to_string().parse::<PaymentMethod>().unwrap(), method);
        }
    }

    #[test]
    fn test_payment_method_serde_alias() {
        let method: PaymentMethod = serde_json::from_str("\"cod\"").unwrap();
        assert_eq!(method, PaymentMethod::CashOnDelivery);
        assert_eq!(
            serde_json::to_string(&PaymentMethod::PayOnScan).unwrap(),
            "\"pay-on-scan\""
        );
    }
}
