//! Money value object: an amount in the smallest currency unit, tagged with
//! an uppercase ISO-ish currency code.
//!
//! Amounts are `i64` minor units (e.g. cents, or whole đồng for VND) so that
//! arithmetic stays exact; there is no floating point anywhere in pricing.

use serde::{Deserialize, Serialize};

use crate::error::{DomainError, DomainResult};
use crate::value_object::ValueObject;

/// Default currency when a catalog item doesn't specify one.
pub const DEFAULT_CURRENCY: &str = "VND";

/// An exact monetary amount.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Money {
    /// Amount in the smallest currency unit. Never negative for prices;
    /// validation happens at the constructors of the types that carry it.
    pub amount_minor: i64,
    /// Uppercase currency code.
    pub currency: String,
}

impl Money {
    pub fn new(amount_minor: i64, currency: impl Into<String>) -> Self {
        Self {
            amount_minor,
            currency: currency.into().to_uppercase(),
        }
    }

    /// Multiply by a quantity, keeping the currency.
    ///
    /// Fails on overflow rather than wrapping; an order total that doesn't
    /// fit in `i64` minor units is a validation problem, not a panic.
    pub fn times(&self, quantity: i64) -> DomainResult<Money> {
        let amount = self
            .amount_minor
            .checked_mul(quantity)
            .ok_or_else(|| DomainError::validation("total cost overflows"))?;
        Ok(Money {
            amount_minor: amount,
            currency: self.currency.clone(),
        })
    }

    pub fn is_negative(&self) -> bool {
        self.amount_minor < 0
    }
}

impl ValueObject for Money {}

impl core::fmt::Display for Money {
    fn fmt(&self, f: &mut core::fmt::Formatter<'_>) -> core::fmt::Result {
        write!(f, "{} {}", self.amount_minor, self.currency)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn currency_is_uppercased() {
        let m = Money::new(1000, "vnd");
        assert_eq!(m.currency, "VND");
    }

    #[test]
    fn times_multiplies_exactly() {
        let unit = Money::new(10_00, "USD");
        let total = unit.times(3).unwrap();
        assert_eq!(total, Money::new(30_00, "USD"));
    }

    #[test]
    fn times_rejects_overflow() {
        let unit = Money::new(i64::MAX, "USD");
        let err = unit.times(2).unwrap_err();
        assert!(matches!(err, DomainError::Validation(_)));
    }

    #[test]
    fn equality_is_by_value() {
        assert_eq!(Money::new(5, "EUR"), Money::new(5, "eur"));
        assert_ne!(Money::new(5, "EUR"), Money::new(5, "USD"));
    }
}
