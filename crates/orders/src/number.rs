//! Human-readable, globally unique order numbers.
//!
//! Format: `ORD-<UTC date, 8 digits>-<6-digit random suffix>`. The suffix
//! gives 900,000 values per day, so collisions are rare but real; the
//! uniqueness check against the order store is mandatory, not advisory.

use chrono::{DateTime, Utc};
use rand::Rng;
use serde::{Deserialize, Serialize};

use crate::error::OrderError;
use crate::ports::OrderStore;

/// A generated order number, e.g. `ORD-20260828-493027`.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(transparent)]
pub struct OrderNumber(String);

impl OrderNumber {
    /// Produce a candidate for the given instant. Uniqueness is the
    /// generator's job, not this function's.
    pub fn candidate(at: DateTime<Utc>, rng: &mut impl Rng) -> Self {
        let suffix: u32 = rng.gen_range(100_000..1_000_000);
        Self(format!("ORD-{}-{}", at.format("%Y%m%d"), suffix))
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl From<String> for OrderNumber {
    fn from(value: String) -> Self {
        Self(value)
    }
}

impl core::fmt::Display for OrderNumber {
    fn fmt(&self, f: &mut core::fmt::Formatter<'_>) -> core::fmt::Result {
        f.write_str(&self.0)
    }
}

/// Bounded-retry generator: draw a candidate, check it against the store,
/// retry on collision.
#[derive(Debug, Clone)]
pub struct OrderNumberGenerator {
    max_attempts: u32,
}

impl Default for OrderNumberGenerator {
    fn default() -> Self {
        Self::new()
    }
}

impl OrderNumberGenerator {
    /// Retry bound. Exceeding it is fatal to the request, not the process.
    pub const MAX_ATTEMPTS: u32 = 10;

    pub fn new() -> Self {
        Self {
            max_attempts: Self::MAX_ATTEMPTS,
        }
    }

    #[cfg(test)]
    pub(crate) fn with_max_attempts(max_attempts: u32) -> Self {
        Self { max_attempts }
    }

    /// Allocate a number not currently present in `store`.
    ///
    /// A storage failure during the uniqueness check propagates immediately;
    /// the caller holds a stock reservation at this point and must
    /// compensate.
    pub async fn generate(&self, store: &dyn OrderStore) -> Result<OrderNumber, OrderError> {
        for _ in 0..self.max_attempts {
            // ThreadRng is not Send; keep it out of the await.
            let candidate = {
                let mut rng = rand::thread_rng();
                OrderNumber::candidate(Utc::now(), &mut rng)
            };
            if !store.order_number_exists(&candidate).await? {
                return Ok(candidate);
            }
        }
        Err(OrderError::OrderNumberExhausted)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::ports::StorageError;
    use chrono::TimeZone;
    use proptest::prelude::*;
    use rand::SeedableRng;
    use rand::rngs::StdRng;

    fn is_well_formed(s: &str) -> bool {
        let parts: Vec<&str> = s.split('-').collect();
        parts.len() == 3
            && parts[0] == "ORD"
            && parts[1].len() == 8
            && parts[1].chars().all(|c| c.is_ascii_digit())
            && parts[2].len() == 6
            && parts[2].chars().all(|c| c.is_ascii_digit())
    }

    #[test]
    fn candidate_embeds_the_utc_date() {
        let at = Utc.with_ymd_and_hms(2026, 8, 28, 23, 59, 59).unwrap();
        let mut rng = StdRng::seed_from_u64(7);
        let n = OrderNumber::candidate(at, &mut rng);
        assert!(n.as_str().starts_with("ORD-20260828-"));
        assert!(is_well_formed(n.as_str()));
    }

    proptest! {
        #[test]
        fn candidates_always_match_the_format(seed in any::<u64>(), secs in 0i64..4_000_000_000) {
            let at = Utc.timestamp_opt(secs, 0).unwrap();
            let mut rng = StdRng::seed_from_u64(seed);
            let n = OrderNumber::candidate(at, &mut rng);
            prop_assert!(is_well_formed(n.as_str()));
        }
    }

    /// Store stub whose uniqueness check always reports a collision.
    struct Saturated;

    #[async_trait::async_trait]
    impl OrderStore for Saturated {
        async fn insert(&self, _: &crate::order::Order) -> Result<(), StorageError> {
            unreachable!("not used by the generator")
        }
        async fn get(
            &self,
            _: scoopshop_core::OrderId,
        ) -> Result<Option<crate::order::Order>, StorageError> {
            unreachable!("not used by the generator")
        }
        async fn transition(
            &self,
            _: scoopshop_core::OrderId,
            _: crate::order::OrderStatus,
            _: crate::order::OrderStatus,
            _: Option<scoopshop_core::PaymentId>,
        ) -> Result<bool, StorageError> {
            unreachable!("not used by the generator")
        }
        async fn order_number_exists(&self, _: &OrderNumber) -> Result<bool, StorageError> {
            Ok(true)
        }
        async fn list(
            &self,
            _: crate::ports::OrderQuery,
        ) -> Result<crate::ports::OrderPage, StorageError> {
            unreachable!("not used by the generator")
        }
    }

    #[tokio::test]
    async fn generator_gives_up_after_the_retry_bound() {
        let generator = OrderNumberGenerator::with_max_attempts(3);
        let err = generator.generate(&Saturated).await.unwrap_err();
        assert_eq!(err, OrderError::OrderNumberExhausted);
    }
}
