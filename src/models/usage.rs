use std::ops::Add;

use serde::{Deserialize, Serialize};

/// Token usage reported by a single model invocation.
///
/// Invariant: `total_tokens == prompt_tokens + completion_tokens`. The zero
/// record stands in for stages skipped by the fallback path so aggregation
/// always sums exactly three records.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct Usage {
    pub prompt_tokens: u64,
    pub completion_tokens: u64,
    pub total_tokens: u64,
}

impl Usage {
    pub fn new(prompt_tokens: u64, completion_tokens: u64) -> Self {
        Self {
            prompt_tokens,
            completion_tokens,
            total_tokens: prompt_tokens + completion_tokens,
        }
    }

    /// Placeholder for a stage that made no model call.
    pub fn zero() -> Self {
        Self::default()
    }

    pub fn is_consistent(&self) -> bool {
        self.total_tokens == self.prompt_tokens + self.completion_tokens
    }

    /// Component-wise sum over all records.
    pub fn aggregate(usages: &[Usage]) -> Usage {
        usages.iter().fold(Usage::zero(), |acc, u| acc + *u)
    }
}

impl Add for Usage {
    type Output = Usage;

    fn add(self, rhs: Usage) -> Usage {
        Usage {
            prompt_tokens: self.prompt_tokens + rhs.prompt_tokens,
            completion_tokens: self.completion_tokens + rhs.completion_tokens,
            total_tokens: self.total_tokens + rhs.total_tokens,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_aggregate_is_order_independent() {
        let a = Usage::new(10, 5);
        let b = Usage::new(100, 20);
        let c = Usage::zero();

        assert_eq!(Usage::aggregate(&[a, b, c]), Usage::aggregate(&[c, b, a]));
    }

    #[test]
    fn test_aggregate_preserves_total_invariant() {
        let a = Usage::new(10, 5);
        let b = Usage::new(7, 3);
        let sum = Usage::aggregate(&[a, b, Usage::zero()]);

        assert!(sum.is_consistent());
        assert_eq!(sum.prompt_tokens, 17);
        assert_eq!(sum.completion_tokens, 8);
        assert_eq!(sum.total_tokens, 25);
    }

    #[test]
    fn test_zero_is_identity() {
        let a = Usage::new(42, 8);
        assert_eq!(a + Usage::zero(), a);
    }
}
