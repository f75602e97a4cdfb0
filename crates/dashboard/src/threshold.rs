use std::collections::HashMap;

use crate::Sku;

/// Global default low-stock threshold: cells with `on_hand` strictly below
/// this are flagged when no per-product override applies.
pub const DEFAULT_LOW_STOCK_THRESHOLD: i64 = 10;

/// Low-stock threshold configuration.
///
/// A global default with optional per-SKU overrides. The source system
/// never pinned a concrete threshold, so it is configuration here rather
/// than a business rule.
#[derive(Debug, Clone)]
pub struct ThresholdPolicy {
    default: i64,
    overrides: HashMap<Sku, i64>,
}

impl ThresholdPolicy {
    /// Creates a policy with the given global default and no overrides.
    pub fn new(default: i64) -> Self {
        Self {
            default,
            overrides: HashMap::new(),
        }
    }

    /// Adds a per-SKU override.
    pub fn with_override(mut self, sku: impl Into<Sku>, threshold: i64) -> Self {
        self.overrides.insert(sku.into(), threshold);
        self
    }

    /// Returns the global default threshold.
    pub fn default_threshold(&self) -> i64 {
        self.default
    }

    /// Returns the threshold for a SKU: its override, or the global default.
    pub fn threshold_for(&self, sku: &Sku) -> i64 {
        self.overrides.get(sku).copied().unwrap_or(self.default)
    }
}

impl Default for ThresholdPolicy {
    fn default() -> Self {
        Self::new(DEFAULT_LOW_STOCK_THRESHOLD)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn default_policy_uses_documented_threshold() {
        let policy = ThresholdPolicy::default();
        assert_eq!(policy.default_threshold(), DEFAULT_LOW_STOCK_THRESHOLD);
        assert_eq!(policy.threshold_for(&Sku::new("SKU-1")), 10);
    }

    #[test]
    fn override_beats_default_for_its_sku_only() {
        let policy = ThresholdPolicy::new(5).with_override("SKU-BULK", 100);
        assert_eq!(policy.threshold_for(&Sku::new("SKU-BULK")), 100);
        assert_eq!(policy.threshold_for(&Sku::new("SKU-1")), 5);
    }
}
