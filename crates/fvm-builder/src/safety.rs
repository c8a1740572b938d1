//! Gas safety bounds applied to contract-call outputs.
//!
//! Every `add_contract_call` is checked against these ceilings before
//! the output is constructed, in a fixed order: price, then limit, then
//! the combined budget. The bounds are threaded explicitly through
//! builder construction so no process-wide state governs them.

/// Ceilings on the gas parameters of contract outputs.
///
/// Each field is independently overridable; the budget caps
/// `gas_price * gas_limit` regardless of either factor passing its own
/// bound.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct SafetyParams {
    /// Maximum accepted gas price.
    pub max_gas_price: u64,
    /// Maximum accepted gas limit.
    pub max_gas_limit: u64,
    /// Maximum accepted `gas_price * gas_limit`.
    pub max_gas_budget: u64,
}

impl Default for SafetyParams {
    fn default() -> Self {
        SafetyParams {
            max_gas_price: 10_000,
            max_gas_limit: 10_000_000,
            max_gas_budget: 1_000_000_000,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_defaults() {
        let params = SafetyParams::default();
        assert_eq!(params.max_gas_price, 10_000);
        assert_eq!(params.max_gas_limit, 10_000_000);
        assert_eq!(params.max_gas_budget, 1_000_000_000);
    }

    #[test]
    fn test_independent_override() {
        let params = SafetyParams {
            max_gas_limit: 100_000_000,
            ..SafetyParams::default()
        };
        assert_eq!(params.max_gas_price, 10_000);
        assert_eq!(params.max_gas_limit, 100_000_000);
        assert_eq!(params.max_gas_budget, 1_000_000_000);
    }
}
