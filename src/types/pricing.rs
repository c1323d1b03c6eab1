use crate::constants::TOKENS_PER_MILLION;

/// Per-token prices for one catalog entry
///
/// The registry quotes prices per million tokens; entries are converted to
/// per-token once at catalog build so the cost formula is a plain multiply.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct ModelPricing {
    pub input_cost_per_token: f64,
    pub output_cost_per_token: f64,
}

impl ModelPricing {
    /// Build from the registry's per-million-token quotes
    pub fn from_per_million(prompt: f64, completion: f64) -> Self {
        Self {
            input_cost_per_token: prompt / TOKENS_PER_MILLION,
            output_cost_per_token: completion / TOKENS_PER_MILLION,
        }
    }
}
