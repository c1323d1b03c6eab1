use super::input::{AgentUsage, ProviderUsage, ResponseUsage};
use crate::error::{Result, UsageError};
use serde::{Deserialize, Serialize};

/// Canonical token/request counts for one or more API calls
///
/// Created per call via normalization, then grown only through additive
/// merge. `total_tokens == input_tokens + output_tokens` is expected from
/// well-behaved providers but not enforced.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct UsageRecord {
    pub requests: u64,
    pub input_tokens: u64,
    pub output_tokens: u64,
    pub total_tokens: u64,
    /// Input tokens served from the provider-side cache
    #[serde(default)]
    pub cached_input_tokens: u64,
    /// Output tokens consumed by internal model reasoning
    #[serde(default)]
    pub reasoning_output_tokens: u64,
}

impl UsageRecord {
    /// Normalize a provider usage payload into a record for one call
    ///
    /// `requests` is always 1, even for agent usages that carry their own
    /// counter. Detail sub-objects flatten into the two detail fields,
    /// defaulting to 0 when absent.
    pub fn from_provider(usage: &ProviderUsage) -> Self {
        match usage {
            ProviderUsage::Response(response) => Self::from_response(response),
            ProviderUsage::Agent(agent) => Self::from_agent(agent),
            ProviderUsage::Context(wrapper) => Self::from_agent(&wrapper.usage),
        }
    }

    /// Normalize a raw JSON usage object
    ///
    /// Fails with [`UsageError::UnsupportedInput`] when the value matches
    /// none of the three accepted shapes.
    pub fn from_json(value: &serde_json::Value) -> Result<Self> {
        let parsed: ProviderUsage =
            serde_json::from_value(value.clone()).map_err(|_| UsageError::UnsupportedInput)?;
        Ok(Self::from_provider(&parsed))
    }

    fn from_response(usage: &ResponseUsage) -> Self {
        Self {
            requests: 1,
            input_tokens: usage.input_tokens,
            output_tokens: usage.output_tokens,
            total_tokens: usage.total_tokens,
            cached_input_tokens: usage
                .input_tokens_details
                .as_ref()
                .map(|d| d.cached_tokens)
                .unwrap_or(0),
            reasoning_output_tokens: usage
                .output_tokens_details
                .as_ref()
                .map(|d| d.reasoning_tokens)
                .unwrap_or(0),
        }
    }

    fn from_agent(usage: &AgentUsage) -> Self {
        Self {
            requests: 1,
            input_tokens: usage.input_tokens,
            output_tokens: usage.output_tokens,
            total_tokens: usage.total_tokens,
            cached_input_tokens: usage
                .input_tokens_details
                .as_ref()
                .map(|d| d.cached_tokens)
                .unwrap_or(0),
            reasoning_output_tokens: usage
                .output_tokens_details
                .as_ref()
                .map(|d| d.reasoning_tokens)
                .unwrap_or(0),
        }
    }

    /// Merge another record into this one (accumulate)
    ///
    /// Every field sums independently, detail fields included.
    pub fn add(&mut self, other: &UsageRecord) {
        self.requests += other.requests;
        self.input_tokens += other.input_tokens;
        self.output_tokens += other.output_tokens;
        self.total_tokens += other.total_tokens;
        self.cached_input_tokens += other.cached_input_tokens;
        self.reasoning_output_tokens += other.reasoning_output_tokens;
    }
}

impl std::ops::Add for UsageRecord {
    type Output = UsageRecord;

    fn add(mut self, other: UsageRecord) -> UsageRecord {
        UsageRecord::add(&mut self, &other);
        self
    }
}
