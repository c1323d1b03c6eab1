use serde::Deserialize;

// External usage payloads as the provider SDKs emit them. Three shapes are
// accepted; anything else is rejected during normalization.

/// Response-style usage: token counts with optional detail sub-objects
#[derive(Debug, Clone, Deserialize)]
pub struct ResponseUsage {
    pub input_tokens: u64,
    #[serde(default)]
    pub input_tokens_details: Option<InputTokensDetails>,
    pub output_tokens: u64,
    #[serde(default)]
    pub output_tokens_details: Option<OutputTokensDetails>,
    pub total_tokens: u64,
}

/// Agent-runner usage: same counts plus the runner's own request counter
#[derive(Debug, Clone, Deserialize)]
pub struct AgentUsage {
    pub requests: u64,
    pub input_tokens: u64,
    #[serde(default)]
    pub input_tokens_details: Option<InputTokensDetails>,
    pub output_tokens: u64,
    #[serde(default)]
    pub output_tokens_details: Option<OutputTokensDetails>,
    pub total_tokens: u64,
}

/// Run-context wrapper nesting an agent usage under `usage`
#[derive(Debug, Clone, Deserialize)]
pub struct RunContextUsage {
    pub usage: AgentUsage,
}

#[derive(Debug, Clone, Default, Deserialize)]
pub struct InputTokensDetails {
    #[serde(default)]
    pub cached_tokens: u64,
}

#[derive(Debug, Clone, Default, Deserialize)]
pub struct OutputTokensDetails {
    #[serde(default)]
    pub reasoning_tokens: u64,
}

/// Sum type over the accepted provider shapes
///
/// Variant order matters for untagged deserialization: the wrapper is the
/// only shape with a `usage` field, and agent usage is the only one with a
/// `requests` field, so each payload matches exactly one variant.
#[derive(Debug, Clone, Deserialize)]
#[serde(untagged)]
pub enum ProviderUsage {
    Context(RunContextUsage),
    Agent(AgentUsage),
    Response(ResponseUsage),
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_response_shape_parses() {
        let json = r#"{
            "input_tokens": 10,
            "input_tokens_details": {"cached_tokens": 5},
            "output_tokens": 20,
            "output_tokens_details": {"reasoning_tokens": 8},
            "total_tokens": 30
        }"#;

        let parsed: ProviderUsage = serde_json::from_str(json).unwrap();
        let ProviderUsage::Response(usage) = parsed else {
            panic!("expected response variant");
        };
        assert_eq!(usage.input_tokens, 10);
        assert_eq!(usage.input_tokens_details.unwrap().cached_tokens, 5);
        assert_eq!(usage.output_tokens_details.unwrap().reasoning_tokens, 8);
    }

    #[test]
    fn test_agent_shape_wins_over_response() {
        // Carries a `requests` counter, so it must not fall through to the
        // response variant
        let json = r#"{
            "requests": 3,
            "input_tokens": 10,
            "output_tokens": 20,
            "total_tokens": 30
        }"#;

        let parsed: ProviderUsage = serde_json::from_str(json).unwrap();
        assert!(matches!(parsed, ProviderUsage::Agent(_)));
    }

    #[test]
    fn test_context_wrapper_parses() {
        let json = r#"{
            "usage": {
                "requests": 1,
                "input_tokens": 10,
                "output_tokens": 20,
                "total_tokens": 30
            }
        }"#;

        let parsed: ProviderUsage = serde_json::from_str(json).unwrap();
        let ProviderUsage::Context(wrapper) = parsed else {
            panic!("expected context variant");
        };
        assert_eq!(wrapper.usage.requests, 1);
        assert_eq!(wrapper.usage.total_tokens, 30);
    }

    #[test]
    fn test_unknown_shape_rejected() {
        let json = r#"{"prompt_chars": 42}"#;
        assert!(serde_json::from_str::<ProviderUsage>(json).is_err());
    }

    #[test]
    fn test_missing_details_default_absent() {
        let json = r#"{"input_tokens": 1, "output_tokens": 2, "total_tokens": 3}"#;
        let parsed: ProviderUsage = serde_json::from_str(json).unwrap();
        let ProviderUsage::Response(usage) = parsed else {
            panic!("expected response variant");
        };
        assert!(usage.input_tokens_details.is_none());
        assert!(usage.output_tokens_details.is_none());
    }
}
