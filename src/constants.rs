use std::time::Duration;

/// Model registry endpoint serving the pricing catalog
/// The response is a JSON list of model descriptors with per-million-token
/// price strings
pub const REGISTRY_MODELS_URL: &str = "https://openrouter.ai/api/v1/models";

/// Registry prices are quoted per million tokens; catalog entries are stored
/// per single token
pub const TOKENS_PER_MILLION: f64 = 1_000_000.0;

/// Timeout for the single registry fetch attempt
pub const FETCH_TIMEOUT: Duration = Duration::from_secs(30);

/// Overrides the registry endpoint
pub const REGISTRY_URL_ENV: &str = "LLM_USAGE_REGISTRY_URL";

/// Overrides the local snapshot location
pub const MODELS_PATH_ENV: &str = "LLM_USAGE_MODELS_PATH";

/// Model used by cost estimation when the caller names none
pub const DEFAULT_MODEL_ENV: &str = "LLM_USAGE_DEFAULT_MODEL";
