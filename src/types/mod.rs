pub mod cost;
pub mod ids;
pub mod input;
pub mod pricing;
pub mod usage;

pub use cost::Cost;
pub use ids::{ModelId, normalize_model_name};
pub use input::{
    AgentUsage, InputTokensDetails, OutputTokensDetails, ProviderUsage, ResponseUsage,
    RunContextUsage,
};
pub use pricing::ModelPricing;
pub use usage::UsageRecord;
