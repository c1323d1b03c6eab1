// Module declarations
pub mod catalog;
pub mod constants;
pub mod error;
pub mod registry;
pub mod types;

// Re-export commonly used items
pub use catalog::PricingCatalog;
pub use error::{Result, UsageError};
pub use registry::{HttpSource, ModelSource, Registry, RegistryModel, RegistryPricing};
pub use types::ids::ModelId;
pub use types::{
    AgentUsage, Cost, ModelPricing, ProviderUsage, ResponseUsage, RunContextUsage, UsageRecord,
};
