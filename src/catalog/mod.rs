use crate::error::{Result, UsageError};
use crate::registry::{self, Registry, RegistryModel};
use crate::types::{Cost, ModelId, ModelPricing, UsageRecord, normalize_model_name};
use chrono::{DateTime, Utc};
use std::collections::HashMap;
use std::env;
use std::path::Path;
use std::sync::OnceLock;
use tracing::{debug, warn};

/// Cost formula over per-token prices
///
/// Cached and reasoning tokens are already counted inside the input/output
/// totals; they carry no separate price here.
fn calculate_cost(usage: &UsageRecord, pricing: &ModelPricing) -> Cost {
    let cost = usage.input_tokens as f64 * pricing.input_cost_per_token
        + usage.output_tokens as f64 * pricing.output_cost_per_token;
    Cost::new(cost)
}

/// Immutable per-model price table keyed by canonical registry id
///
/// Built once from a snapshot or the live registry, read-only afterwards.
pub struct PricingCatalog {
    entries: HashMap<ModelId, ModelPricing>,
    // Fuzzy-lookup indexes; ties go to the first id in sorted order
    by_normalized: HashMap<String, ModelId>,
    by_bare_name: HashMap<String, ModelId>,
    default_model: Option<ModelId>,
    loaded_at: DateTime<Utc>,
}

impl PricingCatalog {
    /// Build from registry descriptors, converting per-million quotes to
    /// per-token prices
    ///
    /// Entries whose price strings do not parse are skipped.
    pub fn from_models(models: &[RegistryModel]) -> Self {
        let mut sorted: Vec<&RegistryModel> = models.iter().collect();
        sorted.sort_by(|a, b| a.id.as_str().cmp(b.id.as_str()));

        let mut entries = HashMap::with_capacity(sorted.len());
        let mut by_normalized = HashMap::with_capacity(sorted.len());
        let mut by_bare_name: HashMap<String, ModelId> = HashMap::new();

        for model in sorted {
            let (Ok(prompt), Ok(completion)) = (
                model.pricing.prompt.parse::<f64>(),
                model.pricing.completion.parse::<f64>(),
            ) else {
                warn!(model = %model.id, "skipping entry with unparsable price");
                continue;
            };

            entries.insert(
                model.id.clone(),
                ModelPricing::from_per_million(prompt, completion),
            );
            by_normalized
                .entry(model.id.normalized())
                .or_insert_with(|| model.id.clone());
            by_bare_name
                .entry(normalize_model_name(model.id.bare_name()))
                .or_insert_with(|| model.id.clone());
        }

        Self {
            entries,
            by_normalized,
            by_bare_name,
            default_model: default_model_from_env(),
            loaded_at: Utc::now(),
        }
    }

    /// Catalog from the snapshot bundled into the crate
    pub fn bundled() -> Result<Self> {
        Ok(Self::from_models(&registry::bundled_snapshot()?))
    }

    /// Catalog from a snapshot file written by `fetch-models`
    pub fn from_snapshot_file(path: &Path) -> Result<Self> {
        Ok(Self::from_models(&registry::load_snapshot(path)?))
    }

    /// Default catalog: the user snapshot when present, else the bundled one
    pub fn load() -> Result<Self> {
        if let Some(path) = registry::snapshot_path()
            && path.exists()
        {
            return Self::from_snapshot_file(&path);
        }
        Self::bundled()
    }

    /// Catalog over the live registry listing (memoized fetch)
    pub fn from_registry() -> Result<Self> {
        Ok(Self::from_models(Registry::global().models()?))
    }

    // Built once per process; realtime estimation reuses it across calls
    fn registry_catalog() -> Result<&'static PricingCatalog> {
        static CATALOG: OnceLock<PricingCatalog> = OnceLock::new();
        if let Some(catalog) = CATALOG.get() {
            return Ok(catalog);
        }
        let built = Self::from_registry()?;
        Ok(CATALOG.get_or_init(|| built))
    }

    /// Set the model used when the caller names none
    pub fn with_default_model(mut self, model: impl Into<ModelId>) -> Self {
        self.default_model = Some(model.into());
        self
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    pub fn loaded_at(&self) -> DateTime<Utc> {
        self.loaded_at
    }

    pub fn default_model(&self) -> Option<&ModelId> {
        self.default_model.as_ref()
    }

    /// Resolve a requested name: exact id, then punctuation-normalized,
    /// then the bare name without its provider prefix
    pub fn resolve(&self, model: &ModelId) -> Option<(&ModelId, &ModelPricing)> {
        if let Some(entry) = self.entries.get_key_value(model) {
            debug!(model = %model, "exact pricing match");
            return Some(entry);
        }

        if let Some(id) = self.by_normalized.get(&model.normalized()) {
            debug!(model = %model, resolved = %id, "normalized pricing match");
            return self.entries.get_key_value(id);
        }

        if let Some(id) = self.by_bare_name.get(&normalize_model_name(model.bare_name())) {
            debug!(model = %model, resolved = %id, "bare-name pricing match");
            return self.entries.get_key_value(id);
        }

        debug!(model = %model, "no pricing match");
        None
    }

    /// Estimate cost for a usage record against this catalog
    ///
    /// Falls back to the configured default model when `model` is `None`.
    pub fn estimate_cost(&self, usage: &UsageRecord, model: Option<&ModelId>) -> Result<Cost> {
        self.estimate_cost_with(usage, model, false)
    }

    /// Like [`Self::estimate_cost`], optionally consulting the live
    /// registry when the local catalog has no entry
    ///
    /// The registry listing is fetched at most once per process; a fetch
    /// failure propagates as the registry error.
    pub fn estimate_cost_with(
        &self,
        usage: &UsageRecord,
        model: Option<&ModelId>,
        realtime_pricing: bool,
    ) -> Result<Cost> {
        let Some(model) = model.or(self.default_model.as_ref()) else {
            return Err(UsageError::DefaultModelMissing);
        };

        if let Some((_, pricing)) = self.resolve(model) {
            return Ok(calculate_cost(usage, pricing));
        }

        if realtime_pricing
            && let Some((_, pricing)) = Self::registry_catalog()?.resolve(model)
        {
            return Ok(calculate_cost(usage, pricing));
        }

        Err(UsageError::ModelNotFound {
            model: model.to_string(),
        })
    }
}

fn default_model_from_env() -> Option<ModelId> {
    env::var(crate::constants::DEFAULT_MODEL_ENV)
        .ok()
        .filter(|value| !value.is_empty())
        .map(ModelId::from)
}
