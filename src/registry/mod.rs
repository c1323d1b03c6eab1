use crate::constants::{FETCH_TIMEOUT, MODELS_PATH_ENV, REGISTRY_MODELS_URL, REGISTRY_URL_ENV};
use crate::error::{Result, UsageError};
use crate::types::ModelId;
use serde::{Deserialize, Serialize};
use std::env;
use std::fs;
use std::path::{Path, PathBuf};
use std::sync::OnceLock;
use tracing::info;

/// Wire format of the registry's `GET /api/v1/models` response
#[derive(Debug, Clone, Deserialize, Serialize)]
pub struct RegistryResponse {
    pub data: Vec<RegistryModel>,
}

/// One model descriptor as the registry serves it
///
/// Unknown fields are ignored; the registry adds metadata freely.
#[derive(Debug, Clone, Deserialize, Serialize)]
pub struct RegistryModel {
    pub id: ModelId,
    pub name: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub context_length: Option<u64>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub architecture: Option<RegistryArchitecture>,
    pub pricing: RegistryPricing,
}

/// Price quotes as decimal strings, per million tokens
#[derive(Debug, Clone, Deserialize, Serialize)]
pub struct RegistryPricing {
    pub prompt: String,
    pub completion: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub request: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub image: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub input_cache_read: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub input_cache_write: Option<String>,
}

/// Modality metadata carried alongside pricing
#[derive(Debug, Clone, Deserialize, Serialize)]
pub struct RegistryArchitecture {
    pub modality: String,
    #[serde(default)]
    pub input_modalities: Vec<String>,
    #[serde(default)]
    pub output_modalities: Vec<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub tokenizer: Option<String>,
}

/// Where registry listings come from; the seam lets tests count fetches
#[cfg_attr(test, mockall::automock)]
pub trait ModelSource {
    fn fetch(&self) -> Result<Vec<RegistryModel>>;
}

/// Fetches the listing over HTTP; one attempt, fail-fast
pub struct HttpSource {
    url: String,
    client: reqwest::blocking::Client,
}

impl HttpSource {
    pub fn new() -> Self {
        let url = env::var(REGISTRY_URL_ENV).unwrap_or_else(|_| REGISTRY_MODELS_URL.to_string());
        Self::with_url(url)
    }

    pub fn with_url(url: impl Into<String>) -> Self {
        Self {
            url: url.into(),
            client: reqwest::blocking::Client::new(),
        }
    }
}

impl Default for HttpSource {
    fn default() -> Self {
        Self::new()
    }
}

impl ModelSource for HttpSource {
    fn fetch(&self) -> Result<Vec<RegistryModel>> {
        info!(url = %self.url, "fetching model registry");

        let response = self.client.get(&self.url).timeout(FETCH_TIMEOUT).send()?;

        let status = response.status();
        if !status.is_success() {
            return Err(UsageError::RegistryStatus { status });
        }

        let body = response.text()?;
        let parsed: RegistryResponse =
            serde_json::from_str(&body).map_err(|source| UsageError::JsonParse {
                context: "registry response".to_string(),
                source,
            })?;

        info!(models = parsed.data.len(), "registry fetch complete");
        Ok(parsed.data)
    }
}

/// Registry listing memoized for the life of the process
pub struct Registry {
    source: Box<dyn ModelSource + Send + Sync>,
    cache: OnceLock<Vec<RegistryModel>>,
}

impl Registry {
    pub fn new(source: impl ModelSource + Send + Sync + 'static) -> Self {
        Self {
            source: Box::new(source),
            cache: OnceLock::new(),
        }
    }

    pub fn http() -> Self {
        Self::new(HttpSource::new())
    }

    /// Process-wide registry backed by the HTTP source
    pub fn global() -> &'static Registry {
        static GLOBAL: OnceLock<Registry> = OnceLock::new();
        GLOBAL.get_or_init(Registry::http)
    }

    /// The model listing, fetched on first call and reused thereafter
    ///
    /// A failed fetch is not cached; the next call may try again.
    pub fn models(&self) -> Result<&[RegistryModel]> {
        if let Some(models) = self.cache.get() {
            return Ok(models.as_slice());
        }

        let fetched = self.source.fetch()?;
        Ok(self.cache.get_or_init(|| fetched).as_slice())
    }
}

/// Snapshot bundled into the crate, sorted by id
pub fn bundled_snapshot() -> Result<Vec<RegistryModel>> {
    parse_snapshot(
        include_str!("../../data/models.json"),
        Path::new("data/models.json"),
    )
}

/// Load a snapshot file previously written by `fetch-models`
pub fn load_snapshot(path: &Path) -> Result<Vec<RegistryModel>> {
    let raw = fs::read_to_string(path).map_err(|source| UsageError::SnapshotRead {
        path: path.to_path_buf(),
        source,
    })?;
    let models = parse_snapshot(&raw, path)?;
    info!(models = models.len(), path = %path.display(), "loaded pricing snapshot");
    Ok(models)
}

fn parse_snapshot(raw: &str, path: &Path) -> Result<Vec<RegistryModel>> {
    let parsed: RegistryResponse =
        serde_json::from_str(raw).map_err(|source| UsageError::JsonParse {
            context: format!("snapshot {}", path.display()),
            source,
        })?;
    Ok(parsed.data)
}

/// Write a listing as a pretty-printed snapshot, sorted by id
pub fn write_snapshot(path: &Path, models: &[RegistryModel]) -> Result<()> {
    let mut sorted = models.to_vec();
    sorted.sort_by(|a, b| a.id.as_str().cmp(b.id.as_str()));

    let json = serde_json::to_string_pretty(&RegistryResponse { data: sorted }).map_err(
        |source| UsageError::JsonParse {
            context: format!("snapshot {}", path.display()),
            source,
        },
    )?;

    if let Some(parent) = path.parent() {
        fs::create_dir_all(parent).map_err(|source| UsageError::SnapshotWrite {
            path: path.to_path_buf(),
            source,
        })?;
    }
    fs::write(path, json).map_err(|source| UsageError::SnapshotWrite {
        path: path.to_path_buf(),
        source,
    })
}

/// Preferred snapshot location: env override, then the user cache directory
pub fn snapshot_path() -> Option<PathBuf> {
    if let Ok(path) = env::var(MODELS_PATH_ENV) {
        return Some(PathBuf::from(path));
    }
    home::home_dir().map(|home| home.join(".cache/llm-usage/models.json"))
}

#[cfg(test)]
mod tests {
    use super::*;

    fn sample_model(id: &str, prompt: &str, completion: &str) -> RegistryModel {
        RegistryModel {
            id: ModelId::from(id),
            name: id.to_string(),
            context_length: Some(200_000),
            architecture: None,
            pricing: RegistryPricing {
                prompt: prompt.to_string(),
                completion: completion.to_string(),
                request: None,
                image: None,
                input_cache_read: None,
                input_cache_write: None,
            },
        }
    }

    #[test]
    fn test_models_fetches_once() {
        let mut source = MockModelSource::new();
        source
            .expect_fetch()
            .times(1)
            .returning(|| Ok(vec![sample_model("openai/gpt-4o", "2.5", "10")]));

        let registry = Registry::new(source);

        let first: Vec<String> = registry
            .models()
            .unwrap()
            .iter()
            .map(|m| m.id.to_string())
            .collect();
        let second: Vec<String> = registry
            .models()
            .unwrap()
            .iter()
            .map(|m| m.id.to_string())
            .collect();

        assert_eq!(first, second);
        assert_eq!(first, vec!["openai/gpt-4o".to_string()]);
    }

    #[test]
    fn test_failed_fetch_not_cached() {
        let mut source = MockModelSource::new();
        let mut attempts = 0;
        source.expect_fetch().times(2).returning(move || {
            attempts += 1;
            if attempts == 1 {
                Err(UsageError::RegistryStatus {
                    status: reqwest::StatusCode::INTERNAL_SERVER_ERROR,
                })
            } else {
                Ok(vec![sample_model("openai/gpt-4o", "2.5", "10")])
            }
        });

        let registry = Registry::new(source);
        assert!(registry.models().is_err());
        assert_eq!(registry.models().unwrap().len(), 1);
    }

    #[test]
    fn test_snapshot_roundtrip_sorted() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("models.json");

        let models = vec![
            sample_model("openai/gpt-4o", "2.5", "10"),
            sample_model("anthropic/claude-3-haiku", "0.25", "1.25"),
        ];
        write_snapshot(&path, &models).unwrap();

        let loaded = load_snapshot(&path).unwrap();
        assert_eq!(loaded.len(), 2);
        // Written sorted by id
        assert_eq!(loaded[0].id.as_str(), "anthropic/claude-3-haiku");
        assert_eq!(loaded[1].id.as_str(), "openai/gpt-4o");
    }

    #[test]
    fn test_missing_snapshot_file() {
        let err = load_snapshot(Path::new("/nonexistent/models.json")).unwrap_err();
        assert!(matches!(err, UsageError::SnapshotRead { .. }));
    }

    #[test]
    fn test_wire_parse_tolerates_extra_fields() {
        let json = r#"{
            "data": [{
                "id": "anthropic/claude-3-haiku",
                "canonical_slug": "anthropic/claude-3-haiku",
                "name": "Anthropic: Claude 3 Haiku",
                "created": 1709596800,
                "context_length": 200000,
                "architecture": {
                    "modality": "text+image->text",
                    "input_modalities": ["text", "image"],
                    "output_modalities": ["text"],
                    "tokenizer": "Claude",
                    "instruct_type": null
                },
                "pricing": {
                    "prompt": "0.25",
                    "completion": "1.25",
                    "request": "0",
                    "image": "0.4",
                    "web_search": "0",
                    "internal_reasoning": "0"
                },
                "top_provider": {"is_moderated": true},
                "supported_parameters": ["max_tokens"]
            }]
        }"#;

        let parsed: RegistryResponse = serde_json::from_str(json).unwrap();
        assert_eq!(parsed.data.len(), 1);

        let model = &parsed.data[0];
        assert_eq!(model.id.as_str(), "anthropic/claude-3-haiku");
        assert_eq!(model.pricing.prompt, "0.25");
        assert_eq!(model.context_length, Some(200_000));
        assert_eq!(
            model.architecture.as_ref().unwrap().modality,
            "text+image->text"
        );
    }

    #[test]
    fn test_bundled_snapshot_parses_sorted() {
        let models = bundled_snapshot().unwrap();
        assert!(!models.is_empty());

        let ids: Vec<&str> = models.iter().map(|m| m.id.as_str()).collect();
        let mut sorted = ids.clone();
        sorted.sort_unstable();
        assert_eq!(ids, sorted);
    }
}
