use serde::{Deserialize, Serialize};
use std::fmt;

/// NewType wrapper for a model identifier
///
/// Canonical form is the provider-qualified registry id, e.g.
/// `anthropic/claude-3-haiku`, but callers may hold any naming variant.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Deserialize, Serialize)]
#[serde(transparent)]
pub struct ModelId(String);

impl ModelId {
    /// Create a new ModelId
    pub fn new(id: impl Into<String>) -> Self {
        Self(id.into())
    }

    /// Get the inner string value
    pub fn as_str(&self) -> &str {
        &self.0
    }

    /// Consume self and return the inner String
    pub fn into_inner(self) -> String {
        self.0
    }

    /// Normalized form used for fuzzy catalog lookup
    pub fn normalized(&self) -> String {
        normalize_model_name(&self.0)
    }

    /// The name without its `provider/` qualifier, if any
    pub fn bare_name(&self) -> &str {
        self.0
            .rsplit_once('/')
            .map(|(_, name)| name)
            .unwrap_or(&self.0)
    }
}

impl fmt::Display for ModelId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0)
    }
}

impl From<String> for ModelId {
    fn from(s: String) -> Self {
        Self(s)
    }
}

impl From<&str> for ModelId {
    fn from(s: &str) -> Self {
        Self(s.to_string())
    }
}

impl AsRef<str> for ModelId {
    fn as_ref(&self) -> &str {
        &self.0
    }
}

/// Lowercase a model name and collapse `.`, `:`, `_` and `-` runs into a
/// single `-`, so naming variants across providers compare equal
/// (`claude-3.7-sonnet` == `claude-3-7-sonnet`, `kimi-k2:thinking` ==
/// `kimi-k2-thinking`). The `/` separating provider from name is kept.
pub fn normalize_model_name(name: &str) -> String {
    let mut out = String::with_capacity(name.len());
    let mut pending_sep = false;

    for c in name.chars() {
        match c {
            '.' | ':' | '_' | '-' => pending_sep = true,
            _ => {
                if pending_sep {
                    if !out.is_empty() && !out.ends_with('/') {
                        out.push('-');
                    }
                    pending_sep = false;
                }
                for lower in c.to_lowercase() {
                    out.push(lower);
                }
            }
        }
    }

    out
}
