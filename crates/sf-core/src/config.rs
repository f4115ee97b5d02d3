use crate::equality::EqualityMode;
use crate::error::Result;
use serde::{Deserialize, Serialize};

#[derive(Debug, Clone, Default, Serialize, Deserialize, PartialEq, Eq)]
pub struct SeqflowConfig {
    #[serde(default)]
    pub unique: UniqueConfig,
}

/// Settings for the uniqueness filter.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
pub struct UniqueConfig {
    #[serde(default)]
    pub mode: EqualityMode,
    /// Look up hashable scalars in a hash set instead of scanning.
    /// Only takes effect in strict mode; output is identical either way.
    #[serde(default)]
    pub scalar_fast_path: bool,
}

impl Default for UniqueConfig {
    fn default() -> Self {
        Self {
            mode: EqualityMode::Strict,
            scalar_fast_path: false,
        }
    }
}

impl UniqueConfig {
    pub fn new(mode: EqualityMode) -> Self {
        Self { mode, ..Self::default() }
    }

    pub fn with_fast_path(mut self, enabled: bool) -> Self {
        self.scalar_fast_path = enabled;
        self
    }

    /// Whether the hash set lookup is actually used.
    pub fn uses_fast_path(&self) -> bool {
        self.scalar_fast_path && self.mode == EqualityMode::Strict
    }
}

impl SeqflowConfig {
    pub fn from_json(text: &str) -> Result<Self> {
        Ok(serde_json::from_str(text)?)
    }

    pub fn to_json(&self) -> Result<String> {
        Ok(serde_json::to_string_pretty(self)?)
    }
}
