use std::{path::Path, sync::Arc};

use anyhow::Context;
use serde::{Deserialize, Serialize};

use crate::error::{Result, RuntimeError};
use crate::op::MetaKey;

/// Nesting allowed for chained metamethod lookups before giving up.
pub const DEFAULT_MAX_META_DEPTH: usize = 100;

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct RuntimeConfig {
    /// Maximum depth of `__index`/`__newindex` chains and of metatable
    /// lookups nested inside them. `0` disables the limit.
    pub max_meta_depth: usize,
}

impl Default for RuntimeConfig {
    fn default() -> Self {
        Self {
            max_meta_depth: DEFAULT_MAX_META_DEPTH,
        }
    }
}

impl RuntimeConfig {
    pub fn from_toml_str(src: &str) -> anyhow::Result<Self> {
        toml::from_str(src).context("Invalid runtime configuration")
    }

    pub fn load(path: impl AsRef<Path>) -> anyhow::Result<Self> {
        let path = path.as_ref();
        let src = std::fs::read_to_string(path)
            .with_context(|| format!("Failed to read runtime configuration from {}", path.display()))?;
        Self::from_toml_str(&src).with_context(|| format!("In {}", path.display()))
    }
}

/// Dispatch engine. Cheap to clone; guest closures that need to re-enter
/// dispatch capture a clone.
#[derive(Debug, Clone, Default)]
pub struct Runtime {
    config: Arc<RuntimeConfig>,
}

impl Runtime {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_config(config: RuntimeConfig) -> Self {
        Self {
            config: Arc::new(config),
        }
    }

    #[inline]
    pub fn config(&self) -> &RuntimeConfig {
        &self.config
    }

    /// Step one level deeper into a metamethod chain.
    pub(crate) fn descend(&self, depth: usize, key: MetaKey) -> Result<usize> {
        let next = depth + 1;
        let limit = self.config.max_meta_depth;
        if limit != 0 && next > limit {
            tracing::warn!(target: "lrt::dispatch", key = %key, limit, "metamethod chain exceeded depth limit");
            return Err(RuntimeError::Operation(format!("'{key}' chain too long; possible loop")));
        }
        Ok(next)
    }
}
