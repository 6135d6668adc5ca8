//! Worker pool configuration.

use tidaldl_core::Settings;
use tidaldl_core::settings::MAX_WORKERS_LIMIT;

/// Environment variable overriding the pool bound.
pub const MAX_WORKERS_ENV: &str = "TIDALDL_MAX_WORKERS";

/// Configuration for the worker pool.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct PoolConfig {
    /// Maximum number of jobs running at once.
    pub max_concurrency: usize,
}

impl Default for PoolConfig {
    fn default() -> Self {
        Self {
            max_concurrency: num_cpus::get().max(1),
        }
    }
}

impl PoolConfig {
    /// Set the maximum concurrency (clamped to at least one slot).
    #[must_use]
    pub fn with_max_concurrency(mut self, max: usize) -> Self {
        self.max_concurrency = max.clamp(1, MAX_WORKERS_LIMIT);
        self
    }

    /// Derive the pool bound from settings, then apply the env override.
    pub fn from_settings(settings: &Settings) -> Self {
        Self::from_settings_and_env(settings, std::env::var(MAX_WORKERS_ENV).ok().as_deref())
    }

    fn from_settings_and_env(settings: &Settings, env_value: Option<&str>) -> Self {
        let config = settings
            .max_workers
            .map_or_else(Self::default, |max| Self::default().with_max_concurrency(max));
        config.apply_env_override(env_value)
    }

    fn apply_env_override(self, value: Option<&str>) -> Self {
        let Some(raw) = value else {
            return self;
        };
        match raw.trim().parse::<usize>() {
            Ok(max) if max > 0 => self.with_max_concurrency(max),
            _ => {
                tracing::warn!(
                    target: "tidaldl.pool",
                    value = raw,
                    "Ignoring invalid {MAX_WORKERS_ENV}"
                );
                self
            }
        }
    }
}
