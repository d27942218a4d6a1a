//! Parallelism settings for per-file extraction.

use serde::{Deserialize, Serialize};

fn default_enabled() -> bool {
    true
}

/// Controls how files are spread over rayon workers.
///
/// ```rust
/// use dimap::config::ParallelConfig;
///
/// let config: ParallelConfig = toml::from_str("jobs = 4").unwrap();
/// assert!(config.enabled);
/// assert_eq!(config.jobs, 4);
/// ```
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
pub struct ParallelConfig {
    /// When disabled, files are extracted sequentially.
    #[serde(default = "default_enabled")]
    pub enabled: bool,

    /// Worker threads; `0` uses rayon's global pool.
    #[serde(default)]
    pub jobs: usize,
}

impl Default for ParallelConfig {
    fn default() -> Self {
        Self {
            enabled: default_enabled(),
            jobs: 0,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_empty_section_uses_defaults() {
        let config: ParallelConfig = toml::from_str("").unwrap();
        assert_eq!(config, ParallelConfig::default());
    }

    #[test]
    fn test_disable_parallelism() {
        let config: ParallelConfig = toml::from_str("enabled = false").unwrap();
        assert!(!config.enabled);
        assert_eq!(config.jobs, 0);
    }
}
