//! Configuration management for interactome services.
//!
//! Configuration is loaded from (in priority order):
//! 1. Environment variables (`INTERACTOME__` prefix, `__` separated, e.g.
//!    `INTERACTOME__BUILD__MAX_GAP=4`)
//! 2. Config file (`interactome.toml` by default)
//! 3. Defaults

use serde::Deserialize;

use crate::error::Result;

/// Top-level configuration.
#[derive(Debug, Clone, Default, Deserialize)]
#[serde(default)]
pub struct InteractomeConfig {
    pub neo4j: Neo4jSettings,
    pub build: BuildSettings,
    pub archive: ArchiveSettings,
}

/// Connection settings for the Neo4j-backed graph source.
#[derive(Debug, Clone, Deserialize)]
#[serde(default)]
pub struct Neo4jSettings {
    pub uri: String,
    pub user: String,
    pub password: String,
    pub max_connections: u32,
    pub fetch_size: usize,
}

impl Default for Neo4jSettings {
    fn default() -> Self {
        Self {
            uri: "bolt://localhost:7687".to_string(),
            user: "neo4j".to_string(),
            password: "interactome-dev".to_string(),
            max_connections: 16,
            fetch_size: 256,
        }
    }
}

/// Limits applied by the network builder.
#[derive(Debug, Clone, Deserialize)]
#[serde(default)]
pub struct BuildSettings {
    /// Largest gap a Gap-mode request may ask for.
    pub max_gap: u32,
}

impl Default for BuildSettings {
    fn default() -> Self {
        Self { max_gap: 10 }
    }
}

/// Where finished networks are archived, if anywhere.
#[derive(Debug, Clone, Default, Deserialize)]
#[serde(default)]
pub struct ArchiveSettings {
    pub dir: Option<String>,
}

impl InteractomeConfig {
    /// Load configuration from `{file_prefix}.{toml,json,yaml,...}` (optional)
    /// overlaid with `INTERACTOME__*` environment variables.
    pub fn load(file_prefix: &str) -> Result<Self> {
        let cfg = config::Config::builder()
            .add_source(config::File::with_name(file_prefix).required(false))
            .add_source(
                config::Environment::with_prefix("INTERACTOME")
                    .separator("__")
                    .try_parsing(true),
            )
            .build()?;

        let loaded: Self = cfg.try_deserialize()?;
        tracing::debug!(
            neo4j_uri = %loaded.neo4j.uri,
            max_gap = loaded.build.max_gap,
            "Configuration loaded"
        );
        Ok(loaded)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_default_config() {
        let config = InteractomeConfig::default();
        assert_eq!(config.neo4j.uri, "bolt://localhost:7687");
        assert_eq!(config.neo4j.max_connections, 16);
        assert_eq!(config.build.max_gap, 10);
        assert!(config.archive.dir.is_none());
    }

    #[test]
    fn test_missing_file_falls_back_to_defaults() {
        let dir = tempfile::tempdir().unwrap();
        let prefix = dir.path().join("absent");
        let config = InteractomeConfig::load(prefix.to_str().unwrap()).unwrap();
        assert_eq!(config.build.max_gap, 10);
    }

    #[test]
    fn test_file_overrides_defaults() {
        let dir = tempfile::tempdir().unwrap();
        std::fs::write(
            dir.path().join("interactome.toml"),
            "[build]\nmax_gap = 3\n\n[neo4j]\nuri = \"bolt://graph:7687\"\n\n[archive]\ndir = \"/var/lib/interactome\"\n",
        )
        .unwrap();

        let prefix = dir.path().join("interactome");
        let config = InteractomeConfig::load(prefix.to_str().unwrap()).unwrap();
        assert_eq!(config.build.max_gap, 3);
        assert_eq!(config.neo4j.uri, "bolt://graph:7687");
        assert_eq!(config.neo4j.user, "neo4j");
        assert_eq!(config.archive.dir.as_deref(), Some("/var/lib/interactome"));
    }
}
