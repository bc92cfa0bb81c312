use crate::*;
use anyhow::{Context, Result};
use std::fs;
use std::path::Path;
use tracing::{debug, info, instrument};

#[instrument(skip(path))]
pub fn load_config<P: AsRef<Path>>(path: P) -> Result<MasterConfig> {
    let path = path.as_ref();
    info!("Loading configuration from: {:?}", path);

    let content = fs::read_to_string(path)
        .with_context(|| format!("Failed to read config file: {:?}", path))?;

    debug!("Config file content length: {} bytes", content.len());

    let substituted = substitution::substitute_env_vars(&content)?;
    debug!("Environment variable substitution completed");

    let config: MasterConfig = serde_yaml::from_str(&substituted)
        .with_context(|| "Failed to parse YAML configuration")?;

    info!("Configuration loaded successfully");
    Ok(config)
}

#[instrument]
pub fn generate_default_config() -> MasterConfig {
    use defaults::*;

    MasterConfig {
        exchange: ExchangeConfig {
            name: "My Exchange".to_string(),
            symbols: default_symbols(),
        },
        logging: LoggingConfig {
            format: default_log_format(),
            level: default_log_level(),
        },
        matching_engine: MatchingEngineConfig {
            orderbook_store: OrderbookStoreConfig {
                store_type: "in_memory".to_string(),
                redis: None,
            },
            publishing: PublishingConfig {
                snapshot_depth: default_depth_levels(),
                snapshot_throttle_ms: default_snapshot_throttle_ms(),
            },
        },
    }
}

#[instrument]
pub fn save_config<P: AsRef<Path> + std::fmt::Debug>(config: &MasterConfig, path: P) -> Result<()> {
    let path = path.as_ref();
    info!("Saving configuration to: {:?}", path);

    let yaml = serde_yaml::to_string(config)
        .with_context(|| "Failed to serialize configuration to YAML")?;

    fs::write(path, yaml)
        .with_context(|| format!("Failed to write config file: {:?}", path))?;

    info!("Configuration saved successfully");
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_generate_default_config_is_valid() {
        let config = generate_default_config();
        let report = validator::validate_config(&config);
        assert!(report.is_valid(), "errors: {:?}", report.errors);
    }

    #[test]
    fn test_save_and_load_roundtrip() {
        let config = generate_default_config();
        let dir = std::env::temp_dir();
        let path = dir.join("matching_engine_config_roundtrip_test.yaml");

        save_config(&config, &path).unwrap();
        let loaded = load_config(&path).unwrap();

        assert_eq!(loaded.exchange.name, config.exchange.name);
        assert_eq!(
            loaded.matching_engine.orderbook_store.store_type,
            config.matching_engine.orderbook_store.store_type
        );

        let _ = fs::remove_file(&path);
    }
}
