use crate::*;
use thiserror::Error;

#[derive(Error, Debug, Clone)]
pub enum ValidationError {
    #[error("Exchange name is required")]
    MissingExchangeName,

    #[error("No trading symbols configured")]
    NoSymbols,

    #[error("Invalid log format: {0}. Must be one of: pretty, json, compact")]
    InvalidLogFormat(String),

    #[error("Invalid log level: {0}")]
    InvalidLogLevel(String),

    #[error("Invalid orderbook_store type: {0}. Must be one of: in_memory, redis")]
    InvalidStoreType(String),

    #[error("orderbook_store type is 'redis' but no redis configuration was provided")]
    MissingRedisConfig,

    #[error("Redis host must not be empty")]
    EmptyRedisHost,

    #[error("{field} must be a positive integer")]
    InvalidPositiveInteger { field: String },
}

#[derive(Debug, Clone)]
pub struct ValidationWarning {
    pub field: String,
    pub message: String,
}

#[derive(Debug, Clone)]
pub struct ValidationReport {
    pub errors: Vec<ValidationError>,
    pub warnings: Vec<ValidationWarning>,
}

impl ValidationReport {
    pub fn new() -> Self {
        Self {
            errors: Vec::new(),
            warnings: Vec::new(),
        }
    }

    pub fn is_valid(&self) -> bool {
        self.errors.is_empty()
    }

    pub fn add_error(&mut self, error: ValidationError) {
        self.errors.push(error);
    }

    pub fn add_warning(&mut self, field: &str, message: &str) {
        self.warnings.push(ValidationWarning {
            field: field.to_string(),
            message: message.to_string(),
        });
    }
}

impl Default for ValidationReport {
    fn default() -> Self {
        Self::new()
    }
}

pub fn validate_config(config: &MasterConfig) -> ValidationReport {
    let mut report = ValidationReport::new();

    validate_exchange(&config.exchange, &mut report);
    validate_logging(&config.logging, &mut report);
    validate_matching_engine(&config.matching_engine, &mut report);

    report
}

fn validate_exchange(exchange: &ExchangeConfig, report: &mut ValidationReport) {
    if exchange.name.is_empty() {
        report.add_error(ValidationError::MissingExchangeName);
    }

    if exchange.symbols.is_empty() {
        report.add_error(ValidationError::NoSymbols);
    }
}

fn validate_logging(logging: &LoggingConfig, report: &mut ValidationReport) {
    let valid_formats = ["pretty", "json", "compact"];
    if !valid_formats.contains(&logging.format.as_str()) {
        report.add_error(ValidationError::InvalidLogFormat(logging.format.clone()));
    }

    let valid_levels = ["trace", "debug", "info", "warn", "error"];
    if !valid_levels.contains(&logging.level.as_str()) {
        report.add_error(ValidationError::InvalidLogLevel(logging.level.clone()));
    }
}

fn validate_matching_engine(engine: &MatchingEngineConfig, report: &mut ValidationReport) {
    let valid_store_types = ["in_memory", "redis"];
    if !valid_store_types.contains(&engine.orderbook_store.store_type.as_str()) {
        report.add_error(ValidationError::InvalidStoreType(
            engine.orderbook_store.store_type.clone(),
        ));
    }

    if engine.orderbook_store.store_type == "redis" {
        match &engine.orderbook_store.redis {
            Some(redis) if redis.host.is_empty() => {
                report.add_error(ValidationError::EmptyRedisHost);
            }
            None => report.add_error(ValidationError::MissingRedisConfig),
            _ => {}
        }
    }

    if engine.publishing.snapshot_depth == 0 {
        report.add_error(ValidationError::InvalidPositiveInteger {
            field: "publishing.snapshot_depth".to_string(),
        });
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn base_config() -> MasterConfig {
        parser::generate_default_config()
    }

    #[test]
    fn test_default_config_passes_validation() {
        let report = validate_config(&base_config());
        assert!(report.is_valid());
    }

    #[test]
    fn test_missing_exchange_name_is_rejected() {
        let mut config = base_config();
        config.exchange.name = String::new();
        let report = validate_config(&config);
        assert!(!report.is_valid());
    }

    #[test]
    fn test_redis_store_without_redis_config_is_rejected() {
        let mut config = base_config();
        config.matching_engine.orderbook_store.store_type = "redis".to_string();
        config.matching_engine.orderbook_store.redis = None;
        let report = validate_config(&config);
        assert!(!report.is_valid());
        assert!(matches!(
            report.errors[0],
            ValidationError::MissingRedisConfig
        ));
    }

    #[test]
    fn test_unknown_store_type_is_rejected() {
        let mut config = base_config();
        config.matching_engine.orderbook_store.store_type = "sqlite".to_string();
        let report = validate_config(&config);
        assert!(!report.is_valid());
    }
}
