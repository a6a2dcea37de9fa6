use rust_decimal::Decimal;
use std::path::Path;

// Declare the modules that make up this crate.
pub mod error;
pub mod settings;

// Re-export the core types to provide a clean public API.
pub use error::ConfigError;
pub use settings::{AnalyticsSettings, Config, DataSettings, DisplaySettings, LoggingSettings};

/// Prefix of environment variables that override file settings,
/// e.g. `GSE__ANALYTICS__RISK_FREE_RATE=0.1`.
pub const ENV_PREFIX: &str = "GSE";

/// Loads the application configuration.
///
/// Built-in defaults are overlaid by the TOML file at `path` (which may be absent)
/// and then by `GSE__`-prefixed environment variables. The result is validated
/// before it is returned.
pub fn load_config(path: &Path) -> Result<Config, ConfigError> {
    let builder = config::Config::builder()
        .set_default("analytics.risk_free_rate", "0.112")?
        .set_default("data.path", "public/gse_data.json")?
        .set_default("display.default_window", "1Y")?
        .set_default("logging.file_prefix", "gse-watch.log")?
        .add_source(config::File::from(path).required(false))
        .add_source(config::Environment::with_prefix(ENV_PREFIX).separator("__"))
        .build()?;

    // Attempt to deserialize the entire configuration into our `Config` struct
    let config = builder.try_deserialize::<Config>()?;
    validate(&config)?;

    Ok(config)
}

/// Checks the invariants that deserialization alone cannot express.
pub fn validate(config: &Config) -> Result<(), ConfigError> {
    validate_risk_free_rate(config.analytics.risk_free_rate)?;

    if config.data.path.as_os_str().is_empty() {
        return Err(ConfigError::ValidationError(
            "data.path must not be empty".to_string(),
        ));
    }

    Ok(())
}

/// Rejects a risk-free rate outside `[-1, 1]`, which is almost always a
/// percentage given where a fraction is expected.
pub fn validate_risk_free_rate(rate: Decimal) -> Result<(), ConfigError> {
    if rate < -Decimal::ONE || rate > Decimal::ONE {
        return Err(ConfigError::ValidationError(format!(
            "risk_free_rate must be an annual fraction between -1 and 1, got {rate}"
        )));
    }
    Ok(())
}
