use rust_decimal::Decimal;
use serde::Deserialize;
use std::path::PathBuf;

/// The root configuration structure for the entire application.
#[derive(Debug, Clone, Deserialize)]
pub struct Config {
    pub analytics: AnalyticsSettings,
    pub data: DataSettings,
    pub display: DisplaySettings,
    pub logging: LoggingSettings,
}

/// Parameters handed to the metrics engine.
#[derive(Debug, Clone, Deserialize)]
pub struct AnalyticsSettings {
    /// The annual risk-free rate used by the Sharpe ratio, as a fraction.
    /// 0.112 corresponds to 11.2%.
    pub risk_free_rate: Decimal,
}

/// Where the market data document lives.
#[derive(Debug, Clone, Deserialize)]
pub struct DataSettings {
    /// Path to the dashboard JSON document (e.g. "public/gse_data.json").
    pub path: PathBuf,
}

#[derive(Debug, Clone, Deserialize)]
pub struct DisplaySettings {
    /// Window used by chart and export when none is given (e.g. "1Y").
    pub default_window: String,
}

#[derive(Debug, Clone, Deserialize)]
pub struct LoggingSettings {
    /// When set, logs are also written to a daily rolling file in this directory.
    pub directory: Option<PathBuf>,
    pub file_prefix: String,
}
