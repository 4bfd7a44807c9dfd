use serde::Deserialize;

#[derive(Debug, Deserialize, Clone, Default)]
pub struct Config {
    #[serde(default)]
    pub fetch: FetchConfig,
    #[serde(default)]
    pub sanctions: SanctionsConfig,
    #[serde(default)]
    pub detection: DetectionConfig,
    #[serde(default)]
    pub classifier: ClassifierConfig,
    #[serde(default)]
    pub api: ApiConfig,
}

// ============================================================
// Fetch Config
// ============================================================

#[derive(Debug, Deserialize, Clone)]
pub struct FetchConfig {
    #[serde(default = "default_base_url")]
    pub base_url: String,
    /// API token; the BLOCKCYPHER_TOKEN env var takes precedence when set.
    #[serde(default)]
    pub token: Option<String>,
    #[serde(default = "default_tx_limit")]
    pub tx_limit: u32,
    #[serde(default = "default_timeout_secs")]
    pub timeout_secs: u64,
    #[serde(default = "default_retry_attempts")]
    pub retry_attempts: u32,
    #[serde(default = "default_retry_backoff_ms")]
    pub retry_backoff_ms: u64,
}

impl Default for FetchConfig {
    fn default() -> Self {
        Self {
            base_url: default_base_url(),
            token: None,
            tx_limit: default_tx_limit(),
            timeout_secs: default_timeout_secs(),
            retry_attempts: default_retry_attempts(),
            retry_backoff_ms: default_retry_backoff_ms(),
        }
    }
}

fn default_base_url() -> String {
    "https://api.blockcypher.com/v1/btc/main".to_string()
}

fn default_tx_limit() -> u32 {
    50
}

fn default_timeout_secs() -> u64 {
    10
}

fn default_retry_attempts() -> u32 {
    3
}

fn default_retry_backoff_ms() -> u64 {
    500
}

// ============================================================
// Sanctions Config
// ============================================================

#[derive(Debug, Deserialize, Clone)]
pub struct SanctionsConfig {
    #[serde(default = "default_sanctions_path")]
    pub list_path: String,
}

impl Default for SanctionsConfig {
    fn default() -> Self {
        Self {
            list_path: default_sanctions_path(),
        }
    }
}

fn default_sanctions_path() -> String {
    "bitcoin_sanctioned_all.txt".to_string()
}

// ============================================================
// Detection Config
// ============================================================

/// Which rolling-window semantic the high-frequency detector uses.
/// `Rolling` counts every record in the trailing window ending at each
/// record's own timestamp; `Bucketed` resamples into fixed 1-minute buckets
/// and gives each record its bucket's count. The two disagree near bucket
/// boundaries, so one is chosen per run.
#[derive(Debug, Deserialize, Clone, Copy, PartialEq, Eq, Default)]
#[serde(rename_all = "lowercase")]
pub enum WindowMode {
    #[default]
    Rolling,
    Bucketed,
}

#[derive(Debug, Deserialize, Clone)]
pub struct DetectionConfig {
    /// Trailing window for burst counting, in seconds.
    #[serde(default = "default_freq_window_secs")]
    pub freq_window_secs: u64,
    /// Flag when the window count strictly exceeds this. Deliberately low:
    /// sensitivity over precision.
    #[serde(default = "default_freq_threshold")]
    pub freq_threshold: u32,
    #[serde(default)]
    pub freq_window_mode: WindowMode,
    /// High-amount |z-score| cutoff.
    #[serde(default = "default_amount_z_threshold")]
    pub amount_z_threshold: f64,
    /// Tumbler: minimum value in BTC.
    #[serde(default = "default_tumbler_min_value")]
    pub tumbler_min_value: f64,
    /// Tumbler: minimum |interval| to the previous record, in seconds.
    #[serde(default = "default_tumbler_min_interval_secs")]
    pub tumbler_min_interval_secs: f64,
    /// Extortion: gap since the previous record must exceed this, in seconds.
    #[serde(default = "default_extortion_gap_secs")]
    pub extortion_gap_secs: f64,
}

impl Default for DetectionConfig {
    fn default() -> Self {
        Self {
            freq_window_secs: default_freq_window_secs(),
            freq_threshold: default_freq_threshold(),
            freq_window_mode: WindowMode::default(),
            amount_z_threshold: default_amount_z_threshold(),
            tumbler_min_value: default_tumbler_min_value(),
            tumbler_min_interval_secs: default_tumbler_min_interval_secs(),
            extortion_gap_secs: default_extortion_gap_secs(),
        }
    }
}

fn default_freq_window_secs() -> u64 {
    60
}

fn default_freq_threshold() -> u32 {
    2
}

fn default_amount_z_threshold() -> f64 {
    2.0
}

fn default_tumbler_min_value() -> f64 {
    0.05
}

fn default_tumbler_min_interval_secs() -> f64 {
    30.0
}

fn default_extortion_gap_secs() -> f64 {
    120.0
}

// ============================================================
// Classifier Config
// ============================================================

#[derive(Debug, Deserialize, Clone)]
pub struct ClassifierConfig {
    #[serde(default = "default_ransomware_z")]
    pub ransomware_z: f64,
    #[serde(default = "default_ransomware_gap_mins")]
    pub ransomware_gap_mins: f64,
    #[serde(default = "default_sextortion_mean_gap_mins")]
    pub sextortion_mean_gap_mins: f64,
    #[serde(default = "default_sextortion_burst_count")]
    pub sextortion_burst_count: u32,
}

impl Default for ClassifierConfig {
    fn default() -> Self {
        Self {
            ransomware_z: default_ransomware_z(),
            ransomware_gap_mins: default_ransomware_gap_mins(),
            sextortion_mean_gap_mins: default_sextortion_mean_gap_mins(),
            sextortion_burst_count: default_sextortion_burst_count(),
        }
    }
}

fn default_ransomware_z() -> f64 {
    2.5
}

fn default_ransomware_gap_mins() -> f64 {
    10.0
}

fn default_sextortion_mean_gap_mins() -> f64 {
    60.0
}

fn default_sextortion_burst_count() -> u32 {
    5
}

// ============================================================
// API Config
// ============================================================

#[derive(Debug, Deserialize, Clone)]
pub struct ApiConfig {
    #[serde(default = "default_true")]
    pub enabled: bool,
    #[serde(default = "default_api_port")]
    pub port: u16,
    #[serde(default = "default_api_host")]
    pub host: String,
}

impl Default for ApiConfig {
    fn default() -> Self {
        Self {
            enabled: true,
            port: default_api_port(),
            host: default_api_host(),
        }
    }
}

fn default_true() -> bool {
    true
}

fn default_api_port() -> u16 {
    3000
}

fn default_api_host() -> String {
    "0.0.0.0".to_string()
}

impl Config {
    pub fn load(path: &str) -> eyre::Result<Self> {
        let content = std::fs::read_to_string(path)
            .map_err(|e| eyre::eyre!("Failed to read config file '{}': {}", path, e))?;
        let config: Config = toml::from_str(&content)
            .map_err(|e| eyre::eyre!("Failed to parse config file '{}': {}", path, e))?;
        config.validate()?;
        Ok(config)
    }

    /// Load the config file if present, otherwise fall back to defaults.
    pub fn load_or_default(path: &str) -> eyre::Result<Self> {
        if std::path::Path::new(path).exists() {
            Self::load(path)
        } else {
            tracing::warn!(path, "Config file not found, using built-in defaults");
            let config = Config::default();
            config.validate()?;
            Ok(config)
        }
    }

    pub fn validate(&self) -> eyre::Result<()> {
        if self.fetch.base_url.is_empty() {
            return Err(eyre::eyre!("fetch.base_url must not be empty"));
        }
        if self.fetch.tx_limit == 0 {
            return Err(eyre::eyre!("fetch.tx_limit must be positive"));
        }
        if self.detection.freq_window_secs == 0 {
            return Err(eyre::eyre!("detection.freq_window_secs must be positive"));
        }
        if self.detection.amount_z_threshold <= 0.0 {
            return Err(eyre::eyre!("detection.amount_z_threshold must be positive"));
        }
        Ok(())
    }

    /// API token resolution: environment variable wins over the config file.
    pub fn api_token(&self) -> Option<String> {
        std::env::var("BLOCKCYPHER_TOKEN")
            .ok()
            .filter(|t| !t.is_empty())
            .or_else(|| self.fetch.token.clone())
    }
}
