use contracts::shared::filters::EmptySelection;
use serde::Deserialize;
use std::path::{Path, PathBuf};

#[derive(Debug, Deserialize, Clone)]
pub struct Config {
    pub dataset: DatasetConfig,
    #[serde(default)]
    pub server: ServerConfig,
    #[serde(default)]
    pub filters: FiltersConfig,
}

#[derive(Debug, Deserialize, Clone)]
pub struct DatasetConfig {
    pub path: String,
    /// WHATWG encoding label of the CSV file
    #[serde(default = "default_encoding")]
    pub encoding: String,
    /// chrono format of the `order_date` column
    #[serde(default = "default_date_format")]
    pub date_format: String,
}

#[derive(Debug, Deserialize, Clone)]
pub struct ServerConfig {
    pub host: String,
    pub port: u16,
}

impl Default for ServerConfig {
    fn default() -> Self {
        Self {
            host: "127.0.0.1".to_string(),
            port: 3000,
        }
    }
}

#[derive(Debug, Deserialize, Clone, Default)]
pub struct FiltersConfig {
    /// Meaning of a multi-select with nothing selected
    #[serde(default)]
    pub empty_selection: EmptySelection,
}

fn default_encoding() -> String {
    "windows-1252".to_string()
}

fn default_date_format() -> String {
    "%d-%m-%Y".to_string()
}

/// Default configuration embedded in the binary
const DEFAULT_CONFIG: &str = r#"
[dataset]
path = "data/ecommerce_sales_data.csv"
encoding = "windows-1252"
date_format = "%d-%m-%Y"

[server]
host = "127.0.0.1"
port = 3000

[filters]
empty_selection = "no_restriction"
"#;

/// Load configuration from config.toml file
///
/// Search order:
/// 1. Next to the executable (for production)
/// 2. Falls back to embedded default config
pub fn load_config() -> anyhow::Result<Config> {
    // Try to find config.toml next to the executable
    if let Ok(exe_path) = std::env::current_exe() {
        if let Some(exe_dir) = exe_path.parent() {
            let config_path = exe_dir.join("config.toml");

            if config_path.exists() {
                tracing::info!("Loading config from: {}", config_path.display());
                let contents = std::fs::read_to_string(&config_path)?;
                let config: Config = toml::from_str(&contents)?;
                return Ok(config);
            } else {
                tracing::warn!("config.toml not found at: {}", config_path.display());
            }
        }
    }

    // Fall back to default config
    tracing::info!("Using default embedded configuration");
    let config: Config = toml::from_str(DEFAULT_CONFIG)?;
    Ok(config)
}

/// Get the dataset file path from configuration
/// Resolves relative paths relative to the executable directory
pub fn get_dataset_path(config: &Config) -> anyhow::Result<PathBuf> {
    let dataset_path = Path::new(&config.dataset.path);

    // If absolute path, use as is
    if dataset_path.is_absolute() {
        return Ok(dataset_path.to_path_buf());
    }

    // Relative path: next to the executable when the file exists there
    if let Ok(exe_path) = std::env::current_exe() {
        if let Some(exe_dir) = exe_path.parent() {
            let resolved_path = exe_dir.join(dataset_path);
            if resolved_path.exists() {
                return Ok(resolved_path);
            }
        }
    }

    // Fallback: use relative to current directory
    Ok(std::env::current_dir()?.join(dataset_path))
}
