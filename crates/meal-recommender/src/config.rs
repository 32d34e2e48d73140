use std::net::SocketAddr;
use std::path::PathBuf;

use crate::error::AppError;
use crate::metabolism::DEFAULT_TDEE_JITTER;

const DEFAULT_LISTEN_ADDR: &str = "0.0.0.0:8000";

/// Application configuration loaded explicitly from environment variables.
#[derive(Debug, Clone, PartialEq)]
pub struct Config {
    /// Pre-cleaned recipes CSV.
    pub recipes_csv_path: PathBuf,
    pub listen_addr: SocketAddr,
    /// Fixed seed for every request's noise source. `None` draws from OS entropy.
    pub noise_seed: Option<u64>,
    /// Relative half-width of the jitter applied to daily expenditure.
    pub tdee_jitter: f64,
    /// JSON category table replacing the built-in one.
    pub category_table_path: Option<PathBuf>,
}

impl Config {
    /// Load configuration from environment variables.
    ///
    /// Required:
    /// - `RECIPES_CSV_PATH`: path to the recipes CSV
    ///
    /// Optional:
    /// - `LISTEN_ADDR`: socket address to bind (default `0.0.0.0:8000`)
    /// - `NOISE_SEED`: u64 seed making responses reproducible
    /// - `TDEE_JITTER`: expenditure jitter in `[0, 1)` (default 0.05)
    /// - `CATEGORY_TABLE_PATH`: JSON category table
    pub fn from_env() -> Result<Self, AppError> {
        Self::from_lookup(|key| std::env::var(key).ok())
    }

    /// Same as `from_env`, reading variables through `lookup`.
    pub fn from_lookup(lookup: impl Fn(&str) -> Option<String>) -> Result<Self, AppError> {
        let recipes_csv_path = lookup("RECIPES_CSV_PATH").map(PathBuf::from).ok_or_else(|| {
            AppError::Config("RECIPES_CSV_PATH environment variable is required".to_string())
        })?;
        if !recipes_csv_path.is_file() {
            return Err(AppError::Config(format!(
                "recipes CSV not found at {}",
                recipes_csv_path.display()
            )));
        }

        let listen_addr = lookup("LISTEN_ADDR")
            .unwrap_or_else(|| DEFAULT_LISTEN_ADDR.to_string())
            .parse::<SocketAddr>()
            .map_err(|e| AppError::Config(format!("invalid LISTEN_ADDR: {e}")))?;

        let noise_seed = lookup("NOISE_SEED")
            .map(|raw| {
                raw.trim()
                    .parse::<u64>()
                    .map_err(|e| AppError::Config(format!("invalid NOISE_SEED '{raw}': {e}")))
            })
            .transpose()?;

        let tdee_jitter = match lookup("TDEE_JITTER") {
            Some(raw) => raw
                .trim()
                .parse::<f64>()
                .map_err(|e| AppError::Config(format!("invalid TDEE_JITTER '{raw}': {e}")))?,
            None => DEFAULT_TDEE_JITTER,
        };
        if !(0.0..1.0).contains(&tdee_jitter) {
            return Err(AppError::Config(format!(
                "TDEE_JITTER must be in [0, 1), got {tdee_jitter}"
            )));
        }

        let category_table_path = lookup("CATEGORY_TABLE_PATH").map(PathBuf::from);

        Ok(Self {
            recipes_csv_path,
            listen_addr,
            noise_seed,
            tdee_jitter,
            category_table_path,
        })
    }
}
