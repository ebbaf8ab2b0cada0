//! Demo config loader (strict parsing, env overrides).

pub mod schema;

use std::fs;

use suiclub_core::error::{Result, SuiClubError};

pub use schema::{AccountsSection, ClubSection, DemoConfig, NetworkSection, PackageSection};

/// Config file read when `SUICLUB_CONFIG` is unset.
pub const DEFAULT_PATH: &str = "suiclub.yaml";

/// Read, apply process env overrides, validate.
pub fn load_from_file(path: &str) -> Result<DemoConfig> {
    let s = fs::read_to_string(path)
        .map_err(|e| SuiClubError::Config(format!("read config {path} failed: {e}")))?;
    load_with_env(&s, |key| std::env::var(key).ok())
}

/// Parse and validate without consulting the environment.
pub fn load_from_str(s: &str) -> Result<DemoConfig> {
    load_with_env(s, |_| None)
}

/// Parse, apply overrides from `lookup`, validate.
pub fn load_with_env<F>(s: &str, lookup: F) -> Result<DemoConfig>
where
    F: Fn(&str) -> Option<String>,
{
    let mut cfg: DemoConfig = serde_yaml::from_str(s)
        .map_err(|e| SuiClubError::Config(format!("invalid yaml: {e}")))?;
    cfg.apply_env(lookup);
    cfg.validate()?;
    Ok(cfg)
}
