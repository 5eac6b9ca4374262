use std::env;
use std::fs;
use std::path::{Path, PathBuf};

use display::RegionRules;
use indicators::IndicatorConfig;
use serde::{Deserialize, Serialize};
use tracing::debug;

pub const ENV_PREFIX: &str = "MEMBER_MAP_";

/// CLI configuration: an optional JSON file, then `MEMBER_MAP_*` overrides.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct AppConfig {
    /// Directory holding `alumni.json` and `countries.json`.
    pub data_dir: PathBuf,
    pub indicators: IndicatorConfig,
    pub regions: RegionRules,
}

impl Default for AppConfig {
    fn default() -> Self {
        Self {
            data_dir: PathBuf::from("data"),
            indicators: IndicatorConfig::default(),
            regions: RegionRules::default(),
        }
    }
}

#[derive(Debug)]
pub enum ConfigError {
    Io {
        path: PathBuf,
        source: std::io::Error,
    },
    Parse {
        path: PathBuf,
        source: serde_json::Error,
    },
}

impl std::fmt::Display for ConfigError {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            ConfigError::Io { path, source } => {
                write!(f, "failed to read config {}: {source}", path.display())
            }
            ConfigError::Parse { path, source } => {
                write!(f, "invalid config {}: {source}", path.display())
            }
        }
    }
}

impl std::error::Error for ConfigError {
    fn source(&self) -> Option<&(dyn std::error::Error + 'static)> {
        match self {
            ConfigError::Io { source, .. } => Some(source),
            ConfigError::Parse { source, .. } => Some(source),
        }
    }
}

impl AppConfig {
    /// Loads `path` (if any) and applies process environment overrides.
    pub fn load(path: Option<&Path>) -> Result<Self, ConfigError> {
        let mut config = match path {
            Some(path) => Self::from_file(path)?,
            None => Self::default(),
        };
        config.apply_env(|key| env::var(key).ok());
        Ok(config)
    }

    pub fn from_file(path: &Path) -> Result<Self, ConfigError> {
        let payload = fs::read_to_string(path).map_err(|e| ConfigError::Io {
            path: path.to_path_buf(),
            source: e,
        })?;
        serde_json::from_str(&payload).map_err(|e| ConfigError::Parse {
            path: path.to_path_buf(),
            source: e,
        })
    }

    /// Overrides fields from `MEMBER_MAP_*` variables found by `lookup`.
    /// Unparseable values are ignored.
    pub fn apply_env<F>(&mut self, lookup: F)
    where
        F: Fn(&str) -> Option<String>,
    {
        let get = |name: &str| lookup(&format!("{ENV_PREFIX}{name}"));
        if let Some(dir) = get("DATA_DIR").filter(|v| !v.is_empty()) {
            self.data_dir = PathBuf::from(dir);
        }
        let ind = &mut self.indicators;
        ind.min_zoom = env_var_f64(&get, "MIN_ZOOM", ind.min_zoom);
        ind.debounce_ms = env_var_u64(&get, "DEBOUNCE_MS", ind.debounce_ms);
        ind.display_delay_ms = env_var_u64(&get, "DISPLAY_DELAY_MS", ind.display_delay_ms);
        ind.ready_poll_ms = env_var_u64(&get, "READY_POLL_MS", ind.ready_poll_ms);
        ind.max_ready_polls = env_var_u32(&get, "MAX_READY_POLLS", ind.max_ready_polls);
        ind.enabled = env_var_bool(&get, "INDICATORS_ENABLED", ind.enabled);
        debug!(config = ?self, "configuration resolved");
    }
}

fn env_var_u32(get: &impl Fn(&str) -> Option<String>, key: &str, default: u32) -> u32 {
    get(key).and_then(|v| v.parse().ok()).unwrap_or(default)
}

fn env_var_u64(get: &impl Fn(&str) -> Option<String>, key: &str, default: u64) -> u64 {
    get(key).and_then(|v| v.parse().ok()).unwrap_or(default)
}

fn env_var_f64(get: &impl Fn(&str) -> Option<String>, key: &str, default: f64) -> f64 {
    get(key).and_then(|v| v.parse().ok()).unwrap_or(default)
}

fn env_var_bool(get: &impl Fn(&str) -> Option<String>, key: &str, default: bool) -> bool {
    match get(key).as_deref().map(str::trim) {
        Some("1" | "true" | "yes" | "on") => true,
        Some("0" | "false" | "no" | "off") => false,
        _ => default,
    }
}

#[cfg(test)]
mod tests {
    use super::{AppConfig, ConfigError};
    use pretty_assertions::assert_eq;
    use std::collections::HashMap;
    use std::path::PathBuf;

    fn lookup(pairs: &[(&str, &str)]) -> impl Fn(&str) -> Option<String> {
        let map: HashMap<String, String> = pairs
            .iter()
            .map(|(k, v)| (k.to_string(), v.to_string()))
            .collect();
        move |k| map.get(k).cloned()
    }

    #[test]
    fn file_values_merge_with_defaults() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("member-map.json");
        std::fs::write(
            &path,
            r#"{"data_dir": "/srv/members", "indicators": {"display_delay_ms": 500}}"#,
        )
        .unwrap();

        let config = AppConfig::from_file(&path).unwrap();
        assert_eq!(config.data_dir, PathBuf::from("/srv/members"));
        assert_eq!(config.indicators.display_delay_ms, 500);
        assert_eq!(config.indicators.debounce_ms, 300);
        assert_eq!(config.regions.country, "France");
    }

    #[test]
    fn environment_overrides_win() {
        let mut config = AppConfig::default();
        config.apply_env(lookup(&[
            ("MEMBER_MAP_DATA_DIR", "fixtures"),
            ("MEMBER_MAP_MIN_ZOOM", "4.5"),
            ("MEMBER_MAP_DEBOUNCE_MS", "150"),
            ("MEMBER_MAP_MAX_READY_POLLS", "not-a-number"),
            ("MEMBER_MAP_INDICATORS_ENABLED", "off"),
        ]));
        assert_eq!(config.data_dir, PathBuf::from("fixtures"));
        assert_eq!(config.indicators.min_zoom, 4.5);
        assert_eq!(config.indicators.debounce_ms, 150);
        assert_eq!(config.indicators.max_ready_polls, 600);
        assert!(!config.indicators.enabled);
    }

    #[test]
    fn bad_files_are_reported() {
        let dir = tempfile::tempdir().unwrap();
        let missing = dir.path().join("absent.json");
        assert!(matches!(
            AppConfig::from_file(&missing),
            Err(ConfigError::Io { .. })
        ));

        let broken = dir.path().join("broken.json");
        std::fs::write(&broken, "{").unwrap();
        let err = AppConfig::from_file(&broken).unwrap_err();
        assert!(err.to_string().starts_with("invalid config"));
    }
}
