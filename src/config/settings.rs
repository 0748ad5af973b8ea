use crate::utils::error::{EtlError, Result};
use crate::utils::validation::{self, Validate};
use regex::Regex;
use serde::{Deserialize, Serialize};
use std::path::Path;

pub const DEFAULT_OUTPUT_PATH: &str = "data/results.json";
pub const MAX_SIMULATED_DELAY_MS: u64 = 1000;

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct Settings {
    pub offline_mode: bool,
    pub max_per_route: usize,
    pub simulated_network_delay_ms: u64,
    pub max_results: Option<i64>,
    pub output_path: String,
    pub concurrent_requests: usize,
}

impl Default for Settings {
    fn default() -> Self {
        Self {
            offline_mode: true,
            max_per_route: 5,
            simulated_network_delay_ms: 120,
            max_results: None,
            output_path: DEFAULT_OUTPUT_PATH.to_string(),
            concurrent_requests: 1,
        }
    }
}

impl Settings {
    /// 從 JSON 或 TOML (依副檔名) 檔案載入設定
    pub fn from_file<P: AsRef<Path>>(path: P) -> Result<Self> {
        let path = path.as_ref();
        if !path.exists() {
            return Err(EtlError::ConfigError {
                message: format!("Settings file not found: {}", path.display()),
            });
        }

        let content = std::fs::read_to_string(path)?;
        let is_toml = path
            .extension()
            .and_then(|ext| ext.to_str())
            .is_some_and(|ext| ext.eq_ignore_ascii_case("toml"));

        if is_toml {
            Self::from_toml_str(&content)
        } else {
            Self::from_json_str(&content)
        }
    }

    pub fn from_json_str(content: &str) -> Result<Self> {
        let processed = substitute_env_vars(content);
        serde_json::from_str(&processed).map_err(|e| EtlError::ConfigError {
            message: format!("JSON parsing error: {}", e),
        })
    }

    pub fn from_toml_str(content: &str) -> Result<Self> {
        let processed = substitute_env_vars(content);
        toml::from_str(&processed).map_err(|e| EtlError::ConfigError {
            message: format!("TOML parsing error: {}", e),
        })
    }

    /// 套用 OFFLINE_MODE / OUTPUT_PATH 環境變數覆蓋
    pub fn apply_env_overrides(&mut self) {
        let offline = std::env::var("OFFLINE_MODE").ok();
        let output_path = std::env::var("OUTPUT_PATH").ok();
        self.apply_overrides(offline.as_deref(), output_path.as_deref());
    }

    pub fn apply_overrides(&mut self, offline_mode: Option<&str>, output_path: Option<&str>) {
        if let Some(value) = offline_mode {
            self.offline_mode = parse_flag(value);
            tracing::debug!("offline_mode overridden to {}", self.offline_mode);
        }
        if let Some(path) = output_path.filter(|p| !p.is_empty()) {
            self.output_path = path.to_string();
            tracing::debug!("output_path overridden to {}", self.output_path);
        }
    }

    /// 實際使用的模擬延遲 (上限 1 秒)
    pub fn effective_delay_ms(&self) -> u64 {
        self.simulated_network_delay_ms.min(MAX_SIMULATED_DELAY_MS)
    }

    /// 只有正整數才會截斷結果
    pub fn result_limit(&self) -> Option<usize> {
        self.max_results
            .filter(|limit| *limit > 0)
            .and_then(|limit| usize::try_from(limit).ok())
    }
}

impl Validate for Settings {
    fn validate(&self) -> Result<()> {
        validation::validate_path("output_path", &self.output_path)?;
        validation::validate_positive_number("concurrent_requests", self.concurrent_requests, 1)?;
        Ok(())
    }
}

pub fn parse_flag(value: &str) -> bool {
    matches!(
        value.trim().to_ascii_lowercase().as_str(),
        "1" | "true" | "yes" | "on"
    )
}

/// 替換環境變數 (例如 ${OUTPUT_DIR})，未設定的變數保持原樣
fn substitute_env_vars(content: &str) -> String {
    let re = match Regex::new(r"\$\{([^}]+)\}") {
        Ok(re) => re,
        Err(_) => return content.to_string(),
    };

    re.replace_all(content, |caps: &regex::Captures| {
        let var_name = &caps[1];
        std::env::var(var_name).unwrap_or_else(|_| format!("${{{}}}", var_name))
    })
    .to_string()
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::io::Write;

    #[test]
    fn test_defaults_for_missing_keys() {
        let settings = Settings::from_json_str("{}").unwrap();
        assert_eq!(settings, Settings::default());
        assert!(settings.offline_mode);
        assert_eq!(settings.max_per_route, 5);
        assert_eq!(settings.simulated_network_delay_ms, 120);
        assert_eq!(settings.output_path, "data/results.json");
        assert_eq!(settings.result_limit(), None);
    }

    #[test]
    fn test_unknown_keys_are_ignored() {
        let settings = Settings::from_json_str(
            r#"{"offline_mode": false, "max_per_route": 3, "user_agent": "x", "max_results": 10}"#,
        )
        .unwrap();
        assert!(!settings.offline_mode);
        assert_eq!(settings.max_per_route, 3);
        assert_eq!(settings.result_limit(), Some(10));
    }

    #[test]
    fn test_non_positive_max_results_is_ignored() {
        let mut settings = Settings::default();
        settings.max_results = Some(0);
        assert_eq!(settings.result_limit(), None);
        settings.max_results = Some(-4);
        assert_eq!(settings.result_limit(), None);
    }

    #[test]
    fn test_delay_is_clamped() {
        let mut settings = Settings::default();
        settings.simulated_network_delay_ms = 5000;
        assert_eq!(settings.effective_delay_ms(), 1000);
        settings.simulated_network_delay_ms = 0;
        assert_eq!(settings.effective_delay_ms(), 0);
    }

    #[test]
    fn test_overrides() {
        let mut settings = Settings::default();
        settings.apply_overrides(Some("off"), Some("out/flights.json"));
        assert!(!settings.offline_mode);
        assert_eq!(settings.output_path, "out/flights.json");

        settings.apply_overrides(Some("YES"), Some(""));
        assert!(settings.offline_mode);
        assert_eq!(settings.output_path, "out/flights.json");
    }

    #[test]
    fn test_env_var_substitution() {
        std::env::set_var("FLIGHT_ETL_TEST_OUTPUT", "/tmp/flight-etl");
        let settings =
            Settings::from_json_str(r#"{"output_path": "${FLIGHT_ETL_TEST_OUTPUT}/r.json"}"#)
                .unwrap();
        assert_eq!(settings.output_path, "/tmp/flight-etl/r.json");
        std::env::remove_var("FLIGHT_ETL_TEST_OUTPUT");

        let settings =
            Settings::from_json_str(r#"{"output_path": "${FLIGHT_ETL_UNSET_VAR}/r.json"}"#)
                .unwrap();
        assert_eq!(settings.output_path, "${FLIGHT_ETL_UNSET_VAR}/r.json");
    }

    #[test]
    fn test_toml_settings_from_file() {
        let mut temp_file = tempfile::Builder::new().suffix(".toml").tempfile().unwrap();
        temp_file
            .write_all(b"offline_mode = true\nmax_per_route = 2\nmax_results = 4\n")
            .unwrap();

        let settings = Settings::from_file(temp_file.path()).unwrap();
        assert_eq!(settings.max_per_route, 2);
        assert_eq!(settings.result_limit(), Some(4));
    }

    #[test]
    fn test_missing_file_is_config_error() {
        let err = Settings::from_file("/definitely/not/here/settings.json").unwrap_err();
        assert!(matches!(err, EtlError::ConfigError { .. }));
    }

    #[test]
    fn test_invalid_json_is_config_error() {
        let err = Settings::from_json_str("{ not json").unwrap_err();
        assert!(matches!(err, EtlError::ConfigError { .. }));
    }

    #[test]
    fn test_validation() {
        assert!(Settings::default().validate().is_ok());

        let mut settings = Settings::default();
        settings.concurrent_requests = 0;
        assert!(settings.validate().is_err());

        let mut settings = Settings::default();
        settings.output_path = String::new();
        assert!(settings.validate().is_err());
    }
}
