use crate::core::samples::DEFAULT_ADDGENE_BASE_URL;
use crate::domain::plate::PlateGeometry;
use crate::domain::ports::ConfigProvider;
use crate::utils::error::{IceError, Result};
use crate::utils::validation::{validate_url, Validate};
use regex::Regex;
use serde::{Deserialize, Serialize};
use std::path::Path;

pub const DEFAULT_ENDPOINT: &str = "http://localhost:8080/";

#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct TomlConfig {
    pub server: ServerConfig,
    #[serde(default)]
    pub plate: PlateConfig,
    #[serde(default)]
    pub addgene: AddGeneConfig,
    pub logging: Option<LoggingConfig>,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ServerConfig {
    pub endpoint: String,
    pub session_id: Option<String>,
}

impl Default for ServerConfig {
    fn default() -> Self {
        Self {
            endpoint: DEFAULT_ENDPOINT.to_string(),
            session_id: None,
        }
    }
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct PlateConfig {
    pub rows: usize,
    pub cols: usize,
}

impl Default for PlateConfig {
    fn default() -> Self {
        let geometry = PlateGeometry::default();
        Self {
            rows: geometry.rows,
            cols: geometry.cols,
        }
    }
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct AddGeneConfig {
    pub base_url: String,
}

impl Default for AddGeneConfig {
    fn default() -> Self {
        Self {
            base_url: DEFAULT_ADDGENE_BASE_URL.to_string(),
        }
    }
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct LoggingConfig {
    pub level: Option<String>,
    /// `compact` (default) or `json`.
    pub format: Option<String>,
}

impl TomlConfig {
    pub fn from_file<P: AsRef<Path>>(path: P) -> Result<Self> {
        let content = std::fs::read_to_string(&path)?;
        Self::from_toml_str(&content)
    }

    pub fn from_toml_str(content: &str) -> Result<Self> {
        let processed_content = Self::substitute_env_vars(content)?;

        toml::from_str(&processed_content).map_err(|e| IceError::ConfigValidationError {
            field: "toml_parsing".to_string(),
            message: format!("TOML parsing error: {}", e),
        })
    }

    /// Replaces `${VAR}` with the environment value; unknown variables stay as written.
    fn substitute_env_vars(content: &str) -> Result<String> {
        let re = Regex::new(r"\$\{([^}]+)\}").map_err(|e| IceError::ConfigValidationError {
            field: "environment".to_string(),
            message: e.to_string(),
        })?;

        let result = re.replace_all(content, |caps: &regex::Captures| {
            let var_name = &caps[1];
            std::env::var(var_name).unwrap_or_else(|_| format!("${{{}}}", var_name))
        });

        Ok(result.to_string())
    }

    pub fn json_logging(&self) -> bool {
        self.logging
            .as_ref()
            .and_then(|logging| logging.format.as_deref())
            .is_some_and(|format| format.eq_ignore_ascii_case("json"))
    }

    pub fn log_level(&self) -> Option<&str> {
        self.logging.as_ref().and_then(|logging| logging.level.as_deref())
    }
}

impl ConfigProvider for TomlConfig {
    fn api_endpoint(&self) -> &str {
        &self.server.endpoint
    }

    /// Blank ids and unresolved `${...}` placeholders count as no session.
    fn session_id(&self) -> Option<&str> {
        self.server
            .session_id
            .as_deref()
            .map(str::trim)
            .filter(|id| !id.is_empty() && !id.starts_with("${"))
    }

    fn plate_geometry(&self) -> PlateGeometry {
        PlateGeometry {
            rows: self.plate.rows,
            cols: self.plate.cols,
        }
    }

    fn addgene_base_url(&self) -> &str {
        &self.addgene.base_url
    }
}

impl Validate for TomlConfig {
    fn validate(&self) -> Result<()> {
        validate_url("server.endpoint", &self.server.endpoint)?;
        validate_url("addgene.base_url", &self.addgene.base_url)?;
        PlateGeometry::new(self.plate.rows, self.plate.cols)?;

        if let Some(format) = self.logging.as_ref().and_then(|l| l.format.as_deref()) {
            if !["compact", "json"].contains(&format.to_ascii_lowercase().as_str()) {
                return Err(IceError::InvalidConfigValueError {
                    field: "logging.format".to_string(),
                    value: format.to_string(),
                    reason: "Valid formats: compact, json".to_string(),
                });
            }
        }
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::io::Write;
    use tempfile::NamedTempFile;

    #[test]
    fn test_parse_full_config() {
        let toml_content = r#"
[server]
endpoint = "https://registry.example.org/ice"
session_id = "abc123"

[plate]
rows = 16
cols = 24

[addgene]
base_url = "https://www.addgene.org/"

[logging]
level = "debug"
format = "json"
"#;

        let config = TomlConfig::from_toml_str(toml_content).unwrap();
        assert_eq!(config.api_endpoint(), "https://registry.example.org/ice");
        assert_eq!(config.session_id(), Some("abc123"));
        assert_eq!(config.plate_geometry(), PlateGeometry::PLATE_384);
        assert!(config.json_logging());
        assert_eq!(config.log_level(), Some("debug"));
        assert!(config.validate().is_ok());
    }

    #[test]
    fn test_defaults_for_optional_tables() {
        let config = TomlConfig::from_toml_str("[server]\nendpoint = \"http://localhost:9000\"\n").unwrap();
        assert_eq!(config.plate_geometry(), PlateGeometry::PLATE_96);
        assert_eq!(config.addgene_base_url(), DEFAULT_ADDGENE_BASE_URL);
        assert_eq!(config.session_id(), None);
        assert!(!config.json_logging());
    }

    #[test]
    fn test_env_var_substitution() {
        std::env::set_var("ICE_SAMPLES_TEST_SESSION", "from-env");

        let toml_content = r#"
[server]
endpoint = "http://localhost:8080"
session_id = "${ICE_SAMPLES_TEST_SESSION}"
"#;
        let config = TomlConfig::from_toml_str(toml_content).unwrap();
        assert_eq!(config.session_id(), Some("from-env"));

        std::env::remove_var("ICE_SAMPLES_TEST_SESSION");
    }

    #[test]
    fn test_unresolved_placeholder_is_no_session() {
        let toml_content = r#"
[server]
endpoint = "http://localhost:8080"
session_id = "${ICE_SAMPLES_TEST_UNSET_VARIABLE}"
"#;
        let config = TomlConfig::from_toml_str(toml_content).unwrap();
        assert_eq!(config.session_id(), None);
    }

    #[test]
    fn test_config_validation() {
        let bad_endpoint = TomlConfig::from_toml_str("[server]\nendpoint = \"registry\"\n").unwrap();
        assert!(bad_endpoint.validate().is_err());

        let bad_plate =
            TomlConfig::from_toml_str("[server]\nendpoint = \"http://x.org\"\n[plate]\nrows = 0\ncols = 12\n").unwrap();
        assert!(bad_plate.validate().is_err());

        let bad_format = TomlConfig::from_toml_str(
            "[server]\nendpoint = \"http://x.org\"\n[logging]\nformat = \"xml\"\n",
        )
        .unwrap();
        assert!(bad_format.validate().is_err());
    }

    #[test]
    fn test_config_from_file() {
        let mut temp_file = NamedTempFile::new().unwrap();
        temp_file
            .write_all(b"[server]\nendpoint = \"https://registry.example.org\"\n")
            .unwrap();

        let config = TomlConfig::from_file(temp_file.path()).unwrap();
        assert_eq!(config.api_endpoint(), "https://registry.example.org");
    }

    #[test]
    fn test_invalid_toml() {
        let err = TomlConfig::from_toml_str("[server\nendpoint = 1").unwrap_err();
        assert!(matches!(err, IceError::ConfigValidationError { .. }));
    }
}
