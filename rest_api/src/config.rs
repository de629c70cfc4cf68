// rest_api/src/config.rs

use anyhow::Result;
use serde::Deserialize;
use sheets::SheetsConfig;
use std::fmt;
use std::fs;
use std::path::PathBuf;
use std::str::FromStr;

/// Configuration for the intake service.
#[derive(Debug, Deserialize, Clone)]
pub struct IntakeConfig {
    pub host: String,
    pub port: u16,
    /// Which row store to use: `memory` or `google`.
    pub backend: String,
    /// Required for the `google` backend.
    #[serde(default)]
    pub sheet: Option<SheetsConfig>,
}

// Wrapper struct matching the 'intake:' key in the YAML config.
#[derive(Debug, Deserialize)]
struct IntakeConfigWrapper {
    intake: IntakeConfig,
}

/// Loads the service configuration from `intake_config.yaml` next to the
/// crate manifest, or from an explicitly given path.
pub fn load_intake_config(config_file_path: Option<PathBuf>) -> Result<IntakeConfig> {
    let default_config_path = PathBuf::from(env!("CARGO_MANIFEST_DIR")).join("intake_config.yaml");
    let path_to_use = config_file_path.unwrap_or(default_config_path);

    let config_content = fs::read_to_string(&path_to_use).map_err(|e| {
        anyhow::anyhow!("Failed to read intake config file {}: {}", path_to_use.display(), e)
    })?;

    let wrapper: IntakeConfigWrapper = serde_yaml2::from_str(&config_content).map_err(|e| {
        anyhow::anyhow!("Failed to parse intake config file {}: {}", path_to_use.display(), e)
    })?;

    Ok(wrapper.intake)
}

/// Enum for the supported row-store backends.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SheetBackend {
    Memory,
    Google,
}

impl FromStr for SheetBackend {
    type Err = anyhow::Error;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.to_lowercase().as_str() {
            "memory" => Ok(SheetBackend::Memory),
            "google" | "gsheets" => Ok(SheetBackend::Google),
            _ => Err(anyhow::anyhow!("Unknown sheet backend: {}", s)),
        }
    }
}

impl fmt::Display for SheetBackend {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            SheetBackend::Memory => write!(f, "memory"),
            SheetBackend::Google => write!(f, "google"),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn should_parse_backend_names() {
        assert_eq!(SheetBackend::from_str("memory").unwrap(), SheetBackend::Memory);
        assert_eq!(SheetBackend::from_str("Google").unwrap(), SheetBackend::Google);
        assert_eq!(SheetBackend::from_str("gsheets").unwrap(), SheetBackend::Google);
        assert!(SheetBackend::from_str("postgres").is_err());
    }

    #[test]
    fn should_parse_yaml_config() {
        let yaml = r#"
intake:
  host: "127.0.0.1"
  port: 8082
  backend: "google"
  sheet:
    spreadsheet_id: "abc123"
    worksheet: "Patients"
    credentials_file: "service_account.json"
"#;
        let wrapper: IntakeConfigWrapper = serde_yaml2::from_str(yaml).unwrap();
        let config = wrapper.intake;
        assert_eq!(config.port, 8082);
        assert_eq!(config.backend, "google");
        let sheet = config.sheet.unwrap();
        assert_eq!(sheet.spreadsheet_id, "abc123");
        assert_eq!(sheet.worksheet, "Patients");
    }

    #[test]
    fn sheet_section_is_optional_for_memory_backend() {
        let yaml = r#"
intake:
  host: "127.0.0.1"
  port: 8082
  backend: "memory"
"#;
        let wrapper: IntakeConfigWrapper = serde_yaml2::from_str(yaml).unwrap();
        assert!(wrapper.intake.sheet.is_none());
    }
}
