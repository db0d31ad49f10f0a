use serde::Deserialize;
use std::fs;
use std::path::{Path, PathBuf};

pub const DEFAULT_BACKEND_URL: &str = "http://127.0.0.1:5000";
const BACKEND_URL_ENV: &str = "CODEPILOT_BACKEND_URL";
const DATA_DIR_ENV: &str = "CODEPILOT_DATA_DIR";

#[derive(Debug, thiserror::Error)]
pub enum ConfigError {
    #[error("failed to read {path}: {source}")]
    Read {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },
    #[error("failed to parse {path}: {source}")]
    Parse {
        path: PathBuf,
        #[source]
        source: serde_json::Error,
    },
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct AppConfig {
    pub backend_url: String,
    pub data_dir: PathBuf,
}

#[derive(Debug, Default, Deserialize)]
struct ConfigFile {
    backend_url: Option<String>,
    data_dir: Option<PathBuf>,
}

fn home_dir() -> PathBuf {
    std::env::var_os("HOME")
        .map(PathBuf::from)
        .or_else(|| std::env::var_os("USERPROFILE").map(PathBuf::from))
        .unwrap_or_else(|| PathBuf::from("."))
}

impl Default for AppConfig {
    fn default() -> Self {
        Self {
            backend_url: DEFAULT_BACKEND_URL.to_string(),
            data_dir: home_dir().join(".codepilot"),
        }
    }
}

impl AppConfig {
    pub fn load() -> (Self, Option<ConfigError>) {
        let mut config = Self::default();
        if let Some(dir) = std::env::var_os(DATA_DIR_ENV) {
            config.data_dir = PathBuf::from(dir);
        }

        let warning = match read_config_file(&config.data_dir.join("config.json")) {
            Ok(Some(file)) => {
                config.merge(file);
                None
            }
            Ok(None) => None,
            Err(err) => Some(err),
        };

        if let Ok(url) = std::env::var(BACKEND_URL_ENV) {
            config.backend_url = url;
        }
        if let Some(dir) = std::env::var_os(DATA_DIR_ENV) {
            config.data_dir = PathBuf::from(dir);
        }
        config.backend_url = normalize_url(&config.backend_url);

        (config, warning)
    }

    pub fn cache_dir(&self) -> PathBuf {
        self.data_dir.join("cache")
    }

    fn merge(&mut self, file: ConfigFile) {
        if let Some(url) = file.backend_url {
            self.backend_url = url;
        }
        if let Some(dir) = file.data_dir {
            self.data_dir = dir;
        }
    }
}

fn read_config_file(path: &Path) -> Result<Option<ConfigFile>, ConfigError> {
    if !path.exists() {
        return Ok(None);
    }
    let data = fs::read(path).map_err(|source| ConfigError::Read {
        path: path.to_path_buf(),
        source,
    })?;
    let file = serde_json::from_slice(&data).map_err(|source| ConfigError::Parse {
        path: path.to_path_buf(),
        source,
    })?;
    Ok(Some(file))
}

fn normalize_url(raw: &str) -> String {
    let trimmed = raw.trim().trim_end_matches('/');
    if trimmed.is_empty() {
        DEFAULT_BACKEND_URL.to_string()
    } else {
        trimmed.to_string()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn normalize_url_strips_trailing_slashes() {
        assert_eq!(normalize_url("http://localhost:8080//"), "http://localhost:8080");
        assert_eq!(normalize_url("   "), DEFAULT_BACKEND_URL);
    }

    #[test]
    fn config_file_fields_override_defaults() {
        let dir = tempfile::tempdir().expect("tempdir");
        let path = dir.path().join("config.json");
        fs::write(&path, r#"{ "backend_url": "http://example.test/" }"#)
            .expect("config fixture should write");

        let file = read_config_file(&path)
            .expect("config should parse")
            .expect("config should exist");
        let mut config = AppConfig::default();
        let data_dir = config.data_dir.clone();
        config.merge(file);

        assert_eq!(config.backend_url, "http://example.test/");
        assert_eq!(config.data_dir, data_dir);
    }

    #[test]
    fn missing_config_file_is_not_an_error() {
        let dir = tempfile::tempdir().expect("tempdir");
        let result = read_config_file(&dir.path().join("config.json"));
        assert!(matches!(result, Ok(None)));
    }

    #[test]
    fn malformed_config_file_reports_parse_error() {
        let dir = tempfile::tempdir().expect("tempdir");
        let path = dir.path().join("config.json");
        fs::write(&path, "{ not json").expect("config fixture should write");

        let error = read_config_file(&path).expect_err("malformed config should fail");
        assert!(matches!(error, ConfigError::Parse { .. }));
        assert!(error.to_string().contains("config.json"));
    }
}
