use std::env;
use std::ffi::OsString;
use std::fs;
use std::io::ErrorKind;
use std::path::{Path, PathBuf};

use serde::{Deserialize, Serialize};

use crate::domain::Color;
use crate::error::ConfigError;

const CONFIG_FILE: &str = "config.toml";
const APP_DIR: &str = "playtime_dashboard";
pub const DEFAULT_LOG_FILTER: &str = "playtime_dashboard=info,warn";

/// Settings read from `config.toml`. Every field is optional.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct DashboardConfig {
	pub records_path: Option<PathBuf>,
	pub fallback_color: Option<String>,
	pub log_filter: Option<String>,
}

impl DashboardConfig {
	/// Reads the config at `path`; a missing file yields the defaults.
	pub fn load(path: &Path) -> Result<Self, ConfigError> {
		let raw = match fs::read_to_string(path) {
			Ok(raw) => raw,
			Err(err) if err.kind() == ErrorKind::NotFound => return Ok(Self::default()),
			Err(source) => {
				return Err(ConfigError::Io {
					path: path.to_path_buf(),
					source,
				});
			}
		};

		toml::from_str(&raw).map_err(|source| ConfigError::TomlDecode {
			path: path.to_path_buf(),
			source,
		})
	}

	pub fn fallback_color(&self) -> Result<Color, ConfigError> {
		match &self.fallback_color {
			Some(raw) => Ok(raw.trim().parse::<Color>()?),
			None => Ok(Color::NEUTRAL),
		}
	}

	pub fn log_filter(&self) -> &str {
		self.log_filter.as_deref().unwrap_or(DEFAULT_LOG_FILTER)
	}
}

pub fn resolve_config_path(cli_path: Option<PathBuf>) -> PathBuf {
	if let Some(path) = cli_path {
		return absolutize(path);
	}

	if let Some(path) = non_empty_var("PLAYTIME_CONFIG") {
		return absolutize(PathBuf::from(path));
	}

	config_dir().join(CONFIG_FILE)
}

pub fn resolve_records_path(
	cli_path: Option<PathBuf>,
	config: &DashboardConfig,
) -> Result<PathBuf, ConfigError> {
	records_path_from(cli_path, non_empty_var("PLAYTIME_RECORDS"), config)
}

fn records_path_from(
	cli_path: Option<PathBuf>,
	env_path: Option<OsString>,
	config: &DashboardConfig,
) -> Result<PathBuf, ConfigError> {
	cli_path
		.or_else(|| env_path.map(PathBuf::from))
		.or_else(|| config.records_path.clone())
		.map(absolutize)
		.ok_or(ConfigError::NoRecordsPath)
}

fn config_dir() -> PathBuf {
	#[cfg(target_os = "windows")]
	{
		if let Some(path) = env::var_os("APPDATA") {
			return PathBuf::from(path).join(APP_DIR);
		}
	}

	if let Some(path) = non_empty_var("XDG_CONFIG_HOME") {
		return PathBuf::from(path).join(APP_DIR);
	}

	if let Some(path) = env::var_os("HOME") {
		return PathBuf::from(path).join(".config").join(APP_DIR);
	}

	PathBuf::from(".playtime_dashboard")
}

fn non_empty_var(key: &str) -> Option<OsString> {
	env::var_os(key).filter(|value| !value.is_empty())
}

fn absolutize(path: PathBuf) -> PathBuf {
	let path = if path.is_absolute() {
		path
	} else if let Ok(cwd) = env::current_dir() {
		cwd.join(path)
	} else {
		path
	};

	if path.exists() {
		fs::canonicalize(&path).unwrap_or(path)
	} else {
		path
	}
}

#[cfg(test)]
mod tests {
	use std::ffi::OsString;
	use std::fs;
	use std::path::PathBuf;

	use tempfile::tempdir;

	use super::{DEFAULT_LOG_FILTER, DashboardConfig, records_path_from};
	use crate::domain::Color;
	use crate::error::ConfigError;

	#[test]
	fn missing_file_gives_defaults() {
		let dir = tempdir().expect("temp dir");
		let config = DashboardConfig::load(&dir.path().join("absent.toml")).expect("defaults");
		assert_eq!(config, DashboardConfig::default());
		assert_eq!(config.log_filter(), DEFAULT_LOG_FILTER);
		assert_eq!(config.fallback_color().expect("color"), Color::NEUTRAL);
	}

	#[test]
	fn reads_toml_fields() {
		let dir = tempdir().expect("temp dir");
		let path = dir.path().join("config.toml");
		fs::write(
			&path,
			"records_path = \"/data/sessions.jsonl\"\nfallback_color = \"#112233\"\nlog_filter = \"debug\"\n",
		)
		.expect("write config");

		let config = DashboardConfig::load(&path).expect("config should parse");

		assert_eq!(config.records_path, Some(PathBuf::from("/data/sessions.jsonl")));
		assert_eq!(config.fallback_color().expect("color"), Color::rgb(0x11, 0x22, 0x33));
		assert_eq!(config.log_filter(), "debug");
	}

	#[test]
	fn malformed_toml_is_reported() {
		let dir = tempdir().expect("temp dir");
		let path = dir.path().join("config.toml");
		fs::write(&path, "records_path = [").expect("write config");
		assert!(matches!(
			DashboardConfig::load(&path),
			Err(ConfigError::TomlDecode { .. })
		));
	}

	#[test]
	fn bad_fallback_color_is_rejected() {
		let config = DashboardConfig {
			fallback_color: Some("grey".to_string()),
			..DashboardConfig::default()
		};
		assert!(matches!(
			config.fallback_color(),
			Err(ConfigError::InvalidColor(_))
		));
	}

	#[test]
	fn records_path_precedence() {
		let config = DashboardConfig {
			records_path: Some(PathBuf::from("/from/config.jsonl")),
			..DashboardConfig::default()
		};
		let env_path = Some(OsString::from("/from/env.jsonl"));

		let chosen = records_path_from(
			Some(PathBuf::from("/from/cli.jsonl")),
			env_path.clone(),
			&config,
		)
		.expect("cli path");
		assert_eq!(chosen, PathBuf::from("/from/cli.jsonl"));

		let chosen = records_path_from(None, env_path, &config).expect("env path");
		assert_eq!(chosen, PathBuf::from("/from/env.jsonl"));

		let chosen = records_path_from(None, None, &config).expect("config path");
		assert_eq!(chosen, PathBuf::from("/from/config.jsonl"));

		assert!(matches!(
			records_path_from(None, None, &DashboardConfig::default()),
			Err(ConfigError::NoRecordsPath)
		));
	}
}
