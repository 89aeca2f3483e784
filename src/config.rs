use std::{
    collections::BTreeMap,
    fs,
    path::{Path, PathBuf},
    time::Duration,
};

use anyhow::{Context, Ok, Result};
use glob::Pattern;
use serde::{Deserialize, Serialize};

use crate::{
    logging::LogLevel,
    pipeline::{
        DEFAULT_BATCH_SIZE, DEFAULT_EXCLUDE, DEFAULT_MAX_FILE_SIZE, DEFAULT_PATTERNS,
        PipelineSettings,
    },
    plugins::PluginConfig,
    rules::DEFAULT_TRANSLATABLE_ATTRIBUTES,
};

pub const CONFIG_FILE_NAME: &str = ".gleanrc.json";

/// Per-plugin section of the config file (`plugins.<name>`).
#[derive(Debug, Clone, PartialEq, Deserialize, Serialize)]
#[serde(rename_all = "camelCase", default)]
pub struct PluginEntry {
    pub enabled: bool,
    pub critical: bool,
    /// Overrides the plugin's built-in priority.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub priority: Option<i32>,
    #[serde(skip_serializing_if = "serde_json::Map::is_empty")]
    pub options: serde_json::Map<String, serde_json::Value>,
}

impl Default for PluginEntry {
    fn default() -> Self {
        Self {
            enabled: true,
            critical: false,
            priority: None,
            options: serde_json::Map::new(),
        }
    }
}

impl PluginEntry {
    pub fn plugin_config(&self) -> PluginConfig {
        PluginConfig {
            enabled: self.enabled,
            critical: self.critical,
            options: self.options.clone(),
        }
    }
}

#[derive(Debug, Clone, PartialEq, Deserialize, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct Config {
    #[serde(default = "default_includes")]
    pub includes: Vec<String>,
    /// Extra ignore globs, on top of the built-in ones.
    #[serde(default)]
    pub ignores: Vec<String>,
    #[serde(default = "default_max_file_size")]
    pub max_file_size: u64,
    #[serde(default = "default_batch_size")]
    pub batch_size: usize,
    #[serde(default = "default_parallel")]
    pub parallel: bool,
    #[serde(default)]
    pub log_level: LogLevel,
    /// Lifetime of shared cache entries; absent means no expiry.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub cache_ttl_secs: Option<u64>,
    #[serde(default = "default_checked_attributes")]
    pub checked_attributes: Vec<String>,
    #[serde(default)]
    pub ignore_texts: Vec<String>,
    #[serde(default)]
    pub plugins: BTreeMap<String, PluginEntry>,
}

fn default_includes() -> Vec<String> {
    DEFAULT_PATTERNS.iter().map(|s| s.to_string()).collect()
}

fn default_max_file_size() -> u64 {
    DEFAULT_MAX_FILE_SIZE
}

fn default_batch_size() -> usize {
    DEFAULT_BATCH_SIZE
}

fn default_parallel() -> bool {
    true
}

fn default_checked_attributes() -> Vec<String> {
    DEFAULT_TRANSLATABLE_ATTRIBUTES
        .iter()
        .map(|s| s.to_string())
        .collect()
}

impl Default for Config {
    fn default() -> Self {
        Self {
            includes: default_includes(),
            ignores: Vec::new(),
            max_file_size: default_max_file_size(),
            batch_size: default_batch_size(),
            parallel: default_parallel(),
            log_level: LogLevel::default(),
            cache_ttl_secs: None,
            checked_attributes: default_checked_attributes(),
            ignore_texts: Vec::new(),
            plugins: BTreeMap::new(),
        }
    }
}

impl Config {
    /// Validate configuration values.
    ///
    /// Returns an error if any glob pattern in `includes` or `ignores` is invalid.
    pub fn validate(&self) -> Result<()> {
        for pattern in &self.includes {
            Pattern::new(pattern)
                .with_context(|| format!("Invalid glob pattern in 'includes': \"{}\"", pattern))?;
        }
        for pattern in &self.ignores {
            Pattern::new(pattern)
                .with_context(|| format!("Invalid glob pattern in 'ignores': \"{}\"", pattern))?;
        }
        Ok(())
    }

    /// Pipeline settings shared by every built-in plugin.
    pub fn pipeline_settings(&self) -> PipelineSettings {
        let mut exclude: Vec<String> = DEFAULT_EXCLUDE.iter().map(|s| s.to_string()).collect();
        exclude.extend(self.ignores.iter().cloned());
        PipelineSettings {
            patterns: self.includes.clone(),
            exclude,
            max_file_size: self.max_file_size,
            batch_size: self.batch_size,
            parallel: self.parallel,
            ..Default::default()
        }
    }

    pub fn cache_ttl(&self) -> Option<Duration> {
        self.cache_ttl_secs.map(Duration::from_secs)
    }

    pub fn plugin_entry(&self, name: &str) -> Option<&PluginEntry> {
        self.plugins.get(name)
    }
}

pub fn default_config_json() -> Result<String> {
    let config = Config::default();
    serde_json::to_string_pretty(&config).context("Failed to generate default config.")
}

pub fn find_config_file(start_dir: &Path) -> Option<PathBuf> {
    let mut current = start_dir.to_path_buf();

    loop {
        let config_path = current.join(CONFIG_FILE_NAME);
        if config_path.exists() {
            return Some(config_path);
        }
        if current.join(".git").exists() {
            return None;
        }
        if !current.pop() {
            return None;
        }
    }
}

/// Result of loading configuration.
pub struct ConfigLoadResult {
    pub config: Config,
    /// Where the config was read from; `None` when using defaults.
    pub path: Option<PathBuf>,
}

impl ConfigLoadResult {
    pub fn from_file(&self) -> bool {
        self.path.is_some()
    }
}

pub fn load_config(start_dir: &Path) -> Result<ConfigLoadResult> {
    match find_config_file(start_dir) {
        Some(path) => {
            let content = fs::read_to_string(&path)
                .with_context(|| format!("Failed to read config file: {:?}", path))?;
            let config: Config = serde_json::from_str(&content)
                .with_context(|| format!("Failed to parse config file: {:?}", path))?;
            config.validate()?;
            Ok(ConfigLoadResult {
                config,
                path: Some(path),
            })
        }
        None => Ok(ConfigLoadResult {
            config: Config::default(),
            path: None,
        }),
    }
}

#[cfg(test)]
mod tests {
    use crate::config::*;
    use pretty_assertions::assert_eq;
    use std::fs::File;
    use tempfile::tempdir;

    #[test]
    fn test_default_config() {
        let config = Config::default();
        assert!(config.ignores.is_empty());
        assert_eq!(config.includes, default_includes());
        assert!(config.checked_attributes.contains(&"label".to_string()));
        assert!(config.parallel);
        assert!(config.plugins.is_empty());
    }

    #[test]
    fn test_parse_config() {
        let json = r#"{
              "ignores": ["**/dist/**"],
              "includes": ["src/**/*.tsx"],
              "batchSize": 10,
              "parallel": false,
              "logLevel": "debug",
              "cacheTtlSecs": 30,
              "plugins": {
                  "i18n": { "critical": true, "priority": 5, "options": { "ignoreTexts": ["OK"] } },
                  "hooks": { "enabled": false }
              }
          }"#;
        let config: Config = serde_json::from_str(json).unwrap();
        assert_eq!(config.ignores, vec!["**/dist/**"]);
        assert_eq!(config.includes, vec!["src/**/*.tsx"]);
        assert_eq!(config.batch_size, 10);
        assert!(!config.parallel);
        assert_eq!(config.log_level, LogLevel::Debug);
        assert_eq!(config.cache_ttl(), Some(Duration::from_secs(30)));

        let i18n = config.plugin_entry("i18n").unwrap();
        assert!(i18n.enabled);
        assert!(i18n.critical);
        assert_eq!(i18n.priority, Some(5));
        assert_eq!(
            i18n.plugin_config().option_strings("ignoreTexts"),
            Some(vec!["OK".to_string()])
        );
        assert!(!config.plugin_entry("hooks").unwrap().enabled);
    }

    #[test]
    fn test_partial_config() {
        let json = r#"{ "ignores": ["**/dist/**"] }"#;
        let config: Config = serde_json::from_str(json).unwrap();

        assert_eq!(config.ignores, vec!["**/dist/**"]);
        assert_eq!(config.includes, default_includes());
        assert_eq!(config.checked_attributes, default_checked_attributes());
        assert_eq!(config.batch_size, DEFAULT_BATCH_SIZE);
        assert_eq!(config.max_file_size, DEFAULT_MAX_FILE_SIZE);
    }

    #[test]
    fn test_pipeline_settings_extend_default_excludes() {
        let config = Config {
            ignores: vec!["**/legacy/**".to_string()],
            batch_size: 7,
            ..Default::default()
        };
        let settings = config.pipeline_settings();
        assert_eq!(settings.batch_size, 7);
        assert!(settings.exclude.contains(&"**/node_modules/**".to_string()));
        assert_eq!(settings.exclude.last().unwrap(), "**/legacy/**");
    }

    #[test]
    fn test_find_config_file() {
        let dir = tempdir().unwrap();
        let sub_dir = dir.path().join("src").join("components");
        fs::create_dir_all(&sub_dir).unwrap();

        let config_path = dir.path().join(CONFIG_FILE_NAME);
        File::create(&config_path).unwrap();

        let found = find_config_file(&sub_dir);
        assert_eq!(found, Some(config_path));
    }

    #[test]
    fn test_find_config_stops_at_git_root() {
        let dir = tempdir().unwrap();
        fs::create_dir(dir.path().join(".git")).unwrap();

        assert!(find_config_file(dir.path()).is_none());
    }

    #[test]
    fn test_load_config_from_file() {
        let dir = tempdir().unwrap();
        let config_path = dir.path().join(CONFIG_FILE_NAME);
        fs::write(&config_path, r#"{ "ignores": ["**/test/**"] }"#).unwrap();

        let result = load_config(dir.path()).unwrap();
        assert!(result.from_file());
        assert_eq!(result.path, Some(config_path));
        assert_eq!(result.config.ignores, vec!["**/test/**"]);
    }

    #[test]
    fn test_load_config_default_when_not_found() {
        let dir = tempdir().unwrap();
        fs::create_dir(dir.path().join(".git")).unwrap();

        let result = load_config(dir.path()).unwrap();
        assert!(!result.from_file());
        assert_eq!(result.config, Config::default());
    }

    #[test]
    fn test_validate_invalid_patterns() {
        let config = Config {
            ignores: vec!["[invalid".to_string()],
            ..Default::default()
        };
        let err = config.validate().unwrap_err();
        assert!(err.to_string().contains("ignores"));

        let config = Config {
            includes: vec!["src/**/[invalid".to_string()],
            ..Default::default()
        };
        let err = config.validate().unwrap_err();
        assert!(err.to_string().contains("includes"));
    }

    #[test]
    fn test_load_config_with_invalid_pattern_fails() {
        let dir = tempdir().unwrap();
        fs::write(
            dir.path().join(CONFIG_FILE_NAME),
            r#"{ "ignores": ["[invalid"] }"#,
        )
        .unwrap();

        assert!(load_config(dir.path()).is_err());
    }

    #[test]
    fn test_load_config_with_malformed_json_fails() {
        let dir = tempdir().unwrap();
        fs::write(dir.path().join(CONFIG_FILE_NAME), "{ not json").unwrap();

        let err = load_config(dir.path()).err().unwrap();
        assert!(err.to_string().contains("Failed to parse config file"));
    }

    #[test]
    fn test_default_config_json_round_trips() {
        let json = default_config_json().unwrap();
        assert!(json.contains("\"checkedAttributes\""));
        assert!(!json.contains("cacheTtlSecs"));
        let parsed: Config = serde_json::from_str(&json).unwrap();
        assert_eq!(parsed, Config::default());
    }
}
