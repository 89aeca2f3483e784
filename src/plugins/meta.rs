use std::sync::LazyLock;

use regex::Regex;
use serde::{Deserialize, Serialize};

use crate::error::ManagerError;

static NAME_REGEX: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"^[a-z0-9][a-z0-9_-]*$").unwrap());

static VERSION_REGEX: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(r"^\d+\.\d+\.\d+(-[0-9A-Za-z.-]+)?(\+[0-9A-Za-z.-]+)?$").unwrap()
});

/// Identity and scheduling information of a plugin.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct PluginMeta {
    pub name: String,
    pub version: String,
    pub description: String,
    /// Lower runs earlier.
    pub priority: i32,
    /// Plugins that must run before this one.
    pub dependencies: Vec<String>,
}

impl PluginMeta {
    pub fn new(name: impl Into<String>, version: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            version: version.into(),
            description: String::new(),
            priority: 0,
            dependencies: Vec::new(),
        }
    }

    pub fn with_description(mut self, description: impl Into<String>) -> Self {
        self.description = description.into();
        self
    }

    pub fn with_priority(mut self, priority: i32) -> Self {
        self.priority = priority;
        self
    }

    pub fn with_dependencies<I, S>(mut self, dependencies: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        self.dependencies = dependencies.into_iter().map(Into::into).collect();
        self
    }

    /// Check name, version and dependency list.
    pub fn validate(&self) -> Result<(), ManagerError> {
        let invalid = |reason: String| Err(ManagerError::validation(&self.name, reason));

        if self.name.is_empty() {
            return invalid("name must not be empty".to_string());
        }
        if !NAME_REGEX.is_match(&self.name) {
            return invalid(
                "name may only contain lowercase letters, digits, '-' and '_'".to_string(),
            );
        }
        if !VERSION_REGEX.is_match(&self.version) {
            return invalid(format!(
                "version '{}' is not a semantic version",
                self.version
            ));
        }
        for dependency in &self.dependencies {
            if dependency.trim().is_empty() {
                return invalid("dependency names must not be empty".to_string());
            }
            if *dependency == self.name {
                return invalid("a plugin cannot depend on itself".to_string());
            }
        }
        Ok(())
    }
}

/// Per-plugin runtime switches, usually loaded from the config file.
#[derive(Debug, Clone, PartialEq, Deserialize, Serialize)]
#[serde(rename_all = "camelCase", default)]
pub struct PluginConfig {
    pub enabled: bool,
    /// A failing critical plugin stops `execute_all`.
    pub critical: bool,
    pub options: serde_json::Map<String, serde_json::Value>,
}

impl Default for PluginConfig {
    fn default() -> Self {
        Self {
            enabled: true,
            critical: false,
            options: serde_json::Map::new(),
        }
    }
}

impl PluginConfig {
    pub fn option_bool(&self, key: &str) -> Option<bool> {
        self.options.get(key).and_then(|v| v.as_bool())
    }

    pub fn option_strings(&self, key: &str) -> Option<Vec<String>> {
        let values = self.options.get(key)?.as_array()?;
        Some(
            values
                .iter()
                .filter_map(|v| v.as_str().map(str::to_string))
                .collect(),
        )
    }
}

#[cfg(test)]
mod tests {
    use pretty_assertions::assert_eq;

    use crate::plugins::meta::*;

    fn reason(meta: &PluginMeta) -> String {
        match meta.validate().unwrap_err() {
            ManagerError::Validation { reason, .. } => reason,
            other => panic!("unexpected error: {other}"),
        }
    }

    #[test]
    fn test_valid_meta() {
        let meta = PluginMeta::new("react-hooks", "1.2.3-beta.1")
            .with_priority(5)
            .with_dependencies(["modules"]);
        assert!(meta.validate().is_ok());
    }

    #[test]
    fn test_invalid_names() {
        assert_eq!(
            reason(&PluginMeta::new("", "1.0.0")),
            "name must not be empty"
        );
        assert!(reason(&PluginMeta::new("My Plugin", "1.0.0")).starts_with("name may only"));
    }

    #[test]
    fn test_invalid_version() {
        assert_eq!(
            reason(&PluginMeta::new("a", "v1")),
            "version 'v1' is not a semantic version"
        );
    }

    #[test]
    fn test_invalid_dependencies() {
        assert_eq!(
            reason(&PluginMeta::new("a", "1.0.0").with_dependencies(["a"])),
            "a plugin cannot depend on itself"
        );
        assert_eq!(
            reason(&PluginMeta::new("a", "1.0.0").with_dependencies([" "])),
            "dependency names must not be empty"
        );
    }

    #[test]
    fn test_plugin_config_options() {
        let config: PluginConfig = serde_json::from_str(
            r#"{"critical": true, "options": {"strict": true, "extra": ["a", "b"]}}"#,
        )
        .unwrap();
        assert!(config.enabled);
        assert!(config.critical);
        assert_eq!(config.option_bool("strict"), Some(true));
        assert_eq!(
            config.option_strings("extra"),
            Some(vec!["a".to_string(), "b".to_string()])
        );
        assert_eq!(config.option_bool("missing"), None);
    }
}
