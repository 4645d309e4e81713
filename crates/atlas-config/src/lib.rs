//! Configuration management for atlas.
//!
//! Parses `atlas.toml` configuration files with serde and provides
//! auto-discovery of config files in parent directories.
//!
//! CLI settings can be applied during load via [`CliSettings`].
//!
//! ## Environment Variable Expansion
//!
//! String configuration values support environment variable expansion:
//!
//! - `${VAR}` - expands to the value of VAR, errors if unset
//! - `${VAR:-default}` - expands to VAR if set, otherwise uses default
//!
//! Expanded fields:
//! - `confluence.base_url`
//! - `confluence.username`
//! - `confluence.api_token`
//! - `confluence.space_key`

mod expand;

use atlas_adf::ConvertOptions;
use serde::Deserialize;
use std::path::{Path, PathBuf};

/// Configuration filename to search for.
const CONFIG_FILENAME: &str = "atlas.toml";

/// Warning shown at the top of every published page unless overridden.
pub const DEFAULT_WARNING: &str =
    "This page is generated from Markdown. Edits made in Confluence will be overwritten.";

/// Label that marks a Confluence page as safe to overwrite.
pub const DEFAULT_MANAGED_LABEL: &str = "atlas-managed";

/// CLI settings that override configuration file values.
///
/// All fields are optional. Only non-None values override the loaded config.
#[derive(Debug, Default)]
pub struct CliSettings {
    /// Override automatic table of contents.
    pub add_table_of_contents: Option<bool>,
    /// Override the heading count that triggers the table of contents.
    pub toc_threshold: Option<usize>,
    /// Override the default Confluence space for new pages.
    pub space_key: Option<String>,
    /// Override the directory holding diagram images.
    pub diagrams_dir: Option<PathBuf>,
}

/// Application configuration.
#[derive(Debug, Deserialize)]
#[serde(default)]
pub struct Config {
    /// Converter options (`[converter]` section).
    pub converter: ConvertOptions,
    /// Confluence configuration.
    pub confluence: Option<ConfluenceConfig>,
    /// Publishing configuration (paths are relative strings from TOML).
    publish: PublishConfigRaw,

    /// Resolved publishing configuration (set after loading).
    #[serde(skip)]
    pub publish_resolved: PublishConfig,
    /// Path to the config file (set after loading).
    #[serde(skip)]
    pub config_path: Option<PathBuf>,
}

impl Default for Config {
    fn default() -> Self {
        Self::default_with_base(Path::new("."))
    }
}

/// Confluence configuration.
#[derive(Debug, Deserialize)]
pub struct ConfluenceConfig {
    /// Confluence base URL (including `/wiki` for cloud sites).
    pub base_url: String,
    /// Account used for API calls.
    pub username: String,
    /// API token for `username`.
    pub api_token: String,
    /// Default space for newly created pages.
    #[serde(default)]
    pub space_key: Option<String>,
    /// Label required on existing pages before they are overwritten.
    #[serde(default = "default_managed_label")]
    pub managed_label: String,
}

impl ConfluenceConfig {
    /// Validate that all required fields are properly set.
    ///
    /// # Errors
    ///
    /// Returns `ConfigError::Validation` if any field is empty or has invalid format.
    pub fn validate(&self) -> Result<(), ConfigError> {
        require_non_empty(&self.base_url, "confluence.base_url")?;
        require_http_url(&self.base_url, "confluence.base_url")?;
        require_non_empty(&self.username, "confluence.username")?;
        require_non_empty(&self.api_token, "confluence.api_token")?;
        require_non_empty(&self.managed_label, "confluence.managed_label")?;
        if let Some(space_key) = &self.space_key {
            require_non_empty(space_key, "confluence.space_key")?;
        }
        Ok(())
    }
}

fn default_managed_label() -> String {
    DEFAULT_MANAGED_LABEL.to_owned()
}

/// Raw publishing configuration as parsed from TOML (paths as strings).
#[derive(Debug, Deserialize, Default)]
#[serde(default)]
struct PublishConfigRaw {
    warning: Option<String>,
    diagrams_dir: Option<String>,
}

/// Resolved publishing configuration with absolute paths.
#[derive(Debug, Clone)]
pub struct PublishConfig {
    /// Warning panel text; `None` disables the panel.
    pub warning: Option<String>,
    /// Directory holding `<view>.png` images for diagram placeholders.
    pub diagrams_dir: PathBuf,
}

impl Default for PublishConfig {
    fn default() -> Self {
        Self {
            warning: Some(DEFAULT_WARNING.to_owned()),
            diagrams_dir: PathBuf::from("diagrams"),
        }
    }
}

/// Configuration error.
#[derive(Debug, thiserror::Error)]
pub enum ConfigError {
    /// File not found.
    #[error("Configuration file not found: {}", .0.display())]
    NotFound(PathBuf),
    /// I/O error.
    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),
    /// TOML parsing error.
    #[error("TOML parse error: {0}")]
    Parse(#[from] toml::de::Error),
    /// Validation error.
    #[error("Configuration error: {0}")]
    Validation(String),
    /// Environment variable error during expansion.
    #[error("Environment variable error in {field}: {message}")]
    EnvVar {
        /// Config field path (e.g., "`confluence.api_token`").
        field: String,
        /// Error message (e.g., "${`CONFLUENCE_TOKEN`} not set").
        message: String,
    },
}

/// Require a string field to be non-empty.
fn require_non_empty(value: &str, field: &str) -> Result<(), ConfigError> {
    if value.is_empty() {
        return Err(ConfigError::Validation(format!("{field} cannot be empty")));
    }
    Ok(())
}

/// Require a URL field to use http:// or https:// scheme.
fn require_http_url(url: &str, field: &str) -> Result<(), ConfigError> {
    if !url.starts_with("http://") && !url.starts_with("https://") {
        return Err(ConfigError::Validation(format!(
            "{field} must start with http:// or https://"
        )));
    }
    Ok(())
}

impl Config {
    /// Load configuration from file with optional CLI settings.
    ///
    /// If `config_path` is provided, loads from that file.
    /// Otherwise, searches for `atlas.toml` in current directory and parents.
    ///
    /// CLI settings are applied after loading and path resolution, allowing CLI
    /// arguments to take precedence over config file values.
    ///
    /// # Errors
    ///
    /// Returns error if explicit `config_path` doesn't exist or parsing fails.
    pub fn load(
        config_path: Option<&Path>,
        cli_settings: Option<&CliSettings>,
    ) -> Result<Self, ConfigError> {
        let mut config = if let Some(path) = config_path {
            if !path.exists() {
                return Err(ConfigError::NotFound(path.to_path_buf()));
            }
            Self::load_from_file(path)?
        } else if let Some(discovered) = Self::discover_config() {
            Self::load_from_file(&discovered)?
        } else {
            Self::default_with_cwd()
        };

        if let Some(settings) = cli_settings {
            config.apply_cli_settings(settings);
            config.validate()?;
        }

        Ok(config)
    }

    /// Apply CLI settings to the configuration.
    fn apply_cli_settings(&mut self, settings: &CliSettings) {
        if let Some(enabled) = settings.add_table_of_contents {
            self.converter.add_table_of_contents = enabled;
        }
        if let Some(threshold) = settings.toc_threshold {
            self.converter.toc_threshold = threshold;
        }
        if let Some(space_key) = &settings.space_key
            && let Some(confluence) = &mut self.confluence
        {
            confluence.space_key = Some(space_key.clone());
        }
        if let Some(diagrams_dir) = &settings.diagrams_dir {
            self.publish_resolved.diagrams_dir.clone_from(diagrams_dir);
        }
    }

    /// Get validated Confluence configuration.
    ///
    /// Returns the Confluence config if the `[confluence]` section is present
    /// and all fields are valid.
    ///
    /// # Errors
    ///
    /// Returns `ConfigError::Validation` if the section is missing or invalid.
    pub fn require_confluence(&self) -> Result<&ConfluenceConfig, ConfigError> {
        let conf = self.confluence.as_ref().ok_or_else(|| {
            ConfigError::Validation("[confluence] section required in config".into())
        })?;
        conf.validate()?;
        Ok(conf)
    }

    /// Search for config file in current directory and parents.
    fn discover_config() -> Option<PathBuf> {
        let current = std::env::current_dir().ok()?;
        Self::discover_from(&current)
    }

    /// Search for config file in `start` and its parents.
    fn discover_from(start: &Path) -> Option<PathBuf> {
        let mut current = start.to_path_buf();
        loop {
            let candidate = current.join(CONFIG_FILENAME);
            if candidate.exists() {
                return Some(candidate);
            }
            if !current.pop() {
                return None;
            }
        }
    }

    /// Create default config with paths relative to current working directory.
    fn default_with_cwd() -> Self {
        let cwd = std::env::current_dir().unwrap_or_default();
        Self::default_with_base(&cwd)
    }

    /// Create default config with paths relative to given base directory.
    fn default_with_base(base: &Path) -> Self {
        Self {
            converter: ConvertOptions::default(),
            confluence: None,
            publish: PublishConfigRaw::default(),
            publish_resolved: PublishConfig {
                diagrams_dir: base.join("diagrams"),
                ..PublishConfig::default()
            },
            config_path: None,
        }
    }

    /// Load configuration from a specific file.
    fn load_from_file(path: &Path) -> Result<Self, ConfigError> {
        let content = std::fs::read_to_string(path)?;
        let mut config: Self = toml::from_str(&content)?;

        config.expand_env_vars()?;

        let config_dir = path.parent().unwrap_or(Path::new("."));
        config.resolve_paths(config_dir);
        config.config_path = Some(path.to_path_buf());

        config.validate()?;

        Ok(config)
    }

    /// Validate configuration values.
    ///
    /// Checks that all required fields are properly set and contain valid values.
    /// Called automatically after loading from file.
    ///
    /// # Errors
    ///
    /// Returns `ConfigError::Validation` if any validation fails.
    pub fn validate(&self) -> Result<(), ConfigError> {
        if self.converter.toc_threshold == 0 {
            return Err(ConfigError::Validation(
                "converter.toc_threshold must be greater than 0".to_owned(),
            ));
        }
        if let Some(confluence) = &self.confluence {
            confluence.validate()?;
        }
        Ok(())
    }

    /// Expand environment variable references in configuration strings.
    fn expand_env_vars(&mut self) -> Result<(), ConfigError> {
        if let Some(ref mut confluence) = self.confluence {
            confluence.base_url = expand::expand_env(&confluence.base_url, "confluence.base_url")?;
            confluence.username = expand::expand_env(&confluence.username, "confluence.username")?;
            confluence.api_token =
                expand::expand_env(&confluence.api_token, "confluence.api_token")?;
            if let Some(space_key) = &confluence.space_key {
                confluence.space_key =
                    Some(expand::expand_env(space_key, "confluence.space_key")?);
            }
        }
        Ok(())
    }

    /// Resolve relative paths to absolute paths based on config directory.
    fn resolve_paths(&mut self, config_dir: &Path) {
        // An explicitly empty warning disables the panel.
        let warning = match &self.publish.warning {
            Some(text) if text.trim().is_empty() => None,
            Some(text) => Some(text.clone()),
            None => Some(DEFAULT_WARNING.to_owned()),
        };

        self.publish_resolved = PublishConfig {
            warning,
            diagrams_dir: config_dir.join(self.publish.diagrams_dir.as_deref().unwrap_or("diagrams")),
        };
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use pretty_assertions::assert_eq;

    #[test]
    fn test_default_config() {
        let config = Config::default_with_base(Path::new("/test"));
        assert!(config.converter.add_table_of_contents);
        assert_eq!(config.converter.toc_threshold, 4);
        assert!(config.confluence.is_none());
        assert_eq!(
            config.publish_resolved.diagrams_dir,
            PathBuf::from("/test/diagrams")
        );
        assert_eq!(
            config.publish_resolved.warning.as_deref(),
            Some(DEFAULT_WARNING)
        );
    }

    #[test]
    fn test_parse_minimal_config() {
        let config: Config = toml::from_str("").unwrap();
        assert!(config.converter.add_table_of_contents);
        assert_eq!(config.converter.toc_threshold, 4);
    }

    #[test]
    fn test_parse_converter_config() {
        let toml = r"
[converter]
add_table_of_contents = false
toc_threshold = 6
";
        let config: Config = toml::from_str(toml).unwrap();
        assert_eq!(
            config.converter,
            ConvertOptions {
                add_table_of_contents: false,
                toc_threshold: 6,
            }
        );
    }

    #[test]
    fn test_default_converter_matches_converter_defaults() {
        let config: Config = toml::from_str("[converter]").unwrap();
        assert_eq!(config.converter, ConvertOptions::default());
    }

    #[test]
    fn test_parse_converter_camel_case() {
        let toml = r"
[converter]
addTableOfContents = false
tocThreshold = 2
";
        let config: Config = toml::from_str(toml).unwrap();
        assert!(!config.converter.add_table_of_contents);
        assert_eq!(config.converter.toc_threshold, 2);
    }

    #[test]
    fn test_parse_confluence_config() {
        let toml = r#"
[confluence]
base_url = "https://example.atlassian.net/wiki"
username = "bot@example.com"
api_token = "token123"
space_key = "DOCS"
"#;
        let config: Config = toml::from_str(toml).unwrap();
        let confluence = config.confluence.unwrap();
        assert_eq!(confluence.base_url, "https://example.atlassian.net/wiki");
        assert_eq!(confluence.username, "bot@example.com");
        assert_eq!(confluence.api_token, "token123");
        assert_eq!(confluence.space_key.as_deref(), Some("DOCS"));
        assert_eq!(confluence.managed_label, DEFAULT_MANAGED_LABEL);
    }

    #[test]
    fn test_resolve_paths() {
        let toml = r#"
[publish]
diagrams_dir = "build/views"
warning = "Do not edit"
"#;
        let mut config: Config = toml::from_str(toml).unwrap();
        config.resolve_paths(Path::new("/project"));

        assert_eq!(
            config.publish_resolved.diagrams_dir,
            PathBuf::from("/project/build/views")
        );
        assert_eq!(config.publish_resolved.warning.as_deref(), Some("Do not edit"));
    }

    #[test]
    fn test_empty_warning_disables_panel() {
        let toml = r#"
[publish]
warning = ""
"#;
        let mut config: Config = toml::from_str(toml).unwrap();
        config.resolve_paths(Path::new("/project"));
        assert!(config.publish_resolved.warning.is_none());
    }

    #[test]
    fn test_validate_zero_threshold() {
        let toml = r"
[converter]
toc_threshold = 0
";
        let config: Config = toml::from_str(toml).unwrap();
        let err = config.validate().unwrap_err();
        assert!(matches!(err, ConfigError::Validation(_)));
        assert!(err.to_string().contains("toc_threshold"));
    }

    #[test]
    fn test_validate_confluence_url_scheme() {
        let toml = r#"
[confluence]
base_url = "example.atlassian.net"
username = "bot"
api_token = "t"
"#;
        let config: Config = toml::from_str(toml).unwrap();
        let err = config.require_confluence().unwrap_err();
        assert!(err.to_string().contains("http://"));
    }

    #[test]
    fn test_require_confluence_missing() {
        let config = Config::default_with_base(Path::new("/test"));
        assert!(matches!(
            config.require_confluence(),
            Err(ConfigError::Validation(_))
        ));
    }

    #[test]
    fn test_apply_cli_settings() {
        let mut config = Config::default_with_base(Path::new("/test"));
        config.confluence = Some(ConfluenceConfig {
            base_url: "https://c.example.com".to_owned(),
            username: "u".to_owned(),
            api_token: "t".to_owned(),
            space_key: None,
            managed_label: DEFAULT_MANAGED_LABEL.to_owned(),
        });

        config.apply_cli_settings(&CliSettings {
            add_table_of_contents: Some(false),
            toc_threshold: Some(2),
            space_key: Some("ENG".to_owned()),
            diagrams_dir: Some(PathBuf::from("/views")),
        });

        assert!(!config.converter.add_table_of_contents);
        assert_eq!(config.converter.toc_threshold, 2);
        assert_eq!(
            config.confluence.as_ref().and_then(|c| c.space_key.as_deref()),
            Some("ENG")
        );
        assert_eq!(config.publish_resolved.diagrams_dir, PathBuf::from("/views"));
    }

    #[test]
    fn test_apply_cli_settings_empty() {
        let mut config = Config::default_with_base(Path::new("/test"));
        config.apply_cli_settings(&CliSettings::default());
        assert!(config.converter.add_table_of_contents);
        assert_eq!(config.converter.toc_threshold, 4);
    }

    #[test]
    fn test_expand_env_vars_confluence() {
        // SAFETY: variable names are unique to this test
        unsafe {
            std::env::set_var("ATLAS_TEST_CFG_URL", "https://wiki.test.com");
            std::env::set_var("ATLAS_TEST_CFG_TOKEN", "secret-token");
        }

        let toml = r#"
[confluence]
base_url = "${ATLAS_TEST_CFG_URL}"
username = "${ATLAS_TEST_CFG_USER:-robot}"
api_token = "${ATLAS_TEST_CFG_TOKEN}"
"#;
        let mut config: Config = toml::from_str(toml).unwrap();
        config.expand_env_vars().unwrap();

        let confluence = config.confluence.unwrap();
        assert_eq!(confluence.base_url, "https://wiki.test.com");
        assert_eq!(confluence.username, "robot");
        assert_eq!(confluence.api_token, "secret-token");

        unsafe {
            std::env::remove_var("ATLAS_TEST_CFG_URL");
            std::env::remove_var("ATLAS_TEST_CFG_TOKEN");
        }
    }

    #[test]
    fn test_load_explicit_file() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("atlas.toml");
        std::fs::write(&path, "[converter]\ntoc_threshold = 3\n").unwrap();

        let config = Config::load(Some(&path), None).unwrap();
        assert_eq!(config.converter.toc_threshold, 3);
        assert_eq!(config.config_path.as_deref(), Some(path.as_path()));
        assert_eq!(
            config.publish_resolved.diagrams_dir,
            dir.path().join("diagrams")
        );
    }

    #[test]
    fn test_load_missing_file() {
        let err = Config::load(Some(Path::new("/nonexistent/atlas.toml")), None).unwrap_err();
        assert!(matches!(err, ConfigError::NotFound(_)));
    }

    #[test]
    fn test_load_rejects_invalid_cli_threshold() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("atlas.toml");
        std::fs::write(&path, "").unwrap();

        let settings = CliSettings {
            toc_threshold: Some(0),
            ..Default::default()
        };
        assert!(Config::load(Some(&path), Some(&settings)).is_err());
    }

    #[test]
    fn test_discover_from_parent_directory() {
        let dir = tempfile::tempdir().unwrap();
        let nested = dir.path().join("docs/guides");
        std::fs::create_dir_all(&nested).unwrap();
        std::fs::write(dir.path().join(CONFIG_FILENAME), "").unwrap();

        assert_eq!(
            Config::discover_from(&nested),
            Some(dir.path().join(CONFIG_FILENAME))
        );
    }
}
