//! Configuration management for the XHTML wiki parser.
//!
//! Parses `wr.toml` configuration files with serde and provides
//! auto-discovery of config files in parent directories.
//!
//! ## Environment Variable Expansion
//!
//! Syntax fields support environment variable expansion:
//!
//! - `${VAR}` - expands to the value of VAR, errors if unset
//! - `${VAR:-default}` - expands to VAR if set, otherwise uses default
//!
//! Expanded fields:
//! - `parser.target_syntax`
//! - `parser.default_syntax`

mod expand;

use std::path::{Path, PathBuf};

use serde::Deserialize;
use wr_renderer::Syntax;

/// Configuration filename to search for.
const CONFIG_FILENAME: &str = "wr.toml";

/// Parser configuration.
#[derive(Debug, Default, Deserialize)]
#[serde(default)]
pub struct Config {
    /// Syntax settings (strings as written in TOML).
    parser: ParserConfigRaw,
    /// Metadata marker configuration.
    pub metadata: MetadataConfig,

    /// Resolved syntax settings (set after loading).
    #[serde(skip)]
    pub parser_resolved: ParserConfig,
    /// Path to the config file (set after loading).
    #[serde(skip)]
    pub config_path: Option<PathBuf>,
}

/// Raw parser configuration as parsed from TOML.
#[derive(Debug, Deserialize, Default)]
#[serde(default)]
struct ParserConfigRaw {
    target_syntax: Option<String>,
    default_syntax: Option<String>,
}

/// Resolved syntax settings.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ParserConfig {
    /// Document-wide target syntax used when no region overrides it.
    pub target_syntax: Option<Syntax>,
    /// The parser's own syntax, the last resort of syntax resolution.
    pub default_syntax: Syntax,
}

impl Default for ParserConfig {
    fn default() -> Self {
        Self {
            target_syntax: None,
            default_syntax: Syntax::XHTML_1_0,
        }
    }
}

/// How metadata marker elements are recognized.
#[derive(Debug, Clone, Deserialize, PartialEq, Eq)]
#[serde(default)]
pub struct MetadataConfig {
    /// Class token identifying a metadata container element.
    pub container_class: String,
    /// Prefix of attributes carrying metadata keys.
    pub attribute_prefix: String,
}

impl Default for MetadataConfig {
    fn default() -> Self {
        Self {
            container_class: "xwiki-metadata-container".to_owned(),
            attribute_prefix: "data-xwiki-".to_owned(),
        }
    }
}

impl MetadataConfig {
    /// Validate metadata settings.
    ///
    /// # Errors
    ///
    /// Returns `ConfigError::Validation` if a field is empty or contains whitespace.
    pub fn validate(&self) -> Result<(), ConfigError> {
        require_token(&self.container_class, "metadata.container_class")?;
        require_token(&self.attribute_prefix, "metadata.attribute_prefix")?;
        Ok(())
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
        /// Config field path (e.g., "`parser.target_syntax`").
        field: String,
        /// Error message (e.g., "${`WR_TARGET_SYNTAX`} not set").
        message: String,
    },
}

/// Require a string field to be a non-empty token without whitespace.
fn require_token(value: &str, field: &str) -> Result<(), ConfigError> {
    if value.is_empty() {
        return Err(ConfigError::Validation(format!("{field} cannot be empty")));
    }
    if value.chars().any(char::is_whitespace) {
        return Err(ConfigError::Validation(format!(
            "{field} cannot contain whitespace"
        )));
    }
    Ok(())
}

/// Parse a syntax id field.
fn parse_syntax(value: &str, field: &str) -> Result<Syntax, ConfigError> {
    Syntax::parse(value).map_err(|e| ConfigError::Validation(format!("{field}: {e}")))
}

impl Config {
    /// Load configuration.
    ///
    /// If `config_path` is provided, loads from that file.
    /// Otherwise, searches for `wr.toml` in current directory and parents,
    /// falling back to defaults when none is found.
    ///
    /// # Errors
    ///
    /// Returns error if explicit `config_path` doesn't exist or parsing fails.
    pub fn load(config_path: Option<&Path>) -> Result<Self, ConfigError> {
        if let Some(path) = config_path {
            if !path.exists() {
                return Err(ConfigError::NotFound(path.to_path_buf()));
            }
            return Self::load_from_file(path);
        }

        let discovered = std::env::current_dir()
            .ok()
            .and_then(|cwd| Self::discover_from(&cwd));
        match discovered {
            Some(path) => Self::load_from_file(&path),
            None => {
                tracing::debug!("No {CONFIG_FILENAME} found, using defaults");
                Ok(Self::default())
            }
        }
    }

    /// Parse configuration from TOML text.
    ///
    /// # Errors
    ///
    /// Returns error if parsing, expansion or validation fails.
    pub fn from_toml_str(content: &str) -> Result<Self, ConfigError> {
        let mut config: Self = toml::from_str(content)?;

        config.expand_env_vars()?;
        config.resolve()?;
        config.validate()?;

        Ok(config)
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

    /// Load configuration from a specific file.
    fn load_from_file(path: &Path) -> Result<Self, ConfigError> {
        let content = std::fs::read_to_string(path)?;
        let mut config = Self::from_toml_str(&content)?;
        config.config_path = Some(path.to_path_buf());

        tracing::debug!(path = %path.display(), "Loaded configuration");
        Ok(config)
    }

    /// Validate configuration values.
    ///
    /// # Errors
    ///
    /// Returns `ConfigError::Validation` if any validation fails.
    pub fn validate(&self) -> Result<(), ConfigError> {
        self.metadata.validate()
    }

    /// Expand environment variable references in syntax strings.
    fn expand_env_vars(&mut self) -> Result<(), ConfigError> {
        if let Some(ref target) = self.parser.target_syntax {
            self.parser.target_syntax =
                Some(expand::expand_env(target, "parser.target_syntax")?);
        }
        if let Some(ref default) = self.parser.default_syntax {
            self.parser.default_syntax =
                Some(expand::expand_env(default, "parser.default_syntax")?);
        }
        Ok(())
    }

    /// Parse syntax strings into resolved settings.
    ///
    /// An empty `target_syntax` (e.g. from `${VAR:-}`) means no target.
    fn resolve(&mut self) -> Result<(), ConfigError> {
        let target_syntax = match self.parser.target_syntax.as_deref() {
            None | Some("") => None,
            Some(id) => Some(parse_syntax(id, "parser.target_syntax")?),
        };
        let default_syntax = match self.parser.default_syntax.as_deref() {
            None => Syntax::XHTML_1_0,
            Some(id) => parse_syntax(id, "parser.default_syntax")?,
        };

        self.parser_resolved = ParserConfig {
            target_syntax,
            default_syntax,
        };
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use pretty_assertions::assert_eq;

    #[test]
    fn test_default_config() {
        let config = Config::default();
        assert_eq!(config.parser_resolved.target_syntax, None);
        assert_eq!(config.parser_resolved.default_syntax, Syntax::XHTML_1_0);
        assert_eq!(config.metadata.container_class, "xwiki-metadata-container");
        assert_eq!(config.metadata.attribute_prefix, "data-xwiki-");
    }

    #[test]
    fn test_parse_minimal_config() {
        let config = Config::from_toml_str("").unwrap();
        assert_eq!(config.parser_resolved, ParserConfig::default());
        assert_eq!(config.metadata, MetadataConfig::default());
    }

    #[test]
    fn test_parse_parser_config() {
        let toml = r#"
[parser]
target_syntax = "markdown/1.2"
default_syntax = "xwiki/2.1"
"#;
        let config = Config::from_toml_str(toml).unwrap();
        assert_eq!(
            config.parser_resolved.target_syntax,
            Some(Syntax::MARKDOWN_1_2)
        );
        assert_eq!(config.parser_resolved.default_syntax, Syntax::XWIKI_2_1);
    }

    #[test]
    fn test_parse_metadata_config() {
        let toml = r#"
[metadata]
container_class = "meta"
attribute_prefix = "data-meta-"
"#;
        let config = Config::from_toml_str(toml).unwrap();
        assert_eq!(config.metadata.container_class, "meta");
        assert_eq!(config.metadata.attribute_prefix, "data-meta-");
    }

    #[test]
    fn test_invalid_syntax_rejected() {
        let toml = r#"
[parser]
target_syntax = "xwiki"
"#;
        let err = Config::from_toml_str(toml).unwrap_err();
        assert!(matches!(err, ConfigError::Validation(ref msg) if msg.contains("parser.target_syntax")));
    }

    #[test]
    fn test_empty_container_class_rejected() {
        let toml = r#"
[metadata]
container_class = ""
"#;
        let err = Config::from_toml_str(toml).unwrap_err();
        assert!(matches!(err, ConfigError::Validation(_)));
    }

    #[test]
    fn test_target_syntax_env_default() {
        let toml = r#"
[parser]
target_syntax = "${WR_TEST_SURELY_UNSET_TARGET:-plain/1.0}"
"#;
        let config = Config::from_toml_str(toml).unwrap();
        assert_eq!(config.parser_resolved.target_syntax, Some(Syntax::PLAIN_1_0));
    }

    #[test]
    fn test_empty_target_syntax_means_none() {
        let toml = r#"
[parser]
target_syntax = "${WR_TEST_SURELY_UNSET_TARGET:-}"
"#;
        let config = Config::from_toml_str(toml).unwrap();
        assert_eq!(config.parser_resolved.target_syntax, None);
    }

    #[test]
    fn test_load_missing_explicit_path() {
        let err = Config::load(Some(Path::new("/nonexistent/wr.toml"))).unwrap_err();
        assert!(matches!(err, ConfigError::NotFound(_)));
    }

    #[test]
    fn test_load_explicit_path() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join(CONFIG_FILENAME);
        std::fs::write(&path, "[parser]\ntarget_syntax = \"xwiki/2.1\"\n").unwrap();

        let config = Config::load(Some(&path)).unwrap();
        assert_eq!(config.parser_resolved.target_syntax, Some(Syntax::XWIKI_2_1));
        assert_eq!(config.config_path, Some(path));
    }

    #[test]
    fn test_discover_in_parent_directory() {
        let dir = tempfile::tempdir().unwrap();
        let nested = dir.path().join("a").join("b");
        std::fs::create_dir_all(&nested).unwrap();
        std::fs::write(dir.path().join(CONFIG_FILENAME), "").unwrap();

        let found = Config::discover_from(&nested).unwrap();
        assert_eq!(found, dir.path().join(CONFIG_FILENAME));
    }
}
