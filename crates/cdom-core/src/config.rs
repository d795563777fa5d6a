//! Configuration loading and parsing for cdom
//!
//! Provides functionality to load and parse `cdom.toml` configuration files.

use serde::Deserialize;
use std::collections::{HashMap, HashSet};
use std::path::{Path, PathBuf};

use crate::ast::Language;
use crate::context::{ResolutionOptions, TranslationUnitContext};
use crate::diagnostic::{Severity, SeverityMap};
use crate::problems::ProblemKind;

pub const CONFIG_FILENAME: &str = "cdom.toml";

const KNOWN_TOP_LEVEL_KEYS: &[&str] = &["language", "resolution", "diagnostics"];
const KNOWN_RESOLUTION_KEYS: &[&str] = &["implicit_function_declarations"];
const KNOWN_DIAGNOSTICS_KEYS: &[&str] = &["severity"];

#[derive(Debug, thiserror::Error)]
pub enum ConfigError {
    #[error("Failed to read config file '{path}': {source}")]
    ReadError {
        path: PathBuf,
        source: std::io::Error,
    },
    #[error("Invalid TOML in '{path}': {message}")]
    ParseError { path: PathBuf, message: String },
}

#[derive(Debug, Clone, Default)]
pub struct ConfigResult {
    pub config: Config,
    pub warnings: Vec<String>,
}

#[derive(Debug, Clone, Default, Deserialize, PartialEq)]
#[serde(default)]
pub struct Config {
    pub language: Option<LanguageValue>,
    pub resolution: ResolutionConfig,
    pub diagnostics: DiagnosticsConfig,
}

#[derive(Debug, Clone, Default, Deserialize, PartialEq)]
#[serde(default)]
pub struct ResolutionConfig {
    pub implicit_function_declarations: Option<bool>,
}

#[derive(Debug, Clone, Default, Deserialize, PartialEq)]
#[serde(default)]
pub struct DiagnosticsConfig {
    /// Severity per problem name, e.g. `name-not-found = "warning"`.
    pub severity: HashMap<String, SeverityValue>,
}

#[derive(Debug, Clone, Copy, Deserialize, PartialEq)]
#[serde(rename_all = "lowercase")]
pub enum LanguageValue {
    C,
    Cpp,
}

impl From<LanguageValue> for Language {
    fn from(value: LanguageValue) -> Self {
        match value {
            LanguageValue::C => Language::C,
            LanguageValue::Cpp => Language::Cpp,
        }
    }
}

#[derive(Debug, Clone, Copy, Deserialize, PartialEq)]
#[serde(rename_all = "lowercase")]
pub enum SeverityValue {
    Error,
    Warning,
    Info,
    Hint,
}

impl From<SeverityValue> for Severity {
    fn from(value: SeverityValue) -> Self {
        match value {
            SeverityValue::Error => Severity::Error,
            SeverityValue::Warning => Severity::Warning,
            SeverityValue::Info => Severity::Info,
            SeverityValue::Hint => Severity::Hint,
        }
    }
}

impl Config {
    pub fn context_options(&self) -> ResolutionOptions {
        let defaults = ResolutionOptions::default();
        ResolutionOptions {
            implicit_function_declarations: self
                .resolution
                .implicit_function_declarations
                .unwrap_or(defaults.implicit_function_declarations),
        }
    }

    /// Context for a translation unit resolved under this configuration.
    pub fn context(&self) -> TranslationUnitContext {
        let context = TranslationUnitContext::new().with_options(self.context_options());
        match self.language {
            Some(language) => context.with_language(language.into()),
            None => context,
        }
    }

    /// Severity overrides keyed by problem kind. Unknown problem names are skipped.
    pub fn severities(&self) -> SeverityMap {
        let mut map = SeverityMap::new();
        for (name, severity) in &self.diagnostics.severity {
            if let Some(kind) = ProblemKind::from_name(name) {
                map.set(kind, (*severity).into());
            }
        }
        map
    }
}

pub fn find_config_file(start_dir: &Path) -> Option<PathBuf> {
    let mut current = start_dir.to_path_buf();
    loop {
        let config_path = current.join(CONFIG_FILENAME);
        if config_path.exists() {
            return Some(config_path);
        }
        if !current.pop() {
            return None;
        }
    }
}

fn read_config(path: &Path) -> Result<String, ConfigError> {
    std::fs::read_to_string(path).map_err(|e| ConfigError::ReadError {
        path: path.to_path_buf(),
        source: e,
    })
}

fn parse_config(path: &Path, content: &str) -> Result<Config, ConfigError> {
    toml::from_str(content).map_err(|e| ConfigError::ParseError {
        path: path.to_path_buf(),
        message: e.message().to_string(),
    })
}

pub fn load_config(path: &Path) -> Result<Config, ConfigError> {
    let content = read_config(path)?;
    parse_config(path, &content)
}

pub fn load_config_with_warnings(path: &Path) -> Result<ConfigResult, ConfigError> {
    let content = read_config(path)?;
    let config = parse_config(path, &content)?;
    let warnings = detect_unknown_keys(&content);

    Ok(ConfigResult { config, warnings })
}

fn detect_unknown_keys(content: &str) -> Vec<String> {
    let mut warnings = Vec::new();

    let table: toml::Table = match content.parse() {
        Ok(t) => t,
        Err(_) => return warnings,
    };

    let known_top: HashSet<&str> = KNOWN_TOP_LEVEL_KEYS.iter().copied().collect();
    for key in table.keys() {
        if !known_top.contains(key.as_str()) {
            warnings.push(format!("Unknown config option: '{}'", key));
        }
    }

    for (section, known) in [
        ("resolution", KNOWN_RESOLUTION_KEYS),
        ("diagnostics", KNOWN_DIAGNOSTICS_KEYS),
    ] {
        if let Some(toml::Value::Table(entries)) = table.get(section) {
            for key in entries.keys() {
                if !known.contains(&key.as_str()) {
                    warnings.push(format!("Unknown config option in [{}]: '{}'", section, key));
                }
            }
        }
    }

    if let Some(toml::Value::Table(diagnostics)) = table.get("diagnostics")
        && let Some(toml::Value::Table(severity)) = diagnostics.get("severity")
    {
        for key in severity.keys() {
            if ProblemKind::from_name(key).is_none() {
                warnings.push(format!("Unknown problem kind in [diagnostics.severity]: '{}'", key));
            }
        }
    }

    warnings
}

pub fn load_config_or_default(start_dir: &Path) -> Config {
    find_config_file(start_dir)
        .and_then(|path| load_config(&path).ok())
        .unwrap_or_default()
}

pub fn load_config_or_default_with_warnings(start_dir: &Path) -> ConfigResult {
    match find_config_file(start_dir) {
        Some(path) => load_config_with_warnings(&path).unwrap_or_default(),
        None => ConfigResult::default(),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::fs;

    fn create_temp_dir() -> tempfile::TempDir {
        tempfile::tempdir().expect("Failed to create temp dir")
    }

    #[test]
    fn load_config_from_file() {
        let dir = create_temp_dir();
        let config_path = dir.path().join(CONFIG_FILENAME);
        fs::write(
            &config_path,
            r#"
language = "cpp"

[resolution]
implicit_function_declarations = false

[diagnostics.severity]
name-not-found = "warning"
"#,
        )
        .unwrap();

        let config = load_config(&config_path).unwrap();

        assert_eq!(config.language, Some(LanguageValue::Cpp));
        assert_eq!(config.resolution.implicit_function_declarations, Some(false));
        assert_eq!(
            config.diagnostics.severity.get("name-not-found"),
            Some(&SeverityValue::Warning)
        );
    }

    #[test]
    fn default_config_when_missing() {
        let dir = create_temp_dir();
        let config = load_config_or_default(dir.path());

        assert_eq!(config, Config::default());
        assert!(config.language.is_none());
        assert!(config.context_options().implicit_function_declarations);
    }

    #[test]
    fn error_on_invalid_toml() {
        let dir = create_temp_dir();
        let config_path = dir.path().join(CONFIG_FILENAME);
        fs::write(&config_path, "this is not valid { toml }").unwrap();

        let result = load_config(&config_path);

        match result {
            Err(ConfigError::ParseError { path, message }) => {
                assert_eq!(path, config_path);
                assert!(!message.is_empty());
            }
            other => panic!("Expected ParseError, got {:?}", other),
        }
    }

    #[test]
    fn error_on_missing_file() {
        let dir = create_temp_dir();
        let result = load_config(&dir.path().join(CONFIG_FILENAME));
        assert!(matches!(result, Err(ConfigError::ReadError { .. })));
    }

    #[test]
    fn find_config_in_parent_directory() {
        let dir = create_temp_dir();
        let nested = dir.path().join("src").join("unit");
        fs::create_dir_all(&nested).unwrap();
        fs::write(dir.path().join(CONFIG_FILENAME), "language = \"c\"\n").unwrap();

        let found = find_config_file(&nested).unwrap();
        assert_eq!(found, dir.path().join(CONFIG_FILENAME));
        assert_eq!(load_config_or_default(&nested).language, Some(LanguageValue::C));
    }

    #[test]
    fn unknown_keys_produce_warnings() {
        let dir = create_temp_dir();
        let config_path = dir.path().join(CONFIG_FILENAME);
        fs::write(
            &config_path,
            r#"
dialect = "gnu"

[resolution]
templates = true

[diagnostics.severity]
no-such-problem = "error"
"#,
        )
        .unwrap();

        let result = load_config_with_warnings(&config_path).unwrap();

        assert_eq!(
            result.warnings,
            vec![
                "Unknown config option: 'dialect'".to_string(),
                "Unknown config option in [resolution]: 'templates'".to_string(),
                "Unknown problem kind in [diagnostics.severity]: 'no-such-problem'".to_string(),
            ]
        );
    }

    #[test]
    fn context_carries_language_and_options() {
        let config = Config {
            language: Some(LanguageValue::Cpp),
            resolution: ResolutionConfig {
                implicit_function_declarations: Some(false),
            },
            diagnostics: DiagnosticsConfig::default(),
        };

        let context = config.context();

        assert_eq!(context.language, Some(Language::Cpp));
        assert!(!context.options.implicit_function_declarations);
    }

    #[test]
    fn severities_map_problem_names() {
        let mut config = Config::default();
        config
            .diagnostics
            .severity
            .insert("ambiguous-call".to_string(), SeverityValue::Hint);
        config
            .diagnostics
            .severity
            .insert("not-a-problem".to_string(), SeverityValue::Error);

        let map = config.severities();

        assert_eq!(map.severity(ProblemKind::AmbiguousCall), Severity::Hint);
        assert_eq!(map.severity(ProblemKind::NameNotFound), Severity::Error);
    }
}
