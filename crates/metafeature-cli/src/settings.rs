//! Run Settings
//!
//! Layered with the `config` crate: built-in defaults, then an optional
//! settings file, then `MFE_*` environment variables. Command-line flags are
//! applied on top by [`crate::Cli`].

use crate::error::SettingsError;
use crate::sink::OutputFormat;
use config::{Config, Environment, File};
use dataset_loader::{ExclusionPolicy, LoadError, DEFAULT_PATTERN};
use feature_engine::{ExtractOptions, ExtractionConfig};
use serde::{Deserialize, Serialize};
use serde_json::Value;
use std::collections::BTreeMap;
use std::path::{Path, PathBuf};
use tracing::debug;

/// Prefix of environment variables read into [`Settings`]
pub const ENV_PREFIX: &str = "MFE";

/// Feature groups extracted unless configured otherwise
pub const DEFAULT_FEATURES: [&str; 4] = ["general", "statistical", "model-based", "landmarking"];

/// Everything a run needs
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct Settings {
    /// Glob pattern matching feature files
    pub pattern: String,
    /// Glob patterns of dataset names to skip
    pub exclude: Vec<String>,
    /// Output file (standard output when unset)
    pub output: Option<PathBuf>,
    pub format: OutputFormat,
    /// Feature groups (extractor defaults when unset)
    pub features: Option<Vec<String>>,
    /// Summary functions (extractor defaults when unset)
    pub summary: Option<Vec<String>>,
    pub random_state: Option<u64>,
    /// Pass-through extractor options
    pub options: BTreeMap<String, Value>,
    /// Ignore label files
    pub unsupervised: bool,
    /// Log and skip datasets that fail instead of aborting
    pub keep_going: bool,
    /// Extractor verbosity
    pub verbose: u8,
    /// Silence non-finite metafeature warnings
    pub suppress_warnings: bool,
}

impl Default for Settings {
    fn default() -> Self {
        let extract = ExtractOptions::default();
        Self {
            pattern: DEFAULT_PATTERN.to_string(),
            exclude: Vec::new(),
            output: None,
            format: OutputFormat::default(),
            features: Some(DEFAULT_FEATURES.iter().map(|s| s.to_string()).collect()),
            summary: None,
            random_state: Some(0),
            options: BTreeMap::new(),
            unsupervised: false,
            keep_going: false,
            verbose: extract.verbose,
            suppress_warnings: extract.suppress_warnings,
        }
    }
}

impl Settings {
    /// Load defaults, the optional settings file and `MFE_*` variables
    pub fn load(file: Option<&Path>) -> Result<Self, SettingsError> {
        Self::load_from(file, Environment::with_prefix(ENV_PREFIX))
    }

    fn load_from(file: Option<&Path>, env: Environment) -> Result<Self, SettingsError> {
        let mut builder = Config::builder().add_source(Config::try_from(&Settings::default())?);
        if let Some(path) = file {
            debug!("Reading settings from {}", path.display());
            builder = builder.add_source(File::from(path));
        }
        let env = env
            .try_parsing(true)
            .list_separator(",")
            .with_list_parse_key("exclude")
            .with_list_parse_key("features")
            .with_list_parse_key("summary");

        Ok(builder.add_source(env).build()?.try_deserialize()?)
    }

    /// Extraction configuration for one dataset
    pub fn extraction_config(&self) -> ExtractionConfig {
        ExtractionConfig {
            groups: self.features.clone(),
            summary: self.summary.clone(),
            random_state: self.random_state,
            options: self.options.clone(),
        }
    }

    pub fn extract_options(&self) -> ExtractOptions {
        ExtractOptions {
            verbose: self.verbose,
            suppress_warnings: self.suppress_warnings,
        }
    }

    pub fn exclusions(&self) -> Result<ExclusionPolicy, LoadError> {
        ExclusionPolicy::new(&self.exclude)
    }
}

/// Parse `KEY=VALUE`; the value is read as JSON and kept as a string otherwise
pub fn parse_option(raw: &str) -> Result<(String, Value), SettingsError> {
    let (key, value) = raw
        .split_once('=')
        .filter(|(key, _)| !key.trim().is_empty())
        .ok_or_else(|| SettingsError::Option(raw.to_string()))?;
    let value = serde_json::from_str(value).unwrap_or_else(|_| Value::String(value.to_string()));
    Ok((key.trim().to_string(), value))
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;
    use std::fs;

    fn env(vars: &[(&str, &str)]) -> Environment {
        let map = vars
            .iter()
            .map(|(k, v)| (k.to_string(), v.to_string()))
            .collect::<config::Map<String, String>>();
        Environment::with_prefix(ENV_PREFIX).source(Some(map))
    }

    #[test]
    fn test_defaults() {
        let settings = Settings::load_from(None, env(&[])).unwrap();
        assert_eq!(settings, Settings::default());
        assert_eq!(settings.pattern, "data/datasets_processed/*.X");
        assert_eq!(settings.format, OutputFormat::Jsonl);
        assert_eq!(settings.features.as_ref().unwrap().len(), 4);
        assert_eq!(settings.random_state, Some(0));
    }

    #[test]
    fn test_settings_file_overrides_defaults() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("mfe.toml");
        fs::write(
            &path,
            r#"
pattern = "datasets/*.X"
format = "json"
exclude = ["*MNIST"]
keep_going = true

[options]
num_cv_folds = 5
"#,
        )
        .unwrap();

        let settings = Settings::load_from(Some(&path), env(&[])).unwrap();
        assert_eq!(settings.pattern, "datasets/*.X");
        assert_eq!(settings.format, OutputFormat::Json);
        assert_eq!(settings.exclude, vec!["*MNIST"]);
        assert!(settings.keep_going);
        assert_eq!(settings.options["num_cv_folds"], json!(5));
        assert_eq!(settings.random_state, Some(0));
    }

    #[test]
    fn test_environment_overrides_file() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("mfe.toml");
        fs::write(&path, "pattern = \"from-file/*.X\"\n").unwrap();

        let settings = Settings::load_from(
            Some(&path),
            env(&[
                ("MFE_PATTERN", "from-env/*.X"),
                ("MFE_FEATURES", "general,statistical"),
                ("MFE_RANDOM_STATE", "7"),
            ]),
        )
        .unwrap();
        assert_eq!(settings.pattern, "from-env/*.X");
        assert_eq!(
            settings.features,
            Some(vec!["general".to_string(), "statistical".to_string()])
        );
        assert_eq!(settings.random_state, Some(7));
    }

    #[test]
    fn test_missing_settings_file() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("absent.toml");
        assert!(matches!(
            Settings::load_from(Some(&path), env(&[])),
            Err(SettingsError::Config(_))
        ));
    }

    #[test]
    fn test_extraction_config_is_fresh() {
        let mut settings = Settings::default();
        settings.options.insert("num_cv_folds".into(), json!(3));
        let first = settings.extraction_config();
        let second = settings.extraction_config();
        assert_eq!(first, second);
        assert_eq!(first.random_state, Some(0));
        assert_eq!(first.groups.unwrap()[0], "general");
    }

    #[test]
    fn test_parse_option() {
        assert_eq!(parse_option("num_cv_folds=5").unwrap(), ("num_cv_folds".into(), json!(5)));
        assert_eq!(parse_option("frac=0.5").unwrap(), ("frac".into(), json!(0.5)));
        assert_eq!(parse_option("mode=fast").unwrap(), ("mode".into(), json!("fast")));
        assert_eq!(parse_option("flag=true").unwrap(), ("flag".into(), json!(true)));
        assert!(matches!(parse_option("novalue"), Err(SettingsError::Option(_))));
        assert!(matches!(parse_option("=5"), Err(SettingsError::Option(_))));
    }
}
