//! Command-Line Interface

use crate::error::SettingsError;
use crate::settings::{parse_option, Settings};
use crate::sink::OutputFormat;
use clap::{ArgAction, Parser};
use serde_json::Value;
use std::path::PathBuf;

/// Extract metafeatures from every preprocessed dataset matching a pattern
#[derive(Parser, Debug)]
#[command(name = "mfe-extract", version, about)]
pub struct Cli {
    /// Output file to save the metafeatures (standard output when omitted)
    #[arg(short, long, value_name = "FILE")]
    pub output: Option<PathBuf>,

    /// Feature groups to extract
    #[arg(long, num_args = 1.., value_name = "GROUP", conflicts_with = "all_features")]
    pub features: Option<Vec<String>>,

    /// Extract every group the extractor supports
    #[arg(long)]
    pub all_features: bool,

    /// Glob pattern matching feature files
    #[arg(long, value_name = "GLOB")]
    pub pattern: Option<String>,

    /// Dataset names to skip (glob patterns)
    #[arg(long, num_args = 1.., value_name = "GLOB")]
    pub exclude: Option<Vec<String>>,

    /// Output layout
    #[arg(long, value_enum)]
    pub format: Option<OutputFormat>,

    /// Summary functions for multi-valued metafeatures
    #[arg(long, num_args = 1.., value_name = "NAME")]
    pub summary: Option<Vec<String>>,

    /// Seed for randomized metafeatures
    #[arg(long, value_name = "N")]
    pub random_state: Option<u64>,

    /// Extractor option, value parsed as JSON when possible
    #[arg(long = "option", value_name = "KEY=VALUE", value_parser = parse_option)]
    pub options: Vec<(String, Value)>,

    /// Do not read label files
    #[arg(long)]
    pub unsupervised: bool,

    /// Log and skip datasets that fail instead of aborting
    #[arg(long)]
    pub keep_going: bool,

    /// Increase extractor verbosity
    #[arg(short, long, action = ArgAction::Count)]
    pub verbose: u8,

    /// Warn about non-finite metafeatures
    #[arg(long)]
    pub warnings: bool,

    /// Settings file (TOML, YAML or JSON)
    #[arg(short, long, value_name = "FILE")]
    pub config: Option<PathBuf>,
}

impl Cli {
    /// Layered settings with command-line flags applied last
    pub fn settings(&self) -> Result<Settings, SettingsError> {
        let mut settings = Settings::load(self.config.as_deref())?;
        self.apply(&mut settings);
        Ok(settings)
    }

    /// Override `settings` with every flag given on the command line
    pub fn apply(&self, settings: &mut Settings) {
        if let Some(output) = &self.output {
            settings.output = Some(output.clone());
        }
        if self.all_features {
            settings.features = None;
        } else if let Some(features) = &self.features {
            settings.features = Some(features.clone());
        }
        if let Some(pattern) = &self.pattern {
            settings.pattern = pattern.clone();
        }
        if let Some(exclude) = &self.exclude {
            settings.exclude = exclude.clone();
        }
        if let Some(format) = self.format {
            settings.format = format;
        }
        if let Some(summary) = &self.summary {
            settings.summary = Some(summary.clone());
        }
        if let Some(seed) = self.random_state {
            settings.random_state = Some(seed);
        }
        settings.options.extend(self.options.iter().cloned());
        if self.unsupervised {
            settings.unsupervised = true;
        }
        if self.keep_going {
            settings.keep_going = true;
        }
        if self.verbose > 0 {
            settings.verbose = settings.verbose.saturating_add(self.verbose);
        }
        if self.warnings {
            settings.suppress_warnings = false;
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use clap::CommandFactory;
    use serde_json::json;

    fn parse(args: &[&str]) -> Cli {
        Cli::try_parse_from(std::iter::once("mfe-extract").chain(args.iter().copied())).unwrap()
    }

    fn applied(args: &[&str]) -> Settings {
        let mut settings = Settings::default();
        parse(args).apply(&mut settings);
        settings
    }

    #[test]
    fn test_command_is_well_formed() {
        Cli::command().debug_assert();
    }

    #[test]
    fn test_no_flags_keeps_settings() {
        assert_eq!(applied(&[]), Settings::default());
    }

    #[test]
    fn test_output_and_features() {
        let settings = applied(&["-o", "out.jsonl", "--features", "general", "info-theory"]);
        assert_eq!(settings.output, Some(PathBuf::from("out.jsonl")));
        assert_eq!(
            settings.features,
            Some(vec!["general".to_string(), "info-theory".to_string()])
        );
    }

    #[test]
    fn test_all_features_defers_to_extractor() {
        assert_eq!(applied(&["--all-features"]).features, None);
        assert!(Cli::try_parse_from(["mfe-extract", "--all-features", "--features", "general"]).is_err());
    }

    #[test]
    fn test_format_and_flags() {
        let settings = applied(&[
            "--format",
            "json",
            "--exclude",
            "*MNIST",
            "--keep-going",
            "--unsupervised",
            "--random-state",
            "42",
            "-vv",
            "--warnings",
        ]);
        assert_eq!(settings.format, OutputFormat::Json);
        assert_eq!(settings.exclude, vec!["*MNIST"]);
        assert!(settings.keep_going);
        assert!(settings.unsupervised);
        assert_eq!(settings.random_state, Some(42));
        assert_eq!(settings.verbose, 3);
        assert!(!settings.suppress_warnings);
    }

    #[test]
    fn test_options() {
        let settings = applied(&["--option", "num_cv_folds=5", "--option", "lm_sample_frac=0.5"]);
        assert_eq!(settings.options["num_cv_folds"], json!(5));
        assert_eq!(settings.options["lm_sample_frac"], json!(0.5));
        assert!(Cli::try_parse_from(["mfe-extract", "--option", "broken"]).is_err());
    }

    #[test]
    fn test_unknown_format_rejected() {
        assert!(Cli::try_parse_from(["mfe-extract", "--format", "csv"]).is_err());
    }
}
