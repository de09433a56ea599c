//! Typed settings for one run.
//!
//! Built in two phases that must not be swapped: values from the resolved
//! [`ConfigSource`] (with built-in defaults), then command-line
//! [`Overrides`]. Boolean flags are OR-combined, so a flag set anywhere wins.

use std::path::PathBuf;

use serde::Serialize;
use tracing::{debug, info};

use crate::config::ConfigSource;
use crate::console::Verbosity;

pub const DEFAULT_TITLE: &str = "Class reference";
pub const DEFAULT_PHPDOC_COMMAND: &str = "phpDocumentor.phar";
pub const DEFAULT_CACHE_PATH: &str = "./cache";
pub const DEFAULT_GIT_REMOTE: &str = "origin";
pub const DEFAULT_GIT_BRANCH: &str = "master";

/// Values supplied on the command line. `None`/`false` means "not given".
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct Overrides {
    pub title: Option<String>,
    pub phpdoc: Option<String>,
    pub wiki: Option<PathBuf>,
    pub verbose: bool,
    pub debug: bool,
    pub quiet: bool,
    pub norun: bool,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct Settings {
    pub title: String,
    /// Command line used to call phpDocumentor; may include leading arguments.
    pub phpdoc_command: String,
    /// Generator config; filled in by synthesis when not configured.
    pub phpdoc_config: Option<PathBuf>,
    /// Generator template; filled in by staging when not configured.
    pub template: Option<PathBuf>,
    pub wiki_path: Option<PathBuf>,
    pub cache_path: PathBuf,
    pub project_path: PathBuf,
    pub git_remote: String,
    pub git_branch: String,
    pub source_paths: Vec<String>,
    pub ignore_tags: Vec<String>,
    pub visibilities: Vec<String>,
    pub verbose: bool,
    pub debug: bool,
    pub quiet: bool,
    /// Suppress git and phpDocumentor runs.
    pub norun: bool,
    /// Local config file the values came from, if any.
    pub config_file: Option<PathBuf>,
}

impl Settings {
    /// Reads every field from `config`, falling back to the built-in defaults.
    pub fn from_config(config: &dyn ConfigSource) -> Self {
        let settings = Self {
            title: config.get_string("title", DEFAULT_TITLE),
            phpdoc_command: config.get_string("phpdoc.command", DEFAULT_PHPDOC_COMMAND),
            phpdoc_config: optional_path(config.get_string("phpdoc.config", "")),
            template: optional_path(config.get_string("phpdoc.template", "")),
            wiki_path: optional_path(config.get_string("paths.output", "")),
            cache_path: PathBuf::from(config.get_string("paths.cache", DEFAULT_CACHE_PATH)),
            project_path: PathBuf::from(config.get_string("paths.project", "")),
            git_remote: config.get_string("git.remote", DEFAULT_GIT_REMOTE),
            git_branch: config.get_string("git.branch", DEFAULT_GIT_BRANCH),
            source_paths: config.get_array("source.path"),
            ignore_tags: config.get_array("ignore-tags.ignore-tag"),
            visibilities: config.get_array("visibilities.visibility"),
            verbose: config.get_bool("options.verbose", false),
            debug: config.get_bool("options.debug", false),
            quiet: config.get_bool("options.quiet", false),
            norun: config.get_bool("options.norun", false),
            config_file: None,
        };
        debug!(
            settings = %serde_yaml::to_string(&settings).unwrap_or_default(),
            "Settings read from configuration"
        );
        settings
    }

    /// Applies command-line values on top of the configured ones.
    pub fn apply_overrides(&mut self, overrides: &Overrides) {
        if let Some(title) = &overrides.title {
            self.title = title.clone();
        }
        if let Some(phpdoc) = &overrides.phpdoc {
            self.phpdoc_command = phpdoc.clone();
        }
        if let Some(wiki) = &overrides.wiki {
            self.wiki_path = Some(wiki.clone());
        }
        self.verbose |= overrides.verbose;
        self.debug |= overrides.debug;
        self.quiet |= overrides.quiet;
        self.norun |= overrides.norun;
    }

    /// Config values first, command line second.
    pub fn materialize(config: &dyn ConfigSource, overrides: &Overrides) -> Self {
        let mut settings = Self::from_config(config);
        settings.apply_overrides(overrides);
        info!(
            title = %settings.title,
            phpdoc = %settings.phpdoc_command,
            wiki = ?settings.wiki_path,
            cache = %settings.cache_path.display(),
            norun = settings.norun,
            "Settings materialized"
        );
        settings
    }

    pub fn verbosity(&self) -> Verbosity {
        Verbosity {
            verbose: self.verbose,
            debug: self.debug,
            quiet: self.quiet,
        }
    }
}

fn optional_path(value: String) -> Option<PathBuf> {
    if value.is_empty() {
        None
    } else {
        Some(PathBuf::from(value))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::config::{NullConfig, YamlConfig};

    #[test]
    fn defaults_without_any_config() {
        let settings = Settings::materialize(&NullConfig, &Overrides::default());
        assert_eq!(settings.title, DEFAULT_TITLE);
        assert_eq!(settings.phpdoc_command, DEFAULT_PHPDOC_COMMAND);
        assert_eq!(settings.cache_path, PathBuf::from(DEFAULT_CACHE_PATH));
        assert_eq!(settings.phpdoc_config, None);
        assert_eq!(settings.template, None);
        assert_eq!(settings.wiki_path, None);
        assert_eq!(settings.project_path, PathBuf::new());
        assert_eq!(settings.git_remote, "origin");
        assert_eq!(settings.git_branch, "master");
        assert!(settings.source_paths.is_empty());
        assert!(!settings.verbose && !settings.debug && !settings.quiet && !settings.norun);
    }

    #[test]
    fn command_line_wins_over_config() {
        let config = YamlConfig::from_str(
            r#"
title: From config
phpdoc:
  command: config-phpdoc
paths:
  output: /config/wiki
"#,
        )
        .unwrap();
        let overrides = Overrides {
            title: Some("From CLI".into()),
            phpdoc: Some("cli-phpdoc".into()),
            wiki: Some(PathBuf::from("/cli/wiki")),
            ..Default::default()
        };
        let settings = Settings::materialize(&config, &overrides);
        assert_eq!(settings.title, "From CLI");
        assert_eq!(settings.phpdoc_command, "cli-phpdoc");
        assert_eq!(settings.wiki_path, Some(PathBuf::from("/cli/wiki")));
    }

    #[test]
    fn boolean_flags_are_or_combined() {
        let config = YamlConfig::from_str("options:\n  verbose: true\n  norun: false\n").unwrap();
        let overrides = Overrides {
            norun: true,
            ..Default::default()
        };
        let settings = Settings::materialize(&config, &overrides);
        assert!(settings.verbose, "config flag survives absent CLI flag");
        assert!(settings.norun, "CLI flag wins over false in config");
        assert!(!settings.debug);
    }

    #[test]
    fn list_values_are_materialized() {
        let config = YamlConfig::from_str(
            r#"
source:
  path: [src, lib]
ignore-tags:
  ignore-tag: [internal]
visibilities:
  visibility: [public, protected]
"#,
        )
        .unwrap();
        let settings = Settings::from_config(&config);
        assert_eq!(settings.source_paths, vec!["src", "lib"]);
        assert_eq!(settings.ignore_tags, vec!["internal"]);
        assert_eq!(settings.visibilities, vec!["public", "protected"]);
    }
}
