//! Environment and configuration checks before anything is built.
//!
//! Validation runs in two phases:
//!
//! 1. Read-only environment checks (git, phpDocumentor, wiki path). All of
//!    them run and every failure is reported together. Any failure ends
//!    validation here, before the filesystem is touched.
//! 2. Cache preparation and generator input: the cache directory is created
//!    if needed, then the template and the generator config are either
//!    checked (when configured) or produced in the cache directory.
//!
//! Each check returns an optional `- ...` line; the caller concatenates them.

use std::fs;
use std::path::{Path, PathBuf};

use tracing::{info, warn};

use crate::error::ValidationErrors;
use crate::paths::make_absolute;
use crate::process::{CommandRunner, Invocation};
use crate::resources::Resources;
use crate::settings::Settings;
use crate::synthesize::{stage_template, synthesize_config};

pub const GIT: &str = "git";
/// Prefix the phpDocumentor version banner must start with.
pub const REQUIRED_PHPDOC_VERSION: &str = "phpDocumentor v3";
/// Marker directory of a git working tree.
pub const GIT_METADATA_DIR: &str = ".git";

pub struct Validator<'a, R: CommandRunner> {
    runner: &'a R,
    resources: &'a Resources,
    cwd: PathBuf,
}

impl<'a, R: CommandRunner> Validator<'a, R> {
    /// `cwd` is the directory relative paths in the settings are resolved against.
    pub fn new<P: Into<PathBuf>>(runner: &'a R, resources: &'a Resources, cwd: P) -> Self {
        Self {
            runner,
            resources,
            cwd: cwd.into(),
        }
    }

    /// Runs every check. On success `settings` holds absolute wiki, cache and
    /// project paths plus a template and generator config path.
    pub fn validate(&self, settings: &mut Settings) -> Result<(), ValidationErrors> {
        let git = self.check_git();
        let phpdoc = self.check_phpdoc(&settings.phpdoc_command);
        let wiki = match self.check_wiki_path(settings.wiki_path.as_deref()) {
            Ok(path) => {
                settings.wiki_path = Some(path);
                None
            }
            Err(message) => Some(message),
        };

        let environment = [git, phpdoc, wiki].into_iter().flatten().collect();
        if let Some(errors) = ValidationErrors::from_messages(environment) {
            warn!(%errors, "Environment validation failed");
            return Err(errors);
        }

        // The cache directory is required by everything that follows.
        if let Some(message) = self.prepare_cache(settings) {
            warn!(%message, "Cache path unusable");
            return Err(ValidationErrors::single(message));
        }
        settings.project_path = make_absolute(&settings.project_path, &self.cwd);

        // Staging may set `settings.template`, which synthesis reads.
        let template = self.resolve_template(settings);
        let phpdoc_config = self.resolve_phpdoc_config(settings);

        match ValidationErrors::from_messages([template, phpdoc_config].into_iter().flatten().collect()) {
            Some(errors) => {
                warn!(%errors, "phpDocumentor configuration invalid");
                Err(errors)
            }
            None => {
                info!(
                    wiki = ?settings.wiki_path,
                    cache = %settings.cache_path.display(),
                    template = ?settings.template,
                    phpdoc_config = ?settings.phpdoc_config,
                    "Validation passed"
                );
                Ok(())
            }
        }
    }

    /// git must answer `git --version`.
    pub fn check_git(&self) -> Option<String> {
        let found = self
            .runner
            .run(&Invocation::new(GIT).arg("--version"))
            .map(|out| !out.stdout.trim().is_empty())
            .unwrap_or(false);
        info!(found, "Checked for git");
        (!found).then(|| "- git not found!".to_string())
    }

    /// phpDocumentor must answer `--version` with a v3 banner.
    pub fn check_phpdoc(&self, command: &str) -> Option<String> {
        let query = Invocation::from_command_line(command).arg("--version");
        let banner = self
            .runner
            .run(&query)
            .ok()
            .map(|out| out.stdout.trim().to_string())
            .filter(|stdout| !stdout.is_empty());
        info!(command, ?banner, "Checked for phpDocumentor");
        match banner {
            None => Some(format!("- phpDocumentor not found! Command: {command}")),
            Some(banner) if !banner.starts_with(REQUIRED_PHPDOC_VERSION) => Some(format!(
                "- at least version 3.0 of phpDocumentor is needed! found {banner}"
            )),
            Some(_) => None,
        }
    }

    /// The wiki path must be set and be a directory holding a git repository.
    pub fn check_wiki_path(&self, wiki: Option<&Path>) -> Result<PathBuf, String> {
        let Some(wiki) = wiki.filter(|p| !p.as_os_str().is_empty()) else {
            return Err("- No wiki path specified!".to_string());
        };
        let wiki = make_absolute(wiki, &self.cwd);
        if !wiki.exists() {
            Err(format!("- The wiki path [{}] does not exist!", wiki.display()))
        } else if !wiki.is_dir() {
            Err(format!("- [{}] must be a directory!", wiki.display()))
        } else if !wiki.join(GIT_METADATA_DIR).exists() {
            Err(format!(
                "- The path [{}] doesn't contain a git repository!",
                wiki.display()
            ))
        } else {
            Ok(wiki)
        }
    }

    /// Creates the cache directory if missing and makes its path absolute.
    fn prepare_cache(&self, settings: &mut Settings) -> Option<String> {
        let cache = make_absolute(&settings.cache_path, &self.cwd);
        if !cache.exists() {
            if let Err(e) = fs::create_dir_all(&cache) {
                warn!(error = ?e, cache = %cache.display(), "Cannot create cache path");
                return Some(format!(
                    "- Cannot create the cache path [{}]!",
                    settings.cache_path.display()
                ));
            }
            info!(cache = %cache.display(), "Created cache path");
        } else if !cache.is_dir() {
            return Some(format!(
                "- [{}] must be a directory!",
                settings.cache_path.display()
            ));
        }
        settings.cache_path = cache.canonicalize().unwrap_or(cache);
        None
    }

    fn resolve_template(&self, settings: &mut Settings) -> Option<String> {
        match settings.template.clone() {
            None => stage_template(self.resources, settings)
                .err()
                .map(|e| e.to_string()),
            Some(template) => {
                let absolute = make_absolute(&template, &self.cwd);
                if absolute.exists() {
                    settings.template = Some(absolute);
                    None
                } else {
                    Some(format!(
                        "- phpDocumentor template [{}] not found!",
                        template.display()
                    ))
                }
            }
        }
    }

    fn resolve_phpdoc_config(&self, settings: &mut Settings) -> Option<String> {
        match settings.phpdoc_config.clone() {
            None => synthesize_config(self.resources, settings)
                .err()
                .map(|e| e.to_string()),
            Some(config) => {
                let absolute = make_absolute(&config, &self.cwd);
                if absolute.exists() {
                    settings.phpdoc_config = Some(absolute);
                    None
                } else {
                    Some(format!(
                        "- phpDocumentor configuration [{}] not found!",
                        config.display()
                    ))
                }
            }
        }
    }
}
