///
/// This module implements the CLI interface for github-wiki: argument parsing,
/// configuration resolution and the hand-off to [`github_wiki_core::publish`].
///
/// All real work (validation, template and config synthesis, git and
/// phpDocumentor invocation) lives in the `github-wiki-core` crate. This
/// module is CLI glue only.
///
/// ## How To Use
/// - From the command line: `github-wiki --wiki ../project.wiki -v`.
/// - Programmatically / in tests: build a [`Cli`] and call [`run`].
///
use std::env;
use std::path::{Path, PathBuf};

use anyhow::{Context, Result};
use clap::Parser;
use github_wiki_core::console::{Console, Verbosity};
use github_wiki_core::process::SystemRunner;
use github_wiki_core::publish::{banner, publish};
use github_wiki_core::resolve::resolve_config;
use github_wiki_core::resources::Resources;
use github_wiki_core::settings::{Overrides, Settings};

const HELP: &str = include_str!("../resources/githubwiki-help.txt");

/// CLI for github-wiki: publish a phpDocumentor class reference to a GitHub wiki.
#[derive(Parser, Debug, Default)]
#[clap(
    name = "github-wiki",
    version,
    about = "Generate a class reference with phpDocumentor and push it to a GitHub wiki",
    after_help = HELP
)]
pub struct Cli {
    /// Config file to use instead of ./githubwiki.yaml
    #[clap(long)]
    pub config: Option<PathBuf>,

    /// Title of the wiki
    #[clap(long)]
    pub title: Option<String>,

    /// Command used to call phpDocumentor
    #[clap(long)]
    pub phpdoc: Option<String>,

    /// Local clone of the wiki repository
    #[clap(long)]
    pub wiki: Option<PathBuf>,

    /// Show the output of git and phpDocumentor
    #[clap(short, long)]
    pub verbose: bool,

    /// Show exit codes and the exact commands run
    #[clap(short, long)]
    pub debug: bool,

    /// No console output at all
    #[clap(short, long)]
    pub quiet: bool,

    /// Do not run git or phpDocumentor, only show what would be done
    #[clap(short, long)]
    pub norun: bool,
}

impl Cli {
    pub fn overrides(&self) -> Overrides {
        Overrides {
            title: self.title.clone(),
            phpdoc: self.phpdoc.clone(),
            wiki: self.wiki.clone(),
            verbose: self.verbose,
            debug: self.debug,
            quiet: self.quiet,
            norun: self.norun,
        }
    }
}

/// Resolves configuration relative to `cwd` and materializes the settings.
pub fn load_settings(cli: &Cli, cwd: &Path, exe_dir: Option<&Path>) -> Result<Settings> {
    let resolved = resolve_config(cli.config.as_deref(), cwd, exe_dir)
        .context("Failed to load configuration")?;
    let mut settings = Settings::materialize(resolved.source(), &cli.overrides());
    settings.config_file = resolved.local_file.clone();
    Ok(settings)
}

/// CLI entrypoint used by `main()` and integration tests.
pub fn run(cli: Cli) -> Result<()> {
    tracing::info!(?cli, "CLI arguments parsed");

    let cwd = env::current_dir().context("Error getting current working directory")?;
    let exe_dir = env::current_exe()
        .ok()
        .and_then(|exe| exe.parent().map(Path::to_path_buf));

    let settings = match load_settings(&cli, &cwd, exe_dir.as_deref()) {
        Ok(settings) => settings,
        Err(e) => {
            let console = Console::stdout(Verbosity {
                quiet: cli.quiet,
                ..Default::default()
            });
            console.error(&format!("- {e:#}"));
            return Err(e);
        }
    };

    let console = Console::stdout(settings.verbosity());
    console.always(&banner());

    let resources = Resources::locate();
    publish(&SystemRunner, &console, &resources, &cwd, settings)?;
    Ok(())
}
