//! The pull → generate → push cycle against the wiki repository.
//!
//! Each stage gates the next; the first failing stage ends the build.
//! Committing local changes before pull and after generation may fail with
//! "nothing to commit", so those commit results are ignored. Every git
//! command runs with the wiki path as its working directory.

use std::path::PathBuf;

use chrono::Local;
use colored::Colorize;
use tracing::{debug, error, info};

use crate::console::Console;
use crate::error::{Stage, SyncError};
use crate::process::{CommandRunner, Invocation};
use crate::settings::Settings;
use crate::validate::GIT;

const PHPDOC_TOOL: &str = "phpDocumentor";

pub struct SyncDriver<'a, R: CommandRunner> {
    runner: &'a R,
    console: &'a Console,
    settings: &'a Settings,
    wiki: PathBuf,
    date: String,
}

impl<'a, R: CommandRunner> SyncDriver<'a, R> {
    /// Expects validated settings (absolute wiki path, generator config set).
    pub fn new(runner: &'a R, console: &'a Console, settings: &'a Settings) -> Self {
        Self {
            runner,
            console,
            settings,
            wiki: settings
                .wiki_path
                .clone()
                .unwrap_or_else(|| PathBuf::from(".")),
            date: Local::now().format("%Y-%m-%d").to_string(),
        }
    }

    /// Overrides the date used in commit messages.
    pub fn with_date<S: Into<String>>(mut self, date: S) -> Self {
        self.date = date.into();
        self
    }

    /// Runs pull, generate and push in order, stopping at the first failure.
    pub fn build(&self) -> Result<(), SyncError> {
        self.console.verbose(&format!(
            "> creating GitHub wiki {} in {}",
            format!("\"{}\"", self.settings.title).cyan(),
            format!("[{}]", self.wiki.display()).cyan()
        ));
        if let Some(config_file) = &self.settings.config_file {
            self.console.verbose(&format!(
                "> using config file {}",
                format!("[{}]", config_file.display()).cyan()
            ));
        }
        info!(wiki = %self.wiki.display(), "[BUILD] Starting wiki build");

        self.pull()?;
        self.generate()?;
        self.push()?;

        info!("[BUILD] Wiki build complete");
        Ok(())
    }

    /// Commits manual changes in the wiki, then pulls from the remote.
    pub fn pull(&self) -> Result<(), SyncError> {
        self.console.always("> commit local changes made manually");
        self.commit_all(Stage::Pull, &format!("manual changes {}", self.date));

        self.console.always("> pull current version from remote");
        self.git(
            Stage::Pull,
            &["pull", self.settings.git_remote.as_str(), self.settings.git_branch.as_str()],
        )
    }

    /// Runs `<phpdoc> run -c <config>`.
    pub fn generate(&self) -> Result<(), SyncError> {
        self.console.always("> generate the wiki");
        let config = self
            .settings
            .phpdoc_config
            .as_deref()
            .map(|p| p.display().to_string())
            .unwrap_or_default();
        let invocation = Invocation::from_command_line(&self.settings.phpdoc_command)
            .args(["run", "-c", config.as_str()]);

        if self.settings.norun {
            self.console.verbose(
                &format!("  {PHPDOC_TOOL} > suppressed run ({invocation})!")
                    .bright_yellow()
                    .to_string(),
            );
            info!(command = %invocation, "[BUILD] phpDocumentor run suppressed");
            return Ok(());
        }

        let output = self.runner.run(&invocation).map_err(|e| {
            error!(error = ?e, command = %invocation, "[BUILD] Failed to launch phpDocumentor");
            SyncError::Launch {
                stage: Stage::Generate,
                command: invocation.to_string(),
                source: e,
            }
        })?;
        self.console.process_output(PHPDOC_TOOL, &output.combined());
        self.report_result(PHPDOC_TOOL, output.code, None);

        if output.success() {
            info!(command = %invocation, "[BUILD] phpDocumentor finished");
            Ok(())
        } else {
            error!(command = %invocation, code = ?output.code, "[BUILD] phpDocumentor failed");
            Err(SyncError::NonZeroExit {
                stage: Stage::Generate,
                command: invocation.to_string(),
                code: output.code,
            })
        }
    }

    /// Commits the generated wiki and pushes it to the remote.
    pub fn push(&self) -> Result<(), SyncError> {
        self.console.always("> commit generated wiki");
        self.commit_all(Stage::Push, &format!("phpDoc generated wiki {}", self.date));

        self.console.always("> push generated wiki");
        self.git(
            Stage::Push,
            &["push", self.settings.git_remote.as_str(), self.settings.git_branch.as_str()],
        )
    }

    fn commit_all(&self, stage: Stage, message: &str) {
        let steps: [&[&str]; 2] = [&["add", "--all"], &["commit", "-a", "-m", message]];
        for args in steps {
            // git reports "nothing to commit" with a non-zero exit code.
            if let Err(e) = self.git(stage, args) {
                debug!(error = %e, "[BUILD] Ignoring commit step result");
            }
        }
    }

    fn git(&self, stage: Stage, args: &[&str]) -> Result<(), SyncError> {
        let invocation = Invocation::new(GIT)
            .args(args.iter().copied())
            .current_dir(&self.wiki);
        let command = invocation.args_line();

        if self.settings.norun {
            self.console.verbose(
                &format!("  git > suppressed command: {command}")
                    .bright_yellow()
                    .to_string(),
            );
            return Ok(());
        }

        let output = self.runner.run(&invocation).map_err(|e| {
            error!(error = ?e, %command, "[BUILD] Failed to launch git");
            SyncError::Launch {
                stage,
                command: invocation.to_string(),
                source: e,
            }
        })?;
        self.console.process_output(GIT, &output.combined());
        self.report_result(GIT, output.code, Some(&command));

        if output.success() {
            debug!(%command, "[BUILD] git command succeeded");
            Ok(())
        } else {
            Err(SyncError::NonZeroExit {
                stage,
                command: invocation.to_string(),
                code: output.code,
            })
        }
    }

    fn report_result(&self, tool: &str, code: Option<i32>, command: Option<&str>) {
        let code_text = code.map_or_else(|| "signal".to_string(), |c| c.to_string());
        let line = match command {
            Some(command) => format!("  {tool} > result: {code_text} (command: {command})"),
            None => format!("  {tool} > result: {code_text}"),
        };
        let line = if code == Some(0) {
            line.bright_green()
        } else {
            line.bright_red()
        };
        self.console.debug(&line.to_string());
    }
}
