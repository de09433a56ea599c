//! One complete run: validate, then build, reporting through the console.

use std::path::Path;

use colored::Colorize;
use tracing::{error, info};

use crate::console::Console;
use crate::error::{SyncError, ValidationErrors};
use crate::process::CommandRunner;
use crate::resources::Resources;
use crate::settings::Settings;
use crate::sync::SyncDriver;
use crate::validate::Validator;

/// Why a run did not produce a wiki.
#[derive(thiserror::Error, Debug)]
pub enum PublishError {
    #[error("validation failed:\n{0}")]
    Invalid(#[from] ValidationErrors),

    #[error("build failed: {0}")]
    Build(#[from] SyncError),
}

/// Validates `settings` against the environment and, if that succeeds,
/// runs pull → generate → push. Failures are shown on `console` before
/// they are returned.
pub fn publish<R: CommandRunner>(
    runner: &R,
    console: &Console,
    resources: &Resources,
    cwd: &Path,
    mut settings: Settings,
) -> Result<Settings, PublishError> {
    let validator = Validator::new(runner, resources, cwd);
    if let Err(errors) = validator.validate(&mut settings) {
        console.error(&errors.to_string());
        return Err(errors.into());
    }

    let driver = SyncDriver::new(runner, console, &settings);
    if let Err(e) = driver.build() {
        error!(error = %e, stage = %e.stage(), "Wiki build failed");
        console.error(&format!("- {e}"));
        return Err(e.into());
    }

    info!(title = %settings.title, "Wiki generated");
    console.always(&format!(
        "> wiki {} successfully generated.",
        format!("\"{}\"", settings.title).bold()
    ));
    Ok(settings)
}

/// First line of every run.
pub fn banner() -> String {
    format!("GitHubWiki creator v{}", crate::VERSION)
        .bright_cyan()
        .bold()
        .to_string()
}
