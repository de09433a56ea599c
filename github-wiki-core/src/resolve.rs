//! Locates the global and local configuration files and layers them.
//!
//! Resolution order:
//! 1. Local candidate: the `--config` path when given and present, otherwise
//!    `githubwiki.yaml` in the working directory.
//! 2. Global candidate: `githubwiki.yaml` next to the executable, only when
//!    the executable does not live in the working directory.
//! 3. Local + global are merged with local values winning; a single file is
//!    used alone; with neither, every setting takes its built-in default.

use std::path::{Path, PathBuf};

use tracing::{debug, info, warn};

use crate::config::{ConfigSource, NullConfig, YamlConfig};
use crate::error::ConfigError;

/// File name of both the local and the global configuration.
pub const CONFIG_FILE: &str = "githubwiki.yaml";

/// Effective configuration plus the files it was built from.
pub struct ResolvedConfig {
    source: Box<dyn ConfigSource>,
    pub local_file: Option<PathBuf>,
    pub global_file: Option<PathBuf>,
}

impl ResolvedConfig {
    pub fn source(&self) -> &dyn ConfigSource {
        self.source.as_ref()
    }
}

/// Picks the local config file: an existing `--config` path, else the default name in `cwd`.
pub fn local_candidate(cli_path: Option<&Path>, cwd: &Path) -> PathBuf {
    if let Some(path) = cli_path {
        let path = cwd.join(path);
        if path.is_file() {
            return path;
        }
        warn!(config_path = %path.display(), "Specified config not found, falling back to default");
    }
    cwd.join(CONFIG_FILE)
}

/// Global config next to the executable, if the executable is elsewhere than `cwd`.
pub fn global_candidate(exe_dir: Option<&Path>, cwd: &Path) -> Option<PathBuf> {
    let exe_dir = exe_dir?;
    if same_dir(exe_dir, cwd) {
        debug!(exe_dir = %exe_dir.display(), "Executable runs from the working directory, no global config");
        return None;
    }
    let path = exe_dir.join(CONFIG_FILE);
    path.is_file().then_some(path)
}

fn same_dir(a: &Path, b: &Path) -> bool {
    match (a.canonicalize(), b.canonicalize()) {
        (Ok(a), Ok(b)) => a == b,
        _ => a == b,
    }
}

/// Resolves the effective configuration for one run.
pub fn resolve_config(
    cli_path: Option<&Path>,
    cwd: &Path,
    exe_dir: Option<&Path>,
) -> Result<ResolvedConfig, ConfigError> {
    let local = local_candidate(cli_path, cwd);
    let local = local.is_file().then_some(local);
    let global = global_candidate(exe_dir, cwd);

    let source: Box<dyn ConfigSource> = match (&global, &local) {
        (Some(global_path), Some(local_path)) => {
            info!(global = %global_path.display(), local = %local_path.display(), "Merging global and local config");
            let merged = YamlConfig::load(global_path)?.merge_with(YamlConfig::load(local_path)?);
            Box::new(merged)
        }
        (None, Some(local_path)) => {
            info!(local = %local_path.display(), "Using local config");
            Box::new(YamlConfig::load(local_path)?)
        }
        (Some(global_path), None) => {
            info!(global = %global_path.display(), "Using global config only");
            Box::new(YamlConfig::load(global_path)?)
        }
        (None, None) => {
            info!("No config file found, using built-in defaults");
            Box::new(NullConfig)
        }
    };

    Ok(ResolvedConfig {
        source,
        local_file: local,
        global_file: global,
    })
}
