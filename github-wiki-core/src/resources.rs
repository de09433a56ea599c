//! Bundled resources: the default generator template directory, the
//! generator config template and the help text.

use std::env;
use std::path::{Path, PathBuf};

use tracing::debug;

pub const TEMPLATE_DIR: &str = "template";
pub const CONFIG_TEMPLATE: &str = "phpdoc.template.xml";

const RESOURCE_DIR: &str = "resources";

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Resources {
    root: PathBuf,
}

impl Resources {
    pub fn new<P: Into<PathBuf>>(root: P) -> Self {
        Self { root: root.into() }
    }

    /// `resources/` next to the executable when present (self-contained
    /// distribution), otherwise the install-relative directory of the source tree.
    pub fn locate() -> Self {
        let beside_exe = env::current_exe()
            .ok()
            .and_then(|exe| exe.parent().map(|dir| dir.join(RESOURCE_DIR)))
            .filter(|dir| dir.is_dir());
        let root = beside_exe.unwrap_or_else(|| {
            Path::new(env!("CARGO_MANIFEST_DIR"))
                .join("..")
                .join(RESOURCE_DIR)
        });
        debug!(resources = %root.display(), "Located bundled resources");
        Self { root }
    }

    pub fn root(&self) -> &Path {
        &self.root
    }

    pub fn template_dir(&self) -> PathBuf {
        self.root.join(TEMPLATE_DIR)
    }

    pub fn config_template(&self) -> PathBuf {
        self.root.join(CONFIG_TEMPLATE)
    }
}
