#![allow(dead_code)]

use std::fs;
use std::io::{self, Write};
use std::path::{Path, PathBuf};
use std::sync::{Arc, Mutex};

use github_wiki_core::config::NullConfig;
use github_wiki_core::console::{Console, Verbosity};
use github_wiki_core::process::{CommandOutput, Invocation};
use github_wiki_core::resources::Resources;
use github_wiki_core::settings::{Overrides, Settings};

/// In-memory console sink that can be read back after the run.
#[derive(Clone, Default)]
pub struct SharedBuffer(Arc<Mutex<Vec<u8>>>);

impl Write for SharedBuffer {
    fn write(&mut self, buf: &[u8]) -> io::Result<usize> {
        self.0.lock().unwrap().extend_from_slice(buf);
        Ok(buf.len())
    }

    fn flush(&mut self) -> io::Result<()> {
        Ok(())
    }
}

impl SharedBuffer {
    pub fn text(&self) -> String {
        String::from_utf8(self.0.lock().unwrap().clone()).unwrap()
    }
}

pub fn console(verbosity: Verbosity) -> (Console, SharedBuffer) {
    colored::control::set_override(false);
    let buffer = SharedBuffer::default();
    (
        Console::with_writer(verbosity, Box::new(buffer.clone())),
        buffer,
    )
}

pub fn output(code: i32, stdout: &str) -> io::Result<CommandOutput> {
    Ok(CommandOutput {
        code: Some(code),
        stdout: stdout.to_string(),
        stderr: String::new(),
    })
}

pub fn not_found() -> io::Result<CommandOutput> {
    Err(io::Error::new(io::ErrorKind::NotFound, "not found"))
}

/// Answers version queries like a healthy git + phpDocumentor v3 install
/// and succeeds for everything else.
pub fn healthy_tools(invocation: &Invocation) -> io::Result<CommandOutput> {
    match (invocation.program.as_str(), invocation.args.last().map(String::as_str)) {
        ("git", Some("--version")) => output(0, "git version 2.43.0\n"),
        (_, Some("--version")) => output(0, "phpDocumentor v3.4.3\n"),
        _ => output(0, ""),
    }
}

/// Directory that looks like a cloned wiki repository.
pub fn fake_wiki(root: &Path) -> PathBuf {
    let wiki = root.join("project.wiki");
    fs::create_dir_all(wiki.join(".git")).unwrap();
    wiki.canonicalize().unwrap()
}

/// Bundled resources of this repository.
pub fn bundled_resources() -> Resources {
    Resources::new(Path::new(env!("CARGO_MANIFEST_DIR")).join("../resources"))
}

pub fn default_settings() -> Settings {
    Settings::materialize(&NullConfig, &Overrides::default())
}

/// Records every invocation passed to a mock runner.
#[derive(Clone, Default)]
pub struct CallLog(Arc<Mutex<Vec<Invocation>>>);

impl CallLog {
    pub fn push(&self, invocation: &Invocation) {
        self.0.lock().unwrap().push(invocation.clone());
    }

    pub fn calls(&self) -> Vec<Invocation> {
        self.0.lock().unwrap().clone()
    }

    /// Argument lines of all calls, e.g. `pull origin master`.
    pub fn lines(&self) -> Vec<String> {
        self.calls().iter().map(Invocation::args_line).collect()
    }
}
