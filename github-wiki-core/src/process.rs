//! Blocking execution of external commands.
//!
//! Everything the tool runs (git, phpDocumentor) goes through the
//! [`CommandRunner`] trait. The working directory is a parameter of each
//! [`Invocation`] instead of process-global state, and the trait is mockable
//! so validation and sync behaviour can be tested without real binaries.

use std::fmt;
use std::io;
use std::path::{Path, PathBuf};
use std::process::{Command, Stdio};

#[cfg(any(test, feature = "test-export-mocks"))]
use mockall::automock;
use tracing::debug;

/// One external command: program, arguments and optional working directory.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Invocation {
    pub program: String,
    pub args: Vec<String>,
    pub cwd: Option<PathBuf>,
}

impl Invocation {
    pub fn new<S: Into<String>>(program: S) -> Self {
        Self {
            program: program.into(),
            args: Vec::new(),
            cwd: None,
        }
    }

    /// Splits a configured command line such as `php phpDocumentor.phar`
    /// into program and leading arguments.
    pub fn from_command_line(command_line: &str) -> Self {
        let mut parts = command_line.split_whitespace();
        let program = parts.next().unwrap_or_default();
        Self::new(program).args(parts)
    }

    pub fn arg<S: Into<String>>(mut self, arg: S) -> Self {
        self.args.push(arg.into());
        self
    }

    pub fn args<I, S>(mut self, args: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        self.args.extend(args.into_iter().map(Into::into));
        self
    }

    pub fn current_dir<P: AsRef<Path>>(mut self, dir: P) -> Self {
        self.cwd = Some(dir.as_ref().to_path_buf());
        self
    }

    /// Arguments only, space separated (as shown in debug output).
    pub fn args_line(&self) -> String {
        self.args.join(" ")
    }
}

impl fmt::Display for Invocation {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.program)?;
        for arg in &self.args {
            write!(f, " {arg}")?;
        }
        Ok(())
    }
}

/// Captured result of a finished command.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct CommandOutput {
    /// Exit code; `None` when the process was terminated by a signal.
    pub code: Option<i32>,
    pub stdout: String,
    pub stderr: String,
}

impl CommandOutput {
    pub fn success(&self) -> bool {
        self.code == Some(0)
    }

    /// Stdout followed by stderr.
    pub fn combined(&self) -> String {
        let mut text = self.stdout.clone();
        if !self.stderr.is_empty() {
            if !text.is_empty() && !text.ends_with('\n') {
                text.push('\n');
            }
            text.push_str(&self.stderr);
        }
        text
    }
}

/// Runs external commands to completion.
#[cfg_attr(any(test, feature = "test-export-mocks"), automock)]
pub trait CommandRunner {
    /// Runs `invocation`, blocking until it exits. `Err` means the program
    /// could not be launched at all.
    fn run(&self, invocation: &Invocation) -> io::Result<CommandOutput>;
}

/// [`CommandRunner`] backed by `std::process::Command`.
#[derive(Debug, Clone, Copy, Default)]
pub struct SystemRunner;

impl CommandRunner for SystemRunner {
    fn run(&self, invocation: &Invocation) -> io::Result<CommandOutput> {
        let mut command = Command::new(&invocation.program);
        command.args(&invocation.args).stdin(Stdio::null());
        if let Some(dir) = &invocation.cwd {
            command.current_dir(dir);
        }
        let output = command.output()?;
        let result = CommandOutput {
            code: output.status.code(),
            stdout: String::from_utf8_lossy(&output.stdout).into_owned(),
            stderr: String::from_utf8_lossy(&output.stderr).into_owned(),
        };
        debug!(command = %invocation, cwd = ?invocation.cwd, code = ?result.code, "External command finished");
        Ok(result)
    }
}
