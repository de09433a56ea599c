//! User-facing console output, gated by verbosity.
//!
//! This is the channel the user reads; structured diagnostics go through
//! `tracing` independently. Messages carry their own styling (via
//! `colored`), the reporter only decides whether they are shown.

use std::cell::RefCell;
use std::io::{self, Write};

use colored::Colorize;

/// Display level of a message.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Level {
    Always,
    Verbose,
    Debug,
}

/// Verbosity switches that decide which levels are shown.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct Verbosity {
    pub verbose: bool,
    pub debug: bool,
    pub quiet: bool,
}

impl Verbosity {
    /// Quiet wins over everything; otherwise `Always` is shown and the
    /// other levels follow their flag.
    pub fn shows(&self, level: Level) -> bool {
        if self.quiet {
            return false;
        }
        match level {
            Level::Always => true,
            Level::Verbose => self.verbose,
            Level::Debug => self.debug,
        }
    }
}

pub struct Console {
    verbosity: Verbosity,
    out: RefCell<Box<dyn Write>>,
}

impl Console {
    pub fn stdout(verbosity: Verbosity) -> Self {
        Self::with_writer(verbosity, Box::new(io::stdout()))
    }

    pub fn with_writer(verbosity: Verbosity, out: Box<dyn Write>) -> Self {
        Self {
            verbosity,
            out: RefCell::new(out),
        }
    }

    pub fn verbosity(&self) -> Verbosity {
        self.verbosity
    }

    pub fn set_verbosity(&mut self, verbosity: Verbosity) {
        self.verbosity = verbosity;
    }

    /// Writes `text` followed by a newline if `level` is enabled.
    pub fn write(&self, level: Level, text: &str) {
        if !self.verbosity.shows(level) {
            return;
        }
        let mut out = self.out.borrow_mut();
        // Console output is best effort; a closed stdout must not abort a build.
        let _ = writeln!(out, "{text}");
        let _ = out.flush();
    }

    pub fn always(&self, text: &str) {
        self.write(Level::Always, text);
    }

    pub fn verbose(&self, text: &str) {
        self.write(Level::Verbose, text);
    }

    pub fn debug(&self, text: &str) {
        self.write(Level::Debug, text);
    }

    /// Writes an error block. Shown unless quiet.
    pub fn error(&self, text: &str) {
        self.write(Level::Always, &format!("\n{}", text.white().on_red()));
    }

    /// Writes captured process output, each line prefixed with `  <tool> > `.
    pub fn process_output(&self, tool: &str, output: &str) {
        let text = output
            .lines()
            .map(|line| format!("  {tool} > {line}"))
            .collect::<Vec<_>>()
            .join("\n");
        let text = text.trim_end();
        if !text.is_empty() {
            self.verbose(&text.bright_yellow().to_string());
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::sync::{Arc, Mutex};

    #[derive(Clone, Default)]
    struct Buffer(Arc<Mutex<Vec<u8>>>);

    impl Write for Buffer {
        fn write(&mut self, buf: &[u8]) -> io::Result<usize> {
            self.0.lock().unwrap().extend_from_slice(buf);
            Ok(buf.len())
        }
        fn flush(&mut self) -> io::Result<()> {
            Ok(())
        }
    }

    impl Buffer {
        fn text(&self) -> String {
            String::from_utf8(self.0.lock().unwrap().clone()).unwrap()
        }
    }

    fn console(verbosity: Verbosity) -> (Console, Buffer) {
        colored::control::set_override(false);
        let buffer = Buffer::default();
        (Console::with_writer(verbosity, Box::new(buffer.clone())), buffer)
    }

    #[test]
    fn level_gating_table() {
        let cases = [
            // (verbose, debug, quiet, level, shown)
            (false, false, false, Level::Always, true),
            (false, false, false, Level::Verbose, false),
            (false, false, false, Level::Debug, false),
            (true, false, false, Level::Verbose, true),
            (true, false, false, Level::Debug, false),
            (false, true, false, Level::Debug, true),
            (false, true, false, Level::Verbose, false),
            (true, true, true, Level::Always, false),
            (true, true, true, Level::Verbose, false),
            (true, true, true, Level::Debug, false),
        ];
        for (verbose, debug, quiet, level, shown) in cases {
            let v = Verbosity { verbose, debug, quiet };
            assert_eq!(v.shows(level), shown, "{v:?} {level:?}");
        }
    }

    #[test]
    fn quiet_suppresses_errors_too() {
        let (console, buffer) = console(Verbosity {
            quiet: true,
            ..Default::default()
        });
        console.error("- git not found!");
        console.always("banner");
        assert_eq!(buffer.text(), "");
    }

    #[test]
    fn process_output_is_prefixed_per_line_in_verbose_mode() {
        let (console, buffer) = console(Verbosity {
            verbose: true,
            ..Default::default()
        });
        console.process_output("git", "Already up to date.\nsecond line\n");
        assert_eq!(
            buffer.text(),
            "  git > Already up to date.\n  git > second line\n"
        );
    }

    #[test]
    fn process_output_hidden_without_verbose() {
        let (console, buffer) = console(Verbosity::default());
        console.process_output("git", "noise");
        assert_eq!(buffer.text(), "");
    }
}
