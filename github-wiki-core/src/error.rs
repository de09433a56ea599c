//! Error types shared across the core crate.
//!
//! Validation and synthesis errors render as the `- ...` lines the console
//! reporter shows to the user, so their `Display` output is user-facing text.

use std::fmt;
use std::io;
use std::path::PathBuf;

use thiserror::Error;

/// Failure to load a configuration document.
#[derive(Error, Debug)]
pub enum ConfigError {
    #[error("Failed to read config file [{}]: {source}", .path.display())]
    Read {
        path: PathBuf,
        #[source]
        source: io::Error,
    },

    #[error("Failed to parse config YAML [{}]: {source}", .path.display())]
    Parse {
        path: PathBuf,
        #[source]
        source: serde_yaml::Error,
    },
}

/// Failure while staging the template or synthesizing the generator config.
#[derive(Error, Debug)]
pub enum SynthError {
    #[error("- The template path [{}] does not exist!", .0.display())]
    TemplateMissing(PathBuf),

    #[error("- [{}] must be a directory!", .0.display())]
    TemplateNotDirectory(PathBuf),

    #[error("- The template path [{}] is empty!", .0.display())]
    TemplateEmpty(PathBuf),

    #[error("- Cannot create the template path [{}]!", .0.display())]
    CreateTemplateDir(PathBuf),

    #[error("- Cannot copy [{}] to the template path: {source}", .path.display())]
    Copy {
        path: PathBuf,
        #[source]
        source: io::Error,
    },

    #[error("- Can't open the template file [{}]", .0.display())]
    ConfigTemplateUnreadable(PathBuf),

    #[error("- Can't create XML document: {0}")]
    MalformedDocument(String),

    #[error("- Can't write phpDocumentor config [{}]!", .0.display())]
    Write(PathBuf),
}

/// Accumulated validation messages, one `- ...` line per failed check.
///
/// Only ever constructed with at least one message.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ValidationErrors {
    messages: Vec<String>,
}

impl ValidationErrors {
    /// Returns `None` when `messages` is empty.
    pub fn from_messages(messages: Vec<String>) -> Option<Self> {
        let messages: Vec<String> = messages
            .into_iter()
            .map(|m| m.trim().to_string())
            .filter(|m| !m.is_empty())
            .collect();
        if messages.is_empty() {
            None
        } else {
            Some(Self { messages })
        }
    }

    pub fn single<S: Into<String>>(message: S) -> Self {
        Self {
            messages: vec![message.into()],
        }
    }

    pub fn messages(&self) -> &[String] {
        &self.messages
    }
}

impl fmt::Display for ValidationErrors {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.messages.join("\n"))
    }
}

impl std::error::Error for ValidationErrors {}

/// A failed stage of the pull → generate → push chain.
#[derive(Error, Debug)]
pub enum SyncError {
    #[error("{stage} failed: `{command}` exited with code {code:?}")]
    NonZeroExit {
        stage: Stage,
        command: String,
        code: Option<i32>,
    },

    #[error("{stage} failed: could not launch `{command}`: {source}")]
    Launch {
        stage: Stage,
        command: String,
        #[source]
        source: io::Error,
    },
}

impl SyncError {
    pub fn stage(&self) -> Stage {
        match self {
            SyncError::NonZeroExit { stage, .. } | SyncError::Launch { stage, .. } => *stage,
        }
    }
}

/// Stages of a wiki build, in execution order.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Stage {
    Pull,
    Generate,
    Push,
}

impl fmt::Display for Stage {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let name = match self {
            Stage::Pull => "pull",
            Stage::Generate => "generate",
            Stage::Push => "push",
        };
        f.write_str(name)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn validation_errors_drop_blank_messages() {
        assert!(ValidationErrors::from_messages(vec![]).is_none());
        assert!(ValidationErrors::from_messages(vec!["  ".into(), "\n".into()]).is_none());

        let errors = ValidationErrors::from_messages(vec![
            "- git not found!".into(),
            String::new(),
            "- No wiki path specified!\n".into(),
        ])
        .expect("two messages");
        assert_eq!(errors.messages().len(), 2);
        assert_eq!(
            errors.to_string(),
            "- git not found!\n- No wiki path specified!"
        );
    }

    #[test]
    fn synth_error_renders_user_line() {
        let err = SynthError::TemplateEmpty(PathBuf::from("/opt/tpl"));
        assert_eq!(err.to_string(), "- The template path [/opt/tpl] is empty!");
    }
}
