#![doc = "github-wiki-core: core logic library for github-wiki."]

//! This crate holds everything the `github-wiki` binary drives: layered
//! configuration, environment validation, generator-config synthesis and
//! the pull → generate → push cycle against the wiki repository.
//!
//! # Usage
//! The CLI crate only parses arguments and wires these pieces together:
//! [`resolve::resolve_config`] → [`settings::Settings::materialize`] →
//! [`publish::publish`], which runs [`validate::Validator`] and then
//! [`sync::SyncDriver`].

pub mod config;
pub mod console;
pub mod error;
pub mod paths;
pub mod process;
pub mod publish;
pub mod resolve;
pub mod resources;
pub mod settings;
pub mod synthesize;
pub mod sync;
pub mod validate;

/// Version reported by the banner and `--version`.
pub const VERSION: &str = env!("CARGO_PKG_VERSION");
