//! Glean - plugin-driven static analysis for JavaScript and TypeScript projects
//!
//! Glean discovers source files, parses them with swc and runs a set of
//! plugins over the result: module imports and exports, React hook usage,
//! exported components, and hardcoded user-facing strings that should be
//! translated.
//!
//! ## Module Structure
//!
//! - `cli`: Command-line interface layer
//! - `config`: `.gleanrc.json` loading and defaults
//! - `core`: Execution context, cache, file system and the parse/traverse substrate
//! - `logging`: Level-filtered logger backed by `tracing`
//! - `pipeline`: Discover, filter, process and aggregate stages
//! - `plugins`: Plugin trait, manager and the builtin plugins
//! - `rules`: Validators deciding whether a string is user-facing
//! - `utils`: Shared utility functions

pub mod cli;
pub mod config;
pub mod core;
pub mod error;
pub mod logging;
pub mod pipeline;
pub mod plugins;
pub mod rules;
pub mod utils;
