//! Shared engine substrate used by the pipeline, plugins and validators.
//!
//! ## Module Structure
//!
//! - `cache`: keyed cache with lazy expiry, shared through the context
//! - `context`: `ExecutionContext`, the explicitly injected shared state
//! - `fs`: file system primitives and glob expansion
//! - `parsers`: dialect-aware source parsing with per-context caching
//! - `traverse`: visitor dispatch and fact helpers over parsed modules

pub mod cache;
pub mod context;
pub mod fs;
pub mod parsers;
pub mod traverse;

pub use cache::{CacheStats, KeyedCache, SharedCache};
pub use context::ExecutionContext;
pub use fs::{FileSystem, OsFileSystem};
