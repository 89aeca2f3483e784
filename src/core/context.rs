use std::{
    fmt,
    path::{Path, PathBuf},
    sync::Arc,
    time::Duration,
};

use crate::{
    core::{
        cache::SharedCache,
        fs::{FileSystem, OsFileSystem},
    },
    logging::Logger,
};

/// Shared state handed to every plugin.
///
/// The context is built once by whoever owns the plugin manager and injected
/// explicitly: plugins receive an `Arc<ExecutionContext>` at `init` and again
/// whenever the manager rebinds them to a new path. Nothing here is global.
///
/// # Shared resources
///
/// - `cache`: keyed cache shared by all plugins (parse results, memoization).
///   Survives [`ExecutionContext::rebind`]; a freshly constructed context
///   starts with an empty cache.
/// - `logger`: level-filtered logger created once by the owner.
/// - `fs`: file system primitive used for discovery and reads.
#[derive(Clone)]
pub struct ExecutionContext {
    root: PathBuf,
    target: Option<PathBuf>,
    cache: Arc<SharedCache>,
    logger: Logger,
    fs: Arc<dyn FileSystem>,
}

impl ExecutionContext {
    /// Create a context rooted at `root` with an empty, non-expiring cache,
    /// a default logger and the OS file system.
    pub fn new(root: impl Into<PathBuf>) -> Self {
        Self {
            root: root.into(),
            target: None,
            cache: Arc::new(SharedCache::new(None)),
            logger: Logger::default(),
            fs: Arc::new(OsFileSystem),
        }
    }

    pub fn with_target(mut self, target: impl Into<PathBuf>) -> Self {
        self.target = Some(target.into());
        self
    }

    pub fn with_logger(mut self, logger: Logger) -> Self {
        self.logger = logger;
        self
    }

    /// Replace the cache with a fresh one whose entries expire after `ttl`.
    pub fn with_cache_ttl(mut self, ttl: Option<Duration>) -> Self {
        self.cache = Arc::new(SharedCache::new(ttl));
        self
    }

    pub fn with_file_system(mut self, fs: Arc<dyn FileSystem>) -> Self {
        self.fs = fs;
        self
    }

    pub fn root(&self) -> &Path {
        &self.root
    }

    pub fn target(&self) -> Option<&Path> {
        self.target.as_deref()
    }

    /// The target override if set, otherwise the root.
    pub fn effective_target(&self) -> &Path {
        self.target.as_deref().unwrap_or(&self.root)
    }

    pub fn cache(&self) -> &SharedCache {
        &self.cache
    }

    pub fn logger(&self) -> &Logger {
        &self.logger
    }

    pub fn fs(&self) -> &dyn FileSystem {
        self.fs.as_ref()
    }

    /// A context for new paths that keeps sharing this context's cache,
    /// logger and file system.
    pub fn rebind(&self, root: impl Into<PathBuf>, target: Option<PathBuf>) -> Self {
        Self {
            root: root.into(),
            target,
            cache: Arc::clone(&self.cache),
            logger: self.logger.clone(),
            fs: Arc::clone(&self.fs),
        }
    }

    /// True if both contexts share the same cache instance.
    pub fn shares_cache_with(&self, other: &ExecutionContext) -> bool {
        Arc::ptr_eq(&self.cache, &other.cache)
    }
}

impl fmt::Debug for ExecutionContext {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("ExecutionContext")
            .field("root", &self.root)
            .field("target", &self.target)
            .field("cache_entries", &self.cache.len())
            .field("logger", &self.logger)
            .finish()
    }
}
