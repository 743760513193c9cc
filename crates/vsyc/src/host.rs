//! Host capabilities
//!
//! The interpreter never touches storage or foreign code directly. Hosts
//! hand it two narrow capabilities:
//!
//! ```text
//! @usingfile "name"  → SourceLoader::load(name)   → source text
//! @execjs "source"   → NativeCall::invoke(source) → result text
//! ```
//!
//! [`FsLoader`] and [`MemoryLoader`] cover the common loading cases. Native
//! calls have no default implementation; without one, `@execjs` statements
//! fail and the rest of the script keeps running.

use indexmap::IndexMap;
use std::path::{Path, PathBuf};

use crate::error::LoadError;

/// File extension scripts are expected to carry.
pub const SOURCE_EXTENSION: &str = "vscc";

/// Provides source text by name.
pub trait SourceLoader {
    /// Load the source called `name`.
    fn load(&self, name: &str) -> Result<String, LoadError>;
}

/// Text-in, text-out bridge to code outside the interpreter.
pub trait NativeCall {
    /// Run `source` and return its result as text.
    fn invoke(&mut self, source: &str) -> Result<String, String>;
}

impl<F> NativeCall for F
where
    F: FnMut(&str) -> Result<String, String>,
{
    fn invoke(&mut self, source: &str) -> Result<String, String> {
        self(source)
    }
}

/// Loads sources from the filesystem, resolving relative names against a root.
#[derive(Debug, Clone)]
pub struct FsLoader {
    root: PathBuf,
}

impl FsLoader {
    /// Create a loader rooted at `root`.
    pub fn new(root: impl Into<PathBuf>) -> Self {
        Self { root: root.into() }
    }

    /// Directory relative names resolve against.
    pub fn root(&self) -> &Path {
        &self.root
    }

    fn resolve(&self, name: &str) -> PathBuf {
        let path = Path::new(name);
        if path.is_absolute() {
            path.to_path_buf()
        } else {
            self.root.join(path)
        }
    }
}

impl Default for FsLoader {
    fn default() -> Self {
        Self::new(".")
    }
}

impl SourceLoader for FsLoader {
    fn load(&self, name: &str) -> Result<String, LoadError> {
        let path = self.resolve(name);
        std::fs::read_to_string(&path).map_err(|e| match e.kind() {
            std::io::ErrorKind::NotFound => LoadError::NotFound {
                name: name.to_string(),
            },
            _ => LoadError::Io {
                name: name.to_string(),
                message: e.to_string(),
            },
        })
    }
}

/// In-memory sources, for embedding and tests.
#[derive(Debug, Clone, Default)]
pub struct MemoryLoader {
    sources: IndexMap<String, String>,
}

impl MemoryLoader {
    /// Create an empty loader.
    pub fn new() -> Self {
        Self::default()
    }

    /// Add a source, builder style.
    pub fn with(mut self, name: impl Into<String>, source: impl Into<String>) -> Self {
        self.insert(name, source);
        self
    }

    /// Add or replace a source.
    pub fn insert(&mut self, name: impl Into<String>, source: impl Into<String>) {
        self.sources.insert(name.into(), source.into());
    }
}

impl SourceLoader for MemoryLoader {
    fn load(&self, name: &str) -> Result<String, LoadError> {
        self.sources
            .get(name)
            .cloned()
            .ok_or_else(|| LoadError::NotFound {
                name: name.to_string(),
            })
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_memory_loader() {
        let loader = MemoryLoader::new().with("lib", "@c \"hi\"");
        assert_eq!(loader.load("lib").unwrap(), "@c \"hi\"");
        assert_eq!(
            loader.load("missing"),
            Err(LoadError::NotFound {
                name: "missing".into()
            })
        );
    }

    #[test]
    fn test_fs_loader_reads_relative_to_root() {
        let dir = std::env::temp_dir().join(format!("vsyc-host-{}", std::process::id()));
        std::fs::create_dir_all(&dir).unwrap();
        std::fs::write(dir.join("lib.vscc"), "@print \"lib\"").unwrap();

        let loader = FsLoader::new(&dir);
        assert_eq!(loader.root(), dir.as_path());
        assert_eq!(loader.load("lib.vscc").unwrap(), "@print \"lib\"");
        assert!(matches!(
            loader.load("absent.vscc"),
            Err(LoadError::NotFound { .. })
        ));

        std::fs::remove_dir_all(&dir).unwrap();
    }

    #[test]
    fn test_fs_loader_keeps_absolute_names() {
        let loader = FsLoader::default();
        assert_eq!(loader.root(), Path::new("."));
        let absolute = std::env::temp_dir().join("x.vscc");
        assert_eq!(loader.resolve(absolute.to_str().unwrap()), absolute);
        assert_eq!(loader.resolve("lib.vscc"), Path::new("./lib.vscc"));
    }

    #[test]
    fn test_closure_is_native_call() {
        let mut calls = 0;
        let mut native = |src: &str| {
            calls += 1;
            Ok::<_, String>(src.to_uppercase())
        };
        assert_eq!(native.invoke("abc").unwrap(), "ABC");
        drop(native);
        assert_eq!(calls, 1);
    }
}
