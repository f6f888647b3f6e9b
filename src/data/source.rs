use std::collections::hash_map::DefaultHasher;
use std::fmt;
use std::fs::File;
use std::hash::{Hash, Hasher};
use std::io::{Cursor, Read};
use std::path::{Path, PathBuf};
use std::sync::Arc;

use super::loader::LoadError;

// ---------------------------------------------------------------------------
// Source – where a table comes from
// ---------------------------------------------------------------------------

/// A file picked by the user and read into memory.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Upload {
    pub name: String,
    pub bytes: Arc<[u8]>,
}

impl Upload {
    pub fn new(name: impl Into<String>, bytes: impl Into<Arc<[u8]>>) -> Self {
        Upload {
            name: name.into(),
            bytes: bytes.into(),
        }
    }

    /// Read a file from disk into an upload, keeping only its file name.
    pub fn read(path: &Path) -> std::io::Result<Self> {
        let bytes = std::fs::read(path)?;
        let name = path
            .file_name()
            .map(|n| n.to_string_lossy().into_owned())
            .unwrap_or_else(|| path.display().to_string());
        Ok(Upload::new(name, bytes))
    }
}

/// Tabular input: either a local file or an uploaded blob.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Source {
    File(PathBuf),
    Upload(Upload),
}

impl Source {
    /// An upload, when present, wins over the default local file.
    pub fn resolve(upload: Option<&Upload>, default: &Path) -> Source {
        match upload {
            Some(up) => Source::Upload(up.clone()),
            None => Source::File(default.to_path_buf()),
        }
    }

    pub(crate) fn open(&self) -> Result<Box<dyn Read + '_>, LoadError> {
        match self {
            Source::File(path) => {
                let file = File::open(path).map_err(|error| LoadError::Io {
                    source_name: self.to_string(),
                    error,
                })?;
                Ok(Box::new(file))
            }
            Source::Upload(up) => Ok(Box::new(Cursor::new(&up.bytes[..]))),
        }
    }

    /// Identity used as the cache key.
    pub fn key(&self) -> SourceKey {
        match self {
            Source::File(path) => {
                SourceKey::File(path.canonicalize().unwrap_or_else(|_| path.clone()))
            }
            Source::Upload(up) => {
                let mut hasher = DefaultHasher::new();
                up.bytes.hash(&mut hasher);
                SourceKey::Upload {
                    name: up.name.clone(),
                    digest: hasher.finish(),
                }
            }
        }
    }
}

impl fmt::Display for Source {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Source::File(path) => write!(f, "{}", path.display()),
            Source::Upload(up) => write!(f, "{} (upload)", up.name),
        }
    }
}

// ---------------------------------------------------------------------------
// SourceKey
// ---------------------------------------------------------------------------

#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub enum SourceKey {
    File(PathBuf),
    Upload { name: String, digest: u64 },
    /// Deputies left-joined with an engagement table.
    Joined(Box<SourceKey>, Box<SourceKey>),
}

impl SourceKey {
    pub fn joined(left: SourceKey, right: SourceKey) -> Self {
        SourceKey::Joined(Box::new(left), Box::new(right))
    }

    /// True when `other` is this key or one side of a join built from it.
    pub fn mentions(&self, other: &SourceKey) -> bool {
        match self {
            SourceKey::Joined(left, right) => {
                self == other || left.mentions(other) || right.mentions(other)
            }
            _ => self == other,
        }
    }
}
