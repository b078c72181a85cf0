//! Document set discovery.

use std::path::{Path, PathBuf};

use serde::Serialize;
use tracing::{debug, warn};

use crate::errors::StoreError;

/// A candidate document. `identity` is the file name and is unique in its folder.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct Document {
    pub identity: String,
    #[serde(skip)]
    pub path: PathBuf,
}

impl Document {
    pub fn new(identity: impl Into<String>, path: impl Into<PathBuf>) -> Self {
        Self {
            identity: identity.into(),
            path: path.into(),
        }
    }
}

/// Lists regular files in `dir` whose extension is in `extensions`
/// (case-insensitive), sorted by identity.
///
/// A missing folder yields an empty set.
pub fn discover_documents(dir: &Path, extensions: &[String]) -> Result<Vec<Document>, StoreError> {
    let entries = match std::fs::read_dir(dir) {
        Ok(e) => e,
        Err(e) if e.kind() == std::io::ErrorKind::NotFound => {
            warn!(dir = %dir.display(), "document folder does not exist");
            return Ok(Vec::new());
        }
        Err(source) => {
            return Err(StoreError::DocumentDir {
                path: dir.to_path_buf(),
                source,
            });
        }
    };

    let mut docs = Vec::new();
    for entry in entries {
        let entry = entry.map_err(|source| StoreError::DocumentDir {
            path: dir.to_path_buf(),
            source,
        })?;
        let path = entry.path();
        if !path.is_file() {
            continue;
        }
        let matches_ext = path
            .extension()
            .and_then(|e| e.to_str())
            .is_some_and(|e| extensions.iter().any(|want| want.eq_ignore_ascii_case(e)));
        if !matches_ext {
            continue;
        }
        match entry.file_name().into_string() {
            Ok(identity) => docs.push(Document { identity, path }),
            Err(raw) => warn!(name = ?raw, "skipping document with non UTF-8 file name"),
        }
    }

    docs.sort_by(|a, b| a.identity.cmp(&b.identity));
    debug!(dir = %dir.display(), count = docs.len(), "documents discovered");
    Ok(docs)
}
