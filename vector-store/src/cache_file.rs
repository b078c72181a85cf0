//! Flat JSON persistence for the embedding cache.
//!
//! Format: one pretty-printed JSON object mapping identity to an array of
//! numbers. Keys are written in sorted order so identical caches produce
//! identical bytes.

use std::{
    collections::BTreeMap,
    fs,
    io::{BufWriter, ErrorKind, Write},
    path::{Path, PathBuf},
};

use tracing::debug;

use crate::errors::StoreError;

pub type CacheMap = BTreeMap<String, Vec<f32>>;

fn io_err(path: &Path) -> impl FnOnce(std::io::Error) -> StoreError + '_ {
    move |source| StoreError::CacheIo {
        path: path.to_path_buf(),
        source,
    }
}

/// Loads the cache. `Ok(None)` when the file does not exist.
pub fn load(path: &Path) -> Result<Option<CacheMap>, StoreError> {
    let bytes = match fs::read(path) {
        Ok(b) => b,
        Err(e) if e.kind() == ErrorKind::NotFound => return Ok(None),
        Err(e) => return Err(io_err(path)(e)),
    };
    if bytes.iter().all(u8::is_ascii_whitespace) {
        return Ok(Some(CacheMap::new()));
    }
    let map: CacheMap =
        serde_json::from_slice(&bytes).map_err(|source| StoreError::CacheParse {
            path: path.to_path_buf(),
            source,
        })?;
    debug!(path = %path.display(), entries = map.len(), "cache loaded");
    Ok(Some(map))
}

/// Writes the cache atomically: temp file in the same directory, then rename.
pub fn save(path: &Path, cache: &CacheMap) -> Result<(), StoreError> {
    let dir = parent_dir(path);
    fs::create_dir_all(&dir).map_err(io_err(path))?;

    let mut tmp = tempfile::NamedTempFile::new_in(&dir).map_err(io_err(path))?;
    {
        let mut w = BufWriter::new(tmp.as_file_mut());
        serde_json::to_writer_pretty(&mut w, cache).map_err(|e| io_err(path)(e.into()))?;
        w.write_all(b"\n").map_err(io_err(path))?;
        w.flush().map_err(io_err(path))?;
    }
    tmp.as_file().sync_all().map_err(io_err(path))?;
    tmp.persist(path).map_err(|e| io_err(path)(e.error))?;

    debug!(path = %path.display(), entries = cache.len(), "cache persisted");
    Ok(())
}

fn parent_dir(path: &Path) -> PathBuf {
    match path.parent() {
        Some(p) if !p.as_os_str().is_empty() => p.to_path_buf(),
        _ => PathBuf::from("."),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn missing_file_is_none() {
        let dir = tempfile::tempdir().unwrap();
        assert!(load(&dir.path().join("cache.json")).unwrap().is_none());
    }

    #[test]
    fn round_trips_with_sorted_keys() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("nested").join("cache.json");
        let mut map = CacheMap::new();
        map.insert("zed.pdf".into(), vec![0.1, -2.5]);
        map.insert("amy.pdf".into(), vec![1.0e-7, 3.0]);

        save(&path, &map).unwrap();
        let raw = fs::read_to_string(&path).unwrap();
        assert!(raw.find("amy.pdf").unwrap() < raw.find("zed.pdf").unwrap());
        assert_eq!(load(&path).unwrap().unwrap(), map);
    }

    #[test]
    fn corrupt_file_is_parse_error() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("cache.json");
        fs::write(&path, "{\"a.pdf\": \"oops\"}").unwrap();
        assert!(matches!(load(&path), Err(StoreError::CacheParse { .. })));
    }

    #[test]
    fn accepts_float64_values_from_other_writers() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("cache.json");
        fs::write(&path, "{\"a.pdf\": [0.0123456789012345, -1]}").unwrap();
        let map = load(&path).unwrap().unwrap();
        assert_eq!(map["a.pdf"].len(), 2);
        assert_eq!(map["a.pdf"][1], -1.0);
    }
}
