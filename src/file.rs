// src/file.rs

use std::{
    fs,
    path::{Path, PathBuf},
};

use crate::config::consts::DEFAULT_OUT_FILE;
use crate::error::{Result, ScrapeError};

/// `-o` may name a file or a directory (existing, or written with a trailing slash).
/// Directories get the default file name appended.
pub fn resolve_out_path(user_o: &Path) -> PathBuf {
    if user_o.as_os_str().is_empty() {
        return PathBuf::from(DEFAULT_OUT_FILE);
    }
    if looks_like_dir_hint(user_o) || user_o.is_dir() {
        user_o.join(DEFAULT_OUT_FILE)
    } else {
        user_o.to_path_buf()
    }
}

pub fn ensure_directory(dir: &Path) -> Result<()> {
    if dir.exists() && !dir.is_dir() {
        return Err(ScrapeError::io(
            dir,
            std::io::Error::new(std::io::ErrorKind::AlreadyExists, "path exists but is not a directory"),
        ));
    }
    if !dir.exists() {
        fs::create_dir_all(dir).map_err(|e| ScrapeError::io(dir, e))?;
    }
    Ok(())
}

pub fn ensure_parent(path: &Path) -> Result<()> {
    if let Some(parent) = path.parent() {
        if !parent.as_os_str().is_empty() {
            ensure_directory(parent)?;
        }
    }
    Ok(())
}

pub fn looks_like_dir_hint(p: &Path) -> bool {
    let s = p.to_string_lossy();
    s.ends_with('/') || s.ends_with('\\')
}

/// Write via a sibling temp file + rename, so a half-written file never sits at `path`.
pub fn write_atomic(path: &Path, bytes: &[u8]) -> Result<()> {
    ensure_parent(path)?;
    let mut tmp = path.as_os_str().to_owned();
    tmp.push(".part");
    let tmp = PathBuf::from(tmp);
    fs::write(&tmp, bytes).map_err(|e| ScrapeError::io(&tmp, e))?;
    fs::rename(&tmp, path).map_err(|e| ScrapeError::io(path, e))?;
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn dir_hint_gets_default_file() {
        assert_eq!(resolve_out_path(Path::new("out/")), Path::new("out/").join(DEFAULT_OUT_FILE));
        assert_eq!(resolve_out_path(Path::new("")), PathBuf::from(DEFAULT_OUT_FILE));
        assert_eq!(resolve_out_path(Path::new("x/data.json")), PathBuf::from("x/data.json"));
    }

    #[test]
    fn existing_dir_gets_default_file() {
        let dir = tempfile::tempdir().unwrap();
        assert_eq!(resolve_out_path(dir.path()), dir.path().join(DEFAULT_OUT_FILE));
    }

    #[test]
    fn atomic_write_creates_parents_and_leaves_no_temp() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("a/b/c.json");
        write_atomic(&path, b"[]").unwrap();
        assert_eq!(fs::read(&path).unwrap(), b"[]");
        assert!(!dir.path().join("a/b/c.json.part").exists());
    }

    #[test]
    fn file_in_the_way_is_an_error() {
        let dir = tempfile::tempdir().unwrap();
        let blocker = dir.path().join("blocker");
        fs::write(&blocker, "x").unwrap();
        assert!(ensure_directory(&blocker).is_err());
    }
}
