//! Atomic file replacement (write to a sibling temp file, then rename).

use std::ffi::OsString;
use std::fs;
use std::io::{self, Write};
use std::path::{Path, PathBuf};

/// Path of the temp file used while replacing `path`.
pub fn temp_path_for(path: &Path) -> PathBuf {
    let mut name = path
        .file_name()
        .map(|n| n.to_os_string())
        .unwrap_or_else(|| OsString::from("file"));
    name.push(".tmp");
    path.with_file_name(name)
}

/// Replace the contents of `path` with `content` atomically.
///
/// Readers see either the old or the new file, never a partial write.
/// On failure the temp file is removed and the original is left untouched.
pub fn write_atomic(path: &Path, content: &[u8]) -> io::Result<()> {
    if let Some(parent) = path.parent() {
        if !parent.as_os_str().is_empty() {
            fs::create_dir_all(parent)?;
        }
    }

    let temp_path = temp_path_for(path);
    let result = write_then_rename(&temp_path, path, content);
    if result.is_err() {
        let _ = fs::remove_file(&temp_path);
    }
    result
}

fn write_then_rename(temp_path: &Path, path: &Path, content: &[u8]) -> io::Result<()> {
    {
        let mut file = fs::File::create(temp_path)?;
        file.write_all(content)?;
        file.sync_all()?;
    }
    fs::rename(temp_path, path)
}

#[cfg(test)]
mod tests {
    use super::*;
    use tempfile::tempdir;

    #[test]
    fn writes_and_leaves_no_temp() {
        let dir = tempdir().unwrap();
        let path = dir.path().join("nested").join("ww3_grid.nml");

        write_atomic(&path, b"&GRID_NML\n/\n").unwrap();

        assert_eq!(fs::read_to_string(&path).unwrap(), "&GRID_NML\n/\n");
        assert!(!temp_path_for(&path).exists());
    }

    #[test]
    fn failed_write_removes_temp() {
        let dir = tempdir().unwrap();
        // Renaming a file onto an existing directory fails.
        let target = dir.path().join("occupied");
        fs::create_dir(&target).unwrap();
        fs::write(target.join("keep"), "x").unwrap();

        assert!(write_atomic(&target, b"data").is_err());
        assert!(!temp_path_for(&target).exists());
        assert!(target.is_dir());
    }

    #[test]
    fn temp_path_is_sibling() {
        let path = Path::new("/work/ww3_ounf.nml");
        assert_eq!(temp_path_for(path), PathBuf::from("/work/ww3_ounf.nml.tmp"));
    }
}
