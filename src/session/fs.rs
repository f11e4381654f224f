//! Filesystem access for the session: UTF-8 reads and atomic writes.

use std::fs;
use std::io::{self, Write};
use std::path::Path;

use super::{FileSystem, SessionError};

/// The real filesystem.
#[derive(Debug, Default, Clone, Copy)]
pub struct OsFileSystem;

impl FileSystem for OsFileSystem {
    fn read_utf8(&self, path: &Path) -> Result<String, SessionError> {
        let bytes = fs::read(path).map_err(|err| SessionError::from_io(path, err))?;
        String::from_utf8(bytes).map_err(|_| SessionError::Encoding {
            path: path.to_path_buf(),
        })
    }

    fn atomic_write_utf8(&self, path: &Path, text: &str) -> Result<(), SessionError> {
        write_atomic(path, text.as_bytes()).map_err(|err| SessionError::from_io(path, err))
    }
}

/// Write `bytes` to a temporary file next to `path`, sync it, then rename it
/// over `path`. Readers see either the old content or the new, never a mix.
///
/// # Errors
///
/// Returns the underlying I/O error; the target is left untouched.
fn write_atomic(path: &Path, bytes: &[u8]) -> io::Result<()> {
    let dir = match path.parent() {
        Some(parent) if !parent.as_os_str().is_empty() => parent,
        _ => Path::new("."),
    };
    let existing_permissions = fs::metadata(path).ok().map(|meta| meta.permissions());

    let mut tmp = tempfile::Builder::new()
        .prefix(".quill-")
        .suffix(".tmp")
        .tempfile_in(dir)?;
    tmp.write_all(bytes)?;
    tmp.flush()?;
    tmp.as_file().sync_all()?;
    if let Some(permissions) = existing_permissions {
        tmp.as_file().set_permissions(permissions)?;
    }
    tmp.persist(path).map_err(|err| err.error)?;
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use tempfile::tempdir;

    #[test]
    fn test_write_then_read_is_byte_exact() {
        let dir = tempdir().unwrap();
        let path = dir.path().join("notes.txt");
        let text = "naïve café\r\nline two\n\ttabbed 🎉";

        OsFileSystem.atomic_write_utf8(&path, text).unwrap();
        assert_eq!(OsFileSystem.read_utf8(&path).unwrap(), text);
        assert_eq!(fs::read(&path).unwrap(), text.as_bytes());
    }

    #[test]
    fn test_write_replaces_existing_content() {
        let dir = tempdir().unwrap();
        let path = dir.path().join("notes.txt");
        fs::write(&path, "a much longer original body").unwrap();

        OsFileSystem.atomic_write_utf8(&path, "short").unwrap();
        assert_eq!(fs::read_to_string(&path).unwrap(), "short");
    }

    #[test]
    fn test_write_leaves_no_temp_files_behind() {
        let dir = tempdir().unwrap();
        let path = dir.path().join("notes.txt");
        OsFileSystem.atomic_write_utf8(&path, "x").unwrap();

        let names: Vec<_> = fs::read_dir(dir.path())
            .unwrap()
            .map(|e| e.unwrap().file_name().to_string_lossy().to_string())
            .collect();
        assert_eq!(names, vec!["notes.txt".to_string()]);
    }

    #[test]
    fn test_write_into_missing_directory_fails_without_creating_it() {
        let dir = tempdir().unwrap();
        let path = dir.path().join("missing").join("notes.txt");

        let err = OsFileSystem.atomic_write_utf8(&path, "x").unwrap_err();
        assert!(matches!(err, SessionError::NotFound { .. }));
        assert!(!dir.path().join("missing").exists());
    }

    #[test]
    fn test_read_missing_file_is_not_found() {
        let dir = tempdir().unwrap();
        let err = OsFileSystem
            .read_utf8(&dir.path().join("nope.txt"))
            .unwrap_err();
        assert!(matches!(err, SessionError::NotFound { .. }));
    }

    #[test]
    fn test_read_invalid_utf8_is_encoding_error() {
        let dir = tempdir().unwrap();
        let path = dir.path().join("blob.bin");
        fs::write(&path, [0xff, 0xfe, 0x00, 0x41]).unwrap();

        let err = OsFileSystem.read_utf8(&path).unwrap_err();
        assert!(matches!(err, SessionError::Encoding { .. }));
    }

    #[cfg(unix)]
    #[test]
    fn test_write_preserves_existing_permissions() {
        use std::os::unix::fs::PermissionsExt;

        let dir = tempdir().unwrap();
        let path = dir.path().join("script.sh");
        fs::write(&path, "#!/bin/sh\n").unwrap();
        fs::set_permissions(&path, fs::Permissions::from_mode(0o755)).unwrap();

        OsFileSystem
            .atomic_write_utf8(&path, "#!/bin/sh\necho hi\n")
            .unwrap();
        let mode = fs::metadata(&path).unwrap().permissions().mode() & 0o777;
        assert_eq!(mode, 0o755);
    }
}
