//! Errors returned by document session operations.

use std::io;
use std::path::{Path, PathBuf};

/// Failures a document session can run into.
///
/// Everything except [`SessionError::UserCancelled`] has already been shown to
/// the user by the time a session operation returns it.
#[derive(Debug, thiserror::Error)]
pub enum SessionError {
    #[error("{} does not exist", .path.display())]
    NotFound { path: PathBuf },

    #[error("permission denied: {}", .path.display())]
    PermissionDenied { path: PathBuf },

    #[error("I/O error on {}: {source}", .path.display())]
    Io {
        path: PathBuf,
        #[source]
        source: io::Error,
    },

    #[error("{} is not valid UTF-8 text", .path.display())]
    Encoding { path: PathBuf },

    #[error("cancelled")]
    UserCancelled,
}

impl SessionError {
    /// Classify an I/O error raised while touching `path`.
    pub fn from_io(path: &Path, err: io::Error) -> Self {
        let path = path.to_path_buf();
        match err.kind() {
            io::ErrorKind::NotFound => Self::NotFound { path },
            io::ErrorKind::PermissionDenied => Self::PermissionDenied { path },
            _ => Self::Io { path, source: err },
        }
    }

    /// Whether this is the silent "user dismissed a dialog" signal.
    pub const fn is_cancelled(&self) -> bool {
        matches!(self, Self::UserCancelled)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_from_io_classifies_kinds() {
        let path = Path::new("/tmp/x.txt");
        assert!(matches!(
            SessionError::from_io(path, io::Error::from(io::ErrorKind::NotFound)),
            SessionError::NotFound { .. }
        ));
        assert!(matches!(
            SessionError::from_io(path, io::Error::from(io::ErrorKind::PermissionDenied)),
            SessionError::PermissionDenied { .. }
        ));
        assert!(matches!(
            SessionError::from_io(path, io::Error::other("disk full")),
            SessionError::Io { .. }
        ));
    }

    #[test]
    fn test_messages_name_the_path() {
        let err = SessionError::Encoding {
            path: PathBuf::from("notes.bin"),
        };
        assert_eq!(err.to_string(), "notes.bin is not valid UTF-8 text");
        assert!(!err.is_cancelled());
        assert!(SessionError::UserCancelled.is_cancelled());
    }
}
