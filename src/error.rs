//! Boundary error taxonomy.
//!
//! These kinds are raised by the collaborators that feed and drain the
//! pipeline (file readers, writers, dataset loaders); the transforms in
//! this crate do not produce them. Violated invariants inside the core —
//! non-bijective permutation, partition length mismatch, node id out of
//! range — are programming errors and panic instead of propagating:
//! continuing with a corrupted renumbering would silently corrupt the
//! downstream search index.

use thiserror::Error;

/// Stable error kinds for the preprocessing boundary.
///
/// The discriminants double as process exit codes for the thin shells
/// wrapping this crate, so new kinds must be appended at the end, never
/// reordered. Exit code 0 is success and has no variant here.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
#[repr(u8)]
pub enum ErrorKind {
    InvalidFingerprint = 1,
    IncompatibleFileVersion,
    MissingFile,
    FileOpenError,
    FileReadError,
    FileWriteError,
    FileIoError,
    UnexpectedEndOfFile,
    IncompatibleDataset,
    UnknownAlgorithm,
}

impl ErrorKind {
    pub fn description(self) -> &'static str {
        match self {
            ErrorKind::InvalidFingerprint => "Fingerprint did not match the expected value",
            ErrorKind::IncompatibleFileVersion => {
                "File is incompatible with this version of the toolchain"
            }
            ErrorKind::MissingFile => "File is missing",
            ErrorKind::FileOpenError => "Problem opening file",
            ErrorKind::FileReadError => "Problem reading from file",
            ErrorKind::FileWriteError => "Problem writing to file",
            ErrorKind::FileIoError => "I/O error occurred",
            ErrorKind::UnexpectedEndOfFile => "Unexpected end of file",
            ErrorKind::IncompatibleDataset => {
                "The dataset is not compatible with the chosen algorithm"
            }
            ErrorKind::UnknownAlgorithm => "Unrecognized algorithm",
        }
    }

    pub fn exit_code(self) -> i32 {
        self as i32
    }
}

/// Boundary error: a kind, a human-readable message, and the source
/// location at which it was raised. One tagged value instead of one type
/// per kind; the top-level shell maps `kind` to its exit code.
#[derive(Debug, Clone, Error, PartialEq, Eq)]
#[error("{}: {message} (at {location})", .kind.description())]
pub struct Error {
    pub kind: ErrorKind,
    pub message: String,
    pub location: &'static str,
}

impl Error {
    pub fn new(kind: ErrorKind, message: impl Into<String>, location: &'static str) -> Self {
        Self {
            kind,
            message: message.into(),
            location,
        }
    }
}

/// Raise a boundary error tagged with the call site.
#[macro_export]
macro_rules! boundary_error {
    ($kind:expr, $($arg:tt)*) => {
        $crate::error::Error::new(
            $kind,
            format!($($arg)*),
            concat!(file!(), ":", line!()),
        )
    };
}

pub type Result<T> = std::result::Result<T, Error>;

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn exit_codes_are_stable() {
        assert_eq!(ErrorKind::InvalidFingerprint.exit_code(), 1);
        assert_eq!(ErrorKind::IncompatibleFileVersion.exit_code(), 2);
        assert_eq!(ErrorKind::MissingFile.exit_code(), 3);
        assert_eq!(ErrorKind::FileOpenError.exit_code(), 4);
        assert_eq!(ErrorKind::FileReadError.exit_code(), 5);
        assert_eq!(ErrorKind::FileWriteError.exit_code(), 6);
        assert_eq!(ErrorKind::FileIoError.exit_code(), 7);
        assert_eq!(ErrorKind::UnexpectedEndOfFile.exit_code(), 8);
        assert_eq!(ErrorKind::IncompatibleDataset.exit_code(), 9);
        assert_eq!(ErrorKind::UnknownAlgorithm.exit_code(), 10);
    }

    #[test]
    fn display_includes_description_message_and_location() {
        let err = Error::new(ErrorKind::MissingFile, "graph.ebg not found", "reader.rs:42");
        assert_eq!(
            err.to_string(),
            "File is missing: graph.ebg not found (at reader.rs:42)"
        );
    }

    #[test]
    fn macro_captures_the_call_site() {
        let err = boundary_error!(ErrorKind::UnexpectedEndOfFile, "wanted {} more bytes", 16);
        assert_eq!(err.kind, ErrorKind::UnexpectedEndOfFile);
        assert_eq!(err.message, "wanted 16 more bytes");
        assert!(err.location.contains("error.rs"));
    }
}
