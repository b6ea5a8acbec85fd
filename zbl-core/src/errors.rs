//! Error types for `zbl_core`.
//!
//! Every failure is funnelled through [`ZblError`], which uses
//! `thiserror` for `Display` and `Error` derives.  There are exactly two
//! kinds: the user typed something we cannot parse, or the capture
//! backend reported a failure.  The binary maps each kind to its own
//! process exit code via [`ZblError::exit_code`].

use thiserror::Error;

/// Top-level error type for the `zbl_core` library.
#[derive(Debug, Error, PartialEq, Eq)]
pub enum ZblError {
    /// Malformed or unrecognized command-line input.
    #[error("invalid argument: {0}")]
    InvalidArgument(String),

    /// Failure reported by the capture backend, message kept verbatim.
    #[error("{0}")]
    BackendFailure(String),
}

impl ZblError {
    /// Process exit status for this error.
    ///
    /// `2` follows the usual convention for usage errors; any backend
    /// failure exits with `1`.
    pub fn exit_code(&self) -> i32 {
        match self {
            ZblError::InvalidArgument(_) => 2,
            ZblError::BackendFailure(_) => 1,
        }
    }
}

/// Convert a `windows::core::Error` (Win32 / WinRT HRESULT failure) into a
/// `ZblError::BackendFailure`.
#[cfg(windows)]
impl From<windows::core::Error> for ZblError {
    fn from(err: windows::core::Error) -> Self {
        ZblError::BackendFailure(format!("Windows API error: {err}"))
    }
}
