// SPDX-License-Identifier: Apache-2.0
//! Error types for the native engine.

use std::ffi::NulError;
use std::path::PathBuf;

use qsim_engine::EngineError;

use crate::ffi;

/// Errors arising from loading or calling the native library.
#[derive(Debug, thiserror::Error)]
#[non_exhaustive]
pub enum NativeError {
    #[error("failed to load qsim library at '{path}': {cause}")]
    LoadFailed { path: String, cause: String },

    #[error("symbol '{symbol}' not found in qsim library: {cause}")]
    SymbolNotFound { symbol: String, cause: String },

    #[error("qsim library not found; searched: {}", format_paths(.searched))]
    LibraryNotFound { searched: Vec<PathBuf> },

    #[error("invalid argument passed to qsim")]
    InvalidArgument,

    #[error("qsim out of memory")]
    OutOfMemory,

    #[error("output buffer too small")]
    BufferTooSmall,

    #[error("operation not supported by the qsim library")]
    Unsupported,

    #[error("qsim internal error")]
    Internal,

    #[error("qsim call failed with error code {0}")]
    CallFailed(i32),

    #[error("string contains an interior NUL byte: {0}")]
    InteriorNul(#[from] NulError),
}

fn format_paths(paths: &[PathBuf]) -> String {
    if paths.is_empty() {
        return "(nothing)".into();
    }
    paths
        .iter()
        .map(|p| p.display().to_string())
        .collect::<Vec<_>>()
        .join(", ")
}

impl NativeError {
    /// Convert a raw status code into a typed error.
    pub fn from_code(code: i32) -> Self {
        match code {
            ffi::QSIM_ERROR_INVALID_ARGUMENT => NativeError::InvalidArgument,
            ffi::QSIM_ERROR_OUT_OF_MEMORY => NativeError::OutOfMemory,
            ffi::QSIM_ERROR_BUFFER_TOO_SMALL => NativeError::BufferTooSmall,
            ffi::QSIM_ERROR_UNSUPPORTED => NativeError::Unsupported,
            ffi::QSIM_ERROR_INTERNAL => NativeError::Internal,
            other => NativeError::CallFailed(other),
        }
    }

    /// The status code this error was created from, if any.
    pub fn code(&self) -> Option<i32> {
        match self {
            NativeError::InvalidArgument => Some(ffi::QSIM_ERROR_INVALID_ARGUMENT),
            NativeError::OutOfMemory => Some(ffi::QSIM_ERROR_OUT_OF_MEMORY),
            NativeError::BufferTooSmall => Some(ffi::QSIM_ERROR_BUFFER_TOO_SMALL),
            NativeError::Unsupported => Some(ffi::QSIM_ERROR_UNSUPPORTED),
            NativeError::Internal => Some(ffi::QSIM_ERROR_INTERNAL),
            NativeError::CallFailed(code) => Some(*code),
            _ => None,
        }
    }
}

impl From<NativeError> for EngineError {
    fn from(err: NativeError) -> Self {
        match err {
            NativeError::Unsupported => EngineError::Unsupported(err.to_string()),
            NativeError::InteriorNul(_) => EngineError::InvalidCircuit(err.to_string()),
            other => EngineError::Failed {
                code: other.code().unwrap_or(ffi::QSIM_ERROR_INTERNAL),
                message: other.to_string(),
            },
        }
    }
}

pub type NativeResult<T> = std::result::Result<T, NativeError>;

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_from_code() {
        assert!(matches!(
            NativeError::from_code(ffi::QSIM_ERROR_BUFFER_TOO_SMALL),
            NativeError::BufferTooSmall
        ));
        assert!(matches!(NativeError::from_code(-42), NativeError::CallFailed(-42)));
    }

    #[test]
    fn test_into_engine_error() {
        let err: EngineError = NativeError::from_code(ffi::QSIM_ERROR_INVALID_ARGUMENT).into();
        assert!(matches!(err, EngineError::Failed { code: -1, .. }));

        let err: EngineError = NativeError::Unsupported.into();
        assert!(matches!(err, EngineError::Unsupported(_)));
    }

    #[test]
    fn test_library_not_found_lists_paths() {
        let err = NativeError::LibraryNotFound {
            searched: vec![PathBuf::from("/a/libqsim.so"), PathBuf::from("/b/libqsim.so")],
        };
        assert_eq!(
            err.to_string(),
            "qsim library not found; searched: /a/libqsim.so, /b/libqsim.so"
        );
    }
}
