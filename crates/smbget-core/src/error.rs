//! Error type shared by the locator parser, both retrieval strategies and the getter.

use std::io;
use std::path::PathBuf;

use crate::copy::CopyError;

/// Fixed preamble of the error returned when neither strategy could retrieve the file.
pub const EXHAUSTED_PREAMBLE: &str = "one of the options should be available: \n 1. local mount of the smb shared folder or; \n 2. smbclient cli installed.";

#[derive(Debug, thiserror::Error)]
pub enum GetError {
    /// Locator is missing the host, the share, or the resource path. Never retried.
    #[error("{0}")]
    InvalidLocator(String),

    /// Destination could not be inspected or created before running the client.
    #[error("failed to create destination path {}: {source}", .path.display())]
    DestinationSetupFailed {
        path: PathBuf,
        #[source]
        source: io::Error,
    },

    /// Client program could not be launched (usually not installed).
    #[error("failed to launch {program}: {source}")]
    ExternalToolUnavailable {
        program: String,
        #[source]
        source: io::Error,
    },

    /// Client program ran but exited unsuccessfully.
    #[error("{program} exited with {}: {output}", exit_label(.status))]
    ExternalToolFailed {
        program: String,
        status: Option<i32>,
        output: String,
    },

    /// Removing a destination created for the client failed; reported instead of falling back.
    #[error("failed to remove partial destination {}: {source}", .path.display())]
    CleanupFailed {
        path: PathBuf,
        #[source]
        source: io::Error,
    },

    /// Both strategies failed. Only the local mount error is shown unless
    /// `report_external` was requested.
    #[error("{}", exhausted_message(.local, .external.as_deref(), .report_external))]
    LocalMountFailed {
        #[source]
        local: CopyError,
        external: Option<Box<GetError>>,
        report_external: bool,
    },

    #[error("checksum mismatch for {}: expected {expected}, got {actual}", .path.display())]
    ChecksumMismatch {
        path: PathBuf,
        expected: String,
        actual: String,
    },

    #[error("failed to read {} for checksum: {source}", .path.display())]
    ChecksumRead {
        path: PathBuf,
        #[source]
        source: io::Error,
    },

    #[error("retrieval cancelled")]
    Cancelled,
}

impl GetError {
    /// True for client launch/exit failures; these trigger the local mount fallback.
    pub fn is_external(&self) -> bool {
        matches!(
            self,
            GetError::ExternalToolUnavailable { .. } | GetError::ExternalToolFailed { .. }
        )
    }
}

fn exit_label(status: &Option<i32>) -> String {
    match status {
        Some(code) => format!("status {}", code),
        None => "no exit status (killed by signal)".to_string(),
    }
}

fn exhausted_message(
    local: &CopyError,
    external: Option<&GetError>,
    report_external: &bool,
) -> String {
    match external {
        Some(ext) if *report_external => {
            format!("{} \n err: {} \n smbclient err: {}", EXHAUSTED_PREAMBLE, local, ext)
        }
        _ => format!("{} \n err: {}", EXHAUSTED_PREAMBLE, local),
    }
}
