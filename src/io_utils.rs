//! Error reporting for the `wedlog` command line.

use std::io;
use std::path::{Path, PathBuf};

use thiserror::Error;

use crate::WedError;

/// A failure surfaced to the user, with a hint on what to check.
#[derive(Error, Debug)]
pub enum CliError {
    #[error(
        "failed {operation} '{}': {source}{}",
        path.display(),
        hint.map(|h| format!(". {h}")).unwrap_or_default()
    )]
    Io {
        operation: String,
        path: PathBuf,
        hint: Option<&'static str>,
        #[source]
        source: io::Error,
    },
    #[error("{context}: {source}. {hint}")]
    Codec {
        context: String,
        hint: String,
        #[source]
        source: WedError,
    },
    #[error("{0}")]
    Usage(String),
}

/// What to check for a given I/O failure, if anything useful can be said.
fn io_hint(kind: io::ErrorKind) -> Option<&'static str> {
    match kind {
        io::ErrorKind::NotFound => Some("Check that the file exists and the path is correct."),
        io::ErrorKind::PermissionDenied => Some("Check the file permissions."),
        io::ErrorKind::UnexpectedEof => Some("The file appears truncated."),
        io::ErrorKind::WriteZero => Some("The disk may be full."),
        _ => None,
    }
}

/// Wrap an I/O error with the operation and path that failed.
pub fn io_cli_error(operation: &str, path: &Path, err: io::Error) -> CliError {
    CliError::Io {
        operation: operation.to_string(),
        path: path.to_path_buf(),
        hint: io_hint(err.kind()),
        source: err,
    }
}

/// Reject the command line or its input before decoding starts.
pub fn usage_error(msg: impl Into<String>) -> CliError {
    CliError::Usage(msg.into())
}

/// Wrap a codec error with what was being done when it happened.
pub fn wed_cli_error(context: &str, err: WedError) -> CliError {
    CliError::Codec {
        context: context.to_string(),
        hint: cli_hint(&err),
        source: err,
    }
}

/// What the user should check for a codec error.
pub fn cli_hint(err: &WedError) -> String {
    match err {
        WedError::InvalidParam => "Input is empty.".to_string(),
        WedError::UnprocessedInput { progress } => format!(
            "The download ends inside a packet; bytes after offset {} were not decoded.",
            progress.consumed
        ),
        WedError::InvalidPacket { .. } => "Verify the file is intact.".to_string(),
        WedError::InvalidCompressedPacket { .. } => {
            "The run header is corrupt. Verify the file is intact.".to_string()
        }
        WedError::Download(_) => "Check the file preamble.".to_string(),
        WedError::Config(_) => "Check the config file and command-line options.".to_string(),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::Progress;
    use std::error::Error as _;

    #[test]
    fn codec_hint_mentions_offset() {
        let err = WedError::InvalidPacket {
            tag: 0x1F,
            progress: Progress {
                consumed: 12,
                produced: 20,
            },
        };
        let cli = wed_cli_error("decompression failed", err.clone());
        let msg = cli.to_string();
        assert!(msg.starts_with("decompression failed: "));
        assert!(msg.contains("offset 12"));
        assert!(msg.contains("Verify the file is intact"));
        let source = cli.source().and_then(|s| s.downcast_ref::<WedError>());
        assert_eq!(source, Some(&err));
    }

    #[test]
    fn io_error_names_path_and_hint() {
        let err = io::Error::new(io::ErrorKind::NotFound, "missing");
        let msg = io_cli_error("reading input file", Path::new("x.dat"), err).to_string();
        assert!(msg.contains("'x.dat'"));
        assert!(msg.contains("Check that the file exists"));
    }

    #[test]
    fn unknown_io_failure_has_no_hint() {
        let err = io::Error::new(io::ErrorKind::Other, "boom");
        let msg = io_cli_error("writing output file", Path::new("out.bin"), err).to_string();
        assert_eq!(msg, "failed writing output file 'out.bin': boom");
    }
}
