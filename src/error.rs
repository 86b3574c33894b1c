use thiserror::Error;

/// Bytes consumed from the input and written to the output by one call.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, serde::Serialize)]
pub struct Progress {
    pub consumed: usize,
    pub produced: usize,
}

#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum WedError {
    /// Caller supplied an empty input where one is required.
    #[error("invalid parameter")]
    InvalidParam,

    /// Input ended inside a packet; the remainder must be resubmitted.
    #[error("unprocessed input after {} bytes", .progress.consumed)]
    UnprocessedInput { progress: Progress },

    /// Unknown type tag or an unencodable compressed run length.
    #[error("invalid packet with tag byte 0x{tag:02x} at offset {}", .progress.consumed)]
    InvalidPacket { tag: u8, progress: Progress },

    /// Compressed run whose width selector has no decode path.
    #[error("invalid compressed packet header 0x{count_bits:02x} at offset {}", .progress.consumed)]
    InvalidCompressedPacket { count_bits: u8, progress: Progress },

    /// Malformed download file preamble.
    #[error("download file error: {0}")]
    Download(String),

    /// Configuration error.
    #[error("config error: {0}")]
    Config(String),
}

impl WedError {
    /// Numeric status code shared with the device tooling.
    pub fn code(&self) -> i32 {
        match self {
            WedError::InvalidParam => -2,
            WedError::UnprocessedInput { .. } => -3,
            WedError::InvalidPacket { .. } => -4,
            WedError::InvalidCompressedPacket { .. } => -5,
            WedError::Download(_) | WedError::Config(_) => -1,
        }
    }

    /// Counts reached before the call stopped. Zero for parameter errors.
    pub fn progress(&self) -> Progress {
        match self {
            WedError::UnprocessedInput { progress }
            | WedError::InvalidPacket { progress, .. }
            | WedError::InvalidCompressedPacket { progress, .. } => *progress,
            _ => Progress::default(),
        }
    }
}
