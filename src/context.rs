/// One three-axis accelerometer sample.
pub type AccelSample = [i8; 3];

/// Decode state carried across calls for one device session.
///
/// Create one per session and pass it to every sizing and decompression call
/// in order. Not meant to be shared between threads without external
/// serialization.
#[derive(Debug, Clone, Default, PartialEq, Eq, serde::Serialize)]
pub struct DecodeContext {
    /// Last full-resolution sample.
    pub baseline: AccelSample,
    /// Whether a baseline has ever been established. Never cleared.
    pub valid: bool,
    /// Compressed runs dropped because no baseline existed yet.
    pub ignored_runs: u32,
}

impl DecodeContext {
    pub fn new() -> Self {
        Self::default()
    }
}
