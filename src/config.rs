use std::path::Path;

use serde::Deserialize;

use crate::WedError;

/// Runtime parameters for streaming decodes.
#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
#[serde(default)]
pub struct Config {
    /// Bytes handed to the decoder per fragment.
    pub chunk_size: usize,
    /// Scratch output size for a single `decompress` call.
    pub output_capacity: usize,
}

impl Default for Config {
    fn default() -> Self {
        Self {
            // one BLE notification payload
            chunk_size: 20,
            output_capacity: 4096,
        }
    }
}

impl Config {
    /// Load a JSON config file; missing fields keep their defaults.
    pub fn load<P: AsRef<Path>>(path: P) -> Result<Self, WedError> {
        let path = path.as_ref();
        let text = std::fs::read_to_string(path)
            .map_err(|e| WedError::Config(format!("{}: {e}", path.display())))?;
        let cfg: Config =
            serde_json::from_str(&text).map_err(|e| WedError::Config(e.to_string()))?;
        cfg.validate()?;
        Ok(cfg)
    }

    pub fn validate(&self) -> Result<(), WedError> {
        if self.chunk_size == 0 {
            return Err(WedError::Config("chunk_size must be positive".into()));
        }
        // a full 16-sample run must always fit
        if self.output_capacity < 16 * crate::ACCEL_RECORD_SIZE {
            return Err(WedError::Config(format!(
                "output_capacity must be at least {}",
                16 * crate::ACCEL_RECORD_SIZE
            )));
        }
        Ok(())
    }
}
