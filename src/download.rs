//! Download files written by the device tooling.
//!
//! ```text
//! compressed\n
//! start_time: 2016-03-01 10:22:31.412000\n
//! sample_period: 40\n
//! <packet bytes>
//! ```
//!
//! The `start_time` and `sample_period` lines are optional. A file that does
//! not start with `raw` or `compressed` is a bare packet stream.

use serde::Serialize;

use crate::WedError;

/// How the device was asked to log.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum DownloadMode {
    Raw,
    Compressed,
}

/// Text preamble of a download file.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
pub struct DownloadHeader {
    pub mode: Option<DownloadMode>,
    pub start_time: Option<String>,
    /// Sampling period in milliseconds.
    pub sample_period: Option<u32>,
}

/// Split a line ending in `\n` off the front of `data`.
fn take_line(data: &[u8]) -> Option<(&str, &[u8])> {
    let end = data.iter().position(|&b| b == b'\n')?;
    let line = std::str::from_utf8(&data[..end]).ok()?;
    Some((line.trim_end_matches('\r'), &data[end + 1..]))
}

/// Parse the preamble and return it with the packet bytes that follow.
pub fn parse_download(data: &[u8]) -> Result<(DownloadHeader, &[u8]), WedError> {
    let mut header = DownloadHeader::default();
    let mut rest = data;

    match take_line(rest) {
        Some(("raw", tail)) => {
            header.mode = Some(DownloadMode::Raw);
            rest = tail;
        }
        Some(("compressed", tail)) => {
            header.mode = Some(DownloadMode::Compressed);
            rest = tail;
        }
        _ => return Ok((header, data)),
    }

    if let Some((line, tail)) = take_line(rest) {
        if let Some(value) = line.strip_prefix("start_time:") {
            header.start_time = Some(value.trim().to_string());
            rest = tail;
        }
    }
    if let Some((line, tail)) = take_line(rest) {
        if let Some(value) = line.strip_prefix("sample_period:") {
            let period = value
                .trim()
                .parse()
                .map_err(|e| WedError::Download(format!("bad sample_period {value:?}: {e}")))?;
            header.sample_period = Some(period);
            rest = tail;
        }
    }
    Ok((header, rest))
}
