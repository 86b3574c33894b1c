//! Codec for the event-log stream of a wearable sensor device.
//!
//! The device logs a sequence of variable-length packets (timestamps, raw and
//! compressed accelerometer samples, light-sensor config and data,
//! temperature, tags, counts and events). Compressed accelerometer runs pack
//! up to 16 samples as per-axis deltas of 3 to 6 bits, as literal bytes, or
//! as a bare "still" marker. This crate expands those runs back into plain
//! accel packets and passes everything else through unchanged.
//!
//! Decoding is incremental: [`decompress`] stops at a packet that is cut
//! short or does not fit in the output, and reports how far it got, so a
//! caller can resubmit the remainder with the next fragment. The baseline
//! sample needed to apply deltas lives in a caller-owned [`DecodeContext`].
//!
//! ```
//! use wedlog::{compute_output_length, decompress, DecodeContext};
//!
//! // raw accel sample followed by a still run of two samples
//! let input = [0x01, 10, 20, 30, 0x06, 0xD1];
//! let mut ctx = DecodeContext::new();
//!
//! let size = compute_output_length(&input, &ctx).unwrap();
//! let mut out = vec![0u8; size.produced];
//! let done = decompress(&input, &mut out, &mut ctx).unwrap();
//! assert_eq!(done.consumed, input.len());
//! assert_eq!(out, [1, 10, 20, 30, 1, 10, 20, 30, 1, 10, 20, 30]);
//! ```

pub mod bitreader;
pub mod config;
mod context;
pub mod delta;
pub mod download;
mod error;
pub mod io_utils;
pub mod packet;
pub mod record;
pub mod session;
mod stream;

pub use config::Config;
pub use context::{AccelSample, DecodeContext};
pub use delta::decode_accel;
pub use download::{parse_download, DownloadHeader, DownloadMode};
pub use error::{Progress, WedError};
pub use packet::{
    compressed_field_count, compressed_len, packet_length, CmpEncoding, CmpHeader, DeltaWidth,
    LogType, ACCEL_RECORD_SIZE, MAX_CMP_BITS, TAG_BITS,
};
pub use record::{log_count, parse_record, records, LogRecord, Records};
pub use session::StreamDecoder;
pub use stream::{compute_output_length, decompress};
