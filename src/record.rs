//! Typed view of individual log packets.

use std::fmt;

use serde::Serialize;

use crate::context::AccelSample;
use crate::packet::{frame, CmpEncoding, CmpHeader, Frame, LogType};

/// A single decoded packet.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(tag = "kind", rename_all = "snake_case")]
pub enum LogRecord {
    Time {
        timestamp: u32,
        flags: u8,
    },
    Accel {
        axes: AccelSample,
    },
    LsConfig {
        dac_on: u8,
        flags: u8,
        level_led: u8,
        gain: u8,
        log_size: u8,
    },
    /// Light-sensor channels; absent channels were not sampled.
    LsData {
        channels: [Option<u16>; 3],
    },
    /// Temperature in tenths of a degree Celsius.
    Temp {
        deci_celsius: i16,
    },
    Tag {
        tag: [u8; 4],
    },
    /// Compressed accelerometer run. Expand with [`crate::decompress`] to get samples.
    AccelCmp {
        field_count: usize,
        encoding: Option<CmpEncoding>,
    },
    Count {
        log_timestamp: u32,
        log_accel_count: u16,
        old_timestamp: u32,
        timestamp: u32,
    },
    Event {
        flags: u8,
    },
}

fn le_u16(b: &[u8]) -> u16 {
    u16::from_le_bytes([b[0], b[1]])
}

fn le_u32(b: &[u8]) -> u32 {
    u32::from_le_bytes([b[0], b[1], b[2], b[3]])
}

impl LogRecord {
    /// Short lowercase kind name used in text dumps.
    pub fn name(&self) -> &'static str {
        match self {
            LogRecord::Time { .. } => "time",
            LogRecord::Accel { .. } => "accel",
            LogRecord::LsConfig { .. } => "ls_config",
            LogRecord::LsData { .. } => "ls_data",
            LogRecord::Temp { .. } => "temp",
            LogRecord::Tag { .. } => "tag",
            LogRecord::AccelCmp { .. } => "accel_cmp",
            LogRecord::Count { .. } => "count",
            LogRecord::Event { .. } => "event",
        }
    }

    /// Number of logical logs this packet stands for.
    pub fn log_count(&self) -> usize {
        match self {
            LogRecord::AccelCmp { field_count, .. } => *field_count,
            _ => 1,
        }
    }
}

/// Decode the packet at the front of `buf`, returning it with its length.
///
/// `None` when the packet is invalid or extends past the end of `buf`.
pub fn parse_record(buf: &[u8]) -> Option<(LogRecord, usize)> {
    let len = match frame(buf) {
        Frame::Len(len) if len <= buf.len() => len,
        _ => return None,
    };
    let p = &buf[..len];
    let record = match LogType::from_byte(p[0])? {
        LogType::Time => LogRecord::Time {
            timestamp: le_u32(&p[1..]),
            flags: p[5],
        },
        LogType::Accel => LogRecord::Accel {
            axes: [p[1] as i8, p[2] as i8, p[3] as i8],
        },
        LogType::LsConfig => LogRecord::LsConfig {
            dac_on: p[1],
            flags: p[2],
            level_led: p[3],
            gain: p[4],
            log_size: p[5],
        },
        LogType::LsData => {
            let mut channels = [None; 3];
            let mut values = p[1..].chunks_exact(2).map(le_u16);
            for (i, slot) in channels.iter_mut().enumerate() {
                if p[0] & (0x80 >> i) != 0 {
                    *slot = values.next();
                }
            }
            LogRecord::LsData { channels }
        }
        LogType::Temp => LogRecord::Temp {
            deci_celsius: le_u16(&p[1..]) as i16,
        },
        LogType::Tag => LogRecord::Tag {
            tag: [p[1], p[2], p[3], p[4]],
        },
        LogType::AccelCmp => {
            let header = CmpHeader::parse(p[1]);
            LogRecord::AccelCmp {
                field_count: header.field_count,
                encoding: header.encoding,
            }
        }
        LogType::Count => LogRecord::Count {
            log_timestamp: le_u32(&p[1..]),
            log_accel_count: le_u16(&p[5..]),
            old_timestamp: le_u32(&p[7..]),
            timestamp: le_u32(&p[11..]),
        },
        LogType::Event => LogRecord::Event { flags: p[1] },
    };
    Some((record, len))
}

/// Iterator over the whole packets at the front of a buffer.
#[derive(Debug, Clone)]
pub struct Records<'a> {
    rest: &'a [u8],
}

impl<'a> Records<'a> {
    /// Bytes not yet yielded; non-empty after iteration ends on a bad or
    /// partial packet.
    pub fn remainder(&self) -> &'a [u8] {
        self.rest
    }
}

impl Iterator for Records<'_> {
    type Item = LogRecord;

    fn next(&mut self) -> Option<LogRecord> {
        let (record, len) = parse_record(self.rest)?;
        self.rest = &self.rest[len..];
        Some(record)
    }
}

pub fn records(buf: &[u8]) -> Records<'_> {
    Records { rest: buf }
}

/// Count logical logs in `buf`; compressed runs count once per sample.
pub fn log_count(buf: &[u8]) -> usize {
    records(buf).map(|r| r.log_count()).sum()
}

impl fmt::Display for LogRecord {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}: ", self.name())?;
        match self {
            LogRecord::Time { timestamp, flags } => write!(f, "{timestamp} flags={flags:#04x}"),
            LogRecord::Accel { axes: [x, y, z] } => write!(f, "{x},{y},{z}"),
            LogRecord::LsConfig {
                dac_on,
                flags,
                level_led,
                gain,
                log_size,
            } => write!(
                f,
                "dac_on={dac_on} flags={flags:#04x} level_led={level_led} gain={gain} log_size={log_size}"
            ),
            LogRecord::LsData { channels } => {
                let parts: Vec<String> = channels
                    .iter()
                    .map(|c| c.map_or_else(|| "-".to_string(), |v| v.to_string()))
                    .collect();
                write!(f, "{}", parts.join(","))
            }
            LogRecord::Temp { deci_celsius } => {
                let sign = if *deci_celsius < 0 { "-" } else { "" };
                let abs = deci_celsius.unsigned_abs();
                write!(f, "{sign}{}.{} C", abs / 10, abs % 10)
            }
            LogRecord::Tag { tag } => write!(f, "{}", hex::encode(tag)),
            LogRecord::AccelCmp {
                field_count,
                encoding,
            } => match encoding {
                Some(enc) => write!(f, "{field_count} samples {enc:?}"),
                None => write!(f, "{field_count} samples invalid"),
            },
            LogRecord::Count {
                log_timestamp,
                log_accel_count,
                old_timestamp,
                timestamp,
            } => write!(
                f,
                "log_timestamp={log_timestamp} accel_count={log_accel_count} old_timestamp={old_timestamp} timestamp={timestamp}"
            ),
            LogRecord::Event { flags } => write!(f, "flags={flags:#04x}"),
        }
    }
}
