//! Packet framing for the wearable event-log stream.
//!
//! Every packet starts with a type byte whose low five bits select the kind:
//!
//! ```text
//! byte 0: [c2 c1 c0][tag(5)]
//! ```
//!
//! The upper three bits are only meaningful for light-sensor data, where each
//! set bit adds one little-endian `u16` channel. Compressed accelerometer runs
//! carry a second header byte:
//!
//! ```text
//! byte 1: [still][selector(3)][count-1 (4)]
//! ```
//!
//! followed by an MSB-first bitstream of `count * 3` fields.

/// Mask selecting the type tag in the first byte of every packet.
pub const TAG_BITS: u8 = 0x1F;

/// Size of one expanded accelerometer record (tag + three axes).
pub const ACCEL_RECORD_SIZE: usize = 4;

/// Largest bitstream a device will put in a single compressed run.
pub const MAX_CMP_BITS: usize = 144;

const CMP_HEADER_SIZE: usize = 2;
const STILL_FLAG: u8 = 0x80;

/// Packet kinds understood by the codec.
#[derive(Debug, Clone, Copy, PartialEq, Eq, serde::Serialize)]
#[serde(rename_all = "snake_case")]
pub enum LogType {
    Time = 0,
    Accel = 1,
    LsConfig = 2,
    LsData = 3,
    Temp = 4,
    Tag = 5,
    AccelCmp = 6,
    Count = 7,
    Event = 8,
}

impl LogType {
    /// Decode the kind from a packet's first byte.
    pub fn from_byte(byte: u8) -> Option<Self> {
        Some(match byte & TAG_BITS {
            0 => LogType::Time,
            1 => LogType::Accel,
            2 => LogType::LsConfig,
            3 => LogType::LsData,
            4 => LogType::Temp,
            5 => LogType::Tag,
            6 => LogType::AccelCmp,
            7 => LogType::Count,
            8 => LogType::Event,
            _ => return None,
        })
    }

    /// Record size for kinds whose length does not depend on the payload.
    pub fn fixed_len(self) -> Option<usize> {
        match self {
            LogType::Time => Some(6),
            LogType::Accel => Some(4),
            LogType::LsConfig => Some(6),
            LogType::Temp => Some(3),
            LogType::Tag => Some(5),
            LogType::Count => Some(15),
            LogType::Event => Some(2),
            LogType::LsData | LogType::AccelCmp => None,
        }
    }
}

/// Bit width of one delta-coded axis.
#[derive(Debug, Clone, Copy, PartialEq, Eq, serde::Serialize)]
pub enum DeltaWidth {
    W3,
    W4,
    W5,
    W6,
}

impl DeltaWidth {
    pub fn bits(self) -> u8 {
        match self {
            DeltaWidth::W3 => 3,
            DeltaWidth::W4 => 4,
            DeltaWidth::W5 => 5,
            DeltaWidth::W6 => 6,
        }
    }
}

/// How the samples of a compressed run are stored.
#[derive(Debug, Clone, Copy, PartialEq, Eq, serde::Serialize)]
pub enum CmpEncoding {
    /// No payload; every field repeats the baseline.
    Still,
    /// Three literal bytes per field.
    Literal8,
    /// Signed per-axis deltas from the previous sample.
    Delta(DeltaWidth),
}

impl CmpEncoding {
    /// Decode the width selector of a `count_bits` byte.
    ///
    /// Returns `None` for selectors with no decode path (6, 7, and STILL
    /// without the still flag).
    pub fn from_count_bits(count_bits: u8) -> Option<Self> {
        match (count_bits >> 4) & 0x7 {
            0 => Some(CmpEncoding::Delta(DeltaWidth::W3)),
            1 => Some(CmpEncoding::Delta(DeltaWidth::W4)),
            2 => Some(CmpEncoding::Delta(DeltaWidth::W5)),
            3 => Some(CmpEncoding::Delta(DeltaWidth::W6)),
            4 => Some(CmpEncoding::Literal8),
            5 if count_bits & STILL_FLAG != 0 => Some(CmpEncoding::Still),
            _ => None,
        }
    }

    /// Bits per axis, 0 for still runs.
    pub fn bits(self) -> u8 {
        match self {
            CmpEncoding::Still => 0,
            CmpEncoding::Literal8 => 8,
            CmpEncoding::Delta(w) => w.bits(),
        }
    }
}

/// Decoded two-byte header of a compressed run.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct CmpHeader {
    pub count_bits: u8,
    pub field_count: usize,
    pub encoding: Option<CmpEncoding>,
}

impl CmpHeader {
    pub fn parse(count_bits: u8) -> Self {
        Self {
            count_bits,
            field_count: usize::from(count_bits & 0x0F) + 1,
            encoding: CmpEncoding::from_count_bits(count_bits),
        }
    }
}

/// Outcome of sizing the packet at the front of a buffer.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub(crate) enum Frame {
    /// Complete packet length as implied by its header.
    Len(usize),
    /// The header itself is cut short by the end of the buffer.
    Truncated,
    /// Unknown tag or an oversized compressed run.
    Invalid,
}

/// Length in bytes of the compressed run starting with `count_bits`, or
/// `None` when the run exceeds [`MAX_CMP_BITS`].
pub fn compressed_len(count_bits: u8) -> Option<usize> {
    let header = CmpHeader::parse(count_bits);
    let width = match header.encoding {
        Some(CmpEncoding::Still) => return Some(CMP_HEADER_SIZE),
        Some(enc) => usize::from(enc.bits()),
        // Unmapped selectors are sized as literal runs.
        None => 8,
    };
    let total_bits = header.field_count * 3 * width;
    if total_bits > MAX_CMP_BITS {
        return None;
    }
    Some(CMP_HEADER_SIZE + total_bits.div_ceil(8))
}

fn ls_data_len(type_byte: u8) -> usize {
    1 + 2 * (type_byte >> 5).count_ones() as usize
}

pub(crate) fn frame(buf: &[u8]) -> Frame {
    let Some(&first) = buf.first() else {
        return Frame::Truncated;
    };
    let Some(kind) = LogType::from_byte(first) else {
        return Frame::Invalid;
    };
    match kind {
        LogType::LsData => Frame::Len(ls_data_len(first)),
        LogType::AccelCmp => match buf.get(1) {
            None => Frame::Truncated,
            Some(&count_bits) => compressed_len(count_bits).map_or(Frame::Invalid, Frame::Len),
        },
        _ => kind.fixed_len().map_or(Frame::Invalid, Frame::Len),
    }
}

/// Length of the packet at the front of `buf`.
///
/// Depends only on the first one or two bytes. `None` when the tag is
/// unknown, the buffer is empty, a compressed run is oversized, or its
/// header is cut short.
pub fn packet_length(buf: &[u8]) -> Option<usize> {
    match frame(buf) {
        Frame::Len(n) => Some(n),
        Frame::Truncated | Frame::Invalid => None,
    }
}

/// Number of samples in the compressed run at the front of `buf`, or 0 if
/// it is not one.
pub fn compressed_field_count(buf: &[u8]) -> usize {
    match buf {
        [first, count_bits, ..] if LogType::from_byte(*first) == Some(LogType::AccelCmp) => {
            CmpHeader::parse(*count_bits).field_count
        }
        _ => 0,
    }
}
