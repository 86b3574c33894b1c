//! Sizing and expansion passes over a buffer of log packets.
//!
//! Both passes walk the input with the same framing rules, so the byte count
//! reported by [`compute_output_length`] is exactly what [`decompress`]
//! writes for the same input and context. Either pass stops quietly at a
//! packet cut short by the end of the input; the caller resubmits those bytes
//! together with the next fragment.

use tracing::{debug, trace, warn};

use crate::bitreader::BitReader;
use crate::context::{AccelSample, DecodeContext};
use crate::delta::decode_accel;
use crate::error::{Progress, WedError};
use crate::packet::{frame, CmpEncoding, CmpHeader, Frame, LogType, ACCEL_RECORD_SIZE};

/// Next whole packet in `rest`, `Ok(None)` when it runs past the end.
fn next_packet(rest: &[u8], progress: Progress) -> Result<Option<&[u8]>, WedError> {
    match frame(rest) {
        Frame::Len(len) if len <= rest.len() => Ok(Some(&rest[..len])),
        Frame::Len(_) | Frame::Truncated => Ok(None),
        Frame::Invalid => {
            warn!(tag = rest[0], offset = progress.consumed, "invalid packet");
            Err(WedError::InvalidPacket {
                tag: rest[0],
                progress,
            })
        }
    }
}

fn run_encoding(header: &CmpHeader, progress: Progress) -> Result<CmpEncoding, WedError> {
    header.encoding.ok_or_else(|| {
        warn!(
            count_bits = header.count_bits,
            offset = progress.consumed,
            "invalid compressed packet"
        );
        WedError::InvalidCompressedPacket {
            count_bits: header.count_bits,
            progress,
        }
    })
}

/// Number of bytes `input` expands to, without touching `ctx`.
///
/// Returns [`WedError::UnprocessedInput`] when trailing bytes do not form a
/// whole packet; its progress is still exact for the bytes that did.
pub fn compute_output_length(input: &[u8], ctx: &DecodeContext) -> Result<Progress, WedError> {
    if input.is_empty() {
        return Err(WedError::InvalidParam);
    }
    let mut valid = ctx.valid;
    let mut progress = Progress::default();

    while progress.consumed < input.len() {
        let Some(packet) = next_packet(&input[progress.consumed..], progress)? else {
            break;
        };
        match LogType::from_byte(packet[0]) {
            Some(LogType::AccelCmp) => {
                let header = CmpHeader::parse(packet[1]);
                if run_encoding(&header, progress)? == CmpEncoding::Literal8 {
                    valid = true;
                }
                if valid {
                    progress.produced += header.field_count * ACCEL_RECORD_SIZE;
                }
            }
            Some(LogType::Accel) => {
                valid = true;
                progress.produced += packet.len();
            }
            _ => progress.produced += packet.len(),
        }
        progress.consumed += packet.len();
    }

    if progress.consumed < input.len() {
        return Err(WedError::UnprocessedInput { progress });
    }
    Ok(progress)
}

/// Expand `input` into `output`, updating the session in `ctx`.
///
/// Stops without error when the next packet is incomplete or its expansion
/// does not fit in what is left of `output`. The baseline reached so far is
/// written back to `ctx` on every return path.
pub fn decompress(
    input: &[u8],
    output: &mut [u8],
    ctx: &mut DecodeContext,
) -> Result<Progress, WedError> {
    if input.is_empty() || output.is_empty() {
        return Ok(Progress::default());
    }
    let mut sample = ctx.baseline;
    let result = expand(input, output, ctx, &mut sample);
    ctx.baseline = sample;
    result
}

fn expand(
    input: &[u8],
    output: &mut [u8],
    ctx: &mut DecodeContext,
    sample: &mut AccelSample,
) -> Result<Progress, WedError> {
    let mut progress = Progress::default();

    while progress.consumed < input.len() {
        let Some(packet) = next_packet(&input[progress.consumed..], progress)? else {
            break;
        };
        let room = output.len() - progress.produced;
        let kind = LogType::from_byte(packet[0]);
        trace!(?kind, len = packet.len(), offset = progress.consumed, "packet");

        if kind == Some(LogType::AccelCmp) {
            let header = CmpHeader::parse(packet[1]);
            let encoding = run_encoding(&header, progress)?;
            if encoding == CmpEncoding::Literal8 {
                ctx.valid = true;
            }
            if !ctx.valid {
                ctx.ignored_runs = ctx.ignored_runs.saturating_add(1);
                debug!(
                    ignored = ctx.ignored_runs,
                    "dropping compressed run without baseline"
                );
            } else {
                let need = header.field_count * ACCEL_RECORD_SIZE;
                if need > room {
                    debug!(need, room, "output full");
                    break;
                }
                let out = &mut output[progress.produced..progress.produced + need];
                expand_run(encoding, &packet[2..], sample, out);
                progress.produced += need;
            }
        } else {
            if packet.len() > room {
                debug!(need = packet.len(), room, "output full");
                break;
            }
            if kind == Some(LogType::Accel) {
                ctx.valid = true;
                *sample = [packet[1] as i8, packet[2] as i8, packet[3] as i8];
            }
            output[progress.produced..progress.produced + packet.len()].copy_from_slice(packet);
            progress.produced += packet.len();
        }
        progress.consumed += packet.len();
    }

    Ok(progress)
}

/// Write one accel record per field of a compressed run into `out`.
fn expand_run(encoding: CmpEncoding, payload: &[u8], sample: &mut AccelSample, out: &mut [u8]) {
    let mut reader = BitReader::from_slice(payload);
    for record in out.chunks_exact_mut(ACCEL_RECORD_SIZE) {
        match encoding {
            CmpEncoding::Still => {}
            CmpEncoding::Literal8 => {
                for axis in sample.iter_mut() {
                    *axis = reader.read(8);
                }
            }
            CmpEncoding::Delta(width) => {
                let bits = width.bits();
                for axis in sample.iter_mut() {
                    let delta = reader.read(bits);
                    *axis = decode_accel(*axis, delta, bits);
                }
            }
        }
        record[0] = LogType::Accel as u8;
        for (dst, axis) in record[1..].iter_mut().zip(sample.iter()) {
            *dst = *axis as u8;
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    const TEMP: [u8; 3] = [4, 0xE7, 0x00];
    const EVENT: [u8; 2] = [8, 0x01];

    #[test]
    fn passthrough_matches_input() {
        let mut input = Vec::new();
        input.extend_from_slice(&TEMP);
        input.extend_from_slice(&EVENT);
        input.extend_from_slice(&[1, 5, 0xFB, 0x40]);
        let mut ctx = DecodeContext::new();
        let size = compute_output_length(&input, &ctx).unwrap();
        assert_eq!(size, Progress { consumed: 9, produced: 9 });

        let mut out = [0u8; 16];
        let p = decompress(&input, &mut out, &mut ctx).unwrap();
        assert_eq!(p, size);
        assert_eq!(&out[..9], &input[..]);
        assert!(ctx.valid);
        assert_eq!(ctx.baseline, [5, -5, 64]);
    }

    #[test]
    fn still_run_repeats_baseline() {
        let mut ctx = DecodeContext {
            baseline: [1, 2, 3],
            valid: true,
            ignored_runs: 0,
        };
        let input = [6, 0xD4];
        let mut out = [0u8; 20];
        let p = decompress(&input, &mut out, &mut ctx).unwrap();
        assert_eq!(p, Progress { consumed: 2, produced: 20 });
        for record in out.chunks(4) {
            assert_eq!(record, &[1, 1, 2, 3]);
        }
    }

    #[test]
    fn sizer_zero_length_is_invalid_param() {
        let ctx = DecodeContext::new();
        assert_eq!(compute_output_length(&[], &ctx), Err(WedError::InvalidParam));
    }

    #[test]
    fn decompress_zero_length_is_noop() {
        let mut ctx = DecodeContext::new();
        let mut out = [0u8; 4];
        assert_eq!(decompress(&[], &mut out, &mut ctx), Ok(Progress::default()));
        assert_eq!(decompress(&EVENT, &mut [], &mut ctx), Ok(Progress::default()));
    }

    #[test]
    fn trailing_cmp_header_byte_is_partial() {
        let ctx = DecodeContext::new();
        let input = [8, 0, 6];
        let err = compute_output_length(&input, &ctx).unwrap_err();
        assert_eq!(
            err,
            WedError::UnprocessedInput {
                progress: Progress { consumed: 2, produced: 2 }
            }
        );
        assert_eq!(err.code(), -3);
    }
}
