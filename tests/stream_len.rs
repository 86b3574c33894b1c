mod common;

use common::*;
use wedlog::{compute_output_length, DecodeContext, Progress, WedError};

fn valid_ctx() -> DecodeContext {
    DecodeContext {
        baseline: [0, 0, 0],
        valid: true,
        ignored_runs: 0,
    }
}

#[test]
fn fixed_packets_sum_their_lengths() {
    let packets = fixed_packets();
    let input: Vec<u8> = packets.concat();
    let p = compute_output_length(&input, &DecodeContext::new()).unwrap();
    assert_eq!(p.consumed, input.len());
    assert_eq!(p.produced, packets.iter().map(Vec::len).sum::<usize>());
}

#[test]
fn runs_before_baseline_contribute_nothing() {
    let mut input = cmp_run(0, &[[1, 1, 1], [0, 0, 0]]);
    input.extend(still_run(4));
    let p = compute_output_length(&input, &DecodeContext::new()).unwrap();
    assert_eq!(p, Progress { consumed: input.len(), produced: 0 });
}

#[test]
fn raw_accel_enables_following_runs() {
    let mut input = cmp_run(1, &[[1, 1, 1]]);
    input.extend(raw_accel([5, 5, 5]));
    input.extend(cmp_run(1, &[[1, 1, 1], [2, 2, 2]]));
    let p = compute_output_length(&input, &DecodeContext::new()).unwrap();
    assert_eq!(p.produced, 4 + 2 * 4);
}

#[test]
fn literal_run_enables_itself() {
    let input = cmp_run(4, &[[1, 2, 3], [4, 5, 6], [7, 8, 9]]);
    assert_eq!(input.len(), 11);
    let p = compute_output_length(&input, &DecodeContext::new()).unwrap();
    assert_eq!(p, Progress { consumed: 11, produced: 12 });
}

#[test]
fn context_validity_is_honoured_and_untouched() {
    let ctx = valid_ctx();
    let input = still_run(16);
    let p = compute_output_length(&input, &ctx).unwrap();
    assert_eq!(p.produced, 64);
    assert_eq!(ctx, valid_ctx());
}

#[test]
fn unknown_tag_stops_at_its_offset() {
    let mut input = vec![8, 0, 4, 0, 0];
    input.extend([0x0C, 1, 2, 3]);
    let err = compute_output_length(&input, &valid_ctx()).unwrap_err();
    assert_eq!(
        err,
        WedError::InvalidPacket {
            tag: 0x0C,
            progress: Progress { consumed: 5, produced: 5 }
        }
    );
    assert_eq!(err.code(), -4);
}

#[test]
fn oversized_run_is_invalid_packet() {
    // literal selector with seven fields: 168 bits
    let input = [6u8, 0x46, 0, 0];
    let err = compute_output_length(&input, &valid_ctx()).unwrap_err();
    assert!(matches!(err, WedError::InvalidPacket { tag: 6, .. }));
}

#[test]
fn unmapped_selector_is_invalid_compressed_packet() {
    let mut input = raw_accel([0, 0, 0]);
    input.extend([6u8, 0x60, 0, 0, 0]);
    let err = compute_output_length(&input, &DecodeContext::new()).unwrap_err();
    assert_eq!(
        err,
        WedError::InvalidCompressedPacket {
            count_bits: 0x60,
            progress: Progress { consumed: 4, produced: 4 }
        }
    );
    assert_eq!(err.code(), -5);
}

#[test]
fn partial_trailing_packet_is_advisory() {
    let mut input = raw_accel([1, 2, 3]);
    input.extend(&cmp_run(0, &[[1, 1, 1], [1, 1, 1]])[..3]);
    let err = compute_output_length(&input, &DecodeContext::new()).unwrap_err();
    assert_eq!(
        err,
        WedError::UnprocessedInput {
            progress: Progress { consumed: 4, produced: 4 }
        }
    );
    assert_eq!(err.code(), -3);
}

#[test]
fn empty_input_is_invalid_param() {
    let err = compute_output_length(&[], &DecodeContext::new()).unwrap_err();
    assert_eq!(err, WedError::InvalidParam);
    assert_eq!(err.code(), -2);
    assert_eq!(err.progress(), Progress::default());
}
