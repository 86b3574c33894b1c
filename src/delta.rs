//! Reconstruction of a single accelerometer axis from a coded delta.

/// Bits needed for `value` as a sign bit plus its magnitude.
fn signed_width(value: i16) -> u8 {
    let mut magnitude = value.unsigned_abs();
    let mut bits = 1;
    while magnitude > 0 {
        magnitude >>= 1;
        bits += 1;
    }
    bits
}

/// Apply a sign-extended `bits`-wide delta to `previous`.
///
/// The sum wraps in 8 bits, matching the device encoder. A wrap shows up as a
/// jump wider than the delta could encode, which means packets were lost in
/// between. Jumps wider than 6 bits saturate in the direction of travel;
/// narrower ones drop the delta and hold the previous value.
pub fn decode_accel(previous: i8, delta: i8, bits: u8) -> i8 {
    let value = previous.wrapping_add(delta);
    let needed = signed_width(i16::from(value) - i16::from(previous));
    if needed <= bits {
        return value;
    }
    if needed > 6 {
        if previous < 0 && delta < 0 {
            i8::MIN
        } else if previous > 0 && delta > 0 {
            i8::MAX
        } else {
            value
        }
    } else {
        tracing::trace!(previous, delta, bits, "dropping inconsistent delta");
        previous
    }
}
