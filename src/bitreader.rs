//! MSB-first reader for the packed payload of compressed runs.

/// Bit level cursor over a compressed run payload.
///
/// Reads never look past the byte holding the last requested bit, so a
/// payload sized by [`crate::packet::compressed_len`] is always long enough
/// for the fields its header announces.
#[derive(Debug, Clone)]
pub struct BitReader<'a> {
    data: &'a [u8],
    byte: usize,
    bit: u8,
}

impl<'a> BitReader<'a> {
    pub fn from_slice(data: &'a [u8]) -> Self {
        Self { data, byte: 0, bit: 0 }
    }

    pub fn bits_read(&self) -> usize {
        self.byte * 8 + usize::from(self.bit)
    }

    /// Read `n` bits (1..=8) and sign-extend them to an `i8`.
    ///
    /// The first bit read is the sign bit. Panics if the payload is shorter
    /// than the bits requested.
    pub fn read(&mut self, n: u8) -> i8 {
        debug_assert!((1..=8).contains(&n));
        let hi = u16::from(self.data[self.byte]);
        let lo = if self.bit + n > 8 {
            u16::from(self.data[self.byte + 1])
        } else {
            0
        };
        let window = (hi << 8) | lo;
        let shift = 16 - u16::from(self.bit) - u16::from(n);
        let raw = ((window >> shift) & ((1u16 << n) - 1)) as u8;

        self.bit += n;
        if self.bit >= 8 {
            self.bit -= 8;
            self.byte += 1;
        }

        ((raw << (8 - n)) as i8) >> (8 - n)
    }
}
