#![allow(dead_code)]

pub const ACCEL: u8 = 1;
pub const ACCEL_CMP: u8 = 6;

const WIDTHS: [u8; 5] = [3, 4, 5, 6, 8];

/// Pack `(value, bits)` pairs MSB-first, zero padding the last byte.
pub fn pack_bits(values: &[(i8, u8)]) -> Vec<u8> {
    let mut out = Vec::new();
    let mut acc: u32 = 0;
    let mut used: u32 = 0;
    for &(v, bits) in values {
        let mask = (1u32 << bits) - 1;
        acc = (acc << bits) | (u32::from(v as u8) & mask);
        used += u32::from(bits);
        while used >= 8 {
            used -= 8;
            out.push((acc >> used) as u8);
            acc &= (1 << used) - 1;
        }
    }
    if used > 0 {
        out.push((acc << (8 - used)) as u8);
    }
    out
}

/// Compressed run with width selector 0..=4 carrying `fields`.
pub fn cmp_run(selector: u8, fields: &[[i8; 3]]) -> Vec<u8> {
    assert!((1..=16).contains(&fields.len()));
    let width = WIDTHS[selector as usize];
    let mut out = vec![ACCEL_CMP, (selector << 4) | (fields.len() as u8 - 1)];
    let values: Vec<(i8, u8)> = fields
        .iter()
        .flat_map(|f| f.iter().map(move |&v| (v, width)))
        .collect();
    out.extend(pack_bits(&values));
    out
}

/// Still run of `count` samples.
pub fn still_run(count: u8) -> Vec<u8> {
    vec![ACCEL_CMP, 0xD0 | (count - 1)]
}

pub fn raw_accel(axes: [i8; 3]) -> Vec<u8> {
    vec![ACCEL, axes[0] as u8, axes[1] as u8, axes[2] as u8]
}

/// Expected expansion of one sample.
pub fn record(axes: [i8; 3]) -> [u8; 4] {
    [ACCEL, axes[0] as u8, axes[1] as u8, axes[2] as u8]
}

/// One of every fixed-size packet kind.
pub fn fixed_packets() -> Vec<Vec<u8>> {
    vec![
        vec![0, 0x10, 0x20, 0x30, 0x40, 0x01],
        raw_accel([3, -2, 64]),
        vec![2, 1, 0, 7, 2, 9],
        vec![0xE3, 1, 0, 2, 0, 3, 0],
        vec![0x43, 0x34, 0x12],
        vec![0x03],
        vec![4, 0xEB, 0x00],
        vec![5, b'w', b'a', b'l', b'k'],
        vec![7, 1, 0, 0, 0, 2, 0, 3, 0, 0, 0, 4, 0, 0, 0],
        vec![8, 0x80],
    ]
}
