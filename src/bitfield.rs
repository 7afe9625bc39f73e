//! Big-endian bit field access for the packed calibration and sample layouts.
//!
//! The MPL115A2 cells pack their coefficients and ADC counts MSB first, with fields that
//! are 16, 14, 11 or 10 bits wide and do not start on byte boundaries.

/// Reads `width` bits starting `offset` bits into `buf`, most significant bit first.
///
/// Bits past the end of `buf` read as zero, which lets short calibration blobs decode as if
/// they had been zero-padded. `width` must not exceed 32.
pub fn extract_field(buf: &[u8], offset: usize, width: u32) -> u32 {
    debug_assert!(width <= 32);

    (0..width as usize).fold(0u32, |acc, i| {
        let bit = offset + i;
        let byte = buf.get(bit / 8).copied().unwrap_or(0);

        (acc << 1) | u32::from((byte >> (7 - bit % 8)) & 1)
    })
}

/// Reinterprets the low `width` bits of `value` as a two's complement number.
pub fn to_signed(value: u32, width: u32) -> i32 {
    debug_assert!((1..=32).contains(&width));

    let value = i64::from(value);
    if value & (1 << (width - 1)) != 0 {
        (value - (1i64 << width)) as i32
    } else {
        value as i32
    }
}
