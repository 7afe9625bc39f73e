//! Decoding of raw sample blocks.
//!
//! A block is a sequence of 4-byte chunks, one per cell: pressure in the first two bytes,
//! temperature in the last two. Each 10-bit count is stored MSB first and left aligned,
//! so the low six bits of the second byte are padding. The firmware leaves the chunk of a
//! cell it did not read at all zeros.

use core::fmt::{Display, Formatter};
use heapless::Vec;

use crate::bitfield::{extract_field, to_signed};

/// Bytes per cell in a sample block.
pub const CHUNK_LEN: usize = 4;

/// Length of the row block returned by request 0x7C.
pub const ROW_FRAME_LEN: usize = 20;

/// Largest block the bulk endpoint delivers.
pub const MAX_FRAME_LEN: usize = 720;

pub const MAX_FRAME_CELLS: usize = MAX_FRAME_LEN / CHUNK_LEN;

const ADC_BITS: u32 = 10;

/// Decoded samples of one block, in block order.
pub type Samples = Vec<RawSample, MAX_FRAME_CELLS>;

/// Raw ADC counts of one cell.
#[derive(Copy, Clone, Debug, PartialEq, Eq)]
pub struct RawSample {
    pressure: i16,
    temperature: i16,
}

impl RawSample {
    pub fn new(pressure: i16, temperature: i16) -> Self {
        Self { pressure, temperature }
    }

    /// Raw pressure count (`Padc`)
    pub fn pressure(&self) -> i16 {
        self.pressure
    }

    /// Raw temperature count (`Tadc`)
    pub fn temperature(&self) -> i16 {
        self.temperature
    }
}

/// A sample block did not line up with the cells it was expected to cover.
#[derive(Copy, Clone, Debug, PartialEq, Eq)]
pub enum FrameLengthMismatch {
    /// The block length is not four bytes per expected cell.
    Bytes { expected: usize, actual: usize },

    /// The block held a different number of non-empty chunks than there are live cells.
    Cells { expected: usize, actual: usize },

    /// The block is longer than [`MAX_FRAME_LEN`].
    Oversized { len: usize },
}

impl Display for FrameLengthMismatch {
    fn fmt(&self, f: &mut Formatter<'_>) -> core::fmt::Result {
        match self {
            FrameLengthMismatch::Bytes { expected, actual } => {
                write!(f, "expected a {expected} byte frame, got {actual} bytes")
            }
            FrameLengthMismatch::Cells { expected, actual } => {
                write!(f, "expected samples for {expected} cells, decoded {actual}")
            }
            FrameLengthMismatch::Oversized { len } => {
                write!(f, "{len} byte frame exceeds the {MAX_FRAME_LEN} byte limit")
            }
        }
    }
}

/// Splits `bytes` into `cell_count` chunks and decodes every chunk that is not all zeros.
///
/// With `discard_sign` the counts are reported as the magnitude of their two's complement
/// value, which is what the reference host software has always done. Without it the signed
/// value is kept.
pub fn decode_frame(bytes: &[u8], cell_count: usize, discard_sign: bool) -> Result<Samples, FrameLengthMismatch> {
    if bytes.len() > MAX_FRAME_LEN {
        return Err(FrameLengthMismatch::Oversized { len: bytes.len() });
    }

    let expected = cell_count * CHUNK_LEN;
    if bytes.len() != expected {
        return Err(FrameLengthMismatch::Bytes { expected, actual: bytes.len() });
    }

    Ok(bytes
        .chunks_exact(CHUNK_LEN)
        .filter(|chunk| chunk.iter().any(|&b| b != 0))
        .map(|chunk| decode_chunk(chunk, discard_sign))
        .collect())
}

fn decode_chunk(chunk: &[u8], discard_sign: bool) -> RawSample {
    RawSample {
        pressure: decode_count(&chunk[0..2], discard_sign),
        temperature: decode_count(&chunk[2..4], discard_sign),
    }
}

fn decode_count(bytes: &[u8], discard_sign: bool) -> i16 {
    let value = to_signed(extract_field(bytes, 0, ADC_BITS), ADC_BITS) as i16;

    if discard_sign {
        value.abs()
    } else {
        value
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    const AN3785_CHUNK: [u8; 4] = [0x66, 0x80, 0x7E, 0xC0];

    #[test]
    fn decode_single_chunk() {
        let samples = decode_frame(&AN3785_CHUNK, 1, true).unwrap();

        assert_eq!(&[RawSample::new(410, 507)], samples.as_slice());
    }

    #[test]
    fn zero_chunk_is_dropped() {
        let frame = [
            0x66, 0x80, 0x7E, 0xC0, //
            0x40, 0x40, 0x60, 0x00, //
            0x00, 0x00, 0x00, 0x00, //
            0x01, 0x00, 0x00, 0x40, //
            0x10, 0xC0, 0x11, 0x00, //
        ];

        let samples = decode_frame(&frame, 5, true).unwrap();

        assert_eq!(
            &[
                RawSample::new(410, 507),
                RawSample::new(257, 384),
                RawSample::new(4, 1),
                RawSample::new(67, 68),
            ],
            samples.as_slice()
        );
    }

    #[test]
    fn magnitude_of_negative_counts() {
        // 0x3FF is -1 and 0x200 is -512 in ten bit two's complement
        let frame = [0xFF, 0xC0, 0x80, 0x00];

        let samples = decode_frame(&frame, 1, true).unwrap();
        assert_eq!(RawSample::new(1, 512), samples[0]);

        let samples = decode_frame(&frame, 1, false).unwrap();
        assert_eq!(RawSample::new(-1, -512), samples[0]);
    }

    #[test]
    fn padding_bits_are_ignored() {
        let samples = decode_frame(&[0x66, 0xBF, 0x7E, 0xFF], 1, true).unwrap();

        assert_eq!(RawSample::new(410, 507), samples[0]);
    }

    #[test]
    fn length_must_match_cell_count() {
        assert_eq!(
            Err(FrameLengthMismatch::Bytes { expected: 8, actual: 4 }),
            decode_frame(&AN3785_CHUNK, 2, true)
        );
        assert_eq!(
            Err(FrameLengthMismatch::Bytes { expected: 0, actual: 4 }),
            decode_frame(&AN3785_CHUNK, 0, true)
        );
    }

    #[test]
    fn oversized_frame() {
        let frame = [0u8; MAX_FRAME_LEN + CHUNK_LEN];

        assert_eq!(
            Err(FrameLengthMismatch::Oversized { len: MAX_FRAME_LEN + CHUNK_LEN }),
            decode_frame(&frame, MAX_FRAME_CELLS + 1, true)
        );
    }

    #[test]
    fn full_bulk_frame() {
        let mut frame = [0u8; MAX_FRAME_LEN];
        for chunk in frame.chunks_exact_mut(CHUNK_LEN) {
            chunk.copy_from_slice(&AN3785_CHUNK);
        }

        let samples = decode_frame(&frame, MAX_FRAME_CELLS, true).unwrap();
        assert_eq!(MAX_FRAME_CELLS, samples.len());
    }

    #[test]
    fn empty_frame() {
        assert!(decode_frame(&[], 0, true).unwrap().is_empty());
    }
}
