//! Decoding of the liveness bitmap reported by request 0x5C.
//!
//! The firmware probes every cell at power-up and reports one byte per row. Bit `n` of
//! row byte `r` is set when the cell at column `n` answered, so only the low five bits of
//! each byte carry information.

use heapless::Vec;

use crate::cell::{CellIndex, CELLS_PER_UNIT, COLUMNS_PER_ROW, ROWS};

/// Length of the liveness bitmap in bytes, one per row.
pub const BITMAP_LEN: usize = ROWS as usize;

const COLUMN_MASK: u8 = (1 << COLUMNS_PER_ROW) - 1;

/// The populated cell positions of one unit, in ascending index order.
pub type LiveSet = Vec<CellIndex, CELLS_PER_UNIT>;

/// Raw liveness bitmap as returned by the device.
#[derive(Copy, Clone, Debug, Default, PartialEq, Eq)]
pub struct LivenessBitmap(pub [u8; BITMAP_LEN]);

impl LivenessBitmap {
    pub fn live_cells(&self) -> LiveSet {
        decode_liveness(&self.0)
    }

    /// Bits set outside the five column bits, OR-ed across all rows. Non-zero values point
    /// at a firmware or transfer problem; they never mark a cell live.
    pub fn stray_bits(&self) -> u8 {
        self.0.iter().fold(0, |acc, row| acc | (row & !COLUMN_MASK))
    }
}

/// Decodes an 8-byte bitmap into the set of live cells.
///
/// Each byte is read least significant bit first over five bits, so byte `g` bit `b`
/// marks cell `5 * g + b`.
pub fn decode_liveness(bitmap: &[u8; BITMAP_LEN]) -> LiveSet {
    CellIndex::all()
        .filter(|cell| bitmap[cell.row() as usize] & (1 << cell.column()) != 0)
        .collect()
}
