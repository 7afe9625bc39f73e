//! Cell addressing.
//!
//! A unit is wired as 8 rows of 5 cells. Cells are addressed by a linear index
//! (`row * 5 + column`), by an explicit row/column pair, or on the I2C side by the address
//! byte of the ATtiny that gates the cell.

use core::fmt::{Display, Formatter};

/// Number of cells in one row of a unit.
pub const COLUMNS_PER_ROW: u8 = 5;

/// Number of rows in one unit.
pub const ROWS: u8 = 8;

/// Number of cell positions in one unit.
pub const CELLS_PER_UNIT: usize = (ROWS * COLUMNS_PER_ROW) as usize;

/// Splits a linear index into `(row, column)`.
pub const fn cell_address(index: u8) -> (u8, u8) {
    (index / COLUMNS_PER_ROW, index % COLUMNS_PER_ROW)
}

/// Address byte of the ATtiny gating the cell at `row`, `column`.
pub const fn device_address(row: u8, column: u8) -> u8 {
    (row & 0x0F) << 4 | (column & 0x07) << 1
}

/// Position of a cell within one unit, validated against the unit geometry.
#[derive(Copy, Clone, Debug, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub struct CellIndex(u8);

impl CellIndex {
    /// Returns [`None`] if `index` is outside the unit.
    pub const fn new(index: u8) -> Option<Self> {
        if (index as usize) < CELLS_PER_UNIT {
            Some(Self(index))
        } else {
            None
        }
    }

    /// Returns [`None`] if `row` or `column` is outside the unit.
    pub const fn from_row_column(row: u8, column: u8) -> Option<Self> {
        if row < ROWS && column < COLUMNS_PER_ROW {
            Some(Self(row * COLUMNS_PER_ROW + column))
        } else {
            None
        }
    }

    pub const fn get(self) -> u8 {
        self.0
    }

    pub const fn row(self) -> u8 {
        cell_address(self.0).0
    }

    pub const fn column(self) -> u8 {
        cell_address(self.0).1
    }

    /// The I2C address byte of the ATtiny gating this cell.
    pub const fn device_address(self) -> u8 {
        device_address(self.row(), self.column())
    }

    /// Every cell position of a unit, in index order.
    pub fn all() -> impl Iterator<Item = CellIndex> {
        (0..CELLS_PER_UNIT as u8).map(CellIndex)
    }
}

impl Display for CellIndex {
    fn fmt(&self, f: &mut Formatter<'_>) -> core::fmt::Result {
        write!(f, "{} (row {}, column {})", self.0, self.row(), self.column())
    }
}

/// Identifies one array unit when several share a host.
#[derive(Copy, Clone, Debug, Default, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub struct UnitId(pub u8);

/// A cell index that is unique across all units.
#[derive(Copy, Clone, Debug, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub struct GlobalIndex(u32);

impl GlobalIndex {
    pub const fn new(index: u32) -> Self {
        Self(index)
    }

    pub const fn get(self) -> u32 {
        self.0
    }
}

impl Display for GlobalIndex {
    fn fmt(&self, f: &mut Formatter<'_>) -> core::fmt::Result {
        write!(f, "{}", self.0)
    }
}

/// Maps `(unit, local cell)` pairs onto [`GlobalIndex`] values.
///
/// Each unit owns a block of `stride` consecutive global indices. The stride is never
/// smaller than [`CELLS_PER_UNIT`], so blocks cannot overlap.
#[derive(Copy, Clone, Debug, PartialEq, Eq)]
pub struct IndexSpace {
    stride: u16,
}

impl Default for IndexSpace {
    fn default() -> Self {
        Self { stride: Self::DEFAULT_STRIDE }
    }
}

impl IndexSpace {
    pub const DEFAULT_STRIDE: u16 = 50;

    /// Returns [`None`] if `stride` would let two units' indices collide.
    pub const fn new(stride: u16) -> Option<Self> {
        if (stride as usize) < CELLS_PER_UNIT {
            None
        } else {
            Some(Self { stride })
        }
    }

    pub const fn stride(&self) -> u16 {
        self.stride
    }

    pub const fn global(&self, unit: UnitId, cell: CellIndex) -> GlobalIndex {
        GlobalIndex(unit.0 as u32 * self.stride as u32 + cell.0 as u32)
    }

    /// Inverse of [`global`](Self::global). Returns [`None`] for indices that fall into the
    /// unused tail of a unit's block or beyond the last unit.
    pub fn split(&self, index: GlobalIndex) -> Option<(UnitId, CellIndex)> {
        let stride = u32::from(self.stride);
        let unit = u8::try_from(index.0 / stride).ok()?;
        let local = u8::try_from(index.0 % stride).ok()?;

        Some((UnitId(unit), CellIndex::new(local)?))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn linear_index_to_row_column() {
        assert_eq!((0, 0), cell_address(0));
        assert_eq!((0, 4), cell_address(4));
        assert_eq!((1, 0), cell_address(5));
        assert_eq!((7, 4), cell_address(39));
    }

    #[test]
    fn cell_index_bounds() {
        assert!(CellIndex::new(39).is_some());
        assert!(CellIndex::new(40).is_none());
        assert!(CellIndex::from_row_column(7, 4).is_some());
        assert!(CellIndex::from_row_column(8, 0).is_none());
        assert!(CellIndex::from_row_column(0, 5).is_none());
        assert_eq!(CellIndex::new(9), CellIndex::from_row_column(1, 4));
    }

    #[test]
    fn device_address_layout() {
        assert_eq!(0x00, device_address(0, 0));
        assert_eq!(0x18, device_address(1, 4));
        assert_eq!(0x78, device_address(7, 4));
        // the firmware's broadcast enable uses column 6 of row 0
        assert_eq!(0x0C, device_address(0, 6));
        // out-of-range parts are masked, not rejected
        assert_eq!(0x0E, device_address(0x10, 0x0F));

        let cell = CellIndex::new(9).unwrap();
        assert_eq!(0x18, cell.device_address());
    }

    #[test]
    fn index_space_round_trip() {
        let space = IndexSpace::default();
        let cell = CellIndex::new(9).unwrap();

        assert_eq!(9, space.global(UnitId(0), cell).get());
        assert_eq!(59, space.global(UnitId(1), cell).get());
        assert_eq!(Some((UnitId(1), cell)), space.split(space.global(UnitId(1), cell)));
    }

    #[test]
    fn index_space_rejects_overlapping_stride() {
        assert!(IndexSpace::new(39).is_none());
        assert_eq!(40, IndexSpace::new(40).unwrap().stride());
    }

    #[test]
    fn index_space_split_rejects_gap() {
        let space = IndexSpace::default();

        assert_eq!(None, space.split(GlobalIndex(45)));
        assert_eq!(None, space.split(GlobalIndex(256 * 50)));
    }
}
