use crate::bitfield::{extract_field, to_signed};
use crate::cell::{CellIndex, CELLS_PER_UNIT};

/// Length of a complete calibration blob.
pub const CALIBRATION_LEN: usize = 12;

/// Length of the blob returned by hardware that only stores `a0`, `b1`, `b2` and `c12`.
pub const SHORT_CALIBRATION_LEN: usize = 8;

/// Placement of one fixed-point coefficient inside the calibration blob.
struct Field {
    offset: usize,
    width: u32,
    fraction_bits: u32,
}

impl Field {
    fn decode(&self, blob: &[u8; CALIBRATION_LEN]) -> f64 {
        let raw = to_signed(extract_field(blob, self.offset, self.width), self.width);

        f64::from(raw) / f64::from(1u32 << self.fraction_bits)
    }
}

const A0: Field = Field { offset: 0, width: 16, fraction_bits: 3 };
const B1: Field = Field { offset: 16, width: 16, fraction_bits: 13 };
const B2: Field = Field { offset: 32, width: 16, fraction_bits: 14 };
const C12: Field = Field { offset: 48, width: 14, fraction_bits: 22 };
const C11: Field = Field { offset: 64, width: 11, fraction_bits: 21 };
const C22: Field = Field { offset: 80, width: 11, fraction_bits: 25 };

/// Compensation coefficients of one cell, see AN3785.
#[derive(Copy, Clone, Debug, Default, PartialEq)]
pub struct Coefficients {
    pub a0: f64,
    pub b1: f64,
    pub b2: f64,
    pub c12: f64,
    pub c11: f64,
    pub c22: f64,
}

/// Factory calibration of one cell.
#[derive(Copy, Clone, Debug, PartialEq)]
pub enum Calibration {
    Calibrated(Coefficients),

    /// The cell returned an all-zero blob. This is what an unpopulated or unprogrammed cell
    /// looks like, and is kept apart from a calibration whose coefficients happen to be zero.
    Uncalibrated,
}

impl Calibration {
    /// Decodes an 8 or 12 byte calibration blob.
    ///
    /// Shorter input is zero-padded to 12 bytes, so an 8-byte blob decodes with `c11` and
    /// `c22` set to zero. Bytes beyond the twelfth are ignored.
    pub fn decode(raw: &[u8]) -> Self {
        let mut blob = [0u8; CALIBRATION_LEN];
        let n = raw.len().min(CALIBRATION_LEN);
        blob[..n].copy_from_slice(&raw[..n]);

        if blob.iter().all(|&b| b == 0) {
            return Calibration::Uncalibrated;
        }

        Calibration::Calibrated(Coefficients {
            a0: A0.decode(&blob),
            b1: B1.decode(&blob),
            b2: B2.decode(&blob),
            c12: C12.decode(&blob),
            c11: C11.decode(&blob),
            c22: C22.decode(&blob),
        })
    }

    pub fn coefficients(&self) -> Option<&Coefficients> {
        match self {
            Calibration::Calibrated(c) => Some(c),
            Calibration::Uncalibrated => None,
        }
    }

    pub fn is_calibrated(&self) -> bool {
        matches!(self, Calibration::Calibrated(_))
    }
}

/// Per-cell calibration of one unit, indexed by [`CellIndex`].
///
/// Positions that were never filled in (cells that are not live) read as [`None`].
#[derive(Clone, Debug, PartialEq)]
pub struct CalibrationTable {
    entries: [Option<Calibration>; CELLS_PER_UNIT],
}

impl Default for CalibrationTable {
    fn default() -> Self {
        Self { entries: [None; CELLS_PER_UNIT] }
    }
}

impl CalibrationTable {
    pub fn get(&self, cell: CellIndex) -> Option<&Calibration> {
        self.entries[cell.get() as usize].as_ref()
    }

    pub(crate) fn insert(&mut self, cell: CellIndex, calibration: Calibration) {
        self.entries[cell.get() as usize] = Some(calibration);
    }

    /// Filled positions in index order.
    pub fn iter(&self) -> impl Iterator<Item = (CellIndex, &Calibration)> {
        CellIndex::all().zip(self.entries.iter()).filter_map(|(cell, entry)| Some((cell, entry.as_ref()?)))
    }
}
