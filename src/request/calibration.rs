use crate::calibration::{Calibration, CALIBRATION_LEN, SHORT_CALIBRATION_LEN};
use crate::cell::CellIndex;
use crate::request::{expect_len, Request, UnexpectedResponse};

/// How many calibration bytes a unit returns per cell.
#[derive(Copy, Clone, Debug, Default, PartialEq, Eq)]
pub enum CalibrationLength {
    /// `a0`, `b1`, `b2` and `c12` only. `c11` and `c22` decode as zero.
    #[default]
    Short,
    /// All six coefficients.
    Full,
}

impl CalibrationLength {
    pub fn len(&self) -> usize {
        match self {
            CalibrationLength::Short => SHORT_CALIBRATION_LEN,
            CalibrationLength::Full => CALIBRATION_LEN,
        }
    }
}

/// How a calibration request names its cell.
#[derive(Copy, Clone, Debug, Default, PartialEq, Eq)]
pub enum CalibrationAddressing {
    /// wValue = column, wIndex = row.
    #[default]
    RowColumn,
    /// wValue = ATtiny address byte of the cell, wIndex = 0.
    DeviceAddress,
}

/// Marker struct for the calibration request (0x6C).
///
/// Reads the coefficient block of one cell, starting at the sensor's coefficient register.
///
/// - **Length:** 8 or 12 bytes, see [`CalibrationLength`]
///
/// Issued once per live cell by [`ArrayReader::initialize`](crate::ArrayReader::initialize).
pub struct CalibrationQuery {
    pub cell: CellIndex,
    pub addressing: CalibrationAddressing,
    pub length: CalibrationLength,
}

impl Request for CalibrationQuery {
    const CODE: u8 = 0x6C;
    type Out = Calibration;

    fn value(&self) -> u16 {
        match self.addressing {
            CalibrationAddressing::RowColumn => u16::from(self.cell.column()),
            CalibrationAddressing::DeviceAddress => u16::from(self.cell.device_address()),
        }
    }

    fn index(&self) -> u16 {
        match self.addressing {
            CalibrationAddressing::RowColumn => u16::from(self.cell.row()),
            CalibrationAddressing::DeviceAddress => 0,
        }
    }

    fn length(&self) -> usize {
        self.length.len()
    }

    fn decode(&self, b: &[u8]) -> Result<Self::Out, UnexpectedResponse> {
        expect_len::<Self>(b, self.length.len())?;

        Ok(Calibration::decode(b))
    }
}
