#![no_std]
#[cfg(test)]
extern crate std;

pub mod bitfield;
pub mod calibration;
pub mod cell;
pub mod compensation;
pub mod config;
pub mod error;
pub mod frame;
pub mod liveness;
mod reader;
pub mod request;
pub mod transport;

#[cfg(test)]
mod testing;

pub use calibration::{Calibration, CalibrationTable, Coefficients};
pub use cell::{CellIndex, GlobalIndex, IndexSpace, UnitId};
pub use error::{ArrayError, ArrayResult, CalibrationFault};
pub use frame::RawSample;
pub use reader::{ArrayReader, RawReadings, ReaderState, Readings};
