use core::time::Duration;

use crate::cell::{IndexSpace, UnitId, ROWS};
use crate::request::calibration::{CalibrationAddressing, CalibrationLength};

/// Bulk IN endpoint the unit streams samples on.
pub const DEFAULT_BULK_ENDPOINT: u8 = 0x81;

pub const DEFAULT_READ_TIMEOUT: Duration = Duration::from_millis(5000);

/// Where [`ArrayReader::poll`](crate::ArrayReader::poll) gets its samples from.
#[derive(Copy, Clone, Debug, Default, PartialEq, Eq)]
pub enum SampleSource {
    /// One bulk read covering every live cell of the unit.
    #[default]
    Bulk,

    /// One row data request (0x7C) covering the live cells of a single row.
    Row(u8),
}

#[derive(Clone, Debug, PartialEq)]
pub struct Configuration {
    pub(crate) unit: UnitId,
    pub(crate) index_space: IndexSpace,
    pub(crate) calibration_length: CalibrationLength,
    pub(crate) calibration_addressing: CalibrationAddressing,
    pub(crate) sample_source: SampleSource,
    pub(crate) bulk_endpoint: u8,
    pub(crate) read_timeout: Duration,
    pub(crate) discard_sign: bool,
}

impl Default for Configuration {
    fn default() -> Self {
        Self {
            unit: UnitId(0),
            index_space: IndexSpace::default(),
            calibration_length: CalibrationLength::Short,
            calibration_addressing: CalibrationAddressing::RowColumn,
            sample_source: SampleSource::Bulk,
            bulk_endpoint: DEFAULT_BULK_ENDPOINT,
            read_timeout: DEFAULT_READ_TIMEOUT,
            discard_sign: true,
        }
    }
}

impl Configuration {
    /// Which unit this reader talks to. Its cells are reported under the global indices
    /// the [`IndexSpace`] assigns to that unit.
    pub fn unit(mut self, unit: UnitId) -> Self {
        self.unit = unit;

        self
    }

    pub fn index_space(mut self, index_space: IndexSpace) -> Self {
        self.index_space = index_space;

        self
    }

    pub fn calibration_length(mut self, length: CalibrationLength) -> Self {
        self.calibration_length = length;

        self
    }

    pub fn calibration_addressing(mut self, addressing: CalibrationAddressing) -> Self {
        self.calibration_addressing = addressing;

        self
    }

    /// Rows outside the unit are ignored and the current source is kept.
    pub fn sample_source(mut self, source: SampleSource) -> Self {
        match source {
            SampleSource::Row(row) if row >= ROWS => {
                log::warn!("row {} is outside the unit, keeping {:?}", row, self.sample_source);
            }
            _ => self.sample_source = source,
        }

        self
    }

    pub fn bulk_endpoint(mut self, endpoint: u8) -> Self {
        self.bulk_endpoint = endpoint;

        self
    }

    /// Deadline for each bulk read. A zero timeout means "wait forever" to most USB stacks,
    /// so it is refused and the current timeout is kept.
    pub fn read_timeout(mut self, timeout: Duration) -> Self {
        if timeout.is_zero() {
            log::warn!("refusing a zero read timeout, keeping {:?}", self.read_timeout);
        } else {
            self.read_timeout = timeout;
        }

        self
    }

    /// Report ADC counts as the magnitude of their ten bit two's complement value.
    ///
    /// This is what the reference host software does and is on by default. Whether
    /// negative counts can ever be physically meaningful has not been confirmed on hardware.
    pub fn discard_sign(mut self, discard: bool) -> Self {
        self.discard_sign = discard;

        self
    }

    pub fn from_preset(p: Preset) -> Self {
        match p {
            Preset::Bulk => Configuration::default(),
            Preset::RowPolling => Configuration::default()
                .calibration_length(CalibrationLength::Full)
                .sample_source(SampleSource::Row(0)),
        }
    }
}

/// Settings matching the known firmware generations.
#[derive(Copy, Clone, Debug, PartialEq, Eq)]
pub enum Preset {
    /// Streaming firmware: 8 calibration bytes per cell, samples on bulk endpoint 0x81.
    Bulk,

    /// Early single-row firmware: 12 calibration bytes per cell, samples polled from row 0
    /// with the row data request.
    RowPolling,
}
