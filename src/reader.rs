use heapless::{LinearMap, Vec};
use log::{debug, info, trace, warn};

use crate::calibration::{Calibration, CalibrationTable};
use crate::cell::{CellIndex, GlobalIndex, CELLS_PER_UNIT, COLUMNS_PER_ROW};
use crate::compensation::compensate;
use crate::config::{Configuration, SampleSource};
use crate::error::{ArrayError, ArrayResult};
use crate::frame::{decode_frame, FrameLengthMismatch, RawSample, MAX_FRAME_LEN};
use crate::liveness::LiveSet;
use crate::request::calibration::CalibrationQuery;
use crate::request::eeprom::{EepromPage, EEPROM_PAGE_LEN};
use crate::request::liveness::Liveness;
use crate::request::probe::Probe;
use crate::request::row_data::RowData;
use crate::request::sampling::Sampling;
use crate::request::version::{Version, VersionString};
use crate::request::{Request, MAX_CONTROL_LEN};
use crate::transport::Transport;

/// Lifecycle of an [`ArrayReader`].
#[derive(Copy, Clone, Debug, PartialEq, Eq)]
pub enum ReaderState {
    /// Created, liveness and calibration not read yet.
    Uninitialized,
    /// Initialized, sampling not started.
    Ready,
    Sampling,
    Stopped,
}

/// Compensated pressure in kPa per global cell index.
pub type Readings = LinearMap<GlobalIndex, f64, CELLS_PER_UNIT>;

/// Raw ADC counts per global cell index.
pub type RawReadings = LinearMap<GlobalIndex, RawSample, CELLS_PER_UNIT>;

type CellSamples = Vec<(CellIndex, RawSample), CELLS_PER_UNIT>;

/// Main driver struct for one array unit.
///
/// Owns the transport for the whole session. The live cells and their calibration are read
/// once by [`initialize`](ArrayReader::initialize) and never change afterwards.
pub struct ArrayReader<T> {
    transport: T,
    config: Configuration,
    state: ReaderState,
    live: LiveSet,
    calibration: CalibrationTable,
}

impl<T> ArrayReader<T>
where
    T: Transport,
{
    /// Creates a reader in [`ReaderState::Uninitialized`]. Nothing is sent to the device
    /// until [`initialize`](ArrayReader::initialize) is called.
    ///
    /// # Examples
    ///
    /// ```rust
    /// # use takktile_rs::transport::Transport;
    /// # use takktile_rs::ArrayResult;
    ///  use takktile_rs::ArrayReader;
    ///  use takktile_rs::config::{Configuration, Preset};
    /// # fn demo<T: Transport>(transport: T) -> ArrayResult<(), T::Error> {
    ///
    ///  let mut reader = ArrayReader::new(transport, Configuration::from_preset(Preset::Bulk));
    ///  reader.initialize()?;
    ///  reader.start_sampling()?;
    ///
    ///  for (index, kpa) in reader.poll()?.iter() {
    ///     log::info!("cell {}: {} kPa", index, kpa);
    ///  }
    /// # Ok(())
    /// # }
    /// ```
    pub fn new(transport: T, config: Configuration) -> Self {
        Self {
            transport,
            config,
            state: ReaderState::Uninitialized,
            live: LiveSet::new(),
            calibration: CalibrationTable::default(),
        }
    }

    /// Reads the liveness bitmap and the calibration of every live cell.
    ///
    /// Only valid once. If any request fails the reader stays uninitialized and the call
    /// can be repeated.
    pub fn initialize(&mut self) -> ArrayResult<(), T::Error> {
        self.expect_state("initialize", ReaderState::Uninitialized)?;

        let bitmap = self.request(&Liveness)?;
        let stray = bitmap.stray_bits();
        if stray != 0 {
            warn!("liveness bitmap has bits set outside the column mask: {:#04x}", stray);
        }

        let live = bitmap.live_cells();
        if live.is_empty() {
            warn!("unit {} reports no live cells", self.config.unit.0);
        }

        let mut calibration = CalibrationTable::default();
        for &cell in live.iter() {
            let query = CalibrationQuery {
                cell,
                addressing: self.config.calibration_addressing,
                length: self.config.calibration_length,
            };

            let cell_calibration = self.request(&query).map_err(|e| ArrayError::calibration_read(cell, e))?;

            match &cell_calibration {
                Calibration::Calibrated(c) => debug!("cell {}: {:?}", cell, c),
                Calibration::Uncalibrated => {
                    warn!("cell {} is live but has no calibration, it is left out of readings", cell)
                }
            }

            calibration.insert(cell, cell_calibration);
        }

        info!(
            "unit {}: {} live cells, {} calibrated",
            self.config.unit.0,
            live.len(),
            calibration.iter().filter(|(_, c)| c.is_calibrated()).count()
        );

        self.live = live;
        self.calibration = calibration;
        self.transition(ReaderState::Ready);

        Ok(())
    }

    /// Tells the unit to start converting. Does nothing if sampling already runs.
    pub fn start_sampling(&mut self) -> ArrayResult<(), T::Error> {
        match self.state {
            ReaderState::Sampling => return Ok(()),
            ReaderState::Ready | ReaderState::Stopped => {}
            state => return Err(ArrayError::InvalidState { operation: "start_sampling", state }),
        }

        let ack = self.request(&Sampling::Start)?;
        trace!("start acknowledged with {:#04x}", ack);
        self.transition(ReaderState::Sampling);

        Ok(())
    }

    /// Tells the unit to stop converting. Does nothing unless sampling runs.
    pub fn stop_sampling(&mut self) -> ArrayResult<(), T::Error> {
        match self.state {
            ReaderState::Ready | ReaderState::Stopped => return Ok(()),
            ReaderState::Sampling => {}
            state => return Err(ArrayError::InvalidState { operation: "stop_sampling", state }),
        }

        let ack = self.request(&Sampling::Stop)?;
        trace!("stop acknowledged with {:#04x}", ack);
        self.transition(ReaderState::Stopped);

        Ok(())
    }

    /// Reads one sample block and compensates it.
    ///
    /// Live cells without calibration are left out of the result.
    pub fn poll(&mut self) -> ArrayResult<Readings, T::Error> {
        self.expect_state("poll", ReaderState::Sampling)?;

        let mut readings = Readings::new();
        for (cell, sample) in self.read_samples()? {
            match self.calibration.get(cell).and_then(Calibration::coefficients) {
                Some(c) => {
                    let kpa = compensate(sample.pressure(), sample.temperature(), c);
                    let inserted = readings.insert(self.global_index(cell), kpa);
                    debug_assert!(inserted.is_ok(), "more samples than cells in a unit");
                }
                None => trace!("cell {} skipped, no calibration", cell),
            }
        }

        Ok(readings)
    }

    /// Reads one sample block without compensating it. Every live cell is reported.
    pub fn poll_raw(&mut self) -> ArrayResult<RawReadings, T::Error> {
        self.expect_state("poll_raw", ReaderState::Sampling)?;

        let mut readings = RawReadings::new();
        for (cell, sample) in self.read_samples()? {
            let inserted = readings.insert(self.global_index(cell), sample);
            debug_assert!(inserted.is_ok(), "more samples than cells in a unit");
        }

        Ok(readings)
    }

    pub fn hardware_version(&mut self) -> ArrayResult<VersionString, T::Error> {
        self.request(&Version::Hardware)
    }

    pub fn firmware_version(&mut self) -> ArrayResult<VersionString, T::Error> {
        self.request(&Version::Firmware)
    }

    /// Asks the firmware to address `address` on the I2C bus. Returns true if it was acknowledged.
    pub fn probe_address(&mut self, address: u8, stop: bool) -> ArrayResult<bool, T::Error> {
        self.request(&Probe { address, stop })
    }

    /// Reads one 64 byte page of the controller's EEPROM.
    pub fn read_eeprom(&mut self, page: u16) -> ArrayResult<[u8; EEPROM_PAGE_LEN], T::Error> {
        self.request(&EepromPage { page })
    }

    /// Issues a single vendor control request. Valid in any state.
    pub fn request<R: Request>(&mut self, request: &R) -> ArrayResult<R::Out, T::Error> {
        let mut buffer = [0u8; MAX_CONTROL_LEN];
        let len = request.length().min(MAX_CONTROL_LEN);

        let n = self
            .transport
            .control_in(R::CODE, request.value(), request.index(), &mut buffer[..len])
            .map_err(ArrayError::from_transport)?;
        trace!("request {:#04x} ({}, {}) returned {} bytes", R::CODE, request.value(), request.index(), n);

        Ok(request.decode(&buffer[..n.min(len)])?)
    }

    pub fn state(&self) -> ReaderState {
        self.state
    }

    pub fn config(&self) -> &Configuration {
        &self.config
    }

    /// Live cells in ascending order. Empty before initialization.
    pub fn live_cells(&self) -> &[CellIndex] {
        &self.live
    }

    pub fn calibration(&self) -> &CalibrationTable {
        &self.calibration
    }

    /// Index under which `cell` of this reader's unit is reported.
    pub fn global_index(&self, cell: CellIndex) -> GlobalIndex {
        self.config.index_space.global(self.config.unit, cell)
    }

    /// Gives the transport back, ending the session.
    pub fn into_transport(self) -> T {
        self.transport
    }

    fn read_samples(&mut self) -> ArrayResult<CellSamples, T::Error> {
        match self.config.sample_source {
            SampleSource::Bulk => {
                let mut buffer = [0u8; MAX_FRAME_LEN];
                let n = self
                    .transport
                    .bulk_in(self.config.bulk_endpoint, &mut buffer, self.config.read_timeout)
                    .map_err(ArrayError::from_transport)?;
                trace!("bulk read of {} bytes from {:#04x}", n, self.config.bulk_endpoint);

                align(&self.live, &buffer[..n.min(MAX_FRAME_LEN)], self.live.len(), self.config.discard_sign)
            }
            SampleSource::Row(row) => {
                let block = self.request(&RowData { row })?;
                let cells: LiveSet = self.live.iter().copied().filter(|cell| cell.row() == row).collect();

                align(&cells, &block, usize::from(COLUMNS_PER_ROW), self.config.discard_sign)
            }
        }
    }

    fn expect_state(&self, operation: &'static str, expected: ReaderState) -> ArrayResult<(), T::Error> {
        if self.state == expected {
            Ok(())
        } else {
            Err(ArrayError::InvalidState { operation, state: self.state })
        }
    }

    fn transition(&mut self, state: ReaderState) {
        debug!("{:?} -> {:?}", self.state, state);
        self.state = state;
    }
}

/// Decodes `block` and pairs its samples with `cells`, which must match one to one.
fn align<E>(cells: &[CellIndex], block: &[u8], chunk_count: usize, discard_sign: bool) -> ArrayResult<CellSamples, E> {
    let samples = decode_frame(block, chunk_count, discard_sign)?;

    if samples.len() != cells.len() {
        return Err(FrameLengthMismatch::Cells { expected: cells.len(), actual: samples.len() }.into());
    }

    Ok(cells.iter().copied().zip(samples).collect())
}
