//! Errors that can occur when reading an array unit.
//!
//! [`ArrayError`] is generic over the error type of the [`Transport`](crate::transport::Transport)
//! in use, so the original transport error is never lost.

use core::fmt::{Debug, Display, Formatter};

use crate::cell::CellIndex;
use crate::frame::FrameLengthMismatch;
use crate::reader::ReaderState;
use crate::request::UnexpectedResponse;
use crate::transport::{self, ErrorKind};

/// This represents all possible errors that can occur when using an [`ArrayReader`](crate::ArrayReader).
#[derive(Debug)]
pub enum ArrayError<E> {
    /// The transport reported that no device is attached.
    DeviceUnavailable,

    /// A transfer failed. Not retried internally.
    Transport(E),

    /// A transfer did not complete in time. The reader is left as it was, so the call may
    /// be retried.
    TransportTimeout(E),

    /// A sample block did not cover exactly the live cells. Nothing from the block is used.
    FrameLengthMismatch(FrameLengthMismatch),

    /// Fetching the calibration of a live cell failed during initialization.
    CalibrationRead { cell: CellIndex, error: CalibrationFault<E> },

    /// A control request was answered with a reply of the wrong size.
    UnexpectedResponse(UnexpectedResponse),

    /// The operation is not valid in the reader's current state.
    InvalidState { operation: &'static str, state: ReaderState },
}

/// Why the calibration of a cell could not be read.
#[derive(Debug, PartialEq)]
pub enum CalibrationFault<E> {
    /// The transfer failed or timed out.
    Transport(E),

    /// The reply had the wrong length.
    Response(UnexpectedResponse),
}

/// Type alias used to simplify return types throughout the crate
pub type ArrayResult<T, E> = Result<T, ArrayError<E>>;

impl<E: transport::Error> ArrayError<E> {
    /// Attaches `cell` to a failure of its calibration request. A missing device is still
    /// reported as [`ArrayError::DeviceUnavailable`].
    pub(crate) fn calibration_read(cell: CellIndex, error: Self) -> Self {
        match error {
            ArrayError::Transport(e) | ArrayError::TransportTimeout(e) => {
                ArrayError::CalibrationRead { cell, error: CalibrationFault::Transport(e) }
            }
            ArrayError::UnexpectedResponse(r) => {
                ArrayError::CalibrationRead { cell, error: CalibrationFault::Response(r) }
            }
            other => other,
        }
    }

    /// Sorts a transport error by its [`ErrorKind`].
    pub(crate) fn from_transport(error: E) -> Self {
        match error.kind() {
            ErrorKind::NoDevice => {
                log::error!("device unavailable: {:?}", error);
                ArrayError::DeviceUnavailable
            }
            ErrorKind::Timeout => ArrayError::TransportTimeout(error),
            ErrorKind::Other => ArrayError::Transport(error),
        }
    }
}

impl<E> ArrayError<E> {
    /// Returns true if repeating the failed call may succeed without other intervention.
    pub fn is_recoverable(&self) -> bool {
        matches!(self, ArrayError::TransportTimeout(_))
    }
}

impl<E> From<FrameLengthMismatch> for ArrayError<E> {
    fn from(value: FrameLengthMismatch) -> Self {
        ArrayError::FrameLengthMismatch(value)
    }
}

impl<E> From<UnexpectedResponse> for ArrayError<E> {
    fn from(value: UnexpectedResponse) -> Self {
        ArrayError::UnexpectedResponse(value)
    }
}

impl<E: Debug> Display for ArrayError<E> {
    fn fmt(&self, f: &mut Formatter<'_>) -> core::fmt::Result {
        match self {
            ArrayError::DeviceUnavailable => write!(f, "no array unit available"),
            ArrayError::Transport(e) => write!(f, "transport error: {e:?}"),
            ArrayError::TransportTimeout(e) => write!(f, "transport timed out: {e:?}"),
            ArrayError::FrameLengthMismatch(m) => write!(f, "frame length mismatch: {m}"),
            ArrayError::CalibrationRead { cell, error: CalibrationFault::Transport(e) } => {
                write!(f, "failed to read calibration of cell {cell}: {e:?}")
            }
            ArrayError::CalibrationRead { cell, error: CalibrationFault::Response(r) } => {
                write!(f, "failed to read calibration of cell {cell}: {r}")
            }
            ArrayError::UnexpectedResponse(r) => write!(f, "{r}"),
            ArrayError::InvalidState { operation, state } => {
                write!(f, "{operation} is not valid in state {state:?}")
            }
        }
    }
}
