//! Catalog of the vendor control requests understood by the array firmware.
//!
//! Every request is a type implementing [`Request`], which carries the request code, the
//! wValue/wIndex parameters, the reply length and a decoder for the reply. Use them with
//! [`ArrayReader::request`](crate::ArrayReader::request) or let the reader issue them.

pub mod calibration;
pub mod eeprom;
pub mod liveness;
pub mod probe;
pub mod row_data;
pub mod sampling;
pub mod version;

use core::fmt::{Display, Formatter};

/// Size of the firmware's control endpoint buffer. No reply is longer.
pub const MAX_CONTROL_LEN: usize = 64;

/// A reply did not have the length its request implies.
#[derive(Copy, Clone, Debug, PartialEq, Eq)]
pub struct UnexpectedResponse {
    pub request: u8,
    pub expected: usize,
    pub actual: usize,
}

impl Display for UnexpectedResponse {
    fn fmt(&self, f: &mut Formatter<'_>) -> core::fmt::Result {
        write!(
            f,
            "request {:#04x} answered with {} bytes, expected {}",
            self.request, self.actual, self.expected
        )
    }
}

pub trait Request {
    /// bRequest code
    const CODE: u8;

    type Out;

    /// wValue
    fn value(&self) -> u16 {
        0
    }

    /// wIndex
    fn index(&self) -> u16 {
        0
    }

    /// Number of bytes to request. Never more than [`MAX_CONTROL_LEN`].
    fn length(&self) -> usize;

    /// Decodes the bytes actually received.
    fn decode(&self, b: &[u8]) -> Result<Self::Out, UnexpectedResponse>;
}

/// Fails unless `b` holds exactly `expected` bytes.
pub(crate) fn expect_len<R: Request>(b: &[u8], expected: usize) -> Result<(), UnexpectedResponse> {
    if b.len() == expected {
        Ok(())
    } else {
        Err(UnexpectedResponse { request: R::CODE, expected, actual: b.len() })
    }
}
