//! The USB link to an array unit.
//!
//! This crate never opens devices itself. Callers wrap whatever USB stack they use in a
//! [`Transport`] and hand it to [`ArrayReader`](crate::ArrayReader), which then owns it for
//! the rest of the session.

use core::fmt::Debug;
use core::time::Duration;

/// Broad classification of a transport failure.
#[derive(Copy, Clone, Debug, PartialEq, Eq)]
pub enum ErrorKind {
    /// No matching device is attached, or it went away.
    NoDevice,

    /// The transfer did not complete before its deadline. Retrying may succeed.
    Timeout,

    /// Any other failure.
    Other,
}

/// Transport error type trait.
pub trait Error: Debug {
    fn kind(&self) -> ErrorKind;
}

impl Error for ErrorKind {
    fn kind(&self) -> ErrorKind {
        *self
    }
}

/// Vendor control and bulk IN transfers against one unit.
///
/// Control and bulk transfers on the same device are not tagged, so a transport must not
/// be driven from two places at once. [`ArrayReader`](crate::ArrayReader) takes it by value
/// (or by `&mut`) to make that hold.
pub trait Transport {
    type Error: Error;

    /// Issues vendor IN request `request` with `value`/`index` as wValue/wIndex, reading at
    /// most `data.len()` bytes. Returns the number of bytes received.
    fn control_in(&mut self, request: u8, value: u16, index: u16, data: &mut [u8]) -> Result<usize, Self::Error>;

    /// Reads at most `data.len()` bytes from bulk IN `endpoint`. Returns the number of bytes
    /// received. Must fail with an error of kind [`ErrorKind::Timeout`] once `timeout`
    /// expires.
    fn bulk_in(&mut self, endpoint: u8, data: &mut [u8], timeout: Duration) -> Result<usize, Self::Error>;
}

impl<T: Transport + ?Sized> Transport for &mut T {
    type Error = T::Error;

    fn control_in(&mut self, request: u8, value: u16, index: u16, data: &mut [u8]) -> Result<usize, Self::Error> {
        T::control_in(self, request, value, index, data)
    }

    fn bulk_in(&mut self, endpoint: u8, data: &mut [u8], timeout: Duration) -> Result<usize, Self::Error> {
        T::bulk_in(self, endpoint, data, timeout)
    }
}
