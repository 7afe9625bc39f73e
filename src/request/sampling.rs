use crate::request::{expect_len, Request, UnexpectedResponse};

const START_VALUE: u16 = 100;
const START_INDEX: u16 = 0xFF;

/// Marker enum for the sampling control request (0xC7).
///
/// Starts or stops the unit streaming samples to the bulk endpoint. The reply is a single
/// acknowledgement byte whose value carries no further meaning for the host.
///
/// - **Length:** 1 byte
///
/// Used by [`ArrayReader::start_sampling`](crate::ArrayReader::start_sampling) and
/// [`ArrayReader::stop_sampling`](crate::ArrayReader::stop_sampling).
#[derive(Copy, Clone, Debug, PartialEq, Eq)]
pub enum Sampling {
    Start,
    Stop,
}

impl Request for Sampling {
    const CODE: u8 = 0xC7;
    type Out = u8;

    fn value(&self) -> u16 {
        match self {
            Sampling::Start => START_VALUE,
            Sampling::Stop => 0,
        }
    }

    fn index(&self) -> u16 {
        match self {
            Sampling::Start => START_INDEX,
            Sampling::Stop => 0,
        }
    }

    fn length(&self) -> usize {
        1
    }

    fn decode(&self, b: &[u8]) -> Result<Self::Out, UnexpectedResponse> {
        expect_len::<Self>(b, 1)?;

        Ok(b[0])
    }
}
