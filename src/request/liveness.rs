use crate::liveness::{LivenessBitmap, BITMAP_LEN};
use crate::request::{expect_len, Request, UnexpectedResponse};

/// Marker struct for the liveness bitmap request (0x5C).
///
/// The firmware probes every cell once at power-up; this returns the result, one byte per
/// row with a bit per column.
///
/// - **Length:** 8 bytes
///
/// Issued by [`ArrayReader::initialize`](crate::ArrayReader::initialize).
pub struct Liveness;

impl Request for Liveness {
    const CODE: u8 = 0x5C;
    type Out = LivenessBitmap;

    fn length(&self) -> usize {
        BITMAP_LEN
    }

    fn decode(&self, b: &[u8]) -> Result<Self::Out, UnexpectedResponse> {
        expect_len::<Self>(b, BITMAP_LEN)?;

        let mut bitmap = [0u8; BITMAP_LEN];
        bitmap.copy_from_slice(b);

        Ok(LivenessBitmap(bitmap))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn liveness_decode() {
        let bitmap = Liveness.decode(&[0x1F, 0x01, 0, 0, 0, 0, 0, 0x10]).unwrap();

        assert_eq!(7, bitmap.live_cells().len());
    }

    #[test]
    fn liveness_short_reply() {
        assert_eq!(
            Err(UnexpectedResponse { request: 0x5C, expected: 8, actual: 4 }),
            Liveness.decode(&[0x1F; 4])
        );
    }
}
