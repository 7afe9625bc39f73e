use crate::frame::ROW_FRAME_LEN;
use crate::request::{expect_len, Request, UnexpectedResponse};

/// Marker struct for the row data request (0x7C).
///
/// Returns the latest conversion of the five cells of one row as a 20 byte block in the
/// layout handled by [`decode_frame`](crate::frame::decode_frame). The first request also
/// starts the firmware's conversion timer.
///
/// - **Length:** 20 bytes
pub struct RowData {
    pub row: u8,
}

impl Request for RowData {
    const CODE: u8 = 0x7C;
    type Out = [u8; ROW_FRAME_LEN];

    fn index(&self) -> u16 {
        u16::from(self.row)
    }

    fn length(&self) -> usize {
        ROW_FRAME_LEN
    }

    fn decode(&self, b: &[u8]) -> Result<Self::Out, UnexpectedResponse> {
        expect_len::<Self>(b, ROW_FRAME_LEN)?;

        let mut block = [0u8; ROW_FRAME_LEN];
        block.copy_from_slice(b);

        Ok(block)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn row_data_parameters() {
        let r = RowData { row: 3 };

        assert_eq!(0, r.value());
        assert_eq!(3, r.index());
        assert_eq!(20, r.length());
    }

    #[test]
    fn row_data_short_reply() {
        assert!(RowData { row: 0 }.decode(&[0u8; 16]).is_err());
    }
}
