use crate::request::{expect_len, Request, UnexpectedResponse};

/// Size of one EEPROM page as served by the firmware.
pub const EEPROM_PAGE_LEN: usize = 64;

/// Marker struct for the EEPROM read request (0xE0).
///
/// Reads one 64 byte page of the controller's EEPROM, starting at byte `page * 64`.
///
/// - **Length:** 64 bytes
///
/// Used with [`ArrayReader::read_eeprom`](crate::ArrayReader::read_eeprom).
pub struct EepromPage {
    pub page: u16,
}

impl Request for EepromPage {
    const CODE: u8 = 0xE0;
    type Out = [u8; EEPROM_PAGE_LEN];

    fn index(&self) -> u16 {
        self.page
    }

    fn length(&self) -> usize {
        EEPROM_PAGE_LEN
    }

    fn decode(&self, b: &[u8]) -> Result<Self::Out, UnexpectedResponse> {
        expect_len::<Self>(b, EEPROM_PAGE_LEN)?;

        let mut page = [0u8; EEPROM_PAGE_LEN];
        page.copy_from_slice(b);

        Ok(page)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn eeprom_parameters() {
        let r = EepromPage { page: 2 };

        assert_eq!((0, 2), (r.value(), r.index()));
        assert_eq!(64, r.length());
    }

    #[test]
    fn eeprom_decode() {
        let mut raw = [0xFFu8; EEPROM_PAGE_LEN];
        raw[0] = 0x42;

        let page = EepromPage { page: 0 }.decode(&raw).unwrap();
        assert_eq!(0x42, page[0]);
        assert_eq!(0xFF, page[63]);

        assert_eq!(
            Err(UnexpectedResponse { request: 0xE0, expected: 64, actual: 32 }),
            EepromPage { page: 0 }.decode(&raw[..32])
        );
    }
}
