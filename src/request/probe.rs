use crate::request::{expect_len, Request, UnexpectedResponse};

/// Marker struct for the address probe request (0xBA).
///
/// Puts `address` on the unit's I2C bus and reports whether anything acknowledged it.
/// Addresses with the low bit set are read addresses. With `stop` set the firmware ends the
/// transaction afterwards.
///
/// - **Length:** 1 byte
///
/// Used with [`ArrayReader::probe_address`](crate::ArrayReader::probe_address).
pub struct Probe {
    pub address: u8,
    pub stop: bool,
}

impl Request for Probe {
    const CODE: u8 = 0xBA;
    type Out = bool;

    fn value(&self) -> u16 {
        u16::from(self.stop)
    }

    fn index(&self) -> u16 {
        u16::from(self.address)
    }

    fn length(&self) -> usize {
        1
    }

    fn decode(&self, b: &[u8]) -> Result<Self::Out, UnexpectedResponse> {
        expect_len::<Self>(b, 1)?;

        Ok(b[0] == 1)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn probe_decode() {
        let p = Probe { address: 0x18, stop: true };

        assert_eq!((1, 0x18), (p.value(), p.index()));
        assert_eq!(Ok(true), p.decode(&[1]));
        assert_eq!(Ok(false), p.decode(&[0]));
    }
}
