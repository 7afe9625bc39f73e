use heapless::String;

use crate::request::{Request, UnexpectedResponse, MAX_CONTROL_LEN};

/// Version string as reported by the firmware.
pub type VersionString = String<MAX_CONTROL_LEN>;

/// Marker enum for the info request (0x00).
///
/// Returns the hardware or firmware version the unit was built with, as a NUL terminated
/// ASCII string.
///
/// - **Length:** up to 64 bytes
///
/// Used with [`ArrayReader::hardware_version`](crate::ArrayReader::hardware_version) and
/// [`ArrayReader::firmware_version`](crate::ArrayReader::firmware_version).
#[derive(Copy, Clone, Debug, PartialEq, Eq)]
pub enum Version {
    Hardware,
    Firmware,
}

impl Request for Version {
    const CODE: u8 = 0x00;
    type Out = VersionString;

    fn index(&self) -> u16 {
        match self {
            Version::Hardware => 0,
            Version::Firmware => 1,
        }
    }

    fn length(&self) -> usize {
        MAX_CONTROL_LEN
    }

    fn decode(&self, b: &[u8]) -> Result<Self::Out, UnexpectedResponse> {
        let text = b.split(|&c| c == 0).next().unwrap_or_default();

        let mut version = VersionString::new();
        for &c in text.iter().take(MAX_CONTROL_LEN) {
            let c = if c.is_ascii() { char::from(c) } else { char::REPLACEMENT_CHARACTER };
            if version.push(c).is_err() {
                break;
            }
        }

        Ok(version)
    }
}
