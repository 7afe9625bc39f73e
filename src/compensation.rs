//! Temperature compensation of raw ADC counts, following AN3785:
//!
//! ```text
//! Pcomp = a0 + (b1 + c11 * Padc + c12 * Tadc) * Padc + (b2 + c22 * Tadc) * Tadc
//! kPa   = Pcomp * 65 / 1023 + 50
//! ```

use crate::calibration::Coefficients;

/// kPa per compensated count over the 50 kPa - 115 kPa range.
const KPA_PER_COUNT: f64 = 65.0 / 1023.0;

const KPA_OFFSET: f64 = 50.0;

/// Readings are reported with four decimal places.
const ROUNDING_SCALE: f64 = 10_000.0;

/// Converts a raw pressure/temperature pair into compensated pressure in kPa, rounded to
/// four decimals.
pub fn compensate(padc: i16, tadc: i16, c: &Coefficients) -> f64 {
    let padc = f64::from(padc);
    let tadc = f64::from(tadc);

    let pcomp = c.a0 + (c.b1 + c.c11 * padc + c.c12 * tadc) * padc + (c.b2 + c.c22 * tadc) * tadc;

    round_kpa(KPA_PER_COUNT * pcomp + KPA_OFFSET)
}

/// Rounds to four decimals, halfway cases away from zero.
pub fn round_kpa(kpa: f64) -> f64 {
    libm::round(kpa * ROUNDING_SCALE) / ROUNDING_SCALE
}

#[cfg(feature = "uom")]
pub fn pressure_uom(kpa: f64) -> uom::si::f64::Pressure {
    uom::si::f64::Pressure::new::<uom::si::pressure::kilopascal>(kpa)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::calibration::Calibration;

    fn an3785() -> Coefficients {
        *Calibration::decode(&[0x3E, 0xCE, 0xB3, 0xF9, 0xC5, 0x17, 0x33, 0xC8])
            .coefficients()
            .unwrap()
    }

    #[test]
    fn an3785_worked_example() {
        // Padc = 0x6680 >> 6, Tadc = 0x7EC0 >> 6; the note quotes 96.59 kPa
        assert_eq!(96.5873, compensate(410, 507, &an3785()));
    }

    #[test]
    fn zero_input_is_offset_a0() {
        let c = an3785();

        assert_eq!(round_kpa(65.0 / 1023.0 * c.a0 + 50.0), compensate(0, 0, &c));
        assert_eq!(177.6967, compensate(0, 0, &c));
    }

    #[test]
    fn second_order_terms() {
        let c = *Calibration::decode(&[
            0x41, 0xDF, 0xB0, 0x28, 0xBE, 0xAD, 0x38, 0xCC, 0xFF, 0xE0, 0x01, 0x20,
        ])
        .coefficients()
        .unwrap();

        assert_eq!(183.9315, compensate(0, 0, &c));
        assert_eq!(97.4968, compensate(410, 507, &c));
        assert_eq!(112.2053, compensate(300, 500, &c));
    }

    #[test]
    fn zero_coefficients_read_the_offset() {
        assert_eq!(50.0, compensate(512, 512, &Coefficients::default()));
    }

    #[test]
    fn rounding() {
        assert_eq!(96.5873, round_kpa(96.58732586242587));
        assert_eq!(1.2346, round_kpa(1.23456));
        assert_eq!(-1.2346, round_kpa(-1.23456));
        assert_eq!(100.0, round_kpa(99.99999));
    }

    #[cfg(feature = "uom")]
    #[test]
    fn uom_pressure() {
        use uom::si::pressure::pascal;

        assert_eq!(96_587.3, libm::round(pressure_uom(96.5873).get::<pascal>() * 10.0) / 10.0);
    }
}
