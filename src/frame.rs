//! Decoding of the 32-bit frame shifted out by the chip.
//!
//! Bit layout (MSB = 31):
//!
//! | Bits  | Field                                              |
//! |-------|----------------------------------------------------|
//! | 31-18 | thermocouple temperature, 14-bit signed, 0.25 C/LSB |
//! | 17    | reserved                                           |
//! | 16    | FAULT                                              |
//! | 15-4  | cold-junction temperature, 12-bit signed, 0.0625 C/LSB |
//! | 3     | reserved                                           |
//! | 2     | short to Vcc                                       |
//! | 1     | short to GND                                       |
//! | 0     | open circuit                                       |

use heapless::String;

use crate::its90;
use crate::max31855::Max31855Error;
use crate::{CjUnit, Fault, ThermocoupleType, Unit};

/// Overall FAULT flag; when set the thermocouple reading is not trustworthy.
pub const FAULT_MASK: u32 = 1 << 16;

const TC_SHIFT: u32 = 18;
const CJ_SHIFT: u32 = 4;

const TC_CELSIUS_PER_LSB: f32 = 0.25;
// 0.45 is the chip-level Fahrenheit scaling, not 0.25 * 9/5; kept as-is so
// output stays compatible with the datasheet tables.
const TC_FAHRENHEIT_PER_LSB: f32 = 0.45;
const CJ_CELSIUS_PER_LSB: f32 = 0.0625;
const CJ_FAHRENHEIT_PER_LSB: f32 = 0.1125;

/// One 32-bit capture from the chip.
///
/// Only meaningful immediately after the capture that produced it; the fault
/// bits always refer to that same transaction.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub struct Frame(u32);

impl Frame {
    pub const fn new(bits: u32) -> Self {
        Frame(bits)
    }

    /// The raw frame verbatim, for diagnostics.
    pub const fn bits(self) -> u32 {
        self.0
    }

    /// Overall FAULT flag (bit 16).
    pub const fn fault(self) -> bool {
        self.0 & FAULT_MASK != 0
    }

    pub const fn has_fault(self, fault: Fault) -> bool {
        self.0 & fault.mask() != 0
    }

    /// Thermocouple field (bits 31-18) sign-extended to an `i16`.
    ///
    /// The field is left-aligned in the frame, so an arithmetic shift of the
    /// full 32 bits extends the sign of the 14-bit code.
    pub const fn thermocouple_code(self) -> i16 {
        ((self.0 as i32) >> TC_SHIFT) as i16
    }

    /// Cold-junction field (bits 15-4) sign-extended to an `i16`.
    ///
    /// Truncating to the low 16 bits first left-aligns the field, so the
    /// arithmetic shift both discards the fault/reserved bits and extends the
    /// sign of the 12-bit code.
    pub const fn cold_junction_code(self) -> i16 {
        (self.0 as i16) >> CJ_SHIFT
    }

    /// Hot-junction (thermocouple) temperature in the requested unit.
    ///
    /// `Unit::AdjustedCelsius` runs the ITS-90 cold-junction compensation and
    /// is only defined for type N; any other configured type yields
    /// [`Max31855Error::UnsupportedType`].
    pub fn hot_junction(self, unit: Unit, tc_type: ThermocoupleType) -> Result<f32, Max31855Error> {
        let code = self.thermocouple_code();
        match unit {
            Unit::Celsius => Ok(code as f32 * TC_CELSIUS_PER_LSB),
            Unit::Fahrenheit => Ok(code as f32 * TC_FAHRENHEIT_PER_LSB + 32.0),
            Unit::Voltage => Ok(code as f32 * its90::N_TYPE_UV_PER_LSB as f32),
            Unit::AdjustedCelsius => match tc_type {
                ThermocoupleType::N => {
                    Ok(its90::adjust_n_type(code, self.cold_junction(CjUnit::Celsius)))
                }
                other => Err(Max31855Error::UnsupportedType(other)),
            },
        }
    }

    /// Cold-junction (reference) temperature in the requested unit.
    pub fn cold_junction(self, unit: CjUnit) -> f32 {
        let code = self.cold_junction_code();
        match unit {
            CjUnit::Celsius => code as f32 * CJ_CELSIUS_PER_LSB,
            CjUnit::Fahrenheit => code as f32 * CJ_FAHRENHEIT_PER_LSB + 32.0,
        }
    }

    /// Concatenated descriptions of the set fault sub-bits (bits 2..0),
    /// empty when none is set. Decoded independently of bit 16.
    pub fn fault_description(self) -> String<64> {
        let mut desc = String::new();
        for fault in Fault::ALL {
            if self.has_fault(fault) {
                // all three descriptions together are 38 bytes, always fits
                let _ = desc.push_str(fault.description());
            }
        }
        desc
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    // i16 -> u32 casts sign-extend, masking keeps the field's two's
    // complement bits
    fn build(tc_code: i16, cj_code: i16, flags: u32) -> Frame {
        Frame::new(((tc_code as u32 & 0x3FFF) << 18) | ((cj_code as u32 & 0x0FFF) << 4) | flags)
    }

    #[test]
    fn fault_flag_tracks_bit_16_only() {
        assert!(!Frame::new(0).fault());
        assert!(Frame::new(FAULT_MASK).fault());
        assert!(Frame::new(u32::MAX).fault());
        // every other bit set, bit 16 clear
        assert!(!Frame::new(!FAULT_MASK).fault());
    }

    #[test]
    fn fault_description_covers_all_bit_combinations() {
        let cases = [
            (0b000, ""),
            (0b001, "Open Circuit "),
            (0b010, "Short to GND "),
            (0b011, "Open Circuit Short to GND "),
            (0b100, "Short to Vcc"),
            (0b101, "Open Circuit Short to Vcc"),
            (0b110, "Short to GND Short to Vcc"),
            (0b111, "Open Circuit Short to GND Short to Vcc"),
        ];
        for (bits, expected) in cases {
            assert_eq!(Frame::new(bits).fault_description().as_str(), expected, "bits {:#05b}", bits);
        }
    }

    #[test]
    fn fault_description_ignores_overall_fault_bit() {
        assert_eq!(Frame::new(FAULT_MASK).fault_description().as_str(), "");
        assert_eq!(Frame::new(FAULT_MASK | 0b001).fault_description().as_str(), "Open Circuit ");
    }

    #[test]
    fn hot_junction_celsius_scaling_is_exact() {
        let n = ThermocoupleType::N;
        assert_eq!(build(4, 0, 0).hot_junction(Unit::Celsius, n).unwrap(), 1.0);
        assert_eq!(build(-4, 0, 0).hot_junction(Unit::Celsius, n).unwrap(), -1.0);
        assert_eq!(build(400, 0, 0).hot_junction(Unit::Celsius, n).unwrap(), 100.0);
    }

    #[test]
    fn hot_junction_fahrenheit_uses_chip_scaling() {
        let n = ThermocoupleType::N;
        // 400 * 0.45 + 32, not 100 C converted exactly
        assert_eq!(build(400, 0, 0).hot_junction(Unit::Fahrenheit, n).unwrap(), 212.0);
        assert_eq!(build(0, 0, 0).hot_junction(Unit::Fahrenheit, n).unwrap(), 32.0);
    }

    #[test]
    fn hot_junction_voltage_scaling() {
        let uv = build(400, 0, 0).hot_junction(Unit::Voltage, ThermocoupleType::N).unwrap();
        assert!((uv - 3625.6).abs() < 1e-3);
    }

    #[test]
    fn thermocouple_code_sign_extends() {
        // 0x2000 is the most negative 14-bit code
        let frame = Frame::new(0x2000 << 18);
        assert_eq!(frame.thermocouple_code(), -8192);
        assert_eq!(frame.hot_junction(Unit::Celsius, ThermocoupleType::N).unwrap(), -2048.0);
    }

    #[test]
    fn thermocouple_code_round_trips_across_range() {
        for code in [-8192i16, -8191, -400, -4, -1, 0, 1, 4, 400, 8191] {
            assert_eq!(build(code, 0, 0).thermocouple_code(), code, "code {}", code);
        }
    }

    #[test]
    fn cold_junction_celsius_scaling_is_exact() {
        assert_eq!(build(0, 16, 0).cold_junction(CjUnit::Celsius), 1.0);
        assert_eq!(build(0, 400, 0).cold_junction(CjUnit::Celsius), 25.0);
        assert_eq!(build(0, -16, 0).cold_junction(CjUnit::Celsius), -1.0);
    }

    #[test]
    fn cold_junction_fahrenheit_uses_chip_scaling() {
        assert_eq!(build(0, 400, 0).cold_junction(CjUnit::Fahrenheit), 77.0);
    }

    #[test]
    fn cold_junction_code_sign_extends() {
        // 0x800 is the most negative 12-bit code
        let frame = build(0, -2048, 0);
        assert_eq!(frame.cold_junction_code(), -2048);
        assert!(frame.cold_junction(CjUnit::Celsius) < 0.0);
        for code in [-2048i16, -16, -1, 0, 1, 16, 2047] {
            assert_eq!(build(0, code, 0).cold_junction_code(), code, "code {}", code);
        }
    }

    #[test]
    fn cold_junction_ignores_thermocouple_and_fault_bits() {
        // same cold-junction field, different surroundings
        let a = build(0, 400, 0);
        let b = build(8191, 400, FAULT_MASK | 0b111);
        assert_eq!(a.cold_junction_code(), b.cold_junction_code());
    }

    #[test]
    fn adjusted_celsius_matches_reference_value() {
        // hot code 400 (100.0 C linear), cold code 400 (25.0 C)
        let frame = build(400, 400, 0);
        let adjusted = frame.hot_junction(Unit::AdjustedCelsius, ThermocoupleType::N).unwrap();
        assert!(adjusted.is_finite());
        assert!((adjusted - 131.448).abs() < 1e-2);
    }

    #[test]
    fn adjusted_celsius_is_deterministic() {
        let frame = build(400, 400, 0);
        let first = frame.hot_junction(Unit::AdjustedCelsius, ThermocoupleType::N).unwrap();
        for _ in 0..10 {
            let again = frame.hot_junction(Unit::AdjustedCelsius, ThermocoupleType::N).unwrap();
            assert!((again - first).abs() < 1e-6);
        }
    }

    #[test]
    fn adjusted_celsius_rejects_unsupported_types() {
        use ThermocoupleType::*;
        let frame = build(400, 400, 0);
        for tc_type in [K, J, T, E, S, R] {
            assert_eq!(
                frame.hot_junction(Unit::AdjustedCelsius, tc_type),
                Err(Max31855Error::UnsupportedType(tc_type)),
            );
        }
    }
}
