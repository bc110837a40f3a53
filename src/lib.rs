//! Bit-banged driver for the MAX31855 thermocouple-to-digital converter.
//!
//! The chip shifts out a 32-bit frame containing the linearized thermocouple
//! temperature, the cold-junction (reference) temperature and fault flags.
//! This crate clocks that frame in over three `embedded-hal` digital pins
//! (serial-out, serial-clock, chip-select), keeps the most recent frame in the
//! device handle and decodes it on demand:
//!
//! * linear Celsius / Fahrenheit scaling of both junctions,
//! * thermocouple voltage in microvolts (type N sensitivity),
//! * cold-junction compensated temperature via the ITS-90 polynomial
//!   approximation (type N only, see [`its90`]).
//!
//! ```ignore
//! use max31855_bitbang::{CjUnit, Max31855, ThermocoupleType, Unit};
//!
//! let mut sensor = Max31855::new(so, sck, cs, delay, ThermocoupleType::N)?;
//! if sensor.capture()? {
//!     let hot = sensor.hot_junction(Unit::AdjustedCelsius)?;
//!     let cold = sensor.cold_junction(CjUnit::Celsius);
//! } else {
//!     // chip reported a fault, reading is not trustworthy
//!     let faults = sensor.fault_description();
//! }
//! ```

#![cfg_attr(not(test), no_std)]
#![deny(warnings)]
#![deny(unsafe_code)]

pub mod frame;
pub mod its90;
pub mod max31855;

pub use frame::Frame;
pub use max31855::{Max31855, Max31855Error};

/// Thermocouple wired to the chip, set once at construction.
///
/// Only type N currently has an ITS-90 correction table; requesting
/// [`Unit::AdjustedCelsius`] with any other type is reported as
/// [`Max31855Error::UnsupportedType`].
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub enum ThermocoupleType {
    K,
    J,
    N,
    T,
    E,
    S,
    R,
}

/// Unit for hot-junction (thermocouple) queries.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub enum Unit {
    Celsius,
    Fahrenheit,
    /// Thermocouple voltage in microvolts, type N sensitivity.
    Voltage,
    /// Cold-junction compensated Celsius, type N only.
    AdjustedCelsius,
}

/// Unit for cold-junction (reference) queries.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub enum CjUnit {
    Celsius,
    Fahrenheit,
}

/// Fault sub-conditions the chip can flag in bits 2..0 of the frame.
///
/// They are not mutually exclusive, and they are latched in the frame even
/// when the overall FAULT bit (16) is clear.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub enum Fault {
    OpenCircuit,
    ShortToGnd,
    ShortToVcc,
}

impl Fault {
    /// All sub-conditions, in frame bit order (bit 0 first).
    pub const ALL: [Fault; 3] = [Fault::OpenCircuit, Fault::ShortToGnd, Fault::ShortToVcc];

    pub const fn mask(self) -> u32 {
        match self {
            Fault::OpenCircuit => 1 << 0,
            Fault::ShortToGnd => 1 << 1,
            Fault::ShortToVcc => 1 << 2,
        }
    }

    /// Description as concatenated by [`Frame::fault_description`]; the
    /// trailing spaces are part of that output format.
    pub const fn description(self) -> &'static str {
        match self {
            Fault::OpenCircuit => "Open Circuit ",
            Fault::ShortToGnd => "Short to GND ",
            Fault::ShortToVcc => "Short to Vcc",
        }
    }
}
