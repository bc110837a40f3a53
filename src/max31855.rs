use embedded_hal as hal;
use hal::blocking::delay::DelayUs;
use hal::digital::v2::{InputPin, OutputPin};
use heapless::String;

use crate::frame::Frame;
use crate::{CjUnit, ThermocoupleType, Unit};

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub enum Max31855Error {
    /// A pin read or write failed.
    PinError,
    /// `Unit::AdjustedCelsius` requested for a type without a correction table.
    UnsupportedType(ThermocoupleType),
}

const FRAME_BITS: u32 = 32;
// chip-select setup time before the first clock edge
const CS_SETTLE_US: u16 = 1;

/// MAX31855 behind three bit-banged pins.
///
/// Owns the most recent [`Frame`]; [`capture`](Max31855::capture) overwrites
/// it, every decode query reads it. Not synchronized, share across threads
/// only with external locking.
pub struct Max31855<SO, SCK, CS, D> {
    so: SO,
    sck: SCK,
    cs: CS,
    delay: D,
    tc_type: ThermocoupleType,
    frame: Frame,
}

impl<SO, SCK, CS, D> Max31855<SO, SCK, CS, D>
    where SO: InputPin,
          SCK: OutputPin,
          CS: OutputPin,
          D: DelayUs<u16> {

    /// Takes ownership of the pins and drives them to their idle levels
    /// (clock low, chip-select high).
    pub fn new(
        so: SO,
        mut sck: SCK,
        mut cs: CS,
        delay: D,
        tc_type: ThermocoupleType,
    ) -> Result<Self, Max31855Error> {
        sck.set_low().map_err(|_| Max31855Error::PinError)?;
        cs.set_high().map_err(|_| Max31855Error::PinError)?;
        Ok(Self { so, sck, cs, delay, tc_type, frame: Frame::default() })
    }

    /// Clocks one 32-bit frame out of the chip and stores it.
    ///
    /// Returns `true` when the frame's FAULT bit is clear. A chip fault is a
    /// normal operating condition (disconnected probe), not an error; `Err`
    /// is reserved for pin failures.
    pub fn capture(&mut self) -> Result<bool, Max31855Error> {
        self.sck.set_low().map_err(|_| Max31855Error::PinError)?;
        self.cs.set_low().map_err(|_| Max31855Error::PinError)?;
        self.delay.delay_us(CS_SETTLE_US);

        let mut bits: u32 = 0;
        for position in (0..FRAME_BITS).rev() {
            self.sck.set_high().map_err(|_| Max31855Error::PinError)?;
            if self.so.is_high().map_err(|_| Max31855Error::PinError)? {
                bits |= 1 << position;
            }
            self.sck.set_low().map_err(|_| Max31855Error::PinError)?;
        }
        self.cs.set_high().map_err(|_| Max31855Error::PinError)?;

        self.frame = Frame::new(bits);
        Ok(!self.frame.fault())
    }

    /// The most recently captured frame.
    pub fn frame(&self) -> Frame {
        self.frame
    }

    /// The raw bits of the most recent frame, for diagnostics.
    pub fn raw_frame(&self) -> u32 {
        self.frame.bits()
    }

    pub fn thermocouple_type(&self) -> ThermocoupleType {
        self.tc_type
    }

    /// Hot-junction temperature of the most recent frame; see
    /// [`Frame::hot_junction`].
    pub fn hot_junction(&self, unit: Unit) -> Result<f32, Max31855Error> {
        self.frame.hot_junction(unit, self.tc_type)
    }

    /// Cold-junction temperature of the most recent frame.
    pub fn cold_junction(&self, unit: CjUnit) -> f32 {
        self.frame.cold_junction(unit)
    }

    /// Descriptions of the fault sub-bits of the most recent frame.
    pub fn fault_description(&self) -> String<64> {
        self.frame.fault_description()
    }

    /// Releases the pins and the delay provider.
    pub fn free(self) -> (SO, SCK, CS, D) {
        (self.so, self.sck, self.cs, self.delay)
    }
}
