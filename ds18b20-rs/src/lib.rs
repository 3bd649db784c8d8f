#![cfg_attr(not(test), no_std)]
#![deny(missing_docs)]
//! # ds18b20
//!
//! Function command sequences and scratchpad decoding for the DS18B20
//! family of 1-Wire temperature sensors, written against any
//! [`OneWire`] bus master.
//!
//! Only the single-drop case is covered: every sequence addresses the bus
//! with Skip ROM, so exactly one sensor is expected per bus segment.
//! The sequences never wait for a conversion to finish. Triggering and
//! reading are separate calls so the caller decides how to spend the
//! conversion time.
use fixed::types::I12F4;
use onewire_core::{OneWire, OneWireCrc, OneWireResult};

/// Family code in the first byte of a DS18B20 ROM.
pub const FAMILY_CODE: u8 = 0x28;

/// Worst case conversion time in milliseconds, at 12-bit resolution.
pub const CONVERSION_TIME_MS: u32 = ReadoutResolution::Resolution12bit.conversion_time_ms();

const DS18B20_START_CONV: u8 = 0x44;
const DS18B20_READ_SCRATCH: u8 = 0xbe;

/// Temperature in degrees Celsius with 1/16 °C steps.
pub type Temperature = I12F4;

/// Resets the bus, addresses all sensors and starts a temperature conversion.
///
/// The result is available in the scratchpad after the
/// [conversion time](ReadoutResolution::conversion_time_ms) of the configured resolution.
pub fn trigger_temperature_conversion<O: OneWire>(bus: &mut O) -> OneWireResult<(), O::BusError> {
    bus.skip_rom()?;
    bus.write_byte(DS18B20_START_CONV)
}

/// Resets the bus, addresses all sensors and reads the 9 byte scratchpad.
///
/// The CRC is not checked, see [`Scratchpad::crc_valid`].
pub fn read_scratchpad<O: OneWire>(bus: &mut O) -> OneWireResult<Scratchpad, O::BusError> {
    bus.skip_rom()?;
    bus.write_byte(DS18B20_READ_SCRATCH)?;
    let mut buf = [0; Scratchpad::LEN];
    bus.read_bytes(&mut buf)?;
    Ok(Scratchpad(buf))
}

/// Raw content of the DS18B20 scratchpad.
///
/// | Byte | Content |
/// |------|---------|
/// | 0 | Temperature LSB |
/// | 1 | Temperature MSB |
/// | 2 | T<sub>H</sub> alarm register |
/// | 3 | T<sub>L</sub> alarm register |
/// | 4 | Configuration register |
/// | 5-7 | Reserved |
/// | 8 | CRC |
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Scratchpad([u8; Scratchpad::LEN]);

impl Scratchpad {
    /// Length of the scratchpad in bytes.
    pub const LEN: usize = 9;

    /// Wraps bytes read from a sensor.
    pub const fn new(bytes: [u8; Self::LEN]) -> Self {
        Self(bytes)
    }

    /// The raw bytes.
    pub fn as_bytes(&self) -> &[u8; Self::LEN] {
        &self.0
    }

    /// Last converted temperature, bytes 0 and 1 as a little-endian signed value in 1/16 °C.
    pub fn temperature(&self) -> Temperature {
        Temperature::from_le_bytes([self.0[0], self.0[1]])
    }

    /// Upper alarm threshold in °C.
    pub fn alarm_high(&self) -> i8 {
        self.0[2] as i8
    }

    /// Lower alarm threshold in °C.
    pub fn alarm_low(&self) -> i8 {
        self.0[3] as i8
    }

    /// Resolution selected by the configuration register, if it holds a valid value.
    pub fn resolution(&self) -> Option<ReadoutResolution> {
        ReadoutResolution::try_from(self.0[4]).ok()
    }

    /// CRC byte sent by the sensor.
    pub fn crc(&self) -> u8 {
        self.0[8]
    }

    /// Checks the CRC byte against the first eight bytes.
    pub fn crc_valid(&self) -> bool {
        OneWireCrc::validate(&self.0)
    }
}

/// Conversion resolution, as stored in the configuration register.
#[repr(u8)]
#[derive(Debug, Copy, Clone, Default, PartialEq, Eq)]
pub enum ReadoutResolution {
    /// 0.5 °C steps.
    Resolution9bit = 0x1f,
    /// 0.25 °C steps.
    Resolution10bit = 0x3f,
    /// 0.125 °C steps.
    Resolution11bit = 0x5f,
    /// 0.0625 °C steps, the power-on default.
    #[default]
    Resolution12bit = 0x7f,
}

impl ReadoutResolution {
    /// Maximum conversion time in milliseconds.
    pub const fn conversion_time_ms(&self) -> u32 {
        use ReadoutResolution::*;
        match self {
            Resolution9bit => 94,
            Resolution10bit => 188,
            Resolution11bit => 375,
            Resolution12bit => 750,
        }
    }
}

impl TryFrom<u8> for ReadoutResolution {
    type Error = &'static str;

    fn try_from(value: u8) -> Result<Self, Self::Error> {
        use ReadoutResolution::*;
        match value {
            0x1f => Ok(Resolution9bit),
            0x3f => Ok(Resolution10bit),
            0x5f => Ok(Resolution11bit),
            0x7f => Ok(Resolution12bit),
            _ => Err("Invalid readout resolution"),
        }
    }
}
