use crate::{
    Clock, Ds2482, Ds2482Error, Ds2482Result,
    registers::{DeviceStatus, READ_DATA_PTR},
};
use embedded_hal::{
    delay::DelayNs,
    i2c::{I2c, SevenBitAddress},
};
use onewire_core::{OneWire, OneWireError, OneWireResult};

pub(crate) const ONEWIRE_RESET_CMD: u8 = 0xb4;
pub(crate) const ONEWIRE_WRITE_BYTE: u8 = 0xa5;
pub(crate) const ONEWIRE_READ_BYTE: u8 = 0x96;
pub(crate) const ONEWIRE_SINGLE_BIT: u8 = 0x87;

const SINGLE_BIT_ONE: u8 = 0x80;
const SINGLE_BIT_ZERO: u8 = 0x00;

impl<I2C: I2c<SevenBitAddress>, D: DelayNs, C: Clock> Ds2482<I2C, D, C> {
    /// Reset the selected 1-Wire channel and look for a presence pulse.
    ///
    /// A missing presence pulse fails with [`Ds2482Error::NoDevicePresent`]; at
    /// this level an empty channel and a broken bus look the same, and both
    /// put the handle into [`DeviceState::Error`](crate::DeviceState::Error).
    pub fn wire_reset(&mut self) -> Ds2482Result<DeviceStatus, I2C::Error> {
        diag!(debug, "1-Wire reset on channel {}", self.channel.index());
        let res = self.onewire_reset();
        self.track(res)
    }

    fn onewire_reset(&mut self) -> Ds2482Result<DeviceStatus, I2C::Error> {
        self.wait_not_busy()?;
        self.write_command(ONEWIRE_RESET_CMD)?;
        let status = self.wait_not_busy()?;
        if status.short_detect() {
            diag!(warn, "short detected on channel {}", self.channel.index());
        }
        if !status.present_pulse_detect() {
            diag!(debug, "no device on channel {}", self.channel.index());
            return Err(Ds2482Error::NoDevicePresent);
        }
        Ok(status)
    }

    /// Write a single 1-Wire time slot.
    pub fn wire_write_bit(&mut self, bit: bool) -> Ds2482Result<(), I2C::Error> {
        let res = self.single_bit(bit);
        self.track(res)
    }

    /// Read a single 1-Wire time slot.
    ///
    /// Generates a write-one slot and reports the line level the bridge sampled.
    pub fn wire_read_bit(&mut self) -> Ds2482Result<bool, I2C::Error> {
        let res = self
            .single_bit(true)
            .and_then(|_| self.wait_not_busy())
            .map(|status| status.single_bit_result());
        self.track(res)
    }

    fn single_bit(&mut self, bit: bool) -> Ds2482Result<(), I2C::Error> {
        self.wait_not_busy()?;
        self.send_command(
            ONEWIRE_SINGLE_BIT,
            Some(if bit { SINGLE_BIT_ONE } else { SINGLE_BIT_ZERO }),
        )
    }

    /// Write a byte to the selected 1-Wire channel, LSB first.
    pub fn wire_write_byte(&mut self, byte: u8) -> Ds2482Result<(), I2C::Error> {
        let res = self
            .wait_not_busy()
            .and_then(|_| self.send_command(ONEWIRE_WRITE_BYTE, Some(byte)));
        self.track(res)
    }

    /// Read a byte from the selected 1-Wire channel.
    pub fn wire_read_byte(&mut self) -> Ds2482Result<u8, I2C::Error> {
        let res = self.read_data_byte();
        if let Ok(byte) = res {
            diag!(trace, "read byte {:#04x}", byte);
        }
        self.track(res)
    }

    fn read_data_byte(&mut self) -> Ds2482Result<u8, I2C::Error> {
        self.wait_not_busy()?;
        self.write_command(ONEWIRE_READ_BYTE)?;
        self.wait_not_busy()?;
        self.read_register(READ_DATA_PTR)
    }
}

impl<I2C: I2c<SevenBitAddress>, D: DelayNs, C: Clock> OneWire for Ds2482<I2C, D, C> {
    type Status = DeviceStatus;

    type BusError = Ds2482Error<I2C::Error>;

    fn reset(&mut self) -> OneWireResult<Self::Status, Self::BusError> {
        self.wire_reset().map_err(|e| match e {
            Ds2482Error::NoDevicePresent => OneWireError::NoDevicePresent,
            e => OneWireError::Other(e),
        })
    }

    fn write_byte(&mut self, byte: u8) -> OneWireResult<(), Self::BusError> {
        Ok(self.wire_write_byte(byte)?)
    }

    fn read_byte(&mut self) -> OneWireResult<u8, Self::BusError> {
        Ok(self.wire_read_byte()?)
    }

    fn write_bit(&mut self, bit: bool) -> OneWireResult<(), Self::BusError> {
        Ok(self.wire_write_bit(bit)?)
    }

    fn read_bit(&mut self) -> OneWireResult<bool, Self::BusError> {
        Ok(self.wire_read_bit()?)
    }
}
