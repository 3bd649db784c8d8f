use crate::{ONEWIRE_SKIP_ROM_CMD, OneWireError, OneWireResult};

/// Bus state reported by a 1-Wire master after a reset.
pub trait OneWireStatus {
    /// A presence pulse was seen after the reset.
    fn presence(&self) -> bool;
    /// The line was found shorted during the presence-detect cycle.
    fn shortcircuit(&self) -> bool;
    /// Logic level of the line, if the master can sample it.
    fn logic_level(&self) -> Option<bool> {
        None
    }
}

/// Trait for 1-Wire communication.
/// This trait defines the basic operations required for 1-Wire communication, such as resetting the bus,
/// writing and reading bytes, and writing and reading bits.
pub trait OneWire {
    /// The status type returned by the reset operation.
    /// This type must implement the [OneWireStatus] trait.
    type Status: OneWireStatus;
    /// The error type returned by the operations of this trait.
    /// This type is used to indicate errors in the underlying hardware or communication.
    type BusError;

    /// Resets the 1-Wire bus and returns the status of the bus.
    ///
    /// # Errors
    /// This method returns an error if the reset operation fails.
    fn reset(&mut self) -> OneWireResult<Self::Status, Self::BusError>;

    /// Writes a byte to the 1-Wire bus.
    /// # Arguments
    /// * `byte` - The byte to write to the bus.
    ///
    /// # Errors
    /// This method returns an error if the write operation fails.
    fn write_byte(&mut self, byte: u8) -> OneWireResult<(), Self::BusError>;

    /// Reads a byte from the 1-Wire bus.
    ///
    /// # Errors
    /// This method returns an error if the read operation fails.
    fn read_byte(&mut self) -> OneWireResult<u8, Self::BusError>;

    /// Writes a single bit time slot.
    ///
    /// # Errors
    /// This method returns an error if the write operation fails.
    fn write_bit(&mut self, bit: bool) -> OneWireResult<(), Self::BusError>;

    /// Reads a single bit from the 1-Wire bus.
    ///
    /// # Errors
    /// This method returns an error if the read operation fails.
    fn read_bit(&mut self) -> OneWireResult<bool, Self::BusError>;

    /// Fills `buf` with consecutive bytes read from the bus.
    fn read_bytes(&mut self, buf: &mut [u8]) -> OneWireResult<(), Self::BusError> {
        for b in buf.iter_mut() {
            *b = self.read_byte()?;
        }
        Ok(())
    }

    /// Resets the bus and addresses every slave on it with the Skip ROM command.
    ///
    /// The next function command is executed by all slaves at once. Reading
    /// back data after this call only makes sense with a single slave on the bus.
    ///
    /// # Errors
    /// [`OneWireError::NoDevicePresent`] if the reset saw no presence pulse.
    fn skip_rom(&mut self) -> OneWireResult<(), Self::BusError> {
        let status = self.reset()?;
        if !status.presence() {
            return Err(OneWireError::NoDevicePresent);
        }
        self.write_byte(ONEWIRE_SKIP_ROM_CMD)
    }
}
