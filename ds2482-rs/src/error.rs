use onewire_core::OneWireError;

#[derive(Debug, PartialEq)]
/// DS2482 errors
pub enum Ds2482Error<E> {
    /// I2C bus errors: a write was not acknowledged or a read returned no data.
    I2c(E),
    /// The status register did not report the expected bit before the poll timeout.
    Timeout,
    /// Channel index outside `0..=7`. No bus traffic took place.
    InvalidChannel(u8),
    /// The channel selection register did not read back the expected code.
    ChannelMismatch {
        /// Readback code of the requested channel.
        expected: u8,
        /// Value read from the bridge.
        found: u8,
    },
    /// The status register differs from its post-reset value during initialization.
    UnexpectedStatus(u8),
    /// 1-Wire reset completed without a presence pulse.
    NoDevicePresent,
}

impl<E> From<OneWireError<Ds2482Error<E>>> for Ds2482Error<E> {
    fn from(value: OneWireError<Ds2482Error<E>>) -> Self {
        match value {
            OneWireError::Other(e) => e,
            OneWireError::NoDevicePresent => Self::NoDevicePresent,
        }
    }
}
