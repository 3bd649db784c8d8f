#![cfg_attr(not(test), no_std)]
#![deny(missing_docs)]

/*! # DS2482
 *
 * Driver for the DS2482-800 I2C to 1-Wire bridge with eight independent
 * 1-Wire channels, each expected to carry one DS18B20 temperature sensor.
 *
 * The driver never sleeps for a fixed time where the chip reports
 * progress: every wait polls the status register with a bounded timeout.
 * The 750 ms temperature conversion is split into
 * [`start_conversion`](Ds2482::start_conversion) and
 * [`poll_conversion_done`](Ds2482::poll_conversion_done) so the caller's
 * loop keeps running while the sensor works.
 *
 * Failures are returned as [`Ds2482Error`] and also recorded in the
 * [`DeviceState`] of the handle. The driver does not recover on its own;
 * call [`reset`](Ds2482::reset), [`initialize`](Ds2482::initialize) or
 * [`clear_state`](Ds2482::clear_state).
 *
 * Enable the `log` feature to get diagnostics through the `log` facade.
 */

#[macro_use]
mod diag;
mod channel;
mod conversion;
mod error;
mod onewire;
mod registers;
mod state;
mod traits;

#[cfg(test)]
mod testing;

pub use channel::Channel;
pub use ds18b20::{Scratchpad, Temperature};
pub use error::Ds2482Error;
pub use onewire_core::{OneWire, OneWireError, OneWireResult};
pub use registers::DeviceStatus;
pub use state::DeviceState;
pub use traits::Clock;

/// Results of DS2482-specific function calls.
pub type Ds2482Result<T, E> = Result<T, Ds2482Error<E>>;

/// I2C address with AD2..AD0 tied low.
pub const DEFAULT_ADDRESS: u8 = 0x18;

/// Default ceiling for every status poll, in milliseconds.
pub const DEFAULT_TIMEOUT_MS: u64 = 100;

/// A DS2482-800 I2C to 1-Wire bridge device.
///
/// Takes ownership of an I2C bus (implementing [`I2c`](embedded_hal::i2c::I2c) trait),
/// a timer object implementing the [`DelayNs`](embedded_hal::delay::DelayNs) trait
/// used between status polls, and a monotonic millisecond [`Clock`].
pub struct Ds2482<I, D, C> {
    pub(crate) i2c: I,
    pub(crate) addr: u8,
    pub(crate) delay: D,
    pub(crate) clock: C,
    pub(crate) timeout_ms: u64,
    pub(crate) state: DeviceState,
    pub(crate) channel: Channel,
    pub(crate) conversion_start: u64,
}

impl<I, D, C> Ds2482<I, D, C> {
    /// Creates a new instance of `Ds2482` at [`DEFAULT_ADDRESS`].
    ///
    /// No bus traffic happens until [`initialize`](Ds2482::initialize) or
    /// another operation is called.
    pub fn new(i2c: I, delay: D, clock: C) -> Self {
        Ds2482 {
            i2c,
            addr: DEFAULT_ADDRESS,
            delay,
            clock,
            timeout_ms: DEFAULT_TIMEOUT_MS,
            state: DeviceState::Idle,
            channel: Channel::default(),
            conversion_start: 0,
        }
    }

    /// Set the 7-bit I2C address.
    ///
    /// The DS2482-800 answers on `0x18 | AD2..AD0`.
    pub fn with_address(mut self, addr: u8) -> Self {
        self.addr = addr;
        self
    }

    /// Set the poll timeout.
    ///
    /// The timeout bounds how long the host waits for the
    /// bridge to report a finished command before giving up.
    pub fn with_timeout_ms(mut self, timeout_ms: u64) -> Self {
        self.timeout_ms = timeout_ms;
        self
    }

    /// The I2C address this handle talks to.
    pub fn address(&self) -> u8 {
        self.addr
    }
}
