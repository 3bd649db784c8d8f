use crate::{Ds2482, Ds2482Result};
use embedded_hal::i2c::{I2c, SevenBitAddress};

/// Operational state of a [`Ds2482`] handle.
#[derive(Debug, Default, Clone, Copy, PartialEq, Eq)]
pub enum DeviceState {
    /// No operation in progress.
    #[default]
    Idle,
    /// A temperature conversion was started and has not been polled to completion.
    ConvertingTemperature,
    /// An operation failed. Cleared by a successful reset or initialization,
    /// by [`Ds2482::clear_state`], or by the next conversion or temperature read.
    Error,
}

impl<I, D, C> Ds2482<I, D, C> {
    /// Current operational state.
    pub fn state(&self) -> DeviceState {
        self.state
    }

    /// `true` while a temperature conversion is pending.
    pub fn is_busy(&self) -> bool {
        self.state == DeviceState::ConvertingTemperature
    }

    /// Force the handle back to [`DeviceState::Idle`].
    ///
    /// Abandons a pending conversion and acknowledges a previous error.
    pub fn clear_state(&mut self) {
        self.state = DeviceState::Idle;
    }
}

impl<I2C: I2c<SevenBitAddress>, D, C> Ds2482<I2C, D, C> {
    /// Records a failed operation in the device state.
    pub(crate) fn track<T>(
        &mut self,
        res: Ds2482Result<T, I2C::Error>,
    ) -> Ds2482Result<T, I2C::Error> {
        if let Err(e) = &res {
            diag!(warn, "DS2482 at {:#04x} failed: {:?}", self.addr, e);
            self.state = DeviceState::Error;
        }
        res
    }
}
