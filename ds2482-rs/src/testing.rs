//! Scripted I2C traffic for the unit tests.

use crate::{
    Channel, Clock, DEFAULT_ADDRESS, Ds2482,
    onewire::{ONEWIRE_READ_BYTE, ONEWIRE_RESET_CMD, ONEWIRE_WRITE_BYTE},
    registers::{
        CHANNEL_SELECT_CMD, CHANNEL_SELECT_PTR, DEVICE_RST_CMD, DEVICE_STATUS_PTR, READ_DATA_PTR,
        READ_PTR_CMD,
    },
};
pub(crate) use embedded_hal_mock::eh1::i2c::{Mock as I2cMock, Transaction as I2cTransaction};
use embedded_hal::i2c::ErrorKind;
use embedded_hal_mock::eh1::delay::NoopDelay;
use std::{cell::Cell, rc::Rc};

/// Clock shared between a test and the handle under test.
///
/// Every reading advances the time by the configured step, which lets
/// status polls run into their timeout after a known number of samples.
#[derive(Clone, Default)]
pub(crate) struct TestClock {
    now: Rc<Cell<u64>>,
    step: Rc<Cell<u64>>,
}

impl TestClock {
    pub(crate) fn set(&self, ms: u64) {
        self.now.set(ms);
    }

    pub(crate) fn step(&self, ms: u64) {
        self.step.set(ms);
    }
}

impl Clock for TestClock {
    fn now_ms(&mut self) -> u64 {
        let now = self.now.get();
        self.now.set(now + self.step.get());
        now
    }
}

pub(crate) type MockBridge = Ds2482<I2cMock, NoopDelay, TestClock>;

/// A handle on the default address expecting exactly `expectations`.
///
/// Call `done()` on the returned mock at the end of the test.
pub(crate) fn bridge(expectations: &[I2cTransaction]) -> (MockBridge, I2cMock, TestClock) {
    let i2c = I2cMock::new(expectations);
    let clock = TestClock::default();
    let dev = Ds2482::new(i2c.clone(), NoopDelay::new(), clock.clone());
    (dev, i2c, clock)
}

pub(crate) fn command(bytes: &[u8]) -> I2cTransaction {
    I2cTransaction::write(DEFAULT_ADDRESS, bytes.to_vec())
}

/// A one byte read the bridge does not answer.
pub(crate) fn missing_byte() -> I2cTransaction {
    I2cTransaction::read(DEFAULT_ADDRESS, vec![0]).with_error(ErrorKind::Other)
}

pub(crate) fn register(ptr: u8, value: u8) -> Vec<I2cTransaction> {
    vec![
        command(&[READ_PTR_CMD, ptr]),
        I2cTransaction::read(DEFAULT_ADDRESS, vec![value]),
    ]
}

pub(crate) fn status(value: u8) -> Vec<I2cTransaction> {
    register(DEVICE_STATUS_PTR, value)
}

pub(crate) fn select(channel: u8) -> Vec<I2cTransaction> {
    let channel = Channel::try_from(channel).unwrap();
    [
        vec![command(&[CHANNEL_SELECT_CMD, channel.select_code()])],
        register(CHANNEL_SELECT_PTR, channel.readback()),
    ]
    .concat()
}

pub(crate) fn wire_reset(presence: bool) -> Vec<I2cTransaction> {
    [
        status(0x08),
        vec![command(&[ONEWIRE_RESET_CMD])],
        status(if presence { 0x0a } else { 0x08 }),
    ]
    .concat()
}

pub(crate) fn write_byte(byte: u8) -> Vec<I2cTransaction> {
    [status(0x08), vec![command(&[ONEWIRE_WRITE_BYTE, byte])]].concat()
}

pub(crate) fn read_byte(byte: u8) -> Vec<I2cTransaction> {
    [
        status(0x08),
        vec![command(&[ONEWIRE_READ_BYTE])],
        status(0x08),
        register(READ_DATA_PTR, byte),
    ]
    .concat()
}

/// Traffic of a successful [`Ds2482::initialize`].
pub(crate) fn initialize_ok() -> Vec<I2cTransaction> {
    [
        vec![command(&[DEVICE_RST_CMD])],
        status(0x18),
        vec![command(&[ONEWIRE_READ_BYTE])],
        status(0x18),
        status(0x18),
    ]
    .concat()
}
