use crate::{Clock, DeviceState, Ds2482, Ds2482Error, Ds2482Result};
use bitfield_struct::bitfield;
use embedded_hal::{
    delay::DelayNs,
    i2c::{I2c, SevenBitAddress},
};
use onewire_core::OneWireStatus;

pub(crate) const READ_PTR_CMD: u8 = 0xe1; // Set the read pointer
pub(crate) const DEVICE_RST_CMD: u8 = 0xf0; // Reset the device
pub(crate) const CHANNEL_SELECT_CMD: u8 = 0xc3; // Select the active 1-Wire channel

pub(crate) const DEVICE_STATUS_PTR: u8 = 0xf0; // Device status register
pub(crate) const READ_DATA_PTR: u8 = 0xe1; // Last byte read from the 1-Wire line
pub(crate) const CHANNEL_SELECT_PTR: u8 = 0xd2; // Channel selection register

/// Returned by [`Ds2482::read_status`] when the bridge sent no data.
pub(crate) const STATUS_UNAVAILABLE: u8 = 0xff;
/// Status after a device reset: RST set, 1-Wire line idle high.
pub(crate) const POST_RESET_STATUS: u8 = 0x18;
pub(crate) const POLL_INTERVAL_US: u32 = 100;

/// Status register for DS2482.
///
/// The read-only Status register is the general means for
/// the DS2482 to report bit-type data from the 1-Wire side,
/// 1-Wire busy status, and its own reset status to the host
/// processor. Status information is updated during the execution
/// of certain commands only, so a value is a snapshot of the
/// moment it was read.
#[bitfield(u8)]
#[derive(PartialEq, Eq)]
pub struct DeviceStatus {
    /// 1WB: 1 while a 1-Wire command is executing.
    pub onewire_busy: bool,
    /// PPD: a presence pulse was detected during the last 1-Wire reset.
    pub present_pulse_detect: bool,
    /// SD: the line was low at tSI during the last 1-Wire reset. If the
    /// line is shorted at tMSP, PPD is set as well.
    pub short_detect: bool,
    /// LL: logic state of the active 1-Wire line, sampled on every status read.
    pub logic_level: bool,
    /// RST: the DS2482 went through an internal reset, either at power-on
    /// or from the Device Reset command. Cleared by Write Configuration.
    pub device_reset: bool,
    /// SBR: line state sampled during a 1-Wire Single Bit command.
    pub single_bit_result: bool,
    /// TSB: second bit of a 1-Wire Triplet command.
    pub triplet_second_bit: bool,
    /// DIR: search direction chosen by a 1-Wire Triplet command.
    pub branch_dir_taken: bool,
}

impl DeviceStatus {
    /// 1-Wire busy.
    pub const BUSY: u8 = 0x01;
    /// Presence pulse detected.
    pub const PRESENCE: u8 = 0x02;
    /// Short detected.
    pub const SHORT: u8 = 0x04;
    /// Logic level of the line.
    pub const LOGIC_LEVEL: u8 = 0x08;
    /// Device reset done.
    pub const DEVICE_RESET: u8 = 0x10;
    /// Single bit result.
    pub const SINGLE_BIT: u8 = 0x20;
    /// Triplet second bit.
    pub const TRIPLET_SECOND_BIT: u8 = 0x40;
    /// Branch direction taken.
    pub const BRANCH_DIRECTION: u8 = 0x80;
}

impl OneWireStatus for DeviceStatus {
    fn presence(&self) -> bool {
        self.present_pulse_detect()
    }

    fn shortcircuit(&self) -> bool {
        self.short_detect()
    }

    fn logic_level(&self) -> Option<bool> {
        Some(self.into_bits() & Self::LOGIC_LEVEL != 0)
    }
}

/// What [`Ds2482::poll_status`] waits for.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub(crate) enum Until {
    /// Any bit of the mask reads 1.
    Set,
    /// All bits of the mask read 0.
    Clear,
}

impl<I2C: I2c<SevenBitAddress>, D: DelayNs, C: Clock> Ds2482<I2C, D, C> {
    pub(crate) fn send_command(
        &mut self,
        cmd: u8,
        payload: Option<u8>,
    ) -> Ds2482Result<(), I2C::Error> {
        match payload {
            Some(payload) => self.i2c.write(self.addr, &[cmd, payload]),
            None => self.i2c.write(self.addr, &[cmd]),
        }
        .map_err(Ds2482Error::I2c)
    }

    pub(crate) fn write_command(&mut self, cmd: u8) -> Ds2482Result<(), I2C::Error> {
        self.send_command(cmd, None)
    }

    pub(crate) fn set_read_pointer(&mut self, register: u8) -> Ds2482Result<(), I2C::Error> {
        self.send_command(READ_PTR_CMD, Some(register))
    }

    pub(crate) fn read_register(&mut self, register: u8) -> Ds2482Result<u8, I2C::Error> {
        self.set_read_pointer(register)?;
        let mut val = [0; 1];
        self.i2c
            .read(self.addr, &mut val)
            .map_err(Ds2482Error::I2c)?;
        Ok(val[0])
    }

    pub(crate) fn try_read_status(&mut self) -> Ds2482Result<DeviceStatus, I2C::Error> {
        self.read_register(DEVICE_STATUS_PTR)
            .map(DeviceStatus::from_bits)
    }

    /// Read the status register.
    ///
    /// If the bridge does not deliver the byte, the all-ones value `0xff` is
    /// returned instead. It can only be told apart from a genuine status with
    /// every flag set by context, so treat it as a failed read.
    pub fn read_status(&mut self) -> DeviceStatus {
        match self.try_read_status() {
            Ok(status) => {
                diag!(trace, "status {:#04x}", status.into_bits());
                status
            }
            Err(e) => {
                diag!(warn, "status unavailable: {:?}", e);
                DeviceStatus::from_bits(STATUS_UNAVAILABLE)
            }
        }
    }

    /// Samples the status register every [`POLL_INTERVAL_US`] until the bits
    /// in `mask` satisfy `until`, giving up once `timeout_ms` has passed.
    ///
    /// Returns the snapshot that satisfied the condition.
    pub(crate) fn poll_status(
        &mut self,
        mask: u8,
        until: Until,
    ) -> Ds2482Result<DeviceStatus, I2C::Error> {
        let start = self.clock.now_ms();
        loop {
            let status = self.try_read_status()?;
            let bits = status.into_bits() & mask;
            let done = match until {
                Until::Set => bits != 0,
                Until::Clear => bits == 0,
            };
            if done {
                return Ok(status);
            }
            if self.clock.now_ms().wrapping_sub(start) >= self.timeout_ms {
                diag!(
                    debug,
                    "poll for {:#04x} {:?} timed out, status {:#04x}",
                    mask,
                    until,
                    status.into_bits()
                );
                return Err(Ds2482Error::Timeout);
            }
            self.delay.delay_us(POLL_INTERVAL_US);
        }
    }

    pub(crate) fn wait_not_busy(&mut self) -> Ds2482Result<DeviceStatus, I2C::Error> {
        self.poll_status(DeviceStatus::BUSY, Until::Clear)
    }

    /// Reset the device.
    ///
    /// Performs a global reset of device state machine logic and terminates any
    /// ongoing 1-Wire communication, then waits for the RST status bit.
    /// On success the handle returns to [`DeviceState::Idle`], otherwise it
    /// enters [`DeviceState::Error`].
    pub fn reset(&mut self) -> Ds2482Result<DeviceStatus, I2C::Error> {
        diag!(debug, "resetting DS2482 at {:#04x}", self.addr);
        let res = self
            .write_command(DEVICE_RST_CMD)
            .and_then(|_| self.poll_status(DeviceStatus::DEVICE_RESET, Until::Set));
        let res = self.track(res);
        if res.is_ok() {
            self.state = DeviceState::Idle;
        }
        res
    }

    /// Wake the 1-Wire side by issuing a 1-Wire Read Byte and waiting for it
    /// to complete.
    ///
    /// Leaves the [`DeviceState`] untouched.
    pub fn wake_up(&mut self) -> Ds2482Result<DeviceStatus, I2C::Error> {
        diag!(debug, "waking up DS2482");
        self.write_command(crate::onewire::ONEWIRE_READ_BYTE)?;
        self.wait_not_busy()
    }

    /// Bring the bridge into a known state.
    ///
    /// Resets the device, wakes the 1-Wire side and checks that the status
    /// register holds its post-reset value. The I2C bus itself must already be
    /// set up by the HAL.
    pub fn initialize(&mut self) -> Ds2482Result<(), I2C::Error> {
        diag!(info, "initializing DS2482 at {:#04x}", self.addr);
        self.reset()?;
        let res = self.check_ready();
        let res = self.track(res);
        if res.is_ok() {
            diag!(info, "DS2482-800 ready");
            self.state = DeviceState::Idle;
        }
        res
    }

    fn check_ready(&mut self) -> Ds2482Result<(), I2C::Error> {
        self.wake_up()?;
        let status = self.try_read_status()?.into_bits();
        if status != POST_RESET_STATUS {
            diag!(warn, "unexpected status after reset: {:#04x}", status);
            return Err(Ds2482Error::UnexpectedStatus(status));
        }
        Ok(())
    }
}
