use crate::{
    Clock, Ds2482, Ds2482Error, Ds2482Result,
    registers::{CHANNEL_SELECT_CMD, CHANNEL_SELECT_PTR},
};
use embedded_hal::{
    delay::DelayNs,
    i2c::{I2c, SevenBitAddress},
};

/// Channel select codes written after the Channel Select command, IO0..IO7.
const SELECT_CODES: [u8; 8] = [0xf0, 0xe1, 0xd2, 0xc3, 0xb4, 0xa5, 0x96, 0x87];
/// Channel selection register content once the matching channel is active.
const READBACK_CODES: [u8; 8] = [0xb8, 0xb1, 0xaa, 0xa3, 0x9c, 0x95, 0x8e, 0x87];
/// Minimum time between Channel Select and reading the selection register.
const CHANNEL_SETTLE_US: u32 = 100;

/// One of the eight 1-Wire channels of the DS2482-800.
#[derive(Debug, Default, Clone, Copy, PartialEq, Eq)]
pub struct Channel(u8);

impl Channel {
    /// Number of channels on the bridge.
    pub const COUNT: u8 = 8;

    /// Channel index, `0..=7`.
    pub fn index(self) -> u8 {
        self.0
    }

    pub(crate) fn select_code(self) -> u8 {
        SELECT_CODES[self.0 as usize]
    }

    pub(crate) fn readback(self) -> u8 {
        READBACK_CODES[self.0 as usize]
    }
}

impl TryFrom<u8> for Channel {
    type Error = u8;

    fn try_from(value: u8) -> Result<Self, Self::Error> {
        if value < Self::COUNT {
            Ok(Self(value))
        } else {
            Err(value)
        }
    }
}

impl<I2C: I2c<SevenBitAddress>, D: DelayNs, C: Clock> Ds2482<I2C, D, C> {
    /// Route subsequent 1-Wire commands to `channel` (`0..=7`).
    ///
    /// The selection is verified by reading back the channel selection
    /// register, which catches address-line and wiring faults that a plain
    /// write would not. On mismatch or bus failure the current channel is
    /// kept and the handle enters [`DeviceState::Error`](crate::DeviceState::Error).
    /// An out-of-range index fails without any bus traffic.
    pub fn select_channel(&mut self, channel: u8) -> Ds2482Result<(), I2C::Error> {
        let Ok(channel) = Channel::try_from(channel) else {
            diag!(warn, "invalid channel number {}", channel);
            return Err(Ds2482Error::InvalidChannel(channel));
        };
        diag!(debug, "selecting channel {}", channel.index());
        let res = self.switch_channel(channel);
        let res = self.track(res);
        if res.is_ok() {
            self.channel = channel;
        }
        res
    }

    fn switch_channel(&mut self, channel: Channel) -> Ds2482Result<(), I2C::Error> {
        self.send_command(CHANNEL_SELECT_CMD, Some(channel.select_code()))?;
        self.delay.delay_us(CHANNEL_SETTLE_US);
        let found = self.read_register(CHANNEL_SELECT_PTR)?;
        let expected = channel.readback();
        diag!(
            debug,
            "channel readback expected {:#04x}, got {:#04x}",
            expected,
            found
        );
        if found != expected {
            return Err(Ds2482Error::ChannelMismatch { expected, found });
        }
        Ok(())
    }

    /// Index of the last successfully selected channel, `0` after construction.
    pub fn current_channel(&self) -> u8 {
        self.channel.index()
    }
}
