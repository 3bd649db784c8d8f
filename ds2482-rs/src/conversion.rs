use crate::{Clock, DeviceState, Ds2482, Ds2482Error, Ds2482Result, Scratchpad, Temperature};
use ds18b20::CONVERSION_TIME_MS;
use embedded_hal::{
    delay::DelayNs,
    i2c::{I2c, SevenBitAddress},
};

impl<I2C: I2c<SevenBitAddress>, D: DelayNs, C: Clock> Ds2482<I2C, D, C> {
    /// Start a temperature conversion on `channel` without waiting for it.
    ///
    /// Selects the channel, resets the bus (a presence pulse is required),
    /// addresses every sensor with Skip ROM and issues Convert T. On success
    /// the handle is in [`DeviceState::ConvertingTemperature`]; call
    /// [`poll_conversion_done`](Self::poll_conversion_done) from the control
    /// loop until it reports completion.
    pub fn start_conversion(&mut self, channel: u8) -> Ds2482Result<(), I2C::Error> {
        diag!(debug, "starting temperature conversion on channel {}", channel);
        self.state = DeviceState::Idle;
        self.select_channel(channel)?;
        ds18b20::trigger_temperature_conversion(self).map_err(Ds2482Error::from)?;
        self.conversion_start = self.clock.now_ms();
        self.state = DeviceState::ConvertingTemperature;
        Ok(())
    }

    /// Check whether the pending conversion had its full conversion time.
    ///
    /// Returns `false` if no conversion is pending. Once 750 ms have passed
    /// since [`start_conversion`](Self::start_conversion) this returns `true`
    /// exactly once and moves the handle back to [`DeviceState::Idle`].
    /// Never touches the bus.
    pub fn poll_conversion_done(&mut self) -> bool {
        if self.state != DeviceState::ConvertingTemperature {
            return false;
        }
        let elapsed = self.clock.now_ms().wrapping_sub(self.conversion_start);
        if elapsed >= u64::from(CONVERSION_TIME_MS) {
            diag!(debug, "temperature conversion complete after {} ms", elapsed);
            self.state = DeviceState::Idle;
            return true;
        }
        false
    }

    /// Read the scratchpad of the sensor on the current channel.
    ///
    /// The bytes are returned as sent; the CRC is left to the caller
    /// (see [`Scratchpad::crc_valid`]).
    pub fn read_scratchpad(&mut self) -> Ds2482Result<Scratchpad, I2C::Error> {
        self.state = DeviceState::Idle;
        let scratchpad = ds18b20::read_scratchpad(self).map_err(Ds2482Error::from)?;
        diag!(debug, "scratchpad: {:02x?}", scratchpad.as_bytes());
        Ok(scratchpad)
    }

    /// Read the last converted temperature from the sensor on `channel`.
    ///
    /// This does not wait for a conversion: start one with
    /// [`start_conversion`](Self::start_conversion) and wait for
    /// [`poll_conversion_done`](Self::poll_conversion_done) first. Blocks only
    /// for the bus transactions, each bounded by the poll timeout.
    pub fn read_temperature(&mut self, channel: u8) -> Ds2482Result<Temperature, I2C::Error> {
        diag!(debug, "reading temperature from channel {}", channel);
        self.state = DeviceState::Idle;
        self.select_channel(channel)?;
        let temperature = self.read_scratchpad()?.temperature();
        diag!(debug, "channel {}: {} °C", channel, temperature);
        self.state = DeviceState::Idle;
        Ok(temperature)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::testing::*;

    const SCRATCH_25C: [u8; 9] = [0x90, 0x01, 0x4b, 0x46, 0x7f, 0xff, 0x10, 0x10, 0x92];

    fn start(channel: u8, presence: bool) -> Vec<I2cTransaction> {
        let mut ex = [select(channel), wire_reset(presence)].concat();
        if presence {
            ex.extend(write_byte(0xcc));
            ex.extend(write_byte(0x44));
        }
        ex
    }

    fn scratchpad(channel: u8, bytes: [u8; 9]) -> Vec<I2cTransaction> {
        let mut ex = [select(channel), wire_reset(true), write_byte(0xcc), write_byte(0xbe)].concat();
        for b in bytes {
            ex.extend(read_byte(b));
        }
        ex
    }

    #[test]
    fn conversion_takes_750ms() {
        let (mut dev, mut i2c, clock) = bridge(&start(3, true));
        clock.set(1_000);
        dev.start_conversion(3).unwrap();
        assert_eq!(dev.state(), DeviceState::ConvertingTemperature);
        assert!(dev.is_busy());
        assert_eq!(dev.current_channel(), 3);

        for t in [1_000, 1_001, 1_500, 1_749] {
            clock.set(t);
            assert!(!dev.poll_conversion_done());
            assert_eq!(dev.state(), DeviceState::ConvertingTemperature);
        }
        clock.set(1_750);
        assert!(dev.poll_conversion_done());
        assert_eq!(dev.state(), DeviceState::Idle);
        clock.set(5_000);
        assert!(!dev.poll_conversion_done());
        i2c.done();
    }

    #[test]
    fn poll_without_conversion() {
        let (mut dev, mut i2c, clock) = bridge(&[]);
        clock.set(10_000);
        assert!(!dev.poll_conversion_done());
        dev.state = DeviceState::Error;
        assert!(!dev.poll_conversion_done());
        assert_eq!(dev.state(), DeviceState::Error);
        i2c.done();
    }

    #[test]
    fn no_sensor_on_channel() {
        let (mut dev, mut i2c, clock) = bridge(&start(2, false));
        assert_eq!(dev.start_conversion(2), Err(Ds2482Error::NoDevicePresent));
        assert_ne!(dev.state(), DeviceState::ConvertingTemperature);
        assert_eq!(dev.state(), DeviceState::Error);
        clock.set(1_000);
        assert!(!dev.poll_conversion_done());
        i2c.done();
    }

    #[test]
    fn start_clears_previous_error() {
        let (mut dev, mut i2c, _) = bridge(&start(0, true));
        dev.state = DeviceState::Error;
        dev.start_conversion(0).unwrap();
        assert_eq!(dev.state(), DeviceState::ConvertingTemperature);
        i2c.done();
    }

    #[test]
    fn start_on_invalid_channel() {
        let (mut dev, mut i2c, _) = bridge(&[]);
        dev.state = DeviceState::ConvertingTemperature;
        assert_eq!(dev.start_conversion(9), Err(Ds2482Error::InvalidChannel(9)));
        assert!(!dev.is_busy());
        i2c.done();
    }

    #[test]
    fn convert_then_read() {
        let ex = [start(3, true), scratchpad(3, SCRATCH_25C)].concat();
        let (mut dev, mut i2c, clock) = bridge(&ex);
        dev.start_conversion(3).unwrap();
        clock.set(760);
        assert!(dev.poll_conversion_done());
        assert_eq!(dev.read_temperature(3), Ok(Temperature::from_num(25)));
        assert_eq!(dev.state(), DeviceState::Idle);
        i2c.done();
    }

    #[test]
    fn negative_temperature() {
        let mut bytes = SCRATCH_25C;
        bytes[0] = 0xf8;
        bytes[1] = 0xff;
        let (mut dev, mut i2c, _) = bridge(&scratchpad(6, bytes));
        let t = dev.read_temperature(6).unwrap();
        assert_eq!(t, Temperature::from_num(-0.5));
        assert_eq!(t.to_num::<f32>(), -0.5);
        i2c.done();
    }

    #[test]
    fn raw_scratchpad() {
        let ex = scratchpad(4, SCRATCH_25C);
        let (mut dev, mut i2c, _) = bridge(&ex);
        dev.select_channel(4).unwrap();
        let scratch = dev.read_scratchpad().unwrap();
        assert_eq!(scratch.as_bytes(), &SCRATCH_25C);
        assert!(scratch.crc_valid());
        i2c.done();
    }

    #[test]
    fn read_on_mismatched_channel() {
        let ex = [
            vec![command(&[crate::registers::CHANNEL_SELECT_CMD, 0xf0])],
            register(crate::registers::CHANNEL_SELECT_PTR, 0x00),
        ]
        .concat();
        let (mut dev, mut i2c, _) = bridge(&ex);
        assert!(matches!(
            dev.read_temperature(0),
            Err(Ds2482Error::ChannelMismatch { .. })
        ));
        assert_eq!(dev.state(), DeviceState::Error);
        i2c.done();
    }
}
