use clap::Parser;
use ds2482::{Channel, Clock, Ds2482, Ds2482Result, Temperature};
use embedded_hal::{delay::DelayNs, i2c::I2c};
use std::time::{Duration, Instant};

/// Sample DS18B20 sensors behind a DS2482-800 bridge
#[derive(Parser, Debug)]
#[command(version, about, long_about = None)]
struct Args {
    /// Path to I2C bus (e.g., /dev/i2c-1)
    #[arg(short, long)]
    path: String,
    /// 7-bit I2C address of the bridge
    #[arg(short, long, default_value = "0x18", value_parser = parse_address)]
    address: u8,
    /// Comma separated channels to sample
    #[arg(short, long, value_delimiter = ',', default_values_t = vec![0u8, 1, 2, 3, 4, 5, 6, 7])]
    channels: Vec<u8>,
    /// Discard readings whose scratchpad CRC does not match
    #[arg(long)]
    crc: bool,
    /// Number of sampling rounds, 0 samples forever
    #[arg(short = 'n', long, default_value_t = 0)]
    rounds: u32,
}

fn parse_address(s: &str) -> Result<u8, String> {
    let parsed = match s.strip_prefix("0x") {
        Some(hex) => u8::from_str_radix(hex, 16),
        None => s.parse(),
    };
    match parsed {
        Ok(addr) if addr < 0x80 => Ok(addr),
        Ok(addr) => Err(format!("{addr:#04x} is not a 7-bit address")),
        Err(e) => Err(e.to_string()),
    }
}

struct MonotonicClock(Instant);

impl Clock for MonotonicClock {
    fn now_ms(&mut self) -> u64 {
        self.0.elapsed().as_millis() as u64
    }
}

/// Converts on `channel` and reads the result, sleeping while the sensor works.
///
/// `Ok(None)` means the scratchpad arrived with a bad CRC.
fn sample<I: I2c, D: DelayNs, C: Clock>(
    bridge: &mut Ds2482<I, D, C>,
    channel: u8,
    crc: bool,
) -> Ds2482Result<Option<Temperature>, I::Error> {
    bridge.start_conversion(channel)?;
    while !bridge.poll_conversion_done() {
        std::thread::sleep(Duration::from_millis(10));
    }
    if !crc {
        return bridge.read_temperature(channel).map(Some);
    }
    bridge.select_channel(channel)?;
    let scratchpad = bridge.read_scratchpad()?;
    if !scratchpad.crc_valid() {
        log::warn!(
            "channel {channel}: CRC mismatch in scratchpad {:02x?}",
            scratchpad.as_bytes()
        );
        return Ok(None);
    }
    Ok(Some(scratchpad.temperature()))
}

fn main() {
    // Initialize the logger
    env_logger::init();
    // Parse command line arguments
    let args = Args::parse();
    if let Some(&bad) = args.channels.iter().find(|&&ch| ch >= Channel::COUNT) {
        log::error!("Channel {bad} does not exist, the DS2482-800 has channels 0 to 7");
        std::process::exit(2);
    }
    // Open the I2C bus
    let i2c = linux_embedded_hal::I2cdev::new(&args.path).expect("Failed to open I2C device");
    let delay = linux_embedded_hal::Delay;
    // Create a DS2482 instance
    let mut bridge =
        Ds2482::new(i2c, delay, MonotonicClock(Instant::now())).with_address(args.address);
    bridge
        .initialize()
        .expect("Failed to initialize DS2482-800");
    log::info!("DS2482-800 ready at {:#04x}", bridge.address());

    let mut round = 0;
    loop {
        for &channel in args.channels.iter() {
            match sample(&mut bridge, channel, args.crc) {
                Ok(Some(temp)) => log::info!("Channel {channel}: {temp} °C"),
                Ok(None) => {}
                Err(e) => {
                    log::warn!("Channel {channel}: {e:?}");
                    bridge.clear_state();
                }
            }
        }
        round += 1;
        if args.rounds != 0 && round >= args.rounds {
            break;
        }
    }
}
