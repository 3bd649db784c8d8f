//! ROM command constants for 1-Wire communication.

/// On a single-drop bus this command saves time by
/// allowing the bus master to access the function
/// commands without providing the 64-bit ROM code.
/// With more than one slave on the bus, every slave
/// answers the next function command at once.
pub const ONEWIRE_SKIP_ROM_CMD: u8 = 0xcc;
