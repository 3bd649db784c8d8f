#[derive(Debug, Default)]
/// Calculate CRC-8 used in 1-Wire communications.
pub struct OneWireCrc(u8);

#[cfg(feature = "crc-table")]
const CRC_TABLE: [u8; 256] = {
    let mut table = [0u8; 256];
    let mut i = 0;
    while i < 256 {
        table[i] = OneWireCrc::shift(i as u8);
        i += 1;
    }
    table
};

impl OneWireCrc {
    /// Get the current CRC value
    pub fn value(&self) -> u8 {
        self.0
    }

    const fn shift(mut crc: u8) -> u8 {
        let mut bit = 0;
        while bit < 8 {
            if crc & 0x1 == 0x1 {
                crc = (crc >> 1) ^ 0x8c;
            } else {
                crc >>= 1;
            }
            bit += 1;
        }
        crc
    }

    /// Update the CRC with the incoming byte.
    pub fn update(&mut self, byte: u8) {
        #[cfg(feature = "crc-table")]
        {
            self.0 = CRC_TABLE[(self.0 ^ byte) as usize];
        }
        #[cfg(not(feature = "crc-table"))]
        {
            self.0 = Self::shift(self.0 ^ byte);
        }
    }

    /// CRC of `sequence`.
    pub fn compute(sequence: &[u8]) -> u8 {
        let mut crc = OneWireCrc(0);
        for &byte in sequence.iter() {
            crc.update(byte);
        }
        crc.0
    }

    /// Validate a sequence of bytes where the last byte is the 1-Wire CRC of
    /// the previous bytes.
    pub fn validate(sequence: &[u8]) -> bool {
        // running the CRC over its own checksum yields zero
        Self::compute(sequence) == 0x0
    }
}

#[cfg(test)]
mod tests {
    use super::OneWireCrc;

    #[test]
    fn known_crc() {
        let data = [0x02, 0x4e, 0xb8, 0x1c, 0x46, 0x7f, 0xff, 0x0c];
        assert_eq!(OneWireCrc::compute(&data), 0xbe);
    }

    #[test]
    fn rom_code_validates() {
        let rom = [0x28, 0xff, 0x64, 0x1e, 0x0f, 0x6e, 0x3c, 0xaf];
        assert!(OneWireCrc::validate(&rom));
        let mut corrupted = rom;
        corrupted[3] ^= 0x10;
        assert!(!OneWireCrc::validate(&corrupted));
    }

    #[test]
    fn incremental_matches_compute() {
        let data = [0x90, 0x01, 0x4b, 0x46, 0x7f, 0xff, 0x10, 0x10];
        let mut crc = OneWireCrc::default();
        for &b in data.iter() {
            crc.update(b);
        }
        assert_eq!(crc.value(), 0x92);
        assert_eq!(crc.value(), OneWireCrc::compute(&data));
    }
}
