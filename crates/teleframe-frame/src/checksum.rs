//! Running CRC-16/MCRF4XX (X.25 polynomial, non-reflected output) checksum.
//!
//! The accumulator is seeded with `0xFFFF` so that leading zero bytes still
//! change the result, and is updated one byte at a time. That lets the parser
//! validate a frame as it arrives without keeping the raw bytes around.

/// Seed value of a fresh accumulator.
pub const CHECKSUM_SEED: u16 = 0xFFFF;

/// Incremental 16-bit frame checksum.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Checksum(u16);

impl Checksum {
    /// Start a new accumulation.
    pub const fn new() -> Self {
        Self(CHECKSUM_SEED)
    }

    /// Compute the checksum of a complete byte slice.
    pub fn calculate(bytes: &[u8]) -> Self {
        let mut crc = Self::new();
        crc.accumulate_slice(bytes);
        crc
    }

    /// Fold one byte into the accumulator.
    pub fn accumulate(&mut self, byte: u8) {
        let mut tmp = byte ^ (self.0 & 0xFF) as u8;
        tmp ^= tmp << 4;
        let tmp = u16::from(tmp);
        self.0 = (self.0 >> 8) ^ (tmp << 8) ^ (tmp << 3) ^ (tmp >> 4);
    }

    /// Fold every byte of `bytes`, in order.
    pub fn accumulate_slice(&mut self, bytes: &[u8]) {
        for &byte in bytes {
            self.accumulate(byte);
        }
    }

    /// The current 16-bit value.
    pub const fn value(self) -> u16 {
        self.0
    }

    /// First trailer byte on the wire.
    pub const fn low(self) -> u8 {
        (self.0 & 0xFF) as u8
    }

    /// Second trailer byte on the wire.
    pub const fn high(self) -> u8 {
        (self.0 >> 8) as u8
    }

    /// Trailer bytes in wire order.
    pub const fn to_bytes(self) -> [u8; 2] {
        [self.low(), self.high()]
    }
}

impl Default for Checksum {
    fn default() -> Self {
        Self::new()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn fresh_accumulator_is_seeded() {
        assert_eq!(Checksum::new().value(), 0xFFFF);
        assert_eq!(Checksum::default(), Checksum::new());
    }

    #[test]
    fn matches_mcrf4xx_check_value() {
        // Standard check input for CRC-16/MCRF4XX.
        assert_eq!(Checksum::calculate(b"123456789").value(), 0x6F91);
    }

    #[test]
    fn empty_input_keeps_seed() {
        assert_eq!(Checksum::calculate(&[]).value(), CHECKSUM_SEED);
    }

    #[test]
    fn leading_zero_bytes_change_result() {
        let a = Checksum::calculate(&[0x01, 0x02]);
        let b = Checksum::calculate(&[0x00, 0x01, 0x02]);
        assert_ne!(a, b);
    }

    #[test]
    fn incremental_equals_one_shot() {
        let data = [0x04, 0x00, 0x01, 0x01, 0x00, 0x01, 0x02, 0x03, 0x04];
        let mut crc = Checksum::new();
        for &b in &data {
            crc.accumulate(b);
        }
        assert_eq!(crc, Checksum::calculate(&data));
    }

    #[test]
    fn trailer_bytes_split_low_then_high() {
        let crc = Checksum::calculate(b"123456789");
        assert_eq!(crc.low(), 0x91);
        assert_eq!(crc.high(), 0x6F);
        assert_eq!(crc.to_bytes(), [0x91, 0x6F]);
    }
}
