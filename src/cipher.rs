//! Per-frame keystream cipher required by the receiver's demodulator.
//!
//! Every byte leaving the driver is whitened bit by bit with a keystream
//! derived from a 21-bit shift register fed back with its own output. The
//! register and a run counter restart from zero at the beginning of each
//! frame, so frames are independent of each other and the receiver can
//! resynchronise on any frame boundary.
//!
//! ## Per-bit step
//!
//! 1. Take the least significant remaining input bit.
//! 2. Tap = parity of register bits 2 and 19.
//! 3. If register bits 0 and 8 differ, the run counter restarts.
//! 4. The keystream bit is the inverted tap, except when the low five bits
//!    of the run counter are all set, where the tap is used as is.
//! 5. Output bit = input bit XOR keystream bit; it is shifted into the
//!    register and into the output byte (most significant bit first).

/// Register bits feeding the keystream tap.
const KEYSTREAM_TAPS: u32 = (1 << 2) | (1 << 19);

/// Register bits whose disagreement restarts the run counter.
const RUN_RESET_TAPS: u32 = (1 << 0) | (1 << 8);

/// Counter pattern that suppresses the keystream inversion.
const RUN_MASK: u32 = 0x1f;

/// Width of the feedback register. Only bits 0, 2, 8 and 19 are ever read.
const REGISTER_MASK: u32 = (1 << 21) - 1;

/// Bit-level stream cipher state.
#[derive(Debug, Default, Clone, PartialEq, Eq)]
pub struct Cipher {
    reg: u32,
    count: u32,
}

impl Cipher {
    /// Creates a cipher in its reset state.
    pub fn new() -> Self {
        Self::default()
    }

    /// Clears the register and the run counter. Call once per frame.
    pub fn reset(&mut self) {
        self.reg = 0;
        self.count = 0;
    }

    /// Encrypts a single byte, advancing the state by eight bits.
    pub fn encrypt_byte(&mut self, byte: u8) -> u8 {
        let mut input = byte;
        let mut out = 0u8;
        for _ in 0..8 {
            let carry = u32::from(input & 1);
            input >>= 1;

            let tap = (self.reg & KEYSTREAM_TAPS).count_ones() & 1;
            if (self.reg & RUN_RESET_TAPS).count_ones() & 1 == 1 {
                self.count = 0;
            }
            let keystream = if self.count & RUN_MASK == RUN_MASK {
                tap
            } else {
                tap ^ 1
            };
            let bit = carry ^ keystream;

            self.reg = ((self.reg << 1) | bit) & REGISTER_MASK;
            self.count = self.count.wrapping_add(1);
            out = (out << 1) | bit as u8;
        }
        out
    }

    /// Encrypts `buf` in place, continuing from the current state.
    pub fn encrypt_in_place(&mut self, buf: &mut [u8]) {
        for b in buf.iter_mut() {
            *b = self.encrypt_byte(*b);
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_reset_state_is_zero() {
        let mut cipher = Cipher::new();
        let _ = cipher.encrypt_byte(0xa5);
        cipher.reset();
        assert_eq!(cipher, Cipher::default());
    }

    #[test]
    fn test_zero_byte_from_reset() {
        // Three inverted zero taps, then the first ones reach bit 2.
        let mut cipher = Cipher::new();
        assert_eq!(cipher.encrypt_byte(0x00), 0xe3);
    }

    #[test]
    fn test_golden_vector() {
        let plain = [
            0x55, 0x55, 0x27, 0x15, 0x15, 0x00, 0xff, 0x01, 0x80, 0x7f, 0x48, 0x69, 0x20, 0x21,
            0x0f, 0xf0,
        ];
        let expected = [
            0x5e, 0x85, 0xab, 0xc7, 0xf3, 0x27, 0x8e, 0x9e, 0x4f, 0x09, 0x2c, 0x1a, 0x2c, 0x3d,
            0x0c, 0xa7,
        ];
        let mut cipher = Cipher::new();
        let mut buf = plain;
        cipher.encrypt_in_place(&mut buf);
        assert_eq!(buf, expected);
    }

    #[test]
    fn test_frames_are_independent() {
        let data = [0x12, 0x34, 0x56, 0x78];
        let mut cipher = Cipher::new();
        let mut first = data;
        cipher.encrypt_in_place(&mut first);

        let mut noise = [0xde, 0xad, 0xbe, 0xef];
        cipher.encrypt_in_place(&mut noise);

        cipher.reset();
        let mut second = data;
        cipher.encrypt_in_place(&mut second);
        assert_eq!(first, second);
    }

    #[test]
    fn test_register_stays_within_width() {
        let mut cipher = Cipher::new();
        for _ in 0..76 {
            let _ = cipher.encrypt_byte(0x00);
        }
        assert_eq!(cipher.reg & !REGISTER_MASK, 0);
        assert!(cipher.reg != 0);
    }
}
