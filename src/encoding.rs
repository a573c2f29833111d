//! Hamming 8/4 nibble protection and odd-parity text encoding.
//!
//! The receiver's data slicer expects every control field as a Hamming 8/4
//! coded byte: four data bits interleaved with four protection bits, so a
//! single bit error can be corrected and a double error detected. Text
//! characters travel as 7-bit codes with an odd parity bit in bit 7.
//!
//! ## Symbol Table
//!
//! The encoder maps each 4-bit nibble to a fixed byte from a 16-entry lookup
//! table. Only 16 of the 256 possible byte values are valid codewords.
//!
//! ## Functions
//!
//! - [`hamming_encode`]: Converts a single nibble into its codeword
//! - [`hamming_encode_in_place`]: Encodes a buffer of nibbles in place
//! - [`odd_parity`]: Converts a 7-bit character into its transmitted form
//! - [`encode_char`]: Maps a `char` onto the receiver's character set
//!
//! ## Limitations
//!
//! - Out-of-range nibbles encode to `0x00` rather than failing; every call
//!   site in this crate only ever supplies true nibbles.
//! - The receiver character set is 7-bit ASCII with the degree glyph at
//!   `0x7F`; other characters are replaced by `?`.

static HAMMING_8_4: [u8; 16] = [
    0x15, 0x02, 0x49, 0x5e, 0x64, 0x73, 0x38, 0x2f, 0xd0, 0xc7, 0x8c, 0x9b, 0xa1, 0xb6, 0xfd, 0xea,
];

/// Value returned by [`hamming_encode`] for inputs that are not nibbles.
pub const HAMMING_SENTINEL: u8 = 0x00;

/// ASCII code that callers use to request a degree sign.
pub const DEGREE_SOURCE: u8 = b'`';

/// Code of the degree glyph in the receiver character set.
pub const DEGREE_GLYPH: u8 = 0x7f;

/// Encodes a nibble into its Hamming 8/4 codeword.
///
/// Returns [`HAMMING_SENTINEL`] for anything above `0x0F`.
pub fn hamming_encode(nibble: u8) -> u8 {
    HAMMING_8_4
        .get(nibble as usize)
        .copied()
        .unwrap_or(HAMMING_SENTINEL)
}

/// Encodes every byte of `buf` (each holding a nibble) in place.
pub fn hamming_encode_in_place(buf: &mut [u8]) {
    for b in buf.iter_mut() {
        *b = hamming_encode(*b);
    }
}

/// Converts a 7-bit character into its odd-parity transmitted byte.
///
/// The degree request code is remapped to the degree glyph first. Bit 7 is
/// then set only when needed to make the total population count odd.
pub fn odd_parity(code: u8) -> u8 {
    let code = if code == DEGREE_SOURCE {
        DEGREE_GLYPH
    } else {
        code & 0x7f
    };
    if code.count_ones() % 2 == 1 {
        code
    } else {
        code | 0x80
    }
}

/// Maps a character onto the receiver character set and applies odd parity.
pub fn encode_char(c: char) -> u8 {
    let code = match c {
        '°' => DEGREE_SOURCE,
        c if c.is_ascii() => c as u8,
        _ => b'?',
    };
    odd_parity(code)
}
