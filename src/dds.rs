//! FSK tone programming for the DDS modulator chip.
//!
//! The modulator is a direct digital synthesizer with two frequency
//! registers. The FIFO's serial output selects between them, so one
//! register holds the space tone and the other the mark tone.
//!
//! Programming is a control word followed by four 14-bit frequency words,
//! each framed on its own (see [`crate::bus::StarBus::program_dds`]):
//!
//! | word | bits 15..14 | bits 13..0 |
//! |------|-------------|------------|
//! | control | `00` | `1` in bit 13 (28-bit two-write mode) |
//! | space low | `01` | tuning word bits 13..0 |
//! | space high | `01` | tuning word bits 27..14 |
//! | mark low | `10` | tuning word bits 13..0 |
//! | mark high | `10` | tuning word bits 27..14 |

/// Control word: consecutive writes load 14 LSBs then 14 MSBs.
pub const DDS_CONTROL_WORD: u16 = 0x2000;

/// Register select bits for frequency register 0 (space).
pub const DDS_FREQ0: u16 = 0x4000;

/// Register select bits for frequency register 1 (mark).
pub const DDS_FREQ1: u16 = 0x8000;

const HALF_WORD_MASK: u32 = 0x3fff;

/// Number of words in one programming sequence.
pub const DDS_PROGRAM_LEN: usize = 5;

/// Master clock and tone frequencies of the modulator.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct DdsTones {
    /// DDS master clock in hertz.
    pub master_clock_hz: u32,
    /// Space (logical 0) tone in hertz.
    pub space_hz: u32,
    /// Mark (logical 1) tone in hertz.
    pub mark_hz: u32,
}

impl Default for DdsTones {
    fn default() -> Self {
        Self {
            master_clock_hz: 25_000_000,
            space_hz: 1_200,
            mark_hz: 2_200,
        }
    }
}

impl DdsTones {
    /// 28-bit tuning word for `freq_hz`: `freq * 2^28 / mclk`.
    pub fn tuning_word(&self, freq_hz: u32) -> u32 {
        if self.master_clock_hz == 0 {
            return 0;
        }
        let word = (u64::from(freq_hz) << 28) / u64::from(self.master_clock_hz);
        (word as u32) & 0x0fff_ffff
    }

    /// Control word followed by the space and mark frequency words.
    pub fn program_words(&self) -> [u16; DDS_PROGRAM_LEN] {
        let space = self.tuning_word(self.space_hz);
        let mark = self.tuning_word(self.mark_hz);
        [
            DDS_CONTROL_WORD,
            DDS_FREQ0 | (space & HALF_WORD_MASK) as u16,
            DDS_FREQ0 | ((space >> 14) & HALF_WORD_MASK) as u16,
            DDS_FREQ1 | (mark & HALF_WORD_MASK) as u16,
            DDS_FREQ1 | ((mark >> 14) & HALF_WORD_MASK) as u16,
        ]
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_default_program_words() {
        let tones = DdsTones::default();
        // 1200 * 2^28 / 25e6 = 12884, 2200 * 2^28 / 25e6 = 23622
        assert_eq!(tones.tuning_word(1_200), 12_884);
        assert_eq!(tones.tuning_word(2_200), 23_622);
        assert_eq!(
            tones.program_words(),
            [0x2000, 0x7254, 0x4000, 0x9c46, 0x8001]
        );
    }

    #[test]
    fn test_tuning_word_splits_across_halves() {
        let tones = DdsTones {
            master_clock_hz: 1 << 20,
            space_hz: 1 << 10,
            mark_hz: (1 << 19) + 3,
        };
        // space: 2^10 * 2^28 / 2^20 = 2^18; mark: (2^19 + 3) * 2^8
        let words = tones.program_words();
        assert_eq!(words[1], DDS_FREQ0);
        assert_eq!(words[2], DDS_FREQ0 | (1 << 4));
        assert_eq!(words[3], DDS_FREQ1 | 0x300);
        assert_eq!(words[4], DDS_FREQ1 | (1 << 13));
    }

    #[test]
    fn test_zero_clock_programs_silence() {
        let tones = DdsTones {
            master_clock_hz: 0,
            ..Default::default()
        };
        assert_eq!(tones.program_words(), [0x2000, 0x4000, 0x4000, 0x8000, 0x8000]);
    }
}
