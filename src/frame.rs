//! Frame model.
//!
//! A frame is the fixed 38-byte unit of the wire protocol. Three kinds are
//! transmitted:
//!
//! - [`TextLineFrame`]: one line of page text, rows 1..=9.
//! - [`PageHeaderFrame`]: row 0, announces a page, its address and the
//!   attributes of every line that follows.
//! - [`TimeOfDayFrame`]: row 0, sets the receiver clock.
//!
//! Header and time-of-day frames are *control frames*: they carry the
//! Output Mode Control Word, which is injected from the live [`Omcw`] every
//! time the frame is serialized. A control frame built before a mode change
//! therefore goes out with the new mode.
//!
//! ## Layout
//!
//! ```text
//!  0  1  2  3   4 ..                                              37
//! [55 55 27 row ... frame specific ...                              ]
//! ```
//!
//! The preamble (bytes 0..3) is never Hamming coded. Text frames code only
//! the row and size bytes; control frames code everything after the
//! preamble.

use chrono::{Datelike, NaiveDateTime, Timelike};

use crate::address::Address;
use crate::attributes::{PageAttributes, TextLineAttributes};
use crate::consts::{
    ADDRESS_LEN, ADDRESS_OFFSET, ALTERNATE_TIME_OFFSET, ATTRIBUTE_SLOTS, CLOCK_RUN_IN, CONTROL_ROW,
    FRAME_LEN, FRAMING_CODE, HEADER_RESERVED_OFFSET, LAST_LINE_ATTRIBUTES_OFFSET,
    LINE_ATTRIBUTES_OFFSET, LINE_COUNT_OFFSET, MAX_LINES, MODE_WORD_FRAME_LEN, MODE_WORD_OFFSET,
    PAGE_ATTRIBUTES_OFFSET, PAGE_NUMBER_OFFSET, PREAMBLE_LEN, ROW_OFFSET, TEXT_FILLER, TEXT_OFFSET,
    TEXT_SIZE_OFFSET, TIME_CHECKSUM_OFFSET, TIME_FIELDS_LEN, TIME_FIELDS_OFFSET, TIME_OF_DAY_PAGE,
};
use crate::encoding::{encode_char, hamming_encode_in_place};
use crate::error::{Error, Result};
use crate::omcw::Omcw;

/// Returns a buffer holding the preamble and the raw row number.
fn preamble(row: u8) -> [u8; FRAME_LEN] {
    let mut buf = [0u8; FRAME_LEN];
    buf[..2].copy_from_slice(&CLOCK_RUN_IN);
    buf[2] = FRAMING_CODE;
    buf[ROW_OFFSET] = row;
    buf
}

/// Writes the Hamming coded mode word into a control frame buffer.
fn inject_mode_word(buf: &mut [u8; FRAME_LEN], word: &Omcw) {
    let nibbles = word.to_bytes();
    let slot = &mut buf[MODE_WORD_OFFSET..MODE_WORD_OFFSET + MODE_WORD_FRAME_LEN];
    slot.copy_from_slice(&nibbles[..MODE_WORD_FRAME_LEN]);
    hamming_encode_in_place(slot);
}

/// Splits a byte into its high and low nibble.
fn nibbles(value: u8) -> [u8; 2] {
    [value >> 4, value & 0x0f]
}

/// Splits a decimal value `0..=99` into tens and units digits.
fn bcd(value: u8) -> [u8; 2] {
    [value / 10, value % 10]
}

/// One line of page text.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct TextLineFrame {
    row: u8,
    bytes: [u8; FRAME_LEN],
}

impl TextLineFrame {
    /// Builds a text line for `row`, `1..=9`.
    ///
    /// Characters beyond the line capacity are dropped.
    pub fn new(row: u8, attrs: &TextLineAttributes, text: &str) -> Result<Self> {
        Self::with_size(row, attrs.size_nibble(), text)
    }

    /// Builds a text line from a raw size nibble.
    pub fn with_size(row: u8, size: u8, text: &str) -> Result<Self> {
        if row == CONTROL_ROW || usize::from(row) > MAX_LINES {
            return Err(Error::InvalidInput("text row must be 1..=9"));
        }
        let mut bytes = preamble(row);
        bytes[TEXT_SIZE_OFFSET] = size & 0x0f;
        hamming_encode_in_place(&mut bytes[ROW_OFFSET..TEXT_OFFSET]);

        let payload = &mut bytes[TEXT_OFFSET..];
        payload.fill(TEXT_FILLER);
        for (cell, c) in payload.iter_mut().zip(text.chars()) {
            *cell = encode_char(c);
        }
        Ok(Self { row, bytes })
    }

    /// Row this line is displayed on.
    pub fn row(&self) -> u8 {
        self.row
    }

    /// Encoded frame bytes.
    pub fn as_bytes(&self) -> &[u8; FRAME_LEN] {
        &self.bytes
    }
}

/// Page header: announces a page and the attributes of its lines.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PageHeaderFrame {
    bytes: [u8; FRAME_LEN],
}

impl PageHeaderFrame {
    /// Builds a header.
    ///
    /// `line_attributes[7]` applies to both line 8 and line 9.
    pub fn new(
        page_number: u8,
        address: &Address,
        line_count: u8,
        page_attributes: &PageAttributes,
        line_attributes: &[TextLineAttributes; ATTRIBUTE_SLOTS],
    ) -> Result<Self> {
        if usize::from(line_count) > MAX_LINES {
            return Err(Error::InvalidInput("a page holds at most 9 lines"));
        }
        if page_number == TIME_OF_DAY_PAGE {
            return Err(Error::InvalidInput("page 0xFF is reserved for the clock"));
        }
        let mut bytes = preamble(CONTROL_ROW);
        bytes[PAGE_NUMBER_OFFSET..PAGE_NUMBER_OFFSET + 2].copy_from_slice(&nibbles(page_number));
        bytes[ADDRESS_OFFSET..ADDRESS_OFFSET + ADDRESS_LEN].copy_from_slice(&address.to_bytes());
        bytes[LINE_COUNT_OFFSET] = line_count;
        bytes[PAGE_ATTRIBUTES_OFFSET..PAGE_ATTRIBUTES_OFFSET + 2]
            .copy_from_slice(&page_attributes.to_bytes());

        let (first_seven, last) = line_attributes.split_at(ATTRIBUTE_SLOTS - 1);
        let pairs = &mut bytes[LINE_ATTRIBUTES_OFFSET..HEADER_RESERVED_OFFSET];
        for (pair, attrs) in pairs.chunks_exact_mut(2).zip(first_seven) {
            pair.copy_from_slice(&attrs.to_bytes());
        }
        bytes[LAST_LINE_ATTRIBUTES_OFFSET..LAST_LINE_ATTRIBUTES_OFFSET + 2]
            .copy_from_slice(&last[0].to_bytes());

        hamming_encode_in_place(&mut bytes[PREAMBLE_LEN..]);
        Ok(Self { bytes })
    }
}

/// Receiver clock setting.
///
/// `hour` is 24-hour; the frame carries it as 12-hour plus AM/PM.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct TimeOfDay {
    /// Timezone nibble, as configured on the unit's switch bank.
    pub timezone: u8,
    /// Day of week, 1 = Sunday .. 7 = Saturday.
    pub weekday: u8,
    /// Month, 1..=12.
    pub month: u8,
    /// Day of month, 1..=31.
    pub day: u8,
    /// Hour, 0..=23.
    pub hour: u8,
    /// Minute, 0..=59.
    pub minute: u8,
    /// Second, 0..=59.
    pub second: u8,
}

impl TimeOfDay {
    /// Converts a calendar timestamp into a clock setting.
    pub fn from_datetime(timezone: u8, datetime: &NaiveDateTime) -> Self {
        Self {
            timezone,
            weekday: datetime.weekday().number_from_sunday() as u8,
            month: datetime.month() as u8,
            day: datetime.day() as u8,
            hour: datetime.hour() as u8,
            minute: datetime.minute() as u8,
            second: datetime.second() as u8,
        }
    }

    fn validate(&self) -> Result<()> {
        let in_range = self.timezone <= 0x0f
            && (1..=7).contains(&self.weekday)
            && (1..=12).contains(&self.month)
            && (1..=31).contains(&self.day)
            && self.hour <= 23
            && self.minute <= 59
            && self.second <= 59;
        if in_range {
            Ok(())
        } else {
            Err(Error::InvalidInput("time of day field out of range"))
        }
    }

    /// The eleven checksummed nibbles, timezone through AM/PM.
    fn to_nibbles(self) -> [u8; TIME_FIELDS_LEN] {
        let pm = self.hour >= 12;
        let hour12 = match self.hour % 12 {
            0 => 12,
            h => h,
        };
        let [day_tens, day_units] = bcd(self.day);
        let [minute_tens, minute_units] = bcd(self.minute);
        let [second_tens, second_units] = bcd(self.second);
        [
            self.timezone,
            self.weekday,
            self.month,
            day_tens,
            day_units,
            hour12,
            minute_tens,
            minute_units,
            second_tens,
            second_units,
            u8::from(pm),
        ]
    }
}

/// Receiver clock frame.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct TimeOfDayFrame {
    bytes: [u8; FRAME_LEN],
}

impl TimeOfDayFrame {
    /// Builds a time-of-day frame.
    pub fn new(time: &TimeOfDay) -> Result<Self> {
        time.validate()?;
        let mut bytes = preamble(CONTROL_ROW);
        bytes[PAGE_NUMBER_OFFSET..PAGE_NUMBER_OFFSET + 2]
            .copy_from_slice(&nibbles(TIME_OF_DAY_PAGE));

        let fields = time.to_nibbles();
        bytes[TIME_FIELDS_OFFSET..ALTERNATE_TIME_OFFSET].copy_from_slice(&fields);
        // Alternate time block stays zero.
        let sum: u32 = fields.iter().map(|&n| u32::from(n)).sum();
        let checksum = (sum % 100) as u8;
        bytes[TIME_CHECKSUM_OFFSET..].copy_from_slice(&bcd(checksum));

        hamming_encode_in_place(&mut bytes[PREAMBLE_LEN..]);
        Ok(Self { bytes })
    }
}

/// Any transmittable frame.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Frame {
    /// Page text.
    TextLine(TextLineFrame),
    /// Page header (control frame).
    PageHeader(PageHeaderFrame),
    /// Receiver clock (control frame).
    TimeOfDay(TimeOfDayFrame),
}

impl Frame {
    /// Whether the frame carries the live mode word.
    pub fn is_control(&self) -> bool {
        !matches!(self, Frame::TextLine(_))
    }

    /// Serializes the frame, injecting `word` into control frames.
    pub fn to_bytes(&self, word: &Omcw) -> [u8; FRAME_LEN] {
        match self {
            Frame::TextLine(f) => f.bytes,
            Frame::PageHeader(PageHeaderFrame { bytes })
            | Frame::TimeOfDay(TimeOfDayFrame { bytes }) => {
                let mut bytes = *bytes;
                inject_mode_word(&mut bytes, word);
                bytes
            }
        }
    }

    /// Uppercase hex rendering of the serialized frame.
    #[cfg(feature = "std")]
    pub fn to_hex(&self, word: &Omcw) -> String {
        hex::encode_upper(self.to_bytes(word))
    }
}

impl From<TextLineFrame> for Frame {
    fn from(frame: TextLineFrame) -> Self {
        Frame::TextLine(frame)
    }
}

impl From<PageHeaderFrame> for Frame {
    fn from(frame: PageHeaderFrame) -> Self {
        Frame::PageHeader(frame)
    }
}

impl From<TimeOfDayFrame> for Frame {
    fn from(frame: TimeOfDayFrame) -> Self {
        Frame::TimeOfDay(frame)
    }
}
