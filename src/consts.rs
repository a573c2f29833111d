//! Constants used across the STAR frame protocol.
//!
//! This module defines the fixed wire layout of a frame: the preamble that
//! lets the receiver lock onto the bitstream, the byte offsets of each
//! frame-type specific field, and the capacities that bound pages and text
//! lines.
//!
//! ## Key Concepts
//!
//! - **Preamble**: Clock run-in plus framing code. Transmitted raw, never
//!   Hamming coded.
//! - **Row**: Byte 3 of every frame. Zero for control frames, 1..=9 for
//!   text lines.
//! - **Mode word slot**: Control frames (page header, time of day) carry the
//!   live output mode control word right after the row byte.
//! - **Attribute slots**: A page header only has room for eight line
//!   attribute pairs. The ninth text line shares the eighth slot.
//!
//! Every offset here is a byte index into the 38-byte frame buffer.

/// Total length (in bytes) of one frame on the wire.
pub const FRAME_LEN: usize = 38;

/// Clock run-in bytes at the start of every frame.
///
/// Alternating bits give the receiver's data slicer something to lock on to.
pub const CLOCK_RUN_IN: [u8; 2] = [0x55, 0x55];

/// Framing code following the clock run-in.
pub const FRAMING_CODE: u8 = 0x27;

/// Length of the raw (uncoded) preamble: clock run-in plus framing code.
pub const PREAMBLE_LEN: usize = 3;

/// Offset of the row number byte.
pub const ROW_OFFSET: usize = 3;

/// Row number used by every control frame.
pub const CONTROL_ROW: u8 = 0;

/// Offset of the text size nibble in a text line frame.
pub const TEXT_SIZE_OFFSET: usize = 4;

/// Offset of the first character of a text line.
pub const TEXT_OFFSET: usize = 5;

/// Number of characters a single text line frame can carry.
///
/// Anything past this is dropped when the frame is built.
pub const TEXT_CAPACITY: usize = FRAME_LEN - TEXT_OFFSET;

/// Filler written to unused character cells of a text line.
pub const TEXT_FILLER: u8 = 0x20;

/// Offset of the output mode control word inside a control frame.
pub const MODE_WORD_OFFSET: usize = 4;

/// Number of mode word nibbles carried by a control frame.
pub const MODE_WORD_FRAME_LEN: usize = 5;

/// Length of a committed output mode control word.
pub const MODE_WORD_LEN: usize = 6;

/// Offset of the two page number nibbles inside a control frame.
pub const PAGE_NUMBER_OFFSET: usize = MODE_WORD_OFFSET + MODE_WORD_FRAME_LEN;

/// Offset of the unit address inside a page header.
pub const ADDRESS_OFFSET: usize = PAGE_NUMBER_OFFSET + 2;

/// Length of a packed unit address.
pub const ADDRESS_LEN: usize = 6;

/// Offset of the line count inside a page header.
pub const LINE_COUNT_OFFSET: usize = ADDRESS_OFFSET + ADDRESS_LEN;

/// Offset of the page attributes inside a page header.
pub const PAGE_ATTRIBUTES_OFFSET: usize = LINE_COUNT_OFFSET + 1;

/// Offset of the attribute pair for line 1 inside a page header.
///
/// Lines 1 through 7 follow back to back.
pub const LINE_ATTRIBUTES_OFFSET: usize = PAGE_ATTRIBUTES_OFFSET + 2;

/// Offset of the two reserved bytes between line 7 and line 8 attributes.
pub const HEADER_RESERVED_OFFSET: usize = LINE_ATTRIBUTES_OFFSET + 7 * 2;

/// Offset of the attribute pair shared by lines 8 and 9.
pub const LAST_LINE_ATTRIBUTES_OFFSET: usize = HEADER_RESERVED_OFFSET + 2;

/// Maximum number of text lines on one page.
pub const MAX_LINES: usize = 9;

/// Number of independent line attribute slots in a page header.
pub const ATTRIBUTE_SLOTS: usize = 8;

/// Maximum number of frames a page expands to: one header plus the lines.
pub const PAGE_MAX_FRAMES: usize = MAX_LINES + 1;

/// Page number reserved for time-of-day frames.
pub const TIME_OF_DAY_PAGE: u8 = 0xFF;

/// Page number of the canned idle page.
pub const IDLE_PAGE: u8 = 0;

/// Offset of the first time-of-day field (the timezone nibble).
pub const TIME_FIELDS_OFFSET: usize = PAGE_NUMBER_OFFSET + 2;

/// Number of nibbles covered by the time-of-day checksum.
pub const TIME_FIELDS_LEN: usize = 11;

/// Offset of the unused alternate time block.
pub const ALTERNATE_TIME_OFFSET: usize = TIME_FIELDS_OFFSET + TIME_FIELDS_LEN;

/// Offset of the two checksum digits of a time-of-day frame.
pub const TIME_CHECKSUM_OFFSET: usize = FRAME_LEN - 2;

/// Largest top page number the mode word can carry.
pub const MAX_TOP_PAGE: u16 = 0x3FF;
