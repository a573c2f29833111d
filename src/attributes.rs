//! Page and text line attributes.
//!
//! Both types pack their boolean flags and small enums into nibbles, which
//! the frame layer later passes through the Hamming codec.

/// Per-page display flags carried by the page header.
#[derive(Debug, Default, Clone, Copy, PartialEq, Eq)]
pub struct PageAttributes {
    /// Hold the page on screen until replaced.
    pub freeze: bool,
    /// Page is a weather advisory.
    pub advisory: bool,
    /// Page is a weather warning.
    pub warning: bool,
    /// Flip to the page immediately.
    pub flip: bool,
    /// Roll the page in line by line.
    pub roll: bool,
    /// Chain to the next page.
    pub chain: bool,
}

impl PageAttributes {
    /// Packs the flags into two nibbles.
    pub fn to_bytes(&self) -> [u8; 2] {
        [
            u8::from(self.freeze) << 2 | u8::from(self.advisory) << 1 | u8::from(self.warning),
            u8::from(self.flip) << 2 | u8::from(self.roll) << 1 | u8::from(self.chain),
        ]
    }
}

/// Foreground colour of a text line.
#[derive(Debug, Default, Clone, Copy, PartialEq, Eq)]
#[repr(u8)]
#[allow(missing_docs)]
pub enum Color {
    Black = 0,
    Blue = 1,
    Green = 2,
    Cyan = 3,
    Red = 4,
    Magenta = 5,
    Yellow = 6,
    #[default]
    White = 7,
}

/// Horizontal character size.
#[derive(Debug, Default, Clone, Copy, PartialEq, Eq)]
#[repr(u8)]
pub enum TextWidth {
    /// Normal width.
    #[default]
    Single = 0,
    /// Double width.
    Double = 1,
}

/// Vertical character size.
#[derive(Debug, Default, Clone, Copy, PartialEq, Eq)]
#[repr(u8)]
pub enum TextHeight {
    /// Normal height.
    Single = 0,
    /// Double height.
    #[default]
    Double = 1,
    /// Triple height.
    Triple = 2,
}

/// Rendering attributes of one text line.
///
/// The size goes into the text line frame itself; the flags and colour go
/// into the page header as an attribute pair.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct TextLineAttributes {
    /// Draw a separator under the line.
    pub separator: bool,
    /// Flash the line.
    pub flash: bool,
    /// Reverse video.
    pub reverse: bool,
    /// Draw a border around the line.
    pub border: bool,
    /// Foreground colour.
    pub color: Color,
    /// Character width.
    pub width: TextWidth,
    /// Character height.
    pub height: TextHeight,
}

impl Default for TextLineAttributes {
    fn default() -> Self {
        Self {
            separator: false,
            flash: false,
            reverse: false,
            border: true,
            color: Color::White,
            width: TextWidth::Single,
            height: TextHeight::Double,
        }
    }
}

impl TextLineAttributes {
    /// Size nibble written to byte 4 of the text line frame.
    pub fn size_nibble(&self) -> u8 {
        (self.height as u8) << 1 | self.width as u8
    }

    /// Attribute pair written to the page header.
    pub fn to_bytes(&self) -> [u8; 2] {
        [
            u8::from(self.separator) << 3
                | u8::from(self.flash) << 2
                | u8::from(self.reverse) << 1
                | u8::from(self.border),
            self.color as u8,
        ]
    }
}
