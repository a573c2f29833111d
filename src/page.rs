//! Page composition.
//!
//! A page is one header frame followed by up to nine text line frames in
//! row order. [`PageBuilder`] collects the lines and their attributes and
//! [`PageBuilder::build`] emits the finished [`Page`].
//!
//! The header only has eight attribute slots. The ninth line is rendered
//! with the eighth line's attributes, both in the header and in its own
//! size nibble.

use heapless::Vec;

use crate::address::Address;
use crate::attributes::{PageAttributes, TextLineAttributes};
use crate::consts::{ATTRIBUTE_SLOTS, IDLE_PAGE, MAX_LINES, PAGE_MAX_FRAMES};
use crate::error::{Error, Result};
use crate::frame::{Frame, PageHeaderFrame, TextLineFrame};
#[cfg(feature = "std")]
use crate::omcw::Omcw;

/// Collects lines for one page.
#[derive(Debug, Clone)]
pub struct PageBuilder {
    page_number: u8,
    address: Address,
    attributes: PageAttributes,
    slots: Vec<TextLineAttributes, ATTRIBUTE_SLOTS>,
    lines: Vec<TextLineFrame, MAX_LINES>,
}

impl PageBuilder {
    /// Starts an empty page.
    ///
    /// Page `0xFF` is the receiver clock; [`build`](PageBuilder::build)
    /// rejects it.
    pub fn new(page_number: u8, address: Address) -> Self {
        Self {
            page_number,
            address,
            attributes: PageAttributes::default(),
            slots: Vec::new(),
            lines: Vec::new(),
        }
    }

    /// Sets the page-wide display flags.
    pub fn attributes(&mut self, attributes: PageAttributes) -> &mut Self {
        self.attributes = attributes;
        self
    }

    /// Appends a line with the default attributes.
    pub fn add_line(&mut self, text: &str) -> Result<&mut Self> {
        self.add_line_with(text, TextLineAttributes::default())
    }

    /// Appends a line with explicit attributes.
    ///
    /// Only the first eight lines record their attributes; a ninth line
    /// takes the eighth line's. A tenth line is rejected.
    pub fn add_line_with(&mut self, text: &str, attrs: TextLineAttributes) -> Result<&mut Self> {
        if self.lines.is_full() {
            return Err(Error::InvalidInput("a page holds at most 9 lines"));
        }
        let rendered = if self.slots.is_full() {
            self.slots.last().copied().unwrap_or(attrs)
        } else {
            attrs
        };
        let row = self.lines.len() as u8 + 1;
        let line = TextLineFrame::new(row, &rendered, text)?;
        if !self.slots.is_full() {
            let _ = self.slots.push(attrs);
        }
        let _ = self.lines.push(line);
        Ok(self)
    }

    /// Number of lines added so far.
    pub fn line_count(&self) -> usize {
        self.lines.len()
    }

    /// Emits the header followed by every line in row order.
    pub fn build(&self) -> Result<Page> {
        let mut slots = [TextLineAttributes::default(); ATTRIBUTE_SLOTS];
        for (slot, attrs) in slots.iter_mut().zip(self.slots.iter()) {
            *slot = *attrs;
        }
        let header = PageHeaderFrame::new(
            self.page_number,
            &self.address,
            self.lines.len() as u8,
            &self.attributes,
            &slots,
        )?;

        let mut frames = Vec::new();
        let _ = frames.push(Frame::PageHeader(header));
        for line in &self.lines {
            let _ = frames.push(Frame::TextLine(line.clone()));
        }
        Ok(Page {
            page_number: self.page_number,
            frames,
        })
    }
}

/// An ordered run of frames that must reach the wire without interruption.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Page {
    page_number: u8,
    frames: Vec<Frame, PAGE_MAX_FRAMES>,
}

impl Page {
    /// Builds a page in one call from `(text, attributes)` pairs.
    pub fn compose(
        page_number: u8,
        address: Address,
        attributes: PageAttributes,
        lines: &[(&str, TextLineAttributes)],
    ) -> Result<Self> {
        let mut builder = PageBuilder::new(page_number, address);
        let _ = builder.attributes(attributes);
        for (text, attrs) in lines {
            let _ = builder.add_line_with(text, *attrs)?;
        }
        builder.build()
    }

    /// Canned page transmitted while nothing else is queued.
    ///
    /// A bare header addressed to no unit keeps the receivers' data slicers
    /// locked without changing what is on screen.
    pub fn idle() -> Self {
        let mut frames = Vec::new();
        let header = PageHeaderFrame::new(
            IDLE_PAGE,
            &Address::no_units(),
            0,
            &PageAttributes::default(),
            &[TextLineAttributes::default(); ATTRIBUTE_SLOTS],
        );
        if let Ok(header) = header {
            let _ = frames.push(Frame::PageHeader(header));
        }
        Self {
            page_number: IDLE_PAGE,
            frames,
        }
    }

    /// Page number announced by the header.
    pub fn page_number(&self) -> u8 {
        self.page_number
    }

    /// The header followed by the text lines.
    pub fn frames(&self) -> &[Frame] {
        &self.frames
    }

    /// Number of frames, header included.
    pub fn len(&self) -> usize {
        self.frames.len()
    }

    /// Whether the page has no frames at all.
    pub fn is_empty(&self) -> bool {
        self.frames.is_empty()
    }

    /// Uppercase hex of every serialized frame, concatenated.
    #[cfg(feature = "std")]
    pub fn to_hex(&self, word: &Omcw) -> String {
        self.frames.iter().map(|f| f.to_hex(word)).collect()
    }
}

impl<'a> IntoIterator for &'a Page {
    type Item = &'a Frame;
    type IntoIter = core::slice::Iter<'a, Frame>;

    fn into_iter(self) -> Self::IntoIter {
        self.frames.iter()
    }
}

/// Unit of work for the transmission queue.
///
/// A page travels as a single item so its frames can never interleave with
/// another producer's frames.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Transmission {
    /// A standalone frame, e.g. a time-of-day update.
    Frame(Frame),
    /// A complete page.
    Page(Page),
}

impl Transmission {
    /// Frames of this item in transmission order.
    pub fn frames(&self) -> &[Frame] {
        match self {
            Transmission::Frame(frame) => core::slice::from_ref(frame),
            Transmission::Page(page) => page.frames(),
        }
    }
}

impl From<Frame> for Transmission {
    fn from(frame: Frame) -> Self {
        Transmission::Frame(frame)
    }
}

impl From<Page> for Transmission {
    fn from(page: Page) -> Self {
        Transmission::Page(page)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::attributes::{Color, TextHeight, TextWidth};
    use crate::consts::{
        LAST_LINE_ATTRIBUTES_OFFSET, LINE_COUNT_OFFSET, TEXT_SIZE_OFFSET, TIME_OF_DAY_PAGE,
    };
    use crate::encoding::hamming_encode;
    use crate::omcw::{LdlStyle, OmcwBuilder};

    fn red_line() -> TextLineAttributes {
        TextLineAttributes {
            color: Color::Red,
            width: TextWidth::Double,
            height: TextHeight::Single,
            ..Default::default()
        }
    }

    #[test]
    fn test_empty_page_is_header_only() {
        let page = PageBuilder::new(7, Address::all_units()).build().unwrap();
        assert_eq!(page.len(), 1);
        assert_eq!(page.page_number(), 7);
        assert!(matches!(page.frames()[0], Frame::PageHeader(_)));
        let bytes = page.frames()[0].to_bytes(&Omcw::default());
        assert_eq!(bytes[LINE_COUNT_OFFSET], hamming_encode(0));
    }

    #[test]
    fn test_lines_follow_header_in_row_order() {
        let mut builder = PageBuilder::new(1, Address::all_units());
        for text in ["ONE", "TWO", "THREE"] {
            let _ = builder.add_line(text).unwrap();
        }
        let page = builder.build().unwrap();
        assert_eq!(page.len(), 4);
        for (i, frame) in page.frames()[1..].iter().enumerate() {
            match frame {
                Frame::TextLine(line) => assert_eq!(line.row() as usize, i + 1),
                other => panic!("expected text line, got {other:?}"),
            }
        }
    }

    #[test]
    fn test_nine_lines_share_last_slot() {
        let mut builder = PageBuilder::new(2, Address::all_units());
        for i in 0..7 {
            let _ = builder.add_line(&format!("LINE {i}")).unwrap();
        }
        let _ = builder.add_line_with("LINE 8", red_line()).unwrap();
        let _ = builder
            .add_line_with("LINE 9", TextLineAttributes::default())
            .unwrap();
        assert_eq!(builder.line_count(), 9);

        let page = builder.build().unwrap();
        assert_eq!(page.len(), 10);
        let word = Omcw::default();
        let header = page.frames()[0].to_bytes(&word);
        assert_eq!(header[LINE_COUNT_OFFSET], hamming_encode(9));
        let pair = red_line().to_bytes();
        assert_eq!(
            header[LAST_LINE_ATTRIBUTES_OFFSET..LAST_LINE_ATTRIBUTES_OFFSET + 2],
            [hamming_encode(pair[0]), hamming_encode(pair[1])]
        );

        let line8 = page.frames()[8].to_bytes(&word);
        let line9 = page.frames()[9].to_bytes(&word);
        assert_eq!(line8[TEXT_SIZE_OFFSET], line9[TEXT_SIZE_OFFSET]);
        assert_eq!(line9[TEXT_SIZE_OFFSET], hamming_encode(red_line().size_nibble()));
    }

    #[test]
    fn test_tenth_line_rejected() {
        let mut builder = PageBuilder::new(3, Address::all_units());
        for _ in 0..MAX_LINES {
            let _ = builder.add_line("X").unwrap();
        }
        assert!(matches!(
            builder.add_line("X"),
            Err(Error::InvalidInput(_))
        ));
    }

    #[test]
    fn test_unset_slots_default() {
        let page = Page::compose(
            4,
            Address::all_units(),
            PageAttributes::default(),
            &[("A", red_line())],
        )
        .unwrap();
        let header = page.frames()[0].to_bytes(&Omcw::default());
        let red = red_line().to_bytes();
        let default = TextLineAttributes::default().to_bytes();
        assert_eq!(header[20], hamming_encode(red[0]));
        assert_eq!(header[21], hamming_encode(red[1]));
        assert_eq!(header[22], hamming_encode(default[0]));
        assert_eq!(header[23], hamming_encode(default[1]));
        assert_eq!(header[36], hamming_encode(default[0]));
    }

    #[test]
    fn test_clock_page_number_rejected() {
        let mut builder = PageBuilder::new(TIME_OF_DAY_PAGE, Address::all_units());
        let _ = builder.add_line("NOT A CLOCK").unwrap();
        assert!(matches!(builder.build(), Err(Error::InvalidInput(_))));
        assert!(Page::compose(
            TIME_OF_DAY_PAGE,
            Address::all_units(),
            PageAttributes::default(),
            &[],
        )
        .is_err());
    }

    #[test]
    fn test_idle_page() {
        let page = Page::idle();
        assert_eq!(page.len(), 1);
        assert_eq!(page.page_number(), IDLE_PAGE);
    }

    #[test]
    fn test_transmission_frames() {
        let page = Page::idle();
        let item = Transmission::from(page.clone());
        assert_eq!(item.frames(), page.frames());
        let single = Transmission::from(page.frames()[0].clone());
        assert_eq!(single.frames().len(), 1);
    }

    #[test]
    fn test_full_page_golden_output() {
        let word = OmcwBuilder::new()
            .top_solid(true)
            .region_separator(true)
            .ldl_style(LdlStyle::Standard)
            .top_page(10)
            .unwrap()
            .commit();
        let address = Address::new(1, 2, 3, 4).unwrap();
        let page = Page::compose(
            10,
            address,
            PageAttributes::default(),
            &[
                ("CURRENT CONDITIONS", TextLineAttributes::default()),
                ("TEMP 72` F", red_line()),
                ("WIND NW 10 MPH", TextLineAttributes::default()),
            ],
        )
        .unwrap();
        assert_eq!(page.to_hex(&word), GOLDEN_PAGE_HEX);
    }

    const GOLDEN_PAGE_HEX: &str = concat!(
        "555527158C0264158C158C49150215A1645E1515022F0264022F022F022F022F022F1515022F",
        "555527024943D5525245CE5420434FCEC44954494FCED3202020202020202020202020202020",
        "55552749025445CDD02037327F20462020202020202020202020202020202020202020202020",
        "5555275E495749CEC420CE572031B020CDD0C820202020202020202020202020202020202020",
    );
}
