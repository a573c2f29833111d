//! Output Mode Control Word.
//!
//! The OMCW is the receiver's global display configuration: solid fills,
//! region separator, radar pass-through, audio and local program relays,
//! the warning relay, the top page number and the LDL style. Every control
//! frame carries the current word, so a mode change takes effect with the
//! next header or time-of-day frame on the wire.
//!
//! Mutation and reading are separate types. [`OmcwBuilder`] accumulates
//! setter calls and cannot be serialized; [`OmcwBuilder::commit`] produces
//! an immutable [`Omcw`] whose [`Omcw::to_bytes`] is the only readable form.
//! A half-applied configuration therefore never reaches a frame.
//!
//! [`ModeWordCell`] holds the process-wide committed word. Producers update
//! it under a critical section, the transmission driver snapshots it for
//! every control frame it sends.
//!
//! ## Layout
//!
//! | byte | bit 3 | bit 2 | bit 1 | bit 0 |
//! |------|-------|-------|-------|-------|
//! | 0 | top solid | bottom solid | region separator | radar |
//! | 1 | aux audio | local program | local preroll | warning relay |
//! | 2 | LDL style (2 bits) || top page bit 9 | top page bit 8 |
//! | 3 | top page bits 7..4 ||||
//! | 4 | top page bits 3..0 ||||
//! | 5 | reserved ||||

use core::cell::Cell;
use critical_section::Mutex;

use crate::consts::{MAX_TOP_PAGE, MODE_WORD_LEN};
use crate::error::{Error, Result};

/// Style of the Local Data Line region.
#[derive(Debug, Default, Clone, Copy, PartialEq, Eq)]
#[repr(u8)]
pub enum LdlStyle {
    /// LDL hidden.
    #[default]
    Blank = 0,
    /// Standard current-conditions line.
    Standard = 1,
    /// Scrolling crawl.
    Crawl = 2,
    /// Alert styling.
    Alert = 3,
}

/// Mutable accumulator of display mode fields.
///
/// Every setter returns the builder for chaining. Nothing here can be
/// serialized; call [`commit`](OmcwBuilder::commit) to obtain an [`Omcw`].
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct OmcwBuilder {
    top_solid: bool,
    bottom_solid: bool,
    region_separator: bool,
    radar: bool,
    aux_audio: bool,
    local_program: bool,
    local_preroll: bool,
    warning_relay: bool,
    top_page: u16,
    ldl_style: LdlStyle,
}

impl Default for OmcwBuilder {
    fn default() -> Self {
        Self::new()
    }
}

impl OmcwBuilder {
    /// Creates a builder with every mode off and the warning relay released.
    pub fn new() -> Self {
        Self {
            top_solid: false,
            bottom_solid: false,
            region_separator: false,
            radar: false,
            aux_audio: false,
            local_program: false,
            local_preroll: false,
            // Relay is active low: warnings disabled means the line is high.
            warning_relay: true,
            top_page: 0,
            ldl_style: LdlStyle::Blank,
        }
    }

    /// Solid fill behind the top region.
    pub fn top_solid(&mut self, on: bool) -> &mut Self {
        self.top_solid = on;
        self
    }

    /// Solid fill behind the bottom region.
    pub fn bottom_solid(&mut self, on: bool) -> &mut Self {
        self.bottom_solid = on;
        self
    }

    /// Separator bar between the regions.
    pub fn region_separator(&mut self, on: bool) -> &mut Self {
        self.region_separator = on;
        self
    }

    /// Pass the radar feed through.
    pub fn radar(&mut self, on: bool) -> &mut Self {
        self.radar = on;
        self
    }

    /// Switch in the auxiliary audio source.
    pub fn aux_audio(&mut self, on: bool) -> &mut Self {
        self.aux_audio = on;
        self
    }

    /// Local program relay.
    pub fn local_program(&mut self, on: bool) -> &mut Self {
        self.local_program = on;
        self
    }

    /// Local preroll relay.
    pub fn local_preroll(&mut self, on: bool) -> &mut Self {
        self.local_preroll = on;
        self
    }

    /// Weather warning relay. Stored inverted, the relay is active low.
    pub fn wx_warning(&mut self, enabled: bool) -> &mut Self {
        self.warning_relay = !enabled;
        self
    }

    /// Page shown in the top region, `0..=1023`.
    pub fn top_page(&mut self, page: u16) -> Result<&mut Self> {
        if page > MAX_TOP_PAGE {
            return Err(Error::InvalidInput("top page exceeds 10 bits"));
        }
        self.top_page = page;
        Ok(self)
    }

    /// Local Data Line style.
    pub fn ldl_style(&mut self, style: LdlStyle) -> &mut Self {
        self.ldl_style = style;
        self
    }

    /// Serializes the accumulated fields into an immutable word.
    pub fn commit(&self) -> Omcw {
        let page = self.top_page;
        let bytes = [
            u8::from(self.top_solid) << 3
                | u8::from(self.bottom_solid) << 2
                | u8::from(self.region_separator) << 1
                | u8::from(self.radar),
            u8::from(self.aux_audio) << 3
                | u8::from(self.local_program) << 2
                | u8::from(self.local_preroll) << 1
                | u8::from(self.warning_relay),
            (self.ldl_style as u8) << 2 | ((page >> 8) & 0x03) as u8,
            ((page >> 4) & 0x0f) as u8,
            (page & 0x0f) as u8,
            0,
        ];
        Omcw {
            fields: *self,
            bytes,
        }
    }
}

/// A committed Output Mode Control Word.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Omcw {
    fields: OmcwBuilder,
    bytes: [u8; MODE_WORD_LEN],
}

impl Default for Omcw {
    fn default() -> Self {
        OmcwBuilder::new().commit()
    }
}

impl Omcw {
    /// Starts a builder from this word's fields.
    pub fn edit(&self) -> OmcwBuilder {
        self.fields
    }

    /// The six committed nibbles.
    pub fn to_bytes(&self) -> [u8; MODE_WORD_LEN] {
        self.bytes
    }

    /// Top page number.
    pub fn top_page(&self) -> u16 {
        self.fields.top_page
    }

    /// LDL style.
    pub fn ldl_style(&self) -> LdlStyle {
        self.fields.ldl_style
    }
}

/// Process-wide shared mode word.
///
/// Wrap in an `Arc` (or place in a `static`) and hand a reference to every
/// producer and to the transmission loop.
#[derive(Debug)]
pub struct ModeWordCell {
    word: Mutex<Cell<Omcw>>,
}

impl Default for ModeWordCell {
    fn default() -> Self {
        Self::new(Omcw::default())
    }
}

impl ModeWordCell {
    /// Creates a cell holding `word`.
    pub const fn new(word: Omcw) -> Self {
        Self {
            word: Mutex::new(Cell::new(word)),
        }
    }

    /// Latest committed word.
    pub fn current(&self) -> Omcw {
        critical_section::with(|cs| self.word.borrow(cs).get())
    }

    /// Replaces the word outright.
    pub fn replace(&self, word: Omcw) -> Omcw {
        critical_section::with(|cs| self.word.borrow(cs).replace(word))
    }

    /// Applies `f` to a builder seeded from the current word and commits the
    /// result, all within one critical section.
    ///
    /// If `f` fails nothing is stored. Returns the newly committed word.
    pub fn update<F>(&self, f: F) -> Result<Omcw>
    where
        F: FnOnce(&mut OmcwBuilder) -> Result<()>,
    {
        critical_section::with(|cs| {
            let cell = self.word.borrow(cs);
            let mut builder = cell.get().edit();
            f(&mut builder)?;
            let word = builder.commit();
            log::debug!("mode word committed: {:?}", word.to_bytes());
            cell.set(word);
            Ok(word)
        })
    }
}
