//! Transmission driver for the STAR FIFO and modulator.
//!
//! This module provides the [`Transmitter`] struct, which owns a [`StarBus`]
//! and runs the per-frame handshake with the hardware FIFO:
//!
//! 1. Reset the cipher.
//! 2. For each 16-bit word of the 38-byte frame, encrypt the even byte and
//!    drive it onto the low port, encrypt the odd byte and drive it onto the
//!    high port, then strobe the word into the FIFO.
//! 3. Encrypt and strobe one trailing zero word.
//! 4. Pulse request-to-send so the FIFO shifts the frame into the modulator.
//! 5. Wait for the FIFO-empty edge, bounded by
//!    [`TransmitterConfig::fifo_timeout`].
//!
//! Transmission is synchronous: each call returns once the FIFO has drained,
//! so frames go out strictly in the order they are handed over.
//!
//! ## Example
//!
//! ```rust,ignore
//! use starjr::driver::{Transmitter, TransmitterConfig};
//! use starjr::omcw::ModeWordCell;
//!
//! let mode = ModeWordCell::default();
//! let mut tx = Transmitter::new(bus, TransmitterConfig::default());
//! tx.init()?;
//! loop {
//!     tx.step(queue.next().as_ref(), &mode)?;
//! }
//! ```

use core::time::Duration;

use crate::bus::StarBus;
use crate::cipher::Cipher;
use crate::dds::DdsTones;
use crate::error::{Error, Result};
use crate::frame::Frame;
use crate::omcw::{ModeWordCell, Omcw};
use crate::page::{Page, Transmission};

/// Number of times the DDS programming sequence is written during init.
pub const DDS_PROGRAM_PASSES: usize = 2;

/// Operational state of the [`Transmitter`].
#[derive(PartialEq, Eq, Clone, Copy, Default, Debug)]
pub enum TransmitState {
    /// Nothing queued; the idle page is sent to keep the carrier busy.
    #[default]
    Idle,
    /// Queued frames are being sent in FIFO order.
    Draining,
}

/// Transmitter options.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct TransmitterConfig {
    /// Longest wait for the FIFO-empty edge after request-to-send.
    ///
    /// A frame is 40 words, roughly half a second at 1200 baud.
    pub fifo_timeout: Duration,
    /// Modulator tones programmed by [`Transmitter::init`].
    pub dds: DdsTones,
}

impl Default for TransmitterConfig {
    fn default() -> Self {
        Self {
            fifo_timeout: Duration::from_secs(2),
            dds: DdsTones::default(),
        }
    }
}

/// Drives frames through a [`StarBus`].
#[derive(Debug)]
pub struct Transmitter<B: StarBus> {
    /// The hardware bus.
    pub bus: B,
    /// Current state, updated by [`step`](Transmitter::step).
    pub state: TransmitState,
    /// Frames fully clocked out since creation.
    pub frames_sent: u32,
    config: TransmitterConfig,
    cipher: Cipher,
}

impl<B: StarBus> Transmitter<B> {
    /// Creates a transmitter. The hardware is untouched until
    /// [`init`](Transmitter::init).
    pub fn new(bus: B, config: TransmitterConfig) -> Self {
        Self {
            bus,
            state: TransmitState::Idle,
            frames_sent: 0,
            config,
            cipher: Cipher::new(),
        }
    }

    /// Options this transmitter was created with.
    pub fn config(&self) -> &TransmitterConfig {
        &self.config
    }

    /// Resets the FIFO and modulator and programs the FSK tones.
    ///
    /// Errors are fatal; the board is left held in reset.
    pub fn init(&mut self) -> Result<()> {
        let words = self.config.dds.program_words();
        log::debug!("programming modulator: {:04x?}", words);

        self.bus.set_peripheral_reset(true)?;
        self.bus.set_first_load(true)?;
        for _ in 0..DDS_PROGRAM_PASSES {
            for word in words {
                self.bus.program_dds(word)?;
            }
        }
        self.bus.set_peripheral_reset(false)?;
        log::debug!("modulator out of reset");
        Ok(())
    }

    fn write_word(&mut self, low: u8, high: u8) -> Result<()> {
        let low = self.cipher.encrypt_byte(low);
        let high = self.cipher.encrypt_byte(high);
        self.bus.write_low_byte(low)?;
        self.bus.write_high_byte(high)?;
        self.bus.strobe()
    }

    /// Sends one frame and waits for the FIFO to drain.
    ///
    /// Control frames carry `word`. Returns [`Error::DeviceFault`] if the
    /// FIFO-empty edge does not arrive within the configured timeout.
    pub fn transmit_frame(&mut self, frame: &Frame, word: &Omcw) -> Result<()> {
        let bytes = frame.to_bytes(word);
        #[cfg(feature = "std")]
        log::trace!("frame {}", hex::encode_upper(bytes));

        self.cipher.reset();
        for pair in bytes.chunks_exact(2) {
            self.write_word(pair[0], pair[1])?;
        }
        self.write_word(0, 0)?;

        self.bus.set_request_to_send()?;
        if !self.bus.wait_fifo_empty(self.config.fifo_timeout)? {
            log::error!(
                "FIFO empty not signalled within {:?}",
                self.config.fifo_timeout
            );
            return Err(Error::DeviceFault("FIFO did not drain"));
        }
        self.frames_sent = self.frames_sent.wrapping_add(1);
        Ok(())
    }

    /// Sends every frame of `item` in order.
    ///
    /// The mode word is read from `mode` for each frame, so a change made
    /// between two frames of a page shows up in the next control frame.
    pub fn transmit(&mut self, item: &Transmission, mode: &ModeWordCell) -> Result<()> {
        for frame in item.frames() {
            let word = mode.current();
            self.transmit_frame(frame, &word)?;
        }
        Ok(())
    }

    /// Runs one iteration of the transmit loop.
    ///
    /// `None` means nothing is queued and the idle page is sent instead.
    pub fn step(
        &mut self,
        next: Option<&Transmission>,
        mode: &ModeWordCell,
    ) -> Result<TransmitState> {
        let state = match next {
            Some(item) => {
                self.transmit(item, mode)?;
                TransmitState::Draining
            }
            None => {
                let idle = Transmission::from(Page::idle());
                self.transmit(&idle, mode)?;
                TransmitState::Idle
            }
        };
        if state != self.state {
            log::debug!("transmitter {:?} -> {:?}", self.state, state);
            self.state = state;
        }
        Ok(state)
    }
}
