//! # starjr
//!
//! A portable Rust driver for the data channel of legacy addressable
//! text-overlay receivers ("STAR" units) that superimpose weather pages on a
//! cable feed.
//!
//! The crate turns page content into the receiver's fixed 38-byte frames and
//! clocks them out to the modulator hardware:
//! - `heapless` containers so the codec and driver layers run without an allocator
//! - Hamming 8/4 protection and odd-parity text encoding
//! - the per-frame bit-level cipher expected by the receiver's demodulator
//! - an interrupt-safe shared mode word guarded by `critical-section`
//! - `embedded-hal` 1.0 traits for the parallel FIFO bus and the DDS serial port
//!
//! ## Crate features
//! | Feature         | Description |
//! |-----------------|-------------|
//! | `std` (default) | Enables the threaded transmission queue, the channel-backed FIFO-empty signal and hex debug strings |
//!
//! ## Layers
//!
//! - [`encoding`], [`cipher`]: byte-level codecs
//! - [`address`], [`attributes`], [`omcw`]: bit-packed configuration words
//! - [`frame`], [`page`]: frame layouts and page composition
//! - [`dds`], [`bus`], [`driver`]: hardware handshake
//! - `queue`, `signal` (`std`): multi-producer queue and transmit thread
//!
//! ## Usage
//!
//! ```rust,ignore
//! use std::sync::Arc;
//! use starjr::{Address, ModeWordCell, Page, PageAttributes, TextLineAttributes};
//! use starjr::driver::{Transmitter, TransmitterConfig};
//! use starjr::queue::{spawn_transmitter, transmission_queue};
//!
//! let mode = Arc::new(ModeWordCell::default());
//! let (queue, receiver) = transmission_queue();
//! let mut tx = Transmitter::new(bus, TransmitterConfig::default());
//! tx.init()?;
//! let handle = spawn_transmitter(tx, receiver, Arc::clone(&mode))?;
//!
//! let page = Page::compose(
//!     10,
//!     Address::all_units(),
//!     PageAttributes::default(),
//!     &[("CURRENT CONDITIONS", TextLineAttributes::default())],
//! )?;
//! queue.enqueue_page(page)?;
//! ```
//!
//! ## Integration Notes
//!
//! - Exactly one thread should own the [`driver::Transmitter`]; producers only
//!   touch the queue and the [`ModeWordCell`].
//! - The FIFO-empty wait is bounded; a stuck FIFO surfaces as
//!   [`Error::DeviceFault`] instead of hanging the transmit thread.

#![deny(
    bad_style,
    dead_code,
    improper_ctypes,
    non_shorthand_field_patterns,
    no_mangle_generic_items,
    overflowing_literals,
    path_statements,
    patterns_in_fns_without_body,
    unconditional_recursion,
    unused,
    while_true,
    missing_debug_implementations,
    missing_docs,
    trivial_casts,
    trivial_numeric_casts,
    unused_extern_crates,
    unused_import_braces,
    unused_qualifications,
    unused_results
)]
#![cfg_attr(not(feature = "std"), no_std)]

pub use critical_section;
pub use heapless;

pub mod address;
pub mod attributes;
pub mod bus;
pub mod cipher;
pub mod consts;
pub mod dds;
pub mod driver;
pub mod encoding;
pub mod error;
pub mod frame;
pub mod omcw;
pub mod page;
#[cfg(feature = "std")]
pub mod queue;
#[cfg(feature = "std")]
pub mod signal;

pub use address::{Address, SwitchBank};
pub use attributes::{Color, PageAttributes, TextHeight, TextLineAttributes, TextWidth};
pub use error::{Error, Result};
pub use frame::{Frame, TimeOfDay};
pub use omcw::{LdlStyle, ModeWordCell, Omcw, OmcwBuilder};
pub use page::{Page, PageBuilder, Transmission};
