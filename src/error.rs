//! Error type shared by the encoding and transmission layers.

use thiserror::Error;

/// Result alias used throughout the crate.
pub type Result<T> = core::result::Result<T, Error>;

/// Failures surfaced by frame construction and the transmission driver.
#[derive(Error, Debug, Clone, Copy, PartialEq, Eq)]
pub enum Error {
    /// A caller supplied a value outside the range the wire format can carry.
    #[error("invalid input: {0}")]
    InvalidInput(&'static str),

    /// The hardware stopped following the handshake protocol.
    #[error("device fault: {0}")]
    DeviceFault(&'static str),

    /// A pin or SPI operation reported an error.
    ///
    /// The underlying HAL error is logged where it happens; HAL error types
    /// are not carried so that the driver stays generic over its pins.
    #[error("bus error")]
    Bus,
}

impl Error {
    pub(crate) fn bus<E: core::fmt::Debug>(err: E) -> Self {
        log::error!("bus operation failed: {:?}", err);
        Self::Bus
    }
}
