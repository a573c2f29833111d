//! FIFO-empty edge delivery for hosted targets.
//!
//! The FIFO-empty line is usually wired to a GPIO edge interrupt whose
//! callback runs on a different thread from the transmit loop.
//! [`fifo_empty_signal`] returns a single-slot channel pair: the callback
//! owns the [`FifoEmptyNotifier`], the [`GpioBus`](crate::bus::GpioBus) owns
//! the [`FifoEmptyWaiter`].

use core::time::Duration;

use crossbeam_channel::{Receiver, RecvTimeoutError, Sender, TrySendError, bounded};

use crate::bus::FifoEmptyWait;

/// Creates a connected notifier and waiter.
pub fn fifo_empty_signal() -> (FifoEmptyNotifier, FifoEmptyWaiter) {
    let (tx, rx) = bounded(1);
    (FifoEmptyNotifier { tx }, FifoEmptyWaiter { rx })
}

/// Interrupt side of the signal. Cheap to clone.
#[derive(Debug, Clone)]
pub struct FifoEmptyNotifier {
    tx: Sender<()>,
}

impl FifoEmptyNotifier {
    /// Records one FIFO-empty edge. Never blocks.
    ///
    /// Edges arriving while one is already pending are merged.
    pub fn notify(&self) {
        match self.tx.try_send(()) {
            Ok(()) | Err(TrySendError::Full(())) => {}
            Err(TrySendError::Disconnected(())) => {
                log::warn!("FIFO-empty edge with no transmitter listening");
            }
        }
    }
}

/// Driver side of the signal.
#[derive(Debug)]
pub struct FifoEmptyWaiter {
    rx: Receiver<()>,
}

impl FifoEmptyWait for FifoEmptyWaiter {
    fn wait(&mut self, timeout: Duration) -> bool {
        match self.rx.recv_timeout(timeout) {
            Ok(()) => true,
            Err(RecvTimeoutError::Timeout) => false,
            Err(RecvTimeoutError::Disconnected) => {
                log::error!("FIFO-empty notifier dropped");
                false
            }
        }
    }

    fn clear(&mut self) {
        let stale = self.rx.try_iter().count();
        if stale > 0 {
            log::trace!("discarded {} stale FIFO-empty edge(s)", stale);
        }
    }
}
