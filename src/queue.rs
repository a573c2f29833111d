//! Multi-producer transmission queue and the dedicated transmit thread.
//!
//! Producers (data refresh timers, schedulers, control handlers) hold cloned
//! [`TransmissionQueue`] handles. The transmit thread owns the single
//! [`QueueReceiver`] and the [`Transmitter`]. A page is one queue item, so
//! its frames are sent back to back even with many producers enqueueing at
//! the same time.
//!
//! The loop never sleeps: with nothing queued it sends the idle page, which
//! itself blocks on the FIFO handshake.

use std::sync::Arc;
use std::thread::{self, JoinHandle};

use crossbeam_channel::{Receiver, Sender, TryRecvError, unbounded};

use crate::bus::StarBus;
use crate::driver::Transmitter;
use crate::error::{Error, Result};
use crate::frame::Frame;
use crate::omcw::ModeWordCell;
use crate::page::{Page, Transmission};

/// Name of the thread started by [`spawn_transmitter`].
pub const TRANSMIT_THREAD_NAME: &str = "star-tx";

/// Creates a connected producer handle and receiver.
pub fn transmission_queue() -> (TransmissionQueue, QueueReceiver) {
    let (tx, rx) = unbounded();
    (TransmissionQueue { tx }, QueueReceiver { rx })
}

/// Producer handle. Clone one per producer.
#[derive(Debug, Clone)]
pub struct TransmissionQueue {
    tx: Sender<Transmission>,
}

impl TransmissionQueue {
    /// Appends an item to the back of the queue.
    ///
    /// Fails with [`Error::DeviceFault`] once the transmit loop has stopped.
    pub fn enqueue(&self, item: impl Into<Transmission>) -> Result<()> {
        self.tx.send(item.into()).map_err(|_| {
            log::warn!("transmit loop has stopped, item dropped");
            Error::DeviceFault("transmit loop stopped")
        })
    }

    /// Appends a standalone frame.
    pub fn enqueue_frame(&self, frame: Frame) -> Result<()> {
        self.enqueue(frame)
    }

    /// Appends a whole page as one item.
    pub fn enqueue_page(&self, page: Page) -> Result<()> {
        log::debug!("queueing page {} ({} frames)", page.page_number(), page.len());
        self.enqueue(page)
    }

    /// Items waiting to be sent.
    pub fn len(&self) -> usize {
        self.tx.len()
    }

    /// Whether nothing is waiting.
    pub fn is_empty(&self) -> bool {
        self.tx.is_empty()
    }
}

/// Consumer end, owned by the transmit loop.
#[derive(Debug)]
pub struct QueueReceiver {
    rx: Receiver<Transmission>,
}

impl QueueReceiver {
    /// Takes the oldest item without blocking.
    pub fn try_next(&self) -> Option<Transmission> {
        self.rx.try_recv().ok()
    }

    /// Items waiting to be sent.
    pub fn len(&self) -> usize {
        self.rx.len()
    }

    /// Whether nothing is waiting.
    pub fn is_empty(&self) -> bool {
        self.rx.is_empty()
    }
}

/// Sends queued items in order, or the idle page when the queue is empty.
///
/// Returns `Ok(())` once every producer handle has been dropped and the
/// queue is drained. Returns the error of the first failed frame.
pub fn run_transmit_loop<B: StarBus>(
    transmitter: &mut Transmitter<B>,
    receiver: &QueueReceiver,
    mode: &ModeWordCell,
) -> Result<()> {
    loop {
        match receiver.rx.try_recv() {
            Ok(item) => {
                let _ = transmitter.step(Some(&item), mode)?;
            }
            Err(TryRecvError::Empty) => {
                let _ = transmitter.step(None, mode)?;
            }
            Err(TryRecvError::Disconnected) => {
                log::debug!(
                    "all producers gone after {} frames",
                    transmitter.frames_sent
                );
                return Ok(());
            }
        }
    }
}

/// Runs [`run_transmit_loop`] on a dedicated named thread.
///
/// The thread hands the transmitter back together with the loop's result.
pub fn spawn_transmitter<B>(
    mut transmitter: Transmitter<B>,
    receiver: QueueReceiver,
    mode: Arc<ModeWordCell>,
) -> std::io::Result<JoinHandle<(Transmitter<B>, Result<()>)>>
where
    B: StarBus + Send + 'static,
{
    thread::Builder::new()
        .name(TRANSMIT_THREAD_NAME.into())
        .spawn(move || {
            let result = run_transmit_loop(&mut transmitter, &receiver, &mode);
            if let Err(err) = result {
                log::error!("transmit loop stopped: {}", err);
            }
            (transmitter, result)
        })
}
