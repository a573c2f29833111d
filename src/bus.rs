//! Hardware capability layer.
//!
//! [`StarBus`] is the narrow interface the transmission driver needs from the
//! board: two 8-bit parallel ports feeding the FIFO, the control strobes, the
//! FIFO-empty handshake and the DDS serial port. Anything implementing it can
//! run a [`Transmitter`](crate::driver::Transmitter), including a software
//! fake in tests.
//!
//! [`GpioBus`] is the real implementation over `embedded-hal` 1.0 output pins
//! and an SPI bus. The FIFO-empty input is an edge interrupt on most boards,
//! so it is abstracted separately as [`FifoEmptyWait`]; see
//! [`crate::signal`] for a channel-backed implementation under `std`.
//!
//! ## Line polarity
//!
//! | line | idle | active |
//! |------|------|--------|
//! | write strobe | high | low pulse |
//! | request to send | low | high pulse |
//! | peripheral reset | low | high |
//! | first load | low | high |
//! | DDS frame sync | high | low while a word is shifted |

use core::time::Duration;

use embedded_hal::digital::OutputPin;
use embedded_hal::spi::SpiBus;

use crate::error::{Error, Result};

/// Board operations used by the transmission driver.
pub trait StarBus {
    /// Drives `byte` onto the low parallel port.
    fn write_low_byte(&mut self, byte: u8) -> Result<()>;

    /// Drives `byte` onto the high parallel port.
    fn write_high_byte(&mut self, byte: u8) -> Result<()>;

    /// Latches both ports into the FIFO as one 16-bit word.
    fn strobe(&mut self) -> Result<()>;

    /// Pulses request-to-send so the FIFO clocks its contents out.
    fn set_request_to_send(&mut self) -> Result<()>;

    /// Blocks until the FIFO reports empty or `timeout` elapses.
    ///
    /// Returns `Ok(false)` on timeout.
    fn wait_fifo_empty(&mut self, timeout: Duration) -> Result<bool>;

    /// Holds (`true`) or releases the FIFO and DDS chip reset line.
    fn set_peripheral_reset(&mut self, asserted: bool) -> Result<()>;

    /// Selects the FIFO first-load (direction) mode.
    fn set_first_load(&mut self, on: bool) -> Result<()>;

    /// Shifts one 16-bit programming word into the DDS chip.
    fn program_dds(&mut self, word: u16) -> Result<()>;
}

/// Source of the FIFO-empty edge.
pub trait FifoEmptyWait {
    /// Blocks until the FIFO-empty edge is seen or `timeout` elapses.
    ///
    /// Returns `false` on timeout.
    fn wait(&mut self, timeout: Duration) -> bool;

    /// Discards a stale edge before a new frame is sent.
    fn clear(&mut self) {}
}

/// Output lines of the board.
///
/// Control lines and data port pins may be different types, so HALs with
/// per-pin types can erase each group separately.
#[derive(Debug)]
pub struct StarPins<C, D> {
    /// Request-to-send, pulsed after a frame is loaded.
    pub request_to_send: C,
    /// Write strobe latching the ports into the FIFO.
    pub write_strobe: C,
    /// FIFO and DDS reset.
    pub peripheral_reset: C,
    /// FIFO first-load / direction select.
    pub first_load: C,
    /// DDS serial frame sync.
    pub dds_frame_sync: C,
    /// Low parallel port, bit 0 first.
    pub low_port: [D; 8],
    /// High parallel port, bit 0 first.
    pub high_port: [D; 8],
}

/// [`StarBus`] over `embedded-hal` pins and SPI.
#[derive(Debug)]
pub struct GpioBus<C, D, S, W>
where
    C: OutputPin,
    D: OutputPin,
    S: SpiBus,
    W: FifoEmptyWait,
{
    /// Output lines.
    pub pins: StarPins<C, D>,
    /// DDS serial port.
    pub spi: S,
    /// FIFO-empty edge source.
    pub fifo_empty: W,
}

impl<C, D, S, W> GpioBus<C, D, S, W>
where
    C: OutputPin,
    D: OutputPin,
    S: SpiBus,
    W: FifoEmptyWait,
{
    /// Wraps the board resources. No line is touched until first use.
    pub fn new(pins: StarPins<C, D>, spi: S, fifo_empty: W) -> Self {
        Self {
            pins,
            spi,
            fifo_empty,
        }
    }

    /// Releases the board resources.
    pub fn release(self) -> (StarPins<C, D>, S, W) {
        (self.pins, self.spi, self.fifo_empty)
    }
}

fn drive<P: OutputPin>(pin: &mut P, high: bool) -> Result<()> {
    let result = if high { pin.set_high() } else { pin.set_low() };
    result.map_err(Error::bus)
}

fn drive_port<P: OutputPin>(port: &mut [P; 8], byte: u8) -> Result<()> {
    for (bit, pin) in port.iter_mut().enumerate() {
        drive(pin, byte >> bit & 1 == 1)?;
    }
    Ok(())
}

impl<C, D, S, W> StarBus for GpioBus<C, D, S, W>
where
    C: OutputPin,
    D: OutputPin,
    S: SpiBus,
    W: FifoEmptyWait,
{
    fn write_low_byte(&mut self, byte: u8) -> Result<()> {
        drive_port(&mut self.pins.low_port, byte)
    }

    fn write_high_byte(&mut self, byte: u8) -> Result<()> {
        drive_port(&mut self.pins.high_port, byte)
    }

    fn strobe(&mut self) -> Result<()> {
        drive(&mut self.pins.write_strobe, false)?;
        drive(&mut self.pins.write_strobe, true)
    }

    fn set_request_to_send(&mut self) -> Result<()> {
        self.fifo_empty.clear();
        drive(&mut self.pins.request_to_send, true)?;
        drive(&mut self.pins.request_to_send, false)
    }

    fn wait_fifo_empty(&mut self, timeout: Duration) -> Result<bool> {
        Ok(self.fifo_empty.wait(timeout))
    }

    fn set_peripheral_reset(&mut self, asserted: bool) -> Result<()> {
        drive(&mut self.pins.peripheral_reset, asserted)
    }

    fn set_first_load(&mut self, on: bool) -> Result<()> {
        drive(&mut self.pins.first_load, on)
    }

    fn program_dds(&mut self, word: u16) -> Result<()> {
        drive(&mut self.pins.dds_frame_sync, false)?;
        self.spi.write(&word.to_be_bytes()).map_err(Error::bus)?;
        self.spi.flush().map_err(Error::bus)?;
        drive(&mut self.pins.dds_frame_sync, true)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use embedded_hal_mock::eh1::digital::{
        Mock as PinMock, State as PinState, Transaction as PinTransaction,
    };
    use embedded_hal_mock::eh1::spi::{Mock as SpiMock, Transaction as SpiTransaction};

    type MockBus<W> = GpioBus<PinMock, PinMock, SpiMock<u8>, W>;

    struct Never;

    impl FifoEmptyWait for Never {
        fn wait(&mut self, _timeout: Duration) -> bool {
            false
        }
    }

    struct Always;

    impl FifoEmptyWait for Always {
        fn wait(&mut self, _timeout: Duration) -> bool {
            true
        }
    }

    fn high() -> PinTransaction {
        PinTransaction::set(PinState::High)
    }

    fn low() -> PinTransaction {
        PinTransaction::set(PinState::Low)
    }

    fn idle_port() -> [PinMock; 8] {
        core::array::from_fn(|_| PinMock::new(&[]))
    }

    fn port_expecting(byte: u8) -> [PinMock; 8] {
        core::array::from_fn(|bit| {
            let state = if byte >> bit & 1 == 1 {
                PinState::High
            } else {
                PinState::Low
            };
            PinMock::new(&[PinTransaction::set(state)])
        })
    }

    /// Control line expectations, in `StarPins` field order.
    #[derive(Default)]
    struct Control<'a> {
        request_to_send: &'a [PinTransaction],
        write_strobe: &'a [PinTransaction],
        peripheral_reset: &'a [PinTransaction],
        first_load: &'a [PinTransaction],
        dds_frame_sync: &'a [PinTransaction],
    }

    fn pins(
        control: Control<'_>,
        low_port: [PinMock; 8],
        high_port: [PinMock; 8],
    ) -> StarPins<PinMock, PinMock> {
        StarPins {
            request_to_send: PinMock::new(control.request_to_send),
            write_strobe: PinMock::new(control.write_strobe),
            peripheral_reset: PinMock::new(control.peripheral_reset),
            first_load: PinMock::new(control.first_load),
            dds_frame_sync: PinMock::new(control.dds_frame_sync),
            low_port,
            high_port,
        }
    }

    fn bus<W: FifoEmptyWait>(control: Control<'_>, spi: SpiMock<u8>, wait: W) -> MockBus<W> {
        GpioBus::new(pins(control, idle_port(), idle_port()), spi, wait)
    }

    fn done<W: FifoEmptyWait>(bus: MockBus<W>) {
        let (mut pins, mut spi, _) = bus.release();
        pins.request_to_send.done();
        pins.write_strobe.done();
        pins.peripheral_reset.done();
        pins.first_load.done();
        pins.dds_frame_sync.done();
        for pin in pins.low_port.iter_mut().chain(pins.high_port.iter_mut()) {
            pin.done();
        }
        spi.done();
    }

    #[test]
    fn test_ports_drive_each_bit() {
        let mut bus = GpioBus::new(
            pins(
                Control::default(),
                port_expecting(0xa5),
                port_expecting(0x3c),
            ),
            SpiMock::new(&[]),
            Never,
        );
        bus.write_low_byte(0xa5).unwrap();
        bus.write_high_byte(0x3c).unwrap();
        done(bus);
    }

    #[test]
    fn test_strobe_is_active_low() {
        let control = Control {
            write_strobe: &[low(), high()],
            ..Default::default()
        };
        let mut bus = bus(control, SpiMock::new(&[]), Never);
        bus.strobe().unwrap();
        done(bus);
    }

    #[test]
    fn test_request_to_send_pulses_high() {
        let control = Control {
            request_to_send: &[high(), low()],
            ..Default::default()
        };
        let mut bus = bus(control, SpiMock::new(&[]), Never);
        bus.set_request_to_send().unwrap();
        done(bus);
    }

    #[test]
    fn test_reset_and_first_load_levels() {
        let control = Control {
            peripheral_reset: &[high(), low()],
            first_load: &[high()],
            ..Default::default()
        };
        let mut bus = bus(control, SpiMock::new(&[]), Never);
        bus.set_peripheral_reset(true).unwrap();
        bus.set_first_load(true).unwrap();
        bus.set_peripheral_reset(false).unwrap();
        done(bus);
    }

    #[test]
    fn test_program_dds_frames_word() {
        let control = Control {
            dds_frame_sync: &[low(), high()],
            ..Default::default()
        };
        let spi = SpiMock::new(&[
            SpiTransaction::write_vec(vec![0x72, 0x54]),
            SpiTransaction::flush(),
        ]);
        let mut bus = bus(control, spi, Never);
        bus.program_dds(0x7254).unwrap();
        done(bus);
    }

    #[test]
    fn test_wait_reports_edge_source() {
        let mut bus_up = bus(Control::default(), SpiMock::new(&[]), Always);
        assert!(bus_up.wait_fifo_empty(Duration::from_millis(1)).unwrap());
        done(bus_up);

        let mut bus_down = bus(Control::default(), SpiMock::new(&[]), Never);
        assert!(!bus_down.wait_fifo_empty(Duration::from_millis(1)).unwrap());
        done(bus_down);
    }

    #[derive(Debug)]
    struct BrokenPin;

    impl embedded_hal::digital::ErrorType for BrokenPin {
        type Error = embedded_hal::digital::ErrorKind;
    }

    impl OutputPin for BrokenPin {
        fn set_low(&mut self) -> core::result::Result<(), Self::Error> {
            Err(embedded_hal::digital::ErrorKind::Other)
        }

        fn set_high(&mut self) -> core::result::Result<(), Self::Error> {
            Err(embedded_hal::digital::ErrorKind::Other)
        }
    }

    #[test]
    fn test_pin_error_maps_to_bus() {
        let pins = StarPins {
            request_to_send: BrokenPin,
            write_strobe: BrokenPin,
            peripheral_reset: BrokenPin,
            first_load: BrokenPin,
            dds_frame_sync: BrokenPin,
            low_port: idle_port(),
            high_port: idle_port(),
        };
        let mut bus = GpioBus::new(pins, SpiMock::<u8>::new(&[]), Never);
        assert_eq!(bus.strobe(), Err(Error::Bus));
        assert_eq!(bus.set_peripheral_reset(true), Err(Error::Bus));
        let (mut pins, mut spi, _) = bus.release();
        for pin in pins.low_port.iter_mut().chain(pins.high_port.iter_mut()) {
            pin.done();
        }
        spi.done();
    }
}
