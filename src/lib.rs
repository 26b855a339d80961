//! A driver for the MAX3421E USB host / peripheral controller
//!
//! `max3421e` talks to the chip over its SPI command-byte protocol and
//! implements the pieces that live close to the silicon: typed per-role
//! register access, interrupt enable shadowing, reset and role bring-up
//! sequencing, the host-side attach / detach state machine, and the
//! peripheral-side setup-packet handler. Bus reset, enumeration, and
//! status responses are collaborator hooks behind [`Events`].
//!
//! To interface the library, supply a [`Transport`] (or wrap an
//! `embedded-hal` `SpiDevice` in [`SpiTransport`]) and an `embedded-hal`
//! `DelayNs`. The chip's INT line is the board's responsibility: configure
//! it as a pulled-up, falling-edge interrupt and forward the edge to
//! [`BusAdapter::on_interrupt`].
//!
//! ```no_run
//! use max3421e::{BusAdapter, Config, HostIrq, Max3421, Role};
//!
//! # struct T;
//! # impl max3421e::Transport for T {
//! #     type Error = core::convert::Infallible;
//! #     fn exchange(&mut self, _: u8, _: u8) -> Result<u8, Self::Error> { Ok(1) }
//! #     fn write_sequence(&mut self, _: u8, _: &[u8]) -> Result<u8, Self::Error> { Ok(0) }
//! #     fn read_sequence(&mut self, _: u8, _: &mut [u8]) -> Result<(), Self::Error> { Ok(()) }
//! # }
//! # struct D;
//! # impl embedded_hal::delay::DelayNs for D {
//! #     fn delay_ns(&mut self, _: u32) {}
//! # }
//! # let transport = T;
//! # let delay = D;
//! let mut usb = Max3421::new(transport, delay, Config::default());
//! usb.start(Role::Host).unwrap();
//!
//! // Watch for attach / detach, then open the gate to the INT pin.
//! usb.enable_interrupts(HostIrq::CONDET.bits()).unwrap();
//! usb.clear_interrupt_status(HostIrq::CONDET.bits()).unwrap();
//! usb.enable_master_interrupt().unwrap();
//!
//! let adapter = BusAdapter::new(usb);
//! // From the INT pin ISR: adapter.on_interrupt();
//! // From the main loop or a task: adapter.service(&mut events);
//! ```

#![no_std]

#[cfg(test)]
extern crate std;

#[macro_use]
mod log;

mod bus;
mod driver;
mod events;
mod host;
mod peripheral;
mod regs;
mod spi;

#[cfg(test)]
pub(crate) mod mock;

pub use bus::BusAdapter;
pub use driver::{Config, Max3421};
pub use events::Events;
pub use host::BusState;
pub use regs::{
    command_byte, CpuCtl, Direction, EpIrq, Hctl, HostIrq, HostReg, LineState, ModeCtl,
    PeripheralReg, PinCtl, Register, UsbCtl, UsbIrq,
};
pub use spi::SpiTransport;

/// Size of the shared receive buffer, matching the chip's data FIFOs.
pub const BUFFER_SIZE: usize = 64;

/// Length of a USB setup packet.
pub const SETUP_LEN: usize = 8;

/// One framed, full-duplex exchange with the chip.
///
/// Every register access is a single transaction: exactly one command
/// byte, then the data bytes, MSB-first, with the chip select held
/// asserted throughout. Holding the select across the data bytes is what
/// puts the chip in burst mode for the multi-byte calls, so a `Transport`
/// must never split one call into several bus transactions.
///
/// Implementations are expected to be blocking; the driver performs no
/// internal buffering.
pub trait Transport {
    /// Transport-level fault, surfaced through [`Error::Transport`] by
    /// every register operation.
    type Error;

    /// Sends `command` then `data`, returning the byte shifted in while
    /// `data` went out.
    fn exchange(&mut self, command: u8, data: u8) -> Result<u8, Self::Error>;

    /// Sends `command` then all of `values` in one frame, returning the
    /// byte shifted in alongside the last value.
    fn write_sequence(&mut self, command: u8, values: &[u8]) -> Result<u8, Self::Error>;

    /// Sends `command` then clocks `buffer.len()` dummy bytes, filling
    /// `buffer` with the bytes shifted in.
    fn read_sequence(&mut self, command: u8, buffer: &mut [u8]) -> Result<(), Self::Error>;
}

/// Driver role, fixed when [`Max3421::start`] is called.
///
/// The same 5-bit register address space means different things per role;
/// see [`HostReg`] and [`PeripheralReg`].
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[cfg_attr(feature = "defmt-03", derive(defmt_03::Format))]
pub enum Role {
    /// Drive the bus: detect attach, generate SOF, reset and enumerate.
    Host,
    /// Answer a host: handle setup packets and bus resets.
    Peripheral,
}

/// Which bounded hardware wait gave up.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[cfg_attr(feature = "defmt-03", derive(defmt_03::Format))]
pub enum Wait {
    /// Oscillator did not report stable after a chip reset.
    Oscillator,
    /// No start-of-frame appeared after enabling the SOF generator.
    Frame,
    /// A commanded bus sample never completed.
    BusSample,
}

/// Driver error.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[cfg_attr(feature = "defmt-03", derive(defmt_03::Format))]
pub enum Error<E> {
    /// The underlying SPI exchange failed.
    Transport(E),
    /// A bounded wait on chip state timed out.
    Timeout(Wait),
    /// The enumeration collaborator reported failure.
    EnumerationFailed,
}
