//! MAX3421E register map and bit definitions
//!
//! The chip reuses its 5-bit address space between roles: address 2 is the
//! send FIFO for a host but endpoint 2's IN FIFO for a peripheral, and so
//! on. That's a property of the silicon, so the two maps are kept as two
//! disjoint enums and a driver only ever uses the one matching its role.
//! Registers present in both maps (oscillator status, chip control, pin
//! configuration) appear in both enums at the same address.

use bitflags::bitflags;

mod private {
    pub trait Sealed {}
    impl Sealed for super::HostReg {}
    impl Sealed for super::PeripheralReg {}
}

/// A register address in one of the two role-specific maps.
pub trait Register: Copy + private::Sealed {
    /// The 5-bit address carried in bits 7:3 of the command byte.
    fn addr(self) -> u8;
}

/// Host-role register map.
#[repr(u8)]
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[cfg_attr(feature = "defmt-03", derive(defmt_03::Format))]
pub enum HostReg {
    Rcvfifo = 1,
    Sndfifo = 2,
    Sudfifo = 4,
    Rcvbc = 6,
    Sndbc = 7,
    Usbirq = 13,
    Usbien = 14,
    Usbctl = 15,
    Cpuctl = 16,
    Pinctl = 17,
    Revision = 18,
    Iopins1 = 20,
    Iopins2 = 21,
    Gpinirq = 22,
    Gpinien = 23,
    Gpinpol = 24,
    Hirq = 25,
    Hien = 26,
    Mode = 27,
    Peraddr = 28,
    Hctl = 29,
    Hxfr = 30,
    Hrsl = 31,
}

/// Peripheral-role register map.
#[repr(u8)]
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[cfg_attr(feature = "defmt-03", derive(defmt_03::Format))]
pub enum PeripheralReg {
    Ep0Fifo = 0,
    Ep1OutFifo = 1,
    Ep2InFifo = 2,
    Ep3InFifo = 3,
    SudFifo = 4,
    Ep0Bc = 5,
    Ep1OutBc = 6,
    Ep2InBc = 7,
    Ep3InBc = 8,
    EpStalls = 9,
    ClrTogs = 10,
    Epirq = 11,
    Epien = 12,
    Usbirq = 13,
    Usbien = 14,
    Usbctl = 15,
    Cpuctl = 16,
    Pinctl = 17,
    Revision = 18,
    Fnaddr = 19,
    Iopins = 20,
}

impl Register for HostReg {
    fn addr(self) -> u8 {
        self as u8
    }
}

impl Register for PeripheralReg {
    fn addr(self) -> u8 {
        self as u8
    }
}

/// Transfer direction carried in bit 1 of the command byte.
#[repr(u8)]
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[cfg_attr(feature = "defmt-03", derive(defmt_03::Format))]
pub enum Direction {
    Read = 0,
    Write = 1,
}

/// Builds the command byte that opens every SPI transaction.
///
/// Layout: `addr << 3 | direction << 1 | ackstat`.
pub const fn command_byte(addr: u8, direction: Direction, ackstat: bool) -> u8 {
    (addr << 3) | ((direction as u8) << 1) | ackstat as u8
}

bitflags! {
    /// Host interrupt bits (HIRQ pending, HIEN enable).
    #[derive(Debug, Clone, Copy, PartialEq, Eq)]
    pub struct HostIrq: u8 {
        const BUSEVENT = 1 << 0;
        const RWU = 1 << 1;
        const RCVDAV = 1 << 2;
        const SNDBAV = 1 << 3;
        const SUSDN = 1 << 4;
        const CONDET = 1 << 5;
        const FRAME = 1 << 6;
        const HXFRDN = 1 << 7;
    }

    /// USB-level interrupt bits (USBIRQ pending, USBIEN enable).
    #[derive(Debug, Clone, Copy, PartialEq, Eq)]
    pub struct UsbIrq: u8 {
        const OSCOK = 1 << 0;
        const RWU = 1 << 1;
        const BUSACT = 1 << 2;
        const URES = 1 << 3;
        const SUSP = 1 << 4;
        const NOVBUS = 1 << 5;
        const VBUS = 1 << 6;
        const URESDN = 1 << 7;
    }

    /// Endpoint interrupt bits (EPIRQ pending, EPIEN enable).
    ///
    /// Peripheral role only; the host map has no endpoint registers.
    #[derive(Debug, Clone, Copy, PartialEq, Eq)]
    pub struct EpIrq: u8 {
        const IN0BAV = 1 << 0;
        const OUT0DAV = 1 << 1;
        const OUT1DAV = 1 << 2;
        const IN2BAV = 1 << 3;
        const IN3BAV = 1 << 4;
        const SUDAV = 1 << 5;
    }

    /// MODE register options.
    #[derive(Debug, Clone, Copy, PartialEq, Eq)]
    pub struct ModeCtl: u8 {
        const HOST = 1 << 0;
        const LOWSPEED = 1 << 1;
        const HUBPRE = 1 << 2;
        const SOFKAENAB = 1 << 3;
        const SEPIRQ = 1 << 4;
        const DELAYISO = 1 << 5;
        const DMPULLDN = 1 << 6;
        const DPPULLDN = 1 << 7;
    }

    /// HCTL register options.
    #[derive(Debug, Clone, Copy, PartialEq, Eq)]
    pub struct Hctl: u8 {
        const BUSRST = 1 << 0;
        const FRMRST = 1 << 1;
        const SAMPLEBUS = 1 << 2;
        const SIGRSM = 1 << 3;
        const RCVTOG0 = 1 << 4;
        const RCVTOG1 = 1 << 5;
        const SNDTOG0 = 1 << 6;
        const SNDTOG1 = 1 << 7;
    }

    /// USBCTL register options.
    #[derive(Debug, Clone, Copy, PartialEq, Eq)]
    pub struct UsbCtl: u8 {
        const PWRDOWN = 1 << 4;
        const CHIPRES = 1 << 5;
    }

    /// CPUCTL register options.
    #[derive(Debug, Clone, Copy, PartialEq, Eq)]
    pub struct CpuCtl: u8 {
        const IE = 1 << 0;
    }

    /// PINCTL register options.
    #[derive(Debug, Clone, Copy, PartialEq, Eq)]
    pub struct PinCtl: u8 {
        const GPXA = 1 << 0;
        const GPXB = 1 << 1;
        const POSINT = 1 << 2;
        const INTLEVEL = 1 << 3;
        const FDUPSPI = 1 << 4;
    }
}

/// J/K differential line state, sampled from HRSL bits 7:6.
#[repr(u8)]
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[cfg_attr(feature = "defmt-03", derive(defmt_03::Format))]
pub enum LineState {
    /// Both lines low; nothing attached, or a device driving SE0.
    Se0 = 0,
    K = 1,
    J = 2,
    /// Both sample bits set; not a valid differential state.
    Undefined = 3,
}

impl LineState {
    /// Extracts the two JSTATUS / KSTATUS sample bits from a raw HRSL
    /// register value.
    pub fn from_hrsl(hrsl: u8) -> Self {
        match (hrsl & 0xC0) >> 6 {
            0 => LineState::Se0,
            1 => LineState::K,
            2 => LineState::J,
            _ => LineState::Undefined,
        }
    }

    /// Whether either line reads high, i.e. a device is pulling the bus.
    pub fn is_attached(self) -> bool {
        self != LineState::Se0
    }
}

#[cfg(test)]
mod test {
    use super::{command_byte, Direction, LineState};

    #[test]
    fn command_byte_layout() {
        for addr in 0..32u8 {
            for direction in [Direction::Read, Direction::Write] {
                for ackstat in [false, true] {
                    let cmd = command_byte(addr, direction, ackstat);
                    assert_eq!(cmd >> 3, addr);
                    assert_eq!((cmd >> 1) & 1, direction as u8);
                    assert_eq!(cmd & 1, ackstat as u8);
                }
            }
        }
    }

    #[test]
    fn line_state_from_hrsl() {
        assert_eq!(LineState::from_hrsl(0b0000_0000), LineState::Se0);
        assert_eq!(LineState::from_hrsl(0b0100_0000), LineState::K);
        assert_eq!(LineState::from_hrsl(0b1000_0000), LineState::J);
        assert_eq!(LineState::from_hrsl(0b1100_0000), LineState::Undefined);
        // Low bits carry the transfer result and must not leak in.
        assert_eq!(LineState::from_hrsl(0b0011_1111), LineState::Se0);
    }

    #[test]
    fn attached_means_any_line_high() {
        assert!(!LineState::Se0.is_attached());
        assert!(LineState::K.is_attached());
        assert!(LineState::J.is_attached());
        assert!(LineState::Undefined.is_attached());
    }
}
