//! Core register access, interrupt shadowing, and sequencing
//!
//! Everything here is role-agnostic plumbing: the command-byte protocol,
//! the single / multi register operations, the locally shadowed interrupt
//! enable masks, and the reset / bring-up sequences. The role-specific
//! event handlers live in [`crate::host`] and [`crate::peripheral`] and
//! are dispatched from [`Max3421::poll`].

use embedded_hal::delay::DelayNs;

use crate::events::Events;
use crate::host::BusState;
use crate::regs::{
    command_byte, CpuCtl, Direction, EpIrq, Hctl, HostIrq, HostReg, LineState, PeripheralReg,
    PinCtl, Register, UsbCtl, UsbIrq,
};
use crate::{Error, ModeCtl, Role, Transport, Wait, BUFFER_SIZE};

/// Poll step while waiting for the oscillator, in microseconds.
const OSC_STEP_US: u32 = 100;
/// Poll step while waiting for a bus sample, in microseconds.
const SAMPLE_STEP_US: u32 = 200_000;

/// Timeouts, settle delays, and policy knobs.
///
/// Every wait the chip's original firmware performed as an unbounded or
/// iteration-counted busy loop is bounded here, in wall-clock terms.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Config {
    /// How long to wait for the oscillator after a chip reset.
    pub oscillator_timeout_us: u32,
    /// How long to wait for the first SOF after enabling the generator.
    pub frame_timeout_ms: u32,
    /// How long to wait for a commanded bus sample to complete.
    pub sample_timeout_ms: u32,
    /// Settle time between bus reset and enumeration.
    pub reset_settle_ms: u32,
    /// Settle time after enumeration before accepting traffic.
    pub traffic_settle_ms: u32,
    /// Automatic bus-reset plus enumeration retries after the
    /// enumeration collaborator reports failure. Zero means a failure is
    /// only reported and the device stays attached but not ready.
    pub enumeration_retries: u8,
}

impl Default for Config {
    fn default() -> Self {
        Config {
            oscillator_timeout_us: 10_000,
            frame_timeout_ms: 100,
            sample_timeout_ms: 1_000,
            reset_settle_ms: 100,
            traffic_settle_ms: 200,
            enumeration_retries: 0,
        }
    }
}

/// MAX3421E driver.
///
/// Create one with [`new()`](Max3421::new), then call
/// [`start()`](Max3421::start) exactly once to fix the role and bring the
/// chip up. All further work happens through the register operations and
/// [`poll()`](Max3421::poll).
pub struct Max3421<T, D> {
    pub(crate) transport: T,
    pub(crate) delay: D,
    pub(crate) config: Config,
    pub(crate) role: Role,
    /// One-shot ACKSTAT flag, consumed by the next command byte built.
    pub(crate) ackstat: bool,
    /// Shadow of the bits currently set in HIEN / USBIEN.
    pub(crate) enabled_irq: u8,
    /// Shadow of the bits currently set in EPIEN.
    pub(crate) enabled_ep_irq: u8,
    pub(crate) connected: bool,
    pub(crate) bus_state: BusState,
    pub(crate) ignored_requests: u32,
    /// Receive buffer shared between the setup handler and payload logic.
    pub(crate) buffer: [u8; BUFFER_SIZE],
}

impl<T: Transport, D: DelayNs> Max3421<T, D> {
    /// Creates a driver over the given transport and delay provider.
    ///
    /// Creation touches no hardware; the driver acts as a host until
    /// [`start`](Max3421::start) fixes the role.
    pub fn new(transport: T, delay: D, config: Config) -> Self {
        Max3421 {
            transport,
            delay,
            config,
            role: Role::Host,
            ackstat: false,
            enabled_irq: 0,
            enabled_ep_irq: 0,
            connected: false,
            bus_state: BusState::NoDevice,
            ignored_requests: 0,
            buffer: [0; BUFFER_SIZE],
        }
    }

    /// Releases the transport and delay provider.
    pub fn release(self) -> (T, D) {
        (self.transport, self.delay)
    }

    pub fn role(&self) -> Role {
        self.role
    }

    pub fn config(&self) -> &Config {
        &self.config
    }

    /// Connection state as of the last connect-detect event.
    pub fn connected(&self) -> bool {
        self.connected
    }

    /// Where the host-side bus-state machine currently stands.
    pub fn bus_state(&self) -> BusState {
        self.bus_state
    }

    /// Count of standard requests received and deliberately ignored.
    pub fn ignored_requests(&self) -> u32 {
        self.ignored_requests
    }

    /// Chip revision, from the REVISION register.
    pub fn revision(&mut self) -> Result<u8, Error<T::Error>> {
        let addr = self.shared_reg(HostReg::Revision, PeripheralReg::Revision);
        self.read_raw(addr)
    }

    // Command-byte protocol.

    /// Builds the next command byte, consuming the one-shot ACKSTAT flag.
    fn command(&mut self, addr: u8, direction: Direction) -> u8 {
        let cmd = command_byte(addr, direction, self.ackstat);
        self.ackstat = false;
        cmd
    }

    /// Arms the ACKSTAT flag for the next transaction, whatever it is.
    pub(crate) fn set_ackstat(&mut self) {
        self.ackstat = true;
    }

    fn write_raw(&mut self, addr: u8, value: u8) -> Result<u8, Error<T::Error>> {
        let cmd = self.command(addr, Direction::Write);
        self.transport.exchange(cmd, value).map_err(Error::Transport)
    }

    fn read_raw(&mut self, addr: u8) -> Result<u8, Error<T::Error>> {
        let cmd = self.command(addr, Direction::Read);
        self.transport.exchange(cmd, 0).map_err(Error::Transport)
    }

    fn enable_raw(&mut self, addr: u8, bits: u8) -> Result<(), Error<T::Error>> {
        let value = self.read_raw(addr)?;
        self.write_raw(addr, value | bits)?;
        Ok(())
    }

    fn disable_raw(&mut self, addr: u8, bits: u8) -> Result<(), Error<T::Error>> {
        let value = self.read_raw(addr)?;
        self.write_raw(addr, value & !bits)?;
        Ok(())
    }

    /// Resolves a register that exists at the same address in both maps.
    fn shared_reg(&self, host: HostReg, peripheral: PeripheralReg) -> u8 {
        debug_assert_eq!(host.addr(), peripheral.addr());
        match self.role {
            Role::Host => host.addr(),
            Role::Peripheral => peripheral.addr(),
        }
    }

    // Register access layer.

    /// Writes `value` to a register, returning the byte read back during
    /// the value exchange. The chip shifts out status there, which makes
    /// the return value useful for polling.
    pub fn write_register<R: Register>(&mut self, reg: R, value: u8) -> Result<u8, Error<T::Error>> {
        self.write_raw(reg.addr(), value)
    }

    /// Like [`write_register`](Max3421::write_register), with the ACKSTAT
    /// bit set in the command byte.
    pub fn write_register_as<R: Register>(
        &mut self,
        reg: R,
        value: u8,
    ) -> Result<u8, Error<T::Error>> {
        self.set_ackstat();
        self.write_register(reg, value)
    }

    pub fn read_register<R: Register>(&mut self, reg: R) -> Result<u8, Error<T::Error>> {
        self.read_raw(reg.addr())
    }

    /// Like [`read_register`](Max3421::read_register), with the ACKSTAT
    /// bit set in the command byte.
    pub fn read_register_as<R: Register>(&mut self, reg: R) -> Result<u8, Error<T::Error>> {
        self.set_ackstat();
        self.read_register(reg)
    }

    /// Burst-writes `values` after a single command byte. The command is
    /// not re-emitted between bytes; the chip advances its FIFO pointer
    /// on its own.
    pub fn multi_write_register<R: Register>(
        &mut self,
        reg: R,
        values: &[u8],
    ) -> Result<u8, Error<T::Error>> {
        let cmd = self.command(reg.addr(), Direction::Write);
        self.transport
            .write_sequence(cmd, values)
            .map_err(Error::Transport)
    }

    /// Burst-reads `buffer.len()` bytes after a single command byte.
    pub fn multi_read_register<R: Register>(
        &mut self,
        reg: R,
        buffer: &mut [u8],
    ) -> Result<(), Error<T::Error>> {
        let cmd = self.command(reg.addr(), Direction::Read);
        self.transport
            .read_sequence(cmd, buffer)
            .map_err(Error::Transport)
    }

    /// Read-modify-write: sets `bits` in `reg`.
    ///
    /// Not atomic against other access to the same register; callers in
    /// mixed ISR / foreground designs must serialize through
    /// [`BusAdapter`](crate::BusAdapter).
    pub fn enable_options<R: Register>(&mut self, reg: R, bits: u8) -> Result<(), Error<T::Error>> {
        self.enable_raw(reg.addr(), bits)
    }

    /// Read-modify-write: clears `bits` in `reg`.
    pub fn disable_options<R: Register>(&mut self, reg: R, bits: u8) -> Result<(), Error<T::Error>> {
        self.disable_raw(reg.addr(), bits)
    }

    // Interrupt shadow state.

    /// Enables interrupt sources in the role's top-level enable register
    /// and mirrors them into the shadow mask.
    pub fn enable_interrupts(&mut self, bits: u8) -> Result<(), Error<T::Error>> {
        match self.role {
            Role::Host => self.enable_options(HostReg::Hien, bits)?,
            Role::Peripheral => self.enable_options(PeripheralReg::Usbien, bits)?,
        }
        self.enabled_irq |= bits;
        Ok(())
    }

    pub fn disable_interrupts(&mut self, bits: u8) -> Result<(), Error<T::Error>> {
        match self.role {
            Role::Host => self.disable_options(HostReg::Hien, bits)?,
            Role::Peripheral => self.disable_options(PeripheralReg::Usbien, bits)?,
        }
        self.enabled_irq &= !bits;
        Ok(())
    }

    /// Enables endpoint interrupt sources. Endpoint interrupts only exist
    /// in the peripheral role; for a host this is a complete no-op, with
    /// no bus traffic.
    pub fn enable_endpoint_interrupts(&mut self, bits: u8) -> Result<(), Error<T::Error>> {
        if self.role == Role::Host {
            return Ok(());
        }
        self.enable_options(PeripheralReg::Epien, bits)?;
        self.enabled_ep_irq |= bits;
        Ok(())
    }

    pub fn disable_endpoint_interrupts(&mut self, bits: u8) -> Result<(), Error<T::Error>> {
        if self.role == Role::Host {
            return Ok(());
        }
        self.disable_options(PeripheralReg::Epien, bits)?;
        self.enabled_ep_irq &= !bits;
        Ok(())
    }

    /// Acknowledges pending bits in the role's top-level status register.
    /// The status bits are write-1-to-clear; the enable mask is untouched.
    pub fn clear_interrupt_status(&mut self, bits: u8) -> Result<(), Error<T::Error>> {
        match self.role {
            Role::Host => self.enable_options(HostReg::Hirq, bits),
            Role::Peripheral => self.enable_options(PeripheralReg::Usbirq, bits),
        }
    }

    /// Acknowledges pending endpoint interrupt bits. No-op for a host.
    pub fn clear_endpoint_interrupt_status(&mut self, bits: u8) -> Result<(), Error<T::Error>> {
        if self.role == Role::Host {
            return Ok(());
        }
        self.write_register(PeripheralReg::Epirq, bits)?;
        Ok(())
    }

    /// Raw pending bits from the role's top-level status register.
    pub fn interrupt_status(&mut self) -> Result<u8, Error<T::Error>> {
        match self.role {
            Role::Host => self.read_register(HostReg::Hirq),
            Role::Peripheral => self.read_register(PeripheralReg::Usbirq),
        }
    }

    /// Pending bits masked by the shadow enable mask; what the dispatcher
    /// branches on.
    pub fn enabled_interrupt_status(&mut self) -> Result<u8, Error<T::Error>> {
        Ok(self.interrupt_status()? & self.enabled_irq)
    }

    /// Raw pending endpoint bits. Architecturally zero for a host.
    pub fn endpoint_interrupt_status(&mut self) -> Result<u8, Error<T::Error>> {
        if self.role == Role::Host {
            return Ok(0);
        }
        self.read_register(PeripheralReg::Epirq)
    }

    pub fn enabled_endpoint_interrupt_status(&mut self) -> Result<u8, Error<T::Error>> {
        Ok(self.endpoint_interrupt_status()? & self.enabled_ep_irq)
    }

    /// Opens the master gate: lets enabled interrupts reach the INT pin.
    pub fn enable_master_interrupt(&mut self) -> Result<(), Error<T::Error>> {
        let addr = self.shared_reg(HostReg::Cpuctl, PeripheralReg::Cpuctl);
        self.write_raw(addr, CpuCtl::IE.bits())?;
        Ok(())
    }

    /// Closes the master gate for controlled quiescence.
    pub fn disable_master_interrupt(&mut self) -> Result<(), Error<T::Error>> {
        let addr = self.shared_reg(HostReg::Cpuctl, PeripheralReg::Cpuctl);
        self.disable_raw(addr, CpuCtl::IE.bits())
    }

    // Reset and bring-up sequencing.

    /// Pulses the chip-level reset and re-establishes a quiescent
    /// interrupt configuration for the current role.
    ///
    /// The SPI pin configuration survives a chip reset, so this is safe
    /// to call at any time after construction, and calling it again is
    /// harmless. Both shadow masks and the ACKSTAT flag come out cleared.
    pub fn reset(&mut self) -> Result<(), Error<T::Error>> {
        let usbctl = self.shared_reg(HostReg::Usbctl, PeripheralReg::Usbctl);
        self.write_raw(usbctl, UsbCtl::CHIPRES.bits())?;
        self.write_raw(usbctl, 0)?;

        let usbirq = self.shared_reg(HostReg::Usbirq, PeripheralReg::Usbirq);
        self.wait_until(Wait::Oscillator, self.config.oscillator_timeout_us, OSC_STEP_US, |usb| {
            Ok(usb.read_raw(usbirq)? & UsbIrq::OSCOK.bits() != 0)
        })?;
        debug!("oscillator stabilized");

        self.disable_master_interrupt()?;
        match self.role {
            Role::Host => {
                self.write_register(HostReg::Hien, 0)?;
                self.write_register(HostReg::Hirq, 0xFF)?;
            }
            Role::Peripheral => {
                self.write_register(PeripheralReg::Epien, 0)?;
                self.write_register(PeripheralReg::Epirq, 0xFF)?;
                self.write_register(PeripheralReg::Usbien, 0)?;
                self.write_register(PeripheralReg::Usbirq, 0xFF)?;
            }
        }
        self.enabled_irq = 0;
        self.enabled_ep_irq = 0;
        self.ackstat = false;
        Ok(())
    }

    /// One-time initialization: fixes the role, configures the SPI and
    /// INT pin modes, resets the chip, and applies role options.
    ///
    /// The INT line itself is the board's job: configure it as a
    /// pulled-up, falling-edge interrupt and forward edges to
    /// [`BusAdapter::on_interrupt`](crate::BusAdapter::on_interrupt).
    pub fn start(&mut self, role: Role) -> Result<(), Error<T::Error>> {
        self.role = role;

        // Full-duplex SPI, open-drain active-low INT. Survives reset().
        let pinctl = self.shared_reg(HostReg::Pinctl, PeripheralReg::Pinctl);
        self.write_raw(pinctl, (PinCtl::FDUPSPI | PinCtl::INTLEVEL).bits())?;

        self.reset()?;

        match role {
            Role::Host => {
                debug!("starting as host");
                // Host mode with the internal 15k pull-downs on both
                // data lines, so an attaching device is detectable.
                self.enable_options(
                    HostReg::Mode,
                    (ModeCtl::HOST | ModeCtl::DMPULLDN | ModeCtl::DPPULLDN).bits(),
                )?;
            }
            Role::Peripheral => {
                debug!("starting as peripheral");
            }
        }
        Ok(())
    }

    /// Samples the bus lines, host side.
    ///
    /// Commands a sample, waits (bounded) for it to complete, and returns
    /// the J/K state. Useful at boot to spot a device that was attached
    /// before the first connect-detect interrupt could fire.
    pub fn scan_bus(&mut self) -> Result<LineState, Error<T::Error>> {
        self.enable_options(HostReg::Hctl, Hctl::SAMPLEBUS.bits())?;
        let timeout = self.config.sample_timeout_ms.saturating_mul(1_000);
        self.wait_until(Wait::BusSample, timeout, SAMPLE_STEP_US, |usb| {
            Ok(usb.read_register(HostReg::Hctl)? & Hctl::SAMPLEBUS.bits() != 0)
        })?;
        let hrsl = self.read_register(HostReg::Hrsl)?;
        Ok(LineState::from_hrsl(hrsl))
    }

    /// Polls a chip condition until it holds or the timeout elapses.
    pub(crate) fn wait_until(
        &mut self,
        wait: Wait,
        timeout_us: u32,
        step_us: u32,
        mut done: impl FnMut(&mut Self) -> Result<bool, Error<T::Error>>,
    ) -> Result<(), Error<T::Error>> {
        let mut waited = 0u32;
        while !done(&mut *self)? {
            if waited >= timeout_us {
                warn!("timed out waiting for {:?}", wait);
                return Err(Error::Timeout(wait));
            }
            self.delay.delay_us(step_us);
            waited = waited.saturating_add(step_us);
        }
        Ok(())
    }

    // Event dispatch.

    /// Handles one edge of the chip's interrupt line.
    ///
    /// Reads the enabled-and-pending status for both interrupt groups and
    /// branches in fixed priority order: setup received, IN buffer
    /// available, bus reset done, connect detect. Pending-bit order says
    /// nothing about arrival order, so the priority is all there is.
    ///
    /// Call this from a context that can block: connect handling performs
    /// multi-millisecond settle delays and runs the collaborators.
    pub fn poll<E: Events<T, D>>(&mut self, events: &mut E) -> Result<(), Error<T::Error>> {
        let usb_status = self.enabled_interrupt_status()?;
        let ep_status = self.enabled_endpoint_interrupt_status()?;

        if ep_status & EpIrq::SUDAV.bits() != 0 {
            self.on_setup_received(events)?;
        }
        if ep_status & EpIrq::IN2BAV.bits() != 0 {
            self.on_in_buffer_available()?;
        }
        if self.role == Role::Peripheral && usb_status & UsbIrq::URESDN.bits() != 0 {
            self.on_bus_reset_done()?;
        }
        if self.role == Role::Host && usb_status & HostIrq::CONDET.bits() != 0 {
            self.on_connect_detect(events)?;
        }
        Ok(())
    }
}

#[cfg(test)]
mod test {
    use crate::mock::{MockError, MockTransport, NoopDelay};
    use crate::{Config, Error, HostReg, LineState, Max3421, PeripheralReg, Role, Wait};

    fn started(role: Role) -> Max3421<MockTransport, NoopDelay> {
        let mut usb = Max3421::new(MockTransport::new(), NoopDelay, Config::default());
        usb.start(role).unwrap();
        usb.transport.log.clear();
        usb
    }

    #[test]
    fn ackstat_is_one_shot() {
        let mut usb = started(Role::Host);
        usb.write_register_as(HostReg::Peraddr, 1).unwrap();
        usb.write_register(HostReg::Peraddr, 2).unwrap();
        assert_eq!(usb.transport.log.len(), 2);
        assert_eq!(usb.transport.log[0].command & 1, 1);
        assert_eq!(usb.transport.log[1].command & 1, 0);
    }

    #[test]
    fn ackstat_consumed_by_reads_too() {
        let mut usb = started(Role::Host);
        usb.read_register_as(HostReg::Hrsl).unwrap();
        usb.read_register(HostReg::Hrsl).unwrap();
        assert_eq!(usb.transport.log[0].command & 1, 1);
        assert_eq!(usb.transport.log[1].command & 1, 0);
    }

    #[test]
    fn write_register_returns_concurrent_readback() {
        let mut usb = started(Role::Host);
        usb.transport.regs[HostReg::Peraddr as usize] = 0xAA;
        let readback = usb.write_register(HostReg::Peraddr, 0x55).unwrap();
        assert_eq!(readback, 0xAA);
        assert_eq!(usb.transport.regs[HostReg::Peraddr as usize], 0x55);
    }

    #[test]
    fn enable_disable_options_are_read_modify_write() {
        let mut usb = started(Role::Host);
        usb.transport.regs[HostReg::Mode as usize] = 0b1001;
        usb.enable_options(HostReg::Mode, 0b0100).unwrap();
        assert_eq!(usb.transport.regs[HostReg::Mode as usize], 0b1101);
        usb.disable_options(HostReg::Mode, 0b1001).unwrap();
        assert_eq!(usb.transport.regs[HostReg::Mode as usize], 0b0100);
    }

    #[test]
    fn shadow_mask_enable_disable_round_trips() {
        let mut usb = started(Role::Host);
        usb.enable_interrupts(0b0010_0001).unwrap();
        let before = usb.enabled_irq;
        usb.enable_interrupts(0b0101_0000).unwrap();
        usb.disable_interrupts(0b0101_0000).unwrap();
        assert_eq!(usb.enabled_irq, before);
    }

    #[test]
    fn shadow_mask_tracks_hardware_writes() {
        let mut usb = started(Role::Host);
        usb.enable_interrupts(0b0010_0000).unwrap();
        assert_eq!(usb.enabled_irq, 0b0010_0000);
        assert_eq!(usb.transport.regs[HostReg::Hien as usize], 0b0010_0000);
        usb.disable_interrupts(0b0010_0000).unwrap();
        assert_eq!(usb.enabled_irq, 0);
        assert_eq!(usb.transport.regs[HostReg::Hien as usize], 0);
    }

    #[test]
    fn endpoint_interrupts_are_noop_for_host() {
        let mut usb = started(Role::Host);
        usb.enable_endpoint_interrupts(0b0010_0000).unwrap();
        assert_eq!(usb.enabled_ep_irq, 0);
        assert!(usb.transport.log.is_empty());
    }

    #[test]
    fn enabled_status_masks_by_shadow() {
        let mut usb = started(Role::Host);
        usb.enable_interrupts(0b0010_0000).unwrap();
        usb.transport.regs[HostReg::Hirq as usize] = 0xFF;
        assert_eq!(usb.enabled_interrupt_status().unwrap(), 0b0010_0000);
        assert_eq!(usb.interrupt_status().unwrap(), 0xFF);
    }

    #[test]
    fn reset_clears_shadows_and_ackstat() {
        let mut usb = started(Role::Peripheral);
        usb.enable_interrupts(0b1000_0000).unwrap();
        usb.enable_endpoint_interrupts(0b0010_0000).unwrap();
        usb.set_ackstat();
        usb.reset().unwrap();
        assert_eq!(usb.enabled_irq, 0);
        assert_eq!(usb.enabled_ep_irq, 0);
        assert!(!usb.ackstat);
    }

    #[test]
    fn reset_times_out_without_oscillator() {
        let mut usb = started(Role::Host);
        usb.transport.oscillator_ok = false;
        usb.transport.regs[HostReg::Usbirq as usize] = 0;
        assert_eq!(usb.reset(), Err(Error::Timeout(Wait::Oscillator)));
    }

    #[test]
    fn multi_write_then_multi_read_round_trips() {
        let mut usb = started(Role::Peripheral);
        usb.multi_write_register(PeripheralReg::Ep0Fifo, &[0xDE, 0xAD, 0xBE])
            .unwrap();
        let mut buffer = [0u8; 3];
        usb.multi_read_register(PeripheralReg::Ep0Fifo, &mut buffer)
            .unwrap();
        assert_eq!(buffer, [0xDE, 0xAD, 0xBE]);
    }

    #[test]
    fn burst_emits_one_command_byte() {
        let mut usb = started(Role::Peripheral);
        usb.multi_write_register(PeripheralReg::Ep2InFifo, &[1, 2, 3, 4])
            .unwrap();
        assert_eq!(usb.transport.log.len(), 1);
        assert_eq!(usb.transport.log[0].data, [1, 2, 3, 4]);
    }

    #[test]
    fn scan_bus_extracts_line_state() {
        let cases = [
            (0b0000_0000, LineState::Se0),
            (0b0100_0000, LineState::K),
            (0b1000_0000, LineState::J),
            (0b1100_0000, LineState::Undefined),
        ];
        for (hrsl, expected) in cases {
            let mut usb = started(Role::Host);
            usb.transport.regs[HostReg::Hrsl as usize] = hrsl;
            assert_eq!(usb.scan_bus().unwrap(), expected);
        }
    }

    #[test]
    fn master_gate_enable_is_direct_write() {
        let mut usb = started(Role::Host);
        usb.enable_master_interrupt().unwrap();
        assert_eq!(usb.transport.regs[HostReg::Cpuctl as usize], 1);
        usb.disable_master_interrupt().unwrap();
        assert_eq!(usb.transport.regs[HostReg::Cpuctl as usize], 0);
    }

    #[test]
    fn transport_faults_surface() {
        let mut usb = started(Role::Host);
        usb.transport.fail = true;
        assert_eq!(
            usb.read_register(HostReg::Hrsl),
            Err(Error::Transport(MockError))
        );
    }
}
