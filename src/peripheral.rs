//! Peripheral-role setup handling
//!
//! Three interrupts matter here: SUDAV (a setup packet arrived), IN2BAV
//! (endpoint 2's IN buffer came free), and URESDN (the host finished a
//! bus reset). The chip handles the token-level handshakes itself; the
//! driver's job is to read the 8-byte packet, answer the couple of
//! standard requests that need software, and re-arm after resets.

use embedded_hal::delay::DelayNs;
use usb_device::control::Request;

use crate::events::Events;
use crate::regs::{EpIrq, PeripheralReg, UsbIrq};
use crate::{Error, Max3421, Transport, BUFFER_SIZE, SETUP_LEN};

impl<T: Transport, D: DelayNs> Max3421<T, D> {
    /// Reads the setup packet from SUDFIFO and dispatches on bRequest.
    pub(crate) fn on_setup_received<E: Events<T, D>>(
        &mut self,
        events: &mut E,
    ) -> Result<(), Error<T::Error>> {
        self.clear_endpoint_interrupt_status(EpIrq::SUDAV.bits())?;

        let mut setup = [0u8; SETUP_LEN];
        self.multi_read_register(PeripheralReg::SudFifo, &mut setup)?;
        self.buffer[..SETUP_LEN].copy_from_slice(&setup);

        match setup[1] {
            Request::SET_ADDRESS => {
                // FNADDR latches the address on its own; the ACKSTAT read
                // is the status-stage handshake, its value is discarded.
                self.set_ackstat();
                self.read_register(PeripheralReg::Fnaddr)?;
            }
            Request::GET_STATUS => {
                events.status_request(self, &setup)?;
            }
            _request => {
                self.ignored_requests = self.ignored_requests.wrapping_add(1);
                debug!("ignoring standard request {:#04x}", _request);
            }
        }
        Ok(())
    }

    /// IN2 handed its buffer back; stop listening until the transfer
    /// layer re-arms it.
    pub(crate) fn on_in_buffer_available(&mut self) -> Result<(), Error<T::Error>> {
        self.disable_endpoint_interrupts(EpIrq::IN2BAV.bits())
    }

    /// Host-driven bus reset finished; restore the setup path.
    pub(crate) fn on_bus_reset_done(&mut self) -> Result<(), Error<T::Error>> {
        self.write_register(PeripheralReg::Usbirq, UsbIrq::URESDN.bits())?;

        self.enable_endpoint_interrupts(EpIrq::SUDAV.bits())?;
        self.clear_endpoint_interrupt_status(EpIrq::SUDAV.bits())?;
        self.enable_interrupts(UsbIrq::URESDN.bits())?;
        self.clear_interrupt_status(UsbIrq::URESDN.bits())?;

        // Reopen endpoint 2's IN buffer for a full packet.
        self.write_register(PeripheralReg::Ep2InBc, BUFFER_SIZE as u8)?;
        Ok(())
    }
}
