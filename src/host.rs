//! Host-role bus-state machine
//!
//! Driven entirely by the connect-detect interrupt: sample the line
//! state, and on an attach run SOF bring-up, bus reset, and enumeration
//! before declaring the device ready. A detach tears the SOF generator
//! back down. The registered listener hears about each transition exactly
//! once, and CONDET is acknowledged whether or not the sequence succeeds.

use embedded_hal::delay::DelayNs;

use crate::events::Events;
use crate::regs::{HostIrq, HostReg, LineState, ModeCtl};
use crate::{Error, Max3421, Transport, Wait};

const FRAME_STEP_US: u32 = 1_000;

/// Where the host-side bus currently stands.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[cfg_attr(feature = "defmt-03", derive(defmt_03::Format))]
pub enum BusState {
    /// Nothing attached; SOF generator off.
    NoDevice,
    /// Presence detected. Also the terminal state when enumeration
    /// failed and no retries remain.
    Connected,
    /// Bus reset collaborator running.
    Resetting,
    /// Enumeration collaborator running.
    Enumerating,
    /// Enumerated; ready for traffic.
    Ready,
}

impl<T: Transport, D: DelayNs> Max3421<T, D> {
    /// Connect-detect fired: work out which way the bus went.
    pub(crate) fn on_connect_detect<E: Events<T, D>>(
        &mut self,
        events: &mut E,
    ) -> Result<(), Error<T::Error>> {
        let hrsl = self.read_register(HostReg::Hrsl)?;
        let present = LineState::from_hrsl(hrsl).is_attached();

        let mut result = Ok(());
        if present != self.connected {
            if present {
                result = self.attach(events);
                match result {
                    Ok(()) => {
                        self.connected = true;
                        events.connection_changed(true);
                    }
                    Err(_) => {
                        // Abort the transition and stay invisible; the
                        // next connect event restarts the sequence.
                        self.bus_state = BusState::NoDevice;
                        self.disable_options(HostReg::Mode, ModeCtl::SOFKAENAB.bits())
                            .ok();
                    }
                }
            } else {
                result = self.detach();
                self.connected = false;
                events.connection_changed(false);
            }
        }

        self.write_register(HostReg::Hirq, HostIrq::CONDET.bits())?;
        result
    }

    fn attach<E: Events<T, D>>(&mut self, events: &mut E) -> Result<(), Error<T::Error>> {
        self.bus_state = BusState::Connected;
        debug!("device attached");

        // The device won't answer anything until SOF is running.
        self.enable_options(HostReg::Mode, ModeCtl::SOFKAENAB.bits())?;
        let timeout = self.config.frame_timeout_ms.saturating_mul(1_000);
        self.wait_until(Wait::Frame, timeout, FRAME_STEP_US, |usb| {
            Ok(usb.read_register(HostReg::Hirq)? & HostIrq::FRAME.bits() != 0)
        })?;

        let mut attempts = 0;
        loop {
            self.bus_state = BusState::Resetting;
            events.bus_reset(self)?;
            self.delay.delay_ms(self.config.reset_settle_ms);

            self.bus_state = BusState::Enumerating;
            match events.enumerate(self) {
                Ok(()) => {
                    debug!("enumeration complete");
                    self.bus_state = BusState::Ready;
                    break;
                }
                Err(Error::EnumerationFailed) if attempts < self.config.enumeration_retries => {
                    attempts += 1;
                    warn!("enumeration failed, retry {}", attempts);
                }
                Err(Error::EnumerationFailed) => {
                    // Informational only: the device stays attached but
                    // unusable until the next connect event.
                    warn!("enumeration failed");
                    self.bus_state = BusState::Connected;
                    break;
                }
                Err(err) => return Err(err),
            }
        }

        // Let the bus settle before anyone requests traffic.
        self.delay.delay_ms(self.config.traffic_settle_ms);
        Ok(())
    }

    fn detach(&mut self) -> Result<(), Error<T::Error>> {
        debug!("device detached");
        self.disable_options(HostReg::Mode, ModeCtl::SOFKAENAB.bits())?;
        self.bus_state = BusState::NoDevice;
        Ok(())
    }
}
