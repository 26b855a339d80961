//! Collaborator hooks consumed by the event dispatcher

use crate::{Error, Max3421, Transport, SETUP_LEN};

/// Upstream collaborators invoked from [`Max3421::poll`].
///
/// The driver hands itself back to each hook so the collaborator can run
/// its own register transactions over the same transport. Hooks are
/// called synchronously, from whatever context runs `poll`.
///
/// The transfer-level hooks are never called in roles that don't use
/// them, so a peripheral-only listener can stub the host hooks and vice
/// versa.
pub trait Events<T: Transport, D> {
    /// Drive a full USB bus reset. Host role, called after a device is
    /// detected and the SOF generator is confirmed running.
    fn bus_reset(&mut self, usb: &mut Max3421<T, D>) -> Result<(), Error<T::Error>>;

    /// Enumerate the attached device. Host role, called once per attach
    /// (plus configured retries). Return [`Error::EnumerationFailed`] for
    /// a protocol-level failure; transport errors propagate as usual.
    fn enumerate(&mut self, usb: &mut Max3421<T, D>) -> Result<(), Error<T::Error>>;

    /// Compose and send the response to a GET_STATUS request. Peripheral
    /// role, handed the 8-byte setup packet that asked.
    fn status_request(
        &mut self,
        usb: &mut Max3421<T, D>,
        setup: &[u8; SETUP_LEN],
    ) -> Result<(), Error<T::Error>>;

    /// A device was attached or detached. Fired at most once per detected
    /// transition, with the new connection state. Default: dropped.
    fn connection_changed(&mut self, _connected: bool) {}
}
