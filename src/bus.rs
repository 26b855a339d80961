//! Interrupt-safe shared access and deferred event servicing
//!
//! The chip raises a single falling edge on its INT line, but handling
//! one event means many framed SPI transactions plus settle delays. Far
//! too much for an ISR. `BusAdapter` splits the work: the ISR records
//! the edge with [`on_interrupt`](BusAdapter::on_interrupt), and a task
//! context drains it with [`service`](BusAdapter::service). Foreground
//! code reaches the same driver through
//! [`with_usb_mut`](BusAdapter::with_usb_mut), serialized against the
//! service path by a critical section. Deferring changes nothing
//! observable: each recorded edge still produces one dispatch, and
//! listeners still hear one notification per transition.

use core::cell::RefCell;
use core::sync::atomic::{AtomicBool, Ordering};

use cortex_m::interrupt::{self, Mutex};
use embedded_hal::delay::DelayNs;

use crate::events::Events;
use crate::{Error, Max3421, Transport};

pub struct BusAdapter<T, D> {
    usb: Mutex<RefCell<Max3421<T, D>>>,
    pending: AtomicBool,
}

impl<T: Transport, D: DelayNs> BusAdapter<T, D> {
    /// Wraps a started driver for shared ISR / foreground use.
    pub fn new(usb: Max3421<T, D>) -> Self {
        BusAdapter {
            usb: Mutex::new(RefCell::new(usb)),
            pending: AtomicBool::new(false),
        }
    }

    /// Call from the INT pin's falling-edge ISR. Only records the edge;
    /// never touches the bus.
    pub fn on_interrupt(&self) {
        self.pending.store(true, Ordering::Release);
    }

    /// Whether an edge has been recorded and not yet serviced.
    pub fn is_pending(&self) -> bool {
        self.pending.load(Ordering::Acquire)
    }

    /// Dispatches one recorded interrupt, if any. Call from the main
    /// loop or a dedicated task, never from the ISR itself. Returns
    /// whether anything was serviced.
    pub fn service<E: Events<T, D>>(&self, events: &mut E) -> Result<bool, Error<T::Error>> {
        if !self.pending.swap(false, Ordering::AcqRel) {
            return Ok(false);
        }
        self.with_usb_mut(|usb| usb.poll(events))?;
        Ok(true)
    }

    /// Interrupt-safe, mutable access to the driver.
    pub fn with_usb_mut<R>(&self, func: impl FnOnce(&mut Max3421<T, D>) -> R) -> R {
        interrupt::free(|cs| {
            let usb = self.usb.borrow(cs);
            let mut usb = usb.borrow_mut();
            func(&mut *usb)
        })
    }
}
