//! `embedded-hal` SPI transport

use embedded_hal::spi::{Operation, SpiDevice};

use crate::Transport;

/// [`Transport`] over an `embedded-hal` [`SpiDevice`].
///
/// The device must be configured for SPI mode 0, MSB first. Each register
/// transaction maps to exactly one `SpiDevice` transaction, so the chip
/// select stays asserted across the command byte and its data bytes as
/// the chip's burst mode requires.
pub struct SpiTransport<S> {
    spi: S,
}

impl<S> SpiTransport<S> {
    pub fn new(spi: S) -> Self {
        SpiTransport { spi }
    }

    /// Releases the wrapped device.
    pub fn release(self) -> S {
        self.spi
    }
}

impl<S: SpiDevice> Transport for SpiTransport<S> {
    type Error = S::Error;

    fn exchange(&mut self, command: u8, data: u8) -> Result<u8, Self::Error> {
        let mut frame = [command, data];
        self.spi.transfer_in_place(&mut frame)?;
        Ok(frame[1])
    }

    fn write_sequence(&mut self, command: u8, values: &[u8]) -> Result<u8, Self::Error> {
        let Some((&last, head)) = values.split_last() else {
            self.spi.write(&[command])?;
            return Ok(0);
        };
        let mut readback = [0u8];
        self.spi.transaction(&mut [
            Operation::Write(&[command]),
            Operation::Write(head),
            Operation::Transfer(&mut readback, &[last]),
        ])?;
        Ok(readback[0])
    }

    fn read_sequence(&mut self, command: u8, buffer: &mut [u8]) -> Result<(), Self::Error> {
        self.spi
            .transaction(&mut [Operation::Write(&[command]), Operation::Read(buffer)])
    }
}
