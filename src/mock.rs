//! Scripted chip double for the unit tests

use std::collections::VecDeque;
use std::vec::Vec;

use crate::Transport;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct MockError;

/// One framed transaction as seen on the wire.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Txn {
    pub command: u8,
    pub data: Vec<u8>,
}

/// Emulates enough of the chip to exercise the driver.
///
/// Plain registers are bytes in `regs`, poked directly by tests. Burst
/// traffic treats an address as a FIFO: `write_sequence` appends and
/// `read_sequence` replays, falling back to the register byte when the
/// FIFO runs dry. The interrupt status registers (EPIRQ, USBIRQ, HIRQ)
/// are write-1-to-clear, and OSCOK re-asserts after any USBIRQ write
/// while `oscillator_ok` holds, like the real oscillator would.
pub struct MockTransport {
    pub regs: [u8; 32],
    pub fail: bool,
    pub oscillator_ok: bool,
    pub log: Vec<Txn>,
    fifos: [VecDeque<u8>; 32],
}

/// Write-1-to-clear status registers: EPIRQ, USBIRQ, HIRQ.
const W1C: [usize; 3] = [11, 13, 25];

impl MockTransport {
    pub fn new() -> Self {
        let mut regs = [0u8; 32];
        // Oscillator reports stable from the start.
        regs[13] = 0x01;
        MockTransport {
            regs,
            fail: false,
            oscillator_ok: true,
            log: Vec::new(),
            fifos: std::array::from_fn(|_| VecDeque::new()),
        }
    }

    pub fn load_fifo(&mut self, addr: usize, bytes: &[u8]) {
        self.fifos[addr].extend(bytes.iter().copied());
    }

    fn write(&mut self, addr: usize, value: u8) {
        if W1C.contains(&addr) {
            self.regs[addr] &= !value;
        } else {
            self.regs[addr] = value;
        }
        if self.oscillator_ok {
            self.regs[13] |= 0x01;
        }
    }
}

impl Transport for MockTransport {
    type Error = MockError;

    fn exchange(&mut self, command: u8, data: u8) -> Result<u8, MockError> {
        if self.fail {
            return Err(MockError);
        }
        let addr = usize::from(command >> 3);
        let write = command & 0b10 != 0;
        if write {
            self.log.push(Txn {
                command,
                data: Vec::from([data]),
            });
            let readback = self.regs[addr];
            self.write(addr, data);
            Ok(readback)
        } else {
            self.log.push(Txn {
                command,
                data: Vec::new(),
            });
            Ok(self.regs[addr])
        }
    }

    fn write_sequence(&mut self, command: u8, values: &[u8]) -> Result<u8, MockError> {
        if self.fail {
            return Err(MockError);
        }
        let addr = usize::from(command >> 3);
        self.log.push(Txn {
            command,
            data: Vec::from(values),
        });
        self.fifos[addr].extend(values.iter().copied());
        Ok(0)
    }

    fn read_sequence(&mut self, command: u8, buffer: &mut [u8]) -> Result<(), MockError> {
        if self.fail {
            return Err(MockError);
        }
        let addr = usize::from(command >> 3);
        self.log.push(Txn {
            command,
            data: Vec::new(),
        });
        for slot in buffer.iter_mut() {
            *slot = self.fifos[addr].pop_front().unwrap_or(self.regs[addr]);
        }
        Ok(())
    }
}

/// Delay provider that elapses no time; the mock never needs real waits.
pub struct NoopDelay;

impl embedded_hal::delay::DelayNs for NoopDelay {
    fn delay_ns(&mut self, _ns: u32) {}
}
