//! A simulated transceiver for the unit tests
//!
//! [`SimTrx`] plays the SPI peripheral and decodes the command bytes the way
//! the transceiver does. [`SimPin`], [`SimIrq`] and [`SimDelay`] share its
//! state, so a [`Probe`] can inspect everything that happened on the wire.

use std::{cell::RefCell, convert::Infallible, ops::Deref, rc::Rc, vec::Vec};

use embedded_hal::{blocking::delay::DelayUs, digital::v2::OutputPin, spi::FullDuplex};

use crate::{
    hl::{Blocking, NonBlocking, Trx},
    irq::IrqControl,
    Config, FRAME_BUFFER_LEN,
};

const REGISTER_COUNT: usize = 64;
const SRAM_LEN: usize = 128;

#[derive(Clone, Copy, Debug)]
enum Phase {
    Command,
    RegisterWrite(u8),
    RegisterRead(u8),
    FrameWrite(usize),
    FrameRead(usize),
    SramAddress { write: bool },
    SramWrite(usize),
    SramRead(usize),
    Done,
}

struct Wire {
    registers: [u8; REGISTER_COUNT],
    frame: [u8; FRAME_BUFFER_LEN],
    sram: [u8; SRAM_LEN],

    transactions: Vec<Vec<u8>>,
    masked: Vec<bool>,
    selects: usize,
    deselects: usize,
    selected: bool,

    phase: Phase,
    response: Option<u8>,
    sends_left: Option<usize>,

    trx_irq: bool,
    transfer_irq: bool,
    delayed_us: u32,
}

impl Wire {
    fn new() -> Self {
        Wire {
            registers: [0; REGISTER_COUNT],
            frame: [0; FRAME_BUFFER_LEN],
            sram: [0; SRAM_LEN],
            transactions: Vec::new(),
            masked: Vec::new(),
            selects: 0,
            deselects: 0,
            selected: false,
            phase: Phase::Done,
            response: None,
            sends_left: None,
            trx_irq: false,
            transfer_irq: false,
            delayed_us: 0,
        }
    }

    fn shift(&mut self, byte: u8) -> u8 {
        let (response, next) = match self.phase {
            Phase::Command => match byte {
                b if b & 0xC0 == 0xC0 => (0x00, Phase::RegisterWrite(b & 0x3F)),
                b if b & 0xC0 == 0x80 => (0x00, Phase::RegisterRead(b & 0x3F)),
                0x60 => (0x00, Phase::FrameWrite(0)),
                0x20 => (0x00, Phase::FrameRead(0)),
                0x40 => (0x00, Phase::SramAddress { write: true }),
                0x00 => (0x00, Phase::SramAddress { write: false }),
                _ => (0x00, Phase::Done),
            },
            Phase::RegisterWrite(addr) => {
                self.registers[addr as usize] = byte;
                (0x00, Phase::Done)
            }
            Phase::RegisterRead(addr) => (self.registers[addr as usize], Phase::Done),
            Phase::FrameWrite(i) => {
                self.frame[i % FRAME_BUFFER_LEN] = byte;
                (0x00, Phase::FrameWrite(i + 1))
            }
            Phase::FrameRead(i) => (self.frame[i % FRAME_BUFFER_LEN], Phase::FrameRead(i + 1)),
            Phase::SramAddress { write: true } => (0x00, Phase::SramWrite(byte as usize)),
            Phase::SramAddress { write: false } => (0x00, Phase::SramRead(byte as usize)),
            Phase::SramWrite(offset) => {
                let slot = &mut self.sram[offset % SRAM_LEN];
                let previous = *slot;
                *slot = byte;
                (previous, Phase::SramWrite(offset + 1))
            }
            Phase::SramRead(offset) => (self.sram[offset % SRAM_LEN], Phase::SramRead(offset + 1)),
            Phase::Done => (0x00, Phase::Done),
        };

        self.phase = next;
        response
    }
}

/// Error returned by the simulated SPI peripheral
#[derive(Debug, Eq, PartialEq)]
pub enum SimError {
    /// A failure was injected with [`Probe::fail_after`]
    Injected,
    /// A byte was sent while chip select was high
    NotSelected,
    /// `read` was called without a preceding `send`
    NothingSent,
}

/// Shared view of the simulated transceiver
#[derive(Clone)]
pub struct Probe(Rc<RefCell<Wire>>);

impl Probe {
    fn new() -> Self {
        Probe(Rc::new(RefCell::new(Wire::new())))
    }

    /// The bytes sent in each transaction, in order
    pub fn transactions(&self) -> Vec<Vec<u8>> {
        self.0.borrow().transactions.clone()
    }

    /// For each transaction, whether the trx interrupt was masked at select
    pub fn masked(&self) -> Vec<bool> {
        self.0.borrow().masked.clone()
    }

    pub fn register(&self, addr: u8) -> u8 {
        self.0.borrow().registers[addr as usize]
    }

    pub fn load_frame(&self, data: &[u8]) {
        self.0.borrow_mut().frame[..data.len()].copy_from_slice(data);
    }

    pub fn frame(&self, len: usize) -> Vec<u8> {
        self.0.borrow().frame[..len].to_vec()
    }

    pub fn sram(&self, offset: usize, len: usize) -> Vec<u8> {
        self.0.borrow().sram[offset..offset + len].to_vec()
    }

    /// Let `sends` more bytes through, then fail every following one
    pub fn fail_after(&self, sends: usize) {
        self.0.borrow_mut().sends_left = Some(sends);
    }

    /// Stop injecting failures
    pub fn recover(&self) {
        self.0.borrow_mut().sends_left = None;
    }

    pub fn selects(&self) -> usize {
        self.0.borrow().selects
    }

    pub fn deselects(&self) -> usize {
        self.0.borrow().deselects
    }

    pub fn is_selected(&self) -> bool {
        self.0.borrow().selected
    }

    pub fn is_transfer_irq_enabled(&self) -> bool {
        self.0.borrow().transfer_irq
    }

    pub fn delayed_us(&self) -> u32 {
        self.0.borrow().delayed_us
    }
}

/// The simulated SPI peripheral
pub struct SimTrx(Probe);

impl SimTrx {
    pub fn new() -> Self {
        SimTrx(Probe::new())
    }

    pub fn probe(&self) -> Probe {
        self.0.clone()
    }
}

impl Deref for SimTrx {
    type Target = Probe;

    fn deref(&self) -> &Probe {
        &self.0
    }
}

impl FullDuplex<u8> for SimTrx {
    type Error = SimError;

    fn read(&mut self) -> nb::Result<u8, SimError> {
        let response = self.0 .0.borrow_mut().response.take();
        response.ok_or(nb::Error::Other(SimError::NothingSent))
    }

    fn send(&mut self, byte: u8) -> nb::Result<(), SimError> {
        let mut wire = self.0 .0.borrow_mut();

        if let Some(left) = wire.sends_left.as_mut() {
            if *left == 0 {
                return Err(nb::Error::Other(SimError::Injected));
            }
            *left -= 1;
        }
        if !wire.selected {
            return Err(nb::Error::Other(SimError::NotSelected));
        }

        if let Some(transaction) = wire.transactions.last_mut() {
            transaction.push(byte);
        }
        let response = wire.shift(byte);
        wire.response = Some(response);

        Ok(())
    }
}

/// The simulated chip select pin
pub struct SimPin(Probe);

impl SimPin {
    pub fn new(probe: Probe) -> Self {
        SimPin(probe)
    }
}

impl Deref for SimPin {
    type Target = Probe;

    fn deref(&self) -> &Probe {
        &self.0
    }
}

impl OutputPin for SimPin {
    type Error = Infallible;

    fn set_low(&mut self) -> Result<(), Infallible> {
        let mut wire = self.0 .0.borrow_mut();
        wire.selects += 1;

        if !wire.selected {
            wire.selected = true;
            wire.phase = Phase::Command;
            wire.response = None;
            wire.transactions.push(Vec::new());
            let masked = !wire.trx_irq;
            wire.masked.push(masked);
        }

        Ok(())
    }

    fn set_high(&mut self) -> Result<(), Infallible> {
        let mut wire = self.0 .0.borrow_mut();
        wire.deselects += 1;
        wire.selected = false;
        wire.phase = Phase::Done;

        Ok(())
    }
}

/// Simulated interrupt control
///
/// Both interrupts start out disabled.
#[derive(Clone)]
pub struct SimIrq(Probe);

impl SimIrq {
    /// Interrupt control that isn't attached to a simulated transceiver
    pub fn new() -> Self {
        SimIrq(Probe::new())
    }

    pub fn attached(probe: Probe) -> Self {
        SimIrq(probe)
    }

    pub fn is_transfer_irq_enabled(&self) -> bool {
        self.0.is_transfer_irq_enabled()
    }
}

impl IrqControl for SimIrq {
    fn is_trx_irq_enabled(&self) -> bool {
        self.0 .0.borrow().trx_irq
    }

    fn enable_trx_irq(&mut self) {
        self.0 .0.borrow_mut().trx_irq = true;
    }

    fn disable_trx_irq(&mut self) {
        self.0 .0.borrow_mut().trx_irq = false;
    }

    fn enable_transfer_irq(&mut self) {
        self.0 .0.borrow_mut().transfer_irq = true;
    }

    fn disable_transfer_irq(&mut self) {
        self.0 .0.borrow_mut().transfer_irq = false;
    }
}

/// Simulated delay that only adds up the time it was asked to wait
pub struct SimDelay(Probe);

impl DelayUs<u8> for SimDelay {
    fn delay_us(&mut self, us: u8) {
        self.0 .0.borrow_mut().delayed_us += u32::from(us);
    }
}

pub type SimTrxDriver<W> = Trx<SimTrx, SimPin, SimIrq, SimDelay, W>;

fn trx<W>(writer: W) -> (SimTrxDriver<W>, Probe)
where
    W: crate::hl::FrameWrite,
{
    let spi = SimTrx::new();
    let probe = spi.probe();
    let pin = SimPin::new(probe.clone());
    let irq = SimIrq::attached(probe.clone());
    let delay = SimDelay(probe.clone());

    let trx = Trx::new(spi, pin, irq, delay, writer, Config::default()).unwrap();
    (trx, probe)
}

pub fn blocking_trx() -> (SimTrxDriver<Blocking>, Probe) {
    trx(Blocking)
}

pub fn non_blocking_trx() -> (SimTrxDriver<NonBlocking>, Probe) {
    trx(NonBlocking::new())
}
