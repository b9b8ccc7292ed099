//! Low-level interface to the AT86RF2xx
//!
//! This module implements the bus transport: every access to the transceiver
//! is one SPI transaction, framed by the chip select line, that starts with a
//! command byte and continues with data bytes. Bytes are shifted one at a time,
//! and every byte waits for the SPI peripheral to report completion before the
//! next one starts.
//!
//! Nothing in here masks interrupts or checks whether another transaction is
//! in flight. Users of this library should typically not need this module.
//! Please consider using the [high-level interface] instead, which brackets
//! each transaction with a [`TrxRegion`].
//!
//! **NOTE**: The bus protocol has no acknowledgement. A transceiver that is
//! absent or unpowered looks exactly like one that returns `0x00` everywhere.
//! The only errors reported here are those reported by the SPI and pin
//! implementations.
//!
//! [high-level interface]: ../hl/index.html
//! [`TrxRegion`]: ../irq/struct.TrxRegion.html

use core::fmt;

use embedded_hal::{digital::v2::OutputPin, spi::FullDuplex};

/// Command bits for a register write, OR-ed with the register address
pub const WRITE_ACCESS_COMMAND: u8 = 0xC0;

/// Command bits for a register read, OR-ed with the register address
pub const READ_ACCESS_COMMAND: u8 = 0x80;

/// Frame buffer write command
pub const FRAME_WRITE_COMMAND: u8 = 0x60;

/// Frame buffer read command
pub const FRAME_READ_COMMAND: u8 = 0x20;

/// SRAM write command
pub const SRAM_WRITE_COMMAND: u8 = 0x40;

/// SRAM read command
pub const SRAM_READ_COMMAND: u8 = 0x00;

/// Byte sent to clock data out of the transceiver
pub const DUMMY_BYTE: u8 = 0x00;

/// Entry point to the low-level API
///
/// Please consider using [hl::Trx] instead.
///
/// [hl::Trx]: ../hl/struct.Trx.html
pub struct Bus<SPI, CS> {
    spi: SPI,
    chip_select: CS,
    chip_select_delay: u8,
}

impl<SPI, CS> Bus<SPI, CS> {
    /// Create a new instance of `Bus`
    ///
    /// Requires the SPI peripheral and the chip select pin that are connected
    /// to the transceiver.
    pub fn new(spi: SPI, chip_select: CS) -> Self {
        Bus {
            spi,
            chip_select,
            chip_select_delay: 0,
        }
    }

    /// Set the chip select delay.
    ///
    /// This is the amount of extra times the cs pin will be set low before any
    /// data is transfered. Fast MCUs can otherwise start clocking before the
    /// transceiver has seen the select edge.
    pub fn set_chip_select_delay(&mut self, delay: u8) {
        self.chip_select_delay = delay;
    }

    /// Release the SPI peripheral and the chip select pin
    pub fn release(self) -> (SPI, CS) {
        (self.spi, self.chip_select)
    }
}

impl<SPI, CS> Bus<SPI, CS>
where
    SPI: FullDuplex<u8>,
    CS: OutputPin,
{
    /// Write a value into a transceiver register
    ///
    /// `addr` is not range checked. Only its lower six bits address a
    /// register; anything above collides with the command bits.
    pub fn register_write(&mut self, addr: u8, value: u8) -> Result<(), Error<SPI, CS>> {
        trace!("register_write {=u8:#x} <- {=u8:#x}", addr, value);

        self.transaction(|bus| {
            bus.transfer_byte(addr | WRITE_ACCESS_COMMAND)?;
            bus.transfer_byte(value)?;
            Ok(())
        })
    }

    /// Read the current value of a transceiver register
    pub fn register_read(&mut self, addr: u8) -> Result<u8, Error<SPI, CS>> {
        let value = self.transaction(|bus| {
            bus.transfer_byte(addr | READ_ACCESS_COMMAND)?;
            // The dummy byte pumps the register value out of the chip.
            bus.transfer_byte(DUMMY_BYTE)
        })?;

        trace!("register_read {=u8:#x} -> {=u8:#x}", addr, value);
        Ok(value)
    }

    /// Write `data` into the frame buffer, blocking until the last byte is out
    ///
    /// The transceiver interrupt should be masked while this runs. An empty
    /// `data` produces a transaction that carries only the command byte.
    pub fn frame_write(&mut self, data: &[u8]) -> Result<(), Error<SPI, CS>> {
        trace!("frame_write len={=usize}", data.len());

        self.transaction(|bus| {
            bus.transfer_byte(FRAME_WRITE_COMMAND)?;
            for &byte in data {
                bus.transfer_byte(byte)?;
            }
            Ok(())
        })
    }

    /// Read `buffer.len()` bytes from the frame buffer
    ///
    /// The first byte read is the PHY header, followed by the PSDU and the
    /// link quality indicator.
    ///
    /// # Precondition
    ///
    /// The bus must already be known idle. This is meant to be called from the
    /// context that handles the transceiver's "frame received" interrupt,
    /// where no register or SRAM transaction can be in progress. Nothing here
    /// checks that.
    pub fn frame_read(&mut self, buffer: &mut [u8]) -> Result<(), Error<SPI, CS>> {
        trace!("frame_read len={=usize}", buffer.len());

        self.transaction(|bus| {
            bus.transfer_byte(FRAME_READ_COMMAND)?;
            for slot in buffer.iter_mut() {
                *slot = bus.transfer_byte(DUMMY_BYTE)?;
            }
            Ok(())
        })
    }

    /// Write `data` into transceiver SRAM, starting at `offset`
    pub fn sram_write(&mut self, offset: u8, data: &[u8]) -> Result<(), Error<SPI, CS>> {
        trace!("sram_write {=u8:#x} len={=usize}", offset, data.len());

        self.transaction(|bus| {
            bus.transfer_byte(SRAM_WRITE_COMMAND)?;
            bus.transfer_byte(offset)?;
            for &byte in data {
                bus.transfer_byte(byte)?;
            }
            Ok(())
        })
    }

    /// Read `buffer.len()` bytes from transceiver SRAM, starting at `offset`
    ///
    /// The transceiver needs some lead time before the first byte is valid.
    /// This method does not wait; the high-level interface does.
    pub fn sram_read(&mut self, offset: u8, buffer: &mut [u8]) -> Result<(), Error<SPI, CS>> {
        trace!("sram_read {=u8:#x} len={=usize}", offset, buffer.len());

        self.transaction(|bus| {
            bus.transfer_byte(SRAM_READ_COMMAND)?;
            bus.transfer_byte(offset)?;
            for slot in buffer.iter_mut() {
                *slot = bus.transfer_byte(DUMMY_BYTE)?;
            }
            Ok(())
        })
    }

    /// Write `buffer` into SRAM and capture what the transceiver shifts out
    ///
    /// Each byte of `buffer` is sent in an SRAM write transaction, and replaced
    /// with the byte that was received in the same slot. The AES engine uses
    /// this to return the previous result while the next block is loaded.
    pub fn sram_write_read(&mut self, offset: u8, buffer: &mut [u8]) -> Result<(), Error<SPI, CS>> {
        trace!("sram_write_read {=u8:#x} len={=usize}", offset, buffer.len());

        self.transaction(|bus| {
            bus.transfer_byte(SRAM_WRITE_COMMAND)?;
            bus.transfer_byte(offset)?;
            for slot in buffer.iter_mut() {
                *slot = bus.transfer_byte(*slot)?;
            }
            Ok(())
        })
    }

    /// Shift one byte out and wait until the byte shifted in is available
    pub fn transfer_byte(&mut self, byte: u8) -> Result<u8, Error<SPI, CS>> {
        nb::block!(self.spi.send(byte)).map_err(|err| Error::Transfer(err))?;
        nb::block!(self.spi.read()).map_err(|err| Error::Transfer(err))
    }

    /// Start shifting one byte out without waiting for it
    ///
    /// Used by the interrupt-driven frame write. The transfer-complete
    /// interrupt signals when [`Bus::finish_byte`] can collect the result.
    pub fn start_byte(&mut self, byte: u8) -> Result<(), Error<SPI, CS>> {
        nb::block!(self.spi.send(byte)).map_err(|err| Error::Transfer(err))
    }

    /// Collect the byte that was shifted in by the last [`Bus::start_byte`]
    pub fn finish_byte(&mut self) -> Result<u8, Error<SPI, CS>> {
        nb::block!(self.spi.read()).map_err(|err| Error::Transfer(err))
    }

    /// Pull the chip select line low, starting a transaction
    pub fn select(&mut self) -> Result<(), Error<SPI, CS>> {
        for _ in 0..=self.chip_select_delay {
            self.chip_select
                .set_low()
                .map_err(|err| Error::ChipSelect(err))?;
        }

        Ok(())
    }

    /// Pull the chip select line high, ending a transaction
    pub fn deselect(&mut self) -> Result<(), Error<SPI, CS>> {
        self.chip_select
            .set_high()
            .map_err(|err| Error::ChipSelect(err))
    }

    /// Run `f` with chip select asserted
    ///
    /// Chip select is released exactly once, after `f` returns, whether or
    /// not `f` failed. An error from `f` takes precedence.
    fn transaction<T, F>(&mut self, f: F) -> Result<T, Error<SPI, CS>>
    where
        F: FnOnce(&mut Self) -> Result<T, Error<SPI, CS>>,
    {
        self.select()?;
        let result = f(self);
        let released = self.deselect();

        let value = result?;
        released?;

        Ok(value)
    }
}

/// An SPI error that can occur when communicating with the transceiver
pub enum Error<SPI, CS>
where
    SPI: FullDuplex<u8>,
    CS: OutputPin,
{
    /// SPI error occured while shifting a byte
    Transfer(<SPI as FullDuplex<u8>>::Error),

    /// Error occured while changing chip select signal
    ChipSelect(<CS as OutputPin>::Error),
}

// We can't derive this implementation, as the compiler will complain that the
// associated error type doesn't implement `Debug`.
impl<SPI, CS> fmt::Debug for Error<SPI, CS>
where
    SPI: FullDuplex<u8>,
    <SPI as FullDuplex<u8>>::Error: fmt::Debug,
    CS: OutputPin,
    <CS as OutputPin>::Error: fmt::Debug,
{
    fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
        match self {
            Error::Transfer(error) => write!(f, "Transfer({:?})", error),
            Error::ChipSelect(error) => write!(f, "ChipSelect({:?})", error),
        }
    }
}
