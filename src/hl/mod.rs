//! High-level interface to the AT86RF2xx
//!
//! The entry point to this API is the [Trx] struct. Please refer to the
//! documentation there for more details.
//!
//! This module brackets every register and SRAM transaction with a
//! [`TrxRegion`], so the transceiver interrupt can't start a competing
//! transaction halfway through. This is the recommended way to access the
//! transceiver using this crate, unless you need the unguarded
//! [register-level interface].
//!
//! [`TrxRegion`]: ../irq/struct.TrxRegion.html
//! [register-level interface]: ../ll/index.html

use crate::{configs::Config, irq::IrqControl, ll};
use core::fmt;
use embedded_hal::{digital::v2::OutputPin, spi::FullDuplex};

pub use error::*;
pub use frame_write::*;
pub use subreg::*;

mod access;
mod error;
mod frame_write;
mod receiving;
mod subreg;

/// Entry point to the transceiver driver API
///
/// `W` selects how frames are written into the transceiver: [`Blocking`]
/// returns once the last byte is on the wire, [`NonBlocking`] returns right
/// after the command byte and finishes from the SPI transfer-complete
/// interrupt.
///
/// [`Blocking`]: struct.Blocking.html
/// [`NonBlocking`]: struct.NonBlocking.html
pub struct Trx<SPI, CS, IRQ, DELAY, W> {
    bus: ll::Bus<SPI, CS>,
    irq: IRQ,
    delay: DELAY,
    config: Config,
    writer: W,
}

impl<SPI, CS, IRQ, DELAY, W> Trx<SPI, CS, IRQ, DELAY, W>
where
    SPI: FullDuplex<u8>,
    CS: OutputPin,
    IRQ: IrqControl,
    W: FrameWrite,
{
    /// Create a new instance of `Trx`
    ///
    /// Requires the SPI peripheral and chip select pin connected to the
    /// transceiver, control over the two interrupt sources, a delay provider,
    /// and the frame-write strategy.
    ///
    /// Leaves the bus idle: chip select is released and the SPI
    /// transfer-complete interrupt is disabled. The transceiver interrupt is
    /// left alone.
    pub fn new(
        spi: SPI,
        chip_select: CS,
        mut irq: IRQ,
        delay: DELAY,
        writer: W,
        config: Config,
    ) -> Result<Self, Error<SPI, CS>> {
        let mut bus = ll::Bus::new(spi, chip_select);
        bus.set_chip_select_delay(config.chip_select_delay);
        bus.deselect()?;
        irq.disable_transfer_irq();

        debug!("transceiver interface initialized");

        Ok(Trx {
            bus,
            irq,
            delay,
            config,
            writer,
        })
    }
}

impl<SPI, CS, IRQ, DELAY, W> Trx<SPI, CS, IRQ, DELAY, W> {
    /// Get the low-level interface
    ///
    /// Transactions started through it are not guarded, and don't check for
    /// an interrupt-driven frame write that might be in flight.
    pub fn ll(&mut self) -> &mut ll::Bus<SPI, CS> {
        &mut self.bus
    }

    /// Access the interrupt control
    pub fn irq(&mut self) -> &mut IRQ {
        &mut self.irq
    }

    /// The configuration this instance was created with
    pub fn config(&self) -> &Config {
        &self.config
    }

    /// Release the hardware resources
    ///
    /// Returns the SPI peripheral, chip select pin, interrupt control, and
    /// delay provider, in that order.
    pub fn release(self) -> (SPI, CS, IRQ, DELAY) {
        let (spi, chip_select) = self.bus.release();
        (spi, chip_select, self.irq, self.delay)
    }
}

// Can't be derived without putting requirements on all the type parameters.
impl<SPI, CS, IRQ, DELAY, W> fmt::Debug for Trx<SPI, CS, IRQ, DELAY, W>
where
    W: fmt::Debug,
{
    fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
        write!(f, "Trx {{ config: {:?}, writer: ", self.config)?;
        self.writer.fmt(f)?;
        write!(f, ", .. }}")?;

        Ok(())
    }
}
