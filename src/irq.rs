//! Interrupt control and the transceiver region guard
//!
//! Two interrupt sources matter to the bus-access layer:
//!
//! - The transceiver's own IRQ line. Its handler typically accesses the
//!   transceiver, so it must not fire while another transaction is on the bus.
//! - The SPI transfer-complete interrupt, which drives the interrupt-driven
//!   frame write.
//!
//! How these are enabled and disabled is board specific, which is why this
//! crate only defines the [`IrqControl`] trait. A Cortex-M board would
//! typically implement it in terms of the NVIC, or the GPIO interrupt
//! configuration of the pin that the transceiver's IRQ line is connected to.

/// Enable and disable the two interrupt sources used by this crate
pub trait IrqControl {
    /// Indicates whether the transceiver interrupt is currently enabled
    fn is_trx_irq_enabled(&self) -> bool;

    /// Enable the transceiver interrupt
    fn enable_trx_irq(&mut self);

    /// Disable the transceiver interrupt
    fn disable_trx_irq(&mut self);

    /// Enable the SPI transfer-complete interrupt
    fn enable_transfer_irq(&mut self);

    /// Disable the SPI transfer-complete interrupt
    fn disable_transfer_irq(&mut self);
}

impl<T> IrqControl for &mut T
where
    T: IrqControl + ?Sized,
{
    fn is_trx_irq_enabled(&self) -> bool {
        (**self).is_trx_irq_enabled()
    }

    fn enable_trx_irq(&mut self) {
        (**self).enable_trx_irq()
    }

    fn disable_trx_irq(&mut self) {
        (**self).disable_trx_irq()
    }

    fn enable_transfer_irq(&mut self) {
        (**self).enable_transfer_irq()
    }

    fn disable_transfer_irq(&mut self) {
        (**self).disable_transfer_irq()
    }
}

/// Keeps the transceiver interrupt masked while it is alive
///
/// Entering the region records whether the transceiver interrupt is enabled
/// and then disables it. No other interrupt source is touched. Dropping the
/// guard puts back the recorded state, on every exit path.
///
/// Because the previous state is restored instead of blindly re-enabling the
/// interrupt, regions nest: an inner region leaves the interrupt disabled for
/// the rest of the outer one.
///
/// ``` rust
/// # use at86rf2xx::irq::{IrqControl, TrxRegion};
/// # struct Board { trx: bool }
/// # impl IrqControl for Board {
/// #     fn is_trx_irq_enabled(&self) -> bool { self.trx }
/// #     fn enable_trx_irq(&mut self) { self.trx = true }
/// #     fn disable_trx_irq(&mut self) { self.trx = false }
/// #     fn enable_transfer_irq(&mut self) {}
/// #     fn disable_transfer_irq(&mut self) {}
/// # }
/// let mut board = Board { trx: true };
/// {
///     let mut region = TrxRegion::enter(&mut board);
///     assert!(!region.irq().is_trx_irq_enabled());
/// }
/// assert!(board.is_trx_irq_enabled());
/// ```
pub struct TrxRegion<'r, IRQ>
where
    IRQ: IrqControl,
{
    irq: &'r mut IRQ,
    was_enabled: bool,
}

impl<'r, IRQ> TrxRegion<'r, IRQ>
where
    IRQ: IrqControl,
{
    /// Mask the transceiver interrupt until the returned guard is dropped
    pub fn enter(irq: &'r mut IRQ) -> Self {
        let was_enabled = irq.is_trx_irq_enabled();
        irq.disable_trx_irq();

        TrxRegion { irq, was_enabled }
    }

    /// Access the interrupt control from inside the region
    ///
    /// This can be used to open a nested region.
    pub fn irq(&mut self) -> &mut IRQ {
        self.irq
    }
}

impl<'r, IRQ> Drop for TrxRegion<'r, IRQ>
where
    IRQ: IrqControl,
{
    fn drop(&mut self) {
        if self.was_enabled {
            self.irq.enable_trx_irq();
        } else {
            self.irq.disable_trx_irq();
        }
    }
}
