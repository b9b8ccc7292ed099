use crate::{
    hl::{Error, FrameWrite, Trx},
    irq::{IrqControl, TrxRegion},
};
use embedded_hal::{blocking::delay::DelayUs, digital::v2::OutputPin, spi::FullDuplex};

impl<SPI, CS, IRQ, DELAY, W> Trx<SPI, CS, IRQ, DELAY, W>
where
    SPI: FullDuplex<u8>,
    CS: OutputPin,
    IRQ: IrqControl,
    W: FrameWrite,
{
    /// Write a value into a transceiver register
    ///
    /// `addr` is not range checked. The caller must pass a valid register
    /// address.
    pub fn register_write(&mut self, addr: u8, value: u8) -> Result<(), Error<SPI, CS>> {
        self.ensure_idle()?;

        let _region = TrxRegion::enter(&mut self.irq);
        self.bus.register_write(addr, value)?;

        Ok(())
    }

    /// Read the current value of a transceiver register
    pub fn register_read(&mut self, addr: u8) -> Result<u8, Error<SPI, CS>> {
        self.ensure_idle()?;

        let _region = TrxRegion::enter(&mut self.irq);
        let value = self.bus.register_read(addr)?;

        Ok(value)
    }

    /// Write `data` into transceiver SRAM, starting at `offset`
    pub fn sram_write(&mut self, offset: u8, data: &[u8]) -> Result<(), Error<SPI, CS>> {
        self.ensure_idle()?;

        let _region = TrxRegion::enter(&mut self.irq);
        self.bus.sram_write(offset, data)?;

        Ok(())
    }

    /// Write `buffer` into SRAM, replacing it with the bytes shifted out
    ///
    /// See [`ll::Bus::sram_write_read`].
    ///
    /// [`ll::Bus::sram_write_read`]: ../ll/struct.Bus.html#method.sram_write_read
    pub fn sram_write_read(&mut self, offset: u8, buffer: &mut [u8]) -> Result<(), Error<SPI, CS>> {
        self.ensure_idle()?;

        let _region = TrxRegion::enter(&mut self.irq);
        self.bus.sram_write_read(offset, buffer)?;

        Ok(())
    }

    /// Read `buffer.len()` bytes from the frame buffer
    ///
    /// # Precondition
    ///
    /// This does not mask the transceiver interrupt and does not check for an
    /// interrupt-driven frame write in flight. It must only be called where
    /// the bus is already known idle, typically from the handler of the
    /// transceiver's "frame received" interrupt. The hardware never signals a
    /// received frame while a register or SRAM transaction is in progress.
    pub fn frame_read(&mut self, buffer: &mut [u8]) -> Result<(), Error<SPI, CS>> {
        self.bus.frame_read(buffer)?;
        Ok(())
    }

    /// Indicates whether no interrupt-driven frame write is in flight
    ///
    /// Always `true` for the blocking strategy.
    pub fn is_transfer_idle(&self) -> bool {
        self.writer.is_idle()
    }

    fn ensure_idle(&self) -> Result<(), Error<SPI, CS>> {
        if self.writer.is_idle() {
            return Ok(());
        }

        debug!("bus busy with a frame write, transaction refused");
        Err(Error::Busy)
    }
}

impl<SPI, CS, IRQ, DELAY, W> Trx<SPI, CS, IRQ, DELAY, W>
where
    SPI: FullDuplex<u8>,
    CS: OutputPin,
    IRQ: IrqControl,
    DELAY: DelayUs<u8>,
    W: FrameWrite,
{
    /// Read `buffer.len()` bytes from transceiver SRAM, starting at `offset`
    ///
    /// Waits [`Config::sram_read_delay_us`] first, to give the transceiver the
    /// lead time it needs before SRAM data is valid.
    ///
    /// [`Config::sram_read_delay_us`]: ../configs/struct.Config.html#structfield.sram_read_delay_us
    pub fn sram_read(&mut self, offset: u8, buffer: &mut [u8]) -> Result<(), Error<SPI, CS>> {
        self.delay.delay_us(self.config.sram_read_delay_us);

        self.ensure_idle()?;

        let _region = TrxRegion::enter(&mut self.irq);
        self.bus.sram_read(offset, buffer)?;

        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use crate::{
        hl::Error,
        irq::IrqControl,
        test_support::{blocking_trx, non_blocking_trx},
    };

    #[test]
    fn register_round_trip() {
        let (mut trx, _) = blocking_trx();

        trx.register_write(0x02, 0x3C).unwrap();
        assert_eq!(trx.register_read(0x02).unwrap(), 0x3C);
    }

    #[test]
    fn register_round_trip_for_all_values() {
        let (mut trx, _) = blocking_trx();

        for addr in [0x00, 0x02, 0x1F, 0x3F] {
            for value in [0x00, 0x01, 0x7F, 0x80, 0xFF] {
                trx.register_write(addr, value).unwrap();
                assert_eq!(trx.register_read(addr).unwrap(), value);
            }
        }
    }

    #[test]
    fn register_access_is_guarded() {
        let (mut trx, probe) = blocking_trx();
        trx.irq().enable_trx_irq();

        trx.register_write(0x02, 0x01).unwrap();
        trx.register_read(0x02).unwrap();

        assert_eq!(probe.masked(), vec![true, true]);
        assert!(trx.irq().is_trx_irq_enabled());
    }

    #[test]
    fn sram_round_trip_at_offset_zero() {
        let (mut trx, _) = blocking_trx();

        trx.sram_write(0x00, &[0xDE, 0xAD, 0xBE, 0xEF]).unwrap();
        let mut buffer = [0; 4];
        trx.sram_read(0x00, &mut buffer).unwrap();

        assert_eq!(buffer, [0xDE, 0xAD, 0xBE, 0xEF]);
    }

    #[test]
    fn sram_round_trip_at_nonzero_offset() {
        let (mut trx, probe) = blocking_trx();

        trx.sram_write(0x00, &[0x55; 8]).unwrap();
        trx.sram_write(0x05, &[1, 2, 3]).unwrap();
        let mut buffer = [0; 3];
        trx.sram_read(0x05, &mut buffer).unwrap();

        assert_eq!(buffer, [1, 2, 3]);
        assert_eq!(probe.sram(0x00, 8), vec![0x55, 0x55, 0x55, 0x55, 0x55, 1, 2, 3]);
    }

    #[test]
    fn sram_read_waits_before_starting() {
        let (mut trx, probe) = blocking_trx();

        let mut buffer = [0; 2];
        trx.sram_read(0x10, &mut buffer).unwrap();
        trx.sram_read(0x10, &mut buffer).unwrap();

        assert_eq!(probe.delayed_us(), 2);
    }

    #[test]
    fn frame_read_is_not_guarded() {
        let (mut trx, probe) = blocking_trx();
        trx.irq().enable_trx_irq();
        probe.load_frame(&[2, 0xAB, 0xCD]);

        let mut buffer = [0; 3];
        trx.frame_read(&mut buffer).unwrap();

        assert_eq!(buffer, [2, 0xAB, 0xCD]);
        assert_eq!(probe.masked(), vec![false]);
    }

    #[test]
    fn transactions_are_refused_while_a_frame_write_is_in_flight() {
        let (mut trx, probe) = non_blocking_trx();

        trx.frame_write(&[1, 0x42]).unwrap();
        let transactions = probe.transactions().len();

        assert!(matches!(trx.register_read(0x01), Err(Error::Busy)));
        assert!(matches!(trx.register_write(0x01, 0x00), Err(Error::Busy)));
        assert!(matches!(trx.sram_write(0x00, &[0]), Err(Error::Busy)));
        let mut buffer = [0; 1];
        assert!(matches!(trx.sram_read(0x00, &mut buffer), Err(Error::Busy)));
        assert!(matches!(trx.sram_write_read(0x00, &mut buffer), Err(Error::Busy)));

        assert_eq!(probe.transactions().len(), transactions);
    }
}
