use crate::{
    hl::{Error, FrameWrite, Trx},
    irq::IrqControl,
};
use embedded_hal::{digital::v2::OutputPin, spi::FullDuplex};

/// A bit field within a transceiver register
///
/// Identifies the register, the bits that belong to the field, and the
/// position of the field's least significant bit. Cheap to copy, so
/// subregisters can be defined as constants next to the code that uses them:
///
/// ``` rust
/// use at86rf2xx::SubRegister;
///
/// const TRX_CMD: SubRegister = SubRegister::new(0x02, 0x1F, 0);
/// ```
#[derive(Copy, Clone, Debug, Eq, PartialEq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub struct SubRegister {
    /// Address of the register that holds the field
    pub addr: u8,

    /// Bits of the register that belong to the field
    pub mask: u8,

    /// Position of the field's least significant bit
    pub pos: u8,
}

impl SubRegister {
    /// Describe a bit field
    pub const fn new(addr: u8, mask: u8, pos: u8) -> Self {
        SubRegister { addr, mask, pos }
    }

    /// Extract the field from a full register value
    pub fn extract(&self, register: u8) -> u8 {
        (register & self.mask) >> self.pos
    }

    /// Merge a field value into a full register value
    ///
    /// Bits of `register` outside the mask are kept. Bits of `value` that
    /// don't fit into the field are silently dropped.
    pub fn merge(&self, register: u8, value: u8) -> u8 {
        let field = value.wrapping_shl(u32::from(self.pos)) & self.mask;
        (register & !self.mask) | field
    }
}

impl<SPI, CS, IRQ, DELAY, W> Trx<SPI, CS, IRQ, DELAY, W>
where
    SPI: FullDuplex<u8>,
    CS: OutputPin,
    IRQ: IrqControl,
    W: FrameWrite,
{
    /// Read a bit field
    pub fn bit_read(&mut self, sub: SubRegister) -> Result<u8, Error<SPI, CS>> {
        let register = self.register_read(sub.addr)?;
        Ok(sub.extract(register))
    }

    /// Write a bit field, leaving the rest of the register unchanged
    ///
    /// The register is read, the field is merged in, and the result is
    /// written back. Read and write are each guarded, but the pair is not
    /// atomic. Callers writing fields of the same register from different
    /// contexts must serialize those writes themselves.
    pub fn bit_write(&mut self, sub: SubRegister, value: u8) -> Result<(), Error<SPI, CS>> {
        let register = self.register_read(sub.addr)?;
        self.register_write(sub.addr, sub.merge(register, value))
    }
}
