//! Configuration of the bus-access layer
//!
//! Whether frame writes block or finish from the SPI interrupt is not part of
//! this struct. That choice is made by picking the frame-write strategy type
//! when constructing [`Trx`].
//!
//! [`Trx`]: ../hl/struct.Trx.html

/// Bus configuration
#[derive(Copy, Clone, Debug, Eq, PartialEq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub struct Config {
    /// Number of extra times chip select is driven low before the first byte
    ///
    /// See [`ll::Bus::set_chip_select_delay`].
    ///
    /// [`ll::Bus::set_chip_select_delay`]: ../ll/struct.Bus.html#method.set_chip_select_delay
    pub chip_select_delay: u8,

    /// Settling time before an SRAM read, in microseconds
    ///
    /// The transceiver needs 500 ns of lead time before SRAM data is valid.
    /// One microsecond is the smallest delay `DelayUs` can express above that.
    pub sram_read_delay_us: u8,
}

impl Default for Config {
    fn default() -> Self {
        Config {
            chip_select_delay: 0,
            sram_read_delay_us: 1,
        }
    }
}
