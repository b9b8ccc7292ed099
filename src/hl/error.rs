use crate::ll;
use core::fmt;
use embedded_hal::{digital::v2::OutputPin, spi::FullDuplex};

/// An error that can occur when accessing the transceiver
pub enum Error<SPI, CS>
where
    SPI: FullDuplex<u8>,
    CS: OutputPin,
{
    /// Error occured while using SPI bus
    Bus(ll::Error<SPI, CS>),

    /// An interrupt-driven frame write is still in flight
    ///
    /// Nothing was sent. Retry once [`Trx::is_transfer_idle`] returns `true`.
    ///
    /// [`Trx::is_transfer_idle`]: struct.Trx.html#method.is_transfer_idle
    Busy,

    /// The frame doesn't fit into the transceiver's frame buffer
    FrameTooLong {
        /// Length of the rejected frame
        len: usize,
    },

    /// Buffer too small
    BufferTooSmall {
        /// Indicates how large a buffer would have been required
        required_len: usize,
    },

    /// The PHY header announced a length the transceiver can't have received
    InvalidFrameLength(u8),
}

impl<SPI, CS> From<ll::Error<SPI, CS>> for Error<SPI, CS>
where
    SPI: FullDuplex<u8>,
    CS: OutputPin,
{
    fn from(error: ll::Error<SPI, CS>) -> Self {
        Error::Bus(error)
    }
}

// We can't derive this implementation, as `Debug` is only implemented
// conditionally for `ll::Error`.
impl<SPI, CS> fmt::Debug for Error<SPI, CS>
where
    SPI: FullDuplex<u8>,
    <SPI as FullDuplex<u8>>::Error: fmt::Debug,
    CS: OutputPin,
    <CS as OutputPin>::Error: fmt::Debug,
{
    fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
        match self {
            Error::Bus(error) => write!(f, "Bus({:?})", error),
            Error::Busy => write!(f, "Busy"),
            Error::FrameTooLong { len } => write!(f, "FrameTooLong {{ len: {:?} }}", len),
            Error::BufferTooSmall { required_len } => {
                write!(f, "BufferTooSmall {{ required_len: {:?} }}", required_len,)
            }
            Error::InvalidFrameLength(len) => write!(f, "InvalidFrameLength({:?})", len),
        }
    }
}
