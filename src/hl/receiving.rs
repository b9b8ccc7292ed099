use crate::{
    callbacks::{Callbacks, FrameInfo},
    hl::{Error, FrameWrite, Trx},
    irq::IrqControl,
    MAX_PSDU_LEN,
};
use embedded_hal::{digital::v2::OutputPin, spi::FullDuplex};

/// Length of the PHY header that precedes the PSDU in the frame buffer
const PHR_LEN: usize = 1;

/// Length of the link quality indicator that follows the PSDU
const LQI_LEN: usize = 1;

impl<SPI, CS, IRQ, DELAY, W> Trx<SPI, CS, IRQ, DELAY, W>
where
    SPI: FullDuplex<u8>,
    CS: OutputPin,
    IRQ: IrqControl,
    W: FrameWrite,
{
    /// Upload a received frame and hand it to [`Callbacks::rx_frame`]
    ///
    /// Reads the PHY header first, to learn the frame length, then reads PHY
    /// header, PSDU and LQI into `buffer`. `buffer` must hold the PSDU length
    /// plus two bytes; 129 bytes are always enough.
    ///
    /// The same precondition as for [`Trx::frame_read`] applies: call this
    /// from the handler of the transceiver's "frame received" interrupt.
    ///
    /// [`Callbacks::rx_frame`]: ../callbacks/trait.Callbacks.html#method.rx_frame
    /// [`Trx::frame_read`]: struct.Trx.html#method.frame_read
    pub fn receive_frame<C>(
        &mut self,
        buffer: &mut [u8],
        callbacks: &mut C,
    ) -> Result<(), Error<SPI, CS>>
    where
        C: Callbacks,
    {
        let mut phr = [0; PHR_LEN];
        self.frame_read(&mut phr)?;

        let psdu_len = phr[0];
        if psdu_len > MAX_PSDU_LEN {
            return Err(Error::InvalidFrameLength(psdu_len));
        }
        let psdu_len = psdu_len as usize;

        let required_len = PHR_LEN + psdu_len + LQI_LEN;
        if buffer.len() < required_len {
            return Err(Error::BufferTooSmall { required_len });
        }

        let buffer = &mut buffer[..required_len];
        self.frame_read(buffer)?;

        let frame = FrameInfo {
            psdu: &buffer[PHR_LEN..PHR_LEN + psdu_len],
            lqi: buffer[PHR_LEN + psdu_len],
        };
        debug!("frame received, len={=usize} lqi={=u8}", psdu_len, frame.lqi);

        callbacks.rx_frame(&frame);

        Ok(())
    }
}
