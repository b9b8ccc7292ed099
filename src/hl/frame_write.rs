use crate::{
    hl::{Error, Trx},
    irq::{IrqControl, TrxRegion},
    ll::{self, FRAME_WRITE_COMMAND},
    FRAME_BUFFER_LEN,
};
use embedded_hal::{digital::v2::OutputPin, spi::FullDuplex};
use heapless::Vec;

/// How frames are written into the transceiver's frame buffer
///
/// This is a mostly internal trait. It is implemented by [`Blocking`] and
/// [`NonBlocking`], and picked when constructing [`Trx`].
///
/// [`Blocking`]: struct.Blocking.html
/// [`NonBlocking`]: struct.NonBlocking.html
/// [`Trx`]: struct.Trx.html
pub trait FrameWrite {
    /// Start writing `frame` into the frame buffer
    fn write_frame<SPI, CS, IRQ>(
        &mut self,
        bus: &mut ll::Bus<SPI, CS>,
        irq: &mut IRQ,
        frame: &[u8],
    ) -> Result<(), Error<SPI, CS>>
    where
        SPI: FullDuplex<u8>,
        CS: OutputPin,
        IRQ: IrqControl;

    /// Indicates whether no frame write is in flight
    fn is_idle(&self) -> bool;
}

/// Frame writes that return once the last byte has been shifted out
///
/// Frames longer than the frame buffer are refused with
/// [`Error::FrameTooLong`], like with [`NonBlocking`].
///
/// [`Error::FrameTooLong`]: enum.Error.html#variant.FrameTooLong
/// [`NonBlocking`]: struct.NonBlocking.html
#[derive(Debug, Default)]
pub struct Blocking;

impl FrameWrite for Blocking {
    fn write_frame<SPI, CS, IRQ>(
        &mut self,
        bus: &mut ll::Bus<SPI, CS>,
        irq: &mut IRQ,
        frame: &[u8],
    ) -> Result<(), Error<SPI, CS>>
    where
        SPI: FullDuplex<u8>,
        CS: OutputPin,
        IRQ: IrqControl,
    {
        if frame.len() > FRAME_BUFFER_LEN {
            return Err(Error::FrameTooLong { len: frame.len() });
        }

        let _region = TrxRegion::enter(irq);
        bus.frame_write(frame)?;

        Ok(())
    }

    fn is_idle(&self) -> bool {
        true
    }
}

/// Frame writes that finish from the SPI transfer-complete interrupt
///
/// Starting a frame write masks the transceiver interrupt, enables the
/// transfer-complete interrupt, and sends the command byte. From there on,
/// every call to [`Trx::on_transfer_complete`] shifts out the next byte. The
/// call after the last byte releases chip select, disables the
/// transfer-complete interrupt, and unmasks the transceiver interrupt again.
/// If a byte fails to go out, the write is aborted the same way and the error
/// is returned.
///
/// The transceiver interrupt is enabled at the end of every frame write,
/// finished or aborted, whether or not it was enabled before. Callers that
/// keep it masked themselves need to disable it again afterwards.
///
/// The frame is copied, so the caller's buffer is free as soon as
/// [`Trx::frame_write`] returns.
///
/// [`Trx::on_transfer_complete`]: struct.Trx.html#method.on_transfer_complete
/// [`Trx::frame_write`]: struct.Trx.html#method.frame_write
#[derive(Debug, Default)]
pub struct NonBlocking {
    state: TransferState,
}

/// The state of an interrupt-driven frame write
#[derive(Debug)]
pub enum TransferState {
    /// No frame write in flight
    Idle,

    /// A frame write is in flight
    Writing {
        /// The frame being written
        frame: Vec<u8, FRAME_BUFFER_LEN>,

        /// Index of the next byte to shift out
        cursor: usize,
    },
}

impl Default for TransferState {
    fn default() -> Self {
        TransferState::Idle
    }
}

impl NonBlocking {
    /// Create an idle instance
    pub fn new() -> Self {
        NonBlocking::default()
    }

    /// The current state of the frame write
    pub fn state(&self) -> &TransferState {
        &self.state
    }

    fn on_transfer_complete<SPI, CS, IRQ>(
        &mut self,
        bus: &mut ll::Bus<SPI, CS>,
        irq: &mut IRQ,
    ) -> nb::Result<(), Error<SPI, CS>>
    where
        SPI: FullDuplex<u8>,
        CS: OutputPin,
        IRQ: IrqControl,
    {
        let (frame, cursor) = match &mut self.state {
            TransferState::Writing { frame, cursor } => (frame, cursor),
            TransferState::Idle => return Ok(()),
        };

        // Collect the byte that just finished, so the peripheral is ready for
        // the next one.
        let next = bus.finish_byte().and_then(|_| match frame.get(*cursor) {
            Some(&byte) => {
                *cursor += 1;
                bus.start_byte(byte).map(|()| true)
            }
            None => Ok(false),
        });

        match next {
            Ok(true) => Err(nb::Error::WouldBlock),
            Ok(false) => {
                let len = frame.len();
                self.finish(bus, irq).map_err(nb::Error::Other)?;
                debug!("frame write finished, len={=usize}", len);

                Ok(())
            }
            Err(error) => {
                // Nothing more is going to complete.
                debug!("frame write aborted");
                let _ = self.finish(bus, irq);
                Err(nb::Error::Other(Error::Bus(error)))
            }
        }
    }

    fn finish<SPI, CS, IRQ>(
        &mut self,
        bus: &mut ll::Bus<SPI, CS>,
        irq: &mut IRQ,
    ) -> Result<(), Error<SPI, CS>>
    where
        SPI: FullDuplex<u8>,
        CS: OutputPin,
        IRQ: IrqControl,
    {
        let released = bus.deselect();
        irq.disable_transfer_irq();
        self.state = TransferState::Idle;
        irq.enable_trx_irq();

        released?;
        Ok(())
    }
}

impl FrameWrite for NonBlocking {
    fn write_frame<SPI, CS, IRQ>(
        &mut self,
        bus: &mut ll::Bus<SPI, CS>,
        irq: &mut IRQ,
        frame: &[u8],
    ) -> Result<(), Error<SPI, CS>>
    where
        SPI: FullDuplex<u8>,
        CS: OutputPin,
        IRQ: IrqControl,
    {
        if !self.is_idle() {
            debug!("frame write refused, previous one still in flight");
            return Err(Error::Busy);
        }

        let frame = Vec::from_slice(frame)
            .map_err(|_| Error::FrameTooLong { len: frame.len() })?;
        debug!("frame write started, len={=usize}", frame.len());

        // The transceiver interrupt stays masked until the last byte is out.
        // It's unmasked from the transfer-complete interrupt.
        irq.disable_trx_irq();
        self.state = TransferState::Writing { frame, cursor: 0 };
        irq.enable_transfer_irq();

        let started = bus
            .select()
            .and_then(|()| bus.start_byte(FRAME_WRITE_COMMAND));
        if let Err(error) = started {
            // Nothing is going to complete, so don't leave the state machine
            // waiting for an interrupt.
            let _ = self.finish(bus, irq);
            return Err(Error::Bus(error));
        }

        Ok(())
    }

    fn is_idle(&self) -> bool {
        match self.state {
            TransferState::Idle => true,
            TransferState::Writing { .. } => false,
        }
    }
}

impl<SPI, CS, IRQ, DELAY, W> Trx<SPI, CS, IRQ, DELAY, W>
where
    SPI: FullDuplex<u8>,
    CS: OutputPin,
    IRQ: IrqControl,
    W: FrameWrite,
{
    /// Write a frame into the transceiver's frame buffer
    ///
    /// `frame` starts with the PHY header, the length byte, followed by the
    /// PSDU. With the [`Blocking`] strategy this returns after the last byte
    /// has been shifted out. With [`NonBlocking`], it returns right after the
    /// command byte has been sent, and [`Trx::on_transfer_complete`] must be
    /// called from the SPI transfer-complete interrupt.
    ///
    /// Callers should not pass an empty frame. It results in a transaction
    /// that only carries the command byte.
    ///
    /// [`Blocking`]: struct.Blocking.html
    /// [`NonBlocking`]: struct.NonBlocking.html
    /// [`Trx::on_transfer_complete`]: struct.Trx.html#method.on_transfer_complete
    pub fn frame_write(&mut self, frame: &[u8]) -> Result<(), Error<SPI, CS>> {
        self.writer.write_frame(&mut self.bus, &mut self.irq, frame)
    }
}

impl<SPI, CS, IRQ, DELAY> Trx<SPI, CS, IRQ, DELAY, NonBlocking>
where
    SPI: FullDuplex<u8>,
    CS: OutputPin,
    IRQ: IrqControl,
{
    /// Advance an interrupt-driven frame write
    ///
    /// Must be called from the SPI transfer-complete interrupt. Returns
    /// `WouldBlock` while bytes remain, and `Ok` once the frame write has
    /// finished. A frame of `n` bytes takes `n + 1` calls, as the command byte
    /// completes first.
    ///
    /// Calling this while no frame write is in flight does nothing.
    pub fn on_transfer_complete(&mut self) -> nb::Result<(), Error<SPI, CS>> {
        self.writer.on_transfer_complete(&mut self.bus, &mut self.irq)
    }

    /// The state of the interrupt-driven frame write
    pub fn transfer_state(&self) -> &TransferState {
        self.writer.state()
    }
}
