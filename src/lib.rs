//! Driver crate for the bus-access layer of the AT86RF2xx transceivers
//!
//! The AT86RF2xx family are IEEE 802.15.4 radio transceivers that are
//! controlled over SPI. This crate moves bytes between the microcontroller and
//! the transceiver's registers, subregisters, frame buffer, and SRAM, and
//! hands results to the protocol layers through the [`Callbacks`] interface.
//!
//! The entry point is [`Trx`]. Frame writes either block until the last byte
//! has been shifted out ([`Blocking`]), or return immediately and finish from
//! the SPI transfer-complete interrupt ([`NonBlocking`]).
//!
//! [`Callbacks`]: callbacks/trait.Callbacks.html
//! [`Trx`]: hl/struct.Trx.html
//! [`Blocking`]: hl/struct.Blocking.html
//! [`NonBlocking`]: hl/struct.NonBlocking.html

#![cfg_attr(not(test), no_std)]
#![deny(missing_docs)]

#[macro_use]
mod macros;

pub mod callbacks;
pub mod configs;
pub mod hl;
pub mod irq;
pub mod ll;
pub mod shared;

#[cfg(test)]
mod test_support;

pub use crate::{
    callbacks::{Callbacks, NoCallbacks, Status},
    configs::Config,
    hl::{Blocking, Error, FrameWrite, NonBlocking, SubRegister, Trx},
    irq::{IrqControl, TrxRegion},
    shared::SharedTrx,
};
pub use ieee802154::mac;

/// Size of the transceiver's frame buffer in bytes
///
/// One PHY header byte plus the maximum PSDU length of 127 bytes.
pub const FRAME_BUFFER_LEN: usize = 128;

/// The largest PSDU length a PHY header can announce
pub const MAX_PSDU_LEN: u8 = 127;
