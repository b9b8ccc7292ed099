//! Upcalls into the protocol layers and the application
//!
//! The transceiver abstraction layer (TAL) and the MAC report results to the
//! layer above them through the [`Callbacks`] trait. Every method has an empty
//! default implementation, so implementors only override the events they care
//! about. [`NoCallbacks`] ignores everything.
//!
//! This crate calls [`Callbacks::rx_frame`] from [`Trx::receive_frame`]. The
//! other methods are invoked by the protocol layers built on top of it.
//!
//! [`Trx::receive_frame`]: ../hl/struct.Trx.html#method.receive_frame

use core::convert::TryFrom;

use ieee802154::mac::{Address, ExtendedAddress, PanId, ShortAddress};
use num_enum::{IntoPrimitive, TryFromPrimitive};
use serde::{Deserialize, Serialize};

/// Status codes reported with confirmations and indications
///
/// These are the status values defined by IEEE 802.15.4-2006, section 7.1.
#[derive(
    Copy,
    Clone,
    Debug,
    Eq,
    PartialEq,
    Hash,
    Serialize,
    Deserialize,
    TryFromPrimitive,
    IntoPrimitive,
)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
#[repr(u8)]
pub enum Status {
    /// The requested operation was completed successfully
    Success = 0x00,
    /// Frame counter of a secured frame was invalid
    CounterError = 0xDB,
    /// The key is not allowed for this frame type
    ImproperKeyType = 0xDC,
    /// The security level doesn't satisfy the security policy
    ImproperSecurityLevel = 0xDD,
    /// The frame used the 802.15.4-2003 security scheme
    UnsupportedLegacy = 0xDE,
    /// The security level of the received frame is not supported
    UnsupportedSecurity = 0xDF,
    /// The beacon was lost following a synchronization request
    BeaconLoss = 0xE0,
    /// Transmission failed due to activity on the channel
    ChannelAccessFailure = 0xE1,
    /// The GTS request was denied by the PAN coordinator
    Denied = 0xE2,
    /// Disabling the transceiver failed
    DisableTrxFailure = 0xE3,
    /// Security processing of a received frame failed
    SecurityError = 0xE4,
    /// The frame is too long after security processing
    FrameTooLong = 0xE5,
    /// The requested GTS transmission failed
    InvalidGts = 0xE6,
    /// The handle to purge is unknown
    InvalidHandle = 0xE7,
    /// A parameter is not supported or out of range
    InvalidParameter = 0xE8,
    /// No acknowledgment was received after the maximum number of retries
    NoAck = 0xE9,
    /// A scan operation failed to find any network beacons
    NoBeacon = 0xEA,
    /// No response data was available following a request
    NoData = 0xEB,
    /// The operation failed because a short address wasn't allocated
    NoShortAddress = 0xEC,
    /// A receiver enable request was unsuccessful
    OutOfCap = 0xED,
    /// A PAN identifier conflict has been detected
    PanIdConflict = 0xEE,
    /// A coordinator realignment command has been received
    Realignment = 0xEF,
    /// The transaction has expired and its information was discarded
    TransactionExpired = 0xF0,
    /// There is no capacity to store the transaction
    TransactionOverflow = 0xF1,
    /// The transceiver was in the transmitter enabled state
    TxActive = 0xF2,
    /// The key is not available
    UnavailableKey = 0xF3,
    /// A PIB attribute is not supported
    UnsupportedAttribute = 0xF4,
    /// A source or destination address was invalid
    InvalidAddress = 0xF5,
    /// The receiver would have been enabled for longer than the beacon interval
    OnTimeTooLong = 0xF6,
    /// The receiver could not be enabled before the requested time
    PastTime = 0xF7,
    /// The device was not tracking beacons
    TrackingOff = 0xF8,
    /// An index into a PIB table was out of range
    InvalidIndex = 0xF9,
    /// A scan terminated because the PAN descriptor storage was exhausted
    LimitReached = 0xFA,
    /// A PIB attribute is read-only
    ReadOnly = 0xFB,
    /// A scan was requested while another was in progress
    ScanInProgress = 0xFC,
    /// The superframe parameters overlap with the parent's
    SuperframeOverlap = 0xFD,
}

impl Status {
    /// Convert a raw status byte
    ///
    /// Returns `None` for values that aren't a defined status.
    pub fn from_raw(raw: u8) -> Option<Self> {
        Status::try_from(raw).ok()
    }
}

/// The kind of scan an MLME-SCAN.confirm reports on
#[derive(Copy, Clone, Debug, Eq, PartialEq, Serialize, Deserialize, TryFromPrimitive, IntoPrimitive)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
#[repr(u8)]
pub enum ScanType {
    /// Energy detection scan
    EnergyDetect = 0x00,
    /// Active scan
    Active = 0x01,
    /// Passive scan
    Passive = 0x02,
    /// Orphan scan
    Orphan = 0x03,
}

/// Why a device is leaving the PAN
#[derive(Copy, Clone, Debug, Eq, PartialEq, Serialize, Deserialize, TryFromPrimitive, IntoPrimitive)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
#[repr(u8)]
pub enum DisassociateReason {
    /// The coordinator wishes the device to leave the PAN
    CoordinatorWishesDeviceToLeave = 0x01,
    /// The device wishes to leave the PAN
    DeviceWishesToLeave = 0x02,
}

/// A frame uploaded from, or written into, the frame buffer
#[derive(Debug)]
pub struct FrameInfo<'a> {
    /// The PSDU, including the frame check sequence
    pub psdu: &'a [u8],

    /// Link quality indicator
    ///
    /// Only meaningful for received frames.
    pub lqi: u8,
}

/// A PAN, as reported by a beacon
#[derive(Copy, Clone, Debug, Eq, PartialEq)]
pub struct PanDescriptor {
    /// Address of the coordinator that sent the beacon
    pub coord_address: Address,
    /// Channel the beacon was received on
    pub logical_channel: u8,
    /// Channel page the beacon was received on
    pub channel_page: u8,
    /// Superframe specification field of the beacon
    pub superframe_spec: u16,
    /// Whether the coordinator accepts GTS requests
    pub gts_permit: bool,
    /// Link quality of the received beacon
    pub link_quality: u8,
    /// Reception time of the beacon, in symbols
    pub timestamp: u32,
}

/// A data frame delivered by the MAC
#[derive(Debug)]
pub struct DataIndication<'a> {
    /// Source of the frame, if the frame carries one
    pub src: Option<Address>,
    /// Destination of the frame, if the frame carries one
    pub dst: Option<Address>,
    /// The MAC payload
    pub msdu: &'a [u8],
    /// Link quality of the received frame
    pub link_quality: u8,
    /// Data sequence number of the frame
    pub dsn: u8,
    /// Reception time, if timestamping is enabled
    pub timestamp: Option<u32>,
}

/// What a scan found
#[derive(Debug)]
pub enum ScanResult<'a> {
    /// Measured energy, one value per scanned channel
    EnergyLevels(&'a [u8]),
    /// PANs discovered by an active or passive scan
    PanDescriptors(&'a [PanDescriptor]),
    /// Orphan scans don't return a list
    None,
}

/// Upcalls from the TAL and MAC
///
/// All methods default to doing nothing.
#[allow(unused_variables)]
pub trait Callbacks {
    /// A frame has been received and uploaded from the frame buffer
    fn rx_frame(&mut self, frame: &FrameInfo<'_>) {}

    /// A frame transmission has finished
    fn tx_frame_done(&mut self, status: Status, frame: &FrameInfo<'_>) {}

    /// An energy detection measurement has finished
    fn ed_end(&mut self, energy_level: u8) {}

    /// MCPS-DATA.confirm
    fn mcps_data_conf(&mut self, msdu_handle: u8, status: Status, timestamp: Option<u32>) {}

    /// MCPS-DATA.indication
    fn mcps_data_ind(&mut self, indication: &DataIndication<'_>) {}

    /// MCPS-PURGE.confirm
    fn mcps_purge_conf(&mut self, msdu_handle: u8, status: Status) {}

    /// MLME-ASSOCIATE.confirm
    fn mlme_associate_conf(&mut self, short_address: ShortAddress, status: Status) {}

    /// MLME-BEACON-NOTIFY.indication
    fn mlme_beacon_notify_ind(
        &mut self,
        bsn: u8,
        pan_descriptor: &PanDescriptor,
        pending_addresses: &[Address],
        sdu: &[u8],
    ) {
    }

    /// MLME-COMM-STATUS.indication
    ///
    /// Either address is `None` if the frame that caused the indication
    /// didn't carry it.
    fn mlme_comm_status_ind(
        &mut self,
        src: Option<Address>,
        dst: Option<Address>,
        status: Status,
    ) {
    }

    /// MLME-DISASSOCIATE.confirm
    fn mlme_disassociate_conf(&mut self, status: Status, device_address: Address) {}

    /// MLME-DISASSOCIATE.indication
    fn mlme_disassociate_ind(&mut self, device_address: ExtendedAddress, reason: DisassociateReason) {}

    /// MLME-GET.confirm
    ///
    /// `value` is the raw attribute value, empty unless `status` is
    /// [`Status::Success`].
    fn mlme_get_conf(&mut self, status: Status, attribute: u8, value: &[u8]) {}

    /// MLME-ORPHAN.indication
    fn mlme_orphan_ind(&mut self, orphan_address: ExtendedAddress) {}

    /// MLME-POLL.confirm
    fn mlme_poll_conf(&mut self, status: Status) {}

    /// MLME-RESET.confirm
    fn mlme_reset_conf(&mut self, status: Status) {}

    /// MLME-RX-ENABLE.confirm
    fn mlme_rx_enable_conf(&mut self, status: Status) {}

    /// MLME-SCAN.confirm
    fn mlme_scan_conf(
        &mut self,
        status: Status,
        scan_type: ScanType,
        channel_page: u8,
        unscanned_channels: u32,
        results: ScanResult<'_>,
    ) {
    }

    /// MLME-SET.confirm
    fn mlme_set_conf(&mut self, status: Status, attribute: u8) {}

    /// MLME-SYNC-LOSS.indication
    ///
    /// `reason` is one of [`Status::PanIdConflict`], [`Status::Realignment`]
    /// or [`Status::BeaconLoss`].
    fn mlme_sync_loss_ind(
        &mut self,
        reason: Status,
        pan_id: PanId,
        logical_channel: u8,
        channel_page: u8,
    ) {
    }
}

/// Ignores every upcall
#[derive(Copy, Clone, Debug, Default)]
pub struct NoCallbacks;

impl Callbacks for NoCallbacks {}
