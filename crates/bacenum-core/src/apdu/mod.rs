/// Confirmed-service request/response headers and negative replies.
pub mod confirmed;
/// APDU type discriminant.
pub mod pdu;
/// Unconfirmed-service request header.
pub mod unconfirmed;

pub use confirmed::{
    AbortPdu, BacnetError, ComplexAckHeader, ConfirmedRequestHeader, RejectPdu, SegmentAck,
};
pub use pdu::ApduType;
pub use unconfirmed::UnconfirmedRequestHeader;
