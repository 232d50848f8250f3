use bacenum_core::types::{ErrorClass, ErrorCode};
use bacenum_core::DecodeError;
use bacenum_datalink::DataLinkError;
use thiserror::Error;

/// Client-side faults: the request never completed as a protocol exchange.
///
/// Negative replies from the device are not errors at this level; they are
/// reported through [`Outcome`](crate::Outcome) so every terminal state of a
/// request flows through one channel.
#[derive(Debug, Error)]
pub enum ClientError {
    #[error("datalink error: {0}")]
    DataLink(#[from] DataLinkError),
    #[error("encode error: {0}")]
    Encode(#[from] bacenum_core::EncodeError),
    #[error("another request is already in flight")]
    RequestInFlight,
    #[error("response payload exceeded {limit} bytes")]
    ResponseTooLarge { limit: usize },
    #[error("unsupported response")]
    UnsupportedResponse,
}

/// A reply from the device that terminates the request without a result.
#[derive(Debug, Clone, PartialEq, Error)]
pub enum RequestFailure {
    #[error("device error (class {error_class_raw:?}, code {error_code_raw:?})")]
    ServiceError {
        service_choice: u8,
        error_class_raw: Option<u32>,
        error_code_raw: Option<u32>,
        error_class: Option<ErrorClass>,
        error_code: Option<ErrorCode>,
    },
    #[error("device rejected the request (reason {reason})")]
    Rejected { reason: u8 },
    #[error("device aborted the transaction (reason {reason}, server={server})")]
    Aborted { reason: u8, server: bool },
    #[error("malformed reply: {0}")]
    Malformed(DecodeError),
}
