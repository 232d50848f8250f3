use crate::types::ObjectId;

/// A decoded BACnet application data value, borrowing string and octet
/// payloads from the receive buffer.
///
/// The set is trimmed to what property-read acknowledgements can carry in
/// this client's traffic; anything else decodes to
/// [`DecodeError::Unsupported`](crate::DecodeError::Unsupported).
#[derive(Debug, Clone, PartialEq)]
pub enum DataValue<'a> {
    Null,
    Boolean(bool),
    Unsigned(u32),
    Signed(i32),
    Real(f32),
    Double(f64),
    OctetString(&'a [u8]),
    CharacterString(&'a str),
    Enumerated(u32),
    ObjectId(ObjectId),
}
