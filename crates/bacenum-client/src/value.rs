use bacenum_core::types::{DataValue, ObjectId};

/// Owned counterpart of [`DataValue`], detached from the receive buffer.
#[derive(Debug, Clone, PartialEq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub enum ClientDataValue {
    Null,
    Boolean(bool),
    Unsigned(u32),
    Signed(i32),
    Real(f32),
    Double(f64),
    OctetString(Vec<u8>),
    CharacterString(String),
    Enumerated(u32),
    ObjectId(ObjectId),
}

impl From<&DataValue<'_>> for ClientDataValue {
    fn from(value: &DataValue<'_>) -> Self {
        match value {
            DataValue::Null => Self::Null,
            DataValue::Boolean(v) => Self::Boolean(*v),
            DataValue::Unsigned(v) => Self::Unsigned(*v),
            DataValue::Signed(v) => Self::Signed(*v),
            DataValue::Real(v) => Self::Real(*v),
            DataValue::Double(v) => Self::Double(*v),
            DataValue::OctetString(v) => Self::OctetString(v.to_vec()),
            DataValue::CharacterString(v) => Self::CharacterString((*v).to_string()),
            DataValue::Enumerated(v) => Self::Enumerated(*v),
            DataValue::ObjectId(v) => Self::ObjectId(*v),
        }
    }
}
