use crate::apdu::ConfirmedRequestHeader;
use crate::encoding::{
    primitives::{decode_unsigned, encode_ctx_object_id, encode_ctx_unsigned},
    reader::Reader,
    tag::Tag,
    writer::Writer,
};
use crate::types::{ObjectId, PropertyId};
use crate::{DecodeError, EncodeError};

#[cfg(feature = "alloc")]
use crate::services::value_codec::decode_application_data_value_from_tag;
#[cfg(feature = "alloc")]
use crate::types::DataValue;
#[cfg(feature = "alloc")]
use alloc::vec::Vec;

pub const SERVICE_READ_PROPERTY: u8 = 0x0C;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct ReadPropertyRequest {
    pub object_id: ObjectId,
    pub property_id: PropertyId,
    pub array_index: Option<u32>,
    pub invoke_id: u8,
}

impl ReadPropertyRequest {
    pub fn encode(&self, w: &mut Writer<'_>) -> Result<(), EncodeError> {
        ConfirmedRequestHeader {
            segmented: false,
            more_follows: false,
            segmented_response_accepted: true,
            max_segments: 0,
            max_apdu: 5, // up to 1476 octets accepted
            invoke_id: self.invoke_id,
            sequence_number: None,
            proposed_window_size: None,
            service_choice: SERVICE_READ_PROPERTY,
        }
        .encode(w)?;

        encode_ctx_object_id(w, 0, self.object_id.raw())?;
        encode_ctx_unsigned(w, 1, self.property_id.to_u32())?;
        if let Some(idx) = self.array_index {
            encode_ctx_unsigned(w, 2, idx)?;
        }
        Ok(())
    }
}

/// ReadProperty acknowledgement.
///
/// The value region between the opening and closing tag 3 holds one
/// application value for scalar properties and a back-to-back sequence for
/// array/list properties (notably `objectList`), so `values` is always a
/// sequence; scalars decode to a single element.
#[cfg(feature = "alloc")]
#[derive(Debug, Clone, PartialEq)]
pub struct ReadPropertyAck<'a> {
    pub object_id: ObjectId,
    pub property_id: PropertyId,
    pub array_index: Option<u32>,
    pub values: Vec<DataValue<'a>>,
}

#[cfg(feature = "alloc")]
impl<'a> ReadPropertyAck<'a> {
    pub fn decode_after_header(r: &mut Reader<'a>) -> Result<Self, DecodeError> {
        let object_id = match Tag::decode(r)? {
            Tag::Context { tag_num: 0, len } => {
                ObjectId::from_raw(decode_unsigned(r, len as usize)?)
            }
            _ => return Err(DecodeError::InvalidTag),
        };

        let property_id = match Tag::decode(r)? {
            Tag::Context { tag_num: 1, len } => {
                PropertyId::from_u32(decode_unsigned(r, len as usize)?)
            }
            _ => return Err(DecodeError::InvalidTag),
        };

        let next = Tag::decode(r)?;
        let (array_index, value_open) = match next {
            Tag::Context { tag_num: 2, len } => {
                let idx = decode_unsigned(r, len as usize)?;
                (Some(idx), Tag::decode(r)?)
            }
            other => (None, other),
        };

        if value_open != (Tag::Opening { tag_num: 3 }) {
            return Err(DecodeError::InvalidTag);
        }

        let mut values = Vec::new();
        loop {
            let tag = Tag::decode(r)?;
            if tag == (Tag::Closing { tag_num: 3 }) {
                break;
            }
            values.push(decode_application_data_value_from_tag(r, tag)?);
        }

        Ok(Self {
            object_id,
            property_id,
            array_index,
            values,
        })
    }
}

#[cfg(test)]
#[cfg(feature = "alloc")]
mod tests {
    use super::{ReadPropertyAck, ReadPropertyRequest};
    use crate::encoding::{
        primitives::{encode_ctx_object_id, encode_ctx_unsigned},
        reader::Reader,
        tag::Tag,
        writer::Writer,
    };
    use crate::services::value_codec::encode_application_data_value;
    use crate::types::{DataValue, ObjectId, ObjectType, PropertyId};
    use alloc::vec;

    fn ack_payload(property: PropertyId, values: &[DataValue<'_>], buf: &mut [u8]) -> usize {
        let device = ObjectId::new(ObjectType::Device, 42);
        let mut w = Writer::new(buf);
        encode_ctx_object_id(&mut w, 0, device.raw()).unwrap();
        encode_ctx_unsigned(&mut w, 1, property.to_u32()).unwrap();
        Tag::Opening { tag_num: 3 }.encode(&mut w).unwrap();
        for v in values {
            encode_application_data_value(&mut w, v).unwrap();
        }
        Tag::Closing { tag_num: 3 }.encode(&mut w).unwrap();
        w.as_written().len()
    }

    #[test]
    fn request_encodes_object_and_property() {
        let req = ReadPropertyRequest {
            object_id: ObjectId::new(ObjectType::Device, 42),
            property_id: PropertyId::ObjectList,
            array_index: None,
            invoke_id: 1,
        };
        let mut buf = [0u8; 32];
        let mut w = Writer::new(&mut buf);
        req.encode(&mut w).unwrap();
        // object-list is property 76 (0x4C), context tag 1.
        let written = w.as_written();
        assert_eq!(&written[written.len() - 2..], &[0x19, 0x4C]);
    }

    #[test]
    fn ack_with_object_list_decodes_every_identifier_in_order() {
        let ids = [
            DataValue::ObjectId(ObjectId::new(ObjectType::Device, 42)),
            DataValue::ObjectId(ObjectId::new(ObjectType::AnalogInput, 1)),
            DataValue::ObjectId(ObjectId::new(ObjectType::BinaryOutput, 2)),
        ];
        let mut buf = [0u8; 128];
        let n = ack_payload(PropertyId::ObjectList, &ids, &mut buf);

        let mut r = Reader::new(&buf[..n]);
        let ack = ReadPropertyAck::decode_after_header(&mut r).unwrap();
        assert_eq!(ack.property_id, PropertyId::ObjectList);
        assert_eq!(ack.values, vec![ids[0].clone(), ids[1].clone(), ids[2].clone()]);
    }

    #[test]
    fn ack_with_scalar_name_decodes_to_single_value() {
        let mut buf = [0u8; 64];
        let n = ack_payload(
            PropertyId::ObjectName,
            &[DataValue::CharacterString("Fan Coil 3")],
            &mut buf,
        );

        let mut r = Reader::new(&buf[..n]);
        let ack = ReadPropertyAck::decode_after_header(&mut r).unwrap();
        assert_eq!(ack.values, vec![DataValue::CharacterString("Fan Coil 3")]);
    }

    #[test]
    fn ack_missing_value_brackets_is_rejected() {
        let device = ObjectId::new(ObjectType::Device, 42);
        let mut buf = [0u8; 32];
        let mut w = Writer::new(&mut buf);
        encode_ctx_object_id(&mut w, 0, device.raw()).unwrap();
        encode_ctx_unsigned(&mut w, 1, PropertyId::ObjectName.to_u32()).unwrap();
        encode_application_data_value(&mut w, &DataValue::CharacterString("x")).unwrap();

        let mut r = Reader::new(w.as_written());
        assert!(ReadPropertyAck::decode_after_header(&mut r).is_err());
    }
}
