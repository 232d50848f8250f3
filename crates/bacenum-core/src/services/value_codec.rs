use crate::encoding::{
    primitives::{decode_signed, decode_unsigned, encode_signed, encode_unsigned},
    reader::Reader,
    tag::{AppTag, Tag},
    writer::Writer,
};
use crate::types::DataValue;
use crate::{DecodeError, EncodeError};

pub fn encode_application_data_value(
    w: &mut Writer<'_>,
    value: &DataValue<'_>,
) -> Result<(), EncodeError> {
    match value {
        DataValue::Null => Tag::Application {
            tag: AppTag::Null,
            len: 0,
        }
        .encode(w),
        DataValue::Boolean(v) => Tag::Application {
            tag: AppTag::Boolean,
            len: if *v { 1 } else { 0 },
        }
        .encode(w),
        DataValue::Unsigned(v) => encode_tagged_unsigned(w, AppTag::UnsignedInt, *v),
        DataValue::Signed(v) => {
            let mut scratch = [0u8; 4];
            let mut tw = Writer::new(&mut scratch);
            let len = encode_signed(&mut tw, *v)? as u32;
            Tag::Application {
                tag: AppTag::SignedInt,
                len,
            }
            .encode(w)?;
            w.write_all(&scratch[..len as usize])
        }
        DataValue::Real(v) => {
            Tag::Application {
                tag: AppTag::Real,
                len: 4,
            }
            .encode(w)?;
            w.write_all(&v.to_bits().to_be_bytes())
        }
        DataValue::Double(v) => {
            Tag::Application {
                tag: AppTag::Double,
                len: 8,
            }
            .encode(w)?;
            w.write_all(&v.to_bits().to_be_bytes())
        }
        DataValue::OctetString(v) => {
            Tag::Application {
                tag: AppTag::OctetString,
                len: len_u32(v.len())?,
            }
            .encode(w)?;
            w.write_all(v)
        }
        DataValue::CharacterString(v) => {
            let bytes = v.as_bytes();
            Tag::Application {
                tag: AppTag::CharacterString,
                len: len_u32(bytes.len().saturating_add(1))?,
            }
            .encode(w)?;
            // Character set 0: ANSI X3.4 / UTF-8 compatible.
            w.write_u8(0)?;
            w.write_all(bytes)
        }
        DataValue::Enumerated(v) => encode_tagged_unsigned(w, AppTag::Enumerated, *v),
        DataValue::ObjectId(v) => {
            Tag::Application {
                tag: AppTag::ObjectId,
                len: 4,
            }
            .encode(w)?;
            w.write_be_u32(v.raw())
        }
    }
}

pub fn decode_application_data_value<'a>(r: &mut Reader<'a>) -> Result<DataValue<'a>, DecodeError> {
    let tag = Tag::decode(r)?;
    decode_application_data_value_from_tag(r, tag)
}

pub fn decode_application_data_value_from_tag<'a>(
    r: &mut Reader<'a>,
    tag: Tag,
) -> Result<DataValue<'a>, DecodeError> {
    match tag {
        Tag::Application {
            tag: AppTag::Null, ..
        } => Ok(DataValue::Null),
        Tag::Application {
            tag: AppTag::Boolean,
            len,
        } => Ok(DataValue::Boolean(len != 0)),
        Tag::Application {
            tag: AppTag::UnsignedInt,
            len,
        } => Ok(DataValue::Unsigned(decode_unsigned(r, len as usize)?)),
        Tag::Application {
            tag: AppTag::SignedInt,
            len,
        } => Ok(DataValue::Signed(decode_signed(r, len as usize)?)),
        Tag::Application {
            tag: AppTag::Real,
            len: 4,
        } => {
            let b = r.read_exact(4)?;
            Ok(DataValue::Real(f32::from_bits(u32::from_be_bytes([
                b[0], b[1], b[2], b[3],
            ]))))
        }
        Tag::Application {
            tag: AppTag::Double,
            len: 8,
        } => {
            let b = r.read_exact(8)?;
            Ok(DataValue::Double(f64::from_bits(u64::from_be_bytes([
                b[0], b[1], b[2], b[3], b[4], b[5], b[6], b[7],
            ]))))
        }
        Tag::Application {
            tag: AppTag::OctetString,
            len,
        } => Ok(DataValue::OctetString(r.read_exact(len as usize)?)),
        Tag::Application {
            tag: AppTag::CharacterString,
            len,
        } => {
            if len == 0 {
                return Err(DecodeError::InvalidLength);
            }
            let raw = r.read_exact(len as usize)?;
            if raw[0] != 0 {
                // Only character set 0 is supported.
                return Err(DecodeError::Unsupported);
            }
            let s = core::str::from_utf8(&raw[1..]).map_err(|_| DecodeError::InvalidValue)?;
            Ok(DataValue::CharacterString(s))
        }
        Tag::Application {
            tag: AppTag::Enumerated,
            len,
        } => Ok(DataValue::Enumerated(decode_unsigned(r, len as usize)?)),
        Tag::Application {
            tag: AppTag::ObjectId,
            len: 4,
        } => Ok(DataValue::ObjectId(crate::types::ObjectId::from_raw(
            r.read_be_u32()?,
        ))),
        _ => Err(DecodeError::Unsupported),
    }
}

fn encode_tagged_unsigned(w: &mut Writer<'_>, tag: AppTag, value: u32) -> Result<(), EncodeError> {
    let mut scratch = [0u8; 4];
    let mut tw = Writer::new(&mut scratch);
    let len = encode_unsigned(&mut tw, value)? as u32;
    Tag::Application { tag, len }.encode(w)?;
    w.write_all(&scratch[..len as usize])
}

fn len_u32(len: usize) -> Result<u32, EncodeError> {
    u32::try_from(len).map_err(|_| EncodeError::ValueOutOfRange)
}

#[cfg(test)]
mod tests {
    use super::{decode_application_data_value, encode_application_data_value};
    use crate::encoding::{reader::Reader, writer::Writer};
    use crate::types::{DataValue, ObjectId, ObjectType};
    use crate::DecodeError;

    #[test]
    fn supported_values_roundtrip() {
        let values = [
            DataValue::Null,
            DataValue::Boolean(true),
            DataValue::Unsigned(47808),
            DataValue::Signed(-40),
            DataValue::Real(21.5),
            DataValue::Double(101.325),
            DataValue::OctetString(&[0xDE, 0xAD]),
            DataValue::CharacterString("Zone Temp 1"),
            DataValue::Enumerated(3),
            DataValue::ObjectId(ObjectId::new(ObjectType::AnalogInput, 1)),
        ];

        for v in values {
            let mut buf = [0u8; 64];
            let mut w = Writer::new(&mut buf);
            encode_application_data_value(&mut w, &v).unwrap();
            let mut r = Reader::new(w.as_written());
            assert_eq!(decode_application_data_value(&mut r).unwrap(), v);
        }
    }

    #[test]
    fn non_utf8_character_string_is_invalid() {
        // Character set 0 but bytes that are not UTF-8.
        let mut r = Reader::new(&[0x73, 0x00, 0xFF, 0xFE]);
        assert_eq!(
            decode_application_data_value(&mut r).unwrap_err(),
            DecodeError::InvalidValue
        );
    }

    #[test]
    fn unknown_character_set_is_unsupported() {
        let mut r = Reader::new(&[0x72, 0x04, 0x41]);
        assert_eq!(
            decode_application_data_value(&mut r).unwrap_err(),
            DecodeError::Unsupported
        );
    }
}
