use crate::apdu::UnconfirmedRequestHeader;
use crate::encoding::{
    primitives::{
        decode_app_enumerated, decode_app_unsigned, encode_app_enumerated, encode_app_object_id,
        encode_app_unsigned,
    },
    reader::Reader,
    tag::{AppTag, Tag},
    writer::Writer,
};
use crate::types::ObjectId;
use crate::{DecodeError, EncodeError};

pub const SERVICE_I_AM: u8 = 0x00;

/// I-Am announcement: the reply half of the discovery handshake.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct IAmRequest {
    pub device_id: ObjectId,
    pub max_apdu: u32,
    pub segmentation: u32,
    pub vendor_id: u32,
}

impl IAmRequest {
    pub fn encode(&self, w: &mut Writer<'_>) -> Result<(), EncodeError> {
        UnconfirmedRequestHeader {
            service_choice: SERVICE_I_AM,
        }
        .encode(w)?;

        encode_app_object_id(w, self.device_id.raw())?;
        encode_app_unsigned(w, self.max_apdu)?;
        encode_app_enumerated(w, self.segmentation)?;
        encode_app_unsigned(w, self.vendor_id)
    }

    pub fn decode_after_header(r: &mut Reader<'_>) -> Result<Self, DecodeError> {
        let device_id = match Tag::decode(r)? {
            Tag::Application {
                tag: AppTag::ObjectId,
                len: 4,
            } => ObjectId::from_raw(r.read_be_u32()?),
            _ => return Err(DecodeError::InvalidTag),
        };

        Ok(Self {
            device_id,
            max_apdu: decode_app_unsigned(r)?,
            segmentation: decode_app_enumerated(r)?,
            vendor_id: decode_app_unsigned(r)?,
        })
    }
}
