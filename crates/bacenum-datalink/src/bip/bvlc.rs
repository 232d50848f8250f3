use bacenum_core::encoding::{reader::Reader, writer::Writer};
use bacenum_core::{DecodeError, EncodeError};

pub const BVLC_TYPE_BIP: u8 = 0x81;

/// The subset of BVLC functions a unicast client sees on the wire. The
/// broadcast-management functions (BDT/FDT administration) decode to
/// [`BvlcFunction::Unknown`] and are dropped by the transport.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum BvlcFunction {
    Result,
    ForwardedNpdu,
    OriginalUnicastNpdu,
    OriginalBroadcastNpdu,
    Unknown(u8),
}

impl BvlcFunction {
    pub const fn from_u8(value: u8) -> Self {
        match value {
            0x00 => Self::Result,
            0x04 => Self::ForwardedNpdu,
            0x0A => Self::OriginalUnicastNpdu,
            0x0B => Self::OriginalBroadcastNpdu,
            v => Self::Unknown(v),
        }
    }

    pub const fn to_u8(self) -> u8 {
        match self {
            Self::Result => 0x00,
            Self::ForwardedNpdu => 0x04,
            Self::OriginalUnicastNpdu => 0x0A,
            Self::OriginalBroadcastNpdu => 0x0B,
            Self::Unknown(v) => v,
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct BvlcHeader {
    pub function: BvlcFunction,
    pub length: u16,
}

impl BvlcHeader {
    pub fn encode(&self, w: &mut Writer<'_>) -> Result<(), EncodeError> {
        w.write_u8(BVLC_TYPE_BIP)?;
        w.write_u8(self.function.to_u8())?;
        w.write_be_u16(self.length)
    }

    pub fn decode(r: &mut Reader<'_>) -> Result<Self, DecodeError> {
        if r.read_u8()? != BVLC_TYPE_BIP {
            return Err(DecodeError::InvalidValue);
        }
        let function = BvlcFunction::from_u8(r.read_u8()?);
        let length = r.read_be_u16()?;
        if length < 4 {
            return Err(DecodeError::InvalidLength);
        }
        Ok(Self { function, length })
    }
}

#[cfg(test)]
mod tests {
    use super::{BvlcFunction, BvlcHeader, BVLC_TYPE_BIP};
    use bacenum_core::encoding::{reader::Reader, writer::Writer};
    use bacenum_core::DecodeError;

    #[test]
    fn bvlc_unicast_roundtrip() {
        let h = BvlcHeader {
            function: BvlcFunction::OriginalUnicastNpdu,
            length: 17,
        };
        let mut buf = [0u8; 8];
        let mut w = Writer::new(&mut buf);
        h.encode(&mut w).unwrap();
        assert_eq!(w.as_written(), &[BVLC_TYPE_BIP, 0x0A, 0x00, 0x11]);

        let mut r = Reader::new(w.as_written());
        assert_eq!(BvlcHeader::decode(&mut r).unwrap(), h);
    }

    #[test]
    fn unknown_function_decodes() {
        let mut r = Reader::new(&[BVLC_TYPE_BIP, 0x05, 0, 6]);
        let decoded = BvlcHeader::decode(&mut r).unwrap();
        assert_eq!(decoded.function, BvlcFunction::Unknown(0x05));
    }

    #[test]
    fn short_length_is_rejected() {
        let mut r = Reader::new(&[BVLC_TYPE_BIP, 0x0A, 0, 3]);
        assert_eq!(
            BvlcHeader::decode(&mut r).unwrap_err(),
            DecodeError::InvalidLength
        );
    }

    #[test]
    fn wrong_link_type_is_rejected() {
        let mut r = Reader::new(&[0x82, 0x0A, 0, 4]);
        assert_eq!(
            BvlcHeader::decode(&mut r).unwrap_err(),
            DecodeError::InvalidValue
        );
    }
}
