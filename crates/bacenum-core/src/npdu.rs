use crate::encoding::{reader::Reader, writer::Writer};
use crate::{DecodeError, EncodeError};

/// BACnet network layer protocol version (always `0x01`).
pub const NPDU_VERSION: u8 = 0x01;

/// A routed network-layer address: network number plus MAC bytes.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct NpduAddress {
    pub network: u16,
    pub mac: [u8; 6],
    pub mac_len: u8,
}

/// BACnet Network Protocol Data Unit header.
///
/// A unicast client only ever emits the plain form (no routing, no network
/// messages), but inbound frames may carry source routing information added
/// by routers, so decoding handles the full address block. Network-layer
/// messages (control bit 0x80) carry no APDU and decode to
/// [`DecodeError::Unsupported`] so callers can drop them.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Npdu {
    pub control: u8,
    pub destination: Option<NpduAddress>,
    pub source: Option<NpduAddress>,
    pub hop_count: Option<u8>,
}

impl Npdu {
    pub const fn new(control: u8) -> Self {
        Self {
            control,
            destination: None,
            source: None,
            hop_count: None,
        }
    }

    pub fn encode(&self, w: &mut Writer<'_>) -> Result<(), EncodeError> {
        w.write_u8(NPDU_VERSION)?;
        w.write_u8(self.control)?;
        if let Some(dest) = self.destination {
            encode_addr(w, dest)?;
        }
        if let Some(src) = self.source {
            encode_addr(w, src)?;
        }
        if self.destination.is_some() {
            w.write_u8(self.hop_count.unwrap_or(255))?;
        }
        Ok(())
    }

    pub fn decode(r: &mut Reader<'_>) -> Result<Self, DecodeError> {
        let version = r.read_u8()?;
        if version != NPDU_VERSION {
            return Err(DecodeError::InvalidValue);
        }

        let control = r.read_u8()?;
        if (control & 0x80) != 0 {
            // Network-layer message, no APDU follows.
            return Err(DecodeError::Unsupported);
        }

        let has_dest = (control & 0x20) != 0;
        let has_src = (control & 0x08) != 0;

        let destination = if has_dest {
            Some(decode_addr(r)?)
        } else {
            None
        };
        let source = if has_src { Some(decode_addr(r)?) } else { None };
        let hop_count = if has_dest { Some(r.read_u8()?) } else { None };

        Ok(Self {
            control,
            destination,
            source,
            hop_count,
        })
    }
}

fn encode_addr(w: &mut Writer<'_>, addr: NpduAddress) -> Result<(), EncodeError> {
    if addr.mac_len as usize > addr.mac.len() {
        return Err(EncodeError::InvalidLength);
    }
    w.write_be_u16(addr.network)?;
    w.write_u8(addr.mac_len)?;
    w.write_all(&addr.mac[..addr.mac_len as usize])
}

fn decode_addr(r: &mut Reader<'_>) -> Result<NpduAddress, DecodeError> {
    let network = r.read_be_u16()?;
    let mac_len = r.read_u8()?;
    if mac_len as usize > 6 {
        return Err(DecodeError::InvalidLength);
    }
    let mut mac = [0u8; 6];
    let src = r.read_exact(mac_len as usize)?;
    mac[..mac_len as usize].copy_from_slice(src);
    Ok(NpduAddress {
        network,
        mac,
        mac_len,
    })
}

#[cfg(test)]
mod tests {
    use super::{Npdu, NpduAddress};
    use crate::encoding::{reader::Reader, writer::Writer};
    use crate::DecodeError;

    #[test]
    fn plain_npdu_is_two_octets() {
        let mut buf = [0u8; 4];
        let mut w = Writer::new(&mut buf);
        Npdu::new(0).encode(&mut w).unwrap();
        assert_eq!(w.as_written(), &[0x01, 0x00]);
    }

    #[test]
    fn source_routed_npdu_roundtrip() {
        let mut p = Npdu::new(0x08);
        p.source = Some(NpduAddress {
            network: 2001,
            mac: [0x0C, 0, 0, 0, 0, 0],
            mac_len: 1,
        });

        let mut buf = [0u8; 16];
        let mut w = Writer::new(&mut buf);
        p.encode(&mut w).unwrap();

        let mut r = Reader::new(w.as_written());
        let dec = Npdu::decode(&mut r).unwrap();
        assert_eq!(dec.source.unwrap().network, 2001);
        assert!(r.is_empty());
    }

    #[test]
    fn network_messages_are_rejected() {
        let mut r = Reader::new(&[0x01, 0x80, 0x00]);
        assert_eq!(Npdu::decode(&mut r).unwrap_err(), DecodeError::Unsupported);
    }
}
