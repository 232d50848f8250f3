use crate::bip::bvlc::{BvlcFunction, BvlcHeader};
use crate::{DataLink, DataLinkAddress, DataLinkError};
use bacenum_core::encoding::{reader::Reader, writer::Writer};
use log::debug;
use std::net::{IpAddr, Ipv4Addr, SocketAddr};
use std::sync::Arc;
use tokio::net::UdpSocket;

const MAX_BIP_FRAME_LEN: usize = 1600;

/// BACnet/IP transport over a single UDP socket.
///
/// Outbound frames are always Original-Unicast-NPDU; this client never
/// broadcasts. Inbound frames may be unicast, broadcast, or
/// Forwarded-NPDU (replies relayed through a BBMD), in which case the
/// reported source is the originating device, not the relay.
#[derive(Debug, Clone)]
pub struct BacnetIpTransport {
    socket: Arc<UdpSocket>,
}

impl BacnetIpTransport {
    pub async fn bind(bind_addr: SocketAddr) -> Result<Self, DataLinkError> {
        let socket = UdpSocket::bind(bind_addr).await?;
        debug!("bound BACnet/IP socket on {}", socket.local_addr()?);
        Ok(Self {
            socket: Arc::new(socket),
        })
    }

    pub fn local_addr(&self) -> Result<SocketAddr, DataLinkError> {
        self.socket.local_addr().map_err(DataLinkError::Io)
    }
}

impl DataLink for BacnetIpTransport {
    async fn send(&self, address: DataLinkAddress, payload: &[u8]) -> Result<(), DataLinkError> {
        let mut frame = [0u8; MAX_BIP_FRAME_LEN];
        let total_len = 4usize
            .checked_add(payload.len())
            .ok_or(DataLinkError::FrameTooLarge)?;
        if total_len > frame.len() {
            return Err(DataLinkError::FrameTooLarge);
        }

        let mut w = Writer::new(&mut frame);
        BvlcHeader {
            function: BvlcFunction::OriginalUnicastNpdu,
            length: total_len as u16,
        }
        .encode(&mut w)
        .map_err(|_| DataLinkError::InvalidFrame)?;
        w.write_all(payload)
            .map_err(|_| DataLinkError::FrameTooLarge)?;

        self.socket
            .send_to(w.as_written(), address.as_socket_addr())
            .await?;
        Ok(())
    }

    async fn recv(&self, buf: &mut [u8]) -> Result<(usize, DataLinkAddress), DataLinkError> {
        let mut frame = [0u8; MAX_BIP_FRAME_LEN];
        let (n, src) = self.socket.recv_from(&mut frame).await?;
        let mut r = Reader::new(&frame[..n]);
        let hdr = BvlcHeader::decode(&mut r).map_err(|_| DataLinkError::InvalidFrame)?;

        match hdr.function {
            BvlcFunction::OriginalUnicastNpdu | BvlcFunction::OriginalBroadcastNpdu => {
                let payload = r
                    .read_exact(hdr.length as usize - 4)
                    .map_err(|_| DataLinkError::InvalidFrame)?;
                if payload.len() > buf.len() {
                    return Err(DataLinkError::FrameTooLarge);
                }
                buf[..payload.len()].copy_from_slice(payload);
                Ok((payload.len(), DataLinkAddress::Ip(src)))
            }
            BvlcFunction::ForwardedNpdu => {
                let forwarded = r
                    .read_exact(hdr.length as usize - 4)
                    .map_err(|_| DataLinkError::InvalidFrame)?;
                if forwarded.len() < 6 {
                    return Err(DataLinkError::InvalidFrame);
                }
                let origin_ip =
                    Ipv4Addr::new(forwarded[0], forwarded[1], forwarded[2], forwarded[3]);
                let origin_port = u16::from_be_bytes([forwarded[4], forwarded[5]]);
                let payload = &forwarded[6..];
                if payload.len() > buf.len() {
                    return Err(DataLinkError::FrameTooLarge);
                }
                buf[..payload.len()].copy_from_slice(payload);
                Ok((
                    payload.len(),
                    DataLinkAddress::Ip(SocketAddr::new(IpAddr::V4(origin_ip), origin_port)),
                ))
            }
            BvlcFunction::Result | BvlcFunction::Unknown(_) => {
                debug!(
                    "dropping BVLC function 0x{:02x} from {src}",
                    hdr.function.to_u8()
                );
                Err(DataLinkError::UnsupportedBvlcFunction(hdr.function.to_u8()))
            }
        }
    }
}
