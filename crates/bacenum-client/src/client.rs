use crate::{ClientDataValue, ClientError, RequestFailure};
use bacenum_core::apdu::{
    AbortPdu, ApduType, BacnetError, ComplexAckHeader, RejectPdu, SegmentAck,
    UnconfirmedRequestHeader,
};
use bacenum_core::encoding::{reader::Reader, writer::Writer};
use bacenum_core::npdu::Npdu;
use bacenum_core::services::i_am::{IAmRequest, SERVICE_I_AM};
use bacenum_core::services::read_property::{
    ReadPropertyAck, ReadPropertyRequest, SERVICE_READ_PROPERTY,
};
use bacenum_core::services::who_is::WhoIsRequest;
use bacenum_core::types::{ErrorClass, ErrorCode, ObjectId, PropertyId};
use bacenum_datalink::{BacnetIpTransport, DataLink, DataLinkAddress, DataLinkError};
use log::{debug, trace};
use std::net::{IpAddr, Ipv4Addr, SocketAddr};
use std::time::Duration;
use tokio::sync::Mutex;
use tokio::time::{timeout, Instant};

const MAX_COMPLEX_ACK_REASSEMBLY_BYTES: usize = 1024 * 1024;

/// Terminal state of one correlated request. Every request ends in exactly
/// one of these; negative replies and silence are data, not `Err`.
#[derive(Debug, Clone, PartialEq)]
pub enum Outcome<T> {
    Success(T),
    Failure(RequestFailure),
    Timeout,
}

/// Device identity announced by a directed I-Am reply.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct DiscoveredDevice {
    pub address: DataLinkAddress,
    pub device_id: ObjectId,
    pub max_apdu: u32,
    pub vendor_id: u32,
}

/// Decoded ReadProperty result with owned values.
#[derive(Debug, Clone, PartialEq)]
pub struct PropertyValue {
    pub object_id: ObjectId,
    pub property_id: PropertyId,
    pub values: Vec<ClientDataValue>,
}

/// Single-transaction BACnet client. At most one request may be outstanding
/// at a time; a second call while one is in flight fails with
/// [`ClientError::RequestInFlight`] instead of queueing.
#[derive(Debug)]
pub struct BacnetClient<D: DataLink> {
    datalink: D,
    invoke_id: Mutex<u8>,
    request_io_lock: Mutex<()>,
    response_timeout: Duration,
}

impl BacnetClient<BacnetIpTransport> {
    pub async fn bind(local_port: u16) -> Result<Self, ClientError> {
        let bind_addr = SocketAddr::new(IpAddr::V4(Ipv4Addr::UNSPECIFIED), local_port);
        let datalink = BacnetIpTransport::bind(bind_addr).await?;
        Ok(Self::with_datalink(datalink))
    }
}

impl<D: DataLink> BacnetClient<D> {
    pub fn with_datalink(datalink: D) -> Self {
        Self {
            datalink,
            invoke_id: Mutex::new(1),
            request_io_lock: Mutex::new(()),
            response_timeout: Duration::from_secs(3),
        }
    }

    pub fn with_response_timeout(mut self, timeout: Duration) -> Self {
        self.response_timeout = timeout;
        self
    }

    async fn next_invoke_id(&self) -> u8 {
        let mut lock = self.invoke_id.lock().await;
        let id = *lock;
        *lock = lock.wrapping_add(1);
        if *lock == 0 {
            *lock = 1;
        }
        id
    }

    /// Receives the next frame, skipping frames the transport could not
    /// parse or fit into `buf`. Returns `None` once the deadline has passed.
    async fn recv_ignoring_noise(
        &self,
        buf: &mut [u8],
        deadline: Instant,
    ) -> Result<Option<(usize, DataLinkAddress)>, ClientError> {
        loop {
            let remaining = deadline.saturating_duration_since(Instant::now());
            if remaining.is_zero() {
                return Ok(None);
            }

            match timeout(remaining, self.datalink.recv(buf)).await {
                Err(_) => return Ok(None),
                Ok(Err(DataLinkError::InvalidFrame))
                | Ok(Err(DataLinkError::FrameTooLarge))
                | Ok(Err(DataLinkError::UnsupportedBvlcFunction(_))) => continue,
                Ok(Err(e)) => return Err(e.into()),
                Ok(Ok(v)) => return Ok(Some(v)),
            }
        }
    }

    async fn send_segment_ack(
        &self,
        address: DataLinkAddress,
        invoke_id: u8,
        sequence_number: u8,
        window_size: u8,
    ) -> Result<(), ClientError> {
        let mut tx = [0u8; 16];
        let mut w = Writer::new(&mut tx);
        Npdu::new(0).encode(&mut w)?;
        SegmentAck {
            negative_ack: false,
            sent_by_server: false,
            invoke_id,
            sequence_number,
            actual_window_size: window_size,
        }
        .encode(&mut w)?;
        self.datalink.send(address, w.as_written()).await?;
        Ok(())
    }

    /// Sends a directed Who-Is and waits for the I-Am announcement from the
    /// target address.
    pub async fn discover_device(
        &self,
        address: DataLinkAddress,
    ) -> Result<Outcome<DiscoveredDevice>, ClientError> {
        let _io_lock = self
            .request_io_lock
            .try_lock()
            .map_err(|_| ClientError::RequestInFlight)?;

        let mut tx = [0u8; 16];
        let mut w = Writer::new(&mut tx);
        Npdu::new(0).encode(&mut w)?;
        WhoIsRequest::unbounded().encode(&mut w)?;
        self.datalink.send(address, w.as_written()).await?;
        debug!("sent directed Who-Is to {address}");

        let deadline = Instant::now() + self.response_timeout;
        loop {
            let mut rx = [0u8; 1500];
            let Some((n, src)) = self.recv_ignoring_noise(&mut rx, deadline).await? else {
                return Ok(Outcome::Timeout);
            };
            if src != address {
                trace!("ignoring frame from unrelated peer {src}");
                continue;
            }
            let Ok(apdu) = extract_apdu(&rx[..n]) else {
                continue;
            };

            let mut r = Reader::new(apdu);
            let Ok(header) = UnconfirmedRequestHeader::decode(&mut r) else {
                continue;
            };
            if header.service_choice != SERVICE_I_AM {
                continue;
            }
            let Ok(i_am) = IAmRequest::decode_after_header(&mut r) else {
                continue;
            };
            return Ok(Outcome::Success(DiscoveredDevice {
                address: src,
                device_id: i_am.device_id,
                max_apdu: i_am.max_apdu,
                vendor_id: i_am.vendor_id,
            }));
        }
    }

    /// Reads one property of one object.
    pub async fn read_property(
        &self,
        address: DataLinkAddress,
        object_id: ObjectId,
        property_id: PropertyId,
    ) -> Result<Outcome<PropertyValue>, ClientError> {
        let _io_lock = self
            .request_io_lock
            .try_lock()
            .map_err(|_| ClientError::RequestInFlight)?;

        let invoke_id = self.next_invoke_id().await;
        let request = ReadPropertyRequest {
            object_id,
            property_id,
            array_index: None,
            invoke_id,
        };

        let mut tx = [0u8; 64];
        let mut w = Writer::new(&mut tx);
        Npdu::new(0).encode(&mut w)?;
        request.encode(&mut w)?;
        self.datalink.send(address, w.as_written()).await?;
        trace!("read {property_id:?} of {object_id} (invoke {invoke_id})");

        let deadline = Instant::now() + self.response_timeout;
        let payload = match self
            .await_complex_ack_payload(address, invoke_id, SERVICE_READ_PROPERTY, deadline)
            .await?
        {
            Outcome::Success(payload) => payload,
            Outcome::Failure(f) => return Ok(Outcome::Failure(f)),
            Outcome::Timeout => return Ok(Outcome::Timeout),
        };

        let mut r = Reader::new(&payload);
        match ReadPropertyAck::decode_after_header(&mut r) {
            Ok(ack) => Ok(Outcome::Success(PropertyValue {
                object_id: ack.object_id,
                property_id: ack.property_id,
                values: ack.values.iter().map(ClientDataValue::from).collect(),
            })),
            Err(e) => Ok(Outcome::Failure(RequestFailure::Malformed(e))),
        }
    }

    async fn await_complex_ack_payload(
        &self,
        address: DataLinkAddress,
        invoke_id: u8,
        service_choice: u8,
        deadline: Instant,
    ) -> Result<Outcome<Vec<u8>>, ClientError> {
        loop {
            let mut rx = [0u8; 1500];
            let Some((n, src)) = self.recv_ignoring_noise(&mut rx, deadline).await? else {
                return Ok(Outcome::Timeout);
            };
            if src != address {
                continue;
            }
            let Ok(apdu) = extract_apdu(&rx[..n]) else {
                continue;
            };
            let Some(&first) = apdu.first() else {
                continue;
            };

            match ApduType::from_u8(first >> 4) {
                Some(ApduType::ComplexAck) => {
                    let mut r = Reader::new(apdu);
                    let Ok(ack) = ComplexAckHeader::decode(&mut r) else {
                        continue;
                    };
                    if ack.invoke_id != invoke_id || ack.service_choice != service_choice {
                        continue;
                    }
                    let first_payload = r.read_exact(r.remaining()).unwrap_or(&[]);
                    return self
                        .collect_segments(
                            address,
                            invoke_id,
                            service_choice,
                            ack,
                            first_payload,
                            deadline,
                        )
                        .await;
                }
                Some(ApduType::Error) => {
                    let mut r = Reader::new(apdu);
                    let Ok(err) = BacnetError::decode(&mut r) else {
                        continue;
                    };
                    if err.invoke_id == invoke_id && err.service_choice == service_choice {
                        return Ok(Outcome::Failure(remote_service_error(err)));
                    }
                }
                Some(ApduType::Reject) => {
                    let mut r = Reader::new(apdu);
                    let Ok(rej) = RejectPdu::decode(&mut r) else {
                        continue;
                    };
                    if rej.invoke_id == invoke_id {
                        return Ok(Outcome::Failure(RequestFailure::Rejected {
                            reason: rej.reason,
                        }));
                    }
                }
                Some(ApduType::Abort) => {
                    let mut r = Reader::new(apdu);
                    let Ok(abort) = AbortPdu::decode(&mut r) else {
                        continue;
                    };
                    if abort.invoke_id == invoke_id {
                        return Ok(Outcome::Failure(RequestFailure::Aborted {
                            reason: abort.reason,
                            server: abort.server,
                        }));
                    }
                }
                _ => continue,
            }
        }
    }

    /// Reassembles a possibly-segmented Complex-Ack payload, acknowledging
    /// each inbound segment. Requests sent by this client always fit one
    /// APDU, so only the receive side segments.
    async fn collect_segments(
        &self,
        address: DataLinkAddress,
        invoke_id: u8,
        service_choice: u8,
        first_header: ComplexAckHeader,
        first_payload: &[u8],
        deadline: Instant,
    ) -> Result<Outcome<Vec<u8>>, ClientError> {
        let mut payload = first_payload.to_vec();
        if payload.len() > MAX_COMPLEX_ACK_REASSEMBLY_BYTES {
            return Err(ClientError::ResponseTooLarge {
                limit: MAX_COMPLEX_ACK_REASSEMBLY_BYTES,
            });
        }
        if !first_header.segmented {
            return Ok(Outcome::Success(payload));
        }

        let Some(mut last_seq) = first_header.sequence_number else {
            return Err(ClientError::UnsupportedResponse);
        };
        let mut window_size = first_header.proposed_window_size.unwrap_or(1);
        self.send_segment_ack(address, invoke_id, last_seq, window_size)
            .await?;
        let mut more_follows = first_header.more_follows;

        while more_follows {
            let mut rx = [0u8; 1500];
            let Some((n, src)) = self.recv_ignoring_noise(&mut rx, deadline).await? else {
                return Ok(Outcome::Timeout);
            };
            if src != address {
                continue;
            }
            let Ok(apdu) = extract_apdu(&rx[..n]) else {
                continue;
            };
            let Some(&first) = apdu.first() else {
                continue;
            };

            match ApduType::from_u8(first >> 4) {
                Some(ApduType::ComplexAck) => {
                    let mut r = Reader::new(apdu);
                    let Ok(seg) = ComplexAckHeader::decode(&mut r) else {
                        continue;
                    };
                    if seg.invoke_id != invoke_id || seg.service_choice != service_choice {
                        continue;
                    }
                    if !seg.segmented {
                        return Err(ClientError::UnsupportedResponse);
                    }
                    let Some(seq) = seg.sequence_number else {
                        return Err(ClientError::UnsupportedResponse);
                    };
                    if seq == last_seq {
                        // Duplicate segment: acknowledge again and keep waiting.
                        self.send_segment_ack(address, invoke_id, last_seq, window_size)
                            .await?;
                        continue;
                    }
                    if seq != last_seq.wrapping_add(1) {
                        continue;
                    }

                    let seg_payload = r.read_exact(r.remaining()).unwrap_or(&[]);
                    if payload.len().saturating_add(seg_payload.len())
                        > MAX_COMPLEX_ACK_REASSEMBLY_BYTES
                    {
                        return Err(ClientError::ResponseTooLarge {
                            limit: MAX_COMPLEX_ACK_REASSEMBLY_BYTES,
                        });
                    }
                    payload.extend_from_slice(seg_payload);

                    last_seq = seq;
                    more_follows = seg.more_follows;
                    window_size = seg.proposed_window_size.unwrap_or(window_size);
                    self.send_segment_ack(address, invoke_id, last_seq, window_size)
                        .await?;
                }
                Some(ApduType::Error) => {
                    let mut r = Reader::new(apdu);
                    let Ok(err) = BacnetError::decode(&mut r) else {
                        continue;
                    };
                    if err.invoke_id == invoke_id && err.service_choice == service_choice {
                        return Ok(Outcome::Failure(remote_service_error(err)));
                    }
                }
                Some(ApduType::Reject) => {
                    let mut r = Reader::new(apdu);
                    let Ok(rej) = RejectPdu::decode(&mut r) else {
                        continue;
                    };
                    if rej.invoke_id == invoke_id {
                        return Ok(Outcome::Failure(RequestFailure::Rejected {
                            reason: rej.reason,
                        }));
                    }
                }
                Some(ApduType::Abort) => {
                    let mut r = Reader::new(apdu);
                    let Ok(abort) = AbortPdu::decode(&mut r) else {
                        continue;
                    };
                    if abort.invoke_id == invoke_id {
                        return Ok(Outcome::Failure(RequestFailure::Aborted {
                            reason: abort.reason,
                            server: abort.server,
                        }));
                    }
                }
                _ => continue,
            }
        }

        Ok(Outcome::Success(payload))
    }
}

fn extract_apdu(frame: &[u8]) -> Result<&[u8], bacenum_core::DecodeError> {
    let mut r = Reader::new(frame);
    let _npdu = Npdu::decode(&mut r)?;
    let npdu_len = frame.len() - r.remaining();
    Ok(&frame[npdu_len..])
}

fn remote_service_error(err: BacnetError) -> RequestFailure {
    RequestFailure::ServiceError {
        service_choice: err.service_choice,
        error_class_raw: err.error_class,
        error_code_raw: err.error_code,
        error_class: err.error_class.and_then(ErrorClass::from_u32),
        error_code: err.error_code.and_then(ErrorCode::from_u32),
    }
}
