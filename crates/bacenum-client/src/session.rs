//! Sequential enumeration session: resolve the device instance, read its
//! `objectList`, then read every object's `objectName` one request at a
//! time. Per-name failures are recorded in the report; earlier stages are
//! fatal because nothing meaningful can follow them.

use crate::client::{BacnetClient, Outcome};
use crate::{ClientDataValue, ClientError, RequestFailure};
use bacenum_core::types::{ObjectId, ObjectType, PropertyId};
use bacenum_datalink::{DataLink, DataLinkAddress};
use log::{debug, info, warn};
use std::collections::VecDeque;
use thiserror::Error;

#[derive(Debug, Error)]
pub enum SessionError {
    #[error("device did not answer the directed Who-Is")]
    DiscoveryTimeout,
    #[error("device discovery failed: {0}")]
    Discovery(RequestFailure),
    #[error("object-list read timed out")]
    ObjectListTimeout,
    #[error("object-list read failed: {0}")]
    ObjectList(RequestFailure),
    #[error("object-list reply did not hold object identifiers")]
    ObjectListType,
    #[error(transparent)]
    Client(#[from] ClientError),
}

/// How one object's name read ended up.
#[derive(Debug, Clone, PartialEq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize))]
#[cfg_attr(feature = "serde", serde(tag = "status", rename_all = "kebab-case"))]
pub enum NameResolution {
    Named { name: String },
    Unavailable { reason: String },
}

#[derive(Debug, Clone, PartialEq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize))]
pub struct ObjectRecord {
    pub object_id: ObjectId,
    pub name: NameResolution,
}

/// Final report: every `objectList` entry in device order, each with its
/// name or the reason it could not be read.
#[derive(Debug, Clone, PartialEq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize))]
pub struct SessionReport {
    pub device_id: ObjectId,
    pub objects: Vec<ObjectRecord>,
}

pub struct EnumerationSession<'a, D: DataLink> {
    client: &'a BacnetClient<D>,
    address: DataLinkAddress,
    device_instance: Option<u32>,
}

impl<'a, D: DataLink> EnumerationSession<'a, D> {
    pub fn new(client: &'a BacnetClient<D>, address: DataLinkAddress) -> Self {
        Self {
            client,
            address,
            device_instance: None,
        }
    }

    /// Skips the Who-Is stage; the device object is addressed directly.
    pub fn with_known_instance(mut self, instance: u32) -> Self {
        self.device_instance = Some(instance);
        self
    }

    pub async fn run(&self) -> Result<SessionReport, SessionError> {
        let device_id = match self.device_instance {
            Some(instance) => ObjectId::new(ObjectType::Device, instance),
            None => self.resolve_device().await?,
        };
        info!("enumerating {device_id} at {}", self.address);

        let object_ids = self.read_object_list(device_id).await?;
        info!("object list holds {} entries", object_ids.len());

        let objects = self.resolve_names(object_ids).await?;
        Ok(SessionReport { device_id, objects })
    }

    async fn resolve_device(&self) -> Result<ObjectId, SessionError> {
        match self.client.discover_device(self.address).await? {
            Outcome::Success(found) => {
                info!(
                    "discovered {} (vendor {}) at {}",
                    found.device_id, found.vendor_id, found.address
                );
                Ok(found.device_id)
            }
            Outcome::Failure(f) => Err(SessionError::Discovery(f)),
            Outcome::Timeout => Err(SessionError::DiscoveryTimeout),
        }
    }

    async fn read_object_list(&self, device_id: ObjectId) -> Result<Vec<ObjectId>, SessionError> {
        match self
            .client
            .read_property(self.address, device_id, PropertyId::ObjectList)
            .await?
        {
            Outcome::Success(value) => {
                let mut ids = Vec::with_capacity(value.values.len());
                for v in &value.values {
                    match v {
                        ClientDataValue::ObjectId(oid) => ids.push(*oid),
                        _ => return Err(SessionError::ObjectListType),
                    }
                }
                Ok(ids)
            }
            Outcome::Failure(f) => Err(SessionError::ObjectList(f)),
            Outcome::Timeout => Err(SessionError::ObjectListTimeout),
        }
    }

    async fn resolve_names(
        &self,
        object_ids: Vec<ObjectId>,
    ) -> Result<Vec<ObjectRecord>, SessionError> {
        let mut pending: VecDeque<ObjectId> = object_ids.into();
        let total = pending.len();
        let mut records = Vec::with_capacity(total);

        while let Some(object_id) = pending.pop_front() {
            let index = records.len() + 1;
            let name = match self
                .client
                .read_property(self.address, object_id, PropertyId::ObjectName)
                .await?
            {
                Outcome::Success(value) => match value.values.as_slice() {
                    [ClientDataValue::CharacterString(name)] => {
                        debug!("{index}/{total} {object_id}: {name}");
                        NameResolution::Named { name: name.clone() }
                    }
                    _ => {
                        warn!("{index}/{total} {object_id}: reply was not a character string");
                        NameResolution::Unavailable {
                            reason: "reply was not a character string".into(),
                        }
                    }
                },
                Outcome::Failure(f) => {
                    warn!("{index}/{total} {object_id}: {f}");
                    NameResolution::Unavailable {
                        reason: f.to_string(),
                    }
                }
                Outcome::Timeout => {
                    warn!("{index}/{total} {object_id}: request timed out");
                    NameResolution::Unavailable {
                        reason: "request timed out".into(),
                    }
                }
            };
            records.push(ObjectRecord { object_id, name });
        }

        Ok(records)
    }
}

#[cfg(test)]
mod tests {
    use super::{EnumerationSession, NameResolution, SessionError};
    use crate::client::tests::{
        error_apdu, i_am_apdu, read_property_ack_apdu, with_npdu, MockDataLink,
    };
    use crate::client::BacnetClient;
    use bacenum_core::types::{DataValue, ObjectId, ObjectType, PropertyId};
    use bacenum_datalink::DataLinkAddress;
    use std::time::Duration;

    fn test_addr() -> DataLinkAddress {
        DataLinkAddress::Ip(([192, 168, 1, 31], 47808).into())
    }

    fn object_list_ack(invoke_id: u8, device: ObjectId, entries: &[ObjectId]) -> Vec<u8> {
        let values: Vec<DataValue<'_>> = entries.iter().map(|&o| DataValue::ObjectId(o)).collect();
        read_property_ack_apdu(invoke_id, device, PropertyId::ObjectList, &values)
    }

    fn name_ack(invoke_id: u8, object_id: ObjectId, name: &str) -> Vec<u8> {
        read_property_ack_apdu(
            invoke_id,
            object_id,
            PropertyId::ObjectName,
            &[DataValue::CharacterString(name)],
        )
    }

    #[tokio::test]
    async fn known_instance_skips_discovery_and_preserves_order() {
        let (dl, state) = MockDataLink::new();
        let client = BacnetClient::with_datalink(dl);
        let addr = test_addr();

        let device = ObjectId::new(ObjectType::Device, 123);
        let ai = ObjectId::new(ObjectType::AnalogInput, 1);
        let bo = ObjectId::new(ObjectType::BinaryOutput, 2);

        {
            let mut recv = state.recv.lock().await;
            recv.push_back((with_npdu(&object_list_ack(1, device, &[device, ai, bo])), addr));
            recv.push_back((with_npdu(&name_ack(2, device, "Controller")), addr));
            recv.push_back((with_npdu(&name_ack(3, ai, "Zone Temp")), addr));
            recv.push_back((with_npdu(&name_ack(4, bo, "Fan Start")), addr));
        }

        let report = EnumerationSession::new(&client, addr)
            .with_known_instance(123)
            .run()
            .await
            .unwrap();

        assert_eq!(report.device_id, device);
        assert_eq!(report.objects.len(), 3);
        assert_eq!(report.objects[0].object_id, device);
        assert_eq!(
            report.objects[0].name,
            NameResolution::Named {
                name: "Controller".into()
            }
        );
        assert_eq!(report.objects[1].object_id, ai);
        assert_eq!(report.objects[2].object_id, bo);
        assert_eq!(
            report.objects[2].name,
            NameResolution::Named {
                name: "Fan Start".into()
            }
        );

        // No Who-Is: every frame sent is a confirmed request.
        let sent = state.sent.lock().await;
        assert_eq!(sent.len(), 4);
        for (_, frame) in sent.iter() {
            assert_eq!(frame[2] >> 4, 0);
        }
    }

    #[tokio::test]
    async fn unknown_instance_discovers_first() {
        let (dl, state) = MockDataLink::new();
        let client = BacnetClient::with_datalink(dl);
        let addr = test_addr();
        let device = ObjectId::new(ObjectType::Device, 400_001);

        {
            let mut recv = state.recv.lock().await;
            recv.push_back((with_npdu(&i_am_apdu(device)), addr));
            recv.push_back((with_npdu(&object_list_ack(1, device, &[device])), addr));
            recv.push_back((with_npdu(&name_ack(2, device, "Rooftop Unit")), addr));
        }

        let report = EnumerationSession::new(&client, addr).run().await.unwrap();
        assert_eq!(report.device_id, device);
        assert_eq!(report.objects.len(), 1);

        let sent = state.sent.lock().await;
        assert_eq!(sent[0].1, vec![0x01, 0x00, 0x10, 0x08]);
    }

    #[tokio::test]
    async fn name_failures_do_not_stop_the_walk() {
        let (dl, state) = MockDataLink::new();
        let client = BacnetClient::with_datalink(dl);
        let addr = test_addr();

        let device = ObjectId::new(ObjectType::Device, 123);
        let ai = ObjectId::new(ObjectType::AnalogInput, 1);
        let bo = ObjectId::new(ObjectType::BinaryOutput, 2);

        {
            let mut recv = state.recv.lock().await;
            recv.push_back((with_npdu(&object_list_ack(1, device, &[device, ai, bo])), addr));
            recv.push_back((with_npdu(&name_ack(2, device, "Controller")), addr));
            // unknown-property for the analog input
            recv.push_back((with_npdu(&error_apdu(3, 2, 32)), addr));
            recv.push_back((with_npdu(&name_ack(4, bo, "Fan Start")), addr));
        }

        let report = EnumerationSession::new(&client, addr)
            .with_known_instance(123)
            .run()
            .await
            .unwrap();

        assert_eq!(report.objects.len(), 3);
        assert!(matches!(
            report.objects[0].name,
            NameResolution::Named { .. }
        ));
        assert!(matches!(
            report.objects[1].name,
            NameResolution::Unavailable { .. }
        ));
        assert!(matches!(
            report.objects[2].name,
            NameResolution::Named { .. }
        ));
    }

    #[tokio::test]
    async fn object_list_timeout_is_fatal() {
        let (dl, state) = MockDataLink::new();
        let client =
            BacnetClient::with_datalink(dl).with_response_timeout(Duration::from_millis(20));
        let addr = test_addr();

        let err = EnumerationSession::new(&client, addr)
            .with_known_instance(123)
            .run()
            .await
            .unwrap_err();
        assert!(matches!(err, SessionError::ObjectListTimeout));

        // The walk never reached the name stage.
        let sent = state.sent.lock().await;
        assert_eq!(sent.len(), 1);
    }

    #[tokio::test]
    async fn object_list_of_non_identifiers_is_fatal() {
        let (dl, state) = MockDataLink::new();
        let client = BacnetClient::with_datalink(dl);
        let addr = test_addr();
        let device = ObjectId::new(ObjectType::Device, 123);

        let bogus = read_property_ack_apdu(
            1,
            device,
            PropertyId::ObjectList,
            &[DataValue::CharacterString("not an object id")],
        );
        state.recv.lock().await.push_back((with_npdu(&bogus), addr));

        let err = EnumerationSession::new(&client, addr)
            .with_known_instance(123)
            .run()
            .await
            .unwrap_err();
        assert!(matches!(err, SessionError::ObjectListType));
    }

    #[tokio::test]
    async fn empty_object_list_yields_empty_report() {
        let (dl, state) = MockDataLink::new();
        let client = BacnetClient::with_datalink(dl);
        let addr = test_addr();
        let device = ObjectId::new(ObjectType::Device, 123);

        state
            .recv
            .lock()
            .await
            .push_back((with_npdu(&object_list_ack(1, device, &[])), addr));

        let report = EnumerationSession::new(&client, addr)
            .with_known_instance(123)
            .run()
            .await
            .unwrap();
        assert!(report.objects.is_empty());

        let sent = state.sent.lock().await;
        assert_eq!(sent.len(), 1);
    }

    #[tokio::test]
    async fn name_timeout_is_recorded_not_fatal() {
        let (dl, state) = MockDataLink::new();
        let client =
            BacnetClient::with_datalink(dl).with_response_timeout(Duration::from_millis(20));
        let addr = test_addr();
        let device = ObjectId::new(ObjectType::Device, 123);
        let ai = ObjectId::new(ObjectType::AnalogInput, 1);

        state
            .recv
            .lock()
            .await
            .push_back((with_npdu(&object_list_ack(1, device, &[ai])), addr));

        let report = EnumerationSession::new(&client, addr)
            .with_known_instance(123)
            .run()
            .await
            .unwrap();
        assert_eq!(
            report.objects[0].name,
            NameResolution::Unavailable {
                reason: "request timed out".into()
            }
        );
    }
}
