//! Async client for enumerating the objects of a single BACnet/IP device:
//! discover the device instance over directed Who-Is, read its `objectList`,
//! then resolve each object's `objectName` one request at a time.

pub mod client;
pub mod error;
pub mod session;
pub mod value;

pub use client::{BacnetClient, DiscoveredDevice, Outcome, PropertyValue};
pub use error::{ClientError, RequestFailure};
pub use session::{
    EnumerationSession, NameResolution, ObjectRecord, SessionError, SessionReport,
};
pub use value::ClientDataValue;
