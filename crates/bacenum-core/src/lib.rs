//! BACnet protocol encoding and decoding for the bacenum client.
//!
//! `bacenum-core` covers exactly the wire surface a unicast
//! discovery-and-enumeration client touches: the BACnet tag system, NPDU
//! and APDU headers, and the Who-Is / I-Am / ReadProperty service codecs.
//! Everything is zero-copy over caller-owned buffers and
//! `no_std`-compatible.
//!
//! # Feature flags
//!
//! - **`std`** (default) — enables `std::error::Error` implementations.
//! - **`alloc`** (default) — enables decoders that allocate (property value
//!   sequences).
//! - **`serde`** — derives `Serialize`/`Deserialize` on the identifier types.

#![cfg_attr(not(feature = "std"), no_std)]

#[cfg(feature = "alloc")]
extern crate alloc;
#[cfg(feature = "std")]
extern crate std;

/// APDU headers for confirmed/unconfirmed requests and their replies.
pub mod apdu;
/// Binary encoding primitives, tag system, and zero-copy reader/writer.
pub mod encoding;
/// Error types for encoding and decoding operations.
pub mod error;
/// NPDU (network layer) encoding and decoding.
pub mod npdu;
/// Service request and acknowledgement codecs.
pub mod services;
/// Object identifiers, property identifiers, and application data values.
pub mod types;

pub use error::{DecodeError, EncodeError};
