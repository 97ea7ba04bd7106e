//! Single-instance coordination.
//!
//! The first `qegui` a user starts owns a local channel named
//! `QEGuiInstance_<user>`. Later invocations with `-s` find that owner,
//! hand their startup parameters over in a versioned binary payload, and
//! exit. The owner decodes the payload and opens the requested windows on
//! its own event loop.

pub mod arbiter;
pub mod channel;
pub mod codec;

pub use arbiter::{ArbiterConfig, InstanceArbiter, OwnerHandle, Role};
pub use channel::ChannelName;
pub use codec::{decode, decode_with, encode, encode_with, PROTOCOL_VERSION};
