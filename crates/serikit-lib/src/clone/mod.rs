//! Deep copies through the MessagePack codec.

use serde::{de::DeserializeOwned, Serialize};

use crate::errors::Result;
use crate::msgpack::MessagePackCodec;

/// Encode `value` with MessagePack and decode a fresh `T` from the bytes.
///
/// The copy shares no storage with `value`. Failures are returned as-is; a
/// clone is never replaced by a default.
pub fn deep_clone<T: Serialize + DeserializeOwned>(value: &T) -> Result<T> {
    let bytes = MessagePackCodec::encode(value, None)?;
    MessagePackCodec::decode(&bytes, None)
}

/// `value.deep_clone()` for every type the binary codec can round-trip.
pub trait DeepClone: Sized {
    fn deep_clone(&self) -> Result<Self>;
}

impl<T: Serialize + DeserializeOwned> DeepClone for T {
    fn deep_clone(&self) -> Result<Self> {
        deep_clone(self)
    }
}
