//! MessagePack backend built on `rmp-serde`.
//!
//! Structs are written as maps keyed by field name (`write_named`) so the
//! output can be read by other MessagePack consumers. Both directions take an
//! optional [`CancellationToken`] that is checked on every buffer write or
//! read; a cancelled token surfaces [`SerikitError::Cancelled`].

mod cancel;

use serde::{de::DeserializeOwned, Serialize};
use tokio_util::sync::CancellationToken;

use crate::backend::BackendKind;
use crate::errors::{Result, SerikitError};
use cancel::{CancellableReader, CancellableWriter};

const KIND: BackendKind = BackendKind::MessagePack;

/// Binary codec. Ignores `SerializationOptions`.
pub struct MessagePackCodec;

impl MessagePackCodec {
    pub fn encode<T: Serialize + ?Sized>(
        value: &T,
        cancel: Option<&CancellationToken>,
    ) -> Result<Vec<u8>> {
        ensure_not_cancelled(cancel)?;
        let mut writer = CancellableWriter::new(Vec::with_capacity(64), cancel);
        match rmp_serde::encode::write_named(&mut writer, value) {
            Ok(()) => Ok(writer.into_inner()),
            Err(_) if is_cancelled(cancel) => Err(SerikitError::Cancelled { backend: KIND }),
            Err(e) => Err(SerikitError::encode(KIND, e)),
        }
    }

    pub fn decode<T: DeserializeOwned>(
        bytes: &[u8],
        cancel: Option<&CancellationToken>,
    ) -> Result<T> {
        ensure_not_cancelled(cancel)?;
        let reader = CancellableReader::new(bytes, cancel);
        match rmp_serde::decode::from_read(reader) {
            Ok(value) => Ok(value),
            Err(_) if is_cancelled(cancel) => Err(SerikitError::Cancelled { backend: KIND }),
            Err(e) => Err(SerikitError::deserialization(KIND, e)),
        }
    }
}

fn is_cancelled(cancel: Option<&CancellationToken>) -> bool {
    cancel.is_some_and(CancellationToken::is_cancelled)
}

fn ensure_not_cancelled(cancel: Option<&CancellationToken>) -> Result<()> {
    if is_cancelled(cancel) {
        tracing::debug!(backend = %KIND, "cancelled before start");
        return Err(SerikitError::Cancelled { backend: KIND });
    }
    Ok(())
}
