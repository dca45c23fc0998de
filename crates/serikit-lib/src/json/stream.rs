//! Streaming JSON engine.

use serde::{de::DeserializeOwned, Serialize};
use serde_json::ser::{CompactFormatter, PrettyFormatter};

use super::{
    Escaping, EscapingFormatter, JsonCodec, Payload, SerializationOptions, SkipNullFields,
};
use crate::backend::{BackendKind, JsonBackendKind};
use crate::errors::{Result, SerikitError};

const KIND: BackendKind = BackendKind::StreamJson;

/// Serializes directly into the output buffer.
///
/// The facade always builds this engine with [`Escaping::Relaxed`]. With
/// [`Escaping::Strict`] every non-ASCII character comes out as `\uXXXX`, which
/// is the behaviour that makes this engine a poor default on some mobile
/// platforms. Unlike [`super::TreeJson`], blank input is an error.
#[derive(Debug, Clone, Copy, Default)]
pub struct StreamJson {
    escaping: Escaping,
}

impl StreamJson {
    pub fn new(escaping: Escaping) -> Self {
        Self { escaping }
    }

    pub fn relaxed() -> Self {
        Self::new(Escaping::Relaxed)
    }

    pub fn strict() -> Self {
        Self::new(Escaping::Strict)
    }

    pub fn escaping(&self) -> Escaping {
        self.escaping
    }

    fn write<S: Serialize + ?Sized>(&self, value: &S, pretty: bool) -> Result<String> {
        let mut buf = Vec::with_capacity(128);
        let written = if pretty {
            let formatter = EscapingFormatter::new(PrettyFormatter::new(), self.escaping);
            value.serialize(&mut serde_json::Serializer::with_formatter(&mut buf, formatter))
        } else {
            let formatter = EscapingFormatter::new(CompactFormatter, self.escaping);
            value.serialize(&mut serde_json::Serializer::with_formatter(&mut buf, formatter))
        };
        written.map_err(|e| SerikitError::encode(KIND, e))?;
        String::from_utf8(buf).map_err(|e| SerikitError::encode(KIND, e))
    }
}

impl JsonCodec for StreamJson {
    fn kind(&self) -> JsonBackendKind {
        JsonBackendKind::StreamJson
    }

    fn encode<T: Serialize + ?Sized>(
        &self,
        value: Option<&T>,
        options: &SerializationOptions,
    ) -> Result<String> {
        let payload = Payload::from_option(value);
        if options.omit_nulls {
            self.write(&SkipNullFields(&payload), options.pretty)
        } else {
            self.write(&payload, options.pretty)
        }
    }

    fn decode<T: DeserializeOwned>(&self, text: &str) -> Result<T> {
        serde_json::from_str(text).map_err(|e| SerikitError::deserialization(KIND, e))
    }
}
