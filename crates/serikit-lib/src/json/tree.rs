//! Lenient JSON engine.

use serde::{de::DeserializeOwned, Serialize};

use super::{JsonCodec, Payload, SerializationOptions, SkipNullFields};
use crate::backend::{BackendKind, JsonBackendKind};
use crate::errors::{Result, SerikitError};

const KIND: BackendKind = BackendKind::TreeJson;

/// Lenient engine on serde_json's stock writer.
///
/// Non-ASCII text is written literally, so this engine is safe on platforms
/// whose native encoder mangles emoji. Blank input decodes as `null`.
#[derive(Debug, Clone, Copy, Default)]
pub struct TreeJson;

impl JsonCodec for TreeJson {
    fn kind(&self) -> JsonBackendKind {
        JsonBackendKind::TreeJson
    }

    fn encode<T: Serialize + ?Sized>(
        &self,
        value: Option<&T>,
        options: &SerializationOptions,
    ) -> Result<String> {
        let payload = Payload::from_option(value);
        let text = match (options.omit_nulls, options.pretty) {
            (true, true) => serde_json::to_string_pretty(&SkipNullFields(&payload)),
            (true, false) => serde_json::to_string(&SkipNullFields(&payload)),
            (false, true) => serde_json::to_string_pretty(&payload),
            (false, false) => serde_json::to_string(&payload),
        };
        text.map_err(|e| SerikitError::encode(KIND, e))
    }

    fn decode<T: DeserializeOwned>(&self, text: &str) -> Result<T> {
        let text = if text.trim().is_empty() { "null" } else { text };
        serde_json::from_str(text).map_err(|e| SerikitError::deserialization(KIND, e))
    }
}
