use serde_json::Value;
use tokio_util::sync::CancellationToken;

use super::Format;
use crate::backend::BackendKind;
use crate::errors::{Result, SerikitError};
use crate::facade::Serializer;
use crate::json::{Escaping, SerializationOptions};
use crate::transport;

/// Output of a conversion: text is printed with a newline, bytes are not.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Rendered {
    Text(String),
    Bytes(Vec<u8>),
}

/// Parse `input` as JSON with the default engine and render it as `to`.
///
/// A parsed document has no typed structs, so `omit_nulls` drops the `null`
/// members of every JSON object instead. `escaping` only affects the stream
/// engine.
pub fn encode_document(
    serializer: &Serializer,
    input: &str,
    to: Format,
    options: SerializationOptions,
    escaping: Escaping,
    cancel: Option<&CancellationToken>,
) -> Result<Rendered> {
    let mut document: Value = serializer.deserialize_json(None, input)?;
    if options.omit_nulls {
        strip_null_members(&mut document);
    }
    match to {
        Format::Json(kind) => {
            let serializer = serializer.clone().with_stream_escaping(escaping);
            serializer
                .serialize_json(Some(kind), Some(&document), options)
                .map(Rendered::Text)
        }
        Format::MessagePack => serializer
            .serialize_binary(&document, cancel)
            .map(Rendered::Bytes),
        Format::B64u => {
            let bytes = serializer.serialize_binary(&document, cancel)?;
            Ok(Rendered::Text(transport::encode(&bytes)))
        }
    }
}

/// Read `input` in the `from` form and print it as JSON with the default engine.
///
/// Unlike `deserialize_binary_b64u`, bad base64url input is reported.
pub fn decode_document(
    serializer: &Serializer,
    input: &[u8],
    from: Format,
    pretty: bool,
    cancel: Option<&CancellationToken>,
) -> Result<String> {
    let document: Value = match from {
        Format::Json(kind) => {
            let text = std::str::from_utf8(input)
                .map_err(|e| SerikitError::deserialization(BackendKind::from(kind), e))?;
            serializer.deserialize_json(Some(kind), text)?
        }
        Format::MessagePack => serializer.deserialize_binary(input, cancel)?,
        Format::B64u => {
            let text = std::str::from_utf8(input)
                .map_err(|e| SerikitError::Transport(format!("input is not text: {}", e)))?;
            let bytes = transport::decode(text)?;
            serializer.deserialize_binary(&bytes, cancel)?
        }
    };
    serializer.serialize_json(None, Some(&document), SerializationOptions::new().pretty(pretty))
}

/// Remove `null` object members at every depth. Nulls inside arrays stay.
fn strip_null_members(value: &mut Value) {
    match value {
        Value::Object(map) => {
            map.retain(|_, v| !v.is_null());
            for v in map.values_mut() {
                strip_null_members(v);
            }
        }
        Value::Array(items) => {
            for v in items.iter_mut() {
                strip_null_members(v);
            }
        }
        _ => {}
    }
}
