//! URL-safe text transport for MessagePack payloads.
//!
//! Output uses the RFC 4648 §5 alphabet without padding. Input is accepted
//! with or without padding.

use base64::alphabet;
use base64::engine::general_purpose::{GeneralPurpose, GeneralPurposeConfig, URL_SAFE_NO_PAD};
use base64::engine::DecodePaddingMode;
use base64::Engine;
use serde::{de::DeserializeOwned, Serialize};
use tokio_util::sync::CancellationToken;

use crate::errors::{Result, SerikitError};
use crate::msgpack::MessagePackCodec;

const URL_SAFE_ANY_PAD: GeneralPurpose = GeneralPurpose::new(
    &alphabet::URL_SAFE,
    GeneralPurposeConfig::new().with_decode_padding_mode(DecodePaddingMode::Indifferent),
);

/// Encode bytes as unpadded base64url.
pub fn encode(bytes: &[u8]) -> String {
    URL_SAFE_NO_PAD.encode(bytes)
}

/// Decode base64url text, padded or not. Surrounding whitespace is ignored.
pub fn decode(text: &str) -> Result<Vec<u8>> {
    URL_SAFE_ANY_PAD
        .decode(text.trim())
        .map_err(|e| SerikitError::Transport(e.to_string()))
}

/// MessagePack-encode `value` and wrap it as base64url.
///
/// An absent value short-circuits to `Ok(None)`.
pub fn serialize_binary_b64u<T: Serialize + ?Sized>(
    value: Option<&T>,
    cancel: Option<&CancellationToken>,
) -> Result<Option<String>> {
    let Some(value) = value else {
        return Ok(None);
    };
    let bytes = MessagePackCodec::encode(value, cancel)?;
    Ok(Some(encode(&bytes)))
}

/// Decode base64url MessagePack text into `T`. Never fails.
///
/// Absent or blank text, invalid base64, malformed MessagePack, a type
/// mismatch and cancellation all produce `T::default()`. Callers cannot tell
/// these cases apart; use [`decode`] with
/// [`MessagePackCodec::decode`] when the difference matters.
pub fn deserialize_binary_b64u<T: DeserializeOwned + Default>(
    text: Option<&str>,
    cancel: Option<&CancellationToken>,
) -> T {
    let text = match text {
        Some(t) if !t.trim().is_empty() => t,
        _ => return T::default(),
    };
    match decode(text).and_then(|bytes| MessagePackCodec::decode(&bytes, cancel)) {
        Ok(value) => value,
        Err(err) => {
            tracing::debug!(error = %err, "discarding base64url payload, using default");
            T::default()
        }
    }
}
