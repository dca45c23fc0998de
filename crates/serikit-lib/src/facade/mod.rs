//! Public entry points routing to the JSON engines and the binary codec.
//!
//! [`Serializer`] holds the default-backend cell it reads from, so tests can
//! build one with their own cell. The free functions in this module use
//! [`Serializer::global`].

use std::sync::{Arc, OnceLock};

use serde::{de::DeserializeOwned, Serialize};
use tokio_util::sync::CancellationToken;

use crate::backend::JsonBackendKind;
use crate::errors::Result;
use crate::json::{Escaping, JsonCodec, SerializationOptions, StreamJson, TreeJson};
use crate::msgpack::MessagePackCodec;
use crate::selector::DefaultJsonBackend;
use crate::transport;

#[derive(Debug, Clone)]
pub struct Serializer {
    default_backend: Arc<DefaultJsonBackend>,
    tree: TreeJson,
    stream: StreamJson,
}

static GLOBAL: OnceLock<Serializer> = OnceLock::new();

impl Serializer {
    /// A facade reading its default engine from `default_backend`. The
    /// streaming engine uses relaxed escaping.
    pub fn new(default_backend: Arc<DefaultJsonBackend>) -> Self {
        Self {
            default_backend,
            tree: TreeJson,
            stream: StreamJson::relaxed(),
        }
    }

    /// Replace the escaping policy of the streaming engine.
    pub fn with_stream_escaping(mut self, escaping: Escaping) -> Self {
        self.stream = StreamJson::new(escaping);
        self
    }

    /// The process-wide facade, bound to [`DefaultJsonBackend::global`].
    pub fn global() -> &'static Serializer {
        GLOBAL.get_or_init(|| Serializer::new(DefaultJsonBackend::global()))
    }

    pub fn default_json_backend(&self) -> JsonBackendKind {
        self.default_backend.get()
    }

    pub fn set_default_json_backend(&self, kind: JsonBackendKind) {
        self.default_backend.set(kind);
    }

    fn resolve(&self, backend: Option<JsonBackendKind>) -> JsonBackendKind {
        backend.unwrap_or_else(|| self.default_backend.get())
    }

    /// Encode `value` as JSON with `backend`, or the default engine when `None`.
    ///
    /// An absent `value` encodes as `null`.
    pub fn serialize_json<T: Serialize + ?Sized>(
        &self,
        backend: Option<JsonBackendKind>,
        value: Option<&T>,
        options: SerializationOptions,
    ) -> Result<String> {
        let kind = self.resolve(backend);
        tracing::debug!(
            backend = %kind,
            pretty = options.pretty,
            omit_nulls = options.omit_nulls,
            "serialize json"
        );
        match kind {
            JsonBackendKind::TreeJson => self.tree.encode(value, &options),
            JsonBackendKind::StreamJson => self.stream.encode(value, &options),
        }
    }

    pub fn deserialize_json<T: DeserializeOwned>(
        &self,
        backend: Option<JsonBackendKind>,
        text: &str,
    ) -> Result<T> {
        let kind = self.resolve(backend);
        tracing::debug!(backend = %kind, len = text.len(), "deserialize json");
        match kind {
            JsonBackendKind::TreeJson => self.tree.decode(text),
            JsonBackendKind::StreamJson => self.stream.decode(text),
        }
    }

    pub fn serialize_binary<T: Serialize + ?Sized>(
        &self,
        value: &T,
        cancel: Option<&CancellationToken>,
    ) -> Result<Vec<u8>> {
        MessagePackCodec::encode(value, cancel)
    }

    pub fn deserialize_binary<T: DeserializeOwned>(
        &self,
        bytes: &[u8],
        cancel: Option<&CancellationToken>,
    ) -> Result<T> {
        MessagePackCodec::decode(bytes, cancel)
    }

    /// See [`transport::serialize_binary_b64u`].
    pub fn serialize_binary_b64u<T: Serialize + ?Sized>(
        &self,
        value: Option<&T>,
        cancel: Option<&CancellationToken>,
    ) -> Result<Option<String>> {
        transport::serialize_binary_b64u(value, cancel)
    }

    /// See [`transport::deserialize_binary_b64u`]. Never fails.
    pub fn deserialize_binary_b64u<T: DeserializeOwned + Default>(
        &self,
        text: Option<&str>,
        cancel: Option<&CancellationToken>,
    ) -> T {
        transport::deserialize_binary_b64u(text, cancel)
    }

    /// See [`crate::clone::deep_clone`].
    pub fn clone_value<T: Serialize + DeserializeOwned>(&self, value: &T) -> Result<T> {
        crate::clone::deep_clone(value)
    }
}

pub fn default_json_backend() -> JsonBackendKind {
    Serializer::global().default_json_backend()
}

pub fn set_default_json_backend(kind: JsonBackendKind) {
    Serializer::global().set_default_json_backend(kind);
}

pub fn serialize_json<T: Serialize + ?Sized>(
    backend: Option<JsonBackendKind>,
    value: Option<&T>,
    options: SerializationOptions,
) -> Result<String> {
    Serializer::global().serialize_json(backend, value, options)
}

pub fn deserialize_json<T: DeserializeOwned>(
    backend: Option<JsonBackendKind>,
    text: &str,
) -> Result<T> {
    Serializer::global().deserialize_json(backend, text)
}

pub fn serialize_binary<T: Serialize + ?Sized>(
    value: &T,
    cancel: Option<&CancellationToken>,
) -> Result<Vec<u8>> {
    Serializer::global().serialize_binary(value, cancel)
}

pub fn deserialize_binary<T: DeserializeOwned>(
    bytes: &[u8],
    cancel: Option<&CancellationToken>,
) -> Result<T> {
    Serializer::global().deserialize_binary(bytes, cancel)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::backend::BackendKind;
    use crate::errors::SerikitError;
    use crate::platform::{DeviceIdiom, Platform, PlatformInfo};
    use proptest::prelude::*;
    use serde::Deserialize;
    use std::collections::BTreeMap;

    #[derive(Debug, Clone, Default, Serialize, Deserialize, PartialEq)]
    struct Record {
        name: String,
        value: Option<i64>,
        flags: Vec<bool>,
        #[serde(default)]
        extras: BTreeMap<String, Option<i32>>,
    }

    fn serializer(kind: JsonBackendKind) -> Serializer {
        Serializer::new(Arc::new(DefaultJsonBackend::with_value(kind)))
    }

    fn emoji_record() -> Record {
        Record {
            name: "a😀b".into(),
            value: None,
            flags: vec![],
            extras: BTreeMap::new(),
        }
    }

    #[test]
    fn default_backend_follows_the_cell() {
        let cell = Arc::new(DefaultJsonBackend::new(PlatformInfo::new(
            Platform::Android,
            DeviceIdiom::Phone,
        )));
        let facade = Serializer::new(cell.clone());
        assert_eq!(facade.default_json_backend(), JsonBackendKind::TreeJson);

        facade.set_default_json_backend(JsonBackendKind::StreamJson);
        assert_eq!(cell.get(), JsonBackendKind::StreamJson);
    }

    #[test]
    fn omitted_backend_uses_default_engine() {
        // Only the tree engine accepts blank input, so it tells the engines apart.
        let tree = serializer(JsonBackendKind::TreeJson);
        let stream = serializer(JsonBackendKind::StreamJson);
        assert_eq!(tree.deserialize_json::<Option<Record>>(None, "").unwrap(), None);
        assert!(stream.deserialize_json::<Option<Record>>(None, "").is_err());
    }

    #[test]
    fn explicit_backend_overrides_default() {
        let facade = serializer(JsonBackendKind::StreamJson);
        let none: Option<Record> = facade
            .deserialize_json(Some(JsonBackendKind::TreeJson), " ")
            .unwrap();
        assert!(none.is_none());
    }

    #[test]
    fn stream_engine_keeps_emoji_literal() {
        let facade = serializer(JsonBackendKind::StreamJson);
        let text = facade
            .serialize_json(None, Some(&emoji_record()), SerializationOptions::new())
            .unwrap();
        assert!(text.contains("a😀b"));
        assert!(!text.contains("\\u"));
    }

    #[test]
    fn stream_engine_strict_escaping_is_opt_in() {
        let facade = serializer(JsonBackendKind::StreamJson).with_stream_escaping(Escaping::Strict);
        let text = facade
            .serialize_json(None, Some(&emoji_record()), SerializationOptions::new())
            .unwrap();
        assert!(text.contains("\\uD83D\\uDE00"));
    }

    #[test]
    fn omit_nulls_controls_null_keys_for_both_engines() {
        for kind in JsonBackendKind::ALL {
            let facade = serializer(kind);
            let with = facade
                .serialize_json(None, Some(&emoji_record()), SerializationOptions::new())
                .unwrap();
            let without = facade
                .serialize_json(
                    None,
                    Some(&emoji_record()),
                    SerializationOptions::new().omit_nulls(true),
                )
                .unwrap();
            assert!(with.contains("\"value\""), "{kind}: {with}");
            assert!(!without.contains("\"value\""), "{kind}: {without}");
            assert!(without.contains("a😀b"), "{kind}: {without}");
        }
    }

    #[test]
    fn absent_value_is_null_for_both_engines() {
        for kind in JsonBackendKind::ALL {
            let text = serializer(kind)
                .serialize_json::<Record>(Some(kind), None, SerializationOptions::new())
                .unwrap();
            assert_eq!(text, "null");
        }
    }

    #[test]
    fn json_errors_propagate() {
        let facade = serializer(JsonBackendKind::TreeJson);
        let err = facade
            .deserialize_json::<Record>(Some(JsonBackendKind::StreamJson), "{")
            .unwrap_err();
        assert!(matches!(
            err,
            SerikitError::Deserialization {
                backend: BackendKind::StreamJson,
                ..
            }
        ));
    }

    #[test]
    fn binary_round_trip_and_cancellation() {
        let facade = serializer(JsonBackendKind::StreamJson);
        let bytes = facade.serialize_binary(&emoji_record(), None).unwrap();
        let back: Record = facade.deserialize_binary(&bytes, None).unwrap();
        assert_eq!(back, emoji_record());

        let token = CancellationToken::new();
        token.cancel();
        assert!(facade
            .deserialize_binary::<Record>(&bytes, Some(&token))
            .unwrap_err()
            .is_cancelled());
    }

    #[test]
    fn b64u_passthroughs() {
        let facade = serializer(JsonBackendKind::TreeJson);
        let text = facade
            .serialize_binary_b64u(Some(&emoji_record()), None)
            .unwrap();
        let back: Record = facade.deserialize_binary_b64u(text.as_deref(), None);
        assert_eq!(back, emoji_record());
        assert_eq!(facade.serialize_binary_b64u::<Record>(None, None).unwrap(), None);
        assert_eq!(
            facade.deserialize_binary_b64u::<Record>(Some("not valid base64!!"), None),
            Record::default()
        );
    }

    #[test]
    fn global_free_functions_route_through_global_facade() {
        let text = serialize_json(
            Some(JsonBackendKind::TreeJson),
            Some(&emoji_record()),
            SerializationOptions::new(),
        )
        .unwrap();
        let back: Record = deserialize_json(Some(JsonBackendKind::TreeJson), &text).unwrap();
        assert_eq!(back, emoji_record());

        let bytes = serialize_binary(&emoji_record(), None).unwrap();
        let back: Record = deserialize_binary(&bytes, None).unwrap();
        assert_eq!(back, emoji_record());
        assert!(JsonBackendKind::ALL.contains(&default_json_backend()));
    }

    fn record_strategy() -> impl Strategy<Value = Record> {
        (
            any::<String>(),
            proptest::option::of(any::<i64>()),
            proptest::collection::vec(any::<bool>(), 0..8),
            proptest::collection::btree_map("[a-z]{1,4}", proptest::option::of(any::<i32>()), 0..4),
        )
            .prop_map(|(name, value, flags, extras)| Record {
                name,
                value,
                flags,
                extras,
            })
    }

    proptest! {
        #[test]
        fn json_round_trip(record in record_strategy(), pretty in any::<bool>(), omit_nulls in any::<bool>()) {
            for kind in JsonBackendKind::ALL {
                let facade = serializer(kind);
                let options = SerializationOptions::new().pretty(pretty).omit_nulls(omit_nulls);
                let text = facade.serialize_json(None, Some(&record), options).unwrap();
                let back: Record = facade.deserialize_json(None, &text).unwrap();
                prop_assert_eq!(&back, &record);
            }
        }

        #[test]
        fn strict_escaping_round_trip(record in record_strategy()) {
            let facade = serializer(JsonBackendKind::StreamJson).with_stream_escaping(Escaping::Strict);
            let text = facade.serialize_json(None, Some(&record), SerializationOptions::new()).unwrap();
            prop_assert!(text.is_ascii());
            let back: Record = facade.deserialize_json(None, &text).unwrap();
            prop_assert_eq!(back, record);
        }

        #[test]
        fn binary_round_trip(record in record_strategy()) {
            let facade = serializer(JsonBackendKind::StreamJson);
            let bytes = facade.serialize_binary(&record, None).unwrap();
            let back: Record = facade.deserialize_binary(&bytes, None).unwrap();
            prop_assert_eq!(back, record);
        }

        #[test]
        fn b64u_round_trip(record in record_strategy()) {
            let facade = serializer(JsonBackendKind::StreamJson);
            let text = facade.serialize_binary_b64u(Some(&record), None).unwrap();
            let back: Record = facade.deserialize_binary_b64u(text.as_deref(), None);
            prop_assert_eq!(back, record);
        }
    }
}
