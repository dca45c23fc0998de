// serikit-lib: serialization facade shared by the serikit binary

pub mod backend;
pub mod cli;
pub mod clone;
pub mod commands;
pub mod config;
pub mod errors;
pub mod facade;
pub mod json;
pub mod logger;
pub mod msgpack;
pub mod output;
pub mod platform;
pub mod selector;
pub mod transport;

pub use backend::{BackendKind, JsonBackendKind};
pub use clone::{deep_clone, DeepClone};
pub use errors::{Result, SerikitError};
pub use facade::{
    default_json_backend, deserialize_binary, deserialize_json, serialize_binary, serialize_json,
    set_default_json_backend, Serializer,
};
pub use json::SerializationOptions;
pub use selector::DefaultJsonBackend;
pub use transport::{deserialize_binary_b64u, serialize_binary_b64u};
