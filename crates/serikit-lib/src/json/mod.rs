//! JSON engines behind a common contract.
//!
//! Two interchangeable engines are provided:
//!
//! - [`TreeJson`] is the lenient engine: serde_json's own writer, literal
//!   non-ASCII text, blank input read as `null`.
//! - [`StreamJson`] streams through an [`EscapingFormatter`], so the escaping
//!   policy is configurable, and rejects blank input.
//!
//! Both honour [`SerializationOptions`] while streaming; `omit_nulls` goes
//! through [`SkipNullFields`]. Absent values go through the single
//! [`Payload`] policy so every engine encodes them the same way.

pub mod escape;
pub mod nulls;
pub mod stream;
pub mod tree;

pub use escape::{Escaping, EscapingFormatter};
pub use nulls::SkipNullFields;
pub use stream::StreamJson;
pub use tree::TreeJson;

use serde::{de::DeserializeOwned, Serialize, Serializer};

use crate::backend::JsonBackendKind;
use crate::errors::Result;

/// Output options understood by the JSON engines. The binary codec ignores them.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct SerializationOptions {
    /// Indented multi-line output instead of a single compact line.
    pub pretty: bool,
    /// Leave out struct fields whose value is `null`. Map entries are kept.
    pub omit_nulls: bool,
}

impl SerializationOptions {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn pretty(mut self, pretty: bool) -> Self {
        self.pretty = pretty;
        self
    }

    pub fn omit_nulls(mut self, omit_nulls: bool) -> Self {
        self.omit_nulls = omit_nulls;
        self
    }
}

/// What actually gets encoded for a possibly-absent input.
///
/// The declared type of a payload is the static type `T` chosen at the call
/// site. An absent value has no type to infer, so it is encoded as the
/// generic object fallback: a bare `null`.
#[derive(Debug)]
pub enum Payload<'a, T: ?Sized> {
    Value(&'a T),
    Null,
}

impl<'a, T: ?Sized> Payload<'a, T> {
    pub fn from_option(value: Option<&'a T>) -> Self {
        match value {
            Some(v) => Payload::Value(v),
            None => Payload::Null,
        }
    }
}

impl<T: Serialize + ?Sized> Serialize for Payload<'_, T> {
    fn serialize<S: Serializer>(&self, serializer: S) -> std::result::Result<S::Ok, S::Error> {
        match self {
            Payload::Value(v) => v.serialize(serializer),
            Payload::Null => serializer.serialize_unit(),
        }
    }
}

/// Contract shared by the JSON engines.
pub trait JsonCodec: Send + Sync {
    fn kind(&self) -> JsonBackendKind;

    fn encode<T: Serialize + ?Sized>(
        &self,
        value: Option<&T>,
        options: &SerializationOptions,
    ) -> Result<String>;

    fn decode<T: DeserializeOwned>(&self, text: &str) -> Result<T>;
}
