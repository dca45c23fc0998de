//! Backend identifiers shared by the facade, the selector and the CLI.

use std::str::FromStr;

use crate::errors::SerikitError;

/// Every serialization backend the facade can dispatch to.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum BackendKind {
    /// Value-tree JSON engine. Safe on every platform.
    TreeJson,
    /// Streaming JSON engine with configurable escaping.
    StreamJson,
    /// MessagePack binary codec.
    MessagePack,
}

/// The JSON-capable subset of [`BackendKind`].
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum JsonBackendKind {
    TreeJson,
    StreamJson,
}

impl BackendKind {
    pub const ALL: [BackendKind; 3] = [
        BackendKind::TreeJson,
        BackendKind::StreamJson,
        BackendKind::MessagePack,
    ];

    pub fn name(self) -> &'static str {
        match self {
            BackendKind::TreeJson => "tree",
            BackendKind::StreamJson => "stream",
            BackendKind::MessagePack => "msgpack",
        }
    }

    pub fn is_json(self) -> bool {
        !matches!(self, BackendKind::MessagePack)
    }

    /// Narrow to a JSON backend, falling back to [`JsonBackendKind::TreeJson`]
    /// for the binary backend.
    ///
    /// Prefer `JsonBackendKind::try_from`; this exists for callers that must
    /// always get a JSON engine back.
    pub fn json_or_default(self) -> JsonBackendKind {
        JsonBackendKind::try_from(self).unwrap_or_else(|_| {
            tracing::warn!(
                backend = %self,
                "binary backend requested where JSON is required, using tree engine"
            );
            JsonBackendKind::TreeJson
        })
    }
}

impl JsonBackendKind {
    pub const ALL: [JsonBackendKind; 2] = [JsonBackendKind::TreeJson, JsonBackendKind::StreamJson];

    pub fn name(self) -> &'static str {
        BackendKind::from(self).name()
    }
}

impl From<JsonBackendKind> for BackendKind {
    fn from(kind: JsonBackendKind) -> Self {
        match kind {
            JsonBackendKind::TreeJson => BackendKind::TreeJson,
            JsonBackendKind::StreamJson => BackendKind::StreamJson,
        }
    }
}

impl TryFrom<BackendKind> for JsonBackendKind {
    type Error = SerikitError;

    fn try_from(kind: BackendKind) -> Result<Self, Self::Error> {
        match kind {
            BackendKind::TreeJson => Ok(JsonBackendKind::TreeJson),
            BackendKind::StreamJson => Ok(JsonBackendKind::StreamJson),
            BackendKind::MessagePack => Err(SerikitError::NotJsonBackend(kind)),
        }
    }
}

impl std::fmt::Display for BackendKind {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.name())
    }
}

impl std::fmt::Display for JsonBackendKind {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.name())
    }
}

impl FromStr for BackendKind {
    type Err = SerikitError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_ascii_lowercase().as_str() {
            "tree" | "tree-json" | "newtonsoft" => Ok(BackendKind::TreeJson),
            "stream" | "stream-json" | "system-text-json" => Ok(BackendKind::StreamJson),
            "msgpack" | "messagepack" => Ok(BackendKind::MessagePack),
            other => Err(SerikitError::Config(format!("unknown backend '{}'", other))),
        }
    }
}

impl FromStr for JsonBackendKind {
    type Err = SerikitError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        s.parse::<BackendKind>().and_then(JsonBackendKind::try_from)
    }
}
