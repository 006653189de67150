use serde::{Deserialize, Serialize};
use serde_json::{Map, Value};
use std::fmt;

const STATUS: &str = "status";
const CHUNKS: &str = "chunks";
const ERROR: &str = "error";
const MESSAGE: &str = "message";
const NAME: &str = "name";
const URL: &str = "url";
const PUBLIC_PATH: &str = "publicPath";

/// Decoded stats file as written by the bundle tracker.
///
/// The document stays untyped: the tracker owns the schema, this crate only reads
/// `status`, `chunks`, `error` and `message`.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(transparent)]
pub struct Manifest(Value);

impl Manifest {
    #[must_use]
    pub const fn new(value: Value) -> Self {
        Self(value)
    }

    /// Decodes raw stats file bytes.
    ///
    /// # Errors
    /// Returns the JSON error for malformed or truncated input.
    pub fn from_slice(bytes: &[u8]) -> Result<Self, serde_json::Error> {
        serde_json::from_slice(bytes).map(Self)
    }

    #[must_use]
    pub fn status(&self) -> ManifestStatus {
        ManifestStatus::from_value(self.0.get(STATUS))
    }

    /// Chunk records of `bundle`, in compiler order.
    #[must_use]
    pub fn chunks(&self, bundle: &str) -> Option<&[Value]> {
        self.0.get(CHUNKS)?.get(bundle)?.as_array().map(Vec::as_slice)
    }

    /// Names of all bundles listed in `chunks`.
    pub fn bundles(&self) -> impl Iterator<Item = &str> {
        self.0.get(CHUNKS).and_then(Value::as_object).into_iter().flat_map(|map| map.keys()).map(String::as_str)
    }

    #[must_use]
    pub fn error(&self) -> Option<&str> {
        self.0.get(ERROR).and_then(Value::as_str)
    }

    #[must_use]
    pub fn message(&self) -> Option<&str> {
        self.0.get(MESSAGE).and_then(Value::as_str)
    }

    #[must_use]
    pub const fn as_value(&self) -> &Value {
        &self.0
    }

    #[must_use]
    pub fn into_value(self) -> Value {
        self.0
    }
}

impl From<Value> for Manifest {
    fn from(value: Value) -> Self {
        Self(value)
    }
}

/// Typed view of the manifest `status` field.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ManifestStatus {
    Done,
    Error,
    Compiling,
    /// Any other status string (or a non-string value, rendered as JSON).
    Other(String),
    /// No `status` field at all.
    Missing,
}

impl ManifestStatus {
    fn from_value(value: Option<&Value>) -> Self {
        match value {
            None | Some(Value::Null) => Self::Missing,
            Some(Value::String(status)) => match status.as_str() {
                "done" => Self::Done,
                "error" => Self::Error,
                "compiling" => Self::Compiling,
                other => Self::Other(other.to_owned()),
            },
            Some(other) => Self::Other(other.to_string()),
        }
    }

    #[must_use]
    pub const fn is_compiling(&self) -> bool {
        matches!(self, Self::Compiling)
    }
}

impl fmt::Display for ManifestStatus {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Done => f.write_str("done"),
            Self::Error => f.write_str("error"),
            Self::Compiling => f.write_str("compiling"),
            Self::Other(status) => f.write_str(status),
            Self::Missing => f.write_str("None"),
        }
    }
}

/// A chunk record plus its resolved `url`.
///
/// Always a fresh copy; the cached manifest is never mutated.
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(transparent)]
pub struct AssetDescriptor(Map<String, Value>);

impl AssetDescriptor {
    /// Copies a chunk object; `None` for non-object chunks.
    #[must_use]
    pub fn from_chunk(chunk: &Value) -> Option<Self> {
        chunk.as_object().cloned().map(Self)
    }

    #[must_use]
    pub fn name(&self) -> Option<&str> {
        self.0.get(NAME).and_then(Value::as_str)
    }

    /// The resolved URL (empty only before decoration).
    #[must_use]
    pub fn url(&self) -> &str {
        self.0.get(URL).and_then(Value::as_str).unwrap_or_default()
    }

    #[must_use]
    pub(crate) fn has_url(&self) -> bool {
        self.0.contains_key(URL)
    }

    /// `publicPath`, when present and non-empty.
    #[must_use]
    pub fn public_path(&self) -> Option<&str> {
        self.0.get(PUBLIC_PATH).and_then(Value::as_str).filter(|path| !path.is_empty())
    }

    pub(crate) fn set_url(&mut self, url: impl Into<String>) {
        self.0.insert(URL.to_owned(), Value::String(url.into()));
    }

    #[must_use]
    pub fn get(&self, key: &str) -> Option<&Value> {
        self.0.get(key)
    }

    #[must_use]
    pub const fn as_map(&self) -> &Map<String, Value> {
        &self.0
    }

    #[must_use]
    pub fn into_map(self) -> Map<String, Value> {
        self.0
    }
}
