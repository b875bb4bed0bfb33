// src/types.rs

use std::fmt;

use url::Url;

/// A request target as supplied by the caller: a raw string or an
/// already-parsed [`Url`].
///
/// Both network primitives take `impl Into<Resource>`, so call sites can
/// pass `"https://…"`, a `String`, or a `Url` interchangeably. The value is
/// stringified once on construction and kept as text from then on; no
/// validation happens here (the underlying transport decides what it can
/// actually reach).
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Resource(String);

impl Resource {
    pub fn as_str(&self) -> &str {
        &self.0
    }

    pub fn into_string(self) -> String {
        self.0
    }
}

impl fmt::Display for Resource {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

impl From<&str> for Resource {
    fn from(value: &str) -> Self {
        Resource(value.to_string())
    }
}

impl From<String> for Resource {
    fn from(value: String) -> Self {
        Resource(value)
    }
}

impl From<Url> for Resource {
    fn from(value: Url) -> Self {
        Resource(value.into())
    }
}

impl From<&Url> for Resource {
    fn from(value: &Url) -> Self {
        Resource(value.as_str().to_string())
    }
}
