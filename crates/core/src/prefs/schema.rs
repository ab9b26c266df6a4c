//! Known preference keys and the current schema version.

use serde_json::Value;

/// Container shape a stored blob must have.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Shape {
    Array,
    /// A plain JSON object; arrays do not count.
    Object,
}

impl Shape {
    /// Shape of a parsed value, if it is a container.
    pub fn of(value: &Value) -> Option<Shape> {
        match value {
            Value::Array(_) => Some(Shape::Array),
            Value::Object(_) => Some(Shape::Object),
            _ => None,
        }
    }

    pub fn matches(self, value: &Value) -> bool {
        Shape::of(value) == Some(self)
    }

    pub fn name(self) -> &'static str {
        match self {
            Shape::Array => "array",
            Shape::Object => "object",
        }
    }
}

/// One enumerated cache key.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct CacheKey {
    pub name: &'static str,
    pub shape: Shape,
}

/// The full set of keys guarded by one version marker.
#[derive(Debug, Clone, Copy)]
pub struct CacheSchema {
    pub version: i64,
    pub version_key: &'static str,
    pub keys: &'static [CacheKey],
}

impl CacheSchema {
    pub fn key(&self, name: &str) -> Option<&CacheKey> {
        self.keys.iter().find(|k| k.name == name)
    }
}

pub const CHECKED_SUGGESTIONS: &str = "checked_suggestions";
pub const HIDDEN_SUGGESTIONS: &str = "hidden_suggestions";
pub const QUANTITY_OVERRIDES: &str = "quantity_overrides";
pub const REVEALED_SURPRISES: &str = "revealed_surprises";
pub const VERSION_KEY: &str = "cache_schema_version";

/// Bump to invalidate every cached blob on the next startup.
pub const CURRENT_VERSION: i64 = 3;

const KNOWN_KEYS: &[CacheKey] = &[
    CacheKey {
        name: CHECKED_SUGGESTIONS,
        shape: Shape::Array,
    },
    CacheKey {
        name: HIDDEN_SUGGESTIONS,
        shape: Shape::Array,
    },
    CacheKey {
        name: QUANTITY_OVERRIDES,
        shape: Shape::Object,
    },
    CacheKey {
        name: REVEALED_SURPRISES,
        shape: Shape::Array,
    },
];

pub const CURRENT_SCHEMA: CacheSchema = CacheSchema {
    version: CURRENT_VERSION,
    version_key: VERSION_KEY,
    keys: KNOWN_KEYS,
};
