use serde::{Deserialize, Serialize};
use std::fmt;
use std::sync::atomic::{AtomicU64, Ordering};

/// Prefix of generated keys. `@` cannot start an XML name, so a generated
/// key never collides with an `id` attribute read from markup.
pub const GENERATED_PREFIX: char = '@';

static NEXT_KEY: AtomicU64 = AtomicU64::new(1);

/// Stable identity of a node
///
/// Keys survive moves and are never reused. Splitting a node gives the new
/// half a fresh key.
#[derive(Debug, Clone, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(transparent)]
pub struct Key(String);

impl Key {
    /// Generate the next process-unique key
    pub fn generate() -> Self {
        let count = NEXT_KEY.fetch_add(1, Ordering::Relaxed);
        Self(format!("{}{}", GENERATED_PREFIX, count))
    }

    /// Use a markup `id` attribute as key
    pub fn from_id(id: impl Into<String>) -> Self {
        Self(id.into())
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }

    /// Whether this key was generated rather than read from markup
    pub fn is_generated(&self) -> bool {
        self.0.starts_with(GENERATED_PREFIX)
    }
}

impl fmt::Display for Key {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}
