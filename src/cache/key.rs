//! Cache Key Module
//!
//! Derives fixed-size lookup keys from an operation, its input text and its options.

use std::collections::BTreeMap;
use std::fmt;

use serde::Serialize;
use sha2::{Digest, Sha256};

// == Operation Kind ==
/// Text operation a cached result belongs to.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum OperationKind {
    Grammar,
    Summarize,
    ToneChange,
}

impl OperationKind {
    /// All operation kinds, in declaration order.
    pub const ALL: [OperationKind; 3] = [
        OperationKind::Grammar,
        OperationKind::Summarize,
        OperationKind::ToneChange,
    ];

    /// Stable tag hashed into keys and shown in stats.
    pub fn as_str(&self) -> &'static str {
        match self {
            OperationKind::Grammar => "grammar",
            OperationKind::Summarize => "summarize",
            OperationKind::ToneChange => "tone_change",
        }
    }
}

impl fmt::Display for OperationKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

// == Operation Options ==
/// Operation-specific parameters, such as the target tone.
///
/// Backed by a sorted map so iteration order, and therefore the derived key,
/// does not depend on insertion order.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct OperationOptions {
    params: BTreeMap<String, String>,
}

impl OperationOptions {
    /// Creates an empty option set.
    pub fn new() -> Self {
        Self::default()
    }

    /// Returns the options with `name` set to `value`.
    pub fn with(mut self, name: impl Into<String>, value: impl Into<String>) -> Self {
        self.params.insert(name.into(), value.into());
        self
    }

    /// Looks up a single option.
    pub fn get(&self, name: &str) -> Option<&str> {
        self.params.get(name).map(String::as_str)
    }

    pub fn is_empty(&self) -> bool {
        self.params.is_empty()
    }

    /// Iterates options in sorted name order.
    pub fn iter(&self) -> impl Iterator<Item = (&str, &str)> {
        self.params.iter().map(|(k, v)| (k.as_str(), v.as_str()))
    }
}

// == Cache Key ==
/// Opaque SHA-256 digest identifying one request.
#[derive(Clone, Copy, PartialEq, Eq, Hash)]
pub struct CacheKey([u8; 32]);

impl CacheKey {
    /// Derives the key for `(kind, text, options)`.
    ///
    /// Leading and trailing whitespace in `text` is ignored. Each field is
    /// length-prefixed before hashing so field boundaries cannot shift.
    pub fn derive(kind: OperationKind, text: &str, options: &OperationOptions) -> Self {
        let mut hasher = Sha256::new();
        update_field(&mut hasher, kind.as_str().as_bytes());
        update_field(&mut hasher, text.trim().as_bytes());
        for (name, value) in options.iter() {
            update_field(&mut hasher, name.as_bytes());
            update_field(&mut hasher, value.as_bytes());
        }
        Self(hasher.finalize().into())
    }

    fn short_hex(&self) -> String {
        self.0[..6].iter().map(|b| format!("{:02x}", b)).collect()
    }
}

fn update_field(hasher: &mut Sha256, bytes: &[u8]) {
    hasher.update((bytes.len() as u64).to_le_bytes());
    hasher.update(bytes);
}

impl fmt::Debug for CacheKey {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "CacheKey({})", self.short_hex())
    }
}

impl fmt::Display for CacheKey {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.short_hex())
    }
}

// == Unit Tests ==
#[cfg(test)]
mod tests {
    use super::*;

    fn tone(value: &str) -> OperationOptions {
        OperationOptions::new().with("tone", value)
    }

    #[test]
    fn test_derive_is_deterministic() {
        let opts = tone("formal");
        let a = CacheKey::derive(OperationKind::ToneChange, "hello there", &opts);
        let b = CacheKey::derive(OperationKind::ToneChange, "hello there", &opts);
        assert_eq!(a, b);
    }

    #[test]
    fn test_derive_trims_whitespace() {
        let opts = OperationOptions::new();
        assert_eq!(
            CacheKey::derive(OperationKind::Grammar, " hello ", &opts),
            CacheKey::derive(OperationKind::Grammar, "hello", &opts)
        );
        assert_eq!(
            CacheKey::derive(OperationKind::Grammar, "\n\thello\r\n", &opts),
            CacheKey::derive(OperationKind::Grammar, "hello", &opts)
        );
    }

    #[test]
    fn test_derive_keeps_inner_whitespace_and_case() {
        let opts = OperationOptions::new();
        let base = CacheKey::derive(OperationKind::Grammar, "hello world", &opts);
        assert_ne!(base, CacheKey::derive(OperationKind::Grammar, "hello  world", &opts));
        assert_ne!(base, CacheKey::derive(OperationKind::Grammar, "Hello world", &opts));
    }

    #[test]
    fn test_derive_sensitive_to_options() {
        let formal = CacheKey::derive(OperationKind::ToneChange, "text", &tone("formal"));
        let casual = CacheKey::derive(OperationKind::ToneChange, "text", &tone("casual"));
        let none = CacheKey::derive(OperationKind::ToneChange, "text", &OperationOptions::new());
        assert_ne!(formal, casual);
        assert_ne!(formal, none);
    }

    #[test]
    fn test_derive_sensitive_to_kind() {
        let opts = OperationOptions::new();
        let keys: Vec<CacheKey> = OperationKind::ALL
            .iter()
            .map(|kind| CacheKey::derive(*kind, "same text", &opts))
            .collect();
        assert_ne!(keys[0], keys[1]);
        assert_ne!(keys[1], keys[2]);
        assert_ne!(keys[0], keys[2]);
    }

    #[test]
    fn test_option_insertion_order_irrelevant() {
        let a = OperationOptions::new().with("tone", "formal").with("lang", "en");
        let b = OperationOptions::new().with("lang", "en").with("tone", "formal");
        assert_eq!(
            CacheKey::derive(OperationKind::ToneChange, "x", &a),
            CacheKey::derive(OperationKind::ToneChange, "x", &b)
        );
    }

    #[test]
    fn test_field_boundaries_do_not_collide() {
        let a = OperationOptions::new().with("ab", "c");
        let b = OperationOptions::new().with("a", "bc");
        assert_ne!(
            CacheKey::derive(OperationKind::Grammar, "x", &a),
            CacheKey::derive(OperationKind::Grammar, "x", &b)
        );
    }

    #[test]
    fn test_debug_shows_short_hex() {
        let key = CacheKey::derive(OperationKind::Grammar, "x", &OperationOptions::new());
        let shown = format!("{:?}", key);
        assert!(shown.starts_with("CacheKey("));
        assert_eq!(key.to_string().len(), 12);
    }

    #[test]
    fn test_kind_tags() {
        assert_eq!(OperationKind::Grammar.to_string(), "grammar");
        assert_eq!(OperationKind::ToneChange.as_str(), "tone_change");
        assert_eq!(
            serde_json::to_string(&OperationKind::Summarize).unwrap(),
            "\"summarize\""
        );
    }
}
