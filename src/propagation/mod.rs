//! # Propagator interface
//!
//! Cross-cutting tracing state reaches the next process through propagators,
//! objects that read and write context data to and from the messages
//! exchanged by applications.
//!
//! Propagators use [`Injector`] and [`Extractor`] to write and read carrier
//! data. A carrier is whatever string-keyed structure travels with a request:
//! an HTTP header map, message metadata, or a CGI-style environment mapping.
//! The carrier is created and owned by the caller; a propagator only reads
//! and writes specific keys on it and never retains a reference.
//!
//! Keys pass through verbatim. Carriers with case-insensitive semantics (for
//! example HTTP header maps) are expected to normalize in their own
//! `Injector`/`Extractor` impls; the ones here do not, because the CGI-style
//! keyset ([`B3Keys::http_env`]) is uppercase by definition and must not be
//! folded.
//!
//! [`B3Keys::http_env`]: crate::B3Keys::http_env

use std::collections::HashMap;

pub mod text_map_propagator;

pub use text_map_propagator::{FieldIter, TextMapPropagator};

/// Write access to a carrier: anything that can store a string value under a
/// string key, such as a `HashMap` or an HTTP header map.
pub trait Injector {
    /// Add a key and value to the underlying data.
    fn set(&mut self, key: &str, value: String);
}

/// Read access to a carrier: anything that can look up a string value by
/// string key, such as a `HashMap` or an HTTP header map.
pub trait Extractor {
    /// Get a value for a key from the underlying data.
    fn get(&self, key: &str) -> Option<&str>;

    /// Collect all the keys from the underlying data.
    fn keys(&self) -> Vec<&str>;
}

impl<S: std::hash::BuildHasher> Injector for HashMap<String, String, S> {
    /// Set a key and value in the HashMap.
    fn set(&mut self, key: &str, value: String) {
        self.insert(key.to_string(), value);
    }
}

impl<S: std::hash::BuildHasher> Extractor for HashMap<String, String, S> {
    /// Get a value for a key from the HashMap.
    fn get(&self, key: &str) -> Option<&str> {
        self.get(key).map(|v| v.as_str())
    }

    /// Collect all the keys from the HashMap.
    fn keys(&self) -> Vec<&str> {
        self.keys().map(|k| k.as_str()).collect::<Vec<_>>()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn hash_map_get() {
        let mut carrier = HashMap::new();
        carrier.set("x-b3-traceid", "ff".to_string());

        assert_eq!(Extractor::get(&carrier, "x-b3-traceid"), Some("ff"));
        assert_eq!(Extractor::get(&carrier, "x-b3-spanid"), None);
    }

    #[test]
    fn hash_map_keys_are_verbatim() {
        let mut carrier = HashMap::new();
        carrier.set("HTTP_X_B3_TRACEID", "ff".to_string());
        carrier.set("x-b3-spanid", "10".to_string());

        let got = Extractor::keys(&carrier);
        assert_eq!(got.len(), 2);
        assert!(got.contains(&"HTTP_X_B3_TRACEID"));
        assert!(got.contains(&"x-b3-spanid"));

        // No case folding in either direction.
        assert_eq!(Extractor::get(&carrier, "http_x_b3_traceid"), None);
        assert_eq!(Extractor::get(&carrier, "HTTP_X_B3_TRACEID"), Some("ff"));
    }
}
