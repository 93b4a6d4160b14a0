// crates/nomad-provider-config/src/headers.rs
// ============================================================================
// Module: Header Multimap
// Description: Ordered multi-valued header collection for API requests.
// Purpose: Carry user-configured headers with duplicates preserved.
// Dependencies: std
// ============================================================================

//! ## Overview
//! [`HeaderMultimap`] keeps header names in first-insertion order and values
//! in append order. Names are canonicalized to MIME header form so
//! `x-nomad-team` and `X-Nomad-Team` share one entry.

// ============================================================================
// SECTION: Multimap
// ============================================================================

/// Ordered mapping from canonical header name to one or more values.
///
/// # Invariants
/// - Every stored name is non-empty and canonical.
/// - Every stored name has at least one value.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct HeaderMultimap {
    /// Entries in first-insertion order.
    entries: Vec<(String, Vec<String>)>,
}

impl HeaderMultimap {
    /// Creates an empty multimap.
    #[must_use]
    pub const fn new() -> Self {
        Self {
            entries: Vec::new(),
        }
    }

    /// Appends `value` under `name`, keeping earlier values.
    ///
    /// Returns false and stores nothing when `name` is empty.
    pub fn append(&mut self, name: &str, value: impl Into<String>) -> bool {
        if name.is_empty() {
            return false;
        }
        let key = canonical_header_key(name);
        let value = value.into();
        if let Some((_, values)) = self.entries.iter_mut().find(|(existing, _)| *existing == key) {
            values.push(value);
        } else {
            self.entries.push((key, vec![value]));
        }
        true
    }

    /// Returns all values stored under `name`.
    #[must_use]
    pub fn get_all(&self, name: &str) -> Option<&[String]> {
        let key = canonical_header_key(name);
        self.entries
            .iter()
            .find(|(existing, _)| *existing == key)
            .map(|(_, values)| values.as_slice())
    }

    /// Returns the first value stored under `name`.
    #[must_use]
    pub fn get(&self, name: &str) -> Option<&str> {
        self.get_all(name).and_then(|values| values.first()).map(String::as_str)
    }

    /// Iterates over `(name, values)` in first-insertion order.
    pub fn iter(&self) -> impl Iterator<Item = (&str, &[String])> {
        self.entries.iter().map(|(name, values)| (name.as_str(), values.as_slice()))
    }

    /// Returns the canonical names in first-insertion order.
    pub fn names(&self) -> impl Iterator<Item = &str> {
        self.entries.iter().map(|(name, _)| name.as_str())
    }

    /// Returns the number of distinct header names.
    #[must_use]
    pub const fn len(&self) -> usize {
        self.entries.len()
    }

    /// Returns true when no headers are stored.
    #[must_use]
    pub const fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }
}

// ============================================================================
// SECTION: Canonicalization
// ============================================================================

/// Returns the canonical MIME form of a header name.
///
/// The first letter and any letter following a hyphen are upper-cased; the
/// rest are lower-cased. Names containing non-token bytes are returned
/// unchanged.
#[must_use]
pub fn canonical_header_key(name: &str) -> String {
    if !name.bytes().all(is_token_byte) {
        return name.to_string();
    }
    let mut upper = true;
    name.chars()
        .map(|ch| {
            let mapped = if upper { ch.to_ascii_uppercase() } else { ch.to_ascii_lowercase() };
            upper = ch == '-';
            mapped
        })
        .collect()
}

/// Returns true for bytes allowed in an HTTP header field name.
const fn is_token_byte(byte: u8) -> bool {
    byte.is_ascii_alphanumeric()
        || matches!(
            byte,
            b'!' | b'#'
                | b'$'
                | b'%'
                | b'&'
                | b'\''
                | b'*'
                | b'+'
                | b'-'
                | b'.'
                | b'^'
                | b'_'
                | b'`'
                | b'|'
                | b'~'
        )
}

// ============================================================================
// SECTION: Tests
// ============================================================================
