use super::Symbology;
use std::collections::HashSet;
use std::fmt;

/// Identifier assigned to a confirmed code, unique within its collection
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub struct CodeId(u64);

impl CodeId {
    /// Raw identifier value
    pub fn get(&self) -> u64 {
        self.0
    }
}

impl fmt::Display for CodeId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "#{}", self.0)
    }
}

/// A code accepted by the debouncer
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ConfirmedCode {
    /// Monotonic identifier
    pub id: CodeId,
    /// Accepted code text
    pub code: String,
    /// Symbology implied by the code's length
    pub symbology: Symbology,
}

/// Insertion-ordered collection of confirmed codes with set-like de-duplication
///
/// Codes compare by plain string equality. Identifiers keep increasing across
/// [`ConfirmedCodes::clear`], so an id is never handed out twice.
#[derive(Debug, Clone)]
pub struct ConfirmedCodes {
    entries: Vec<ConfirmedCode>,
    seen: HashSet<String>,
    next_id: u64,
}

impl ConfirmedCodes {
    /// Create an empty collection
    pub fn new() -> Self {
        Self {
            entries: Vec::new(),
            seen: HashSet::new(),
            next_id: 1,
        }
    }

    /// Whether `code` has already been confirmed
    pub fn contains(&self, code: &str) -> bool {
        self.seen.contains(code)
    }

    /// Append a code, returning the new entry, or `None` if it is already present
    pub fn insert(&mut self, code: &str, symbology: Symbology) -> Option<ConfirmedCode> {
        if self.seen.contains(code) {
            return None;
        }
        let entry = ConfirmedCode {
            id: CodeId(self.next_id),
            code: code.to_owned(),
            symbology,
        };
        self.next_id += 1;
        self.seen.insert(entry.code.clone());
        self.entries.push(entry.clone());
        Some(entry)
    }

    /// Iterate codes in confirmation order
    pub fn iter(&self) -> std::slice::Iter<'_, ConfirmedCode> {
        self.entries.iter()
    }

    /// Number of confirmed codes
    pub fn len(&self) -> usize {
        self.entries.len()
    }

    /// True when nothing has been confirmed (or after a clear)
    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    /// Remove every code
    pub fn clear(&mut self) {
        self.entries.clear();
        self.seen.clear();
    }

    /// Codes joined by newlines, in confirmation order, without a trailing newline
    pub fn to_text(&self) -> String {
        self.entries
            .iter()
            .map(|entry| entry.code.as_str())
            .collect::<Vec<_>>()
            .join("\n")
    }
}

impl Default for ConfirmedCodes {
    fn default() -> Self {
        Self::new()
    }
}

impl<'a> IntoIterator for &'a ConfirmedCodes {
    type Item = &'a ConfirmedCode;
    type IntoIter = std::slice::Iter<'a, ConfirmedCode>;

    fn into_iter(self) -> Self::IntoIter {
        self.iter()
    }
}
