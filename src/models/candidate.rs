use super::Symbology;

/// A single raw decode result, borrowed from the decode event that carried it
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Candidate<'a> {
    text: &'a str,
}

impl<'a> Candidate<'a> {
    /// Wrap decoded text
    pub fn new(text: &'a str) -> Self {
        Self { text }
    }

    /// Decoded text
    pub fn as_str(&self) -> &'a str {
        self.text
    }

    /// Length in characters
    pub fn len(&self) -> usize {
        self.text.chars().count()
    }

    /// True for an empty decode
    pub fn is_empty(&self) -> bool {
        self.text.is_empty()
    }

    /// Symbology implied by the candidate's length, if any
    pub fn symbology(&self) -> Option<Symbology> {
        Symbology::from_len(self.len())
    }
}

impl<'a> From<&'a str> for Candidate<'a> {
    fn from(text: &'a str) -> Self {
        Self::new(text)
    }
}
