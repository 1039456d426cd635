use std::fmt;

/// Barcode symbology a candidate can belong to, keyed by symbol length
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Symbology {
    /// EAN-8 (7 data digits + check digit)
    Ean8,
    /// EAN-13 (12 data digits + check digit)
    Ean13,
}

impl Symbology {
    /// Every symbology the scanner knows about
    pub const ALL: [Symbology; 2] = [Symbology::Ean8, Symbology::Ean13];

    /// Map a candidate length onto its symbology
    pub fn from_len(len: usize) -> Option<Self> {
        match len {
            8 => Some(Symbology::Ean8),
            13 => Some(Symbology::Ean13),
            _ => None,
        }
    }

    /// Number of characters in a full symbol (check digit included)
    pub fn symbol_len(&self) -> usize {
        match self {
            Symbology::Ean8 => 8,
            Symbology::Ean13 => 13,
        }
    }

    /// Human-readable name
    pub fn name(&self) -> &'static str {
        match self {
            Symbology::Ean8 => "EAN-8",
            Symbology::Ean13 => "EAN-13",
        }
    }

    /// Compute the EAN check digit for a payload (the code without its last digit).
    ///
    /// Digits are weighted 3, 1, 3, ... starting from the rightmost payload digit.
    /// Returns `None` if the payload is empty or contains a non-digit.
    pub fn check_digit(payload: &str) -> Option<u8> {
        if payload.is_empty() {
            return None;
        }
        let mut sum = 0u32;
        for (i, c) in payload.chars().rev().enumerate() {
            let digit = c.to_digit(10)?;
            let weight = if i % 2 == 0 { 3 } else { 1 };
            sum += digit * weight;
        }
        Some(((10 - sum % 10) % 10) as u8)
    }

    /// Check whether `code` carries a valid trailing check digit
    pub fn verify(code: &str) -> bool {
        let Some(last) = code.chars().last() else {
            return false;
        };
        let Some(expected) = last.to_digit(10) else {
            return false;
        };
        let payload = &code[..code.len() - last.len_utf8()];
        Self::check_digit(payload) == Some(expected as u8)
    }
}

impl fmt::Display for Symbology {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.name())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_from_len() {
        assert_eq!(Symbology::from_len(8), Some(Symbology::Ean8));
        assert_eq!(Symbology::from_len(13), Some(Symbology::Ean13));
        assert_eq!(Symbology::from_len(12), None);
        assert_eq!(Symbology::from_len(0), None);
        for s in Symbology::ALL {
            assert_eq!(Symbology::from_len(s.symbol_len()), Some(s));
        }
    }

    #[test]
    fn test_check_digit_known_codes() {
        assert_eq!(Symbology::check_digit("400638133393"), Some(1));
        assert_eq!(Symbology::check_digit("9638507"), Some(4));
        assert_eq!(Symbology::check_digit("12a4"), None);
        assert_eq!(Symbology::check_digit(""), None);
    }

    #[test]
    fn test_verify() {
        assert!(Symbology::verify("4006381333931"));
        assert!(Symbology::verify("96385074"));
        assert!(!Symbology::verify("4006381333932"));
        assert!(!Symbology::verify("9638507x"));
        assert!(!Symbology::verify(""));
    }
}
