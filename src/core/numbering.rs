use serde::{Deserialize, Serialize};

use super::error::BillError;

/// How bill numbers are formatted within a batch.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct NumberingConfig {
    /// Text placed before the number (e.g. "MA/").
    pub prefix: String,
    /// First number issued.
    pub first: u64,
    /// Zero-padding width.
    pub zero_pad: usize,
}

impl Default for NumberingConfig {
    fn default() -> Self {
        Self {
            prefix: String::new(),
            first: 1,
            zero_pad: 3,
        }
    }
}

/// Gapless bill number sequence.
///
/// Generates bill numbers in the format `{prefix}{sequential}`, e.g. "001",
/// "002", or "MA/0042" with a prefix and wider padding.
#[derive(Debug, Clone)]
pub struct BillNumberSequence {
    prefix: String,
    // None once u64::MAX has been issued
    next_number: Option<u64>,
    zero_pad: usize,
}

impl BillNumberSequence {
    /// Create a new sequence starting at 1.
    pub fn new(prefix: impl Into<String>) -> Self {
        Self {
            prefix: prefix.into(),
            next_number: Some(1),
            zero_pad: 3,
        }
    }

    /// Create a sequence continuing from a given number.
    pub fn starting_at(prefix: impl Into<String>, next_number: u64) -> Result<Self, BillError> {
        if next_number == 0 {
            return Err(BillError::Numbering(
                "bill numbers start at 1".into(),
            ));
        }
        Ok(Self {
            prefix: prefix.into(),
            next_number: Some(next_number),
            zero_pad: 3,
        })
    }

    /// Build a sequence from a [`NumberingConfig`].
    pub fn from_config(config: &NumberingConfig) -> Result<Self, BillError> {
        Ok(Self::starting_at(config.prefix.clone(), config.first)?.with_padding(config.zero_pad))
    }

    /// Set zero-padding width (default: 3, so "001").
    pub fn with_padding(mut self, width: usize) -> Self {
        self.zero_pad = width;
        self
    }

    /// Generate the next bill number.
    ///
    /// Fails once the sequence has issued `u64::MAX`.
    pub fn next_number(&mut self) -> Result<String, BillError> {
        let current = self.next_number.ok_or_else(|| {
            BillError::Numbering(format!("bill numbers after {} are exhausted", u64::MAX))
        })?;
        self.next_number = current.checked_add(1);
        Ok(self.format(current))
    }

    /// Preview the next number without consuming it.
    pub fn peek(&self) -> Option<String> {
        self.next_number.map(|n| self.format(n))
    }

    /// Get the next number that will be issued (without prefix/formatting).
    pub fn next_raw(&self) -> Option<u64> {
        self.next_number
    }

    fn format(&self, num: u64) -> String {
        format!("{}{:0>width$}", self.prefix, num, width = self.zero_pad)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn sequential_numbering() {
        let mut seq = BillNumberSequence::new("");
        assert_eq!(seq.next_number().unwrap(), "001");
        assert_eq!(seq.next_number().unwrap(), "002");
        assert_eq!(seq.next_number().unwrap(), "003");
    }

    #[test]
    fn peek_does_not_consume() {
        let mut seq = BillNumberSequence::new("");
        assert_eq!(seq.peek().as_deref(), Some("001"));
        assert_eq!(seq.peek().as_deref(), Some("001"));
        assert_eq!(seq.next_number().unwrap(), "001");
        assert_eq!(seq.peek().as_deref(), Some("002"));
        assert_eq!(seq.next_raw(), Some(2));
    }

    #[test]
    fn starting_at() {
        let mut seq = BillNumberSequence::starting_at("MA/", 42).unwrap();
        assert_eq!(seq.next_number().unwrap(), "MA/042");
        assert_eq!(seq.next_number().unwrap(), "MA/043");
    }

    #[test]
    fn starting_at_zero_rejected() {
        assert!(BillNumberSequence::starting_at("", 0).is_err());
    }

    #[test]
    fn custom_padding() {
        let mut seq = BillNumberSequence::new("B").with_padding(5);
        assert_eq!(seq.next_number().unwrap(), "B00001");
    }

    #[test]
    fn wide_numbers_are_not_truncated() {
        let mut seq = BillNumberSequence::starting_at("", 1234).unwrap();
        assert_eq!(seq.next_number().unwrap(), "1234");
    }

    #[test]
    fn from_config() {
        let config = NumberingConfig {
            prefix: "INV-".into(),
            first: 7,
            zero_pad: 4,
        };
        let mut seq = BillNumberSequence::from_config(&config).unwrap();
        assert_eq!(seq.next_number().unwrap(), "INV-0007");
    }

    #[test]
    fn last_number_is_issued_then_exhausted() {
        let mut seq = BillNumberSequence::starting_at("", u64::MAX).unwrap();
        assert_eq!(seq.next_number().unwrap(), u64::MAX.to_string());
        assert_eq!(seq.peek(), None);
        assert!(matches!(seq.next_number(), Err(BillError::Numbering(_))));
    }
}
