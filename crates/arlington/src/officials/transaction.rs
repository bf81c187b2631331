//! Transaction type reported on a disclosure row.

use serde::{Deserialize, Serialize};
use std::fmt;

/// Direction of a disclosed transaction.
///
/// Disclosure feeds report partial and full sales as distinct strings
/// ("sale_full", "sale_partial"); both normalize to [`TransactionType::Sale`].
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum TransactionType {
    /// Purchase of the security.
    Purchase,

    /// Sale of the security, full or partial.
    Sale,

    /// Exchange of one security for another.
    Exchange,

    /// Unrecognized transaction type, preserved as reported.
    Other(String),
}

impl TransactionType {
    /// Returns the recognized transaction types.
    pub fn all() -> Vec<Self> {
        vec![Self::Purchase, Self::Sale, Self::Exchange]
    }

    /// Returns the canonical type name.
    pub fn name(&self) -> &str {
        match self {
            Self::Purchase => "Purchase",
            Self::Sale => "Sale",
            Self::Exchange => "Exchange",
            Self::Other(raw) => raw.as_str(),
        }
    }

    /// Parse a transaction type from a raw disclosure string.
    pub fn parse(raw: &str) -> Self {
        let trimmed = raw.trim();
        let normalized = trimmed
            .to_ascii_lowercase()
            .replace(['(', ')'], "")
            .split_whitespace()
            .collect::<Vec<_>>()
            .join("_")
            .replace('-', "_");
        match normalized.as_str() {
            "purchase" | "buy" => Self::Purchase,
            "sale" | "sell" | "sale_full" | "sale_partial" => Self::Sale,
            "exchange" => Self::Exchange,
            _ => Self::Other(trimmed.to_string()),
        }
    }
}

impl fmt::Display for TransactionType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.name())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use rstest::rstest;

    #[rstest]
    #[case("purchase", TransactionType::Purchase)]
    #[case("Buy", TransactionType::Purchase)]
    #[case("sale_full", TransactionType::Sale)]
    #[case("Sale (Partial)", TransactionType::Sale)]
    #[case("sale partial", TransactionType::Sale)]
    #[case("Stock Option", TransactionType::Other("Stock Option".to_string()))]
    #[case("exchange", TransactionType::Exchange)]
    fn test_parse(#[case] raw: &str, #[case] expected: TransactionType) {
        assert_eq!(TransactionType::parse(raw), expected);
    }

    #[test]
    fn test_name_roundtrip() {
        for tt in TransactionType::all() {
            assert!(!tt.name().is_empty());
        }
    }
}
