//! Node attribute keys and lenient value coercion
//!
//! Upstream data is loosely typed: free-form attributes may arrive as
//! strings, numbers or `null`, and revenue may be a number, a numeric string
//! or garbage. These helpers coerce instead of rejecting the record.

use serde::{Deserialize, Deserializer, Serialize};
use serde_json::Value;
use std::fmt;

/// Placeholder for a missing free-form attribute
pub const UNKNOWN_ATTRIBUTE: &str = "UNKNOWN";

/// Placeholder for a missing country
pub const UNKNOWN_COUNTRY: &str = "Unknown";

/// Profiled node attributes
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize, PartialOrd, Ord)]
pub enum NodeAttribute {
    Country,
    ProductServices,
    PointOfContact,
    HeadOfOrg,
    TradeDescription,
    FoundingDate,
    Type,
}

impl NodeAttribute {
    pub const ALL: [NodeAttribute; 7] = [
        NodeAttribute::Country,
        NodeAttribute::ProductServices,
        NodeAttribute::PointOfContact,
        NodeAttribute::HeadOfOrg,
        NodeAttribute::TradeDescription,
        NodeAttribute::FoundingDate,
        NodeAttribute::Type,
    ];

    /// Key used in the source JSON
    pub fn key(&self) -> &'static str {
        match self {
            NodeAttribute::Country => "country",
            NodeAttribute::ProductServices => "ProductServices",
            NodeAttribute::PointOfContact => "PointOfContact",
            NodeAttribute::HeadOfOrg => "HeadOfOrg",
            NodeAttribute::TradeDescription => "TradeDescription",
            NodeAttribute::FoundingDate => "founding_date",
            NodeAttribute::Type => "type",
        }
    }
}

impl fmt::Display for NodeAttribute {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.key())
    }
}

/// Render scalars as text; `null`, empty strings and containers become `None`.
pub(crate) fn lenient_string<'de, D>(deserializer: D) -> Result<Option<String>, D::Error>
where
    D: Deserializer<'de>,
{
    let value = Option::<Value>::deserialize(deserializer)?;
    Ok(match value {
        Some(Value::String(s)) if !s.is_empty() => Some(s),
        Some(Value::Number(n)) => Some(n.to_string()),
        Some(Value::Bool(b)) => Some(b.to_string()),
        _ => None,
    })
}

/// Finite numbers and numeric strings become `Some`; everything else is `None`.
pub(crate) fn lenient_number<'de, D>(deserializer: D) -> Result<Option<f64>, D::Error>
where
    D: Deserializer<'de>,
{
    let value = Option::<Value>::deserialize(deserializer)?;
    Ok(match value {
        Some(Value::Number(n)) => n.as_f64().filter(|v| v.is_finite()),
        Some(Value::String(s)) => parse_leading_number(&s),
        _ => None,
    })
}

/// Parse the longest numeric prefix of a string (`"12.5M"` -> 12.5).
pub(crate) fn parse_leading_number(raw: &str) -> Option<f64> {
    let trimmed = raw.trim_start();
    let mut end = 0;
    let mut seen_digit = false;
    let mut seen_dot = false;
    let mut seen_exp = false;

    for (i, c) in trimmed.char_indices() {
        match c {
            '0'..='9' => {
                seen_digit = true;
                end = i + 1;
            }
            '+' | '-' if i == 0 => {}
            '.' if !seen_dot && !seen_exp => seen_dot = true,
            'e' | 'E' if seen_digit && !seen_exp => seen_exp = true,
            '+' | '-' if seen_exp => {}
            _ => break,
        }
    }

    if !seen_digit {
        return None;
    }
    trimmed[..end].parse::<f64>().ok().filter(|v| v.is_finite())
}
