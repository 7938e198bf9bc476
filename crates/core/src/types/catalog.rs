//! Product taxonomy and variant types.

use serde::{Deserialize, Serialize};
use thiserror::Error;

/// Error parsing a category or subcategory from a path segment.
#[derive(Debug, Clone, Error)]
#[error("unknown {kind}: {value}")]
pub struct CategoryParseError {
    /// Which taxonomy failed to parse ("category" or "subcategory").
    pub kind: &'static str,
    /// The rejected input.
    pub value: String,
}

/// Top-level product categories carried by the shop.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Category {
    Bracelets,
    Crosses,
    Earrings,
    Necklaces,
    Rings,
}

impl Category {
    /// All categories, in display order.
    pub const ALL: [Self; 5] = [
        Self::Bracelets,
        Self::Crosses,
        Self::Earrings,
        Self::Necklaces,
        Self::Rings,
    ];

    /// The lowercase path segment for this category.
    #[must_use]
    pub const fn as_str(self) -> &'static str {
        match self {
            Self::Bracelets => "bracelets",
            Self::Crosses => "crosses",
            Self::Earrings => "earrings",
            Self::Necklaces => "necklaces",
            Self::Rings => "rings",
        }
    }
}

impl std::fmt::Display for Category {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.as_str())
    }
}

impl std::str::FromStr for Category {
    type Err = CategoryParseError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "bracelets" => Ok(Self::Bracelets),
            "crosses" => Ok(Self::Crosses),
            "earrings" => Ok(Self::Earrings),
            "necklaces" => Ok(Self::Necklaces),
            "rings" => Ok(Self::Rings),
            _ => Err(CategoryParseError {
                kind: "category",
                value: s.to_owned(),
            }),
        }
    }
}

/// Styling subcategories used for filtering within a category.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum SubCategory {
    Ethnic,
    Minimal,
    Luxury,
    OneOfAKind,
}

impl SubCategory {
    /// All subcategories, in display order.
    pub const ALL: [Self; 4] = [
        Self::Ethnic,
        Self::Minimal,
        Self::Luxury,
        Self::OneOfAKind,
    ];

    /// The lowercase path segment for this subcategory.
    #[must_use]
    pub const fn as_str(self) -> &'static str {
        match self {
            Self::Ethnic => "ethnic",
            Self::Minimal => "minimal",
            Self::Luxury => "luxury",
            Self::OneOfAKind => "one_of_a_kind",
        }
    }
}

impl std::fmt::Display for SubCategory {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.as_str())
    }
}

impl std::str::FromStr for SubCategory {
    type Err = CategoryParseError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "ethnic" => Ok(Self::Ethnic),
            "minimal" => Ok(Self::Minimal),
            "luxury" => Ok(Self::Luxury),
            "one_of_a_kind" => Ok(Self::OneOfAKind),
            _ => Err(CategoryParseError {
                kind: "subcategory",
                value: s.to_owned(),
            }),
        }
    }
}

/// A size/color selection distinguishing otherwise-identical cart lines.
///
/// Both axes are optional; a product without variant axes produces lines
/// with an empty variant. Two lines belong to the same merge identity only
/// when both axes match exactly.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
pub struct Variant {
    /// Selected size (e.g., "M", "45cm").
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub size: Option<String>,
    /// Selected color (e.g., "gold", "silver").
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub color: Option<String>,
}

impl Variant {
    /// A variant with no selections.
    #[must_use]
    pub const fn none() -> Self {
        Self {
            size: None,
            color: None,
        }
    }

    /// True when neither axis is selected.
    #[must_use]
    pub const fn is_empty(&self) -> bool {
        self.size.is_none() && self.color.is_none()
    }
}

impl std::fmt::Display for Variant {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match (&self.size, &self.color) {
            (Some(size), Some(color)) => write!(f, "{size} / {color}"),
            (Some(size), None) => write!(f, "{size}"),
            (None, Some(color)) => write!(f, "{color}"),
            (None, None) => Ok(()),
        }
    }
}
