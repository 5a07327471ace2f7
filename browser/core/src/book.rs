//! Book Records
//!
//! The shape of one recommendation result as returned by the recommendation
//! service, plus the two projections the rest of the crate needs:
//!
//! - [`BookSummary`]: the payload sent to the explanation service
//! - [`BookDetails`]: the display fields shown by the detail overlay
//!
//! # Wire Tolerance
//!
//! The service serializes rows out of a dataframe, so a record may carry
//! `null` in place of a string, a float where a year is expected, or `NaN`
//! where a rating is missing. Decoding never fails on those; it maps them to
//! the empty string or to an absent value.

use serde::{Deserialize, Deserializer, Serialize};

/// Placeholder shown for an absent genre or publication year
pub const UNKNOWN_PLACEHOLDER: &str = "Unknown";

/// Placeholder shown for an absent rating
pub const RATING_PLACEHOLDER: &str = "N/A";

/// Label of the purchase link in the detail overlay
pub const PURCHASE_LABEL: &str = "Buy now at Amazon.com";

/// One recommendation result
///
/// Records have no key of their own; identity is the position in the result
/// list they arrived in.
#[derive(Clone, Debug, Default, PartialEq, Serialize, Deserialize)]
pub struct BookRecord {
    /// Book title
    #[serde(default, deserialize_with = "null_as_empty")]
    pub title: String,
    /// Author names, as a single display string
    #[serde(default, deserialize_with = "null_as_empty")]
    pub authors: String,
    /// Free-text description
    #[serde(default, deserialize_with = "null_as_empty")]
    pub description: String,
    /// Genre/category string
    #[serde(default, deserialize_with = "non_blank")]
    pub categories: Option<String>,
    /// Average reader rating
    #[serde(
        default,
        alias = "averageRating",
        deserialize_with = "finite_number"
    )]
    pub average_rating: Option<f64>,
    /// Year of first publication
    #[serde(default, alias = "publishedYear", deserialize_with = "whole_year")]
    pub published_year: Option<i32>,
    /// Cover image URL
    #[serde(default, deserialize_with = "non_blank")]
    pub thumbnail: Option<String>,
    /// Purchase page URL
    #[serde(default, alias = "amazonLink", deserialize_with = "non_blank")]
    pub amazon_link: Option<String>,
}

impl BookRecord {
    /// Create a record with just the required fields
    pub fn new(
        title: impl Into<String>,
        authors: impl Into<String>,
        description: impl Into<String>,
    ) -> Self {
        Self {
            title: title.into(),
            authors: authors.into(),
            description: description.into(),
            ..Default::default()
        }
    }

    /// Set the categories
    #[must_use]
    pub fn with_categories(mut self, categories: impl Into<String>) -> Self {
        self.categories = Some(categories.into());
        self
    }

    /// Set the average rating
    #[must_use]
    pub fn with_rating(mut self, rating: f64) -> Self {
        self.average_rating = Some(rating);
        self
    }

    /// Set the publication year
    #[must_use]
    pub fn with_year(mut self, year: i32) -> Self {
        self.published_year = Some(year);
        self
    }

    /// Set the cover thumbnail URL
    #[must_use]
    pub fn with_thumbnail(mut self, url: impl Into<String>) -> Self {
        self.thumbnail = Some(url.into());
        self
    }

    /// Set the purchase link
    #[must_use]
    pub fn with_amazon_link(mut self, url: impl Into<String>) -> Self {
        self.amazon_link = Some(url.into());
        self
    }

    /// The explanation request payload for this book
    pub fn summary(&self) -> BookSummary {
        BookSummary::from(self)
    }

    /// The overlay display fields for this book
    pub fn details(&self) -> BookDetails {
        BookDetails::from(self)
    }
}

/// The fields the explanation service needs to write a rationale
#[derive(Clone, Debug, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct BookSummary {
    /// Book title
    pub title: String,
    /// Author names
    pub authors: String,
    /// Free-text description
    pub description: String,
}

impl From<&BookRecord> for BookSummary {
    fn from(book: &BookRecord) -> Self {
        Self {
            title: book.title.clone(),
            authors: book.authors.clone(),
            description: book.description.clone(),
        }
    }
}

/// Display fields of the detail overlay
///
/// Every optional field of the record has either a placeholder string or an
/// `Option` here, so a renderer never has to decide what "absent" looks like.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct BookDetails {
    /// Book title
    pub title: String,
    /// Author names
    pub authors: String,
    /// Genre, or [`UNKNOWN_PLACEHOLDER`]
    pub genre: String,
    /// Rating, or [`RATING_PLACEHOLDER`]
    pub rating: String,
    /// Publication year, or [`UNKNOWN_PLACEHOLDER`]
    pub published_year: String,
    /// Free-text description
    pub description: String,
    /// Cover image URL, shown only when present
    pub cover_url: Option<String>,
    /// Purchase link, shown only when present
    pub purchase_link: Option<PurchaseLink>,
}

/// A labelled outbound link
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct PurchaseLink {
    /// Link text
    pub label: &'static str,
    /// Target URL
    pub url: String,
}

impl From<&BookRecord> for BookDetails {
    fn from(book: &BookRecord) -> Self {
        Self {
            title: book.title.clone(),
            authors: book.authors.clone(),
            genre: book
                .categories
                .clone()
                .unwrap_or_else(|| UNKNOWN_PLACEHOLDER.to_string()),
            rating: book
                .average_rating
                .map_or_else(|| RATING_PLACEHOLDER.to_string(), |r| r.to_string()),
            published_year: book
                .published_year
                .map_or_else(|| UNKNOWN_PLACEHOLDER.to_string(), |y| y.to_string()),
            description: book.description.clone(),
            cover_url: book.thumbnail.clone(),
            purchase_link: book.amazon_link.clone().map(|url| PurchaseLink {
                label: PURCHASE_LABEL,
                url,
            }),
        }
    }
}

// ============================================================================
// Lenient decoders
// ============================================================================

fn null_as_empty<'de, D>(deserializer: D) -> Result<String, D::Error>
where
    D: Deserializer<'de>,
{
    Ok(Option::<String>::deserialize(deserializer)?.unwrap_or_default())
}

fn non_blank<'de, D>(deserializer: D) -> Result<Option<String>, D::Error>
where
    D: Deserializer<'de>,
{
    let value = Option::<serde_json::Value>::deserialize(deserializer)?;
    Ok(match value {
        Some(serde_json::Value::String(s)) if !s.trim().is_empty() => Some(s),
        _ => None,
    })
}

fn finite_number<'de, D>(deserializer: D) -> Result<Option<f64>, D::Error>
where
    D: Deserializer<'de>,
{
    let value = Option::<serde_json::Value>::deserialize(deserializer)?;
    Ok(value.as_ref().and_then(number_of).filter(|n| n.is_finite()))
}

fn whole_year<'de, D>(deserializer: D) -> Result<Option<i32>, D::Error>
where
    D: Deserializer<'de>,
{
    let value = Option::<serde_json::Value>::deserialize(deserializer)?;
    Ok(value
        .as_ref()
        .and_then(number_of)
        .filter(|n| n.is_finite() && n.fract() == 0.0)
        .filter(|n| *n >= f64::from(i32::MIN) && *n <= f64::from(i32::MAX))
        .map(|n| n as i32))
}

/// Numbers may arrive as JSON numbers or as numeric strings
fn number_of(value: &serde_json::Value) -> Option<f64> {
    match value {
        serde_json::Value::Number(n) => n.as_f64(),
        serde_json::Value::String(s) => s.trim().parse().ok(),
        _ => None,
    }
}
