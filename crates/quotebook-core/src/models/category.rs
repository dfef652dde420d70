//! Category selection and the derived category set

use std::collections::BTreeSet;
use std::convert::Infallible;
use std::fmt;
use std::str::FromStr;

use super::Quote;

/// Category selection used when listing quotes.
#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub enum CategoryFilter {
    /// Every quote, in insertion order
    #[default]
    All,
    /// Only quotes whose category equals this value exactly
    Category(String),
}

impl CategoryFilter {
    /// Selection value that means "no filtering".
    pub const ALL: &'static str = "all";

    /// Parse a stored or user-entered selection; empty means `All`.
    #[must_use]
    pub fn from_selection(value: &str) -> Self {
        let trimmed = value.trim();
        if trimmed.is_empty() || trimmed == Self::ALL {
            Self::All
        } else {
            Self::Category(trimmed.to_string())
        }
    }

    /// Check whether a quote passes this filter
    #[must_use]
    pub fn matches(&self, quote: &Quote) -> bool {
        match self {
            Self::All => true,
            Self::Category(category) => quote.category == *category,
        }
    }
}

impl fmt::Display for CategoryFilter {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::All => f.write_str(Self::ALL),
            Self::Category(category) => f.write_str(category),
        }
    }
}

impl FromStr for CategoryFilter {
    type Err = Infallible;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Ok(Self::from_selection(s))
    }
}

/// Distinct categories across all quotes, sorted.
#[must_use]
pub fn category_set(quotes: &[Quote]) -> BTreeSet<String> {
    quotes.iter().map(|quote| quote.category.clone()).collect()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn parse_all_and_category() {
        assert_eq!("all".parse::<CategoryFilter>().unwrap(), CategoryFilter::All);
        assert_eq!("  ".parse::<CategoryFilter>().unwrap(), CategoryFilter::All);
        assert_eq!(
            " Motivation ".parse::<CategoryFilter>().unwrap(),
            CategoryFilter::Category("Motivation".to_string())
        );
    }

    #[test]
    fn display_roundtrips_through_parse() {
        let filter = CategoryFilter::Category("Resilience".to_string());
        assert_eq!(filter.to_string().parse::<CategoryFilter>().unwrap(), filter);
        assert_eq!(CategoryFilter::All.to_string(), "all");
    }

    #[test]
    fn matches_is_exact_and_case_sensitive() {
        let quote = Quote::with_id(1, "text", "Motivation", 1);
        assert!(CategoryFilter::All.matches(&quote));
        assert!(CategoryFilter::Category("Motivation".into()).matches(&quote));
        assert!(!CategoryFilter::Category("motivation".into()).matches(&quote));
    }

    #[test]
    fn category_set_deduplicates() {
        let quotes = vec![
            Quote::with_id(1, "a", "B", 1),
            Quote::with_id(2, "b", "A", 1),
            Quote::with_id(3, "c", "B", 1),
        ];
        let categories: Vec<_> = category_set(&quotes).into_iter().collect();
        assert_eq!(categories, vec!["A", "B"]);
    }
}
