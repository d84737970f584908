//! Ranked CSS selector catalog for dense-region extraction
//!
//! Entries run from explicit job-description markers down to generic
//! content containers. Position only decides ties between equally long
//! candidates; it is not a priority for selection.

use scraper::Selector;

use crate::error::{CaptureError, Result};

/// Selectors seen across common job boards, most specific first.
pub const DEFAULT_SELECTORS: [&str; 8] = [
    "div[data-job-description]",
    "[class*='jobDescription']",
    "[id*='jobDescription']",
    "[class*='description']",
    "[id*='description']",
    "section[class*='description']",
    "main",
    "article",
];

/// One parsed catalog selector.
#[derive(Debug, Clone)]
pub struct CatalogEntry {
    /// 1-based rank within the catalog
    pub position: usize,
    pattern: String,
    selector: Selector,
}

impl CatalogEntry {
    pub fn pattern(&self) -> &str {
        &self.pattern
    }

    pub fn selector(&self) -> &Selector {
        &self.selector
    }
}

/// Ordered list of selectors, iterated in rank order.
#[derive(Debug, Clone)]
pub struct SelectorCatalog {
    entries: Vec<CatalogEntry>,
}

impl SelectorCatalog {
    /// Parse a catalog from patterns in rank order.
    pub fn from_patterns<I, S>(patterns: I) -> Result<Self>
    where
        I: IntoIterator<Item = S>,
        S: AsRef<str>,
    {
        let mut entries = Vec::new();
        for (idx, pattern) in patterns.into_iter().enumerate() {
            let pattern = pattern.as_ref().trim();
            let selector = Selector::parse(pattern)
                .map_err(|_| CaptureError::InvalidSelector(pattern.to_string()))?;
            entries.push(CatalogEntry {
                position: idx + 1,
                pattern: pattern.to_string(),
                selector,
            });
        }

        if entries.is_empty() {
            return Err(CaptureError::Config(
                "selector catalog must contain at least one selector".to_string(),
            ));
        }

        Ok(Self { entries })
    }

    pub fn entries(&self) -> &[CatalogEntry] {
        &self.entries
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    pub fn iter(&self) -> std::slice::Iter<'_, CatalogEntry> {
        self.entries.iter()
    }
}

impl Default for SelectorCatalog {
    fn default() -> Self {
        Self::from_patterns(DEFAULT_SELECTORS).expect("built-in selectors are valid CSS")
    }
}

impl<'a> IntoIterator for &'a SelectorCatalog {
    type Item = &'a CatalogEntry;
    type IntoIter = std::slice::Iter<'a, CatalogEntry>;

    fn into_iter(self) -> Self::IntoIter {
        self.entries.iter()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_default_catalog_keeps_rank_order() {
        let catalog = SelectorCatalog::default();
        assert_eq!(catalog.len(), DEFAULT_SELECTORS.len());

        let patterns: Vec<&str> = catalog.iter().map(|e| e.pattern()).collect();
        assert_eq!(patterns, DEFAULT_SELECTORS.to_vec());

        let positions: Vec<usize> = catalog.iter().map(|e| e.position).collect();
        assert_eq!(positions, vec![1, 2, 3, 4, 5, 6, 7, 8]);
    }

    #[test]
    fn test_invalid_selector_is_rejected() {
        let err = SelectorCatalog::from_patterns(["main", "div[[broken"]).unwrap_err();
        match err {
            CaptureError::InvalidSelector(pattern) => assert_eq!(pattern, "div[[broken"),
            other => panic!("unexpected error: {other:?}"),
        }
    }

    #[test]
    fn test_empty_catalog_is_rejected() {
        let patterns: Vec<String> = vec![];
        assert!(matches!(
            SelectorCatalog::from_patterns(patterns),
            Err(CaptureError::Config(_))
        ));
    }
}
