//! Extraction engine: selection, whole-page and dense-region text
//!
//! Every strategy reads the page once and returns a single trimmed string.
//! Nothing here fails; missing selections, unmatched catalogs and empty
//! bodies all come back as `""` and are rejected later by the dispatcher.

use tracing::debug;

use crate::catalog::SelectorCatalog;
use crate::dom::PageDom;
use crate::mode::Mode;

/// Blocks at or below this many characters are treated as noise.
pub const MIN_CANDIDATE_CHARS: usize = 800;

/// A dense-text region found by one catalog selector.
#[derive(Debug, Clone)]
pub struct Candidate<E> {
    pub element: E,
    pub text: String,
    pub text_len: usize,
    /// 1-based rank of the selector that matched
    pub catalog_position: usize,
}

/// Runs one of the three extraction strategies over a [`PageDom`].
#[derive(Debug, Clone)]
pub struct Extractor {
    catalog: SelectorCatalog,
    min_candidate_chars: usize,
}

impl Default for Extractor {
    fn default() -> Self {
        Self::new(SelectorCatalog::default())
    }
}

impl Extractor {
    pub fn new(catalog: SelectorCatalog) -> Self {
        Self {
            catalog,
            min_candidate_chars: MIN_CANDIDATE_CHARS,
        }
    }

    pub fn with_min_candidate_chars(mut self, min_candidate_chars: usize) -> Self {
        self.min_candidate_chars = min_candidate_chars;
        self
    }

    pub fn catalog(&self) -> &SelectorCatalog {
        &self.catalog
    }

    pub fn extract<D: PageDom>(&self, dom: &D, mode: Mode) -> String {
        match mode {
            Mode::Selected => selection_text(dom),
            Mode::Page => page_text(dom),
            Mode::Smart => self.smart_text(dom),
        }
    }

    /// Longest catalog match above the candidate threshold, else the whole page.
    pub fn smart_text<D: PageDom>(&self, dom: &D) -> String {
        let candidates = self.collect_candidates(dom);
        debug!(candidates = candidates.len(), "collected dense-text candidates");

        match pick_densest(candidates) {
            Some(best) => {
                debug!(
                    position = best.catalog_position,
                    len = best.text_len,
                    "selected densest candidate"
                );
                best.text
            }
            None => {
                debug!("no candidate above threshold, falling back to whole page");
                page_text(dom)
            }
        }
    }

    /// Working set in catalog-then-document order. Nested matches are kept
    /// as separate candidates.
    pub fn collect_candidates<'a, D: PageDom>(&self, dom: &'a D) -> Vec<Candidate<D::Element<'a>>> {
        let mut candidates = Vec::new();

        for entry in &self.catalog {
            for element in dom.query_all(entry) {
                let text = dom.element_text(element).trim().to_string();
                let text_len = text.chars().count();
                if text_len > self.min_candidate_chars {
                    candidates.push(Candidate {
                        element,
                        text,
                        text_len,
                        catalog_position: entry.position,
                    });
                }
            }
        }

        candidates
    }
}

/// Trimmed selection, or `""` when nothing is selected.
pub fn selection_text<D: PageDom>(dom: &D) -> String {
    dom.selection_text()
        .map(|s| s.trim().to_string())
        .unwrap_or_default()
}

/// Trimmed body text, or `""` when the page has no body.
pub fn page_text<D: PageDom>(dom: &D) -> String {
    dom.body_text()
        .map(|s| s.trim().to_string())
        .unwrap_or_default()
}

/// Longest candidate; equal lengths keep insertion order (stable sort).
pub fn pick_densest<E>(mut candidates: Vec<Candidate<E>>) -> Option<Candidate<E>> {
    candidates.sort_by(|a, b| b.text_len.cmp(&a.text_len));
    candidates.into_iter().next()
}
