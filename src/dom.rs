//! DOM read interface and its parsed-HTML implementation
//!
//! The extraction engine only ever reads a page through [`PageDom`]: the
//! current selection, the body text, CSS lookups in document order, and the
//! visible text of a single element.

use scraper::node::Node;
use scraper::{ElementRef, Html, Selector};

use crate::catalog::CatalogEntry;

/// Read-only view of a page for the duration of one extraction.
pub trait PageDom {
    /// Non-owning handle to an element of this page.
    type Element<'a>: Copy
    where
        Self: 'a;

    /// Text currently selected on the page, if any.
    fn selection_text(&self) -> Option<String>;

    /// Rendered text of the document body, `None` when there is no body.
    fn body_text(&self) -> Option<String>;

    /// Elements matching a catalog entry, in document order.
    fn query_all<'a>(&'a self, entry: &CatalogEntry) -> Vec<Self::Element<'a>>;

    /// Trimmed visible text of one element.
    fn element_text<'a>(&'a self, element: Self::Element<'a>) -> String;
}

/// A parsed HTML document plus the user's selection, if the host captured one.
pub struct HtmlPage {
    document: Html,
    selection: Option<String>,
}

impl HtmlPage {
    pub fn parse(html: &str) -> Self {
        Self {
            document: Html::parse_document(html),
            selection: None,
        }
    }

    /// Attach the selection the host read from the live page.
    pub fn with_selection(mut self, selection: Option<String>) -> Self {
        self.selection = selection;
        self
    }

    pub fn document(&self) -> &Html {
        &self.document
    }
}

impl PageDom for HtmlPage {
    type Element<'a> = ElementRef<'a>;

    fn selection_text(&self) -> Option<String> {
        self.selection.clone()
    }

    fn body_text(&self) -> Option<String> {
        let selector = Selector::parse("body").ok()?;
        let body = self.document.select(&selector).next()?;
        Some(visible_text(body))
    }

    fn query_all<'a>(&'a self, entry: &CatalogEntry) -> Vec<ElementRef<'a>> {
        self.document.select(entry.selector()).collect()
    }

    fn element_text<'a>(&'a self, element: ElementRef<'a>) -> String {
        visible_text(element)
    }
}

/// Elements whose content never renders as text.
const NON_RENDERED: &[&str] = &[
    "script", "style", "noscript", "template", "head", "iframe", "svg", "object", "canvas",
];

/// Elements that start on a new line when rendered.
const BLOCK_ELEMENTS: &[&str] = &[
    "address", "article", "aside", "blockquote", "dd", "details", "dialog", "div", "dl", "dt",
    "fieldset", "figcaption", "figure", "footer", "form", "h1", "h2", "h3", "h4", "h5", "h6",
    "header", "hr", "li", "main", "nav", "ol", "p", "pre", "section", "summary", "table", "tr",
    "ul", "caption", "thead", "tbody",
];

/// Approximate the browser's rendered text for an element.
///
/// Skips non-rendered and hidden subtrees, breaks lines at block elements
/// and `<br>`, collapses inline whitespace and drops blank lines.
pub fn visible_text(element: ElementRef<'_>) -> String {
    if is_hidden(element) {
        return String::new();
    }

    let mut raw = String::new();
    collect_visible(element, &mut raw);

    raw.lines()
        .map(str::trim)
        .filter(|line| !line.is_empty())
        .collect::<Vec<_>>()
        .join("\n")
}

fn collect_visible(element: ElementRef<'_>, out: &mut String) {
    for child in element.children() {
        match child.value() {
            Node::Text(text) => push_collapsed(out, text),
            Node::Element(el) => {
                let Some(child_el) = ElementRef::wrap(child) else {
                    continue;
                };
                if is_hidden(child_el) {
                    continue;
                }

                let name = el.name();
                if name == "br" {
                    out.push('\n');
                    continue;
                }
                if name == "td" || name == "th" {
                    push_collapsed(out, " ");
                }

                let block = BLOCK_ELEMENTS.contains(&name);
                if block {
                    out.push('\n');
                }
                collect_visible(child_el, out);
                if block {
                    out.push('\n');
                }
            }
            _ => {}
        }
    }
}

fn push_collapsed(out: &mut String, text: &str) {
    for c in text.chars() {
        if c.is_whitespace() {
            if !out.is_empty() && !out.ends_with(' ') && !out.ends_with('\n') {
                out.push(' ');
            }
        } else {
            out.push(c);
        }
    }
}

fn is_hidden(element: ElementRef<'_>) -> bool {
    let el = element.value();
    if NON_RENDERED.contains(&el.name()) || el.attr("hidden").is_some() {
        return true;
    }

    match el.attr("style") {
        Some(style) => {
            let style: String = style
                .chars()
                .filter(|c| !c.is_whitespace())
                .collect::<String>()
                .to_ascii_lowercase();
            style.contains("display:none") || style.contains("visibility:hidden")
        }
        None => false,
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_visible_text_skips_scripts_and_hidden() {
        let html = r#"
        <html>
        <head><title>Ignored title</title><style>.x { color: red }</style></head>
        <body>
            <h1>Data Engineer</h1>
            <script>var tracking = "nope";</script>
            <p>Build   pipelines
               with us.</p>
            <div hidden>secret</div>
            <span style="display: none">invisible</span>
            <noscript>enable js</noscript>
        </body>
        </html>
        "#;

        let page = HtmlPage::parse(html);
        let body = page.body_text().unwrap();
        assert_eq!(body, "Data Engineer\nBuild pipelines with us.");
    }

    #[test]
    fn test_visible_text_line_breaks() {
        let html = r#"<body>
            <ul><li>Rust</li><li>SQL</li></ul>Remote<br>Full-time <b>now</b>
        </body>"#;

        let page = HtmlPage::parse(html);
        assert_eq!(page.body_text().unwrap(), "Rust\nSQL\nRemote\nFull-time now");
    }

    #[test]
    fn test_query_all_in_document_order() {
        let html = r#"
        <body>
            <main><p>first</p></main>
            <main><p>second</p></main>
        </body>
        "#;

        let page = HtmlPage::parse(html);
        let catalog = crate::catalog::SelectorCatalog::from_patterns(["main"]).unwrap();
        let texts: Vec<String> = page
            .query_all(&catalog.entries()[0])
            .into_iter()
            .map(|el| page.element_text(el))
            .collect();
        assert_eq!(texts, vec!["first", "second"]);
    }

    #[test]
    fn test_selection_passthrough() {
        let page = HtmlPage::parse("<body>x</body>").with_selection(Some(" picked ".into()));
        assert_eq!(page.selection_text().as_deref(), Some(" picked "));
        assert_eq!(HtmlPage::parse("<body></body>").selection_text(), None);
    }
}
