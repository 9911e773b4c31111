//! HTML to text reduction for direct-link discussions.

use scraper::{Html, Selector};

/// All text nodes of the document, concatenated in document order.
pub fn visible_text(document: &Html) -> String {
    document.root_element().text().collect()
}

/// Text of the first `<pre>` element, which holds the product itself.
pub fn first_preformatted(document: &Html) -> Option<String> {
    let selector = Selector::parse("pre").ok()?;
    document
        .select(&selector)
        .next()
        .map(|pre| pre.text().collect())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_visible_text_strips_tags() {
        let doc = Html::parse_document("<html><body><p>LAT...LON</p><b>42127648</b></body></html>");
        let text = visible_text(&doc);
        assert!(text.contains("LAT...LON"));
        assert!(text.contains("42127648"));
        assert!(!text.contains("<b>"));
    }

    #[test]
    fn test_first_preformatted() {
        let doc = Html::parse_document("<pre>first\nblock</pre><pre>second</pre>");
        assert_eq!(first_preformatted(&doc).as_deref(), Some("first\nblock"));
    }

    #[test]
    fn test_no_preformatted() {
        let doc = Html::parse_document("<html><body><p>nothing</p></body></html>");
        assert!(first_preformatted(&doc).is_none());
    }
}
