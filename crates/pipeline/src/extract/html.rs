//! Markup extraction strategy.
//!
//! Parses a markup document and collects its human-visible text nodes,
//! joined by newlines. Tags, scripts, and styles are discarded.

use scraper::Html;

/// Element subtrees whose text is never user-visible.
const SKIPPED_ELEMENTS: [&str; 5] = ["script", "style", "noscript", "head", "template"];

/// Extract the visible text of a markup document.
///
/// The parser is error-tolerant, so malformed markup still yields whatever
/// text it contains. Whitespace-only nodes are dropped.
pub fn visible_text(html: &str) -> String {
    let document = Html::parse_document(html);
    let mut lines = Vec::new();

    for node in document.tree.root().descendants() {
        let Some(text) = node.value().as_text() else {
            continue;
        };

        let hidden = node.ancestors().any(|ancestor| {
            ancestor
                .value()
                .as_element()
                .is_some_and(|element| SKIPPED_ELEMENTS.contains(&element.name()))
        });
        if hidden {
            continue;
        }

        let trimmed = text.trim();
        if !trimmed.is_empty() {
            lines.push(trimmed.to_string());
        }
    }

    lines.join("\n")
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_extracts_visible_text() {
        let html = r#"
            <html><head><title>Rates</title></head>
            <body>
                <h1>Capital gains</h1>
                <p>The long-term rate is <b>15%</b> for most filers.</p>
            </body></html>
        "#;

        let text = visible_text(html);
        assert!(text.contains("Capital gains"));
        assert!(text.contains("15%"));
        assert!(!text.contains("<p>"));
        // Head content is not user-visible.
        assert!(!text.contains("Rates"));
    }

    #[test]
    fn test_scripts_and_styles_are_discarded() {
        let html = r#"
            <body>
                <script>var hidden = "tracker";</script>
                <style>.cls { color: red; }</style>
                <p>visible</p>
            </body>
        "#;

        let text = visible_text(html);
        assert_eq!(text, "visible");
    }

    #[test]
    fn test_text_nodes_joined_by_newlines() {
        let html = "<body><p>first</p><p>second</p></body>";
        assert_eq!(visible_text(html), "first\nsecond");
    }

    #[test]
    fn test_malformed_markup_still_yields_text() {
        let html = "<p>unclosed <div>nested";
        let text = visible_text(html);
        assert!(text.contains("unclosed"));
        assert!(text.contains("nested"));
    }

    #[test]
    fn test_empty_document() {
        assert_eq!(visible_text(""), "");
    }
}
