// This module is only used in tests.

use kuchikiki::NodeRef;

use super::*;

/// Parse string into Kuchiki node.
pub fn parse_string(html_str: &str) -> NodeRef {
    parse_bytes(html_str.as_bytes())
}

/// Round-trip an HTML fragment through the parser, returning what it serializes to
/// once placed inside a `<div>`.
pub fn normalize_fragment(html_str: &str) -> String {
    let root = parse_string(&format!(r#"<div id="normalize-fragment">{html_str}</div>"#));

    root.first("#normalize-fragment")
        .map(|node| node.inner_html())
        .unwrap_or_default()
}
