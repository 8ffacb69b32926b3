//! Section parser for generated website documents.
//!
//! A generated document is markdown-like: each page is introduced by a
//! `## ` heading whose first line is the page name, followed by a fenced
//! ```` ```html ```` code block holding the page content. This crate
//! splits such a document into ordered [`PageSection`]s.

use pageforge_shared::PageSection;
use tracing::debug;

/// Literal heading delimiter that starts a page section.
const SECTION_DELIMITER: &str = "## ";

/// Literal fence opener tagging a page's code block.
const HTML_FENCE: &str = "```html";

/// Closing fence marker.
const FENCE: &str = "```";

/// Split a generated document into named page sections.
///
/// Text before the first `## ` delimiter is preamble and produces no
/// section. Within each chunk, the first line (trimmed) is the section
/// name and the body is searched for a ```` ```html ```` fenced block;
/// chunks without one are silently skipped. Output order equals document
/// order and names are not deduplicated.
///
/// This never fails: malformed chunks are omitted, not reported.
pub fn parse_sections(document: &str) -> Vec<PageSection> {
    let mut sections = Vec::new();

    for chunk in document.split(SECTION_DELIMITER).skip(1) {
        let (first_line, body) = match chunk.split_once('\n') {
            Some((first, rest)) => (first, rest),
            None => (chunk, ""),
        };
        let name = first_line.trim().to_string();

        match extract_html_block(body) {
            Some(content) => sections.push(PageSection { name, content }),
            None => debug!(section = %name, "no html code block, skipping section"),
        }
    }

    sections
}

/// Extract the inner text of the first ```` ```html ```` block in `body`.
///
/// Everything between the opener and the next bare fence is taken as raw
/// code text. That text starts with the tail of the opener line and then
/// one artifact line from the split boundary; both are dropped and the
/// remainder is trimmed. Returns `None` when no opener exists.
fn extract_html_block(body: &str) -> Option<String> {
    let (_, after_opener) = body.split_once(HTML_FENCE)?;
    let raw = after_opener.split(FENCE).next().unwrap_or(after_opener);

    let inner = raw.splitn(3, '\n').nth(2).unwrap_or("");
    Some(inner.trim().to_string())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn two_sections_parse_in_document_order() {
        let doc = "## Home\n```html\n<x>\n<p>hi</p>\n```\n## About\n```html\n<x>\n<p>bye</p>\n```";
        let sections = parse_sections(doc);

        assert_eq!(sections.len(), 2);
        assert_eq!(sections[0].name, "Home");
        assert_eq!(sections[0].content, "<p>hi</p>");
        assert_eq!(sections[1].name, "About");
        assert_eq!(sections[1].content, "<p>bye</p>");
    }

    #[test]
    fn preamble_before_first_heading_is_discarded() {
        let doc = "Here are your pages.\n\n## Home\n```html\n\n<p>hi</p>\n```\n";
        let sections = parse_sections(doc);

        assert_eq!(sections.len(), 1);
        assert_eq!(sections[0].name, "Home");
        assert_eq!(sections[0].content, "<p>hi</p>");
    }

    #[test]
    fn chunk_without_html_fence_is_skipped() {
        let doc = "## Home\n```html\n\n<p>hi</p>\n```\n\
                   ## Notes\nJust some prose, no code here.\n\
                   ## About\n```html\n\n<p>bye</p>\n```";
        let sections = parse_sections(doc);

        assert_eq!(sections.len(), 2);
        assert_eq!(sections[0].name, "Home");
        assert_eq!(sections[1].name, "About");
        assert_eq!(sections[1].content, "<p>bye</p>");
    }

    #[test]
    fn section_name_is_trimmed() {
        let doc = "##   Contact Us  \n```html\n\n<form></form>\n```";
        let sections = parse_sections(doc);

        assert_eq!(sections.len(), 1);
        assert_eq!(sections[0].name, "Contact Us");
    }

    #[test]
    fn unterminated_fence_takes_rest_of_chunk() {
        let doc = "## Home\n```html\n\n<p>open ended</p>\n<footer></footer>";
        let sections = parse_sections(doc);

        assert_eq!(sections.len(), 1);
        assert_eq!(sections[0].content, "<p>open ended</p>\n<footer></footer>");
    }

    #[test]
    fn multiline_content_is_preserved_and_trimmed() {
        let doc = "## Home\n```html\n\n<div>\n  <p>hi</p>\n</div>\n\n```\n";
        let sections = parse_sections(doc);

        assert_eq!(sections[0].content, "<div>\n  <p>hi</p>\n</div>");
    }

    #[test]
    fn duplicate_names_are_kept() {
        let doc = "## Home\n```html\n\n<p>one</p>\n```\n## Home\n```html\n\n<p>two</p>\n```";
        let sections = parse_sections(doc);

        assert_eq!(sections.len(), 2);
        assert_eq!(sections[0].name, "Home");
        assert_eq!(sections[1].name, "Home");
        assert_eq!(sections[1].content, "<p>two</p>");
    }

    #[test]
    fn empty_document_yields_no_sections() {
        assert!(parse_sections("").is_empty());
        assert!(parse_sections("no headings at all").is_empty());
    }

    #[test]
    fn fence_on_heading_line_without_newline_yields_empty_content() {
        // Degenerate but observed shape: opener with nothing after it.
        let doc = "## Home\n```html";
        let sections = parse_sections(doc);

        assert_eq!(sections.len(), 1);
        assert_eq!(sections[0].content, "");
    }

    #[test]
    fn trailing_completion_marker_is_not_a_section() {
        let doc = "## Home\n```html\n\n<p>hi</p>\n```\n\n# All Files Completed\n";
        let sections = parse_sections(doc);

        assert_eq!(sections.len(), 1);
        assert_eq!(sections[0].content, "<p>hi</p>");
    }

    #[test]
    fn parses_generated_site_fixture() {
        let fixture = std::path::Path::new(env!("CARGO_MANIFEST_DIR"))
            .join("../../../fixtures/markdown/generated_site.md");
        let doc = std::fs::read_to_string(fixture).expect("read fixture");
        let sections = parse_sections(&doc);

        assert_eq!(sections.len(), 3);
        assert_eq!(
            sections.iter().map(|s| s.name.as_str()).collect::<Vec<_>>(),
            vec!["Home", "About", "Contact"]
        );
        assert!(sections[0].content.starts_with("<!DOCTYPE html>"));
        assert!(sections[2].content.contains("<form"));
        // Fence markers never leak into content.
        for section in &sections {
            assert!(!section.content.contains("```"));
        }
    }
}
