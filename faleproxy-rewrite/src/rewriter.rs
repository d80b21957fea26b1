//! Selective rewriting of a parsed document.
//!
//! Two passes share one [`Substitution`]:
//!
//! 1. every text node under `<body>`, in document order;
//! 2. the title, handled as one string because `<title>` normally lives in
//!    `<head>`, outside the body walk.
//!
//! Attribute values, tag names, comments and the doctype are never looked
//! at. Text nodes without a whole-word match are not written back at all.

use std::borrow::Cow;

use ego_tree::NodeId;

use crate::substitution::Substitution;
use crate::tree::{DocumentTree, NodeKind};

/// Serialized output of one rewrite.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RewriteResult {
    pub html: String,
    /// Title after substitution; empty when the document has none.
    pub title: String,
    /// Spans replaced across body text and title.
    pub replacements: usize,
}

/// Rewrite `tree` in place and serialize it.
pub fn rewrite(mut tree: DocumentTree, substitution: &Substitution) -> RewriteResult {
    let title_node = tree.find_element("title");
    let original_title = title_node
        .map(|id| tree.text_content(id))
        .unwrap_or_default();

    let mut replacements = 0usize;
    let mut text_nodes = 0usize;

    if let Some(body) = tree.find_element("body") {
        let targets: Vec<NodeId> = tree
            .walk(body)
            .filter(|(_, kind)| *kind == NodeKind::Text)
            .map(|(id, _)| id)
            .filter(|id| title_node.is_none() || tree.parent(*id) != title_node)
            .collect();
        text_nodes = targets.len();

        for id in targets {
            let changed = match tree.text(id).map(|text| substitution.apply_counted(text)) {
                Some((Cow::Owned(rewritten), count)) => Some((rewritten, count)),
                _ => None,
            };
            if let Some((rewritten, count)) = changed {
                tree.set_text(id, rewritten);
                replacements += count;
            }
        }
    }

    let (title, title_count) = substitution.apply_counted(&original_title);
    let title = title.into_owned();
    if let Some(id) = title_node {
        if title_count > 0 {
            tree.replace_children_with_text(id, title.clone());
            replacements += title_count;
        }
    }

    tracing::debug!(
        text_nodes,
        replacements,
        title_changed = title_count > 0,
        parse_errors = tree.parse_errors(),
        source = substitution.source(),
        "rewrite.done"
    );

    RewriteResult {
        html: tree.serialize(),
        title,
        replacements,
    }
}

/// Parse `source` and rewrite it.
pub fn rewrite_html(source: &str, substitution: &Substitution) -> RewriteResult {
    rewrite(DocumentTree::parse(source), substitution)
}

/// One-shot entry point taking the term pair directly.
///
/// Never fails: an empty source term leaves the document unsubstituted.
///
/// ```
/// use faleproxy_rewrite::rewrite_document;
///
/// let out = rewrite_document(
///     "<title>Yale</title><p>About YALE</p>",
///     "Yale",
///     "Fale",
/// );
/// assert_eq!(out.title, "Fale");
/// assert!(out.html.contains("<p>About FALE</p>"));
/// ```
pub fn rewrite_document(source_html: &str, source_term: &str, replacement_term: &str) -> RewriteResult {
    match Substitution::new(source_term, replacement_term) {
        Ok(substitution) => rewrite_html(source_html, &substitution),
        Err(err) => {
            tracing::debug!(%err, "rewrite.skipped");
            let tree = DocumentTree::parse(source_html);
            let title = tree
                .find_element("title")
                .map(|id| tree.text_content(id))
                .unwrap_or_default();
            RewriteResult {
                html: tree.serialize(),
                title,
                replacements: 0,
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn yale() -> Substitution {
        Substitution::new("Yale", "Fale").unwrap()
    }

    #[test]
    fn rewrites_text_but_not_attributes() {
        let out = rewrite_html(
            r#"<body><a href="https://www.yale.edu/about" title="Yale">About Yale</a><img alt="yale"></body>"#,
            &yale(),
        );
        assert!(out.html.contains(r#"<a href="https://www.yale.edu/about" title="Yale">About Fale</a>"#));
        assert!(out.html.contains(r#"<img alt="yale">"#));
        assert_eq!(out.replacements, 1);
    }

    #[test]
    fn text_directly_under_body_is_rewritten() {
        let out = rewrite_html("<body>Yale <b>yale</b> YALE</body>", &yale());
        assert!(out.html.contains("<body>Fale <b>fale</b> FALE</body>"));
        assert_eq!(out.replacements, 3);
    }

    #[test]
    fn comments_are_left_alone() {
        let out = rewrite_html("<body><!-- Yale --><p>Yale</p></body>", &yale());
        assert!(out.html.contains("<!-- Yale --><p>Fale</p>"));
    }

    #[test]
    fn head_text_other_than_title_is_not_rewritten() {
        let out = rewrite_html(
            "<head><title>Yale</title><style>.yale { color: blue }</style></head><body></body>",
            &yale(),
        );
        assert_eq!(out.title, "Fale");
        assert!(out.html.contains("<style>.yale { color: blue }</style>"));
    }

    #[test]
    fn script_text_under_body_follows_default_traversal() {
        let out = rewrite_html("<body><script>var yale = 1;</script></body>", &yale());
        assert!(out.html.contains("<script>var fale = 1;</script>"));
    }

    #[test]
    fn title_inside_body_is_rewritten_once() {
        // The replacement contains the source term, so a second pass would show.
        let sub = Substitution::new("yale", "yale yale").unwrap();
        let out = rewrite_html("<body><title>yale</title><p>yale</p></body>", &sub);
        assert_eq!(out.title, "yale yale");
        assert!(out.html.contains("<title>yale yale</title>"));
        assert!(out.html.contains("<p>yale yale</p>"));
        assert_eq!(out.replacements, 2);
    }

    #[test]
    fn missing_title_yields_empty_string() {
        let out = rewrite_html("<p>Yale</p>", &yale());
        assert_eq!(out.title, "");
        assert!(!out.html.contains("<title>"));
    }

    #[test]
    fn entities_survive_rewriting() {
        let out = rewrite_html("<p>Yale &amp; Harvard &lt;3</p>", &yale());
        assert!(out.html.contains("<p>Fale &amp; Harvard &lt;3</p>"));
    }

    #[test]
    fn empty_source_term_passes_through() {
        let out = rewrite_document("<title>Yale</title><p>Yale</p>", "", "Fale");
        assert_eq!(out.title, "Yale");
        assert!(out.html.contains("<p>Yale</p>"));
        assert_eq!(out.replacements, 0);
    }

    #[test]
    fn empty_input_is_total() {
        let out = rewrite_html("", &yale());
        assert_eq!(out.title, "");
        assert_eq!(out.html, "<html><head></head><body></body></html>");
        assert_eq!(out.replacements, 0);
    }
}
