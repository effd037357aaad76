//! Descriptions for links with generic text.

use super::stats::RunLog;
use crate::document::{ContentKind, DocumentModel};
use crate::error::Result;
use crate::structure::traversal::nodes_with_role;
use crate::structure::StructRole;
use lazy_static::lazy_static;
use regex::Regex;

/// Link texts that say nothing about the target.
const GENERIC_LINK_TEXT: &[&str] = &[
    "click here",
    "read more",
    "more",
    "link",
    "here",
    "this",
    "page",
    "website",
    "download",
    "view",
];

lazy_static! {
    static ref URI_PREFIX: Regex = Regex::new(r"(?i)^[a-z][a-z0-9+.\-]*://(www\.)?").unwrap();
}

/// Whether link text fails to describe its target. Missing text is generic.
pub fn is_generic_link_text(text: Option<&str>) -> bool {
    let Some(text) = text else {
        return true;
    };
    let normalized = text.trim().to_lowercase();
    normalized.chars().count() < 3 || GENERIC_LINK_TEXT.contains(&normalized.as_str())
}

/// "Link to example.com" for `https://www.example.com/path`; `-` and `_` in the
/// host become spaces.
pub fn describe_uri(uri: &str) -> Option<String> {
    let rest = URI_PREFIX.replace(uri.trim(), "");
    let host = rest.split(['/', '?', '#']).next().unwrap_or_default();
    if host.is_empty() {
        return None;
    }
    Some(format!("Link to {}", host.replace(['-', '_'], " ")))
}

/// Give every generic `/Link` a description derived from its target.
pub fn describe_links<D: DocumentModel + ?Sized>(doc: &mut D, log: &mut RunLog) -> Result<()> {
    let links = nodes_with_role(doc.tree(), &StructRole::Link);

    for link in links {
        let node = doc.tree().node(link)?;
        let text = node.alternate_text.as_deref().or(node.actual_text.as_deref());
        if !is_generic_link_text(text) {
            continue;
        }

        let description = node
            .associated_content()
            .iter()
            .filter_map(|c| doc.content_object(c))
            .filter(|o| o.kind == ContentKind::Annotation)
            .find_map(|o| o.uri.as_deref().and_then(describe_uri));
        let Some(description) = description else {
            continue;
        };

        log::debug!("Link {}: {:?} -> {:?}", link, text, description);
        doc.tree_mut().node_mut(link)?.alternate_text = Some(description);
        log.stats.links_described += 1;
    }

    Ok(())
}
