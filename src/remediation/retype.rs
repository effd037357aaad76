//! Tag-type validation and correction.
//!
//! Each node's expected role is inferred by an ordered chain of [`RoleRule`]s;
//! the first rule with an opinion wins and nodes no rule recognizes are left
//! alone. On a mismatch only the role changes. Children the new role cannot
//! contain are moved up to the nearest ancestor that can, or removed when no
//! ancestor can.

use super::stats::{ReviewCode, ReviewItem, RunLog};
use crate::document::{ContentKind, DocumentModel};
use crate::error::Result;
use crate::structure::{ContentRef, NodeId, StructRole, StructureNode, StructureTree};
use std::collections::HashMap;

/// Title words that mark a node as an image.
const IMAGE_HINTS: &[&str] = &["image", "picture", "photo", "figure"];

/// What a rule can see while inferring a node's role.
pub struct RuleContext<'a> {
    /// Structure tree
    pub tree: &'a StructureTree,
    content_kinds: &'a HashMap<ContentRef, ContentKind>,
}

impl<'a> RuleContext<'a> {
    /// Kinds of the content objects a node references directly.
    pub fn content_kinds(&self, node: &StructureNode) -> Vec<ContentKind> {
        node.associated_content()
            .iter()
            .filter_map(|c| self.content_kinds.get(c).copied())
            .collect()
    }

    /// Whether a node directly references content of `kind`.
    pub fn references(&self, node: &StructureNode, kind: ContentKind) -> bool {
        self.content_kinds(node).contains(&kind)
    }
}

/// One step of role inference.
pub trait RoleRule {
    /// Rule name, for logging.
    fn name(&self) -> &str;

    /// Role the node should have, or `None` when the rule has no evidence.
    fn expected_role(&self, id: NodeId, node: &StructureNode, ctx: &RuleContext<'_>)
        -> Option<StructRole>;
}

/// Image content plus an image-like title means `/Figure`.
#[derive(Debug, Clone, Copy, Default)]
pub struct ImageFigureRule;

impl RoleRule for ImageFigureRule {
    fn name(&self) -> &str {
        "image-figure"
    }

    fn expected_role(
        &self,
        _id: NodeId,
        node: &StructureNode,
        ctx: &RuleContext<'_>,
    ) -> Option<StructRole> {
        let title = node.title.as_deref()?.to_lowercase();
        if ctx.references(node, ContentKind::Image) && IMAGE_HINTS.iter().any(|h| title.contains(h)) {
            Some(StructRole::Figure)
        } else {
            None
        }
    }
}

/// Rows with header cells mean `/Table`.
#[derive(Debug, Clone, Copy, Default)]
pub struct TableStructureRule;

impl RoleRule for TableStructureRule {
    fn name(&self) -> &str {
        "table-structure"
    }

    fn expected_role(
        &self,
        id: NodeId,
        node: &StructureNode,
        ctx: &RuleContext<'_>,
    ) -> Option<StructRole> {
        if node.role.is_table_part() || node.role.is_table_section() {
            return None;
        }
        let has_rows = node
            .children()
            .iter()
            .any(|c| ctx.tree.get(*c).is_some_and(|n| n.role == StructRole::TableRow));
        let has_headers = ctx
            .tree
            .descendants(id)
            .any(|d| ctx.tree.get(d).is_some_and(|n| n.role == StructRole::TableHeaderCell));
        if has_rows && has_headers {
            Some(StructRole::Table)
        } else {
            None
        }
    }
}

/// Form field content means `/Form`. Table cells holding a field keep their
/// role.
#[derive(Debug, Clone, Copy, Default)]
pub struct FormFieldRule;

impl RoleRule for FormFieldRule {
    fn name(&self) -> &str {
        "form-field"
    }

    fn expected_role(
        &self,
        _id: NodeId,
        node: &StructureNode,
        ctx: &RuleContext<'_>,
    ) -> Option<StructRole> {
        if node.role.is_table_part() || node.role.is_table_section() {
            return None;
        }
        ctx.references(node, ContentKind::FormField)
            .then_some(StructRole::Form)
    }
}

/// Validates declared roles against inferred ones and corrects mismatches.
pub struct TagTypeCorrector {
    rules: Vec<Box<dyn RoleRule + Send + Sync>>,
}

impl Default for TagTypeCorrector {
    fn default() -> Self {
        Self::new()
    }
}

impl TagTypeCorrector {
    /// Corrector with the built-in rules: image/figure, table structure, form field.
    pub fn new() -> Self {
        Self {
            rules: vec![
                Box::new(ImageFigureRule),
                Box::new(TableStructureRule),
                Box::new(FormFieldRule),
            ],
        }
    }

    /// Corrector with no rules.
    pub fn empty() -> Self {
        Self { rules: Vec::new() }
    }

    /// Append a rule. It is consulted after every rule already present.
    pub fn with_rule(mut self, rule: impl RoleRule + Send + Sync + 'static) -> Self {
        self.rules.push(Box::new(rule));
        self
    }

    /// Rule names in evaluation order.
    pub fn rule_names(&self) -> Vec<&str> {
        self.rules.iter().map(|r| r.name()).collect()
    }

    /// First opinion of the rule chain for a node.
    pub fn infer(&self, id: NodeId, node: &StructureNode, ctx: &RuleContext<'_>) -> Option<StructRole> {
        self.rules.iter().find_map(|rule| {
            let role = rule.expected_role(id, node, ctx)?;
            log::trace!("Rule {} expects {} for node {}", rule.name(), role, id);
            Some(role)
        })
    }

    /// Validate and correct every node in the document.
    ///
    /// Returns the retyped nodes, in document order.
    pub fn run<D: DocumentModel + ?Sized>(&self, doc: &mut D, log: &mut RunLog) -> Result<Vec<NodeId>> {
        let content_kinds: HashMap<ContentRef, ContentKind> = doc
            .pages()
            .iter()
            .flat_map(|p| p.content_objects.iter())
            .map(|o| (o.content_ref(), o.kind))
            .collect();

        let root = doc.tree().root();
        let order: Vec<NodeId> = doc.tree().preorder().collect();
        let mut retyped = Vec::new();

        for id in order {
            if id == root {
                continue;
            }
            // Nodes removed while settling an earlier retype
            let Some(node) = doc.tree().get(id) else {
                continue;
            };
            if node.role.is_artifact() {
                continue;
            }

            if let Some(missing) = node
                .associated_content()
                .iter()
                .find(|c| !content_kinds.contains_key(c))
            {
                log.unresolved(
                    ReviewItem::new(
                        ReviewCode::DanglingContentReference,
                        format!("{} node references missing content {}", node.role, missing),
                    )
                    .with_location(format!("node {}", id)),
                );
                continue;
            }

            let ctx = RuleContext {
                tree: doc.tree(),
                content_kinds: &content_kinds,
            };
            let Some(expected) = self.infer(id, node, &ctx) else {
                continue;
            };
            if expected == node.role {
                continue;
            }

            let previous = doc.tree_mut().retype(id, expected.clone())?;
            log.stats.tags_retyped += 1;
            log::info!("Retyped node {} from {} to {}", id, previous, expected);

            retyped.push(id);

            settle_orphans(doc.tree_mut(), id, log)?;
        }

        Ok(retyped)
    }
}

/// Move children a retyped node may no longer contain.
///
/// Each orphan goes right after the branch holding `node`, under the nearest
/// ancestor whose role accepts it, keeping the orphans' relative order.
fn settle_orphans(tree: &mut StructureTree, node: NodeId, log: &mut RunLog) -> Result<()> {
    let role = tree.node(node)?.role.clone();
    let orphans: Vec<NodeId> = tree
        .children(node)
        .iter()
        .copied()
        .filter(|c| tree.get(*c).is_some_and(|n| !role.allows_child(&n.role)))
        .collect();
    if orphans.is_empty() {
        return Ok(());
    }

    let ancestors: Vec<NodeId> = tree.ancestors(node).collect();
    // Next insertion index per receiving parent
    let mut next_slot: HashMap<NodeId, usize> = HashMap::new();

    for orphan in orphans {
        tree.detach(orphan)?;
        let orphan_role = tree.node(orphan)?.role.clone();

        let mut branch = node;
        let mut home = None;
        for ancestor in &ancestors {
            if tree.node(*ancestor)?.role.allows_child(&orphan_role) {
                home = Some((*ancestor, branch));
                break;
            }
            branch = *ancestor;
        }

        match home {
            Some((parent, branch)) => {
                let slot = match next_slot.get(&parent) {
                    Some(slot) => *slot,
                    None => tree.position_in_parent(branch).map_or(0, |p| p + 1),
                };
                tree.attach(parent, slot, orphan)?;
                next_slot.insert(parent, slot + 1);
                log.stats.nodes_rehomed += 1;
                log::debug!("Moved {} node {} under node {}", orphan_role, orphan, parent);
            },
            None => {
                let removed = tree.remove_subtree(orphan)?;
                log.stats.nodes_removed += removed;
                log::info!(
                    "Removed {} node {} ({} node(s)): no ancestor of node {} may contain it",
                    orphan_role,
                    orphan,
                    removed,
                    node
                );
            },
        }
    }

    Ok(())
}
