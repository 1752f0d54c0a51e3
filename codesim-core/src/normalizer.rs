use crate::node::{NormalizedTree, SyntaxNode};

/// How terminal tokens are treated before comparison.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, serde::Deserialize)]
#[serde(rename_all = "kebab-case")]
#[cfg_attr(feature = "cli", derive(clap::ValueEnum))]
pub enum NormalizationPolicy {
    /// Remove every node that has no children in the parsed tree
    /// (identifiers, literals, tokens).
    #[default]
    Prune,
    /// Compare the full tree, terminal tokens included.
    Keep,
}

/// Normalize a parsed tree according to `policy`.
#[must_use]
pub fn normalize(root: SyntaxNode, policy: NormalizationPolicy) -> NormalizedTree {
    match policy {
        NormalizationPolicy::Prune => prune_terminals(root),
        NormalizationPolicy::Keep => NormalizedTree { root: Some(root) },
    }
}

/// Remove terminal nodes in a single pass.
///
/// A node is removed iff it had no children in the input tree. Internal nodes
/// left childless by the removal are kept; the pass does not cascade upward.
/// Surviving siblings keep their relative order.
#[must_use]
pub fn prune_terminals(mut root: SyntaxNode) -> NormalizedTree {
    if root.is_terminal() {
        return NormalizedTree::empty();
    }
    {
        // Parents are visited before their children, so every terminal check
        // sees the child as it was parsed.
        let mut stack = vec![&mut root];
        while let Some(node) = stack.pop() {
            node.children.retain(|child| !child.is_terminal());
            stack.extend(node.children.iter_mut());
        }
    }
    NormalizedTree { root: Some(root) }
}
