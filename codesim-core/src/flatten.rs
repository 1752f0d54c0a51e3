use std::collections::VecDeque;

use crate::node::{NormalizedTree, SyntaxNode};

/// Order in which a tree is linearized into labels.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, serde::Deserialize)]
#[serde(rename_all = "kebab-case")]
#[cfg_attr(feature = "cli", derive(clap::ValueEnum))]
pub enum Traversal {
    /// Visit a node, then its children left to right.
    #[default]
    PreOrder,
    /// Visit level by level, left to right within a level.
    BreadthFirst,
}

/// The node kinds of one tree, in traversal order.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct LabelSequence {
    labels: Vec<&'static str>,
}

impl LabelSequence {
    #[must_use]
    pub fn new(labels: Vec<&'static str>) -> Self {
        Self { labels }
    }

    #[must_use]
    pub fn len(&self) -> usize {
        self.labels.len()
    }

    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.labels.is_empty()
    }

    #[must_use]
    pub fn labels(&self) -> &[&'static str] {
        &self.labels
    }
}

/// Flatten a normalized tree, visiting every retained node exactly once.
#[must_use]
pub fn flatten(tree: &NormalizedTree, traversal: Traversal) -> LabelSequence {
    let Some(root) = &tree.root else {
        return LabelSequence::default();
    };
    let mut labels = Vec::with_capacity(tree.node_count());
    match traversal {
        Traversal::PreOrder => pre_order(root, &mut labels),
        Traversal::BreadthFirst => breadth_first(root, &mut labels),
    }
    LabelSequence { labels }
}

fn pre_order(root: &SyntaxNode, labels: &mut Vec<&'static str>) {
    let mut stack = vec![root];
    while let Some(node) = stack.pop() {
        labels.push(node.kind);
        stack.extend(node.children.iter().rev());
    }
}

fn breadth_first(root: &SyntaxNode, labels: &mut Vec<&'static str>) {
    let mut queue = VecDeque::from([root]);
    while let Some(node) = queue.pop_front() {
        labels.push(node.kind);
        queue.extend(node.children.iter());
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn sample() -> NormalizedTree {
        // module
        // ├── function_definition
        // │   ├── parameters
        // │   └── block
        // └── expression_statement
        //     └── call
        NormalizedTree {
            root: Some(SyntaxNode::with_children(
                "module",
                vec![
                    SyntaxNode::with_children(
                        "function_definition",
                        vec![
                            SyntaxNode::leaf("parameters"),
                            SyntaxNode::leaf("block"),
                        ],
                    ),
                    SyntaxNode::with_children(
                        "expression_statement",
                        vec![SyntaxNode::leaf("call")],
                    ),
                ],
            )),
        }
    }

    #[test]
    fn pre_order_visits_node_then_children() {
        let seq = flatten(&sample(), Traversal::PreOrder);
        assert_eq!(
            seq.labels(),
            &[
                "module",
                "function_definition",
                "parameters",
                "block",
                "expression_statement",
                "call",
            ]
        );
    }

    #[test]
    fn breadth_first_visits_level_by_level() {
        let seq = flatten(&sample(), Traversal::BreadthFirst);
        assert_eq!(
            seq.labels(),
            &[
                "module",
                "function_definition",
                "expression_statement",
                "parameters",
                "block",
                "call",
            ]
        );
    }

    #[test]
    fn every_node_visited_once() {
        let tree = sample();
        for traversal in [Traversal::PreOrder, Traversal::BreadthFirst] {
            assert_eq!(flatten(&tree, traversal).len(), tree.node_count());
        }
    }

    #[test]
    fn deep_chain_flattens_in_both_orders() {
        let tree = NormalizedTree {
            root: Some(crate::node::tests::deep_chain(200_000)),
        };
        for traversal in [Traversal::PreOrder, Traversal::BreadthFirst] {
            let seq = flatten(&tree, traversal);
            assert_eq!(seq.len(), 200_001);
            assert_eq!(seq.labels()[0], "binary_operator");
            assert_eq!(seq.labels()[200_000], "integer");
        }
    }

    #[test]
    fn empty_tree_flattens_to_empty_sequence() {
        let seq = flatten(&NormalizedTree::empty(), Traversal::PreOrder);
        assert!(seq.is_empty());
    }

    #[test]
    fn flatten_is_deterministic() {
        let tree = sample();
        assert_eq!(
            flatten(&tree, Traversal::PreOrder),
            flatten(&tree, Traversal::PreOrder)
        );
    }
}
