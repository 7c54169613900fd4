use crate::pca::PrincipalAxis;

/// How a node separates its two subtrees.
#[derive(Clone, Debug, PartialEq)]
pub enum SplitRule {
    /// Left holds points with `x[split_dim] <= data[split_dim]`, right holds `>=`.
    Axis,
    /// Left holds points projecting at or below `threshold` on `axis`, right at or above.
    /// `threshold` is the projection of the node's own point.
    Principal { axis: PrincipalAxis, threshold: f64 },
}

/// A tree node. Always holds exactly one point and owns its subtrees.
#[derive(Clone, Debug, PartialEq)]
pub struct Node {
    pub(crate) data: Vec<f64>,
    pub(crate) index: usize,
    pub(crate) split_dim: usize,
    pub(crate) rule: SplitRule,
    pub(crate) left: Option<Box<Node>>,
    pub(crate) right: Option<Box<Node>>,
}

impl Node {
    pub(crate) fn leaf(data: Vec<f64>, index: usize, split_dim: usize) -> Self {
        Node {
            data,
            index,
            split_dim,
            rule: SplitRule::Axis,
            left: None,
            right: None,
        }
    }

    pub fn data(&self) -> &[f64] {
        &self.data
    }

    /// Position of the point in the construction input.
    pub fn index(&self) -> usize {
        self.index
    }

    pub fn split_dim(&self) -> usize {
        self.split_dim
    }

    pub fn rule(&self) -> &SplitRule {
        &self.rule
    }

    pub fn left(&self) -> Option<&Node> {
        self.left.as_deref()
    }

    pub fn right(&self) -> Option<&Node> {
        self.right.as_deref()
    }

    pub fn is_leaf(&self) -> bool {
        self.left.is_none() && self.right.is_none()
    }

    /// Number of levels below and including this node.
    pub fn depth(&self) -> usize {
        1 + self
            .left()
            .map_or(0, Node::depth)
            .max(self.right().map_or(0, Node::depth))
    }
}

/// In-order traversal: left subtree, node, right subtree.
pub struct InOrder<'a> {
    stack: Vec<&'a Node>,
    current: Option<&'a Node>,
}

impl<'a> InOrder<'a> {
    pub(crate) fn new(root: Option<&'a Node>) -> Self {
        InOrder {
            stack: Vec::new(),
            current: root,
        }
    }
}

impl<'a> Iterator for InOrder<'a> {
    type Item = &'a Node;

    fn next(&mut self) -> Option<Self::Item> {
        while let Some(node) = self.current {
            self.stack.push(node);
            self.current = node.left();
        }
        let node = self.stack.pop()?;
        self.current = node.right();
        Some(node)
    }
}
