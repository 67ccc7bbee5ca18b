use std::cmp::Ordering;
use std::collections::VecDeque;
use std::fmt;
use std::iter::FusedIterator;

use log::{debug, log_enabled, Level};
use thiserror::Error;

use crate::compare::Comparator;
use crate::node::{Color, NIL};
use crate::tree::RbTree;

/// A broken red-black invariant, as reported by [`RbTree::validate`].
#[derive(Debug, Clone, Copy, PartialEq, Eq, Error)]
pub enum Violation {
    /// A payload sits on the wrong side of one of its ancestors.
    #[error("BST property violated at slot {slot}")]
    BstOrder { slot: usize },

    /// A red node has a red child.
    #[error("red node at slot {slot} has a red child")]
    RedRed { slot: usize },

    /// The two subtrees of a node have different black heights.
    #[error("black-height mismatch at slot {slot}: left {left}, right {right}")]
    BlackHeight { slot: usize, left: usize, right: usize },

    /// The sentinel is not black.
    #[error("nil sentinel is not black")]
    SentinelColor,

    /// The root is not black.
    #[error("root at slot {slot} is not black")]
    RootColor { slot: usize },

    /// A parent link disagrees with its child link, or a link reaches an empty slot.
    #[error("broken link at slot {slot}")]
    Topology { slot: usize },
}

impl Violation {
    /// A stable numeric status: `1` for BST order, `2` for red-red, `3` for black height, and
    /// negative values for damage to the tree frame itself.
    pub fn code(&self) -> i32 {
        match self {
            Violation::BstOrder { .. } => 1,
            Violation::RedRed { .. } => 2,
            Violation::BlackHeight { .. } => 3,
            Violation::Topology { .. } => -1,
            Violation::SentinelColor => -2,
            Violation::RootColor { .. } => -4,
        }
    }
}

impl<T, C: Comparator<T>> RbTree<T, C> {
    /// Checks every red-black invariant and returns the black height of the tree, counting both
    /// the root and the sentinel. An empty tree is valid with black height 1.
    ///
    /// This walks the whole tree and is meant for tests and diagnostics; no other operation
    /// checks invariants.
    ///
    /// # Examples
    ///
    /// ```
    /// use ordered_tree::RbTree;
    ///
    /// let mut tree = RbTree::natural();
    /// assert_eq!(tree.validate(), Ok(1));
    /// for k in 0..100 {
    ///     tree.insert(k).unwrap();
    /// }
    /// assert!(tree.validate().is_ok());
    /// ```
    pub fn validate(&self) -> Result<usize, Violation> {
        if self.arena[NIL].color != Color::Black {
            return Err(Violation::SentinelColor);
        }
        if self.root != NIL && self.arena[self.root].color != Color::Black {
            return Err(Violation::RootColor { slot: self.root });
        }
        self.check_subtree(self.root, NIL, None, None)
    }

    fn check_subtree(
        &self,
        slot: usize,
        parent: usize,
        low: Option<&T>,
        high: Option<&T>,
    ) -> Result<usize, Violation> {
        if slot == NIL {
            return Ok(1);
        }

        let node = &self.arena[slot];
        let data = match node.data.as_ref() {
            Some(data) if node.parent == parent => data,
            _ => return Err(Violation::Topology { slot }),
        };

        if node.color == Color::Red
            && (self.arena.is_red(node.left) || self.arena.is_red(node.right))
        {
            return Err(Violation::RedRed { slot });
        }

        let below_low = low.map_or(false, |low| self.cmp.compare(data, low) == Ordering::Less);
        let above_high =
            high.map_or(false, |high| self.cmp.compare(data, high) == Ordering::Greater);
        if below_low || above_high {
            return Err(Violation::BstOrder { slot });
        }

        let left = self.check_subtree(node.left, slot, low, Some(data))?;
        let right = self.check_subtree(node.right, slot, Some(data), high)?;
        if left != right {
            return Err(Violation::BlackHeight { slot, left, right });
        }

        Ok(left + usize::from(node.color == Color::Black))
    }
}

/// Renders the shape of a tree, one node per line, with each node's color.
///
/// ```text
/// └── 20 (B)
///     ├── 10 (R)
///     │   ├── 5 (B)
///     │   └── 15 (B)
///     └── 30 (B)
/// ```
pub struct TreeDump<'a, T, C> {
    tree: &'a RbTree<T, C>,
}

impl<T: fmt::Debug, C> TreeDump<'_, T, C> {
    fn write_node(
        &self,
        f: &mut fmt::Formatter<'_>,
        slot: usize,
        prefix: &mut String,
        is_left: bool,
    ) -> fmt::Result {
        if slot == NIL {
            return Ok(());
        }
        let node = &self.tree.arena[slot];
        writeln!(
            f,
            "{}{}{:?} ({})",
            prefix,
            if is_left { "├── " } else { "└── " },
            self.tree.arena.payload(slot),
            node.color.tag()
        )?;

        let len = prefix.len();
        prefix.push_str(if is_left { "│   " } else { "    " });
        self.write_node(f, node.left, prefix, true)?;
        self.write_node(f, node.right, prefix, false)?;
        prefix.truncate(len);
        Ok(())
    }
}

impl<T: fmt::Debug, C> fmt::Display for TreeDump<'_, T, C> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        if self.tree.root == NIL {
            return writeln!(f, "<empty tree>");
        }
        self.write_node(f, self.tree.root, &mut String::new(), false)
    }
}

/// A breadth-first walk over the nodes of an [`RbTree`], yielding each payload with its color.
pub struct LevelOrder<'a, T, C> {
    tree: &'a RbTree<T, C>,
    queue: VecDeque<usize>,
}

impl<'a, T, C> Iterator for LevelOrder<'a, T, C> {
    type Item = (&'a T, Color);

    fn next(&mut self) -> Option<(&'a T, Color)> {
        let slot = self.queue.pop_front()?;
        let node = &self.tree.arena[slot];
        for child in [node.left, node.right] {
            if child != NIL {
                self.queue.push_back(child);
            }
        }
        Some((self.tree.arena.payload(slot), node.color))
    }
}

impl<T, C> FusedIterator for LevelOrder<'_, T, C> {}

impl<T, C> RbTree<T, C> {
    /// A displayable view of the tree's shape.
    ///
    /// # Examples
    ///
    /// ```
    /// use ordered_tree::RbTree;
    ///
    /// let mut tree = RbTree::natural();
    /// for k in [2, 1, 3] {
    ///     tree.insert(k).unwrap();
    /// }
    /// assert_eq!(tree.structure().to_string(), "└── 2 (B)\n    ├── 1 (R)\n    └── 3 (R)\n");
    /// ```
    pub fn structure(&self) -> TreeDump<'_, T, C> {
        TreeDump { tree: self }
    }

    /// Walks the nodes level by level, starting at the root.
    pub fn level_order(&self) -> LevelOrder<'_, T, C> {
        let mut queue = VecDeque::new();
        if self.root != NIL {
            queue.push_back(self.root);
        }
        LevelOrder { tree: self, queue }
    }

    /// Writes the tree's shape to the log at debug level.
    pub fn log_structure(&self)
    where
        T: fmt::Debug,
    {
        if log_enabled!(Level::Debug) {
            debug!("tree of {} nodes:\n{}", self.length, self.structure());
        }
    }
}

#[cfg(test)]
mod tests {
    use super::Violation;
    use crate::node::{Color, NIL};
    use crate::RbTree;

    fn tree_of(keys: &[i32]) -> RbTree<i32> {
        let mut tree = RbTree::natural();
        for &k in keys {
            tree.insert(k).unwrap();
        }
        tree
    }

    #[test]
    fn detects_red_red() {
        let mut tree = tree_of(&[2, 1, 3, 4]);
        assert!(tree.validate().is_ok());
        let three = tree.search_slot(&3);
        tree.arena[three].color = Color::Red;
        assert_eq!(tree.validate(), Err(Violation::RedRed { slot: three }));
        assert_eq!(tree.validate().unwrap_err().code(), 2);
    }

    #[test]
    fn detects_black_height_mismatch() {
        let mut tree = tree_of(&[2, 1, 3]);
        let one = tree.search_slot(&1);
        tree.arena[one].color = Color::Black;
        let err = tree.validate().unwrap_err();
        assert_eq!(err, Violation::BlackHeight { slot: tree.root, left: 2, right: 1 });
        assert_eq!(err.code(), 3);
    }

    #[test]
    fn detects_swapped_children() {
        let mut tree = tree_of(&[2, 1, 3]);
        let (l, r) = (tree.search_slot(&1), tree.search_slot(&3));
        let low = tree.arena[l].data.take();
        let high = std::mem::replace(&mut tree.arena[r].data, low);
        tree.arena[l].data = high;
        assert_eq!(tree.validate(), Err(Violation::BstOrder { slot: l }));
    }

    #[test]
    fn detects_order_violation_below_a_grandparent() {
        // 2(1, 4(3, 6(5, 7))): 3 sits in the right subtree of 2.
        let mut tree = tree_of(&[1, 2, 3, 4, 5, 6, 7]);
        let three = tree.search_slot(&3);
        assert_eq!(tree.arena[tree.arena[three].parent].data, Some(4));
        tree.arena[three].data = Some(0);
        let err = tree.validate().unwrap_err();
        assert_eq!(err, Violation::BstOrder { slot: three });
        assert_eq!(err.code(), 1);
    }

    #[test]
    fn detects_frame_damage() {
        let mut tree = tree_of(&[5]);
        tree.arena[NIL].color = Color::Red;
        assert_eq!(tree.validate(), Err(Violation::SentinelColor));
        tree.arena[NIL].color = Color::Black;

        let root = tree.root;
        tree.arena[root].color = Color::Red;
        assert_eq!(tree.validate(), Err(Violation::RootColor { slot: root }));
        tree.arena[root].color = Color::Black;

        let mut tree = tree_of(&[2, 1, 3]);
        let one = tree.search_slot(&1);
        let three = tree.search_slot(&3);
        tree.arena[one].parent = three;
        assert_eq!(tree.validate(), Err(Violation::Topology { slot: one }));
        assert_eq!(Violation::Topology { slot: one }.code(), -1);
    }

    #[test]
    fn dump_and_level_order() {
        let tree = tree_of(&[10, 20, 30, 15, 25, 5, 1]);
        let expected = "\
└── 20 (B)
    ├── 10 (R)
    │   ├── 5 (B)
    │   │   ├── 1 (R)
    │   └── 15 (B)
    └── 30 (B)
        ├── 25 (R)
";
        assert_eq!(tree.structure().to_string(), expected);

        let levels: Vec<_> = tree.level_order().map(|(k, c)| (*k, c)).collect();
        assert_eq!(
            levels,
            [
                (20, Color::Black),
                (10, Color::Red),
                (30, Color::Black),
                (5, Color::Black),
                (15, Color::Black),
                (25, Color::Red),
                (1, Color::Red),
            ]
        );
        assert_eq!(RbTree::<i32>::natural().structure().to_string(), "<empty tree>\n");
    }
}
