use std::cmp::Ordering;

use crate::compare::Comparator;
use crate::error::TreeError;
use crate::node::{NodeRef, NIL};
use crate::tree::RbTree;

impl<T, C: Comparator<T>> RbTree<T, C> {
    /// Descends by comparison. Returns `NIL` when no payload compares equal to `key`.
    pub(crate) fn search_slot(&self, key: &T) -> usize {
        let mut cur = self.root;
        while cur != NIL {
            match self.cmp.compare(key, self.arena.payload(cur)) {
                Ordering::Equal => return cur,
                Ordering::Less => cur = self.arena[cur].left,
                Ordering::Greater => cur = self.arena[cur].right,
            }
        }
        NIL
    }

    /// Smallest node that is `>= key` (`inclusive`) or `> key`, or `NIL`.
    pub(crate) fn lower_bound_slot(&self, key: &T, inclusive: bool) -> usize {
        let mut cur = self.root;
        let mut best = NIL;
        while cur != NIL {
            match self.cmp.compare(self.arena.payload(cur), key) {
                Ordering::Greater => {
                    best = cur;
                    cur = self.arena[cur].left;
                }
                Ordering::Equal if inclusive => {
                    best = cur;
                    cur = self.arena[cur].left;
                }
                _ => cur = self.arena[cur].right,
            }
        }
        best
    }

    /// Largest node that is `<= key` (`inclusive`) or `< key`, or `NIL`.
    pub(crate) fn upper_bound_slot(&self, key: &T, inclusive: bool) -> usize {
        let mut cur = self.root;
        let mut best = NIL;
        while cur != NIL {
            match self.cmp.compare(self.arena.payload(cur), key) {
                Ordering::Less => {
                    best = cur;
                    cur = self.arena[cur].right;
                }
                Ordering::Equal if inclusive => {
                    best = cur;
                    cur = self.arena[cur].right;
                }
                _ => cur = self.arena[cur].left,
            }
        }
        best
    }

    /// Returns a handle to a node whose payload compares equal to `key`.
    ///
    /// When several payloads compare equal, which one is found is unspecified.
    pub fn search(&self, key: &T) -> Option<NodeRef> {
        self.to_handle(self.search_slot(key))
    }

    /// Returns a reference to a payload comparing equal to `key`.
    ///
    /// # Examples
    ///
    /// ```
    /// use ordered_tree::RbTree;
    ///
    /// let mut tree = RbTree::natural();
    /// tree.insert(1).unwrap();
    /// assert_eq!(tree.find(&1), Some(&1));
    /// assert_eq!(tree.find(&2), None);
    /// ```
    pub fn find(&self, key: &T) -> Option<&T> {
        match self.search_slot(key) {
            NIL => None,
            slot => Some(self.arena.payload(slot)),
        }
    }

    /// Returns true if some payload compares equal to `key`.
    pub fn contains(&self, key: &T) -> bool {
        self.search_slot(key) != NIL
    }

    /// The first node, in ascending order, that is not below `key`. With `inclusive` false, a
    /// payload equal to `key` is skipped as well.
    ///
    /// # Examples
    ///
    /// ```
    /// use ordered_tree::RbTree;
    ///
    /// let mut tree = RbTree::natural();
    /// for k in [10, 20, 30] {
    ///     tree.insert(k).unwrap();
    /// }
    /// let at = |n| tree.lower_bound(&n, true).and_then(|node| tree.get(node)).copied();
    /// assert_eq!(at(20), Some(20));
    /// assert_eq!(at(21), Some(30));
    /// assert_eq!(at(31), None);
    /// let above = tree.lower_bound(&20, false).and_then(|node| tree.get(node));
    /// assert_eq!(above, Some(&30));
    /// ```
    pub fn lower_bound(&self, key: &T, inclusive: bool) -> Option<NodeRef> {
        self.to_handle(self.lower_bound_slot(key, inclusive))
    }

    /// The last node, in ascending order, that is not above `key`. With `inclusive` false, a
    /// payload equal to `key` is skipped as well.
    pub fn upper_bound(&self, key: &T, inclusive: bool) -> Option<NodeRef> {
        self.to_handle(self.upper_bound_slot(key, inclusive))
    }
}

impl<T, C> RbTree<T, C> {
    pub(crate) fn to_handle(&self, slot: usize) -> Option<NodeRef> {
        match slot {
            NIL => None,
            slot => Some(self.arena.handle(slot)),
        }
    }

    /// Leftmost node of the subtree rooted at `slot`. `NIL` stays `NIL`.
    pub(crate) fn minimum(&self, mut slot: usize) -> usize {
        while self.arena[slot].left != NIL {
            slot = self.arena[slot].left;
        }
        slot
    }

    /// Rightmost node of the subtree rooted at `slot`. `NIL` stays `NIL`.
    pub(crate) fn maximum(&self, mut slot: usize) -> usize {
        while self.arena[slot].right != NIL {
            slot = self.arena[slot].right;
        }
        slot
    }

    pub(crate) fn successor_slot(&self, mut slot: usize) -> usize {
        if self.arena[slot].right != NIL {
            return self.minimum(self.arena[slot].right);
        }
        let mut up = self.arena[slot].parent;
        while up != NIL && slot == self.arena[up].right {
            slot = up;
            up = self.arena[up].parent;
        }
        up
    }

    pub(crate) fn predecessor_slot(&self, mut slot: usize) -> usize {
        if self.arena[slot].left != NIL {
            return self.maximum(self.arena[slot].left);
        }
        let mut up = self.arena[slot].parent;
        while up != NIL && slot == self.arena[up].left {
            slot = up;
            up = self.arena[up].parent;
        }
        up
    }

    /// The node holding the smallest payload, or `None` if the tree is empty.
    pub fn min(&self) -> Option<NodeRef> {
        self.to_handle(self.minimum(self.root))
    }

    /// The node holding the largest payload, or `None` if the tree is empty.
    pub fn max(&self) -> Option<NodeRef> {
        self.to_handle(self.maximum(self.root))
    }

    /// The smallest payload.
    pub fn first(&self) -> Option<&T> {
        match self.minimum(self.root) {
            NIL => None,
            slot => Some(self.arena.payload(slot)),
        }
    }

    /// The largest payload.
    pub fn last(&self) -> Option<&T> {
        match self.maximum(self.root) {
            NIL => None,
            slot => Some(self.arena.payload(slot)),
        }
    }

    /// The payload behind `node`, or `None` if the handle is stale.
    pub fn get(&self, node: NodeRef) -> Option<&T> {
        self.arena.resolve(node).ok().map(|slot| self.arena.payload(slot))
    }

    /// The in-order successor of `node`; `Ok(None)` if `node` holds the largest payload.
    ///
    /// # Examples
    ///
    /// ```
    /// use ordered_tree::RbTree;
    ///
    /// let mut tree = RbTree::natural();
    /// let one = tree.insert(1).unwrap();
    /// let two = tree.insert(2).unwrap();
    /// assert_eq!(tree.successor(one), Ok(Some(two)));
    /// assert_eq!(tree.successor(two), Ok(None));
    /// assert_eq!(tree.predecessor(two), Ok(Some(one)));
    /// ```
    pub fn successor(&self, node: NodeRef) -> Result<Option<NodeRef>, TreeError> {
        let slot = self.arena.resolve(node)?;
        Ok(self.to_handle(self.successor_slot(slot)))
    }

    /// The in-order predecessor of `node`; `Ok(None)` if `node` holds the smallest payload.
    pub fn predecessor(&self, node: NodeRef) -> Result<Option<NodeRef>, TreeError> {
        let slot = self.arena.resolve(node)?;
        Ok(self.to_handle(self.predecessor_slot(slot)))
    }
}
