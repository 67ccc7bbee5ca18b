use std::cmp::Ordering;
use std::fmt;

use log::{debug, trace};

use crate::compare::{Comparator, NaturalOrder};
use crate::error::TreeError;
use crate::node::{Arena, Color, NodeRef, NIL};

/// An ordered container based on a red-black tree.
///
/// Payloads are kept in the order given by a caller-supplied [`Comparator`]. The tree owns every
/// payload between insertion and removal; [`delete`](RbTree::delete) and
/// [`remove`](RbTree::remove) hand the payload back, and [`clear_with`](RbTree::clear_with) and
/// [`destroy`](RbTree::destroy) pass each one to a destructor callback exactly once.
///
/// All nodes live in a single arena. Slot 0 of the arena is the `nil` sentinel: it is always
/// black, it is the child of every leaf and the parent of the root, and the root is `nil` when
/// the tree is empty. Every path from a node down to `nil` crosses the same number of black
/// nodes, and no red node has a red child, so the height stays within `2 * log2(n + 1)`.
///
/// Payloads that compare `Equal` are all kept. A new payload descends to the right of any equal
/// payload already present, so the tree behaves as a multiset under the comparator.
///
/// It is a logic error for a payload to be modified in such a way that its ordering relative to
/// any other payload changes while it is in the tree.
///
/// # Examples
///
/// ```
/// use ordered_tree::RbTree;
///
/// let mut tree = RbTree::natural();
/// for k in [10, 20, 30, 15, 25, 5, 1] {
///     tree.insert(k).unwrap();
/// }
/// assert_eq!(tree.remove(&20), Some(20));
/// assert_eq!(tree.iter().copied().collect::<Vec<_>>(), [1, 5, 10, 15, 25, 30]);
/// assert!(tree.validate().is_ok());
/// ```
pub struct RbTree<T, C = NaturalOrder> {
    pub(crate) arena: Arena<T>,
    pub(crate) root: usize,
    pub(crate) length: usize,
    pub(crate) cmp: C,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub(crate) enum Side {
    Left,
    Right,
}

impl Side {
    #[inline]
    pub(crate) fn opposite(self) -> Side {
        match self {
            Side::Left => Side::Right,
            Side::Right => Side::Left,
        }
    }
}

impl<T: Ord> RbTree<T, NaturalOrder> {
    /// Makes a new, empty tree ordered by `T`'s `Ord` implementation.
    pub fn natural() -> Self {
        RbTree::new(NaturalOrder)
    }
}

impl<T: Ord> Default for RbTree<T, NaturalOrder> {
    fn default() -> Self {
        RbTree::natural()
    }
}

impl<T, C: Comparator<T>> RbTree<T, C> {
    /// Makes a new, empty tree ordered by `cmp`.
    pub fn new(cmp: C) -> Self {
        RbTree { arena: Arena::new(), root: NIL, length: 0, cmp }
    }

    /// Makes a new, empty tree with room for `capacity` nodes before the arena has to grow.
    pub fn with_capacity(capacity: usize, cmp: C) -> Result<Self, TreeError> {
        Ok(RbTree { arena: Arena::with_capacity(capacity)?, root: NIL, length: 0, cmp })
    }

    /// Inserts a payload and returns a handle to its node.
    ///
    /// The payload descends right on ties, so inserting a payload equal to one already present
    /// keeps both. Fails only if the arena cannot grow.
    ///
    /// # Examples
    ///
    /// ```
    /// use ordered_tree::RbTree;
    ///
    /// let mut tree = RbTree::natural();
    /// let node = tree.insert(37).unwrap();
    /// assert_eq!(tree.get(node), Some(&37));
    /// tree.insert(37).unwrap();
    /// assert_eq!(tree.len(), 2);
    /// ```
    pub fn insert(&mut self, value: T) -> Result<NodeRef, TreeError> {
        let mut parent = NIL;
        let mut cur = self.root;
        let mut side = Side::Left;

        while cur != NIL {
            parent = cur;
            side = match self.cmp.compare(&value, self.arena.payload(cur)) {
                Ordering::Less => Side::Left,
                Ordering::Equal | Ordering::Greater => Side::Right,
            };
            cur = self.child(cur, side);
        }

        let z = self.arena.alloc(value)?;
        self.arena[z].parent = parent;
        if parent == NIL {
            self.root = z;
        } else {
            self.set_child(parent, side, z);
        }
        self.length += 1;

        self.insert_fixup(z);
        trace!("inserted node at slot {} (len {})", z, self.length);
        Ok(self.arena.handle(z))
    }

    /// Removes one payload comparing equal to `key` and returns it.
    ///
    /// # Examples
    ///
    /// ```
    /// use ordered_tree::RbTree;
    ///
    /// let mut tree = RbTree::natural();
    /// tree.insert(1).unwrap();
    /// assert_eq!(tree.remove(&1), Some(1));
    /// assert_eq!(tree.remove(&1), None);
    /// ```
    pub fn remove(&mut self, key: &T) -> Option<T> {
        match self.search_slot(key) {
            NIL => None,
            slot => Some(self.unlink(slot)),
        }
    }
}

impl<T, C> RbTree<T, C> {
    /// Returns the number of payloads in the tree.
    pub fn len(&self) -> usize {
        self.length
    }

    /// Returns true if the tree holds no payloads.
    pub fn is_empty(&self) -> bool {
        self.root == NIL
    }

    /// Number of nodes the tree can hold before its arena has to grow.
    pub fn capacity(&self) -> usize {
        self.arena.capacity()
    }

    /// Releases spare arena capacity.
    pub fn shrink_to_fit(&mut self) {
        self.arena.shrink_to_fit();
    }

    /// The comparator ordering this tree.
    pub fn comparator(&self) -> &C {
        &self.cmp
    }

    /// Removes the node behind `node` and returns its payload.
    ///
    /// Fails with [`TreeError::StaleNode`] if the node was already deleted or belongs to a
    /// different tree.
    pub fn delete(&mut self, node: NodeRef) -> Result<T, TreeError> {
        let slot = self.arena.resolve(node)?;
        Ok(self.unlink(slot))
    }

    /// Removes the node behind `node` and passes its payload to `destructor` once the tree has
    /// been rebalanced.
    pub fn delete_with<F>(&mut self, node: NodeRef, destructor: F) -> Result<(), TreeError>
    where
        F: FnOnce(T),
    {
        let data = self.delete(node)?;
        destructor(data);
        Ok(())
    }

    /// Drops every payload. The tree stays usable and keeps its arena allocation.
    pub fn clear(&mut self) {
        debug!("clearing tree of {} nodes", self.length);
        self.arena.reset();
        self.root = NIL;
        self.length = 0;
    }

    /// Tears every node down in post-order, passing each payload to `destructor`. The tree stays
    /// usable afterwards.
    pub fn clear_with<F>(&mut self, mut destructor: F)
    where
        F: FnMut(T),
    {
        fn teardown<T, F: FnMut(T)>(arena: &mut Arena<T>, slot: usize, destructor: &mut F) {
            if slot == NIL {
                return;
            }
            let (left, right) = (arena[slot].left, arena[slot].right);
            teardown(arena, left, destructor);
            teardown(arena, right, destructor);
            if let Some(data) = arena.take_payload(slot) {
                destructor(data);
            }
        }

        debug!("tearing down tree of {} nodes", self.length);
        teardown(&mut self.arena, self.root, &mut destructor);
        self.arena.reset();
        self.root = NIL;
        self.length = 0;
    }

    /// Consumes the tree, passing every payload to `destructor`.
    pub fn destroy<F>(mut self, destructor: F)
    where
        F: FnMut(T),
    {
        self.clear_with(destructor);
    }

    #[inline]
    pub(crate) fn child(&self, slot: usize, side: Side) -> usize {
        match side {
            Side::Left => self.arena[slot].left,
            Side::Right => self.arena[slot].right,
        }
    }

    #[inline]
    fn set_child(&mut self, slot: usize, side: Side, child: usize) {
        match side {
            Side::Left => self.arena[slot].left = child,
            Side::Right => self.arena[slot].right = child,
        }
    }

    #[inline]
    fn side_of(&self, slot: usize) -> Side {
        if slot == self.arena[self.arena[slot].parent].left {
            Side::Left
        } else {
            Side::Right
        }
    }

    /// Rotates the subtree rooted at `x` towards `dir`: the child of `x` on the opposite side
    /// takes the place of `x`, and `x` becomes its `dir` child.
    ///
    /// ```text
    ///     x         rotate(x, Left)        y
    ///    / \        -------------->       / \
    ///   a   y                            x   c
    ///      / \                          / \
    ///     b   c                        a   b
    /// ```
    pub(crate) fn rotate(&mut self, x: usize, dir: Side) {
        let y = self.child(x, dir.opposite());
        debug_assert_ne!(y, NIL, "rotation needs a real child to lift");

        let inner = self.child(y, dir);
        self.set_child(x, dir.opposite(), inner);
        if inner != NIL {
            self.arena[inner].parent = x;
        }

        let parent = self.arena[x].parent;
        self.arena[y].parent = parent;
        if parent == NIL {
            self.root = y;
        } else {
            let side = self.side_of(x);
            self.set_child(parent, side, y);
        }

        self.set_child(y, dir, x);
        self.arena[x].parent = y;
    }

    fn insert_fixup(&mut self, mut z: usize) {
        while self.arena.is_red(self.arena[z].parent) {
            let parent = self.arena[z].parent;
            let grandparent = self.arena[parent].parent;
            let side = self.side_of(parent);
            let uncle = self.child(grandparent, side.opposite());

            if self.arena.is_red(uncle) {
                self.arena[parent].color = Color::Black;
                self.arena[uncle].color = Color::Black;
                self.arena[grandparent].color = Color::Red;
                z = grandparent;
                continue;
            }

            if z == self.child(parent, side.opposite()) {
                // Inner child: straighten the zig-zag first.
                z = parent;
                self.rotate(z, side);
            }

            let parent = self.arena[z].parent;
            let grandparent = self.arena[parent].parent;
            self.arena[parent].color = Color::Black;
            self.arena[grandparent].color = Color::Red;
            self.rotate(grandparent, side.opposite());
        }

        let root = self.root;
        self.arena[root].color = Color::Black;
    }

    /// Puts the subtree rooted at `v` where `u` used to hang. `v` may be the sentinel, in which
    /// case the sentinel's parent link is overwritten for the benefit of `delete_fixup`.
    fn transplant(&mut self, u: usize, v: usize) {
        let parent = self.arena[u].parent;
        if parent == NIL {
            self.root = v;
        } else {
            let side = self.side_of(u);
            self.set_child(parent, side, v);
        }
        self.arena[v].parent = parent;
    }

    pub(crate) fn unlink(&mut self, z: usize) -> T {
        let mut removed_color = self.arena[z].color;
        let x;

        if self.arena[z].left == NIL {
            x = self.arena[z].right;
            self.transplant(z, x);
        } else if self.arena[z].right == NIL {
            x = self.arena[z].left;
            self.transplant(z, x);
        } else {
            let y = self.minimum(self.arena[z].right);
            removed_color = self.arena[y].color;
            x = self.arena[y].right;

            if self.arena[y].parent == z {
                self.arena[x].parent = y;
            } else {
                self.transplant(y, x);
                let right = self.arena[z].right;
                self.arena[y].right = right;
                self.arena[right].parent = y;
            }

            self.transplant(z, y);
            let left = self.arena[z].left;
            self.arena[y].left = left;
            self.arena[left].parent = y;
            self.arena[y].color = self.arena[z].color;
        }

        if removed_color == Color::Black {
            self.delete_fixup(x);
        }

        self.length -= 1;
        trace!("deleted node at slot {} (len {})", z, self.length);
        self.arena.release(z)
    }

    fn delete_fixup(&mut self, mut x: usize) {
        while x != self.root && self.arena.is_black(x) {
            let parent = self.arena[x].parent;
            let side = if x == self.arena[parent].left { Side::Left } else { Side::Right };
            let far = side.opposite();
            let mut sibling = self.child(parent, far);

            if self.arena.is_red(sibling) {
                self.arena[sibling].color = Color::Black;
                self.arena[parent].color = Color::Red;
                self.rotate(parent, side);
                sibling = self.child(self.arena[x].parent, far);
            }

            if self.arena.is_black(self.child(sibling, side))
                && self.arena.is_black(self.child(sibling, far))
            {
                // Push the missing black up a level.
                self.arena[sibling].color = Color::Red;
                x = self.arena[x].parent;
                continue;
            }

            if self.arena.is_black(self.child(sibling, far)) {
                let near = self.child(sibling, side);
                self.arena[near].color = Color::Black;
                self.arena[sibling].color = Color::Red;
                self.rotate(sibling, far);
                sibling = self.child(self.arena[x].parent, far);
            }

            let parent = self.arena[x].parent;
            self.arena[sibling].color = self.arena[parent].color;
            self.arena[parent].color = Color::Black;
            let far_child = self.child(sibling, far);
            self.arena[far_child].color = Color::Black;
            self.rotate(parent, side);
            x = self.root;
        }

        self.arena[x].color = Color::Black;
    }
}

impl<T: fmt::Debug, C> fmt::Debug for RbTree<T, C> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_set().entries(self.iter()).finish()
    }
}
