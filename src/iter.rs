use std::cmp::Ordering;
use std::iter::FusedIterator;
use std::ops::{Bound, RangeBounds};

use crate::compare::Comparator;
use crate::node::NIL;
use crate::tree::RbTree;

/// Order in which a range is walked.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default)]
pub enum Direction {
    #[default]
    Ascending,
    Descending,
}

/// An iterator over the payloads of an [`RbTree`], in ascending order from the front and
/// descending order from the back.
///
/// The iterator borrows the tree, so the tree cannot be changed while it is alive.
pub struct Iter<'a, T, C> {
    tree: &'a RbTree<T, C>,
    front: usize,
    back: usize,
    remaining: usize,
}

impl<T, C> Clone for Iter<'_, T, C> {
    fn clone(&self) -> Self {
        Iter { tree: self.tree, front: self.front, back: self.back, remaining: self.remaining }
    }
}

impl<'a, T, C> Iterator for Iter<'a, T, C> {
    type Item = &'a T;

    fn next(&mut self) -> Option<&'a T> {
        if self.remaining == 0 {
            return None;
        }
        let slot = self.front;
        self.front = self.tree.successor_slot(slot);
        self.remaining -= 1;
        Some(self.tree.arena.payload(slot))
    }

    fn size_hint(&self) -> (usize, Option<usize>) {
        (self.remaining, Some(self.remaining))
    }
}

impl<'a, T, C> DoubleEndedIterator for Iter<'a, T, C> {
    fn next_back(&mut self) -> Option<&'a T> {
        if self.remaining == 0 {
            return None;
        }
        let slot = self.back;
        self.back = self.tree.predecessor_slot(slot);
        self.remaining -= 1;
        Some(self.tree.arena.payload(slot))
    }
}

impl<T, C> ExactSizeIterator for Iter<'_, T, C> {}
impl<T, C> FusedIterator for Iter<'_, T, C> {}

/// An owning iterator over the payloads of an [`RbTree`], in ascending order.
///
/// The tree's shape is left alone while payloads are moved out; whatever has not been yielded
/// is dropped together with the arena.
pub struct IntoIter<T, C> {
    tree: RbTree<T, C>,
    front: usize,
    back: usize,
    remaining: usize,
}

impl<T, C> Iterator for IntoIter<T, C> {
    type Item = T;

    fn next(&mut self) -> Option<T> {
        if self.remaining == 0 {
            return None;
        }
        let slot = self.front;
        self.front = self.tree.successor_slot(slot);
        self.remaining -= 1;
        self.tree.arena.take_payload(slot)
    }

    fn size_hint(&self) -> (usize, Option<usize>) {
        (self.remaining, Some(self.remaining))
    }
}

impl<T, C> DoubleEndedIterator for IntoIter<T, C> {
    fn next_back(&mut self) -> Option<T> {
        if self.remaining == 0 {
            return None;
        }
        let slot = self.back;
        self.back = self.tree.predecessor_slot(slot);
        self.remaining -= 1;
        self.tree.arena.take_payload(slot)
    }
}

impl<T, C> ExactSizeIterator for IntoIter<T, C> {}
impl<T, C> FusedIterator for IntoIter<T, C> {}

/// An iterator over the payloads of an [`RbTree`] that fall inside a range.
///
/// The walk starts at the bound on the near end and re-checks the bound on the far end after
/// every step, so it stops as soon as the far bound is crossed. Like [`Iter`], it borrows the
/// tree and rules out mutation while it is alive.
pub struct RangeIter<'a, T, C, R> {
    tree: &'a RbTree<T, C>,
    current: usize,
    bounds: R,
    direction: Direction,
}

impl<T, C, R: Clone> Clone for RangeIter<'_, T, C, R> {
    fn clone(&self) -> Self {
        RangeIter {
            tree: self.tree,
            current: self.current,
            bounds: self.bounds.clone(),
            direction: self.direction,
        }
    }
}

impl<'a, T, C, R> RangeIter<'a, T, C, R>
where
    C: Comparator<T>,
    R: RangeBounds<T>,
{
    fn new(tree: &'a RbTree<T, C>, bounds: R, direction: Direction) -> Self {
        let start = match direction {
            Direction::Ascending => match bounds.start_bound() {
                Bound::Unbounded => tree.minimum(tree.root),
                Bound::Included(low) => tree.lower_bound_slot(low, true),
                Bound::Excluded(low) => tree.lower_bound_slot(low, false),
            },
            Direction::Descending => match bounds.end_bound() {
                Bound::Unbounded => tree.maximum(tree.root),
                Bound::Included(high) => tree.upper_bound_slot(high, true),
                Bound::Excluded(high) => tree.upper_bound_slot(high, false),
            },
        };

        let mut iter = RangeIter { tree, current: NIL, bounds, direction };
        if start != NIL && iter.before_far_bound(start) {
            iter.current = start;
        }
        iter
    }

    /// Whether `slot` has not yet crossed the bound the walk is heading towards.
    fn before_far_bound(&self, slot: usize) -> bool {
        let data = self.tree.arena.payload(slot);
        match self.direction {
            Direction::Ascending => match self.bounds.end_bound() {
                Bound::Unbounded => true,
                Bound::Included(high) => self.tree.cmp.compare(data, high) != Ordering::Greater,
                Bound::Excluded(high) => self.tree.cmp.compare(data, high) == Ordering::Less,
            },
            Direction::Descending => match self.bounds.start_bound() {
                Bound::Unbounded => true,
                Bound::Included(low) => self.tree.cmp.compare(data, low) != Ordering::Less,
                Bound::Excluded(low) => self.tree.cmp.compare(data, low) == Ordering::Greater,
            },
        }
    }

    /// The direction this iterator walks in.
    pub fn direction(&self) -> Direction {
        self.direction
    }
}

impl<'a, T, C, R> Iterator for RangeIter<'a, T, C, R>
where
    C: Comparator<T>,
    R: RangeBounds<T>,
{
    type Item = &'a T;

    fn next(&mut self) -> Option<&'a T> {
        if self.current == NIL {
            return None;
        }
        let slot = self.current;
        let next = match self.direction {
            Direction::Ascending => self.tree.successor_slot(slot),
            Direction::Descending => self.tree.predecessor_slot(slot),
        };
        self.current = if next != NIL && self.before_far_bound(next) { next } else { NIL };
        Some(self.tree.arena.payload(slot))
    }

    fn size_hint(&self) -> (usize, Option<usize>) {
        if self.current == NIL {
            (0, Some(0))
        } else {
            (1, Some(self.tree.len()))
        }
    }
}

impl<T, C, R> FusedIterator for RangeIter<'_, T, C, R>
where
    C: Comparator<T>,
    R: RangeBounds<T>,
{
}

impl<T, C> RbTree<T, C> {
    /// Gets an iterator over the payloads in ascending order. Call `.rev()` on it to walk from
    /// the largest payload down.
    ///
    /// # Examples
    ///
    /// ```
    /// use ordered_tree::RbTree;
    ///
    /// let mut tree = RbTree::natural();
    /// for k in [3, 1, 2] {
    ///     tree.insert(k).unwrap();
    /// }
    /// assert_eq!(tree.iter().collect::<Vec<_>>(), [&1, &2, &3]);
    /// assert_eq!(tree.iter().rev().collect::<Vec<_>>(), [&3, &2, &1]);
    /// ```
    pub fn iter(&self) -> Iter<'_, T, C> {
        Iter {
            tree: self,
            front: self.minimum(self.root),
            back: self.maximum(self.root),
            remaining: self.length,
        }
    }
}

impl<T, C: Comparator<T>> RbTree<T, C> {
    /// Gets an ascending iterator over the payloads inside `range`.
    ///
    /// # Examples
    ///
    /// ```
    /// use ordered_tree::RbTree;
    ///
    /// let mut tree = RbTree::natural();
    /// for k in 0..10 {
    ///     tree.insert(k).unwrap();
    /// }
    /// assert_eq!(tree.range(3..6).copied().collect::<Vec<_>>(), [3, 4, 5]);
    /// assert_eq!(tree.range(8..).copied().collect::<Vec<_>>(), [8, 9]);
    /// ```
    pub fn range<R: RangeBounds<T>>(&self, range: R) -> RangeIter<'_, T, C, R> {
        RangeIter::new(self, range, Direction::Ascending)
    }

    /// Gets an iterator over the payloads inside `range`, walked in `direction`.
    pub fn range_with<R: RangeBounds<T>>(
        &self,
        range: R,
        direction: Direction,
    ) -> RangeIter<'_, T, C, R> {
        RangeIter::new(self, range, direction)
    }

    /// Gets an iterator over the payloads between `low` and `high`, walked in `direction`.
    /// Each bound is independently inclusive, exclusive or open.
    ///
    /// # Examples
    ///
    /// ```
    /// use std::ops::Bound::{Excluded, Included};
    /// use ordered_tree::{Direction, RbTree};
    ///
    /// let mut tree = RbTree::natural();
    /// for k in [1, 5, 15, 25, 30] {
    ///     tree.insert(k).unwrap();
    /// }
    /// let walk = tree.range_iter(Excluded(&5), Included(&25), Direction::Descending);
    /// assert_eq!(walk.copied().collect::<Vec<_>>(), [25, 15]);
    /// ```
    pub fn range_iter<'k>(
        &self,
        low: Bound<&'k T>,
        high: Bound<&'k T>,
        direction: Direction,
    ) -> RangeIter<'_, T, C, (Bound<&'k T>, Bound<&'k T>)> {
        RangeIter::new(self, (low, high), direction)
    }
}

impl<'a, T, C> IntoIterator for &'a RbTree<T, C> {
    type Item = &'a T;
    type IntoIter = Iter<'a, T, C>;

    fn into_iter(self) -> Iter<'a, T, C> {
        self.iter()
    }
}

impl<T, C> IntoIterator for RbTree<T, C> {
    type Item = T;
    type IntoIter = IntoIter<T, C>;

    fn into_iter(self) -> IntoIter<T, C> {
        let front = self.minimum(self.root);
        let back = self.maximum(self.root);
        let remaining = self.length;
        IntoIter { tree: self, front, back, remaining }
    }
}
