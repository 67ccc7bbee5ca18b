use std::ops::RangeBounds;

use crate::compare::Comparator;
use crate::error::TreeError;
use crate::iter::Direction;
use crate::tree::RbTree;

fn collect<'a, T: 'a, I>(items: I) -> Result<Vec<&'a T>, TreeError>
where
    I: Iterator<Item = &'a T>,
{
    let mut out = Vec::new();
    for item in items {
        out.try_reserve(1).map_err(|_| TreeError::OutOfMemory)?;
        out.push(item);
    }
    Ok(out)
}

impl<T, C: Comparator<T>> RbTree<T, C> {
    /// Collects references to every payload inside `range`, in `direction` order.
    ///
    /// The buffer is filled in a single walk of the range. Fails only if the buffer cannot
    /// grow.
    ///
    /// # Examples
    ///
    /// ```
    /// use ordered_tree::{Direction, RbTree};
    ///
    /// let mut tree = RbTree::natural();
    /// for k in [10, 20, 30, 15, 25, 5, 1] {
    ///     tree.insert(k).unwrap();
    /// }
    /// assert_eq!(tree.slice(5..=25, Direction::Ascending).unwrap(), [&5, &10, &15, &20, &25]);
    /// assert_eq!(tree.slice(..10, Direction::Descending).unwrap(), [&5, &1]);
    /// ```
    pub fn slice<R: RangeBounds<T>>(
        &self,
        range: R,
        direction: Direction,
    ) -> Result<Vec<&T>, TreeError> {
        collect(self.range_with(range, direction))
    }

    /// Collects references to every payload for which `pred` returns true, in ascending
    /// order. Anything the predicate needs besides the payload is captured by the closure.
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
    /// let limit = 20;
    /// assert_eq!(tree.filter(|&k| k < limit).unwrap(), [&1, &5, &10, &15]);
    /// ```
    pub fn filter<P>(&self, mut pred: P) -> Result<Vec<&T>, TreeError>
    where
        P: FnMut(&T) -> bool,
    {
        collect(self.iter().filter(|item| pred(*item)))
    }
}
