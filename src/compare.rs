use std::cmp::Ordering;

/// A three-way comparison over payloads.
///
/// The ordering must be total and must not change for a payload while it sits in the tree.
/// Returning `Equal` for two distinct payloads is allowed; both are kept (see
/// [`RbTree::insert`](crate::RbTree::insert)).
///
/// Any `Fn(&T, &T) -> Ordering` is a comparator, so most callers pass a closure:
///
/// ```
/// use ordered_tree::RbTree;
///
/// let mut tree = RbTree::new(|a: &(u32, &str), b: &(u32, &str)| a.0.cmp(&b.0));
/// tree.insert((2, "bob")).unwrap();
/// tree.insert((1, "alice")).unwrap();
/// assert_eq!(tree.first(), Some(&(1, "alice")));
/// ```
pub trait Comparator<T: ?Sized> {
    fn compare(&self, a: &T, b: &T) -> Ordering;
}

impl<T: ?Sized, F> Comparator<T> for F where F: Fn(&T, &T) -> Ordering {
    #[inline]
    fn compare(&self, a: &T, b: &T) -> Ordering {
        self(a, b)
    }
}

/// Orders payloads by their `Ord` implementation.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct NaturalOrder;

impl<T: Ord + ?Sized> Comparator<T> for NaturalOrder {
    #[inline]
    fn compare(&self, a: &T, b: &T) -> Ordering {
        a.cmp(b)
    }
}
