// Nodes live in a `Vec`. Links are slot indices, and slot `NIL` is the shared black sentinel
// that terminates every absent child and parent link. Freed slots are threaded onto a free
// list and handed out again by later inserts.

use std::ops::{Index, IndexMut};
use std::sync::atomic::{AtomicU64, Ordering};

use crate::error::TreeError;

pub(crate) const NIL: usize = 0;

// Stamps are unique across every tree in the process, so a handle minted by one tree can never
// match a live node of another.
static NEXT_STAMP: AtomicU64 = AtomicU64::new(1);

const NO_STAMP: u64 = 0;

/// The color tag of a node.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Color {
    Red,
    Black,
}

impl Color {
    pub(crate) fn tag(self) -> &'static str {
        match self {
            Color::Red => "R",
            Color::Black => "B",
        }
    }
}

pub(crate) struct Node<T> {
    pub(crate) data: Option<T>,
    pub(crate) color: Color,
    pub(crate) left: usize,
    pub(crate) right: usize,
    pub(crate) parent: usize,
    stamp: u64,
}

impl<T> Node<T> {
    fn sentinel() -> Self {
        Node {
            data: None,
            color: Color::Black,
            left: NIL,
            right: NIL,
            parent: NIL,
            stamp: NO_STAMP,
        }
    }

    fn fresh(data: T) -> Self {
        Node {
            data: Some(data),
            color: Color::Red,
            left: NIL,
            right: NIL,
            parent: NIL,
            stamp: NEXT_STAMP.fetch_add(1, Ordering::Relaxed),
        }
    }
}

/// A handle to a node inside an [`RbTree`](crate::RbTree).
///
/// Handles are plain values and do not borrow the tree. A handle stays usable until its node is
/// deleted; after that every operation given the handle fails with
/// [`TreeError::StaleNode`], even if the slot has been reused by a newer node.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct NodeRef {
    slot: usize,
    stamp: u64,
}

pub(crate) struct Arena<T> {
    nodes: Vec<Node<T>>,
    free: Vec<usize>,
}

impl<T> Arena<T> {
    pub(crate) fn with_capacity(capacity: usize) -> Result<Self, TreeError> {
        let slots = capacity.checked_add(1).ok_or(TreeError::OutOfMemory)?;
        let mut nodes = Vec::new();
        nodes.try_reserve(slots).map_err(|_| TreeError::OutOfMemory)?;
        let mut free = Vec::new();
        free.try_reserve(capacity).map_err(|_| TreeError::OutOfMemory)?;
        nodes.push(Node::sentinel());
        Ok(Arena { nodes, free })
    }

    pub(crate) fn new() -> Self {
        Arena { nodes: vec![Node::sentinel()], free: Vec::new() }
    }

    /// Number of real node slots the arena can hold without reallocating.
    pub(crate) fn capacity(&self) -> usize {
        self.nodes.capacity() - 1
    }

    /// Takes a slot for `data`. The node starts red with every link pointing at `NIL`.
    pub(crate) fn alloc(&mut self, data: T) -> Result<usize, TreeError> {
        if let Some(slot) = self.free.pop() {
            self.nodes[slot] = Node::fresh(data);
            return Ok(slot);
        }

        let real = self.nodes.len();
        self.nodes.try_reserve(1).map_err(|_| TreeError::OutOfMemory)?;
        // The free list must be able to take back every real slot without allocating, so
        // `release` stays infallible.
        self.free.try_reserve(real).map_err(|_| TreeError::OutOfMemory)?;
        self.nodes.push(Node::fresh(data));
        Ok(real)
    }

    /// Returns the slot to the free list and hands back its payload.
    pub(crate) fn release(&mut self, slot: usize) -> T {
        debug_assert_ne!(slot, NIL, "the sentinel is never released");
        let node = &mut self.nodes[slot];
        node.stamp = NO_STAMP;
        node.left = NIL;
        node.right = NIL;
        node.parent = NIL;
        let data = node.data.take();
        self.free.push(slot);
        match data {
            Some(data) => data,
            None => unreachable!("released slot {} held no payload", slot),
        }
    }

    /// Drops every node and resets the sentinel, keeping the allocation.
    pub(crate) fn reset(&mut self) {
        self.nodes.truncate(1);
        self.nodes[NIL] = Node::sentinel();
        self.free.clear();
    }

    pub(crate) fn shrink_to_fit(&mut self) {
        // Trailing free slots can be dropped outright; interior ones must stay to keep indices
        // stable.
        while self.nodes.len() > 1 && self.nodes[self.nodes.len() - 1].stamp == NO_STAMP {
            let last = self.nodes.len() - 1;
            self.nodes.pop();
            self.free.retain(|&slot| slot != last);
        }
        self.nodes.shrink_to_fit();
        self.free.shrink_to(self.nodes.len() - 1);
    }

    pub(crate) fn payload(&self, slot: usize) -> &T {
        match self.nodes[slot].data.as_ref() {
            Some(data) => data,
            None => unreachable!("slot {} holds no payload", slot),
        }
    }

    pub(crate) fn take_payload(&mut self, slot: usize) -> Option<T> {
        self.nodes[slot].data.take()
    }

    pub(crate) fn handle(&self, slot: usize) -> NodeRef {
        NodeRef { slot, stamp: self.nodes[slot].stamp }
    }

    /// Resolves a handle to its slot if it still names a live node.
    pub(crate) fn resolve(&self, node: NodeRef) -> Result<usize, TreeError> {
        match self.nodes.get(node.slot) {
            Some(n) if node.slot != NIL && n.stamp != NO_STAMP && n.stamp == node.stamp => {
                Ok(node.slot)
            }
            _ => Err(TreeError::StaleNode { slot: node.slot }),
        }
    }

    #[inline]
    pub(crate) fn is_red(&self, slot: usize) -> bool {
        self.nodes[slot].color == Color::Red
    }

    #[inline]
    pub(crate) fn is_black(&self, slot: usize) -> bool {
        self.nodes[slot].color == Color::Black
    }
}

impl<T> Index<usize> for Arena<T> {
    type Output = Node<T>;

    #[inline]
    fn index(&self, slot: usize) -> &Node<T> {
        &self.nodes[slot]
    }
}

impl<T> IndexMut<usize> for Arena<T> {
    #[inline]
    fn index_mut(&mut self, slot: usize) -> &mut Node<T> {
        &mut self.nodes[slot]
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn sentinel_is_black_and_self_linked() {
        let arena: Arena<u32> = Arena::new();
        assert!(arena.is_black(NIL));
        assert_eq!(arena[NIL].left, NIL);
        assert_eq!(arena[NIL].right, NIL);
        assert_eq!(arena[NIL].parent, NIL);
    }

    #[test]
    fn released_slots_are_reused_with_new_stamps() {
        let mut arena = Arena::new();
        let a = arena.alloc("a").unwrap();
        let old = arena.handle(a);
        assert!(arena.is_red(a));
        assert_eq!(arena.release(a), "a");
        assert_eq!(arena.resolve(old), Err(TreeError::StaleNode { slot: a }));

        let b = arena.alloc("b").unwrap();
        assert_eq!(a, b);
        assert_ne!(arena.handle(b), old);
        assert_eq!(arena.resolve(old), Err(TreeError::StaleNode { slot: a }));
        assert_eq!(arena.resolve(arena.handle(b)), Ok(b));
    }

    #[test]
    fn sentinel_handle_never_resolves() {
        let arena: Arena<u32> = Arena::new();
        assert!(arena.resolve(arena.handle(NIL)).is_err());
    }

    #[test]
    fn shrink_drops_trailing_free_slots() {
        let mut arena = Arena::new();
        let a = arena.alloc(1).unwrap();
        let b = arena.alloc(2).unwrap();
        arena.release(b);
        arena.shrink_to_fit();
        assert_eq!(arena.alloc(3).unwrap(), b);
        assert_eq!(*arena.payload(a), 1);
    }
}
