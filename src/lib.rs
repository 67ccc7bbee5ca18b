// This is a red-black tree laid out as an arena, following the classic shape
//
// ```
// struct Node<T> {
//     data: T,
//     color: Color,
//     left: *mut Node<T>,
//     right: *mut Node<T>,
//     parent: *mut Node<T>,
// }
// ```
//
// where every absent link points at a single shared black `nil` node. Rust does not like
// parent pointers that alias their children, so the nodes live in a `Vec` and the links are
// indices into it. Slot 0 is `nil`, which keeps the rotation and fixup code free of emptiness
// checks.

mod compare;
mod error;
mod extract;
mod iter;
mod node;
mod search;
mod tree;
mod validate;

pub use compare::{Comparator, NaturalOrder};
pub use error::TreeError;
pub use iter::{Direction, IntoIter, Iter, RangeIter};
pub use node::{Color, NodeRef};
pub use tree::RbTree;
pub use validate::{LevelOrder, TreeDump, Violation};
