#![doc = include_str!("../README.md")]
#![no_std]

extern crate alloc;

use core::fmt;
use core::sync::atomic::AtomicU64;
use core::sync::atomic::Ordering;

////////////////////////////////////////////////////////////////////////////////
//                                                                            //
// SUBMODULES                                                                 //
//                                                                            //
////////////////////////////////////////////////////////////////////////////////

mod slab;

use slab::Slab;

////////////////////////////////////////////////////////////////////////////////
//                                                                            //
// PUBLIC TYPE AND TRAIT DEFINITIONS                                          //
//                                                                            //
////////////////////////////////////////////////////////////////////////////////

/// A singly linked list with stable node handles.
///
/// Nodes live in slot storage owned by the list; handles are `(index,
/// generation)` pairs tagged with the identity of the issuing list, so a
/// handle survives unrelated mutations and is cheaply validated on use.

pub struct List<T> {
  nodes: Slab<Node<T>>,
  first: Option<u32>,
  last: Option<u32>,
  count: usize,
  id: u64,
}

/// A handle to one node of a [`List`].
///
/// Issued by the insertion that created the node. A handle stays valid until
/// that node is removed (individually or via [`List::clear`]); afterwards it
/// resolves to nothing and node-relative operations report
/// [`Error::DetachedNode`]. Handles carry the identity of the list that
/// issued them, so presenting one to a different list reports
/// [`Error::ForeignNode`] instead of touching the wrong chain.

#[derive(Clone, Copy, PartialEq, Eq, Hash, Debug)]
pub struct NodeRef {
  list: u64,
  index: u32,
  generation: u32,
}

/// Why a list operation was refused.
///
/// Every failing operation returns before mutating anything, so an error
/// always leaves the list exactly as it was.

#[derive(Clone, Copy, PartialEq, Eq, Debug)]
pub enum Error {
  /// The handle does not resolve to a live node: its node has been removed,
  /// or the list has been cleared since the handle was issued.
  DetachedNode,
  /// The handle was issued by a different list instance.
  ForeignNode,
  /// The operation requires a non-empty list.
  EmptyList,
}

/// Borrowing iterator over a list's values, front to back.

pub struct Iter<'a, T> {
  list: &'a List<T>,
  cursor: Option<u32>,
  remaining: usize,
}

/// Borrowing iterator over `(handle, value)` pairs, front to back.

pub struct Nodes<'a, T> {
  list: &'a List<T>,
  cursor: Option<u32>,
  remaining: usize,
}

/// Owning iterator that drains a list front to back.

pub struct IntoIter<T> {
  list: List<T>,
}

////////////////////////////////////////////////////////////////////////////////
//                                                                            //
// PRIVATE TYPE DEFINITIONS                                                   //
//                                                                            //
////////////////////////////////////////////////////////////////////////////////

struct Node<T> {
  value: T,
  next: Option<u32>,
}

////////////////////////////////////////////////////////////////////////////////
//                                                                            //
// LIST IDENTITY                                                              //
//                                                                            //
////////////////////////////////////////////////////////////////////////////////

static NEXT_LIST_ID: AtomicU64 = AtomicU64::new(0);

#[inline(always)]
fn next_list_id() -> u64 {
  NEXT_LIST_ID.fetch_add(1, Ordering::Relaxed)
}

////////////////////////////////////////////////////////////////////////////////
//                                                                            //
// Error                                                                      //
//                                                                            //
////////////////////////////////////////////////////////////////////////////////

impl fmt::Display for Error {
  fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
    match self {
      Error::DetachedNode => f.write_str("handle does not resolve to a live node"),
      Error::ForeignNode => f.write_str("handle was issued by a different list"),
      Error::EmptyList => f.write_str("operation requires a non-empty list"),
    }
  }
}

impl core::error::Error for Error { }

////////////////////////////////////////////////////////////////////////////////
//                                                                            //
// List                                                                       //
//                                                                            //
////////////////////////////////////////////////////////////////////////////////

impl<T> List<T> {
  /// Creates an empty list.

  pub fn new() -> Self {
    Self {
      nodes: Slab::new(),
      first: None,
      last: None,
      count: 0,
      id: next_list_id(),
    }
  }

  /// The number of values in the list.

  #[inline(always)]
  pub fn len(&self) -> usize {
    self.count
  }

  /// Is the list empty?

  #[inline(always)]
  pub fn is_empty(&self) -> bool {
    self.count == 0
  }

  /// A handle to the head node, if any.

  pub fn first(&self) -> Option<NodeRef> {
    let index = self.first?;
    Some(self.handle(index, self.nodes.generation(index)?))
  }

  /// A handle to the tail node, if any.

  pub fn last(&self) -> Option<NodeRef> {
    let index = self.last?;
    Some(self.handle(index, self.nodes.generation(index)?))
  }

  /// A reference to the head value, if any.

  pub fn front(&self) -> Option<&T> {
    Some(&self.node(self.first?).value)
  }

  /// A mutable reference to the head value, if any.

  pub fn front_mut(&mut self) -> Option<&mut T> {
    let index = self.first?;
    Some(&mut self.node_mut(index).value)
  }

  /// A reference to the tail value, if any.

  pub fn back(&self) -> Option<&T> {
    Some(&self.node(self.last?).value)
  }

  /// A mutable reference to the tail value, if any.

  pub fn back_mut(&mut self) -> Option<&mut T> {
    let index = self.last?;
    Some(&mut self.node_mut(index).value)
  }

  /// Resolves a handle to a reference to its value.
  ///
  /// Returns `None` for a detached or foreign handle.

  pub fn get(&self, node: NodeRef) -> Option<&T> {
    if node.list != self.id {
      return None;
    }
    Some(&self.nodes.get(node.index, node.generation)?.value)
  }

  /// Resolves a handle to a mutable reference to its value.
  ///
  /// Returns `None` for a detached or foreign handle.

  pub fn get_mut(&mut self, node: NodeRef) -> Option<&mut T> {
    if node.list != self.id {
      return None;
    }
    Some(&mut self.nodes.get_mut(node.index, node.generation)?.value)
  }

  /// Inserts `value` at the front of the list. O(1).
  ///
  /// Returns a handle to the new node.

  pub fn push_front(&mut self, value: T) -> NodeRef {
    let (index, generation) = self.nodes.insert(Node { value, next: self.first });
    self.first = Some(index);
    if self.last.is_none() {
      self.last = Some(index);
    }
    self.count += 1;
    self.handle(index, generation)
  }

  /// Inserts `value` at the back of the list. O(1).
  ///
  /// Returns a handle to the new node. On an empty list this is equivalent
  /// to [`push_front`](Self::push_front); the new node becomes both head and
  /// tail.

  pub fn push_back(&mut self, value: T) -> NodeRef {
    let (index, generation) = self.nodes.insert(Node { value, next: None });
    match self.last {
      Some(tail) => self.node_mut(tail).next = Some(index),
      None => self.first = Some(index),
    }
    self.last = Some(index);
    self.count += 1;
    self.handle(index, generation)
  }

  /// Splices `value` in immediately after the node named by `node`. O(1).
  ///
  /// Returns a handle to the new node. If `node` names the tail, the new
  /// node becomes the tail.
  ///
  /// # Errors
  ///
  /// [`Error::ForeignNode`] if `node` was issued by another list,
  /// [`Error::DetachedNode`] if its node is no longer in this list. The list
  /// is unchanged in both cases.

  pub fn insert_after(&mut self, node: NodeRef, value: T) -> Result<NodeRef, Error> {
    let anchor = self.resolve(node)?;
    let next = self.node(anchor).next;
    let (index, generation) = self.nodes.insert(Node { value, next });
    self.node_mut(anchor).next = Some(index);
    if self.last == Some(anchor) {
      self.last = Some(index);
    }
    self.count += 1;
    Ok(self.handle(index, generation))
  }

  /// Splices `value` in immediately before the node named by `node`.
  ///
  /// Returns a handle to the new node. If `node` names the head this is
  /// [`push_front`](Self::push_front) and runs in O(1); otherwise the
  /// predecessor is found by scanning from the head, which is O(n) — the
  /// chain is singly linked and has no back pointers.
  ///
  /// # Errors
  ///
  /// Same as [`insert_after`](Self::insert_after).

  pub fn insert_before(&mut self, node: NodeRef, value: T) -> Result<NodeRef, Error> {
    let anchor = self.resolve(node)?;
    if self.first == Some(anchor) {
      return Ok(self.push_front(value));
    }
    let prev = self.predecessor(anchor);
    let (index, generation) = self.nodes.insert(Node { value, next: Some(anchor) });
    self.node_mut(prev).next = Some(index);
    self.count += 1;
    Ok(self.handle(index, generation))
  }

  /// Removes and returns the head value. O(1).
  ///
  /// # Errors
  ///
  /// [`Error::EmptyList`] if the list is empty.

  pub fn pop_front(&mut self) -> Result<T, Error> {
    let head = self.first.ok_or(Error::EmptyList)?;
    self.first = self.node(head).next;
    if self.first.is_none() {
      self.last = None;
    }
    self.count -= 1;
    Ok(self.unlink(head))
  }

  /// Removes and returns the tail value.
  ///
  /// O(n): finding the tail's predecessor scans from the head.
  ///
  /// # Errors
  ///
  /// [`Error::EmptyList`] if the list is empty.

  pub fn pop_back(&mut self) -> Result<T, Error> {
    let tail = self.last.ok_or(Error::EmptyList)?;
    if self.first == self.last {
      self.first = None;
      self.last = None;
    } else {
      let prev = self.predecessor(tail);
      self.node_mut(prev).next = None;
      self.last = Some(prev);
    }
    self.count -= 1;
    Ok(self.unlink(tail))
  }

  /// Removes the first node whose value equals `value`. O(n).
  ///
  /// Returns whether a node was removed. Comparison is structural, via
  /// `PartialEq`.

  pub fn remove(&mut self, value: &T) -> bool
  where
    T: PartialEq
  {
    let Some(head) = self.first else { return false };

    if self.node(head).value == *value {
      let _ = self.pop_front();
      return true;
    }

    let mut prev = head;
    let mut cursor = self.node(head).next;

    while let Some(index) = cursor {
      if self.node(index).value == *value {
        let next = self.node(index).next;
        self.node_mut(prev).next = next;
        if next.is_none() {
          self.last = Some(prev);
        }
        self.count -= 1;
        let _ = self.unlink(index);
        return true;
      }
      prev = index;
      cursor = self.node(index).next;
    }

    false
  }

  /// Is some value in the list equal to `value`? O(n).

  pub fn contains(&self, value: &T) -> bool
  where
    T: PartialEq
  {
    self.iter().any(|v| *v == *value)
  }

  /// Removes every node, resetting the list to empty.
  ///
  /// All outstanding handles are invalidated; they resolve to nothing from
  /// here on, even if later insertions reuse their slots.

  pub fn clear(&mut self) {
    self.nodes.clear();
    self.first = None;
    self.last = None;
    self.count = 0;
  }

  /// Iterates the values front to back.
  ///
  /// Each call starts a fresh walk at the head. The iterator borrows the
  /// list, so mutating while iterating is rejected at compile time rather
  /// than left to race with the walk.

  pub fn iter(&self) -> Iter<'_, T> {
    Iter { list: self, cursor: self.first, remaining: self.count }
  }

  /// Iterates `(handle, value)` pairs front to back.

  pub fn nodes(&self) -> Nodes<'_, T> {
    Nodes { list: self, cursor: self.first, remaining: self.count }
  }

  #[inline(always)]
  fn handle(&self, index: u32, generation: u32) -> NodeRef {
    NodeRef { list: self.id, index, generation }
  }

  fn resolve(&self, node: NodeRef) -> Result<u32, Error> {
    if node.list != self.id {
      return Err(Error::ForeignNode);
    }
    if !self.nodes.contains(node.index, node.generation) {
      return Err(Error::DetachedNode);
    }
    Ok(node.index)
  }

  #[inline(always)]
  fn node(&self, index: u32) -> &Node<T> {
    self.nodes.get_raw(index).expect("chain index names an occupied slot")
  }

  #[inline(always)]
  fn node_mut(&mut self, index: u32) -> &mut Node<T> {
    self.nodes.get_raw_mut(index).expect("chain index names an occupied slot")
  }

  fn unlink(&mut self, index: u32) -> T {
    self.nodes.remove(index).expect("unlinked node was occupied").value
  }

  // Index of the node whose `next` is `index`. Caller guarantees `index` is
  // in the chain and is not the head.

  fn predecessor(&self, index: u32) -> u32 {
    let mut cursor = self.first.expect("chain is non-empty");
    loop {
      let next = self.node(cursor).next.expect("scan stays inside the chain");
      if next == index {
        return cursor;
      }
      cursor = next;
    }
  }
}

impl<T> Default for List<T> {
  fn default() -> Self {
    Self::new()
  }
}

impl<T: fmt::Debug> fmt::Debug for List<T> {
  fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
    f.debug_list().entries(self.iter()).finish()
  }
}

impl<T> FromIterator<T> for List<T> {
  fn from_iter<I: IntoIterator<Item = T>>(iter: I) -> Self {
    let mut list = Self::new();
    list.extend(iter);
    list
  }
}

impl<T> Extend<T> for List<T> {
  fn extend<I: IntoIterator<Item = T>>(&mut self, iter: I) {
    for value in iter {
      let _ = self.push_back(value);
    }
  }
}

////////////////////////////////////////////////////////////////////////////////
//                                                                            //
// Iter                                                                       //
//                                                                            //
////////////////////////////////////////////////////////////////////////////////

impl<'a, T> Iterator for Iter<'a, T> {
  type Item = &'a T;

  fn next(&mut self) -> Option<&'a T> {
    let index = self.cursor?;
    let node = self.list.node(index);
    self.cursor = node.next;
    self.remaining -= 1;
    Some(&node.value)
  }

  fn size_hint(&self) -> (usize, Option<usize>) {
    (self.remaining, Some(self.remaining))
  }
}

impl<'a, T> ExactSizeIterator for Iter<'a, T> { }

impl<'a, T> core::iter::FusedIterator for Iter<'a, T> { }

impl<'a, T> IntoIterator for &'a List<T> {
  type Item = &'a T;
  type IntoIter = Iter<'a, T>;

  fn into_iter(self) -> Iter<'a, T> {
    self.iter()
  }
}

////////////////////////////////////////////////////////////////////////////////
//                                                                            //
// Nodes                                                                      //
//                                                                            //
////////////////////////////////////////////////////////////////////////////////

impl<'a, T> Iterator for Nodes<'a, T> {
  type Item = (NodeRef, &'a T);

  fn next(&mut self) -> Option<(NodeRef, &'a T)> {
    let index = self.cursor?;
    let generation = self.list.nodes.generation(index)?;
    let node = self.list.node(index);
    self.cursor = node.next;
    self.remaining -= 1;
    Some((self.list.handle(index, generation), &node.value))
  }

  fn size_hint(&self) -> (usize, Option<usize>) {
    (self.remaining, Some(self.remaining))
  }
}

impl<'a, T> ExactSizeIterator for Nodes<'a, T> { }

impl<'a, T> core::iter::FusedIterator for Nodes<'a, T> { }

////////////////////////////////////////////////////////////////////////////////
//                                                                            //
// IntoIter                                                                   //
//                                                                            //
////////////////////////////////////////////////////////////////////////////////

impl<T> Iterator for IntoIter<T> {
  type Item = T;

  fn next(&mut self) -> Option<T> {
    self.list.pop_front().ok()
  }

  fn size_hint(&self) -> (usize, Option<usize>) {
    (self.list.count, Some(self.list.count))
  }
}

impl<T> ExactSizeIterator for IntoIter<T> { }

impl<T> core::iter::FusedIterator for IntoIter<T> { }

impl<T> IntoIterator for List<T> {
  type Item = T;
  type IntoIter = IntoIter<T>;

  fn into_iter(self) -> IntoIter<T> {
    IntoIter { list: self }
  }
}
