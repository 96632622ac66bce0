//! A circular doubly linked list over an index [`Arena`].
//!
//! The list owns a sentinel slot that never carries a value. Its `next` and
//! `prev` point at the first and last node, or back at itself when the list
//! is empty. Every other slot holds one value and two non owning links.

mod arena;

use allocator_api2::alloc::AllocError;

pub use arena::{Arena, NodeId, Slot};

pub struct List<T> {
    arena: Arena<T>,
    head: NodeId,
}

impl<T> List<T> {
    /// Create an empty list, `limit` bounds the number of value nodes.
    pub fn new(limit: Option<usize>) -> Result<Self, AllocError> {
        // One extra slot for the sentinel.
        let mut arena = Arena::new(limit.map(|limit| limit.saturating_add(1)));

        let head = arena.alloc(Slot::detached(None))?;
        arena[head].prev = head;
        arena[head].next = head;

        Ok(Self { arena, head })
    }

    /// The sentinel.
    pub fn head(&self) -> NodeId {
        self.head
    }

    pub fn is_empty(&self) -> bool {
        self.arena[self.head].next == self.head
    }

    /// Number of value nodes held by the arena, the sentinel is not counted.
    pub fn len(&self) -> usize {
        self.arena.live() - 1
    }

    pub fn first(&self) -> Option<NodeId> {
        Some(self.next(self.head)).filter(|id| *id != self.head)
    }

    pub fn last(&self) -> Option<NodeId> {
        Some(self.prev(self.head)).filter(|id| *id != self.head)
    }

    pub fn next(&self, id: NodeId) -> NodeId {
        self.arena[id].next
    }

    pub fn prev(&self, id: NodeId) -> NodeId {
        self.arena[id].prev
    }

    pub fn set_next(&mut self, id: NodeId, next: NodeId) {
        self.arena[id].next = next;
    }

    pub fn set_prev(&mut self, id: NodeId, prev: NodeId) {
        self.arena[id].prev = prev;
    }

    /// Swap the direction of a single node.
    pub fn flip(&mut self, id: NodeId) {
        let slot = &mut self.arena[id];
        std::mem::swap(&mut slot.next, &mut slot.prev);
    }

    pub fn value(&self, id: NodeId) -> Option<&T> {
        self.arena.get(id).and_then(|slot| slot.value.as_ref())
    }

    pub fn value_mut(&mut self, id: NodeId) -> Option<&mut T> {
        self.arena.get_mut(id).and_then(|slot| slot.value.as_mut())
    }

    pub fn set_value(&mut self, id: NodeId, value: T) {
        self.arena[id].value = Some(value);
    }

    /// Raw slot access, `None` for ids that do not point at a live slot.
    pub fn slot(&self, id: NodeId) -> Option<&Slot<T>> {
        self.arena.get(id)
    }

    /// Allocate an unlinked node without a value.
    pub fn alloc(&mut self) -> Result<NodeId, AllocError> {
        self.arena.alloc(Slot::detached(None))
    }

    /// Free an unlinked node.
    pub fn release(&mut self, id: NodeId) -> Option<T> {
        debug_assert!(id != self.head, "the sentinel is never released");
        self.arena.free(id)
    }

    /// Make sure the next `additional` node allocations succeed.
    pub fn reserve(&mut self, additional: usize) -> Result<(), AllocError> {
        self.arena.reserve(additional)
    }

    /// Splice the unlinked node `id` right after `at`.
    pub fn link_after(&mut self, at: NodeId, id: NodeId) {
        let next = self.next(at);

        self.arena[id].prev = at;
        self.arena[id].next = next;
        self.arena[next].prev = id;
        self.arena[at].next = id;
    }

    /// Splice the unlinked node `id` right before `at`.
    pub fn link_before(&mut self, at: NodeId, id: NodeId) {
        let prev = self.prev(at);
        self.link_after(prev, id);
    }

    pub fn unlink(&mut self, id: NodeId) {
        let prev = self.prev(id);
        let next = self.next(id);

        self.arena[prev].next = next;
        self.arena[next].prev = prev;

        let slot = &mut self.arena[id];
        slot.prev = NodeId::NONE;
        slot.next = NodeId::NONE;
    }

    pub fn move_after(&mut self, at: NodeId, id: NodeId) {
        self.unlink(id);
        self.link_after(at, id);
    }

    pub fn move_before(&mut self, at: NodeId, id: NodeId) {
        self.unlink(id);
        self.link_before(at, id);
    }

    /// Unlink and free a node, returning its value.
    pub fn remove(&mut self, id: NodeId) -> Option<T> {
        self.unlink(id);
        self.release(id)
    }

    pub fn push_front(&mut self, value: T) -> Result<NodeId, AllocError> {
        let id = self.arena.alloc(Slot::detached(Some(value)))?;
        self.link_after(self.head, id);
        Ok(id)
    }

    pub fn push_back(&mut self, value: T) -> Result<NodeId, AllocError> {
        let id = self.arena.alloc(Slot::detached(Some(value)))?;
        self.link_before(self.head, id);
        Ok(id)
    }

    pub fn pop_front(&mut self) -> Option<T> {
        let id = self.first()?;
        self.remove(id)
    }

    pub fn pop_back(&mut self) -> Option<T> {
        let id = self.last()?;
        self.remove(id)
    }

    pub fn clear(&mut self) {
        while self.pop_front().is_some() {}
    }

    /// Find the first node whose value matches `f`.
    pub fn position(&self, mut f: impl FnMut(&T) -> bool) -> Option<NodeId> {
        let mut id = self.next(self.head);

        while id != self.head {
            if self.value(id).map_or(false, &mut f) {
                return Some(id);
            }
            id = self.next(id);
        }

        None
    }

    pub fn iter(&self) -> Iter<'_, T> {
        Iter {
            list: self,
            front: self.next(self.head),
            back: self.prev(self.head),
            done: self.is_empty(),
        }
    }
}

pub struct Iter<'a, T> {
    list: &'a List<T>,
    front: NodeId,
    back: NodeId,
    done: bool,
}

impl<'a, T> Iterator for Iter<'a, T> {
    type Item = &'a T;

    fn next(&mut self) -> Option<&'a T> {
        if self.done {
            return None;
        }

        let id = self.front;
        self.done = id == self.back;
        self.front = self.list.next(id);

        self.list.value(id)
    }
}

impl<'a, T> DoubleEndedIterator for Iter<'a, T> {
    fn next_back(&mut self) -> Option<&'a T> {
        if self.done {
            return None;
        }

        let id = self.back;
        self.done = id == self.front;
        self.back = self.list.prev(id);

        self.list.value(id)
    }
}
