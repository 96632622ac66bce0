use std::{fmt, ops::Index, ops::IndexMut};

use allocator_api2::alloc::AllocError;

/// Index of a slot inside an [`Arena`].
#[derive(Debug, Clone, Copy, Hash, Eq, PartialEq)]
pub struct NodeId(usize);

impl NodeId {
    /// Terminates a chain whose circularity has been broken.
    pub const NONE: NodeId = NodeId(usize::MAX);

    pub fn is_none(self) -> bool {
        self == NodeId::NONE
    }
}

impl fmt::Display for NodeId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        if self.is_none() {
            write!(f, "none")
        } else {
            write!(f, "{}", self.0)
        }
    }
}

/// A node in the arena, a slot without a value is a sentinel (or a node
/// that has not been filled in yet).
#[derive(Debug)]
pub struct Slot<T> {
    pub prev: NodeId,
    pub next: NodeId,
    pub value: Option<T>,
}

impl<T> Slot<T> {
    pub fn detached(value: Option<T>) -> Self {
        Self {
            prev: NodeId::NONE,
            next: NodeId::NONE,
            value,
        }
    }
}

#[derive(Debug)]
enum Entry<T> {
    Occupied(Slot<T>),
    // Vacant entries form the free list.
    Vacant(Option<usize>),
}

/// Growable slot storage that hands out stable indices.
///
/// Freed slots are chained through the vacant entries and reused before the
/// backing storage grows. An optional `limit` caps the number of live slots,
/// past it `alloc` fails the same way a failed reservation does.
#[derive(Debug)]
pub struct Arena<T> {
    entries: Vec<Entry<T>>,
    free_head: Option<usize>,
    len: usize,
    limit: Option<usize>,
}

impl<T> Arena<T> {
    pub fn new(limit: Option<usize>) -> Self {
        Self {
            entries: Vec::new(),
            free_head: None,
            len: 0,
            limit,
        }
    }

    /// Number of live slots.
    pub fn live(&self) -> usize {
        self.len
    }

    pub fn limit(&self) -> Option<usize> {
        self.limit
    }

    pub fn alloc(&mut self, slot: Slot<T>) -> Result<NodeId, AllocError> {
        if self.limit.map_or(false, |limit| self.len >= limit) {
            return Err(AllocError);
        }

        let idx = match self.free_head {
            Some(idx) => {
                self.free_head = match self.entries[idx] {
                    Entry::Vacant(next) => next,
                    Entry::Occupied(_) => unreachable!("free list points at live slot {}", idx),
                };
                self.entries[idx] = Entry::Occupied(slot);
                idx
            }
            None => {
                self.entries.try_reserve(1).map_err(|_| AllocError)?;
                self.entries.push(Entry::Occupied(slot));
                self.entries.len() - 1
            }
        };

        self.len += 1;

        Ok(NodeId(idx))
    }

    /// Make sure the next `additional` calls to `alloc` succeed.
    pub fn reserve(&mut self, additional: usize) -> Result<(), AllocError> {
        let wanted = self.len.checked_add(additional).ok_or(AllocError)?;

        if self.limit.map_or(false, |limit| wanted > limit) {
            return Err(AllocError);
        }

        let vacant = self.entries.len() - self.len;
        let grow = additional.saturating_sub(vacant);

        self.entries.try_reserve(grow).map_err(|_| AllocError)
    }

    /// Release a slot, handing back its value.
    pub fn free(&mut self, id: NodeId) -> Option<T> {
        match self.entries.get(id.0) {
            Some(Entry::Occupied(_)) => {}
            _ => return None,
        }

        let entry = std::mem::replace(&mut self.entries[id.0], Entry::Vacant(self.free_head));
        self.free_head = Some(id.0);
        self.len -= 1;

        match entry {
            Entry::Occupied(slot) => slot.value,
            Entry::Vacant(_) => None,
        }
    }

    pub fn get(&self, id: NodeId) -> Option<&Slot<T>> {
        match self.entries.get(id.0) {
            Some(Entry::Occupied(slot)) => Some(slot),
            _ => None,
        }
    }

    pub fn get_mut(&mut self, id: NodeId) -> Option<&mut Slot<T>> {
        match self.entries.get_mut(id.0) {
            Some(Entry::Occupied(slot)) => Some(slot),
            _ => None,
        }
    }
}

impl<T> Index<NodeId> for Arena<T> {
    type Output = Slot<T>;

    fn index(&self, id: NodeId) -> &Slot<T> {
        match self.get(id) {
            Some(slot) => slot,
            None => panic!("no live slot at `{}`", id),
        }
    }
}

impl<T> IndexMut<NodeId> for Arena<T> {
    fn index_mut(&mut self, id: NodeId) -> &mut Slot<T> {
        match self.get_mut(id) {
            Some(slot) => slot,
            None => panic!("no live slot at `{}`", id),
        }
    }
}
