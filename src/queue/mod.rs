//! The string queue and the algorithms that rewire it in place.

mod sort;
#[cfg(test)]
mod test;

use std::cmp::Ordering;
use std::fmt;

use allocator_api2::alloc::AllocError;

use crate::config::Config;
use crate::list::{List, NodeId};
use crate::{Error, Result};

/// A node that was removed from a [`LinkedQueue`], the caller owns it from
/// here on.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Element {
    value: String,
}

impl Element {
    pub fn value(&self) -> &str {
        &self.value
    }

    pub fn into_value(self) -> String {
        self.value
    }
}

/// A circular doubly linked queue of owned strings.
pub struct LinkedQueue {
    list: List<String>,
    value_limit: Option<usize>,
}

impl LinkedQueue {
    /// Create an unbounded queue.
    pub fn new() -> Self {
        Self {
            list: List::new(None)
                .unwrap_or_else(|_| std::alloc::handle_alloc_error(sentinel_layout())),
            value_limit: None,
        }
    }

    /// Create a queue bounded by `config`, fails if the sentinel could not be
    /// allocated.
    pub fn try_new(config: &Config) -> Result<Self> {
        let list = List::new(config.node_limit)?;

        Ok(Self {
            list,
            value_limit: config.value_limit,
        })
    }

    pub fn is_empty(&self) -> bool {
        self.list.is_empty()
    }

    /// Count the nodes by walking the queue.
    pub fn size(&self) -> usize {
        self.iter().count()
    }

    pub fn front(&self) -> Option<&str> {
        self.list.first().and_then(|id| self.payload(id))
    }

    pub fn back(&self) -> Option<&str> {
        self.list.last().and_then(|id| self.payload(id))
    }

    pub fn iter(&self) -> impl DoubleEndedIterator<Item = &str> + '_ {
        self.list.iter().map(String::as_str)
    }

    pub fn values(&self) -> Vec<String> {
        self.iter().map(str::to_owned).collect()
    }

    /// Free every element, the queue itself stays usable.
    pub fn clear(&mut self) {
        self.list.clear();
    }

    pub fn insert_head(&mut self, s: &str) -> Result<()> {
        let head = self.list.head();
        let id = self.new_node(s)?;
        self.list.link_after(head, id);

        tracing::trace!(value = s, "inserted at head");

        Ok(())
    }

    pub fn insert_tail(&mut self, s: &str) -> Result<()> {
        let head = self.list.head();
        let id = self.new_node(s)?;
        self.list.link_before(head, id);

        tracing::trace!(value = s, "inserted at tail");

        Ok(())
    }

    /// Allocate a node and fill it with a copy of `s`.
    ///
    /// If copying the string fails the node is released again, so a failed
    /// insert leaves the queue untouched.
    fn new_node(&mut self, s: &str) -> Result<NodeId> {
        let id = self.list.alloc().map_err(|e| {
            tracing::warn!(len = self.list.len(), "node allocation failed");
            e
        })?;

        match duplicate(s, self.value_limit) {
            Ok(value) => {
                self.list.set_value(id, value);
                Ok(id)
            }
            Err(e) => {
                tracing::warn!(bytes = s.len(), "string duplication failed");
                self.list.release(id);
                Err(e.into())
            }
        }
    }

    /// Detach the first element.
    ///
    /// When `buf` is given, up to `buf.len() - 1` bytes of the value are
    /// copied into it followed by a NUL byte. The cut is made on bytes, a
    /// multibyte character may be split.
    pub fn remove_head(&mut self, buf: Option<&mut [u8]>) -> Option<Element> {
        let id = self.list.first()?;
        self.detach(id, buf)
    }

    /// Detach the last element, see [`LinkedQueue::remove_head`].
    pub fn remove_tail(&mut self, buf: Option<&mut [u8]>) -> Option<Element> {
        let id = self.list.last()?;
        self.detach(id, buf)
    }

    fn detach(&mut self, id: NodeId, buf: Option<&mut [u8]>) -> Option<Element> {
        let value = self.list.remove(id)?;

        if let Some(buf) = buf {
            copy_to_buf(&value, buf);
        }

        tracing::trace!(value = %value, "removed");

        Some(Element { value })
    }

    /// Delete the middle node, for an even length the later of the two
    /// middle candidates. Returns `false` on an empty queue.
    pub fn delete_middle(&mut self) -> bool {
        let head = self.list.head();
        if self.list.is_empty() {
            return false;
        }

        let mut slow = self.list.next(head);
        let mut fast = slow;

        while fast != head && self.list.next(fast) != head {
            slow = self.list.next(slow);
            fast = self.list.next(self.list.next(fast));
        }

        self.list.remove(slow);

        true
    }

    /// Delete every node of each run of equal values, keeping only values
    /// that occur once.
    ///
    /// The queue has to be sorted, ascending or descending. An unsorted queue
    /// is rejected with [`Error::Unsorted`] before anything is removed.
    pub fn delete_duplicates(&mut self) -> Result<bool> {
        if self.list.is_empty() {
            return Ok(false);
        }

        self.ensure_sorted()?;

        let head = self.list.head();
        let mut id = self.list.next(head);
        let mut in_run = false;
        let mut removed = 0;

        while id != head {
            let next = self.list.next(id);
            let dup = next != head && self.list.value(id) == self.list.value(next);

            if dup || in_run {
                self.list.remove(id);
                removed += 1;
            }

            in_run = dup;
            id = next;
        }

        tracing::debug!(removed, "deleted duplicates");

        Ok(true)
    }

    fn ensure_sorted(&self) -> Result<()> {
        let mut direction = Ordering::Equal;

        for (index, (a, b)) in self.iter().zip(self.iter().skip(1)).enumerate() {
            match (direction, a.cmp(b)) {
                (_, Ordering::Equal) => {}
                (Ordering::Equal, ord) => direction = ord,
                (dir, ord) if dir != ord => return Err(Error::Unsorted { index: index + 1 }),
                _ => {}
            }
        }

        Ok(())
    }

    /// Swap every two adjacent nodes, a trailing odd node stays in place.
    pub fn swap_pairs(&mut self) {
        let head = self.list.head();
        let mut left = self.list.next(head);

        while left != head {
            let right = self.list.next(left);
            if right == head {
                break;
            }

            self.list.move_before(left, right);
            left = self.list.next(left);
        }
    }

    /// Reverse the queue by flipping the links of every node, sentinel
    /// included.
    pub fn reverse(&mut self) {
        if self.list.is_empty() {
            return;
        }

        let head = self.list.head();
        let mut id = head;

        loop {
            let next = self.list.next(id);
            self.list.flip(id);
            id = next;

            if id == head {
                break;
            }
        }
    }

    /// Reverse every consecutive run of `k` nodes, a final run shorter than
    /// `k` is left as is.
    pub fn reverse_k_group(&mut self, k: usize) {
        if k <= 1 || self.list.is_empty() {
            return;
        }

        let head = self.list.head();
        let mut anchor = head;

        loop {
            let mut probe = self.list.next(anchor);
            let mut count = 0;
            while count < k && probe != head {
                probe = self.list.next(probe);
                count += 1;
            }

            if count < k {
                break;
            }

            // Pull each following node of the run to the front of the run,
            // the old first node ends up last and anchors the next run.
            let first = self.list.next(anchor);
            for _ in 1..k {
                let id = self.list.next(first);
                self.list.move_after(anchor, id);
            }

            anchor = first;
        }
    }

    /// Stable merge sort of the values in byte order.
    pub fn sort(&mut self, descending: bool) {
        sort::sort(&mut self.list, descending);

        tracing::debug!(descending, "sorted queue");
    }

    /// Keep only nodes that no later node undercuts, leaving a non
    /// decreasing queue. Returns the new size.
    pub fn ascend(&mut self) -> usize {
        self.retain_monotonic(Ordering::Greater)
    }

    /// Keep only nodes that no later node exceeds, leaving a non increasing
    /// queue. Returns the new size.
    pub fn descend(&mut self) -> usize {
        self.retain_monotonic(Ordering::Less)
    }

    // Walks from the tail, removing every node that compares as `discard`
    // against the running extreme seen so far.
    fn retain_monotonic(&mut self, discard: Ordering) -> usize {
        let head = self.list.head();
        let mut extreme = match self.list.last() {
            Some(id) => id,
            None => return 0,
        };

        let mut id = self.list.prev(extreme);
        let mut removed = 0;

        while id != head {
            let prev = self.list.prev(id);

            if self.list.value(id).cmp(&self.list.value(extreme)) == discard {
                self.list.remove(id);
                removed += 1;
            } else {
                extreme = id;
            }

            id = prev;
        }

        tracing::debug!(removed, ?discard, "monotonic filter");

        self.size()
    }

    /// Move every element of `other` to the back of this queue, leaving
    /// `other` empty.
    ///
    /// Room for the moved nodes is reserved up front, if that fails neither
    /// queue is touched.
    pub fn append(&mut self, other: &mut LinkedQueue) -> Result<()> {
        self.reserve(other.list.len())?;

        while let Some(value) = other.list.pop_front() {
            self.list.push_back(value)?;
        }

        Ok(())
    }

    pub(crate) fn reserve(&mut self, additional: usize) -> Result<()> {
        self.list.reserve(additional).map_err(|e| {
            tracing::warn!(additional, "unable to reserve queue nodes");
            Error::from(e)
        })
    }

    pub(crate) fn node_count(&self) -> usize {
        self.list.len()
    }

    /// Verify the link structure.
    ///
    /// A slow and a fast cursor walk the `next` links; the fast one has to
    /// come back around to the sentinel before the two meet, otherwise the
    /// chain loops without passing through the sentinel. After that every
    /// node must be pointed back at by its successor.
    pub fn check(&self) -> Result<()> {
        let head = self.list.head();
        let step = |id: NodeId| {
            self.list
                .slot(id)
                .map(|slot| slot.next)
                .filter(|next| self.list.slot(*next).is_some())
                .ok_or_else(|| Error::Corrupt(format!("dangling next link at node {}", id)))
        };

        let mut slow = head;
        let mut fast = head;

        'walk: loop {
            for _ in 0..2 {
                fast = step(fast)?;
                if fast == head {
                    break 'walk;
                }
            }

            slow = step(slow)?;
            if slow == fast {
                return Err(Error::Corrupt(format!(
                    "cycle at node {} does not pass through the sentinel",
                    slow
                )));
            }
        }

        let mut count = 0;
        let mut id = head;

        loop {
            let next = step(id)?;
            let back = self.list.slot(next).map(|slot| slot.prev);

            if back != Some(id) {
                return Err(Error::Corrupt(format!(
                    "node {} is not linked back to {}",
                    next, id
                )));
            }

            if next == head {
                break;
            }

            if self.list.value(next).is_none() {
                return Err(Error::Corrupt(format!("node {} has no value", next)));
            }

            count += 1;
            id = next;
        }

        if self.list.value(head).is_some() {
            return Err(Error::Corrupt("sentinel carries a value".to_string()));
        }

        if count != self.list.len() {
            return Err(Error::Corrupt(format!(
                "{} nodes reachable but {} allocated",
                count,
                self.list.len()
            )));
        }

        Ok(())
    }

    fn payload(&self, id: NodeId) -> Option<&str> {
        self.list.value(id).map(String::as_str)
    }

    #[cfg(test)]
    pub(crate) fn list_mut(&mut self) -> &mut List<String> {
        &mut self.list
    }
}

impl Default for LinkedQueue {
    fn default() -> Self {
        Self::new()
    }
}

impl fmt::Debug for LinkedQueue {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_list().entries(self.iter()).finish()
    }
}

impl<S: AsRef<str>> FromIterator<S> for LinkedQueue {
    fn from_iter<I: IntoIterator<Item = S>>(iter: I) -> Self {
        let mut queue = LinkedQueue::new();
        for s in iter {
            if queue.insert_tail(s.as_ref()).is_err() {
                std::alloc::handle_alloc_error(sentinel_layout());
            }
        }
        queue
    }
}

/// Copy `s` into freshly reserved storage without aborting on failure.
fn duplicate(s: &str, limit: Option<usize>) -> std::result::Result<String, AllocError> {
    if limit.map_or(false, |limit| s.len() > limit) {
        return Err(AllocError);
    }

    let mut value = String::new();
    value.try_reserve_exact(s.len()).map_err(|_| AllocError)?;
    value.push_str(s);

    Ok(value)
}

fn copy_to_buf(value: &str, buf: &mut [u8]) {
    if buf.is_empty() {
        return;
    }

    let n = value.len().min(buf.len() - 1);
    buf[..n].copy_from_slice(&value.as_bytes()[..n]);
    buf[n..].fill(0);
}

fn sentinel_layout() -> std::alloc::Layout {
    std::alloc::Layout::new::<crate::list::Slot<String>>()
}
