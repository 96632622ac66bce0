//! A queue of queues.
//!
//! Every [`QueueContext`] in a [`QueueChain`] owns one [`LinkedQueue`], the
//! chain is what `merge_k` folds into its first queue.

use crate::config::Config;
use crate::list::{List, NodeId};
use crate::queue::LinkedQueue;
use crate::Result;

#[derive(Debug)]
pub struct QueueContext {
    id: usize,
    queue: LinkedQueue,
}

impl QueueContext {
    pub fn id(&self) -> usize {
        self.id
    }

    pub fn queue(&self) -> &LinkedQueue {
        &self.queue
    }

    pub fn queue_mut(&mut self) -> &mut LinkedQueue {
        &mut self.queue
    }
}

pub struct QueueChain {
    contexts: List<QueueContext>,
    config: Config,
    next_id: usize,
}

impl QueueChain {
    pub fn new(config: Config) -> Result<Self> {
        Ok(Self {
            contexts: List::new(None)?,
            config,
            next_id: 0,
        })
    }

    pub fn config(&self) -> &Config {
        &self.config
    }

    pub fn len(&self) -> usize {
        self.contexts.len()
    }

    pub fn is_empty(&self) -> bool {
        self.contexts.is_empty()
    }

    /// Append a new empty queue, returns the id of its context.
    pub fn new_queue(&mut self) -> Result<usize> {
        let queue = LinkedQueue::try_new(&self.config)?;
        let id = self.next_id;

        self.contexts.push_back(QueueContext { id, queue })?;
        self.next_id += 1;

        tracing::debug!(id, "created queue");

        Ok(id)
    }

    pub fn get(&self, id: usize) -> Option<&LinkedQueue> {
        let node = self.contexts.position(|ctx| ctx.id == id)?;
        self.contexts.value(node).map(QueueContext::queue)
    }

    pub fn get_mut(&mut self, id: usize) -> Option<&mut LinkedQueue> {
        let node = self.contexts.position(|ctx| ctx.id == id)?;
        self.contexts.value_mut(node).map(QueueContext::queue_mut)
    }

    pub fn first_mut(&mut self) -> Option<&mut LinkedQueue> {
        let node = self.contexts.first()?;
        self.contexts.value_mut(node).map(QueueContext::queue_mut)
    }

    /// Id of the context following `id`, wrapping around to the first one.
    pub fn next_id_after(&self, id: usize) -> Option<usize> {
        let head = self.contexts.head();
        let node = self.contexts.position(|ctx| ctx.id == id)?;

        let mut next = self.contexts.next(node);
        if next == head {
            next = self.contexts.next(head);
        }

        self.contexts.value(next).map(QueueContext::id)
    }

    /// Free the queue with `id`, returns `false` if there is none.
    pub fn remove(&mut self, id: usize) -> bool {
        match self.contexts.position(|ctx| ctx.id == id) {
            Some(node) => {
                self.contexts.remove(node);
                tracing::debug!(id, "freed queue");
                true
            }
            None => false,
        }
    }

    pub fn iter(&self) -> impl Iterator<Item = &QueueContext> + '_ {
        self.contexts.iter()
    }

    /// Splice every queue into the first one and sort the result.
    ///
    /// The other queues stay in the chain, empty. Room for all moved nodes
    /// is reserved in the first queue before anything moves, so a failure
    /// leaves every queue as it was. Returns the size of the merged queue,
    /// 0 when the chain has no queues.
    pub fn merge_k(&mut self, descending: bool) -> Result<usize> {
        let head = self.contexts.head();
        let first = match self.contexts.first() {
            Some(first) => first,
            None => return Ok(0),
        };

        let incoming: usize = self
            .iter()
            .skip(1)
            .map(|ctx| ctx.queue.node_count())
            .sum();

        // Take the first queue out of the chain while the others drain into it.
        let mut target = match self.contexts.value_mut(first) {
            Some(ctx) => std::mem::take(&mut ctx.queue),
            None => return Ok(0),
        };

        let merged = self.splice_into(&mut target, head, incoming);

        if let Some(ctx) = self.contexts.value_mut(first) {
            ctx.queue = target;
        }
        merged?;

        let queue = match self.contexts.value_mut(first) {
            Some(ctx) => &mut ctx.queue,
            None => return Ok(0),
        };

        queue.sort(descending);
        let size = queue.size();

        tracing::debug!(queues = self.len(), size, descending, "merged queues");

        Ok(size)
    }

    fn splice_into(
        &mut self,
        target: &mut LinkedQueue,
        head: NodeId,
        incoming: usize,
    ) -> Result<()> {
        target.reserve(incoming)?;

        let mut node = self.contexts.next(self.contexts.next(head));
        while node != head {
            if let Some(ctx) = self.contexts.value_mut(node) {
                target.append(&mut ctx.queue)?;
            }
            node = self.contexts.next(node);
        }

        Ok(())
    }
}
