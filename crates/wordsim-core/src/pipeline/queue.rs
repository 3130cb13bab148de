//! Unbounded work queue with pool termination detection.
//!
//! A [`WorkQueue`] is drained by a pool of workers, each holding a
//! [`PoolMember`]. Work may come from two places: the pool's own members
//! (a directory walker finds more directories) and registered upstream
//! producers ([`ProducerHandle`]; every directory walker holds one for the
//! file queue).
//!
//! A member moves between three states:
//!
//! - ACTIVE: it holds an item it dequeued. Its first dequeue of a busy period
//!   bumps the queue's active count.
//! - IDLE-WAITING: it found the queue empty while other members are active or
//!   producers are registered, so more work may still arrive. It blocks on
//!   the queue's condition variable.
//! - DRAINED: the queue is empty, no member is active and no producer is
//!   registered. The first member to see this marks the queue drained and
//!   wakes everyone else, who then observe the flag and exit too.
//!
//! Every field read by the drain predicate (items, active count, producer
//! count) lives behind the same mutex, every change to them happens under that
//! mutex before the condition variable is signalled, and waiters re-check the
//! predicate after every wake-up. A producer releasing its handle is
//! therefore published atomically with respect to a consumer's empty check,
//! which is what lets the file pool depend on the directory pool's state
//! without a second lock.

use std::collections::VecDeque;
use std::sync::{Condvar, Mutex, MutexGuard, PoisonError};
use tracing::{debug, trace};

struct QueueState<T> {
    items: VecDeque<T>,
    active: usize,
    producers: usize,
    drained: bool,
    pushed: u64,
    popped: u64,
    peak_len: usize,
}

/// Counters gathered over the life of a queue.
#[derive(Debug, Default, Clone, Copy, PartialEq, Eq)]
pub struct QueueStats {
    pub pushed: u64,
    pub popped: u64,
    pub peak_len: usize,
}

pub struct WorkQueue<T> {
    name: &'static str,
    state: Mutex<QueueState<T>>,
    changed: Condvar,
}

impl<T> WorkQueue<T> {
    pub fn new(name: &'static str) -> Self {
        Self {
            name,
            state: Mutex::new(QueueState {
                items: VecDeque::new(),
                active: 0,
                producers: 0,
                drained: false,
                pushed: 0,
                popped: 0,
                peak_len: 0,
            }),
            changed: Condvar::new(),
        }
    }

    pub fn name(&self) -> &'static str {
        self.name
    }

    // A worker that panicked is reported when its thread is joined; the queue
    // state itself is never left half-updated, so keep going on poison.
    fn lock(&self) -> MutexGuard<'_, QueueState<T>> {
        self.state.lock().unwrap_or_else(PoisonError::into_inner)
    }

    /// Append `item` at the tail and wake one idle member.
    pub fn push(&self, item: T) {
        {
            let mut state = self.lock();
            debug_assert!(!state.drained, "push into drained queue '{}'", self.name);
            state.items.push_back(item);
            state.pushed += 1;
            state.peak_len = state.peak_len.max(state.items.len());
        }
        self.changed.notify_one();
    }

    /// Remove the head item without taking part in termination tracking.
    pub fn try_pop(&self) -> Option<T> {
        let mut state = self.lock();
        let item = state.items.pop_front();
        if item.is_some() {
            state.popped += 1;
        }
        item
    }

    /// Register an upstream producer. The queue cannot drain until every
    /// handle returned here has been dropped. Register producers before the
    /// draining pool starts, or the pool may drain before they arrive.
    pub fn producer(&self) -> ProducerHandle<'_, T> {
        self.lock().producers += 1;
        ProducerHandle { queue: self }
    }

    /// A membership slot for one worker of the draining pool.
    pub fn member(&self) -> PoolMember<'_, T> {
        PoolMember {
            queue: self,
            active: false,
        }
    }

    pub fn len(&self) -> usize {
        self.lock().items.len()
    }

    pub fn is_empty(&self) -> bool {
        self.lock().items.is_empty()
    }

    pub fn active_workers(&self) -> usize {
        self.lock().active
    }

    pub fn is_drained(&self) -> bool {
        self.lock().drained
    }

    pub fn stats(&self) -> QueueStats {
        let state = self.lock();
        QueueStats {
            pushed: state.pushed,
            popped: state.popped,
            peak_len: state.peak_len,
        }
    }
}

/// Keeps a queue open while an upstream producer may still push to it.
pub struct ProducerHandle<'q, T> {
    queue: &'q WorkQueue<T>,
}

impl<'q, T> ProducerHandle<'q, T> {
    pub fn push(&self, item: T) {
        self.queue.push(item);
    }
}

impl<'q, T> Drop for ProducerHandle<'q, T> {
    fn drop(&mut self) {
        let remaining = {
            let mut state = self.queue.lock();
            state.producers -= 1;
            state.producers
        };
        if remaining == 0 {
            trace!("Queue '{}': last producer released", self.queue.name);
            self.queue.changed.notify_all();
        }
    }
}

/// One worker's view of the pool draining a queue.
pub struct PoolMember<'q, T> {
    queue: &'q WorkQueue<T>,
    active: bool,
}

impl<'q, T> PoolMember<'q, T> {
    /// Block until an item is available or the pool has drained.
    ///
    /// `None` means DRAINED: the queue is empty, no member holds work and no
    /// producer is registered, so no item can ever arrive again.
    pub fn next(&mut self) -> Option<T> {
        let queue = self.queue;
        let mut state = queue.lock();
        loop {
            if let Some(item) = state.items.pop_front() {
                state.popped += 1;
                if !self.active {
                    self.active = true;
                    state.active += 1;
                }
                return Some(item);
            }

            if self.active {
                self.active = false;
                state.active -= 1;
                if state.active == 0 {
                    queue.changed.notify_all();
                }
            }

            if state.drained {
                return None;
            }

            if state.active == 0 && state.producers == 0 {
                state.drained = true;
                debug!(
                    "Queue '{}' drained after {} items",
                    queue.name, state.popped
                );
                queue.changed.notify_all();
                return None;
            }

            state = queue
                .changed
                .wait(state)
                .unwrap_or_else(PoisonError::into_inner);
        }
    }

    pub fn is_active(&self) -> bool {
        self.active
    }
}

impl<'q, T> Drop for PoolMember<'q, T> {
    // Reached with `active` still set only when a worker unwinds mid-item.
    fn drop(&mut self) {
        if !self.active {
            return;
        }
        let idle = {
            let mut state = self.queue.lock();
            state.active -= 1;
            state.active == 0
        };
        if idle {
            self.queue.changed.notify_all();
        }
    }
}
