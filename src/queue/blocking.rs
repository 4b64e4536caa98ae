// Thread-safe blocking FIFO message queue.
//
// One mutex guards the storage together with whatever state the policy
// keeps; one condition variable covers the single wait condition
// "queue non-empty". Producers never block, the consumer parks in `get`
// until content arrives.

use crate::{Payload, QueuePolicy};
use parking_lot::{Condvar, Mutex};
use std::collections::VecDeque;

struct State<P> {
    queue: VecDeque<Payload>,
    policy: P,
}

/// Generic blocking queue engine; scheduling behaviour is supplied by a
/// [`QueuePolicy`].
pub struct BlockingQueue<P> {
    state: Mutex<State<P>>,
    not_empty: Condvar,
}

/// Pure FIFO policy, both hooks keep their trait defaults.
#[derive(Debug, Clone, Copy, Default)]
pub struct Fifo;

impl QueuePolicy for Fifo {}

/// Plain FIFO byte-message queue.
pub type MessageQueue = BlockingQueue<Fifo>;

impl<P: QueuePolicy> BlockingQueue<P> {
    pub fn with_policy(policy: P) -> Self {
        Self {
            state: Mutex::new(State {
                queue: VecDeque::new(),
                policy,
            }),
            not_empty: Condvar::new(),
        }
    }

    /// Insert one message and wake a waiting consumer. Never blocks the
    /// caller.
    pub fn put(&self, payload: impl Into<Payload>) {
        let mut guard = self.state.lock();
        let state = &mut *guard;
        state.policy.on_insert(&mut state.queue, payload.into());
        self.not_empty.notify_one();
    }

    /// Remove and return the next message as selected by the policy.
    ///
    /// Parks the calling thread while the queue is empty; only a later
    /// `put` releases it. Concurrent callers are race-free and each
    /// obtain one distinct message.
    pub fn get(&self) -> Payload {
        let mut guard = self.state.lock();
        loop {
            let state = &mut *guard;
            if let Some(payload) = state.policy.on_remove(&mut state.queue) {
                return payload;
            }
            self.not_empty.wait(&mut guard);
        }
    }

    /// Drop every pending message. Policy state survives; consumers
    /// already parked in [`get`](Self::get) stay parked.
    pub fn clear(&self) {
        self.state.lock().queue.clear();
    }

    /// Remove every pending message matching `pred`, keeping the relative
    /// order of the survivors.
    pub fn remove_if<F>(&self, mut pred: F)
    where
        F: FnMut(&[u8]) -> bool,
    {
        self.state.lock().queue.retain(|payload| !pred(payload));
    }

    pub fn len(&self) -> usize {
        self.state.lock().queue.len()
    }

    pub fn is_empty(&self) -> bool {
        self.state.lock().queue.is_empty()
    }

    /// Run `f` on the policy under the queue lock.
    pub(crate) fn policy_mut<R>(&self, f: impl FnOnce(&mut P) -> R) -> R {
        f(&mut self.state.lock().policy)
    }
}

impl<P: QueuePolicy + Default> BlockingQueue<P> {
    pub fn new() -> Self {
        Self::with_policy(P::default())
    }
}

impl<P: QueuePolicy + Default> Default for BlockingQueue<P> {
    fn default() -> Self {
        Self::new()
    }
}
