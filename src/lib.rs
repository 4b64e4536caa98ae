pub mod queue;

pub use queue::BlockingQueue;
pub use queue::CursorPosition;
pub use queue::Fifo;
pub use queue::MessageQueue;
pub use queue::TileDesc;
pub use queue::TilePolicy;
pub use queue::TileQueue;

use std::collections::VecDeque;

/// One queued message: an opaque byte sequence, compared byte-wise.
pub type Payload = Vec<u8>;

/// Pluggable insertion/removal strategy for [`BlockingQueue`].
///
/// The engine owns the lock and the condition variable; a policy only sees
/// the storage, already under exclusive access. Both hooks default to plain
/// FIFO behaviour.
pub trait QueuePolicy: Send + 'static {
    /// Place `payload` into `queue`. Called with the lock held; must leave
    /// the queue non-empty.
    fn on_insert(&mut self, queue: &mut VecDeque<Payload>, payload: Payload) {
        queue.push_back(payload);
    }

    /// Select and remove the next payload, or `None` when `queue` is empty.
    /// The engine keeps the consumer parked until a call returns `Some`.
    fn on_remove(&mut self, queue: &mut VecDeque<Payload>) -> Option<Payload> {
        queue.pop_front()
    }
}
