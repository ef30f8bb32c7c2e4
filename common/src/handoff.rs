//! Bounded hand-off queue connecting pools of producer and consumer threads.
//!
//! The queue tracks how many producers are currently registered. Consumers
//! block while the queue is empty and at least one producer is still
//! registered; once the last producer unregisters and the queue drains, every
//! consumer observes the closed signal and can exit. Registration is tied to
//! a [`Producer`] handle so a worker cannot keep enqueueing after it has
//! unregistered, and unregistration fires on every exit path, including
//! panics.
//!
//! ```
//! use common::handoff::HandoffQueue;
//!
//! let queue = HandoffQueue::new(2);
//! {
//!     let producer = queue.producer();
//!     producer.enqueue(1);
//!     producer.enqueue(2);
//! }
//! assert_eq!(queue.dequeue(), Some(1));
//! assert_eq!(queue.dequeue(), Some(2));
//! // last producer is gone and the queue is drained
//! assert_eq!(queue.dequeue(), None);
//! ```

use std::collections::VecDeque;
use std::sync::{Condvar, Mutex};

pub struct HandoffQueue<T> {
    capacity: usize,
    state: Mutex<State<T>>,
    item_ready: Condvar,
    space_ready: Condvar,
}

struct State<T> {
    items: VecDeque<T>,
    producers: usize,
    closed: bool,
}

/// Registration handle for one producer. Dropping the handle unregisters it;
/// when the last handle is dropped all blocked consumers are woken so they
/// can observe closure.
pub struct Producer<'a, T> {
    queue: &'a HandoffQueue<T>,
}

impl<T> HandoffQueue<T> {
    pub fn new(capacity: usize) -> Self {
        assert!(capacity > 0, "hand-off queue capacity must be positive");
        Self {
            capacity,
            state: Mutex::new(State {
                items: VecDeque::with_capacity(capacity),
                producers: 0,
                closed: false,
            }),
            item_ready: Condvar::new(),
            space_ready: Condvar::new(),
        }
    }

    /// Register a new producer. Must be called before the producing worker
    /// starts; registering on a queue that already closed is a caller error.
    pub fn producer(&self) -> Producer<'_, T> {
        let mut state = self.state.lock().expect("hand-off queue mutex poisoned");
        assert!(!state.closed, "producer registered on a closed queue");
        state.producers += 1;
        Producer { queue: self }
    }

    /// Remove the head item, blocking while the queue is empty and producers
    /// remain. Returns `None` once the queue is empty and the last producer
    /// has unregistered; from then on every call returns `None` immediately.
    pub fn dequeue(&self) -> Option<T> {
        let mut state = self.state.lock().expect("hand-off queue mutex poisoned");
        loop {
            if let Some(item) = state.items.pop_front() {
                self.space_ready.notify_one();
                return Some(item);
            }
            if state.producers == 0 {
                // closure is terminal, it never reverts
                state.closed = true;
                return None;
            }
            state = self
                .item_ready
                .wait(state)
                .expect("hand-off queue mutex poisoned");
        }
    }

    pub fn capacity(&self) -> usize {
        self.capacity
    }

    pub fn len(&self) -> usize {
        let state = self.state.lock().expect("hand-off queue mutex poisoned");
        state.items.len()
    }

    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }

    pub fn is_closed(&self) -> bool {
        let state = self.state.lock().expect("hand-off queue mutex poisoned");
        state.closed
    }
}

impl<T> Producer<'_, T> {
    /// Append an item to the tail, blocking while the queue is full.
    pub fn enqueue(&self, item: T) {
        let mut state = self
            .queue
            .state
            .lock()
            .expect("hand-off queue mutex poisoned");
        while state.items.len() == self.queue.capacity {
            state = self
                .queue
                .space_ready
                .wait(state)
                .expect("hand-off queue mutex poisoned");
        }
        state.items.push_back(item);
        self.queue.item_ready.notify_one();
    }
}

impl<T> Drop for Producer<'_, T> {
    fn drop(&mut self) {
        let mut state = self
            .queue
            .state
            .lock()
            .expect("hand-off queue mutex poisoned");
        state.producers -= 1;
        if state.producers == 0 {
            // every blocked consumer must observe closure, not just one
            self.queue.item_ready.notify_all();
        }
    }
}
