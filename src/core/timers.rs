use fnv::FnvHashSet;
use std::cmp::{Ordering, Reverse};
use std::collections::BinaryHeap;

/// Handle returned by [`TimerQueue::schedule`], used to cancel a task.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct TimerId(u64);

struct Entry<T> {
    due: f64,
    id: TimerId,
    task: T,
}

impl<T> PartialEq for Entry<T> {
    fn eq(&self, other: &Self) -> bool {
        self.cmp(other) == Ordering::Equal
    }
}

impl<T> Eq for Entry<T> {}

impl<T> PartialOrd for Entry<T> {
    fn partial_cmp(&self, other: &Self) -> Option<Ordering> {
        Some(self.cmp(other))
    }
}

impl<T> Ord for Entry<T> {
    // Earlier due first; equal due times fire in scheduling order
    fn cmp(&self, other: &Self) -> Ordering {
        self.due
            .total_cmp(&other.due)
            .then_with(|| self.id.cmp(&other.id))
    }
}

/// Min-heap of cancellable timed tasks, drained cooperatively by the owner.
///
/// Cancellation is lazy: cancelled entries stay in the heap until they reach
/// the top, but they are no longer counted by [`len`](Self::len) and are never
/// returned by [`pop_due`](Self::pop_due).
pub struct TimerQueue<T> {
    heap: BinaryHeap<Reverse<Entry<T>>>,
    live: FnvHashSet<TimerId>,
    next_id: u64,
}

impl<T> Default for TimerQueue<T> {
    fn default() -> Self {
        Self::new()
    }
}

impl<T> TimerQueue<T> {
    pub fn new() -> Self {
        Self {
            heap: BinaryHeap::new(),
            live: FnvHashSet::default(),
            next_id: 0,
        }
    }

    /// Queue `task` to become due at `due` (same clock as `pop_due`).
    pub fn schedule(&mut self, due: f64, task: T) -> TimerId {
        let id = TimerId(self.next_id);
        self.next_id += 1;
        self.heap.push(Reverse(Entry { due, id, task }));
        self.live.insert(id);
        id
    }

    /// Returns `true` if the timer was still pending.
    pub fn cancel(&mut self, id: TimerId) -> bool {
        self.live.remove(&id)
    }

    pub fn cancel_all(&mut self) {
        self.heap.clear();
        self.live.clear();
    }

    /// Pop the earliest pending task whose due time is `<= now`.
    pub fn pop_due(&mut self, now: f64) -> Option<(TimerId, T)> {
        loop {
            let due = self.heap.peek()?.0.due;
            let live = self.live.contains(&self.heap.peek()?.0.id);
            if live && due > now {
                return None;
            }
            let Reverse(entry) = self.heap.pop()?;
            if self.live.remove(&entry.id) {
                return Some((entry.id, entry.task));
            }
        }
    }

    /// Due time of the earliest pending task.
    pub fn next_due(&mut self) -> Option<f64> {
        while let Some(Reverse(top)) = self.heap.peek() {
            if self.live.contains(&top.id) {
                return Some(top.due);
            }
            self.heap.pop();
        }
        None
    }

    /// Number of pending (not cancelled, not fired) tasks.
    pub fn len(&self) -> usize {
        self.live.len()
    }

    pub fn is_empty(&self) -> bool {
        self.live.is_empty()
    }
}
