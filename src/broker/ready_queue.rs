//! FIFO of idle workers.

use std::collections::{HashMap, VecDeque};

use crate::broker::WorkerId;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum WorkerState {
    /// Waiting in the queue for a request.
    Idle,
    /// Handling a request; not in the queue.
    Busy,
}

/// Ready workers in the order they became ready.
///
/// A worker is in the queue at most once and is only handed out while
/// idle, so it never has more than one request outstanding.
#[derive(Debug, Default)]
pub struct ReadyQueue {
    queue: VecDeque<WorkerId>,
    states: HashMap<WorkerId, WorkerState>,
}

impl ReadyQueue {
    pub fn new() -> Self {
        Self::default()
    }

    /// Queue `worker` as ready. Returns false if it was already idle.
    pub fn mark_ready(&mut self, worker: WorkerId) -> bool {
        match self.states.get(&worker) {
            Some(WorkerState::Idle) => false,
            _ => {
                self.states.insert(worker.clone(), WorkerState::Idle);
                self.queue.push_back(worker);
                true
            }
        }
    }

    /// Take the longest-waiting idle worker and mark it busy.
    pub fn next(&mut self) -> Option<WorkerId> {
        let worker = self.queue.pop_front()?;
        self.states.insert(worker.clone(), WorkerState::Busy);
        Some(worker)
    }

    /// Forget a worker that can no longer be reached.
    pub fn remove(&mut self, worker: &WorkerId) {
        self.states.remove(worker);
        self.queue.retain(|w| w != worker);
    }

    pub fn state(&self, worker: &WorkerId) -> Option<WorkerState> {
        self.states.get(worker).copied()
    }

    pub fn idle(&self) -> usize {
        self.queue.len()
    }

    /// Workers that announced themselves and were not removed.
    pub fn known(&self) -> usize {
        self.states.len()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn id(name: &str) -> WorkerId {
        WorkerId::from(name)
    }

    #[test]
    fn workers_are_handed_out_in_arrival_order() {
        let mut queue = ReadyQueue::new();
        assert!(queue.mark_ready(id("w1")));
        assert!(queue.mark_ready(id("w2")));

        assert_eq!(queue.next(), Some(id("w1")));
        assert!(queue.mark_ready(id("w1")));
        assert_eq!(queue.next(), Some(id("w2")));
        assert_eq!(queue.next(), Some(id("w1")));
        assert_eq!(queue.next(), None);
    }

    #[test]
    fn duplicate_ready_is_ignored() {
        let mut queue = ReadyQueue::new();
        assert!(queue.mark_ready(id("w1")));
        assert!(!queue.mark_ready(id("w1")));
        assert_eq!(queue.idle(), 1);

        assert_eq!(queue.next(), Some(id("w1")));
        assert_eq!(queue.state(&id("w1")), Some(WorkerState::Busy));
        assert_eq!(queue.next(), None);
    }

    #[test]
    fn removed_worker_leaves_the_queue() {
        let mut queue = ReadyQueue::new();
        queue.mark_ready(id("w1"));
        queue.mark_ready(id("w2"));
        queue.remove(&id("w1"));

        assert_eq!(queue.known(), 1);
        assert_eq!(queue.next(), Some(id("w2")));
        assert_eq!(queue.state(&id("w1")), None);
    }
}
