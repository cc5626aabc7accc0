//! Delayed callbacks driven by the host clock
//!
//! The host advances the queue with elapsed milliseconds; due entries come
//! back in deadline order together with the generation they were scheduled
//! under. Engines drop any entry whose generation is stale, so a callback
//! scheduled before a reset can never touch the reinitialized state.

/// A scheduled action
#[derive(Debug, Clone)]
struct Pending<A> {
    due_ms: u64,
    /// Insertion order, breaks ties between equal deadlines
    seq: u64,
    generation: u64,
    action: A,
}

/// A timer that came due
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Fired<A> {
    pub generation: u64,
    pub action: A,
}

/// Deadline-ordered queue of delayed actions
#[derive(Debug, Clone)]
pub struct TimerQueue<A> {
    now_ms: u64,
    next_seq: u64,
    pending: Vec<Pending<A>>,
}

impl<A> Default for TimerQueue<A> {
    fn default() -> Self {
        Self::new()
    }
}

impl<A> TimerQueue<A> {
    pub fn new() -> Self {
        Self {
            now_ms: 0,
            next_seq: 0,
            pending: Vec::new(),
        }
    }

    /// Current queue clock (ms since creation)
    pub fn now_ms(&self) -> u64 {
        self.now_ms
    }

    /// Schedule `action` to fire `delay_ms` from now
    pub fn schedule(&mut self, delay_ms: u64, generation: u64, action: A) {
        let entry = Pending {
            due_ms: self.now_ms + delay_ms,
            seq: self.next_seq,
            generation,
            action,
        };
        self.next_seq += 1;
        // Keep sorted by (due, seq)
        let pos = self
            .pending
            .iter()
            .position(|p| (p.due_ms, p.seq) > (entry.due_ms, entry.seq))
            .unwrap_or(self.pending.len());
        self.pending.insert(pos, entry);
    }

    /// Advance the clock and return every entry that came due, oldest first
    pub fn advance(&mut self, dt_ms: u64) -> Vec<Fired<A>> {
        self.now_ms += dt_ms;
        let due = self
            .pending
            .iter()
            .take_while(|p| p.due_ms <= self.now_ms)
            .count();
        self.pending
            .drain(..due)
            .map(|p| Fired {
                generation: p.generation,
                action: p.action,
            })
            .collect()
    }

    /// Drop every pending entry
    pub fn cancel_all(&mut self) {
        self.pending.clear();
    }

    pub fn is_empty(&self) -> bool {
        self.pending.is_empty()
    }

    pub fn len(&self) -> usize {
        self.pending.len()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_fires_in_deadline_order() {
        let mut q = TimerQueue::new();
        q.schedule(300, 1, "late");
        q.schedule(100, 1, "early");
        q.schedule(100, 1, "early-second");

        assert!(q.advance(50).is_empty());
        let fired: Vec<_> = q.advance(60).into_iter().map(|f| f.action).collect();
        assert_eq!(fired, vec!["early", "early-second"]);
        assert_eq!(q.len(), 1);

        let fired: Vec<_> = q.advance(1000).into_iter().map(|f| f.action).collect();
        assert_eq!(fired, vec!["late"]);
        assert!(q.is_empty());
    }

    #[test]
    fn test_generation_travels_with_entry() {
        let mut q = TimerQueue::new();
        q.schedule(10, 7, ());
        let fired = q.advance(10);
        assert_eq!(fired, vec![Fired { generation: 7, action: () }]);
    }

    #[test]
    fn test_cancel_all() {
        let mut q = TimerQueue::new();
        q.schedule(10, 0, 1u8);
        q.schedule(20, 0, 2u8);
        q.cancel_all();
        assert!(q.advance(100).is_empty());
        assert_eq!(q.now_ms(), 100);
    }
}
