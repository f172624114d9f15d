use std::collections::BTreeMap;

use foundation::time::Timestamp;

/// Identifies a scheduled timer in a stable way.
///
/// Tokens are never reused, so a holder can tell a stale firing from the one
/// it is actually waiting on by simple equality.
#[derive(Debug, Copy, Clone, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub struct TimerToken(pub u64);

/// Deterministic one-shot timer queue.
///
/// Key properties:
/// - Cancellation removes the entry; a cancelled token can never fire.
/// - `fire_due` yields due tokens ordered by `(deadline, token)`, so
///   interleavings are replayable in tests.
/// - Firing is the queue's only side effect; whether a firing is still
///   meaningful is for the holder to re-validate (hover keeps the token it
///   is waiting on and ignores any other).
#[derive(Debug, Default)]
pub struct TimerQueue {
    next_id: u64,
    pending: BTreeMap<TimerToken, Timestamp>,
}

impl TimerQueue {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn schedule(&mut self, now: Timestamp, delay_ms: f64) -> TimerToken {
        let token = TimerToken(self.next_id);
        self.next_id = self.next_id.wrapping_add(1);
        self.pending.insert(token, now.after_ms(delay_ms));
        token
    }

    /// Returns `true` if the timer was still pending and was cancelled.
    pub fn cancel(&mut self, token: TimerToken) -> bool {
        self.pending.remove(&token).is_some()
    }

    pub fn is_pending(&self, token: TimerToken) -> bool {
        self.pending.contains_key(&token)
    }

    pub fn len(&self) -> usize {
        self.pending.len()
    }

    pub fn is_empty(&self) -> bool {
        self.pending.is_empty()
    }

    /// Remove and return every timer whose deadline has passed.
    pub fn fire_due(&mut self, now: Timestamp) -> Vec<TimerToken> {
        let mut due: Vec<(Timestamp, TimerToken)> = self
            .pending
            .iter()
            .filter(|(_, deadline)| now >= **deadline)
            .map(|(token, deadline)| (*deadline, *token))
            .collect();
        due.sort_by(|(da, ta), (db, tb)| da.0.total_cmp(&db.0).then_with(|| ta.cmp(tb)));

        for (_, token) in &due {
            self.pending.remove(token);
        }
        due.into_iter().map(|(_, token)| token).collect()
    }
}

#[cfg(test)]
mod tests {
    use super::TimerQueue;
    use foundation::time::Timestamp;

    #[test]
    fn fires_only_after_deadline() {
        let mut q = TimerQueue::new();
        let t = q.schedule(Timestamp(0.0), 200.0);
        assert!(q.fire_due(Timestamp(199.0)).is_empty());
        assert_eq!(q.fire_due(Timestamp(200.0)), vec![t]);
        assert!(q.fire_due(Timestamp(500.0)).is_empty());
    }

    #[test]
    fn cancelled_timer_never_fires() {
        let mut q = TimerQueue::new();
        let t = q.schedule(Timestamp(0.0), 100.0);
        assert!(q.cancel(t));
        assert!(!q.cancel(t));
        assert!(q.fire_due(Timestamp(1000.0)).is_empty());
    }

    #[test]
    fn due_timers_fire_in_deadline_then_token_order() {
        let mut q = TimerQueue::new();
        let slow = q.schedule(Timestamp(0.0), 300.0);
        let fast = q.schedule(Timestamp(0.0), 100.0);
        assert_eq!(q.fire_due(Timestamp(400.0)), vec![fast, slow]);
    }

    #[test]
    fn tokens_are_never_reused() {
        let mut q = TimerQueue::new();
        let a = q.schedule(Timestamp(0.0), 1.0);
        q.cancel(a);
        let b = q.schedule(Timestamp(0.0), 1.0);
        assert_ne!(a, b);
    }
}
