use foundation::Time;
use foundation::math::StableF64;

#[derive(Debug, Copy, Clone, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct TimerId(pub u64);

#[derive(Debug, Clone)]
struct Pending<T> {
    id: TimerId,
    due: Time,
    payload: T,
}

/// One-shot timers keyed by host time.
///
/// Ordering contract: due timers fire by `(due_time, insertion_order)`, so two
/// timers armed for the same instant fire in the order they were scheduled.
/// Cancelled timers never fire.
#[derive(Debug)]
pub struct TimerQueue<T> {
    next_id: u64,
    pending: Vec<Pending<T>>,
}

impl<T> Default for TimerQueue<T> {
    fn default() -> Self {
        Self::new()
    }
}

impl<T> TimerQueue<T> {
    pub fn new() -> Self {
        Self {
            next_id: 0,
            pending: Vec::new(),
        }
    }

    pub fn schedule(&mut self, now: Time, delay_ms: f64, payload: T) -> TimerId {
        let id = TimerId(self.next_id);
        self.next_id = self.next_id.wrapping_add(1);
        self.pending.push(Pending {
            id,
            due: now.after(delay_ms),
            payload,
        });
        id
    }

    /// Returns whether the timer was still pending.
    pub fn cancel(&mut self, id: TimerId) -> bool {
        let before = self.pending.len();
        self.pending.retain(|p| p.id != id);
        self.pending.len() != before
    }

    pub fn cancel_all(&mut self) {
        self.pending.clear();
    }

    pub fn is_pending(&self, id: TimerId) -> bool {
        self.pending.iter().any(|p| p.id == id)
    }

    pub fn len(&self) -> usize {
        self.pending.len()
    }

    pub fn is_empty(&self) -> bool {
        self.pending.is_empty()
    }

    /// Remove and return every timer due at or before `now`.
    pub fn take_due(&mut self, now: Time) -> Vec<(TimerId, T)> {
        let mut due = Vec::new();
        let mut keep = Vec::with_capacity(self.pending.len());
        for p in self.pending.drain(..) {
            if p.due.ms() <= now.ms() {
                due.push(p);
            } else {
                keep.push(p);
            }
        }
        self.pending = keep;
        // Ids grow with insertion, so they break deadline ties.
        due.sort_by(|a, b| {
            StableF64(a.due.ms())
                .cmp(&StableF64(b.due.ms()))
                .then_with(|| a.id.cmp(&b.id))
        });
        due.into_iter().map(|p| (p.id, p.payload)).collect()
    }
}

#[cfg(test)]
mod tests {
    use super::TimerQueue;
    use foundation::Time;

    #[test]
    fn fires_only_when_due() {
        let mut q = TimerQueue::new();
        q.schedule(Time(0.0), 1000.0, "enter");
        assert!(q.take_due(Time(999.0)).is_empty());
        let fired = q.take_due(Time(1000.0));
        assert_eq!(fired.len(), 1);
        assert_eq!(fired[0].1, "enter");
        assert!(q.is_empty());
    }

    #[test]
    fn cancelled_timers_never_fire() {
        let mut q = TimerQueue::new();
        let id = q.schedule(Time(0.0), 10.0, 1);
        assert!(q.is_pending(id));
        assert!(q.cancel(id));
        assert!(!q.cancel(id));
        assert!(q.take_due(Time(100.0)).is_empty());
    }

    #[test]
    fn fires_in_deadline_then_insertion_order() {
        let mut q = TimerQueue::new();
        q.schedule(Time(0.0), 50.0, "late");
        q.schedule(Time(0.0), 10.0, "first");
        q.schedule(Time(0.0), 10.0, "second");
        let order: Vec<_> = q.take_due(Time(60.0)).into_iter().map(|(_, p)| p).collect();
        assert_eq!(order, vec!["first", "second", "late"]);
    }

    #[test]
    fn cancel_all_clears() {
        let mut q = TimerQueue::new();
        q.schedule(Time(0.0), 1.0, ());
        q.schedule(Time(0.0), 2.0, ());
        q.cancel_all();
        assert_eq!(q.len(), 0);
    }
}
