use std::collections::BTreeMap;
use std::time::Duration;

use super::food::FoodId;
use super::types::PortalColor;

/// Deferred board mutation. Each variant carries the identifiers it acts on,
/// fixed when it was scheduled.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum TimerEvent {
    FoodExpired(FoodId),
    TimedSpecialSpawn,
    RandomReroll,
    PortalCooldownEnd(PortalColor),
    PortalRelocate(PortalColor),
}

/// Pending events ordered by round-clock deadline, then by scheduling order.
#[derive(Clone, Debug, Default)]
pub struct TimerQueue {
    timers: BTreeMap<(Duration, u64), TimerEvent>,
    next_seq: u64,
}

impl TimerQueue {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn schedule(&mut self, due: Duration, event: TimerEvent) {
        self.timers.insert((due, self.next_seq), event);
        self.next_seq += 1;
    }

    pub fn cancel_where(&mut self, predicate: impl Fn(&TimerEvent) -> bool) -> usize {
        let before = self.timers.len();
        self.timers.retain(|_, event| !predicate(event));
        before - self.timers.len()
    }

    pub fn cancel_food_expiry(&mut self, id: FoodId) -> bool {
        self.cancel_where(|event| *event == TimerEvent::FoodExpired(id)) > 0
    }

    /// Removes and returns the earliest event due at or before `now`.
    pub fn pop_due(&mut self, now: Duration) -> Option<(Duration, TimerEvent)> {
        let (&(due, seq), _) = self.timers.first_key_value()?;
        if due > now {
            return None;
        }
        self.timers.remove(&(due, seq)).map(|event| (due, event))
    }

    pub fn next_deadline(&self) -> Option<Duration> {
        self.timers.keys().next().map(|(due, _)| *due)
    }

    pub fn contains(&self, event: &TimerEvent) -> bool {
        self.timers.values().any(|e| e == event)
    }

    pub fn deadline_of(&self, event: &TimerEvent) -> Option<Duration> {
        self.timers
            .iter()
            .find(|(_, e)| *e == event)
            .map(|((due, _), _)| *due)
    }

    pub fn len(&self) -> usize {
        self.timers.len()
    }

    pub fn is_empty(&self) -> bool {
        self.timers.is_empty()
    }

    pub fn clear(&mut self) {
        self.timers.clear();
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn secs(s: u64) -> Duration {
        Duration::from_secs(s)
    }

    #[test]
    fn test_pop_due_respects_deadline_and_order() {
        let mut queue = TimerQueue::new();
        queue.schedule(secs(5), TimerEvent::RandomReroll);
        queue.schedule(secs(1), TimerEvent::PortalCooldownEnd(PortalColor::Blue));
        queue.schedule(secs(1), TimerEvent::PortalRelocate(PortalColor::Blue));

        assert_eq!(queue.pop_due(Duration::ZERO), None);
        assert_eq!(
            queue.pop_due(secs(2)),
            Some((secs(1), TimerEvent::PortalCooldownEnd(PortalColor::Blue)))
        );
        assert_eq!(
            queue.pop_due(secs(2)),
            Some((secs(1), TimerEvent::PortalRelocate(PortalColor::Blue)))
        );
        assert_eq!(queue.pop_due(secs(2)), None);
        assert_eq!(queue.next_deadline(), Some(secs(5)));
    }

    #[test]
    fn test_cancel_food_expiry_only_removes_that_item() {
        let mut queue = TimerQueue::new();
        queue.schedule(secs(10), TimerEvent::FoodExpired(FoodId(1)));
        queue.schedule(secs(10), TimerEvent::FoodExpired(FoodId(2)));

        assert!(queue.cancel_food_expiry(FoodId(1)));
        assert!(!queue.cancel_food_expiry(FoodId(1)));
        assert!(queue.contains(&TimerEvent::FoodExpired(FoodId(2))));
        assert_eq!(queue.len(), 1);
    }

    #[test]
    fn test_clear_drops_everything() {
        let mut queue = TimerQueue::new();
        queue.schedule(secs(3), TimerEvent::TimedSpecialSpawn);
        queue.clear();
        assert!(queue.is_empty());
        assert_eq!(queue.next_deadline(), None);
    }
}
