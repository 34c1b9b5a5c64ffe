//! Work scheduled to run after the handler that requested it.

use std::time::Instant;

/// Identifies one installed phase. Bumped on every phase replacement, so a
/// callback carrying an older epoch belongs to a phase that no longer exists.
#[derive(Clone, Copy, Debug, Default, Eq, Hash, Ord, PartialEq, PartialOrd)]
pub struct PhaseEpoch(u64);

impl PhaseEpoch {
    #[must_use]
    pub(crate) fn next(self) -> Self {
        Self(self.0.wrapping_add(1))
    }
}

#[derive(Clone, Debug, Eq, PartialEq)]
pub enum DeferredAction {
    /// Replace the ended game with the postgame cooldown.
    EnterPostGame,
    /// Leave the postgame cooldown and open a new lobby.
    PrepareNextGame,
    /// Deathmatch countdown ran out; pick the task to race for.
    RevealDeathmatchTask,
}

#[derive(Debug)]
struct Deferred {
    due: Instant,
    epoch: PhaseEpoch,
    action: DeferredAction,
}

/// Pending deferred actions of one session, in scheduling order.
#[derive(Debug, Default)]
pub struct DeferredQueue {
    entries: Vec<Deferred>,
}

impl DeferredQueue {
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    pub fn schedule(&mut self, due: Instant, epoch: PhaseEpoch, action: DeferredAction) {
        self.entries.push(Deferred { due, epoch, action });
    }

    /// Removes and returns every entry due at `now`, earliest first. Entries
    /// due at the same instant keep their scheduling order.
    pub fn take_due(&mut self, now: Instant) -> Vec<(PhaseEpoch, DeferredAction)> {
        let (mut due, pending): (Vec<_>, Vec<_>) =
            self.entries.drain(..).partition(|entry| entry.due <= now);
        self.entries = pending;
        due.sort_by_key(|entry| entry.due);
        due.into_iter()
            .map(|entry| (entry.epoch, entry.action))
            .collect()
    }

    /// Earliest pending deadline.
    #[must_use]
    pub fn next_due(&self) -> Option<Instant> {
        self.entries.iter().map(|entry| entry.due).min()
    }

    #[must_use]
    pub fn len(&self) -> usize {
        self.entries.len()
    }

    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    pub fn clear(&mut self) {
        self.entries.clear();
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::time::Duration;

    #[test]
    fn test_take_due_keeps_future_entries() {
        let now = Instant::now();
        let epoch = PhaseEpoch::default();
        let mut queue = DeferredQueue::new();
        queue.schedule(now + Duration::from_secs(5), epoch, DeferredAction::PrepareNextGame);
        queue.schedule(now, epoch, DeferredAction::EnterPostGame);

        assert_eq!(queue.take_due(now), vec![(epoch, DeferredAction::EnterPostGame)]);
        assert_eq!(queue.len(), 1);
        assert_eq!(queue.next_due(), Some(now + Duration::from_secs(5)));

        assert!(queue.take_due(now + Duration::from_secs(4)).is_empty());
        assert_eq!(
            queue.take_due(now + Duration::from_secs(5)),
            vec![(epoch, DeferredAction::PrepareNextGame)]
        );
        assert!(queue.is_empty());
    }

    #[test]
    fn test_due_entries_come_out_in_deadline_order() {
        let now = Instant::now();
        let epoch = PhaseEpoch::default().next();
        let mut queue = DeferredQueue::new();
        queue.schedule(now + Duration::from_secs(2), epoch, DeferredAction::PrepareNextGame);
        queue.schedule(now + Duration::from_secs(1), epoch, DeferredAction::RevealDeathmatchTask);

        let due = queue.take_due(now + Duration::from_secs(3));
        assert_eq!(
            due,
            vec![
                (epoch, DeferredAction::RevealDeathmatchTask),
                (epoch, DeferredAction::PrepareNextGame)
            ]
        );
    }

    #[test]
    fn test_epochs_are_distinct() {
        let first = PhaseEpoch::default();
        assert_ne!(first, first.next());
        assert!(first < first.next());
    }
}
