//! Card grid, slots and the tasks placed in them.

use serde::{Deserialize, Serialize};
use std::fmt;

use crate::entities::{GameTime, TeamColor};

/// Objective placed in a card slot.
#[derive(Clone, Debug, Deserialize, Eq, Hash, PartialEq, Serialize)]
#[serde(tag = "kind", rename_all = "snake_case")]
pub enum Task {
    /// Drop `count` of `item` to complete.
    Item {
        item: String,
        #[serde(default = "default_item_count")]
        count: u32,
    },
    /// Reach a milestone (advancement) to complete.
    Milestone { milestone: String },
}

const fn default_item_count() -> u32 {
    1
}

/// Item used to pad cards whose pools could not supply enough tasks.
pub const FILLER_ITEM: &str = "dirt";

impl Task {
    #[must_use]
    pub fn item(item: impl Into<String>, count: u32) -> Self {
        Self::Item {
            item: item.into(),
            count: count.max(1),
        }
    }

    #[must_use]
    pub fn milestone(milestone: impl Into<String>) -> Self {
        Self::Milestone {
            milestone: milestone.into(),
        }
    }

    /// The deterministic slot used when a card runs short of tasks.
    #[must_use]
    pub fn filler() -> Self {
        Self::item(FILLER_ITEM, 1)
    }

    #[must_use]
    pub fn matches_item(&self, dropped: &str, quantity: u32) -> bool {
        match self {
            Task::Item { item, count } => item == dropped && quantity >= *count,
            Task::Milestone { .. } => false,
        }
    }

    #[must_use]
    pub fn matches_milestone(&self, reached: &str) -> bool {
        match self {
            Task::Milestone { milestone } => milestone == reached,
            Task::Item { .. } => false,
        }
    }
}

impl fmt::Display for Task {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Task::Item { item, count } if *count > 1 => write!(f, "{count}x {item}"),
            Task::Item { item, .. } => write!(f, "{item}"),
            Task::Milestone { milestone } => write!(f, "milestone {milestone}"),
        }
    }
}

/// Completion state of a slot. Once completed a slot never goes back.
#[derive(Clone, Copy, Debug, Default, Deserialize, Eq, PartialEq, Serialize)]
pub enum Completion {
    #[default]
    Uncompleted,
    CompletedBy { team: TeamColor, at: GameTime },
}

#[derive(Clone, Debug, Deserialize, Eq, PartialEq, Serialize)]
pub struct Slot {
    pub task: Task,
    pub completion: Completion,
}

impl Slot {
    #[must_use]
    pub fn new(task: Task) -> Self {
        Self {
            task,
            completion: Completion::Uncompleted,
        }
    }

    #[must_use]
    pub fn is_complete(&self) -> bool {
        matches!(self.completion, Completion::CompletedBy { .. })
    }

    #[must_use]
    pub fn is_completed_by(&self, team: TeamColor) -> bool {
        matches!(self.completion, Completion::CompletedBy { team: t, .. } if t == team)
    }

    #[must_use]
    pub fn completed_by(&self) -> Option<TeamColor> {
        match self.completion {
            Completion::CompletedBy { team, .. } => Some(team),
            Completion::Uncompleted => None,
        }
    }

    /// Marks the slot completed. Returns `false` if it already was.
    pub fn complete(&mut self, team: TeamColor, at: GameTime) -> bool {
        if self.is_complete() {
            return false;
        }
        self.completion = Completion::CompletedBy { team, at };
        true
    }
}

/// Side length of a square card, between 2 and [`CardSize::MAX_SIDE`].
/// Sizes below 2 are rejected since the second diagonal degenerates for them.
#[derive(Clone, Copy, Debug, Deserialize, Eq, Hash, PartialEq, Serialize)]
#[serde(try_from = "usize", into = "usize")]
pub struct CardSize(usize);

impl CardSize {
    pub const X3: CardSize = CardSize(3);
    pub const X5: CardSize = CardSize(5);

    /// Largest supported side; votes and presets beyond it are rejected.
    pub const MAX_SIDE: usize = 9;

    #[must_use]
    pub const fn new(side: usize) -> Option<Self> {
        if side < 2 || side > Self::MAX_SIDE {
            None
        } else {
            Some(Self(side))
        }
    }

    #[must_use]
    pub const fn side(self) -> usize {
        self.0
    }

    #[must_use]
    pub const fn full_size(self) -> usize {
        self.0 * self.0
    }
}

impl Default for CardSize {
    fn default() -> Self {
        Self::X5
    }
}

impl TryFrom<usize> for CardSize {
    type Error = String;

    fn try_from(value: usize) -> Result<Self, Self::Error> {
        Self::new(value).ok_or_else(|| format!("card size {value} is not supported"))
    }
}

impl From<CardSize> for usize {
    fn from(value: CardSize) -> Self {
        value.0
    }
}

impl fmt::Display for CardSize {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{0}x{0}", self.0)
    }
}

/// An N×N grid of slots stored row-major (`index = row * N + col`).
#[derive(Clone, Debug, Deserialize, Eq, PartialEq, Serialize)]
pub struct Card {
    size: CardSize,
    slots: Vec<Slot>,
}

impl Card {
    /// Builds a card from exactly `size.full_size()` tasks.
    #[must_use]
    pub fn from_tasks(size: CardSize, tasks: Vec<Task>) -> Option<Self> {
        if tasks.len() != size.full_size() {
            return None;
        }
        Some(Self {
            size,
            slots: tasks.into_iter().map(Slot::new).collect(),
        })
    }

    #[must_use]
    pub fn size(&self) -> CardSize {
        self.size
    }

    #[must_use]
    pub fn slots(&self) -> &[Slot] {
        &self.slots
    }

    #[must_use]
    pub fn slot(&self, index: usize) -> Option<&Slot> {
        self.slots.get(index)
    }

    /// Same tasks, every slot uncompleted.
    #[must_use]
    pub fn fresh_copy(&self) -> Self {
        Self {
            size: self.size,
            slots: self.slots.iter().map(|s| Slot::new(s.task.clone())).collect(),
        }
    }

    /// Whether `team` owns a full row, column or diagonal.
    ///
    /// Rows and columns are checked together for each `y`. The second
    /// diagonal walks indices in steps of `N - 1` from 0 and skips both
    /// endpoints `0` and `N² - 1`, which belong to the first diagonal.
    #[must_use]
    pub fn has_bingo(&self, team: TeamColor) -> bool {
        let n = self.size.side();
        let full = self.size.full_size();
        let done = |idx: usize| self.slots[idx].is_completed_by(team);

        for y in 0..n {
            let completed_row = (0..n).all(|x| done(n * y + x));
            let completed_col = (0..n).all(|x| done(n * x + y));
            if completed_row || completed_col {
                return true;
            }
        }

        let completed_diagonal1 = (0..full).step_by(n + 1).all(|idx| done(idx));
        let completed_diagonal2 = (0..full)
            .step_by(n - 1)
            .filter(|&idx| idx != 0 && idx != full - 1)
            .all(|idx| done(idx));

        completed_diagonal1 || completed_diagonal2
    }

    /// Number of slots `team` has completed anywhere on the card.
    #[must_use]
    pub fn complete_count(&self, team: TeamColor) -> usize {
        self.slots.iter().filter(|s| s.is_completed_by(team)).count()
    }

    #[must_use]
    pub fn completed_total(&self) -> usize {
        self.slots.iter().filter(|s| s.is_complete()).count()
    }

    #[must_use]
    pub fn is_exhausted(&self) -> bool {
        self.slots.iter().all(Slot::is_complete)
    }

    /// Completes the first open item slot matching the drop.
    /// Returns the index of the completed slot.
    pub fn complete_item(
        &mut self,
        item: &str,
        quantity: u32,
        team: TeamColor,
        at: GameTime,
    ) -> Option<usize> {
        self.complete_first(|task| task.matches_item(item, quantity), team, at)
    }

    /// Completes the first open milestone slot for `milestone`.
    pub fn complete_milestone(
        &mut self,
        milestone: &str,
        team: TeamColor,
        at: GameTime,
    ) -> Option<usize> {
        self.complete_first(|task| task.matches_milestone(milestone), team, at)
    }

    fn complete_first(
        &mut self,
        matches: impl Fn(&Task) -> bool,
        team: TeamColor,
        at: GameTime,
    ) -> Option<usize> {
        let index = self
            .slots
            .iter()
            .position(|slot| !slot.is_complete() && matches(&slot.task))?;
        self.slots[index].complete(team, at);
        Some(index)
    }

    #[cfg(test)]
    pub(crate) fn force_complete(&mut self, indices: &[usize], team: TeamColor) {
        for &idx in indices {
            self.slots[idx].complete(team, GameTime::ZERO);
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn blank_card(side: usize) -> Card {
        let size = CardSize::new(side).unwrap();
        let tasks = (0..size.full_size())
            .map(|i| Task::item(format!("item_{i}"), 1))
            .collect();
        Card::from_tasks(size, tasks).unwrap()
    }

    #[test]
    fn test_rows_and_columns() {
        for side in 2..=7 {
            for line in 0..side {
                let mut row_card = blank_card(side);
                let row: Vec<usize> = (0..side).map(|x| line * side + x).collect();
                row_card.force_complete(&row, TeamColor::Red);
                assert!(row_card.has_bingo(TeamColor::Red), "row {line} of {side}");
                assert!(!row_card.has_bingo(TeamColor::Blue));

                let mut col_card = blank_card(side);
                let col: Vec<usize> = (0..side).map(|x| x * side + line).collect();
                col_card.force_complete(&col, TeamColor::Red);
                assert!(col_card.has_bingo(TeamColor::Red), "col {line} of {side}");
                assert!(!col_card.has_bingo(TeamColor::Blue));
            }
        }
    }

    #[test]
    fn test_five_by_five_diagonals() {
        let mut card = blank_card(5);
        card.force_complete(&[0, 6, 12, 18, 24], TeamColor::Lime);
        assert!(card.has_bingo(TeamColor::Lime));

        let mut card = blank_card(5);
        card.force_complete(&[4, 8, 12, 16], TeamColor::Lime);
        assert!(!card.has_bingo(TeamColor::Lime));
        card.force_complete(&[20], TeamColor::Lime);
        assert!(card.has_bingo(TeamColor::Lime));
    }

    #[test]
    fn test_second_diagonal_ignores_corner_endpoints() {
        // Index 0 and 24 are not part of the anti-diagonal.
        let mut card = blank_card(5);
        card.force_complete(&[0, 24], TeamColor::Cyan);
        assert!(!card.has_bingo(TeamColor::Cyan));
    }

    #[test]
    fn test_incomplete_line_is_not_bingo() {
        let mut card = blank_card(3);
        card.force_complete(&[0, 1, 5, 7], TeamColor::Red);
        assert!(!card.has_bingo(TeamColor::Red));
        assert_eq!(card.complete_count(TeamColor::Red), 4);
    }

    #[test]
    fn test_mixed_owners_do_not_make_a_line() {
        let mut card = blank_card(3);
        card.force_complete(&[0, 1], TeamColor::Red);
        card.force_complete(&[2], TeamColor::Blue);
        assert!(!card.has_bingo(TeamColor::Red));
        assert!(!card.has_bingo(TeamColor::Blue));
    }

    #[test]
    fn test_first_matching_slot_completes_only() {
        let size = CardSize::new(2).unwrap();
        let tasks = vec![
            Task::milestone("story/mine_stone"),
            Task::item("apple", 1),
            Task::item("apple", 1),
            Task::item("stick", 4),
        ];
        let mut card = Card::from_tasks(size, tasks).unwrap();

        let at = GameTime::from_secs(12);
        assert_eq!(card.complete_item("apple", 1, TeamColor::Red, at), Some(1));
        assert!(!card.slot(2).unwrap().is_complete());
        assert_eq!(card.complete_item("apple", 1, TeamColor::Red, at), Some(2));
        assert_eq!(card.complete_item("apple", 1, TeamColor::Red, at), None);

        assert_eq!(card.complete_item("stick", 3, TeamColor::Red, at), None);
        assert_eq!(card.complete_item("stick", 4, TeamColor::Red, at), Some(3));
        assert_eq!(
            card.complete_milestone("story/mine_stone", TeamColor::Red, at),
            Some(0)
        );
        assert!(card.is_exhausted());
    }

    #[test]
    fn test_completion_is_append_only() {
        let mut slot = Slot::new(Task::filler());
        assert!(slot.complete(TeamColor::Red, GameTime::from_secs(1)));
        assert!(!slot.complete(TeamColor::Blue, GameTime::from_secs(2)));
        assert_eq!(slot.completed_by(), Some(TeamColor::Red));
    }

    #[test]
    fn test_card_size_bounds() {
        assert!(CardSize::new(0).is_none());
        assert!(CardSize::new(1).is_none());
        assert_eq!(CardSize::new(4).map(CardSize::full_size), Some(16));
        assert_eq!(CardSize::new(9).map(CardSize::full_size), Some(81));
        assert!(CardSize::new(10).is_none());
        assert!(CardSize::new(usize::MAX).is_none());
        assert!(CardSize::try_from(100_000).is_err());
        assert!(Card::from_tasks(CardSize::X3, vec![Task::filler(); 8]).is_none());
    }

    #[test]
    fn test_fresh_copy_clears_completion() {
        let mut card = blank_card(3);
        card.force_complete(&[0, 1, 2], TeamColor::Red);
        let copy = card.fresh_copy();
        assert_eq!(copy.completed_total(), 0);
        assert_eq!(copy.slots()[4].task, card.slots()[4].task);
    }
}
