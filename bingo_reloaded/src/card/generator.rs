//! Card generation from weighted task pools.

use rand::{Rng, SeedableRng, rngs::StdRng, seq::SliceRandom};
use serde::{Deserialize, Serialize};
use std::collections::HashMap;

use super::models::{Card, CardSize, Task};

/// Lookup of task pools by name.
pub trait TaskSource {
    /// All candidate tasks of `pool`. Unknown pools are empty.
    fn pool(&self, pool: &str) -> &[Task];
}

impl TaskSource for HashMap<String, Vec<Task>> {
    fn pool(&self, pool: &str) -> &[Task] {
        self.get(pool).map(Vec::as_slice).unwrap_or_default()
    }
}

/// How many tasks to draw from one pool.
#[derive(Clone, Debug, Deserialize, Eq, PartialEq, Serialize)]
pub struct PoolSelection {
    pub pool: String,
    pub count: usize,
}

/// A named card: an ordered list of pool selections.
#[derive(Clone, Debug, Deserialize, Eq, PartialEq, Serialize)]
pub struct CardDefinition {
    pub name: String,
    pub pools: Vec<PoolSelection>,
}

impl CardDefinition {
    #[must_use]
    pub fn new(name: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            pools: Vec::new(),
        }
    }

    #[must_use]
    pub fn with_pool(mut self, pool: impl Into<String>, count: usize) -> Self {
        self.pools.push(PoolSelection {
            pool: pool.into(),
            count,
        });
        self
    }

    /// Total number of tasks the selection asks for.
    #[must_use]
    pub fn requested(&self) -> usize {
        self.pools.iter().map(|p| p.count).sum()
    }
}

/// RNG used for card generation. A zero seed draws fresh entropy, any other
/// seed reproduces the same card.
#[must_use]
pub fn card_rng(seed: u64) -> StdRng {
    if seed == 0 {
        StdRng::from_rng(&mut rand::rng())
    } else {
        StdRng::seed_from_u64(seed)
    }
}

/// Generates a card of `size` from `definition`.
///
/// Each pool is shuffled and drawn without replacement; a pool smaller than
/// its requested count is repeated cyclically, an empty one contributes
/// filler tasks. The combined list is padded with filler up to `N²`,
/// shuffled as a whole and cut to exactly `N²` tasks.
pub fn generate_card<S, R>(
    size: CardSize,
    definition: &CardDefinition,
    tasks: &S,
    rng: &mut R,
) -> Card
where
    S: TaskSource + ?Sized,
    R: Rng + ?Sized,
{
    let full = size.full_size();
    let mut drawn: Vec<Task> = Vec::with_capacity(definition.requested().max(full));

    for selection in &definition.pools {
        let mut candidates = tasks.pool(&selection.pool).to_vec();
        if candidates.is_empty() {
            log::warn!(
                "Task pool '{}' is empty, using filler for {} slots",
                selection.pool,
                selection.count
            );
            drawn.extend(std::iter::repeat_n(Task::filler(), selection.count));
            continue;
        }

        candidates.shuffle(rng);
        drawn.extend((0..selection.count).map(|i| candidates[i % candidates.len()].clone()));
    }

    if drawn.len() < full {
        drawn.resize(full, Task::filler());
    }

    // Shuffle before cutting so no pool is favoured by the truncation.
    drawn.shuffle(rng);
    drawn.truncate(full);

    Card::from_tasks(size, drawn).unwrap_or_else(|| unreachable!("card always holds N² tasks"))
}
