//! Loot tables
//!
//! Crates resolve to a single weighted roll over their loot table. Weights are raw
//! chances: they are summed, never normalised, so `[1, 3]` and `[25, 75]` behave the same.

use rand::Rng;
use serde::{Deserialize, Serialize};

use crate::rewards::Reward;

/// One row of a crate's loot table
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct LootEntry {
    /// Item granted when this row wins
    pub item_code: String,

    /// Quantity granted
    pub quantity: u32,

    /// Raw weight of this row
    pub chance: f64,
}

impl LootEntry {
    /// Create a loot table row
    pub fn new(item_code: impl Into<String>, quantity: u32, chance: f64) -> Self {
        Self {
            item_code: item_code.into(),
            quantity,
            chance,
        }
    }

    fn reward(&self) -> Reward {
        Reward::new(self.item_code.clone(), self.quantity)
    }
}

/// Sum of all weights in `table`
pub fn total_weight(table: &[LootEntry]) -> f64 {
    table.iter().map(|entry| entry.chance).sum()
}

/// Roll `table` once.
///
/// Draws `r` uniformly from `[0, total)` and walks the rows in order, returning the first row
/// whose chance exceeds what is left of `r`. An empty table yields [`Reward::empty`]. A table
/// whose weights sum to nothing usable yields its first row, as does floating point drift past
/// the last row.
pub fn roll<R: Rng + ?Sized>(table: &[LootEntry], rng: &mut R) -> Reward {
    let Some(first) = table.first() else {
        return Reward::empty();
    };

    let total = total_weight(table);

    if !total.is_finite() || total <= 0.0 {
        return first.reward();
    }

    let mut remaining = rng.gen_range(0.0..total);

    for entry in table {
        if remaining < entry.chance {
            return entry.reward();
        }

        remaining -= entry.chance;
    }

    first.reward()
}
