//! Rewards
//!
//! Turning a purchased product into the concrete items a player receives.

use rand::Rng;
use rustc_hash::FxHashMap;
use serde::{Deserialize, Serialize};
use smallvec::SmallVec;

use crate::loot::{self, LootEntry};

/// Item code used for the placeholder reward of an empty loot table
pub const EMPTY_ITEM_CODE: &str = "empty";

/// Icon host used when the item catalog has no entry for a code
pub const DEFAULT_ICON_BASE_URL: &str = "https://rustlabs.com/img/items180";

/// Resolved rewards; most purchases grant a handful of items
pub type Rewards = SmallVec<[Reward; 4]>;

/// An item code and quantity
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct Reward {
    /// Game item code
    pub item_code: String,

    /// Quantity granted
    pub quantity: u32,
}

impl Reward {
    /// Create a reward
    pub fn new(item_code: impl Into<String>, quantity: u32) -> Self {
        Self {
            item_code: item_code.into(),
            quantity,
        }
    }

    /// Zero-quantity placeholder
    pub fn empty() -> Self {
        Self::new(EMPTY_ITEM_CODE, 0)
    }
}

/// Where a product's rewards come from
#[derive(Debug, Clone, Copy)]
pub enum RewardSource<'a> {
    /// Every unit grants the full contents list
    Contents(&'a [Reward]),

    /// Every unit grants one roll of the loot table
    Crate(&'a [LootEntry]),
}

impl<'a> RewardSource<'a> {
    /// Pick the source for a product: crates always roll their loot table
    pub fn for_product(is_crate: bool, contents: &'a [Reward], loot_table: &'a [LootEntry]) -> Self {
        if is_crate {
            RewardSource::Crate(loot_table)
        } else {
            RewardSource::Contents(contents)
        }
    }
}

/// Resolve `quantity` units of `source` into a flat list of rewards.
///
/// Contents are repeated whole per unit, in order. Crates roll once per unit.
pub fn resolve<R: Rng + ?Sized>(source: RewardSource<'_>, quantity: u32, rng: &mut R) -> Rewards {
    let mut rewards = Rewards::new();

    for _ in 0..quantity {
        match source {
            RewardSource::Contents(contents) => rewards.extend(contents.iter().cloned()),
            RewardSource::Crate(table) => rewards.push(loot::roll(table, rng)),
        }
    }

    rewards
}

/// Display metadata for an item code
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ItemInfo {
    /// Display name
    pub name: String,

    /// Icon URL
    pub icon_url: String,
}

/// A reward with its display metadata resolved
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct GrantedItem {
    /// Game item code
    pub item_code: String,

    /// Display name
    pub name: String,

    /// Icon URL
    pub icon_url: String,

    /// Quantity granted
    pub quantity: u32,
}

/// Icon URL for a code the item catalog does not know
pub fn fallback_icon_url(icon_base_url: &str, item_code: &str) -> String {
    format!("{}/{item_code}.png", icon_base_url.trim_end_matches('/'))
}

/// Attach names and icons to `rewards`, falling back to the item code and the default icon host
pub fn label(
    rewards: impl IntoIterator<Item = Reward>,
    catalog: &FxHashMap<String, ItemInfo>,
    icon_base_url: &str,
) -> Vec<GrantedItem> {
    rewards
        .into_iter()
        .map(|reward| {
            let (name, icon_url) = match catalog.get(&reward.item_code) {
                Some(info) => (info.name.clone(), info.icon_url.clone()),
                None => (
                    reward.item_code.clone(),
                    fallback_icon_url(icon_base_url, &reward.item_code),
                ),
            };

            GrantedItem {
                item_code: reward.item_code,
                name,
                icon_url,
                quantity: reward.quantity,
            }
        })
        .collect()
}
