//! Item Fixtures

use rustc_hash::FxHashMap;
use serde::Deserialize;

/// Wrapper for items in YAML
#[derive(Debug, Deserialize)]
pub struct ItemsFixture {
    /// Map of item code -> item fixture
    pub items: FxHashMap<String, ItemFixture>,
}

/// Item Fixture
#[derive(Debug, Deserialize)]
pub struct ItemFixture {
    /// Display name
    pub name: String,

    /// Icon URL
    pub icon_url: String,

    /// Category label
    #[serde(default)]
    pub category: Option<String>,
}

impl ItemFixture {
    /// Attach the code this fixture was keyed by
    pub fn into_definition(self, code: String) -> ItemDefinition {
        ItemDefinition {
            code,
            name: self.name,
            icon_url: self.icon_url,
            category: self.category,
        }
    }
}

/// An item catalog entry loaded from a fixture
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ItemDefinition {
    /// Game item code
    pub code: String,

    /// Display name
    pub name: String,

    /// Icon URL
    pub icon_url: String,

    /// Category label
    pub category: Option<String>,
}
