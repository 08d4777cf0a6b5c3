//! Fixtures
//!
//! YAML catalog sets used to seed a store: items, servers and products.

use std::{fs, path::PathBuf};

use rustc_hash::{FxHashMap, FxHashSet};
use thiserror::Error;

use crate::{
    fixtures::{
        items::{ItemDefinition, ItemsFixture},
        products::{ProductDefinition, ProductsFixture},
        servers::{ServerDefinition, ServersFixture},
    },
    rewards::ItemInfo,
};

pub mod items;
pub mod products;
pub mod servers;

/// Fixture Parsing Errors
#[derive(Debug, Error)]
pub enum FixtureError {
    /// IO error reading fixture files
    #[error("Failed to read fixture file: {0}")]
    Io(#[from] std::io::Error),

    /// YAML parsing error
    #[error("Failed to parse YAML: {0}")]
    Yaml(#[from] serde_norway::Error),

    /// Invalid price format
    #[error("Invalid price format: {0}")]
    InvalidPrice(String),

    /// Invalid percentage format
    #[error("Invalid percentage format: {0}")]
    InvalidPercentage(String),

    /// Invalid timestamp format
    #[error("Invalid timestamp: {0}")]
    InvalidTimestamp(String),

    /// Unknown currency code
    #[error("Unknown currency code: {0}")]
    UnknownCurrency(String),

    /// Product references an item that is not in the loaded item set
    #[error("Item not found: {0}")]
    ItemNotFound(String),

    /// Product references a server that is not in the loaded server set
    #[error("Server not found: {0}")]
    ServerNotFound(String),

    /// Product definition is internally inconsistent
    #[error("Invalid product {0}: {1}")]
    InvalidProduct(String, String),
}

/// Fixture
#[derive(Debug)]
pub struct Fixture {
    /// Base path for fixture files
    base_path: PathBuf,

    items: Vec<ItemDefinition>,
    servers: Vec<ServerDefinition>,
    products: Vec<ProductDefinition>,
}

impl Fixture {
    /// Create a new empty fixture with default base path
    pub fn new() -> Self {
        Self::with_base_path("./fixtures")
    }

    /// Create a new empty fixture with custom base path
    pub fn with_base_path(base_path: impl Into<PathBuf>) -> Self {
        Self {
            base_path: base_path.into(),
            items: Vec::new(),
            servers: Vec::new(),
            products: Vec::new(),
        }
    }

    /// Load items, servers and products of the same set name from the default base path
    ///
    /// # Errors
    ///
    /// Returns an error if any of the three files cannot be loaded.
    pub fn from_set(name: &str) -> Result<Self, FixtureError> {
        let mut fixture = Self::new();

        fixture.load_set(name)?;

        Ok(fixture)
    }

    /// Load items, servers and products of the same set name
    ///
    /// # Errors
    ///
    /// Returns an error if any of the three files cannot be loaded.
    pub fn load_set(&mut self, name: &str) -> Result<&mut Self, FixtureError> {
        self.load_items(name)?.load_servers(name)?.load_products(name)
    }

    /// Load items from a YAML fixture file
    ///
    /// # Errors
    ///
    /// Returns an error if the file cannot be read or parsed.
    pub fn load_items(&mut self, name: &str) -> Result<&mut Self, FixtureError> {
        let fixture: ItemsFixture = self.read("items", name)?;

        let mut items: Vec<ItemDefinition> = fixture
            .items
            .into_iter()
            .map(|(code, item)| item.into_definition(code))
            .collect();

        items.sort_by(|a, b| a.code.cmp(&b.code));

        self.items.extend(items);

        Ok(self)
    }

    /// Load servers from a YAML fixture file
    ///
    /// # Errors
    ///
    /// Returns an error if the file cannot be read or parsed.
    pub fn load_servers(&mut self, name: &str) -> Result<&mut Self, FixtureError> {
        let fixture: ServersFixture = self.read("servers", name)?;

        let mut servers: Vec<ServerDefinition> = fixture
            .servers
            .into_iter()
            .map(|(identifier, server)| server.into_definition(identifier))
            .collect();

        servers.sort_by(|a, b| a.identifier.cmp(&b.identifier));

        self.servers.extend(servers);

        Ok(self)
    }

    /// Load products from a YAML fixture file.
    ///
    /// When items or servers have been loaded first, every item and server a product references
    /// must exist in them.
    ///
    /// # Errors
    ///
    /// Returns an error if the file cannot be read or parsed, a price or discount is malformed,
    /// or a product references an unknown item or server.
    pub fn load_products(&mut self, name: &str) -> Result<&mut Self, FixtureError> {
        let fixture: ProductsFixture = self.read("products", name)?;

        let item_codes: FxHashSet<&str> = self.items.iter().map(|item| item.code.as_str()).collect();
        let server_ids: FxHashSet<&str> = self
            .servers
            .iter()
            .map(|server| server.identifier.as_str())
            .collect();

        let mut products = Vec::with_capacity(fixture.products.len());

        for (key, product_fixture) in fixture.products {
            let product = product_fixture.into_definition(key)?;

            if !item_codes.is_empty() {
                if let Some(code) = product
                    .item_codes()
                    .find(|code| !item_codes.contains(code))
                {
                    return Err(FixtureError::ItemNotFound(code.to_string()));
                }
            }

            if !server_ids.is_empty() {
                if let Some(server) = product
                    .servers
                    .iter()
                    .find(|server| !server_ids.contains(server.as_str()))
                {
                    return Err(FixtureError::ServerNotFound(server.clone()));
                }
            }

            products.push(product);
        }

        products.sort_by(|a, b| a.key.cmp(&b.key));

        self.products.extend(products);

        Ok(self)
    }

    /// Loaded items
    pub fn items(&self) -> &[ItemDefinition] {
        &self.items
    }

    /// Loaded servers
    pub fn servers(&self) -> &[ServerDefinition] {
        &self.servers
    }

    /// Loaded products
    pub fn products(&self) -> &[ProductDefinition] {
        &self.products
    }

    /// Item display metadata keyed by item code
    pub fn item_catalog(&self) -> FxHashMap<String, ItemInfo> {
        self.items
            .iter()
            .map(|item| {
                (
                    item.code.clone(),
                    ItemInfo {
                        name: item.name.clone(),
                        icon_url: item.icon_url.clone(),
                    },
                )
            })
            .collect()
    }

    fn read<T: serde::de::DeserializeOwned>(&self, kind: &str, name: &str) -> Result<T, FixtureError> {
        let file_path = self.base_path.join(kind).join(format!("{name}.yml"));
        let contents = fs::read_to_string(&file_path)?;

        Ok(serde_norway::from_str(&contents)?)
    }
}

impl Default for Fixture {
    fn default() -> Self {
        Self::new()
    }
}
