//! Server Fixtures

use rustc_hash::FxHashMap;
use serde::Deserialize;

/// Wrapper for servers in YAML
#[derive(Debug, Deserialize)]
pub struct ServersFixture {
    /// Map of server identifier -> server fixture
    pub servers: FxHashMap<String, ServerFixture>,
}

/// Server Fixture
#[derive(Debug, Deserialize)]
pub struct ServerFixture {
    /// Display name
    pub name: String,

    /// Address players connect to
    pub ip: String,

    /// Game port
    pub port: u16,
}

impl ServerFixture {
    /// Attach the identifier this fixture was keyed by
    pub fn into_definition(self, identifier: String) -> ServerDefinition {
        ServerDefinition {
            identifier,
            name: self.name,
            ip: self.ip,
            port: self.port,
        }
    }
}

/// A game server loaded from a fixture
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ServerDefinition {
    /// Opaque identifier used by products and deliveries
    pub identifier: String,

    /// Display name
    pub name: String,

    /// Address players connect to
    pub ip: String,

    /// Game port
    pub port: u16,
}
