//! Schema snapshot used as the completion metadata source
//!
//! A snapshot is a TOML description of a cluster: a `[cluster]` table with
//! the details shown in the REPL banner and a list of keyspaces with their
//! tables and ordered columns.
//!
//! ```toml
//! [cluster]
//! name = "Test Cluster"
//! release_version = "4.1.3"
//! cql_version = "3.4.6"
//! native_protocol = "5"
//! address = "127.0.0.1"
//!
//! [[keyspaces]]
//! name = "store"
//!
//! [[keyspaces.tables]]
//! name = "users"
//! columns = ["id", "name", "email"]
//! ```

mod version;

pub use version::Version;

use std::fs;
use std::net::IpAddr;
use std::path::Path;

use serde::{Deserialize, Serialize};
use tracing::debug;

use crate::error::{Result, SchemaError};
use crate::parser::literal::identifier_name;
use crate::repl::completion::SchemaProvider;

/// Cluster details reported by the server
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct ClusterInfo {
    /// Cluster name
    #[serde(default = "default_cluster_name")]
    pub name: String,

    /// Cassandra release, e.g. `4.1.3`
    #[serde(default)]
    pub release_version: Option<String>,

    #[serde(default)]
    pub cql_version: Option<String>,

    #[serde(default)]
    pub native_protocol: Option<String>,

    /// Listen address of the node
    #[serde(default)]
    pub address: Option<IpAddr>,
}

fn default_cluster_name() -> String {
    "Offline Cluster".to_string()
}

impl Default for ClusterInfo {
    fn default() -> Self {
        Self {
            name: default_cluster_name(),
            release_version: None,
            cql_version: None,
            native_protocol: None,
            address: None,
        }
    }
}

impl ClusterInfo {
    /// Parsed release version, if one is recorded
    pub fn version(&self) -> Result<Option<Version>> {
        match &self.release_version {
            Some(release) => Ok(Some(release.parse()?)),
            None => Ok(None),
        }
    }

    /// Two banner lines printed when the shell starts
    pub fn banner(&self) -> Result<String> {
        let unknown = || "unknown".to_string();

        let location = match self.address {
            Some(address) => format!("Connected to {} at {}", self.name, address),
            None => format!("Connected to {} (offline)", self.name),
        };

        Ok(format!(
            "{}\n[cqlsh {} | Cassandra {} | CQL Spec {} | Native Protocol {}]",
            location,
            crate::VERSION,
            self.version()?
                .map(|v| v.to_string())
                .unwrap_or_else(unknown),
            self.cql_version.clone().unwrap_or_else(unknown),
            self.native_protocol.clone().unwrap_or_else(unknown),
        ))
    }
}

/// Table with its columns in declaration order
#[derive(Debug, Clone, Default, Serialize, Deserialize, PartialEq)]
pub struct TableSchema {
    pub name: String,
    #[serde(default)]
    pub columns: Vec<String>,
}

#[derive(Debug, Clone, Default, Serialize, Deserialize, PartialEq)]
pub struct KeyspaceSchema {
    pub name: String,
    #[serde(default)]
    pub tables: Vec<TableSchema>,
}

impl KeyspaceSchema {
    /// Look up a table by name as typed
    pub fn table(&self, name: &str) -> Option<&TableSchema> {
        find_named(&self.tables, name, |t| &t.name)
    }
}

/// Whole-cluster schema description
#[derive(Debug, Clone, Default, Serialize, Deserialize, PartialEq)]
pub struct SchemaSnapshot {
    #[serde(default)]
    pub cluster: ClusterInfo,
    #[serde(default)]
    pub keyspaces: Vec<KeyspaceSchema>,
}

/// Exact match first, then the name as CQL folds it
fn find_named<'a, T>(items: &'a [T], name: &str, key: impl Fn(&T) -> &String) -> Option<&'a T> {
    items
        .iter()
        .find(|item| key(item) == name)
        .or_else(|| {
            let folded = identifier_name(name);
            items.iter().find(|item| *key(item) == folded)
        })
}

impl SchemaSnapshot {
    /// Decode a snapshot from TOML text
    pub fn from_toml(content: &str) -> Result<Self> {
        let snapshot: Self = toml::from_str(content)
            .map_err(|e| SchemaError::InvalidSnapshot(e.to_string()))?;
        snapshot.validate()?;
        Ok(snapshot)
    }

    /// Load a snapshot file
    ///
    /// # Arguments
    /// * `path` - Path to the TOML snapshot
    ///
    /// # Returns
    /// * `Result<Self>` - Snapshot or error
    pub fn load(path: &Path) -> Result<Self> {
        let content = fs::read_to_string(path).map_err(|e| {
            SchemaError::InvalidSnapshot(format!("{}: {}", path.display(), e))
        })?;

        let snapshot = Self::from_toml(&content)?;
        debug!(
            "Loaded schema snapshot from {} ({} keyspaces)",
            path.display(),
            snapshot.keyspaces.len()
        );
        Ok(snapshot)
    }

    /// Reject duplicate names, which would make lookups ambiguous
    fn validate(&self) -> Result<()> {
        let duplicate = |names: Vec<&String>| {
            names
                .iter()
                .enumerate()
                .find(|&(i, name)| names[..i].contains(name))
                .map(|(_, name)| name.to_string())
        };

        if let Some(name) = duplicate(self.keyspaces.iter().map(|k| &k.name).collect()) {
            return Err(SchemaError::InvalidSnapshot(format!("duplicate keyspace '{name}'")).into());
        }

        for keyspace in &self.keyspaces {
            if let Some(name) = duplicate(keyspace.tables.iter().map(|t| &t.name).collect()) {
                return Err(SchemaError::InvalidSnapshot(format!(
                    "duplicate table '{}.{}'",
                    keyspace.name, name
                ))
                .into());
            }
        }

        Ok(())
    }

    /// Look up a keyspace by name as typed
    pub fn keyspace(&self, name: &str) -> Result<&KeyspaceSchema> {
        find_named(&self.keyspaces, name, |k| &k.name)
            .ok_or_else(|| SchemaError::UnknownKeyspace(name.to_string()).into())
    }

    /// Look up a table by keyspace and table name as typed
    pub fn table(&self, keyspace: &str, table: &str) -> Result<&TableSchema> {
        self.keyspace(keyspace)?.table(table).ok_or_else(|| {
            SchemaError::UnknownTable {
                keyspace: keyspace.to_string(),
                table: table.to_string(),
            }
            .into()
        })
    }
}

impl SchemaProvider for SchemaSnapshot {
    fn keyspaces(&self) -> Result<Vec<String>> {
        Ok(self.keyspaces.iter().map(|k| k.name.clone()).collect())
    }

    fn tables(&self, keyspace: &str) -> Result<Vec<String>> {
        Ok(self
            .keyspace(keyspace)?
            .tables
            .iter()
            .map(|t| t.name.clone())
            .collect())
    }

    fn columns(&self, keyspace: &str, table: &str) -> Result<Vec<String>> {
        Ok(self.table(keyspace, table)?.columns.clone())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::error::CqlshError;

    const SNAPSHOT: &str = r#"
        [cluster]
        name = "Test Cluster"
        release_version = "4.1.3"
        cql_version = "3.4.6"
        native_protocol = "5"
        address = "127.0.0.1"

        [[keyspaces]]
        name = "store"

        [[keyspaces.tables]]
        name = "users"
        columns = ["id", "name", "email"]

        [[keyspaces.tables]]
        name = "orders"
        columns = ["order_id", "user_id"]

        [[keyspaces]]
        name = "MixedCase"
    "#;

    fn snapshot() -> SchemaSnapshot {
        SchemaSnapshot::from_toml(SNAPSHOT).unwrap()
    }

    #[test]
    fn test_provider_lists() {
        let schema = snapshot();
        assert_eq!(schema.keyspaces().unwrap(), vec!["store", "MixedCase"]);
        assert_eq!(schema.tables("store").unwrap(), vec!["users", "orders"]);
        assert_eq!(
            schema.columns("store", "users").unwrap(),
            vec!["id", "name", "email"]
        );
        assert!(schema.tables("MixedCase").unwrap().is_empty());
    }

    #[test]
    fn test_lookup_folds_case() {
        let schema = snapshot();
        assert!(schema.keyspace("STORE").is_ok());
        assert!(schema.keyspace(r#""MixedCase""#).is_ok());
        assert!(schema.keyspace("MixedCase").is_ok());
        assert!(schema.keyspace("mixedcase").is_err());
    }

    #[test]
    fn test_unknown_names() {
        let schema = snapshot();

        let err = schema.tables("nope").unwrap_err();
        assert!(matches!(
            err,
            CqlshError::Schema(SchemaError::UnknownKeyspace(ref ks)) if ks == "nope"
        ));

        let err = schema.columns("store", "carts").unwrap_err();
        assert_eq!(err.to_string(), "Schema error: Unknown table: store.carts");
    }

    #[test]
    fn test_cluster_banner() {
        let banner = snapshot().cluster.banner().unwrap();
        let lines: Vec<&str> = banner.lines().collect();
        assert_eq!(lines[0], "Connected to Test Cluster at 127.0.0.1");
        assert_eq!(
            lines[1],
            format!(
                "[cqlsh {} | Cassandra v4.1.3 | CQL Spec 3.4.6 | Native Protocol 5]",
                crate::VERSION
            )
        );
    }

    #[test]
    fn test_default_cluster() {
        let schema = SchemaSnapshot::from_toml("").unwrap();
        assert!(schema.keyspaces.is_empty());

        let banner = schema.cluster.banner().unwrap();
        assert!(banner.starts_with("Connected to Offline Cluster (offline)"));
        assert!(banner.contains("Cassandra unknown"));
    }

    #[test]
    fn test_invalid_snapshots() {
        assert!(SchemaSnapshot::from_toml("keyspaces = 3").is_err());

        let duplicate = r#"
            [[keyspaces]]
            name = "a"
            [[keyspaces]]
            name = "a"
        "#;
        let err = SchemaSnapshot::from_toml(duplicate).unwrap_err();
        assert!(err.to_string().contains("duplicate keyspace 'a'"));

        let bad_version = SchemaSnapshot::from_toml("[cluster]\nrelease_version = \"x\"").unwrap();
        assert!(bad_version.cluster.banner().is_err());
    }
}
