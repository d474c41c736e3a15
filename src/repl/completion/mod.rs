//! Completion system for the cqlsh REPL
//!
//! Completion re-tokenizes the buffer on every request and walks the INSERT
//! grammar until the first position that needs more input. Schema names for
//! that position come from a [`SchemaProvider`] and are narrowed to the typed
//! prefix with a [`Trie`].
//!
//! # Architecture
//!
//! - **Trie**: Compressed prefix tree returning completion suffixes
//! - **Provider**: Schema metadata interface and candidate ranking
//! - **Driver**: Grammar walk producing [`Completions`]
//!
//! # Examples
//!
//! ```
//! use cqlsh::repl::completion::complete;
//! use cqlsh::schema::SchemaSnapshot;
//!
//! let schema = SchemaSnapshot::from_toml(r#"
//!     [[keyspaces]]
//!     name = "store"
//!
//!     [[keyspaces.tables]]
//!     name = "users"
//!     columns = ["id", "name"]
//! "#).unwrap();
//!
//! let completions = complete("insert into store.users (", &schema);
//! assert_eq!(completions.suffixes, vec!["id", "name"]);
//! ```

mod driver;
mod provider;
mod trie;

pub use driver::{Completions, complete};
pub use provider::{SchemaProvider, rank, rank_candidates};
pub use trie::{Node, Trie, common_prefix_len};
