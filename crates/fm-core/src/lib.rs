//! FilterMerge Core Library
//!
//! This crate provides the rule reconciliation engine used to merge many
//! third-party filter lists into one whitelist and one blocklist.
//!
//! # Architecture
//!
//! Every rule line gets a base key: the line with the `important` modifier
//! hidden. Lines sharing a base key are the same logical rule. Each category
//! folds all of its source lists into one [`RuleStore`], resolving duplicates
//! with a fixed priority policy, and the blocklist is then cut down by
//! removing every base key the whitelist also holds.
//!
//! Nothing here touches the network. Source text arrives through the
//! [`SourceLoader`] trait and results leave as plain sorted vectors.
//!
//! # Modules
//!
//! - `rule`: base key extraction and priority flag detection
//! - `store`: per-category reconciliation store
//! - `reconcile`: whitelist exemption of blocklist entries
//! - `config`: source list configuration
//! - `merge`: the full fold over configured sources
//! - `types`: shared type definitions

pub mod config;
pub mod merge;
pub mod reconcile;
pub mod rule;
pub mod store;
pub mod types;

// Re-export commonly used types
pub use config::{ConfigError, Sources};
pub use merge::{merge, MergeReport, SourceLoader, SourceStats};
pub use reconcile::{cross_filter, reconcile, Reconciled};
pub use rule::{base_key, has_priority_flag, RuleLine};
pub use store::{IngestOutcome, IngestStats, RuleStore};
pub use types::Category;
