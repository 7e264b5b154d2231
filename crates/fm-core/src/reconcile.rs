//! Whitelist exemption
//!
//! A base key present in the whitelist store removes the blocklist entry with
//! the same key outright. Which priority variant either side retained does
//! not matter here; identity is the base key alone.

use log::debug;

use crate::store::RuleStore;

/// Final rule sets ready for partitioning.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct Reconciled {
    /// Sorted whitelist lines.
    pub whitelist: Vec<String>,
    /// Sorted blocklist lines, whitelist exemptions removed.
    pub blocklist: Vec<String>,
    /// Blocklist entries dropped because the whitelist holds their base key.
    pub removed: usize,
}

/// Remove every blocklist entry whose base key the whitelist also holds.
///
/// Returns the number of removed entries. Remaining entries keep their
/// insertion order.
pub fn cross_filter(whitelist: &RuleStore, blocklist: &mut RuleStore) -> usize {
    let before = blocklist.len();
    blocklist.retain_keys(|key| !whitelist.contains_key(key));
    let removed = before - blocklist.len();
    debug!("cross filter removed {} of {} blocklist entries", removed, before);
    removed
}

/// Apply the cross filter and freeze both stores into sorted sequences.
pub fn reconcile(whitelist: RuleStore, mut blocklist: RuleStore) -> Reconciled {
    let removed = cross_filter(&whitelist, &mut blocklist);
    Reconciled {
        whitelist: whitelist.into_sorted_rules(),
        blocklist: blocklist.into_sorted_rules(),
        removed,
    }
}
