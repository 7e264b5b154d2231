//! Per-category reconciliation store
//!
//! One store exists per category for the whole run. Source lists are folded
//! into it line by line; the store keeps exactly one verbatim line per base
//! key and settles conflicts with a policy that only looks at the priority
//! flag, so the result does not depend on arrival order.

use indexmap::IndexMap;

use crate::rule::RuleLine;
use crate::types::{Category, COMMENT_PREFIXES, EXCEPTION_PREFIX};

/// What happened to a single ingested line.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum IngestOutcome {
    /// Blank, comment, or an exception line offered to the blocklist.
    Skipped,
    /// First line seen for its base key.
    Inserted,
    /// Took over the base key from the previously retained line.
    Replaced,
    /// Lost against the previously retained line.
    Kept,
}

/// Line counters for one or more ingested blobs.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct IngestStats {
    pub lines: usize,
    pub skipped: usize,
    pub inserted: usize,
    pub replaced: usize,
    pub kept: usize,
}

impl IngestStats {
    fn record(&mut self, outcome: IngestOutcome) {
        self.lines += 1;
        match outcome {
            IngestOutcome::Skipped => self.skipped += 1,
            IngestOutcome::Inserted => self.inserted += 1,
            IngestOutcome::Replaced => self.replaced += 1,
            IngestOutcome::Kept => self.kept += 1,
        }
    }

    pub fn merge(&mut self, other: &IngestStats) {
        self.lines += other.lines;
        self.skipped += other.skipped;
        self.inserted += other.inserted;
        self.replaced += other.replaced;
        self.kept += other.kept;
    }
}

/// Insertion-ordered map from base key to the retained rule line.
#[derive(Debug, Clone)]
pub struct RuleStore {
    category: Category,
    entries: IndexMap<String, String>,
}

impl RuleStore {
    pub fn new(category: Category) -> Self {
        Self {
            category,
            entries: IndexMap::new(),
        }
    }

    /// Offer one line to the store.
    pub fn ingest(&mut self, raw_line: &str) -> IngestOutcome {
        let line = raw_line.trim();
        if self.should_skip(line) {
            return IngestOutcome::Skipped;
        }

        let rule = RuleLine::new(line);
        let incoming_flagged = rule.has_priority_flag();
        let category = self.category;

        if let Some(current) = self.entries.get_mut(&*rule.key) {
            let current_flagged = *current != *rule.key;
            if incoming_wins(category, incoming_flagged, current_flagged) {
                *current = line.to_string();
                return IngestOutcome::Replaced;
            }
            return IngestOutcome::Kept;
        }

        self.entries.insert(rule.key.into_owned(), line.to_string());
        IngestOutcome::Inserted
    }

    /// Fold a blob into the store. `\n`, `\r\n` and a lone `\r` all end a line.
    pub fn ingest_text(&mut self, text: &str) -> IngestStats {
        let mut stats = IngestStats::default();
        for line in split_lines(text) {
            stats.record(self.ingest(line));
        }
        stats
    }

    /// Fold a blob that may be missing. A missing blob changes nothing.
    pub fn ingest_blob(&mut self, text: Option<&str>) -> IngestStats {
        match text {
            Some(text) => self.ingest_text(text),
            None => IngestStats::default(),
        }
    }

    fn should_skip(&self, line: &str) -> bool {
        if line.is_empty() || line.starts_with(COMMENT_PREFIXES) {
            return true;
        }
        !self.category.is_whitelist() && line.starts_with(EXCEPTION_PREFIX)
    }

    #[inline]
    pub fn len(&self) -> usize {
        self.entries.len()
    }

    #[inline]
    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    #[inline]
    pub fn contains_key(&self, key: &str) -> bool {
        self.entries.contains_key(key)
    }

    /// Retained line for a base key.
    pub fn get(&self, key: &str) -> Option<&str> {
        self.entries.get(key).map(String::as_str)
    }

    /// `(base key, retained line)` pairs in insertion order.
    pub fn iter(&self) -> impl Iterator<Item = (&str, &str)> {
        self.entries.iter().map(|(k, v)| (k.as_str(), v.as_str()))
    }

    /// Retained lines in insertion order.
    pub fn rules(&self) -> impl Iterator<Item = &str> {
        self.entries.values().map(String::as_str)
    }

    pub(crate) fn retain_keys<F>(&mut self, mut keep: F)
    where
        F: FnMut(&str) -> bool,
    {
        self.entries.retain(|key, _| keep(key));
    }

    /// Consume the store, returning the retained lines sorted.
    pub fn into_sorted_rules(self) -> Vec<String> {
        let mut rules: Vec<String> = self.entries.into_values().collect();
        rules.sort();
        rules
    }
}

fn split_lines(text: &str) -> impl Iterator<Item = &str> {
    let mut rest = text;
    std::iter::from_fn(move || {
        if rest.is_empty() {
            return None;
        }
        match rest.find(['\r', '\n']) {
            Some(pos) => {
                let line = &rest[..pos];
                let width = if rest[pos..].starts_with("\r\n") { 2 } else { 1 };
                rest = &rest[pos + width..];
                Some(line)
            }
            None => {
                let line = rest;
                rest = "";
                Some(line)
            }
        }
    })
}

/// Conflict policy for two lines sharing a base key.
fn incoming_wins(category: Category, incoming_flagged: bool, current_flagged: bool) -> bool {
    match category {
        Category::Whitelist => incoming_flagged && !current_flagged,
        Category::Blocklist => !incoming_flagged && current_flagged,
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn retained(store: &RuleStore) -> Vec<&str> {
        let mut rules: Vec<&str> = store.rules().collect();
        rules.sort();
        rules
    }

    #[test]
    fn whitelist_prefers_priority_flag_in_either_order() {
        let mut store = RuleStore::new(Category::Whitelist);
        store.ingest("ad.example^");
        assert_eq!(store.ingest("ad.example^$important"), IngestOutcome::Replaced);
        assert_eq!(store.get("ad.example^"), Some("ad.example^$important"));

        let mut store = RuleStore::new(Category::Whitelist);
        store.ingest("ad.example^$important");
        assert_eq!(store.ingest("ad.example^"), IngestOutcome::Kept);
        assert_eq!(store.get("ad.example^"), Some("ad.example^$important"));
    }

    #[test]
    fn blocklist_prefers_plain_rule_in_either_order() {
        let mut store = RuleStore::new(Category::Blocklist);
        store.ingest("ad.example^");
        assert_eq!(store.ingest("ad.example^$important"), IngestOutcome::Kept);
        assert_eq!(store.get("ad.example^"), Some("ad.example^"));

        let mut store = RuleStore::new(Category::Blocklist);
        store.ingest("ad.example^$important");
        assert_eq!(store.ingest("ad.example^"), IngestOutcome::Replaced);
        assert_eq!(store.get("ad.example^"), Some("ad.example^"));
    }

    #[test]
    fn first_variant_of_winning_kind_is_kept_verbatim() {
        let mut store = RuleStore::new(Category::Whitelist);
        store.ingest("x.com$script,important");
        assert_eq!(store.ingest("x.com$script, important"), IngestOutcome::Kept);
        assert_eq!(store.get("x.com$script"), Some("x.com$script,important"));
        assert_eq!(store.len(), 1);
    }

    #[test]
    fn skips_blank_and_comment_lines() {
        let mut store = RuleStore::new(Category::Whitelist);
        let stats = store.ingest_text("! comment\n\n# another\n   \n");
        assert!(store.is_empty());
        assert_eq!(stats.lines, 4);
        assert_eq!(stats.skipped, 4);
    }

    #[test]
    fn blocklist_drops_exception_rules() {
        let mut store = RuleStore::new(Category::Blocklist);
        let stats = store.ingest_text("! comment\n\n@@ad.example^");
        assert!(store.is_empty());
        assert_eq!(stats.skipped, 3);
    }

    #[test]
    fn whitelist_accepts_exception_rules() {
        let mut store = RuleStore::new(Category::Whitelist);
        store.ingest_text("@@||ad.example^$important\n@@||ad.example^");
        assert_eq!(store.len(), 1);
        assert_eq!(store.get("@@||ad.example^"), Some("@@||ad.example^$important"));
    }

    #[test]
    fn carriage_return_only_blobs_split_into_lines() {
        let mut store = RuleStore::new(Category::Blocklist);
        let stats = store.ingest_text("a.com\rb.com\r! c");
        assert_eq!(stats.lines, 3);
        assert_eq!(stats.skipped, 1);
        assert_eq!(store.into_sorted_rules(), vec!["a.com", "b.com"]);
    }

    #[test]
    fn mixed_line_endings_count_each_line_once() {
        let lines: Vec<&str> = split_lines("a\r\nb\rc\n\nd\r\n").collect();
        assert_eq!(lines, vec!["a", "b", "c", "", "d"]);
        assert_eq!(split_lines("").count(), 0);
    }

    #[test]
    fn surrounding_whitespace_is_trimmed() {
        let mut store = RuleStore::new(Category::Blocklist);
        store.ingest("  ad.example^  \r");
        assert_eq!(store.get("ad.example^"), Some("ad.example^"));
    }

    #[test]
    fn missing_blob_is_a_no_op() {
        let mut store = RuleStore::new(Category::Blocklist);
        let stats = store.ingest_blob(None);
        assert_eq!(stats, IngestStats::default());
        assert!(store.is_empty());
    }

    #[test]
    fn ingesting_twice_is_idempotent() {
        let lines = "a.com\nb.com$important\nb.com\nc.com$script,important";

        for category in Category::ALL {
            let mut once = RuleStore::new(category);
            once.ingest_text(lines);

            let mut twice = RuleStore::new(category);
            twice.ingest_text(lines);
            let reversed: Vec<&str> = lines.lines().rev().collect();
            twice.ingest_text(&reversed.join("\n"));

            assert_eq!(retained(&once), retained(&twice));
        }
    }

    #[test]
    fn policy_is_confluent_over_permutations() {
        let variants = ["k.com$important", "k.com", "k.com$ important"];
        let orders = [
            [0, 1, 2],
            [0, 2, 1],
            [1, 0, 2],
            [1, 2, 0],
            [2, 0, 1],
            [2, 1, 0],
        ];

        for order in orders {
            let mut white = RuleStore::new(Category::Whitelist);
            let mut block = RuleStore::new(Category::Blocklist);
            for idx in order {
                white.ingest(variants[idx]);
                block.ingest(variants[idx]);
            }
            assert_eq!(white.len(), 1);
            assert!(crate::rule::has_priority_flag(white.get("k.com").unwrap()));
            assert_eq!(block.get("k.com"), Some("k.com"));
        }
    }

    #[test]
    fn sorted_output_and_stats() {
        let mut store = RuleStore::new(Category::Blocklist);
        let stats = store.ingest_text("c.com\na.com$important\nb.com\na.com\nb.com");
        assert_eq!(stats.inserted, 3);
        assert_eq!(stats.replaced, 1);
        assert_eq!(stats.kept, 1);
        assert_eq!(store.into_sorted_rules(), vec!["a.com", "b.com", "c.com"]);
    }
}
