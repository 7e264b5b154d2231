//! Merge pipeline
//!
//! Folds every configured source into its category store, in configured
//! order, then applies the whitelist exemption. Fetching is delegated to a
//! [`SourceLoader`] so the pipeline itself never does I/O.

use log::{debug, info, warn};

use crate::config::Sources;
use crate::reconcile::{reconcile, Reconciled};
use crate::store::{IngestStats, RuleStore};
use crate::types::Category;

/// Supplies the text of one source list.
pub trait SourceLoader {
    /// Text of `source`, or `None` when nothing could be obtained.
    fn load(&self, category: Category, source: &str) -> Option<String>;
}

impl<F> SourceLoader for F
where
    F: Fn(Category, &str) -> Option<String>,
{
    fn load(&self, category: Category, source: &str) -> Option<String> {
        self(category, source)
    }
}

/// Per-source ingestion summary.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SourceStats {
    pub category: Category,
    pub source: String,
    pub loaded: bool,
    pub ingest: IngestStats,
}

/// Outcome of a full merge.
#[derive(Debug, Clone)]
pub struct MergeReport {
    pub reconciled: Reconciled,
    pub sources: Vec<SourceStats>,
}

impl MergeReport {
    /// Sources that produced no text at all.
    pub fn missing_sources(&self) -> impl Iterator<Item = &SourceStats> {
        self.sources.iter().filter(|s| !s.loaded)
    }

    /// Summed ingestion counters for one category.
    pub fn totals(&self, category: Category) -> IngestStats {
        let mut totals = IngestStats::default();
        for stats in self.sources.iter().filter(|s| s.category == category) {
            totals.merge(&stats.ingest);
        }
        totals
    }
}

/// Build both category stores from `sources` and reconcile them.
pub fn merge<L: SourceLoader + ?Sized>(sources: &Sources, loader: &L) -> MergeReport {
    let mut stats = Vec::with_capacity(sources.total());

    let whitelist = fold_category(Category::Whitelist, sources, loader, &mut stats);
    let blocklist = fold_category(Category::Blocklist, sources, loader, &mut stats);

    let reconciled = reconcile(whitelist, blocklist);

    info!("Merged {} whitelist rules", reconciled.whitelist.len());
    info!(
        "Removed {} blocklist rules exempted by the whitelist",
        reconciled.removed
    );
    info!("Merged {} blocklist rules", reconciled.blocklist.len());

    MergeReport {
        reconciled,
        sources: stats,
    }
}

fn fold_category<L: SourceLoader + ?Sized>(
    category: Category,
    sources: &Sources,
    loader: &L,
    stats: &mut Vec<SourceStats>,
) -> RuleStore {
    let mut store = RuleStore::new(category);

    for source in sources.for_category(category) {
        let text = loader.load(category, source);
        if text.is_none() {
            warn!("[{}] no content for {}", category, source);
        }

        let ingest = store.ingest_blob(text.as_deref());
        debug!(
            "[{}] {} - {} lines, {} new, {} replaced, {} kept",
            category, source, ingest.lines, ingest.inserted, ingest.replaced, ingest.kept
        );

        stats.push(SourceStats {
            category,
            source: source.clone(),
            loaded: text.is_some(),
            ingest,
        });
    }

    store
}
