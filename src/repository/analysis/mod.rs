//! Repository statistics engine
//!
//! Walks the whole object database in parallel and aggregates a single
//! report: per-category sizes, object-shape extremes, history depth, and
//! the largest checkout any commit projects.
//!
//! # Architecture
//!
//! The engine is organized into layers:
//!
//! - **store**: read-only object database access (traits + gix backend)
//! - **pool**: worker threads over a bounded queue with sentinel shutdown
//! - **accumulator**: per-category tables behind per-category locks
//! - **dag**: commit graph and iterative max-depth peeling
//! - **checkout**: memoized roll-up of per-tree statistics
//! - **tags**: annotated-tag chain depths
//! - **analyzer**: the orchestrator tying the phases together
//!
//! A run moves through `Iterating` (producer walks the database, workers
//! look objects up and accumulate) into `Draining` (shutdown joins the
//! pool) and ends with single-threaded `Aggregating` over the quiesced
//! tables. Any error aborts the run; no partial report is emitted.

mod accumulator;
mod checkout;
mod dag;
mod pool;
mod store;
mod tags;
mod types;

pub use accumulator::ObjectAccumulator;
pub use dag::CommitDag;
pub use pool::WorkerPool;
pub use store::{GixSource, ObjectReader, ObjectRecord, RepositorySource, TreeEntryRecord};

use log::debug;
use std::path::Path;
use std::sync::Arc;
use std::time::Instant;

use checkout::TreeAggregator;
use tags::TagDepthResolver;

use crate::model::{
    BiggestObjects, BlobExtremes, CheckoutStats, CommitExtremes, Count, CountAndSize,
    HistoryStructure, Report, RepositorySize, TreeExtremes, TreeTotals,
};
use crate::repository::error::StatsError;

/// Upper bound on queued work items; the producer blocks once it gets this
/// far ahead of the workers.
const QUEUE_CAPACITY: usize = 1024;

/// Compute full statistics for the repository at `path`.
pub fn statistics(path: impl AsRef<Path>) -> Result<Report, StatsError> {
    Analyzer::new(GixSource::open(path.as_ref())?).run()
}

/// Orchestrates one analysis run and owns all of its state.
pub struct Analyzer<S> {
    source: S,
    workers: usize,
}

impl<S: RepositorySource> Analyzer<S> {
    pub fn new(source: S) -> Self {
        let workers = std::thread::available_parallelism()
            .map(|n| n.get())
            .unwrap_or(1)
            .max(4);
        Self { source, workers }
    }

    /// Override the worker count (mainly for tests).
    pub fn with_workers(mut self, workers: usize) -> Self {
        self.workers = workers.max(1);
        self
    }

    pub fn run(self) -> Result<Report, StatsError> {
        let total = Instant::now();
        let accumulator = Arc::new(ObjectAccumulator::new());

        // Worker phase: each worker looks objects up through its own reader
        // and folds them into the shared accumulator.
        let mut handlers = Vec::with_capacity(self.workers);
        for _ in 0..self.workers {
            let mut reader = self.source.open_reader()?;
            let accumulator = Arc::clone(&accumulator);
            handlers.push(move |oid: gix::ObjectId| -> Result<(), StatsError> {
                let record = reader.lookup(oid)?;
                accumulator.accumulate(oid, record);
                Ok(())
            });
        }
        let pool = WorkerPool::spawn(QUEUE_CAPACITY, handlers);

        let phase = Instant::now();
        let mut producer = self.source.open_reader()?;
        let iteration = producer.for_each_oid(&mut |oid| {
            pool.submit(oid);
            Ok(())
        });
        let drained = pool.shutdown();
        debug!(
            "object walk with {} workers finished in {:?}",
            self.workers,
            phase.elapsed()
        );
        // A worker failure takes precedence: an aborted producer is usually
        // its consequence.
        drained?;
        iteration?;

        // Aggregation phase: the pool has quiesced, locks are uncontended.
        let phase = Instant::now();
        let report = self.assemble(&accumulator)?;
        debug!("aggregation finished in {:?}", phase.elapsed());
        debug!("statistics computed in {:?}", total.elapsed());
        Ok(report)
    }

    fn assemble(&self, accumulator: &ObjectAccumulator) -> Result<Report, StatsError> {
        let mut commits = accumulator.commits();
        let mut trees = accumulator.trees();
        let blobs = accumulator.blobs();
        let mut tags = accumulator.tags();

        debug!(
            "accumulated {} commits, {} trees, {} blobs, {} tags",
            commits.records.len(),
            trees.records.len(),
            blobs.records.len(),
            tags.records.len()
        );

        let mut biggest_checkouts = CheckoutStats::default();
        {
            let mut aggregator = TreeAggregator::new(&mut trees, &blobs);
            for root in commits.records.values() {
                biggest_checkouts.merge_max(&aggregator.checkout_stats(*root)?);
            }
        }

        let max_tag_depth = TagDepthResolver::new(&mut tags).max_depth()?;
        let max_depth = commits.dag.max_depth();
        let references = self.source.reference_count()?;

        Ok(Report {
            repository_size: RepositorySize {
                commits: CountAndSize {
                    count: commits.records.len() as u64,
                    size: commits.total_size,
                },
                trees: TreeTotals {
                    count: trees.records.len() as u64,
                    size: trees.total_size,
                    entries: trees.total_entries,
                },
                blobs: CountAndSize {
                    count: blobs.records.len() as u64,
                    size: blobs.total_size,
                },
                annotated_tags: Count {
                    count: tags.records.len() as u64,
                },
                references: Count { count: references },
            },
            biggest_objects: BiggestObjects {
                commits: CommitExtremes {
                    max_size: commits.max_size,
                    max_parents: commits.max_parents,
                },
                trees: TreeExtremes {
                    max_entries: trees.max_entries,
                },
                blobs: BlobExtremes {
                    max_size: blobs.max_size,
                },
            },
            history_structure: HistoryStructure {
                max_depth,
                max_tag_depth,
            },
            biggest_checkouts,
        })
    }
}
