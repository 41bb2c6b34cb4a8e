mod analysis;
mod error;

pub use analysis::{
    statistics, Analyzer, CommitDag, GixSource, ObjectAccumulator, ObjectReader, ObjectRecord,
    RepositorySource, TreeEntryRecord, WorkerPool,
};
pub use error::StatsError;
