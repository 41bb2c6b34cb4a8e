mod report;

pub use report::{
    BiggestObjects, BlobExtremes, CheckoutStats, CommitExtremes, Count, CountAndSize,
    HistoryStructure, Report, RepositorySize, TreeExtremes, TreeTotals,
};
