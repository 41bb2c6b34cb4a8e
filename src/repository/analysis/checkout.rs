//! Checkout statistics roll-up
//!
//! Depth-first memoized recursion over the recorded trees: each tree's
//! partial statistics are folded together with its sub-trees' cumulative
//! statistics exactly once, and the result replaces the partial record.
//! Recursion depth is bounded by the deepest path in any checkout.

use gix::ObjectId;

use super::accumulator::{BlobTable, TreeTable};
use super::types::{TreePartial, TreeRollup};
use crate::model::CheckoutStats;
use crate::repository::error::StatsError;

pub struct TreeAggregator<'a> {
    trees: &'a mut TreeTable,
    blobs: &'a BlobTable,
}

impl<'a> TreeAggregator<'a> {
    pub(crate) fn new(trees: &'a mut TreeTable, blobs: &'a BlobTable) -> Self {
        Self { trees, blobs }
    }

    /// Cumulative statistics for a commit's root tree. A root absent from
    /// the trees table is the filtered empty tree and yields all zeros.
    pub(crate) fn checkout_stats(&mut self, root: ObjectId) -> Result<CheckoutStats, StatsError> {
        if !self.trees.records.contains_key(&root) {
            return Ok(CheckoutStats::default());
        }
        self.roll_up(root)
    }

    fn roll_up(&mut self, oid: ObjectId) -> Result<CheckoutStats, StatsError> {
        let partial: TreePartial = match self.trees.records.get_mut(&oid) {
            None => return Err(StatsError::InternalMissing { oid, table: "trees" }),
            Some(TreeRollup::Rolled(stats)) => return Ok(*stats),
            Some(TreeRollup::Pending(partial)) => std::mem::take(partial),
        };

        let mut stats = CheckoutStats {
            num_directories: 1,
            max_path_depth: 1,
            max_path_length: partial.max_path_length,
            num_files: partial.num_files,
            total_file_size: 0,
            num_symlinks: partial.num_symlinks,
            num_submodules: partial.num_submodules,
        };

        for blob in &partial.blobs {
            let size = self.blobs.size_of(blob).ok_or(StatsError::InternalMissing {
                oid: *blob,
                table: "blobs",
            })?;
            stats.total_file_size += size;
        }

        for &(child, name_len) in &partial.subtrees {
            // An unrecorded child is the empty tree; it contributes nothing.
            if !self.trees.records.contains_key(&child) {
                continue;
            }
            let child_stats = self.roll_up(child)?;
            stats.num_directories += child_stats.num_directories;
            stats.max_path_depth = stats.max_path_depth.max(child_stats.max_path_depth + 1);
            stats.max_path_length = stats
                .max_path_length
                .max(name_len + 1 + child_stats.max_path_length);
            stats.num_files += child_stats.num_files;
            stats.total_file_size += child_stats.total_file_size;
            stats.num_symlinks += child_stats.num_symlinks;
            stats.num_submodules += child_stats.num_submodules;
        }

        if let Some(record) = self.trees.records.get_mut(&oid) {
            *record = TreeRollup::Rolled(stats);
        }
        Ok(stats)
    }
}
