//! Domain types for object analysis
//!
//! These types form the data contract between the worker phase and the
//! single-threaded aggregation phase.

use gix::objs::Kind;
use gix::ObjectId;

use crate::model::CheckoutStats;

/// Per-tree statistics gathered in one pass over the entries, before the
/// recursive roll-up. `max_path_length` covers immediate file entries only.
#[derive(Debug, Default)]
pub struct TreePartial {
    pub num_submodules: u64,
    pub num_symlinks: u64,
    pub num_files: u64,
    pub max_path_length: u64,
    /// Immediate file entries, for size lookup against the blobs table.
    pub blobs: Vec<ObjectId>,
    /// Immediate sub-tree entries with their entry-name length.
    pub subtrees: Vec<(ObjectId, u64)>,
}

/// Roll-up state of one recorded tree. The tag distinguishes a tree whose
/// cumulative statistics are still pending from one already rolled up, so
/// shared sub-trees are traversed at most once.
#[derive(Debug)]
pub enum TreeRollup {
    Pending(TreePartial),
    Rolled(CheckoutStats),
}

/// One annotated tag. `depth` is 0 until resolved; a resolved depth counts
/// the chain of tag objects up to and including this one.
#[derive(Debug)]
pub struct TagNode {
    pub target: ObjectId,
    pub target_kind: Kind,
    pub depth: u64,
}
