//! Final statistics report
//!
//! Plain data record assembled once the analysis has quiesced. Serialized
//! field names match the keys consumers see (`repositorySize`,
//! `biggestCheckouts`, ...).

use serde::Serialize;

/// Snapshot of a repository's object database, organized into four groups.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct Report {
    pub repository_size: RepositorySize,
    pub biggest_objects: BiggestObjects,
    pub history_structure: HistoryStructure,
    pub biggest_checkouts: CheckoutStats,
}

/// Per-category object counts and cumulative sizes.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct RepositorySize {
    pub commits: CountAndSize,
    pub trees: TreeTotals,
    pub blobs: CountAndSize,
    pub annotated_tags: Count,
    pub references: Count,
}

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct CountAndSize {
    pub count: u64,
    pub size: u64,
}

/// Tree totals also track the summed entry count of non-empty trees.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct TreeTotals {
    pub count: u64,
    pub size: u64,
    pub entries: u64,
}

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct Count {
    pub count: u64,
}

/// Per-category maxima over individual objects.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct BiggestObjects {
    pub commits: CommitExtremes,
    pub trees: TreeExtremes,
    pub blobs: BlobExtremes,
}

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct CommitExtremes {
    pub max_size: u64,
    pub max_parents: u64,
}

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct TreeExtremes {
    pub max_entries: u64,
}

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct BlobExtremes {
    pub max_size: u64,
}

/// Shape of the commit history: longest commit chain and longest chain of
/// annotated tags pointing at annotated tags.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct HistoryStructure {
    pub max_depth: u64,
    pub max_tag_depth: u64,
}

/// Cumulative working-tree statistics of one tree, or the component-wise
/// maximum over every commit root (`biggestCheckouts`).
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct CheckoutStats {
    pub num_directories: u64,
    pub max_path_depth: u64,
    pub max_path_length: u64,
    pub num_files: u64,
    pub total_file_size: u64,
    pub num_symlinks: u64,
    pub num_submodules: u64,
}

impl CheckoutStats {
    /// Fold `other` in, keeping the maximum of every component.
    pub fn merge_max(&mut self, other: &CheckoutStats) {
        self.num_directories = self.num_directories.max(other.num_directories);
        self.max_path_depth = self.max_path_depth.max(other.max_path_depth);
        self.max_path_length = self.max_path_length.max(other.max_path_length);
        self.num_files = self.num_files.max(other.num_files);
        self.total_file_size = self.total_file_size.max(other.total_file_size);
        self.num_symlinks = self.num_symlinks.max(other.num_symlinks);
        self.num_submodules = self.num_submodules.max(other.num_submodules);
    }
}
