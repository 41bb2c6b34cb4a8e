//! Per-category accumulation tables
//!
//! Four independent mutexes, one per object category, each guarding an
//! OID-keyed table plus its running totals. The granularity keeps commit
//! handlers from ever blocking blob or tree handlers; every critical section
//! is a single map insertion plus scalar updates.
//!
//! Insertions are idempotent: the object database may surface an OID more
//! than once (e.g. both packed and loose), and only the first insertion
//! counts.

use gix::objs::tree::EntryKind;
use gix::objs::Kind;
use gix::ObjectId;
use rustc_hash::FxHashMap;
use std::sync::{Mutex, MutexGuard, PoisonError};

use super::dag::CommitDag;
use super::store::{ObjectRecord, TreeEntryRecord};
use super::types::{TagNode, TreePartial, TreeRollup};

/// Commits table: OID to root-tree OID, plus the commit graph, which is
/// only ever mutated under this table's lock.
#[derive(Default)]
pub(crate) struct CommitTable {
    pub(crate) records: FxHashMap<ObjectId, ObjectId>,
    pub(crate) total_size: u64,
    pub(crate) max_size: u64,
    pub(crate) max_parents: u64,
    pub(crate) dag: CommitDag,
}

/// Trees table: OID to roll-up state. Empty trees are never recorded.
#[derive(Default)]
pub(crate) struct TreeTable {
    pub(crate) records: FxHashMap<ObjectId, TreeRollup>,
    pub(crate) total_size: u64,
    pub(crate) total_entries: u64,
    pub(crate) max_entries: u64,
}

/// Blobs table: OID to raw content size.
#[derive(Default)]
pub(crate) struct BlobTable {
    pub(crate) records: FxHashMap<ObjectId, u64>,
    pub(crate) total_size: u64,
    pub(crate) max_size: u64,
}

impl BlobTable {
    pub(crate) fn size_of(&self, oid: &ObjectId) -> Option<u64> {
        self.records.get(oid).copied()
    }
}

#[derive(Default)]
pub(crate) struct TagTable {
    pub(crate) records: FxHashMap<ObjectId, TagNode>,
}

#[derive(Default)]
pub struct ObjectAccumulator {
    commits: Mutex<CommitTable>,
    trees: Mutex<TreeTable>,
    blobs: Mutex<BlobTable>,
    tags: Mutex<TagTable>,
}

fn lock<T>(mutex: &Mutex<T>) -> MutexGuard<'_, T> {
    // Handlers never panic while holding a lock; recover the data if one did.
    mutex.lock().unwrap_or_else(PoisonError::into_inner)
}

impl ObjectAccumulator {
    pub fn new() -> Self {
        Self::default()
    }

    /// Fold one looked-up object into its category table. Safe to call from
    /// any number of worker threads; re-delivery of an OID is a no-op.
    pub fn accumulate(&self, oid: ObjectId, record: ObjectRecord<'_>) {
        match record {
            ObjectRecord::Commit {
                size,
                tree,
                parents,
            } => self.record_commit(oid, size, tree, &parents),
            ObjectRecord::Tree { size, entries } => self.record_tree(oid, size, &entries),
            ObjectRecord::Blob { size } => self.record_blob(oid, size),
            ObjectRecord::Tag {
                target,
                target_kind,
            } => self.record_tag(oid, target, target_kind),
        }
    }

    fn record_commit(&self, oid: ObjectId, size: u64, tree: ObjectId, parents: &[ObjectId]) {
        let mut commits = lock(&self.commits);
        if commits.records.insert(oid, tree).is_none() {
            commits.total_size += size;
            commits.max_size = commits.max_size.max(size);
            commits.max_parents = commits.max_parents.max(parents.len() as u64);
            commits.dag.add_node(oid, parents);
        }
    }

    fn record_tree(&self, oid: ObjectId, size: u64, entries: &[TreeEntryRecord<'_>]) {
        // The canonical empty tree carries no checkout and is not counted.
        if entries.is_empty() {
            return;
        }
        let partial = TreePartial::from_entries(entries);
        let entry_count = entries.len() as u64;
        let mut trees = lock(&self.trees);
        if trees.records.contains_key(&oid) {
            return;
        }
        trees.records.insert(oid, TreeRollup::Pending(partial));
        trees.total_size += size;
        trees.total_entries += entry_count;
        trees.max_entries = trees.max_entries.max(entry_count);
    }

    fn record_blob(&self, oid: ObjectId, size: u64) {
        let mut blobs = lock(&self.blobs);
        if blobs.records.insert(oid, size).is_none() {
            blobs.total_size += size;
            blobs.max_size = blobs.max_size.max(size);
        }
    }

    fn record_tag(&self, oid: ObjectId, target: ObjectId, target_kind: Kind) {
        let mut tags = lock(&self.tags);
        // Overwrite is fine: the database guarantees identical content per OID.
        tags.records.insert(
            oid,
            TagNode {
                target,
                target_kind,
                depth: 0,
            },
        );
    }

    pub(crate) fn commits(&self) -> MutexGuard<'_, CommitTable> {
        lock(&self.commits)
    }

    pub(crate) fn trees(&self) -> MutexGuard<'_, TreeTable> {
        lock(&self.trees)
    }

    pub(crate) fn blobs(&self) -> MutexGuard<'_, BlobTable> {
        lock(&self.blobs)
    }

    pub(crate) fn tags(&self) -> MutexGuard<'_, TagTable> {
        lock(&self.tags)
    }
}

impl TreePartial {
    /// One pass over a tree's entries. Symlinks and submodules are counted
    /// on their own and contribute no file, size, or path length.
    fn from_entries(entries: &[TreeEntryRecord<'_>]) -> Self {
        let mut partial = TreePartial::default();
        for entry in entries {
            match entry.mode.kind() {
                EntryKind::Tree => {
                    partial.subtrees.push((entry.oid, entry.name.len() as u64));
                }
                EntryKind::Blob | EntryKind::BlobExecutable => {
                    partial.num_files += 1;
                    partial.max_path_length = partial.max_path_length.max(entry.name.len() as u64);
                    partial.blobs.push(entry.oid);
                }
                EntryKind::Link => partial.num_symlinks += 1,
                EntryKind::Commit => partial.num_submodules += 1,
            }
        }
        partial
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use gix::bstr::ByteSlice;

    fn oid(n: u8) -> ObjectId {
        ObjectId::from([n; 20])
    }

    fn entry(kind: EntryKind, name: &'static str, target: ObjectId) -> TreeEntryRecord<'static> {
        TreeEntryRecord {
            mode: kind.into(),
            name: name.as_bytes().as_bstr(),
            oid: target,
        }
    }

    #[test]
    fn test_commit_insertion_is_idempotent() {
        let acc = ObjectAccumulator::new();
        acc.record_commit(oid(1), 100, oid(10), &[]);
        acc.record_commit(oid(1), 100, oid(10), &[]);
        let commits = acc.commits();
        assert_eq!(commits.records.len(), 1);
        assert_eq!(commits.total_size, 100);
        assert_eq!(commits.max_size, 100);
    }

    #[test]
    fn test_commit_extremes_track_maxima() {
        let acc = ObjectAccumulator::new();
        acc.record_commit(oid(1), 100, oid(10), &[]);
        acc.record_commit(oid(2), 250, oid(10), &[oid(1)]);
        acc.record_commit(oid(3), 50, oid(10), &[oid(1), oid(2)]);
        let commits = acc.commits();
        assert_eq!(commits.total_size, 400);
        assert_eq!(commits.max_size, 250);
        assert_eq!(commits.max_parents, 2);
    }

    #[test]
    fn test_empty_tree_is_discarded() {
        let acc = ObjectAccumulator::new();
        acc.record_tree(oid(1), 12, &[]);
        let trees = acc.trees();
        assert!(trees.records.is_empty());
        assert_eq!(trees.total_size, 0);
        assert_eq!(trees.max_entries, 0);
    }

    #[test]
    fn test_tree_entry_classification() {
        let acc = ObjectAccumulator::new();
        let entries = vec![
            entry(EntryKind::Blob, "file.txt", oid(10)),
            entry(EntryKind::BlobExecutable, "run.sh", oid(11)),
            entry(EntryKind::Link, "link", oid(12)),
            entry(EntryKind::Commit, "sub", oid(13)),
            entry(EntryKind::Tree, "dir", oid(14)),
        ];
        acc.record_tree(oid(1), 64, &entries);
        let trees = acc.trees();
        assert_eq!(trees.total_entries, 5);
        assert_eq!(trees.max_entries, 5);
        match trees.records.get(&oid(1)) {
            Some(TreeRollup::Pending(partial)) => {
                assert_eq!(partial.num_files, 2);
                assert_eq!(partial.num_symlinks, 1);
                assert_eq!(partial.num_submodules, 1);
                assert_eq!(partial.max_path_length, 8);
                assert_eq!(partial.blobs, vec![oid(10), oid(11)]);
                assert_eq!(partial.subtrees, vec![(oid(14), 3)]);
            }
            other => panic!("unexpected roll-up state: {:?}", other),
        }
    }

    #[test]
    fn test_blob_insertion_is_idempotent() {
        let acc = ObjectAccumulator::new();
        acc.record_blob(oid(1), 10);
        acc.record_blob(oid(1), 10);
        acc.record_blob(oid(2), 30);
        let blobs = acc.blobs();
        assert_eq!(blobs.records.len(), 2);
        assert_eq!(blobs.total_size, 40);
        assert_eq!(blobs.max_size, 30);
    }

    #[test]
    fn test_tag_overwrite_keeps_single_record() {
        let acc = ObjectAccumulator::new();
        acc.record_tag(oid(1), oid(2), Kind::Commit);
        acc.record_tag(oid(1), oid(2), Kind::Commit);
        let tags = acc.tags();
        assert_eq!(tags.records.len(), 1);
        assert_eq!(tags.records.get(&oid(1)).map(|t| t.depth), Some(0));
    }
}
