//! Read-only object store access
//!
//! `ObjectReader` is the view of the object database the engine consumes:
//! iterate every object id, and look one object up with just enough decoding
//! for statistics. `RepositorySource` hands out one reader per worker thread
//! so lookups can run concurrently while the producer iterates.

use gix::bstr::BStr;
use gix::objs::tree::EntryMode;
use gix::objs::{CommitRef, Kind, TagRef, TreeRef};
use gix::prelude::Find;
use gix::ObjectId;
use std::path::Path;

use crate::repository::error::StatsError;

/// One object, decoded just enough for statistics.
#[derive(Debug)]
pub enum ObjectRecord<'a> {
    Commit {
        /// Serialized object size in bytes.
        size: u64,
        tree: ObjectId,
        parents: Vec<ObjectId>,
    },
    Tree {
        size: u64,
        entries: Vec<TreeEntryRecord<'a>>,
    },
    Blob {
        /// Raw content size in bytes.
        size: u64,
    },
    Tag {
        target: ObjectId,
        target_kind: Kind,
    },
}

/// A single tree entry as surfaced by [`ObjectReader::lookup`].
#[derive(Debug)]
pub struct TreeEntryRecord<'a> {
    pub mode: EntryMode,
    pub name: &'a BStr,
    pub oid: ObjectId,
}

/// Read-only view of the object database held by one thread.
pub trait ObjectReader {
    /// Invoke `visit` once per object present, in unspecified order. Other
    /// readers of the same source may call `lookup` concurrently.
    fn for_each_oid(
        &mut self,
        visit: &mut dyn FnMut(ObjectId) -> Result<(), StatsError>,
    ) -> Result<(), StatsError>;

    /// Look up one object. The record borrows the reader's internal buffer
    /// and is valid until the next lookup.
    fn lookup(&mut self, oid: ObjectId) -> Result<ObjectRecord<'_>, StatsError>;
}

/// Shared handle from which per-thread readers are opened.
pub trait RepositorySource: Sync {
    type Reader: ObjectReader + Send + 'static;

    fn open_reader(&self) -> Result<Self::Reader, StatsError>;

    /// Number of reference names in the repository.
    fn reference_count(&self) -> Result<u64, StatsError>;
}

/// [`RepositorySource`] backed by a git repository on disk.
pub struct GixSource {
    repo: gix::ThreadSafeRepository,
}

impl GixSource {
    pub fn open(path: &Path) -> Result<Self, StatsError> {
        let repo = gix::ThreadSafeRepository::open(path).map_err(StatsError::open)?;
        Ok(Self { repo })
    }
}

impl RepositorySource for GixSource {
    type Reader = GixReader;

    fn open_reader(&self) -> Result<GixReader, StatsError> {
        Ok(GixReader {
            repo: self.repo.to_thread_local(),
            buf: Vec::new(),
        })
    }

    fn reference_count(&self) -> Result<u64, StatsError> {
        let repo = self.repo.to_thread_local();
        let platform = repo.references().map_err(StatsError::references)?;
        let mut count = 0u64;
        for reference in platform.all().map_err(StatsError::references)? {
            reference.map_err(StatsError::references)?;
            count += 1;
        }
        Ok(count)
    }
}

/// Thread-local reader over a repository's object database, with a reusable
/// decode buffer.
pub struct GixReader {
    repo: gix::Repository,
    buf: Vec<u8>,
}

impl ObjectReader for GixReader {
    fn for_each_oid(
        &mut self,
        visit: &mut dyn FnMut(ObjectId) -> Result<(), StatsError>,
    ) -> Result<(), StatsError> {
        let iter = self.repo.objects.iter().map_err(StatsError::iteration)?;
        for oid in iter {
            let oid = oid.map_err(StatsError::iteration)?;
            visit(oid)?;
        }
        Ok(())
    }

    fn lookup(&mut self, oid: ObjectId) -> Result<ObjectRecord<'_>, StatsError> {
        self.buf.clear();
        let data = self
            .repo
            .objects
            .try_find(&oid, &mut self.buf)
            .map_err(|e| StatsError::lookup(oid, e))?
            .ok_or_else(|| StatsError::lookup(oid, "object not present in the database"))?;

        let size = data.data.len() as u64;
        match data.kind {
            Kind::Commit => {
                let commit =
                    CommitRef::from_bytes(data.data).map_err(|e| StatsError::lookup(oid, e))?;
                let parents = commit.parents().collect();
                Ok(ObjectRecord::Commit {
                    size,
                    tree: commit.tree(),
                    parents,
                })
            }
            Kind::Tree => {
                let tree =
                    TreeRef::from_bytes(data.data).map_err(|e| StatsError::lookup(oid, e))?;
                let entries = tree
                    .entries
                    .iter()
                    .map(|entry| TreeEntryRecord {
                        mode: entry.mode,
                        name: entry.filename,
                        oid: entry.oid.to_owned(),
                    })
                    .collect();
                Ok(ObjectRecord::Tree { size, entries })
            }
            Kind::Blob => Ok(ObjectRecord::Blob { size }),
            Kind::Tag => {
                let tag = TagRef::from_bytes(data.data).map_err(|e| StatsError::lookup(oid, e))?;
                Ok(ObjectRecord::Tag {
                    target: tag.target(),
                    target_kind: tag.target_kind,
                })
            }
        }
    }
}
