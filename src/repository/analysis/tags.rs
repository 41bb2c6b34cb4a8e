//! Annotated tag chain depths
//!
//! Resolves the chain length of every annotated tag: a tag pointing at a
//! non-tag object has depth 1, a tag pointing at another tag has the
//! target's depth plus one. Depths are memoized in the tag table; the walk
//! is iterative so arbitrarily long chains cannot overflow the stack.

use gix::objs::Kind;
use gix::ObjectId;

use super::accumulator::TagTable;
use crate::repository::error::StatsError;

pub struct TagDepthResolver<'a> {
    tags: &'a mut TagTable,
}

impl<'a> TagDepthResolver<'a> {
    pub(crate) fn new(tags: &'a mut TagTable) -> Self {
        Self { tags }
    }

    /// Chain depth of one tag, resolving and memoizing every tag on the way.
    pub(crate) fn resolve(&mut self, oid: ObjectId) -> Result<u64, StatsError> {
        // Walk down to the first resolved tag or non-tag target, then assign
        // depths back up the chain.
        let mut chain = Vec::new();
        let mut depth = 0u64;
        let mut current = oid;
        loop {
            let node = self
                .tags
                .records
                .get(&current)
                .ok_or(StatsError::InternalMissing {
                    oid: current,
                    table: "tags",
                })?;
            if node.depth != 0 {
                depth = node.depth;
                break;
            }
            chain.push(current);
            if node.target_kind != Kind::Tag {
                break;
            }
            current = node.target;
        }
        for tag in chain.iter().rev() {
            depth += 1;
            if let Some(node) = self.tags.records.get_mut(tag) {
                node.depth = depth;
            }
        }
        Ok(depth)
    }

    /// Maximum resolved depth over every recorded tag; 0 with no tags.
    pub(crate) fn max_depth(&mut self) -> Result<u64, StatsError> {
        let oids: Vec<ObjectId> = self.tags.records.keys().copied().collect();
        let mut max = 0u64;
        for oid in oids {
            max = max.max(self.resolve(oid)?);
        }
        Ok(max)
    }
}
