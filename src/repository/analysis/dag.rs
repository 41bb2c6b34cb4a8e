//! Commit graph
//!
//! Parent/child graph over commits, built incrementally while the object
//! database is walked. Nodes live in an arena keyed by OID and `children`
//! holds arena indices, so the two-way navigation needs no reference
//! counting and the arena outlives every traversal.

use gix::ObjectId;
use rustc_hash::FxHashMap;

#[derive(Default)]
struct Node {
    children: Vec<u32>,
    /// Declared distinct-parent count, consumed during depth peeling.
    /// Zero until the commit's own record has been inserted.
    parents_left: u32,
}

#[derive(Default)]
pub struct CommitDag {
    index: FxHashMap<ObjectId, u32>,
    nodes: Vec<Node>,
    roots: Vec<u32>,
}

impl CommitDag {
    pub fn new() -> Self {
        Self::default()
    }

    fn get_or_create(&mut self, oid: ObjectId) -> u32 {
        if let Some(&id) = self.index.get(&oid) {
            return id;
        }
        let id = self.nodes.len() as u32;
        self.nodes.push(Node::default());
        self.index.insert(oid, id);
        id
    }

    /// Insert a commit and its parent edges. Must be called at most once per
    /// commit. A parent not yet inserted becomes a placeholder whose declared
    /// count is filled in when its own record arrives; duplicate parent ids
    /// contribute a single edge.
    pub fn add_node(&mut self, oid: ObjectId, parents: &[ObjectId]) {
        let id = self.get_or_create(oid);
        let mut edges = 0u32;
        for (i, parent) in parents.iter().enumerate() {
            if parents[..i].contains(parent) {
                continue;
            }
            let parent_id = self.get_or_create(*parent);
            self.nodes[parent_id as usize].children.push(id);
            edges += 1;
        }
        self.nodes[id as usize].parents_left = edges;
        if edges == 0 {
            self.roots.push(id);
        }
    }

    /// Longest root-to-leaf path, counted in nodes. Zero for an empty graph.
    ///
    /// Level-order peeling: each frontier node consumes one incoming edge of
    /// each child, and a child joins the next frontier only when its last
    /// edge is consumed. That places every node at the level of its longest
    /// incoming path without re-enqueueing, and the loop is iterative so
    /// pathological histories cannot overflow the stack.
    ///
    /// Consumes the `parents_left` counters; call once per run.
    pub fn max_depth(&mut self) -> u64 {
        let mut depth = 0u64;
        let mut frontier = self.roots.clone();
        let mut next = Vec::new();
        while !frontier.is_empty() {
            depth += 1;
            next.clear();
            for &id in &frontier {
                for i in 0..self.nodes[id as usize].children.len() {
                    let child = self.nodes[id as usize].children[i];
                    let node = &mut self.nodes[child as usize];
                    node.parents_left -= 1;
                    if node.parents_left == 0 {
                        next.push(child);
                    }
                }
            }
            std::mem::swap(&mut frontier, &mut next);
        }
        depth
    }
}
