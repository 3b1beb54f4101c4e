//! Fixed-capacity pool of partial-path nodes.

use crate::graph::ArcId;

/// Index of a node inside a [`PathPool`].
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub struct PathId(u32);

impl PathId {
    pub const fn new(value: u32) -> Self {
        Self(value)
    }

    pub const fn value(self) -> u32 {
        self.0
    }

    fn index(self) -> usize {
        self.0 as usize
    }
}

/// One matched arc plus the link to the rest of the branch.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub struct PartialPath {
    pub arc: Option<ArcId>,
    pub next: Option<PathId>,
}

/// Partial paths with a freelist threaded through `next`.
#[derive(Debug, Clone)]
pub struct PathPool {
    nodes: Vec<PartialPath>,
    free_head: Option<PathId>,
    available: usize,
}

impl PathPool {
    pub fn new(capacity: usize) -> Self {
        let capacity = capacity.min(u32::MAX as usize);
        let nodes = (0..capacity)
            .map(|index| PartialPath {
                arc: None,
                next: (index + 1 < capacity).then(|| PathId::new(index as u32 + 1)),
            })
            .collect();
        Self {
            nodes,
            free_head: (capacity > 0).then_some(PathId::new(0)),
            available: capacity,
        }
    }

    pub fn capacity(&self) -> usize {
        self.nodes.len()
    }

    /// Nodes currently on the freelist.
    pub fn available(&self) -> usize {
        self.available
    }

    /// Takes a cleared node, or `None` when the pool is exhausted.
    pub fn alloc(&mut self) -> Option<PathId> {
        let id = self.free_head?;
        let node = &mut self.nodes[id.index()];
        self.free_head = node.next;
        *node = PartialPath::default();
        self.available -= 1;
        Some(id)
    }

    /// Returns a single node to the pool.
    pub fn free(&mut self, id: PathId) {
        let Some(node) = self.nodes.get_mut(id.index()) else {
            return;
        };
        node.arc = None;
        node.next = self.free_head;
        self.free_head = Some(id);
        self.available += 1;
    }

    /// Returns `first` and every node linked after it.
    pub fn free_chain(&mut self, first: PathId) {
        let mut cursor = Some(first);
        while let Some(id) = cursor {
            cursor = self.get(id).and_then(|node| node.next);
            self.free(id);
        }
    }

    pub fn get(&self, id: PathId) -> Option<&PartialPath> {
        self.nodes.get(id.index())
    }

    /// Records that `node` matched `arc` and continues at `next`.
    pub fn link(&mut self, node: PathId, arc: ArcId, next: PathId) {
        if let Some(path) = self.nodes.get_mut(node.index()) {
            path.arc = Some(arc);
            path.next = Some(next);
        }
    }

    /// Detaches the branch after `node` and frees it.
    pub fn unlink(&mut self, node: PathId) {
        let Some(path) = self.nodes.get_mut(node.index()) else {
            return;
        };
        let branch = path.next.take();
        path.arc = None;
        if let Some(branch) = branch {
            self.free_chain(branch);
        }
    }

    /// Arcs recorded along the chain starting at `root`.
    pub fn arcs_from(&self, root: PathId) -> Vec<ArcId> {
        let mut arcs = Vec::new();
        let mut cursor = Some(root);
        while let Some(node) = cursor.and_then(|id| self.get(id)) {
            arcs.extend(node.arc);
            cursor = node.next;
        }
        arcs
    }
}
