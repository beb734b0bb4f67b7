pub mod filter;

use serde::Serialize;

use crate::models::Task;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize)]
pub struct TaskId(usize);

impl TaskId {
    pub fn index(&self) -> usize {
        self.0
    }
}

#[derive(Debug, Clone, PartialEq)]
struct Node {
    /// `None` only for the root.
    task: Option<Task>,
    parent: Option<TaskId>,
    children: Vec<TaskId>,
    detached: bool,
}

/// Arena-backed forest of tasks under a virtual root.
///
/// Nodes own their child id lists; parents are referenced by id only. Pruned
/// nodes stay in the arena as unreachable tombstones until [`TaskTree::compact`]
/// rebuilds the arena.
#[derive(Debug, Clone, PartialEq)]
pub struct TaskTree {
    nodes: Vec<Node>,
}

impl Default for TaskTree {
    fn default() -> Self {
        Self::new()
    }
}

impl TaskTree {
    pub const ROOT: TaskId = TaskId(0);

    pub fn new() -> Self {
        Self {
            nodes: vec![Node {
                task: None,
                parent: None,
                children: Vec::new(),
                detached: false,
            }],
        }
    }

    pub fn root(&self) -> TaskId {
        Self::ROOT
    }

    /// Append `task` as the last child of `parent`.
    pub fn push(&mut self, parent: TaskId, task: Task) -> TaskId {
        let id = TaskId(self.nodes.len());
        self.nodes.push(Node {
            task: Some(task),
            parent: Some(parent),
            children: Vec::new(),
            detached: false,
        });
        self.nodes[parent.0].children.push(id);
        id
    }

    pub fn task(&self, id: TaskId) -> Option<&Task> {
        self.live(id).and_then(|n| n.task.as_ref())
    }

    pub fn task_mut(&mut self, id: TaskId) -> Option<&mut Task> {
        match self.nodes.get_mut(id.0) {
            Some(node) if !node.detached => node.task.as_mut(),
            _ => None,
        }
    }

    pub fn parent(&self, id: TaskId) -> Option<TaskId> {
        self.live(id).and_then(|n| n.parent)
    }

    pub fn children(&self, id: TaskId) -> &[TaskId] {
        self.live(id).map(|n| n.children.as_slice()).unwrap_or(&[])
    }

    /// Number of tasks reachable from the root.
    pub fn len(&self) -> usize {
        self.walk().len()
    }

    pub fn is_empty(&self) -> bool {
        self.children(Self::ROOT).is_empty()
    }

    /// Pre-order (document order) listing of every reachable task with its
    /// depth. Top-level tasks have depth 1; the root is not listed.
    pub fn walk(&self) -> Vec<(TaskId, usize)> {
        let mut out = Vec::new();
        let mut stack: Vec<(TaskId, usize)> = self
            .children(Self::ROOT)
            .iter()
            .rev()
            .map(|&c| (c, 1))
            .collect();
        while let Some((id, depth)) = stack.pop() {
            out.push((id, depth));
            for &child in self.children(id).iter().rev() {
                stack.push((child, depth + 1));
            }
        }
        out
    }

    pub fn tasks(&self) -> impl Iterator<Item = &Task> + '_ {
        self.walk().into_iter().filter_map(move |(id, _)| self.task(id))
    }

    pub fn for_each_task_mut(&mut self, mut f: impl FnMut(&mut Task)) {
        for (id, _) in self.walk() {
            if let Some(task) = self.task_mut(id) {
                f(task);
            }
        }
    }

    /// Remove `id` and splice its children into the parent's child list at
    /// the position `id` occupied. Returns `false` for the root or for a node
    /// that is no longer in the tree.
    pub fn prune(&mut self, id: TaskId) -> bool {
        if id == Self::ROOT {
            return false;
        }
        let Some(parent) = self.parent(id) else {
            return false;
        };
        let Some(pos) = self.nodes[parent.0].children.iter().position(|&c| c == id) else {
            return false;
        };
        let children = std::mem::take(&mut self.nodes[id.0].children);
        self.nodes[parent.0]
            .children
            .splice(pos..=pos, children.iter().copied());
        for child in children {
            self.nodes[child.0].parent = Some(parent);
        }
        let node = &mut self.nodes[id.0];
        node.parent = None;
        node.detached = true;
        true
    }

    /// Deep-copy the subtree at `node` of `source` under `parent`.
    pub fn graft(&mut self, parent: TaskId, source: &TaskTree, node: TaskId) -> Option<TaskId> {
        let task = source.task(node)?.clone();
        let id = self.push(parent, task);
        for &child in source.children(node) {
            self.graft(id, source, child);
        }
        Some(id)
    }

    /// Deep-copy every child subtree of `node` in `source` under `parent`,
    /// dropping `node` itself. Grafting a root this way merges two forests.
    pub fn graft_children(&mut self, parent: TaskId, source: &TaskTree, node: TaskId) {
        for &child in source.children(node) {
            self.graft(parent, source, child);
        }
    }

    /// A fresh arena holding only reachable nodes, in document order.
    pub fn compact(&self) -> TaskTree {
        let mut out = TaskTree::new();
        out.graft_children(Self::ROOT, self, Self::ROOT);
        out
    }

    /// Prune every task failing `keep`. Kept descendants of a pruned task move
    /// up to the nearest kept ancestor.
    pub fn retain(&self, keep: impl Fn(&Task) -> bool) -> TaskTree {
        let mut tree = self.clone();
        for (id, _) in self.walk() {
            if self.task(id).is_some_and(|t| !keep(t)) {
                tree.prune(id);
            }
        }
        tree.compact()
    }

    fn live(&self, id: TaskId) -> Option<&Node> {
        self.nodes.get(id.0).filter(|n| !n.detached)
    }
}
