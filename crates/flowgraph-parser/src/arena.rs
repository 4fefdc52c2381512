use flowgraph_common::Span;

use crate::node::NodeKind;

/// Index-typed handle into an [`Arena`]. Cheap to copy, never dangling for
/// the lifetime of the arena that produced it.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct NodeId(u32);

impl NodeId {
    fn from_usize(i: usize) -> Self {
        Self(u32::try_from(i).expect("arena grew past u32::MAX nodes"))
    }

    fn index(self) -> usize {
        self.0 as usize
    }
}

/// Owning storage for every AST node produced by a single parse.
///
/// Nodes are append-only: once allocated, a `NodeId` stays valid and its
/// span/kind never change. This gives the tree the ownership shape the
/// design calls for (nodes exclusively own their children, the tree is
/// acyclic) without needing `Box`-per-node indirection.
#[derive(Debug, Default)]
pub struct Arena {
    records: Vec<Record>,
}

#[derive(Debug)]
struct Record {
    span: Span,
    kind: NodeKind,
}

impl Arena {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn alloc(&mut self, span: Span, kind: NodeKind) -> NodeId {
        self.records.push(Record { span, kind });
        NodeId::from_usize(self.records.len() - 1)
    }

    pub fn span(&self, id: NodeId) -> Span {
        self.records[id.index()].span
    }

    pub fn kind(&self, id: NodeId) -> &NodeKind {
        &self.records[id.index()].kind
    }

    pub fn len(&self) -> usize {
        self.records.len()
    }

    pub fn is_empty(&self) -> bool {
        self.records.is_empty()
    }
}
