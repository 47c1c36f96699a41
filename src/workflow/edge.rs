use super::node::NodeId;
use serde_json::{Map, Value};
use std::fmt;

pub type EdgeId = String;

/// Which outcome of a decision an edge carries.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Branch {
    True,
    False,
}

impl Branch {
    /// The source handle name used by the canvas for this branch.
    pub fn handle(&self) -> &'static str {
        match self {
            Branch::True => "true",
            Branch::False => "false",
        }
    }

    pub fn from_handle(handle: &str) -> Option<Self> {
        match handle.trim().to_ascii_lowercase().as_str() {
            "true" | "yes" => Some(Branch::True),
            "false" | "no" => Some(Branch::False),
            _ => None,
        }
    }
}

impl fmt::Display for Branch {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.handle())
    }
}

/// A directed connection between two nodes.
#[derive(Debug, Clone, PartialEq)]
pub struct Edge {
    pub id: EdgeId,
    pub source: NodeId,
    pub target: NodeId,
    /// Source handle; on decision nodes this names the branch.
    pub handle: Option<String>,
    /// Keys the backend sent that this crate does not model.
    pub extra: Map<String, Value>,
}

impl Edge {
    pub fn new(id: impl Into<EdgeId>, source: impl Into<NodeId>, target: impl Into<NodeId>) -> Self {
        Self {
            id: id.into(),
            source: source.into(),
            target: target.into(),
            handle: None,
            extra: Map::new(),
        }
    }

    pub fn branch(&self) -> Option<Branch> {
        self.handle.as_deref().and_then(Branch::from_handle)
    }

    pub fn touches(&self, node_id: &str) -> bool {
        self.source == node_id || self.target == node_id
    }
}
