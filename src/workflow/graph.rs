use super::condition::ConditionId;
use super::edge::{Branch, Edge, EdgeId};
use super::node::{NodeData, NodeId, NodeType, Position, WorkflowNode};
use super::patch::NodePatch;
use super::validation::{self, ValidationReport};
use crate::error::GraphError;
use serde_json::{Map, Value};

/// A named workflow being designed: the canonical node and edge collections.
#[derive(Debug, Clone, PartialEq, Default)]
pub struct Workflow {
    /// Backend id; `None` until the workflow has been saved once.
    pub id: Option<String>,
    pub name: String,
    pub description: Option<String>,
    pub(crate) nodes: Vec<WorkflowNode>,
    pub(crate) edges: Vec<Edge>,
    /// Workflow-level keys the backend sent that this crate does not model.
    pub extra: Map<String, Value>,
    next_node_seq: u64,
    next_edge_seq: u64,
}

impl Workflow {
    pub fn new(name: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            ..Default::default()
        }
    }

    /// Rebuilds a workflow from already-converted parts, e.g. a backend payload.
    pub fn from_parts(
        id: Option<String>,
        name: String,
        description: Option<String>,
        nodes: Vec<WorkflowNode>,
        edges: Vec<Edge>,
        extra: Map<String, Value>,
    ) -> Self {
        Self {
            id,
            name,
            description,
            nodes,
            edges,
            extra,
            next_node_seq: 0,
            next_edge_seq: 0,
        }
    }

    /// Adds a node of the given type with default data and returns its id.
    pub fn add_node(&mut self, node_type: NodeType) -> NodeId {
        let id = self.next_node_id(node_type);
        let offset = self.nodes.len() as f64;
        let position = Position::new(250.0, 80.0 + 120.0 * offset);
        self.nodes.push(WorkflowNode::new(
            id.clone(),
            NodeData::default_for(node_type),
            position,
        ));
        log::debug!("Added {} node '{}'", node_type, id);
        id
    }

    /// Merges `patch` into the node's data. Unknown ids are ignored and reported as `false`.
    pub fn update_node(&mut self, id: &str, patch: NodePatch) -> bool {
        match self.nodes.iter_mut().find(|n| n.id == id) {
            Some(node) => {
                patch.apply(&mut node.data);
                true
            }
            None => {
                log::debug!("update_node: no node '{}', ignoring patch", id);
                false
            }
        }
    }

    pub fn move_node(&mut self, id: &str, position: Position) -> bool {
        match self.nodes.iter_mut().find(|n| n.id == id) {
            Some(node) => {
                node.position = position;
                true
            }
            None => false,
        }
    }

    /// Deletes the node along with every edge that starts or ends at it.
    pub fn remove_node(&mut self, id: &str) -> Option<WorkflowNode> {
        let index = self.nodes.iter().position(|n| n.id == id)?;
        let node = self.nodes.remove(index);
        let before = self.edges.len();
        self.edges.retain(|e| !e.touches(id));
        log::debug!(
            "Removed node '{}' and {} attached edge(s)",
            id,
            before - self.edges.len()
        );
        Some(node)
    }

    /// Appends an edge. Cycles, self-loops, duplicates and unknown endpoints are accepted here
    /// and only reported by [`Workflow::validate`].
    pub fn connect(&mut self, source: &str, target: &str) -> EdgeId {
        self.push_edge(source, target, None)
    }

    /// Appends an edge tagged as the `true` or `false` branch of a decision.
    pub fn connect_branch(&mut self, source: &str, target: &str, branch: Branch) -> EdgeId {
        self.push_edge(source, target, Some(branch.handle().to_string()))
    }

    pub fn disconnect(&mut self, edge_id: &str) -> Option<Edge> {
        let index = self.edges.iter().position(|e| e.id == edge_id)?;
        Some(self.edges.remove(index))
    }

    /// Appends a condition to a decision node.
    pub fn add_condition(
        &mut self,
        node_id: &str,
        field: &str,
        operator: &str,
        value: &str,
    ) -> Result<Option<ConditionId>, GraphError> {
        Ok(self.decision_conditions(node_id)?.add(field, operator, value))
    }

    pub fn remove_condition(&mut self, node_id: &str, condition_id: &str) -> Result<bool, GraphError> {
        Ok(self.decision_conditions(node_id)?.remove(condition_id))
    }

    pub fn node(&self, id: &str) -> Option<&WorkflowNode> {
        self.nodes.iter().find(|n| n.id == id)
    }

    pub fn node_mut(&mut self, id: &str) -> Option<&mut WorkflowNode> {
        self.nodes.iter_mut().find(|n| n.id == id)
    }

    pub fn nodes(&self) -> &[WorkflowNode] {
        &self.nodes
    }

    pub fn edges(&self) -> &[Edge] {
        &self.edges
    }

    pub fn edge(&self, id: &str) -> Option<&Edge> {
        self.edges.iter().find(|e| e.id == id)
    }

    pub fn outgoing<'a>(&'a self, node_id: &'a str) -> impl Iterator<Item = &'a Edge> + 'a {
        self.edges.iter().filter(move |e| e.source == node_id)
    }

    pub fn incoming<'a>(&'a self, node_id: &'a str) -> impl Iterator<Item = &'a Edge> + 'a {
        self.edges.iter().filter(move |e| e.target == node_id)
    }

    pub fn nodes_of_type(&self, node_type: NodeType) -> impl Iterator<Item = &WorkflowNode> {
        self.nodes.iter().filter(move |n| n.node_type() == node_type)
    }

    /// Checks every structural rule and returns all problems found.
    pub fn validate(&self) -> ValidationReport {
        validation::validate(self)
    }

    fn decision_conditions(
        &mut self,
        node_id: &str,
    ) -> Result<&mut super::condition::ConditionList, GraphError> {
        let node = self
            .nodes
            .iter_mut()
            .find(|n| n.id == node_id)
            .ok_or_else(|| GraphError::NodeNotFound(node_id.to_string()))?;
        let actual = node.node_type();
        node.data
            .conditions_mut()
            .ok_or_else(|| GraphError::WrongNodeType {
                node_id: node_id.to_string(),
                expected: NodeType::Decision.to_string(),
                actual: actual.to_string(),
            })
    }

    fn push_edge(&mut self, source: &str, target: &str, handle: Option<String>) -> EdgeId {
        let id = self.next_edge_id();
        let mut edge = Edge::new(id.clone(), source, target);
        edge.handle = handle;
        self.edges.push(edge);
        id
    }

    // Skips ids already taken, e.g. by nodes loaded from the backend.
    fn next_node_id(&mut self, node_type: NodeType) -> NodeId {
        loop {
            self.next_node_seq += 1;
            let candidate = format!("{}-{}", node_type, self.next_node_seq);
            if !self.nodes.iter().any(|n| n.id == candidate) {
                return candidate;
            }
        }
    }

    fn next_edge_id(&mut self) -> EdgeId {
        loop {
            self.next_edge_seq += 1;
            let candidate = format!("edge-{}", self.next_edge_seq);
            if !self.edges.iter().any(|e| e.id == candidate) {
                return candidate;
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_node_ids_are_unique_across_types() {
        let mut wf = Workflow::new("ids");
        let a = wf.add_node(NodeType::Task);
        let b = wf.add_node(NodeType::Task);
        let c = wf.add_node(NodeType::End);
        assert_ne!(a, b);
        assert_ne!(b, c);
        assert_eq!(wf.nodes().len(), 3);
    }

    #[test]
    fn test_generated_ids_skip_loaded_ones() {
        let node = WorkflowNode::new(
            "task-1",
            NodeData::default_for(NodeType::Task),
            Position::default(),
        );
        let mut wf = Workflow::from_parts(None, "x".into(), None, vec![node], vec![], Map::new());
        assert_eq!(wf.add_node(NodeType::Task), "task-2");
    }

    #[test]
    fn test_condition_on_non_decision_is_an_error() {
        let mut wf = Workflow::new("c");
        let task = wf.add_node(NodeType::Task);
        let err = wf.add_condition(&task, "a", "==", "b").unwrap_err();
        assert!(matches!(err, GraphError::WrongNodeType { .. }));
        assert!(matches!(
            wf.remove_condition("nope", "cond-1"),
            Err(GraphError::NodeNotFound(_))
        ));
    }
}
