use super::edge::Branch;
use super::graph::Workflow;
use super::node::{NodeId, NodeType};
use ahash::{AHashMap, AHashSet};
use itertools::Itertools;
use std::collections::VecDeque;
use std::fmt;

/// A single structural problem found in a workflow.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ValidationIssue {
    MissingStart,
    MultipleStarts(Vec<NodeId>),
    MissingEnd,
    DanglingEdge { edge_id: String, missing: NodeId },
    NoOutgoingEdge(NodeId),
    DecisionBranchCount { node_id: NodeId, found: usize },
    DecisionBranchLabels(NodeId),
    Orphan(NodeId),
    EmptyLabel(NodeId),
}

impl ValidationIssue {
    /// The node this issue is about, for highlighting on the canvas.
    pub fn node_id(&self) -> Option<&str> {
        match self {
            ValidationIssue::NoOutgoingEdge(id)
            | ValidationIssue::DecisionBranchLabels(id)
            | ValidationIssue::Orphan(id)
            | ValidationIssue::EmptyLabel(id)
            | ValidationIssue::DecisionBranchCount { node_id: id, .. } => Some(id),
            _ => None,
        }
    }
}

impl fmt::Display for ValidationIssue {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            ValidationIssue::MissingStart => write!(f, "The workflow has no start node"),
            ValidationIssue::MultipleStarts(ids) => {
                write!(f, "The workflow has more than one start node: {}", ids.join(", "))
            }
            ValidationIssue::MissingEnd => write!(f, "The workflow has no end node"),
            ValidationIssue::DanglingEdge { edge_id, missing } => {
                write!(f, "Edge '{}' points at missing node '{}'", edge_id, missing)
            }
            ValidationIssue::NoOutgoingEdge(id) => {
                write!(f, "Node '{}' has no outgoing connection", id)
            }
            ValidationIssue::DecisionBranchCount { node_id, found } => write!(
                f,
                "Decision '{}' needs exactly two outgoing connections, found {}",
                node_id, found
            ),
            ValidationIssue::DecisionBranchLabels(id) => write!(
                f,
                "Decision '{}' must have one 'true' and one 'false' branch",
                id
            ),
            ValidationIssue::Orphan(id) => {
                write!(f, "Node '{}' cannot be reached from the start node", id)
            }
            ValidationIssue::EmptyLabel(id) => write!(f, "Node '{}' has an empty label", id),
        }
    }
}

/// Every issue found by [`validate`]. An empty report means the graph may be saved.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct ValidationReport {
    pub issues: Vec<ValidationIssue>,
}

impl ValidationReport {
    pub fn is_valid(&self) -> bool {
        self.issues.is_empty()
    }

    pub fn issues_for<'a>(&'a self, node_id: &'a str) -> impl Iterator<Item = &'a ValidationIssue> {
        self.issues
            .iter()
            .filter(move |issue| issue.node_id() == Some(node_id))
    }
}

impl fmt::Display for ValidationReport {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        if self.issues.is_empty() {
            return write!(f, "No issues");
        }
        write!(f, "{}", self.issues.iter().join("\n"))
    }
}

/// Checks the structural rules a workflow must satisfy before it is saved.
///
/// Every rule is checked and all findings are returned, so the designer can show them at once.
/// Whether a decision's `ifTrue`/`ifFalse` targets agree with its edges is not checked.
pub fn validate(workflow: &Workflow) -> ValidationReport {
    let mut issues = Vec::new();
    let known: AHashSet<&str> = workflow.nodes.iter().map(|n| n.id.as_str()).collect();

    let starts: Vec<NodeId> = workflow
        .nodes_of_type(NodeType::Start)
        .map(|n| n.id.clone())
        .collect();
    match starts.len() {
        0 => issues.push(ValidationIssue::MissingStart),
        1 => {}
        _ => issues.push(ValidationIssue::MultipleStarts(starts.clone())),
    }
    if workflow.nodes_of_type(NodeType::End).next().is_none() {
        issues.push(ValidationIssue::MissingEnd);
    }

    for edge in &workflow.edges {
        for endpoint in [&edge.source, &edge.target] {
            if !known.contains(endpoint.as_str()) {
                issues.push(ValidationIssue::DanglingEdge {
                    edge_id: edge.id.clone(),
                    missing: endpoint.clone(),
                });
            }
        }
    }

    // Only edges between existing nodes count towards connectivity.
    let outgoing: AHashMap<&str, Vec<&super::edge::Edge>> = workflow
        .edges
        .iter()
        .filter(|e| known.contains(e.source.as_str()) && known.contains(e.target.as_str()))
        .into_group_map_by(|e| e.source.as_str())
        .into_iter()
        .collect();

    for node in &workflow.nodes {
        if node.label().trim().is_empty() {
            issues.push(ValidationIssue::EmptyLabel(node.id.clone()));
        }

        let out = outgoing.get(node.id.as_str()).map(Vec::as_slice).unwrap_or(&[]);
        match node.node_type() {
            NodeType::End => {}
            NodeType::Decision => {
                if out.len() != 2 {
                    issues.push(ValidationIssue::DecisionBranchCount {
                        node_id: node.id.clone(),
                        found: out.len(),
                    });
                } else {
                    let branches: AHashSet<Branch> = out.iter().filter_map(|e| e.branch()).collect();
                    if !(branches.contains(&Branch::True) && branches.contains(&Branch::False)) {
                        issues.push(ValidationIssue::DecisionBranchLabels(node.id.clone()));
                    }
                }
            }
            _ if out.is_empty() => issues.push(ValidationIssue::NoOutgoingEdge(node.id.clone())),
            _ => {}
        }
    }

    // Reachability is only meaningful with a single, unambiguous start.
    if let [start] = starts.as_slice() {
        let mut seen: AHashSet<&str> = AHashSet::new();
        let mut queue = VecDeque::from([start.as_str()]);
        while let Some(current) = queue.pop_front() {
            if !seen.insert(current) {
                continue;
            }
            if let Some(edges) = outgoing.get(current) {
                queue.extend(edges.iter().map(|e| e.target.as_str()));
            }
        }
        issues.extend(
            workflow
                .nodes
                .iter()
                .filter(|n| !seen.contains(n.id.as_str()))
                .map(|n| ValidationIssue::Orphan(n.id.clone())),
        );
    }

    if !issues.is_empty() {
        log::debug!(
            "Workflow '{}' has {} validation issue(s)",
            workflow.name,
            issues.len()
        );
    }
    ValidationReport { issues }
}
