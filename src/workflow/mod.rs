//! In-memory workflow designer model: typed nodes, edges, decision conditions and validation.

pub mod condition;
pub mod edge;
pub mod graph;
pub mod instance;
pub mod node;
pub mod patch;
pub mod validation;

pub use condition::{Condition, ConditionId, ConditionList, Operator};
pub use edge::{Branch, Edge, EdgeId};
pub use graph::Workflow;
pub use instance::{InstanceStatus, StartInstance, WorkflowInstance};
pub use node::{
    Assignee, Common, DecisionData, FormId, FormStepData, NodeData, NodeId, NodeType,
    Notification, NotificationData, Position, TaskData, WorkflowNode,
};
pub use patch::NodePatch;
pub use validation::{ValidationIssue, ValidationReport, validate};
