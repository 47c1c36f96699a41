use super::condition::ConditionList;
use chrono::NaiveDate;
use serde::{Deserialize, Serialize};
use serde_json::{Map, Value};
use std::fmt;
use std::str::FromStr;

pub type NodeId = String;
pub type FormId = String;

/// The closed set of node kinds the designer knows about.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum NodeType {
    Start,
    Task,
    Approval,
    Decision,
    Notification,
    Form,
    End,
}

impl NodeType {
    pub const ALL: [NodeType; 7] = [
        NodeType::Start,
        NodeType::Task,
        NodeType::Approval,
        NodeType::Decision,
        NodeType::Notification,
        NodeType::Form,
        NodeType::End,
    ];

    pub fn as_str(&self) -> &'static str {
        match self {
            NodeType::Start => "start",
            NodeType::Task => "task",
            NodeType::Approval => "approval",
            NodeType::Decision => "decision",
            NodeType::Notification => "notification",
            NodeType::Form => "form",
            NodeType::End => "end",
        }
    }

    /// Label given to freshly added nodes.
    pub fn default_label(&self) -> &'static str {
        match self {
            NodeType::Start => "Start",
            NodeType::Task => "Task",
            NodeType::Approval => "Approval",
            NodeType::Decision => "Decision",
            NodeType::Notification => "Notification",
            NodeType::Form => "Form",
            NodeType::End => "End",
        }
    }
}

impl fmt::Display for NodeType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.as_str())
    }
}

impl FromStr for NodeType {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        NodeType::ALL
            .into_iter()
            .find(|t| t.as_str() == s)
            .ok_or_else(|| s.to_string())
    }
}

/// Canvas coordinates of a node.
#[derive(Debug, Clone, Copy, PartialEq, Default, Serialize, Deserialize)]
pub struct Position {
    pub x: f64,
    pub y: f64,
}

impl Position {
    pub fn new(x: f64, y: f64) -> Self {
        Self { x, y }
    }
}

/// Who a task, approval or form step is assigned to. Exactly one kind is active.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub enum Assignee {
    Role(String),
    User(String),
}

impl Assignee {
    /// The `assignee_type` discriminator used on the wire.
    pub fn kind(&self) -> &'static str {
        match self {
            Assignee::Role(_) => "role",
            Assignee::User(_) => "user",
        }
    }

    pub fn id(&self) -> &str {
        match self {
            Assignee::Role(id) | Assignee::User(id) => id,
        }
    }
}

impl fmt::Display for Assignee {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}:{}", self.kind(), self.id())
    }
}

/// Payload sent when a notification node is reached.
#[derive(Debug, Clone, PartialEq, Default, Serialize, Deserialize)]
pub struct Notification {
    #[serde(default)]
    pub recipients: Vec<String>,
    #[serde(default)]
    pub subject: String,
    #[serde(default)]
    pub message: String,
    #[serde(flatten)]
    pub extra: Map<String, Value>,
}

/// Fields shared by every node kind.
#[derive(Debug, Clone, PartialEq, Default)]
pub struct Common {
    pub label: String,
    pub description: Option<String>,
}

#[derive(Debug, Clone, PartialEq, Default)]
pub struct TaskData {
    pub common: Common,
    pub assignee: Option<Assignee>,
    pub due_date: Option<NaiveDate>,
    pub form: Option<FormId>,
}

#[derive(Debug, Clone, PartialEq)]
pub struct DecisionData {
    pub common: Common,
    pub conditions: ConditionList,
    /// Branch labels shown on the node's outgoing handles.
    pub branches: Vec<String>,
    /// Targets recorded by the designer for each branch. Kept as configuration only.
    pub if_true: Option<NodeId>,
    pub if_false: Option<NodeId>,
}

impl Default for DecisionData {
    fn default() -> Self {
        Self {
            common: Common::default(),
            conditions: ConditionList::default(),
            branches: vec!["true".to_string(), "false".to_string()],
            if_true: None,
            if_false: None,
        }
    }
}

#[derive(Debug, Clone, PartialEq, Default)]
pub struct NotificationData {
    pub common: Common,
    pub notification: Notification,
}

#[derive(Debug, Clone, PartialEq, Default)]
pub struct FormStepData {
    pub common: Common,
    pub form: Option<FormId>,
    pub assignee: Option<Assignee>,
}

/// Per-type configuration of a node, keyed by its `NodeType`.
#[derive(Debug, Clone, PartialEq)]
pub enum NodeData {
    Start(Common),
    Task(TaskData),
    Approval(TaskData),
    Decision(DecisionData),
    Notification(NotificationData),
    Form(FormStepData),
    End(Common),
}

impl NodeData {
    /// Default configuration for a freshly added node of the given type.
    pub fn default_for(node_type: NodeType) -> Self {
        let common = Common {
            label: node_type.default_label().to_string(),
            description: None,
        };
        match node_type {
            NodeType::Start => NodeData::Start(common),
            NodeType::Task => NodeData::Task(TaskData {
                common,
                ..Default::default()
            }),
            NodeType::Approval => NodeData::Approval(TaskData {
                common,
                ..Default::default()
            }),
            NodeType::Decision => NodeData::Decision(DecisionData {
                common,
                ..Default::default()
            }),
            NodeType::Notification => NodeData::Notification(NotificationData {
                common,
                ..Default::default()
            }),
            NodeType::Form => NodeData::Form(FormStepData {
                common,
                ..Default::default()
            }),
            NodeType::End => NodeData::End(common),
        }
    }

    pub fn node_type(&self) -> NodeType {
        match self {
            NodeData::Start(_) => NodeType::Start,
            NodeData::Task(_) => NodeType::Task,
            NodeData::Approval(_) => NodeType::Approval,
            NodeData::Decision(_) => NodeType::Decision,
            NodeData::Notification(_) => NodeType::Notification,
            NodeData::Form(_) => NodeType::Form,
            NodeData::End(_) => NodeType::End,
        }
    }

    pub fn common(&self) -> &Common {
        match self {
            NodeData::Start(c) | NodeData::End(c) => c,
            NodeData::Task(d) | NodeData::Approval(d) => &d.common,
            NodeData::Decision(d) => &d.common,
            NodeData::Notification(d) => &d.common,
            NodeData::Form(d) => &d.common,
        }
    }

    pub fn common_mut(&mut self) -> &mut Common {
        match self {
            NodeData::Start(c) | NodeData::End(c) => c,
            NodeData::Task(d) | NodeData::Approval(d) => &mut d.common,
            NodeData::Decision(d) => &mut d.common,
            NodeData::Notification(d) => &mut d.common,
            NodeData::Form(d) => &mut d.common,
        }
    }

    pub fn label(&self) -> &str {
        &self.common().label
    }

    pub fn assignee(&self) -> Option<&Assignee> {
        match self {
            NodeData::Task(d) | NodeData::Approval(d) => d.assignee.as_ref(),
            NodeData::Form(d) => d.assignee.as_ref(),
            _ => None,
        }
    }

    pub fn form(&self) -> Option<&FormId> {
        match self {
            NodeData::Task(d) | NodeData::Approval(d) => d.form.as_ref(),
            NodeData::Form(d) => d.form.as_ref(),
            _ => None,
        }
    }

    pub fn conditions(&self) -> Option<&ConditionList> {
        match self {
            NodeData::Decision(d) => Some(&d.conditions),
            _ => None,
        }
    }

    pub fn conditions_mut(&mut self) -> Option<&mut ConditionList> {
        match self {
            NodeData::Decision(d) => Some(&mut d.conditions),
            _ => None,
        }
    }
}

/// A node on the workflow canvas.
#[derive(Debug, Clone, PartialEq)]
pub struct WorkflowNode {
    pub id: NodeId,
    pub position: Position,
    pub data: NodeData,
    /// Node-level keys the backend sent that this crate does not model.
    pub extra: Map<String, Value>,
    /// Unmodelled keys from the node's `data` object.
    pub data_extra: Map<String, Value>,
}

impl WorkflowNode {
    pub fn new(id: impl Into<NodeId>, data: NodeData, position: Position) -> Self {
        Self {
            id: id.into(),
            position,
            data,
            extra: Map::new(),
            data_extra: Map::new(),
        }
    }

    pub fn node_type(&self) -> NodeType {
        self.data.node_type()
    }

    pub fn label(&self) -> &str {
        self.data.label()
    }
}
