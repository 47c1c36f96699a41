use super::workflow::{ConditionDto, EdgeDto, NodeDto, WorkflowDto};
use crate::error::ConversionError;
use crate::workflow::{
    Assignee, Common, Condition, ConditionList, DecisionData, Edge, FormStepData, NodeData,
    NodeType, NotificationData, TaskData, Workflow, WorkflowNode,
};
use ahash::AHashSet;
use chrono::{DateTime, NaiveDate};
use serde::Serialize;
use serde::de::DeserializeOwned;
use serde_json::{Map, Value};

const DUE_DATE_FORMAT: &str = "%Y-%m-%d";

/// A trait for payloads that can be turned into the editor's [`Workflow`] model.
///
/// [`WorkflowDto`] implements it for the backend's own shape. Other sources, such as
/// an export from a different designer, can implement it to feed the same model.
///
/// # Example
///
/// ```rust,no_run
/// use edms_flow::dto::IntoWorkflow;
/// use edms_flow::error::ConversionError;
/// use edms_flow::workflow::{NodeType, Workflow};
///
/// struct Checklist { title: String, steps: Vec<String> }
///
/// impl IntoWorkflow for Checklist {
///     fn into_workflow(self) -> Result<Workflow, ConversionError> {
///         let mut wf = Workflow::new(self.title);
///         let mut previous = wf.add_node(NodeType::Start);
///         for _ in self.steps {
///             let step = wf.add_node(NodeType::Task);
///             wf.connect(&previous, &step);
///             previous = step;
///         }
///         let end = wf.add_node(NodeType::End);
///         wf.connect(&previous, &end);
///         Ok(wf)
///     }
/// }
/// ```
pub trait IntoWorkflow {
    /// Consumes the payload and converts it into an editable workflow.
    fn into_workflow(self) -> Result<Workflow, ConversionError>;
}

impl IntoWorkflow for WorkflowDto {
    fn into_workflow(self) -> Result<Workflow, ConversionError> {
        Workflow::try_from(self)
    }
}

impl Workflow {
    /// Flattens the workflow into the backend payload shape.
    pub fn to_dto(&self) -> WorkflowDto {
        WorkflowDto::from(self)
    }

    /// Parses a backend JSON document straight into the editor model.
    pub fn from_json(json: &str) -> Result<Self, ConversionError> {
        let dto: WorkflowDto =
            serde_json::from_str(json).map_err(|e| ConversionError::Invalid(e.to_string()))?;
        Workflow::try_from(dto)
    }

    pub fn to_json_pretty(&self) -> Result<String, ConversionError> {
        serde_json::to_string_pretty(&self.to_dto())
            .map_err(|e| ConversionError::Invalid(e.to_string()))
    }
}

impl From<&Workflow> for WorkflowDto {
    fn from(workflow: &Workflow) -> Self {
        WorkflowDto {
            id: workflow.id.clone(),
            name: workflow.name.clone(),
            description: workflow.description.clone(),
            nodes: workflow.nodes().iter().map(node_to_dto).collect(),
            edges: workflow
                .edges()
                .iter()
                .map(|e| EdgeDto {
                    id: e.id.clone(),
                    source: e.source.clone(),
                    target: e.target.clone(),
                    source_handle: e.handle.clone(),
                    extra: e.extra.clone(),
                })
                .collect(),
            extra: workflow.extra.clone(),
        }
    }
}

impl TryFrom<WorkflowDto> for Workflow {
    type Error = ConversionError;

    fn try_from(dto: WorkflowDto) -> Result<Self, Self::Error> {
        let mut seen = AHashSet::new();
        let mut nodes = Vec::with_capacity(dto.nodes.len());
        for node in dto.nodes {
            if !seen.insert(node.id.clone()) {
                return Err(ConversionError::DuplicateNodeId(node.id));
            }
            nodes.push(node_from_dto(node)?);
        }

        let edges = dto
            .edges
            .into_iter()
            .map(|e| Edge {
                id: e.id,
                source: e.source,
                target: e.target,
                handle: e.source_handle,
                extra: e.extra,
            })
            .collect();

        Ok(Workflow::from_parts(
            dto.id,
            dto.name,
            dto.description,
            nodes,
            edges,
            dto.extra,
        ))
    }
}

fn node_to_dto(node: &WorkflowNode) -> NodeDto {
    let common = node.data.common();
    let mut data = node.data_extra.clone();
    put(&mut data, "label", &common.label);
    put_opt(&mut data, "description", common.description.as_ref());

    match &node.data {
        NodeData::Start(_) | NodeData::End(_) => {}
        NodeData::Task(task) | NodeData::Approval(task) => {
            set_assignee(&mut data, task.assignee.as_ref());
            let due_date = task.due_date.map(|d| d.format(DUE_DATE_FORMAT).to_string());
            put_opt(&mut data, "dueDate", due_date.as_ref());
            put_opt(&mut data, "form", task.form.as_ref());
        }
        NodeData::Decision(decision) => {
            let conditions: Vec<ConditionDto> = decision
                .conditions
                .iter()
                .map(|c| ConditionDto {
                    id: c.id.clone(),
                    field: c.field.clone(),
                    operator: c.operator.symbol().to_string(),
                    value: c.value.clone(),
                    extra: c.extra.clone(),
                })
                .collect();
            put(&mut data, "condition", &conditions);
            put(&mut data, "branches", &decision.branches);
            put_opt(&mut data, "ifTrue", decision.if_true.as_ref());
            put_opt(&mut data, "ifFalse", decision.if_false.as_ref());
        }
        NodeData::Notification(n) => put(&mut data, "notification", &n.notification),
        NodeData::Form(step) => {
            set_assignee(&mut data, step.assignee.as_ref());
            put_opt(&mut data, "form", step.form.as_ref());
        }
    }

    NodeDto {
        id: node.id.clone(),
        node_type: node.node_type().to_string(),
        position: node.position,
        data,
        extra: node.extra.clone(),
    }
}

fn put<T: Serialize>(data: &mut Map<String, Value>, key: &str, value: &T) {
    match serde_json::to_value(value) {
        Ok(value) => {
            data.insert(key.to_string(), value);
        }
        Err(e) => log::error!("Failed to write node key '{}': {}", key, e),
    }
}

fn put_opt<T: Serialize>(data: &mut Map<String, Value>, key: &str, value: Option<&T>) {
    if let Some(value) = value {
        put(data, key, value);
    }
}

fn set_assignee(data: &mut Map<String, Value>, assignee: Option<&Assignee>) {
    if let Some(assignee) = assignee {
        put(data, "assignee", &assignee.id());
        put(data, "assignee_type", &assignee.kind());
    }
}

fn node_from_dto(dto: NodeDto) -> Result<WorkflowNode, ConversionError> {
    let node_type: NodeType =
        dto.node_type
            .parse()
            .map_err(|type_name| ConversionError::UnknownNodeType {
                node_id: dto.id.clone(),
                type_name,
            })?;

    let id = dto.id;
    let mut raw = dto.data;
    let common = Common {
        label: take::<String>(&id, &mut raw, "label")?.unwrap_or_default(),
        description: take(&id, &mut raw, "description")?,
    };

    let data = match node_type {
        NodeType::Start => NodeData::Start(common),
        NodeType::End => NodeData::End(common),
        NodeType::Task => NodeData::Task(take_task(&id, &mut raw, common)?),
        NodeType::Approval => NodeData::Approval(take_task(&id, &mut raw, common)?),
        NodeType::Decision => {
            let conditions = take::<Vec<ConditionDto>>(&id, &mut raw, "condition")?
                .unwrap_or_default()
                .into_iter()
                .map(|c| {
                    let operator =
                        c.operator
                            .parse()
                            .map_err(|operator| ConversionError::InvalidOperator {
                                node_id: id.clone(),
                                operator,
                            })?;
                    Ok(Condition {
                        id: c.id,
                        field: c.field,
                        operator,
                        value: c.value,
                        extra: c.extra,
                    })
                })
                .collect::<Result<Vec<_>, ConversionError>>()?;
            let defaults = DecisionData::default();
            NodeData::Decision(DecisionData {
                common,
                conditions: ConditionList::from_conditions(conditions),
                branches: take(&id, &mut raw, "branches")?.unwrap_or(defaults.branches),
                if_true: take(&id, &mut raw, "ifTrue")?,
                if_false: take(&id, &mut raw, "ifFalse")?,
            })
        }
        NodeType::Notification => NodeData::Notification(NotificationData {
            common,
            notification: take(&id, &mut raw, "notification")?.unwrap_or_default(),
        }),
        NodeType::Form => NodeData::Form(FormStepData {
            common,
            form: take(&id, &mut raw, "form")?,
            assignee: take_assignee(&id, &mut raw)?,
        }),
    };

    // Whatever the node's type did not read stays as it came in.
    Ok(WorkflowNode {
        id,
        position: dto.position,
        data,
        extra: dto.extra,
        data_extra: raw,
    })
}

/// Removes `key` from the data bag and decodes it. `null` counts as absent.
fn take<T: DeserializeOwned>(
    id: &str,
    raw: &mut Map<String, Value>,
    key: &str,
) -> Result<Option<T>, ConversionError> {
    match raw.remove(key) {
        None | Some(Value::Null) => Ok(None),
        Some(value) => serde_json::from_value(value)
            .map(Some)
            .map_err(|e| ConversionError::InvalidField {
                node_id: id.to_string(),
                key: key.to_string(),
                message: e.to_string(),
            }),
    }
}

fn take_task(
    id: &str,
    raw: &mut Map<String, Value>,
    common: Common,
) -> Result<TaskData, ConversionError> {
    Ok(TaskData {
        common,
        assignee: take_assignee(id, raw)?,
        due_date: take::<String>(id, raw, "dueDate")?
            .map(|s| parse_due_date(id, &s))
            .transpose()?,
        form: take(id, raw, "form")?,
    })
}

/// A blank or missing assignee leaves both assignee keys in the bag untouched.
fn take_assignee(
    id: &str,
    raw: &mut Map<String, Value>,
) -> Result<Option<Assignee>, ConversionError> {
    let blank = match raw.get("assignee") {
        None | Some(Value::Null) => true,
        Some(Value::String(s)) => s.is_empty(),
        Some(_) => false,
    };
    if blank {
        return Ok(None);
    }
    let Some(assignee) = take::<String>(id, raw, "assignee")? else {
        return Ok(None);
    };
    match take::<String>(id, raw, "assignee_type")?.as_deref() {
        Some("role") => Ok(Some(Assignee::Role(assignee))),
        Some("user") | None => Ok(Some(Assignee::User(assignee))),
        Some(other) => Err(ConversionError::InvalidAssigneeType {
            node_id: id.to_string(),
            assignee_type: other.to_string(),
        }),
    }
}

/// Accepts a plain date or a full RFC 3339 timestamp.
fn parse_due_date(id: &str, s: &str) -> Result<NaiveDate, ConversionError> {
    NaiveDate::parse_from_str(s, DUE_DATE_FORMAT)
        .or_else(|_| DateTime::parse_from_rfc3339(s).map(|dt| dt.date_naive()))
        .map_err(|_| ConversionError::Invalid(format!("node '{}' has invalid dueDate '{}'", id, s)))
}
