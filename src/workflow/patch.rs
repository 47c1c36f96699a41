use super::condition::Condition;
use super::condition::ConditionList;
use super::node::{Assignee, FormId, NodeData, Notification};
use chrono::NaiveDate;

/// A partial update to a node's data, as produced by a configuration panel.
///
/// `None` leaves a field alone. For clearable fields, `Some(None)` clears them.
/// Fields that the target node kind does not carry are ignored.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct NodePatch {
    pub label: Option<String>,
    pub description: Option<Option<String>>,
    pub assignee: Option<Option<Assignee>>,
    pub due_date: Option<Option<NaiveDate>>,
    pub form: Option<Option<FormId>>,
    pub notification: Option<Notification>,
    pub conditions: Option<Vec<Condition>>,
}

impl NodePatch {
    pub fn label(mut self, label: impl Into<String>) -> Self {
        self.label = Some(label.into());
        self
    }

    pub fn description(mut self, description: Option<String>) -> Self {
        self.description = Some(description);
        self
    }

    pub fn assignee(mut self, assignee: Option<Assignee>) -> Self {
        self.assignee = Some(assignee);
        self
    }

    pub fn due_date(mut self, due_date: Option<NaiveDate>) -> Self {
        self.due_date = Some(due_date);
        self
    }

    pub fn form(mut self, form: Option<FormId>) -> Self {
        self.form = Some(form);
        self
    }

    pub fn notification(mut self, notification: Notification) -> Self {
        self.notification = Some(notification);
        self
    }

    pub fn conditions(mut self, conditions: Vec<Condition>) -> Self {
        self.conditions = Some(conditions);
        self
    }

    /// Merges this patch into `data`.
    pub(crate) fn apply(self, data: &mut NodeData) {
        let common = data.common_mut();
        if let Some(label) = self.label {
            common.label = label;
        }
        if let Some(description) = self.description {
            common.description = description;
        }

        match data {
            NodeData::Task(task) | NodeData::Approval(task) => {
                if let Some(assignee) = self.assignee {
                    task.assignee = assignee;
                }
                if let Some(due_date) = self.due_date {
                    task.due_date = due_date;
                }
                if let Some(form) = self.form {
                    task.form = form;
                }
            }
            NodeData::Form(step) => {
                if let Some(assignee) = self.assignee {
                    step.assignee = assignee;
                }
                if let Some(form) = self.form {
                    step.form = form;
                }
            }
            NodeData::Decision(decision) => {
                if let Some(conditions) = self.conditions {
                    decision.conditions = ConditionList::from_conditions(conditions);
                }
            }
            NodeData::Notification(n) => {
                if let Some(notification) = self.notification {
                    n.notification = notification;
                }
            }
            NodeData::Start(_) | NodeData::End(_) => {}
        }
    }
}
