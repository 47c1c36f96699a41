//! Common test utilities for building workflows, forms and backend payloads.
use edms_flow::prelude::*;

/// A backend workflow payload as the designer saves it, with keys this crate does not model.
///
/// Logic: start -> decision(amount > 1000) -> approval (true) | end (false), approval -> end
#[allow(dead_code)]
pub const APPROVAL_WORKFLOW_JSON: &str = r#"{
    "id": "wf-42",
    "name": "Invoice approval",
    "description": "Large invoices need a second pair of eyes",
    "version": 3,
    "nodes": [
        {
            "id": "start-1",
            "type": "start",
            "position": { "x": 250, "y": 80 },
            "data": { "label": "Invoice received" }
        },
        {
            "id": "decision-1",
            "type": "decision",
            "position": { "x": 250, "y": 200 },
            "data": {
                "label": "Large amount?",
                "condition": [
                    { "id": "cond-1", "field": "amount", "operator": ">", "value": "1000" }
                ],
                "branches": ["true", "false"],
                "ifTrue": "approval-1",
                "ifFalse": "end-1"
            }
        },
        {
            "id": "approval-1",
            "type": "approval",
            "position": { "x": 400, "y": 320 },
            "selected": true,
            "data": {
                "label": "Finance sign-off",
                "assignee": "finance",
                "assignee_type": "role",
                "dueDate": "2026-11-30",
                "color": "amber"
            }
        },
        {
            "id": "end-1",
            "type": "end",
            "position": { "x": 250, "y": 440 },
            "data": { "label": "Done" }
        }
    ],
    "edges": [
        { "id": "e1", "source": "start-1", "target": "decision-1" },
        { "id": "e2", "source": "decision-1", "target": "approval-1", "sourceHandle": "true", "animated": true },
        { "id": "e3", "source": "decision-1", "target": "end-1", "sourceHandle": "false" },
        { "id": "e4", "source": "approval-1", "target": "end-1" }
    ]
}"#;

/// Builds the same approval workflow through the editing API.
#[allow(dead_code)]
pub fn create_approval_workflow() -> Workflow {
    let mut wf = Workflow::new("Invoice approval");
    let start = wf.add_node(NodeType::Start);
    let decision = wf.add_node(NodeType::Decision);
    let approval = wf.add_node(NodeType::Approval);
    let end = wf.add_node(NodeType::End);

    wf.add_condition(&decision, "amount", ">", "1000")
        .expect("decision node accepts conditions");
    wf.update_node(
        &approval,
        NodePatch::default()
            .label("Finance sign-off")
            .assignee(Some(Assignee::Role("finance".into()))),
    );

    wf.connect(&start, &decision);
    wf.connect_branch(&decision, &approval, Branch::True);
    wf.connect_branch(&decision, &end, Branch::False);
    wf.connect(&approval, &end);
    wf
}

/// A leave request form with a required text field, a select and an unknown `email` type.
#[allow(dead_code)]
pub fn create_leave_form() -> Form {
    let mut department = FormField::new("department", FieldType::Select);
    department.select_options = Some(vec!["Sales".into(), "IT".into(), "HR".into()]);

    let mut form = Form::new("Leave request")
        .with_field(FormField::new("reason", FieldType::Text).required())
        .with_field(department)
        .with_field(FormField::new("contact", FieldType::from("email")));
    form.id = Some("form-7".into());
    form
}

/// A flat folder listing: Archive > 2026 > Invoices, plus a separate Contracts root.
#[allow(dead_code)]
pub const FOLDERS_JSON: &str = r#"[
    { "id": "f-invoices", "name": "Invoices", "parentID": "f-2026" },
    { "id": "f-archive", "name": "Archive" },
    { "id": "f-2026", "name": "2026", "parentID": "f-archive", "color": "blue" },
    { "id": "f-contracts", "name": "Contracts" }
]"#;
