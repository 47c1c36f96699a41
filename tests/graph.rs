//! Tests for editing the workflow graph: nodes, edges, patches and decision conditions.
mod common;
use common::*;
use edms_flow::prelude::*;
use chrono::NaiveDate;
use edms_flow::workflow::{ConditionList, Notification};

#[test]
fn test_add_node_uses_type_defaults() {
    let mut wf = Workflow::new("Defaults");
    let decision = wf.add_node(NodeType::Decision);
    let task = wf.add_node(NodeType::Task);

    let node = wf.node(&decision).unwrap();
    assert_eq!(node.node_type(), NodeType::Decision);
    assert_eq!(node.label(), "Decision");
    assert!(node.data.conditions().unwrap().is_empty());
    match &node.data {
        NodeData::Decision(d) => assert_eq!(d.branches, vec!["true", "false"]),
        other => panic!("expected decision data, got {:?}", other),
    }

    let task_node = wf.node(&task).unwrap();
    assert!(task_node.data.assignee().is_none());
    assert!(task_node.data.conditions().is_none());
    assert!(task_node.position.y > node.position.y);
}

#[test]
fn test_remove_node_cascades_edges() {
    let mut wf = create_approval_workflow();
    let approval = wf.nodes_of_type(NodeType::Approval).next().unwrap().id.clone();
    assert_eq!(wf.edges().len(), 4);

    let removed = wf.remove_node(&approval).expect("node exists");
    assert_eq!(removed.label(), "Finance sign-off");
    assert_eq!(wf.nodes().len(), 3);
    assert_eq!(wf.edges().len(), 2);
    assert!(wf.edges().iter().all(|e| !e.touches(&approval)));

    assert!(wf.remove_node(&approval).is_none());
}

#[test]
fn test_start_decision_end_scenario() {
    let mut wf = Workflow::new("Scenario");
    let start = wf.add_node(NodeType::Start);
    let decision = wf.add_node(NodeType::Decision);
    let end = wf.add_node(NodeType::End);
    wf.connect(&start, &decision);
    wf.connect_branch(&decision, &end, Branch::True);
    wf.connect_branch(&decision, &end, Branch::False);

    assert_eq!(wf.nodes().len(), 3);
    assert_eq!(wf.edges().len(), 3);
    let from_decision: Vec<&Edge> = wf.outgoing(&decision).collect();
    assert_eq!(from_decision.len(), 2);
    assert!(from_decision.iter().all(|e| e.target == end));
    assert_eq!(from_decision[0].branch(), Some(Branch::True));
    assert_eq!(from_decision[1].branch(), Some(Branch::False));
    assert!(wf.validate().is_valid());
}

#[test]
fn test_update_node_merges_patch() {
    let mut wf = Workflow::new("Patch");
    let task = wf.add_node(NodeType::Task);
    let due = NaiveDate::from_ymd_opt(2026, 12, 1).unwrap();

    assert!(wf.update_node(
        &task,
        NodePatch::default()
            .label("Review contract")
            .assignee(Some(Assignee::User("u-9".into())))
            .due_date(Some(due))
    ));
    // A later patch only touches the fields it names.
    assert!(wf.update_node(&task, NodePatch::default().description(Some("Legal".into()))));

    let node = wf.node(&task).unwrap();
    assert_eq!(node.label(), "Review contract");
    assert_eq!(node.data.assignee(), Some(&Assignee::User("u-9".into())));
    assert_eq!(node.data.common().description.as_deref(), Some("Legal"));
    match &node.data {
        NodeData::Task(t) => assert_eq!(t.due_date, Some(due)),
        other => panic!("expected task data, got {:?}", other),
    }

    // Clearing is explicit.
    wf.update_node(&task, NodePatch::default().assignee(None));
    assert!(wf.node(&task).unwrap().data.assignee().is_none());
}

#[test]
fn test_update_node_ignores_unknown_ids_and_foreign_fields() {
    let mut wf = Workflow::new("Patch");
    let note = wf.add_node(NodeType::Notification);
    assert!(!wf.update_node("missing", NodePatch::default().label("x")));

    // An assignee means nothing to a notification node and is dropped.
    wf.update_node(
        &note,
        NodePatch::default()
            .assignee(Some(Assignee::Role("hr".into())))
            .notification(Notification {
                recipients: vec!["hr".into()],
                subject: "New hire".into(),
                message: "Please prepare a desk".into(),
                ..Default::default()
            }),
    );
    let node = wf.node(&note).unwrap();
    assert!(node.data.assignee().is_none());
    match &node.data {
        NodeData::Notification(n) => assert_eq!(n.notification.subject, "New hire"),
        other => panic!("expected notification data, got {:?}", other),
    }
}

#[test]
fn test_conditions_add_three_remove_one() {
    let mut wf = Workflow::new("Conditions");
    let decision = wf.add_node(NodeType::Decision);

    let a = wf.add_condition(&decision, "amount", ">", "1000").unwrap().unwrap();
    let b = wf.add_condition(&decision, "department", "==", "Sales").unwrap().unwrap();
    let c = wf.add_condition(&decision, "priority", "!=", "low").unwrap().unwrap();
    assert_eq!(vec![a.as_str(), b.as_str(), c.as_str()], ["cond-1", "cond-2", "cond-3"]);

    assert!(wf.remove_condition(&decision, &b).unwrap());
    assert!(!wf.remove_condition(&decision, &b).unwrap());

    let conditions = wf.node(&decision).unwrap().data.conditions().unwrap();
    let rendered: Vec<String> = conditions.iter().map(|c| c.to_string()).collect();
    assert_eq!(rendered, ["amount > 1000", "priority != low"]);

    // Ids are never reused after a removal.
    let d = wf.add_condition(&decision, "region", "==", "EU").unwrap().unwrap();
    assert_eq!(d, "cond-4");
}

#[test]
fn test_incomplete_condition_is_rejected() {
    let mut wf = Workflow::new("Conditions");
    let decision = wf.add_node(NodeType::Decision);

    assert_eq!(wf.add_condition(&decision, "  ", ">", "1").unwrap(), None);
    assert_eq!(wf.add_condition(&decision, "amount", "~=", "1").unwrap(), None);
    assert_eq!(wf.add_condition(&decision, "amount", ">", "").unwrap(), None);
    assert!(wf.node(&decision).unwrap().data.conditions().unwrap().is_empty());
}

#[test]
fn test_condition_list_update() {
    let mut list = ConditionList::default();
    let id = list.add("amount", ">=", "10").unwrap();

    assert!(list.update(&id, None, Some("<"), Some("5")));
    assert_eq!(list.get(&id).unwrap().to_string(), "amount < 5");
    // Unknown operators and blank values leave the existing parts alone.
    assert!(list.update(&id, Some(" "), Some("between"), None));
    assert_eq!(list.get(&id).unwrap().operator, Operator::SmallerThan);
    assert_eq!(list.get(&id).unwrap().field, "amount");
    assert!(!list.update("cond-99", Some("x"), None, None));
}

#[test]
fn test_disconnect_and_move() {
    let mut wf = create_approval_workflow();
    let edge_id = wf.edges()[0].id.clone();
    let removed = wf.disconnect(&edge_id).unwrap();
    assert_eq!(removed.id, edge_id);
    assert!(wf.edge(&edge_id).is_none());
    assert!(wf.disconnect(&edge_id).is_none());

    let first = wf.nodes()[0].id.clone();
    assert!(wf.move_node(&first, Position::new(10.0, 20.0)));
    assert_eq!(wf.node(&first).unwrap().position, Position::new(10.0, 20.0));
    assert!(!wf.move_node("missing", Position::default()));
}

#[test]
fn test_connect_accepts_anything() {
    let mut wf = Workflow::new("Loose");
    let task = wf.add_node(NodeType::Task);
    let first = wf.connect(&task, &task);
    let second = wf.connect(&task, "ghost");
    assert_ne!(first, second);
    assert_eq!(wf.edges().len(), 2);
    assert_eq!(wf.incoming(&task).count(), 1);
}
