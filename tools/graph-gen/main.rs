use clap::Parser;
use edms_flow::logger;
use edms_flow::prelude::*;
use edms_flow::workflow::Notification;
use rand::rngs::ThreadRng;
use rand::seq::IndexedRandom;
use rand::{Rng, rng};
use std::fs;

/// A CLI tool to generate random, valid workflow graphs for the EDMS designer
#[derive(Parser, Debug)]
#[command(version, about, long_about = None)]
struct Cli {
    /// The path to write the generated JSON file to
    #[arg(short, long, default_value = "generated_workflow.json")]
    output: String,

    /// The minimum number of steps between start and end
    #[arg(long, default_value_t = 1)]
    min: usize,

    /// The maximum number of steps between start and end
    #[arg(long, default_value_t = 12)]
    max: usize,
}

const STEP_TYPES: [NodeType; 5] = [
    NodeType::Task,
    NodeType::Approval,
    NodeType::Decision,
    NodeType::Notification,
    NodeType::Form,
];
const ROLES: [&str; 4] = ["finance", "legal", "hr", "management"];
const FIELDS: [&str; 4] = ["amount", "department", "priority", "category"];

fn main() -> Result<()> {
    logger::init();
    let cli = Cli::parse();
    let mut rng = rng();

    if cli.min > cli.max {
        eprintln!(
            "Error: --min ({}) cannot be greater than --max ({})",
            cli.min, cli.max
        );
        std::process::exit(1);
    }

    let steps = rng.random_range(cli.min..=cli.max);
    println!("Generating a workflow with {} step(s)...", steps);

    let workflow = generate_workflow(&mut rng, steps)?;
    let report = workflow.validate();
    if !report.is_valid() {
        eprintln!("Error: generated workflow is invalid:\n{}", report);
        std::process::exit(1);
    }

    fs::write(&cli.output, workflow.to_json_pretty()?)?;
    println!(
        "Successfully generated {} nodes and {} edges into '{}'",
        workflow.nodes().len(),
        workflow.edges().len(),
        cli.output
    );
    Ok(())
}

/// Builds a start -> steps -> end chain. Decisions branch `true` onward and `false` to the end.
fn generate_workflow(rng: &mut ThreadRng, steps: usize) -> Result<Workflow> {
    let mut wf = Workflow::new(format!("Generated workflow #{}", rng.random_range(1000..10000)));
    let start = wf.add_node(NodeType::Start);
    let end = wf.add_node(NodeType::End);

    let mut previous = start;
    for i in 0..steps {
        let node_type = *STEP_TYPES.choose(rng).unwrap_or(&NodeType::Task);
        let id = wf.add_node(node_type);
        wf.update_node(&id, random_patch(rng, node_type, i + 1));
        if node_type == NodeType::Decision {
            let field = FIELDS.choose(rng).copied().unwrap_or("amount");
            let threshold = rng.random_range(1..100).to_string();
            wf.add_condition(&id, field, ">", &threshold)?;
        }

        if wf.node(&previous).map(|n| n.node_type()) == Some(NodeType::Decision) {
            wf.connect_branch(&previous, &id, Branch::True);
            wf.connect_branch(&previous, &end, Branch::False);
        } else {
            wf.connect(&previous, &id);
        }
        previous = id;
    }

    if wf.node(&previous).map(|n| n.node_type()) == Some(NodeType::Decision) {
        // Both branches of a trailing decision finish the workflow.
        let done = wf.add_node(NodeType::Notification);
        wf.connect_branch(&previous, &done, Branch::True);
        wf.connect_branch(&previous, &end, Branch::False);
        wf.connect(&done, &end);
    } else {
        wf.connect(&previous, &end);
    }
    Ok(wf)
}

fn random_patch(rng: &mut ThreadRng, node_type: NodeType, step: usize) -> NodePatch {
    let patch = NodePatch::default().label(format!("{} {}", node_type.default_label(), step));
    let role = ROLES.choose(rng).copied().unwrap_or("finance");
    match node_type {
        NodeType::Task | NodeType::Approval => patch.assignee(Some(if rng.random_bool(0.7) {
            Assignee::Role(role.to_string())
        } else {
            Assignee::User(format!("user-{}", rng.random_range(1..50)))
        })),
        NodeType::Notification => patch.notification(Notification {
            recipients: vec![role.to_string()],
            subject: format!("Step {} reached", step),
            ..Default::default()
        }),
        NodeType::Form => patch.form(Some(format!("form-{}", rng.random_range(1..20)))),
        _ => patch,
    }
}
