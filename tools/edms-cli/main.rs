use clap::{Parser, Subcommand};
use edms_flow::directory::User;
use edms_flow::logger;
use edms_flow::prelude::*;
use std::fs;
use std::sync::Arc;

/// Validate, inspect and sync workflow definitions with an EDMS backend
#[derive(Parser, Debug)]
#[command(version, about, long_about = None)]
struct Cli {
    /// Base URL of the EDMS backend
    #[arg(long, env = "EDMS_BASE_URL", global = true)]
    base_url: Option<String>,

    /// Bearer token for the backend
    #[arg(long, env = "EDMS_TOKEN", global = true, hide_env_values = true)]
    token: Option<String>,

    /// JSON client configuration file; overridden by --base-url
    #[arg(short, long, global = true)]
    config: Option<String>,

    #[command(subcommand)]
    command: Command,
}

#[derive(Subcommand, Debug)]
enum Command {
    /// Check a workflow JSON file and list every problem found
    Validate { path: String },
    /// Print the nodes and edges of a workflow JSON file
    Inspect { path: String },
    /// Download a workflow from the backend
    Pull {
        id: String,
        /// Write to this file instead of stdout
        #[arg(short, long)]
        output: Option<String>,
    },
    /// Validate and upload a workflow JSON file
    Push { path: String },
    /// List the forms known to the backend
    Forms,
}

#[tokio::main]
async fn main() {
    logger::init();
    let cli = Cli::parse();

    match &cli.command {
        Command::Validate { path } => run_validate(path),
        Command::Inspect { path } => run_inspect(path),
        Command::Pull { id, output } => {
            let client = connect(&cli);
            let workflow = client
                .get_workflow(id)
                .await
                .unwrap_or_else(|e| exit_with_error(&e.user_message(Action::Fetch, "workflow")));
            let json = workflow
                .to_json_pretty()
                .unwrap_or_else(|e| exit_with_error(&e.to_string()));
            match output {
                Some(path) => {
                    fs::write(path, json).unwrap_or_else(|e| {
                        exit_with_error(&format!("Failed to write '{}': {}", path, e))
                    });
                    println!("Wrote workflow '{}' to '{}'", workflow.name, path);
                }
                None => println!("{}", json),
            }
        }
        Command::Push { path } => {
            let workflow = load_workflow(path);
            let client = connect(&cli);
            match client.save_workflow(&workflow).await {
                Ok(saved) => println!(
                    "Saved workflow '{}' (id {})",
                    saved.name,
                    saved.id.as_deref().unwrap_or("?")
                ),
                Err(ApiError::Invalid(report)) => {
                    print_report(&report);
                    std::process::exit(1);
                }
                Err(e) => {
                    log::debug!("{}", e);
                    exit_with_error(&e.user_message(Action::Save, "workflow"))
                }
            }
        }
        Command::Forms => {
            let client = connect(&cli);
            let forms = client
                .list_forms()
                .await
                .unwrap_or_else(|e| exit_with_error(&e.user_message(Action::Fetch, "forms")));
            for form in forms {
                println!(
                    "{:<24} {:>3} field(s)  {}",
                    form.id.as_deref().unwrap_or("-"),
                    form.fields.len(),
                    form.name
                );
            }
        }
    }
}

fn run_validate(path: &str) {
    let workflow = load_workflow(path);
    let report = workflow.validate();
    if report.is_valid() {
        println!("Workflow '{}' is valid.", workflow.name);
    } else {
        print_report(&report);
        std::process::exit(1);
    }
}

fn run_inspect(path: &str) {
    let workflow = load_workflow(path);
    println!("Workflow: {}", workflow.name);
    if let Some(id) = &workflow.id {
        println!("Id:       {}", id);
    }

    println!("\n--- Nodes ({}) ---", workflow.nodes().len());
    for node in workflow.nodes() {
        let mut line = format!("{:<16} {:<13} {}", node.id, node.node_type(), node.label());
        if let Some(assignee) = node.data.assignee() {
            line.push_str(&format!("  [{}]", assignee));
        }
        if let Some(conditions) = node.data.conditions() {
            for condition in conditions {
                line.push_str(&format!("\n{:>32} {}", "if", condition));
            }
        }
        println!("{}", line);
    }

    println!("\n--- Edges ({}) ---", workflow.edges().len());
    for edge in workflow.edges() {
        match edge.branch() {
            Some(branch) => println!("{} -> {} ({})", edge.source, edge.target, branch),
            None => println!("{} -> {}", edge.source, edge.target),
        }
    }
}

fn print_report(report: &ValidationReport) {
    eprintln!("Found {} problem(s):", report.issues.len());
    for issue in &report.issues {
        eprintln!("  - {}", issue);
    }
}

fn load_workflow(path: &str) -> Workflow {
    let json = fs::read_to_string(path)
        .unwrap_or_else(|e| exit_with_error(&format!("Failed to read '{}': {}", path, e)));
    Workflow::from_json(&json)
        .unwrap_or_else(|e| exit_with_error(&format!("Failed to parse '{}': {}", path, e)))
}

fn connect(cli: &Cli) -> ApiClient {
    let mut config = match &cli.config {
        Some(path) => ClientConfig::from_file(path).unwrap_or_else(|e| exit_with_error(&e.to_string())),
        None => ClientConfig::new(""),
    };
    if let Some(base_url) = &cli.base_url {
        config.base_url = base_url.clone();
    }
    if config.base_url.is_empty() {
        exit_with_error("No backend configured. Pass --base-url, set EDMS_BASE_URL or use --config.");
    }

    let session = Arc::new(MemorySession::new());
    if let Some(token) = &cli.token {
        session.login(Session::new(token.clone(), User::new("", "cli")));
    }

    ApiClient::builder(config)
        .session(session)
        .build()
        .unwrap_or_else(|e| exit_with_error(&e.to_string()))
}

fn exit_with_error(message: &str) -> ! {
    eprintln!("\nError: {}", message);
    std::process::exit(1);
}
