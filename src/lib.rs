//! # edms-flow - Workflow Designer Core for an EDMS Client
//!
//! **edms-flow** holds the editing state behind the workflow designer and form builder of an
//! enterprise document-management system, and talks to the EDMS backend over REST.
//! Graph rendering, drag-and-drop and document viewers live elsewhere; this crate owns the
//! model they edit.
//!
//! ## Core Workflow
//!
//! 1.  **Load or create**: Build a [`workflow::Workflow`] with `add_node`/`connect`, or fetch one
//!     through [`api::ApiClient`], which converts the backend payload for you.
//! 2.  **Edit**: Apply [`workflow::NodePatch`]es from configuration panels, maintain decision
//!     conditions, attach forms.
//! 3.  **Validate**: [`workflow::Workflow::validate`] reports every structural problem at once.
//! 4.  **Save**: `ApiClient::save_workflow` refuses invalid graphs and otherwise sends the
//!     payload, keeping node ids and any fields it does not understand.
//!
//! ## Quick Start
//!
//! ```rust,no_run
//! use edms_flow::prelude::*;
//! use std::sync::Arc;
//!
//! #[tokio::main]
//! async fn main() -> Result<()> {
//!     let mut wf = Workflow::new("Invoice approval");
//!     let start = wf.add_node(NodeType::Start);
//!     let check = wf.add_node(NodeType::Decision);
//!     let approve = wf.add_node(NodeType::Approval);
//!     let end = wf.add_node(NodeType::End);
//!
//!     wf.add_condition(&check, "amount", ">", "1000")?;
//!     wf.update_node(
//!         &approve,
//!         NodePatch::default().assignee(Some(Assignee::Role("finance".into()))),
//!     );
//!
//!     wf.connect(&start, &check);
//!     wf.connect_branch(&check, &approve, Branch::True);
//!     wf.connect_branch(&check, &end, Branch::False);
//!     wf.connect(&approve, &end);
//!     assert!(wf.validate().is_valid());
//!
//!     let session = Arc::new(MemorySession::new());
//!     let client = ApiClient::builder(ClientConfig::new("https://edms.example.com"))
//!         .session(session)
//!         .build()?;
//!
//!     match client.save_workflow(&wf).await {
//!         Ok(saved) => println!("Saved as {:?}", saved.id),
//!         Err(e) => eprintln!("{}", e.user_message(Action::Save, "workflow")),
//!     }
//!     Ok(())
//! }
//! ```

pub mod api;
pub mod config;
pub mod directory;
pub mod document;
pub mod dto;
pub mod error;
pub mod form;
pub mod logger;
pub mod prelude;
pub mod session;
pub mod workflow;
