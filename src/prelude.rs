//! Prelude module for convenient imports
//!
//! Re-exports the types most code needs when designing workflows, editing forms
//! and talking to the backend.
//!
//! # Example
//!
//! ```rust,no_run
//! use edms_flow::prelude::*;
//!
//! # fn run_example() -> Result<()> {
//! let json = std::fs::read_to_string("path/to/workflow.json")?;
//! let workflow = Workflow::from_json(&json)?;
//!
//! let report = workflow.validate();
//! for issue in &report.issues {
//!     println!("{}", issue);
//! }
//! # Ok(())
//! # }
//! ```

// Workflow model
pub use crate::workflow::{
    Assignee, Branch, Condition, Edge, NodeData, NodePatch, NodeType, Operator, Position,
    ValidationIssue, ValidationReport, Workflow, WorkflowNode,
};

// Wire format
pub use crate::dto::{IntoWorkflow, WorkflowDto};

// Forms and documents
pub use crate::document::{Document, Folder, FolderTree, MetadataValue};
pub use crate::form::{FieldType, Form, FormField, FormRecord};

// Backend access
pub use crate::api::{ApiClient, EditorCallback, EditorStatus};
pub use crate::config::ClientConfig;
pub use crate::session::{MemorySession, Session, SessionProvider};

// Error types
pub use crate::error::{Action, ApiError, ConversionError, FormError, GraphError};

// Result type alias for convenience
pub type Result<T> = std::result::Result<T, Box<dyn std::error::Error>>;
