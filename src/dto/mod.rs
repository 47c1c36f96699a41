//! Wire shapes of the workflow API and their conversion to and from the editor model.

pub mod conversion;
pub mod workflow;

pub use conversion::IntoWorkflow;
pub use workflow::{ConditionDto, EdgeDto, NodeDto, WorkflowDto};
