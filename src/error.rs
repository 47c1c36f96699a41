use crate::workflow::ValidationReport;
use thiserror::Error;

/// Errors raised while editing a workflow graph in memory.
#[derive(Error, Debug, Clone, PartialEq)]
pub enum GraphError {
    #[error("Node '{0}' does not exist in this workflow")]
    NodeNotFound(String),

    #[error("Node '{node_id}' is a {actual} node, but a {expected} node was required")]
    WrongNodeType {
        node_id: String,
        expected: String,
        actual: String,
    },
}

/// Errors that can occur when converting a backend payload into the editor model.
#[derive(Error, Debug, Clone, PartialEq)]
pub enum ConversionError {
    #[error("Node '{node_id}' has an unknown node type: '{type_name}'")]
    UnknownNodeType { node_id: String, type_name: String },

    #[error("Node '{node_id}' has an invalid assignee type: '{assignee_type}'")]
    InvalidAssigneeType {
        node_id: String,
        assignee_type: String,
    },

    #[error("Node '{node_id}' has a condition with an unknown operator: '{operator}'")]
    InvalidOperator { node_id: String, operator: String },

    #[error("Node '{node_id}' has an invalid '{key}': {message}")]
    InvalidField {
        node_id: String,
        key: String,
        message: String,
    },

    #[error("Node id '{0}' appears more than once in the payload")]
    DuplicateNodeId(String),

    #[error("Invalid payload: {0}")]
    Invalid(String),
}

/// Errors produced when a form record is checked against its form before submission.
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum FormError {
    #[error("Field '{0}' is required but has no value")]
    MissingRequired(String),

    #[error("Field '{0}' is not defined on form '{1}'")]
    UnknownField(String, String),

    #[error("Record belongs to form '{record_form}', not '{form}'")]
    FormMismatch { record_form: String, form: String },
}

/// Errors that can occur while loading client configuration.
#[derive(Error, Debug)]
pub enum ConfigError {
    #[error("Could not read configuration file '{path}': {source}")]
    Io {
        path: String,
        #[source]
        source: std::io::Error,
    },

    #[error("Failed to parse configuration JSON: {0}")]
    Parse(#[from] serde_json::Error),

    #[error("Invalid base URL '{0}'")]
    InvalidBaseUrl(String),
}

/// Errors surfaced by calls against the EDMS backend.
#[derive(Error, Debug)]
pub enum ApiError {
    #[error("Request to '{path}' failed: {source}")]
    Network {
        path: String,
        #[source]
        source: reqwest::Error,
    },

    #[error("Backend answered '{path}' with HTTP {status}: {body}")]
    Status {
        path: String,
        status: u16,
        body: String,
    },

    #[error("Could not decode response from '{path}': {message}")]
    Decode { path: String, message: String },

    #[error("Workflow failed validation with {} issue(s)", .0.issues.len())]
    Invalid(ValidationReport),

    #[error("Form record is incomplete: {}", .0.iter().map(ToString::to_string).collect::<Vec<_>>().join("; "))]
    InvalidRecord(Vec<FormError>),

    #[error("Workflow payload could not be converted: {0}")]
    Conversion(#[from] ConversionError),

    #[error("Failed to build HTTP client: {0}")]
    Client(String),
}

/// What kind of action a failed call was part of, for the user-facing message.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Action {
    Fetch,
    Save,
    Delete,
}

impl ApiError {
    /// HTTP status of the failed response, if the backend answered at all.
    pub fn status(&self) -> Option<u16> {
        match self {
            ApiError::Status { status, .. } => Some(*status),
            _ => None,
        }
    }

    /// Short message for a toast or snackbar. The raw payload stays on the error for diagnostics.
    pub fn user_message(&self, action: Action, what: &str) -> String {
        match self {
            ApiError::Invalid(report) => format!(
                "Cannot save {}: {} problem(s) must be fixed first",
                what,
                report.issues.len()
            ),
            ApiError::InvalidRecord(errors) => format!(
                "Cannot submit {}: {} field(s) need attention",
                what,
                errors.len()
            ),
            ApiError::Status { status: 401, .. } | ApiError::Status { status: 403, .. } => {
                format!("You are not allowed to access {}", what)
            }
            _ => match action {
                Action::Fetch => format!("Failed to fetch {}", what),
                Action::Save => format!("Failed to save {}", what),
                Action::Delete => format!("Failed to delete {}", what),
            },
        }
    }
}
