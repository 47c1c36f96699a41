use std::fmt;

/// Every backend route the client calls, relative to the configured base host.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Endpoint {
    Workflows,
    Workflow(String),
    WorkflowInstances,
    Forms,
    Form(String),
    FormRecords,
    FormRecordsByForm(String),
    FormRecordsByUser(String),
    Folders,
    Files,
    FileByHash(String),
    File(String),
    Users,
    User(String),
    Roles,
    Permissions,
}

impl Endpoint {
    /// Path segments, unescaped. The client percent-encodes them when building the URL.
    pub fn segments(&self) -> Vec<&str> {
        let mut segments: Vec<&str> = match self {
            Endpoint::Workflows | Endpoint::Workflow(_) | Endpoint::WorkflowInstances => {
                vec!["workflows", "api", "v1"]
            }
            Endpoint::Forms
            | Endpoint::Form(_)
            | Endpoint::FormRecords
            | Endpoint::FormRecordsByForm(_)
            | Endpoint::FormRecordsByUser(_) => vec!["forms", "api", "v1"],
            _ => vec!["api", "v1"],
        };
        match self {
            Endpoint::Workflows => segments.push("workflows"),
            Endpoint::Workflow(id) => segments.extend(["workflows", id.as_str()]),
            Endpoint::WorkflowInstances => segments.push("workflow-instances"),
            Endpoint::Forms => segments.push("forms"),
            Endpoint::Form(id) => segments.extend(["forms", id.as_str()]),
            Endpoint::FormRecords => segments.push("form-records"),
            Endpoint::FormRecordsByForm(id) => segments.extend(["form-records", "form", id.as_str()]),
            Endpoint::FormRecordsByUser(id) => segments.extend(["form-records", "user", id.as_str()]),
            Endpoint::Folders => segments.push("folders"),
            Endpoint::Files => segments.push("files"),
            Endpoint::FileByHash(hash) => segments.extend(["files", "hash", hash.as_str()]),
            Endpoint::File(id) => segments.extend(["files", id.as_str()]),
            Endpoint::Users => segments.push("users"),
            Endpoint::User(id) => segments.extend(["users", id.as_str()]),
            Endpoint::Roles => segments.push("roles"),
            Endpoint::Permissions => segments.push("permissions"),
        }
        segments
    }
}

impl fmt::Display for Endpoint {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "/{}", self.segments().join("/"))
    }
}
