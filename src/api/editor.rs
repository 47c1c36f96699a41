use crate::error::ConversionError;
use serde::{Deserialize, Serialize};
use serde_json::{Map, Value};
use std::fmt;

/// Status codes the office-document editor reports on its callback.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(try_from = "u8", into = "u8")]
pub enum EditorStatus {
    NotFound = 0,
    Editing = 1,
    ReadyToSave = 2,
    SaveError = 3,
    ClosedWithoutChanges = 4,
    ForceSave = 6,
    Corrupt = 7,
}

impl TryFrom<u8> for EditorStatus {
    type Error = String;

    fn try_from(code: u8) -> Result<Self, Self::Error> {
        match code {
            0 => Ok(EditorStatus::NotFound),
            1 => Ok(EditorStatus::Editing),
            2 => Ok(EditorStatus::ReadyToSave),
            3 => Ok(EditorStatus::SaveError),
            4 => Ok(EditorStatus::ClosedWithoutChanges),
            6 => Ok(EditorStatus::ForceSave),
            7 => Ok(EditorStatus::Corrupt),
            other => Err(format!("unknown editor status code {}", other)),
        }
    }
}

impl From<EditorStatus> for u8 {
    fn from(status: EditorStatus) -> Self {
        status as u8
    }
}

impl fmt::Display for EditorStatus {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let s = match self {
            EditorStatus::NotFound => "document not found",
            EditorStatus::Editing => "being edited",
            EditorStatus::ReadyToSave => "ready to save",
            EditorStatus::SaveError => "save error",
            EditorStatus::ClosedWithoutChanges => "closed without changes",
            EditorStatus::ForceSave => "force save",
            EditorStatus::Corrupt => "corrupt",
        };
        write!(f, "{}", s)
    }
}

/// A save/status notification posted by the document editor, keyed by document key.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct EditorCallback {
    pub key: String,
    pub status: EditorStatus,
    /// Where the edited file can be downloaded; present when a save is due.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub url: Option<String>,
    #[serde(default)]
    pub users: Vec<String>,
    #[serde(flatten)]
    pub extra: Map<String, Value>,
}

impl EditorCallback {
    pub fn parse(json: &str) -> Result<Self, ConversionError> {
        serde_json::from_str(json).map_err(|e| ConversionError::Invalid(e.to_string()))
    }

    /// Whether the edited file must be fetched from `url` and stored.
    pub fn needs_save(&self) -> bool {
        matches!(
            self.status,
            EditorStatus::ReadyToSave | EditorStatus::ForceSave
        )
    }

    /// Failures an operator should see together with the raw payload.
    pub fn is_failure(&self) -> bool {
        matches!(
            self.status,
            EditorStatus::SaveError | EditorStatus::Corrupt | EditorStatus::NotFound
        )
    }
}

/// The editor's expected reply; `error: 0` acknowledges the callback.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct EditorAck {
    pub error: u8,
}

impl EditorAck {
    pub fn ok() -> Self {
        Self { error: 0 }
    }

    pub fn failed() -> Self {
        Self { error: 1 }
    }
}
