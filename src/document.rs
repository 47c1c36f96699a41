use ahash::{AHashMap, AHashSet};
use chrono::{DateTime, NaiveDateTime, Utc};
use serde::{Deserialize, Deserializer, Serialize};
use serde_json::{Map, Value};

/// A metadata entry: either one string or a list of them.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(untagged)]
pub enum MetadataValue {
    Single(String),
    Multiple(Vec<String>),
}

impl MetadataValue {
    pub fn is_blank(&self) -> bool {
        match self {
            MetadataValue::Single(s) => s.trim().is_empty(),
            MetadataValue::Multiple(v) => v.iter().all(|s| s.trim().is_empty()),
        }
    }

    pub fn values(&self) -> Vec<&str> {
        match self {
            MetadataValue::Single(s) => vec![s.as_str()],
            MetadataValue::Multiple(v) => v.iter().map(String::as_str).collect(),
        }
    }
}

/// File metadata as stored by the file-management backend.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Document {
    pub id: String,
    #[serde(rename = "folderID")]
    pub folder_id: String,
    pub filename: String,
    #[serde(default)]
    pub document_type: String,
    #[serde(default)]
    pub hash_name: String,
    #[serde(default)]
    pub mime_type: String,
    #[serde(default)]
    pub metadata: AHashMap<String, MetadataValue>,
    #[serde(deserialize_with = "lenient_timestamp")]
    pub created_date: DateTime<Utc>,
    #[serde(deserialize_with = "lenient_timestamp")]
    pub last_modified_date_time: DateTime<Utc>,
    #[serde(default)]
    pub created_by: String,
    #[serde(default)]
    pub last_modified_by: String,
    #[serde(flatten)]
    pub extra: Map<String, Value>,
}

impl Document {
    /// Keys the document type expects that have no non-blank value on this document.
    pub fn metadata_missing<'a>(&self, document_type: &'a DocumentType) -> Vec<&'a str> {
        document_type
            .fields
            .iter()
            .filter(|f| f.required)
            .filter(|f| self.metadata.get(&f.name).is_none_or(MetadataValue::is_blank))
            .map(|f| f.name.as_str())
            .collect()
    }

    pub fn extension(&self) -> Option<&str> {
        self.filename
            .rsplit_once('.')
            .map(|(_, ext)| ext)
            .filter(|ext| !ext.is_empty())
    }
}

/// Reads an RFC 3339 timestamp, or one without an offset, which is taken as UTC.
fn lenient_timestamp<'de, D>(deserializer: D) -> Result<DateTime<Utc>, D::Error>
where
    D: Deserializer<'de>,
{
    let raw = String::deserialize(deserializer)?;
    DateTime::parse_from_rfc3339(&raw)
        .map(|dt| dt.with_timezone(&Utc))
        .or_else(|_| {
            NaiveDateTime::parse_from_str(&raw, "%Y-%m-%dT%H:%M:%S%.f").map(|dt| dt.and_utc())
        })
        .map_err(|_| serde::de::Error::custom(format!("invalid timestamp '{}'", raw)))
}

/// Schema of the metadata fields expected on a kind of document.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct DocumentType {
    pub id: String,
    pub name: String,
    #[serde(default)]
    pub fields: Vec<MetadataField>,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct MetadataField {
    pub name: String,
    #[serde(default)]
    pub required: bool,
    #[serde(default)]
    pub multiple: bool,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Folder {
    pub id: String,
    pub name: String,
    #[serde(rename = "parentID", default, skip_serializing_if = "Option::is_none")]
    pub parent_id: Option<String>,
    #[serde(flatten)]
    pub extra: Map<String, Value>,
}

/// Body of a folder creation request.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct NewFolder {
    pub name: String,
    #[serde(rename = "parentID", skip_serializing_if = "Option::is_none")]
    pub parent_id: Option<String>,
}

/// Explorer state over a flat folder listing: children lookup and breadcrumbs.
#[derive(Debug, Clone, Default)]
pub struct FolderTree {
    folders: AHashMap<String, Folder>,
    children: AHashMap<Option<String>, Vec<String>>,
}

impl FolderTree {
    pub fn new(folders: Vec<Folder>) -> Self {
        let mut children: AHashMap<Option<String>, Vec<String>> = AHashMap::new();
        for folder in &folders {
            children
                .entry(folder.parent_id.clone())
                .or_default()
                .push(folder.id.clone());
        }
        let folders = folders.into_iter().map(|f| (f.id.clone(), f)).collect();
        Self { folders, children }
    }

    pub fn get(&self, id: &str) -> Option<&Folder> {
        self.folders.get(id)
    }

    /// Folders without a parent, plus those whose parent is not in the listing.
    pub fn roots(&self) -> Vec<&Folder> {
        let mut roots: Vec<&Folder> = self
            .folders
            .values()
            .filter(|f| {
                f.parent_id
                    .as_ref()
                    .is_none_or(|p| !self.folders.contains_key(p))
            })
            .collect();
        roots.sort_by(|a, b| a.name.cmp(&b.name));
        roots
    }

    pub fn children(&self, id: &str) -> Vec<&Folder> {
        let mut children: Vec<&Folder> = self
            .children
            .get(&Some(id.to_string()))
            .into_iter()
            .flatten()
            .filter_map(|c| self.folders.get(c))
            .collect();
        children.sort_by(|a, b| a.name.cmp(&b.name));
        children
    }

    /// Path from the outermost known ancestor down to `id`. Parent cycles are cut.
    pub fn breadcrumb(&self, id: &str) -> Vec<&Folder> {
        let mut path = Vec::new();
        let mut seen = AHashSet::new();
        let mut current = self.folders.get(id);
        while let Some(folder) = current {
            if !seen.insert(folder.id.as_str()) {
                break;
            }
            path.push(folder);
            current = folder.parent_id.as_deref().and_then(|p| self.folders.get(p));
        }
        path.reverse();
        path
    }

    pub fn len(&self) -> usize {
        self.folders.len()
    }

    pub fn is_empty(&self) -> bool {
        self.folders.is_empty()
    }
}

/// Documents that live directly in `folder_id`.
pub fn documents_in<'a>(documents: &'a [Document], folder_id: &str) -> Vec<&'a Document> {
    documents.iter().filter(|d| d.folder_id == folder_id).collect()
}
