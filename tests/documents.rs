//! Tests for document metadata, folder navigation, directory entities and editor callbacks.
mod common;
use common::*;
use edms_flow::document::{DocumentType, MetadataField, documents_in};
use edms_flow::directory::{Permission, Role, User};
use edms_flow::prelude::*;
use serde_json::json;

fn sample_document(folder: &str, filename: &str) -> Document {
    serde_json::from_value(json!({
        "id": format!("doc-{}", filename),
        "folderID": folder,
        "filename": filename,
        "documentType": "invoice",
        "hashName": "3f2a9c",
        "mimeType": "application/pdf",
        "metadata": { "supplier": "ACME", "tags": ["urgent", "q4"], "reference": "  " },
        "createdDate": "2026-10-01T08:30:00Z",
        "lastModifiedDateTime": "2026-10-02T09:00:00Z",
        "createdBy": "u-1",
        "lastModifiedBy": "u-2",
        "checksum": "abc123"
    }))
    .expect("valid document payload")
}

#[test]
fn test_folder_tree_navigation() {
    let folders: Vec<Folder> = serde_json::from_str(FOLDERS_JSON).unwrap();
    let tree = FolderTree::new(folders);
    assert_eq!(tree.len(), 4);

    let roots: Vec<&str> = tree.roots().iter().map(|f| f.name.as_str()).collect();
    assert_eq!(roots, ["Archive", "Contracts"]);

    let children: Vec<&str> = tree.children("f-archive").iter().map(|f| f.id.as_str()).collect();
    assert_eq!(children, ["f-2026"]);
    assert!(tree.children("f-contracts").is_empty());

    let crumbs: Vec<&str> = tree
        .breadcrumb("f-invoices")
        .iter()
        .map(|f| f.name.as_str())
        .collect();
    assert_eq!(crumbs, ["Archive", "2026", "Invoices"]);
    assert!(tree.breadcrumb("missing").is_empty());

    assert_eq!(tree.get("f-2026").unwrap().extra.get("color"), Some(&json!("blue")));
}

#[test]
fn test_breadcrumb_survives_parent_cycle() {
    let folders: Vec<Folder> = serde_json::from_value(json!([
        { "id": "a", "name": "A", "parentID": "b" },
        { "id": "b", "name": "B", "parentID": "a" }
    ]))
    .unwrap();
    let tree = FolderTree::new(folders);
    assert_eq!(tree.breadcrumb("a").len(), 2);
    assert!(tree.roots().is_empty());
}

#[test]
fn test_document_metadata() {
    let doc = sample_document("f-invoices", "invoice-2026-10.pdf");
    assert_eq!(doc.extension(), Some("pdf"));
    assert_eq!(
        doc.metadata.get("tags"),
        Some(&MetadataValue::Multiple(vec!["urgent".into(), "q4".into()]))
    );
    assert_eq!(doc.metadata.get("supplier").unwrap().values(), vec!["ACME"]);
    assert_eq!(doc.extra.get("checksum"), Some(&json!("abc123")));

    let invoice = DocumentType {
        id: "invoice".into(),
        name: "Invoice".into(),
        fields: vec![
            MetadataField { name: "supplier".into(), required: true, multiple: false },
            MetadataField { name: "reference".into(), required: true, multiple: false },
            MetadataField { name: "approver".into(), required: true, multiple: false },
            MetadataField { name: "tags".into(), required: false, multiple: true },
        ],
    };
    assert_eq!(doc.metadata_missing(&invoice), vec!["reference", "approver"]);
}

#[test]
fn test_documents_in_folder() {
    let docs = vec![
        sample_document("f-invoices", "a.pdf"),
        sample_document("f-contracts", "b.pdf"),
        sample_document("f-invoices", "README"),
    ];
    let in_invoices = documents_in(&docs, "f-invoices");
    assert_eq!(in_invoices.len(), 2);
    assert_eq!(in_invoices[1].extension(), None);
}

#[test]
fn test_user_permissions() {
    let mut user = User::new("u-1", "ada");
    user.roles.push(Role {
        id: "r-admin".into(),
        name: "Admin".into(),
        permissions: vec![Permission { id: "p-1".into(), name: "workflow.edit".into() }],
    });
    assert!(user.has_role("r-admin"));
    assert!(user.has_permission("workflow.edit"));
    assert!(!user.has_permission("user.delete"));
}

#[test]
fn test_editor_callback() {
    let callback = EditorCallback::parse(
        r#"{ "key": "doc-1-v3", "status": 2, "url": "https://docs.example.com/cache/doc-1.docx", "users": ["u-1"], "actions": [] }"#,
    )
    .unwrap();
    assert_eq!(callback.status, EditorStatus::ReadyToSave);
    assert!(callback.needs_save());
    assert!(!callback.is_failure());
    assert!(callback.extra.contains_key("actions"));

    let corrupt = EditorCallback::parse(r#"{ "key": "k", "status": 7 }"#).unwrap();
    assert!(corrupt.is_failure());
    assert!(EditorCallback::parse(r#"{ "key": "k", "status": 5 }"#).is_err());
}

#[test]
fn test_timestamps_without_offset_are_read_as_utc() {
    let docs: Vec<Document> = serde_json::from_value(json!([{
        "id": "doc-1",
        "folderID": "f-1",
        "filename": "scan.pdf",
        "createdDate": "2026-10-01T08:30:00",
        "lastModifiedDateTime": "2026-10-02T09:00:00.250"
    }]))
    .unwrap();
    assert_eq!(docs[0].created_date.to_rfc3339(), "2026-10-01T08:30:00+00:00");
    assert_eq!(docs[0].last_modified_date_time.timestamp_subsec_millis(), 250);

    let bad = json!({
        "id": "doc-2",
        "folderID": "f-1",
        "filename": "x.pdf",
        "createdDate": "yesterday",
        "lastModifiedDateTime": "2026-10-02T09:00:00Z"
    });
    assert!(serde_json::from_value::<Document>(bad).is_err());
}
