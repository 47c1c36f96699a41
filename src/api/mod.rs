//! REST access to the EDMS backend and the document-editor callback payloads.

pub mod client;
pub mod editor;
pub mod endpoints;

pub use client::{ApiClient, ApiClientBuilder};
pub use editor::{EditorAck, EditorCallback, EditorStatus};
pub use endpoints::Endpoint;
