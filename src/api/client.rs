use super::endpoints::Endpoint;
use crate::config::ClientConfig;
use crate::directory::{Permission, Role, User, UserDraft};
use crate::document::{Document, Folder, NewFolder};
use crate::dto::WorkflowDto;
use crate::error::ApiError;
use crate::form::{Form, FormRecord};
use crate::session::{MemorySession, SessionProvider};
use crate::workflow::{StartInstance, Workflow, WorkflowInstance};
use reqwest::header::AUTHORIZATION;
use reqwest::{Method, RequestBuilder, Url};
use serde::Serialize;
use serde::de::DeserializeOwned;
use std::sync::Arc;

/// Typed client for the EDMS REST backend.
///
/// Every call is a single request: no retries, no cancellation. A failed save may
/// or may not have reached the backend, so resubmitting can create a duplicate.
pub struct ApiClient {
    http: reqwest::Client,
    base: Url,
    session: Arc<dyn SessionProvider>,
}

pub struct ApiClientBuilder {
    config: ClientConfig,
    session: Option<Arc<dyn SessionProvider>>,
}

impl ApiClientBuilder {
    pub fn new(config: ClientConfig) -> Self {
        Self {
            config,
            session: None,
        }
    }

    pub fn session(mut self, session: Arc<dyn SessionProvider>) -> Self {
        self.session = Some(session);
        self
    }

    pub fn build(self) -> Result<ApiClient, ApiError> {
        let base = self
            .config
            .base()
            .map_err(|e| ApiError::Client(e.to_string()))?;
        let http = reqwest::Client::builder()
            .timeout(self.config.timeout())
            .user_agent(self.config.user_agent.clone())
            .build()
            .map_err(|e| ApiError::Client(e.to_string()))?;
        Ok(ApiClient {
            http,
            base,
            session: self
                .session
                .unwrap_or_else(|| Arc::new(MemorySession::new())),
        })
    }
}

impl ApiClient {
    pub fn builder(config: ClientConfig) -> ApiClientBuilder {
        ApiClientBuilder::new(config)
    }

    pub fn session(&self) -> &Arc<dyn SessionProvider> {
        &self.session
    }

    /// Full URL of an endpoint under the configured base.
    pub fn url(&self, endpoint: &Endpoint) -> Result<Url, ApiError> {
        let mut url = self.base.clone();
        url.path_segments_mut()
            .map_err(|_| ApiError::Client(format!("'{}' cannot be a base URL", self.base)))?
            .pop_if_empty()
            .extend(endpoint.segments());
        Ok(url)
    }

    // --- Workflows ---

    pub async fn list_workflows(&self) -> Result<Vec<Workflow>, ApiError> {
        let dtos: Vec<WorkflowDto> = self.get(Endpoint::Workflows).await?;
        dtos.into_iter()
            .map(|dto| Workflow::try_from(dto).map_err(ApiError::from))
            .collect()
    }

    pub async fn get_workflow(&self, id: &str) -> Result<Workflow, ApiError> {
        let dto: WorkflowDto = self.get(Endpoint::Workflow(id.to_string())).await?;
        Ok(Workflow::try_from(dto)?)
    }

    /// Validates the workflow, then creates it (no id yet) or replaces it (has an id).
    ///
    /// Invalid graphs are refused with [`ApiError::Invalid`] before any request is made.
    pub async fn save_workflow(&self, workflow: &Workflow) -> Result<Workflow, ApiError> {
        let report = workflow.validate();
        if !report.is_valid() {
            log::warn!(
                "Refusing to save workflow '{}': {} validation issue(s)",
                workflow.name,
                report.issues.len()
            );
            return Err(ApiError::Invalid(report));
        }

        let body = workflow.to_dto();
        let saved: WorkflowDto = match &workflow.id {
            Some(id) => {
                self.send(Method::PUT, Endpoint::Workflow(id.clone()), Some(&body))
                    .await?
            }
            None => self.send(Method::POST, Endpoint::Workflows, Some(&body)).await?,
        };
        log::info!(
            "Saved workflow '{}' ({} nodes, {} edges)",
            workflow.name,
            workflow.nodes().len(),
            workflow.edges().len()
        );
        Ok(Workflow::try_from(saved)?)
    }

    pub async fn delete_workflow(&self, id: &str) -> Result<(), ApiError> {
        self.send_empty(Method::DELETE, Endpoint::Workflow(id.to_string()))
            .await
    }

    pub async fn list_instances(&self) -> Result<Vec<WorkflowInstance>, ApiError> {
        self.get(Endpoint::WorkflowInstances).await
    }

    pub async fn start_instance(&self, request: &StartInstance) -> Result<WorkflowInstance, ApiError> {
        self.send(Method::POST, Endpoint::WorkflowInstances, Some(request))
            .await
    }

    // --- Forms ---

    pub async fn list_forms(&self) -> Result<Vec<Form>, ApiError> {
        self.get(Endpoint::Forms).await
    }

    pub async fn get_form(&self, id: &str) -> Result<Form, ApiError> {
        self.get(Endpoint::Form(id.to_string())).await
    }

    /// Creates the form when it has no id yet, otherwise replaces it.
    pub async fn save_form(&self, form: &Form) -> Result<Form, ApiError> {
        let duplicates = form.duplicate_field_names();
        if !duplicates.is_empty() {
            log::warn!(
                "Form '{}' has duplicate field names: {}",
                form.name,
                duplicates.join(", ")
            );
        }
        match &form.id {
            Some(id) => {
                self.send(Method::PUT, Endpoint::Form(id.clone()), Some(form))
                    .await
            }
            None => self.send(Method::POST, Endpoint::Forms, Some(form)).await,
        }
    }

    pub async fn delete_form(&self, id: &str) -> Result<(), ApiError> {
        self.send_empty(Method::DELETE, Endpoint::Form(id.to_string()))
            .await
    }

    pub async fn list_records(&self) -> Result<Vec<FormRecord>, ApiError> {
        self.get(Endpoint::FormRecords).await
    }

    pub async fn records_for_form(&self, form_id: &str) -> Result<Vec<FormRecord>, ApiError> {
        self.get(Endpoint::FormRecordsByForm(form_id.to_string()))
            .await
    }

    pub async fn records_for_user(&self, user_id: &str) -> Result<Vec<FormRecord>, ApiError> {
        self.get(Endpoint::FormRecordsByUser(user_id.to_string()))
            .await
    }

    /// Checks required fields against `form`, then submits the record.
    pub async fn submit_record(&self, form: &Form, record: &FormRecord) -> Result<FormRecord, ApiError> {
        record.validate(form).map_err(ApiError::InvalidRecord)?;
        self.send(Method::POST, Endpoint::FormRecords, Some(record))
            .await
    }

    // --- Files and folders ---

    pub async fn list_folders(&self) -> Result<Vec<Folder>, ApiError> {
        self.get(Endpoint::Folders).await
    }

    pub async fn create_folder(&self, folder: &NewFolder) -> Result<Folder, ApiError> {
        self.send(Method::POST, Endpoint::Folders, Some(folder)).await
    }

    pub async fn list_files(&self) -> Result<Vec<Document>, ApiError> {
        self.get(Endpoint::Files).await
    }

    pub async fn file_by_hash(&self, hash: &str) -> Result<Document, ApiError> {
        self.get(Endpoint::FileByHash(hash.to_string())).await
    }

    pub async fn delete_file(&self, id: &str) -> Result<(), ApiError> {
        self.send_empty(Method::DELETE, Endpoint::File(id.to_string()))
            .await
    }

    // --- Users, roles, permissions ---

    pub async fn list_users(&self) -> Result<Vec<User>, ApiError> {
        self.get(Endpoint::Users).await
    }

    pub async fn create_user(&self, user: &UserDraft) -> Result<User, ApiError> {
        self.send(Method::POST, Endpoint::Users, Some(user)).await
    }

    pub async fn update_user(&self, id: &str, user: &UserDraft) -> Result<User, ApiError> {
        self.send(Method::PUT, Endpoint::User(id.to_string()), Some(user))
            .await
    }

    pub async fn delete_user(&self, id: &str) -> Result<(), ApiError> {
        self.send_empty(Method::DELETE, Endpoint::User(id.to_string()))
            .await
    }

    pub async fn list_roles(&self) -> Result<Vec<Role>, ApiError> {
        self.get(Endpoint::Roles).await
    }

    pub async fn list_permissions(&self) -> Result<Vec<Permission>, ApiError> {
        self.get(Endpoint::Permissions).await
    }

    // --- Plumbing ---

    async fn get<T: DeserializeOwned>(&self, endpoint: Endpoint) -> Result<T, ApiError> {
        self.send(Method::GET, endpoint, None::<&()>).await
    }

    async fn send<T, B>(&self, method: Method, endpoint: Endpoint, body: Option<&B>) -> Result<T, ApiError>
    where
        T: DeserializeOwned,
        B: Serialize + ?Sized,
    {
        let path = endpoint.to_string();
        let mut request = self.request(method, &endpoint)?;
        if let Some(body) = body {
            request = request.json(body);
        }
        let text = self.execute(&path, request).await?;
        serde_json::from_str(&text).map_err(|e| ApiError::Decode {
            path,
            message: e.to_string(),
        })
    }

    async fn send_empty(&self, method: Method, endpoint: Endpoint) -> Result<(), ApiError> {
        let path = endpoint.to_string();
        let request = self.request(method, &endpoint)?;
        self.execute(&path, request).await.map(|_| ())
    }

    fn request(&self, method: Method, endpoint: &Endpoint) -> Result<RequestBuilder, ApiError> {
        let mut request = self.http.request(method, self.url(endpoint)?);
        if let Some(session) = self.session.current() {
            request = request.header(AUTHORIZATION, session.bearer());
        }
        Ok(request)
    }

    async fn execute(&self, path: &str, request: RequestBuilder) -> Result<String, ApiError> {
        let response = request.send().await.map_err(|source| ApiError::Network {
            path: path.to_string(),
            source,
        })?;
        let status = response.status();
        let body = response.text().await.map_err(|source| ApiError::Network {
            path: path.to_string(),
            source,
        })?;

        if status.is_success() {
            Ok(body)
        } else {
            log::error!(
                "Request to '{}' failed with HTTP {}: {}",
                path,
                status.as_u16(),
                body
            );
            Err(ApiError::Status {
                path: path.to_string(),
                status: status.as_u16(),
                body,
            })
        }
    }
}
