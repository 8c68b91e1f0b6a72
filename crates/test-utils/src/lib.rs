use async_trait::async_trait;
use researchdesk::api::ResearchApi;
use researchdesk::types::{
    DeleteFileResponse, FilesResponse, KnowledgeBasesResponse, ModelDescriptor, ModelsResponse,
    ReportResponse, ResearchRequest, SelectedFile, UploadResponse,
};
use researchdesk::ClientError;
use std::sync::{Arc, Mutex, Once};

static INIT: Once = Once::new();

/// Initializes the tracing subscriber and loads .env for tests.
pub fn setup_tracing() {
    INIT.call_once(|| {
        dotenvy::dotenv().ok();
        let _ = tracing_subscriber::fmt()
            .with_env_filter(tracing_subscriber::EnvFilter::from_default_env())
            .with_test_writer()
            .try_init();
    });
}

// --- Mock Research API ---

/// A request observed by `MockResearchApi`.
#[derive(Clone, Debug, PartialEq)]
pub enum MockCall {
    ListModels,
    ListKnowledgeBases,
    Upload {
        file_name: String,
        knowledge_base: String,
    },
    GenerateReport(ResearchRequest),
    ListFiles,
    DeleteFile(String),
    FetchReportDocument(String),
}

/// A programmed reply: a body, or a failing HTTP status.
pub type MockReply<T> = Result<T, u16>;

#[derive(Debug)]
struct MockState {
    models: MockReply<ModelsResponse>,
    knowledge_bases: MockReply<KnowledgeBasesResponse>,
    upload: MockReply<UploadResponse>,
    report: MockReply<ReportResponse>,
    files: MockReply<FilesResponse>,
    delete: MockReply<DeleteFileResponse>,
    document: MockReply<Vec<u8>>,
}

impl Default for MockState {
    fn default() -> Self {
        Self {
            models: Ok(ModelsResponse::default()),
            knowledge_bases: Ok(KnowledgeBasesResponse::default()),
            upload: Err(500),
            report: Err(500),
            files: Ok(FilesResponse::default()),
            delete: Err(500),
            document: Err(404),
        }
    }
}

/// An in-memory `ResearchApi` that records every call.
///
/// Unprogrammed listings answer empty; unprogrammed submissions fail with 500.
#[derive(Clone, Debug, Default)]
pub struct MockResearchApi {
    state: Arc<Mutex<MockState>>,
    calls: Arc<Mutex<Vec<MockCall>>>,
}

fn reply<T: Clone>(reply: &MockReply<T>) -> Result<T, ClientError> {
    reply.clone().map_err(ClientError::HttpStatus)
}

impl MockResearchApi {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn set_models(&self, ids: &[&str]) {
        self.state.lock().unwrap().models = Ok(ModelsResponse {
            models: Some(
                ids.iter()
                    .map(|id| ModelDescriptor { id: id.to_string() })
                    .collect(),
            ),
        });
    }

    pub fn set_models_reply(&self, reply: MockReply<ModelsResponse>) {
        self.state.lock().unwrap().models = reply;
    }

    pub fn set_knowledge_bases(&self, names: &[&str]) {
        self.state.lock().unwrap().knowledge_bases = Ok(KnowledgeBasesResponse {
            knowledge_bases: names.iter().map(|n| n.to_string()).collect(),
        });
    }

    pub fn set_knowledge_bases_reply(&self, reply: MockReply<KnowledgeBasesResponse>) {
        self.state.lock().unwrap().knowledge_bases = reply;
    }

    pub fn set_upload_reply(&self, reply: MockReply<UploadResponse>) {
        self.state.lock().unwrap().upload = reply;
    }

    pub fn set_report_reply(&self, reply: MockReply<ReportResponse>) {
        self.state.lock().unwrap().report = reply;
    }

    pub fn set_files(&self, names: &[&str]) {
        self.state.lock().unwrap().files = Ok(FilesResponse {
            files: names.iter().map(|n| n.to_string()).collect(),
        });
    }

    pub fn set_delete_reply(&self, reply: MockReply<DeleteFileResponse>) {
        self.state.lock().unwrap().delete = reply;
    }

    pub fn set_document_reply(&self, reply: MockReply<Vec<u8>>) {
        self.state.lock().unwrap().document = reply;
    }

    /// Retrieves the recorded calls for assertion.
    pub fn get_calls(&self) -> Vec<MockCall> {
        self.calls.lock().unwrap().clone()
    }

    fn record(&self, call: MockCall) {
        self.calls.lock().unwrap().push(call);
    }
}

#[async_trait]
impl ResearchApi for MockResearchApi {
    async fn list_models(&self) -> Result<ModelsResponse, ClientError> {
        self.record(MockCall::ListModels);
        reply(&self.state.lock().unwrap().models)
    }

    async fn list_knowledge_bases(&self) -> Result<KnowledgeBasesResponse, ClientError> {
        self.record(MockCall::ListKnowledgeBases);
        reply(&self.state.lock().unwrap().knowledge_bases)
    }

    async fn upload_file(
        &self,
        file: SelectedFile,
        knowledge_base: &str,
    ) -> Result<UploadResponse, ClientError> {
        self.record(MockCall::Upload {
            file_name: file.name,
            knowledge_base: knowledge_base.to_string(),
        });
        reply(&self.state.lock().unwrap().upload)
    }

    async fn generate_report(
        &self,
        request: &ResearchRequest,
    ) -> Result<ReportResponse, ClientError> {
        self.record(MockCall::GenerateReport(request.clone()));
        reply(&self.state.lock().unwrap().report)
    }

    async fn list_files(&self) -> Result<FilesResponse, ClientError> {
        self.record(MockCall::ListFiles);
        reply(&self.state.lock().unwrap().files)
    }

    async fn delete_file(&self, filename: &str) -> Result<DeleteFileResponse, ClientError> {
        self.record(MockCall::DeleteFile(filename.to_string()));
        reply(&self.state.lock().unwrap().delete)
    }

    async fn fetch_report_document(&self, research_id: &str) -> Result<Vec<u8>, ClientError> {
        self.record(MockCall::FetchReportDocument(research_id.to_string()));
        reply(&self.state.lock().unwrap().document)
    }
}

// --- Mock HTTP service ---

pub mod service {
    //! Wiremock stand-ins for the research service's routes.

    use serde_json::{json, Value};
    use std::time::Duration;
    use wiremock::matchers::{method, path};
    use wiremock::{Mock, MockServer, ResponseTemplate};

    pub async fn mount_models(server: &MockServer, ids: &[&str]) {
        let models: Vec<Value> = ids
            .iter()
            .map(|id| json!({ "id": id, "object": "model", "owned_by": "organization_owner" }))
            .collect();
        Mock::given(method("GET"))
            .and(path("/models"))
            .respond_with(ResponseTemplate::new(200).set_body_json(json!({ "models": models })))
            .mount(server)
            .await;
    }

    pub async fn mount_knowledge_bases(server: &MockServer, names: &[&str]) {
        Mock::given(method("GET"))
            .and(path("/knowledge-bases"))
            .respond_with(
                ResponseTemplate::new(200).set_body_json(json!({ "knowledge_bases": names })),
            )
            .mount(server)
            .await;
    }

    pub async fn mount_upload(server: &MockServer, filename: &str) {
        Mock::given(method("POST"))
            .and(path("/upload/"))
            .respond_with(ResponseTemplate::new(200).set_body_json(json!({
                "filename": filename,
                "path": format!("vector_store/kb/docs/{filename}")
            })))
            .mount(server)
            .await;
    }

    pub async fn mount_files(server: &MockServer, names: &[&str]) {
        Mock::given(method("GET"))
            .and(path("/files/"))
            .respond_with(ResponseTemplate::new(200).set_body_json(json!({ "files": names })))
            .mount(server)
            .await;
    }

    /// Answers `DELETE /files/{filename}` the way the service does after removing it.
    pub async fn mount_delete_file(server: &MockServer, filename: &str) {
        Mock::given(method("DELETE"))
            .and(path(format!("/files/{filename}")))
            .respond_with(
                ResponseTemplate::new(200)
                    .set_body_json(json!({ "message": format!("File deleted: {filename}") })),
            )
            .expect(1)
            .mount(server)
            .await;
    }

    /// Answers `POST /report/` once with `report` after `delay`.
    pub async fn mount_report_once(server: &MockServer, report: &str, delay: Duration) {
        Mock::given(method("POST"))
            .and(path("/report/"))
            .respond_with(
                ResponseTemplate::new(200)
                    .set_body_json(json!({ "research_id": "task_1", "report": report }))
                    .set_delay(delay),
            )
            .up_to_n_times(1)
            .mount(server)
            .await;
    }

    pub async fn mount_status(server: &MockServer, http_method: &str, route: &str, status: u16) {
        Mock::given(method(http_method))
            .and(path(route))
            .respond_with(ResponseTemplate::new(status))
            .mount(server)
            .await;
    }
}
