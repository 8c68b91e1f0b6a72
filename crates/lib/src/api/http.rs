use crate::{
    api::ResearchApi,
    errors::ClientError,
    types::{
        DeleteFileResponse, FilesResponse, KnowledgeBasesResponse, ModelsResponse,
        ReportResponse, ResearchRequest, SelectedFile, UploadResponse,
    },
};
use async_trait::async_trait;
use reqwest::{
    header::CONTENT_TYPE,
    multipart::{Form, Part},
    Client as ReqwestClient, Response, Url,
};
use serde::de::DeserializeOwned;
use serde::Deserialize;
use tracing::{debug, info};

/// The JSON the service returns from `GET /report/{id}` when no document exists.
#[derive(Deserialize, Debug)]
struct MessageBody {
    #[serde(default)]
    message: Option<String>,
}

/// A `ResearchApi` backed by the real HTTP service.
#[derive(Clone, Debug)]
pub struct HttpResearchApi {
    client: ReqwestClient,
    base_url: Url,
}

impl HttpResearchApi {
    /// Creates a new client rooted at `base_url`.
    ///
    /// No request timeout is configured.
    pub fn new(base_url: &str) -> Result<Self, ClientError> {
        let base_url =
            Url::parse(base_url).map_err(|e| ClientError::InvalidUrl(format!("{base_url}: {e}")))?;
        if base_url.cannot_be_a_base() {
            return Err(ClientError::InvalidUrl(base_url.to_string()));
        }
        let client = ReqwestClient::builder()
            .build()
            .map_err(ClientError::ClientBuild)?;
        Ok(Self { client, base_url })
    }

    pub fn base_url(&self) -> &Url {
        &self.base_url
    }

    /// Appends path segments to the base URL. An empty last segment yields a
    /// trailing slash, which the service's `/upload/` and `/report/` routes need.
    fn endpoint(&self, segments: &[&str]) -> Url {
        let mut url = self.base_url.clone();
        if let Ok(mut path) = url.path_segments_mut() {
            path.pop_if_empty().extend(segments);
        }
        url
    }

    async fn get_json<T: DeserializeOwned>(&self, url: Url) -> Result<T, ClientError> {
        info!("Fetching {}", url);
        let response = self
            .client
            .get(url)
            .send()
            .await
            .map_err(ClientError::Request)?;
        let response = ensure_success(response)?;
        response.json().await.map_err(ClientError::Decode)
    }
}

/// Maps any non-2xx status to `ClientError::HttpStatus`, regardless of body.
fn ensure_success(response: Response) -> Result<Response, ClientError> {
    let status = response.status();
    if !status.is_success() {
        debug!(status = status.as_u16(), url = %response.url(), "Non-success status");
        return Err(ClientError::HttpStatus(status.as_u16()));
    }
    Ok(response)
}

#[async_trait]
impl ResearchApi for HttpResearchApi {
    async fn list_models(&self) -> Result<ModelsResponse, ClientError> {
        self.get_json(self.endpoint(&["models"])).await
    }

    async fn list_knowledge_bases(&self) -> Result<KnowledgeBasesResponse, ClientError> {
        self.get_json(self.endpoint(&["knowledge-bases"])).await
    }

    async fn upload_file(
        &self,
        file: SelectedFile,
        knowledge_base: &str,
    ) -> Result<UploadResponse, ClientError> {
        let url = self.endpoint(&["upload", ""]);
        info!(
            "Uploading '{}' ({} bytes) to knowledge base '{}' via {}",
            file.name,
            file.bytes.len(),
            knowledge_base,
            url
        );

        let part = Part::bytes(file.bytes).file_name(file.name);
        let form = Form::new()
            .part("file", part)
            .text("knowledge_base", knowledge_base.to_string());

        let response = self
            .client
            .post(url)
            .multipart(form)
            .send()
            .await
            .map_err(ClientError::Request)?;
        let response = ensure_success(response)?;
        response.json().await.map_err(ClientError::Decode)
    }

    async fn generate_report(
        &self,
        request: &ResearchRequest,
    ) -> Result<ReportResponse, ClientError> {
        let url = self.endpoint(&["report", ""]);
        info!(
            report_type = ?request.report_type,
            knowledge_base = %request.knowledge_base,
            "Requesting report from {}",
            url
        );

        let response = self
            .client
            .post(url)
            .json(request)
            .send()
            .await
            .map_err(ClientError::Request)?;
        let response = ensure_success(response)?;
        response.json().await.map_err(ClientError::Decode)
    }

    async fn list_files(&self) -> Result<FilesResponse, ClientError> {
        self.get_json(self.endpoint(&["files", ""])).await
    }

    async fn delete_file(&self, filename: &str) -> Result<DeleteFileResponse, ClientError> {
        let url = self.endpoint(&["files", filename]);
        info!("Deleting {}", url);
        let response = self
            .client
            .delete(url)
            .send()
            .await
            .map_err(ClientError::Request)?;
        let response = ensure_success(response)?;
        response.json().await.map_err(ClientError::Decode)
    }

    async fn fetch_report_document(&self, research_id: &str) -> Result<Vec<u8>, ClientError> {
        let url = self.endpoint(&["report", research_id]);
        info!("Downloading report document from {}", url);
        let response = self
            .client
            .get(url)
            .send()
            .await
            .map_err(ClientError::Request)?;
        let response = ensure_success(response)?;

        // The service answers a missing document with 200 and a JSON message.
        let is_json = response
            .headers()
            .get(CONTENT_TYPE)
            .and_then(|v| v.to_str().ok())
            .is_some_and(|v| v.starts_with("application/json"));
        if is_json {
            let body: MessageBody = response.json().await.map_err(ClientError::Decode)?;
            return Err(ClientError::ReportNotFound(
                body.message.unwrap_or_else(|| research_id.to_string()),
            ));
        }

        let bytes = response.bytes().await.map_err(ClientError::Decode)?;
        Ok(bytes.to_vec())
    }
}
