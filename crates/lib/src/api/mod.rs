pub mod http;

use crate::errors::ClientError;
use crate::types::{
    DeleteFileResponse, FilesResponse, KnowledgeBasesResponse, ModelsResponse, ReportResponse,
    ResearchRequest, SelectedFile, UploadResponse,
};
use async_trait::async_trait;
use dyn_clone::DynClone;
use std::fmt::Debug;

pub use http::HttpResearchApi;

/// The operations the research service exposes.
///
/// Implementations must treat any non-2xx status as `ClientError::HttpStatus`.
#[async_trait]
pub trait ResearchApi: Send + Sync + Debug + DynClone {
    /// `GET /models`
    async fn list_models(&self) -> Result<ModelsResponse, ClientError>;

    /// `GET /knowledge-bases`
    async fn list_knowledge_bases(&self) -> Result<KnowledgeBasesResponse, ClientError>;

    /// `POST /upload/` as multipart with `file` and `knowledge_base`. The
    /// contents move into the request body.
    async fn upload_file(
        &self,
        file: SelectedFile,
        knowledge_base: &str,
    ) -> Result<UploadResponse, ClientError>;

    /// `POST /report/` with a JSON body.
    async fn generate_report(
        &self,
        request: &ResearchRequest,
    ) -> Result<ReportResponse, ClientError>;

    /// `GET /files/`
    async fn list_files(&self) -> Result<FilesResponse, ClientError>;

    /// `DELETE /files/{filename}`
    async fn delete_file(&self, filename: &str) -> Result<DeleteFileResponse, ClientError>;

    /// `GET /report/{research_id}`, returning the DOCX bytes.
    async fn fetch_report_document(&self, research_id: &str) -> Result<Vec<u8>, ClientError>;
}

dyn_clone::clone_trait_object!(ResearchApi);
