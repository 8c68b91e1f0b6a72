use serde::{Deserialize, Serialize};
use std::collections::HashMap;
use std::path::Path;

/// The only report source this client ever requests.
pub const REPORT_SOURCE_LOCAL: &str = "local";

// --- Listing responses ---

/// One entry of the `GET /models` listing.
#[derive(Clone, Debug, Deserialize, PartialEq, Eq)]
pub struct ModelDescriptor {
    pub id: String,
}

/// The body of `GET /models`.
///
/// `models` is optional because the service answers with a bare error object
/// when its upstream listing fails.
#[derive(Clone, Debug, Default, Deserialize)]
pub struct ModelsResponse {
    #[serde(default)]
    pub models: Option<Vec<ModelDescriptor>>,
}

/// The body of `GET /knowledge-bases`.
#[derive(Clone, Debug, Default, Deserialize)]
pub struct KnowledgeBasesResponse {
    #[serde(default)]
    pub knowledge_bases: Vec<String>,
}

/// The body of `GET /files/`.
#[derive(Clone, Debug, Default, Deserialize)]
pub struct FilesResponse {
    #[serde(default)]
    pub files: Vec<String>,
}

/// The body of `DELETE /files/{filename}`.
#[derive(Clone, Debug, Default, Deserialize)]
pub struct DeleteFileResponse {
    #[serde(default)]
    pub message: Option<String>,
}

// --- Upload ---

/// A file picked for upload: its display name and raw contents.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct SelectedFile {
    pub name: String,
    pub bytes: Vec<u8>,
}

impl SelectedFile {
    pub fn new(name: impl Into<String>, bytes: Vec<u8>) -> Self {
        Self {
            name: name.into(),
            bytes,
        }
    }

    /// Reads a file from disk, naming it after the final path component.
    pub async fn from_path(path: impl AsRef<Path>) -> std::io::Result<Self> {
        let path = path.as_ref();
        let bytes = tokio::fs::read(path).await?;
        Ok(Self {
            name: Self::name_of(path),
            bytes,
        })
    }

    /// The name a file at `path` is uploaded under.
    pub fn name_of(path: &Path) -> String {
        path.file_name()
            .map(|n| n.to_string_lossy().into_owned())
            .unwrap_or_else(|| path.display().to_string())
    }
}

/// The body of a successful `POST /upload/`.
#[derive(Clone, Debug, Deserialize)]
pub struct UploadResponse {
    pub filename: String,
}

// --- Research ---

/// Which report the service should produce.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ReportType {
    #[default]
    ResearchReport,
    DeepResearch,
}

/// The writing tone requested from the service. Serialized by variant name;
/// this client only ever asks for an objective report.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Serialize, Deserialize)]
pub enum Tone {
    #[default]
    Objective,
}

/// Extra knobs sent along with a `deep_research` report.
///
/// A `None` field is an input that did not parse as an integer; it is sent as
/// `null` rather than rejected.
#[derive(Clone, Debug, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct DeepResearchConfig {
    pub max_iterations: Option<i64>,
    pub max_search_results_per_query: Option<i64>,
    pub max_content_results_per_query: Option<i64>,
}

/// The JSON body of `POST /report/`.
///
/// Every field is always present on the wire; optional values serialize as
/// `null`.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct ResearchRequest {
    pub task: String,
    pub report_type: ReportType,
    pub report_source: String,
    pub tone: Tone,
    pub headers: Option<HashMap<String, String>>,
    pub repo_name: String,
    pub branch_name: String,
    pub fast_llm: String,
    pub smart_llm: String,
    pub knowledge_base: String,
    pub deep_research_config: Option<DeepResearchConfig>,
    pub generate_in_background: bool,
}

/// Bookkeeping the service attaches to a finished report.
#[derive(Clone, Debug, Default, PartialEq, Deserialize)]
pub struct ResearchInformation {
    #[serde(default)]
    pub source_urls: Vec<String>,
    #[serde(default)]
    pub research_costs: Option<f64>,
}

/// The body of a successful `POST /report/`.
#[derive(Clone, Debug, Default, Deserialize)]
pub struct ReportResponse {
    #[serde(default)]
    pub report: String,
    #[serde(default)]
    pub research_id: Option<String>,
    #[serde(default)]
    pub research_information: Option<ResearchInformation>,
}
