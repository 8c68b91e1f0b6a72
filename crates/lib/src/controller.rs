//! # Page Controller
//!
//! The handlers behind every user action. Each one follows the same shape:
//! synchronous checks against the page, one request, then exactly one success
//! or failure branch that writes plain text back into its own page region.
//!
//! The page lock is never held across a request, so overlapping submissions
//! are not serialized: whichever response settles last owns the region.

use crate::api::ResearchApi;
use crate::config::ClientConfig;
use crate::types::SelectedFile;
use crate::page::{
    Page, SelectOption, MODELS_ERROR_LABEL, MODEL_SENTINEL_LABEL, NO_MODELS_LABEL,
    RESEARCH_IN_PROGRESS_MESSAGE, UPLOAD_MISSING_INPUT_MESSAGE,
};
use std::sync::Arc;
use tokio::sync::RwLock;
use tracing::{error, info};

/// The page shared between a front-end and in-flight handlers.
pub type SharedPage = Arc<RwLock<Page>>;

/// The context object every handler runs against.
#[derive(Clone, Debug)]
pub struct Controller {
    api: Arc<dyn ResearchApi>,
    page: SharedPage,
    llm_provider: String,
}

impl Controller {
    /// Creates a controller over a fresh, empty page.
    pub fn new(api: Arc<dyn ResearchApi>, config: &ClientConfig) -> Self {
        Self::with_page(api, Arc::new(RwLock::new(Page::default())), config)
    }

    pub fn with_page(api: Arc<dyn ResearchApi>, page: SharedPage, config: &ClientConfig) -> Self {
        Self {
            api,
            page,
            llm_provider: config.llm_provider.clone(),
        }
    }

    pub fn page(&self) -> SharedPage {
        self.page.clone()
    }

    pub fn api(&self) -> &dyn ResearchApi {
        self.api.as_ref()
    }

    /// A copy of the page as it is right now.
    pub async fn snapshot(&self) -> Page {
        self.page.read().await.clone()
    }

    /// Loads both selection lists. A failure in one never affects the other.
    pub async fn initialize(&self) {
        tokio::join!(self.load_models(), self.load_knowledge_bases());
    }

    /// Replaces the knowledge-base options with the service's list.
    ///
    /// On failure the previous options are kept.
    pub async fn load_knowledge_bases(&self) {
        match self.api.list_knowledge_bases().await {
            Ok(response) => {
                info!(
                    "Loaded {} knowledge bases.",
                    response.knowledge_bases.len()
                );
                let options = response
                    .knowledge_bases
                    .into_iter()
                    .map(SelectOption::new)
                    .collect();
                self.page.write().await.knowledge_bases.replace_options(options);
            }
            Err(e) => {
                error!("Error loading knowledge bases: {e}");
            }
        }
    }

    /// Fills the model selector, or leaves a single disabled entry saying why
    /// it could not.
    pub async fn load_models(&self) {
        let options = match self.api.list_models().await {
            Ok(response) => match response.models {
                Some(models) if !models.is_empty() => {
                    info!("Loaded {} models.", models.len());
                    std::iter::once(SelectOption::with_label("", MODEL_SENTINEL_LABEL))
                        .chain(models.into_iter().map(|m| SelectOption::new(m.id)))
                        .collect()
                }
                _ => {
                    info!("Model listing returned no models.");
                    vec![SelectOption::placeholder(NO_MODELS_LABEL)]
                }
            },
            Err(e) => {
                error!("Error loading models: {e}");
                vec![SelectOption::placeholder(MODELS_ERROR_LABEL)]
            }
        };
        self.page.write().await.models.replace_options(options);
    }

    /// Shows the parameter panel exactly when `checked` is set.
    pub async fn set_deep_research(&self, checked: bool) {
        let mut page = self.page.write().await;
        page.deep_research.checked = checked;
        page.deep_research.visible = checked;
    }

    pub async fn toggle_deep_research(&self) {
        let checked = !self.page.read().await.deep_research.checked;
        self.set_deep_research(checked).await;
    }

    /// Uploads the selected file into the named knowledge base.
    ///
    /// Without both a file and a knowledge base no request is made. The file
    /// is read from disk here and its contents never enter the page.
    pub async fn submit_upload(&self) {
        let (path, knowledge_base) = {
            let mut page = self.page.write().await;
            let pending = match &page.upload.file {
                Some(path) if !page.upload.knowledge_base.is_empty() => {
                    Some((path.clone(), page.upload.knowledge_base.clone()))
                }
                _ => None,
            };
            let Some((path, knowledge_base)) = pending else {
                page.upload.status = UPLOAD_MISSING_INPUT_MESSAGE.to_string();
                return;
            };
            page.upload.status = format!("Uploading {}...", SelectedFile::name_of(&path));
            (path, knowledge_base)
        };

        let file = match SelectedFile::from_path(&path).await {
            Ok(file) => file,
            Err(e) => {
                error!("Could not read '{}': {e}", path.display());
                self.page.write().await.upload.status =
                    format!("Could not read {}: {e}", path.display());
                return;
            }
        };

        let name = file.name.clone();
        let status = match self.api.upload_file(file, &knowledge_base).await {
            Ok(response) => {
                info!(
                    "Uploaded '{}' into knowledge base '{}'.",
                    response.filename, knowledge_base
                );
                format!("File uploaded successfully: {}", response.filename)
            }
            Err(e) => {
                error!("Error uploading '{name}': {e}");
                e.to_string()
            }
        };
        self.page.write().await.upload.status = status;
    }

    /// Requests a report for the task on the page and shows it verbatim.
    pub async fn submit_research(&self) {
        let request = {
            let mut page = self.page.write().await;
            page.results = RESEARCH_IN_PROGRESS_MESSAGE.to_string();
            page.last_research_id = None;
            page.last_research_information = None;
            page.research_form().to_request(&self.llm_provider)
        };

        match self.api.generate_report(&request).await {
            Ok(response) => {
                info!(
                    research_id = response.research_id.as_deref().unwrap_or(""),
                    "Report received ({} chars).",
                    response.report.len()
                );
                let mut page = self.page.write().await;
                page.results = response.report;
                page.last_research_id = response.research_id;
                page.last_research_information = response.research_information;
            }
            Err(e) => {
                error!("Error generating report: {e}");
                let mut page = self.page.write().await;
                page.results = format!("An error occurred: {e}");
                page.last_research_id = None;
                page.last_research_information = None;
            }
        }
    }
}
