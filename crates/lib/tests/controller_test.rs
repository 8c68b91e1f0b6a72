//! # Controller Tests
//!
//! Drives every page handler against `MockResearchApi` and checks what ends up
//! on the page and which requests were made.

use researchdesk::config::ClientConfig;
use researchdesk::page::{MODELS_ERROR_LABEL, MODEL_SENTINEL_LABEL, NO_MODELS_LABEL};
use researchdesk::types::{
    DeepResearchConfig, KnowledgeBasesResponse, ModelsResponse, ReportResponse, ReportType,
    ResearchInformation, UploadResponse,
};
use researchdesk::Controller;
use researchdesk_test_utils::{setup_tracing, MockCall, MockResearchApi};
use std::path::PathBuf;
use std::sync::Arc;
use tempfile::{tempdir, TempDir};

fn controller(api: &MockResearchApi) -> Controller {
    setup_tracing();
    Controller::new(Arc::new(api.clone()), &ClientConfig::default())
}

/// Writes `contents` to `name` inside a fresh temporary directory.
fn document(name: &str, contents: &[u8]) -> (TempDir, PathBuf) {
    let dir = tempdir().unwrap();
    let path = dir.path().join(name);
    std::fs::write(&path, contents).unwrap();
    (dir, path)
}

// --- Model list loader ---

#[tokio::test]
async fn test_models_sentinel_plus_one_option_per_model() {
    let api = MockResearchApi::new();
    api.set_models(&["gpt-4", "llama-3", "mistral"]);
    let controller = controller(&api);

    controller.load_models().await;

    let page = controller.snapshot().await;
    let options = page.models.options();
    assert_eq!(options.len(), 4);
    assert_eq!(options[0].label, MODEL_SENTINEL_LABEL);
    assert_eq!(options[0].value, "");
    let values: Vec<&str> = options[1..].iter().map(|o| o.value.as_str()).collect();
    assert_eq!(values, vec!["gpt-4", "llama-3", "mistral"]);
    assert!(options[1..].iter().all(|o| o.label == o.value && !o.disabled));
}

#[tokio::test]
async fn test_models_empty_and_missing_show_no_models() {
    for reply in [
        ModelsResponse {
            models: Some(Vec::new()),
        },
        ModelsResponse { models: None },
    ] {
        let api = MockResearchApi::new();
        api.set_models_reply(Ok(reply));
        let controller = controller(&api);

        controller.load_models().await;

        let page = controller.snapshot().await;
        assert_eq!(page.models.len(), 1);
        assert_eq!(page.models.options()[0].label, NO_MODELS_LABEL);
        assert!(page.models.options()[0].disabled);
    }
}

#[tokio::test]
async fn test_models_failure_shows_error_entry() {
    let api = MockResearchApi::new();
    api.set_models_reply(Err(500));
    let controller = controller(&api);

    controller.load_models().await;

    let page = controller.snapshot().await;
    assert_eq!(page.models.len(), 1);
    assert_eq!(page.models.options()[0].label, MODELS_ERROR_LABEL);
    assert!(page.models.options()[0].disabled);
    assert_ne!(MODELS_ERROR_LABEL, NO_MODELS_LABEL);
}

// --- Knowledge-base list loader ---

#[tokio::test]
async fn test_knowledge_bases_replace_without_accumulating() {
    let api = MockResearchApi::new();
    let controller = controller(&api);

    api.set_knowledge_bases(&["kb1", "kb2", "kb3"]);
    controller.load_knowledge_bases().await;
    assert_eq!(controller.snapshot().await.knowledge_bases.len(), 3);

    api.set_knowledge_bases(&["only"]);
    controller.load_knowledge_bases().await;
    let page = controller.snapshot().await;
    assert_eq!(page.knowledge_bases.len(), 1);
    assert_eq!(page.knowledge_bases.options()[0].value, "only");
    assert_eq!(page.knowledge_bases.value(), "only");
}

#[tokio::test]
async fn test_knowledge_bases_failure_keeps_previous_options() {
    let api = MockResearchApi::new();
    let controller = controller(&api);
    api.set_knowledge_bases(&["kb1", "kb2"]);
    controller.load_knowledge_bases().await;

    api.set_knowledge_bases_reply(Err(502));
    controller.load_knowledge_bases().await;

    let values: Vec<String> = controller
        .snapshot()
        .await
        .knowledge_bases
        .options()
        .iter()
        .map(|o| o.value.clone())
        .collect();
    assert_eq!(values, vec!["kb1", "kb2"]);
}

#[tokio::test]
async fn test_knowledge_bases_missing_field_renders_empty() {
    let api = MockResearchApi::new();
    let controller = controller(&api);
    api.set_knowledge_bases(&["kb1"]);
    controller.load_knowledge_bases().await;

    api.set_knowledge_bases_reply(Ok(KnowledgeBasesResponse::default()));
    controller.load_knowledge_bases().await;

    assert!(controller.snapshot().await.knowledge_bases.is_empty());
}

#[tokio::test]
async fn test_initialize_loads_both_lists_independently() {
    let api = MockResearchApi::new();
    api.set_models_reply(Err(500));
    api.set_knowledge_bases(&["kb1"]);
    let controller = controller(&api);

    controller.initialize().await;

    let page = controller.snapshot().await;
    assert_eq!(page.models.options()[0].label, MODELS_ERROR_LABEL);
    assert_eq!(page.knowledge_bases.value(), "kb1");
    let calls = api.get_calls();
    assert!(calls.contains(&MockCall::ListModels));
    assert!(calls.contains(&MockCall::ListKnowledgeBases));
}

// --- Deep-research toggle ---

#[tokio::test]
async fn test_deep_research_toggle_mirrors_panel() {
    let api = MockResearchApi::new();
    let controller = controller(&api);

    controller.set_deep_research(true).await;
    assert!(controller.snapshot().await.deep_research.visible);
    controller.set_deep_research(true).await;
    assert!(controller.snapshot().await.deep_research.visible);

    controller.set_deep_research(false).await;
    let page = controller.snapshot().await;
    assert!(!page.deep_research.visible);
    assert!(!page.deep_research.checked);

    controller.toggle_deep_research().await;
    assert!(controller.snapshot().await.deep_research.visible);
    assert!(api.get_calls().is_empty());
}

// --- Upload submission ---

#[tokio::test]
async fn test_upload_without_file_makes_no_request() {
    let api = MockResearchApi::new();
    let controller = controller(&api);
    controller.page().write().await.upload.knowledge_base = "kb1".to_string();

    controller.submit_upload().await;

    assert_eq!(
        controller.snapshot().await.upload.status,
        "Please select a file and a knowledge base."
    );
    assert!(api.get_calls().is_empty());
}

#[tokio::test]
async fn test_upload_without_knowledge_base_makes_no_request() {
    let api = MockResearchApi::new();
    let controller = controller(&api);
    let (_dir, path) = document("report.pdf", b"data");
    controller.page().write().await.upload.file = Some(path);

    controller.submit_upload().await;

    assert_eq!(
        controller.snapshot().await.upload.status,
        "Please select a file and a knowledge base."
    );
    assert!(api.get_calls().is_empty());
}

#[tokio::test]
async fn test_upload_success_shows_server_filename() {
    let api = MockResearchApi::new();
    api.set_upload_reply(Ok(UploadResponse {
        filename: "report.pdf".to_string(),
    }));
    let controller = controller(&api);
    let (_dir, path) = document("report.pdf", b"data");
    {
        let page = controller.page();
        let mut page = page.write().await;
        page.upload.file = Some(path);
        page.upload.knowledge_base = "kb1".to_string();
    }

    controller.submit_upload().await;

    assert_eq!(
        controller.snapshot().await.upload.status,
        "File uploaded successfully: report.pdf"
    );
    assert_eq!(
        api.get_calls(),
        vec![MockCall::Upload {
            file_name: "report.pdf".to_string(),
            knowledge_base: "kb1".to_string(),
        }]
    );
}

#[tokio::test]
async fn test_upload_failure_shows_error_text() {
    let api = MockResearchApi::new();
    api.set_upload_reply(Err(413));
    let controller = controller(&api);
    let (_dir, path) = document("big.pdf", &[0; 16]);
    {
        let page = controller.page();
        let mut page = page.write().await;
        page.upload.file = Some(path);
        page.upload.knowledge_base = "kb1".to_string();
    }

    controller.submit_upload().await;

    assert_eq!(
        controller.snapshot().await.upload.status,
        "HTTP error! status: 413"
    );
}

#[tokio::test]
async fn test_upload_unreadable_file_makes_no_request() {
    let api = MockResearchApi::new();
    let controller = controller(&api);
    let dir = tempdir().unwrap();
    {
        let page = controller.page();
        let mut page = page.write().await;
        page.upload.file = Some(dir.path().join("missing.pdf"));
        page.upload.knowledge_base = "kb1".to_string();
    }

    controller.submit_upload().await;

    assert!(controller
        .snapshot()
        .await
        .upload
        .status
        .starts_with("Could not read "));
    assert!(api.get_calls().is_empty());
}

#[tokio::test]
async fn test_upload_keeps_only_the_path_on_the_page() {
    let api = MockResearchApi::new();
    api.set_upload_reply(Ok(UploadResponse {
        filename: "large.pdf".to_string(),
    }));
    let controller = controller(&api);
    let (_dir, path) = document("large.pdf", &vec![7; 1 << 20]);
    {
        let page = controller.page();
        let mut page = page.write().await;
        page.upload.file = Some(path.clone());
        page.upload.knowledge_base = "kb1".to_string();
    }

    controller.submit_upload().await;

    let page = controller.snapshot().await;
    assert_eq!(page.upload.status, "File uploaded successfully: large.pdf");
    assert_eq!(page.upload.file, Some(path));
}

// --- Research submission ---

async fn fill_research_form(controller: &Controller, api: &MockResearchApi) {
    api.set_models(&["gpt-4"]);
    api.set_knowledge_bases(&["kb1"]);
    controller.initialize().await;
    let page = controller.page();
    let mut page = page.write().await;
    page.task = "Summarize X".to_string();
    page.models.select_value("gpt-4");
}

fn sent_request(api: &MockResearchApi) -> researchdesk::types::ResearchRequest {
    api.get_calls()
        .into_iter()
        .find_map(|call| match call {
            MockCall::GenerateReport(request) => Some(request),
            _ => None,
        })
        .expect("a report request should have been sent")
}

#[tokio::test]
async fn test_research_standard_report() {
    let api = MockResearchApi::new();
    api.set_report_reply(Ok(ReportResponse {
        report: "# Findings\n<script>kept as text</script>".to_string(),
        research_id: Some("task_1_summarize".to_string()),
        ..Default::default()
    }));
    let controller = controller(&api);
    fill_research_form(&controller, &api).await;

    controller.submit_research().await;

    let request = sent_request(&api);
    assert_eq!(request.task, "Summarize X");
    assert_eq!(request.report_type, ReportType::ResearchReport);
    assert_eq!(request.deep_research_config, None);
    assert_eq!(request.fast_llm, "openai:gpt-4");
    assert_eq!(request.smart_llm, "openai:gpt-4");
    assert_eq!(request.knowledge_base, "kb1");
    assert!(!request.generate_in_background);

    let page = controller.snapshot().await;
    assert_eq!(page.results, "# Findings\n<script>kept as text</script>");
    assert_eq!(page.last_research_id.as_deref(), Some("task_1_summarize"));
}

#[tokio::test]
async fn test_research_deep_report_config() {
    let api = MockResearchApi::new();
    api.set_report_reply(Ok(ReportResponse::default()));
    let controller = controller(&api);
    fill_research_form(&controller, &api).await;
    controller.set_deep_research(true).await;
    {
        let page = controller.page();
        let mut page = page.write().await;
        page.deep_research.max_iterations = "3".to_string();
        page.deep_research.max_search_results_per_query = "5".to_string();
        page.deep_research.max_content_results_per_query = "2".to_string();
    }

    controller.submit_research().await;

    let request = sent_request(&api);
    assert_eq!(request.report_type, ReportType::DeepResearch);
    assert_eq!(
        request.deep_research_config,
        Some(DeepResearchConfig {
            max_iterations: Some(3),
            max_search_results_per_query: Some(5),
            max_content_results_per_query: Some(2),
        })
    );
}

#[tokio::test]
async fn test_research_failure_message() {
    let api = MockResearchApi::new();
    api.set_report_reply(Err(500));
    let controller = controller(&api);
    fill_research_form(&controller, &api).await;

    controller.submit_research().await;

    assert_eq!(
        controller.snapshot().await.results,
        "An error occurred: HTTP error! status: 500"
    );
}

#[tokio::test]
async fn test_research_failure_clears_previous_report_details() {
    let api = MockResearchApi::new();
    api.set_report_reply(Ok(ReportResponse {
        report: "Old findings".to_string(),
        research_id: Some("task_old".to_string()),
        research_information: Some(ResearchInformation {
            source_urls: vec!["https://example.com/a".to_string()],
            research_costs: Some(0.02),
        }),
    }));
    let controller = controller(&api);
    fill_research_form(&controller, &api).await;
    controller.submit_research().await;
    assert_eq!(
        controller.snapshot().await.last_research_id.as_deref(),
        Some("task_old")
    );

    api.set_report_reply(Err(500));
    controller.submit_research().await;

    let page = controller.snapshot().await;
    assert_eq!(page.results, "An error occurred: HTTP error! status: 500");
    assert_eq!(page.last_research_id, None);
    assert_eq!(page.last_research_information, None);
}

#[tokio::test]
async fn test_research_report_without_id_clears_previous_id() {
    let api = MockResearchApi::new();
    api.set_report_reply(Ok(ReportResponse {
        report: "First".to_string(),
        research_id: Some("task_old".to_string()),
        ..Default::default()
    }));
    let controller = controller(&api);
    fill_research_form(&controller, &api).await;
    controller.submit_research().await;

    api.set_report_reply(Ok(ReportResponse {
        report: "Second".to_string(),
        ..Default::default()
    }));
    controller.submit_research().await;

    let page = controller.snapshot().await;
    assert_eq!(page.results, "Second");
    assert_eq!(page.last_research_id, None);
}

#[tokio::test]
async fn test_research_uses_configured_provider() {
    let api = MockResearchApi::new();
    api.set_report_reply(Ok(ReportResponse::default()));
    setup_tracing();
    let config = ClientConfig {
        llm_provider: "ollama".to_string(),
        ..Default::default()
    };
    let controller = Controller::new(Arc::new(api.clone()), &config);
    fill_research_form(&controller, &api).await;

    controller.submit_research().await;

    assert_eq!(sent_request(&api).fast_llm, "ollama:gpt-4");
}
