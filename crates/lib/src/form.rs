//! # Research Form
//!
//! Turns the raw text a user typed into the research form into the exact
//! `ResearchRequest` the service expects.

use crate::types::{
    DeepResearchConfig, ReportType, ResearchRequest, Tone, REPORT_SOURCE_LOCAL,
};

/// Raw, unvalidated values of the research form.
#[derive(Clone, Debug, Default)]
pub struct ResearchForm {
    pub task: String,
    pub model: String,
    pub knowledge_base: String,
    pub tone: Tone,
    pub deep_research: bool,
    pub max_iterations: String,
    pub max_search_results_per_query: String,
    pub max_content_results_per_query: String,
}

impl ResearchForm {
    /// Builds the request body.
    ///
    /// `llm_provider` prefixes the model id for both `fast_llm` and `smart_llm`.
    /// The deep-research inputs are only read when the checkbox is set.
    pub fn to_request(&self, llm_provider: &str) -> ResearchRequest {
        let llm = format!("{llm_provider}:{}", self.model);
        let (report_type, deep_research_config) = if self.deep_research {
            (
                ReportType::DeepResearch,
                Some(DeepResearchConfig {
                    max_iterations: parse_int_prefix(&self.max_iterations),
                    max_search_results_per_query: parse_int_prefix(
                        &self.max_search_results_per_query,
                    ),
                    max_content_results_per_query: parse_int_prefix(
                        &self.max_content_results_per_query,
                    ),
                }),
            )
        } else {
            (ReportType::ResearchReport, None)
        };

        ResearchRequest {
            task: self.task.clone(),
            report_type,
            report_source: REPORT_SOURCE_LOCAL.to_string(),
            tone: self.tone,
            headers: None,
            repo_name: String::new(),
            branch_name: String::new(),
            fast_llm: llm.clone(),
            smart_llm: llm,
            knowledge_base: self.knowledge_base.clone(),
            deep_research_config,
            generate_in_background: false,
        }
    }
}

/// Parses a base-10 integer from the start of `input`.
///
/// Leading whitespace and a single sign are accepted, then as many digits as
/// follow; anything after them is ignored (`"3abc"` is 3). Returns `None` when
/// no digit is found or the value overflows.
pub fn parse_int_prefix(input: &str) -> Option<i64> {
    let trimmed = input.trim_start();
    let (negative, rest) = match trimmed.as_bytes().first() {
        Some(b'-') => (true, &trimmed[1..]),
        Some(b'+') => (false, &trimmed[1..]),
        _ => (false, trimmed),
    };
    let digits_len = rest.bytes().take_while(u8::is_ascii_digit).count();
    if digits_len == 0 {
        return None;
    }
    let magnitude: i64 = rest[..digits_len].parse().ok()?;
    Some(if negative { -magnitude } else { magnitude })
}
