//! # Page Model
//!
//! The in-memory view-model every front-end renders. Handlers in
//! [`crate::controller`] only ever write user-visible text here.

use crate::form::ResearchForm;
use crate::types::ResearchInformation;
use std::path::PathBuf;

pub const MODEL_SENTINEL_LABEL: &str = "Select a model";
pub const NO_MODELS_LABEL: &str = "No models available";
pub const MODELS_ERROR_LABEL: &str = "Error loading models";

pub const UPLOAD_MISSING_INPUT_MESSAGE: &str = "Please select a file and a knowledge base.";
pub const RESEARCH_IN_PROGRESS_MESSAGE: &str = "Research in progress...";

/// One entry of a selection list.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct SelectOption {
    pub value: String,
    pub label: String,
    pub disabled: bool,
}

impl SelectOption {
    /// An option whose value and label are both `id`.
    pub fn new(id: impl Into<String>) -> Self {
        let id = id.into();
        Self {
            value: id.clone(),
            label: id,
            disabled: false,
        }
    }

    pub fn with_label(value: impl Into<String>, label: impl Into<String>) -> Self {
        Self {
            value: value.into(),
            label: label.into(),
            disabled: false,
        }
    }

    /// A non-selectable entry that only carries a message.
    pub fn placeholder(label: impl Into<String>) -> Self {
        Self {
            value: String::new(),
            label: label.into(),
            disabled: true,
        }
    }
}

/// An ordered list of options with at most one selected entry.
#[derive(Clone, Debug, Default, PartialEq, Eq)]
pub struct SelectList {
    options: Vec<SelectOption>,
    selected: Option<usize>,
}

impl SelectList {
    pub fn options(&self) -> &[SelectOption] {
        &self.options
    }

    pub fn len(&self) -> usize {
        self.options.len()
    }

    pub fn is_empty(&self) -> bool {
        self.options.is_empty()
    }

    pub fn selected_index(&self) -> Option<usize> {
        self.selected
    }

    /// Discards every existing option and installs `options`, selecting the
    /// first enabled one.
    pub fn replace_options(&mut self, options: Vec<SelectOption>) {
        self.selected = options.iter().position(|o| !o.disabled);
        self.options = options;
    }

    /// The selected option's value, or `""` when nothing is selected.
    pub fn value(&self) -> &str {
        self.selected
            .and_then(|i| self.options.get(i))
            .map(|o| o.value.as_str())
            .unwrap_or("")
    }

    /// Selects the first enabled option carrying `value`. Returns whether one
    /// was found.
    pub fn select_value(&mut self, value: &str) -> bool {
        match self
            .options
            .iter()
            .position(|o| !o.disabled && o.value == value)
        {
            Some(index) => {
                self.selected = Some(index);
                true
            }
            None => false,
        }
    }

    /// Moves the selection to the next enabled option, if any.
    pub fn select_next(&mut self) {
        let start = self.selected.map_or(0, |i| i + 1);
        if let Some(offset) = self.options[start.min(self.options.len())..]
            .iter()
            .position(|o| !o.disabled)
        {
            self.selected = Some(start + offset);
        }
    }

    /// Moves the selection to the previous enabled option, if any.
    pub fn select_previous(&mut self) {
        let Some(current) = self.selected else {
            return;
        };
        if let Some(index) = self.options[..current].iter().rposition(|o| !o.disabled) {
            self.selected = Some(index);
        }
    }
}

/// The deep-research checkbox and the parameter panel it controls.
///
/// Inputs hold raw text; nothing is validated until submission.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct DeepResearchPanel {
    pub checked: bool,
    pub visible: bool,
    pub max_iterations: String,
    pub max_search_results_per_query: String,
    pub max_content_results_per_query: String,
}

impl Default for DeepResearchPanel {
    fn default() -> Self {
        Self {
            checked: false,
            visible: false,
            max_iterations: "2".to_string(),
            max_search_results_per_query: "4".to_string(),
            max_content_results_per_query: "4".to_string(),
        }
    }
}

/// The upload form and its status line.
///
/// Only the path of the selected file is kept; its contents are read when the
/// form is submitted.
#[derive(Clone, Debug, Default, PartialEq, Eq)]
pub struct UploadForm {
    pub file: Option<PathBuf>,
    pub knowledge_base: String,
    pub status: String,
}

/// Everything a front-end shows.
#[derive(Clone, Debug, Default, PartialEq)]
pub struct Page {
    pub models: SelectList,
    pub knowledge_bases: SelectList,
    pub task: String,
    pub deep_research: DeepResearchPanel,
    pub upload: UploadForm,
    pub results: String,
    /// Set by the most recent report only; cleared when a new one starts.
    pub last_research_id: Option<String>,
    pub last_research_information: Option<ResearchInformation>,
}

impl Page {
    /// Snapshot of the research form as currently filled in.
    pub fn research_form(&self) -> ResearchForm {
        ResearchForm {
            task: self.task.clone(),
            model: self.models.value().to_string(),
            knowledge_base: self.knowledge_bases.value().to_string(),
            deep_research: self.deep_research.checked,
            max_iterations: self.deep_research.max_iterations.clone(),
            max_search_results_per_query: self.deep_research.max_search_results_per_query.clone(),
            max_content_results_per_query: self
                .deep_research
                .max_content_results_per_query
                .clone(),
            ..Default::default()
        }
    }
}
