//! # TUI Application State
//!
//! This module defines the state and key handling for the interactive TUI.
//! Everything the user sees lives in the shared page; this struct only adds
//! focus, the upload path being typed and the results scroll offset.

use crossterm::event::{KeyCode, KeyEvent, KeyModifiers};
use researchdesk::{Controller, Page};
use std::path::PathBuf;

/// The input that receives key presses.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum Focus {
    Task,
    Model,
    KnowledgeBase,
    DeepResearch,
    MaxIterations,
    MaxSearchResults,
    MaxContentResults,
    UploadPath,
    UploadKnowledgeBase,
}

impl Focus {
    /// The focus ring, in screen order. Panel inputs only take part while the
    /// panel is visible.
    fn ring(panel_visible: bool) -> Vec<Focus> {
        let mut ring = vec![
            Focus::Task,
            Focus::Model,
            Focus::KnowledgeBase,
            Focus::DeepResearch,
        ];
        if panel_visible {
            ring.extend([
                Focus::MaxIterations,
                Focus::MaxSearchResults,
                Focus::MaxContentResults,
            ]);
        }
        ring.extend([Focus::UploadPath, Focus::UploadKnowledgeBase]);
        ring
    }

    pub fn is_upload(self) -> bool {
        matches!(self, Focus::UploadPath | Focus::UploadKnowledgeBase)
    }

    pub fn is_text(self) -> bool {
        !matches!(self, Focus::Model | Focus::KnowledgeBase | Focus::DeepResearch)
    }
}

/// Lines moved by one PageUp/PageDown press.
pub const RESULTS_PAGE: u16 = 10;

/// The core state for the TUI application.
pub struct App {
    /// `true` while the main loop should keep running.
    pub running: bool,
    pub focus: Focus,
    /// The path typed into the upload form; read from disk on submit.
    pub upload_path: String,
    /// First line of the results area shown on screen.
    pub results_scroll: u16,
    pub controller: Controller,
}

impl App {
    pub fn new(controller: Controller) -> Self {
        Self {
            running: true,
            focus: Focus::Task,
            upload_path: String::new(),
            results_scroll: 0,
            controller,
        }
    }

    pub fn quit(&mut self) {
        self.running = false;
    }

    fn move_focus(&mut self, panel_visible: bool, forward: bool) {
        let ring = Focus::ring(panel_visible);
        let current = ring.iter().position(|f| *f == self.focus).unwrap_or(0);
        let next = if forward {
            (current + 1) % ring.len()
        } else {
            (current + ring.len() - 1) % ring.len()
        };
        self.focus = ring[next];
    }

    /// Applies one key press.
    pub async fn handle_key(&mut self, key: KeyEvent) {
        let KeyEvent {
            code, modifiers, ..
        } = key;

        if modifiers.contains(KeyModifiers::CONTROL) {
            match code {
                KeyCode::Char('c') => self.quit(),
                KeyCode::Char('r') => {
                    let controller = self.controller.clone();
                    tokio::spawn(async move { controller.load_knowledge_bases().await });
                }
                _ => {}
            }
            return;
        }

        match code {
            KeyCode::Esc => self.quit(),
            KeyCode::Tab | KeyCode::BackTab => {
                let visible = self.controller.page().read().await.deep_research.visible;
                self.move_focus(visible, code == KeyCode::Tab);
            }
            KeyCode::Enter => self.submit(),
            KeyCode::PageDown => {
                self.results_scroll = self.results_scroll.saturating_add(RESULTS_PAGE);
            }
            KeyCode::PageUp => {
                self.results_scroll = self.results_scroll.saturating_sub(RESULTS_PAGE);
            }
            KeyCode::Up | KeyCode::Down => {
                let page = self.controller.page();
                let mut page = page.write().await;
                let list = match self.focus {
                    Focus::Model => &mut page.models,
                    Focus::KnowledgeBase => &mut page.knowledge_bases,
                    _ => return,
                };
                if code == KeyCode::Down {
                    list.select_next();
                } else {
                    list.select_previous();
                }
            }
            KeyCode::Char(' ') if self.focus == Focus::DeepResearch => {
                self.controller.toggle_deep_research().await;
            }
            KeyCode::Char(c) if self.focus.is_text() => {
                self.edit_text(|text| text.push(c)).await;
            }
            KeyCode::Backspace if self.focus.is_text() => {
                self.edit_text(|text| {
                    text.pop();
                })
                .await;
            }
            _ => {}
        }
    }

    async fn edit_text(&mut self, edit: impl FnOnce(&mut String)) {
        if self.focus == Focus::UploadPath {
            edit(&mut self.upload_path);
            return;
        }
        let page = self.controller.page();
        let mut page = page.write().await;
        if let Some(text) = text_field(&mut page, self.focus) {
            edit(text);
        }
    }

    /// Starts the submission owning the focused field. The handler runs in
    /// the background so the screen keeps redrawing.
    fn submit(&mut self) {
        let controller = self.controller.clone();
        if self.focus.is_upload() {
            let file = (!self.upload_path.is_empty()).then(|| PathBuf::from(&self.upload_path));
            tokio::spawn(async move {
                controller.page().write().await.upload.file = file;
                controller.submit_upload().await;
            });
        } else {
            self.results_scroll = 0;
            tokio::spawn(async move { controller.submit_research().await });
        }
    }
}

/// The page text backing a text-entry focus, if it lives on the page.
fn text_field(page: &mut Page, focus: Focus) -> Option<&mut String> {
    match focus {
        Focus::Task => Some(&mut page.task),
        Focus::MaxIterations => Some(&mut page.deep_research.max_iterations),
        Focus::MaxSearchResults => Some(&mut page.deep_research.max_search_results_per_query),
        Focus::MaxContentResults => Some(&mut page.deep_research.max_content_results_per_query),
        Focus::UploadKnowledgeBase => Some(&mut page.upload.knowledge_base),
        Focus::Model | Focus::KnowledgeBase | Focus::DeepResearch | Focus::UploadPath => None,
    }
}
