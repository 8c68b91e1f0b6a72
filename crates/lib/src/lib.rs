//! # researchdesk
//!
//! A client for a research-report service. It keeps an in-memory page model
//! (selection lists, forms, status and result text) and drives it through the
//! service's HTTP API: listing models and knowledge bases, uploading documents
//! into a knowledge base, and requesting research reports.

pub mod api;
pub mod config;
pub mod controller;
pub mod errors;
pub mod form;
pub mod page;
pub mod types;

pub use api::{HttpResearchApi, ResearchApi};
pub use config::{get_config, ClientConfig, ConfigError};
pub use controller::{Controller, SharedPage};
pub use errors::ClientError;
pub use form::ResearchForm;
pub use page::Page;
