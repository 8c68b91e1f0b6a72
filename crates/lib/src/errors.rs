use thiserror::Error;

/// Errors raised while talking to the research service.
///
/// `Display` output is what ends up on screen, so the `HttpStatus` message is
/// kept byte-for-byte stable.
#[derive(Error, Debug)]
pub enum ClientError {
    #[error("Failed to build Reqwest client: {0}")]
    ClientBuild(reqwest::Error),
    #[error("Invalid base URL: {0}")]
    InvalidUrl(String),
    #[error("Failed to send request: {0}")]
    Request(reqwest::Error),
    #[error("HTTP error! status: {0}")]
    HttpStatus(u16),
    #[error("Failed to decode response: {0}")]
    Decode(reqwest::Error),
    #[error("Report not found: {0}")]
    ReportNotFound(String),
}
