#![allow(dead_code)]

use thiserror::Error;

use crate::llm_client::LlmError;
use crate::mail::MailError;
use crate::render::RenderError;
use crate::store::StoreError;

/// Application-level error type.
///
/// The taxonomy mirrors how the pipeline reacts: configuration and store
/// errors are fatal for the run, data-integrity problems are logged and the
/// offending row skipped at the call site, quota exhaustion halts dispatch,
/// and transport failures are fail-fast unless the force flag suppresses
/// the abort.
#[derive(Debug, Error)]
pub enum AppError {
    #[error("Configuration error: {0}")]
    Config(String),

    #[error("Store error: {0}")]
    Store(#[from] StoreError),

    #[error("Data integrity: {0}")]
    DataIntegrity(String),

    #[error("LLM error: {0}")]
    Llm(#[from] LlmError),

    #[error("Render error: {0}")]
    Render(#[from] RenderError),

    #[error("All sender accounts have reached their daily quota")]
    QuotaExhausted,

    #[error("Mail transport error: {0}")]
    Transport(#[from] MailError),

    #[error("Internal error: {0}")]
    Internal(#[from] anyhow::Error),
}
