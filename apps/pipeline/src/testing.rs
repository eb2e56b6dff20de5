//! Shared test doubles for the three collaborator seams.

use std::path::Path;
use std::sync::atomic::{AtomicUsize, Ordering};
use std::sync::Mutex;

use async_trait::async_trait;

use crate::llm_client::{GenerationParams, LlmError, TextGenerator};
use crate::mail::{MailError, Mailer, OutboundEmail};
use crate::render::{ArtifactRenderer, RenderError};
use crate::sender::SenderAccount;

/// Text generator that always returns the same reply and counts calls.
pub struct StaticGenerator {
    reply: String,
    calls: AtomicUsize,
}

impl StaticGenerator {
    pub fn new(reply: &str) -> Self {
        Self {
            reply: reply.to_string(),
            calls: AtomicUsize::new(0),
        }
    }

    pub fn calls(&self) -> usize {
        self.calls.load(Ordering::SeqCst)
    }
}

#[async_trait]
impl TextGenerator for StaticGenerator {
    async fn generate(
        &self,
        _params: GenerationParams,
        _system: &str,
        _user: &str,
    ) -> Result<String, LlmError> {
        self.calls.fetch_add(1, Ordering::SeqCst);
        Ok(self.reply.clone())
    }
}

/// Renderer that writes a stub PDF at the target path and counts calls.
#[derive(Default)]
pub struct CountingRenderer {
    calls: AtomicUsize,
}

impl CountingRenderer {
    pub fn calls(&self) -> usize {
        self.calls.load(Ordering::SeqCst)
    }
}

impl ArtifactRenderer for CountingRenderer {
    fn render_pdf(
        &self,
        _template: &str,
        _ctx: serde_json::Value,
        out: &Path,
    ) -> Result<(), RenderError> {
        self.calls.fetch_add(1, Ordering::SeqCst);
        std::fs::write(out, b"%PDF-1.4")?;
        Ok(())
    }
}

/// Mailer whose per-call outcomes are scripted up front. Calls beyond the
/// script succeed.
pub struct ScriptedMailer {
    failures: Mutex<Vec<bool>>,
    attempts: AtomicUsize,
}

impl ScriptedMailer {
    pub fn all_ok() -> Self {
        Self {
            failures: Mutex::new(Vec::new()),
            attempts: AtomicUsize::new(0),
        }
    }

    /// First call fails with a transport-style error, the rest succeed.
    pub fn failing_first() -> Self {
        Self {
            failures: Mutex::new(vec![true]),
            attempts: AtomicUsize::new(0),
        }
    }

    pub fn attempts(&self) -> usize {
        self.attempts.load(Ordering::SeqCst)
    }
}

#[async_trait]
impl Mailer for ScriptedMailer {
    async fn send(
        &self,
        _account: &SenderAccount,
        _email: &OutboundEmail,
    ) -> Result<(), MailError> {
        let call = self.attempts.fetch_add(1, Ordering::SeqCst);
        let fail = self
            .failures
            .lock()
            .unwrap()
            .get(call)
            .copied()
            .unwrap_or(false);
        if fail {
            Err(MailError::Build("simulated transport failure".to_string()))
        } else {
            Ok(())
        }
    }
}
