//! Document rendering: named HTML template + data context → PDF artifact.
//!
//! Rendering is two steps: minijinja fills the template, then an external
//! wkhtmltopdf-compatible converter turns the scratch HTML file into the
//! PDF at the requested path. The converter binary location comes from
//! configuration; its stderr is captured into the error on failure.

use std::io::Write;
use std::path::{Path, PathBuf};
use std::process::Command;

use minijinja::{path_loader, Environment};
use thiserror::Error;
use tracing::debug;

#[derive(Debug, Error)]
pub enum RenderError {
    #[error("Template error: {0}")]
    Template(#[from] minijinja::Error),

    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),

    #[error("PDF converter exited with {status}: {stderr}")]
    Converter { status: i32, stderr: String },
}

/// Seam for the rendering collaborator so the builders can be tested with a
/// fake that just drops a file at the target path.
pub trait ArtifactRenderer: Send + Sync {
    fn render_pdf(
        &self,
        template: &str,
        ctx: serde_json::Value,
        out: &Path,
    ) -> Result<(), RenderError>;
}

pub struct DocumentRenderer {
    env: Environment<'static>,
    converter: PathBuf,
}

impl DocumentRenderer {
    pub fn new(templates_dir: &Path, converter: impl Into<PathBuf>) -> Self {
        let mut env = Environment::new();
        env.set_loader(path_loader(templates_dir));
        Self {
            env,
            converter: converter.into(),
        }
    }
}

impl ArtifactRenderer for DocumentRenderer {
    fn render_pdf(
        &self,
        template: &str,
        ctx: serde_json::Value,
        out: &Path,
    ) -> Result<(), RenderError> {
        let html = self.env.get_template(template)?.render(ctx)?;

        // The converter reads from a file, so the markup transits through a
        // scratch .html that lives only for the length of the conversion.
        let mut scratch = tempfile::Builder::new()
            .prefix("applyflow-")
            .suffix(".html")
            .tempfile()?;
        scratch.write_all(html.as_bytes())?;
        scratch.flush()?;

        debug!(template, out = %out.display(), "Converting HTML to PDF");

        let output = Command::new(&self.converter)
            .arg(scratch.path())
            .arg(out)
            .output()?;

        if !output.status.success() {
            return Err(RenderError::Converter {
                status: output.status.code().unwrap_or(-1),
                stderr: String::from_utf8_lossy(&output.stderr).into_owned(),
            });
        }
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn test_template_renders_context_fields() {
        let dir = tempfile::tempdir().unwrap();
        std::fs::write(
            dir.path().join("greeting.html"),
            "<p>{{ given_name }} {{ surname }}</p>",
        )
        .unwrap();

        let renderer = DocumentRenderer::new(dir.path(), "/bin/true");
        let html = renderer
            .env
            .get_template("greeting.html")
            .unwrap()
            .render(json!({"given_name": "Marie", "surname": "Dupont"}))
            .unwrap();
        assert_eq!(html, "<p>Marie Dupont</p>");
    }

    #[test]
    fn test_unknown_template_is_a_template_error() {
        let dir = tempfile::tempdir().unwrap();
        let renderer = DocumentRenderer::new(dir.path(), "/bin/true");
        let err = renderer
            .render_pdf("missing.html", json!({}), Path::new("/tmp/out.pdf"))
            .unwrap_err();
        assert!(matches!(err, RenderError::Template(_)));
    }

    #[test]
    fn test_failing_converter_surfaces_exit_status() {
        let dir = tempfile::tempdir().unwrap();
        std::fs::write(dir.path().join("doc.html"), "<p>x</p>").unwrap();

        let renderer = DocumentRenderer::new(dir.path(), "/bin/false");
        let out = dir.path().join("out.pdf");
        let err = renderer
            .render_pdf("doc.html", json!({}), &out)
            .unwrap_err();
        match err {
            RenderError::Converter { status, .. } => assert_ne!(status, 0),
            other => panic!("expected converter error, got {other:?}"),
        }
    }
}
