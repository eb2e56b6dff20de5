use std::path::PathBuf;

use anyhow::{Context, Result};

/// Default location of the HTML→PDF converter binary.
const DEFAULT_PDF_CONVERTER: &str = "/usr/local/bin/wkhtmltopdf";

/// Application configuration loaded from environment variables.
///
/// Built once at startup and passed by reference to every component; nothing
/// reads the process environment after this point.
#[derive(Debug, Clone)]
pub struct Config {
    /// Directory holding the record-store tables (one CSV per table).
    pub data_dir: PathBuf,
    /// Directory holding the HTML document templates.
    pub templates_dir: PathBuf,
    /// Output directory for résumé PDFs.
    pub cv_dir: PathBuf,
    /// Output directory for cover-letter PDFs.
    pub letter_dir: PathBuf,
    /// Path to the HTML→PDF converter binary.
    pub pdf_converter: PathBuf,
    pub anthropic_api_key: String,
    /// Single-account SMTP fallback, used when the store has no senders table.
    pub smtp_email: Option<String>,
    pub smtp_password: Option<String>,
    pub smtp_host: Option<String>,
    pub rust_log: String,
}

impl Config {
    pub fn from_env() -> Result<Self> {
        dotenvy::dotenv().ok(); // load .env if present; ignore if missing

        let root = PathBuf::from(std::env::var("APP_ROOT").unwrap_or_else(|_| ".".to_string()));
        let data_dir = root.join("data");
        let templates_dir = root.join("templates");
        let cv_dir = data_dir.join("cv");
        let letter_dir = data_dir.join("letters");

        // Output folders must exist before the first artifact is written.
        std::fs::create_dir_all(&cv_dir)
            .with_context(|| format!("Failed to create {}", cv_dir.display()))?;
        std::fs::create_dir_all(&letter_dir)
            .with_context(|| format!("Failed to create {}", letter_dir.display()))?;

        Ok(Config {
            data_dir,
            templates_dir,
            cv_dir,
            letter_dir,
            pdf_converter: PathBuf::from(
                std::env::var("PDF_CONVERTER")
                    .unwrap_or_else(|_| DEFAULT_PDF_CONVERTER.to_string()),
            ),
            anthropic_api_key: require_env("ANTHROPIC_API_KEY")?,
            smtp_email: std::env::var("SMTP_EMAIL").ok(),
            smtp_password: std::env::var("SMTP_PASSWORD").ok(),
            smtp_host: std::env::var("SMTP_HOST").ok(),
            rust_log: std::env::var("RUST_LOG").unwrap_or_else(|_| "info".to_string()),
        })
    }
}

fn require_env(key: &str) -> Result<String> {
    std::env::var(key).with_context(|| format!("Required environment variable '{key}' is not set"))
}
