//! Résumé Builder — batch-generates one résumé PDF per profile.
//!
//! Flow per profile: draft the professional summary when the sheet left it
//! blank → compute the deterministic artifact path → skip if the PDF
//! already exists (unless forced) → render the résumé template → convert.
//! The drafted summary lives in memory only; the store is never mutated.

pub mod prompts;

use std::path::{Path, PathBuf};

use tracing::info;

use crate::errors::AppError;
use crate::llm_client::TextGenerator;
use crate::render::ArtifactRenderer;
use crate::resume::prompts::{SUMMARY_PARAMS, SUMMARY_PROMPT_TEMPLATE, SUMMARY_SYSTEM};
use crate::store::records::Profile;
use crate::store::{CsvStore, TABLE_PROFILES};

pub const RESUME_TEMPLATE: &str = "resume.html";

/// Outcome counts for one builder run.
#[derive(Debug, Default, Clone, Copy)]
pub struct BuildReport {
    pub written: usize,
    pub skipped: usize,
}

/// Deterministic résumé artifact path for a candidate.
pub fn resume_artifact_path(cv_dir: &Path, profile: &Profile) -> PathBuf {
    cv_dir.join(format!("CV_{}.pdf", profile.artifact_stem()))
}

/// Generate every missing résumé PDF.
pub async fn build_resumes(
    store: &CsvStore,
    llm: &dyn TextGenerator,
    renderer: &dyn ArtifactRenderer,
    cv_dir: &Path,
    force: bool,
) -> Result<BuildReport, AppError> {
    let mut profiles: Vec<Profile> = store.load(TABLE_PROFILES)?;
    let mut report = BuildReport::default();

    for profile in &mut profiles {
        if profile.summary.trim().is_empty() {
            profile.summary = draft_summary(llm, profile).await?;
        }

        let out = resume_artifact_path(cv_dir, profile);
        if out.exists() && !force {
            info!("Resume already present, skipping: {}", out.display());
            report.skipped += 1;
            continue;
        }

        let ctx = serde_json::to_value(&*profile).map_err(anyhow::Error::from)?;
        renderer.render_pdf(RESUME_TEMPLATE, ctx, &out)?;
        info!("Resume written: {}", out.display());
        report.written += 1;
    }

    info!(
        "Resume build done: {} written, {} skipped",
        report.written, report.skipped
    );
    Ok(report)
}

async fn draft_summary(llm: &dyn TextGenerator, profile: &Profile) -> Result<String, AppError> {
    let profile_json = serde_json::to_string_pretty(profile).map_err(anyhow::Error::from)?;
    let prompt = SUMMARY_PROMPT_TEMPLATE.replace("{profile_json}", &profile_json);
    Ok(llm.generate(SUMMARY_PARAMS, SUMMARY_SYSTEM, &prompt).await?)
}
