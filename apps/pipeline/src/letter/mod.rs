//! Letter Builder — drafts and renders one cover-letter PDF per pending
//! application.
//!
//! Flow per pending row: resolve the profile and the offer (an unresolved
//! reference is a data-integrity problem: logged, row skipped) → compute
//! the deterministic artifact path → skip if present and not forced → ask
//! the LLM for the body → render the letter template → convert. Purely
//! artifact-producing; the store is never mutated here.

pub mod prompts;

use std::path::{Path, PathBuf};

use chrono::Local;
use serde_json::json;
use tracing::{info, warn};

use crate::errors::AppError;
use crate::letter::prompts::{LETTER_PARAMS, LETTER_PROMPT_TEMPLATE, LETTER_SYSTEM};
use crate::llm_client::TextGenerator;
use crate::render::ArtifactRenderer;
use crate::store::records::{Application, JobOffer, Profile};
use crate::store::{CsvStore, TABLE_APPLICATIONS, TABLE_JOBOFFERS, TABLE_PROFILES};

pub const LETTER_TEMPLATE: &str = "letter.html";

#[derive(Debug, Default, Clone, Copy)]
pub struct LetterReport {
    pub written: usize,
    pub skipped: usize,
}

/// Deterministic letter artifact path for a (candidate, job) pair.
pub fn letter_artifact_path(letter_dir: &Path, profile: &Profile, job_id: &str) -> PathBuf {
    letter_dir.join(format!("Letter_{}_{}.pdf", profile.artifact_stem(), job_id))
}

/// Generate every missing cover-letter PDF.
pub async fn build_letters(
    store: &CsvStore,
    llm: &dyn TextGenerator,
    renderer: &dyn ArtifactRenderer,
    letter_dir: &Path,
    force: bool,
) -> Result<LetterReport, AppError> {
    let profiles: Vec<Profile> = store.load(TABLE_PROFILES)?;
    let offers: Vec<JobOffer> = store.load(TABLE_JOBOFFERS)?;
    let applications: Vec<Application> = store.load(TABLE_APPLICATIONS)?;

    let pending: Vec<&Application> = applications.iter().filter(|a| a.is_pending()).collect();
    if pending.is_empty() {
        info!("No cover letters to generate");
        return Ok(LetterReport::default());
    }

    // Every letter generated in one run carries the same date.
    let today = Local::now().format("%d/%m/%Y").to_string();
    let mut report = LetterReport::default();

    for app in pending {
        let Some(profile) = profiles.iter().find(|p| p.profile_id == app.profile_id) else {
            warn!(
                profile_id = %app.profile_id,
                job_id = %app.job_id,
                "Application references an unknown profile, skipping"
            );
            report.skipped += 1;
            continue;
        };
        let Some(offer) = offers.iter().find(|o| o.job_id == app.job_id) else {
            warn!(
                profile_id = %app.profile_id,
                job_id = %app.job_id,
                "Application references an unknown job offer, skipping"
            );
            report.skipped += 1;
            continue;
        };

        let out = letter_artifact_path(letter_dir, profile, &app.job_id);
        if out.exists() && !force {
            info!("Letter already present, skipping: {}", out.display());
            report.skipped += 1;
            continue;
        }

        let body = draft_letter(llm, profile, offer).await?;
        let ctx = json!({
            "profile": profile,
            "body": body,
            "offer": offer,
            "today": today,
        });
        renderer.render_pdf(LETTER_TEMPLATE, ctx, &out)?;
        info!("Letter written: {}", out.display());
        report.written += 1;
    }

    info!(
        "Letter build done: {} written, {} skipped",
        report.written, report.skipped
    );
    Ok(report)
}

async fn draft_letter(
    llm: &dyn TextGenerator,
    profile: &Profile,
    offer: &JobOffer,
) -> Result<String, AppError> {
    let profile_json = serde_json::to_string_pretty(profile).map_err(anyhow::Error::from)?;
    let prompt = LETTER_PROMPT_TEMPLATE
        .replace("{profile_json}", &profile_json)
        .replace("{job_description}", &offer.description);
    Ok(llm.generate(LETTER_PARAMS, LETTER_SYSTEM, &prompt).await?)
}
