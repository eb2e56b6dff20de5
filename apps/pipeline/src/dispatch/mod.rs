//! Dispatcher — e-mails each pending application and marks it sent.
//!
//! For every pending row: resolve the profile and the offer, locate both
//! PDF artifacts (either missing → the row is skipped and stays pending),
//! compose the message, pick a sender account and submit. Success stamps
//! the sent flag and timestamp; a transport failure aborts the remaining
//! loop unless forced. Whatever happens, the applications table — and the
//! sender counters when rotation is in use — are persisted before this
//! function returns.

use std::path::Path;

use chrono::Local;
use tracing::{error, info, warn};

use crate::errors::AppError;
use crate::letter::letter_artifact_path;
use crate::mail::{Attachment, Mailer, OutboundEmail};
use crate::resume::resume_artifact_path;
use crate::sender::SenderPool;
use crate::store::records::{Application, JobOffer, Profile};
use crate::store::{CsvStore, TABLE_APPLICATIONS, TABLE_JOBOFFERS, TABLE_PROFILES, TABLE_SENDERS};

/// Format of the sent-at stamp written back to the applications table.
pub const SENT_AT_FORMAT: &str = "%d/%m/%Y %H:%M:%S";

#[derive(Debug, Default, Clone, Copy)]
pub struct DispatchReport {
    pub sent: usize,
    pub skipped: usize,
    /// True when a transport failure stopped the loop early.
    pub aborted: bool,
}

/// Send every pending application, then persist the status columns.
pub async fn dispatch(
    store: &CsvStore,
    pool: &mut SenderPool,
    mailer: &dyn Mailer,
    cv_dir: &Path,
    letter_dir: &Path,
    force: bool,
) -> Result<DispatchReport, AppError> {
    let profiles: Vec<Profile> = store.load(TABLE_PROFILES)?;
    let offers: Vec<JobOffer> = store.load(TABLE_JOBOFFERS)?;
    let mut applications: Vec<Application> = store.load(TABLE_APPLICATIONS)?;

    let mut report = DispatchReport::default();
    let outcome = run_loop(
        &profiles,
        &offers,
        &mut applications,
        pool,
        mailer,
        cv_dir,
        letter_dir,
        force,
        &mut report,
    )
    .await;

    // Persist status and counters whatever the loop outcome: rows sent in
    // this run must never be re-sent by a later one.
    store.save(TABLE_APPLICATIONS, &applications)?;
    if let Some(rows) = pool.rows() {
        store.save(TABLE_SENDERS, rows)?;
    }

    outcome?;
    info!(
        "Dispatch done: {} sent, {} skipped{}",
        report.sent,
        report.skipped,
        if report.aborted { ", aborted early" } else { "" }
    );
    Ok(report)
}

#[allow(clippy::too_many_arguments)]
async fn run_loop(
    profiles: &[Profile],
    offers: &[JobOffer],
    applications: &mut [Application],
    pool: &mut SenderPool,
    mailer: &dyn Mailer,
    cv_dir: &Path,
    letter_dir: &Path,
    force: bool,
    report: &mut DispatchReport,
) -> Result<(), AppError> {
    if !applications.iter().any(|a| a.is_pending()) {
        info!("No e-mails to send");
        return Ok(());
    }

    for app in applications.iter_mut() {
        if !app.is_pending() {
            continue;
        }

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

        let cv_pdf = resume_artifact_path(cv_dir, profile);
        let letter_pdf = letter_artifact_path(letter_dir, profile, &app.job_id);
        if !cv_pdf.exists() || !letter_pdf.exists() {
            warn!(
                profile_id = %app.profile_id,
                job_id = %app.job_id,
                "Missing PDF artifact, skipping"
            );
            report.skipped += 1;
            continue;
        }

        let email = match compose(profile, offer, &cv_pdf, &letter_pdf) {
            Ok(email) => email,
            Err(e) => {
                warn!(
                    profile_id = %app.profile_id,
                    job_id = %app.job_id,
                    "Could not assemble message: {e}, skipping"
                );
                report.skipped += 1;
                continue;
            }
        };

        let account = pool.pick()?;
        match mailer.send(&account, &email).await {
            Ok(()) => {
                info!(
                    "{} → {} ({})",
                    profile.full_name(),
                    offer.recruiter_email,
                    account.smtp_host
                );
                app.mark_sent(Local::now().format(SENT_AT_FORMAT).to_string());
                report.sent += 1;
            }
            Err(e) => {
                error!(
                    profile_id = %app.profile_id,
                    job_id = %app.job_id,
                    "Send failed: {e}"
                );
                if !force {
                    report.aborted = true;
                    break;
                }
            }
        }
    }
    Ok(())
}

fn compose(
    profile: &Profile,
    offer: &JobOffer,
    cv_pdf: &Path,
    letter_pdf: &Path,
) -> Result<OutboundEmail, crate::mail::MailError> {
    let html_body = format!(
        "<p>Hello,</p>\
         <p>Please find attached my r\u{e9}sum\u{e9} and cover letter for the \
         <strong>{}</strong> position.</p>\
         <p>Kind regards,<br>{}</p>",
        offer.title,
        profile.full_name()
    );

    Ok(OutboundEmail {
        to: offer.recruiter_email.clone(),
        subject: format!("Application \u{2013} {}", profile.full_name()),
        text_body: "Please view this message in HTML.".to_string(),
        html_body,
        attachments: vec![Attachment::from_file(cv_pdf)?, Attachment::from_file(letter_pdf)?],
    })
}
