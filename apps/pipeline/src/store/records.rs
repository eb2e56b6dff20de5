//! Typed rows for the store tables, with the workflow-status helpers the
//! builders and the dispatcher share.

use serde::{Deserialize, Deserializer, Serialize};

use super::{clean_cell, parse_count};

/// Deserialise a free-text cell, normalising blank-like values to "".
fn de_clean<'de, D: Deserializer<'de>>(de: D) -> Result<String, D::Error> {
    let raw = Option::<String>::deserialize(de)?.unwrap_or_default();
    Ok(clean_cell(&raw))
}

/// Deserialise a counter cell leniently (blank / non-numeric → 0).
fn de_count<'de, D: Deserializer<'de>>(de: D) -> Result<u32, D::Error> {
    let raw = Option::<String>::deserialize(de)?.unwrap_or_default();
    Ok(parse_count(&raw))
}

/// A candidate's résumé data. Created externally; `summary` may be drafted
/// in memory by the résumé builder when blank, and is never written back.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct Profile {
    #[serde(default, deserialize_with = "de_clean")]
    pub profile_id: String,
    #[serde(default, deserialize_with = "de_clean")]
    pub surname: String,
    #[serde(default, deserialize_with = "de_clean")]
    pub given_name: String,
    #[serde(default, deserialize_with = "de_clean")]
    pub email: String,
    #[serde(default, deserialize_with = "de_clean")]
    pub phone: String,
    #[serde(default, deserialize_with = "de_clean")]
    pub city: String,
    #[serde(default, deserialize_with = "de_clean")]
    pub education: String,
    #[serde(default, deserialize_with = "de_clean")]
    pub skills: String,
    #[serde(default, deserialize_with = "de_clean")]
    pub experience: String,
    #[serde(default, deserialize_with = "de_clean")]
    pub summary: String,
}

impl Profile {
    pub fn full_name(&self) -> String {
        format!("{} {}", self.given_name, self.surname)
    }

    /// Stable stem shared by both artifact names: `SURNAME_Given`.
    pub fn artifact_stem(&self) -> String {
        format!("{}_{}", self.surname.to_uppercase(), self.given_name)
    }
}

/// A job posting. Immutable during a run.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct JobOffer {
    #[serde(default, deserialize_with = "de_clean")]
    pub job_id: String,
    #[serde(default, deserialize_with = "de_clean")]
    pub title: String,
    #[serde(default, deserialize_with = "de_clean")]
    pub description: String,
    #[serde(default, deserialize_with = "de_clean")]
    pub recruiter_email: String,
}

/// The link between a profile and a job offer, carrying workflow status.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct Application {
    #[serde(default, deserialize_with = "de_clean")]
    pub profile_id: String,
    #[serde(default, deserialize_with = "de_clean")]
    pub job_id: String,
    #[serde(default, deserialize_with = "de_clean")]
    pub generate_letter: String,
    #[serde(default, deserialize_with = "de_clean")]
    pub email_sent: String,
    #[serde(default, deserialize_with = "de_clean")]
    pub sent_at: String,
}

impl Application {
    /// Truthiness of the generate-letter flag.
    pub fn letter_requested(&self) -> bool {
        matches!(
            self.generate_letter.trim().to_ascii_lowercase().as_str(),
            "y" | "yes" | "true" | "1"
        )
    }

    pub fn is_sent(&self) -> bool {
        !self.email_sent.trim().is_empty()
    }

    /// Eligible for letter generation and dispatch: the letter flag is
    /// truthy and nothing has been sent yet. Terminal once dispatched.
    pub fn is_pending(&self) -> bool {
        self.letter_requested() && !self.is_sent()
    }

    pub fn mark_sent(&mut self, timestamp: String) {
        self.email_sent = "YES".to_string();
        self.sent_at = timestamp;
    }
}

/// One row of the optional senders table. Counters are mutated in memory by
/// the sender selector and persisted once at the end of dispatch.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct SenderRow {
    #[serde(default, deserialize_with = "de_clean")]
    pub email: String,
    #[serde(default, deserialize_with = "de_clean")]
    pub password: String,
    #[serde(default, deserialize_with = "de_count")]
    pub daily_limit: u32,
    #[serde(default, deserialize_with = "de_count")]
    pub sent_today: u32,
    #[serde(default, deserialize_with = "de_clean")]
    pub smtp_host: String,
}

impl SenderRow {
    pub fn under_quota(&self) -> bool {
        self.sent_today < self.daily_limit
    }
}
