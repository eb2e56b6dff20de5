//! Sender Selector — picks the outbound account for each message.
//!
//! Two modes. When the store has a `senders` table, selection rotates over
//! the accounts still under their daily quota, always taking the smallest
//! sent-today counter (ties keep table order) and incrementing it in
//! memory; the updated counters are persisted once at the end of dispatch.
//! Without the table, a single fixed account comes from configuration.

use tracing::info;

use crate::config::Config;
use crate::errors::AppError;
use crate::store::records::SenderRow;
use crate::store::{CsvStore, StoreError, TABLE_SENDERS};

/// Everything the SMTP client needs for one submission.
#[derive(Debug, Clone)]
pub struct SenderAccount {
    pub email: String,
    pub password: String,
    pub smtp_host: String,
}

/// Infer a mail-submission host from the sender address.
///
/// Unknown suffixes fall back to the Gmail-compatible host, which covers
/// most Google-Workspace domains. A heuristic, not a guarantee; an explicit
/// host override always wins.
pub fn infer_smtp_host(address: &str) -> &'static str {
    let addr = address.to_ascii_lowercase();
    if addr.ends_with("@gmail.com") {
        return "smtp.gmail.com";
    }
    if addr.ends_with("@outlook.com") || addr.ends_with("@hotmail.com") || addr.ends_with("@live.com")
    {
        return "smtp-mail.outlook.com";
    }
    "smtp.gmail.com"
}

pub enum SenderPool {
    /// Quota-tracked rotation over the senders table.
    Rotating(Vec<SenderRow>),
    /// Single statically configured account; no quota.
    Fixed(SenderAccount),
}

impl SenderPool {
    /// Build the pool from the store, falling back to the configured
    /// single account when the senders table is absent.
    pub fn load(store: &CsvStore, config: &Config) -> Result<Self, AppError> {
        match store.load::<SenderRow>(TABLE_SENDERS) {
            Ok(rows) => {
                info!("Sender rotation over {} account(s)", rows.len());
                Ok(SenderPool::Rotating(rows))
            }
            Err(StoreError::MissingTable { .. }) => {
                let email = config.smtp_email.clone().ok_or_else(|| {
                    AppError::Config(
                        "No senders table and SMTP_EMAIL is not set".to_string(),
                    )
                })?;
                let password = config.smtp_password.clone().ok_or_else(|| {
                    AppError::Config(
                        "No senders table and SMTP_PASSWORD is not set".to_string(),
                    )
                })?;
                let smtp_host = config
                    .smtp_host
                    .clone()
                    .unwrap_or_else(|| infer_smtp_host(&email).to_string());
                info!(%email, %smtp_host, "Single-account mode (no senders table)");
                Ok(SenderPool::Fixed(SenderAccount {
                    email,
                    password,
                    smtp_host,
                }))
            }
            Err(e) => Err(e.into()),
        }
    }

    /// Select the account for the next message.
    ///
    /// Rotating mode increments the winner's counter as part of selection,
    /// so consecutive calls spread the load across accounts.
    pub fn pick(&mut self) -> Result<SenderAccount, AppError> {
        match self {
            SenderPool::Fixed(account) => Ok(account.clone()),
            SenderPool::Rotating(rows) => {
                let mut best: Option<usize> = None;
                for (i, row) in rows.iter().enumerate() {
                    if !row.under_quota() {
                        continue;
                    }
                    // Strict comparison keeps table order on ties.
                    match best {
                        Some(b) if rows[b].sent_today <= row.sent_today => {}
                        _ => best = Some(i),
                    }
                }
                let i = best.ok_or(AppError::QuotaExhausted)?;
                rows[i].sent_today += 1;

                let row = &rows[i];
                let smtp_host = if row.smtp_host.is_empty() {
                    infer_smtp_host(&row.email).to_string()
                } else {
                    row.smtp_host.clone()
                };
                Ok(SenderAccount {
                    email: row.email.clone(),
                    password: row.password.clone(),
                    smtp_host,
                })
            }
        }
    }

    /// Updated counter rows to persist, when rotation is in use.
    pub fn rows(&self) -> Option<&[SenderRow]> {
        match self {
            SenderPool::Rotating(rows) => Some(rows),
            SenderPool::Fixed(_) => None,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn row(email: &str, limit: u32, sent: u32) -> SenderRow {
        SenderRow {
            email: email.into(),
            password: "pw".into(),
            daily_limit: limit,
            sent_today: sent,
            smtp_host: String::new(),
        }
    }

    #[test]
    fn test_host_inference() {
        assert_eq!(infer_smtp_host("a@gmail.com"), "smtp.gmail.com");
        assert_eq!(infer_smtp_host("a@OUTLOOK.com"), "smtp-mail.outlook.com");
        assert_eq!(infer_smtp_host("a@hotmail.com"), "smtp-mail.outlook.com");
        assert_eq!(infer_smtp_host("a@live.com"), "smtp-mail.outlook.com");
        // Documented fallback for unknown domains.
        assert_eq!(infer_smtp_host("a@my-company.fr"), "smtp.gmail.com");
    }

    #[test]
    fn test_rotation_prefers_lowest_counter() {
        let mut pool = SenderPool::Rotating(vec![
            row("first@gmail.com", 5, 0),
            row("second@gmail.com", 5, 3),
        ]);

        // First account wins at counts 0, 1, 2.
        for _ in 0..3 {
            let account = pool.pick().unwrap();
            assert_eq!(account.email, "first@gmail.com");
        }
        // Tie at 3 sends: table order keeps the first account.
        assert_eq!(pool.pick().unwrap().email, "first@gmail.com");
        // Now 4 vs 3: the second account takes over.
        assert_eq!(pool.pick().unwrap().email, "second@gmail.com");

        let rows = pool.rows().unwrap();
        assert_eq!(rows[0].sent_today, 4);
        assert_eq!(rows[1].sent_today, 4);
    }

    #[test]
    fn test_quota_exhaustion() {
        let mut pool = SenderPool::Rotating(vec![row("only@gmail.com", 2, 2)]);
        let err = pool.pick().unwrap_err();
        assert!(matches!(err, AppError::QuotaExhausted));
    }

    #[test]
    fn test_accounts_at_limit_are_excluded() {
        let mut pool = SenderPool::Rotating(vec![
            row("full@gmail.com", 1, 1),
            row("free@gmail.com", 5, 4),
        ]);
        assert_eq!(pool.pick().unwrap().email, "free@gmail.com");
        assert!(matches!(pool.pick().unwrap_err(), AppError::QuotaExhausted));
    }

    #[test]
    fn test_explicit_host_override_wins() {
        let mut rows = vec![row("a@custom.io", 5, 0)];
        rows[0].smtp_host = "mail.custom.io".into();
        let mut pool = SenderPool::Rotating(rows);
        assert_eq!(pool.pick().unwrap().smtp_host, "mail.custom.io");
    }

    #[test]
    fn test_fixed_account_ignores_quota() {
        let account = SenderAccount {
            email: "solo@gmail.com".into(),
            password: "pw".into(),
            smtp_host: "smtp.gmail.com".into(),
        };
        let mut pool = SenderPool::Fixed(account);
        for _ in 0..10 {
            assert_eq!(pool.pick().unwrap().email, "solo@gmail.com");
        }
        assert!(pool.rows().is_none());
    }
}
