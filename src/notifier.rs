//! Out-of-band alerting for failed operator runs.

use chrono::{DateTime, Utc};
use lettre::message::Mailbox;
use lettre::transport::smtp::authentication::Credentials;
use lettre::{AsyncSmtpTransport, AsyncTransport, Message, Tokio1Executor};
use log::{error, info};

use crate::config::SmtpSettings;

/// One operator run that went wrong. Produced by the orchestrator, consumed
/// by the notifier, then discarded.
#[derive(Debug, Clone)]
pub struct ScrapeFailure {
    pub company: String,
    pub error: String,
    pub at: DateTime<Utc>,
}

impl ScrapeFailure {
    pub fn new(company: &str, error: String) -> Self {
        Self {
            company: company.to_string(),
            error,
            at: Utc::now(),
        }
    }
}

/// Sends failure alerts over SMTP.
///
/// Construction validates the whole delivery configuration up front so a
/// broken mail setup surfaces at startup, not in the middle of a scrape.
/// Delivery itself is best-effort: a transport failure is logged and
/// swallowed, never raised back into the scrape flow.
pub struct FailureNotifier {
    transport: AsyncSmtpTransport<Tokio1Executor>,
    from: Mailbox,
    to: Mailbox,
}

impl FailureNotifier {
    pub fn new(settings: &SmtpSettings) -> anyhow::Result<Self> {
        if settings.smtp_host.is_empty() {
            anyhow::bail!("SMTP host is not configured");
        }
        let from: Mailbox = settings
            .smtp_from_email
            .parse()
            .map_err(|e| anyhow::anyhow!("invalid alert sender address: {e}"))?;
        let to: Mailbox = settings
            .smtp_to_email
            .parse()
            .map_err(|e| anyhow::anyhow!("invalid alert recipient address: {e}"))?;

        let builder = if settings.smtp_enable_tls {
            AsyncSmtpTransport::<Tokio1Executor>::starttls_relay(&settings.smtp_host)?
        } else {
            AsyncSmtpTransport::<Tokio1Executor>::builder_dangerous(&settings.smtp_host)
        };
        let transport = builder
            .port(settings.smtp_port)
            .credentials(Credentials::new(
                settings.smtp_username.clone(),
                settings.smtp_password.clone(),
            ))
            .build();

        Ok(Self {
            transport,
            from,
            to,
        })
    }

    pub async fn notify(&self, failure: &ScrapeFailure) {
        let subject = format!("[Scraper Alert] {} failed", failure.company);
        let body = format!(
            "The scraper '{}' encountered an error:\n\n{}\n\nTime: {}",
            failure.company, failure.error, failure.at
        );

        let message = match Message::builder()
            .from(self.from.clone())
            .to(self.to.clone())
            .subject(subject)
            .body(body)
        {
            Ok(message) => message,
            Err(e) => {
                error!("could not build alert email for {}: {e}", failure.company);
                return;
            }
        };

        match self.transport.send(message).await {
            Ok(_) => info!("alert sent for {}", failure.company),
            // The failure being reported is already in the scrape report;
            // a broken mail channel must not replace it.
            Err(e) => error!("could not send alert for {}: {e}", failure.company),
        }
    }
}
