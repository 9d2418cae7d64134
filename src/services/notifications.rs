use std::time::Duration;

use anyhow::Context;
use async_trait::async_trait;
use reqwest::Client;
use serde_json::json;
use thiserror::Error;
use time::OffsetDateTime;

use crate::core::config::Settings;
use crate::core::time::format_deadline;

/// Who a notification goes to.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Contact {
    pub student_id: String,
    pub name: String,
    pub email: String,
}

#[derive(Debug, Error)]
pub enum NotifyError {
    #[error("notification transport failed: {0}")]
    Transport(#[from] reqwest::Error),
    #[error("notification endpoint answered {status}")]
    Rejected { status: u16 },
    #[error("notification timed out after {0:?}")]
    TimedOut(Duration),
    #[error("notification failed: {0}")]
    Other(String),
}

/// Outbound notices of the deadline sweep. Failures are reported to the caller, which
/// logs and counts them without stopping.
#[async_trait]
pub trait NotificationSender: Send + Sync {
    async fn send_reminder(
        &self,
        contact: &Contact,
        assignment_title: &str,
        deadline: OffsetDateTime,
    ) -> Result<(), NotifyError>;

    async fn send_penalty_notice(
        &self,
        contact: &Contact,
        assignment_title: &str,
        penalty_points: i32,
    ) -> Result<(), NotifyError>;
}

pub(crate) fn reminder_subject(assignment_title: &str) -> String {
    format!("Deadline Reminder: {assignment_title}")
}

pub(crate) fn reminder_body(
    contact: &Contact,
    assignment_title: &str,
    deadline: OffsetDateTime,
) -> String {
    format!(
        "Hello {},\n\nThe deadline for \"{assignment_title}\" is {} UTC. You have not submitted \
         any work for it yet.",
        contact.name,
        format_deadline(deadline)
    )
}

pub(crate) fn penalty_subject(assignment_title: &str) -> String {
    format!("Late Submission: {assignment_title}")
}

pub(crate) fn penalty_body(
    contact: &Contact,
    assignment_title: &str,
    penalty_points: i32,
) -> String {
    format!(
        "Hello {},\n\nYour submission for \"{assignment_title}\" arrived after the deadline. \
         A late penalty of {penalty_points} points has been applied.",
        contact.name
    )
}

/// Writes notices to the log only. Used when no webhook is configured.
#[derive(Debug, Clone, Default)]
pub struct LogNotifier;

#[async_trait]
impl NotificationSender for LogNotifier {
    async fn send_reminder(
        &self,
        contact: &Contact,
        assignment_title: &str,
        deadline: OffsetDateTime,
    ) -> Result<(), NotifyError> {
        tracing::info!(
            student_id = %contact.student_id,
            email = %contact.email,
            subject = %reminder_subject(assignment_title),
            deadline = %format_deadline(deadline),
            "Deadline reminder"
        );
        Ok(())
    }

    async fn send_penalty_notice(
        &self,
        contact: &Contact,
        assignment_title: &str,
        penalty_points: i32,
    ) -> Result<(), NotifyError> {
        tracing::info!(
            student_id = %contact.student_id,
            email = %contact.email,
            subject = %penalty_subject(assignment_title),
            penalty_points,
            "Late submission notice"
        );
        Ok(())
    }
}

/// Posts each notice as JSON (`from`, `to`, `subject`, `body`) to a mail relay webhook.
#[derive(Debug, Clone)]
pub struct WebhookNotifier {
    client: Client,
    url: String,
    from: String,
}

impl WebhookNotifier {
    pub fn new(
        url: impl Into<String>,
        from: impl Into<String>,
        timeout: Duration,
    ) -> anyhow::Result<Self> {
        let client = Client::builder()
            .connect_timeout(timeout.min(Duration::from_secs(5)))
            .timeout(timeout)
            .build()
            .context("Failed to build notification HTTP client")?;

        Ok(Self { client, url: url.into(), from: from.into() })
    }

    pub(crate) fn from_settings(settings: &Settings) -> anyhow::Result<Option<Self>> {
        let notifications = settings.notifications();
        let Some(url) = notifications.webhook_url.as_deref() else {
            return Ok(None);
        };
        Self::new(
            url,
            notifications.from_address.clone(),
            Duration::from_secs(notifications.timeout_seconds),
        )
        .map(Some)
    }

    async fn post(&self, to: &str, subject: String, body: String) -> Result<(), NotifyError> {
        let payload = json!({
            "from": self.from,
            "to": to,
            "subject": subject,
            "body": body,
        });

        let response = self.client.post(&self.url).json(&payload).send().await?;
        let status = response.status();
        if !status.is_success() {
            return Err(NotifyError::Rejected { status: status.as_u16() });
        }
        Ok(())
    }
}

#[async_trait]
impl NotificationSender for WebhookNotifier {
    async fn send_reminder(
        &self,
        contact: &Contact,
        assignment_title: &str,
        deadline: OffsetDateTime,
    ) -> Result<(), NotifyError> {
        self.post(
            &contact.email,
            reminder_subject(assignment_title),
            reminder_body(contact, assignment_title, deadline),
        )
        .await
    }

    async fn send_penalty_notice(
        &self,
        contact: &Contact,
        assignment_title: &str,
        penalty_points: i32,
    ) -> Result<(), NotifyError> {
        self.post(
            &contact.email,
            penalty_subject(assignment_title),
            penalty_body(contact, assignment_title, penalty_points),
        )
        .await
    }
}
