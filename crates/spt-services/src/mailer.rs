//! Template mailer: fill a stored template and hand the result to a transport.

use async_trait::async_trait;
use lettre::message::header::ContentType;
use lettre::message::Mailbox;
use lettre::Message;
use spt_core::models::{FilledMessage, MessageTemplate, Replacements};
use spt_core::fill_template;
use std::sync::Arc;
use thiserror::Error;

#[derive(Debug, Error)]
pub enum SendError {
    #[error("Mail transport rejected the message: {0}")]
    TransportRejected(String),

    #[error("Invalid email address '{address}': {reason}")]
    InvalidAddress { address: String, reason: String },

    #[error("No recipients given")]
    NoRecipients,

    #[error("Failed to build message: {0}")]
    Build(String),
}

/// Fully composed message, ready for a transport
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct OutgoingEmail {
    pub from: Mailbox,
    pub to: Vec<Mailbox>,
    pub cc: Vec<Mailbox>,
    pub subject: String,
    pub body: String,
    pub is_html: bool,
}

impl OutgoingEmail {
    /// CC addresses comma-joined, for logging. The sent `Cc` header is
    /// formatted by lettre from `cc`. `None` when there are no CC addresses
    pub fn cc_list(&self) -> Option<String> {
        if self.cc.is_empty() {
            return None;
        }
        Some(
            self.cc
                .iter()
                .map(|mb| mb.to_string())
                .collect::<Vec<_>>()
                .join(","),
        )
    }

    /// Build the RFC 5322 message
    pub fn to_message(&self) -> Result<Message, SendError> {
        let mut builder = Message::builder()
            .from(self.from.clone())
            .subject(self.subject.clone());
        for mb in &self.to {
            builder = builder.to(mb.clone());
        }
        for mb in &self.cc {
            builder = builder.cc(mb.clone());
        }
        let content_type = if self.is_html {
            ContentType::TEXT_HTML
        } else {
            ContentType::TEXT_PLAIN
        };
        builder
            .header(content_type)
            .body(self.body.clone())
            .map_err(|e| SendError::Build(e.to_string()))
    }
}

/// Outbound mail transport. Returns the transport's diagnostic on failure.
#[async_trait]
pub trait MailTransport: Send + Sync {
    async fn deliver(&self, email: &OutgoingEmail) -> Result<(), String>;
}

/// Sends filled templates from a fixed `From` address, optionally tagging
/// every subject as `[tag] subject`.
#[derive(Clone)]
pub struct TemplateMailer {
    transport: Arc<dyn MailTransport>,
    from: Mailbox,
    subject_tag: Option<String>,
}

impl TemplateMailer {
    pub fn new(
        transport: Arc<dyn MailTransport>,
        from: &str,
        subject_tag: Option<String>,
    ) -> Result<Self, SendError> {
        Ok(Self {
            transport,
            from: parse_mailbox(from)?,
            subject_tag: subject_tag.filter(|t| !t.trim().is_empty()),
        })
    }

    pub fn subject_tag(&self) -> Option<&str> {
        self.subject_tag.as_deref()
    }

    pub fn compose_subject(&self, subject: &str) -> String {
        match &self.subject_tag {
            Some(tag) => format!("[{}] {}", tag, subject),
            None => subject.to_string(),
        }
    }

    /// Build the outgoing message without sending it
    pub fn compose(
        &self,
        to: &[String],
        filled: &FilledMessage,
        cc: &[String],
    ) -> Result<OutgoingEmail, SendError> {
        if to.is_empty() {
            return Err(SendError::NoRecipients);
        }
        let to = to
            .iter()
            .map(|s| parse_mailbox(s))
            .collect::<Result<Vec<_>, _>>()?;
        let cc = cc
            .iter()
            .map(|s| parse_mailbox(s))
            .collect::<Result<Vec<_>, _>>()?;

        let subject = self.compose_subject(&filled.subject);
        let body = if filled.is_html {
            wrap_html(&subject, &filled.body)
        } else {
            filled.body.clone()
        };

        Ok(OutgoingEmail {
            from: self.from.clone(),
            to,
            cc,
            subject,
            body,
            is_html: filled.is_html,
        })
    }

    /// Single delivery attempt; a transport failure is terminal for this call
    pub async fn send(
        &self,
        to: &[String],
        filled: &FilledMessage,
        cc: &[String],
    ) -> Result<(), SendError> {
        let email = self.compose(to, filled, cc)?;

        self.transport.deliver(&email).await.map_err(|e| {
            tracing::warn!(error = %e, subject = %email.subject, "Mail transport rejected message");
            SendError::TransportRejected(e)
        })?;

        tracing::info!(
            recipients = email.to.len(),
            cc = ?email.cc_list(),
            subject = %email.subject,
            "Templated email sent"
        );
        Ok(())
    }

    /// Fill `template` with `replacements`, then [`send`](Self::send)
    pub async fn send_template(
        &self,
        to: &[String],
        template: &MessageTemplate,
        replacements: &Replacements,
        cc: &[String],
    ) -> Result<(), SendError> {
        let filled = fill_template(template, replacements);
        self.send(to, &filled, cc).await
    }
}

/// Minimal HTML document around an HTML body fragment
///
/// `title` is plain text and gets escaped; `body` is inserted as markup.
pub fn wrap_html(title: &str, body: &str) -> String {
    format!(
        "<html><head><title>{}</title></head><body>{}</body></html>",
        escape_html_text(title),
        body
    )
}

fn escape_html_text(text: &str) -> String {
    text.replace('&', "&amp;")
        .replace('<', "&lt;")
        .replace('>', "&gt;")
        .replace('"', "&quot;")
}

fn parse_mailbox(address: &str) -> Result<Mailbox, SendError> {
    address
        .trim()
        .parse::<Mailbox>()
        .map_err(|e| SendError::InvalidAddress {
            address: address.to_string(),
            reason: e.to_string(),
        })
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::sync::Mutex;

    #[derive(Default)]
    struct RecordingTransport {
        sent: Mutex<Vec<OutgoingEmail>>,
        reject_with: Option<String>,
    }

    #[async_trait]
    impl MailTransport for RecordingTransport {
        async fn deliver(&self, email: &OutgoingEmail) -> Result<(), String> {
            if let Some(reason) = &self.reject_with {
                return Err(reason.clone());
            }
            self.sent.lock().unwrap().push(email.clone());
            Ok(())
        }
    }

    fn mailer(tag: Option<&str>) -> (Arc<RecordingTransport>, TemplateMailer) {
        let transport = Arc::new(RecordingTransport::default());
        let mailer = TemplateMailer::new(
            transport.clone(),
            "Search Committee <committee@example.edu>",
            tag.map(str::to_string),
        )
        .unwrap();
        (transport, mailer)
    }

    fn filled(subject: &str, body: &str, is_html: bool) -> FilledMessage {
        FilledMessage {
            subject: subject.to_string(),
            body: body.to_string(),
            is_html,
        }
    }

    #[test]
    fn test_subject_unprefixed_without_tag() {
        let (_, mailer) = mailer(None);
        assert_eq!(mailer.compose_subject("Interview"), "Interview");
    }

    #[test]
    fn test_subject_prefixed_with_tag() {
        let (_, mailer) = mailer(Some("SPT"));
        assert_eq!(mailer.compose_subject("Interview"), "[SPT] Interview");
    }

    #[test]
    fn test_blank_tag_is_ignored() {
        let (_, mailer) = mailer(Some("  "));
        assert_eq!(mailer.compose_subject("Interview"), "Interview");
    }

    #[test]
    fn test_compose_wraps_html_body() {
        let (_, mailer) = mailer(Some("SPT"));
        let email = mailer
            .compose(&["ana@example.edu".to_string()], &filled("Hi", "<p>x</p>", true), &[])
            .unwrap();
        assert_eq!(
            email.body,
            "<html><head><title>[SPT] Hi</title></head><body><p>x</p></body></html>"
        );
    }

    #[test]
    fn test_wrap_html_escapes_title_only() {
        assert_eq!(
            wrap_html("Q&A <round 2> \"final\"", "<p>a &amp; b</p>"),
            "<html><head><title>Q&amp;A &lt;round 2&gt; &quot;final&quot;</title></head><body><p>a &amp; b</p></body></html>"
        );
    }

    #[test]
    fn test_compose_plain_text_body_untouched() {
        let (_, mailer) = mailer(None);
        let email = mailer
            .compose(&["ana@example.edu".to_string()], &filled("Hi", "plain", false), &[])
            .unwrap();
        assert_eq!(email.body, "plain");
        assert!(!email.is_html);
    }

    #[test]
    fn test_cc_list_comma_joined() {
        let (_, mailer) = mailer(None);
        let email = mailer
            .compose(
                &["ana@example.edu".to_string()],
                &filled("Hi", "b", false),
                &["chair@example.edu".to_string(), "dean@example.edu".to_string()],
            )
            .unwrap();
        assert_eq!(
            email.cc_list().as_deref(),
            Some("chair@example.edu,dean@example.edu")
        );

        let none = mailer
            .compose(&["ana@example.edu".to_string()], &filled("Hi", "b", false), &[])
            .unwrap();
        assert!(none.cc_list().is_none());
    }

    #[test]
    fn test_to_message_carries_headers() {
        let (_, mailer) = mailer(Some("SPT"));
        let email = mailer
            .compose(
                &["ana@example.edu".to_string()],
                &filled("Interview", "b", false),
                &["chair@example.edu".to_string(), "dean@example.edu".to_string()],
            )
            .unwrap();
        let raw = String::from_utf8(email.to_message().unwrap().formatted()).unwrap();
        assert!(raw.contains("Subject: [SPT] Interview"));
        let cc_line = raw
            .lines()
            .find(|line| line.starts_with("Cc: "))
            .expect("Cc header present");
        assert!(cc_line.contains("chair@example.edu"));
        assert!(cc_line.contains("dean@example.edu"));
        assert_eq!(raw.lines().filter(|line| line.starts_with("Cc:")).count(), 1);
        assert!(raw.contains("committee@example.edu"));
    }

    #[test]
    fn test_compose_requires_recipient() {
        let (_, mailer) = mailer(None);
        assert!(matches!(
            mailer.compose(&[], &filled("s", "b", false), &[]),
            Err(SendError::NoRecipients)
        ));
    }

    #[test]
    fn test_compose_rejects_bad_address() {
        let (_, mailer) = mailer(None);
        let result = mailer.compose(&["not an address".to_string()], &filled("s", "b", false), &[]);
        assert!(matches!(result, Err(SendError::InvalidAddress { .. })));
    }

    #[tokio::test]
    async fn test_send_template_delivers_filled_message() {
        let (transport, mailer) = mailer(Some("SPT"));
        let template = MessageTemplate::new("invite", "Hi {{name}}", "Role: {{role}}").plain_text();
        let replacements: Replacements = [
            ("name".to_string(), Some("Ana".to_string())),
            ("role".to_string(), Some("Chair".to_string())),
        ]
        .into_iter()
        .collect();

        mailer
            .send_template(&["ana@example.edu".to_string()], &template, &replacements, &[])
            .await
            .unwrap();

        let sent = transport.sent.lock().unwrap();
        assert_eq!(sent.len(), 1);
        assert_eq!(sent[0].subject, "[SPT] Hi Ana");
        assert_eq!(sent[0].body, "Role: Chair");
    }

    #[tokio::test]
    async fn test_send_reports_transport_diagnostic() {
        let transport = Arc::new(RecordingTransport {
            reject_with: Some("554 5.7.1 Relay access denied".to_string()),
            ..Default::default()
        });
        let mailer = TemplateMailer::new(transport, "committee@example.edu", None).unwrap();

        let err = mailer
            .send(&["ana@example.edu".to_string()], &filled("s", "b", false), &[])
            .await
            .unwrap_err();
        match err {
            SendError::TransportRejected(msg) => assert!(msg.contains("Relay access denied")),
            other => panic!("Expected TransportRejected, got {:?}", other),
        }
    }
}
