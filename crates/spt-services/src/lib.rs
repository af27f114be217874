//! Search Progress Tracker services
//!
//! Templated outbound mail: template lookup, placeholder filling, message
//! composition and SMTP delivery.

pub mod mailer;
pub mod smtp;
pub mod template_store;

pub use mailer::{MailTransport, OutgoingEmail, SendError, TemplateMailer};
pub use smtp::SmtpMailTransport;
pub use template_store::{InMemoryTemplateStore, MessageTemplateStore, TemplateStoreError};
