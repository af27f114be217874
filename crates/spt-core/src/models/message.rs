use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;
use utoipa::ToSchema;

/// Stored message template with `{{token}}` placeholders in subject and body
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize, ToSchema)]
pub struct MessageTemplate {
    pub name: String,
    pub subject: String,
    pub body: String,
    #[serde(default = "default_is_html")]
    pub is_html: bool,
}

fn default_is_html() -> bool {
    true
}

impl MessageTemplate {
    pub fn new(name: impl Into<String>, subject: impl Into<String>, body: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            subject: subject.into(),
            body: body.into(),
            is_html: true,
        }
    }

    pub fn plain_text(mut self) -> Self {
        self.is_html = false;
        self
    }
}

/// Token name → substitution value. `None` expands to the empty string.
///
/// A `BTreeMap` keeps the replacement order fixed for a given mapping.
pub type Replacements = BTreeMap<String, Option<String>>;

/// Template after placeholder substitution, ready to send
#[derive(Debug, Clone, PartialEq, Eq, Serialize, ToSchema)]
pub struct FilledMessage {
    pub subject: String,
    pub body: String,
    pub is_html: bool,
}
