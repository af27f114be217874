use spt_core::models::MessageTemplate;
use std::collections::BTreeMap;
use std::path::Path;
use thiserror::Error;

#[derive(Debug, Error)]
pub enum TemplateStoreError {
    #[error("Failed to read templates from {path}: {source}")]
    Io {
        path: String,
        #[source]
        source: std::io::Error,
    },

    #[error("Invalid templates file: {0}")]
    Parse(#[from] serde_json::Error),

    #[error("Duplicate template name: {0}")]
    Duplicate(String),
}

/// Read-only source of message templates
pub trait MessageTemplateStore: Send + Sync {
    fn get(&self, name: &str) -> Option<MessageTemplate>;

    fn names(&self) -> Vec<String>;
}

#[derive(Debug, Clone, Default)]
pub struct InMemoryTemplateStore {
    templates: BTreeMap<String, MessageTemplate>,
}

impl InMemoryTemplateStore {
    pub fn from_templates(
        templates: impl IntoIterator<Item = MessageTemplate>,
    ) -> Result<Self, TemplateStoreError> {
        let mut map = BTreeMap::new();
        for template in templates {
            let name = template.name.clone();
            if map.insert(name.clone(), template).is_some() {
                return Err(TemplateStoreError::Duplicate(name));
            }
        }
        Ok(Self { templates: map })
    }

    /// Load a JSON array of templates
    pub async fn load_json(path: impl AsRef<Path>) -> Result<Self, TemplateStoreError> {
        let path = path.as_ref();
        let raw = tokio::fs::read(path)
            .await
            .map_err(|source| TemplateStoreError::Io {
                path: path.display().to_string(),
                source,
            })?;
        let templates: Vec<MessageTemplate> = serde_json::from_slice(&raw)?;
        let store = Self::from_templates(templates)?;
        tracing::info!(
            path = %path.display(),
            count = store.templates.len(),
            "Message templates loaded"
        );
        Ok(store)
    }
}

impl MessageTemplateStore for InMemoryTemplateStore {
    fn get(&self, name: &str) -> Option<MessageTemplate> {
        self.templates.get(name).cloned()
    }

    fn names(&self) -> Vec<String> {
        self.templates.keys().cloned().collect()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_rejects_duplicates() {
        let result = InMemoryTemplateStore::from_templates([
            MessageTemplate::new("invite", "a", "b"),
            MessageTemplate::new("invite", "c", "d"),
        ]);
        assert!(matches!(result, Err(TemplateStoreError::Duplicate(n)) if n == "invite"));
    }

    #[test]
    fn test_names_are_sorted() {
        let store = InMemoryTemplateStore::from_templates([
            MessageTemplate::new("reject", "a", "b"),
            MessageTemplate::new("invite", "c", "d"),
        ])
        .unwrap();
        assert_eq!(store.names(), vec!["invite", "reject"]);
        assert_eq!(store.get("reject").unwrap().subject, "a");
        assert!(store.get("missing").is_none());
    }

    #[tokio::test]
    async fn test_load_json() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("templates.json");
        tokio::fs::write(
            &path,
            r#"[{"name":"invite","subject":"Interview for {{position}}","body":"Dear {{name}}","is_html":false}]"#,
        )
        .await
        .unwrap();

        let store = InMemoryTemplateStore::load_json(&path).await.unwrap();
        let template = store.get("invite").unwrap();
        assert_eq!(template.subject, "Interview for {{position}}");
        assert!(!template.is_html);
    }

    #[tokio::test]
    async fn test_load_json_missing_file() {
        let result = InMemoryTemplateStore::load_json("/nonexistent/templates.json").await;
        assert!(matches!(result, Err(TemplateStoreError::Io { .. })));
    }
}
