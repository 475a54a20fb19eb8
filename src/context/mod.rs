//! Home-state context and prompt rendering collaborators.

use async_trait::async_trait;
use serde::{Deserialize, Serialize};

use crate::error::{BridgeError, Result};

/// An entity exposed to the conversation agent.
#[derive(Debug, Clone, Default, Serialize, Deserialize, PartialEq)]
pub struct ExposedEntity {
    pub entity_id: String,
    /// Friendly name, falling back to the entity id at the producer's side.
    pub name: String,
    pub state: String,
    #[serde(default)]
    pub aliases: Vec<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub area: Option<String>,
}

/// Point-in-time snapshot of the home used to ground the system prompt.
#[derive(Debug, Clone, Default, Serialize, Deserialize, PartialEq)]
pub struct HomeSnapshot {
    /// The platform's configured location name, e.g. "Home".
    pub platform_name: String,
    pub areas: Vec<String>,
    pub entities: Vec<ExposedEntity>,
}

/// Produces [`HomeSnapshot`]s; the bridge never looks past this seam.
#[async_trait]
pub trait HomeContextProvider: Send + Sync {
    async fn snapshot(&self) -> Result<HomeSnapshot>;
}

/// Renders the configured prompt template against a snapshot.
#[async_trait]
pub trait PromptRenderer: Send + Sync {
    /// May fail with [`BridgeError::Template`]; the bridge recovers by
    /// substituting the default prompt.
    async fn render(&self, template: &str, snapshot: &HomeSnapshot, language: &str)
        -> Result<String>;
}

/// Built-in renderer: `{{name}}` placeholder substitution plus an appended
/// listing of areas and exposed entities.
///
/// Supported placeholders: `{{platform_name}}`, `{{language}}`,
/// `{{areas}}`, `{{entity_count}}`. An unclosed `{{` is a template fault.
#[derive(Debug, Default)]
pub struct BasicPromptRenderer;

impl BasicPromptRenderer {
    fn substitute(template: &str, snapshot: &HomeSnapshot, language: &str) -> Result<String> {
        let mut out = String::with_capacity(template.len());
        let mut rest = template;

        while let Some(start) = rest.find("{{") {
            out.push_str(&rest[..start]);
            let after = &rest[start + 2..];
            let end = after.find("}}").ok_or_else(|| {
                BridgeError::Template("unclosed placeholder in prompt template".into())
            })?;
            let key = after[..end].trim();
            match key {
                "platform_name" => out.push_str(&snapshot.platform_name),
                "language" => out.push_str(language),
                "areas" => out.push_str(&snapshot.areas.join(", ")),
                "entity_count" => out.push_str(&snapshot.entities.len().to_string()),
                unknown => {
                    return Err(BridgeError::Template(format!(
                        "unknown placeholder: {unknown}"
                    )))
                }
            }
            rest = &after[end + 2..];
        }
        out.push_str(rest);
        Ok(out)
    }

    fn entity_listing(snapshot: &HomeSnapshot) -> String {
        let mut listing = String::new();
        if !snapshot.areas.is_empty() {
            listing.push_str("\n\nAreas: ");
            listing.push_str(&snapshot.areas.join(", "));
        }
        if !snapshot.entities.is_empty() {
            listing.push_str("\n\nExposed entities:");
            for entity in &snapshot.entities {
                listing.push_str("\n- ");
                listing.push_str(&entity.name);
                listing.push_str(" (");
                listing.push_str(&entity.entity_id);
                if let Some(area) = &entity.area {
                    listing.push_str(", ");
                    listing.push_str(area);
                }
                listing.push_str("): ");
                listing.push_str(&entity.state);
            }
        }
        listing
    }
}

#[async_trait]
impl PromptRenderer for BasicPromptRenderer {
    async fn render(
        &self,
        template: &str,
        snapshot: &HomeSnapshot,
        language: &str,
    ) -> Result<String> {
        let mut prompt = Self::substitute(template, snapshot, language)?;
        prompt.push_str(&Self::entity_listing(snapshot));
        Ok(prompt)
    }
}

/// Context provider returning a fixed snapshot; useful for hosts without a
/// live state source and in tests.
#[derive(Debug, Default)]
pub struct StaticHomeContext {
    snapshot: HomeSnapshot,
}

impl StaticHomeContext {
    pub fn new(snapshot: HomeSnapshot) -> Self {
        Self { snapshot }
    }
}

#[async_trait]
impl HomeContextProvider for StaticHomeContext {
    async fn snapshot(&self) -> Result<HomeSnapshot> {
        Ok(self.snapshot.clone())
    }
}
