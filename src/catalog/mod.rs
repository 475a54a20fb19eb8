//! Agent catalog discovery and selection.

use serde::{Deserialize, Serialize};
use serde_json::Value;
use tracing::{debug, info, warn};

use crate::error::{BridgeError, Result};

/// Descriptor of one agent published by a repository.
#[derive(Debug, Clone, Default, Serialize, Deserialize, PartialEq)]
pub struct AgentCard {
    #[serde(default)]
    pub name: String,
    #[serde(default)]
    pub version: String,
    #[serde(default)]
    pub url: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub description: Option<String>,
}

/// Fetch the agent catalog from `{repository}/agents`.
pub async fn fetch_agents(client: &reqwest::Client, repository: &str) -> Result<Vec<AgentCard>> {
    let catalog_url = format!("{}/agents", repository.trim_end_matches('/'));
    debug!(url = %catalog_url, "fetching agent catalog");

    let response = client.get(&catalog_url).send().await?;
    let status = response.status().as_u16();
    if status != 200 {
        let body = response.text().await.unwrap_or_default();
        return Err(BridgeError::api(status, body));
    }

    let body: Value = response.json().await?;
    let agents: Vec<AgentCard> = serde_json::from_value(body)
        .map_err(|_| BridgeError::Protocol("agent catalog is not a list".into()))?;

    info!(count = agents.len(), "discovered agents from catalog");
    Ok(agents)
}

/// Pick an agent from the catalog.
///
/// A configured name is matched exactly; a miss logs a warning and falls
/// back to the first card, matching an empty or absent selection.
pub fn select_agent(agents: &[AgentCard], name: Option<&str>) -> Result<AgentCard> {
    if agents.is_empty() {
        return Err(BridgeError::Configuration(
            "no agents available in catalog".into(),
        ));
    }

    if let Some(wanted) = name {
        if let Some(card) = agents.iter().find(|card| card.name == wanted) {
            info!(agent = %wanted, "using selected agent");
            return Ok(card.clone());
        }
        warn!(agent = %wanted, "selected agent not found in catalog, using first agent");
    }

    Ok(agents[0].clone())
}

/// Resolve a card's URL against the repository base.
///
/// Absolute `http(s)` URLs pass through; relative and bare paths are joined
/// to the repository with exactly one slash.
pub fn resolve_agent_url(repository: &str, card_url: &str) -> String {
    if card_url.starts_with("http://") || card_url.starts_with("https://") {
        return card_url.to_string();
    }
    let base = repository.trim_end_matches('/');
    let path = card_url.trim_start_matches('/');
    format!("{base}/{path}")
}

#[cfg(test)]
mod tests {
    use super::*;

    fn card(name: &str, url: &str) -> AgentCard {
        AgentCard {
            name: name.to_string(),
            version: "1.0".to_string(),
            url: url.to_string(),
            description: None,
        }
    }

    #[test]
    fn selects_by_name() {
        let agents = vec![card("alpha", "/a"), card("beta", "/b")];
        let selected = select_agent(&agents, Some("beta")).unwrap();
        assert_eq!(selected.name, "beta");
    }

    #[test]
    fn falls_back_to_first_on_miss() {
        let agents = vec![card("alpha", "/a"), card("beta", "/b")];
        let selected = select_agent(&agents, Some("gamma")).unwrap();
        assert_eq!(selected.name, "alpha");
    }

    #[test]
    fn first_agent_when_no_name_configured() {
        let agents = vec![card("alpha", "/a")];
        assert_eq!(select_agent(&agents, None).unwrap().name, "alpha");
    }

    #[test]
    fn empty_catalog_is_a_configuration_error() {
        let err = select_agent(&[], None).unwrap_err();
        assert!(matches!(err, BridgeError::Configuration(_)));
    }

    #[test]
    fn url_resolution() {
        assert_eq!(
            resolve_agent_url("https://repo.example", "https://other.example/agent"),
            "https://other.example/agent"
        );
        assert_eq!(
            resolve_agent_url("https://repo.example", "/agents/butler"),
            "https://repo.example/agents/butler"
        );
        assert_eq!(
            resolve_agent_url("https://repo.example/", "agents/butler"),
            "https://repo.example/agents/butler"
        );
    }
}
