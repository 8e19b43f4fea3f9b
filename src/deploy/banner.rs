//! Human-readable version banner for deploy-style commands.

use std::fmt;

use crate::component::ComponentSet;

/// Action verb shown in the banner.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum DeployAction {
    Deploying,
    Pushing,
}

impl fmt::Display for DeployAction {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            DeployAction::Deploying => write!(f, "Deploying"),
            DeployAction::Pushing => write!(f, "Pushing"),
        }
    }
}

/// Render the status banner for an action against a component set.
///
/// Three shapes: no version tags at all, a single (or agreeing) version, and
/// two distinct versions where the metadata and the connection disagree.
pub fn version_banner(action: DeployAction, components: &ComponentSet, rest: bool) -> String {
    let api_label = if rest { "REST" } else { "SOAP" };
    match (&components.source_api_version, &components.api_version) {
        (None, None) => format!("*** {action} with {api_label} ***"),
        (Some(source), Some(api)) if source != api => format!(
            "*** {action} v{source} metadata with {api_label} API v{api} connection ***"
        ),
        // one tag, or both agreeing; the service accepts either
        (source, api) => {
            let version = api.as_deref().or(source.as_deref()).unwrap_or_default();
            format!("*** {action} with {api_label} API v{version} ***")
        }
    }
}
