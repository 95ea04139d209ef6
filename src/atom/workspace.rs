//! Workspace atoms.
//!
//! Workspaces are hosted notebooks and terminals; nothing of them survives
//! offline except their configuration, which is shown for reference.

use super::{AtomError, payload};
use crate::types::Atom;
use maud::{Markup, html};
use serde::Deserialize;
use serde_json::Value;

#[derive(Debug, Deserialize)]
struct WorkspacePayload {
    #[serde(default)]
    workspace_id: Option<String>,
    #[serde(default)]
    configuration: Option<Value>,
}

pub fn render_workspace(atom: &Atom) -> Result<Markup, AtomError> {
    let workspace: WorkspacePayload = payload(atom)?;
    let configuration = workspace
        .configuration
        .as_ref()
        .map(serde_json::to_string_pretty)
        .transpose()
        .map_err(|source| AtomError::Payload {
            semantic_type: atom.semantic_type.clone(),
            source,
        })?;

    Ok(html! {
        div.workspace {
            p.workspace-offline {
                "This workspace is interactive and cannot run offline."
            }
            @if let Some(id) = &workspace.workspace_id {
                p { "Workspace: " code { (id) } }
            }
            @if let Some(configuration) = configuration {
                details {
                    summary { "Configuration" }
                    pre { code { (configuration) } }
                }
            }
        }
    })
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::test_helpers::atom;

    #[test]
    fn workspace_shows_notice_and_configuration() {
        let html = render_workspace(&atom(
            r#"{"semantic_type":"WorkspaceAtom","workspace_id":"r123","configuration":{"kind":"jupyter","ports":[8888]}}"#,
        ))
        .unwrap()
        .into_string();
        assert!(html.contains("cannot run offline"));
        assert!(html.contains("<code>r123</code>"));
        assert!(html.contains("&quot;kind&quot;: &quot;jupyter&quot;"));
    }

    #[test]
    fn workspace_without_details_still_renders() {
        let html = render_workspace(&atom(r#"{"semantic_type":"WorkspaceAtom"}"#))
            .unwrap()
            .into_string();
        assert!(html.contains("cannot run offline"));
        assert!(!html.contains("<details>"));
    }
}
