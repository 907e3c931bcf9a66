//! Output rendering
//!
//! The summary is a short human readable overview: section counts, then one line per top level
//! workspace, then the diagnostics. JSON is the serialized model.

use edify_parser::model::{Subroutine, WorkspaceRole};
use edify_parser::{AppObject, Parsed};
use std::fmt::Write;

/// Section counts, one line per workspace, and every diagnostic.
pub fn summary(parsed: &Parsed<AppObject>) -> String {
    let app = &parsed.value;
    let mut out = String::new();

    let name = app.props.meta.get("Name").map(String::as_str).unwrap_or("<unnamed>");
    let _ = writeln!(out, "application {}", name);
    let _ = writeln!(out, "  properties: {}", app.props.meta.len());
    let _ = writeln!(out, "  parameters: {}", app.props.parameters.len());
    let _ = writeln!(out, "  global objects: {}", app.global_objs.len());
    let _ = writeln!(out, "  workspaces: {}", app.subroutines.len());
    for workspace in &app.subroutines {
        let _ = writeln!(out, "{}", workspace_line(workspace));
    }

    let _ = writeln!(out, "diagnostics: {}", parsed.diagnostics.len());
    for diagnostic in parsed.diagnostics.iter() {
        let _ = writeln!(out, "  {}", diagnostic);
    }
    out
}

fn workspace_line(workspace: &Subroutine) -> String {
    let role = match workspace.role {
        WorkspaceRole::EntryWorkspace => "entry workspace",
        WorkspaceRole::Subroutine => "subroutine",
        WorkspaceRole::ExceptionHandler => "exception handler",
    };
    format!(
        "  {} {}: {} steps, {} subflows",
        role,
        workspace.name(),
        workspace.flow.steps.len(),
        workspace.flow.nested_count()
    )
}

/// The model as JSON, newline terminated.
pub fn json(app: &AppObject, pretty: bool) -> Result<String, serde_json::Error> {
    let mut out = if pretty {
        serde_json::to_string_pretty(app)?
    } else {
        serde_json::to_string(app)?
    };
    out.push('\n');
    Ok(out)
}

#[cfg(test)]
mod tests {
    use super::*;
    use edify_parser::{DocumentLoader, ParseOptions};

    const EXPORT: &str = r##"<html><body>
        <h2>Application Object Properties</h2>
        <center><table><tr><th>Name</th><td>Demo</td></tr></table></center>
        <h2>Entry Workspace: <a name="ws1">Main</a></h2>
        <table><caption>Steps</caption>
          <tr><td><strong><a name="s1">1</a></strong> End.<br></td><td>Return Mode = <em>Normal</em></td></tr>
        </table>
    </body></html>"##;

    fn parsed() -> Parsed<AppObject> {
        DocumentLoader::from_string(EXPORT)
            .parse(&ParseOptions::default())
            .unwrap()
    }

    #[test]
    fn test_summary_lists_workspaces_and_diagnostics() {
        let out = summary(&parsed());
        assert!(out.starts_with("application Demo\n"));
        assert!(out.contains("  workspaces: 1\n"));
        assert!(out.contains("  entry workspace Main: 1 steps, 0 subflows\n"));
        assert!(out.contains("diagnostics: 2\n"));
        assert!(out.contains("could not find any \"Subroutine\" headings"));
    }

    #[test]
    fn test_json_is_newline_terminated() {
        let app = parsed().value;
        let compact = json(&app, false).unwrap();
        assert!(compact.ends_with("}\n"));
        assert_eq!(compact.lines().count(), 1);
        assert!(json(&app, true).unwrap().lines().count() > 1);
    }
}
