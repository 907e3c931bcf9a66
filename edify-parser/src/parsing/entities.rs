//! Entity table rows
//!
//! Parameters, objects, the exception routing table and the workspace list are each a table
//! with one entity per row. The same row grammars are used at application scope and inside a
//! workspace; only the wording of the diagnostics differs, see [`Scope`].
//!
//! Parameter and object rows are forgiving: a row with the wrong number of cells is reported
//! and parsed as far as it goes. An exception table row of the wrong shape is fatal.

use crate::details::{parse_details, Details};
use crate::diagnostics::Diagnostics;
use crate::dom::NodeRef;
use crate::error::{ErrorFlags, FatalError, ParseResult};
use crate::model::{EdifyObject, Param};
use crate::parsing::tables::{data_rows, strong_anchor, strong_text};
use crate::reference::Reference;
use indexmap::IndexMap;

const PARAM_COLUMNS: usize = 5;

/// Object detail keys with a model field.
pub const OBJECT_KEYS: [&str; 9] = [
    "Object Class",
    "Comment",
    "Initial Value",
    "resource",
    "pre-allocate",
    "auto-allocate",
    "_sys_alloc_name",
    "_sys_alloc_timeout",
    "Used by",
];

/// Workspace List detail keys with a model field.
pub const WORKSPACE_LIST_KEYS: [&str; 2] = ["Exception Workspaces", "Called by"];

/// Where an entity table lives
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Scope<'a> {
    /// Application level tables.
    Global,
    /// Tables under the named workspace's heading.
    Workspace(&'a str),
}

impl Scope<'_> {
    fn warn(&self, diagnostics: &mut Diagnostics, flag: ErrorFlags, message: String) {
        match self {
            Scope::Global => diagnostics.warn_global(flag, message),
            Scope::Workspace(workspace) => diagnostics.warn(flag, workspace, message),
        }
    }

    fn describe(&self, table: &str) -> String {
        match self {
            Scope::Global => format!("{table:?} table"),
            Scope::Workspace(workspace) => format!("{table:?} table in workspace {workspace:?}"),
        }
    }
}

/// One row of an "Entry Parameters" or "Application Object Parameters" table.
pub fn parse_param_row(row: NodeRef<'_>, scope: Scope<'_>, diagnostics: &mut Diagnostics) -> Param {
    let cells: Vec<String> = row.find_all("td").map(|cell| cell.trimmed_text()).collect();
    if cells.len() != PARAM_COLUMNS {
        let table = match scope {
            Scope::Global => "Application Object Parameters",
            Scope::Workspace(_) => "Entry Parameters",
        };
        scope.warn(
            diagnostics,
            ErrorFlags::BAD_PARAM_TABLE_FORMAT,
            format!(
                "{} has a row with {} columns instead of {PARAM_COLUMNS}",
                scope.describe(table),
                cells.len()
            ),
        );
    }
    let cell = |index: usize| cells.get(index).cloned().unwrap_or_default();
    Param {
        name: cell(0),
        label: cell(1),
        object_class: cell(2),
        io_type: cell(3),
        default_val: cell(4),
    }
}

pub fn parse_param_table(
    table: NodeRef<'_>,
    scope: Scope<'_>,
    diagnostics: &mut Diagnostics,
) -> Vec<Param> {
    data_rows(table)
        .map(|row| parse_param_row(row, scope, diagnostics))
        .collect()
}

/// One row of a "Global Objects" or "Local Objects" table.
pub fn parse_object_row(
    row: NodeRef<'_>,
    scope: Scope<'_>,
    diagnostics: &mut Diagnostics,
) -> EdifyObject {
    let table = match scope {
        Scope::Global => "Global Objects",
        Scope::Workspace(_) => "Local Objects",
    };
    let (head, details) = two_cells(row, || {
        format!("{} has a row with an unexpected number of columns", scope.describe(table))
    })
    .unwrap_or_else(|message| {
        scope.warn(diagnostics, ErrorFlags::BAD_OBJ_TABLE_FORMAT, message);
        fallback_cells(row)
    });

    let name = strong_text(head);
    let anchor = strong_anchor(head).unwrap_or_else(|| {
        scope.warn(
            diagnostics,
            ErrorFlags::BAD_OBJ_TABLE_FORMAT,
            format!("object {name:?} in {} has no anchor", scope.describe(table)),
        );
        String::new()
    });

    let details = parse_details(details);
    warn_unexpected_keys(&details, &OBJECT_KEYS, scope, diagnostics, || {
        format!("object {name:?} in {}", scope.describe(table))
    });

    let value = |key: &str| details.get(key).map(|detail| detail.value());
    EdifyObject {
        obj_class: value("Object Class").unwrap_or_default(),
        comment: value("Comment"),
        initial_value: value("Initial Value"),
        resource: value("resource"),
        used_by: details.get("Used by").map(|detail| detail.references()),
        pre_alloc: value("pre-allocate"),
        auto_alloc: value("auto-allocate"),
        sys_alloc_name: value("_sys_alloc_name"),
        sys_alloc_timeout: value("_sys_alloc_timeout"),
        name,
        anchor,
    }
}

pub fn parse_object_table(
    table: NodeRef<'_>,
    scope: Scope<'_>,
    diagnostics: &mut Diagnostics,
) -> Vec<EdifyObject> {
    data_rows(table)
        .map(|row| parse_object_row(row, scope, diagnostics))
        .collect()
}

/// Exception code → handler workspace, from an "Exception Handling Table".
///
/// Every row must be exactly one `<th>` (the code) and one `<td>` (the handler link).
pub fn parse_exception_table(
    table: NodeRef<'_>,
    workspace: &str,
    diagnostics: &mut Diagnostics,
) -> ParseResult<IndexMap<String, Reference>> {
    let mut handlers = IndexMap::new();
    for row in table.find_all("tr") {
        let codes: Vec<_> = row.find_all("th").collect();
        let targets: Vec<_> = row.find_all("td").collect();
        let ([code], [target]) = (codes.as_slice(), targets.as_slice()) else {
            return Err(FatalError::BadExceptionTableRow {
                workspace: workspace.to_string(),
            });
        };

        let handler = match target.links().first() {
            Some(link) => Reference::new(link.trimmed_text(), link.attr("href")),
            None => {
                diagnostics.warn(
                    ErrorFlags::MISSING_DETAIL,
                    workspace,
                    format!(
                        "exception code {:?} in workspace {workspace:?} has no handler link",
                        code.trimmed_text()
                    ),
                );
                Reference::unlinked(target.trimmed_text())
            }
        };
        handlers.insert(code.trimmed_text(), handler);
    }
    Ok(handlers)
}

/// One entry of the application's "Workspace List" table
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct WorkspaceListEntry {
    pub name: String,
    pub exception_workspaces: Option<Vec<String>>,
    pub called_by: Option<Vec<String>>,
}

pub fn parse_workspace_list_row(
    row: NodeRef<'_>,
    diagnostics: &mut Diagnostics,
) -> WorkspaceListEntry {
    let (head, details) = two_cells(row, || {
        "\"Workspace List\" table has a row with an unexpected number of columns".to_string()
    })
    .unwrap_or_else(|message| {
        diagnostics.warn_global(ErrorFlags::BAD_WORKSPACE_LIST_TABLE_FORMAT, message);
        fallback_cells(row)
    });

    let name = strong_text(head);
    let details = parse_details(details);
    warn_unexpected_keys(
        &details,
        &WORKSPACE_LIST_KEYS,
        Scope::Global,
        diagnostics,
        || format!("workspace {name:?} in \"Workspace List\" table"),
    );

    let names = |key: &str| {
        details.get(key).map(|detail| {
            detail
                .references()
                .into_iter()
                .map(|reference| reference.name)
                .collect::<Vec<String>>()
        })
    };
    WorkspaceListEntry {
        exception_workspaces: names("Exception Workspaces"),
        called_by: names("Called by"),
        name,
    }
}

pub fn parse_workspace_list(
    table: NodeRef<'_>,
    diagnostics: &mut Diagnostics,
) -> Vec<WorkspaceListEntry> {
    data_rows(table)
        .map(|row| parse_workspace_list_row(row, diagnostics))
        .collect()
}

/// The two `<td>` cells of a row, or the message describing why there are not exactly two.
fn two_cells<'a>(
    row: NodeRef<'a>,
    message: impl FnOnce() -> String,
) -> Result<(NodeRef<'a>, NodeRef<'a>), String> {
    let cells: Vec<_> = row.find_all("td").collect();
    match cells.as_slice() {
        [head, details] => Ok((*head, *details)),
        _ => Err(message()),
    }
}

/// First and last cell of a malformed row.
fn fallback_cells(row: NodeRef<'_>) -> (NodeRef<'_>, NodeRef<'_>) {
    let mut cells = row.find_all("td");
    let head = cells.next().unwrap_or(row);
    let details = cells.last().unwrap_or(head);
    (head, details)
}

fn warn_unexpected_keys(
    details: &Details,
    expected: &[&str],
    scope: Scope<'_>,
    diagnostics: &mut Diagnostics,
    subject: impl FnOnce() -> String,
) {
    let unexpected: Vec<&str> = details
        .keys()
        .map(String::as_str)
        .filter(|key| !expected.contains(key))
        .collect();
    if !unexpected.is_empty() {
        scope.warn(
            diagnostics,
            ErrorFlags::UNEXPECTED_KEYS,
            format!("unexpected details for {}: {unexpected:?}", subject()),
        );
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::dom::Document;

    fn table(rows: &str) -> Document {
        Document::parse(&format!("<table>{rows}</table>"))
    }

    #[test]
    fn test_param_row() {
        let doc = table(
            "<tr><th>Name</th><th>Label</th><th>Class</th><th>IO</th><th>Default</th></tr>
             <tr><td> Account </td><td>Acct</td><td>Number</td><td>in</td><td>0</td></tr>",
        );
        let mut diagnostics = Diagnostics::new();
        let params = parse_param_table(
            doc.root().find("table").unwrap(),
            Scope::Workspace("Main"),
            &mut diagnostics,
        );
        assert_eq!(
            params,
            vec![Param {
                name: "Account".into(),
                label: "Acct".into(),
                object_class: "Number".into(),
                io_type: "in".into(),
                default_val: "0".into(),
            }]
        );
        assert!(diagnostics.is_empty());
    }

    #[test]
    fn test_short_param_row_warns() {
        let doc = table("<tr><td>Account</td><td>Acct</td></tr>");
        let mut diagnostics = Diagnostics::new();
        let params = parse_param_table(
            doc.root().find("table").unwrap(),
            Scope::Global,
            &mut diagnostics,
        );
        assert_eq!(params[0].name, "Account");
        assert_eq!(params[0].default_val, "");
        assert!(diagnostics.has(ErrorFlags::BAD_PARAM_TABLE_FORMAT));
        assert_eq!(diagnostics.iter().next().unwrap().workspace, None);
    }

    #[test]
    fn test_object_row() {
        let doc = table(
            r##"<tr><td><a name="o1"><strong>Counter</strong></a></td>
                <td>Object Class: <em>Number</em><br>Comment: <em>retries</em><br>Initial Value: <em>0</em><br>Used by: <a href="#ws1">Main</a> , <a href="#ws2">Retry</a></td></tr>"##,
        );
        let mut diagnostics = Diagnostics::new();
        let objects = parse_object_table(
            doc.root().find("table").unwrap(),
            Scope::Global,
            &mut diagnostics,
        );
        let object = &objects[0];
        assert_eq!(object.name, "Counter");
        assert_eq!(object.obj_class, "Number");
        assert_eq!(object.comment.as_deref(), Some("retries"));
        assert_eq!(object.initial_value.as_deref(), Some("0"));
        assert_eq!(object.anchor, "o1");
        assert_eq!(
            object.used_by,
            Some(vec![
                Reference::new("Main", Some("#ws1")),
                Reference::new("Retry", Some("#ws2")),
            ])
        );
        assert!(diagnostics.is_empty());
    }

    #[test]
    fn test_object_unexpected_keys() {
        let doc = table(
            r#"<tr><td><a name="o2"><strong>Flag</strong></a></td>
                <td>Object Class: <em>Boolean</em><br>Colour: <em>blue</em></td></tr>"#,
        );
        let mut diagnostics = Diagnostics::new();
        let objects = parse_object_table(
            doc.root().find("table").unwrap(),
            Scope::Workspace("Main"),
            &mut diagnostics,
        );
        assert_eq!(objects[0].comment, None);
        assert!(diagnostics.has(ErrorFlags::UNEXPECTED_KEYS));
    }

    #[test]
    fn test_exception_table() {
        let doc = table(
            r##"<tr><th>E100</th><td><a href="#ws9">OnTimeout</a></td></tr>
                <tr><th>E200</th><td><a href="#ws8">OnHangup</a></td></tr>"##,
        );
        let mut diagnostics = Diagnostics::new();
        let map = parse_exception_table(
            doc.root().find("table").unwrap(),
            "Main",
            &mut diagnostics,
        )
        .unwrap();
        assert_eq!(map["E100"], Reference::new("OnTimeout", Some("#ws9")));
        assert_eq!(map.get_index(1).unwrap().0, "E200");
    }

    #[test]
    fn test_exception_table_bad_row_is_fatal() {
        let doc = table("<tr><td>E100</td><td>OnTimeout</td></tr>");
        let mut diagnostics = Diagnostics::new();
        let result = parse_exception_table(
            doc.root().find("table").unwrap(),
            "Main",
            &mut diagnostics,
        );
        assert_eq!(
            result,
            Err(FatalError::BadExceptionTableRow {
                workspace: "Main".into(),
            })
        );
    }

    #[test]
    fn test_workspace_list_row() {
        let doc = table(
            r##"<tr><td><strong>Main</strong></td>
                <td>Exception Workspaces: <a href="#ws9">OnTimeout</a> Called by: </td></tr>"##,
        );
        let mut diagnostics = Diagnostics::new();
        let entries = parse_workspace_list(doc.root().find("table").unwrap(), &mut diagnostics);
        assert_eq!(
            entries,
            vec![WorkspaceListEntry {
                name: "Main".into(),
                exception_workspaces: Some(vec!["OnTimeout".into()]),
                called_by: Some(vec![]),
            }]
        );
    }
}
