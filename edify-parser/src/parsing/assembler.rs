//! Application object assembly
//!
//! The top level sections of an export, in the order they are parsed:
//!
//! - "Application Object Properties": a heading followed by a centered two column table
//! - "Application Object Parameters": a captioned parameter table
//! - "Global Objects": a captioned object table
//! - "Workspace List": a captioned table of workspace cross references
//! - the workspaces: one "Entry Workspace" heading, any number of "Subroutine" and
//!   "Exception Handler" headings
//!
//! The properties heading and the entry workspace heading are required; without them the
//! document is not an application export and the run is fatal.

use crate::diagnostics::{Diagnostics, Parsed};
use crate::dom::NodeRef;
use crate::error::{ErrorFlags, FatalError, ParseResult};
use crate::model::{AppObject, AppProperties, EdifyObject, Subroutine, WorkspaceRole};
use crate::parsing::entities::{
    parse_object_table, parse_param_table, parse_workspace_list, Scope, WorkspaceListEntry,
};
use crate::parsing::tables::{find_captioned_table, SECTION_HEADING};
use crate::parsing::{ParseOptions, Resolver};
use indexmap::IndexMap;

const PROPERTIES_HEADING: &str = "Application Object Properties";
const PARAMETERS_CAPTION: &str = "Application Object Parameters";
const GLOBAL_OBJECTS_CAPTION: &str = "Global Objects";
const WORKSPACE_LIST_CAPTION: &str = "Workspace List";
const RESERVED_META_KEY: &str = "parameters";

/// Compile a whole document, starting from its root.
pub fn parse_app_object(
    root: NodeRef<'_>,
    options: &ParseOptions,
) -> ParseResult<Parsed<AppObject>> {
    let mut diagnostics = Diagnostics::new();

    let props = properties(root, &mut diagnostics)?;
    let global_objs = global_objects(root, &mut diagnostics);
    let workspace_list = find_captioned_table(root, |caption| {
        caption.contains(WORKSPACE_LIST_CAPTION)
    })
    .map(|table| parse_workspace_list(table, &mut diagnostics))
    .unwrap_or_default();

    let mut subroutines = workspaces(root, options, &mut diagnostics)?;
    merge_workspace_list(&mut subroutines, workspace_list);

    tracing::info!(
        workspaces = subroutines.len(),
        diagnostics = diagnostics.len(),
        "compiled application object"
    );
    Ok(Parsed::new(
        AppObject {
            props,
            global_objs,
            subroutines,
        },
        diagnostics,
    ))
}

/// The application meta properties and parameters.
pub fn parse_properties(root: NodeRef<'_>) -> ParseResult<Parsed<AppProperties>> {
    let mut diagnostics = Diagnostics::new();
    let props = properties(root, &mut diagnostics)?;
    Ok(Parsed::new(props, diagnostics))
}

/// The "Global Objects" table, empty when the document has none.
pub fn parse_global_objects(root: NodeRef<'_>) -> Parsed<Vec<EdifyObject>> {
    let mut diagnostics = Diagnostics::new();
    let objects = global_objects(root, &mut diagnostics);
    Parsed::new(objects, diagnostics)
}

/// One top level workspace from its heading.
pub fn parse_workspace(
    heading: NodeRef<'_>,
    role: WorkspaceRole,
    options: &ParseOptions,
) -> ParseResult<Parsed<Subroutine>> {
    let mut diagnostics = Diagnostics::new();
    let workspace = Resolver::new(*options, &mut diagnostics).resolve_subroutine(heading, role)?;
    Ok(Parsed::new(workspace, diagnostics))
}

fn properties(root: NodeRef<'_>, diagnostics: &mut Diagnostics) -> ParseResult<AppProperties> {
    let heading = root
        .find_all(SECTION_HEADING)
        .find(|heading| heading.trimmed_text() == PROPERTIES_HEADING)
        .ok_or(FatalError::PropertiesNotFound)?;

    let mut meta = IndexMap::new();
    let table = heading
        .find_next_sibling("center")
        .and_then(|center| center.find("table"));
    for row in table.into_iter().flat_map(|table| table.find_all("tr")) {
        match (row.find("th"), row.find("td")) {
            (Some(key), Some(value)) => {
                meta.insert(key.trimmed_text(), value.trimmed_text());
            }
            _ => diagnostics.warn_global(
                ErrorFlags::BAD_PROPS_TABLE_FORMAT,
                format!("{PROPERTIES_HEADING:?} table has a row without a header and a value"),
            ),
        }
    }

    if meta.contains_key(RESERVED_META_KEY) {
        diagnostics.warn_global(
            ErrorFlags::META_PARAMETER_PROP,
            format!(
                "application object has a meta property named {RESERVED_META_KEY:?}; \
                 it is kept apart from the {PARAMETERS_CAPTION:?} table"
            ),
        );
    }

    let parameters = find_captioned_table(root, |caption| caption == PARAMETERS_CAPTION)
        .map(|table| parse_param_table(table, Scope::Global, diagnostics))
        .unwrap_or_default();

    Ok(AppProperties { meta, parameters })
}

fn global_objects(root: NodeRef<'_>, diagnostics: &mut Diagnostics) -> Vec<EdifyObject> {
    find_captioned_table(root, |caption| caption.contains(GLOBAL_OBJECTS_CAPTION))
        .map(|table| parse_object_table(table, Scope::Global, diagnostics))
        .unwrap_or_default()
}

/// Entry workspace, then subroutines, then exception handlers.
fn workspaces(
    root: NodeRef<'_>,
    options: &ParseOptions,
    diagnostics: &mut Diagnostics,
) -> ParseResult<Vec<Subroutine>> {
    let headings_with = |prefix: &'static str| {
        root.find_all(SECTION_HEADING)
            .filter(move |heading| heading.trimmed_text().starts_with(prefix))
    };

    let entry = headings_with("Entry Workspace")
        .next()
        .ok_or(FatalError::EntryWorkspaceNotFound)?;
    let subroutines: Vec<_> = headings_with("Subroutine").collect();
    if subroutines.is_empty() {
        diagnostics.warn_global(
            ErrorFlags::SUBROUTINES_NOT_FOUND,
            "could not find any \"Subroutine\" headings",
        );
    }
    let handlers: Vec<_> = headings_with("Exception Handler").collect();
    if handlers.is_empty() {
        diagnostics.warn_global(
            ErrorFlags::EXCEPTION_HANDLERS_NOT_FOUND,
            "could not find any \"Exception Handler\" headings",
        );
    }

    let mut resolver = Resolver::new(*options, diagnostics);
    let mut workspaces = Vec::with_capacity(1 + subroutines.len() + handlers.len());
    workspaces.push(resolver.resolve_subroutine(entry, WorkspaceRole::EntryWorkspace)?);
    for heading in subroutines {
        workspaces.push(resolver.resolve_subroutine(heading, WorkspaceRole::Subroutine)?);
    }
    for heading in handlers {
        workspaces.push(resolver.resolve_subroutine(heading, WorkspaceRole::ExceptionHandler)?);
    }
    Ok(workspaces)
}

/// Copy the "Workspace List" cross references onto the workspaces of the same name.
fn merge_workspace_list(workspaces: &mut [Subroutine], entries: Vec<WorkspaceListEntry>) {
    for entry in entries {
        match workspaces
            .iter_mut()
            .find(|workspace| workspace.name() == entry.name)
        {
            Some(workspace) => {
                workspace.exception_workspaces = entry.exception_workspaces;
                workspace.called_by = entry.called_by;
            }
            None => tracing::debug!(
                workspace = %entry.name,
                "workspace list entry without a workspace heading"
            ),
        }
    }
}
