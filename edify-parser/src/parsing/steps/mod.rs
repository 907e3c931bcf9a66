//! Step parser
//!
//! Each row of a workspace's "Steps" table is one step and has two cells:
//!
//! - the head cell: `<strong><a name="ANCHOR">ID</a></strong> TYPE.<br>Label: LABEL`
//! - the detail cell, whose grammar depends on TYPE
//!
//! The head is read the same way for every step. TYPE then selects one of the nine detail
//! grammars in the submodules. An unknown TYPE is fatal: everything downstream (subflow
//! discovery in particular) is driven by the step kinds.
//!
//! Detail grammars differ in how forgiving they are. Most missing pieces are warnings with a
//! `None` in the model; a Goto without a target, an End without a return mode and an Assign
//! whose value has an unknown prefix are fatal.

mod assign;
mod call;
mod call_dll;
mod choose;
mod end;
mod goto;
mod start;
mod subflow;
mod system_function;

use crate::diagnostics::Diagnostics;
use crate::dom::NodeRef;
use crate::error::{ErrorFlags, FatalError, ParseResult};
use crate::model::{Step, StepType};
use crate::parsing::tables::{data_rows, strong_anchor, strong_text};

/// Where a step lives, for messages
#[derive(Debug, Clone, Copy)]
pub(crate) struct StepContext<'a> {
    pub workspace: &'a str,
    pub id: &'a str,
}

impl StepContext<'_> {
    pub(crate) fn warn(&self, diagnostics: &mut Diagnostics, flag: ErrorFlags, message: &str) {
        diagnostics.warn(
            flag,
            self.workspace,
            format!("step {}::{}: {}", self.workspace, self.id, message),
        );
    }
}

/// Parse every row of a "Steps" table. Rows without data cells are skipped.
pub fn parse_step_table(
    table: NodeRef<'_>,
    workspace: &str,
    diagnostics: &mut Diagnostics,
) -> ParseResult<Vec<Step>> {
    data_rows(table)
        .map(|row| parse_step_row(row, workspace, diagnostics))
        .collect()
}

/// Parse one "Steps" table row.
pub fn parse_step_row(
    row: NodeRef<'_>,
    workspace: &str,
    diagnostics: &mut Diagnostics,
) -> ParseResult<Step> {
    let cells: Vec<_> = row.find_all("td").collect();
    if cells.len() != 2 {
        diagnostics.warn(
            ErrorFlags::BAD_STEP_TABLE_FORMAT,
            workspace,
            format!(
                "\"Steps\" table in workspace {workspace:?} has a row with {} columns instead of 2",
                cells.len()
            ),
        );
    }
    // Best effort on short rows: the detail grammar reads whatever cell is last.
    let (head, detail) = match cells.as_slice() {
        [] => (row, row),
        [only] => (*only, *only),
        [head, detail, ..] => (*head, *detail),
    };

    let id = strong_text(head);
    let ctx = StepContext {
        workspace,
        id: &id,
    };
    let anchor = strong_anchor(head).unwrap_or_else(|| {
        ctx.warn(
            diagnostics,
            ErrorFlags::BAD_STEP_TABLE_FORMAT,
            "head cell has no anchor",
        );
        String::new()
    });
    let type_label = step_type_label(head);

    let Some(step_type) = StepType::from_label(&type_label) else {
        return Err(FatalError::UnexpectedStepType {
            workspace: workspace.to_string(),
            step: id.clone(),
            step_type: type_label,
        });
    };

    let kind = match step_type {
        StepType::Start => start::parse(detail, &ctx, diagnostics),
        StepType::Subflow => subflow::parse(detail, &ctx, diagnostics),
        StepType::UseSystemFunction => system_function::parse(detail, &ctx, diagnostics),
        StepType::CallDll => call_dll::parse(detail, &ctx, diagnostics),
        StepType::Choose => choose::parse(detail, &ctx, diagnostics),
        StepType::Assign => assign::parse(head, detail, &ctx, diagnostics)?,
        StepType::Call => call::parse(detail, &ctx, diagnostics),
        StepType::Goto => goto::parse(detail, &ctx)?,
        StepType::End => end::parse(detail, &ctx)?,
    };
    let label = step_label(head, &ctx, diagnostics);

    Ok(Step {
        id,
        anchor,
        label,
        kind,
    })
}

/// The node right before the first line break, trimmed of whitespace and periods.
fn step_type_label(head: NodeRef<'_>) -> String {
    let before_break = match head.find("br") {
        Some(br) => br.previous_sibling(),
        None => head.children().last(),
    };
    before_break
        .map(|node| {
            node.text()
                .trim_matches(|c: char| c.is_whitespace() || c == '.')
                .to_string()
        })
        .unwrap_or_default()
}

/// Value of the `Label:` line, if the head cell has more than one line.
///
/// Lines are trimmed at their ends; the label is everything after the first `": "`, verbatim,
/// and empty when the line has no such separator.
fn step_label(
    head: NodeRef<'_>,
    ctx: &StepContext<'_>,
    diagnostics: &mut Diagnostics,
) -> Option<String> {
    let lines = head.lines();
    if lines.len() <= 1 {
        return None;
    }
    if lines.len() > 2 {
        ctx.warn(
            diagnostics,
            ErrorFlags::UNEXPECTED_DETAILS,
            &format!(
                "{} lines in head cell, expected 2; only the \"Label\" line is kept",
                lines.len()
            ),
        );
    }
    lines
        .iter()
        .find(|line| line.starts_with("Label:"))
        .map(|line| {
            line.split_once(": ")
                .map(|(_, label)| label.to_string())
                .unwrap_or_default()
        })
}

/// Link destination of a value made of one or more sibling nodes.
///
/// A single `<a>` is its own link. Otherwise the links inside element nodes are collected:
/// none or several produce a warning (the first wins). Plain text values have no link and are
/// not reported.
pub(crate) fn resolve_value_link(
    nodes: &[NodeRef<'_>],
    ctx: &StepContext<'_>,
    diagnostics: &mut Diagnostics,
    what: &str,
) -> Option<String> {
    if let [node] = nodes {
        if node.is("a") {
            return node.attr("href").map(str::to_string);
        }
    }
    if nodes.iter().all(|node| node.is_text()) {
        return None;
    }

    let links: Vec<_> = nodes.iter().flat_map(|node| node.links()).collect();
    match links.as_slice() {
        [] => {
            ctx.warn(
                diagnostics,
                ErrorFlags::MISSING_DETAIL,
                &format!("{what} has no links"),
            );
            None
        }
        [link] => link.attr("href").map(str::to_string),
        [first, ..] => {
            ctx.warn(
                diagnostics,
                ErrorFlags::AMBIGUOUS_LINKS,
                &format!("{what} has {} links; using the first", links.len()),
            );
            first.attr("href").map(str::to_string)
        }
    }
}

/// True for nodes that carry no value: whitespace or a bare list comma.
pub(crate) fn is_filler(node: &NodeRef<'_>) -> bool {
    crate::details::clean_value(&node.text()).is_empty()
}
