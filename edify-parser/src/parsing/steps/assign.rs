//! `Assign` detail
//!
//! The assigned object is the second link of the head cell (the first is the step's own
//! anchor). The detail cell is either `Expression = ...`, scanned like any `key = value`
//! block, or `<em>Value = </em>` followed by the value node.

use super::{is_filler, resolve_value_link, StepContext};
use crate::details::{scan_details, to_ref_map, KeyStyle};
use crate::diagnostics::Diagnostics;
use crate::dom::NodeRef;
use crate::error::{ErrorFlags, FatalError, ParseResult};
use crate::model::{AssignValue, StepKind};
use crate::reference::Reference;

pub(super) fn parse(
    head: NodeRef<'_>,
    detail: NodeRef<'_>,
    ctx: &StepContext<'_>,
    diagnostics: &mut Diagnostics,
) -> ParseResult<StepKind> {
    let obj = match head.find_all("a").nth(1) {
        Some(link) => Some(Reference::new(link.trimmed_text(), link.attr("href"))),
        None => {
            ctx.warn(
                diagnostics,
                ErrorFlags::MISSING_DETAIL,
                "assign step has no target object link",
            );
            None
        }
    };

    let text = detail.trimmed_text();
    let val = if text.starts_with("Expression = ") {
        let details = scan_details(detail.strings(), KeyStyle::Equals);
        Some(AssignValue::Expression(to_ref_map(&details)))
    } else if text.starts_with("Value = ") {
        value(detail, ctx, diagnostics).map(AssignValue::Value)
    } else {
        return Err(FatalError::BadAssignValue {
            workspace: ctx.workspace.to_string(),
            step: ctx.id.to_string(),
        });
    };

    Ok(StepKind::Assign { obj, val })
}

fn value(
    detail: NodeRef<'_>,
    ctx: &StepContext<'_>,
    diagnostics: &mut Diagnostics,
) -> Option<Reference> {
    let node = detail
        .find("em")
        .and_then(|em| em.next_siblings().find(|node| !is_filler(node)));
    let Some(node) = node else {
        ctx.warn(
            diagnostics,
            ErrorFlags::MISSING_DETAIL,
            "\"Value = \" is not followed by a value",
        );
        return None;
    };
    let target = resolve_value_link(&[node], ctx, diagnostics, "assigned value");
    Some(Reference::new(node.trimmed_text(), target))
}
