//! `Subflow` detail: a single link to the subflow's heading.

use super::StepContext;
use crate::diagnostics::Diagnostics;
use crate::dom::NodeRef;
use crate::error::ErrorFlags;
use crate::model::StepKind;
use crate::reference::Reference;

pub(super) fn parse(
    detail: NodeRef<'_>,
    ctx: &StepContext<'_>,
    diagnostics: &mut Diagnostics,
) -> StepKind {
    let target = match detail.links().first() {
        Some(link) => Some(Reference::new(link.trimmed_text(), link.attr("href"))),
        None => {
            ctx.warn(
                diagnostics,
                ErrorFlags::MISSING_DETAIL,
                "subflow step has no target link",
            );
            None
        }
    };
    StepKind::Subflow { target }
}
