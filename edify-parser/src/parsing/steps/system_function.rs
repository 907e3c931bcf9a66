//! `Use System Function` detail: `Function Name = NAME` on the first line.

use super::StepContext;
use crate::diagnostics::Diagnostics;
use crate::dom::NodeRef;
use crate::error::ErrorFlags;
use crate::model::StepKind;

pub(super) fn parse(
    detail: NodeRef<'_>,
    ctx: &StepContext<'_>,
    diagnostics: &mut Diagnostics,
) -> StepKind {
    let lines = detail.lines();
    let func_name = match lines.first() {
        Some(line) if line.starts_with("Function Name") => Some(
            line.split_once('=')
                .map(|(_, name)| name.trim().to_string())
                .unwrap_or_default(),
        ),
        _ => {
            ctx.warn(
                diagnostics,
                ErrorFlags::MISSING_DETAIL,
                "first line does not start with \"Function Name\"",
            );
            None
        }
    };
    StepKind::UseSystemFunction { func_name }
}
