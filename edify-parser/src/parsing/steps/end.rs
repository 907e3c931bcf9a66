//! `End` detail: `Return Mode = ` (any case) followed by the mode, kept verbatim.

use super::StepContext;
use crate::dom::NodeRef;
use crate::error::{FatalError, ParseResult};
use crate::model::StepKind;

pub(super) fn parse(detail: NodeRef<'_>, ctx: &StepContext<'_>) -> ParseResult<StepKind> {
    let fragments = detail.strings();
    let rtn_mode = fragments
        .iter()
        .position(|f| f.text.to_lowercase() == "return mode = ")
        .and_then(|marker| fragments.get(marker + 1))
        .map(|f| f.text.to_string())
        .ok_or_else(|| FatalError::MissingReturnMode {
            workspace: ctx.workspace.to_string(),
            step: ctx.id.to_string(),
        })?;
    Ok(StepKind::End { rtn_mode })
}
