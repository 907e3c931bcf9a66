//! `Goto` detail: `Target Location = ` followed by the target.
//!
//! The target is the first string after the marker, kept verbatim with its surrounding
//! whitespace.

use super::StepContext;
use crate::dom::NodeRef;
use crate::error::{FatalError, ParseResult};
use crate::model::StepKind;
use crate::reference::Reference;

pub(super) fn parse(detail: NodeRef<'_>, ctx: &StepContext<'_>) -> ParseResult<StepKind> {
    let fragments = detail.strings();
    let target = fragments
        .iter()
        .position(|f| f.text == "Target Location = ")
        .and_then(|marker| fragments.get(marker + 1))
        .map(|f| Reference::new(f.text, f.link))
        .ok_or_else(|| FatalError::MissingGotoTarget {
            workspace: ctx.workspace.to_string(),
            step: ctx.id.to_string(),
        })?;
    Ok(StepKind::Goto { target })
}
