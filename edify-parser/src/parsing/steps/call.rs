//! `Call` detail: `Target <kind>: <a>NAME</a>` then `Parameters:` and `key = value` pairs.

use super::StepContext;
use crate::details::{scan_details, to_ref_map, KeyStyle, RefMap};
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
    let fragments = detail.strings();

    let target = fragments
        .iter()
        .position(|f| f.text.trim_start().starts_with("Target ") && f.text.ends_with(": "))
        .and_then(|marker| fragments.get(marker + 1))
        .map(|f| Reference::new(f.text.trim(), f.link));
    if target.is_none() {
        ctx.warn(
            diagnostics,
            ErrorFlags::MISSING_DETAIL,
            "call step has no target",
        );
    }

    let params = match fragments
        .iter()
        .position(|f| f.text.trim_start().starts_with("Parameters:"))
    {
        Some(marker) => to_ref_map(&scan_details(
            fragments[marker + 1..].iter().copied(),
            KeyStyle::Equals,
        )),
        None => RefMap::new(),
    };

    StepKind::Call { target, params }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::dom::Document;

    #[test]
    fn test_target_and_params() {
        let doc = Document::parse(
            r##"<table><tr><td>Target Workspace: <a href="#ws2">Lookup</a><br>
                Parameters:<br>Key = <a href="#o5">AccountId</a>, Mode = <em>fast</em></td></tr></table>"##,
        );
        let cell = doc.root().find("td").unwrap();
        let mut diagnostics = Diagnostics::new();
        let ctx = StepContext {
            workspace: "Main",
            id: "6",
        };
        let StepKind::Call { target, params } = parse(cell, &ctx, &mut diagnostics) else {
            panic!("not a call step");
        };
        assert_eq!(target, Some(Reference::new("Lookup", Some("#ws2"))));
        assert_eq!(params["Key"].encode(), "AccountId:#o5");
        assert_eq!(params["Mode"].encode(), "fast:None");
        assert!(diagnostics.is_empty());
    }

    #[test]
    fn test_missing_target_warns() {
        let doc = Document::parse("<table><tr><td>Parameters:</td></tr></table>");
        let cell = doc.root().find("td").unwrap();
        let mut diagnostics = Diagnostics::new();
        let ctx = StepContext {
            workspace: "Main",
            id: "6",
        };
        let kind = parse(cell, &ctx, &mut diagnostics);
        assert_eq!(
            kind,
            StepKind::Call {
                target: None,
                params: RefMap::new(),
            }
        );
        assert!(diagnostics.has(ErrorFlags::MISSING_DETAIL));
    }
}
