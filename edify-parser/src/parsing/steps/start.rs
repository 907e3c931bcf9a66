//! `Start` detail: the workspace's entry parameters.
//!
//! ```text
//! Parameters = <none>            the whole value is one unlinked token
//! Parameters: In1 = <a>X</a> ... each `key = value` pair is a parameter
//! ```

use super::StepContext;
use crate::details::{scan_details, KeyStyle, RefMap};
use crate::diagnostics::Diagnostics;
use crate::dom::{Fragment, NodeRef};
use crate::error::ErrorFlags;
use crate::model::StepKind;
use crate::reference::Reference;

const PARAMETERS: &str = "Parameters";

pub(super) fn parse(
    detail: NodeRef<'_>,
    ctx: &StepContext<'_>,
    diagnostics: &mut Diagnostics,
) -> StepKind {
    let fragments = detail.strings();
    let Some(start) = fragments
        .iter()
        .position(|fragment| fragment.text.trim_start().starts_with(PARAMETERS))
    else {
        if fragments.iter().any(|f| !f.text.trim().is_empty()) {
            ctx.warn(
                diagnostics,
                ErrorFlags::UNEXPECTED_DETAILS,
                "unexpected details before \"Parameters\"",
            );
        }
        return StepKind::Start {
            params: RefMap::new(),
        };
    };

    if fragments[..start].iter().any(|f| !f.text.trim().is_empty()) {
        ctx.warn(
            diagnostics,
            ErrorFlags::UNEXPECTED_DETAILS,
            "unexpected details before \"Parameters\"",
        );
    }

    // `Parameters = x` in a single run is split so the scanner sees a key.
    let marker = fragments[start];
    let mut input: Vec<Fragment<'_>> = Vec::with_capacity(fragments.len() - start + 1);
    match marker.text.split_once(" = ") {
        Some((key, rest)) if key.trim() == PARAMETERS && !rest.is_empty() => {
            input.push(Fragment::new("Parameters = ", None));
            input.push(Fragment::new(rest, marker.link));
        }
        _ => input.push(marker),
    }
    input.extend_from_slice(&fragments[start + 1..]);

    let params = scan_details(input, KeyStyle::Equals)
        .iter()
        .map(|(key, detail)| {
            let token = if key == PARAMETERS {
                Reference::unlinked(detail.value())
            } else {
                detail.reference()
            };
            (key.clone(), token)
        })
        .collect();

    StepKind::Start { params }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::dom::Document;

    fn params(html: &str) -> (RefMap, Diagnostics) {
        let doc = Document::parse(&format!("<table><tr><td>{html}</td></tr></table>"));
        let cell = doc.root().find("td").unwrap();
        let mut diagnostics = Diagnostics::new();
        let ctx = StepContext {
            workspace: "Main",
            id: "1",
        };
        match parse(cell, &ctx, &mut diagnostics) {
            StepKind::Start { params } => (params, diagnostics),
            other => panic!("unexpected {other:?}"),
        }
    }

    #[test]
    fn test_parameters_none() {
        let (params, diagnostics) = params("Parameters = &lt;none&gt;");
        assert_eq!(params.len(), 1);
        assert_eq!(params["Parameters"].encode(), "<none>:None");
        assert!(diagnostics.is_empty());
    }

    #[test]
    fn test_named_parameters() {
        let (params, _) = params(
            r##"Parameters:<br>In1 = <a href="#o1">Caller</a>, In2 = <a href="#o2">Count</a>"##,
        );
        assert_eq!(params["In1"].encode(), "Caller:#o1");
        assert_eq!(params["In2"].encode(), "Count:#o2");
    }

    #[test]
    fn test_preamble_warns() {
        let (params, diagnostics) = params("noise <br>Parameters = &lt;none&gt;");
        assert_eq!(params.len(), 1);
        assert!(diagnostics.has(ErrorFlags::UNEXPECTED_DETAILS));
    }
}
