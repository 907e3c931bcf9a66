//! `Choose` detail: a list of branches.
//!
//! ```text
//! <strong>Branch #1:</strong> Counter &gt; 3<br>
//! Target Location = <a href="#s7">7</a>, Source Object = <a href="#o2">Counter</a><br>
//! <strong>Branch #2:</strong> Default<br>
//! Target Location = <a href="#s9">9</a><br>
//! ```
//!
//! The condition is the text between the branch marker and the next line break. The line after
//! that holds the `key = value` details.

use super::{is_filler, resolve_value_link, StepContext};
use crate::details::{clean_value, KeyStyle};
use crate::diagnostics::Diagnostics;
use crate::dom::NodeRef;
use crate::error::ErrorFlags;
use crate::model::{Branch, StepKind};
use crate::reference::Reference;

const BRANCH_MARKER: &str = "Branch #";

pub(super) fn parse(
    detail: NodeRef<'_>,
    ctx: &StepContext<'_>,
    diagnostics: &mut Diagnostics,
) -> StepKind {
    let branches = detail
        .find_all("strong")
        .filter(|strong| strong.trimmed_text().starts_with(BRANCH_MARKER))
        .map(|strong| parse_branch(strong, detail, ctx, diagnostics))
        .collect();
    StepKind::Choose { branches }
}

fn parse_branch(
    strong: NodeRef<'_>,
    detail: NodeRef<'_>,
    ctx: &StepContext<'_>,
    diagnostics: &mut Diagnostics,
) -> Branch {
    let marker = strong.trimmed_text();
    let id = marker[BRANCH_MARKER.len()..]
        .trim_end_matches(':')
        .trim()
        .to_string();
    let condition: String = strong
        .next_siblings()
        .take_while(|node| !node.is("br"))
        .map(|node| node.text())
        .collect();
    let mut branch = Branch::new(id, condition.trim());

    let line_start = strong
        .find_next("br")
        .filter(|br| br.is_inside(&detail));
    if let Some(br) = line_start {
        for (key, nodes) in branch_details(br) {
            let what = format!("branch {} detail {key:?}", branch.id);
            let text: String = nodes.iter().map(|node| node.text()).collect();
            let target = resolve_value_link(&nodes, ctx, diagnostics, &what);
            let token = Reference::new(clean_value(&text), target);
            match key.as_str() {
                "Target Location" => branch.target_loc = Some(token),
                "Source Object" => branch.source_obj = Some(token),
                "Comparison Operator" => branch.comparison_op = Some(token),
                "Target Object" => branch.target_obj = Some(token),
                _ => {
                    ctx.warn(
                        diagnostics,
                        ErrorFlags::UNEXPECTED_KEYS,
                        &format!("unexpected key {key:?} in branch {}", branch.id),
                    );
                    branch.extra.insert(key, token);
                }
            }
        }
    }

    if branch.target_loc.is_none() {
        ctx.warn(
            diagnostics,
            ErrorFlags::MISSING_DETAIL,
            &format!("branch {} has no \"Target Location\"", branch.id),
        );
    }
    branch
}

/// Key/value runs of the line following `br`, with each value as its sibling nodes.
fn branch_details<'a>(br: NodeRef<'a>) -> Vec<(String, Vec<NodeRef<'a>>)> {
    let mut details = Vec::new();
    let mut pending: Option<(String, Vec<NodeRef<'a>>)> = None;

    for node in br.next_siblings().take_while(|node| !node.is("br")) {
        let text = node.text();
        if KeyStyle::Equals.is_key(&text) {
            details.extend(pending.take());
            pending = Some((KeyStyle::Equals.clean_key(&text), Vec::new()));
            continue;
        }
        if let Some((_, nodes)) = pending.as_mut() {
            if !is_filler(&node) {
                nodes.push(node);
            }
        }
    }
    details.extend(pending);
    details
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::dom::Document;

    fn branches(html: &str) -> (Vec<Branch>, Diagnostics) {
        let doc = Document::parse(&format!("<table><tr><td>{html}</td></tr></table>"));
        let cell = doc.root().find("td").unwrap();
        let mut diagnostics = Diagnostics::new();
        let ctx = StepContext {
            workspace: "Main",
            id: "5",
        };
        match parse(cell, &ctx, &mut diagnostics) {
            StepKind::Choose { branches } => (branches, diagnostics),
            other => panic!("unexpected {other:?}"),
        }
    }

    #[test]
    fn test_branch_keys_are_remapped() {
        let (branches, diagnostics) = branches(
            r##"<strong>Branch #1:</strong> Counter &gt; 3<br>Target Location = <a href="#s7">7</a>, Source Object = <a href="#o2">Counter</a>, Comparison Operator = <font>greater</font>, Target Object = <a href="#o3">Limit</a><br>"##,
        );
        assert_eq!(branches.len(), 1);
        let branch = &branches[0];
        assert_eq!(branch.id, "1");
        assert_eq!(branch.condition, "Counter > 3");
        assert_eq!(branch.target_loc, Some(Reference::new("7", Some("#s7"))));
        assert_eq!(branch.source_obj, Some(Reference::new("Counter", Some("#o2"))));
        assert_eq!(branch.target_obj, Some(Reference::new("Limit", Some("#o3"))));
        assert_eq!(branch.comparison_op, Some(Reference::unlinked("greater")));
        assert!(branch.extra.is_empty());
        // the font value has no link inside
        assert!(diagnostics.has(ErrorFlags::MISSING_DETAIL));
        assert_eq!(diagnostics.len(), 1);
    }

    #[test]
    fn test_multiple_branches() {
        let (branches, diagnostics) = branches(
            r##"<strong>Branch #1:</strong> A<br>Target Location = <a href="#s2">2</a><br>
                <strong>Branch #2:</strong> Default<br>Target Location = <a href="#s3">3</a><br>"##,
        );
        let ids: Vec<_> = branches.iter().map(|b| b.id.as_str()).collect();
        assert_eq!(ids, vec!["1", "2"]);
        assert_eq!(branches[1].condition, "Default");
        assert_eq!(branches[1].target_loc.as_ref().unwrap().encode(), "3:#s3");
        assert!(diagnostics.is_empty());
    }

    #[test]
    fn test_unknown_key_kept_in_extra() {
        let (branches, diagnostics) = branches(
            r##"<strong>Branch #1:</strong> A<br>Target Location = <a href="#s2">2</a>, Priority = high<br>"##,
        );
        assert_eq!(branches[0].extra["Priority"], Reference::unlinked("high"));
        assert!(diagnostics.has(ErrorFlags::UNEXPECTED_KEYS));
    }

    #[test]
    fn test_missing_target_location_warns() {
        let (branches, diagnostics) = branches("<strong>Branch #3:</strong> Otherwise<br>");
        assert_eq!(branches[0].target_loc, None);
        assert!(diagnostics.has(ErrorFlags::MISSING_DETAIL));
    }

    #[test]
    fn test_multiple_links_warn() {
        let (branches, diagnostics) = branches(
            r##"<strong>Branch #1:</strong> A<br>Target Location = <font><a href="#s2">2</a><a href="#s4">4</a></font><br>"##,
        );
        assert_eq!(branches[0].target_loc.as_ref().unwrap().encode(), "24:#s2");
        assert!(diagnostics.has(ErrorFlags::AMBIGUOUS_LINKS));
    }
}
