//! `Call DLL` detail
//!
//! ```text
//! Library Name = "kernel", Function Name = "Sleep"
//! Function Prototype = void Sleep(int)
//! <strong>Function Args</strong> <em>ms</em> <font><a href="#o3">Delay</a></font> ...
//! ```

use super::StepContext;
use crate::details::{clean_value, RefMap};
use crate::diagnostics::Diagnostics;
use crate::dom::NodeRef;
use crate::error::ErrorFlags;
use crate::model::StepKind;
use crate::reference::Reference;

/// Separator between the library and function parts of the qualified name.
const NAME_SEPARATOR: &str = "::";

pub(super) fn parse(
    detail: NodeRef<'_>,
    ctx: &StepContext<'_>,
    diagnostics: &mut Diagnostics,
) -> StepKind {
    let lines = detail.lines();

    let func_name = lines
        .iter()
        .find(|line| line.starts_with("Library Name"))
        .map(|line| qualified_name(line));
    if func_name.is_none() {
        ctx.warn(
            diagnostics,
            ErrorFlags::MISSING_DETAIL,
            "no \"Library Name\" line",
        );
    }

    let prototype = lines
        .iter()
        .find(|line| line.starts_with("Function Prototype"))
        .map(|line| {
            line.split_once(" = ")
                .map(|(_, prototype)| prototype.to_string())
                .unwrap_or_default()
        });
    if prototype.is_none() {
        ctx.warn(
            diagnostics,
            ErrorFlags::MISSING_DETAIL,
            "no \"Function Prototype\" line",
        );
    }

    let args = function_args(detail, ctx, diagnostics);

    StepKind::CallDll {
        func_name,
        prototype,
        args,
    }
}

/// `Library Name = "foo", Function Name = "bar"` becomes `foo::bar`.
fn qualified_name(line: &str) -> String {
    line.split(", ")
        .filter_map(|part| part.split_once(" = "))
        .map(|(_, value)| value.trim().trim_matches('"'))
        .collect::<Vec<_>>()
        .join(NAME_SEPARATOR)
}

/// Emphasised argument names, each followed by a `<font>` holding the bound value.
fn function_args(
    detail: NodeRef<'_>,
    ctx: &StepContext<'_>,
    diagnostics: &mut Diagnostics,
) -> Option<RefMap> {
    let Some(marker) = detail
        .find_all("strong")
        .find(|strong| strong.trimmed_text().starts_with("Function Args"))
    else {
        ctx.warn(
            diagnostics,
            ErrorFlags::MISSING_DETAIL,
            "no \"Function Args\" block",
        );
        return None;
    };

    let block = marker
        .find_parent("font")
        .filter(|font| font.is_inside(&detail))
        .or_else(|| marker.parent())
        .unwrap_or(detail);

    let mut args = RefMap::new();
    for name in block.find_all("em").filter(|em| em.is_after(&marker)) {
        let key = name.trimmed_text();
        let Some(value) = name.find_next_sibling("font") else {
            ctx.warn(
                diagnostics,
                ErrorFlags::MISSING_DETAIL,
                &format!("function arg {key:?} has no value"),
            );
            continue;
        };
        let target = value.links().first().and_then(|link| link.attr("href"));
        args.insert(key, Reference::new(clean_value(&value.text()), target));
    }
    Some(args)
}
