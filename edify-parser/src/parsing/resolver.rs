//! Workspace resolver
//!
//! A workspace heading is followed by its captioned tables. The "Steps" table may contain
//! Subflow steps whose targets link to other workspace headings; those are resolved the same
//! way, recursively, and attached to the workspace that reached them.
//!
//! Target headings are looked up among the same-level siblings of the calling heading,
//! scanning forward first and then wrapping around to the earlier ones (a workspace may
//! invoke itself). The scan stops once every target is matched; targets that match nothing
//! are reported. With [`ParseOptions::search_earlier_headings`] off the scan is forward
//! only, and a target whose heading comes before the caller is reported as unmatched.
//!
//! Guards
//!
//! The reference graph between workspaces is not necessarily a tree. The resolver keeps the
//! chain of anchors currently being resolved and refuses to descend into one of them again
//! (a cycle is reported, the nested entry is left out). Nesting deeper than
//! [`ParseOptions::max_subflow_depth`] is reported and cut. With
//! [`ParseOptions::reuse_resolved`] a workspace reached a second time is cloned from the
//! first resolution instead of being parsed again. Only resolutions that neither guard cut
//! short are kept for reuse, and a kept one is reused only where its nesting still fits
//! under the depth limit, so reuse never changes the resulting tree.

use crate::diagnostics::Diagnostics;
use crate::dom::NodeRef;
use crate::error::{ErrorFlags, ParseResult};
use crate::model::{Step, Subflow, Subroutine, WorkspaceRole};
use crate::parsing::entities::{parse_exception_table, parse_object_table, parse_param_table, Scope};
use crate::parsing::steps::parse_step_table;
use crate::parsing::tables::{find_workspace_table, heading_anchor, heading_name, SECTION_HEADING};
use crate::parsing::ParseOptions;
use crate::reference::Reference;
use indexmap::{IndexMap, IndexSet};
use std::collections::HashMap;

/// Resolves workspaces and their nested subflows for one document
pub struct Resolver<'r> {
    options: ParseOptions,
    diagnostics: &'r mut Diagnostics,
    /// Anchors of the workspaces currently being resolved, outermost first.
    stack: Vec<String>,
    /// Current subflow nesting depth.
    depth: usize,
    /// Complete resolutions by heading anchor.
    resolved: HashMap<String, Resolution>,
}

/// A resolved subflow plus what a later reuse of it must check
#[derive(Debug, Clone)]
struct Resolution {
    subflow: Subflow,
    /// Neither the cycle guard nor the depth limit left out anything below it.
    complete: bool,
    /// Levels, from this one down, that contain Subflow steps.
    levels: usize,
}

/// The nested subflows of one workspace
struct Nested {
    subflows: Vec<Subflow>,
    complete: bool,
    levels: usize,
}

impl Nested {
    fn leaf() -> Self {
        Self {
            subflows: Vec::new(),
            complete: true,
            levels: 0,
        }
    }

    fn cut() -> Self {
        Self {
            subflows: Vec::new(),
            complete: false,
            levels: 1,
        }
    }
}

impl<'r> Resolver<'r> {
    pub fn new(options: ParseOptions, diagnostics: &'r mut Diagnostics) -> Self {
        Self {
            options,
            diagnostics,
            stack: Vec::new(),
            depth: 0,
            resolved: HashMap::new(),
        }
    }

    /// A top level workspace: its flow plus entry parameters, local objects and exception
    /// routing.
    pub fn resolve_subroutine(
        &mut self,
        heading: NodeRef<'_>,
        role: WorkspaceRole,
    ) -> ParseResult<Subroutine> {
        let flow = self.resolve_subflow(heading)?;
        let scope = Scope::Workspace(&flow.name);

        let entry_params = find_workspace_table(heading, "Entry Parameters")
            .map(|table| parse_param_table(table, scope, self.diagnostics))
            .unwrap_or_default();
        let local_objs = find_workspace_table(heading, "Local Objects")
            .map(|table| parse_object_table(table, scope, self.diagnostics))
            .unwrap_or_default();
        let exception_handler_map = match find_workspace_table(heading, "Exception Handling Table")
        {
            Some(table) => parse_exception_table(table, &flow.name, self.diagnostics)?,
            None => IndexMap::new(),
        };

        Ok(Subroutine {
            role,
            flow,
            exception_workspaces: None,
            called_by: None,
            entry_params,
            exception_handler_map,
            local_objs,
        })
    }

    /// A workspace's steps and every subflow reachable from them.
    pub fn resolve_subflow(&mut self, heading: NodeRef<'_>) -> ParseResult<Subflow> {
        Ok(self.resolve(heading)?.subflow)
    }

    fn resolve(&mut self, heading: NodeRef<'_>) -> ParseResult<Resolution> {
        let name = heading_name(heading);
        let anchor = heading_anchor(heading).map(str::to_string);
        tracing::debug!(workspace = %name, depth = self.depth, "resolving workspace");

        let steps = match find_workspace_table(heading, "Steps") {
            Some(table) => parse_step_table(table, &name, self.diagnostics)?,
            None => Vec::new(),
        };

        if let Some(anchor) = &anchor {
            self.stack.push(anchor.clone());
        }
        let nested = self.nested_subflows(heading, &name, &steps);
        if anchor.is_some() {
            self.stack.pop();
        }
        let nested = nested?;

        let resolution = Resolution {
            subflow: Subflow {
                name,
                anchor,
                steps,
                subflows: nested.subflows,
            },
            complete: nested.complete,
            levels: nested.levels,
        };
        if self.options.reuse_resolved && resolution.complete {
            if let Some(anchor) = &resolution.subflow.anchor {
                self.resolved.insert(anchor.clone(), resolution.clone());
            }
        }
        Ok(resolution)
    }

    fn nested_subflows(
        &mut self,
        heading: NodeRef<'_>,
        workspace: &str,
        steps: &[Step],
    ) -> ParseResult<Nested> {
        let targets: IndexSet<&str> = steps
            .iter()
            .filter_map(Step::subflow_target)
            .filter_map(Reference::anchor)
            .collect();
        if targets.is_empty() {
            return Ok(Nested::leaf());
        }

        if self.depth >= self.options.max_subflow_depth {
            self.diagnostics.warn(
                ErrorFlags::SUBFLOW_DEPTH_EXCEEDED,
                workspace,
                format!(
                    "subflows of workspace {workspace:?} not resolved: nesting deeper than {}",
                    self.options.max_subflow_depth
                ),
            );
            return Ok(Nested::cut());
        }

        let headings =
            find_target_headings(heading, &targets, self.options.search_earlier_headings);
        let mut subflows = Vec::with_capacity(headings.len());
        let mut complete = true;
        let mut deepest = 0;
        for (anchor, target) in &headings {
            if self.stack.iter().any(|active| active.as_str() == *anchor) {
                self.diagnostics.warn(
                    ErrorFlags::SUBFLOW_CYCLE,
                    workspace,
                    format!(
                        "workspace {workspace:?} re-enters subflow {:?} (#{anchor}) while resolving it",
                        heading_name(*target)
                    ),
                );
                complete = false;
                continue;
            }
            if self.options.reuse_resolved {
                // The reused tree must fit where a fresh resolution would be cut.
                let fits = |done: &&Resolution| {
                    self.depth + 1 + done.levels <= self.options.max_subflow_depth
                };
                if let Some(done) = self.resolved.get(*anchor).filter(fits) {
                    tracing::debug!(
                        workspace,
                        subflow = %done.subflow.name,
                        "reusing resolved subflow"
                    );
                    deepest = deepest.max(done.levels);
                    subflows.push(done.subflow.clone());
                    continue;
                }
            }

            self.depth += 1;
            let resolution = self.resolve(*target);
            self.depth -= 1;
            let resolution = resolution?;
            complete &= resolution.complete;
            deepest = deepest.max(resolution.levels);
            subflows.push(resolution.subflow);
        }

        if headings.len() < targets.len() {
            let unmatched: Vec<&str> = targets
                .iter()
                .copied()
                .filter(|target| !headings.contains_key(target))
                .collect();
            self.diagnostics.warn(
                ErrorFlags::UNRESOLVED_SUBFLOW,
                workspace,
                format!(
                    "could not find headings for all subflows invoked by workspace {workspace:?}; unmatched: {unmatched:?}"
                ),
            );
        }
        Ok(Nested {
            subflows,
            complete,
            levels: deepest + 1,
        })
    }
}

/// Same-level sibling headings whose anchors are in `targets`: following headings first, then
/// (when `wrap` is set) earlier ones up to and including `heading` itself. Stops once every
/// target has a heading.
fn find_target_headings<'a>(
    heading: NodeRef<'a>,
    targets: &IndexSet<&str>,
    wrap: bool,
) -> IndexMap<&'a str, NodeRef<'a>> {
    let level = heading.name().unwrap_or(SECTION_HEADING);
    let here = heading.id();
    let earlier = heading
        .parent()
        .into_iter()
        .flat_map(|parent| parent.children())
        .take_while(move |node| wrap && node.id() <= here);

    let mut found = IndexMap::new();
    for candidate in heading.next_siblings().chain(earlier) {
        if !candidate.is(level) {
            continue;
        }
        let Some(anchor) = heading_anchor(candidate) else {
            continue;
        };
        if targets.contains(anchor) && !found.contains_key(anchor) {
            found.insert(anchor, candidate);
            if found.len() == targets.len() {
                break;
            }
        }
    }
    found
}
