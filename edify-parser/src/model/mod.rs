//! The compiled application model
//!
//! Everything here is plain owned data produced by the parsers in [`crate::parsing`] and never
//! mutated afterwards. Ownership is a tree rooted at [`AppObject`]; cross references between
//! entities are [`Reference`](crate::reference::Reference) values, looked up by anchor, never
//! pointers.

pub mod app;
pub mod branch;
pub mod object;
pub mod param;
pub mod step;
pub mod workspace;

pub use app::{AppObject, AppProperties};
pub use branch::Branch;
pub use object::EdifyObject;
pub use param::Param;
pub use step::{AssignValue, Step, StepKind, StepType};
pub use workspace::{Subflow, Subroutine, WorkspaceRole};
