//! The application object, root of the model

use crate::model::object::EdifyObject;
use crate::model::param::Param;
use crate::model::workspace::{Subroutine, WorkspaceRole};
use indexmap::IndexMap;
use serde::Serialize;

/// Application level meta properties plus the application parameters
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
pub struct AppProperties {
    pub meta: IndexMap<String, String>,
    pub parameters: Vec<Param>,
}

/// A compiled application
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct AppObject {
    pub props: AppProperties,
    pub global_objs: Vec<EdifyObject>,
    /// Entry workspace first, then subroutines, then exception handlers.
    pub subroutines: Vec<Subroutine>,
}

impl AppObject {
    pub fn entry_workspace(&self) -> Option<&Subroutine> {
        self.subroutines
            .first()
            .filter(|workspace| workspace.role == WorkspaceRole::EntryWorkspace)
    }

    pub fn workspace(&self, name: &str) -> Option<&Subroutine> {
        self.subroutines
            .iter()
            .find(|workspace| workspace.name() == name)
    }

    pub fn workspaces_with_role(
        &self,
        role: WorkspaceRole,
    ) -> impl Iterator<Item = &Subroutine> + '_ {
        self.subroutines
            .iter()
            .filter(move |workspace| workspace.role == role)
    }
}
