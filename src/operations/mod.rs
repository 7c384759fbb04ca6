mod delete;
mod list;
mod visibility;

pub use delete::delete_repositories;
pub use list::{ListFilter, list_repositories};
pub use visibility::change_visibility;

use crate::executor::BatchResult;
use crate::gate::NoOpReason;

/// How a menu flow ended.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum FlowOutcome {
    NoOp(NoOpReason),
    Completed(BatchResult),
}

impl FlowOutcome {
    pub fn result(&self) -> Option<&BatchResult> {
        match self {
            FlowOutcome::Completed(result) => Some(result),
            FlowOutcome::NoOp(_) => None,
        }
    }
}
