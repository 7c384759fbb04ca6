//! Selection and confirmation between a snapshot and a batch.

use log::{debug, info};
use std::fmt;

use crate::error::{RepotidyError, Result};
use crate::executor::BatchAction;
use crate::format;
use crate::prompt::Prompter;
use crate::snapshot::{RepositoryRecord, Snapshot};

/// Literal the operator must type before anything is deleted.
pub const DELETE_PHRASE: &str = "DELETE";

/// Records not already in the target visibility, in snapshot order.
pub fn filter_by_visibility(snapshot: &Snapshot, target_private: bool) -> Snapshot {
    Snapshot::new(
        snapshot
            .records()
            .iter()
            .filter(|r| r.is_private != target_private)
            .cloned()
            .collect(),
    )
}

/// Ask the operator which candidates to act on.
///
/// Unknown names coming back from the prompter are dropped and the result
/// follows candidate order. An empty result means "do nothing".
pub fn request_selection<P>(
    prompter: &mut P,
    message: &str,
    candidates: &[RepositoryRecord],
) -> Result<Vec<String>>
where
    P: Prompter + ?Sized,
{
    if candidates.is_empty() {
        return Ok(Vec::new());
    }

    let picked = prompter.select_many(message, &format::choices(candidates))?;
    let selected: Vec<String> = candidates
        .iter()
        .filter(|r| picked.iter().any(|p| p == &r.name))
        .map(|r| r.name.clone())
        .collect();

    debug!("request_selection: {} of {} selected", selected.len(), candidates.len());
    Ok(selected)
}

/// Proof that the operator approved `action` on exactly `count` repositories.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Confirmation {
    action: BatchAction,
    count: usize,
}

impl Confirmation {
    pub fn action(&self) -> BatchAction {
        self.action
    }

    pub fn count(&self) -> usize {
        self.count
    }

    pub fn covers(&self, action: BatchAction, count: usize) -> bool {
        self.action == action && self.count == count
    }
}

/// Visibility changes take a yes/no. Deletion takes the exact phrase
/// [`DELETE_PHRASE`]; anything else is a [`RepotidyError::Validation`].
/// Either way a refusal is final, there is no re-prompt.
pub fn request_confirmation<P>(
    prompter: &mut P,
    action: BatchAction,
    count: usize,
) -> Result<Option<Confirmation>>
where
    P: Prompter + ?Sized,
{
    match action {
        BatchAction::SetVisibility { .. } => {
            let question = format!("{} {} repositories?", capitalize(action.describe()), count);
            if !prompter.confirm(&question, false)? {
                info!("request_confirmation: declined {} on {}", action.describe(), count);
                return Ok(None);
            }
        }
        BatchAction::Delete => {
            let question = format!(
                "This will permanently delete {} repositories and cannot be undone. \
                 Type {} to confirm:",
                count, DELETE_PHRASE
            );
            let answer = prompter.prompt_text(&question)?;
            if answer != DELETE_PHRASE {
                info!("request_confirmation: deletion phrase mismatch, cancelling");
                return Err(RepotidyError::Validation(format!(
                    "Confirmation text did not match '{}'. Deletion cancelled.",
                    DELETE_PHRASE
                )));
            }
        }
    }

    Ok(Some(Confirmation { action, count }))
}

fn capitalize(s: &str) -> String {
    let mut chars = s.chars();
    match chars.next() {
        Some(first) => first.to_uppercase().chain(chars).collect(),
        None => String::new(),
    }
}

/// Why a flow stopped without touching the remote.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum NoOpReason {
    EmptySnapshot,
    NothingEligible,
    NothingSelected,
    Declined,
}

impl fmt::Display for NoOpReason {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let text = match self {
            NoOpReason::EmptySnapshot => "No repositories found.",
            NoOpReason::NothingEligible => "No repositories need this change.",
            NoOpReason::NothingSelected => "No repositories selected.",
            NoOpReason::Declined => "Operation cancelled.",
        };
        f.write_str(text)
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum FlowState {
    Idle,
    Fetched,
    Filtered,
    Selected,
    Confirmed,
    Executing,
    Reported(Option<NoOpReason>),
}

impl FlowState {
    pub fn can_advance_to(&self, next: FlowState) -> bool {
        use FlowState::*;
        matches!(
            (self, next),
            (Idle, Fetched)
                | (Fetched, Filtered)
                | (Filtered, Selected)
                | (Selected, Confirmed)
                | (Confirmed, Executing)
                | (Executing, Reported(None))
                | (Fetched, Reported(Some(NoOpReason::EmptySnapshot)))
                | (Filtered, Reported(Some(NoOpReason::NothingEligible)))
                | (Selected, Reported(Some(NoOpReason::NothingSelected)))
                | (Confirmed, Reported(Some(NoOpReason::Declined)))
        )
    }
}

/// Tracks one flow's progress and logs each step.
#[derive(Debug)]
pub struct Flow {
    name: &'static str,
    state: FlowState,
}

impl Flow {
    pub fn new(name: &'static str) -> Self {
        Self {
            name,
            state: FlowState::Idle,
        }
    }

    pub fn state(&self) -> FlowState {
        self.state
    }

    pub fn advance(&mut self, next: FlowState) {
        debug_assert!(
            self.state.can_advance_to(next),
            "{}: illegal transition {:?} -> {:?}",
            self.name,
            self.state,
            next
        );
        debug!("{}: {:?} -> {:?}", self.name, self.state, next);
        self.state = next;
    }

    /// Record an early exit and hand back the reason.
    pub fn stop(&mut self, reason: NoOpReason) -> NoOpReason {
        self.advance(FlowState::Reported(Some(reason)));
        reason
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::prompt::Choice;
    use chrono::Utc;

    fn record(name: &str, is_private: bool) -> RepositoryRecord {
        RepositoryRecord {
            id: 0,
            name: name.to_string(),
            full_name: format!("me/{}", name),
            owner: "me".to_string(),
            is_private,
            description: String::new(),
            language: String::new(),
            updated_at: Utc::now(),
            size_kb: 0,
        }
    }

    #[derive(Default)]
    struct Scripted {
        picks: Vec<String>,
        yes: bool,
        text: String,
        confirms: usize,
        texts: usize,
    }

    impl Prompter for Scripted {
        fn select_one(&mut self, _message: &str, _choices: &[Choice]) -> Result<Option<String>> {
            Ok(None)
        }

        fn select_many(&mut self, _message: &str, _choices: &[Choice]) -> Result<Vec<String>> {
            Ok(self.picks.clone())
        }

        fn confirm(&mut self, _message: &str, _default: bool) -> Result<bool> {
            self.confirms += 1;
            Ok(self.yes)
        }

        fn prompt_text(&mut self, _message: &str) -> Result<String> {
            self.texts += 1;
            Ok(self.text.clone())
        }
    }

    #[test]
    fn test_filter_excludes_target_state() {
        let snapshot =
            Snapshot::new(vec![record("a", false), record("b", true), record("c", false)]);

        let to_private = filter_by_visibility(&snapshot, true);
        assert_eq!(to_private.names(), vec!["a", "c"]);

        let to_public = filter_by_visibility(&snapshot, false);
        assert_eq!(to_public.names(), vec!["b"]);
        assert_eq!(to_private.len() + to_public.len(), snapshot.len());
    }

    #[test]
    fn test_selection_drops_unknown_and_keeps_order() {
        let candidates = vec![record("a", false), record("b", false), record("c", false)];
        let mut prompter = Scripted {
            picks: vec!["c".to_string(), "ghost".to_string(), "a".to_string()],
            ..Scripted::default()
        };
        let selected = request_selection(&mut prompter, "pick", &candidates).unwrap();
        assert_eq!(selected, vec!["a", "c"]);
    }

    #[test]
    fn test_selection_empty_candidates_skips_prompt() {
        let mut prompter = Scripted {
            picks: vec!["a".to_string()],
            ..Scripted::default()
        };
        assert!(request_selection(&mut prompter, "pick", &[]).unwrap().is_empty());
    }

    #[test]
    fn test_visibility_confirmation() {
        let action = BatchAction::SetVisibility { private: true };

        let mut yes = Scripted { yes: true, ..Scripted::default() };
        let confirmation = request_confirmation(&mut yes, action, 3).unwrap().unwrap();
        assert!(confirmation.covers(action, 3));
        assert!(!confirmation.covers(action, 2));
        assert!(!confirmation.covers(BatchAction::Delete, 3));
        assert_eq!(yes.texts, 0);

        let mut no = Scripted::default();
        assert!(request_confirmation(&mut no, action, 3).unwrap().is_none());
    }

    #[test]
    fn test_delete_requires_exact_phrase() {
        for answer in ["delete", "Delete", "", "DELETE!", " DELETE", "yes"] {
            let mut prompter = Scripted {
                text: answer.to_string(),
                yes: true,
                ..Scripted::default()
            };
            let err = request_confirmation(&mut prompter, BatchAction::Delete, 2).unwrap_err();
            assert!(matches!(err, RepotidyError::Validation(_)), "answer {:?}", answer);
            assert_eq!(prompter.confirms, 0);
        }

        let mut prompter = Scripted {
            text: "DELETE".to_string(),
            ..Scripted::default()
        };
        let confirmation = request_confirmation(&mut prompter, BatchAction::Delete, 2).unwrap();
        assert!(confirmation.unwrap().covers(BatchAction::Delete, 2));
    }

    #[test]
    fn test_flow_transitions() {
        assert!(FlowState::Idle.can_advance_to(FlowState::Fetched));
        let empty = FlowState::Reported(Some(NoOpReason::EmptySnapshot));
        let declined = FlowState::Reported(Some(NoOpReason::Declined));
        assert!(FlowState::Fetched.can_advance_to(empty));
        assert!(!FlowState::Idle.can_advance_to(FlowState::Executing));
        assert!(!FlowState::Executing.can_advance_to(declined));

        let mut flow = Flow::new("test");
        flow.advance(FlowState::Fetched);
        assert_eq!(flow.stop(NoOpReason::EmptySnapshot), NoOpReason::EmptySnapshot);
        assert_eq!(flow.state(), FlowState::Reported(Some(NoOpReason::EmptySnapshot)));
    }
}
