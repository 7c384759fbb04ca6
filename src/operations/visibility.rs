use log::{info, warn};

use crate::config::Config;
use crate::error::Result;
use crate::executor::{self, BatchAction, BatchRequest, ProgressReporter};
use crate::gate::{self, Flow, FlowState, NoOpReason};
use crate::github::RepoClient;
use crate::prompt::Prompter;
use crate::snapshot;

use super::FlowOutcome;

/// Fetch, keep only repositories not already at `target_private`, let the
/// operator pick, confirm, then flip each one.
pub async fn change_visibility<C, P, R>(
    client: &C,
    prompter: &mut P,
    progress: &mut R,
    target_private: bool,
    config: &Config,
) -> Result<FlowOutcome>
where
    C: RepoClient,
    P: Prompter + ?Sized,
    R: ProgressReporter + ?Sized,
{
    let action = BatchAction::SetVisibility {
        private: target_private,
    };
    let mut flow = Flow::new("change_visibility");
    info!("change_visibility: target private={}", target_private);

    let snapshot = snapshot::collect(client, config.page_size).await;
    flow.advance(FlowState::Fetched);
    if snapshot.is_empty() {
        return Ok(FlowOutcome::NoOp(flow.stop(NoOpReason::EmptySnapshot)));
    }

    let candidates = gate::filter_by_visibility(&snapshot, target_private);
    flow.advance(FlowState::Filtered);
    if candidates.is_empty() {
        info!("change_visibility: all {} repositories already match", snapshot.len());
        return Ok(FlowOutcome::NoOp(flow.stop(NoOpReason::NothingEligible)));
    }

    let message = format!("Select repositories to {}", action.describe());
    let selected = gate::request_selection(prompter, &message, candidates.records())?;
    flow.advance(FlowState::Selected);
    if selected.is_empty() {
        return Ok(FlowOutcome::NoOp(flow.stop(NoOpReason::NothingSelected)));
    }

    let confirmation = gate::request_confirmation(prompter, action, selected.len())?;
    flow.advance(FlowState::Confirmed);
    let Some(confirmation) = confirmation else {
        warn!("change_visibility: operator declined");
        return Ok(FlowOutcome::NoOp(flow.stop(NoOpReason::Declined)));
    };

    let request = BatchRequest::new(action, candidates.restrict_to(&selected), confirmation)?;
    flow.advance(FlowState::Executing);
    let result = executor::execute(client, &request, &config.pacing(), progress).await;
    flow.advance(FlowState::Reported(None));

    Ok(FlowOutcome::Completed(result))
}
