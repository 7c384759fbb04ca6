use log::{info, warn};

use crate::config::Config;
use crate::error::{RepotidyError, Result};
use crate::executor::{self, BatchAction, BatchRequest, ProgressReporter};
use crate::gate::{self, Flow, FlowState, NoOpReason};
use crate::github::RepoClient;
use crate::prompt::Prompter;
use crate::snapshot;

use super::FlowOutcome;

/// Fetch, let the operator pick, require the literal phrase, then delete.
/// A mismatched phrase cancels the whole flow before any request is sent.
pub async fn delete_repositories<C, P, R>(
    client: &C,
    prompter: &mut P,
    progress: &mut R,
    config: &Config,
) -> Result<FlowOutcome>
where
    C: RepoClient,
    P: Prompter + ?Sized,
    R: ProgressReporter + ?Sized,
{
    let action = BatchAction::Delete;
    let mut flow = Flow::new("delete_repositories");

    let snapshot = snapshot::collect(client, config.page_size).await;
    flow.advance(FlowState::Fetched);
    if snapshot.is_empty() {
        return Ok(FlowOutcome::NoOp(flow.stop(NoOpReason::EmptySnapshot)));
    }

    // every repository is eligible for deletion
    flow.advance(FlowState::Filtered);

    let message = "Select repositories to DELETE";
    let selected = gate::request_selection(prompter, message, snapshot.records())?;
    flow.advance(FlowState::Selected);
    if selected.is_empty() {
        return Ok(FlowOutcome::NoOp(flow.stop(NoOpReason::NothingSelected)));
    }

    let confirmation = match gate::request_confirmation(prompter, action, selected.len()) {
        Ok(confirmation) => confirmation,
        Err(RepotidyError::Validation(message)) => {
            warn!("delete_repositories: {}", message);
            None
        }
        Err(e) => return Err(e),
    };
    flow.advance(FlowState::Confirmed);
    let Some(confirmation) = confirmation else {
        return Ok(FlowOutcome::NoOp(flow.stop(NoOpReason::Declined)));
    };

    info!("delete_repositories: confirmed for {} repositories", selected.len());
    let request = BatchRequest::new(action, snapshot.restrict_to(&selected), confirmation)?;
    flow.advance(FlowState::Executing);
    let result = executor::execute(client, &request, &config.pacing(), progress).await;
    flow.advance(FlowState::Reported(None));

    Ok(FlowOutcome::Completed(result))
}
