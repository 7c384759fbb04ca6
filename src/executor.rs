//! Sequential execution of a confirmed batch.
//!
//! Items run one at a time in request order. A failing item is recorded and
//! the batch moves on; nothing here returns an error. Consecutive items are
//! separated by a fixed pause to stay under the remote's rate limit.

use log::{debug, info, warn};
use std::time::Duration;

use crate::config::Pacing;
use crate::error::{RepotidyError, Result};
use crate::gate::Confirmation;
use crate::github::RepoClient;
use crate::snapshot::RepositoryRecord;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum BatchAction {
    SetVisibility { private: bool },
    Delete,
}

impl BatchAction {
    pub fn noun(&self) -> &'static str {
        match self {
            BatchAction::SetVisibility { .. } => "Visibility change",
            BatchAction::Delete => "Deletion",
        }
    }

    pub fn describe(&self) -> &'static str {
        match self {
            BatchAction::SetVisibility { private: true } => "make private",
            BatchAction::SetVisibility { private: false } => "make public",
            BatchAction::Delete => "permanently delete",
        }
    }

    pub fn delay(&self, pacing: &Pacing) -> Duration {
        match self {
            BatchAction::SetVisibility { .. } => pacing.visibility,
            BatchAction::Delete => pacing.delete,
        }
    }
}

/// A non-empty, operator-approved set of repositories from one snapshot.
///
/// The only way in is [`BatchRequest::new`], which consumes the
/// [`Confirmation`] the gate handed out for this exact action and size.
#[derive(Debug, Clone)]
pub struct BatchRequest {
    action: BatchAction,
    items: Vec<RepositoryRecord>,
}

impl BatchRequest {
    pub fn new(
        action: BatchAction,
        items: Vec<RepositoryRecord>,
        confirmation: Confirmation,
    ) -> Result<Self> {
        if items.is_empty() {
            return Err(RepotidyError::Validation(
                "a batch needs at least one repository".to_string(),
            ));
        }
        if !confirmation.covers(action, items.len()) {
            return Err(RepotidyError::Validation(format!(
                "confirmation was for {} item(s) of '{}', request has {} of '{}'",
                confirmation.count(),
                confirmation.action().describe(),
                items.len(),
                action.describe()
            )));
        }

        Ok(Self { action, items })
    }

    pub fn action(&self) -> BatchAction {
        self.action
    }

    pub fn items(&self) -> &[RepositoryRecord] {
        &self.items
    }

    pub fn len(&self) -> usize {
        self.items.len()
    }

    pub fn is_empty(&self) -> bool {
        self.items.is_empty()
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ItemOutcome {
    Success,
    Failure(String),
}

impl ItemOutcome {
    pub fn is_success(&self) -> bool {
        matches!(self, ItemOutcome::Success)
    }
}

#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct BatchResult {
    outcomes: Vec<(String, ItemOutcome)>,
}

impl BatchResult {
    pub fn new(outcomes: Vec<(String, ItemOutcome)>) -> Self {
        Self { outcomes }
    }

    pub fn outcomes(&self) -> &[(String, ItemOutcome)] {
        &self.outcomes
    }

    pub fn attempted(&self) -> usize {
        self.outcomes.len()
    }

    pub fn succeeded(&self) -> usize {
        self.outcomes.iter().filter(|(_, o)| o.is_success()).count()
    }

    pub fn failed(&self) -> usize {
        self.attempted() - self.succeeded()
    }

    pub fn failures(&self) -> impl Iterator<Item = (&str, &str)> {
        self.outcomes.iter().filter_map(|(name, outcome)| match outcome {
            ItemOutcome::Failure(message) => Some((name.as_str(), message.as_str())),
            ItemOutcome::Success => None,
        })
    }
}

/// Told about every attempt as it finishes.
pub trait ProgressReporter {
    fn start(&mut self, _total: usize) {}

    fn item_done(&mut self, done: usize, total: usize, name: &str, outcome: &ItemOutcome);

    fn finish(&mut self) {}
}

pub struct NoProgress;

impl ProgressReporter for NoProgress {
    fn item_done(&mut self, _done: usize, _total: usize, _name: &str, _outcome: &ItemOutcome) {}
}

pub async fn execute<C, P>(
    client: &C,
    request: &BatchRequest,
    pacing: &Pacing,
    progress: &mut P,
) -> BatchResult
where
    C: RepoClient,
    P: ProgressReporter + ?Sized,
{
    let action = request.action();
    let total = request.len();
    let delay = action.delay(pacing);
    let mut outcomes = Vec::with_capacity(total);

    info!("execute: {} on {} repositories", action.describe(), total);
    progress.start(total);

    for (idx, record) in request.items().iter().enumerate() {
        let attempt = match action {
            BatchAction::SetVisibility { private } => {
                client.set_visibility(&record.owner, &record.name, private).await
            }
            BatchAction::Delete => client.delete(&record.owner, &record.name).await,
        };

        let outcome = match attempt {
            Ok(()) => {
                debug!("execute: '{}' ok", record.full_name);
                ItemOutcome::Success
            }
            Err(e) => {
                warn!("execute: '{}' failed: {}", record.full_name, e);
                ItemOutcome::Failure(e.to_string())
            }
        };

        progress.item_done(idx + 1, total, &record.name, &outcome);
        outcomes.push((record.name.clone(), outcome));

        if idx + 1 < total && !delay.is_zero() {
            tokio::time::sleep(delay).await;
        }
    }
    progress.finish();

    let result = BatchResult::new(outcomes);
    info!(
        "execute: {} finished, {} succeeded, {} failed",
        action.describe(),
        result.succeeded(),
        result.failed()
    );
    result
}
