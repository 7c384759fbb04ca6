use crate::config::Config;
use crate::error::Result;
use crate::executor::BatchAction;
use crate::github::RepoClient;
use crate::operations;
use crate::progress::ConsoleProgress;
use crate::prompt::{Choice, Prompter};

use super::report_outcome;

pub async fn handle_visibility<C, P>(client: &C, prompter: &mut P, config: &Config) -> Result<()>
where
    C: RepoClient,
    P: Prompter + ?Sized,
{
    let targets = [
        Choice::new("private", "🔒 Make private"),
        Choice::new("public", "🌐 Make public"),
    ];
    let target_private = match prompter.select_one("Change visibility to", &targets)?.as_deref() {
        Some("private") => true,
        Some("public") => false,
        _ => return Ok(()),
    };

    println!("Fetching repositories...");
    let mut progress = ConsoleProgress::new();
    let outcome =
        operations::change_visibility(client, prompter, &mut progress, target_private, config)
            .await?;
    report_outcome(
        BatchAction::SetVisibility {
            private: target_private,
        },
        &outcome,
    );
    Ok(())
}
