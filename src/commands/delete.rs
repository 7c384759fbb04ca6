use colored::Colorize;

use crate::config::Config;
use crate::error::Result;
use crate::executor::BatchAction;
use crate::github::RepoClient;
use crate::operations;
use crate::progress::ConsoleProgress;
use crate::prompt::Prompter;

use super::report_outcome;

pub async fn handle_delete<C, P>(client: &C, prompter: &mut P, config: &Config) -> Result<()>
where
    C: RepoClient,
    P: Prompter + ?Sized,
{
    println!("{}", "⚠ Deleted repositories cannot be recovered.".red().bold());
    println!("Fetching repositories...");

    let mut progress = ConsoleProgress::new();
    let outcome = operations::delete_repositories(client, prompter, &mut progress, config).await?;
    report_outcome(BatchAction::Delete, &outcome);
    Ok(())
}
