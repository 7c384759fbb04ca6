use crate::config::Config;
use crate::error::Result;
use crate::format;
use crate::github::RepoClient;
use crate::operations::{self, ListFilter};

pub async fn handle_list<C: RepoClient>(
    client: &C,
    filter: &ListFilter,
    config: &Config,
) -> Result<()> {
    println!("Fetching repositories...");
    print_list(client, filter, config).await;
    Ok(())
}

pub async fn print_list<C: RepoClient>(client: &C, filter: &ListFilter, config: &Config) {
    let records = operations::list_repositories(client, filter, config).await;
    println!("\n{}", format::format_table(&records));
}
