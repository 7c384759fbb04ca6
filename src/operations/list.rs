use log::debug;

use crate::config::Config;
use crate::format::{self, SortKey};
use crate::github::RepoClient;
use crate::snapshot::{self, RepositoryRecord};

#[derive(Debug, Clone, Default)]
pub struct ListFilter {
    pub sort: SortKey,
    /// `Some(true)` for private only, `Some(false)` for public only
    pub private: Option<bool>,
    pub name: Option<String>,
}

/// Fresh snapshot, filtered and sorted for display
pub async fn list_repositories<C: RepoClient>(
    client: &C,
    filter: &ListFilter,
    config: &Config,
) -> Vec<RepositoryRecord> {
    let snapshot = snapshot::collect(client, config.page_size).await;
    let total = snapshot.len();

    let mut records: Vec<RepositoryRecord> = snapshot
        .into_iter()
        .filter(|r| filter.private.is_none_or(|p| r.is_private == p))
        .collect();
    if let Some(needle) = &filter.name {
        records = format::filter_by_name(&records, needle);
    }
    format::sort_records(&mut records, filter.sort);

    debug!("list_repositories: showing {} of {}", records.len(), total);
    records
}
