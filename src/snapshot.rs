use chrono::{DateTime, Utc};
use log::{debug, info, warn};
use std::collections::HashSet;

use crate::error::Result;
use crate::github::{RawRecord, RepoClient};

pub const NO_DESCRIPTION: &str = "No description";
pub const UNKNOWN_LANGUAGE: &str = "Unknown";

/// One repository as it looked when the snapshot was taken
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RepositoryRecord {
    pub id: u64,
    pub name: String,
    pub full_name: String,
    pub owner: String,
    pub is_private: bool,
    pub description: String,
    pub language: String,
    pub updated_at: DateTime<Utc>,
    pub size_kb: u64,
}

impl RepositoryRecord {
    pub fn from_raw(raw: RawRecord, fetched_at: DateTime<Utc>) -> Self {
        let owner = raw
            .owner
            .map(|o| o.login)
            .or_else(|| raw.full_name.split_once('/').map(|(owner, _)| owner.to_string()))
            .unwrap_or_default();
        let full_name = if raw.full_name.is_empty() {
            format!("{}/{}", owner, raw.name)
        } else {
            raw.full_name
        };

        Self {
            id: raw.id,
            name: raw.name,
            full_name,
            owner,
            is_private: raw.private,
            description: non_blank(raw.description).unwrap_or_else(|| NO_DESCRIPTION.to_string()),
            language: non_blank(raw.language).unwrap_or_else(|| UNKNOWN_LANGUAGE.to_string()),
            updated_at: raw.updated_at.unwrap_or(fetched_at),
            size_kb: raw.size.unwrap_or(0),
        }
    }
}

fn non_blank(value: Option<String>) -> Option<String> {
    value.filter(|s| !s.trim().is_empty())
}

/// All repositories visible to a single fetch, in the order the remote returned them.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct Snapshot {
    records: Vec<RepositoryRecord>,
}

impl Snapshot {
    pub fn new(records: Vec<RepositoryRecord>) -> Self {
        Self { records }
    }

    pub fn records(&self) -> &[RepositoryRecord] {
        &self.records
    }

    pub fn len(&self) -> usize {
        self.records.len()
    }

    pub fn is_empty(&self) -> bool {
        self.records.is_empty()
    }

    pub fn names(&self) -> Vec<&str> {
        self.records.iter().map(|r| r.name.as_str()).collect()
    }

    /// Records whose names are in `names`, in snapshot order
    pub fn restrict_to(&self, names: &[String]) -> Vec<RepositoryRecord> {
        self.records
            .iter()
            .filter(|r| names.iter().any(|n| n == &r.name))
            .cloned()
            .collect()
    }
}

impl IntoIterator for Snapshot {
    type Item = RepositoryRecord;
    type IntoIter = std::vec::IntoIter<RepositoryRecord>;

    fn into_iter(self) -> Self::IntoIter {
        self.records.into_iter()
    }
}

/// Fetch every page, stopping at the first page shorter than `page_size`.
/// Any fetch error aborts the whole collection.
pub async fn try_collect<C: RepoClient>(client: &C, page_size: u32) -> Result<Snapshot> {
    let fetched_at = Utc::now();
    let mut records = Vec::new();
    let mut seen = HashSet::new();
    let mut page = 1u32;

    loop {
        let batch = client.fetch_page(page, page_size).await?;
        let received = batch.len();
        debug!("collect: page {} returned {} records", page, received);

        for raw in batch {
            if !seen.insert(raw.name.clone()) {
                warn!("collect: dropping duplicate '{}' on page {}", raw.name, page);
                continue;
            }
            records.push(RepositoryRecord::from_raw(raw, fetched_at));
        }

        if received < page_size as usize {
            break;
        }
        page += 1;
    }

    info!("collect: {} repositories across {} pages", records.len(), page);
    Ok(Snapshot::new(records))
}

/// Complete-or-empty: on a fetch failure the partial inventory is discarded.
pub async fn collect<C: RepoClient>(client: &C, page_size: u32) -> Snapshot {
    match try_collect(client, page_size).await {
        Ok(snapshot) => snapshot,
        Err(e) => {
            warn!("collect: abandoning snapshot: {}", e);
            Snapshot::default()
        }
    }
}
