//! Scripted stand-ins for the GitHub API and the operator.

#![allow(dead_code)]

use chrono::{Duration, TimeZone, Utc};
use std::cell::RefCell;
use std::collections::{HashSet, VecDeque};

use repotidy::config::Config;
use repotidy::error::{RepotidyError, Result};
use repotidy::executor::{ItemOutcome, ProgressReporter};
use repotidy::github::{Identity, RawOwner, RawRecord, RepoClient};
use repotidy::prompt::{Choice, Prompter};

pub const OWNER: &str = "octocat";

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Call {
    FetchPage(u32, u32),
    SetVisibility(String, bool),
    Delete(String),
}

/// In-memory account. Pages are slices of `repos`; mutations update it.
#[derive(Default)]
pub struct FakeClient {
    pub repos: RefCell<Vec<RawRecord>>,
    pub calls: RefCell<Vec<Call>>,
    pub fail_page: Option<u32>,
    pub fail_names: HashSet<String>,
}

impl FakeClient {
    pub fn with_repos(repos: Vec<RawRecord>) -> Self {
        Self {
            repos: RefCell::new(repos),
            ..Self::default()
        }
    }

    /// `count` public repositories named repo-000, repo-001, ...
    pub fn with_count(count: usize) -> Self {
        Self::with_repos((0..count).map(|i| raw(&format!("repo-{:03}", i), false)).collect())
    }

    pub fn fetch_calls(&self) -> usize {
        self.calls
            .borrow()
            .iter()
            .filter(|c| matches!(c, Call::FetchPage(..)))
            .count()
    }

    pub fn mutation_calls(&self) -> Vec<Call> {
        self.calls
            .borrow()
            .iter()
            .filter(|c| !matches!(c, Call::FetchPage(..)))
            .cloned()
            .collect()
    }

    pub fn is_private(&self, name: &str) -> Option<bool> {
        self.repos.borrow().iter().find(|r| r.name == name).map(|r| r.private)
    }

    pub fn exists(&self, name: &str) -> bool {
        self.repos.borrow().iter().any(|r| r.name == name)
    }
}

impl RepoClient for FakeClient {
    async fn authenticate(&self) -> Result<Identity> {
        Ok(Identity {
            login: OWNER.to_string(),
        })
    }

    async fn fetch_page(&self, page: u32, per_page: u32) -> Result<Vec<RawRecord>> {
        self.calls.borrow_mut().push(Call::FetchPage(page, per_page));
        if self.fail_page == Some(page) {
            return Err(RepotidyError::Fetch(format!("HTTP 502: page {}", page)));
        }

        let repos = self.repos.borrow();
        let start = ((page - 1) * per_page) as usize;
        let end = (start + per_page as usize).min(repos.len());
        Ok(repos.get(start..end).map(|s| s.to_vec()).unwrap_or_default())
    }

    async fn set_visibility(&self, _owner: &str, name: &str, private: bool) -> Result<()> {
        self.calls
            .borrow_mut()
            .push(Call::SetVisibility(name.to_string(), private));
        if self.fail_names.contains(name) {
            return Err(RepotidyError::mutation(name, "HTTP 403: Forbidden"));
        }
        if let Some(repo) = self.repos.borrow_mut().iter_mut().find(|r| r.name == name) {
            repo.private = private;
        }
        Ok(())
    }

    async fn delete(&self, _owner: &str, name: &str) -> Result<()> {
        self.calls.borrow_mut().push(Call::Delete(name.to_string()));
        if self.fail_names.contains(name) {
            return Err(RepotidyError::mutation(name, "HTTP 404: Not Found"));
        }
        self.repos.borrow_mut().retain(|r| r.name != name);
        Ok(())
    }
}

pub fn raw(name: &str, private: bool) -> RawRecord {
    let base = Utc.with_ymd_and_hms(2026, 1, 1, 0, 0, 0).unwrap();
    RawRecord {
        id: name.bytes().map(u64::from).sum(),
        name: name.to_string(),
        full_name: format!("{}/{}", OWNER, name),
        private,
        description: None,
        language: Some("Rust".to_string()),
        updated_at: Some(base - Duration::minutes(name.len() as i64)),
        size: Some(64),
        owner: Some(RawOwner {
            login: OWNER.to_string(),
        }),
    }
}

#[derive(Debug, Clone)]
pub enum Answer {
    One(Option<String>),
    Many(Vec<&'static str>),
    Confirm(bool),
    Text(&'static str),
    /// The prompt itself fails with an I/O error.
    IoError(&'static str),
    /// Standard input is gone.
    Closed,
}

/// Replays answers in order. Once the script runs out the menu gets "exit".
#[derive(Default)]
pub struct ScriptedPrompter {
    pub answers: VecDeque<Answer>,
    /// Values offered to each `select_many` call
    pub offered: Vec<Vec<String>>,
}

impl ScriptedPrompter {
    pub fn new(answers: Vec<Answer>) -> Self {
        Self {
            answers: answers.into(),
            offered: Vec::new(),
        }
    }

    pub fn one(value: &str) -> Answer {
        Answer::One(Some(value.to_string()))
    }

    fn next(&mut self, what: &str) -> Answer {
        self.answers
            .pop_front()
            .unwrap_or_else(|| panic!("script exhausted at {}", what))
    }
}

impl Prompter for ScriptedPrompter {
    fn select_one(&mut self, _message: &str, _choices: &[Choice]) -> Result<Option<String>> {
        if self.answers.is_empty() {
            return Ok(Some("exit".to_string()));
        }
        match self.next("select_one") {
            Answer::One(value) => Ok(value),
            Answer::IoError(message) => Err(std::io::Error::other(message).into()),
            Answer::Closed => Err(RepotidyError::Prompt("input stream closed".to_string())),
            other => panic!("expected select_one answer, got {:?}", other),
        }
    }

    fn select_many(&mut self, _message: &str, choices: &[Choice]) -> Result<Vec<String>> {
        self.offered.push(choices.iter().map(|c| c.value.clone()).collect());
        match self.next("select_many") {
            Answer::Many(values) => Ok(values.into_iter().map(String::from).collect()),
            other => panic!("expected select_many answer, got {:?}", other),
        }
    }

    fn confirm(&mut self, _message: &str, _default: bool) -> Result<bool> {
        match self.next("confirm") {
            Answer::Confirm(yes) => Ok(yes),
            other => panic!("expected confirm answer, got {:?}", other),
        }
    }

    fn prompt_text(&mut self, _message: &str) -> Result<String> {
        match self.next("prompt_text") {
            Answer::Text(text) => Ok(text.to_string()),
            other => panic!("expected prompt_text answer, got {:?}", other),
        }
    }
}

pub fn test_config() -> Config {
    Config {
        visibility_delay_ms: 0,
        delete_delay_ms: 0,
        ..Config::default()
    }
}

/// Remembers every callback the executor makes.
#[derive(Debug, Default)]
pub struct RecordingProgress {
    pub starts: Vec<usize>,
    /// (done, total, name, succeeded)
    pub items: Vec<(usize, usize, String, bool)>,
    pub finishes: usize,
}

impl ProgressReporter for RecordingProgress {
    fn start(&mut self, total: usize) {
        self.starts.push(total);
    }

    fn item_done(&mut self, done: usize, total: usize, name: &str, outcome: &ItemOutcome) {
        self.items
            .push((done, total, name.to_string(), outcome.is_success()));
    }

    fn finish(&mut self) {
        self.finishes += 1;
    }
}
